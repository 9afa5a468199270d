//! QPSK shaping filter: root-raised-cosine x Hamming pulse, driven through
//! the same polyphase interpolation structure as [`crate::fir::IntFir`], one
//! bank of taps shared by an in-phase and a quadrature rail.

use satr_core::Real;
use satr_core::math::{abs, cos, sin};

use crate::fir::IntFir;

const BETA: f64 = 0.5;
const SYMBOL_PERIOD: f64 = 1.0;

/// Root-raised-cosine pulse at roll-off `beta`, symbol period `t_sym`.
fn rrc(t: f64, beta: f64, t_sym: f64) -> f64 {
    if abs(t) < 1e-9 {
        return (1.0 / t_sym) * (1.0 + beta * (4.0 / f64::PI - 1.0));
    }

    let denom_term = 4.0 * beta * t / t_sym;
    if beta > 0.0 && abs(abs(denom_term) - 1.0) < 1e-9 {
        let x = f64::PI / (4.0 * beta);
        return (beta / (t_sym * f64::SQRT_2)) * ((1.0 + 2.0 / f64::PI) * sin(x) + (1.0 - 2.0 / f64::PI) * cos(x));
    }

    let x = f64::PI * t / t_sym;
    let num = sin(x * (1.0 - beta)) + 4.0 * beta * t / t_sym * cos(x * (1.0 + beta));
    let den = x * (1.0 - denom_term.powi(2));
    num / den / t_sym
}

/// Standard Hamming window evaluated at normalized position `u`, zero
/// outside `[-1, 1]`.
fn hamming(u: f64) -> f64 {
    if abs(u) > 1.0 { 0.0 } else { 0.54 + 0.46 * cos(f64::PI * u) }
}

/// Builds the `5*interpolation | 1` shaping taps for a QPSK pulse at the
/// given interpolation factor.
pub fn qpsk_taps(interpolation: usize) -> Vec<f64> {
    let ntaps = 5 * interpolation | 1;
    let n = ntaps / 2;

    (0..ntaps)
        .map(|x| {
            let t = (x as f64 - n as f64) / interpolation as f64;
            let w = if n == 0 { 1.0 } else { (x as f64 - n as f64) / n as f64 };
            rrc(t, BETA, SYMBOL_PERIOD) * f64::FRAC_1_SQRT_2 * hamming(w)
        })
        .collect()
}

/// Amplitude fed into the shaping filter for a raw +1/-1 QPSK symbol.
pub const SYMBOL_AMPLITUDE: i32 = i16::MAX as i32;

pub struct QpskModulator {
    i_fir: IntFir,
    q_fir: IntFir,
    interpolation: usize,
}

impl QpskModulator {
    pub fn new(interpolation: usize, decimation: usize) -> Self {
        let taps = qpsk_taps(interpolation);
        QpskModulator {
            i_fir: IntFir::new(&taps, interpolation, decimation, 0),
            q_fir: IntFir::new(&taps, interpolation, decimation, 0),
            interpolation,
        }
    }

    /// Pushes one QPSK symbol (MSB-first bit pair: `bit1` selects I,
    /// `bit0` selects Q) and writes the interpolated complex output samples
    /// into `out_i`/`out_q`, returning the count produced.
    pub fn process_symbol(&mut self, bit1: bool, bit0: bool, out_i: &mut [i16], out_q: &mut [i16]) -> usize {
        let i_sym = if bit1 { SYMBOL_AMPLITUDE } else { -SYMBOL_AMPLITUDE };
        let q_sym = if bit0 { SYMBOL_AMPLITUDE } else { -SYMBOL_AMPLITUDE };

        let mut wide_i = vec![0i32; self.interpolation];
        let mut wide_q = vec![0i32; self.interpolation];

        let ni = self.i_fir.process_sample(i_sym, &mut wide_i);
        let nq = self.q_fir.process_sample(q_sym, &mut wide_q);
        debug_assert_eq!(ni, nq);

        for idx in 0..ni {
            out_i[idx] = wide_i[idx].clamp(i16::MIN as i32, i16::MAX as i32) as i16;
            out_q[idx] = wide_q[idx].clamp(i16::MIN as i32, i16::MAX as i32) as i16;
        }

        ni
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ntaps_is_odd_and_scaled_by_interpolation() {
        let taps = qpsk_taps(4);
        assert_eq!(taps.len(), 5 * 4 | 1);
        assert_eq!(taps.len() % 2, 1);
    }

    #[test]
    fn rrc_at_zero_is_finite_and_positive() {
        let v = rrc(0.0, BETA, SYMBOL_PERIOD);
        assert!(v.is_finite());
        assert!(v > 0.0);
    }

    #[test]
    fn hamming_window_peaks_at_center() {
        assert!((hamming(0.0) - 1.0).abs() < 1e-9);
        // 0.54 + 0.46*cos(pi) = 0.08, not zero: a Hamming window doesn't
        // reach zero at its endpoints (that's a Hann window).
        assert!((hamming(1.0) - 0.08).abs() < 1e-9);
        assert_eq!(hamming(1.5), 0.0);
    }

    #[test]
    fn all_zero_symbols_produce_a_bounded_envelope() {
        let mut qpsk = QpskModulator::new(4, 1);
        let mut out_i = [0i16; 4];
        let mut out_q = [0i16; 4];
        let mut peak = 0i32;
        for _ in 0..64 {
            let n = qpsk.process_symbol(false, false, &mut out_i, &mut out_q);
            for idx in 0..n {
                peak = peak.max(out_i[idx].unsigned_abs() as i32);
                peak = peak.max(out_q[idx].unsigned_abs() as i32);
            }
        }
        assert!(peak > 0);
        assert!(peak <= i16::MAX as i32);
    }
}
