//! Fixed-point complex phasor shared by the FM modulator and the mixer.
//!
//! Both components advance a running unit vector `(i, q)` by complex-multiplying
//! it with a per-sample rotation and periodically renormalise it back onto the
//! unit circle (scaled to `INT32_MAX - INT16_MAX`) to cancel the gain drift that
//! fixed-point rounding otherwise accumulates sample by sample.

use satr_core::fixed::round_shift;
use satr_core::math::{atan2, cos, round, sin};

/// Magnitude a freshly renormalised phasor is scaled to. Leaving a margin of
/// `INT16_MAX` below `INT32_MAX` keeps the subsequent complex multiplies from
/// overflowing `i32` before they're rounded back down.
pub const PHASOR_SCALE: i64 = i32::MAX as i64 - i16::MAX as i64;

/// How many samples pass between renormalisations.
pub const RENORM_PERIOD: u32 = i16::MAX as u32;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Phasor {
    pub i: i32,
    pub q: i32,
    since_renorm: u32,
}

impl Phasor {
    pub fn new() -> Self {
        Phasor {
            i: PHASOR_SCALE as i32,
            q: 0,
            since_renorm: 0,
        }
    }

    /// Rotates this phasor by complex-multiplying it with `(di, dq)`, then
    /// renormalises every [`RENORM_PERIOD`] samples.
    #[inline]
    pub fn rotate(&mut self, di: i32, dq: i32) {
        let i = self.i as i64;
        let q = self.q as i64;
        let di = di as i64;
        let dq = dq as i64;

        self.i = round_shift(i * di - q * dq, 31) as i32;
        self.q = round_shift(i * dq + q * di, 31) as i32;

        self.since_renorm += 1;
        if self.since_renorm == RENORM_PERIOD {
            self.since_renorm = 0;
            self.renormalize();
        }
    }

    /// Rewrites the phasor as a unit vector (scaled to [`PHASOR_SCALE`]) at the
    /// same angle, discarding any magnitude drift.
    fn renormalize(&mut self) {
        let angle = atan2(self.q as f64, self.i as f64);
        self.i = round(cos(angle) * PHASOR_SCALE as f64) as i32;
        self.q = round(sin(angle) * PHASOR_SCALE as f64) as i32;
    }
}

impl Default for Phasor {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_at_unit_angle_zero() {
        let p = Phasor::new();
        assert_eq!(p.i, PHASOR_SCALE as i32);
        assert_eq!(p.q, 0);
    }

    #[test]
    fn magnitude_stays_within_one_percent_after_a_full_renorm_period() {
        // A small non-zero rotation repeated RENORM_PERIOD times; the
        // periodic renormalisation should keep |phasor|^2 close to
        // PHASOR_SCALE^2 despite the rounding in `rotate`.
        let angle = std::f64::consts::TAU / 10_000.0;
        let di = (angle.cos() * PHASOR_SCALE as f64).round() as i32;
        let dq = (angle.sin() * PHASOR_SCALE as f64).round() as i32;

        let mut p = Phasor::new();
        for _ in 0..RENORM_PERIOD {
            p.rotate(di, dq);
        }

        let mag_sq = (p.i as f64).powi(2) + (p.q as f64).powi(2);
        let target_sq = (PHASOR_SCALE as f64).powi(2);
        assert!((mag_sq - target_sq).abs() / target_sq < 0.01);
    }
}
