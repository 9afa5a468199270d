//! Fixed-point polyphase FIR filter.
//!
//! Taps are quantized to Q15 fixed point at construction time and reordered
//! into `interpolation` polyphase banks so that, per input sample, each
//! output sample is a single dot product over `ataps = ntaps / interpolation`
//! taps rather than the full tap count. `decimation` advances the phase
//! accumulator by more than one bank per input sample, which both thins the
//! output and (when `decimation > interpolation`) can skip producing any
//! output at all for a given input sample — the accumulator `d` carries the
//! remainder across calls, exactly mirroring a rational resampler.

use satr_core::fixed::saturate_i32;
use satr_core::math::round;

/// Number of taps in each pre-emphasis table below (40-15000Hz low-pass at
/// 32kHz, combined with the named de-emphasis curve).
pub const PREEMPH_TAPS: usize = 65;

#[rustfmt::skip]
pub const PREEMPH_FLAT_TAPS: [f64; PREEMPH_TAPS] = [
     0.000000,-0.000793, 0.000318,-0.001297, 0.000756,-0.002084, 0.001341,
    -0.003091, 0.001926,-0.004059, 0.002173,-0.004543, 0.001586,-0.003982,
    -0.000386,-0.001819,-0.004219, 0.002351,-0.010158, 0.008641,-0.018108,
     0.016785,-0.027575, 0.026122,-0.037697, 0.035663,-0.047356, 0.044249,
    -0.055360, 0.050742,-0.060650, 0.054238, 0.937500, 0.054238,-0.060650,
     0.050742,-0.055360, 0.044249,-0.047356, 0.035663,-0.037697, 0.026122,
    -0.027575, 0.016785,-0.018108, 0.008641,-0.010158, 0.002351,-0.004219,
    -0.001819,-0.000386,-0.003982, 0.001586,-0.004543, 0.002173,-0.004059,
     0.001926,-0.003091, 0.001341,-0.002084, 0.000756,-0.001297, 0.000318,
    -0.000793,-0.000000,
];

#[rustfmt::skip]
pub const PREEMPH_50US_TAPS: [f64; PREEMPH_TAPS] = [
     0.001234,-0.002637, 0.002903,-0.004810, 0.005412,-0.008091, 0.008855,
    -0.012171, 0.012482,-0.015806, 0.014595,-0.016860, 0.012742,-0.012646,
     0.004202,-0.000532,-0.013336, 0.021334,-0.041037, 0.053332,-0.078322,
     0.093873,-0.122521, 0.139174,-0.168825, 0.183024,-0.210266, 0.214647,
    -0.236618, 0.196560,-0.226183,-0.606600, 2.497308,-0.606600,-0.226183,
     0.196560,-0.236618, 0.214647,-0.210266, 0.183024,-0.168825, 0.139174,
    -0.122521, 0.093873,-0.078322, 0.053332,-0.041037, 0.021334,-0.013336,
    -0.000532, 0.004202,-0.012646, 0.012742,-0.016860, 0.014595,-0.015806,
     0.012482,-0.012171, 0.008855,-0.008091, 0.005412,-0.004810, 0.002903,
    -0.002637, 0.001234,
];

#[rustfmt::skip]
pub const PREEMPH_75US_TAPS: [f64; PREEMPH_TAPS] = [
     0.001981,-0.003755, 0.004472,-0.006942, 0.008239,-0.011739, 0.013420,
    -0.017690, 0.018901,-0.022955, 0.022160,-0.024370, 0.019556,-0.017960,
     0.007049, 0.000170,-0.018791, 0.032752,-0.059706, 0.080325,-0.114856,
     0.140480,-0.180353, 0.207455,-0.249292, 0.271550,-0.312119, 0.315065,
    -0.356561, 0.275266,-0.363286,-0.992136, 3.546394,-0.992136,-0.363286,
     0.275266,-0.356561, 0.315065,-0.312119, 0.271550,-0.249292, 0.207455,
    -0.180353, 0.140480,-0.114856, 0.080325,-0.059706, 0.032752,-0.018791,
     0.000170, 0.007049,-0.017960, 0.019556,-0.024370, 0.022160,-0.022955,
     0.018901,-0.017690, 0.013420,-0.011739, 0.008239,-0.006942, 0.004472,
    -0.003755, 0.001981,
];

#[rustfmt::skip]
pub const PREEMPH_J17_TAPS: [f64; PREEMPH_TAPS] = [
    -0.000119,-0.000175,-0.000162,-0.000232,-0.000223,-0.000310,-0.000309,
    -0.000420,-0.000430,-0.000576,-0.000605,-0.000801,-0.000864,-0.001135,
    -0.001253,-0.001644,-0.001860,-0.002446,-0.002844,-0.003776,-0.004531,
    -0.006130,-0.007663,-0.010705,-0.014141,-0.020784,-0.029556,-0.046668,
    -0.072530,-0.124846,-0.211267,-0.400931, 2.279077,-0.400931,-0.211267,
    -0.124846,-0.072530,-0.046668,-0.029556,-0.020784,-0.014141,-0.010705,
    -0.007663,-0.006130,-0.004531,-0.003776,-0.002844,-0.002446,-0.001860,
    -0.001644,-0.001253,-0.001135,-0.000864,-0.000801,-0.000605,-0.000576,
    -0.000430,-0.000420,-0.000309,-0.000310,-0.000223,-0.000232,-0.000162,
    -0.000175,-0.000119,
];

/// Which pre-emphasis curve a channel's limiter applies to its variable
/// (program) path. The fixed path always runs the flat response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Deserialize)]
pub enum Preemphasis {
    #[serde(rename = "none")]
    Flat,
    #[serde(rename = "50us")]
    Us50,
    #[serde(rename = "75us")]
    Us75,
    #[serde(rename = "j17")]
    J17,
}

impl Preemphasis {
    pub fn taps(self) -> &'static [f64; PREEMPH_TAPS] {
        match self {
            Preemphasis::Flat => &PREEMPH_FLAT_TAPS,
            Preemphasis::Us50 => &PREEMPH_50US_TAPS,
            Preemphasis::Us75 => &PREEMPH_75US_TAPS,
            Preemphasis::J17 => &PREEMPH_J17_TAPS,
        }
    }
}

/// An integer polyphase FIR filter over Q15-quantized `f64` taps.
pub struct IntFir {
    interpolation: usize,
    decimation: usize,
    ataps: usize,
    itaps: Vec<i32>,
    win: Vec<i32>,
    lwin: usize,
    owin: usize,
    d: usize,
}

impl IntFir {
    /// `delay` extends the circular window by `delay` extra slots beyond the
    /// duplicated tail, for filters that need a few samples of look-ahead
    /// room beyond what the tap count alone would give them.
    pub fn new(taps: &[f64], interpolation: usize, decimation: usize, delay: usize) -> Self {
        assert!(interpolation > 0 && decimation > 0 && !taps.is_empty());

        let ntaps_in = taps.len();
        let rem = ntaps_in % interpolation;
        let ntaps = ntaps_in + if rem != 0 { interpolation - rem } else { 0 };
        let ataps = ntaps / interpolation;

        let mut itaps = vec![0i32; ntaps];
        let mut j: isize = (ntaps - ataps) as isize;
        for i in (0..ntaps_in).rev() {
            itaps[j as usize] = round(taps[i] * 32767.0) as i32;
            j -= ataps as isize;
            if j < 0 {
                j += (ntaps + 1) as isize;
            }
        }

        let lwin = ataps + delay;
        let win = vec![0i32; ataps * 2 + delay];

        IntFir {
            interpolation,
            decimation,
            ataps,
            itaps,
            win,
            lwin,
            owin: 0,
            d: 0,
        }
    }

    /// Pushes one input sample and writes up to `interpolation` output
    /// samples into `out` (which must have room for at least that many),
    /// returning the count actually produced this call.
    pub fn process_sample(&mut self, sample: i32, out: &mut [i32]) -> usize {
        self.win[self.owin] = sample;
        if self.owin < self.ataps {
            self.win[self.owin + self.lwin] = sample;
        }
        self.owin += 1;
        if self.owin == self.lwin {
            self.owin = 0;
        }

        let mut produced = 0;
        while self.d < self.interpolation {
            let win = &self.win[self.owin..self.owin + self.ataps];
            let bank = self.d * self.ataps;
            let taps = &self.itaps[bank..bank + self.ataps];

            let mut acc: i64 = 0;
            for (w, t) in win.iter().zip(taps.iter()) {
                acc += *w as i64 * *t as i64;
            }
            acc >>= 15;

            out[produced] = saturate_i32(acc);
            produced += 1;
            self.d += self.decimation;
        }
        self.d -= self.interpolation;

        produced
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unity_tap_passes_through() {
        // A single tap of exactly 1.0 (quantized to 32767/32767) is a
        // straight-through (mono, no resampling) path.
        let mut fir = IntFir::new(&[1.0], 1, 1, 0);
        let mut out = [0i32; 1];
        let n = fir.process_sample(12345, &mut out);
        assert_eq!(n, 1);
        assert_eq!(out[0], 12345);
    }

    #[test]
    fn interpolation_produces_multiple_outputs_per_sample() {
        let taps = vec![1.0 / 4.0; 4];
        let mut fir = IntFir::new(&taps, 4, 1, 0);
        let mut out = [0i32; 4];
        let n = fir.process_sample(1000, &mut out);
        assert_eq!(n, 4);
    }

    #[test]
    fn preemphasis_tables_have_center_tap_heaviest() {
        for table in [&PREEMPH_FLAT_TAPS, &PREEMPH_50US_TAPS, &PREEMPH_75US_TAPS, &PREEMPH_J17_TAPS] {
            let center = table[PREEMPH_TAPS / 2];
            assert!(table.iter().all(|&t| t.abs() <= center.abs()));
        }
    }
}
