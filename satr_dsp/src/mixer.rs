//! Complex mixer: a free-running oscillator complex-multiplied against an
//! incoming IQ stream, used by the QPSK path to place its shaped baseband at
//! an offset frequency within the composite.

use satr_core::Real;
use satr_core::fixed::round_shift;
use satr_core::math::{cos, round, sin};

use crate::fm::Iq;
use crate::phasor::{PHASOR_SCALE, Phasor};

pub struct Mixer {
    delta: (i32, i32),
    phasor: Phasor,
}

impl Mixer {
    /// `f` is the oscillator frequency in Hz, `fs` the sample rate it runs at.
    pub fn new(f: f64, fs: f64) -> Self {
        let angle = f64::TAU * f / fs;
        let delta = (round(cos(angle) * PHASOR_SCALE as f64) as i32, round(sin(angle) * PHASOR_SCALE as f64) as i32);

        Mixer {
            delta,
            phasor: Phasor::new(),
        }
    }

    /// Advances the oscillator by one sample and complex-multiplies `input`
    /// against it, returning the mixed complex sample.
    #[inline]
    pub fn mix_complex(&mut self, input: Iq) -> Iq {
        self.phasor.rotate(self.delta.0, self.delta.1);
        self.multiply(input)
    }

    /// Same as [`Mixer::mix_complex`] but returns only the real part, i.e. a
    /// down-mix to a real subcarrier.
    #[inline]
    pub fn mix_real(&mut self, input: Iq) -> i16 {
        self.mix_complex(input).i
    }

    #[inline]
    fn multiply(&self, input: Iq) -> Iq {
        let i = self.phasor.i as i64;
        let q = self.phasor.q as i64;
        let xi = input.i as i64;
        let xq = input.q as i64;

        Iq {
            i: round_shift(i * xi - q * xq, 31).clamp(i16::MIN as i64, i16::MAX as i64) as i16,
            q: round_shift(i * xq + q * xi, 31).clamp(i16::MIN as i64, i16::MAX as i64) as i16,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_frequency_mixer_is_near_identity_in_magnitude() {
        let mut mixer = Mixer::new(0.0, 100_000.0);
        let input = Iq { i: 1000, q: -500 };
        let out = mixer.mix_complex(input);
        let in_mag = (input.i as f64).powi(2) + (input.q as f64).powi(2);
        let out_mag = (out.i as f64).powi(2) + (out.q as f64).powi(2);
        assert!((out_mag - in_mag).abs() / in_mag < 0.01);
    }

    #[test]
    fn real_downmix_matches_complex_real_part() {
        let mut a = Mixer::new(1000.0, 48_000.0);
        let mut b = Mixer::new(1000.0, 48_000.0);
        let input = Iq { i: 2000, q: 1500 };
        assert_eq!(a.mix_real(input), b.mix_complex(input).i);
    }
}
