//! Fixed-point sine generator for bench/test signals.
//!
//! `src_tone.h` is named in the configuration contract (`type = "tone"`)
//! but wasn't part of the retrieved original sources, so this is a fresh
//! implementation rather than a port. It follows the same phase-accumulator
//! + look-up-table technique as [`satr_dsp::fm::FmModulator`] rather than a
//! running floating-point oscillator, so a tone source composes cleanly
//! with the rest of the fixed-point signal chain: a 32-bit phase
//! accumulator advances by a fixed delta per sample and the top bits index
//! a quantized sine table.

use satr_core::Real;
use satr_core::fixed::round_shift;
use satr_core::math::{round, sin};

use crate::AudioSource;

const LUT_BITS: u32 = 12;
const LUT_SIZE: usize = 1 << LUT_BITS;

pub struct ToneSource {
    channels: u8,
    sample_rate: u32,
    lut: Vec<i16>,
    phase: u32,
    delta: u32,
    level: i16,
}

impl ToneSource {
    /// `tone_hz` is the generated frequency, `tone_level` a linear gain in
    /// `[0, 1]` applied against full-scale `i16`.
    pub fn new(sample_rate: u32, channels: u8, tone_hz: f64, tone_level: f64) -> Self {
        assert!(channels == 1 || channels == 2);

        let lut = (0..LUT_SIZE)
            .map(|i| {
                let angle = f64::TAU * i as f64 / LUT_SIZE as f64;
                round(sin(angle) * i16::MAX as f64) as i16
            })
            .collect();

        let delta = round((tone_hz / sample_rate as f64) * (1u64 << 32) as f64) as u32;
        let level = round(tone_level * i16::MAX as f64) as i16;

        ToneSource {
            channels,
            sample_rate,
            lut,
            phase: 0,
            delta,
            level,
        }
    }
}

impl AudioSource for ToneSource {
    fn channels(&self) -> u8 {
        self.channels
    }

    fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    fn read(&mut self, out: &mut [i16]) -> usize {
        let channels = self.channels as usize;
        let frames = out.len() / channels;

        for frame in 0..frames {
            let idx = (self.phase >> (32 - LUT_BITS)) as usize;
            let sample = round_shift(self.lut[idx] as i64 * self.level as i64, 15) as i16;
            for c in 0..channels {
                out[frame * channels + c] = sample;
            }
            self.phase = self.phase.wrapping_add(self.delta);
        }

        frames * channels
    }

    /// A tone generator never ends; `repeat` is moot for this source type.
    fn eof(&self) -> bool {
        false
    }
}
