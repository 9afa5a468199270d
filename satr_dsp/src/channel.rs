//! Per-channel state machine: mono-FM, dual-FM, and ADR variants, each
//! reading one frame of audio at a time, running it through its own
//! pre-emphasis/limiter or ADR framer, and upsampling to the master sample
//! rate before contributing real samples into the caller's sum buffer.
//!
//! Mirrors §4.8: a channel refills its scratch only once it runs dry, never
//! ahead of need, and mono/dual-FM upsample by crude sample-and-hold while
//! ADR drives its own polyphase interpolation (via [`crate::qpsk`]) instead.

use std::collections::VecDeque;

use satr_core::fixed::round_shift;
use satr_source::AudioSource;

use crate::adr::AdrFramer;
use crate::adr::carousel::MpegMode;
use crate::config::{AdrMode, ChannelConfig, ChannelMode};
use crate::error::Result;
use crate::fm::{FmModulator, Iq};
use crate::limiter::Limiter;
use crate::mixer::Mixer;
use crate::qpsk::QpskModulator;

/// PCM samples read per frame refill, matching the MP2 frame size the ADR
/// path is built around (1152 samples at 48 kHz = 24ms); FM channels use
/// the same frame size at their own 32 kHz intermediate rate.
const FRAME_SAMPLES: usize = 1152;
const FM_CHANNEL_RATE: u32 = 32_000;
const ADR_CHANNEL_RATE: u32 = 48_000;
/// Symbols per second the ADR transport frame is clocked out at: 3072
/// symbols (768 bytes, 2 bits/symbol) every 24ms (one MP2 frame period).
const ADR_SYMBOL_RATE: u32 = 128_000;

/// The intermediate sample rate a channel's audio source must be opened at
/// for the given mode (spec §3: "32 kHz for FM paths, 48 kHz for ADR"). The
/// CLI uses this to construct the right kind of source before handing it to
/// [`Channel::new`].
pub fn source_rate(mode: ChannelMode) -> u32 {
    match mode {
        ChannelMode::Fm | ChannelMode::DualFm => FM_CHANNEL_RATE,
        ChannelMode::Adr => ADR_CHANNEL_RATE,
    }
}

fn gcd(mut a: u32, mut b: u32) -> u32 {
    while b != 0 {
        (a, b) = (b, a % b);
    }
    a.max(1)
}

/// Reduces `out_rate / in_rate` to a coprime (interpolation, decimation)
/// pair, the same convention [`crate::fir::IntFir`] expects.
fn reduced_ratio(in_rate: u32, out_rate: u32) -> (usize, usize) {
    let g = gcd(in_rate, out_rate);
    ((out_rate / g) as usize, (in_rate / g) as usize)
}

enum Variant {
    Fm {
        modulator: FmModulator,
        limiter: Limiter,
    },
    DualFm {
        modulator1: FmModulator,
        modulator2: FmModulator,
        limiter1: Limiter,
        limiter2: Limiter,
    },
    Adr {
        framer: AdrFramer,
        qpsk: QpskModulator,
        mixer: Mixer,
        interpolation: usize,
        stereo: bool,
        level: i16,
    },
}

/// Reopens a channel's audio source from scratch, used when `repeat` is set
/// and the source hits EOF. Constructed by whoever wires up the channel
/// (the CLI, which knows the configured path/command), kept behind a
/// trait object so `channel.rs` doesn't need to know source-construction
/// details.
pub trait SourceFactory: Send {
    fn open(&self) -> satr_source::Result<Box<dyn AudioSource>>;
}

pub struct Channel {
    source: Box<dyn AudioSource>,
    reopen: Option<Box<dyn SourceFactory>>,
    repeat: bool,
    active: bool,
    channel_rate: u32,
    master_rate: u32,
    interp: u32,
    raw: Vec<i16>,
    out_queue: VecDeque<i16>,
    variant: Variant,
    index: usize,
}

impl Channel {
    pub fn new(
        index: usize,
        cfg: &ChannelConfig,
        master_rate: u32,
        source: Box<dyn AudioSource>,
        reopen: Option<Box<dyn SourceFactory>>,
    ) -> Result<Self> {
        let level = (cfg.level.clamp(0.0, 1.0) * i16::MAX as f64).round() as i16;

        let (channel_rate, variant) = match cfg.mode {
            ChannelMode::Fm => {
                let modulator = FmModulator::new(master_rate as f64, cfg.frequency, cfg.deviation, i16::MAX);
                let limiter = Limiter::new(level, 21, Some(cfg.preemphasis.taps()), None);
                (FM_CHANNEL_RATE, Variant::Fm { modulator, limiter })
            }
            ChannelMode::DualFm => {
                let modulator1 = FmModulator::new(master_rate as f64, cfg.frequency1, cfg.deviation, i16::MAX);
                let modulator2 = FmModulator::new(master_rate as f64, cfg.frequency2, cfg.deviation, i16::MAX);
                let limiter1 = Limiter::new(level, 21, Some(cfg.preemphasis.taps()), None);
                let limiter2 = Limiter::new(level, 21, Some(cfg.preemphasis.taps()), None);
                (
                    FM_CHANNEL_RATE,
                    Variant::DualFm {
                        modulator1,
                        modulator2,
                        limiter1,
                        limiter2,
                    },
                )
            }
            ChannelMode::Adr => {
                let mode = match cfg.adr_mode {
                    AdrMode::Mono => MpegMode::Mono,
                    AdrMode::Dual => MpegMode::DualChannel,
                    AdrMode::Joint => MpegMode::JointStereo,
                    AdrMode::Stereo => MpegMode::Stereo,
                };
                let framer = AdrFramer::new(&cfg.name, mode, cfg.stereo, cfg.scfcrc)?;
                let (interpolation, decimation) = reduced_ratio(ADR_SYMBOL_RATE, master_rate);
                let qpsk = QpskModulator::new(interpolation, decimation);
                let mixer = Mixer::new(cfg.frequency, master_rate as f64);
                (
                    ADR_CHANNEL_RATE,
                    Variant::Adr {
                        framer,
                        qpsk,
                        mixer,
                        interpolation,
                        stereo: cfg.stereo,
                        level,
                    },
                )
            }
        };

        Ok(Channel {
            source,
            reopen,
            repeat: cfg.repeat,
            active: true,
            channel_rate,
            master_rate,
            interp: 0,
            raw: Vec::new(),
            out_queue: VecDeque::new(),
            variant,
            index,
        })
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Advances this channel by `sum.len()` master-rate samples, adding its
    /// contribution into `sum` by wrapping integer addition (clipping is
    /// deferred to the master FM stage's narrowing cast, matching the
    /// original's undocumented-but-observed int16 wrap behavior — see
    /// DESIGN.md). Returns whether the channel is still active afterward.
    pub fn modulate(&mut self, sum: &mut [i32]) -> bool {
        if !self.active {
            return false;
        }

        for slot in sum.iter_mut() {
            if self.out_queue.is_empty() && !self.refill() {
                self.active = false;
                return false;
            }
            if let Some(sample) = self.out_queue.pop_front() {
                *slot = slot.wrapping_add(sample as i32);
            }
        }

        true
    }

    /// Refills `out_queue` with at least one sample, reading and processing
    /// frames until it either has output or determines the channel is
    /// genuinely done (this loops more than once only during the ADR
    /// ScF-CRC one-frame warm-up, where a consumed frame yields no
    /// transport output yet).
    fn refill(&mut self) -> bool {
        loop {
            if !self.read_and_process_frame() {
                return false;
            }
            if !self.out_queue.is_empty() {
                return true;
            }
        }
    }

    fn read_and_process_frame(&mut self) -> bool {
        let source_channels = self.source.channels() as usize;
        let want = match &self.variant {
            Variant::Adr { stereo, .. } => FRAME_SAMPLES * if *stereo { 2 } else { 1 },
            _ => FRAME_SAMPLES * source_channels,
        };

        if self.raw.len() != want {
            self.raw = vec![0i16; want];
        }

        let n = self.source.read(&mut self.raw);
        if n < want {
            for s in &mut self.raw[n..] {
                *s = 0;
            }
            if self.source.eof() && !self.reopen_if_repeating() {
                if n == 0 {
                    return false;
                }
                // Process the final partial (zero-padded) frame, then stop.
                self.process_frame(source_channels);
                return false;
            }
        }

        self.process_frame(source_channels);
        true
    }

    fn reopen_if_repeating(&mut self) -> bool {
        if !self.repeat {
            return false;
        }
        let Some(factory) = &self.reopen else {
            log::warn!("channel {}: repeat requested but no source factory configured", self.index + 1);
            return false;
        };
        match factory.open() {
            Ok(source) => {
                log::info!("channel {}: source reached EOF, reopening (repeat)", self.index + 1);
                self.source = source;
                true
            }
            Err(e) => {
                log::warn!("channel {}: failed to reopen source: {e}", self.index + 1);
                false
            }
        }
    }

    fn process_frame(&mut self, source_channels: usize) {
        match &mut self.variant {
            Variant::Fm { modulator, limiter } => {
                let mono = downmix_mono(&self.raw, source_channels);
                let mut limited = vec![0i16; mono.len()];
                limiter.process(&mut limited, &mono, None, mono.len());
                Self::sample_hold_fm(modulator, &limited, self.channel_rate, self.master_rate, &mut self.interp, &mut self.out_queue);
            }
            Variant::DualFm {
                modulator1,
                modulator2,
                limiter1,
                limiter2,
            } => {
                let (left, right) = split_stereo(&self.raw, source_channels);
                let mut l = vec![0i16; left.len()];
                let mut r = vec![0i16; right.len()];
                limiter1.process(&mut l, &left, None, left.len());
                limiter2.process(&mut r, &right, None, right.len());

                let mut interp = self.interp;
                for i in 0..l.len() {
                    while interp < self.master_rate {
                        let a = modulator1.process_real(l[i]);
                        let b = modulator2.process_real(r[i]);
                        self.out_queue.push_back(a.saturating_add(b));
                        interp += self.channel_rate;
                    }
                    interp -= self.master_rate;
                }
                self.interp = interp;
            }
            Variant::Adr {
                framer,
                qpsk,
                mixer,
                interpolation,
                stereo: _,
                level,
            } => {
                let Some(frame) = framer.process(&self.raw) else {
                    return;
                };

                let bits: Vec<bool> = frame.iter().flat_map(|&byte| (0..8).rev().map(move |shift| (byte >> shift) & 1 == 1)).collect();

                let mut out_i = vec![0i16; *interpolation];
                let mut out_q = vec![0i16; *interpolation];
                for pair in bits.chunks_exact(2) {
                    let n = qpsk.process_symbol(pair[0], pair[1], &mut out_i, &mut out_q);
                    for k in 0..n {
                        let mixed = mixer.mix_real(Iq { i: out_i[k], q: out_q[k] });
                        let scaled = round_shift(mixed as i64 * *level as i64, 15) as i16;
                        self.out_queue.push_back(scaled);
                    }
                }
            }
        }
    }

    fn sample_hold_fm(modulator: &mut FmModulator, samples: &[i16], channel_rate: u32, master_rate: u32, interp: &mut u32, out_queue: &mut VecDeque<i16>) {
        for &sample in samples {
            while *interp < master_rate {
                out_queue.push_back(modulator.process_real(sample));
                *interp += channel_rate;
            }
            *interp -= master_rate;
        }
    }
}

fn downmix_mono(raw: &[i16], channels: usize) -> Vec<i16> {
    if channels <= 1 {
        return raw.to_vec();
    }
    raw.chunks_exact(channels).map(|frame| ((frame[0] as i32 + frame[1] as i32) / 2) as i16).collect()
}

fn split_stereo(raw: &[i16], channels: usize) -> (Vec<i16>, Vec<i16>) {
    if channels <= 1 {
        return (raw.to_vec(), raw.to_vec());
    }
    let left = raw.iter().step_by(channels).copied().collect();
    let right = raw.iter().skip(1).step_by(channels).copied().collect();
    (left, right)
}

#[cfg(test)]
mod tests {
    use super::*;

    struct SilentSource {
        channels: u8,
        sample_rate: u32,
    }

    impl AudioSource for SilentSource {
        fn channels(&self) -> u8 {
            self.channels
        }
        fn sample_rate(&self) -> u32 {
            self.sample_rate
        }
        fn read(&mut self, out: &mut [i16]) -> usize {
            out.fill(0);
            out.len()
        }
        fn eof(&self) -> bool {
            false
        }
    }

    fn fm_config() -> ChannelConfig {
        toml::from_str(
            r#"
            mode = "fm"
            type = "tone"
            frequency = 300000.0
            deviation = 75000.0
            level = 1.0
        "#,
        )
        .unwrap()
    }

    #[test]
    fn a_silent_source_still_produces_output_samples() {
        let cfg = fm_config();
        let source = Box::new(SilentSource { channels: 1, sample_rate: 32_000 });
        let mut channel = Channel::new(0, &cfg, 2_048_000, source, None).unwrap();

        let mut sum = vec![0i32; 2048];
        let active = channel.modulate(&mut sum);
        assert!(active);
    }

    #[test]
    fn non_repeating_channel_deactivates_on_eof() {
        struct OneShot {
            served: bool,
        }
        impl AudioSource for OneShot {
            fn channels(&self) -> u8 {
                1
            }
            fn sample_rate(&self) -> u32 {
                32_000
            }
            fn read(&mut self, out: &mut [i16]) -> usize {
                if self.served {
                    0
                } else {
                    self.served = true;
                    out.fill(0);
                    out.len()
                }
            }
            fn eof(&self) -> bool {
                self.served
            }
        }

        let cfg = fm_config();
        let source = Box::new(OneShot { served: false });
        let mut channel = Channel::new(0, &cfg, 2_048_000, source, None).unwrap();

        let mut sum = vec![0i32; 2_048_000 / 10];
        channel.modulate(&mut sum);
        // Drain far enough to exhaust the one frame served above.
        for _ in 0..20 {
            if !channel.is_active() {
                break;
            }
            let mut block = vec![0i32; 2_048_000 / 10];
            channel.modulate(&mut block);
        }
        assert!(!channel.is_active());
    }

    #[test]
    fn adr_channel_emits_samples_after_the_scfcrc_warm_up() {
        let cfg: ChannelConfig = toml::from_str(
            r#"
            mode = "adr"
            type = "rawaudio"
            stereo = true
            scfcrc = true
            name = "TEST"
        "#,
        )
        .unwrap();

        let source = Box::new(SilentSource { channels: 2, sample_rate: 48_000 });
        let mut channel = Channel::new(0, &cfg, 2_048_000, source, None).unwrap();

        let mut sum = vec![0i32; 2_048_000 / 10];
        // The first call may only consume the ScF-CRC warm-up frame; a
        // second call must yield real output.
        channel.modulate(&mut sum);
        let active = channel.modulate(&mut sum);
        assert!(active);
    }
}
