//! Top-level mux loop (spec §4.9): pump fixed-duration blocks through every
//! active channel, sum their contributions, modulate the master FM carrier
//! over the result, and hand the complex baseband to the sink.
//!
//! Mirrors the original's block pump: allocate `sum`/`out` once at startup,
//! then loop zero-sum / per-channel-modulate / master-FM / sink-write until
//! either every channel has gone inactive or the shutdown flag is raised.
//! Per spec §5, the flag is only checked between blocks — a block already
//! in flight always finishes and is written before the loop exits.

use satr_core::ShutdownFlag;
use satr_sink::RadioSink;

use crate::channel::Channel;
use crate::error::Result;
use crate::fm::FmModulator;

/// Master FM carrier parameters (spec §4.9 / §6 `[output]`).
pub struct MasterConfig {
    pub sample_rate: u32,
    pub deviation: f64,
    pub level: f64,
}

pub struct Engine {
    channels: Vec<Channel>,
    sink: Box<dyn RadioSink>,
    master: FmModulator,
    block_len: usize,
    shutdown: ShutdownFlag,
}

impl Engine {
    /// `master.level` is combined with the sink's own [`RadioSink::scale`]
    /// before being baked into the master modulator's Q15 gain, matching
    /// §6's "`scale()` ... linear gain applied externally to the master
    /// level."
    pub fn new(channels: Vec<Channel>, sink: Box<dyn RadioSink>, master: MasterConfig, shutdown: ShutdownFlag) -> Self {
        let block_len = (master.sample_rate / 10) as usize;
        let gain = (master.level * sink.scale()).clamp(0.0, 1.0);
        let level = (gain * i16::MAX as f64).round() as i16;
        let modulator = FmModulator::new(master.sample_rate as f64, 0.0, master.deviation, level);

        Engine {
            channels,
            sink,
            master: modulator,
            block_len,
            shutdown,
        }
    }

    /// Number of channels still active. Exposed for the CLI's startup log.
    pub fn active_channels(&self) -> usize {
        self.channels.iter().filter(|c| c.is_active()).count()
    }

    /// Runs the mux loop to completion, returning the number of blocks
    /// written before every channel went inactive or shutdown was requested.
    pub fn run(&mut self) -> Result<u64> {
        let mut sum = vec![0i32; self.block_len];
        let mut out = vec![0i16; self.block_len * 2];
        let mut blocks = 0u64;

        loop {
            if self.shutdown.requested() {
                log::info!("shutdown requested, exiting after {blocks} blocks");
                break;
            }

            sum.fill(0);
            let mut active = 0usize;
            for channel in &mut self.channels {
                if channel.modulate(&mut sum) {
                    active += 1;
                }
            }
            if active == 0 {
                log::info!("no channels remain active, shutting down after {blocks} blocks");
                break;
            }

            for (i, &s) in sum.iter().enumerate() {
                // Per-channel summation uses wrapping addition (see
                // `Channel::modulate`); the narrowing cast here is the
                // "master FM stage's narrowing cast" that completes that
                // policy rather than saturating it away.
                let sample = s as i16;
                let iq = self.master.process_complex(sample);
                out[i * 2] = iq.i;
                out[i * 2 + 1] = iq.q;
            }

            self.sink.write(&out)?;
            blocks += 1;
        }

        self.sink.close()?;
        Ok(blocks)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use satr_source::AudioSource;

    struct FiniteSilence {
        remaining_frames: usize,
    }

    impl AudioSource for FiniteSilence {
        fn channels(&self) -> u8 {
            1
        }
        fn sample_rate(&self) -> u32 {
            32_000
        }
        fn read(&mut self, out: &mut [i16]) -> usize {
            let n = out.len().min(self.remaining_frames);
            out[..n].fill(0);
            self.remaining_frames -= n;
            n
        }
        fn eof(&self) -> bool {
            self.remaining_frames == 0
        }
    }

    fn fm_channel(master_rate: u32, frames: usize) -> Channel {
        let cfg: crate::config::ChannelConfig = toml::from_str(
            r#"
            mode = "fm"
            type = "tone"
            frequency = 300000.0
            deviation = 75000.0
            level = 1.0
        "#,
        )
        .unwrap();
        let source = Box::new(FiniteSilence { remaining_frames: frames });
        Channel::new(0, &cfg, master_rate, source, None).unwrap()
    }

    struct CountingSink {
        blocks_written: usize,
    }

    impl RadioSink for CountingSink {
        fn write(&mut self, iq: &[i16]) -> satr_sink::Result<()> {
            assert_eq!(iq.len() % 2, 0);
            self.blocks_written += 1;
            Ok(())
        }
    }

    #[test]
    fn loop_terminates_once_every_channel_exhausts_its_source() {
        let master_rate = 204_800;
        // A handful of block-lengths' worth of frames so the loop runs
        // several iterations before the channel goes inactive.
        let channel = fm_channel(master_rate, 32_000 * 2);
        let sink = Box::new(CountingSink { blocks_written: 0 });

        let mut engine = Engine::new(
            vec![channel],
            sink,
            MasterConfig {
                sample_rate: master_rate,
                deviation: 16_000_000.0,
                level: 1.0,
            },
            ShutdownFlag::new(),
        );

        let blocks = engine.run().unwrap();
        assert!(blocks > 0);
        assert_eq!(engine.active_channels(), 0);
    }

    #[test]
    fn shutdown_flag_stops_the_loop_between_blocks() {
        let master_rate = 204_800;
        let channel = fm_channel(master_rate, usize::MAX / 2);
        let sink = Box::new(CountingSink { blocks_written: 0 });
        let shutdown = ShutdownFlag::new();
        shutdown.request();

        let mut engine = Engine::new(
            vec![channel],
            sink,
            MasterConfig {
                sample_rate: master_rate,
                deviation: 16_000_000.0,
                level: 1.0,
            },
            shutdown,
        );

        let blocks = engine.run().unwrap();
        assert_eq!(blocks, 0);
    }

    #[test]
    fn no_channels_terminates_immediately() {
        let master_rate = 204_800;
        let sink = Box::new(CountingSink { blocks_written: 0 });
        let mut engine = Engine::new(
            Vec::new(),
            sink,
            MasterConfig {
                sample_rate: master_rate,
                deviation: 16_000_000.0,
                level: 1.0,
            },
            ShutdownFlag::new(),
        );
        let blocks = engine.run().unwrap();
        assert_eq!(blocks, 0);
    }
}
