//! Builds the boxed [`AudioSource`] (and, for `repeat`, its reopen factory)
//! each configured channel needs, from its `type`/`input`/`exec` keys.

use satr_dsp::channel::SourceFactory;
use satr_dsp::config::{ChannelConfig, ChannelMode, SourceType};
use satr_source::{AudioSource, Result, RawAudioSource, ToneSource};

fn open_one(cfg: &ChannelConfig, channels: u8, sample_rate: u32) -> Result<Box<dyn AudioSource>> {
    match cfg.source_type {
        SourceType::Tone => Ok(Box::new(ToneSource::new(sample_rate, channels, cfg.tone_hz, cfg.tone_level))),
        SourceType::Rawaudio => {
            let input = cfg.input.as_deref().unwrap_or_default();
            let source = if cfg.exec {
                RawAudioSource::spawn(input, channels, sample_rate)?
            } else {
                RawAudioSource::open_file(input, channels, sample_rate)?
            };
            Ok(Box::new(source))
        }
        SourceType::Ffmpeg => {
            let input = cfg.input.as_deref().unwrap_or_default();
            Ok(Box::new(satr_source::ffmpeg::open(input, channels, sample_rate)?))
        }
    }
}

/// Number of interleaved channels this channel's audio source should be
/// opened at: stereo for a configured-stereo FM/dual-FM channel (the
/// downmix/split happens downstream in `satr_dsp::channel`), or exactly
/// `stereo`'s value for ADR (it drives the MP2 encoder's channel count
/// directly).
fn source_channels(cfg: &ChannelConfig) -> u8 {
    if cfg.stereo { 2 } else { 1 }
}

/// Reopens a channel's source from its original configuration, used when
/// `repeat` is set and the source hits EOF.
struct ConfigSourceFactory {
    cfg: ChannelConfig,
    sample_rate: u32,
}

impl SourceFactory for ConfigSourceFactory {
    fn open(&self) -> Result<Box<dyn AudioSource>> {
        open_one(&self.cfg, source_channels(&self.cfg), self.sample_rate)
    }
}

/// Opens the audio source for one configured channel, plus (when `repeat`
/// is set) a boxed factory the channel engine can use to reopen it on EOF.
pub fn open(cfg: &ChannelConfig, mode: ChannelMode) -> Result<(Box<dyn AudioSource>, Option<Box<dyn SourceFactory>>)> {
    let sample_rate = satr_dsp::channel::source_rate(mode);
    let channels = source_channels(cfg);
    let source = open_one(cfg, channels, sample_rate)?;

    let reopen = cfg.repeat.then(|| {
        Box::new(ConfigSourceFactory {
            cfg: cfg.clone(),
            sample_rate,
        }) as Box<dyn SourceFactory>
    });

    Ok((source, reopen))
}
