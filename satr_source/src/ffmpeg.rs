//! `type = "ffmpeg"` audio source: an external media decoder, named in §6's
//! configuration contract and spec §1 as an out-of-scope collaborator (only
//! its interface is named, not a bundled decoder).
//!
//! This resolves that interface the same way [`crate::raw_audio`] resolves
//! `exec = true`: spawn a subprocess and read its standard output as raw
//! interleaved PCM. The only difference is that the command line is built
//! here rather than supplied by the user, so any input `ffmpeg` itself can
//! demux and decode (MP3, AAC, a network stream, ...) becomes a valid
//! channel input without the configuration needing to spell out `ffmpeg`'s
//! flags by hand.

use crate::error::Result;
use crate::raw_audio::RawAudioSource;

/// Spawns `ffmpeg` to decode `input` into raw interleaved 16-bit PCM at
/// `channels`/`sample_rate`, and reads its standard output the same way
/// [`RawAudioSource::spawn`] reads any other subprocess source.
pub fn open(input: &str, channels: u8, sample_rate: u32) -> Result<RawAudioSource> {
    let command = format!(
        "ffmpeg -v error -i {} -f s16le -acodec pcm_s16le -ar {sample_rate} -ac {channels} -",
        shell_quote(input),
    );
    RawAudioSource::spawn(&command, channels, sample_rate)
}

/// Single-quotes `s` for `/bin/sh -c`, escaping any embedded single quote.
fn shell_quote(s: &str) -> String {
    format!("'{}'", s.replace('\'', "'\\''"))
}
