//! Audio source contract for `satradio`: a small capability trait plus the
//! three concrete sources the channel engine drives — raw PCM (file or
//! subprocess), a fixed-point tone generator, and an `ffmpeg`-backed
//! external media decoder.

pub mod error;
pub mod ffmpeg;
pub mod raw_audio;
pub mod tone;

pub use error::{Result, SourceError};
pub use raw_audio::RawAudioSource;
pub use tone::ToneSource;

/// A source of interleaved 16-bit PCM audio at a fixed channel count and
/// sample rate.
///
/// Mirrors the original's function-pointer `read`/`eof`/`close` triple as a
/// capability trait rather than raw pointers: ownership of whatever resource
/// backs a source (a `File`, a child process) lives entirely with the one
/// `AudioSource` handle and is released on `Drop`, so there is no separate
/// `close` — consuming or dropping the value is the move-consuming close the
/// original's shared-pointer model required explicitly.
pub trait AudioSource: Send {
    /// Number of interleaved channels this source produces (1 or 2).
    fn channels(&self) -> u8;

    /// The sample rate this source was opened at.
    fn sample_rate(&self) -> u32;

    /// Fills `out` with up to `out.len()` interleaved samples, returning the
    /// count actually written. A short read (fewer samples than requested,
    /// including zero) signals the source is at or near [`AudioSource::eof`].
    fn read(&mut self, out: &mut [i16]) -> usize;

    /// Whether the source has been exhausted. Checked by the channel engine
    /// after a short read to decide between reopening (repeat) and
    /// deactivating the channel.
    fn eof(&self) -> bool;
}
