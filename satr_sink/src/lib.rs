//! Radio sink contract for `satradio`: a small capability trait plus the
//! one sink implementation every build carries (a headerless raw IQ file),
//! with HackRF and SoapySDR represented as feature-gated stubs.

pub mod error;
pub mod file;
#[cfg(feature = "hackrf")]
pub mod hackrf;
#[cfg(feature = "soapysdr")]
pub mod soapysdr;

pub use error::{Result, SinkError};
pub use file::{FileSink, SampleFormat};

/// Destination for modulated complex baseband, one block at a time.
///
/// `close` is a provided method rather than a consuming one: the mux loop
/// holds sinks behind `Box<dyn RadioSink>`, so ownership transfer happens
/// through `Drop` (each concrete sink releases its transport resource in its
/// own `Drop` impl); `close` exists only where a sink needs to flush or
/// report a final error *before* shutdown rather than silently on drop.
pub trait RadioSink: Send {
    /// Writes one block of interleaved complex samples (`iq.len()` must be
    /// even: `[i0, q0, i1, q1, ...]`).
    fn write(&mut self, iq: &[i16]) -> Result<()>;

    /// Flushes and releases the sink's transport resource. Idempotent:
    /// the mux loop calls this once at shutdown, but a sink must tolerate
    /// being dropped afterwards without double-releasing anything.
    fn close(&mut self) -> Result<()> {
        Ok(())
    }

    /// Linear gain applied to the master level before reaching this sink.
    fn scale(&self) -> f64 {
        1.0
    }

    /// Advisory: whether this sink demands wall-clock pacing (a live RF
    /// output) as opposed to writing as fast as the pipeline can produce
    /// blocks (a file).
    fn live(&self) -> bool {
        false
    }
}
