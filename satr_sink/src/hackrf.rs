//! HackRF sink stub.
//!
//! `rf_hackrf.h` is referenced from the original's `rf.h` dispatch table but
//! gated behind `HAVE_LIBHACKRF` at compile time and wasn't part of the
//! retrieved sources. Driving real HackRF hardware is out of this port's
//! scope (only the interface is named), so this module exists purely so
//! `type = "hackrf"` resolves to a typed error instead of an unknown
//! configuration value, whether or not the `hackrf` feature is enabled.

use crate::RadioSink;
use crate::error::{Result, SinkError};

pub struct HackrfSink;

impl HackrfSink {
    pub fn open(_frequency: f64, _sample_rate: f64, _gain: f64, _antenna: Option<&str>, _amp: bool) -> Result<Self> {
        Err(SinkError::Unsupported("hackrf"))
    }
}

impl RadioSink for HackrfSink {
    fn write(&mut self, _iq: &[i16]) -> Result<()> {
        Err(SinkError::Unsupported("hackrf"))
    }

    fn live(&self) -> bool {
        true
    }
}
