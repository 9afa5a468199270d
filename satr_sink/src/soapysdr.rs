//! SoapySDR sink stub, mirrored from [`crate::hackrf`]: `rf_soapysdr.h` is
//! named in the original's dispatch table but gated behind `HAVE_SOAPYSDR`
//! and wasn't part of the retrieved sources; driving a real SoapySDR device
//! is out of this port's scope.

use crate::RadioSink;
use crate::error::{Result, SinkError};

pub struct SoapySdrSink;

impl SoapySdrSink {
    pub fn open(_frequency: f64, _sample_rate: f64, _gain: f64, _antenna: Option<&str>) -> Result<Self> {
        Err(SinkError::Unsupported("soapysdr"))
    }
}

impl RadioSink for SoapySdrSink {
    fn write(&mut self, _iq: &[i16]) -> Result<()> {
        Err(SinkError::Unsupported("soapysdr"))
    }

    fn live(&self) -> bool {
        true
    }
}
