//! Headerless raw interleaved IQ file sink, matching `rf_file.h`: whatever
//! is written lands on disk verbatim, in the configured sample format, with
//! no framing of any kind.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::RadioSink;
use crate::error::{Result, SinkError};

/// On-disk sample representation. Each complex sample's I and Q components
/// are converted independently and written in the listed order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SampleFormat {
    Uint8,
    Int8,
    Uint16,
    Int16,
    Int32,
    Float,
}

impl SampleFormat {
    fn bytes_per_sample(self) -> usize {
        match self {
            SampleFormat::Uint8 | SampleFormat::Int8 => 1,
            SampleFormat::Uint16 | SampleFormat::Int16 => 2,
            SampleFormat::Int32 | SampleFormat::Float => 4,
        }
    }

    fn encode(self, sample: i16, out: &mut Vec<u8>) {
        match self {
            SampleFormat::Uint8 => out.push(((sample as i32 + 32768) >> 8) as u8),
            SampleFormat::Int8 => out.push((sample >> 8) as i8 as u8),
            SampleFormat::Uint16 => out.extend_from_slice(&((sample as i32 + 32768) as u16).to_le_bytes()),
            SampleFormat::Int16 => out.extend_from_slice(&sample.to_le_bytes()),
            SampleFormat::Int32 => out.extend_from_slice(&((sample as i32) << 16).to_le_bytes()),
            SampleFormat::Float => out.extend_from_slice(&(sample as f32 / 32768.0).to_le_bytes()),
        }
    }
}

pub struct FileSink {
    writer: BufWriter<File>,
    format: SampleFormat,
    scale: f64,
    closed: bool,
}

impl FileSink {
    pub fn create(path: impl AsRef<Path>, format: SampleFormat, scale: f64) -> Result<Self> {
        let path = path.as_ref();
        let file = File::create(path).map_err(|e| SinkError::Open(path.display().to_string(), e))?;
        Ok(FileSink {
            writer: BufWriter::new(file),
            format,
            scale,
            closed: false,
        })
    }
}

impl RadioSink for FileSink {
    fn write(&mut self, iq: &[i16]) -> Result<()> {
        debug_assert_eq!(iq.len() % 2, 0);

        let mut buf = Vec::with_capacity(iq.len() * self.format.bytes_per_sample());
        for &sample in iq {
            self.format.encode(sample, &mut buf);
        }

        self.writer.write_all(&buf).map_err(SinkError::Write)
    }

    fn close(&mut self) -> Result<()> {
        if self.closed {
            return Ok(());
        }
        self.closed = true;
        self.writer.flush().map_err(SinkError::Write)
    }

    fn scale(&self) -> f64 {
        self.scale
    }

    fn live(&self) -> bool {
        false
    }
}

impl Drop for FileSink {
    fn drop(&mut self) {
        if !self.closed {
            let _ = self.writer.flush();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn int16_round_trips_exactly() {
        let tmp = tempfile::NamedTempFile::new().unwrap();
        let mut sink = FileSink::create(tmp.path(), SampleFormat::Int16, 1.0).unwrap();
        sink.write(&[1000, -2000, 3000, -4000]).unwrap();
        sink.close().unwrap();

        let bytes = std::fs::read(tmp.path()).unwrap();
        assert_eq!(bytes.len(), 8);
        assert_eq!(i16::from_le_bytes([bytes[0], bytes[1]]), 1000);
        assert_eq!(i16::from_le_bytes([bytes[2], bytes[3]]), -2000);
    }

    #[test]
    fn uint8_centers_on_128() {
        let tmp = tempfile::NamedTempFile::new().unwrap();
        let mut sink = FileSink::create(tmp.path(), SampleFormat::Uint8, 1.0).unwrap();
        sink.write(&[0, 0]).unwrap();
        sink.close().unwrap();

        let bytes = std::fs::read(tmp.path()).unwrap();
        assert_eq!(bytes, [128, 128]);
    }

    #[test]
    fn close_is_idempotent() {
        let tmp = tempfile::NamedTempFile::new().unwrap();
        let mut sink = FileSink::create(tmp.path(), SampleFormat::Int16, 1.0).unwrap();
        sink.write(&[1, 2]).unwrap();
        sink.close().unwrap();
        sink.close().unwrap();
    }

    #[test]
    fn the_file_carries_no_header() {
        let tmp = tempfile::NamedTempFile::new().unwrap();
        let mut sink = FileSink::create(tmp.path(), SampleFormat::Int16, 1.0).unwrap();
        sink.write(&[42, -42]).unwrap();
        sink.close().unwrap();

        let bytes = std::fs::read(tmp.path()).unwrap();
        assert_eq!(bytes.len(), 4);
    }
}
