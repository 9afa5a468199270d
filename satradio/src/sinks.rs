//! Builds the boxed [`RadioSink`] the configured `[output]` table names.

use satr_dsp::config::{DataType, OutputConfig, OutputType};
use satr_sink::{FileSink, RadioSink, Result, SampleFormat};

fn sample_format(data_type: DataType) -> SampleFormat {
    match data_type {
        DataType::Uint8 => SampleFormat::Uint8,
        DataType::Int8 => SampleFormat::Int8,
        DataType::Uint16 => SampleFormat::Uint16,
        DataType::Int16 => SampleFormat::Int16,
        DataType::Int32 => SampleFormat::Int32,
        DataType::Float => SampleFormat::Float,
    }
}

pub fn open(cfg: &OutputConfig) -> Result<Box<dyn RadioSink>> {
    match cfg.output_type {
        OutputType::File => {
            let sink = FileSink::create(&cfg.output, sample_format(cfg.data_type), 1.0)?;
            Ok(Box::new(sink))
        }
        OutputType::Hackrf => {
            #[cfg(feature = "hackrf")]
            {
                let sink = satr_sink::hackrf::HackrfSink::open(cfg.frequency, cfg.sample_rate, cfg.gain, cfg.antenna.as_deref(), cfg.amp)?;
                Ok(Box::new(sink))
            }
            #[cfg(not(feature = "hackrf"))]
            Err(satr_sink::SinkError::Unsupported("hackrf"))
        }
        OutputType::Soapysdr => {
            #[cfg(feature = "soapysdr")]
            {
                let sink = satr_sink::soapysdr::SoapySdrSink::open(cfg.frequency, cfg.sample_rate, cfg.gain, cfg.antenna.as_deref())?;
                Ok(Box::new(sink))
            }
            #[cfg(not(feature = "soapysdr"))]
            Err(satr_sink::SinkError::Unsupported("soapysdr"))
        }
    }
}
