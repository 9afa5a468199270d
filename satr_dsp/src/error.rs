pub type Result<T> = std::result::Result<T, DspError>;

/// Errors raised by the signal-chain engine. None of these are raised from
/// the per-sample hot path — the mux loop only ever sees them at channel
/// open/configure time or when a frame-level encode genuinely fails.
#[derive(Debug, thiserror::Error)]
pub enum DspError {
    #[error("channel {0}: {1}")]
    Channel(usize, String),

    #[error("MP2 encoder: {0}")]
    Mp2(String),

    #[error("invalid filter configuration: {0}")]
    InvalidFilter(String),

    #[error("config: {0}")]
    Config(#[from] crate::config::ConfigError),

    #[error("audio source error: {0}")]
    Source(#[from] satr_source::SourceError),

    #[error("radio sink error: {0}")]
    Sink(#[from] satr_sink::SinkError),
}
