pub type Result<T> = std::result::Result<T, SinkError>;

#[derive(Debug, thiserror::Error)]
pub enum SinkError {
    #[error("failed to open radio sink {0}: {1}")]
    Open(String, std::io::Error),

    #[error("radio sink write failed: {0}")]
    Write(std::io::Error),

    #[error("{0} sink is not available in this build")]
    Unsupported(&'static str),
}
