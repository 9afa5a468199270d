pub type Result<T> = std::result::Result<T, SourceError>;

#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("failed to open audio source {0}: {1}")]
    Open(String, std::io::Error),

    #[error("failed to spawn audio source command {0}: {1}")]
    Spawn(String, std::io::Error),

    #[error("audio source read failed: {0}")]
    Read(std::io::Error),
}
