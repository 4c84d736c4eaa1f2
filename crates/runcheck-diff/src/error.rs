//! Error types for the comparator crate.

/// Errors that can occur while reporting a comparison.
#[derive(Debug, thiserror::Error)]
pub enum DiffError {
    /// The output sink rejected a write.
    #[error("failed to write diff output: {0}")]
    SinkWrite(#[from] std::io::Error),

    /// The JSON report could not be encoded.
    #[error("serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for DiffError {
    fn from(err: serde_json::Error) -> Self {
        if err.is_io() {
            Self::SinkWrite(err.into())
        } else {
            Self::Serialization(err.to_string())
        }
    }
}

/// Convenience alias for comparator results.
pub type DiffResult<T> = Result<T, DiffError>;
