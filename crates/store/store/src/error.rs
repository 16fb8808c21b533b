use fragments_core::FragmentError;
use thiserror::Error;

/// Errors from fragment storage backends.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("connection error: {0}")]
    Connection(String),

    #[error("backend error: {0}")]
    Backend(String),
}

impl From<serde_json::Error> for StoreError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

impl From<StoreError> for FragmentError {
    fn from(err: StoreError) -> Self {
        FragmentError::Storage(err.to_string())
    }
}
