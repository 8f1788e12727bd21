use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProtocolError {
    #[error("Invalid id key: {0:?}")]
    InvalidKey(String),

    #[error("Invalid packed record: {0:?}")]
    InvalidRecord(String),

    #[error("Out of memory")]
    OutOfMemory,
}

impl From<std::collections::TryReserveError> for ProtocolError {
    fn from(_: std::collections::TryReserveError) -> Self {
        ProtocolError::OutOfMemory
    }
}
