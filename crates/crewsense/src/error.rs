use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Failed to enumerate processes: {0}")]
    ProcessEnumerationFailed(String),

    #[error("Failed to open process: {0}")]
    ProcessOpenFailed(String),

    #[error("Module not found: {0}")]
    ModuleNotFound(String),

    #[error("Failed to read process memory at address {address:#x}: {message}")]
    MemoryReadFailed { address: u64, message: String },

    #[error("Invalid offset table: {0}")]
    InvalidOffset(String),

    #[error("Invalid signature: {0}")]
    InvalidSignature(String),

    #[error("Signature not found: {0}")]
    SignatureNotFound(String),

    #[error("Invalid record schema: {0}")]
    InvalidSchema(String),

    #[error("Record size mismatch: schema is {expected} bytes, buffer is {actual} bytes")]
    RecordSizeMismatch { expected: usize, actual: usize },

    #[error("Offset version mismatch: expected {expected}, got {actual}")]
    OffsetVersionMismatch { expected: String, actual: String },

    #[error("Failed to deliver event: {0}")]
    EmitFailed(String),

    #[cfg(feature = "api")]
    #[error("HTTP error: {0}")]
    Http(#[from] ureq::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Check if this error is a "file not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::Io(e) if e.kind() == std::io::ErrorKind::NotFound)
    }

    /// Errors raised while handing an event to a consumer.
    ///
    /// These are the only errors the poll loop treats as fatal.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Error::EmitFailed(_))
    }

    pub(crate) fn read_failed(address: u64, message: impl Into<String>) -> Self {
        Error::MemoryReadFailed {
            address,
            message: message.into(),
        }
    }
}
