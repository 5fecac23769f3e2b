//! Error types for inkbridge

use inkbridge_engine::EngineError;
use thiserror::Error;

/// Result type for inkbridge operations
pub type Result<T> = std::result::Result<T, BridgeError>;

/// Error types for bridge operations
#[derive(Error, Debug)]
pub enum BridgeError {
    /// The document is encrypted and no password was supplied
    #[error("document requires a password")]
    AuthenticationRequired,

    /// A password was supplied but it is not the document's password
    #[error("wrong password for encrypted document")]
    WrongPassword,

    /// The source file is absent, unreadable, or structurally invalid
    #[error("source missing or corrupt: {reason}")]
    CorruptOrMissingSource { reason: String },

    /// A valid document whose page could not be loaded
    #[error("failed to load page {index}")]
    PageLoadFailed { index: usize },

    /// A handle that is null, was never issued, or was already freed
    #[error("stale or invalid {kind} handle")]
    StaleHandle { kind: &'static str },

    /// The viewport extent does not match the supplied pixel buffer
    #[error(
        "viewport {width}x{height} needs {expected} buffer bytes, got {actual}"
    )]
    ViewportMismatch {
        width: i32,
        height: i32,
        expected: usize,
        actual: usize,
    },

    /// Failed to render a page
    #[error("render failed: {reason}")]
    RenderFailed { reason: String },

    /// PNG encoding error
    #[error("PNG encoding error: {0}")]
    PngEncoding(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<EngineError> for BridgeError {
    fn from(err: EngineError) -> Self {
        match err {
            EngineError::NeedsPassword => BridgeError::AuthenticationRequired,
            EngineError::WrongPassword => BridgeError::WrongPassword,
            EngineError::Missing(path) => BridgeError::CorruptOrMissingSource {
                reason: format!("file not found: {path}"),
            },
            EngineError::Corrupt { reason } => BridgeError::CorruptOrMissingSource { reason },
            EngineError::PageOutOfRange { index, .. } => BridgeError::PageLoadFailed { index },
            EngineError::Io(e) => BridgeError::CorruptOrMissingSource {
                reason: e.to_string(),
            },
        }
    }
}
