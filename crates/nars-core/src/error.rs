//! Error types for the NARS bridge

use thiserror::Error;

/// Result type for bridge operations
pub type Result<T> = std::result::Result<T, NarsError>;

/// Bridge error types
#[derive(Debug, Error)]
pub enum NarsError {
    /// Backend executable could not be launched
    #[error("Failed to spawn backend: {0}")]
    Spawn(String),

    /// I/O failure while talking to the backend
    #[error("Backend I/O error: {0}")]
    Io(String),

    /// Bridge already launched
    #[error("Backend already launched")]
    AlreadyLaunched,

    /// Bridge terminated, no further commands accepted
    #[error("Backend terminated")]
    Terminated,

    /// Agent has no backend equipped
    #[error("No backend equipped")]
    NotEquipped,

    /// Agent already has a backend equipped
    #[error("Backend already equipped, disconnect first")]
    AlreadyEquipped,

    /// Template has the wrong number of placeholders
    #[error("Invalid {template} template: expected {expected} placeholder(s), found {found}")]
    InvalidTemplate {
        template: &'static str,
        expected: usize,
        found: usize,
    },

    /// Unrecognized backend tag
    #[error("Unknown backend type: {0}")]
    UnknownBackend(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<serde_json::Error> for NarsError {
    fn from(err: serde_json::Error) -> Self {
        NarsError::Config(err.to_string())
    }
}
