//! Error types for the output system
use thiserror::Error;

/// Output system errors
#[derive(Error, Debug)]
pub enum ControlError {
    /// I/O error
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// Core domain error
    #[error("Core error: {0}")]
    CoreError(#[from] ledweave_core::CoreError),

    /// Invalid driver configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Result type for output operations
pub type Result<T> = std::result::Result<T, ControlError>;
