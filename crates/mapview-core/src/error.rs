//! Error types for mapview.

use thiserror::Error;

/// The main error type for mapview operations.
#[derive(Error, Debug)]
pub enum MapViewError {
    /// A viewer option is outside of its valid range.
    #[error("invalid option '{name}': {reason}")]
    InvalidOption { name: &'static str, reason: String },

    /// The shared map (or camera pose) lock was poisoned by a panicking writer.
    #[error("shared {0} lock poisoned")]
    LockPoisoned(&'static str),

    /// Rendering error.
    #[error("render error: {0}")]
    RenderError(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

/// A specialized Result type for mapview operations.
pub type Result<T> = std::result::Result<T, MapViewError>;
