//! Unified error types for pagesense

use thiserror::Error;

/// Unified error type for all pagesense operations
#[derive(Error, Debug)]
pub enum PageSenseError {
    // Input validation errors (fatal)
    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: String, actual: String },

    #[error("Invalid diff bitmap: {0}")]
    InvalidBitmap(String),

    // Signal extraction errors (swallowed by the extractor)
    #[error("Selector error for '{selector}': {reason}")]
    Selector { selector: String, reason: String },

    #[error("Snapshot error: {0}")]
    Snapshot(String),

    // Collaborator errors
    #[error("Browser error: {0}")]
    Browser(String),

    #[error("Configuration error: {0}")]
    Config(String),

    // I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    // Generic
    #[error("{0}")]
    Other(String),
}

impl PageSenseError {
    /// Build a dimension mismatch error from two `width x height` pairs
    pub fn dimension_mismatch(expected: (u32, u32), actual: (u32, u32)) -> Self {
        Self::DimensionMismatch {
            expected: format!("{}x{}", expected.0, expected.1),
            actual: format!("{}x{}", actual.0, actual.1),
        }
    }

    /// Whether this error must surface to the caller instead of degrading
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Self::DimensionMismatch { .. } | Self::InvalidBitmap(_)
        )
    }
}

/// Result type alias using PageSenseError
pub type Result<T> = std::result::Result<T, PageSenseError>;
