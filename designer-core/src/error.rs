//! Error types for designer operations.

use thiserror::Error;

/// Result type for designer operations.
pub type CanvasResult<T> = Result<T, CanvasError>;

/// Errors that can occur in designer operations.
///
/// Lookup misses on the element store are not errors: `update` and `delete`
/// on an unknown id are silent no-ops. These variants cover the places where
/// a caller actually needs to know something went wrong.
#[derive(Debug, Error)]
pub enum CanvasError {
    /// Element not found in the store.
    #[error("Element not found: {0}")]
    ElementNotFound(String),

    /// Operation not valid for this element.
    #[error("Invalid operation on element: {0}")]
    InvalidOperation(String),

    /// Configuration or surface serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Image source could not be resolved.
    #[error("Failed to resolve image source: {0}")]
    ResourceLoad(String),

    /// Configuration value out of range.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}
