//! Export error types.

use thiserror::Error;

/// Result type for export operations.
pub type ExportResult<T> = Result<T, ExportError>;

/// Errors that can occur while exporting the canvas.
#[derive(Debug, Error)]
pub enum ExportError {
    /// Converting the rendered surface to a raster failed.
    #[error("Capture failed: {0}")]
    Capture(String),

    /// Wrapping the raster into a document failed.
    #[error("Document encoding failed: {0}")]
    Encode(String),

    /// Handing the document to its destination failed.
    #[error("Save failed: {0}")]
    Save(String),

    /// Embedded image could not be read.
    #[error("Failed to load resource: {0}")]
    Resource(String),

    /// Filesystem error while saving.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
