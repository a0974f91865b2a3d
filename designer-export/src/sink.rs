//! Destinations for a finished document.

use std::path::{Path, PathBuf};

use crate::error::{ExportError, ExportResult};

/// Receives a finished document under a filename.
pub trait DocumentSink {
    /// Hand the document over.
    ///
    /// # Errors
    ///
    /// Returns an error if the document could not be delivered.
    fn save(&mut self, filename: &str, mime_type: &str, bytes: &[u8]) -> ExportResult<()>;
}

/// Writes documents into a directory.
#[derive(Debug, Clone)]
pub struct DirectorySink {
    dir: PathBuf,
}

impl DirectorySink {
    /// Create a sink writing into `dir`, creating it if needed.
    ///
    /// # Errors
    ///
    /// Returns [`ExportError::Io`] if the directory cannot be created.
    pub fn new(dir: impl Into<PathBuf>) -> ExportResult<Self> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    /// Target directory.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl DocumentSink for DirectorySink {
    fn save(&mut self, filename: &str, _mime_type: &str, bytes: &[u8]) -> ExportResult<()> {
        let name = Path::new(filename)
            .file_name()
            .ok_or_else(|| ExportError::Save(format!("invalid filename: {filename:?}")))?;
        let path = self.dir.join(name);
        std::fs::write(&path, bytes)?;
        tracing::info!(path = %path.display(), bytes = bytes.len(), "document written");
        Ok(())
    }
}

/// A document kept by [`MemorySink`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavedDocument {
    /// Filename it was saved under.
    pub filename: String,
    /// MIME type.
    pub mime_type: String,
    /// Contents.
    pub bytes: Vec<u8>,
}

/// Keeps saved documents in memory.
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    saved: Vec<SavedDocument>,
}

impl MemorySink {
    /// Create an empty sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Documents saved so far, oldest first.
    #[must_use]
    pub fn saved(&self) -> &[SavedDocument] {
        &self.saved
    }
}

impl DocumentSink for MemorySink {
    fn save(&mut self, filename: &str, mime_type: &str, bytes: &[u8]) -> ExportResult<()> {
        self.saved.push(SavedDocument {
            filename: filename.to_string(),
            mime_type: mime_type.to_string(),
            bytes: bytes.to_vec(),
        });
        Ok(())
    }
}
