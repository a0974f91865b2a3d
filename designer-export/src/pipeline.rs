//! Export pipeline: capture the surface, wrap it in a document, save it.

use designer_core::Surface;
use serde::{Deserialize, Serialize};

use crate::capture::{Capture, Raster, SvgCapture};
use crate::document::{DocumentEncoder, PdfEncoder};
use crate::error::ExportResult;
use crate::sink::DocumentSink;

/// Filename offered for every export unless configured otherwise.
pub const DEFAULT_FILENAME: &str = "custom_design.pdf";

/// Configuration for the export pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    /// Capture scale (device pixel ratio).
    pub scale: f32,
    /// Pixels per inch used to size the document page.
    pub dpi: f32,
    /// Filename handed to the sink.
    pub filename: String,
    /// Document title metadata.
    pub title: String,
    /// Also load installed fonts, so named families such as Arial are used
    /// when present. Bundled faces are always available.
    pub load_system_fonts: bool,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            scale: 1.0,
            dpi: 96.0,
            filename: DEFAULT_FILENAME.to_string(),
            title: "Custom Design".to_string(),
            load_system_fonts: true,
        }
    }
}

/// What an export produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportReport {
    /// Filename the document was saved under.
    pub filename: String,
    /// Captured raster width in pixels.
    pub raster_width: u32,
    /// Captured raster height in pixels.
    pub raster_height: u32,
    /// Pages in the document.
    pub page_count: usize,
    /// Page width in pixels.
    pub page_width_px: u32,
    /// Page height in pixels.
    pub page_height_px: u32,
    /// Size of the saved document.
    pub bytes: usize,
}

/// Capture → encode → save.
///
/// Each step runs only if the previous one succeeded: a failed capture
/// never reaches the encoder, and a failed encode never reaches the sink.
pub struct ExportPipeline {
    capture: Box<dyn Capture>,
    encoder: Box<dyn DocumentEncoder>,
    filename: String,
}

impl ExportPipeline {
    /// Build the default SVG-capture + PDF pipeline from configuration.
    #[must_use]
    pub fn new(config: &ExportConfig) -> Self {
        Self {
            capture: Box::new(SvgCapture::new(config.scale, config.load_system_fonts)),
            encoder: Box::new(PdfEncoder::new(config.dpi, config.title.clone())),
            filename: config.filename.clone(),
        }
    }

    /// Create a pipeline with default configuration.
    #[must_use]
    pub fn with_defaults() -> Self {
        Self::new(&ExportConfig::default())
    }

    /// Replace the capture step.
    #[must_use]
    pub fn with_capture(mut self, capture: impl Capture + 'static) -> Self {
        self.capture = Box::new(capture);
        self
    }

    /// Replace the document encoder.
    #[must_use]
    pub fn with_encoder(mut self, encoder: impl DocumentEncoder + 'static) -> Self {
        self.encoder = Box::new(encoder);
        self
    }

    /// Filename handed to sinks.
    #[must_use]
    pub fn filename(&self) -> &str {
        &self.filename
    }

    /// Capture the surface without building a document.
    ///
    /// # Errors
    ///
    /// Returns an error if the capture fails.
    pub fn capture(&self, surface: &Surface) -> ExportResult<Raster> {
        self.capture.capture(surface)
    }

    /// Run the full export and hand the document to `sink`.
    ///
    /// # Errors
    ///
    /// Returns the first failing step's error; later steps do not run.
    pub fn export(&self, surface: &Surface, sink: &mut dyn DocumentSink) -> ExportResult<ExportReport> {
        let raster = self.capture.capture(surface).map_err(|e| {
            tracing::warn!("export aborted at capture: {e}");
            e
        })?;
        let document = self.encoder.encode(&raster).map_err(|e| {
            tracing::warn!("export aborted at encode: {e}");
            e
        })?;
        sink.save(&self.filename, self.encoder.mime_type(), &document.bytes)?;

        tracing::info!(
            filename = %self.filename,
            width = raster.width,
            height = raster.height,
            bytes = document.bytes.len(),
            "canvas exported"
        );

        Ok(ExportReport {
            filename: self.filename.clone(),
            raster_width: raster.width,
            raster_height: raster.height,
            page_count: document.page_count,
            page_width_px: document.page_width_px,
            page_height_px: document.page_height_px,
            bytes: document.bytes.len(),
        })
    }
}

impl std::fmt::Debug for ExportPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExportPipeline")
            .field("filename", &self.filename)
            .field("mime_type", &self.encoder.mime_type())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ExportError;
    use crate::sink::MemorySink;
    use designer_core::EditorSession;

    struct FailingCapture;

    impl Capture for FailingCapture {
        fn capture(&self, _surface: &Surface) -> ExportResult<Raster> {
            Err(ExportError::Capture("surface detached".to_string()))
        }
    }

    fn offline_config() -> ExportConfig {
        ExportConfig {
            load_system_fonts: false,
            ..ExportConfig::default()
        }
    }

    #[test]
    fn test_export_saves_single_page_pdf() {
        let mut session = EditorSession::default();
        session.add_text();
        let pipeline = ExportPipeline::new(&offline_config());
        let mut sink = MemorySink::new();

        let report = pipeline.export(&session.surface(), &mut sink).expect("export");
        assert_eq!(report.filename, "custom_design.pdf");
        assert_eq!(report.page_count, 1);
        assert_eq!(
            (report.page_width_px, report.page_height_px),
            (report.raster_width, report.raster_height)
        );
        assert_eq!((report.raster_width, report.raster_height), (800, 600));

        let saved = sink.saved();
        assert_eq!(saved.len(), 1);
        assert_eq!(saved[0].filename, "custom_design.pdf");
        assert_eq!(saved[0].mime_type, "application/pdf");
        assert_eq!(&saved[0].bytes[0..5], b"%PDF-");
    }

    #[test]
    fn test_capture_failure_never_saves() {
        let session = EditorSession::default();
        let pipeline = ExportPipeline::new(&offline_config()).with_capture(FailingCapture);
        let mut sink = MemorySink::new();

        let err = pipeline
            .export(&session.surface(), &mut sink)
            .expect_err("capture fails");
        assert!(matches!(err, ExportError::Capture(_)));
        assert!(sink.saved().is_empty());
    }

    #[test]
    fn test_export_config_from_json() {
        let config: ExportConfig =
            serde_json::from_str(r#"{"scale":2.0,"filename":"page.pdf"}"#).expect("config");
        assert!((config.dpi - 96.0).abs() < f32::EPSILON);
        let pipeline = ExportPipeline::new(&config);
        assert_eq!(pipeline.filename(), "page.pdf");
    }
}
