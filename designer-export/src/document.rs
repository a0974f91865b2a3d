//! Paged-document encoding: one raster, one page.

use crate::capture::Raster;
use crate::error::{ExportError, ExportResult};

/// Millimetres per inch.
const MM_PER_INCH: f32 = 25.4;

/// An encoded document ready to be saved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PagedDocument {
    /// Encoded file contents.
    pub bytes: Vec<u8>,
    /// Number of pages.
    pub page_count: usize,
    /// Page width in pixels.
    pub page_width_px: u32,
    /// Page height in pixels.
    pub page_height_px: u32,
}

/// Wraps a raster into a paged document.
pub trait DocumentEncoder {
    /// MIME type of the produced document.
    fn mime_type(&self) -> &'static str;

    /// Encode the raster as the single page of a document.
    ///
    /// # Errors
    ///
    /// Returns an error if the raster cannot be decoded or the document
    /// cannot be written.
    fn encode(&self, raster: &Raster) -> ExportResult<PagedDocument>;
}

/// PDF output via printpdf.
///
/// The page is sized to the raster's pixel dimensions at `dpi` pixels per
/// inch and the raster fills it exactly.
#[derive(Debug, Clone)]
pub struct PdfEncoder {
    dpi: f32,
    title: String,
}

impl PdfEncoder {
    /// Create an encoder.
    #[must_use]
    pub fn new(dpi: f32, title: impl Into<String>) -> Self {
        Self {
            dpi: if dpi > 0.0 { dpi } else { 96.0 },
            title: title.into(),
        }
    }

    /// Page size in millimetres for a raster.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn page_size_mm(&self, raster: &Raster) -> (f32, f32) {
        (
            raster.width as f32 / self.dpi * MM_PER_INCH,
            raster.height as f32 / self.dpi * MM_PER_INCH,
        )
    }
}

impl PdfEncoder {
    /// Pixel size of a page given in millimetres.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    fn page_size_px(&self, width_mm: f32, height_mm: f32) -> (u32, u32) {
        let to_px = |mm: f32| (mm / MM_PER_INCH * self.dpi).round().max(0.0) as u32;
        (to_px(width_mm), to_px(height_mm))
    }
}

impl Default for PdfEncoder {
    fn default() -> Self {
        Self::new(96.0, "Custom Design")
    }
}

impl DocumentEncoder for PdfEncoder {
    fn mime_type(&self) -> &'static str {
        "application/pdf"
    }

    fn encode(&self, raster: &Raster) -> ExportResult<PagedDocument> {
        let (page_w, page_h) = self.page_size_mm(raster);

        let (doc, page1, layer1) = printpdf::PdfDocument::new(
            &self.title,
            printpdf::Mm(page_w),
            printpdf::Mm(page_h),
            "Layer 1",
        );
        let current_layer = doc.get_page(page1).get_layer(layer1);

        // Decode with printpdf's bundled image crate so the types line up.
        let decoded = printpdf::image_crate::load_from_memory(&raster.png)
            .map_err(|e| ExportError::Encode(format!("Failed to decode PNG for PDF: {e}")))?;
        // Flatten to RGB; the capture always paints an opaque background.
        let rgb = printpdf::image_crate::DynamicImage::ImageRgb8(decoded.to_rgb8());
        let pdf_image = printpdf::Image::from_dynamic_image(&rgb);

        pdf_image.add_to_layer(
            current_layer,
            printpdf::ImageTransform {
                translate_x: Some(printpdf::Mm(0.0)),
                translate_y: Some(printpdf::Mm(0.0)),
                dpi: Some(self.dpi),
                ..Default::default()
            },
        );

        let bytes = doc
            .save_to_bytes()
            .map_err(|e| ExportError::Encode(format!("PDF save failed: {e}")))?;

        let (page_width_px, page_height_px) = self.page_size_px(page_w, page_h);
        Ok(PagedDocument {
            bytes,
            page_count: 1,
            page_width_px,
            page_height_px,
        })
    }
}
