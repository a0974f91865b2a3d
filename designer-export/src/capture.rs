//! Capture: the rendered surface to a raster image.
//!
//! [`SvgCapture`] draws a [`Surface`] as SVG, mirroring how the browser lays
//! the canvas out, and rasterizes it with resvg/tiny-skia into a PNG.

use std::fmt::Write;
use std::sync::Arc;

use designer_core::{NodeContent, Surface, SurfaceNode, TextStyle};

use crate::error::{ExportError, ExportResult};
use crate::embed::load_embedded;

/// Average glyph advance as a fraction of the font size, for line wrapping.
const AVG_GLYPH_ADVANCE: f32 = 0.55;

/// Line height as a multiple of the font size.
const LINE_HEIGHT: f32 = 1.2;

/// Faces always available to the capture, one per generic family.
const BUNDLED_SANS: (&str, &[u8]) = (
    "DejaVu Sans",
    include_bytes!("../assets/fonts/DejaVuSans.ttf"),
);
const BUNDLED_SERIF: (&str, &[u8]) = (
    "DejaVu Serif",
    include_bytes!("../assets/fonts/DejaVuSerif.ttf"),
);
const BUNDLED_MONO: (&str, &[u8]) = (
    "DejaVu Sans Mono",
    include_bytes!("../assets/fonts/DejaVuSansMono.ttf"),
);

/// A captured raster.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Raster {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// PNG-encoded pixels.
    pub png: Vec<u8>,
}

/// Converts a rendered surface into a raster image.
pub trait Capture {
    /// Capture the surface.
    ///
    /// # Errors
    ///
    /// Returns an error if the surface cannot be rasterized.
    fn capture(&self, surface: &Surface) -> ExportResult<Raster>;
}

/// SVG + resvg capture.
pub struct SvgCapture {
    scale: f32,
    fontdb: Arc<usvg::fontdb::Database>,
}

impl std::fmt::Debug for SvgCapture {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SvgCapture")
            .field("scale", &self.scale)
            .field("faces", &self.fontdb.len())
            .finish()
    }
}

impl SvgCapture {
    /// Create a capture at the given device pixel ratio.
    ///
    /// The bundled DejaVu faces are always loaded and back the generic
    /// families, so text draws even where no fonts are installed (wasm32).
    /// With `system_fonts` set, installed fonts are loaded too and a named
    /// family such as Arial is used when present.
    #[must_use]
    pub fn new(scale: f32, system_fonts: bool) -> Self {
        let mut fontdb = usvg::fontdb::Database::new();
        for (_, data) in [BUNDLED_SANS, BUNDLED_SERIF, BUNDLED_MONO] {
            fontdb.load_font_data(data.to_vec());
        }
        fontdb.set_sans_serif_family(BUNDLED_SANS.0);
        fontdb.set_serif_family(BUNDLED_SERIF.0);
        fontdb.set_monospace_family(BUNDLED_MONO.0);
        if system_fonts {
            fontdb.load_system_fonts();
            tracing::debug!(faces = fontdb.len(), "loaded system fonts for capture");
        }
        Self {
            scale: if scale > 0.0 { scale } else { 1.0 },
            fontdb: Arc::new(fontdb),
        }
    }

    /// Output size in pixels for a surface.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn output_dimensions(&self, surface: &Surface) -> (u32, u32) {
        let w = (surface.width * self.scale).round().max(1.0) as u32;
        let h = (surface.height * self.scale).round().max(1.0) as u32;
        (w, h)
    }

    /// Draw the surface as an SVG document.
    #[must_use]
    pub fn render_to_svg(&self, surface: &Surface) -> String {
        let (out_w, out_h) = self.output_dimensions(surface);
        let mut svg = String::with_capacity(4096);
        let _ = write!(
            svg,
            "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{out_w}\" height=\"{out_h}\" viewBox=\"0 0 {} {}\">",
            surface.width, surface.height,
        );
        let _ = write!(
            svg,
            "<rect width=\"100%\" height=\"100%\" fill=\"{}\"/>",
            escape_xml(&surface.background),
        );

        for node in &surface.nodes {
            render_node_svg(&mut svg, node, &surface.outline_color);
        }

        if let Some(border) = &surface.border_color {
            let _ = write!(
                svg,
                "<rect x=\"0.5\" y=\"0.5\" width=\"{}\" height=\"{}\" fill=\"none\" stroke=\"{}\" stroke-width=\"1\"/>",
                (surface.width - 1.0).max(0.0),
                (surface.height - 1.0).max(0.0),
                escape_xml(border),
            );
        }

        svg.push_str("</svg>");
        svg
    }

    /// Rasterize an SVG string to a tiny-skia pixmap.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    fn rasterize_svg(&self, svg: &str) -> ExportResult<tiny_skia::Pixmap> {
        let mut opt = usvg::Options::default();
        opt.fontdb = Arc::clone(&self.fontdb);
        let tree = usvg::Tree::from_str(svg, &opt)
            .map_err(|e| ExportError::Capture(format!("SVG parsing failed: {e}")))?;

        let px_w = tree.size().width().round() as u32;
        let px_h = tree.size().height().round() as u32;

        let mut pixmap = tiny_skia::Pixmap::new(px_w.max(1), px_h.max(1))
            .ok_or_else(|| ExportError::Capture("Failed to create pixmap".to_string()))?;

        resvg::render(&tree, tiny_skia::Transform::default(), &mut pixmap.as_mut());
        Ok(pixmap)
    }
}

impl Default for SvgCapture {
    fn default() -> Self {
        Self::new(1.0, true)
    }
}

impl Capture for SvgCapture {
    fn capture(&self, surface: &Surface) -> ExportResult<Raster> {
        let svg = self.render_to_svg(surface);
        let pixmap = self.rasterize_svg(&svg)?;
        let png = pixmap
            .encode_png()
            .map_err(|e| ExportError::Capture(format!("PNG encoding failed: {e}")))?;
        tracing::debug!(
            width = pixmap.width(),
            height = pixmap.height(),
            nodes = surface.nodes.len(),
            "surface captured"
        );
        Ok(Raster {
            width: pixmap.width(),
            height: pixmap.height(),
            png,
        })
    }
}

/// Render one node into a clipping viewport at its frame.
fn render_node_svg(svg: &mut String, node: &SurfaceNode, outline_color: &str) {
    let f = &node.frame;
    if f.width <= 0.0 || f.height <= 0.0 {
        return;
    }
    let _ = write!(
        svg,
        "<svg x=\"{}\" y=\"{}\" width=\"{}\" height=\"{}\" overflow=\"hidden\">",
        f.x, f.y, f.width, f.height,
    );

    match &node.content {
        NodeContent::Text {
            text,
            style,
            outlined,
        } => {
            render_text_svg(svg, text, style, f.width);
            if *outlined {
                let _ = write!(
                    svg,
                    "<rect x=\"0.5\" y=\"0.5\" width=\"{}\" height=\"{}\" fill=\"none\" stroke=\"{}\" stroke-width=\"1\"/>",
                    (f.width - 1.0).max(0.0),
                    (f.height - 1.0).max(0.0),
                    escape_xml(outline_color),
                );
            }
        }
        NodeContent::Image { src } => match load_embedded(src) {
            Ok(embedded) => {
                let _ = write!(
                    svg,
                    "<image width=\"{}\" height=\"{}\" preserveAspectRatio=\"xMidYMid slice\" href=\"{}\"/>",
                    f.width,
                    f.height,
                    escape_xml(&embedded.href),
                );
            }
            Err(e) => {
                tracing::warn!(id = %node.id, "image drawn as placeholder: {e}");
                let _ = write!(
                    svg,
                    "<rect width=\"100%\" height=\"100%\" fill=\"#e0e0e0\" stroke=\"#999\" stroke-width=\"1\"/>",
                );
            }
        },
    }

    svg.push_str("</svg>");
}

/// Centred, word-wrapped text lines inside a box of `width`.
fn render_text_svg(svg: &mut String, text: &str, style: &TextStyle, width: f32) {
    let size = style.font_size;
    let lines = wrap_text(text, max_chars_per_line(width, size));
    let _ = write!(
        svg,
        "<text font-size=\"{size}\" fill=\"{}\" font-family=\"{}\" text-anchor=\"middle\">",
        escape_xml(&style.color),
        escape_xml(&font_family_list(&style.font_family)),
    );
    let cx = width / 2.0;
    for (i, line) in lines.iter().enumerate() {
        #[allow(clippy::cast_precision_loss)]
        let baseline = size + i as f32 * size * LINE_HEIGHT;
        let _ = write!(
            svg,
            "<tspan x=\"{cx}\" y=\"{baseline}\">{}</tspan>",
            escape_xml(line),
        );
    }
    svg.push_str("</text>");
}

/// CSS font-family list: the chosen family, then the generic family that
/// matches it so a bundled face takes over when the named one is missing.
fn font_family_list(family: &str) -> String {
    let generic = match family.to_ascii_lowercase().as_str() {
        "times new roman" | "times" | "georgia" | "serif" => "serif",
        "courier new" | "courier" | "monospace" => "monospace",
        _ => "sans-serif",
    };
    let family = family.replace(['\'', '"'], "");
    if family.is_empty() {
        generic.to_string()
    } else {
        format!("'{family}', {generic}")
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn max_chars_per_line(width: f32, font_size: f32) -> usize {
    let advance = (font_size * AVG_GLYPH_ADVANCE).max(1.0);
    ((width / advance).floor() as usize).max(1)
}

/// Greedy word wrap. Hard newlines are kept; words longer than a line are split.
fn wrap_text(text: &str, max_chars: usize) -> Vec<String> {
    let mut lines = Vec::new();
    for paragraph in text.split('\n') {
        let mut current = String::new();
        let mut current_len = 0;
        for word in paragraph.split_whitespace() {
            let mut chars: Vec<char> = word.chars().collect();
            while chars.len() > max_chars {
                if current_len > 0 {
                    lines.push(std::mem::take(&mut current));
                    current_len = 0;
                }
                let rest = chars.split_off(max_chars);
                lines.push(chars.into_iter().collect());
                chars = rest;
            }
            let word_len = chars.len();
            if current_len > 0 && current_len + 1 + word_len > max_chars {
                lines.push(std::mem::take(&mut current));
                current_len = 0;
            }
            if current_len > 0 {
                current.push(' ');
                current_len += 1;
            }
            current.extend(chars);
            current_len += word_len;
        }
        lines.push(current);
    }
    lines
}

/// Escape special XML characters.
fn escape_xml(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}
