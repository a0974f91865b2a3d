//! Canvas elements - the text and image boxes placed on the page.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Content of a freshly added text element.
pub const DEFAULT_TEXT: &str = "New Text";

/// Default font family for new text.
pub const DEFAULT_FONT_FAMILY: &str = "Arial";

/// Default font colour for new text.
pub const DEFAULT_FONT_COLOR: &str = "#000000";

/// Default font size in pixels.
pub const DEFAULT_FONT_SIZE: f32 = 16.0;

/// Font families offered by the style controls.
pub const FONT_FAMILIES: [&str; 3] = ["Arial", "Times New Roman", "Courier New"];

/// Unique identifier for an element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ElementId(Uuid);

impl ElementId {
    /// Create a new unique element ID.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parse an ID from its hyphenated string form.
    ///
    /// Returns `None` if the string is not a valid UUID.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        Uuid::parse_str(s).ok().map(Self)
    }
}

impl Default for ElementId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for ElementId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Supported image formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageFormat {
    /// PNG image.
    Png,
    /// JPEG image.
    Jpeg,
    /// GIF image.
    Gif,
    /// SVG vector image.
    Svg,
    /// WebP image.
    WebP,
}

impl ImageFormat {
    /// Detect format from a MIME type.
    #[must_use]
    pub fn from_mime(mime: &str) -> Option<Self> {
        match mime.trim().to_ascii_lowercase().as_str() {
            "image/png" => Some(Self::Png),
            "image/jpeg" | "image/jpg" => Some(Self::Jpeg),
            "image/gif" => Some(Self::Gif),
            "image/svg+xml" => Some(Self::Svg),
            "image/webp" => Some(Self::WebP),
            _ => None,
        }
    }

    /// Detect format from magic bytes.
    #[must_use]
    pub fn from_magic_bytes(data: &[u8]) -> Option<Self> {
        if data.starts_with(&[0x89, 0x50, 0x4E, 0x47]) {
            return Some(Self::Png);
        }
        if data.starts_with(&[0xFF, 0xD8, 0xFF]) {
            return Some(Self::Jpeg);
        }
        if data.starts_with(b"GIF87a") || data.starts_with(b"GIF89a") {
            return Some(Self::Gif);
        }
        if data.len() >= 12 && &data[0..4] == b"RIFF" && &data[8..12] == b"WEBP" {
            return Some(Self::WebP);
        }
        let head = String::from_utf8_lossy(&data[..data.len().min(256)]);
        let head = head.trim_start();
        if head.starts_with("<svg") || (head.starts_with("<?xml") && head.contains("<svg")) {
            return Some(Self::Svg);
        }
        None
    }

    /// MIME type used in data URIs.
    #[must_use]
    pub const fn mime(self) -> &'static str {
        match self {
            Self::Png => "image/png",
            Self::Jpeg => "image/jpeg",
            Self::Gif => "image/gif",
            Self::Svg => "image/svg+xml",
            Self::WebP => "image/webp",
        }
    }
}

/// Where an image element's pixels come from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ImageSource {
    /// Embedded `data:` URI.
    Data {
        /// Image format named by the URI.
        format: ImageFormat,
        /// Full data URI, including the `data:` prefix.
        uri: String,
    },
    /// External URL, referenced but never fetched by the core.
    Url {
        /// The URL as typed by the user.
        url: String,
    },
}

impl ImageSource {
    /// The reference stored as the element's content.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Data { uri, .. } => uri,
            Self::Url { url } => url,
        }
    }
}

/// Font attributes of a text element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextStyle {
    /// Font size in pixels.
    pub font_size: f32,
    /// CSS colour value.
    pub color: String,
    /// Font family name.
    pub font_family: String,
}

impl Default for TextStyle {
    fn default() -> Self {
        Self {
            font_size: DEFAULT_FONT_SIZE,
            color: DEFAULT_FONT_COLOR.to_string(),
            font_family: DEFAULT_FONT_FAMILY.to_string(),
        }
    }
}

/// The type of content an element contains.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum ElementKind {
    /// A text box.
    Text {
        /// Visible text.
        content: String,
        /// Font attributes.
        style: TextStyle,
    },

    /// An image box.
    Image {
        /// Resolved image reference.
        src: ImageSource,
    },
}

/// Position and size of an element, in canvas-local pixels.
///
/// `(x, y)` is the top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    /// X position (pixels from left).
    pub x: f32,
    /// Y position (pixels from top).
    pub y: f32,
    /// Width in pixels.
    pub width: f32,
    /// Height in pixels.
    pub height: f32,
}

impl Transform {
    /// Create a transform from position and size.
    #[must_use]
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Placement of a new text element.
    #[must_use]
    pub const fn text_default() -> Self {
        Self::new(50.0, 50.0, 150.0, 50.0)
    }

    /// Placement of a new image element.
    #[must_use]
    pub const fn image_default() -> Self {
        Self::new(50.0, 50.0, 100.0, 100.0)
    }

    /// Check if a point lies within this box (edges inclusive).
    #[must_use]
    pub fn contains(&self, x: f32, y: f32) -> bool {
        x >= self.x && x <= self.x + self.width && y >= self.y && y <= self.y + self.height
    }
}

/// Partial set of element attributes, merged by [`crate::ElementStore::update`].
///
/// `None` fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ElementPatch {
    /// New x position.
    pub x: Option<f32>,
    /// New y position.
    pub y: Option<f32>,
    /// New width.
    pub width: Option<f32>,
    /// New height.
    pub height: Option<f32>,
    /// New text content (text elements only).
    pub content: Option<String>,
    /// New font size (text elements only).
    pub font_size: Option<f32>,
    /// New font colour (text elements only).
    pub color: Option<String>,
    /// New font family (text elements only).
    pub font_family: Option<String>,
}

impl ElementPatch {
    /// Patch that moves an element.
    #[must_use]
    pub fn position(x: f32, y: f32) -> Self {
        Self {
            x: Some(x),
            y: Some(y),
            ..Self::default()
        }
    }

    /// Patch that resizes an element.
    #[must_use]
    pub fn size(width: f32, height: f32) -> Self {
        Self {
            width: Some(width),
            height: Some(height),
            ..Self::default()
        }
    }

    /// Patch that replaces position and size together.
    #[must_use]
    pub fn transform(t: Transform) -> Self {
        Self {
            x: Some(t.x),
            y: Some(t.y),
            width: Some(t.width),
            height: Some(t.height),
            ..Self::default()
        }
    }

    /// Patch that replaces text content.
    #[must_use]
    pub fn content(content: impl Into<String>) -> Self {
        Self {
            content: Some(content.into()),
            ..Self::default()
        }
    }

    /// Whether any text-only field is set.
    #[must_use]
    pub fn touches_text(&self) -> bool {
        self.content.is_some()
            || self.font_size.is_some()
            || self.color.is_some()
            || self.font_family.is_some()
    }
}

/// A canvas element with content and transform.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Element {
    /// Unique identifier.
    pub id: ElementId,
    /// Element content type.
    pub kind: ElementKind,
    /// Position and size.
    pub transform: Transform,
}

impl Element {
    /// Create a new element with the given kind and placement.
    #[must_use]
    pub fn new(kind: ElementKind, transform: Transform) -> Self {
        Self {
            id: ElementId::new(),
            kind,
            transform,
        }
    }

    /// A text element with the default content, style and placement.
    #[must_use]
    pub fn default_text() -> Self {
        Self::new(
            ElementKind::Text {
                content: DEFAULT_TEXT.to_string(),
                style: TextStyle::default(),
            },
            Transform::text_default(),
        )
    }

    /// An image element at the default placement.
    #[must_use]
    pub fn image(src: ImageSource) -> Self {
        Self::new(ElementKind::Image { src }, Transform::image_default())
    }

    /// Text style, if this is a text element.
    #[must_use]
    pub fn text_style(&self) -> Option<&TextStyle> {
        match &self.kind {
            ElementKind::Text { style, .. } => Some(style),
            ElementKind::Image { .. } => None,
        }
    }

    /// Whether this is a text element.
    #[must_use]
    pub fn is_text(&self) -> bool {
        matches!(self.kind, ElementKind::Text { .. })
    }

    /// Check if a point (in canvas coordinates) is within this element.
    #[must_use]
    pub fn contains_point(&self, x: f32, y: f32) -> bool {
        self.transform.contains(x, y)
    }

    /// Merge a patch into this element.
    ///
    /// Returns `true` if any attribute changed. Text-only fields are ignored
    /// on image elements.
    pub fn apply(&mut self, patch: &ElementPatch) -> bool {
        let before = self.clone();
        let t = &mut self.transform;
        if let Some(x) = patch.x {
            t.x = x;
        }
        if let Some(y) = patch.y {
            t.y = y;
        }
        if let Some(width) = patch.width {
            t.width = width;
        }
        if let Some(height) = patch.height {
            t.height = height;
        }

        match &mut self.kind {
            ElementKind::Text { content, style } => {
                if let Some(c) = &patch.content {
                    content.clone_from(c);
                }
                if let Some(size) = patch.font_size {
                    style.font_size = size;
                }
                if let Some(color) = &patch.color {
                    style.color.clone_from(color);
                }
                if let Some(family) = &patch.font_family {
                    style.font_family.clone_from(family);
                }
            }
            ElementKind::Image { .. } => {
                if patch.touches_text() {
                    tracing::debug!(id = %self.id, "ignoring text attributes on image element");
                }
            }
        }

        *self != before
    }
}
