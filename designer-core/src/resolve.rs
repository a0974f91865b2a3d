//! Image-source resolution.
//!
//! Turns a picked file or a typed URL into the [`ImageSource`] stored on an
//! image element. Resolution failure is `None`, and the caller adds nothing.

use base64::Engine;

use crate::{CanvasError, CanvasResult, ImageFormat, ImageSource};

/// Resolve raw file bytes into an embedded data URI.
///
/// The declared MIME type is used when it names a known image type;
/// otherwise the format is sniffed from the bytes. Empty input or an
/// unrecognised format resolves to `None`.
#[must_use]
pub fn resolve_bytes(bytes: &[u8], declared_mime: Option<&str>) -> Option<ImageSource> {
    if bytes.is_empty() {
        tracing::debug!("empty image file, nothing to resolve");
        return None;
    }
    let format = declared_mime
        .and_then(ImageFormat::from_mime)
        .or_else(|| ImageFormat::from_magic_bytes(bytes));
    let Some(format) = format else {
        tracing::warn!(mime = ?declared_mime, len = bytes.len(), "unrecognised image data");
        return None;
    };
    let encoded = base64::engine::general_purpose::STANDARD.encode(bytes);
    Some(ImageSource::Data {
        format,
        uri: format!("data:{};base64,{encoded}", format.mime()),
    })
}

/// Resolve user-typed text into an image reference.
///
/// Blank input (a cancelled prompt) resolves to `None`. `data:` URIs are
/// parsed so their format is known; anything else is kept as an external URL.
#[must_use]
pub fn resolve_url(input: &str) -> Option<ImageSource> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return None;
    }
    if trimmed.starts_with("data:") {
        return match parse_data_uri(trimmed) {
            Ok(source) => Some(source),
            Err(e) => {
                tracing::warn!("{e}");
                None
            }
        };
    }
    Some(ImageSource::Url {
        url: trimmed.to_string(),
    })
}

/// Parse a `data:` URI into an [`ImageSource`], checking its image type.
///
/// # Errors
///
/// Returns [`CanvasError::ResourceLoad`] if the URI has no payload separator
/// or does not name a supported image type.
pub fn parse_data_uri(uri: &str) -> CanvasResult<ImageSource> {
    let rest = uri
        .strip_prefix("data:")
        .ok_or_else(|| CanvasError::ResourceLoad("not a data URI".to_string()))?;
    let (metadata, _payload) = rest
        .split_once(',')
        .ok_or_else(|| CanvasError::ResourceLoad("invalid data URI: missing comma".to_string()))?;
    let mime = metadata.split(';').next().unwrap_or_default();
    let format = ImageFormat::from_mime(mime)
        .ok_or_else(|| CanvasError::ResourceLoad(format!("unsupported image type: {mime}")))?;
    Ok(ImageSource::Data {
        format,
        uri: uri.to_string(),
    })
}
