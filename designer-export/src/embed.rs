//! Embedded image loading.
//!
//! Capture only draws what it can decode locally: data URIs holding a
//! raster format the `image` crate reads, or SVG. Raster pictures are
//! normalised to PNG so the rasterizer never sees a format it lacks a
//! decoder for. External URLs are never fetched.

use std::io::Cursor;

use base64::Engine;
use designer_core::{ImageFormat, ImageSource};

use crate::error::{ExportError, ExportResult};

/// A picture ready to embed in the capture SVG.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmbeddedImage {
    /// Data URI the rasterizer can decode.
    pub href: String,
    /// Natural size in pixels, when known.
    pub natural_size: Option<(u32, u32)>,
}

/// Decode the payload of a data URI.
///
/// # Errors
///
/// Returns an error if the URI is malformed or its base64 payload is invalid.
pub fn decode_data_uri(uri: &str) -> ExportResult<Vec<u8>> {
    let rest = uri
        .strip_prefix("data:")
        .ok_or_else(|| ExportError::Resource("Not a data URI".to_string()))?;
    let (metadata, payload) = rest
        .split_once(',')
        .ok_or_else(|| ExportError::Resource("Invalid data URI: missing comma".to_string()))?;

    if metadata.contains(";base64") {
        base64::engine::general_purpose::STANDARD
            .decode(payload.trim())
            .map_err(|e| ExportError::Resource(format!("Failed to decode base64: {e}")))
    } else {
        percent_decode(payload)
    }
}

/// Percent-decoding for non-base64 data URIs.
fn percent_decode(input: &str) -> ExportResult<Vec<u8>> {
    let bytes = input.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' {
            let hex = input
                .get(i + 1..i + 3)
                .and_then(|h| u8::from_str_radix(h, 16).ok())
                .ok_or_else(|| ExportError::Resource("Invalid URL encoding".to_string()))?;
            out.push(hex);
            i += 3;
        } else {
            out.push(bytes[i]);
            i += 1;
        }
    }
    Ok(out)
}

/// Prepare an image source for embedding.
///
/// # Errors
///
/// Returns [`ExportError::Resource`] for external URLs and for data that
/// cannot be decoded.
pub fn load_embedded(source: &ImageSource) -> ExportResult<EmbeddedImage> {
    let (format, uri) = match source {
        ImageSource::Data { format, uri } => (*format, uri),
        ImageSource::Url { url } => {
            return Err(ExportError::Resource(format!(
                "external image not fetched: {url}"
            )));
        }
    };

    let bytes = decode_data_uri(uri)?;
    if format == ImageFormat::Svg {
        // Checked for well-formedness; the rasterizer renders it natively.
        usvg::Tree::from_data(&bytes, &usvg::Options::default())
            .map_err(|e| ExportError::Resource(format!("Failed to parse SVG image: {e}")))?;
        return Ok(EmbeddedImage {
            href: uri.clone(),
            natural_size: None,
        });
    }

    let img = image::load_from_memory(&bytes)
        .map_err(|e| ExportError::Resource(format!("Failed to decode image: {e}")))?;
    let natural_size = Some((img.width(), img.height()));

    let mut png = Cursor::new(Vec::new());
    img.write_to(&mut png, image::ImageFormat::Png)
        .map_err(|e| ExportError::Resource(format!("Failed to re-encode image: {e}")))?;
    let encoded = base64::engine::general_purpose::STANDARD.encode(png.into_inner());

    Ok(EmbeddedImage {
        href: format!("data:image/png;base64,{encoded}"),
        natural_size,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    /// 1x1 red PNG.
    const RED_PIXEL: &str = "iVBORw0KGgoAAAANSUhEUgAAAAEAAAABCAYAAAAfFcSJAAAADUlEQVR42mP8z8DwHwAFBQIAX8jx0gAAAABJRU5ErkJggg==";

    #[test]
    fn test_decode_base64_data_uri() {
        let bytes = decode_data_uri(&format!("data:image/png;base64,{RED_PIXEL}")).expect("decode");
        assert_eq!(&bytes[0..4], &[0x89, 0x50, 0x4E, 0x47]);
    }

    #[test]
    fn test_decode_percent_data_uri() {
        let bytes = decode_data_uri("data:image/svg+xml,%3Csvg%3E").expect("decode");
        assert_eq!(bytes, b"<svg>");
    }

    #[test]
    fn test_invalid_data_uris() {
        assert!(decode_data_uri("not a data uri").is_err());
        assert!(decode_data_uri("data:image/png").is_err());
        assert!(decode_data_uri("data:image/png;base64,@@@").is_err());
        assert!(decode_data_uri("data:text/plain,%zz").is_err());
    }

    #[test]
    fn test_load_embedded_png() {
        let source = ImageSource::Data {
            format: ImageFormat::Png,
            uri: format!("data:image/png;base64,{RED_PIXEL}"),
        };
        let embedded = load_embedded(&source).expect("embedded");
        assert_eq!(embedded.natural_size, Some((1, 1)));
        assert!(embedded.href.starts_with("data:image/png;base64,"));
    }

    #[test]
    fn test_load_embedded_rejects_urls_and_garbage() {
        let url = ImageSource::Url {
            url: "https://example.com/a.png".to_string(),
        };
        assert!(load_embedded(&url).is_err());

        let garbage = ImageSource::Data {
            format: ImageFormat::Png,
            uri: "data:image/png;base64,AAAA".to_string(),
        };
        assert!(load_embedded(&garbage).is_err());
    }

    #[test]
    fn test_load_embedded_svg_keeps_uri() {
        let uri = "data:image/svg+xml,%3Csvg xmlns='http://www.w3.org/2000/svg' width='4' height='4'%3E%3Crect width='4' height='4'/%3E%3C/svg%3E";
        let source = ImageSource::Data {
            format: ImageFormat::Svg,
            uri: uri.to_string(),
        };
        let embedded = load_embedded(&source).expect("svg");
        assert_eq!(embedded.href, uri);
    }
}
