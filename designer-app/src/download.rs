//! Client-side download of exported documents.

use designer_export::{DocumentSink, ExportError, ExportResult};
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Blob, BlobPropertyBag, HtmlAnchorElement, Url};

/// Hands a document to the browser as a file download.
///
/// The bytes are wrapped in a `Blob`, exposed through an object URL and
/// clicked through a detached `<a download>` element. The object URL stays
/// alive until the next download, since revoking it straight after the click
/// can cancel the download in some browsers.
#[derive(Debug, Default, Clone)]
pub struct DownloadSink {
    pending: Option<String>,
}

impl DownloadSink {
    /// Create a download sink.
    #[must_use]
    pub const fn new() -> Self {
        Self { pending: None }
    }

    /// Object URL of the most recent download, still alive.
    #[must_use]
    pub fn pending_url(&self) -> Option<&str> {
        self.pending.as_deref()
    }

    /// Keep `url` alive and hand back the previous one for revocation.
    fn replace_pending(&mut self, url: String) -> Option<String> {
        self.pending.replace(url)
    }
}

impl DocumentSink for DownloadSink {
    fn save(&mut self, filename: &str, mime_type: &str, bytes: &[u8]) -> ExportResult<()> {
        let window = web_sys::window().ok_or_else(|| ExportError::Save("No window object".to_string()))?;
        let document = window
            .document()
            .ok_or_else(|| ExportError::Save("No document object".to_string()))?;

        let parts = js_sys::Array::new();
        parts.push(&js_sys::Uint8Array::from(bytes));
        let options = BlobPropertyBag::new();
        options.set_type(mime_type);
        let blob = Blob::new_with_u8_array_sequence_and_options(&parts, &options).map_err(js_error)?;
        let url = Url::create_object_url_with_blob(&blob).map_err(js_error)?;

        let anchor = document
            .create_element("a")
            .map_err(js_error)?
            .dyn_into::<HtmlAnchorElement>()
            .map_err(|_| ExportError::Save("Element is not an anchor".to_string()))?;
        anchor.set_href(&url);
        anchor.set_download(filename);
        anchor.click();

        if let Some(previous) = self.replace_pending(url) {
            if let Err(e) = Url::revoke_object_url(&previous) {
                tracing::warn!("failed to revoke object URL: {e:?}");
            }
        }
        tracing::info!(filename, bytes = bytes.len(), "download triggered");
        Ok(())
    }
}

fn js_error(value: JsValue) -> ExportError {
    ExportError::Save(format!("{value:?}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn replace_pending_returns_previous_url() {
        let mut sink = DownloadSink::new();
        assert_eq!(sink.replace_pending("blob:a".to_string()), None);
        assert_eq!(sink.pending_url(), Some("blob:a"));
        assert_eq!(
            sink.replace_pending("blob:b".to_string()),
            Some("blob:a".to_string())
        );
        assert_eq!(sink.pending_url(), Some("blob:b"));
    }
}
