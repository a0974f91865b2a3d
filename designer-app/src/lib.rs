//! # Page Designer WASM Application
//!
//! Browser bindings for the page designer: the host page forwards pointer
//! and toolbar input into an [`EditorSession`], re-renders from the surface
//! JSON, and asks for a PDF download.
//!
//! ## Usage
//!
//! Build for WASM:
//! ```bash
//! wasm-pack build --target web designer-app
//! ```
//!
//! Then import in JavaScript:
//! ```javascript
//! import init, { DesignerApp } from './pkg/designer_app.js';
//!
//! await init();
//! const app = new DesignerApp();
//! const rect = canvas.getBoundingClientRect();
//! app.setCanvasRect(rect.left, rect.top, rect.width, rect.height);
//!
//! canvas.onmousedown = (e) => { app.pointerDown(e.clientX, e.clientY); redraw(); };
//! window.onmousemove = (e) => { app.pointerMove(e.clientX, e.clientY); redraw(); };
//! window.onmouseup = (e) => { app.pointerUp(e.clientX, e.clientY); redraw(); };
//! exportButton.onclick = () => app.exportPdf();
//! ```

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod download;

use designer_core::{
    resolve_bytes, resolve_url, CanvasRect, EditorConfig, EditorSession, ElementId, PointerEvent,
    FONT_FAMILIES,
};
use designer_export::{DocumentSink, ExportConfig, ExportPipeline, ExportReport, ExportResult};
use wasm_bindgen::prelude::*;

pub use download::DownloadSink;

/// Initialize the WASM module.
#[wasm_bindgen(start)]
pub fn init_wasm() {
    console_error_panic_hook::set_once();
    tracing::info!("Page Designer WASM initialized");
}

/// Editor instance driven by the host page.
#[wasm_bindgen]
pub struct DesignerApp {
    session: EditorSession,
    pipeline: ExportPipeline,
    download: DownloadSink,
    rect: CanvasRect,
}

#[wasm_bindgen]
impl DesignerApp {
    /// Create an editor, optionally from an `EditorConfig` JSON string.
    ///
    /// # Errors
    ///
    /// Returns an error string if the configuration is invalid.
    #[wasm_bindgen(constructor)]
    #[allow(clippy::needless_pass_by_value)]
    pub fn new(config_json: Option<String>) -> Result<DesignerApp, String> {
        let config = match config_json {
            Some(json) => EditorConfig::from_json(&json).map_err(|e| e.to_string())?,
            None => EditorConfig::default(),
        };
        let rect = CanvasRect::new(0.0, 0.0, config.canvas_width, config.canvas_height);
        let session = EditorSession::new(config).map_err(|e| e.to_string())?;
        Ok(Self {
            session,
            pipeline: ExportPipeline::with_defaults(),
            download: DownloadSink::new(),
            rect,
        })
    }

    /// Replace the export settings from an `ExportConfig` JSON string.
    ///
    /// # Errors
    ///
    /// Returns an error string if JSON parsing fails.
    #[wasm_bindgen(js_name = setExportConfig)]
    pub fn set_export_config(&mut self, json: &str) -> Result<(), String> {
        let config: ExportConfig = serde_json::from_str(json).map_err(|e| e.to_string())?;
        self.pipeline = ExportPipeline::new(&config);
        Ok(())
    }

    /// Record where the canvas sits on the page, in client coordinates.
    #[wasm_bindgen(js_name = setCanvasRect)]
    pub fn set_canvas_rect(&mut self, left: f32, top: f32, width: f32, height: f32) {
        self.rect = CanvasRect::new(left, top, width, height);
    }

    /// Add a default text element and return its id.
    #[wasm_bindgen(js_name = addText)]
    pub fn add_text(&mut self) -> String {
        self.session.add_text().to_string()
    }

    /// Add an image from file contents. Returns `None` if the bytes are not
    /// a recognised image.
    #[wasm_bindgen(js_name = addImageFromBytes)]
    #[allow(clippy::needless_pass_by_value)]
    pub fn add_image_from_bytes(&mut self, bytes: &[u8], mime: Option<String>) -> Option<String> {
        let source = resolve_bytes(bytes, mime.as_deref());
        self.session.add_image(source).map(|id| id.to_string())
    }

    /// Add an image from a prompted URL. Returns `None` for blank input.
    #[wasm_bindgen(js_name = addImageFromUrl)]
    pub fn add_image_from_url(&mut self, input: &str) -> Option<String> {
        self.session.add_image(resolve_url(input)).map(|id| id.to_string())
    }

    /// Button press at client coordinates, hit-tested against the surface.
    #[wasm_bindgen(js_name = pointerDown)]
    pub fn pointer_down(&mut self, client_x: f32, client_y: f32) {
        let (x, y) = self.rect.to_local(client_x, client_y);
        let event = match self.session.surface().hit_test(x, y) {
            Some(id) => PointerEvent::press_on(id, client_x, client_y),
            None => PointerEvent::press_background(client_x, client_y),
        };
        self.session.pointer(&event, &self.rect);
    }

    /// Button press the page already routed to an element.
    ///
    /// # Errors
    ///
    /// Returns an error string if `id` is not a valid element id.
    #[wasm_bindgen(js_name = pointerDownOn)]
    pub fn pointer_down_on(&mut self, id: &str, client_x: f32, client_y: f32) -> Result<(), String> {
        let id = parse_id(id)?;
        self.session
            .pointer(&PointerEvent::press_on(id, client_x, client_y), &self.rect);
        Ok(())
    }

    /// Pointer move at client coordinates.
    #[wasm_bindgen(js_name = pointerMove)]
    pub fn pointer_move(&mut self, client_x: f32, client_y: f32) {
        self.session
            .pointer(&PointerEvent::moved(client_x, client_y), &self.rect);
    }

    /// Button release at client coordinates.
    #[wasm_bindgen(js_name = pointerUp)]
    pub fn pointer_up(&mut self, client_x: f32, client_y: f32) {
        self.session
            .pointer(&PointerEvent::release(client_x, client_y), &self.rect);
    }

    /// Select an element by id, or clear the selection with `None`.
    ///
    /// # Errors
    ///
    /// Returns an error string if `id` is not a valid element id.
    #[allow(clippy::needless_pass_by_value)]
    pub fn select(&mut self, id: Option<String>) -> Result<(), String> {
        let id = id.as_deref().map(parse_id).transpose()?;
        self.session.select(id);
        Ok(())
    }

    /// Id of the selected element.
    #[wasm_bindgen(js_name = selectedId)]
    #[must_use]
    pub fn selected_id(&self) -> Option<String> {
        self.session.store().selected().map(|id| id.to_string())
    }

    /// Delete the selected element, returning its id.
    #[wasm_bindgen(js_name = deleteSelected)]
    pub fn delete_selected(&mut self) -> Option<String> {
        self.session.delete_selected().map(|id| id.to_string())
    }

    /// Grow the selected text by one step. Returns the new size.
    #[wasm_bindgen(js_name = increaseFontSize)]
    pub fn increase_font_size(&mut self) -> Option<f32> {
        self.session.increase_font_size()
    }

    /// Shrink the selected text by one step. Returns the new size.
    #[wasm_bindgen(js_name = decreaseFontSize)]
    pub fn decrease_font_size(&mut self) -> Option<f32> {
        self.session.decrease_font_size()
    }

    /// Set the selected text's colour.
    #[wasm_bindgen(js_name = setFontColor)]
    pub fn set_font_color(&mut self, color: &str) -> bool {
        self.session.set_font_color(color)
    }

    /// Set the selected text's font family.
    #[wasm_bindgen(js_name = setFontFamily)]
    pub fn set_font_family(&mut self, family: &str) -> bool {
        self.session.set_font_family(family)
    }

    /// Font families offered in the style controls.
    #[wasm_bindgen(js_name = fontFamilies)]
    #[must_use]
    pub fn font_families() -> Vec<String> {
        FONT_FAMILIES.iter().map(ToString::to_string).collect()
    }

    /// Start editing a text element in place.
    ///
    /// # Errors
    ///
    /// Returns an error string if the element is missing or not text.
    #[wasm_bindgen(js_name = beginTextEdit)]
    pub fn begin_text_edit(&mut self, id: &str) -> Result<(), String> {
        let id = parse_id(id)?;
        self.session.begin_text_edit(id).map_err(|e| e.to_string())
    }

    /// Replace the draft of an element being edited.
    ///
    /// # Errors
    ///
    /// Returns an error string if no edit is open for the element.
    #[wasm_bindgen(js_name = editText)]
    pub fn edit_text(&mut self, id: &str, text: &str) -> Result<(), String> {
        let id = parse_id(id)?;
        self.session.edit_text(id, text).map_err(|e| e.to_string())
    }

    /// Write the draft back to the element.
    ///
    /// # Errors
    ///
    /// Returns an error string if `id` is not a valid element id.
    #[wasm_bindgen(js_name = commitTextEdit)]
    pub fn commit_text_edit(&mut self, id: &str) -> Result<bool, String> {
        let id = parse_id(id)?;
        Ok(self.session.commit_text_edit(id))
    }

    /// Discard the draft.
    ///
    /// # Errors
    ///
    /// Returns an error string if `id` is not a valid element id.
    #[wasm_bindgen(js_name = cancelTextEdit)]
    pub fn cancel_text_edit(&mut self, id: &str) -> Result<(), String> {
        let id = parse_id(id)?;
        self.session.cancel_text_edit(id);
        Ok(())
    }

    /// The rendered surface as JSON, for the page to draw from.
    ///
    /// # Errors
    ///
    /// Returns an error string if serialization fails.
    #[wasm_bindgen(js_name = getSurfaceJson)]
    pub fn get_surface_json(&self) -> Result<String, String> {
        self.session.surface().to_json().map_err(|e| e.to_string())
    }

    /// Controller state as JSON.
    ///
    /// # Errors
    ///
    /// Returns an error string if serialization fails.
    #[wasm_bindgen(js_name = getInteractionState)]
    pub fn get_interaction_state(&self) -> Result<String, String> {
        serde_json::to_string(&self.session.interaction_state()).map_err(|e| e.to_string())
    }

    /// Store revision; changes whenever the elements change.
    #[must_use]
    pub fn revision(&self) -> u64 {
        self.session.store().revision()
    }

    /// Number of elements on the canvas.
    #[wasm_bindgen(js_name = elementCount)]
    #[must_use]
    pub fn element_count(&self) -> usize {
        self.session.store().len()
    }

    /// Export the canvas as it is currently shown and download it.
    /// Returns the downloaded filename.
    ///
    /// # Errors
    ///
    /// Returns an error string if capture, encoding or the download fails.
    #[wasm_bindgen(js_name = exportPdf)]
    pub fn export_pdf(&mut self) -> Result<String, String> {
        self.pipeline
            .export(&self.session.surface(), &mut self.download)
            .map(|report| report.filename)
            .map_err(|e| e.to_string())
    }
}

impl DesignerApp {
    /// Export into any sink.
    ///
    /// # Errors
    ///
    /// Returns the pipeline's error; the sink is not called on failure.
    pub fn export_to(&self, sink: &mut dyn DocumentSink) -> ExportResult<ExportReport> {
        self.pipeline.export(&self.session.surface(), sink)
    }

    /// The underlying session.
    #[must_use]
    pub fn session(&self) -> &EditorSession {
        &self.session
    }
}

fn parse_id(id: &str) -> Result<ElementId, String> {
    ElementId::parse(id).ok_or_else(|| format!("Invalid element id: {id}"))
}
