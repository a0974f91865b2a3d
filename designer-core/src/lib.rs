//! # Page Designer Core
//!
//! Editing model for a fixed-size page: text and image boxes that the user
//! adds, drags, resizes and styles before exporting the page as a document.
//! Compiles to WASM so the same model drives the browser editor.
//!
//! ## Architecture
//!
//! ```text
//! pointer / toolbar events
//!          │
//!          ▼
//! ┌──────────────────┐     ┌──────────────────┐
//! │   Interaction    │────▶│   ElementStore   │
//! │ - DragGesture    │     │ - ordered boxes  │
//! │ - ResizeGesture  │     │ - one selection  │
//! └──────────────────┘     └────────┬─────────┘
//!                                   │ + drafts, live resize
//!                                   ▼
//!                          ┌──────────────────┐
//!                          │     Surface      │──▶ export (designer-export)
//!                          └──────────────────┘
//! ```

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod element;
pub mod error;
pub mod event;
pub mod interaction;
pub mod resolve;
pub mod session;
pub mod store;
pub mod surface;

pub use config::{BackgroundPress, EditorConfig, GeometryPolicy};
pub use element::{
    Element, ElementId, ElementKind, ElementPatch, ImageFormat, ImageSource, TextStyle, Transform,
    FONT_FAMILIES,
};
pub use error::{CanvasError, CanvasResult};
pub use event::{CanvasRect, PointerEvent, PointerPhase, PointerTarget};
pub use interaction::{
    DragGesture, HandleKind, Interaction, InteractionState, ResizeComplete, ResizeGesture,
};
pub use resolve::{resolve_bytes, resolve_url};
pub use session::EditorSession;
pub use store::ElementStore;
pub use surface::{NodeContent, Surface, SurfaceNode};

/// Designer core version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
