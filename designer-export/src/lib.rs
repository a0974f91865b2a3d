//! # Page Designer Export
//!
//! Turns the rendered canvas into a downloadable document.
//!
//! ## Pipeline
//!
//! ```text
//! ┌──────────┐   ┌──────────────┐   ┌─────────────────┐   ┌──────────────┐
//! │ Surface  │──▶│   Capture    │──▶│ DocumentEncoder │──▶│ DocumentSink │
//! │ (core)   │   │ SVG→resvg→PNG│   │ PNG→1-page PDF  │   │ file/download│
//! └──────────┘   └──────────────┘   └─────────────────┘   └──────────────┘
//! ```
//!
//! Capture reads the surface, not the element store, so whatever is on
//! screen at export time (uncommitted text drafts, a resize in progress)
//! is what ends up in the document.

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod capture;
pub mod document;
pub mod embed;
pub mod error;
pub mod pipeline;
pub mod sink;

pub use capture::{Capture, Raster, SvgCapture};
pub use document::{DocumentEncoder, PagedDocument, PdfEncoder};
pub use error::{ExportError, ExportResult};
pub use pipeline::{ExportConfig, ExportPipeline, ExportReport, DEFAULT_FILENAME};
pub use sink::{DirectorySink, DocumentSink, MemorySink, SavedDocument};
