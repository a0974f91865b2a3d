//! The rendered surface: what is actually on screen.
//!
//! A [`Surface`] is built from the store plus anything the host shows that
//! has not been committed yet (inline text drafts, a live resize box). Export
//! captures the surface, never the store, so uncommitted edits are part of
//! the exported page.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::config::EditorConfig;
use crate::interaction::ResizeComplete;
use crate::{ElementId, ElementKind, ElementStore, ImageSource, TextStyle, Transform};

/// Visual content of a surface node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum NodeContent {
    /// Text box.
    Text {
        /// Displayed text (draft if one is open).
        text: String,
        /// Font attributes.
        style: TextStyle,
        /// Draw the selection outline.
        outlined: bool,
    },
    /// Image box.
    Image {
        /// Image reference.
        src: ImageSource,
    },
}

/// One element as rendered.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SurfaceNode {
    /// Source element.
    pub id: ElementId,
    /// Rendered box.
    pub frame: Transform,
    /// Rendered content.
    pub content: NodeContent,
}

/// The rendered canvas region.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Surface {
    /// Canvas width in pixels.
    pub width: f32,
    /// Canvas height in pixels.
    pub height: f32,
    /// Background CSS colour.
    pub background: String,
    /// Border colour, if any.
    pub border_color: Option<String>,
    /// Selection outline colour.
    pub outline_color: String,
    /// Nodes in paint order (last on top).
    pub nodes: Vec<SurfaceNode>,
}

impl Surface {
    /// Render the store as it would appear with no pending edits.
    #[must_use]
    pub fn from_store(store: &ElementStore, config: &EditorConfig) -> Self {
        Self::render(store, config, &HashMap::new(), None)
    }

    /// Render the store with uncommitted drafts and a live resize box applied.
    #[must_use]
    pub fn render(
        store: &ElementStore,
        config: &EditorConfig,
        drafts: &HashMap<ElementId, String>,
        resizing: Option<ResizeComplete>,
    ) -> Self {
        let selected = store.selected();
        let nodes = store
            .elements()
            .iter()
            .map(|el| {
                let frame = resizing
                    .filter(|r| r.id == el.id)
                    .map_or(el.transform, |r| r.transform);
                let content = match &el.kind {
                    ElementKind::Text { content, style } => NodeContent::Text {
                        text: drafts.get(&el.id).unwrap_or(content).clone(),
                        style: style.clone(),
                        outlined: selected == Some(el.id),
                    },
                    ElementKind::Image { src } => NodeContent::Image { src: src.clone() },
                };
                SurfaceNode {
                    id: el.id,
                    frame,
                    content,
                }
            })
            .collect();

        Self {
            width: config.canvas_width,
            height: config.canvas_height,
            background: config.background.clone(),
            border_color: config.border_color.clone(),
            outline_color: config.selection_outline.clone(),
            nodes,
        }
    }

    /// Topmost node under the canvas-local point.
    #[must_use]
    pub fn hit_test(&self, x: f32, y: f32) -> Option<ElementId> {
        self.nodes
            .iter()
            .rev()
            .find(|n| n.frame.contains(x, y))
            .map(|n| n.id)
    }

    /// Serialize the surface to JSON for the host page.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> crate::CanvasResult<String> {
        Ok(serde_json::to_string(self)?)
    }
}
