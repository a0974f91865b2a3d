//! An editing session: store, pointer controller and inline edits wired
//! together behind the operations the toolbar and canvas call.

use std::collections::HashMap;

use crate::config::EditorConfig;
use crate::event::{CanvasRect, PointerEvent};
use crate::interaction::{Interaction, InteractionState};
use crate::surface::Surface;
use crate::{CanvasError, CanvasResult, ElementId, ElementPatch, ElementStore, ImageSource};

/// One page-editing session.
#[derive(Debug, Clone)]
pub struct EditorSession {
    config: EditorConfig,
    store: ElementStore,
    interaction: Interaction,
    drafts: HashMap<ElementId, String>,
}

impl EditorSession {
    /// Create a session with the given configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn new(config: EditorConfig) -> CanvasResult<Self> {
        config.validate()?;
        let store = ElementStore::new(config.canvas_width, config.canvas_height)
            .with_policy(config.geometry)
            .with_font_steps(config.font_step, config.min_font_size);
        let interaction = Interaction::new(config.background_press);
        Ok(Self {
            config,
            store,
            interaction,
            drafts: HashMap::new(),
        })
    }

    /// Session configuration.
    #[must_use]
    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    /// The element store.
    #[must_use]
    pub fn store(&self) -> &ElementStore {
        &self.store
    }

    /// Mutable access to the element store.
    pub fn store_mut(&mut self) -> &mut ElementStore {
        &mut self.store
    }

    /// Pointer controller state.
    #[must_use]
    pub fn interaction_state(&self) -> InteractionState {
        self.interaction.state()
    }

    /// Add a default text element.
    pub fn add_text(&mut self) -> ElementId {
        self.store.add_text()
    }

    /// Add an image element; an unresolved source adds nothing.
    pub fn add_image(&mut self, source: Option<ImageSource>) -> Option<ElementId> {
        self.store.add_image(source)
    }

    /// Select an element, or clear the selection.
    pub fn select(&mut self, id: Option<ElementId>) {
        self.store.select(id);
    }

    /// Delete an element and drop any draft for it.
    pub fn delete(&mut self, id: ElementId) -> bool {
        self.drafts.remove(&id);
        self.store.delete(id)
    }

    /// Delete the selected element.
    pub fn delete_selected(&mut self) -> Option<ElementId> {
        let id = self.store.selected()?;
        self.delete(id).then_some(id)
    }

    /// Feed one pointer event through the controller.
    pub fn pointer(&mut self, event: &PointerEvent, rect: &CanvasRect) {
        self.interaction.pointer(&mut self.store, rect, event);
    }

    /// Raise the selected text's font size.
    pub fn increase_font_size(&mut self) -> Option<f32> {
        let id = self.store.selected()?;
        self.store.increase_font_size(id)
    }

    /// Lower the selected text's font size, floored at the configured minimum.
    pub fn decrease_font_size(&mut self) -> Option<f32> {
        let id = self.store.selected()?;
        self.store.decrease_font_size(id)
    }

    /// Set the selected text's colour.
    pub fn set_font_color(&mut self, color: &str) -> bool {
        self.patch_selected(ElementPatch {
            color: Some(color.to_string()),
            ..ElementPatch::default()
        })
    }

    /// Set the selected text's font family.
    pub fn set_font_family(&mut self, family: &str) -> bool {
        self.patch_selected(ElementPatch {
            font_family: Some(family.to_string()),
            ..ElementPatch::default()
        })
    }

    fn patch_selected(&mut self, patch: ElementPatch) -> bool {
        match self.store.selected() {
            Some(id) => self.store.update(id, &patch),
            None => false,
        }
    }

    /// Open an inline edit on a text element, seeded with its current text.
    ///
    /// # Errors
    ///
    /// Returns an error if the element does not exist or is not text.
    pub fn begin_text_edit(&mut self, id: ElementId) -> CanvasResult<()> {
        let element = self
            .store
            .get(id)
            .ok_or_else(|| CanvasError::ElementNotFound(id.to_string()))?;
        let crate::ElementKind::Text { content, .. } = &element.kind else {
            return Err(CanvasError::InvalidOperation(format!(
                "element {id} is not text"
            )));
        };
        self.drafts.insert(id, content.clone());
        Ok(())
    }

    /// Replace the draft text of an open inline edit.
    ///
    /// Opens the edit first if needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the element does not exist or is not text.
    pub fn edit_text(&mut self, id: ElementId, draft: &str) -> CanvasResult<()> {
        if !self.drafts.contains_key(&id) {
            self.begin_text_edit(id)?;
        }
        self.drafts.insert(id, draft.to_string());
        Ok(())
    }

    /// Commit the draft to the store (the blur of the inline editor).
    ///
    /// Returns `true` if the store changed.
    pub fn commit_text_edit(&mut self, id: ElementId) -> bool {
        let Some(draft) = self.drafts.remove(&id) else {
            return false;
        };
        self.store.update(id, &ElementPatch::content(draft))
    }

    /// Discard the draft.
    pub fn cancel_text_edit(&mut self, id: ElementId) {
        self.drafts.remove(&id);
    }

    /// Uncommitted draft text for an element.
    #[must_use]
    pub fn draft(&self, id: ElementId) -> Option<&str> {
        self.drafts.get(&id).map(String::as_str)
    }

    /// The canvas as currently rendered, drafts and live resize included.
    #[must_use]
    pub fn surface(&self) -> Surface {
        Surface::render(
            &self.store,
            &self.config,
            &self.drafts,
            self.interaction.resize_preview(),
        )
    }
}

impl Default for EditorSession {
    fn default() -> Self {
        let config = EditorConfig::default();
        let store = ElementStore::new(config.canvas_width, config.canvas_height);
        Self {
            interaction: Interaction::new(config.background_press),
            config,
            store,
            drafts: HashMap::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::NodeContent;

    #[test]
    fn font_controls_act_on_selection() {
        let mut session = EditorSession::default();
        assert_eq!(session.increase_font_size(), None);

        let id = session.add_text();
        session.select(Some(id));
        session.increase_font_size();
        assert_eq!(session.increase_font_size(), Some(20.0));

        assert!(session.set_font_color("#ff0000"));
        assert!(session.set_font_family("Courier New"));
        let style = session.store().get(id).and_then(|e| e.text_style()).expect("style");
        assert_eq!(style.color, "#ff0000");
        assert_eq!(style.font_family, "Courier New");
    }

    #[test]
    fn inline_edit_shows_on_surface_before_commit() {
        let mut session = EditorSession::default();
        let id = session.add_text();
        session.edit_text(id, "Hello draft").expect("edit");

        let surface = session.surface();
        assert!(matches!(
            &surface.nodes[0].content,
            NodeContent::Text { text, .. } if text == "Hello draft"
        ));
        assert!(matches!(
            &session.store().get(id).expect("el").kind,
            crate::ElementKind::Text { content, .. } if content == "New Text"
        ));

        assert!(session.commit_text_edit(id));
        assert!(session.draft(id).is_none());
        assert!(matches!(
            &session.store().get(id).expect("el").kind,
            crate::ElementKind::Text { content, .. } if content == "Hello draft"
        ));
    }

    #[test]
    fn cancel_discards_draft() {
        let mut session = EditorSession::default();
        let id = session.add_text();
        session.begin_text_edit(id).expect("begin");
        session.edit_text(id, "scratch").expect("edit");
        session.cancel_text_edit(id);
        assert!(!session.commit_text_edit(id));
    }

    #[test]
    fn text_edit_rejects_images_and_unknown_ids() {
        let mut session = EditorSession::default();
        let img = session
            .add_image(crate::resolve::resolve_url("https://example.com/a.png"))
            .expect("image");
        assert!(session.begin_text_edit(img).is_err());
        assert!(session.begin_text_edit(ElementId::new()).is_err());
    }

    #[test]
    fn delete_selected_clears_selection() {
        let mut session = EditorSession::default();
        let first = session.add_text();
        let second = session.add_text();
        session.select(Some(first));
        assert_eq!(session.delete_selected(), Some(first));
        assert_eq!(session.store().len(), 1);
        assert_eq!(session.store().elements()[0].id, second);
        assert!(session.store().selected().is_none());
        assert_eq!(session.delete_selected(), None);
    }

    #[test]
    fn invalid_config_is_rejected() {
        let config = EditorConfig {
            canvas_width: -1.0,
            ..EditorConfig::default()
        };
        assert!(EditorSession::new(config).is_err());
    }
}
