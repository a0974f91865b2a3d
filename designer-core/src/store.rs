//! The element store: the ordered list of elements on the canvas plus the
//! single selection pointer.
//!
//! Insertion order is render order, so the last element is drawn on top and
//! wins hit tests. Lookup misses (`update`/`delete` on an unknown id) are
//! silent no-ops.

use serde::{Deserialize, Serialize};

use crate::config::GeometryPolicy;
use crate::{Element, ElementId, ElementPatch, ImageSource, Transform};

/// Default font step used by [`ElementStore::new`].
const DEFAULT_FONT_STEP: f32 = 2.0;

/// Default font floor used by [`ElementStore::new`].
const DEFAULT_MIN_FONT_SIZE: f32 = 8.0;

/// Owned, mutable element storage for one editing session.
///
/// # Example
///
/// ```
/// use designer_core::ElementStore;
///
/// let mut store = ElementStore::new(800.0, 600.0);
/// let id = store.add_text();
/// store.select(Some(id));
/// assert!(store.delete(id));
/// assert!(store.selected().is_none());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ElementStore {
    elements: Vec<Element>,
    selected: Option<ElementId>,
    revision: u64,
    canvas_width: f32,
    canvas_height: f32,
    policy: GeometryPolicy,
    font_step: f32,
    min_font_size: f32,
}

impl ElementStore {
    /// Create an empty store for a canvas of the given size, with no clamping.
    #[must_use]
    pub fn new(canvas_width: f32, canvas_height: f32) -> Self {
        Self {
            elements: Vec::new(),
            selected: None,
            revision: 0,
            canvas_width,
            canvas_height,
            policy: GeometryPolicy::default(),
            font_step: DEFAULT_FONT_STEP,
            min_font_size: DEFAULT_MIN_FONT_SIZE,
        }
    }

    /// Set the geometry clamping policy.
    #[must_use]
    pub fn with_policy(mut self, policy: GeometryPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Set the font step and decrement floor.
    #[must_use]
    pub fn with_font_steps(mut self, step: f32, min_size: f32) -> Self {
        self.font_step = step;
        self.min_font_size = min_size;
        self
    }

    /// Append a text element with default content, style and placement.
    pub fn add_text(&mut self) -> ElementId {
        self.push(Element::default_text())
    }

    /// Append an image element at the default placement.
    ///
    /// A `None` source (cancelled picker, unreadable file) adds nothing.
    pub fn add_image(&mut self, source: Option<ImageSource>) -> Option<ElementId> {
        let Some(src) = source else {
            tracing::debug!("image source unresolved, nothing added");
            return None;
        };
        Some(self.push(Element::image(src)))
    }

    /// Append an already-built element.
    ///
    /// An element whose id is already present is rejected and `None` returned.
    pub fn insert(&mut self, element: Element) -> Option<ElementId> {
        if self.contains(element.id) {
            tracing::warn!(id = %element.id, "duplicate element id rejected");
            return None;
        }
        Some(self.push(element))
    }

    fn push(&mut self, mut element: Element) -> ElementId {
        let id = element.id;
        element.transform = self.clamp(element.transform);
        tracing::debug!(%id, text = element.is_text(), "element added");
        self.elements.push(element);
        self.bump();
        id
    }

    /// Merge `patch` into the element with `id`.
    ///
    /// Returns `true` if the element exists and an attribute changed. Other
    /// elements are never touched.
    pub fn update(&mut self, id: ElementId, patch: &ElementPatch) -> bool {
        let clamped = {
            let Some(element) = self.elements.iter_mut().find(|e| e.id == id) else {
                tracing::trace!(%id, "update on unknown element ignored");
                return false;
            };
            let mut changed = element.apply(patch);
            let t = element.transform;
            let bounded = clamp_transform(
                t,
                self.policy,
                self.canvas_width,
                self.canvas_height,
            );
            if bounded != t {
                element.transform = bounded;
                changed = true;
            }
            changed
        };
        if clamped {
            self.bump();
        }
        clamped
    }

    /// Remove the element with `id`, clearing the selection if it pointed at it.
    ///
    /// Returns `true` if an element was removed.
    pub fn delete(&mut self, id: ElementId) -> bool {
        let before = self.elements.len();
        self.elements.retain(|e| e.id != id);
        if self.elements.len() == before {
            tracing::trace!(%id, "delete on unknown element ignored");
            return false;
        }
        if self.selected == Some(id) {
            self.selected = None;
        }
        tracing::debug!(%id, "element deleted");
        self.bump();
        true
    }

    /// Set or clear the selection.
    ///
    /// Selecting an id that is not in the store clears the selection, so the
    /// pointer never dangles.
    pub fn select(&mut self, id: Option<ElementId>) {
        let next = id.filter(|id| self.contains(*id));
        if id.is_some() && next.is_none() {
            tracing::debug!("select on unknown element, clearing selection");
        }
        if next != self.selected {
            self.selected = next;
            self.bump();
        }
    }

    /// Raise a text element's font size by one step.
    ///
    /// Returns the new size, or `None` for images and unknown ids.
    pub fn increase_font_size(&mut self, id: ElementId) -> Option<f32> {
        let current = self.get(id)?.text_style()?.font_size;
        let next = current + self.font_step;
        self.update(
            id,
            &ElementPatch {
                font_size: Some(next),
                ..ElementPatch::default()
            },
        );
        Some(next)
    }

    /// Lower a text element's font size by one step, never below the floor.
    ///
    /// Returns the new size, or `None` for images and unknown ids.
    pub fn decrease_font_size(&mut self, id: ElementId) -> Option<f32> {
        let current = self.get(id)?.text_style()?.font_size;
        let next = (current - self.font_step).max(self.min_font_size);
        self.update(
            id,
            &ElementPatch {
                font_size: Some(next),
                ..ElementPatch::default()
            },
        );
        Some(next)
    }

    /// Get an element by ID.
    #[must_use]
    pub fn get(&self, id: ElementId) -> Option<&Element> {
        self.elements.iter().find(|e| e.id == id)
    }

    /// Whether an element with `id` exists.
    #[must_use]
    pub fn contains(&self, id: ElementId) -> bool {
        self.elements.iter().any(|e| e.id == id)
    }

    /// All elements in insertion (render) order.
    #[must_use]
    pub fn elements(&self) -> &[Element] {
        &self.elements
    }

    /// Currently selected element ID.
    #[must_use]
    pub fn selected(&self) -> Option<ElementId> {
        self.selected
    }

    /// Currently selected element.
    #[must_use]
    pub fn selected_element(&self) -> Option<&Element> {
        self.selected.and_then(|id| self.get(id))
    }

    /// Topmost element containing the canvas-local point.
    #[must_use]
    pub fn element_at(&self, x: f32, y: f32) -> Option<ElementId> {
        self.elements
            .iter()
            .rev()
            .find(|e| e.contains_point(x, y))
            .map(|e| e.id)
    }

    /// Number of elements.
    #[must_use]
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    /// Whether the store holds no elements.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Counter bumped on every effective mutation.
    ///
    /// Hosts compare it against the last rendered value to decide when to
    /// re-render.
    #[must_use]
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Canvas size the store clamps against.
    #[must_use]
    pub fn canvas_size(&self) -> (f32, f32) {
        (self.canvas_width, self.canvas_height)
    }

    fn clamp(&self, t: Transform) -> Transform {
        clamp_transform(t, self.policy, self.canvas_width, self.canvas_height)
    }

    fn bump(&mut self) {
        self.revision = self.revision.wrapping_add(1);
    }
}

/// Apply the geometry policy to a transform.
///
/// Minimum sizes are applied first; canvas clamping then shrinks boxes larger
/// than the canvas and pulls the origin back inside.
#[must_use]
pub fn clamp_transform(
    mut t: Transform,
    policy: GeometryPolicy,
    canvas_width: f32,
    canvas_height: f32,
) -> Transform {
    if let Some(min) = policy.min_width {
        t.width = t.width.max(min);
    }
    if let Some(min) = policy.min_height {
        t.height = t.height.max(min);
    }
    if policy.clamp_to_canvas {
        // A degenerate canvas clamps everything to the origin.
        let (cw, ch) = (canvas_width.max(0.0), canvas_height.max(0.0));
        t.width = t.width.min(cw);
        t.height = t.height.min(ch);
        t.x = t.x.clamp(0.0, (cw - t.width).max(0.0));
        t.y = t.y.clamp(0.0, (ch - t.height).max(0.0));
    }
    t
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ImageFormat;

    fn png_source() -> ImageSource {
        ImageSource::Data {
            format: ImageFormat::Png,
            uri: "data:image/png;base64,iVBORw0KGgo=".to_string(),
        }
    }

    #[test]
    fn test_add_counts_only_successful_adds() {
        let mut store = ElementStore::new(800.0, 600.0);
        store.add_text();
        assert!(store.add_image(None).is_none());
        assert!(store.add_image(Some(png_source())).is_some());
        store.add_text();
        assert_eq!(store.len(), 3);
    }

    #[test]
    fn test_add_image_defaults() {
        let mut store = ElementStore::new(800.0, 600.0);
        let id = store.add_image(Some(png_source())).expect("added");
        let el = store.get(id).expect("present");
        assert_eq!(el.transform, Transform::new(50.0, 50.0, 100.0, 100.0));
        assert_eq!(
            el.kind,
            crate::ElementKind::Image { src: png_source() }
        );
    }

    #[test]
    fn test_update_only_touches_target() {
        let mut store = ElementStore::new(800.0, 600.0);
        let a = store.add_text();
        let b = store.add_text();
        let before_b = store.get(b).cloned();

        assert!(store.update(a, &ElementPatch::position(5.0, 6.0)));
        assert_eq!(store.get(b).cloned(), before_b);
        let moved = store.get(a).expect("a");
        assert!((moved.transform.x - 5.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_update_unknown_is_noop() {
        let mut store = ElementStore::new(800.0, 600.0);
        store.add_text();
        let rev = store.revision();
        assert!(!store.update(ElementId::new(), &ElementPatch::position(1.0, 1.0)));
        assert_eq!(store.revision(), rev);
    }

    #[test]
    fn test_delete_clears_selection() {
        let mut store = ElementStore::new(800.0, 600.0);
        let first = store.add_text();
        let second = store.add_text();
        store.select(Some(first));

        assert!(store.delete(first));
        assert_eq!(store.len(), 1);
        assert_eq!(store.elements()[0].id, second);
        assert!(store.selected().is_none());
    }

    #[test]
    fn test_delete_other_keeps_selection() {
        let mut store = ElementStore::new(800.0, 600.0);
        let first = store.add_text();
        let second = store.add_text();
        store.select(Some(second));
        store.delete(first);
        assert_eq!(store.selected(), Some(second));
        assert!(!store.delete(first));
    }

    #[test]
    fn test_select_unknown_clears() {
        let mut store = ElementStore::new(800.0, 600.0);
        let id = store.add_text();
        store.select(Some(id));
        store.select(Some(ElementId::new()));
        assert!(store.selected().is_none());
    }

    #[test]
    fn test_font_size_steps_and_floor() {
        let mut store = ElementStore::new(800.0, 600.0);
        let id = store.add_text();
        assert_eq!(store.increase_font_size(id), Some(18.0));
        assert_eq!(store.increase_font_size(id), Some(20.0));

        store.update(
            id,
            &ElementPatch {
                font_size: Some(8.0),
                ..ElementPatch::default()
            },
        );
        assert_eq!(store.decrease_font_size(id), Some(8.0));
        store.update(
            id,
            &ElementPatch {
                font_size: Some(9.0),
                ..ElementPatch::default()
            },
        );
        assert_eq!(store.decrease_font_size(id), Some(8.0));
    }

    #[test]
    fn test_font_size_on_image_is_none() {
        let mut store = ElementStore::new(800.0, 600.0);
        let id = store.add_image(Some(png_source())).expect("added");
        assert_eq!(store.increase_font_size(id), None);
        assert_eq!(store.decrease_font_size(id), None);
    }

    #[test]
    fn test_element_at_prefers_last_inserted() {
        let mut store = ElementStore::new(800.0, 600.0);
        let below = store.add_text();
        let above = store.add_text();
        assert_eq!(store.element_at(60.0, 60.0), Some(above));
        store.delete(above);
        assert_eq!(store.element_at(60.0, 60.0), Some(below));
        assert_eq!(store.element_at(5.0, 5.0), None);
    }

    #[test]
    fn test_no_clamping_by_default() {
        let mut store = ElementStore::new(800.0, 600.0);
        let id = store.add_text();
        store.update(id, &ElementPatch::position(-10.0, -10.0));
        store.update(id, &ElementPatch::size(0.0, 0.0));
        let t = store.get(id).expect("el").transform;
        assert_eq!(t, Transform::new(-10.0, -10.0, 0.0, 0.0));
    }

    #[test]
    fn test_clamping_policy() {
        let policy = GeometryPolicy {
            min_width: Some(20.0),
            min_height: Some(10.0),
            clamp_to_canvas: true,
        };
        let mut store = ElementStore::new(800.0, 600.0).with_policy(policy);
        let id = store.add_text();
        store.update(id, &ElementPatch::position(-10.0, 590.0));
        store.update(id, &ElementPatch::size(1.0, 1.0));
        let t = store.get(id).expect("el").transform;
        assert!((t.x - 0.0).abs() < f32::EPSILON);
        assert!((t.width - 20.0).abs() < f32::EPSILON);
        assert!((t.height - 10.0).abs() < f32::EPSILON);
        assert!(t.y + t.height <= 600.0);
    }

    #[test]
    fn test_clamping_on_degenerate_canvas_pins_to_origin() {
        let policy = GeometryPolicy {
            clamp_to_canvas: true,
            ..GeometryPolicy::default()
        };
        let mut store = ElementStore::new(-1.0, 600.0).with_policy(policy);
        let id = store.add_text();
        let t = store.get(id).expect("el").transform;
        assert_eq!((t.x, t.width), (0.0, 0.0));

        let mut store = ElementStore::new(10.0, 10.0).with_policy(GeometryPolicy {
            min_width: Some(20.0),
            clamp_to_canvas: true,
            ..GeometryPolicy::default()
        });
        let id = store.add_text();
        let t = store.get(id).expect("el").transform;
        assert_eq!((t.x, t.y, t.width, t.height), (0.0, 0.0, 10.0, 10.0));
    }

    #[test]
    fn test_revision_tracks_mutations() {
        let mut store = ElementStore::new(800.0, 600.0);
        let r0 = store.revision();
        let id = store.add_text();
        let r1 = store.revision();
        assert!(r1 > r0);
        store.select(Some(id));
        assert!(store.revision() > r1);
        let r2 = store.revision();
        store.select(Some(id));
        assert_eq!(store.revision(), r2);
    }

    #[test]
    fn test_insert_rejects_duplicate_ids() {
        let mut store = ElementStore::new(800.0, 600.0);
        let el = Element::default_text();
        assert!(store.insert(el.clone()).is_some());
        assert!(store.insert(el).is_none());
        assert_eq!(store.len(), 1);
    }
}
