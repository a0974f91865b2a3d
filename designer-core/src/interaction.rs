//! Direct manipulation: turning pointer events into store mutations.
//!
//! Dragging and resizing are two independent gestures. [`DragGesture`]
//! writes the element position to the store on every move. [`ResizeGesture`]
//! tracks the pointer privately and reports a single [`ResizeComplete`] on
//! release, which is the only thing applied to the store. [`Interaction`]
//! routes events between the two and exposes the combined state.

use serde::{Deserialize, Serialize};

use crate::config::BackgroundPress;
use crate::event::{CanvasRect, PointerEvent, PointerPhase, PointerTarget};
use crate::{ElementId, ElementPatch, ElementStore, Transform};

/// Hit radius of a resize handle, in canvas pixels.
pub const HANDLE_HIT_TOLERANCE: f32 = 6.0;

/// Combined controller state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", content = "id", rename_all = "lowercase")]
pub enum InteractionState {
    /// No gesture in progress.
    #[default]
    Idle,
    /// An element is following the pointer.
    Dragging(ElementId),
    /// An element is being resized.
    Resizing(ElementId),
}

/// Resize handle positions around an element box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HandleKind {
    /// Top-left corner.
    TopLeft,
    /// Top edge midpoint.
    Top,
    /// Top-right corner.
    TopRight,
    /// Right edge midpoint.
    Right,
    /// Bottom-right corner.
    BottomRight,
    /// Bottom edge midpoint.
    Bottom,
    /// Bottom-left corner.
    BottomLeft,
    /// Left edge midpoint.
    Left,
}

impl HandleKind {
    /// All handles, corners first so they win over edges when both are in reach.
    pub const ALL: [Self; 8] = [
        Self::TopLeft,
        Self::TopRight,
        Self::BottomRight,
        Self::BottomLeft,
        Self::Top,
        Self::Right,
        Self::Bottom,
        Self::Left,
    ];

    /// Canvas-local position of this handle on `t`.
    #[must_use]
    pub fn position(self, t: &Transform) -> (f32, f32) {
        let (l, c, r) = (t.x, t.x + t.width / 2.0, t.x + t.width);
        let (top, m, b) = (t.y, t.y + t.height / 2.0, t.y + t.height);
        match self {
            Self::TopLeft => (l, top),
            Self::Top => (c, top),
            Self::TopRight => (r, top),
            Self::Right => (r, m),
            Self::BottomRight => (r, b),
            Self::Bottom => (c, b),
            Self::BottomLeft => (l, b),
            Self::Left => (l, m),
        }
    }

    /// Handle within `tolerance` of the canvas-local point, if any.
    #[must_use]
    pub fn hit(t: &Transform, x: f32, y: f32, tolerance: f32) -> Option<Self> {
        Self::ALL.into_iter().find(|h| {
            let (hx, hy) = h.position(t);
            let (dx, dy) = (x - hx, y - hy);
            dx * dx + dy * dy <= tolerance * tolerance
        })
    }

    const fn moves_left(self) -> bool {
        matches!(self, Self::TopLeft | Self::Left | Self::BottomLeft)
    }

    const fn moves_right(self) -> bool {
        matches!(self, Self::TopRight | Self::Right | Self::BottomRight)
    }

    const fn moves_top(self) -> bool {
        matches!(self, Self::TopLeft | Self::Top | Self::TopRight)
    }

    const fn moves_bottom(self) -> bool {
        matches!(self, Self::BottomLeft | Self::Bottom | Self::BottomRight)
    }
}

/// Drag-to-reposition gesture.
#[derive(Debug, Clone, Default)]
pub struct DragGesture {
    active: Option<ElementId>,
}

impl DragGesture {
    /// Start dragging `id`.
    pub fn begin(&mut self, id: ElementId) {
        tracing::debug!(%id, "drag started");
        self.active = Some(id);
    }

    /// Move the dragged element so its top-left sits under the pointer.
    ///
    /// No smoothing and no bounds: the store's geometry policy is the only
    /// clamp. Returns `true` if the store changed.
    pub fn track(&self, store: &mut ElementStore, rect: &CanvasRect, client_x: f32, client_y: f32) -> bool {
        let Some(id) = self.active else {
            return false;
        };
        let (x, y) = rect.to_local(client_x, client_y);
        store.update(id, &ElementPatch::position(x, y))
    }

    /// Finish the drag; the last position stays.
    pub fn end(&mut self) -> Option<ElementId> {
        let id = self.active.take();
        if let Some(id) = id {
            tracing::debug!(%id, "drag ended");
        }
        id
    }

    /// Element being dragged.
    #[must_use]
    pub fn active(&self) -> Option<ElementId> {
        self.active
    }
}

/// Completion report of a resize gesture.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ResizeComplete {
    /// Resized element.
    pub id: ElementId,
    /// Final box.
    pub transform: Transform,
}

impl ResizeComplete {
    /// Write the final box to the store.
    pub fn apply(&self, store: &mut ElementStore) -> bool {
        store.update(self.id, &ElementPatch::transform(self.transform))
    }
}

#[derive(Debug, Clone, Copy)]
struct ActiveResize {
    id: ElementId,
    handle: HandleKind,
    origin: Transform,
    start: (f32, f32),
    current: Transform,
}

/// Handle-driven resize gesture with its own pointer tracking.
#[derive(Debug, Clone, Default)]
pub struct ResizeGesture {
    active: Option<ActiveResize>,
}

impl ResizeGesture {
    /// Start resizing `id` from `handle`, with the pointer at canvas-local `start`.
    pub fn begin(&mut self, id: ElementId, handle: HandleKind, origin: Transform, start: (f32, f32)) {
        tracing::debug!(%id, ?handle, "resize started");
        self.active = Some(ActiveResize {
            id,
            handle,
            origin,
            start,
            current: origin,
        });
    }

    /// Follow the pointer; returns the preview box.
    ///
    /// Left and top handles move the origin so the opposite edge stays put.
    /// Sizes never go below zero.
    pub fn track(&mut self, x: f32, y: f32) -> Option<Transform> {
        let active = self.active.as_mut()?;
        let (dx, dy) = (x - active.start.0, y - active.start.1);
        let o = active.origin;
        let h = active.handle;
        let mut t = o;

        if h.moves_right() {
            t.width = (o.width + dx).max(0.0);
        } else if h.moves_left() {
            t.width = (o.width - dx).max(0.0);
            t.x = o.x + o.width - t.width;
        }
        if h.moves_bottom() {
            t.height = (o.height + dy).max(0.0);
        } else if h.moves_top() {
            t.height = (o.height - dy).max(0.0);
            t.y = o.y + o.height - t.height;
        }

        active.current = t;
        Some(t)
    }

    /// Finish the gesture and report the final box.
    pub fn release(&mut self) -> Option<ResizeComplete> {
        let active = self.active.take()?;
        tracing::debug!(id = %active.id, "resize complete");
        Some(ResizeComplete {
            id: active.id,
            transform: active.current,
        })
    }

    /// Abandon the gesture without reporting.
    pub fn cancel(&mut self) {
        self.active = None;
    }

    /// Element being resized.
    #[must_use]
    pub fn active(&self) -> Option<ElementId> {
        self.active.map(|a| a.id)
    }

    /// Box the element would get if released now.
    #[must_use]
    pub fn preview(&self) -> Option<ResizeComplete> {
        self.active.map(|a| ResizeComplete {
            id: a.id,
            transform: a.current,
        })
    }
}

/// Routes pointer events to the drag and resize gestures.
#[derive(Debug, Clone, Default)]
pub struct Interaction {
    drag: DragGesture,
    resize: ResizeGesture,
    background_press: BackgroundPress,
}

impl Interaction {
    /// Create a controller with the given background-press behaviour.
    #[must_use]
    pub fn new(background_press: BackgroundPress) -> Self {
        Self {
            drag: DragGesture::default(),
            resize: ResizeGesture::default(),
            background_press,
        }
    }

    /// Current combined state.
    #[must_use]
    pub fn state(&self) -> InteractionState {
        if let Some(id) = self.resize.active() {
            InteractionState::Resizing(id)
        } else if let Some(id) = self.drag.active() {
            InteractionState::Dragging(id)
        } else {
            InteractionState::Idle
        }
    }

    /// In-flight resize preview, for drawing the outline while resizing.
    #[must_use]
    pub fn resize_preview(&self) -> Option<ResizeComplete> {
        self.resize.preview()
    }

    /// Handle one pointer event.
    ///
    /// A press near a handle of the selected element starts a resize; a press
    /// on an element selects it and starts a drag; a press on the background
    /// follows the [`BackgroundPress`] policy.
    pub fn pointer(&mut self, store: &mut ElementStore, rect: &CanvasRect, event: &PointerEvent) {
        match event.phase {
            PointerPhase::Press => self.press(store, rect, event),
            PointerPhase::Move => {
                if self.resize.active().is_some() {
                    let (x, y) = rect.to_local(event.client_x, event.client_y);
                    self.resize.track(x, y);
                } else {
                    self.drag.track(store, rect, event.client_x, event.client_y);
                }
            }
            PointerPhase::Release => {
                if let Some(done) = self.resize.release() {
                    done.apply(store);
                }
                self.drag.end();
            }
        }
    }

    fn press(&mut self, store: &mut ElementStore, rect: &CanvasRect, event: &PointerEvent) {
        // A press while a gesture is live means the release was lost.
        self.resize.cancel();
        self.drag.end();

        let (x, y) = rect.to_local(event.client_x, event.client_y);
        if let Some(selected) = store.selected_element() {
            if let Some(handle) = HandleKind::hit(&selected.transform, x, y, HANDLE_HIT_TOLERANCE) {
                let (id, origin) = (selected.id, selected.transform);
                self.resize.begin(id, handle, origin, (x, y));
                return;
            }
        }

        match event.target {
            PointerTarget::Element(id) if store.contains(id) => {
                store.select(Some(id));
                self.drag.begin(id);
            }
            PointerTarget::Element(id) => {
                tracing::warn!(%id, "press on unknown element ignored");
            }
            PointerTarget::Background => {
                if self.background_press == BackgroundPress::ClearSelection {
                    store.select(None);
                }
            }
        }
    }
}
