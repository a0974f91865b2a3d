//! Pointer input delivered by the host page.

use serde::{Deserialize, Serialize};

use crate::ElementId;

/// Phase of a pointer event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PointerPhase {
    /// Button pressed.
    Press,
    /// Pointer moved.
    Move,
    /// Button released.
    Release,
}

/// What the pointer was over when the event fired.
///
/// Hit testing belongs to the rendering surface: the host reports the
/// topmost element it found, or the background.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "id", rename_all = "lowercase")]
pub enum PointerTarget {
    /// The canvas background.
    Background,
    /// An element's body.
    Element(ElementId),
}

/// A pointer event in client (page) coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PointerEvent {
    /// Phase of this event.
    pub phase: PointerPhase,
    /// X position in client coordinates.
    pub client_x: f32,
    /// Y position in client coordinates.
    pub client_y: f32,
    /// Hit-test result.
    pub target: PointerTarget,
}

impl PointerEvent {
    /// Create a new pointer event.
    #[must_use]
    pub const fn new(phase: PointerPhase, client_x: f32, client_y: f32, target: PointerTarget) -> Self {
        Self {
            phase,
            client_x,
            client_y,
            target,
        }
    }

    /// Press on an element.
    #[must_use]
    pub const fn press_on(id: ElementId, client_x: f32, client_y: f32) -> Self {
        Self::new(PointerPhase::Press, client_x, client_y, PointerTarget::Element(id))
    }

    /// Press on the background.
    #[must_use]
    pub const fn press_background(client_x: f32, client_y: f32) -> Self {
        Self::new(PointerPhase::Press, client_x, client_y, PointerTarget::Background)
    }

    /// Pointer move. Moves are routed by controller state, not by target.
    #[must_use]
    pub const fn moved(client_x: f32, client_y: f32) -> Self {
        Self::new(PointerPhase::Move, client_x, client_y, PointerTarget::Background)
    }

    /// Button release.
    #[must_use]
    pub const fn release(client_x: f32, client_y: f32) -> Self {
        Self::new(PointerPhase::Release, client_x, client_y, PointerTarget::Background)
    }
}

/// The canvas's bounding rectangle in client coordinates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct CanvasRect {
    /// Left edge in client coordinates.
    pub left: f32,
    /// Top edge in client coordinates.
    pub top: f32,
    /// Width in pixels.
    pub width: f32,
    /// Height in pixels.
    pub height: f32,
}

impl CanvasRect {
    /// Create a canvas rectangle.
    #[must_use]
    pub const fn new(left: f32, top: f32, width: f32, height: f32) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    /// Convert client coordinates to canvas-local coordinates.
    #[must_use]
    pub fn to_local(&self, client_x: f32, client_y: f32) -> (f32, f32) {
        (client_x - self.left, client_y - self.top)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn to_local_subtracts_origin() {
        let rect = CanvasRect::new(20.0, 100.0, 800.0, 600.0);
        assert_eq!(rect.to_local(30.0, 90.0), (10.0, -10.0));
    }

    #[test]
    fn pointer_event_serializes_target() {
        let id = ElementId::new();
        let json = serde_json::to_string(&PointerEvent::press_on(id, 1.0, 2.0)).expect("json");
        assert!(json.contains("\"press\""));
        assert!(json.contains(&id.to_string()));
        let back: PointerEvent = serde_json::from_str(&json).expect("parse");
        assert_eq!(back.target, PointerTarget::Element(id));
    }
}
