//! Editor Scenario Tests
//!
//! Drives a full session the way the browser page does:
//! - Toolbar adds, deletes and font controls
//! - Pointer drags and handle resizes
//! - Selection rules across gestures

use designer_core::{
    resolve_bytes, BackgroundPress, CanvasRect, EditorConfig, EditorSession, ElementKind,
    ElementPatch, ImageSource, InteractionState, PointerEvent, Transform,
};

/// A canvas placed at (8, 120) in the page, as the toolbar pushes it down.
fn canvas_rect() -> CanvasRect {
    CanvasRect::new(8.0, 120.0, 800.0, 600.0)
}

/// A minimal 1x1 PNG header; resolution only looks at the magic bytes.
fn png_bytes() -> Vec<u8> {
    vec![
        0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0x00, 0x00, 0x00, 0x0D, 0x49, 0x48, 0x44,
        0x52,
    ]
}

// ============================================================================
// Toolbar Scenarios
// ============================================================================

#[test]
fn test_add_text_select_and_grow_font_twice() {
    let mut session = EditorSession::default();
    let id = session.add_text();
    session.select(Some(id));
    let before = session.store().get(id).cloned().expect("element");

    session.increase_font_size();
    session.increase_font_size();

    let after = session.store().get(id).cloned().expect("element");
    let style = after.text_style().expect("text");
    assert!((style.font_size - 20.0).abs() < f32::EPSILON);
    assert_eq!(style.color, "#000000");
    assert_eq!(style.font_family, "Arial");
    assert_eq!(after.transform, before.transform);
    assert_eq!(after.transform, Transform::new(50.0, 50.0, 150.0, 50.0));
}

#[test]
fn test_add_image_from_png_file() {
    let mut session = EditorSession::default();
    let source = resolve_bytes(&png_bytes(), Some("image/png"));
    let expected = source.clone().expect("resolved");
    let id = session.add_image(source).expect("added");

    assert_eq!(session.store().len(), 1);
    let el = session.store().get(id).expect("element");
    assert_eq!(el.kind, ElementKind::Image { src: expected.clone() });
    assert!(expected.as_str().starts_with("data:image/png;base64,"));
    assert_eq!(el.transform, Transform::new(50.0, 50.0, 100.0, 100.0));
}

#[test]
fn test_failed_resolution_adds_nothing() {
    let mut session = EditorSession::default();
    session.add_text();
    session.add_image(resolve_bytes(&[], None));
    session.add_image(designer_core::resolve_url("  "));
    session.add_image(Some(ImageSource::Url {
        url: "https://example.com/logo.png".to_string(),
    }));
    assert_eq!(session.store().len(), 2);
}

#[test]
fn test_delete_first_of_two() {
    let mut session = EditorSession::default();
    let first = session.add_text();
    let second = session.add_text();
    session.select(Some(first));

    assert!(session.delete(first));
    let ids: Vec<_> = session.store().elements().iter().map(|e| e.id).collect();
    assert_eq!(ids, vec![second]);
    assert!(session.store().selected().is_none());
}

#[test]
fn test_font_decrement_floors_at_eight() {
    let mut session = EditorSession::default();
    let id = session.add_text();
    session.select(Some(id));

    let mut last = 16.0;
    for _ in 0..10 {
        let next = session.decrease_font_size().expect("text selected");
        assert!(next <= last);
        assert!(next >= 8.0);
        last = next;
    }
    assert!((last - 8.0).abs() < f32::EPSILON);
}

#[test]
fn test_update_leaves_other_elements_identical() {
    let mut session = EditorSession::default();
    let a = session.add_text();
    let b = session.add_text();
    let c = session.add_image(Some(ImageSource::Url {
        url: "https://example.com/c.png".to_string(),
    }));
    let snapshot: Vec<_> = session.store().elements().to_vec();

    session.store_mut().update(
        b,
        &ElementPatch {
            x: Some(1.0),
            content: Some("changed".to_string()),
            font_size: Some(30.0),
            ..ElementPatch::default()
        },
    );

    let now = session.store().elements();
    assert_eq!(now[0], snapshot[0]);
    assert_eq!(now[0].id, a);
    assert_ne!(now[1], snapshot[1]);
    assert_eq!(now[2], snapshot[2]);
    assert_eq!(Some(now[2].id), c);
}

// ============================================================================
// Pointer Scenarios
// ============================================================================

#[test]
fn test_drag_follows_pointer_on_every_move() {
    let mut session = EditorSession::default();
    let id = session.add_text();
    let rect = canvas_rect();

    session.pointer(&PointerEvent::press_on(id, 70.0, 180.0), &rect);
    assert_eq!(session.interaction_state(), InteractionState::Dragging(id));
    assert_eq!(session.store().selected(), Some(id));

    for (px, py) in [(100.0, 200.0), (300.0, 450.0), (-2.0, 110.0)] {
        session.pointer(&PointerEvent::moved(px, py), &rect);
        let t = session.store().get(id).expect("el").transform;
        assert!((t.x - (px - rect.left)).abs() < f32::EPSILON);
        assert!((t.y - (py - rect.top)).abs() < f32::EPSILON);
    }

    session.pointer(&PointerEvent::release(-2.0, 110.0), &rect);
    assert_eq!(session.interaction_state(), InteractionState::Idle);
    let t = session.store().get(id).expect("el").transform;
    assert_eq!((t.x, t.y), (-10.0, -10.0));
}

#[test]
fn test_drag_clamped_when_policy_enabled() {
    let mut config = EditorConfig::default();
    config.geometry.clamp_to_canvas = true;
    let mut session = EditorSession::new(config).expect("session");
    let id = session.add_text();
    let rect = canvas_rect();

    session.pointer(&PointerEvent::press_on(id, 70.0, 180.0), &rect);
    session.pointer(&PointerEvent::moved(-2.0, 110.0), &rect);
    let t = session.store().get(id).expect("el").transform;
    assert_eq!((t.x, t.y), (0.0, 0.0));
}

#[test]
fn test_background_press_variants() {
    for (policy, expect_cleared) in [
        (BackgroundPress::ClearSelection, true),
        (BackgroundPress::KeepSelection, false),
    ] {
        let config = EditorConfig {
            background_press: policy,
            ..EditorConfig::default()
        };
        let mut session = EditorSession::new(config).expect("session");
        let id = session.add_text();
        let rect = canvas_rect();
        session.pointer(&PointerEvent::press_on(id, 70.0, 180.0), &rect);
        session.pointer(&PointerEvent::release(70.0, 180.0), &rect);

        session.pointer(&PointerEvent::press_background(700.0, 600.0), &rect);
        assert_eq!(session.store().selected().is_none(), expect_cleared);
    }
}

#[test]
fn test_resize_then_drag_are_independent() {
    let mut session = EditorSession::default();
    let id = session.add_text();
    let rect = canvas_rect();

    // Select by clicking the body.
    session.pointer(&PointerEvent::press_on(id, 70.0, 180.0), &rect);
    session.pointer(&PointerEvent::release(70.0, 180.0), &rect);

    // Grab the bottom edge midpoint at local (125, 100).
    session.pointer(&PointerEvent::press_on(id, 133.0, 220.0), &rect);
    assert_eq!(session.interaction_state(), InteractionState::Resizing(id));
    session.pointer(&PointerEvent::moved(133.0, 260.0), &rect);

    // Live box is on the surface, not yet in the store.
    assert!((session.surface().nodes[0].frame.height - 90.0).abs() < f32::EPSILON);
    assert!((session.store().get(id).expect("el").transform.height - 50.0).abs() < f32::EPSILON);

    session.pointer(&PointerEvent::release(133.0, 260.0), &rect);
    let t = session.store().get(id).expect("el").transform;
    assert_eq!(t, Transform::new(50.0, 50.0, 150.0, 90.0));

    // A plain drag afterwards moves without resizing.
    session.pointer(&PointerEvent::press_on(id, 100.0, 200.0), &rect);
    assert_eq!(session.interaction_state(), InteractionState::Dragging(id));
    session.pointer(&PointerEvent::moved(208.0, 320.0), &rect);
    session.pointer(&PointerEvent::release(208.0, 320.0), &rect);
    let t = session.store().get(id).expect("el").transform;
    assert_eq!(t, Transform::new(200.0, 200.0, 150.0, 90.0));
}

#[test]
fn test_overlapping_press_targets_topmost() {
    let mut session = EditorSession::default();
    let _below = session.add_text();
    let above = session.add_text();
    let rect = canvas_rect();

    let (x, y) = rect.to_local(100.0, 190.0);
    let hit = session.surface().hit_test(x, y).expect("hit");
    assert_eq!(hit, above);

    session.pointer(&PointerEvent::press_on(hit, 100.0, 190.0), &rect);
    assert_eq!(session.store().selected(), Some(above));
}

#[test]
fn test_revision_moves_with_every_visible_change() {
    let mut session = EditorSession::default();
    let r0 = session.store().revision();
    let id = session.add_text();
    session.select(Some(id));
    session.set_font_color("#123456");
    let r1 = session.store().revision();
    assert!(r1 >= r0 + 3);

    // Setting the same colour again is not a change.
    session.set_font_color("#123456");
    assert_eq!(session.store().revision(), r1);
}
