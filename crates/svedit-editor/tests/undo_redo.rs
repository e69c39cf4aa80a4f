//! Integration tests: undo/redo across every kind of reversible edit.
//!
//! For each mutation M, M → undo → redo must reproduce the post-M state
//! (geometry and content) within 1e-6.

use kurbo::{Affine, BezPath, Rect, Size};
use pretty_assertions::assert_eq;
use svedit_core::geometry::Geometry;
use svedit_core::id::NodeId;
use svedit_core::model::{Color, ImageRef, NodeKind, SceneNode};
use svedit_core::text::HeuristicFonts;
use svedit_editor::{Editor, EditorConfig, EditorEvent, GestureEvent, GesturePhase, Placement};

const EPS: f64 = 1e-6;

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn editor() -> Editor {
    init_logging();
    Editor::with_defaults(Size::new(600.0, 600.0))
}

fn assert_geometry_close(a: &Geometry, b: &Geometry) {
    let close = |x: f64, y: f64| (x - y).abs() < EPS;
    assert!(
        close(a.position.x, b.position.x) && close(a.position.y, b.position.y),
        "position {:?} != {:?}",
        a.position,
        b.position
    );
    assert!(
        close(a.bounds.width, b.bounds.width) && close(a.bounds.height, b.bounds.height),
        "bounds {:?} != {:?}",
        a.bounds,
        b.bounds
    );
    let (ta, tb) = (a.transform.as_coeffs(), b.transform.as_coeffs());
    assert!(
        ta.iter().zip(tb.iter()).all(|(x, y)| close(*x, *y)),
        "transform {ta:?} != {tb:?}"
    );
    assert_eq!(a.anchor, b.anchor);
}

/// Run `mutate`, then check that undo restores the prior node and redo the
/// mutated one.
fn assert_round_trip(ed: &mut Editor, id: NodeId, mutate: impl FnOnce(&mut Editor) -> bool) {
    let before = ed.node(id).unwrap().clone();
    assert!(mutate(ed), "mutation reported no change");
    let after = ed.node(id).unwrap().clone();

    assert!(ed.undo());
    let undone = ed.node(id).unwrap();
    assert_geometry_close(&undone.geometry, &before.geometry);
    assert_eq!(undone.kind, before.kind);
    assert_eq!(undone.opacity, before.opacity);

    assert!(ed.redo());
    let redone = ed.node(id).unwrap();
    assert_geometry_close(&redone.geometry, &after.geometry);
    assert_eq!(redone.kind, after.kind);
    assert_eq!(redone.opacity, after.opacity);
}

fn shape(ed: &mut Editor, name: &str) -> NodeId {
    let mut path = BezPath::new();
    path.move_to((0.0, 0.0));
    path.line_to((60.0, 0.0));
    path.line_to((60.0, 30.0));
    path.close_path();
    ed.add_node(
        SceneNode::new(
            NodeId::intern(name),
            NodeKind::Shape {
                path,
                fill: Some(Color::rgba(0.2, 0.4, 0.6, 0.8)),
            },
            Rect::new(20.0, 20.0, 80.0, 50.0),
        ),
        Placement::AsIs,
    )
    .unwrap()
}

// ─── Round trips ────────────────────────────────────────────────────────

#[test]
fn gestures_round_trip() {
    let mut ed = editor();
    let id = shape(&mut ed, "ur_gestures");

    assert_round_trip(&mut ed, id, |ed| {
        ed.handle_gesture(GestureEvent::pan(GesturePhase::Began, 12.5, -3.25));
        ed.handle_gesture(GestureEvent::pan(GesturePhase::Changed, 1.0, 1.0));
        ed.handle_gesture(GestureEvent::pan(GesturePhase::Ended, 0.0, 0.0));
        true
    });
    assert_round_trip(&mut ed, id, |ed| {
        ed.handle_gesture(GestureEvent::rotate(GesturePhase::Began, 0.0));
        ed.handle_gesture(GestureEvent::rotate(GesturePhase::Changed, 0.35));
        ed.handle_gesture(GestureEvent::rotate(GesturePhase::Changed, -0.1));
        ed.handle_gesture(GestureEvent::rotate(GesturePhase::Ended, 0.0));
        true
    });
    assert_round_trip(&mut ed, id, |ed| {
        ed.handle_gesture(GestureEvent::pinch(GesturePhase::Began, 1.0));
        ed.handle_gesture(GestureEvent::pinch(GesturePhase::Changed, 1.1));
        ed.handle_gesture(GestureEvent::pinch(GesturePhase::Changed, 0.7));
        ed.handle_gesture(GestureEvent::pinch(GesturePhase::Ended, 1.0));
        true
    });
}

#[test]
fn text_edits_round_trip() {
    let mut ed = editor();
    let id = ed.add_text("Round", None).unwrap();

    assert_round_trip(&mut ed, id, |ed| ed.update_text("Round trip"));
    assert_round_trip(&mut ed, id, |ed| ed.change_text_font("Georgia"));
    assert_round_trip(&mut ed, id, |ed| ed.set_font_size(120.0));
    assert_round_trip(&mut ed, id, |ed| {
        ed.set_text_color(id, Color::rgba(0.0, 0.5, 0.0, 1.0))
    });
    assert_round_trip(&mut ed, id, |ed| ed.set_opacity(0.4));
}

#[test]
fn shape_edits_round_trip() {
    let mut ed = editor();
    let id = shape(&mut ed, "ur_shape_edits");

    assert_round_trip(&mut ed, id, |ed| ed.set_shape_fill(id, Color::WHITE));
    assert_round_trip(&mut ed, id, |ed| ed.set_shape_width(id, 240.0));
    assert_round_trip(&mut ed, id, |ed| {
        ed.change_direction(
            id,
            Rect::new(0.0, 0.0, 60.0, 30.0),
            Affine::scale_non_uniform(-1.0, 1.0),
        )
    });
}

#[test]
fn image_edits_round_trip() {
    let mut ed = editor();
    let id = ed
        .insert_image(
            ImageRef("sticker".into()),
            Size::new(64.0, 64.0),
            Affine::rotate(0.25),
        )
        .unwrap();
    assert_round_trip(&mut ed, id, |ed| ed.set_clip_image(id, ImageRef("tinted".into())));
    assert_round_trip(&mut ed, id, |ed| ed.set_opacity(0.6));
}

// ─── Structural history ─────────────────────────────────────────────────

#[test]
fn delete_middle_and_undo() {
    let mut ed = editor();
    let ids: Vec<NodeId> = ["ur_a", "ur_b", "ur_c"]
        .iter()
        .map(|name| shape(&mut ed, name))
        .collect();
    let (a, b, c) = (ids[0], ids[1], ids[2]);
    let b_geometry = ed.scene().get(b).unwrap().geometry;

    assert!(ed.delete_node(b));
    assert_eq!(ed.scene().paint_order(), &[a, c]);
    assert!(ed.scene().get(b).unwrap().hidden);

    assert!(ed.undo());
    assert_eq!(ed.scene().paint_order(), &[a, b, c]);
    let restored = ed.scene().get(b).unwrap();
    assert!(!restored.hidden);
    assert_eq!(restored.geometry, b_geometry);
}

#[test]
fn deleting_selected_node_deselects() {
    let mut ed = editor();
    let id = shape(&mut ed, "ur_selected");
    assert_eq!(ed.selected(), Some(id));
    ed.drain_events();

    assert!(ed.delete_selected());
    assert_eq!(ed.selected(), None);
    let events = ed.drain_events();
    assert!(events.contains(&EditorEvent::SelectionChanged(None)));
    assert!(!ed.delete_selected());
}

#[test]
fn new_edit_clears_redo() {
    let mut ed = editor();
    let id = shape(&mut ed, "ur_redo");
    ed.set_shape_fill(id, Color::WHITE);
    ed.undo();
    assert!(ed.can_redo());
    ed.set_shape_width(id, 100.0);
    assert!(!ed.can_redo());
}

#[test]
fn undo_on_empty_history_is_a_no_op() {
    let mut ed = editor();
    assert!(!ed.undo());
    assert!(!ed.redo());
    assert!(ed.drain_events().is_empty());
}

#[test]
fn history_limit_from_config() {
    init_logging();
    let config = EditorConfig::from_json(r#"{ "history_limit": 2 }"#).unwrap();
    let mut ed = Editor::new(
        Size::new(300.0, 300.0),
        config,
        Box::new(HeuristicFonts::default()),
    );
    let id = shape(&mut ed, "ur_limit");
    for width in [70.0, 80.0, 90.0, 100.0] {
        ed.set_shape_width(id, width);
    }
    let mut steps = 0;
    while ed.undo() {
        steps += 1;
    }
    assert_eq!(steps, 2);
    assert_eq!(ed.node(id).unwrap().geometry.bounds.width, 80.0);
}

#[test]
fn undo_reselects_the_edited_node() {
    let mut ed = editor();
    let first = shape(&mut ed, "ur_first");
    let second = shape(&mut ed, "ur_second");
    ed.set_shape_fill(first, Color::BLACK);
    ed.select(Some(second));
    ed.drain_events();

    ed.undo();
    assert_eq!(ed.selected(), Some(first));
    assert_eq!(
        ed.drain_events(),
        vec![
            EditorEvent::SelectionChanged(Some(first)),
            EditorEvent::StatusChanged,
            EditorEvent::GeometryChanged(Some(first)),
        ]
    );
}
