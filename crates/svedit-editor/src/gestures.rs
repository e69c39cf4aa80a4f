//! Transform gesture controller.
//!
//! One state machine per gesture kind. `Began` checks the selected node,
//! snapshots it, and registers exactly one undo step; `Changed` mutates
//! the node in place without touching the history; terminal phases
//! (ended, cancelled, failed) finalize without rolling anything back.
//!
//! | Gesture | Began                         | Changed                              |
//! |---------|-------------------------------|--------------------------------------|
//! | Pan     | apply first delta, undo entry | add delta to the identity frame      |
//! | Rotate  | snapshot, undo entry          | `transform.rotated(delta)`           |
//! | Pinch   | snapshot (+ content), undo    | scale bounds and path from snapshot  |

use crate::commands::{Command, CommandStack};
use crate::config::EditorConfig;
use crate::events::EditorEvent;
use crate::input::{GestureEvent, GesturePhase};
use crate::session::Session;
use kurbo::{Affine, BezPath, Point, Rect, Size, Vec2};
use svedit_core::geometry::{AffineExt, Geometry, clamp_scale};
use svedit_core::id::NodeId;
use svedit_core::model::NodeKind;

/// Per-gesture pinch state: the snapshot the cumulative factor applies to.
#[derive(Debug, Clone)]
struct PinchState {
    id: NodeId,
    start: Geometry,
    start_path: Option<BezPath>,
    factor: f64,
}

#[derive(Debug, Default)]
pub struct GestureController {
    pan: Option<NodeId>,
    rotate: Option<NodeId>,
    pinch: Option<PinchState>,
}

impl GestureController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether any continuous gesture is between `Began` and its end.
    pub fn is_active(&self) -> bool {
        self.pan.is_some() || self.rotate.is_some() || self.pinch.is_some()
    }

    /// Route a continuous gesture. Returns `true` if the scene changed.
    /// Double taps are handled by the editor, which owns picking.
    pub fn handle(
        &mut self,
        event: GestureEvent,
        session: &mut Session,
        history: &mut CommandStack,
        config: &EditorConfig,
    ) -> bool {
        match event {
            GestureEvent::Pan { phase, translation } => {
                self.pan(phase, translation, session, history)
            }
            GestureEvent::Rotate { phase, rotation } => {
                self.rotate(phase, rotation, session, history)
            }
            GestureEvent::Pinch { phase, scale } => {
                self.pinch(phase, clamp_scale(scale, config.min_scale_factor), session, history)
            }
            GestureEvent::DoubleTap { .. } => false,
        }
    }

    // ─── Pan ─────────────────────────────────────────────────────────────

    fn pan(
        &mut self,
        phase: GesturePhase,
        delta: Vec2,
        session: &mut Session,
        history: &mut CommandStack,
    ) -> bool {
        match phase {
            GesturePhase::Began => {
                self.pan = None;
                let Some(id) = session.manipulable("pan") else {
                    return false;
                };
                let Some(origin) = identity_origin(session, id) else {
                    return false;
                };
                // The recognizer's first report already carries movement.
                let moved = history.execute(
                    session,
                    Command::Translate {
                        id,
                        origin: origin + delta,
                    },
                    "move",
                );
                if moved {
                    self.pan = Some(id);
                }
                moved
            }
            GesturePhase::Changed => {
                let Some(id) = self.pan else {
                    log::debug!("pan: change without a began phase");
                    return false;
                };
                let moved = session.edit_node(id, |node| {
                    node.geometry.with_identity_transform(|g| {
                        let origin = g.frame().origin();
                        g.set_origin(origin + delta);
                    });
                });
                log::trace!("pan {id} by ({}, {})", delta.x, delta.y);
                moved.is_some()
            }
            _ => {
                self.pan = None;
                false
            }
        }
    }

    // ─── Rotate ──────────────────────────────────────────────────────────

    fn rotate(
        &mut self,
        phase: GesturePhase,
        delta: f64,
        session: &mut Session,
        history: &mut CommandStack,
    ) -> bool {
        match phase {
            GesturePhase::Began => {
                self.rotate = None;
                let Some(id) = session.manipulable("rotate") else {
                    return false;
                };
                let Some(geometry) = session.scene().attached(id).map(|n| n.geometry) else {
                    return false;
                };
                // Re-applying the snapshot is a no-op write; its inverse is
                // the undo step for the whole gesture.
                if history.execute(session, Command::Transform { id, geometry }, "rotate") {
                    self.rotate = Some(id);
                }
                false
            }
            GesturePhase::Changed => {
                let Some(id) = self.rotate else {
                    log::debug!("rotate: change without a began phase");
                    return false;
                };
                let rotated = session
                    .edit_node(id, |node| {
                        let t = node.geometry.transform;
                        node.geometry.transform = t.rotated(delta);
                    })
                    .is_some();
                if rotated {
                    log::trace!("rotate {id} by {delta}");
                    session.emit(EditorEvent::StatusChanged);
                }
                rotated
            }
            _ => {
                if let Some(id) = self.rotate.take() {
                    session.emit(EditorEvent::GeometryChanged(Some(id)));
                }
                false
            }
        }
    }

    // ─── Pinch ───────────────────────────────────────────────────────────

    fn pinch(
        &mut self,
        phase: GesturePhase,
        scale: f64,
        session: &mut Session,
        history: &mut CommandStack,
    ) -> bool {
        match phase {
            GesturePhase::Began => {
                self.pinch = None;
                let Some(id) = session.manipulable("pinch") else {
                    return false;
                };
                let Some(node) = session.scene().attached(id) else {
                    return false;
                };
                let start = node.geometry;
                let kind = node.kind.clone();
                let start_path = kind.path().cloned();
                let snapshot = Command::Resize {
                    id,
                    geometry: start,
                    kind: Box::new(kind),
                };
                if history.execute(session, snapshot, "resize") {
                    self.pinch = Some(PinchState {
                        id,
                        start,
                        start_path,
                        factor: 1.0,
                    });
                }
                false
            }
            GesturePhase::Changed => {
                let Some(state) = self.pinch.as_mut() else {
                    log::debug!("pinch: change without a began phase");
                    return false;
                };
                state.factor *= scale;
                let state = state.clone();
                let resized = session
                    .edit_node(state.id, |node| {
                        let bounds = Size::new(
                            state.start.bounds.width * state.factor,
                            state.start.bounds.height * state.factor,
                        );
                        node.geometry.with_identity_transform(|g| {
                            let position = g.position;
                            let origin = g.frame().origin();
                            g.set_frame(Rect::from_origin_size(origin, bounds));
                            g.position = position;
                        });
                        if let (NodeKind::Shape { path, .. }, Some(start_path)) =
                            (&mut node.kind, &state.start_path)
                        {
                            *path = scale_path(start_path, state.start.bounds, bounds);
                        }
                    })
                    .is_some();
                log::trace!("pinch {} to factor {}", state.id, state.factor);
                resized
            }
            _ => {
                if let Some(state) = self.pinch.take() {
                    session.emit(EditorEvent::GeometryChanged(Some(state.id)));
                }
                false
            }
        }
    }
}

/// The node's frame origin read with the transform at identity.
fn identity_origin(session: &Session, id: NodeId) -> Option<Point> {
    session
        .scene()
        .attached(id)
        .map(|n| n.geometry.identity_frame().origin())
}

/// `path` rescaled by the ratio of `to` over `from`, per axis.
pub(crate) fn scale_path(path: &BezPath, from: Size, to: Size) -> BezPath {
    let ratio = |new: f64, old: f64| if old.abs() > f64::EPSILON { new / old } else { 1.0 };
    let sx = ratio(to.width, from.width);
    let sy = ratio(to.height, from.height);
    Affine::scale_non_uniform(sx, sy) * path.clone()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use svedit_core::Scene;
    use svedit_core::model::SceneNode;

    fn setup(name: &str) -> (Session, CommandStack, GestureController, NodeId) {
        let id = NodeId::intern(name);
        let mut scene = Scene::new(Size::new(400.0, 400.0));
        scene.push(SceneNode::new(
            id,
            NodeKind::ClipRender { image: None },
            Rect::new(0.0, 0.0, 40.0, 20.0),
        ));
        let mut session = Session::new(scene);
        session.select(Some(id));
        (session, CommandStack::default(), GestureController::new(), id)
    }

    #[test]
    fn pan_applies_first_delta_on_began() {
        let (mut s, mut h, mut g, id) = setup("ges_pan");
        let config = EditorConfig::default();
        g.handle(GestureEvent::pan(GesturePhase::Began, 3.0, 4.0), &mut s, &mut h, &config);
        g.handle(GestureEvent::pan(GesturePhase::Changed, 1.0, 1.0), &mut s, &mut h, &config);
        g.handle(GestureEvent::pan(GesturePhase::Ended, 0.0, 0.0), &mut s, &mut h, &config);

        let origin = s.scene().get(id).unwrap().geometry.identity_frame().origin();
        assert_eq!(origin, Point::new(4.0, 5.0));
        assert_eq!(h.undo_len(), 1);
        assert!(!g.is_active());
    }

    #[test]
    fn changed_without_began_is_ignored() {
        let (mut s, mut h, mut g, id) = setup("ges_orphan");
        let config = EditorConfig::default();
        let before = s.scene().get(id).unwrap().geometry;
        assert!(!g.handle(GestureEvent::rotate(GesturePhase::Changed, 1.0), &mut s, &mut h, &config));
        assert!(!g.handle(GestureEvent::pinch(GesturePhase::Changed, 2.0), &mut s, &mut h, &config));
        assert_eq!(s.scene().get(id).unwrap().geometry, before);
    }

    #[test]
    fn pinch_factor_is_cumulative_and_clamped() {
        let (mut s, mut h, mut g, id) = setup("ges_pinch");
        let config = EditorConfig::default();
        g.handle(GestureEvent::pinch(GesturePhase::Began, 1.0), &mut s, &mut h, &config);
        g.handle(GestureEvent::pinch(GesturePhase::Changed, 2.0), &mut s, &mut h, &config);
        g.handle(GestureEvent::pinch(GesturePhase::Changed, 1.5), &mut s, &mut h, &config);
        assert_eq!(s.scene().get(id).unwrap().geometry.bounds, Size::new(120.0, 60.0));

        g.handle(GestureEvent::pinch(GesturePhase::Changed, -4.0), &mut s, &mut h, &config);
        let bounds = s.scene().get(id).unwrap().geometry.bounds;
        assert!(bounds.width > 0.0 && bounds.height > 0.0);
    }

    #[test]
    fn pinch_keeps_position() {
        let (mut s, mut h, mut g, id) = setup("ges_pinch_pos");
        let config = EditorConfig::default();
        let position = s.scene().get(id).unwrap().geometry.position;
        g.handle(GestureEvent::pinch(GesturePhase::Began, 1.0), &mut s, &mut h, &config);
        g.handle(GestureEvent::pinch(GesturePhase::Changed, 0.5), &mut s, &mut h, &config);
        assert_eq!(s.scene().get(id).unwrap().geometry.position, position);
    }

    #[test]
    fn scale_path_uses_axis_ratios() {
        let mut path = BezPath::new();
        path.move_to((10.0, 10.0));
        path.line_to((20.0, 5.0));
        let scaled = scale_path(&path, Size::new(20.0, 10.0), Size::new(40.0, 30.0));
        let mut expected = BezPath::new();
        expected.move_to((20.0, 30.0));
        expected.line_to((40.0, 15.0));
        assert_eq!(scaled, expected);
    }

    #[test]
    fn rotate_end_notifies_geometry() {
        let (mut s, mut h, mut g, id) = setup("ges_rot_end");
        let config = EditorConfig::default();
        g.handle(GestureEvent::rotate(GesturePhase::Began, 0.0), &mut s, &mut h, &config);
        s.drain_events();
        g.handle(GestureEvent::rotate(GesturePhase::Cancelled, 0.0), &mut s, &mut h, &config);
        assert_eq!(s.drain_events(), vec![EditorEvent::GeometryChanged(Some(id))]);
    }
}
