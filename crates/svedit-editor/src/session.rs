//! Editing session state: the scene, the single selection, queued
//! notifications, and the transaction bracket.
//!
//! `Session::apply` is the one place reversible commands touch the scene.

use crate::commands::Command;
use crate::events::EditorEvent;
use crate::transaction::{TransactionGuard, Transactions};
use svedit_core::Scene;
use svedit_core::id::NodeId;
use svedit_core::model::SceneNode;

#[derive(Debug)]
pub struct Session {
    scene: Scene,
    selected: Option<NodeId>,
    events: Vec<EditorEvent>,
    transactions: Transactions,
}

impl Session {
    pub fn new(scene: Scene) -> Self {
        Self {
            scene,
            selected: None,
            events: Vec::new(),
            transactions: Transactions::default(),
        }
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn scene_mut(&mut self) -> &mut Scene {
        &mut self.scene
    }

    // ─── Selection ───────────────────────────────────────────────────────

    pub fn selected(&self) -> Option<NodeId> {
        self.selected
    }

    /// The selected node, if it is still attached.
    pub fn selected_node(&self) -> Option<&SceneNode> {
        self.scene.attached(self.selected?)
    }

    /// Change the selection. Emits `SelectionChanged` only on an actual
    /// change, and not when the new selection is locked or hidden.
    pub fn select(&mut self, id: Option<NodeId>) {
        if self.selected == id {
            return;
        }
        self.selected = id;
        let visible = match id {
            Some(id) => self.scene.attached(id).is_some_and(SceneNode::is_interactive),
            None => true,
        };
        if visible {
            self.emit(EditorEvent::SelectionChanged(id));
        }
    }

    /// The selected node if a gesture or edit may act on it, logging why
    /// not otherwise.
    pub fn manipulable(&self, action: &str) -> Option<NodeId> {
        let Some(id) = self.selected else {
            log::debug!("{action}: nothing selected");
            return None;
        };
        let Some(node) = self.scene.attached(id) else {
            log::debug!("{action}: {id} is not in the scene");
            return None;
        };
        if node.locked {
            log::debug!("{action}: {id} is locked");
            return None;
        }
        if node.hidden {
            log::debug!("{action}: {id} is hidden");
            return None;
        }
        Some(id)
    }

    // ─── Notifications ───────────────────────────────────────────────────

    pub fn emit(&mut self, event: EditorEvent) {
        self.events.push(event);
    }

    pub fn drain_events(&mut self) -> Vec<EditorEvent> {
        std::mem::take(&mut self.events)
    }

    // ─── Transactions ────────────────────────────────────────────────────

    pub fn transaction(&self) -> TransactionGuard {
        self.transactions.begin()
    }

    pub fn transactions(&self) -> &Transactions {
        &self.transactions
    }

    /// Run `f` on an attached, interactive node inside a transaction.
    /// Used for the continuous phases of gestures, which are not
    /// individually undoable.
    pub fn edit_node<R>(&mut self, id: NodeId, f: impl FnOnce(&mut SceneNode) -> R) -> Option<R> {
        let _tx = self.transactions.begin();
        let node = self.scene.attached_mut(id)?;
        if !node.is_interactive() {
            log::debug!("edit {id}: locked or hidden");
            return None;
        }
        Some(f(node))
    }

    // ─── Command dispatch ────────────────────────────────────────────────

    /// Apply `command` and return its inverse, captured from the state it
    /// overwrote. Returns `None` (changing nothing) when the node is not
    /// available for the command.
    pub fn apply(&mut self, command: Command) -> Option<Command> {
        let _tx = self.transactions.begin();
        let inverse = match command {
            Command::Translate { id, origin } => {
                let node = self.scene.attached_mut(id)?;
                let previous = node.geometry.identity_frame().origin();
                node.geometry
                    .with_identity_transform(|g| g.set_origin(origin));
                Command::Translate {
                    id,
                    origin: previous,
                }
            }
            Command::Transform { id, geometry } => {
                let node = self.scene.attached_mut(id)?;
                let previous = std::mem::replace(&mut node.geometry, geometry);
                Command::Transform {
                    id,
                    geometry: previous,
                }
            }
            Command::Resize { id, geometry, kind } => {
                let node = self.scene.attached_mut(id)?;
                let previous = std::mem::replace(&mut node.geometry, geometry);
                let previous_kind = std::mem::replace(&mut node.kind, *kind);
                Command::Resize {
                    id,
                    geometry: previous,
                    kind: Box::new(previous_kind),
                }
            }
            Command::Restyle {
                id,
                kind,
                opacity,
                geometry,
            } => {
                let node = self.scene.attached_mut(id)?;
                let previous_kind = std::mem::replace(&mut node.kind, *kind);
                let previous_opacity = std::mem::replace(&mut node.opacity, opacity);
                let previous = std::mem::replace(&mut node.geometry, geometry);
                Command::Restyle {
                    id,
                    kind: Box::new(previous_kind),
                    opacity: previous_opacity,
                    geometry: previous,
                }
            }
            Command::Remove { id } => {
                let geometry = self.scene.attached(id)?.geometry;
                let index = self.scene.detach(id)?;
                if let Some(node) = self.scene.get_mut(id) {
                    node.hidden = true;
                }
                if self.selected == Some(id) {
                    self.select(None);
                }
                Command::Restore {
                    id,
                    index,
                    geometry,
                }
            }
            Command::Restore {
                id,
                index,
                geometry,
            } => {
                if !self.scene.attach(id, index) {
                    return None;
                }
                if let Some(node) = self.scene.get_mut(id) {
                    node.hidden = false;
                    node.geometry = geometry;
                }
                Command::Remove { id }
            }
        };

        // Every edit except a removal leaves its node selected.
        if !matches!(inverse, Command::Restore { .. }) {
            self.select(Some(inverse.node()));
        }
        self.emit(EditorEvent::StatusChanged);
        Some(inverse)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kurbo::{Affine, Rect, Size};
    use pretty_assertions::assert_eq;
    use svedit_core::model::NodeKind;

    fn session() -> Session {
        let mut scene = Scene::new(Size::new(300.0, 300.0));
        for name in ["ses_a", "ses_b"] {
            scene.push(SceneNode::new(
                NodeId::intern(name),
                NodeKind::Gradient { stops: Vec::new() },
                Rect::new(0.0, 0.0, 10.0, 10.0),
            ));
        }
        Session::new(scene)
    }

    #[test]
    fn selection_change_emits_once() {
        let mut s = session();
        let a = NodeId::intern("ses_a");
        s.select(Some(a));
        s.select(Some(a));
        s.select(None);
        assert_eq!(
            s.drain_events(),
            vec![
                EditorEvent::SelectionChanged(Some(a)),
                EditorEvent::SelectionChanged(None),
            ]
        );
    }

    #[test]
    fn selecting_locked_node_is_silent() {
        let mut s = session();
        let b = NodeId::intern("ses_b");
        s.scene_mut().get_mut(b).unwrap().locked = true;
        s.select(Some(b));
        assert_eq!(s.selected(), Some(b));
        assert!(s.drain_events().is_empty());
        assert_eq!(s.manipulable("test"), None);
    }

    #[test]
    fn transform_inverse_restores_snapshot() {
        let mut s = session();
        let a = NodeId::intern("ses_a");
        let before = s.scene().get(a).unwrap().geometry;
        let mut rotated = before;
        rotated.transform = Affine::rotate(1.0);

        let inverse = s
            .apply(Command::Transform {
                id: a,
                geometry: rotated,
            })
            .unwrap();
        assert_eq!(s.scene().get(a).unwrap().geometry, rotated);
        assert_eq!(
            inverse,
            Command::Transform {
                id: a,
                geometry: before
            }
        );
        assert_eq!(s.selected(), Some(a));
        assert!(s.drain_events().contains(&EditorEvent::StatusChanged));
    }

    #[test]
    fn remove_deselects() {
        let mut s = session();
        let a = NodeId::intern("ses_a");
        s.select(Some(a));
        s.drain_events();
        let inverse = s.apply(Command::Remove { id: a });
        assert!(matches!(inverse, Some(Command::Restore { index: 0, .. })));
        assert_eq!(s.selected(), None);
        assert_eq!(
            s.drain_events(),
            vec![
                EditorEvent::SelectionChanged(None),
                EditorEvent::StatusChanged
            ]
        );
    }

    #[test]
    fn apply_runs_inside_a_transaction() {
        let mut s = session();
        let a = NodeId::intern("ses_a");
        let commits = s.transactions().commits();
        s.apply(Command::Remove { id: a });
        assert_eq!(s.transactions().commits(), commits + 1);
        assert!(!s.transactions().animations_suppressed());
        // Rejected commands still close their transaction.
        assert_eq!(s.apply(Command::Remove { id: a }), None);
        assert_eq!(s.transactions().commits(), commits + 2);
    }

    #[test]
    fn edit_node_skips_locked() {
        let mut s = session();
        let a = NodeId::intern("ses_a");
        s.scene_mut().get_mut(a).unwrap().locked = true;
        assert_eq!(s.edit_node(a, |n| n.opacity = 0.5), None);
        assert_eq!(s.scene().get(a).unwrap().opacity, 1.0);
    }
}
