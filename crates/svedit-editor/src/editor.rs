//! The editor façade: one editing session over one scene.
//!
//! Holds the session (scene, selection, notifications), the undo history,
//! the gesture controller, the font provider, and the configuration. All
//! host interaction goes through this struct. Mutating calls return
//! whether they changed anything; rejected calls log the reason at debug
//! level and leave scene and history untouched.

use crate::commands::CommandStack;
use crate::config::EditorConfig;
use crate::events::EditorEvent;
use crate::gestures::GestureController;
use crate::input::GestureEvent;
use crate::session::Session;
use kurbo::{Point, Size};
use svedit_core::import::{ImportTree, flatten};
use svedit_core::model::SceneNode;
use svedit_core::text::{FontProvider, HeuristicFonts};
use svedit_core::{NodeId, Scene};
use svedit_render::{SelectionOutline, hit_test, selection_outline};

pub struct Editor {
    pub(crate) session: Session,
    pub(crate) history: CommandStack,
    gestures: GestureController,
    pub(crate) fonts: Box<dyn FontProvider>,
    pub(crate) config: EditorConfig,
}

impl Editor {
    /// Create an editor for a view of `view` size. An invalid `config` is
    /// kept but logged; range clamps stay total.
    pub fn new(view: Size, config: EditorConfig, fonts: Box<dyn FontProvider>) -> Self {
        if let Err(e) = config.validate() {
            log::warn!("editor config: {e}");
        }
        Self {
            session: Session::new(Scene::new(view)),
            history: CommandStack::new(config.history_limit),
            gestures: GestureController::new(),
            fonts,
            config,
        }
    }

    /// Default configuration and the heuristic font provider.
    pub fn with_defaults(view: Size) -> Self {
        Self::new(view, EditorConfig::default(), Box::new(HeuristicFonts::default()))
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn fonts(&self) -> &dyn FontProvider {
        self.fonts.as_ref()
    }

    pub fn scene(&self) -> &Scene {
        self.session.scene()
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn history(&self) -> &CommandStack {
        &self.history
    }

    /// An attached node by id.
    pub fn node(&self, id: NodeId) -> Option<&SceneNode> {
        self.session.scene().attached(id)
    }

    // ─── Scene load ──────────────────────────────────────────────────────

    /// Replace the scene with the importer's tree. Clears the selection
    /// and the undo history.
    pub fn load(&mut self, tree: &ImportTree) {
        let nodes = flatten(tree);
        log::debug!("load: {} nodes, viewbox {:?}", nodes.len(), tree.viewbox);
        let _tx = self.session.transaction();
        self.session.select(None);
        self.session.scene_mut().replace(nodes, tree.viewbox);
        self.history.clear();
        self.gestures = GestureController::new();
        self.session.emit(EditorEvent::StatusChanged);
    }

    // ─── Selection ───────────────────────────────────────────────────────

    pub fn selected(&self) -> Option<NodeId> {
        self.session.selected()
    }

    /// Pick the topmost interactive node at `point` and make it the
    /// selection; a miss deselects.
    pub fn hit_test(&mut self, point: Point) -> Option<NodeId> {
        let hit = hit_test(self.session.scene(), point);
        self.session.select(hit);
        hit
    }

    /// Select a node directly (e.g. from a layer list). Detached ids
    /// are ignored.
    pub fn select(&mut self, id: Option<NodeId>) -> bool {
        if let Some(id) = id
            && !self.session.scene().is_attached(id)
        {
            log::debug!("select: {id} is not in the scene");
            return false;
        }
        self.session.select(id);
        true
    }

    /// Border geometry for the selected node, if it shows one.
    pub fn selection_outline(&self) -> Option<SelectionOutline> {
        let node = self.session.selected_node()?;
        selection_outline(node, self.config.selection_border_width)
    }

    /// Toggle the lock flag. Not recorded in the undo history.
    pub fn set_locked(&mut self, id: NodeId, locked: bool) -> bool {
        let Some(node) = self.session.scene_mut().attached_mut(id) else {
            log::debug!("lock: {id} is not in the scene");
            return false;
        };
        if node.locked == locked {
            return false;
        }
        node.locked = locked;
        self.session.emit(EditorEvent::StatusChanged);
        true
    }

    /// Toggle the hidden flag. Hidden nodes stay in the paint order but
    /// cannot be picked or manipulated. Not recorded in the undo history.
    pub fn set_hidden(&mut self, id: NodeId, hidden: bool) -> bool {
        let Some(node) = self.session.scene_mut().attached_mut(id) else {
            log::debug!("hide: {id} is not in the scene");
            return false;
        };
        if node.hidden == hidden {
            return false;
        }
        node.hidden = hidden;
        self.session.emit(EditorEvent::StatusChanged);
        true
    }

    // ─── Input ───────────────────────────────────────────────────────────

    /// Feed one classified gesture. Returns `true` if the scene changed.
    pub fn handle_gesture(&mut self, event: GestureEvent) -> bool {
        match event {
            GestureEvent::DoubleTap { point } => {
                self.double_tap(point);
                false
            }
            _ => self
                .gestures
                .handle(event, &mut self.session, &mut self.history, &self.config),
        }
    }

    fn double_tap(&mut self, point: Point) {
        self.hit_test(point);
        let Some(id) = self.session.manipulable("double tap") else {
            return;
        };
        if self.session.scene().attached(id).is_some_and(|n| n.kind.is_text()) {
            self.session.emit(EditorEvent::TextEditRequested(id));
        }
    }

    pub fn gesture_active(&self) -> bool {
        self.gestures.is_active()
    }

    // ─── History ─────────────────────────────────────────────────────────

    pub fn undo(&mut self) -> bool {
        let undone = self.history.undo(&mut self.session).is_some();
        if undone {
            let selected = self.session.selected();
            self.session.emit(EditorEvent::GeometryChanged(selected));
        }
        undone
    }

    pub fn redo(&mut self) -> bool {
        let redone = self.history.redo(&mut self.session).is_some();
        if redone {
            let selected = self.session.selected();
            self.session.emit(EditorEvent::GeometryChanged(selected));
        }
        redone
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    // ─── Notifications ───────────────────────────────────────────────────

    pub fn drain_events(&mut self) -> Vec<EditorEvent> {
        self.session.drain_events()
    }

    /// Whether the renderer should currently skip implicit animations.
    pub fn animations_suppressed(&self) -> bool {
        self.session.transactions().animations_suppressed()
    }
}
