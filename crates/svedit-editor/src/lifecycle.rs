//! Scene lifecycle: adding, deleting, and duplicating nodes.
//!
//! Each operation registers exactly one undo step. Inserts register a
//! `Remove`; deletes go through `Remove` themselves and get a `Restore`
//! back.

use crate::commands::Command;
use crate::editor::Editor;
use crate::events::EditorEvent;
use kurbo::{Affine, Point, Rect, Size, Vec2};
use svedit_core::id::NodeId;
use svedit_core::layout::{default_attributes, new_text_node, relayout_text};
use svedit_core::model::{ImageRef, NodeKind, SceneNode};

/// Where an inserted node ends up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Placement {
    /// Centre the node's frame in the canvas.
    #[default]
    Centered,
    /// Keep the geometry the node already has.
    AsIs,
}

impl Editor {
    /// Add `node` on top of the paint order and select it. Returns `None`
    /// if a node with the same id already exists.
    pub fn add_node(&mut self, node: SceneNode, placement: Placement) -> Option<NodeId> {
        let description = format!("add {}", node.kind.label());
        self.insert_node(node, placement, &description)
    }

    fn insert_node(
        &mut self,
        mut node: SceneNode,
        placement: Placement,
        description: &str,
    ) -> Option<NodeId> {
        let id = node.id;
        if self.session.scene().get(id).is_some() {
            log::debug!("add: {id} already exists");
            return None;
        }
        let _tx = self.session.transaction();

        if placement == Placement::Centered {
            let canvas = self.session.scene().canvas_size();
            node.geometry.with_identity_transform(|g| {
                let size = g.frame().size();
                g.set_origin(Point::new(
                    (canvas.width - size.width) / 2.0,
                    (canvas.height - size.height) / 2.0,
                ));
            });
        }
        node.hidden = false;

        self.session.scene_mut().push(node);
        self.history.register(Command::Remove { id }, description);
        self.session.select(Some(id));
        self.session.emit(EditorEvent::StatusChanged);
        log::debug!("{description}: {id}");
        Some(id)
    }

    /// Detach `id` from the scene. Undo puts it back at the same index.
    pub fn delete_node(&mut self, id: NodeId) -> bool {
        let deleted = self
            .history
            .execute(&mut self.session, Command::Remove { id }, "delete");
        if !deleted {
            log::debug!("delete: {id} is not in the scene");
        }
        deleted
    }

    pub fn delete_selected(&mut self) -> bool {
        match self.session.selected() {
            Some(id) => self.delete_node(id),
            None => {
                log::debug!("delete: nothing selected");
                false
            }
        }
    }

    /// Copy a text node, offset by the configured duplicate offset, on top
    /// of the paint order. Other kinds, and text whose font is unavailable,
    /// are not duplicated.
    pub fn duplicate_node(&mut self, id: NodeId) -> Option<NodeId> {
        let Some(source) = self.session.scene().attached(id) else {
            log::debug!("duplicate: {id} is not in the scene");
            return None;
        };
        let Some(content) = source.kind.text() else {
            log::debug!("duplicate: {id} is a {}, only text is duplicated", source.kind.label());
            return None;
        };
        let attributes = content.leading_attributes();

        let mut copy = source.clone();
        copy.id = NodeId::with_prefix("text");
        copy.locked = false;
        let (dx, dy) = self.config.duplicate_offset;
        copy.geometry.position += Vec2::new(dx, dy);
        if !relayout_text(&mut copy, attributes, self.fonts.as_ref()) {
            log::debug!("duplicate: {id} has no available font");
            return None;
        }

        self.insert_node(copy, Placement::AsIs, "duplicate")
    }

    pub fn duplicate_selected(&mut self) -> Option<NodeId> {
        let id = self.session.selected()?;
        self.duplicate_node(id)
    }

    /// Create a text node in the default size and colour, centred. Uses
    /// the configured family when `family` is `None`. Returns `None` when
    /// the font is unavailable.
    pub fn add_text(&mut self, string: &str, family: Option<&str>) -> Option<NodeId> {
        let family = family.unwrap_or(&self.config.default_font_family);
        let attributes = default_attributes(
            family,
            self.config.default_font_size,
            self.config.default_text_color,
        );
        let Some(node) = new_text_node(
            NodeId::with_prefix("text"),
            string,
            attributes,
            self.fonts.as_ref(),
        ) else {
            log::debug!("add text: font {family} is not available");
            return None;
        };
        self.insert_node(node, Placement::Centered, "add text")
    }

    /// Insert host-decoded image content of `size`, centred in the canvas,
    /// with `transform` applied about its centre.
    pub fn insert_image(&mut self, image: ImageRef, size: Size, transform: Affine) -> Option<NodeId> {
        let mut node = SceneNode::new(
            NodeId::with_prefix("image"),
            NodeKind::ClipRender { image: Some(image) },
            Rect::from_origin_size(Point::ZERO, size),
        );
        node.geometry.transform = transform;
        self.insert_node(node, Placement::Centered, "insert image")
    }
}
