//! The editable scene: a node arena plus the paint order.
//!
//! Deleted nodes are detached from the paint order but stay in the arena,
//! so an undo step can attach them again with their identity intact.

use crate::geometry::fit_container;
use crate::id::NodeId;
use crate::model::SceneNode;
use kurbo::{Point, Rect, Size};
use std::collections::HashMap;

#[derive(Debug, Clone)]
pub struct Scene {
    nodes: HashMap<NodeId, SceneNode>,
    /// Attached nodes, bottom to top.
    order: Vec<NodeId>,
    /// Size of the editor view hosting the scene.
    view: Size,
    /// Container rectangle inside the view; node coordinates are relative to it.
    container: Rect,
    /// Content viewbox reported by the importer.
    viewbox: Size,
}

impl Scene {
    pub fn new(view: Size) -> Self {
        Self {
            nodes: HashMap::new(),
            order: Vec::new(),
            view,
            container: Rect::from_origin_size(Point::ZERO, view),
            viewbox: Size::ZERO,
        }
    }

    /// Replace every node with `nodes` (already flattened, in paint order)
    /// and fit the container to `viewbox`.
    pub fn replace(&mut self, nodes: Vec<SceneNode>, viewbox: Size) {
        self.nodes.clear();
        self.order.clear();
        for node in nodes {
            self.push(node);
        }
        self.viewbox = viewbox;
        self.container = fit_container(self.view, viewbox);
    }

    pub fn view(&self) -> Size {
        self.view
    }

    pub fn container(&self) -> Rect {
        self.container
    }

    /// The container's size; the space nodes are centred in.
    pub fn canvas_size(&self) -> Size {
        self.container.size()
    }

    pub fn viewbox(&self) -> Size {
        self.viewbox
    }

    /// Append a node on top of the paint order.
    pub fn push(&mut self, node: SceneNode) -> NodeId {
        let id = node.id;
        self.nodes.insert(id, node);
        self.order.retain(|n| *n != id);
        self.order.push(id);
        id
    }

    pub fn get(&self, id: NodeId) -> Option<&SceneNode> {
        self.nodes.get(&id)
    }

    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut SceneNode> {
        self.nodes.get_mut(&id)
    }

    /// The node, if it is currently part of the paint order.
    pub fn attached(&self, id: NodeId) -> Option<&SceneNode> {
        if self.is_attached(id) { self.nodes.get(&id) } else { None }
    }

    pub fn attached_mut(&mut self, id: NodeId) -> Option<&mut SceneNode> {
        if self.is_attached(id) {
            self.nodes.get_mut(&id)
        } else {
            None
        }
    }

    pub fn is_attached(&self, id: NodeId) -> bool {
        self.order.contains(&id)
    }

    pub fn index_of(&self, id: NodeId) -> Option<usize> {
        self.order.iter().position(|n| *n == id)
    }

    /// Remove from the paint order, keeping the node in the arena.
    /// Returns the index it occupied.
    pub fn detach(&mut self, id: NodeId) -> Option<usize> {
        let index = self.index_of(id)?;
        self.order.remove(index);
        Some(index)
    }

    /// Re-insert an arena node into the paint order at `index` (clamped).
    pub fn attach(&mut self, id: NodeId, index: usize) -> bool {
        if !self.nodes.contains_key(&id) || self.is_attached(id) {
            return false;
        }
        let index = index.min(self.order.len());
        self.order.insert(index, id);
        true
    }

    pub fn paint_order(&self) -> &[NodeId] {
        &self.order
    }

    /// Attached nodes, bottom to top.
    pub fn painted(&self) -> impl DoubleEndedIterator<Item = &SceneNode> + '_ {
        self.order.iter().filter_map(|id| self.nodes.get(id))
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}
