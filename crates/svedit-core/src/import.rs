//! Import boundary: the vector importer's node tree and its flattening
//! into the editable scene.
//!
//! The importer hands over a tree whose groups carry frame offsets. On
//! load, every group pushes its (cumulative) origin down to its children,
//! supported leaves are re-anchored at their centre, and one-shot layout
//! hints (`custom_x`, `custom_rotation`, …) are applied and dropped.

use crate::geometry::{AffineExt, CENTER_ANCHOR, Geometry};
use crate::id::NodeId;
use crate::model::{Color, NodeKind, SceneNode};
use kurbo::{Affine, Point, Size, Vec2};
use petgraph::graph::NodeIndex;
use petgraph::stable_graph::StableDiGraph;

/// Scales below this are treated as 1 when un-scaling text offsets.
const MIN_DIVISOR_SCALE: f64 = 1e-9;

/// Import-time layout hints, consumed once by [`flatten`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ImportHints {
    pub custom_x: Option<f64>,
    pub custom_y: Option<f64>,
    /// Degrees.
    pub custom_rotation: Option<f64>,
    pub shadow_color: Option<Color>,
}

impl ImportHints {
    /// Parse raw importer attributes. Unknown keys and unparsable values
    /// are ignored.
    pub fn from_attributes<'a>(attrs: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        let mut hints = Self::default();
        for (key, value) in attrs {
            match key {
                "customX" => hints.custom_x = parse_number(value),
                "customY" => hints.custom_y = parse_number(value),
                "customRotate" => hints.custom_rotation = parse_number(value),
                "shadowColour" | "shadowColor" => hints.shadow_color = Color::from_hex(value),
                _ => log::trace!("import: ignoring attribute {key}"),
            }
        }
        hints
    }
}

fn parse_number(value: &str) -> Option<f64> {
    value.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

/// One node of the importer's tree.
#[derive(Debug, Clone)]
pub struct ImportNode {
    pub id: NodeId,
    /// `None` for groups and for leaves of unsupported kinds.
    pub kind: Option<NodeKind>,
    /// Geometry in parent space as the importer produced it.
    pub geometry: Geometry,
    pub hints: ImportHints,
}

impl ImportNode {
    pub fn group(id: NodeId, origin: Point) -> Self {
        let mut geometry = Geometry {
            anchor: Point::ZERO,
            ..Geometry::default()
        };
        geometry.position = origin;
        Self {
            id,
            kind: None,
            geometry,
            hints: ImportHints::default(),
        }
    }

    pub fn leaf(id: NodeId, kind: NodeKind, geometry: Geometry) -> Self {
        Self {
            id,
            kind: Some(kind),
            geometry,
            hints: ImportHints::default(),
        }
    }

    pub fn with_hints(mut self, hints: ImportHints) -> Self {
        self.hints = hints;
        self
    }
}

/// The importer's node tree plus the content viewbox.
#[derive(Debug, Clone)]
pub struct ImportTree {
    graph: StableDiGraph<ImportNode, ()>,
    root: NodeIndex,
    pub viewbox: Size,
}

impl ImportTree {
    pub fn new(root: ImportNode, viewbox: Size) -> Self {
        let mut graph = StableDiGraph::new();
        let root = graph.add_node(root);
        Self {
            graph,
            root,
            viewbox,
        }
    }

    pub fn root(&self) -> NodeIndex {
        self.root
    }

    /// Add `node` as the last child of `parent`.
    pub fn add_child(&mut self, parent: NodeIndex, node: ImportNode) -> NodeIndex {
        let idx = self.graph.add_node(node);
        self.graph.add_edge(parent, idx, ());
        idx
    }

    pub fn node(&self, idx: NodeIndex) -> &ImportNode {
        &self.graph[idx]
    }

    /// Children in insertion order.
    ///
    /// Sorted by `NodeIndex` so the result does not depend on adjacency
    /// iteration order.
    pub fn children(&self, idx: NodeIndex) -> Vec<NodeIndex> {
        let mut children: Vec<NodeIndex> = self
            .graph
            .neighbors_directed(idx, petgraph::Direction::Outgoing)
            .collect();
        children.sort();
        children
    }
}

/// Flatten the tree into paint-ordered scene leaves.
pub fn flatten(tree: &ImportTree) -> Vec<SceneNode> {
    let mut out = Vec::new();
    flatten_node(tree, tree.root, Vec2::ZERO, &mut out);
    log::debug!("import: flattened {} nodes", out.len());
    out
}

fn flatten_node(tree: &ImportTree, idx: NodeIndex, offset: Vec2, out: &mut Vec<SceneNode>) {
    let node = tree.node(idx);
    let children = tree.children(idx);

    if !children.is_empty() {
        // The group's own origin moves down into its children; the group
        // itself ends up at zero and contributes nothing to the scene.
        let origin = node.geometry.frame().origin().to_vec2() + offset;
        for child in children {
            flatten_node(tree, child, origin, out);
        }
        return;
    }

    let Some(kind) = node.kind.clone() else {
        log::trace!("import: skipping unsupported leaf {}", node.id);
        return;
    };

    let mut geometry = node.geometry;
    geometry.position += offset;
    let anchor_position = geometry.position;

    let frame = geometry.frame();
    geometry.anchor = CENTER_ANCHOR;
    geometry.position = frame.center();

    let mut scene_node = SceneNode {
        id: node.id,
        kind,
        geometry,
        opacity: 1.0,
        shadow_color: None,
        locked: false,
        hidden: false,
    };

    if scene_node.kind.is_text() {
        place_text(&mut scene_node, anchor_position, &node.hints);
    }

    if let Some(degrees) = node.hints.custom_rotation
        && degrees != 0.0
    {
        let t = scene_node.geometry.transform;
        scene_node.geometry.transform = t.rotated(degrees.to_radians());
    }

    out.push(scene_node);
}

/// Text leaves are placed from their pre-recentering position and the
/// transform's translation, both taken out of the transform's scale.
fn place_text(node: &mut SceneNode, anchor_position: Point, hints: &ImportHints) {
    let t = node.geometry.transform;
    let xs = divisor(t.x_scale());
    let ys = divisor(t.y_scale());
    let translation = t.translation_part();

    let x = hints
        .custom_x
        .unwrap_or(translation.x / xs + anchor_position.x / xs);
    let y = hints
        .custom_y
        .unwrap_or(translation.y / ys + anchor_position.y / ys);

    let target = Point::new(x * xs, y * ys);
    let delta = target - node.geometry.frame().origin();
    node.geometry.position += delta;

    if let Some(color) = hints.shadow_color {
        node.shadow_color = Some(color);
    }
}

fn divisor(scale: f64) -> f64 {
    if scale.abs() < MIN_DIVISOR_SCALE { 1.0 } else { scale }
}
