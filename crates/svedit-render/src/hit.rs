//! Hit testing: canvas point → node lookup.
//!
//! Scans the paint order bottom to top and keeps the last match, so the
//! topmost node under the point wins. Rotated nodes are tested by taking
//! the point into the node's unrotated frame.

use kurbo::Point;
use svedit_core::Scene;
use svedit_core::id::NodeId;
use svedit_core::model::SceneNode;

/// Find the topmost visible, unlocked node at `point`.
/// Returns `None` if no node is hit (background).
pub fn hit_test(scene: &Scene, point: Point) -> Option<NodeId> {
    let mut hit = None;
    for node in scene.painted() {
        if node.is_interactive() && contains_point(node, point) {
            hit = Some(node.id);
        }
    }
    log::trace!("hit_test ({}, {}) -> {:?}", point.x, point.y, hit);
    hit
}

/// Whether `point` lies inside `node`'s frame once the node's rotation is
/// undone about the frame centre. Ignores the locked and hidden flags.
pub fn contains_point(node: &SceneNode, point: Point) -> bool {
    let frame = node.geometry.unrotated_frame();
    let local = node.geometry.unrotate_point(point);
    frame.contains(local)
}
