//! Selection outline geometry.
//!
//! The renderer strokes a border around the selected node. The border
//! follows the node's rotation, so it is four corners rather than a rect.

use kurbo::Point;
use svedit_core::geometry::rotate_about;
use svedit_core::model::{Color, SceneNode};

#[derive(Debug, Clone, PartialEq)]
pub struct SelectionOutline {
    /// Top-left, top-right, bottom-right, bottom-left in parent space.
    pub corners: [Point; 4],
    pub border_width: f64,
    pub color: Color,
}

/// Outline for `node`, or `None` when the node is locked or hidden (those
/// can be selected but never show a border).
pub fn selection_outline(node: &SceneNode, border_width: f64) -> Option<SelectionOutline> {
    if !node.is_interactive() {
        return None;
    }
    let frame = node.geometry.unrotated_frame();
    let center = frame.center();
    let angle = node.geometry.rotation();
    let corners = [
        Point::new(frame.x0, frame.y0),
        Point::new(frame.x1, frame.y0),
        Point::new(frame.x1, frame.y1),
        Point::new(frame.x0, frame.y1),
    ]
    .map(|p| rotate_about(p, center, angle));
    Some(SelectionOutline {
        corners,
        border_width,
        color: Color::BLACK,
    })
}
