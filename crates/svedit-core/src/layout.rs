//! Text layout: derive a text node's frame from its font metrics.
//!
//! A text node is one unwrapped line. Its width is the measured width of
//! the string with the height limited to the font's cap height (so the
//! measurement never wraps), and its height is `point_size - descender`.
//! The node's position is preserved so edits never make it jump.

use crate::id::NodeId;
use crate::model::{Color, NodeKind, SceneNode};
use crate::text::{AttributedText, FontProvider, FontSpec, TextAttributes};
use kurbo::{Point, Rect, Size};

/// Frame size for `content` laid out with its leading font, or `None`
/// when there is no font attribute or the font is missing.
pub fn measure_text(content: &AttributedText, fonts: &dyn FontProvider) -> Option<Size> {
    let font = content.font_at(0)?;
    let metrics = fonts.metrics(font)?;
    let width = fonts.measure_width(content, metrics.cap_height).ceil();
    Some(Size::new(width, metrics.point_size - metrics.descender))
}

/// Rebuild `node`'s content from its current string and `attributes`, then
/// recompute its bounds.
///
/// Returns `false` and leaves the node untouched for non-text nodes and
/// when the font cannot be measured.
pub fn relayout_text(
    node: &mut SceneNode,
    attributes: TextAttributes,
    fonts: &dyn FontProvider,
) -> bool {
    let NodeKind::Text { content } = &mut node.kind else {
        return false;
    };
    let updated = content.with_attributes(attributes);
    let Some(size) = measure_text(&updated, fonts) else {
        log::debug!("relayout {}: no measurable font", node.id);
        return false;
    };
    *content = updated;

    node.geometry.with_identity_transform(|g| {
        let position = g.position;
        g.set_frame(Rect::from_origin_size(Point::ZERO, size));
        g.position = position;
    });
    log::trace!("relayout {}: {}x{}", node.id, size.width, size.height);
    true
}

/// Create a text node sized for `string` in `font`. The node sits at the
/// origin; callers position it.
pub fn new_text_node(
    id: NodeId,
    string: &str,
    attributes: TextAttributes,
    fonts: &dyn FontProvider,
) -> Option<SceneNode> {
    let content = AttributedText::new(string, attributes);
    let size = measure_text(&content, fonts)?;
    Some(SceneNode::new(
        id,
        NodeKind::Text { content },
        Rect::from_origin_size(Point::ZERO, size),
    ))
}

/// Text attributes for a new node: `family` at `size` in `color`.
pub fn default_attributes(family: &str, size: f64, color: Color) -> TextAttributes {
    TextAttributes {
        font: Some(FontSpec::new(family, size)),
        color: Some(color),
        stroke_width: None,
    }
}
