//! Style and content edits: text string, font, size, colours, opacity,
//! clip images, shape width, and direction changes.
//!
//! Every edit is computed on a copy of the node and written back through
//! a single command, so it lands as one undo step. Text edits funnel
//! through `relayout_text` so the frame always matches the content.

use crate::commands::Command;
use crate::editor::Editor;
use crate::gestures::scale_path;
use kurbo::{Affine, Rect, Size};
use svedit_core::id::NodeId;
use svedit_core::layout::relayout_text;
use svedit_core::model::{Color, ImageRef, NodeKind, SceneNode};
use svedit_core::text::{FontProvider, FontSpec, TextAttributes};

impl Editor {
    /// Edit a copy of `id` with `f` and, if `f` reports a change, write
    /// it back as one `Restyle` step.
    fn restyle(
        &mut self,
        id: NodeId,
        description: &str,
        f: impl FnOnce(&mut SceneNode, &dyn FontProvider) -> bool,
    ) -> bool {
        let Some(node) = self.session.scene().attached(id) else {
            log::debug!("{description}: {id} is not in the scene");
            return false;
        };
        let mut edited = node.clone();
        if !f(&mut edited, self.fonts.as_ref()) {
            return false;
        }
        let command = Command::Restyle {
            id,
            kind: Box::new(edited.kind),
            opacity: edited.opacity,
            geometry: edited.geometry,
        };
        self.history.execute(&mut self.session, command, description)
    }

    fn selected_for(&self, description: &str) -> Option<NodeId> {
        let id = self.session.selected();
        if id.is_none() {
            log::debug!("{description}: nothing selected");
        }
        id
    }

    /// Rebuild the selected text node's attributes with `edit` and relay it
    /// out. Skipped when the node has no font attribute.
    fn edit_text_font(
        &mut self,
        description: &str,
        edit: impl FnOnce(&FontSpec, &dyn FontProvider) -> FontSpec,
    ) -> bool {
        let Some(id) = self.selected_for(description) else {
            return false;
        };
        self.restyle(id, description, |node, fonts| {
            let Some(mut attributes) = node.kind.text().map(|t| t.leading_attributes()) else {
                log::debug!("{description}: {} is not text", node.id);
                return false;
            };
            let Some(font) = attributes.font.as_ref() else {
                log::debug!("{description}: {} has no font", node.id);
                return false;
            };
            attributes.font = Some(edit(font, fonts));
            relayout_text(node, attributes, fonts)
        })
    }

    // ─── Text ────────────────────────────────────────────────────────────

    /// Replace the selected text node's string, keeping its attributes.
    pub fn update_text(&mut self, string: &str) -> bool {
        let Some(id) = self.selected_for("edit text") else {
            return false;
        };
        self.restyle(id, "edit text", |node, fonts| {
            let Some(content) = node.kind.text() else {
                log::debug!("edit text: {} is not text", node.id);
                return false;
            };
            let attributes = content.leading_attributes();
            node.kind = NodeKind::Text {
                content: content.with_string(string),
            };
            relayout_text(node, attributes, fonts)
        })
    }

    /// Switch the selected text node to `family` at its current size. A
    /// missing family falls back to the provider's fallback.
    pub fn change_text_font(&mut self, family: &str) -> bool {
        self.edit_text_font("change font", |font, fonts| {
            let candidate = FontSpec::new(family, font.size);
            if fonts.metrics(&candidate).is_some() {
                candidate
            } else {
                log::debug!("change font: {family} missing, using {}", fonts.fallback_family());
                FontSpec::new(fonts.fallback_family(), font.size)
            }
        })
    }

    /// Resize the selected text node's font, clamped to the configured
    /// range. Non-finite and non-positive sizes are rejected.
    pub fn set_font_size(&mut self, size: f64) -> bool {
        if !(size.is_finite() && size > 0.0) {
            log::debug!("font size: rejecting {size}");
            return false;
        }
        let size = self.config.clamp_font_size(size);
        self.edit_text_font("font size", |font, _| font.with_size(size))
    }

    // ─── Colour and opacity ──────────────────────────────────────────────

    /// Recolour a text node. The new colour keeps the old colour's alpha.
    pub fn set_text_color(&mut self, id: NodeId, color: Color) -> bool {
        self.restyle(id, "text color", |node, fonts| {
            let Some(content) = node.kind.text() else {
                log::debug!("text color: {} is not text", node.id);
                return false;
            };
            let alpha = content.color().map_or(1.0, |c| c.a);
            let attributes = TextAttributes {
                color: Some(color.with_alpha(alpha)),
                ..content.leading_attributes()
            };
            relayout_text(node, attributes, fonts)
        })
    }

    /// Refill a shape. The new colour keeps the old fill's alpha.
    pub fn set_shape_fill(&mut self, id: NodeId, color: Color) -> bool {
        self.restyle(id, "fill", |node, _| {
            let NodeKind::Shape { fill, .. } = &mut node.kind else {
                log::debug!("fill: {} is not a shape", node.id);
                return false;
            };
            let alpha = fill.map_or(1.0, |c| c.a);
            *fill = Some(color.with_alpha(alpha));
            true
        })
    }

    /// Set the selected node's opacity: the foreground alpha for text, the
    /// fill alpha for filled shapes, the node opacity otherwise.
    pub fn set_opacity(&mut self, value: f32) -> bool {
        let Some(id) = self.selected_for("opacity") else {
            return false;
        };
        let value = value.clamp(0.0, 1.0);
        self.restyle(id, "opacity", |node, _| {
            match &mut node.kind {
                NodeKind::Text { content } => {
                    let base = content.color().unwrap_or(Color::BLACK);
                    let attributes = TextAttributes {
                        color: Some(base.with_alpha(value)),
                        ..content.leading_attributes()
                    };
                    *content = content.with_attributes(attributes);
                }
                NodeKind::Shape {
                    fill: Some(fill), ..
                } => *fill = fill.with_alpha(value),
                _ => node.opacity = value,
            }
            true
        })
    }

    /// Swap a clip-render node's image.
    pub fn set_clip_image(&mut self, id: NodeId, image: ImageRef) -> bool {
        self.restyle(id, "image", |node, _| {
            let NodeKind::ClipRender { image: current } = &mut node.kind else {
                log::debug!("image: {} is not an image", node.id);
                return false;
            };
            *current = Some(image);
            true
        })
    }

    // ─── Geometry edits ──────────────────────────────────────────────────

    /// Set a shape's width, keeping the aspect ratio of its bounds and
    /// rescaling its path. The width is clamped to the configured maximum.
    pub fn set_shape_width(&mut self, id: NodeId, width: f64) -> bool {
        let Some(node) = self.session.scene().attached(id) else {
            log::debug!("width: {id} is not in the scene");
            return false;
        };
        let NodeKind::Shape { path, fill } = &node.kind else {
            log::debug!("width: {id} is not a shape");
            return false;
        };
        let old = node.geometry.bounds;
        if old.width <= 0.0 || !(width > 0.0) {
            log::debug!("width: degenerate width for {id}");
            return false;
        }
        let width = width.min(self.config.max_shape_width);
        let bounds = Size::new(width, width * old.height / old.width);

        let mut geometry = node.geometry;
        geometry.with_identity_transform(|g| {
            let position = g.position;
            g.bounds = bounds;
            g.position = position;
        });
        let kind = NodeKind::Shape {
            path: scale_path(path, old, bounds),
            fill: *fill,
        };
        self.history.execute(
            &mut self.session,
            Command::Resize {
                id,
                geometry,
                kind: Box::new(kind),
            },
            "width",
        )
    }

    /// Write a host-computed flip or mirror: `frame` at identity, then
    /// `transform`.
    pub fn change_direction(&mut self, id: NodeId, frame: Rect, transform: Affine) -> bool {
        let Some(node) = self.session.scene().attached(id) else {
            log::debug!("direction: {id} is not in the scene");
            return false;
        };
        let mut geometry = node.geometry;
        geometry.with_identity_transform(|g| g.set_frame(frame));
        geometry.transform = transform;
        self.history
            .execute(&mut self.session, Command::Transform { id, geometry }, "direction")
    }
}
