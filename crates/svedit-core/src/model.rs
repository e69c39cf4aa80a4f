//! Scene node model.
//!
//! The editable scene is a flat, paint-ordered list of leaf nodes: shapes,
//! text, gradients, and clip-rendered images. Group structure only exists
//! in the importer's tree and is flattened away on load (see `import`).

use crate::geometry::Geometry;
use crate::id::NodeId;
use crate::text::AttributedText;
use kurbo::{BezPath, Rect};
use serde::{Deserialize, Serialize};

// ─── Colors ──────────────────────────────────────────────────────────────

/// RGBA color. Stored as 4 × f32 [0.0, 1.0].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

fn hex_val(c: u8) -> Option<u8> {
    match c {
        b'0'..=b'9' => Some(c - b'0'),
        b'a'..=b'f' => Some(c - b'a' + 10),
        b'A'..=b'F' => Some(c - b'A' + 10),
        _ => None,
    }
}

impl Color {
    pub const BLACK: Color = Color::rgba(0.0, 0.0, 0.0, 1.0);
    pub const WHITE: Color = Color::rgba(1.0, 1.0, 1.0, 1.0);

    pub const fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Parse `#RGB`, `#RGBA`, `#RRGGBB`, or `#RRGGBBAA`. Surrounding
    /// whitespace and the leading `#` are optional.
    pub fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.trim();
        let hex = hex.strip_prefix('#').unwrap_or(hex);
        let bytes = hex.as_bytes();

        let nibble = |i: usize| hex_val(bytes[i]).map(|v| f32::from(v * 17) / 255.0);
        let byte = |i: usize| -> Option<f32> {
            let v = hex_val(bytes[i])? << 4 | hex_val(bytes[i + 1])?;
            Some(f32::from(v) / 255.0)
        };

        match bytes.len() {
            3 => Some(Self::rgba(nibble(0)?, nibble(1)?, nibble(2)?, 1.0)),
            4 => Some(Self::rgba(nibble(0)?, nibble(1)?, nibble(2)?, nibble(3)?)),
            6 => Some(Self::rgba(byte(0)?, byte(2)?, byte(4)?, 1.0)),
            8 => Some(Self::rgba(byte(0)?, byte(2)?, byte(4)?, byte(6)?)),
            _ => None,
        }
    }

    /// `#RRGGBB`, or `#RRGGBBAA` when not fully opaque.
    pub fn to_hex(&self) -> String {
        let channel = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
        let (r, g, b, a) = (channel(self.r), channel(self.g), channel(self.b), channel(self.a));
        if a == 255 {
            format!("#{r:02X}{g:02X}{b:02X}")
        } else {
            format!("#{r:02X}{g:02X}{b:02X}{a:02X}")
        }
    }

    pub fn with_alpha(self, a: f32) -> Self {
        Self {
            a: a.clamp(0.0, 1.0),
            ..self
        }
    }
}

// ─── Node content ────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub struct GradientStop {
    pub offset: f32, // 0.0 .. 1.0
    pub color: Color,
}

/// Opaque handle to host-decoded image contents.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ImageRef(pub String);

/// The closed set of editable element kinds.
#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    /// Vector shape; `path` is in content space (the node's bounds).
    Shape { path: BezPath, fill: Option<Color> },

    /// Attributed text; the frame is derived from font metrics.
    Text { content: AttributedText },

    Gradient { stops: Vec<GradientStop> },

    /// Clip-rendered raster content (imported bitmaps and inserted images).
    ClipRender { image: Option<ImageRef> },
}

impl NodeKind {
    pub fn label(&self) -> &'static str {
        match self {
            NodeKind::Shape { .. } => "shape",
            NodeKind::Text { .. } => "text",
            NodeKind::Gradient { .. } => "gradient",
            NodeKind::ClipRender { .. } => "image",
        }
    }

    pub fn is_text(&self) -> bool {
        matches!(self, NodeKind::Text { .. })
    }

    pub fn text(&self) -> Option<&AttributedText> {
        match self {
            NodeKind::Text { content } => Some(content),
            _ => None,
        }
    }

    pub fn path(&self) -> Option<&BezPath> {
        match self {
            NodeKind::Shape { path, .. } => Some(path),
            _ => None,
        }
    }
}

// ─── Scene nodes ─────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub struct SceneNode {
    pub id: NodeId,
    pub kind: NodeKind,
    pub geometry: Geometry,
    /// Layer opacity, used by kinds without a colour of their own.
    pub opacity: f32,
    pub shadow_color: Option<Color>,
    /// Locked nodes are skipped by picking and every gesture.
    pub locked: bool,
    pub hidden: bool,
}

impl SceneNode {
    /// A centre-anchored node with an identity transform occupying `frame`.
    pub fn new(id: NodeId, kind: NodeKind, frame: Rect) -> Self {
        Self {
            id,
            kind,
            geometry: Geometry::from_frame(frame),
            opacity: 1.0,
            shadow_color: None,
            locked: false,
            hidden: false,
        }
    }

    pub fn frame(&self) -> Rect {
        self.geometry.frame()
    }

    /// Whether the node can be picked and manipulated.
    pub fn is_interactive(&self) -> bool {
        !self.locked && !self.hidden
    }
}
