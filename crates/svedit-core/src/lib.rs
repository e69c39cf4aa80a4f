pub mod geometry;
pub mod id;
pub mod import;
pub mod layout;
pub mod model;
pub mod scene;
pub mod text;

pub use geometry::{AffineExt, Geometry};
pub use id::NodeId;
pub use import::{ImportHints, ImportNode, ImportTree, flatten};
pub use layout::{measure_text, relayout_text};
pub use model::*;
pub use scene::Scene;
pub use text::{AttributedText, FontMetrics, FontProvider, FontSpec, HeuristicFonts, TextAttributes};

// Re-export kurbo so downstream crates share one geometry vocabulary.
pub use kurbo;
