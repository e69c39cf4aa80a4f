//! Editor configuration.
//!
//! Every field has a default, so a partial JSON document (or `{}`) is a
//! valid configuration.

use serde::{Deserialize, Serialize};
use svedit_core::model::Color;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Family for new text nodes.
    pub default_font_family: String,
    /// Point size for new text nodes.
    pub default_font_size: f64,
    pub default_text_color: Color,
    /// Offset of a duplicate from its source, `(dx, dy)`.
    pub duplicate_offset: (f64, f64),
    /// Inclusive `(min, max)` for font size edits.
    pub font_size_range: (f64, f64),
    /// Upper bound for shape width edits.
    pub max_shape_width: f64,
    /// Pinch factors are clamped to at least this.
    pub min_scale_factor: f64,
    /// Maximum undo depth; `None` keeps everything.
    pub history_limit: Option<usize>,
    pub selection_border_width: f64,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            default_font_family: "Avenir".to_string(),
            default_font_size: 80.0,
            default_text_color: Color::BLACK,
            duplicate_offset: (16.0, 16.0),
            font_size_range: (16.0, 500.0),
            max_shape_width: 500.0,
            min_scale_factor: 1e-3,
            history_limit: None,
            selection_border_width: 2.0,
        }
    }
}

impl EditorConfig {
    /// Parse and validate a JSON configuration.
    pub fn from_json(json: &str) -> Result<Self, String> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| format!("invalid editor config: {e}"))?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String, String> {
        serde_json::to_string_pretty(self).map_err(|e| format!("cannot serialize config: {e}"))
    }

    pub fn validate(&self) -> Result<(), String> {
        let (min, max) = self.font_size_range;
        if !(min > 0.0 && min <= max) {
            return Err(format!("font_size_range must satisfy 0 < min <= max, got ({min}, {max})"));
        }
        if !(self.min_scale_factor > 0.0) {
            return Err(format!(
                "min_scale_factor must be positive, got {}",
                self.min_scale_factor
            ));
        }
        if !(self.max_shape_width > 0.0) {
            return Err(format!(
                "max_shape_width must be positive, got {}",
                self.max_shape_width
            ));
        }
        if self.history_limit == Some(0) {
            return Err("history_limit must be at least 1 when set".to_string());
        }
        Ok(())
    }

    /// Clamp a requested font size into the configured range. An inverted
    /// range resolves to its upper bound.
    pub fn clamp_font_size(&self, size: f64) -> f64 {
        let (min, max) = self.font_size_range;
        size.max(min).min(max)
    }
}
