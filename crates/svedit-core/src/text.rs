//! Attributed text content and the font-metrics boundary.
//!
//! Glyph rendering lives outside the editor; the only thing the core
//! needs from a font is its metrics and a width measurement.

use crate::model::Color;
use smallvec::{SmallVec, smallvec};
use std::ops::Range;

// ─── Attributes ──────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub struct FontSpec {
    pub family: String,
    pub size: f64,
}

impl FontSpec {
    pub fn new(family: impl Into<String>, size: f64) -> Self {
        Self {
            family: family.into(),
            size,
        }
    }

    pub fn with_size(&self, size: f64) -> Self {
        Self {
            family: self.family.clone(),
            size,
        }
    }
}

/// Per-run text attributes.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TextAttributes {
    pub font: Option<FontSpec>,
    /// Foreground colour. `None` renders as opaque black.
    pub color: Option<Color>,
    pub stroke_width: Option<f64>,
}

/// A run of `string` (byte range) sharing one attribute set.
#[derive(Debug, Clone, PartialEq)]
pub struct TextRun {
    pub range: Range<usize>,
    pub attributes: TextAttributes,
}

/// A string with attribute runs covering it.
#[derive(Debug, Clone, PartialEq)]
pub struct AttributedText {
    string: String,
    runs: SmallVec<[TextRun; 1]>,
}

impl AttributedText {
    /// Single-run attributed text.
    pub fn new(string: impl Into<String>, attributes: TextAttributes) -> Self {
        let string = string.into();
        let runs = smallvec![TextRun {
            range: 0..string.len(),
            attributes,
        }];
        Self { string, runs }
    }

    /// Build from explicit runs. Runs are clipped to the string and
    /// sorted; the first run is extended back to byte 0 and later gaps
    /// take the attributes of the preceding run.
    pub fn from_runs(string: impl Into<String>, runs: impl IntoIterator<Item = TextRun>) -> Self {
        let string = string.into();
        let len = string.len();
        let mut runs: SmallVec<[TextRun; 1]> = runs
            .into_iter()
            .filter(|r| r.range.start < len)
            .map(|mut r| {
                r.range.end = r.range.end.min(len);
                r
            })
            .collect();
        runs.sort_by_key(|r| r.range.start);
        if let Some(first) = runs.first_mut() {
            first.range.start = 0;
        }
        if runs.is_empty() {
            runs.push(TextRun {
                range: 0..len,
                attributes: TextAttributes::default(),
            });
        }
        Self { string, runs }
    }

    pub fn string(&self) -> &str {
        &self.string
    }

    pub fn runs(&self) -> &[TextRun] {
        &self.runs
    }

    pub fn is_empty(&self) -> bool {
        self.string.is_empty()
    }

    /// Attributes in effect at byte `location`.
    pub fn attributes_at(&self, location: usize) -> Option<&TextAttributes> {
        self.runs
            .iter()
            .rev()
            .find(|r| r.range.start <= location)
            .map(|r| &r.attributes)
    }

    /// Attributes of the first run; the attribute set edits operate on.
    pub fn leading_attributes(&self) -> TextAttributes {
        self.attributes_at(0).cloned().unwrap_or_default()
    }

    pub fn font_at(&self, location: usize) -> Option<&FontSpec> {
        self.attributes_at(location)?.font.as_ref()
    }

    pub fn stroke_width_at(&self, location: usize) -> Option<f64> {
        self.attributes_at(location)?.stroke_width
    }

    pub fn color(&self) -> Option<Color> {
        self.attributes_at(0)?.color
    }

    /// Replace the string, keeping the leading attributes as a single run.
    pub fn with_string(&self, string: impl Into<String>) -> Self {
        Self::new(string, self.leading_attributes())
    }

    /// Replace the attributes with a single run over the same string.
    pub fn with_attributes(&self, attributes: TextAttributes) -> Self {
        Self::new(self.string.clone(), attributes)
    }
}

// ─── Font metrics boundary ───────────────────────────────────────────────

/// Metrics for one font at one point size.
///
/// `descender` follows the usual convention of being negative below the
/// baseline, so `point_size - descender` is the full line box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FontMetrics {
    pub point_size: f64,
    pub descender: f64,
    pub cap_height: f64,
}

/// Font capability supplied by the host.
pub trait FontProvider {
    /// Metrics for `font`, or `None` when the family is not available.
    fn metrics(&self, font: &FontSpec) -> Option<FontMetrics>;

    /// Width of `text` laid out on one unconstrained line whose height is
    /// limited to `max_height`.
    fn measure_width(&self, text: &AttributedText, max_height: f64) -> f64;

    /// Family used when a requested family is missing.
    fn fallback_family(&self) -> &str {
        "System"
    }
}

/// Deterministic metrics for hosts without a shaping engine: a fixed
/// advance per character and fixed cap height / descender ratios.
#[derive(Debug, Clone)]
pub struct HeuristicFonts {
    families: Vec<String>,
    advance: f64,
    cap_height: f64,
    descender: f64,
}

impl Default for HeuristicFonts {
    fn default() -> Self {
        Self::new(["System", "Avenir", "Helvetica", "Georgia"])
    }
}

impl HeuristicFonts {
    pub fn new<I, S>(families: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            families: families.into_iter().map(Into::into).collect(),
            advance: 0.6,
            cap_height: 0.7,
            descender: -0.2,
        }
    }

    /// Override the per-character advance, in ems.
    pub fn with_advance(mut self, advance: f64) -> Self {
        self.advance = advance;
        self
    }

    pub fn has_family(&self, family: &str) -> bool {
        self.families.iter().any(|f| f.eq_ignore_ascii_case(family))
    }
}

impl FontProvider for HeuristicFonts {
    fn metrics(&self, font: &FontSpec) -> Option<FontMetrics> {
        if !self.has_family(&font.family) || !(font.size.is_finite() && font.size > 0.0) {
            return None;
        }
        Some(FontMetrics {
            point_size: font.size,
            descender: font.size * self.descender,
            cap_height: font.size * self.cap_height,
        })
    }

    fn measure_width(&self, text: &AttributedText, _max_height: f64) -> f64 {
        let string = text.string();
        text.runs()
            .iter()
            .map(|run| {
                let size = run.attributes.font.as_ref().map_or(0.0, |f| f.size);
                let chars = string
                    .get(run.range.clone())
                    .map_or(0, |s| s.chars().count());
                chars as f64 * size * self.advance
            })
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn avenir(size: f64) -> TextAttributes {
        TextAttributes {
            font: Some(FontSpec::new("Avenir", size)),
            ..Default::default()
        }
    }

    #[test]
    fn with_string_keeps_leading_attributes() {
        let text = AttributedText::new("Hello", avenir(40.0));
        let edited = text.with_string("Goodbye");
        assert_eq!(edited.string(), "Goodbye");
        assert_eq!(edited.font_at(0), Some(&FontSpec::new("Avenir", 40.0)));
        assert_eq!(edited.runs()[0].range, 0..7);
    }

    #[test]
    fn attributes_at_follows_runs() {
        let text = AttributedText::from_runs(
            "ab",
            [
                TextRun {
                    range: 0..1,
                    attributes: avenir(10.0),
                },
                TextRun {
                    range: 1..2,
                    attributes: TextAttributes {
                        stroke_width: Some(2.0),
                        ..avenir(20.0)
                    },
                },
            ],
        );
        assert_eq!(text.font_at(1).map(|f| f.size), Some(20.0));
        assert_eq!(text.stroke_width_at(0), None);
        assert_eq!(text.stroke_width_at(1), Some(2.0));
    }

    #[test]
    fn leading_gap_takes_first_run() {
        let text = AttributedText::from_runs(
            "abcd",
            [TextRun {
                range: 2..4,
                attributes: avenir(30.0),
            }],
        );
        assert_eq!(text.runs()[0].range, 0..4);
        assert_eq!(text.leading_attributes(), avenir(30.0));
    }

    #[test]
    fn heuristic_fonts_reject_degenerate_sizes() {
        let fonts = HeuristicFonts::default();
        assert!(fonts.metrics(&FontSpec::new("Avenir", f64::NAN)).is_none());
        assert!(fonts.metrics(&FontSpec::new("Avenir", f64::INFINITY)).is_none());
        assert!(fonts.metrics(&FontSpec::new("Avenir", 0.0)).is_none());
    }

    #[test]
    fn heuristic_fonts_report_missing_family() {
        let fonts = HeuristicFonts::default();
        assert!(fonts.metrics(&FontSpec::new("Avenir", 80.0)).is_some());
        assert!(fonts.metrics(&FontSpec::new("Comic Sans", 80.0)).is_none());
    }

    #[test]
    fn heuristic_width_sums_runs() {
        let fonts = HeuristicFonts::default().with_advance(0.5);
        let text = AttributedText::new("abcd", avenir(10.0));
        assert_eq!(fonts.measure_width(&text, 7.0), 20.0);
    }
}
