//! Gesture input abstraction.
//!
//! The host's gesture recognizers classify raw touches; the editor only
//! sees the resulting deltas. Every delta is incremental: the host resets
//! its recognizer's baseline after each delivery.

use kurbo::{Point, Vec2};

/// Lifecycle phase of a continuous gesture.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GesturePhase {
    Began,
    Changed,
    Ended,
    Cancelled,
    Failed,
}

impl GesturePhase {
    /// Ended, cancelled, and failed all finalize the gesture the same way.
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            GesturePhase::Ended | GesturePhase::Cancelled | GesturePhase::Failed
        )
    }
}

/// A classified gesture delivered by the host.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GestureEvent {
    /// Translation since the previous delivery.
    Pan { phase: GesturePhase, translation: Vec2 },

    /// Rotation in radians since the previous delivery.
    Rotate { phase: GesturePhase, rotation: f64 },

    /// Multiplicative scale since the previous delivery (1.0 = no change).
    Pinch { phase: GesturePhase, scale: f64 },

    DoubleTap { point: Point },
}

impl GestureEvent {
    pub fn phase(&self) -> Option<GesturePhase> {
        match self {
            Self::Pan { phase, .. } | Self::Rotate { phase, .. } | Self::Pinch { phase, .. } => {
                Some(*phase)
            }
            Self::DoubleTap { .. } => None,
        }
    }

    pub fn pan(phase: GesturePhase, dx: f64, dy: f64) -> Self {
        Self::Pan {
            phase,
            translation: Vec2::new(dx, dy),
        }
    }

    pub fn rotate(phase: GesturePhase, rotation: f64) -> Self {
        Self::Rotate { phase, rotation }
    }

    pub fn pinch(phase: GesturePhase, scale: f64) -> Self {
        Self::Pinch { phase, scale }
    }
}
