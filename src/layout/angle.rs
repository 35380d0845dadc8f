//! Geometry on the normalized turn space: angles are fractions of a full
//! revolution in `[0, 1)`, and turn 0 sits at 12 o'clock once converted to
//! screen degrees (y grows downward).

use crate::ir::PropValue;
use tracing::warn;

/// Angular width of `[start, end)` with wraparound. A zero or negative raw
/// span means a full turn.
pub fn span(start: f64, end: f64) -> f64 {
    let total = (end - start).rem_euclid(1.0);
    if total <= 0.0 { 1.0 } else { total }
}

/// Midpoint of `[start, end)`, normalized back into `[0, 1)`. An end below
/// the start represents wraparound and is treated as `end + 1`.
pub fn mid_angle(start: f64, end: f64) -> f64 {
    let end = if end < start { end + 1.0 } else { end };
    let mid = (start + end) / 2.0;
    if mid >= 1.0 { mid - 1.0 } else { mid }
}

/// Converts a turn fraction to screen degrees with turn 0 at the top of the
/// wheel, in `[0, 360)`.
pub fn turn_to_degrees(turn: f64) -> f64 {
    let deg = turn * 360.0 - 90.0;
    if deg < 0.0 { deg + 360.0 } else { deg }
}

/// Flips angles pointing into the left half-plane so label text is never
/// upside-down. The result is never in `(90, 270]`.
pub fn upright_rotation(deg: f64) -> f64 {
    if deg > 90.0 && deg <= 270.0 {
        (deg + 180.0) % 360.0
    } else {
        deg
    }
}

/// Top-left corner of a text box of the given size whose center sits at
/// polar position (radius, angle) around `center`.
pub fn position(
    center: (f64, f64),
    radius: f64,
    angle_deg: f64,
    text_width: f64,
    text_height: f64,
) -> (f64, f64) {
    let rad = angle_deg.to_radians();
    (
        center.0 + radius * rad.cos() - text_width / 2.0,
        center.1 + radius * rad.sin() - text_height / 2.0,
    )
}

/// How a label is rotated relative to its slice.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RotationOption {
    Horizontal,
    Vertical,
    /// Along the radius, flipped to stay upright. The default.
    Radial,
    /// Along the arc, no upright correction.
    Perpendicular,
    PerpendicularUpright,
    /// A fixed user-supplied angle in degrees.
    Constant(f64),
}

impl RotationOption {
    pub fn from_value(value: Option<&PropValue>) -> Self {
        match value {
            Some(PropValue::Number(angle)) => Self::Constant(*angle),
            Some(PropValue::Text(token)) => match token.as_str() {
                "horizontal" => Self::Horizontal,
                "vertical" => Self::Vertical,
                "radial" => Self::Radial,
                "perpendicular" => Self::Perpendicular,
                "perpendicular_upright" => Self::PerpendicularUpright,
                other => {
                    warn!(option = other, "unknown text_rotation, using radial");
                    Self::Radial
                }
            },
            _ => Self::Radial,
        }
    }

    pub fn rotation(self, angle_deg: f64) -> f64 {
        match self {
            Self::Horizontal => 0.0,
            Self::Vertical => 90.0,
            Self::Radial => upright_rotation(angle_deg),
            Self::Perpendicular => (angle_deg + 90.0) % 360.0,
            Self::PerpendicularUpright => upright_rotation((angle_deg + 90.0) % 360.0),
            Self::Constant(value) => value,
        }
    }
}

/// How far from the center a label sits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlacementOption {
    /// Just beyond the outer edge.
    Outside,
    /// Hugging the outer edge from the inside.
    InsideTop,
    /// Midway between inner and outer radius. The default, and the fallback
    /// for unknown options.
    Centered,
}

impl PlacementOption {
    pub fn from_value(value: Option<&PropValue>) -> Self {
        match value.and_then(PropValue::as_text) {
            Some("outside") => Self::Outside,
            Some("inside_top") => Self::InsideTop,
            Some("centered") | None => Self::Centered,
            Some(other) => {
                warn!(option = other, "unknown text_placement, using centered");
                Self::Centered
            }
        }
    }

    pub fn radius(self, inner: f64, outer: f64, text_height: f64, margin: f64) -> f64 {
        match self {
            Self::Outside => outer + text_height / 2.0 + margin,
            Self::InsideTop => outer - text_height / 2.0,
            Self::Centered => (inner + outer) / 2.0,
        }
    }
}
