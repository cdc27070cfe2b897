use crate::angle_text::{format_angle, AngleStyle};
use crate::math::angle::azimuth_of;
use crate::math::{Point2, TOLERANCE};

/// Distance and direction between two points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InverseCall {
    pub distance: f64,
    /// Engine azimuth in radians, `[0, 2π)`.
    pub azimuth: f64,
}

impl InverseCall {
    /// Bearing text in the given style.
    #[must_use]
    pub fn bearing(&self, style: AngleStyle) -> String {
        format_angle(self.azimuth, style)
    }
}

/// Computes the bearing/distance call from one point to another.
pub struct Inverse {
    from: Point2,
    to: Point2,
}

impl Inverse {
    /// Creates a new `Inverse` query.
    #[must_use]
    pub fn new(from: Point2, to: Point2) -> Self {
        Self { from, to }
    }

    /// Executes the query. Returns `None` for coincident points.
    #[must_use]
    pub fn execute(&self) -> Option<InverseCall> {
        let delta = self.to - self.from;
        let distance = delta.norm();
        if distance < TOLERANCE {
            return None;
        }
        Some(InverseCall {
            distance,
            azimuth: azimuth_of(&delta),
        })
    }
}
