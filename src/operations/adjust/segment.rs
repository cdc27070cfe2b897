use tracing::debug;

use crate::error::AdjustError;
use crate::math::angle::{direction, rotate};
use crate::math::{Point2, Vector2, NEAR_ZERO_SQ};
use crate::plan::Leg;

/// Relative slack below zero before a discriminant counts as negative.
const DISCRIMINANT_SLACK: f64 = 1e-12;

/// Solution for one anchor-to-anchor span.
#[derive(Debug, Clone, PartialEq)]
pub struct SegmentSolution {
    /// Start anchor, every intermediate vertex, end anchor.
    pub positions: Vec<Point2>,
    /// Factor applied to free legs.
    pub scale: f64,
    /// Rotation applied to every leg, radians.
    pub rotation: f64,
    /// The span had no usable free legs and was matched by rotation alone.
    pub rotation_only: bool,
}

/// Fits a chain of legs between two fixed anchors.
///
/// One scale `s` stretches every free leg, locked legs keep their length, and
/// one rotation `φ` turns every leg. `s` solves
/// `|V_locked + s·V_free|² = |end − start|²`; among the positive roots the
/// one closest to 1 is taken. `φ` then turns `V_locked + s·V_free` onto
/// `end − start`, so walking the chain lands on `end`.
pub struct SegmentAdjust<'a> {
    start: Point2,
    end: Point2,
    legs: Vec<&'a Leg>,
    from_label: String,
    to_label: String,
    locked_length_tolerance: f64,
}

impl<'a> SegmentAdjust<'a> {
    /// Creates a new `SegmentAdjust` operation.
    #[must_use]
    pub fn new(start: Point2, end: Point2, legs: Vec<&'a Leg>) -> Self {
        Self {
            start,
            end,
            legs,
            from_label: "start".into(),
            to_label: "end".into(),
            locked_length_tolerance: 1e-6,
        }
    }

    /// Names the anchors in error messages.
    #[must_use]
    pub fn with_labels(mut self, from: impl Into<String>, to: impl Into<String>) -> Self {
        self.from_label = from.into();
        self.to_label = to.into();
        self
    }

    /// Allowed mismatch when the span must close by rotation alone.
    #[must_use]
    pub fn with_locked_length_tolerance(mut self, tolerance: f64) -> Self {
        self.locked_length_tolerance = tolerance;
        self
    }

    /// Executes the adjustment.
    ///
    /// # Errors
    ///
    /// Returns [`AdjustError::NoFreeLegSpan`] when the free legs have no net
    /// length and the locked legs do not already span the anchors, and
    /// [`AdjustError::UnreachableSpan`] when no positive scale closes the span.
    #[allow(clippy::many_single_char_names)]
    pub fn execute(&self) -> Result<SegmentSolution, AdjustError> {
        let target = self.end - self.start;

        let mut v_locked = Vector2::zeros();
        let mut v_free = Vector2::zeros();
        for leg in &self.legs {
            if leg.locked {
                v_locked += leg.vector();
            } else {
                v_free += leg.vector();
            }
        }

        let a = v_free.norm_squared();
        let (scale, rotation_only) = if a < NEAR_ZERO_SQ {
            let composed = (v_locked + v_free).norm();
            if (composed - target.norm()).abs() > self.locked_length_tolerance {
                return Err(AdjustError::NoFreeLegSpan {
                    from: self.from_label.clone(),
                    to: self.to_label.clone(),
                    locked_length: v_locked.norm(),
                    target_length: target.norm(),
                });
            }
            (1.0, true)
        } else {
            let b = 2.0 * v_locked.dot(&v_free);
            let c = v_locked.norm_squared() - target.norm_squared();
            let s = select_root(a, b, c).ok_or_else(|| AdjustError::UnreachableSpan {
                from: self.from_label.clone(),
                to: self.to_label.clone(),
            })?;
            (s, false)
        };

        let composed = v_locked + v_free * scale;
        let rotation = if composed.norm_squared() < NEAR_ZERO_SQ
            || target.norm_squared() < NEAR_ZERO_SQ
        {
            0.0
        } else {
            target.y.atan2(target.x) - composed.y.atan2(composed.x)
        };

        let mut positions = Vec::with_capacity(self.legs.len() + 1);
        let mut p = self.start;
        positions.push(p);
        for leg in &self.legs {
            let length = if leg.locked {
                leg.distance
            } else {
                leg.distance * scale
            };
            p += direction(leg.azimuth + rotation) * length;
            positions.push(p);
        }

        debug!(
            from = %self.from_label,
            to = %self.to_label,
            legs = self.legs.len(),
            scale,
            rotation_deg = rotation.to_degrees(),
            rotation_only,
            closure = (rotate(&composed, rotation) - target).norm(),
            "span adjusted"
        );

        Ok(SegmentSolution {
            positions,
            scale,
            rotation,
            rotation_only,
        })
    }
}

/// Positive real root of `a·s² + b·s + c = 0` closest to 1, for `a > 0`.
fn select_root(a: f64, b: f64, c: f64) -> Option<f64> {
    let mut disc = b * b - 4.0 * a * c;
    if disc < 0.0 {
        let magnitude = (b * b).max((4.0 * a * c).abs());
        if disc < -DISCRIMINANT_SLACK * magnitude {
            return None;
        }
        disc = 0.0;
    }
    let sq = disc.sqrt();
    // Citardauq form avoids cancellation when b² ≫ 4ac.
    let q = -0.5 * (b + b.signum() * sq);
    let roots = if q == 0.0 {
        [-b / (2.0 * a), -b / (2.0 * a)]
    } else {
        [q / a, c / q]
    };
    roots
        .into_iter()
        .filter(|r| r.is_finite() && *r > 0.0)
        .min_by(|x, y| (x - 1.0).abs().total_cmp(&(y - 1.0).abs()))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::f64::consts::{FRAC_PI_2, PI};

    use approx::assert_abs_diff_eq;

    use super::*;

    fn leg(distance: f64, azimuth: f64, locked: bool) -> Leg {
        Leg {
            from: 0,
            to: 0,
            distance,
            azimuth,
            locked,
            text: None,
        }
    }

    fn lengths(positions: &[Point2]) -> Vec<f64> {
        positions.windows(2).map(|w| (w[1] - w[0]).norm()).collect()
    }

    #[test]
    fn exact_chain_is_unchanged() {
        let legs = [leg(100.0, 0.0, false), leg(50.0, FRAC_PI_2, false)];
        let sol = SegmentAdjust::new(
            Point2::origin(),
            Point2::new(100.0, 50.0),
            legs.iter().collect(),
        )
        .execute()
        .unwrap();
        assert_abs_diff_eq!(sol.scale, 1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(sol.rotation, 0.0, epsilon = 1e-12);
        assert_abs_diff_eq!(sol.positions[1].x, 100.0, epsilon = 1e-9);
    }

    #[test]
    fn free_legs_absorb_length_and_locked_keep_it() {
        let legs = [
            leg(30.0, 0.0, true),
            leg(40.0, 0.3, false),
            leg(20.0, FRAC_PI_2, false),
            leg(10.0, 1.0, true),
        ];
        let start = Point2::new(5.0, -3.0);
        let end = Point2::new(80.0, 60.0);
        let sol = SegmentAdjust::new(start, end, legs.iter().collect()).execute().unwrap();

        let last = sol.positions[sol.positions.len() - 1];
        assert!((last - end).norm() < 1e-6);
        let out = lengths(&sol.positions);
        assert_abs_diff_eq!(out[0], 30.0, epsilon = 1e-9);
        assert_abs_diff_eq!(out[3], 10.0, epsilon = 1e-9);
        assert_abs_diff_eq!(out[1], 40.0 * sol.scale, epsilon = 1e-9);
        assert_abs_diff_eq!(out[2], 20.0 * sol.scale, epsilon = 1e-9);
    }

    #[test]
    fn rotation_applies_to_every_leg() {
        let legs = [leg(10.0, 0.0, true), leg(10.0, 0.0, false)];
        // Anchor rotated by 90°, same length: pure rotation.
        let sol = SegmentAdjust::new(
            Point2::origin(),
            Point2::new(0.0, 20.0),
            legs.iter().collect(),
        )
        .execute()
        .unwrap();
        assert_abs_diff_eq!(sol.rotation, FRAC_PI_2, epsilon = 1e-12);
        assert_abs_diff_eq!(sol.scale, 1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(sol.positions[1].y, 10.0, epsilon = 1e-9);
    }

    #[test]
    fn picks_root_closest_to_one() {
        // Locked leg east 10, free leg west 20; target length 5 gives roots
        // s = 0.25 and s = 0.75.
        let uneven = [leg(10.0, 0.0, true), leg(20.0, PI, false)];
        let sol = SegmentAdjust::new(
            Point2::origin(),
            Point2::new(5.0, 0.0),
            uneven.iter().collect(),
        )
        .execute()
        .unwrap();
        assert_abs_diff_eq!(sol.scale, 0.75, epsilon = 1e-12);
        assert!((sol.positions[2] - Point2::new(5.0, 0.0)).norm() < 1e-9);

        let legs = [leg(10.0, 0.0, true), leg(10.0, PI, false)];
        let sol = SegmentAdjust::new(Point2::origin(), Point2::new(0.0, 4.0), legs.iter().collect())
            .execute()
            .unwrap();
        // Roots 0.6 and 1.4 are equally far; either closes the span.
        assert!((sol.scale - 0.6).abs() < 1e-9 || (sol.scale - 1.4).abs() < 1e-9);
        let last = sol.positions[2];
        assert!((last - Point2::new(0.0, 4.0)).norm() < 1e-6);
    }

    #[test]
    fn locked_only_span_that_fits_rotates() {
        let legs = [leg(3.0, 0.0, true), leg(4.0, FRAC_PI_2, true)];
        let sol = SegmentAdjust::new(Point2::origin(), Point2::new(0.0, 5.0), legs.iter().collect())
            .execute()
            .unwrap();
        assert!(sol.rotation_only);
        assert!((sol.positions[2] - Point2::new(0.0, 5.0)).norm() < 1e-9);
    }

    #[test]
    fn locked_only_span_that_does_not_fit_fails() {
        let legs = [leg(3.0, 0.0, true), leg(4.0, FRAC_PI_2, true)];
        let err = SegmentAdjust::new(Point2::origin(), Point2::new(0.0, 5.1), legs.iter().collect())
            .with_labels("P1", "P3")
            .execute()
            .unwrap_err();
        match err {
            AdjustError::NoFreeLegSpan {
                from,
                to,
                locked_length,
                target_length,
            } => {
                assert_eq!((from.as_str(), to.as_str()), ("P1", "P3"));
                assert_abs_diff_eq!(locked_length, 5.0, epsilon = 1e-12);
                assert_abs_diff_eq!(target_length, 5.1, epsilon = 1e-12);
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn cancelling_free_legs_count_as_none() {
        let legs = [
            leg(10.0, 0.0, true),
            leg(2.0, FRAC_PI_2, false),
            leg(2.0, 1.5 * PI, false),
        ];
        let err = SegmentAdjust::new(
            Point2::origin(),
            Point2::new(12.0, 0.0),
            legs.iter().collect(),
        )
        .execute()
        .unwrap_err();
        assert!(matches!(err, AdjustError::NoFreeLegSpan { .. }));
    }

    #[test]
    fn unreachable_when_free_legs_too_short() {
        // Locked 10 east, free 1 east: |10 + s| = 5 needs s = -5 or -15.
        let legs = [leg(10.0, 0.0, true), leg(1.0, 0.0, false)];
        let err = SegmentAdjust::new(Point2::origin(), Point2::new(5.0, 0.0), legs.iter().collect())
            .execute()
            .unwrap_err();
        assert!(matches!(err, AdjustError::UnreachableSpan { .. }));
    }

    #[test]
    fn root_selection() {
        // (s - 2)(s - 0.9) = s² - 2.9s + 1.8
        assert_abs_diff_eq!(select_root(1.0, -2.9, 1.8).unwrap(), 0.9, epsilon = 1e-12);
        // (s + 1)(s - 3)
        assert_abs_diff_eq!(select_root(1.0, -2.0, -3.0).unwrap(), 3.0, epsilon = 1e-12);
        // No real roots.
        assert!(select_root(1.0, 0.0, 1.0).is_none());
        // Tiny negative discriminant is clamped to a double root.
        let r = select_root(1.0, -2.0, 1.0 + 1e-15).unwrap();
        assert_abs_diff_eq!(r, 1.0, epsilon = 1e-6);
    }
}
