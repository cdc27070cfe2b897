//! Nominal boundary geometry built from a legal description.

mod call;
mod traverse;

pub use call::LegCall;
pub use traverse::TraverseBuild;

use crate::error::AdjustError;
use crate::math::angle::direction;
use crate::math::polygon_2d::{path_length, signed_area_2d};
use crate::math::{Point2, Vector2};

/// A boundary corner.
#[derive(Debug, Clone, PartialEq)]
pub struct Vertex {
    /// Ordinal label, `P1`..`Pn`.
    pub id: String,
    pub position: Point2,
}

/// Directed edge `from -> to` of a plan.
#[derive(Debug, Clone, PartialEq)]
pub struct Leg {
    pub from: usize,
    pub to: usize,
    /// Length after the combined scale factor, always positive.
    pub distance: f64,
    /// Engine azimuth in radians, `[0, 2π)`.
    pub azimuth: f64,
    pub locked: bool,
    /// Bearing text as entered.
    pub text: Option<String>,
}

impl Leg {
    /// Displacement vector of this leg.
    #[must_use]
    pub fn vector(&self) -> Vector2 {
        direction(self.azimuth) * self.distance
    }
}

/// Ordered vertices and legs of one parcel description.
///
/// For a closed plan `legs.len() == vertices.len()` and the last leg wraps to
/// the first vertex; for an open plan `legs.len() == vertices.len() - 1`.
#[derive(Debug, Clone, PartialEq)]
pub struct Plan {
    vertices: Vec<Vertex>,
    legs: Vec<Leg>,
    closed: bool,
    misclosure: Vector2,
    build: TraverseBuild,
}

impl Plan {
    /// Returns the vertices in traverse order.
    #[must_use]
    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    /// Returns the legs in traverse order.
    #[must_use]
    pub fn legs(&self) -> &[Leg] {
        &self.legs
    }

    /// Returns true if the traverse returns to its start within tolerance.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Returns true if the description was declared to return to its start.
    #[must_use]
    pub fn is_closing(&self) -> bool {
        self.build.closing
    }

    /// Combined scale factor applied to every distance at construction.
    #[must_use]
    pub fn scale_factor(&self) -> f64 {
        self.build.scale_factor
    }

    /// Vector from the start of the traverse to its computed end.
    ///
    /// Near zero for a closed plan.
    #[must_use]
    pub fn misclosure(&self) -> Vector2 {
        self.misclosure
    }

    /// Positions of all vertices.
    #[must_use]
    pub fn positions(&self) -> Vec<Point2> {
        self.vertices.iter().map(|v| v.position).collect()
    }

    /// Index of the vertex with label `id`.
    #[must_use]
    pub fn vertex_index(&self, id: &str) -> Option<usize> {
        self.vertices.iter().position(|v| v.id == id)
    }

    /// Enclosed area of a closed plan; zero for an open one.
    #[must_use]
    pub fn area(&self) -> f64 {
        if !self.closed {
            return 0.0;
        }
        signed_area_2d(&self.positions()).abs()
    }

    /// Total length of all legs.
    #[must_use]
    pub fn perimeter(&self) -> f64 {
        path_length(&self.positions(), self.closed)
    }

    /// Sets or clears the `locked` flag of one leg.
    ///
    /// # Errors
    ///
    /// Returns [`AdjustError::LegIndexOutOfRange`] if `leg` does not exist.
    pub fn set_locked(&mut self, leg: usize, locked: bool) -> Result<(), AdjustError> {
        let len = self.legs.len();
        let target = self
            .legs
            .get_mut(leg)
            .ok_or(AdjustError::LegIndexOutOfRange { index: leg, len })?;
        target.locked = locked;
        self.build.calls[leg].locked = locked;
        Ok(())
    }

    /// Replaces one call and re-integrates every vertex position.
    ///
    /// # Errors
    ///
    /// Returns [`AdjustError::LegIndexOutOfRange`] if `leg` does not exist.
    pub fn replace_call(&mut self, leg: usize, call: LegCall) -> Result<(), AdjustError> {
        let len = self.build.calls.len();
        let mut build = self.build.clone();
        let slot = build
            .calls
            .get_mut(leg)
            .ok_or(AdjustError::LegIndexOutOfRange { index: leg, len })?;
        *slot = call;
        *self = build.execute();
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::f64::consts::{FRAC_PI_2, PI};

    use approx::assert_abs_diff_eq;

    use super::*;

    fn rectangle() -> Plan {
        TraverseBuild::new(vec![
            LegCall::new(100.0, 0.0),
            LegCall::new(50.0, FRAC_PI_2),
            LegCall::new(100.0, PI),
            LegCall::new(50.0, 1.5 * PI),
        ])
        .execute()
    }

    #[test]
    fn area_and_perimeter() {
        let plan = rectangle();
        assert_abs_diff_eq!(plan.area(), 5000.0, epsilon = 1e-6);
        assert_abs_diff_eq!(plan.perimeter(), 300.0, epsilon = 1e-9);
    }

    #[test]
    fn vertex_lookup() {
        let plan = rectangle();
        assert_eq!(plan.vertex_index("P3"), Some(2));
        assert_eq!(plan.vertex_index("P9"), None);
    }

    #[test]
    fn set_locked_updates_leg() {
        let mut plan = rectangle();
        plan.set_locked(1, true).unwrap();
        assert!(plan.legs()[1].locked);
        assert_eq!(
            plan.set_locked(4, true),
            Err(AdjustError::LegIndexOutOfRange { index: 4, len: 4 })
        );
    }

    #[test]
    fn replace_call_reintegrates() {
        let mut plan = rectangle();
        plan.set_locked(0, true).unwrap();
        plan.replace_call(1, LegCall::new(60.0, FRAC_PI_2)).unwrap();
        // The rectangle no longer closes.
        assert!(!plan.is_closed());
        assert_eq!(plan.vertices().len(), 5);
        assert_abs_diff_eq!(plan.vertices()[2].position.y, 60.0, epsilon = 1e-9);
        assert!(plan.legs()[0].locked);
    }

    #[test]
    fn leg_vector_matches_positions() {
        let plan = rectangle();
        for leg in plan.legs() {
            let expected = plan.vertices()[leg.to].position - plan.vertices()[leg.from].position;
            assert_abs_diff_eq!((leg.vector() - expected).norm(), 0.0, epsilon = 1e-9);
        }
    }
}
