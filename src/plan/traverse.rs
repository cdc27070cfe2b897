use super::{Leg, LegCall, Plan, Vertex};
use crate::config::AdjustmentConfig;
use crate::math::angle::direction;
use crate::math::{Point2, Vector2};

/// Integrates bearing/distance calls into vertex positions.
///
/// `v[0] = origin`, `v[i+1] = v[i] + k·d[i]·(cos az[i], sin az[i])` where `k`
/// is the combined scale factor. A traverse whose end lands within
/// `closed_tolerance` of its start is closed: the duplicate end vertex is
/// dropped and the last leg wraps to the first vertex.
#[derive(Debug, Clone, PartialEq)]
pub struct TraverseBuild {
    pub(super) calls: Vec<LegCall>,
    origin: Point2,
    pub(super) scale_factor: f64,
    closed_tolerance: f64,
    pub(super) closing: bool,
}

impl TraverseBuild {
    /// Creates a new `TraverseBuild` operation starting at `(0, 0)` with unit scale.
    #[must_use]
    pub fn new(calls: Vec<LegCall>) -> Self {
        Self {
            calls,
            origin: Point2::origin(),
            scale_factor: 1.0,
            closed_tolerance: 1e-6,
            closing: false,
        }
    }

    /// Starts the traverse at `origin`.
    #[must_use]
    pub fn with_origin(mut self, origin: Point2) -> Self {
        self.origin = origin;
        self
    }

    /// Multiplies every distance by `factor` (grid/ground combined scale factor).
    #[must_use]
    pub fn with_scale_factor(mut self, factor: f64) -> Self {
        self.scale_factor = factor;
        self
    }

    /// Sets the distance under which the traverse counts as closed.
    #[must_use]
    pub fn with_closed_tolerance(mut self, tolerance: f64) -> Self {
        self.closed_tolerance = tolerance;
        self
    }

    /// Takes the closed tolerance from `config`.
    #[must_use]
    pub fn with_config(self, config: &AdjustmentConfig) -> Self {
        self.with_closed_tolerance(config.closed_tolerance)
    }

    /// Declares that the description is meant to return to its start.
    ///
    /// Only affects reporting: misclosure on a closing plan is checked
    /// against the closure warning distance.
    #[must_use]
    pub fn closing(mut self, closing: bool) -> Self {
        self.closing = closing;
        self
    }

    /// Executes the integration.
    ///
    /// An empty call list yields a single-vertex open plan.
    #[must_use]
    pub fn execute(&self) -> Plan {
        let n = self.calls.len();
        let mut points = Vec::with_capacity(n + 1);
        points.push(self.origin);
        for call in &self.calls {
            let last = points[points.len() - 1];
            points.push(last + direction(call.azimuth) * (call.distance * self.scale_factor));
        }

        let misclosure: Vector2 = if n == 0 {
            Vector2::zeros()
        } else {
            points[n] - points[0]
        };
        let closed = n > 0 && misclosure.norm() < self.closed_tolerance;
        if closed {
            points.pop();
        }

        let vertex_count = points.len();
        let vertices = points
            .into_iter()
            .enumerate()
            .map(|(i, position)| Vertex {
                id: format!("P{}", i + 1),
                position,
            })
            .collect();
        let legs = self
            .calls
            .iter()
            .enumerate()
            .map(|(i, call)| Leg {
                from: i,
                to: (i + 1) % vertex_count.max(1),
                distance: call.distance * self.scale_factor,
                azimuth: call.azimuth,
                locked: call.locked,
                text: call.text.clone(),
            })
            .collect();

        Plan {
            vertices,
            legs,
            closed,
            misclosure,
            build: self.clone(),
        }
    }
}
