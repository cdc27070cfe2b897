use tracing::debug;

use super::result::{AdjustedLeg, AdjustedVertex, AdjustmentResult, Provenance, SpanReport};
use super::segment::SegmentAdjust;
use crate::error::AdjustError;
use crate::math::angle::azimuth_of;
use crate::math::Point2;
use crate::plan::{Leg, Plan};

/// Adjusts a whole plan span by span between held anchors.
///
/// Closed plans are solved as consecutive anchor pairs plus the wrap span
/// from the last anchor back to the first. Open plans solve the interior
/// spans and carry the tails beyond the outer anchors by plain
/// bearing/distance. Each span is solved on its own; neighbouring spans need
/// not agree on scale or rotation.
pub struct LoopAssemble<'a> {
    plan: &'a Plan,
    anchors: Vec<(usize, Point2)>,
    locked_length_tolerance: f64,
}

impl<'a> LoopAssemble<'a> {
    /// Creates a new `LoopAssemble` operation.
    ///
    /// `anchors` are `(vertex index, held position)` pairs in any order; a
    /// repeated vertex keeps its first position.
    #[must_use]
    pub fn new(plan: &'a Plan, anchors: Vec<(usize, Point2)>) -> Self {
        let mut unique: Vec<(usize, Point2)> = Vec::with_capacity(anchors.len());
        for (vertex, position) in anchors {
            if !unique.iter().any(|(v, _)| *v == vertex) {
                unique.push((vertex, position));
            }
        }
        unique.sort_by_key(|(v, _)| *v);
        Self {
            plan,
            anchors: unique,
            locked_length_tolerance: 1e-6,
        }
    }

    #[must_use]
    pub fn with_locked_length_tolerance(mut self, tolerance: f64) -> Self {
        self.locked_length_tolerance = tolerance;
        self
    }

    /// Executes the assembly.
    ///
    /// Every span is solved before any position is written, so a failure
    /// leaves nothing half-adjusted.
    ///
    /// # Errors
    ///
    /// Returns [`AdjustError::InsufficientAnchors`] with fewer than 2 anchors
    /// inside the plan, or the first span error from [`SegmentAdjust`].
    pub fn execute(&self) -> Result<AdjustmentResult, AdjustError> {
        let vertices = self.plan.vertices();
        let legs = self.plan.legs();
        let n = vertices.len();
        let anchors: Vec<(usize, Point2)> =
            self.anchors.iter().copied().filter(|(v, _)| *v < n).collect();
        if anchors.len() < 2 {
            return Err(AdjustError::InsufficientAnchors {
                found: anchors.len(),
            });
        }

        let mut span_bounds: Vec<(usize, usize)> =
            anchors.windows(2).map(|w| (w[0].0, w[1].0)).collect();
        if self.plan.is_closed() {
            span_bounds.push((anchors[anchors.len() - 1].0, anchors[0].0));
        }

        let mut solved = Vec::with_capacity(span_bounds.len());
        for &(from, to) in &span_bounds {
            let chain = span_legs(legs, from, to, n);
            let start = anchor_position(&anchors, from);
            let end = anchor_position(&anchors, to);
            let solution = SegmentAdjust::new(start, end, chain.clone())
                .with_labels(vertices[from].id.clone(), vertices[to].id.clone())
                .with_locked_length_tolerance(self.locked_length_tolerance)
                .execute()?;
            let has_locked = chain.iter().any(|l| l.locked);
            solved.push((from, to, chain.len(), has_locked, solution));
        }

        let mut positions: Vec<Point2> = self.plan.positions();
        let mut provenance = vec![Provenance::BearingDistance; n];
        let mut spans = Vec::with_capacity(solved.len());
        for (from, to, leg_count, has_locked, solution) in solved {
            let tag = if has_locked {
                Provenance::SimilarityBetweenLocked
            } else {
                Provenance::SimilarityBetween
            };
            for step in 1..leg_count {
                let vertex = (from + step) % n;
                positions[vertex] = solution.positions[step];
                provenance[vertex] = tag;
            }
            spans.push(SpanReport {
                from: vertices[from].id.clone(),
                to: vertices[to].id.clone(),
                scale: solution.scale,
                rotation: solution.rotation,
                rotation_only: solution.rotation_only,
            });
        }
        for &(vertex, position) in &anchors {
            positions[vertex] = position;
            provenance[vertex] = Provenance::Held;
        }

        if !self.plan.is_closed() {
            let first = anchors[0].0;
            let last = anchors[anchors.len() - 1].0;
            for j in (0..first).rev() {
                positions[j] = positions[j + 1] - legs[j].vector();
            }
            for j in last..legs.len() {
                positions[j + 1] = positions[j] + legs[j].vector();
            }
            debug!(head = first, tail = n - 1 - last, "open tails carried");
        }

        let adjusted_vertices = vertices
            .iter()
            .zip(positions.iter().zip(provenance))
            .map(|(v, (&position, provenance))| AdjustedVertex {
                id: v.id.clone(),
                position,
                provenance,
            })
            .collect();
        let adjusted_legs = legs
            .iter()
            .map(|leg| {
                let delta = positions[leg.to] - positions[leg.from];
                AdjustedLeg {
                    from: vertices[leg.from].id.clone(),
                    to: vertices[leg.to].id.clone(),
                    distance: delta.norm(),
                    azimuth: azimuth_of(&delta),
                    locked: leg.locked,
                }
            })
            .collect();

        Ok(AdjustmentResult {
            vertices: adjusted_vertices,
            legs: adjusted_legs,
            spans,
            residuals: Vec::new(),
            closed: self.plan.is_closed(),
        })
    }
}

/// Legs walked from vertex `from` to vertex `to`, wrapping past the end.
fn span_legs(legs: &[Leg], from: usize, to: usize, vertex_count: usize) -> Vec<&Leg> {
    let count = (to + vertex_count - from) % vertex_count;
    let count = if count == 0 { vertex_count } else { count };
    (0..count).map(|k| &legs[(from + k) % legs.len()]).collect()
}

fn anchor_position(anchors: &[(usize, Point2)], vertex: usize) -> Point2 {
    anchors
        .iter()
        .find(|(v, _)| *v == vertex)
        .map_or_else(Point2::origin, |(_, p)| *p)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::f64::consts::{FRAC_PI_2, PI};

    use approx::assert_abs_diff_eq;

    use super::*;
    use crate::plan::{LegCall, TraverseBuild};

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
    fn closed_plan_with_exact_anchors_is_unchanged() {
        let plan = rectangle();
        let result = LoopAssemble::new(
            &plan,
            vec![(2, Point2::new(100.0, 50.0)), (0, Point2::new(0.0, 0.0))],
        )
        .execute()
        .unwrap();
        assert_eq!(result.spans.len(), 2);
        for (adjusted, nominal) in result.vertices.iter().zip(plan.vertices()) {
            assert!((adjusted.position - nominal.position).norm() < 1e-9);
        }
        assert_eq!(result.vertices[0].provenance, Provenance::Held);
        assert_eq!(result.vertices[1].provenance, Provenance::SimilarityBetween);
        assert_eq!(result.vertices[3].provenance, Provenance::SimilarityBetween);
    }

    #[test]
    fn wrap_span_crosses_the_first_vertex() {
        let plan = rectangle();
        // Anchors at P2 and P4: the wrap span runs P4 -> P1 -> P2.
        let result = LoopAssemble::new(
            &plan,
            vec![(1, Point2::new(101.0, 0.0)), (3, Point2::new(0.0, 50.0))],
        )
        .execute()
        .unwrap();
        assert_eq!(result.spans[1].from, "P4");
        assert_eq!(result.spans[1].to, "P2");
        assert_eq!(result.vertices[0].provenance, Provenance::SimilarityBetween);
        // Every leg of both spans stays connected.
        let p = &result.vertices;
        assert!((p[1].position - Point2::new(101.0, 0.0)).norm() < 1e-12);
        assert!((p[3].position - Point2::new(0.0, 50.0)).norm() < 1e-12);
    }

    #[test]
    fn open_plan_carries_tails_rigidly() {
        let plan = TraverseBuild::new(vec![
            LegCall::new(10.0, 0.0),
            LegCall::new(10.0, 0.0),
            LegCall::new(10.0, 0.0),
            LegCall::new(10.0, 0.0),
        ])
        .execute();
        assert!(!plan.is_closed());
        let result = LoopAssemble::new(
            &plan,
            vec![(1, Point2::new(10.0, 0.0)), (3, Point2::new(30.0, 2.0))],
        )
        .execute()
        .unwrap();
        let p: Vec<Point2> = result.vertices.iter().map(|v| v.position).collect();
        assert_abs_diff_eq!(p[0].x, 0.0, epsilon = 1e-12);
        assert_abs_diff_eq!(p[0].y, 0.0, epsilon = 1e-12);
        assert_abs_diff_eq!(p[4].x, 40.0, epsilon = 1e-12);
        assert_abs_diff_eq!(p[4].y, 2.0, epsilon = 1e-12);
        assert_eq!(result.vertices[0].provenance, Provenance::BearingDistance);
        assert_eq!(result.vertices[2].provenance, Provenance::SimilarityBetween);
        assert_eq!(result.vertices[4].provenance, Provenance::BearingDistance);
        assert_eq!(result.spans.len(), 1);
    }

    #[test]
    fn locked_span_is_tagged() {
        let mut plan = rectangle();
        plan.set_locked(0, true).unwrap();
        let result = LoopAssemble::new(
            &plan,
            vec![(0, Point2::new(0.0, 0.0)), (2, Point2::new(100.0, 50.5))],
        )
        .execute()
        .unwrap();
        assert_eq!(result.vertices[1].provenance, Provenance::SimilarityBetweenLocked);
        assert_abs_diff_eq!(result.legs[0].distance, 100.0, epsilon = 1e-9);
    }

    #[test]
    fn needs_two_anchors() {
        let plan = rectangle();
        let err = LoopAssemble::new(&plan, vec![(0, Point2::origin()), (0, Point2::new(1.0, 1.0))])
            .execute()
            .unwrap_err();
        assert_eq!(err, AdjustError::InsufficientAnchors { found: 1 });
    }

    #[test]
    fn failing_span_aborts_everything() {
        let mut plan = rectangle();
        plan.set_locked(0, true).unwrap();
        let err = LoopAssemble::new(
            &plan,
            vec![(0, Point2::new(0.0, 0.0)), (1, Point2::new(100.5, 0.0))],
        )
        .execute()
        .unwrap_err();
        assert!(matches!(
            err,
            AdjustError::NoFreeLegSpan { ref from, ref to, .. } if from == "P1" && to == "P2"
        ));
    }

    #[test]
    fn span_leg_walk_wraps() {
        let plan = rectangle();
        let chain = span_legs(plan.legs(), 3, 1, 4);
        assert_eq!(chain.len(), 2);
        assert_eq!(chain[0].from, 3);
        assert_eq!(chain[1].from, 0);
    }
}
