use crate::angle_text::{format_angle, AngleStyle};
use crate::math::Point2;
use crate::operations::query::Residual;

/// How a vertex position was produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Provenance {
    /// Taken from held evidence.
    Held,
    /// Interior of a span made only of free legs.
    SimilarityBetween,
    /// Interior of a span with at least one locked leg.
    SimilarityBetweenLocked,
    /// Carried beyond the outer anchors of an open plan.
    BearingDistance,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AdjustedVertex {
    pub id: String,
    pub position: Point2,
    pub provenance: Provenance,
}

/// A leg re-measured between adjusted vertices.
#[derive(Debug, Clone, PartialEq)]
pub struct AdjustedLeg {
    pub from: String,
    pub to: String,
    pub distance: f64,
    /// Engine azimuth in radians.
    pub azimuth: f64,
    pub locked: bool,
}

impl AdjustedLeg {
    /// Bearing text of the adjusted leg.
    #[must_use]
    pub fn bearing(&self, style: AngleStyle) -> String {
        format_angle(self.azimuth, style)
    }
}

/// Scale and rotation solved for one anchor-to-anchor span.
#[derive(Debug, Clone, PartialEq)]
pub struct SpanReport {
    pub from: String,
    pub to: String,
    pub scale: f64,
    pub rotation: f64,
    pub rotation_only: bool,
}

/// Adjusted geometry for one plan.
#[derive(Debug, Clone, PartialEq)]
pub struct AdjustmentResult {
    pub vertices: Vec<AdjustedVertex>,
    pub legs: Vec<AdjustedLeg>,
    pub spans: Vec<SpanReport>,
    /// One entry per linked evidence point.
    pub residuals: Vec<Residual>,
    pub closed: bool,
}

impl AdjustmentResult {
    /// Adjusted positions in vertex order.
    #[must_use]
    pub fn positions(&self) -> Vec<Point2> {
        self.vertices.iter().map(|v| v.position).collect()
    }

    /// Adjusted vertex labelled `id`.
    #[must_use]
    pub fn vertex(&self, id: &str) -> Option<&AdjustedVertex> {
        self.vertices.iter().find(|v| v.id == id)
    }
}
