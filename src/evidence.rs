//! Physical evidence found in the field and its links to plan vertices.

use crate::math::Point2;
use crate::plan::Plan;

/// How much a piece of evidence can be trusted.
///
/// Only supplies the default for [`EvidencePoint::held`]; an explicit
/// choice always wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EvidenceStrength {
    /// Original monument, iron pin, stone.
    Strong,
    /// Fence corner, occupation line, witness mark.
    Weak,
    #[default]
    Unclassified,
}

impl EvidenceStrength {
    /// Whether evidence of this strength is held when nobody said otherwise.
    #[must_use]
    pub fn held_by_default(self) -> bool {
        matches!(self, Self::Strong)
    }
}

/// An observed position, optionally linked to a plan vertex.
#[derive(Debug, Clone, PartialEq)]
pub struct EvidencePoint {
    pub position: Point2,
    /// Label of the plan vertex this evidence marks.
    pub plan_id: Option<String>,
    /// Explicit hold choice; `None` defers to `strength`.
    pub held: Option<bool>,
    pub strength: EvidenceStrength,
    /// Weight in the global similarity fit.
    pub weight: f64,
}

impl EvidencePoint {
    /// Creates unlinked, unclassified evidence with unit weight.
    #[must_use]
    pub fn new(position: Point2) -> Self {
        Self {
            position,
            plan_id: None,
            held: None,
            strength: EvidenceStrength::Unclassified,
            weight: 1.0,
        }
    }

    /// Links this evidence to the plan vertex labelled `id`.
    #[must_use]
    pub fn linked(mut self, id: impl Into<String>) -> Self {
        self.plan_id = Some(id.into());
        self
    }

    /// Sets an explicit hold choice.
    #[must_use]
    pub fn with_held(mut self, held: bool) -> Self {
        self.held = Some(held);
        self
    }

    #[must_use]
    pub fn with_strength(mut self, strength: EvidenceStrength) -> Self {
        self.strength = strength;
        self
    }

    #[must_use]
    pub fn with_weight(mut self, weight: f64) -> Self {
        self.weight = weight;
        self
    }

    /// Effective hold flag.
    #[must_use]
    pub fn is_held(&self) -> bool {
        self.held.unwrap_or_else(|| self.strength.held_by_default())
    }
}

/// Evidence collected for one parcel.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EvidenceLinks {
    points: Vec<EvidencePoint>,
}

/// One evidence point matched to a plan vertex.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResolvedLink<'a> {
    pub vertex: usize,
    pub evidence: &'a EvidencePoint,
}

/// Evidence sorted against a plan.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Resolution<'a> {
    /// Every linked point whose `plan_id` names a vertex, in input order.
    pub linked: Vec<ResolvedLink<'a>>,
    /// Held anchors, one per vertex, sorted by vertex index.
    pub anchors: Vec<ResolvedLink<'a>>,
    /// `plan_id`s that name no vertex.
    pub unresolved: Vec<String>,
    /// Vertex labels with more than one held point; the first one is used.
    pub duplicate_anchors: Vec<String>,
}

impl EvidenceLinks {
    #[must_use]
    pub fn new(points: Vec<EvidencePoint>) -> Self {
        Self { points }
    }

    pub fn push(&mut self, point: EvidencePoint) {
        self.points.push(point);
    }

    #[must_use]
    pub fn points(&self) -> &[EvidencePoint] {
        &self.points
    }

    /// Matches evidence to plan vertices by label.
    ///
    /// Unlinked evidence is ignored. Neither input is modified.
    #[must_use]
    pub fn resolve<'a>(&'a self, plan: &Plan) -> Resolution<'a> {
        let mut resolution = Resolution::default();
        for evidence in &self.points {
            let Some(id) = evidence.plan_id.as_deref() else {
                continue;
            };
            let Some(vertex) = plan.vertex_index(id) else {
                resolution.unresolved.push(id.to_string());
                continue;
            };
            let link = ResolvedLink { vertex, evidence };
            resolution.linked.push(link);
            if evidence.is_held() {
                if resolution.anchors.iter().any(|a| a.vertex == vertex) {
                    resolution.duplicate_anchors.push(id.to_string());
                } else {
                    resolution.anchors.push(link);
                }
            }
        }
        resolution.anchors.sort_by_key(|a| a.vertex);
        resolution
    }
}
