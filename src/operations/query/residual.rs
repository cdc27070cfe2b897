use crate::config::AdjustmentConfig;
use crate::evidence::ResolvedLink;
use crate::math::{Point2, Vector2};

/// Severity bucket of a residual.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ResidualTier {
    /// Below the minimum arrow length; not a discrepancy.
    Exact,
    Green,
    Yellow,
    Red,
}

impl ResidualTier {
    #[must_use]
    pub fn is_discrepancy(self) -> bool {
        self != Self::Exact
    }
}

/// Discrepancy between one evidence point and its adjusted vertex.
#[derive(Debug, Clone, PartialEq)]
pub struct Residual {
    pub vertex: usize,
    pub id: String,
    /// `evidence − adjusted`.
    pub vector: Vector2,
    pub length: f64,
    pub tier: ResidualTier,
    pub held: bool,
}

/// Measures and buckets residuals of linked evidence.
pub struct ResidualClassify<'a> {
    positions: &'a [Point2],
    links: &'a [ResolvedLink<'a>],
    config: &'a AdjustmentConfig,
}

impl<'a> ResidualClassify<'a> {
    /// Creates a new `ResidualClassify` query over adjusted `positions`.
    #[must_use]
    pub fn new(
        positions: &'a [Point2],
        links: &'a [ResolvedLink<'a>],
        config: &'a AdjustmentConfig,
    ) -> Self {
        Self {
            positions,
            links,
            config,
        }
    }

    /// Executes the query. Links to vertices outside `positions` are skipped.
    #[must_use]
    pub fn execute(&self) -> Vec<Residual> {
        self.links
            .iter()
            .filter_map(|link| {
                let adjusted = self.positions.get(link.vertex)?;
                let vector = link.evidence.position - adjusted;
                let length = vector.norm();
                Some(Residual {
                    vertex: link.vertex,
                    id: link.evidence.plan_id.clone().unwrap_or_default(),
                    vector,
                    length,
                    tier: self.tier(length),
                    held: link.evidence.is_held(),
                })
            })
            .collect()
    }

    fn tier(&self, length: f64) -> ResidualTier {
        if length < self.config.min_arrow {
            ResidualTier::Exact
        } else if length < self.config.residual_green {
            ResidualTier::Green
        } else if length < self.config.residual_yellow {
            ResidualTier::Yellow
        } else {
            ResidualTier::Red
        }
    }
}

/// Root-mean-square residual length, `None` when there are no residuals.
#[must_use]
pub fn residual_rms(residuals: &[Residual]) -> Option<f64> {
    if residuals.is_empty() {
        return None;
    }
    #[allow(clippy::cast_precision_loss)]
    let n = residuals.len() as f64;
    Some((residuals.iter().map(|r| r.length * r.length).sum::<f64>() / n).sqrt())
}
