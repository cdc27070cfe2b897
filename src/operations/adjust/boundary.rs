use tracing::{debug, warn};

use super::assemble::LoopAssemble;
use super::result::AdjustmentResult;
use crate::config::AdjustmentConfig;
use crate::error::{AdjustError, FitError, Result};
use crate::evidence::EvidenceLinks;
use crate::math::Point2;
use crate::operations::fit::{ConfirmScale, FitPair, ScaleDecision, ScaleGuard};
use crate::operations::query::{residual_rms, ResidualClassify};
use crate::plan::Plan;

/// Non-fatal problem found during an adjustment run.
#[derive(Debug, Clone, PartialEq)]
pub enum AdjustWarning {
    /// Evidence names a vertex that the plan does not have; the point was skipped.
    UnresolvedReference { plan_id: String },
    /// More than one held point marks the same vertex; the first was used.
    DuplicateAnchor { plan_id: String },
    /// A closing description misses its start by more than the warning distance.
    ClosureExceeded { misclosure: f64, limit: f64 },
    /// The global similarity check could not be solved.
    FitUnavailable(FitError),
}

/// Everything one adjustment run produces.
#[derive(Debug, Clone, PartialEq)]
pub struct AdjustmentReport {
    pub result: AdjustmentResult,
    /// Global plan-to-evidence consistency check; `None` if it could not be solved.
    pub scale: Option<ScaleDecision>,
    pub warnings: Vec<AdjustWarning>,
    /// RMS of all residual lengths.
    pub residual_rms: Option<f64>,
}

/// One complete boundary adjustment.
///
/// Resolves evidence against the plan, checks closure, runs the global
/// similarity/scale check, adjusts every span between held anchors, and
/// classifies the residuals. Neither the plan nor the evidence is modified.
pub struct AdjustBoundary<'a> {
    plan: &'a Plan,
    evidence: &'a EvidenceLinks,
    config: &'a AdjustmentConfig,
}

impl<'a> AdjustBoundary<'a> {
    /// Creates a new `AdjustBoundary` operation.
    #[must_use]
    pub fn new(plan: &'a Plan, evidence: &'a EvidenceLinks, config: &'a AdjustmentConfig) -> Self {
        Self {
            plan,
            evidence,
            config,
        }
    }

    /// Executes the run.
    ///
    /// `confirm` is asked only when the scale check proposes a scale.
    ///
    /// # Errors
    ///
    /// Returns [`AdjustError::InsufficientAnchors`] before touching any
    /// geometry when fewer than 2 held points link to the plan, and the
    /// first span error otherwise.
    pub fn execute(&self, confirm: &mut dyn ConfirmScale) -> Result<AdjustmentReport> {
        let resolution = self.evidence.resolve(self.plan);
        let mut warnings = Vec::new();

        for plan_id in &resolution.unresolved {
            warn!(%plan_id, "evidence references an unknown vertex; skipped");
            warnings.push(AdjustWarning::UnresolvedReference {
                plan_id: plan_id.clone(),
            });
        }
        for plan_id in &resolution.duplicate_anchors {
            warn!(%plan_id, "vertex held more than once; first point used");
            warnings.push(AdjustWarning::DuplicateAnchor {
                plan_id: plan_id.clone(),
            });
        }

        if resolution.anchors.len() < 2 {
            return Err(AdjustError::InsufficientAnchors {
                found: resolution.anchors.len(),
            }
            .into());
        }

        let misclosure = self.plan.misclosure().norm();
        if self.plan.is_closing() && misclosure > self.config.closure_warning {
            warn!(misclosure, limit = self.config.closure_warning, "plan does not close");
            warnings.push(AdjustWarning::ClosureExceeded {
                misclosure,
                limit: self.config.closure_warning,
            });
        }

        let vertices = self.plan.vertices();
        let pairs: Vec<FitPair> = resolution
            .linked
            .iter()
            .map(|link| {
                FitPair::new(vertices[link.vertex].position, link.evidence.position)
                    .with_weight(link.evidence.weight)
            })
            .collect();
        let scale = match ScaleGuard::new(&pairs, self.config).execute(confirm) {
            Ok(decision) => Some(decision),
            Err(err) => {
                warn!(%err, "global similarity check unavailable");
                warnings.push(AdjustWarning::FitUnavailable(err));
                None
            }
        };

        let anchors: Vec<(usize, Point2)> = resolution
            .anchors
            .iter()
            .map(|a| (a.vertex, a.evidence.position))
            .collect();
        let mut result = LoopAssemble::new(self.plan, anchors)
            .with_locked_length_tolerance(self.config.locked_length_tolerance)
            .execute()?;

        let positions = result.positions();
        result.residuals =
            ResidualClassify::new(&positions, &resolution.linked, self.config).execute();
        let rms = residual_rms(&result.residuals);

        debug!(
            vertices = result.vertices.len(),
            spans = result.spans.len(),
            residual_rms = rms,
            warnings = warnings.len(),
            "adjustment complete"
        );

        Ok(AdjustmentReport {
            result,
            scale,
            warnings,
            residual_rms: rms,
        })
    }
}
