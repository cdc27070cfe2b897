use tracing::info;

use super::similarity::{FitPair, SimilarityFit, SimilarityTransform};
use crate::config::AdjustmentConfig;
use crate::error::FitError;

/// Why a scale was or was not proposed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScaleReason {
    /// Free scale sits on a feet/metres conversion constant.
    UnitMismatch,
    /// Free scale is a small distortion (within `marginal_max_deviation` of
    /// 1.0) that clearly improves the fit. Larger scales that are not unit
    /// conversions are `NotWarranted`.
    MarginalImprovement,
    /// Scale is not worth applying; the locked fit is used.
    NotWarranted,
}

/// Question put to the confirmation strategy.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScaleQuery {
    pub proposed_scale: f64,
    pub free_rms: f64,
    pub locked_rms: f64,
    pub reason: ScaleReason,
}

/// Decides whether a proposed scale is applied.
///
/// Returning `None` means the question was cancelled or left unanswered;
/// the guard then takes the documented default for the reason.
pub trait ConfirmScale {
    fn confirm(&mut self, query: &ScaleQuery) -> Option<bool>;
}

impl<F> ConfirmScale for F
where
    F: FnMut(&ScaleQuery) -> Option<bool>,
{
    fn confirm(&mut self, query: &ScaleQuery) -> Option<bool> {
        self(query)
    }
}

/// Non-interactive strategy: never answers, so defaults apply.
#[derive(Debug, Clone, Copy, Default)]
pub struct UseDefault;

impl ConfirmScale for UseDefault {
    fn confirm(&mut self, _query: &ScaleQuery) -> Option<bool> {
        None
    }
}

/// Outcome of the scale policy.
#[derive(Debug, Clone, PartialEq)]
pub struct ScaleDecision {
    /// Free fit if the scale is applied, locked fit otherwise.
    pub transform: SimilarityTransform,
    pub used_scale: bool,
    pub needs_confirmation: bool,
    pub reason: ScaleReason,
    pub free_scale: f64,
    pub free_rms: f64,
    pub locked_rms: f64,
    /// Answer given by the confirmation strategy, if asked and answered.
    pub answer: Option<bool>,
}

/// Compares free-scale and locked-scale fits and recommends one.
///
/// Policy, first rule that fires wins:
/// 1. Free scale near 0.3048 or 3.28084: unit mismatch, confirm, default apply.
/// 2. At least `marginal_min_pairs` pairs, free scale off unity by more than
///    `near_unity_band` but not more than `marginal_max_deviation`, free RMS
///    under `marginal_rms_ratio` of the locked RMS,
///    and locked RMS above the yellow residual tier: confirm, default keep 1.0.
/// 3. Otherwise keep the locked fit.
pub struct ScaleGuard<'a> {
    pairs: &'a [FitPair],
    config: &'a AdjustmentConfig,
}

impl<'a> ScaleGuard<'a> {
    /// Creates a new `ScaleGuard` over the given control pairs.
    #[must_use]
    pub fn new(pairs: &'a [FitPair], config: &'a AdjustmentConfig) -> Self {
        Self { pairs, config }
    }

    /// Runs both fits and decides.
    ///
    /// # Errors
    ///
    /// Returns [`FitError`] if either fit cannot be solved.
    pub fn execute(&self, confirm: &mut dyn ConfirmScale) -> Result<ScaleDecision, FitError> {
        let free = SimilarityFit::new(self.pairs, false)
            .with_scale_epsilon(self.config.scale_epsilon)
            .execute()?;
        let locked = SimilarityFit::new(self.pairs, true).execute()?;
        Ok(self.decide(&free, &locked, confirm))
    }

    /// Applies the policy to already solved fits.
    #[must_use]
    pub fn decide(
        &self,
        free: &SimilarityTransform,
        locked: &SimilarityTransform,
        confirm: &mut dyn ConfirmScale,
    ) -> ScaleDecision {
        let free_rms = free.rms(self.pairs);
        let locked_rms = locked.rms(self.pairs);
        let reason = self.classify(free.scale, free_rms, locked_rms);

        let (needs_confirmation, default_apply) = match reason {
            ScaleReason::UnitMismatch => (true, true),
            ScaleReason::MarginalImprovement => (true, false),
            ScaleReason::NotWarranted => (false, false),
        };
        let answer = if needs_confirmation {
            confirm.confirm(&ScaleQuery {
                proposed_scale: free.scale,
                free_rms,
                locked_rms,
                reason,
            })
        } else {
            None
        };
        let used_scale = answer.unwrap_or(default_apply);

        info!(
            ?reason,
            free_scale = free.scale,
            free_rms,
            locked_rms,
            ?answer,
            used_scale,
            "scale decision"
        );

        ScaleDecision {
            transform: if used_scale { *free } else { *locked },
            used_scale,
            needs_confirmation,
            reason,
            free_scale: free.scale,
            free_rms,
            locked_rms,
            answer,
        }
    }

    fn classify(&self, k: f64, free_rms: f64, locked_rms: f64) -> ScaleReason {
        let c = self.config;
        if (k - c.feet_to_meters).abs() <= c.feet_to_meters_band
            || (k - c.meters_to_feet).abs() <= c.meters_to_feet_band
        {
            return ScaleReason::UnitMismatch;
        }
        if self.pairs.len() >= c.marginal_min_pairs
            && (k - 1.0).abs() > c.near_unity_band
            && (k - 1.0).abs() <= c.marginal_max_deviation
            && free_rms < c.marginal_rms_ratio * locked_rms
            && locked_rms > c.residual_yellow
        {
            return ScaleReason::MarginalImprovement;
        }
        ScaleReason::NotWarranted
    }
}
