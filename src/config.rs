/// Thresholds for one adjustment run.
///
/// Passed explicitly into every operation that needs a policy value; the
/// core keeps no ambient state. All lengths are in plan units (conventionally
/// metres).
#[derive(Debug, Clone, PartialEq)]
pub struct AdjustmentConfig {
    // -- Plan construction --
    /// A traverse whose end lies within this distance of its start is closed.
    pub closed_tolerance: f64,
    /// Misclosure above this on a closing traverse is reported as a warning.
    pub closure_warning: f64,

    // -- Residual tiers --
    /// Residuals below this are green.
    pub residual_green: f64,
    /// Residuals below this (and at or above green) are yellow; above is red.
    pub residual_yellow: f64,
    /// Residuals below this are exact matches and never reported as discrepancies.
    pub min_arrow: f64,

    // -- Scale guard --
    /// Scale that converts feet to metres.
    pub feet_to_meters: f64,
    /// Half-width of the band around `feet_to_meters` treated as a unit mismatch.
    pub feet_to_meters_band: f64,
    /// Scale that converts metres to feet.
    pub meters_to_feet: f64,
    /// Half-width of the band around `meters_to_feet` treated as a unit mismatch.
    pub meters_to_feet_band: f64,
    /// A free-fit scale must differ from 1.0 by more than this to be proposed.
    pub near_unity_band: f64,
    /// A free-fit scale differing from 1.0 by more than this is never marginal.
    pub marginal_max_deviation: f64,
    /// Free-fit RMS must be below this fraction of the locked-fit RMS.
    pub marginal_rms_ratio: f64,
    /// Minimum number of pairs before a near-unity scale is proposed.
    pub marginal_min_pairs: usize,
    /// Lower bound on any fitted scale.
    pub scale_epsilon: f64,

    // -- Segment adjustment --
    /// Allowed mismatch between a fully locked span and its anchor distance.
    pub locked_length_tolerance: f64,
}

impl Default for AdjustmentConfig {
    fn default() -> Self {
        Self {
            closed_tolerance: 1e-6,
            closure_warning: 0.05,
            residual_green: 0.015,
            residual_yellow: 0.02,
            min_arrow: 0.0005,
            feet_to_meters: 0.3048,
            feet_to_meters_band: 0.02,
            meters_to_feet: 3.280_84,
            meters_to_feet_band: 0.05,
            near_unity_band: 0.001,
            marginal_max_deviation: 0.05,
            marginal_rms_ratio: 0.5,
            marginal_min_pairs: 3,
            scale_epsilon: 1e-9,
            locked_length_tolerance: 1e-6,
        }
    }
}
