use tracing::debug;

use crate::error::FitError;
use crate::math::{Point2, Vector2};

/// Below this the rotation moment is treated as zero (coincident points).
const MOMENT_EPSILON: f64 = 1e-12;

/// A correspondence `from -> to` with a fit weight.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FitPair {
    pub from: Point2,
    pub to: Point2,
    pub weight: f64,
}

impl FitPair {
    /// Creates a pair with unit weight.
    #[must_use]
    pub fn new(from: Point2, to: Point2) -> Self {
        Self {
            from,
            to,
            weight: 1.0,
        }
    }

    #[must_use]
    pub fn with_weight(mut self, weight: f64) -> Self {
        self.weight = weight;
        self
    }
}

/// `p -> k·R(θ)·p + t`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimilarityTransform {
    pub scale: f64,
    pub cos: f64,
    pub sin: f64,
    pub translation: Vector2,
}

impl SimilarityTransform {
    /// Rotation angle in radians, `(-π, π]`.
    #[must_use]
    pub fn rotation(&self) -> f64 {
        self.sin.atan2(self.cos)
    }

    #[must_use]
    pub fn apply(&self, p: &Point2) -> Point2 {
        let k = self.scale;
        Point2::new(
            k * (self.cos * p.x - self.sin * p.y) + self.translation.x,
            k * (self.sin * p.x + self.cos * p.y) + self.translation.y,
        )
    }

    /// Weighted RMS residual `sqrt(Σw·|T(from) − to|² / Σw)`.
    ///
    /// Zero when the pairs carry no weight.
    #[must_use]
    pub fn rms(&self, pairs: &[FitPair]) -> f64 {
        let (sum, weight) = pairs.iter().fold((0.0, 0.0), |(sum, weight), p| {
            let r = self.apply(&p.from) - p.to;
            (sum + p.weight * r.norm_squared(), weight + p.weight)
        });
        if weight <= 0.0 {
            return 0.0;
        }
        (sum / weight).sqrt()
    }
}

/// Weighted least-squares similarity transform between two point sets.
///
/// Closed-form Procrustes: centre both sets on their weighted centroids, take
/// the rotation from the cross-moments and the scale from the rotated moment
/// over the `from` spread.
pub struct SimilarityFit<'a> {
    pairs: &'a [FitPair],
    lock_scale: bool,
    scale_epsilon: f64,
}

impl<'a> SimilarityFit<'a> {
    /// Creates a new `SimilarityFit` operation.
    ///
    /// With `lock_scale` the scale is fixed at 1 and only rotation and
    /// translation are solved.
    #[must_use]
    pub fn new(pairs: &'a [FitPair], lock_scale: bool) -> Self {
        Self {
            pairs,
            lock_scale,
            scale_epsilon: 1e-9,
        }
    }

    /// Sets the lower bound on a free scale.
    #[must_use]
    pub fn with_scale_epsilon(mut self, epsilon: f64) -> Self {
        self.scale_epsilon = epsilon;
        self
    }

    /// Executes the fit.
    ///
    /// # Errors
    ///
    /// Returns [`FitError::TooFewPairs`] with fewer than 2 pairs,
    /// [`FitError::InvalidWeight`] for a negative or non-finite weight, and
    /// [`FitError::Degenerate`] when the weights sum to zero or the points
    /// collapse so that the rotation is undefined.
    #[allow(clippy::many_single_char_names)]
    pub fn execute(&self) -> Result<SimilarityTransform, FitError> {
        if self.pairs.len() < 2 {
            return Err(FitError::TooFewPairs {
                found: self.pairs.len(),
            });
        }
        for (index, p) in self.pairs.iter().enumerate() {
            if !p.weight.is_finite() || p.weight < 0.0 {
                return Err(FitError::InvalidWeight {
                    index,
                    weight: p.weight,
                });
            }
        }

        let w_sum: f64 = self.pairs.iter().map(|p| p.weight).sum();
        if w_sum <= 0.0 {
            return Err(FitError::Degenerate("pair weights sum to zero".into()));
        }
        let mut from_c = Vector2::zeros();
        let mut to_c = Vector2::zeros();
        for p in self.pairs {
            from_c += p.from.coords * p.weight;
            to_c += p.to.coords * p.weight;
        }
        from_c /= w_sum;
        to_c /= w_sum;

        let (mut sxx, mut sxy, mut syx, mut syy, mut s1) = (0.0, 0.0, 0.0, 0.0, 0.0);
        for p in self.pairs {
            let a = p.from.coords - from_c;
            let b = p.to.coords - to_c;
            sxx += p.weight * a.x * b.x;
            sxy += p.weight * a.x * b.y;
            syx += p.weight * a.y * b.x;
            syy += p.weight * a.y * b.y;
            s1 += p.weight * a.norm_squared();
        }

        let c = sxx + syy;
        let s = sxy - syx;
        let n = c.hypot(s);
        if n < MOMENT_EPSILON {
            return Err(FitError::Degenerate(
                "control points coincide; rotation is undefined".into(),
            ));
        }
        let cos = c / n;
        let sin = s / n;

        let scale = if self.lock_scale {
            1.0
        } else {
            // cos·c + sin·s == n
            (n / s1).max(self.scale_epsilon)
        };

        let rotated_from = Vector2::new(
            cos * from_c.x - sin * from_c.y,
            sin * from_c.x + cos * from_c.y,
        );
        let translation = to_c - rotated_from * scale;

        debug!(
            pairs = self.pairs.len(),
            lock_scale = self.lock_scale,
            scale,
            rotation_deg = sin.atan2(cos).to_degrees(),
            "similarity fit solved"
        );

        Ok(SimilarityTransform {
            scale,
            cos,
            sin,
            translation,
        })
    }
}
