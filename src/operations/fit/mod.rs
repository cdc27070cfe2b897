mod scale_guard;
mod similarity;

pub use scale_guard::{ConfirmScale, ScaleDecision, ScaleGuard, ScaleQuery, ScaleReason, UseDefault};
pub use similarity::{FitPair, SimilarityFit, SimilarityTransform};
