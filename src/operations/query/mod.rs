mod inverse;
mod residual;

pub use inverse::{Inverse, InverseCall};
pub use residual::{residual_rms, Residual, ResidualClassify, ResidualTier};
