pub mod adjust;
pub mod fit;
pub mod query;
