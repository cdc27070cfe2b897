pub mod angle_text;
pub mod config;
pub mod error;
pub mod evidence;
pub mod math;
pub mod operations;
pub mod plan;

pub use config::AdjustmentConfig;
pub use error::{ParcelfitError, Result};
