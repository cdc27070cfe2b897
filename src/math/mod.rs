pub mod angle;
pub mod polygon_2d;

/// 2D point type in the local planar frame.
pub type Point2 = nalgebra::Point2<f64>;

/// 2D vector type in the local planar frame.
pub type Vector2 = nalgebra::Vector2<f64>;

/// Global geometric tolerance for floating-point comparisons.
pub const TOLERANCE: f64 = 1e-10;

/// Below this the squared length of a vector is treated as zero.
pub const NEAR_ZERO_SQ: f64 = 1e-12;
