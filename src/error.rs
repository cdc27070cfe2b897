use thiserror::Error;

/// Top-level error type for the boundary adjustment core.
#[derive(Debug, Error)]
pub enum ParcelfitError {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Fit(#[from] FitError),

    #[error(transparent)]
    Adjust(#[from] AdjustError),
}

/// Errors raised while reading bearing, azimuth, or distance text.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParseError {
    #[error("empty angle text")]
    Empty,

    #[error("unrecognized angle text: {0:?}")]
    Unrecognized(String),

    #[error("{field} = {value} is out of range (limit {max})")]
    OutOfRange {
        field: &'static str,
        value: f64,
        max: f64,
    },

    #[error("compact bearing fraction must have 2 or 4 digits: {0:?}")]
    InvalidCompactFraction(String),

    #[error("invalid distance: {0:?}")]
    InvalidDistance(String),

    #[error("leg is reversed twice: leading '-' on the bearing and a negative distance")]
    ConflictingReversal,
}

/// Errors raised by the similarity transform solver.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FitError {
    #[error("at least 2 point pairs are required, found {found}")]
    TooFewPairs { found: usize },

    #[error("cannot solve transform: {0}")]
    Degenerate(String),

    #[error("pair {index} has invalid weight {weight}")]
    InvalidWeight { index: usize, weight: f64 },
}

/// Errors that abort an adjustment run.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AdjustError {
    #[error("at least 2 held, linked evidence points are required, found {found}")]
    InsufficientAnchors { found: usize },

    #[error(
        "span {from} -> {to} has no free leg: locked length {locked_length} \
         cannot reach anchor distance {target_length}; unlock a leg or hold a point inside the span"
    )]
    NoFreeLegSpan {
        from: String,
        to: String,
        locked_length: f64,
        target_length: f64,
    },

    #[error("span {from} -> {to} cannot be closed by any positive scale of its free legs")]
    UnreachableSpan { from: String, to: String },

    #[error("leg index {index} is out of range (plan has {len} legs)")]
    LegIndexOutOfRange { index: usize, len: usize },
}

/// Convenience type alias for results using [`ParcelfitError`].
pub type Result<T> = std::result::Result<T, ParcelfitError>;
