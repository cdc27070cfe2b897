mod assemble;
mod boundary;
mod result;
mod segment;

pub use assemble::LoopAssemble;
pub use boundary::{AdjustBoundary, AdjustWarning, AdjustmentReport};
pub use result::{AdjustedLeg, AdjustedVertex, AdjustmentResult, Provenance, SpanReport};
pub use segment::{SegmentAdjust, SegmentSolution};
