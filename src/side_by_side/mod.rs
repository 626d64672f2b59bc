//! Side-by-side alignment of parsed diffs.
//!
//! Deleted and inserted lines of each change run are paired row by row, either
//! positionally or by content similarity, and every row gets exactly one left
//! and one right cell (blank placeholders where a line has no counterpart).
//!
//! Sub-modules:
//! - [`distance`]: normalized edit distance over characters or word tokens
//! - [`matcher`]: similarity grouping of a run's old and new lines
//! - [`aligner`]: per-block run accumulation and flushing
//! - [`emitter`]: `Row`/`Cell` descriptors built from aligned lines
//! - [`highlight`]: LCS intra-line highlighting for matched pairs
//! - [`printer`]: file-level layout with block header rows

pub mod aligner;
pub mod distance;
pub mod emitter;
pub mod highlight;
pub mod matcher;
pub mod printer;

#[cfg(test)]
mod tests;

pub use aligner::{AlignWarning, AlignedRows, BlockAligner, Run, RunState, Step, Transition};
pub use distance::DistanceMetric;
pub use emitter::{Cell, CellType, Granularity, Row, RowEmitter, separate_prefix};
pub use highlight::{HighlightedPair, LcsHighlighter, LineHighlighter, Segment};
pub use matcher::{AlignedGroup, Matcher};
pub use printer::{EMPTY_FILE_NOTICE, FileRows, SideBySidePrinter};
