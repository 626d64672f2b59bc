//! Block aligner: walks a block's lines, accumulates delete/insert runs and
//! flushes them into balanced rows.
//!
//! The run accumulator is an explicit [`Run`] value, so each transition
//! ([`BlockAligner::feed`], [`BlockAligner::flush`]) can be driven and
//! inspected on its own. [`BlockAligner::align_block`] is the whole pass.

use par_diff_config::{Config, LineMatching};
use serde::Serialize;

use crate::model::{DiffBlock, DiffLine, LineType};

use super::distance::DistanceMetric;
use super::emitter::{Granularity, Row, RowEmitter};
use super::highlight::{LcsHighlighter, LineHighlighter};
use super::matcher::{AlignedGroup, Matcher};

/// Invariant guards hit while aligning. Both point at malformed input;
/// alignment records them and carries on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, thiserror::Error)]
#[serde(rename_all = "kebab-case")]
pub enum AlignWarning {
    /// An insert arrived with inserts queued but no deletes to pair against.
    #[error("insert line arrived with inserts queued but no deletes")]
    OrphanInsert,
    /// An aligned position had neither an old nor a new line.
    #[error("aligned position has neither an old nor a new line")]
    EmptyPair,
}

/// Whether a run is holding lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Idle,
    Accumulating,
}

/// Consecutive deleted and inserted lines awaiting pairing.
#[derive(Debug, Default, Clone)]
pub struct Run<'a> {
    pub(super) old_lines: Vec<&'a DiffLine>,
    pub(super) new_lines: Vec<&'a DiffLine>,
}

impl<'a> Run<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> RunState {
        if self.is_empty() {
            RunState::Idle
        } else {
            RunState::Accumulating
        }
    }

    pub fn is_empty(&self) -> bool {
        self.old_lines.is_empty() && self.new_lines.is_empty()
    }

    pub fn old_lines(&self) -> &[&'a DiffLine] {
        &self.old_lines
    }

    pub fn new_lines(&self) -> &[&'a DiffLine] {
        &self.new_lines
    }

    /// Pairwise comparisons a similarity match would need.
    pub fn comparisons(&self) -> usize {
        self.old_lines.len() * self.new_lines.len()
    }

    fn clear(&mut self) {
        self.old_lines.clear();
        self.new_lines.clear();
    }
}

/// What feeding a single line did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// Context row emitted.
    Context,
    /// Delete appended to the run.
    QueuedDelete,
    /// Insert appended to the run behind queued deletes.
    QueuedInsert,
    /// Insert with nothing to pair against, emitted at once.
    PureInsert,
    /// Invariant violation; the run was flushed and the insert emitted alone.
    OrphanInsert,
}

/// Result of [`BlockAligner::feed`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Step {
    /// The run was flushed before the line was handled.
    pub flushed: Option<Granularity>,
    pub transition: Transition,
}

/// Rows and warnings produced for one block.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct AlignedRows {
    pub rows: Vec<Row>,
    pub warnings: Vec<AlignWarning>,
}

impl AlignedRows {
    fn push(&mut self, result: Result<Row, AlignWarning>) {
        match result {
            Ok(row) => self.rows.push(row),
            Err(warning) => self.warn(warning),
        }
    }

    fn warn(&mut self, warning: AlignWarning) {
        log::warn!("Side-by-side alignment: {warning}");
        self.warnings.push(warning);
    }
}

/// Aligns the lines of a block into side-by-side rows.
pub struct BlockAligner {
    matcher: Option<Matcher>,
    max_comparisons: usize,
    emitter: RowEmitter,
}

impl BlockAligner {
    /// Aligner configured from matching, budget and highlight settings.
    pub fn new(config: &Config) -> Self {
        let highlighter = config.highlight.enabled.then(|| {
            Box::new(LcsHighlighter::new(&config.highlight)) as Box<dyn LineHighlighter>
        });
        Self::with_emitter(
            config.matching,
            config.effective_max_comparisons(),
            RowEmitter::new(highlighter),
        )
    }

    pub fn with_emitter(matching: LineMatching, max_comparisons: usize, emitter: RowEmitter) -> Self {
        Self {
            matcher: DistanceMetric::for_matching(matching).map(Matcher::new),
            max_comparisons,
            emitter,
        }
    }

    /// Whether a flush of `run` would use the similarity matcher.
    pub fn should_match(&self, run: &Run<'_>) -> bool {
        self.matcher.is_some() && run.comparisons() < self.max_comparisons
    }

    /// Align every line of `block`, flushing the final run.
    pub fn align_block(&self, is_combined: bool, block: &DiffBlock) -> AlignedRows {
        let mut run = Run::new();
        let mut out = AlignedRows::default();
        for line in &block.lines {
            self.feed(is_combined, &mut run, line, &mut out);
        }
        self.flush(is_combined, &mut run, &mut out);
        out
    }

    /// Handle one line: flush first if its type ends the current run.
    pub fn feed<'a>(
        &self,
        is_combined: bool,
        run: &mut Run<'a>,
        line: &'a DiffLine,
        out: &mut AlignedRows,
    ) -> Step {
        let ends_run = match line.line_type {
            LineType::Insert => false,
            LineType::Delete => !run.new_lines.is_empty(),
            LineType::Context => !run.is_empty(),
        };
        let flushed = if ends_run {
            self.flush(is_combined, run, out)
        } else {
            None
        };

        let transition = match line.line_type {
            LineType::Context => {
                out.rows.push(self.emitter.context(is_combined, line));
                Transition::Context
            }
            LineType::Delete => {
                run.old_lines.push(line);
                Transition::QueuedDelete
            }
            LineType::Insert if !run.old_lines.is_empty() => {
                run.new_lines.push(line);
                Transition::QueuedInsert
            }
            LineType::Insert if run.new_lines.is_empty() => {
                out.push(self.emitter.emit(is_combined, None, Some(line), Granularity::Coarse));
                Transition::PureInsert
            }
            LineType::Insert => {
                out.warn(AlignWarning::OrphanInsert);
                self.flush(is_combined, run, out);
                out.push(self.emitter.emit(is_combined, None, Some(line), Granularity::Coarse));
                Transition::OrphanInsert
            }
        };

        Step {
            flushed,
            transition,
        }
    }

    /// Convert the queued run into rows and clear it.
    /// Returns `None` when the run was already empty.
    pub fn flush(
        &self,
        is_combined: bool,
        run: &mut Run<'_>,
        out: &mut AlignedRows,
    ) -> Option<Granularity> {
        if run.is_empty() {
            return None;
        }

        let (groups, granularity) = match self.matcher {
            Some(matcher) if self.should_match(run) => (
                matcher.match_lines(&run.old_lines, &run.new_lines),
                Granularity::Fine,
            ),
            _ => {
                if self.matcher.is_some() {
                    log::debug!(
                        "Skipping line matching: {} comparisons exceeds budget of {}",
                        run.comparisons(),
                        self.max_comparisons
                    );
                }
                (
                    vec![AlignedGroup::whole(run.old_lines.len(), run.new_lines.len())],
                    Granularity::Coarse,
                )
            }
        };

        for group in &groups {
            let old = &run.old_lines[group.old.clone()];
            let new = &run.new_lines[group.new.clone()];
            for j in 0..old.len().max(new.len()) {
                out.push(self.emitter.emit(
                    is_combined,
                    old.get(j).copied(),
                    new.get(j).copied(),
                    granularity,
                ));
            }
        }

        run.clear();
        Some(granularity)
    }
}
