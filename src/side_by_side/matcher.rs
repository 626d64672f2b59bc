//! Similarity matcher for a run of deleted and inserted lines.
//!
//! Finds the closest old/new pair in the run, splits the run around it into
//! a prefix, the pair itself and a suffix, and recurses on prefix and suffix.
//! Groups are contiguous, so the relative order of old lines and of new lines
//! is never changed; only the pairing is.

use std::ops::Range;

use crate::model::DiffLine;

use super::distance::DistanceMetric;

/// Contiguous slices of a run's old and new lines that are zipped positionally.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlignedGroup {
    pub old: Range<usize>,
    pub new: Range<usize>,
}

impl AlignedGroup {
    /// One group covering a whole run.
    pub fn whole(old_len: usize, new_len: usize) -> Self {
        Self {
            old: 0..old_len,
            new: 0..new_len,
        }
    }
}

/// Row-major `old × new` distance table.
struct DistanceMatrix {
    cols: usize,
    cells: Vec<f64>,
}

impl DistanceMatrix {
    fn build(old: &[&DiffLine], new: &[&DiffLine], metric: DistanceMetric) -> Self {
        let mut cells = Vec::with_capacity(old.len() * new.len());
        for o in old {
            for n in new {
                cells.push(metric.distance(o.text(), n.text()));
            }
        }
        Self {
            cols: new.len(),
            cells,
        }
    }

    fn get(&self, i: usize, j: usize) -> f64 {
        self.cells[i * self.cols + j]
    }

    /// Closest pair inside the given ranges. Ties keep the first pair in
    /// old-major, new-minor order.
    fn best_in(&self, old: &Range<usize>, new: &Range<usize>) -> Option<(usize, usize)> {
        let mut best: Option<(usize, usize)> = None;
        let mut best_distance = f64::INFINITY;
        for i in old.clone() {
            for j in new.clone() {
                let d = self.get(i, j);
                if d < best_distance {
                    best_distance = d;
                    best = Some((i, j));
                }
            }
        }
        best
    }
}

/// Groups old and new lines by content similarity.
#[derive(Debug, Clone, Copy)]
pub struct Matcher {
    metric: DistanceMetric,
}

impl Matcher {
    pub fn new(metric: DistanceMetric) -> Self {
        Self { metric }
    }

    /// Partition `old` and `new` into ordered aligned groups.
    ///
    /// Every index of both inputs appears in exactly one group, and groups
    /// are returned in ascending order on both sides.
    pub fn match_lines(&self, old: &[&DiffLine], new: &[&DiffLine]) -> Vec<AlignedGroup> {
        let matrix = DistanceMatrix::build(old, new, self.metric);
        let mut groups = Vec::new();
        split_groups(&matrix, 0..old.len(), 0..new.len(), &mut groups);
        log::debug!(
            "Matched {}x{} run into {} group(s)",
            old.len(),
            new.len(),
            groups.len()
        );
        groups
    }
}

fn split_groups(
    matrix: &DistanceMatrix,
    old: Range<usize>,
    new: Range<usize>,
    out: &mut Vec<AlignedGroup>,
) {
    let best = if old.len() + new.len() < 3 {
        None
    } else {
        matrix.best_in(&old, &new)
    };
    let Some((bi, bj)) = best else {
        out.push(AlignedGroup { old, new });
        return;
    };

    if bi > old.start || bj > new.start {
        split_groups(matrix, old.start..bi, new.start..bj, out);
    }
    out.push(AlignedGroup {
        old: bi..bi + 1,
        new: bj..bj + 1,
    });
    if old.end > bi + 1 || new.end > bj + 1 {
        split_groups(matrix, bi + 1..old.end, bj + 1..new.end, out);
    }
}
