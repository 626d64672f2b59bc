//! Normalized edit distance between line contents.
//!
//! `distance(a, b) = levenshtein(a, b) / (len(a) + len(b))`, measured over
//! characters or word tokens. The result lies in `[0.0, 1.0]` and is `0.0`
//! for identical inputs.

use par_diff_config::LineMatching;

use super::highlight::split_into_words;

/// Levenshtein edit distance between two token sequences.
pub fn levenshtein<T: PartialEq>(a: &[T], b: &[T]) -> usize {
    if a.is_empty() {
        return b.len();
    }
    if b.is_empty() {
        return a.len();
    }

    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut curr = vec![0usize; b.len() + 1];

    for (i, x) in a.iter().enumerate() {
        curr[0] = i + 1;
        for (j, y) in b.iter().enumerate() {
            let substitution = prev[j] + usize::from(x != y);
            curr[j + 1] = substitution.min(prev[j + 1] + 1).min(curr[j] + 1);
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[b.len()]
}

fn normalized<T: PartialEq>(a: &[T], b: &[T]) -> f64 {
    let total = a.len() + b.len();
    if total == 0 {
        return 0.0;
    }
    levenshtein(a, b) as f64 / total as f64
}

/// Character distance between two trimmed strings.
pub fn char_distance(a: &str, b: &str) -> f64 {
    let a: Vec<char> = a.trim().chars().collect();
    let b: Vec<char> = b.trim().chars().collect();
    normalized(&a, &b)
}

/// Word-token distance between two trimmed strings.
pub fn word_distance(a: &str, b: &str) -> f64 {
    let a = split_into_words(a.trim());
    let b = split_into_words(b.trim());
    normalized(&a, &b)
}

/// Which representation of a line the matcher compares.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DistanceMetric {
    Chars,
    Words,
}

impl DistanceMetric {
    /// Metric for a matching mode; `None` when matching is disabled.
    pub fn for_matching(matching: LineMatching) -> Option<Self> {
        match matching {
            LineMatching::None => None,
            LineMatching::Lines => Some(DistanceMetric::Chars),
            LineMatching::Words => Some(DistanceMetric::Words),
        }
    }

    pub fn distance(self, a: &str, b: &str) -> f64 {
        match self {
            DistanceMetric::Chars => char_distance(a, b),
            DistanceMetric::Words => word_distance(a, b),
        }
    }
}
