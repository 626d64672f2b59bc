//! Intra-line highlighting for matched line pairs.
//!
//! Computes which tokens differ between two lines using a longest-common-
//! subsequence (LCS) approach, then merges adjacent tokens into
//! [`Segment`]s flagged as changed or unchanged.

use par_diff_config::{HighlightConfig, HighlightStyle};
use serde::Serialize;
use unicode_segmentation::UnicodeSegmentation;

use super::emitter::separate_prefix;

/// A run of text within a cell, either shared with the opposite line or not.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Segment {
    pub text: String,
    pub changed: bool,
}

/// Highlight result for one old/new pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HighlightedPair {
    pub old_prefix: String,
    pub old: Vec<Segment>,
    pub new_prefix: String,
    pub new: Vec<Segment>,
}

/// Splits a matched pair into prefix and highlighted content.
pub trait LineHighlighter {
    /// `old` and `new` are raw line contents including their marker prefix.
    /// `None` means the pair should be shown without highlighting.
    fn highlight(&self, is_combined: bool, old: &str, new: &str) -> Option<HighlightedPair>;
}

// ---------------------------------------------------------------------------
// Tokenisers
// ---------------------------------------------------------------------------

/// Split a string into words for word-level comparison.
///
/// Words are runs of alphanumeric characters / underscores; every other
/// character is its own single-character token.
pub fn split_into_words(s: &str) -> Vec<&str> {
    let mut words = Vec::new();
    let mut start = None;

    for (i, ch) in s.char_indices() {
        if ch.is_alphanumeric() || ch == '_' {
            if start.is_none() {
                start = Some(i);
            }
        } else {
            if let Some(s_idx) = start {
                words.push(&s[s_idx..i]);
                start = None;
            }
            words.push(&s[i..i + ch.len_utf8()]);
        }
    }
    if let Some(s_idx) = start {
        words.push(&s[s_idx..]);
    }

    words
}

fn tokenize(s: &str, style: HighlightStyle) -> Vec<&str> {
    match style {
        HighlightStyle::Word => split_into_words(s),
        HighlightStyle::Char => s.graphemes(true).collect(),
    }
}

// ---------------------------------------------------------------------------
// LCS helpers
// ---------------------------------------------------------------------------

/// Maximum token count before skipping LCS (prevents O(n*m) blowup).
pub const MAX_LCS_TOKENS: usize = 200;

fn lcs_table(a: &[&str], b: &[&str]) -> Vec<Vec<usize>> {
    let m = a.len();
    let n = b.len();
    let mut table = vec![vec![0usize; n + 1]; m + 1];

    for i in 1..=m {
        for j in 1..=n {
            if a[i - 1] == b[j - 1] {
                table[i][j] = table[i - 1][j - 1] + 1;
            } else {
                table[i][j] = table[i - 1][j].max(table[i][j - 1]);
            }
        }
    }

    table
}

/// Flag each token of `tokens` that is not part of the LCS with `other`.
pub fn mark_changes(tokens: &[&str], other: &[&str]) -> Vec<bool> {
    if tokens.len() > MAX_LCS_TOKENS || other.len() > MAX_LCS_TOKENS {
        return vec![true; tokens.len()];
    }
    let table = lcs_table(tokens, other);
    let mut changed = vec![true; tokens.len()];

    let mut i = tokens.len();
    let mut j = other.len();

    while i > 0 && j > 0 {
        if tokens[i - 1] == other[j - 1] {
            changed[i - 1] = false;
            i -= 1;
            j -= 1;
        } else if table[i - 1][j] >= table[i][j - 1] {
            i -= 1;
        } else {
            j -= 1;
        }
    }

    changed
}

/// Merge tokens into segments, joining neighbours with the same flag.
fn build_segments(tokens: &[&str], changes: &[bool]) -> Vec<Segment> {
    let mut segments: Vec<Segment> = Vec::new();

    for (token, &changed) in tokens.iter().zip(changes) {
        match segments.last_mut() {
            Some(last) if last.changed == changed => last.text.push_str(token),
            _ => segments.push(Segment {
                text: (*token).to_string(),
                changed,
            }),
        }
    }

    segments
}

// ---------------------------------------------------------------------------
// Highlighter
// ---------------------------------------------------------------------------

/// LCS-based highlighter over word tokens or grapheme clusters.
#[derive(Debug, Clone)]
pub struct LcsHighlighter {
    style: HighlightStyle,
    max_line_length: usize,
}

impl LcsHighlighter {
    pub fn new(config: &HighlightConfig) -> Self {
        Self {
            style: config.style,
            max_line_length: config.max_line_length,
        }
    }
}

impl Default for LcsHighlighter {
    fn default() -> Self {
        Self::new(&HighlightConfig::default())
    }
}

impl LineHighlighter for LcsHighlighter {
    fn highlight(&self, is_combined: bool, old: &str, new: &str) -> Option<HighlightedPair> {
        if old.chars().count() > self.max_line_length || new.chars().count() > self.max_line_length
        {
            log::debug!("Skipping highlight: line longer than {}", self.max_line_length);
            return None;
        }

        let (old_prefix, old_text) = separate_prefix(is_combined, old);
        let (new_prefix, new_text) = separate_prefix(is_combined, new);

        let old_tokens = tokenize(old_text, self.style);
        let new_tokens = tokenize(new_text, self.style);
        let old_changes = mark_changes(&old_tokens, &new_tokens);
        let new_changes = mark_changes(&new_tokens, &old_tokens);

        Some(HighlightedPair {
            old_prefix: old_prefix.to_string(),
            old: build_segments(&old_tokens, &old_changes),
            new_prefix: new_prefix.to_string(),
            new: build_segments(&new_tokens, &new_changes),
        })
    }
}
