//! Parsed diff types consumed by the side-by-side aligner.
//!
//! A [`DiffFile`] holds [`DiffBlock`]s (hunks), each holding typed
//! [`DiffLine`]s. Line content keeps its diff-marker prefix (`+`, `-`, ` `,
//! or two markers for combined diffs).

use serde::Serialize;

/// Kind of a parsed diff line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LineType {
    Context,
    Insert,
    Delete,
}

/// A single line within a diff block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DiffLine {
    pub line_type: LineType,
    /// Raw line including its marker prefix.
    pub content: String,
    pub old_number: Option<usize>,
    pub new_number: Option<usize>,
}

impl DiffLine {
    pub fn context(content: impl Into<String>, old_number: usize, new_number: usize) -> Self {
        Self {
            line_type: LineType::Context,
            content: content.into(),
            old_number: Some(old_number),
            new_number: Some(new_number),
        }
    }

    pub fn delete(content: impl Into<String>, old_number: usize) -> Self {
        Self {
            line_type: LineType::Delete,
            content: content.into(),
            old_number: Some(old_number),
            new_number: None,
        }
    }

    pub fn insert(content: impl Into<String>, new_number: usize) -> Self {
        Self {
            line_type: LineType::Insert,
            content: content.into(),
            old_number: None,
            new_number: Some(new_number),
        }
    }

    /// Content with the first (marker) character removed.
    pub fn text(&self) -> &str {
        strip_marker(&self.content)
    }
}

/// Drop the first character of a line, whatever its width in bytes.
pub fn strip_marker(content: &str) -> &str {
    let mut chars = content.chars();
    chars.next();
    chars.as_str()
}

/// One contiguous hunk of a diff.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DiffBlock {
    /// Full `@@ ... @@` header line.
    pub header: String,
    pub old_start: usize,
    pub new_start: usize,
    pub lines: Vec<DiffLine>,
}

impl DiffBlock {
    pub fn new(header: impl Into<String>, lines: Vec<DiffLine>) -> Self {
        let old_start = lines.iter().find_map(|l| l.old_number).unwrap_or(1);
        let new_start = lines.iter().find_map(|l| l.new_number).unwrap_or(1);
        Self {
            header: header.into(),
            old_start,
            new_start,
            lines,
        }
    }

    /// Number of lines of the given type.
    pub fn count(&self, line_type: LineType) -> usize {
        self.lines.iter().filter(|l| l.line_type == line_type).count()
    }
}

/// A parsed diff for one file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DiffFile {
    pub old_name: String,
    pub new_name: String,
    /// Combined (merge) diff with two marker columns per line.
    pub is_combined: bool,
    pub blocks: Vec<DiffBlock>,
}

impl DiffFile {
    /// Display name: the new name, or `old -> new` for renames.
    pub fn display_name(&self) -> String {
        let old = self.old_name.trim_start_matches("a/");
        let new = self.new_name.trim_start_matches("b/");
        if old == new || old == "/dev/null" {
            new.to_string()
        } else if new == "/dev/null" {
            old.to_string()
        } else {
            format!("{old} -> {new}")
        }
    }
}
