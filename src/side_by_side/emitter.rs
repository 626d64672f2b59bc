//! Row and cell descriptors, and the emitter that builds them from lines.

use serde::Serialize;

use crate::model::{DiffLine, LineType};

use super::aligner::AlignWarning;
use super::highlight::{LineHighlighter, Segment};

/// Type tag of a rendered cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum CellType {
    Context,
    Insert,
    Delete,
    /// Insert paired by similarity matching (highlight eligible).
    InsertChange,
    /// Delete paired by similarity matching (highlight eligible).
    DeleteChange,
    /// Block headers and file notices.
    Info,
}

impl CellType {
    pub fn from_line(line_type: LineType) -> Self {
        match line_type {
            LineType::Context => CellType::Context,
            LineType::Insert => CellType::Insert,
            LineType::Delete => CellType::Delete,
        }
    }

    pub fn is_insert(self) -> bool {
        matches!(self, CellType::Insert | CellType::InsertChange)
    }

    pub fn is_delete(self) -> bool {
        matches!(self, CellType::Delete | CellType::DeleteChange)
    }
}

/// One side of a row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Cell {
    pub cell_type: CellType,
    pub line_number: Option<usize>,
    pub prefix: String,
    pub content: String,
    /// Intra-line highlight of `content`, present for highlighted pairs only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub segments: Option<Vec<Segment>>,
    pub is_empty_placeholder: bool,
}

impl Cell {
    /// Blank cell standing in for a missing counterpart.
    pub fn placeholder() -> Self {
        Self {
            cell_type: CellType::Context,
            line_number: None,
            prefix: String::new(),
            content: String::new(),
            segments: None,
            is_empty_placeholder: true,
        }
    }

    pub fn info(text: impl Into<String>) -> Self {
        Self {
            cell_type: CellType::Info,
            line_number: None,
            prefix: String::new(),
            content: text.into(),
            segments: None,
            is_empty_placeholder: false,
        }
    }

    /// Build a cell from a raw line, splitting its marker column(s) off.
    pub fn new(
        is_combined: bool,
        cell_type: CellType,
        line_number: Option<usize>,
        content: &str,
    ) -> Self {
        let (prefix, content) = separate_prefix(is_combined, content);
        Self {
            cell_type,
            line_number,
            prefix: prefix.to_string(),
            content: content.to_string(),
            segments: None,
            is_empty_placeholder: false,
        }
    }
}

/// A left (old) / right (new) pair of cells.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Row {
    pub left: Cell,
    pub right: Cell,
}

/// Whether paired rows came from similarity matching or positional pairing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Granularity {
    Fine,
    Coarse,
}

/// Split the marker column(s) off a raw line: one character, or two in
/// combined mode.
pub fn separate_prefix(is_combined: bool, content: &str) -> (&str, &str) {
    let prefix_size = if is_combined { 2 } else { 1 };
    let split = content
        .char_indices()
        .nth(prefix_size)
        .map_or(content.len(), |(idx, _)| idx);
    content.split_at(split)
}

fn line_number(line: &DiffLine) -> Option<usize> {
    match line.line_type {
        LineType::Insert => line.new_number,
        LineType::Delete | LineType::Context => line.old_number,
    }
}

/// Converts aligned lines into rows.
pub struct RowEmitter {
    highlighter: Option<Box<dyn LineHighlighter>>,
}

impl RowEmitter {
    /// `highlighter` is consulted for fine-grained pairs; `None` disables it.
    pub fn new(highlighter: Option<Box<dyn LineHighlighter>>) -> Self {
        Self { highlighter }
    }

    /// Row showing a context line on both sides.
    pub fn context(&self, is_combined: bool, line: &DiffLine) -> Row {
        Row {
            left: Cell::new(is_combined, CellType::Context, line.old_number, &line.content),
            right: Cell::new(is_combined, CellType::Context, line.new_number, &line.content),
        }
    }

    /// Row for an aligned old/new position. Either side may be missing, not both.
    pub fn emit(
        &self,
        is_combined: bool,
        old: Option<&DiffLine>,
        new: Option<&DiffLine>,
        granularity: Granularity,
    ) -> Result<Row, AlignWarning> {
        match (old, new) {
            (Some(old), Some(new)) => Ok(self.paired(is_combined, old, new, granularity)),
            (Some(line), None) => Ok(Row {
                left: self.single(is_combined, line),
                right: Cell::placeholder(),
            }),
            (None, Some(line)) => Ok(Row {
                left: Cell::placeholder(),
                right: self.single(is_combined, line),
            }),
            (None, None) => Err(AlignWarning::EmptyPair),
        }
    }

    fn single(&self, is_combined: bool, line: &DiffLine) -> Cell {
        Cell::new(
            is_combined,
            CellType::from_line(line.line_type),
            line_number(line),
            &line.content,
        )
    }

    fn paired(
        &self,
        is_combined: bool,
        old: &DiffLine,
        new: &DiffLine,
        granularity: Granularity,
    ) -> Row {
        let (delete_type, insert_type) = match granularity {
            Granularity::Fine => (CellType::DeleteChange, CellType::InsertChange),
            Granularity::Coarse => (CellType::Delete, CellType::Insert),
        };

        let highlighted = match (granularity, &self.highlighter) {
            (Granularity::Fine, Some(h)) => h.highlight(is_combined, &old.content, &new.content),
            _ => None,
        };

        match highlighted {
            Some(pair) => Row {
                left: highlighted_cell(delete_type, old.old_number, pair.old_prefix, pair.old),
                right: highlighted_cell(insert_type, new.new_number, pair.new_prefix, pair.new),
            },
            None => Row {
                left: Cell::new(is_combined, delete_type, old.old_number, &old.content),
                right: Cell::new(is_combined, insert_type, new.new_number, &new.content),
            },
        }
    }
}

fn highlighted_cell(
    cell_type: CellType,
    line_number: Option<usize>,
    prefix: String,
    segments: Vec<Segment>,
) -> Cell {
    Cell {
        cell_type,
        line_number,
        prefix,
        content: segments.iter().map(|s| s.text.as_str()).collect(),
        segments: Some(segments),
        is_empty_placeholder: false,
    }
}
