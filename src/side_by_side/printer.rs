//! File-level side-by-side layout: block header rows followed by each
//! block's aligned rows.

use par_diff_config::Config;
use serde::Serialize;

use crate::model::DiffFile;

use super::aligner::{AlignWarning, BlockAligner};
use super::emitter::{Cell, Row};

/// Notice shown for a file section that has no blocks (mode change, binary, ...).
pub const EMPTY_FILE_NOTICE: &str = "File without changes";

/// All rows for one file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileRows {
    pub name: String,
    pub old_name: String,
    pub new_name: String,
    pub is_combined: bool,
    pub rows: Vec<Row>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<AlignWarning>,
}

/// Lays out whole files with a [`BlockAligner`].
pub struct SideBySidePrinter {
    aligner: BlockAligner,
}

impl SideBySidePrinter {
    pub fn new(config: &Config) -> Self {
        Self::with_aligner(BlockAligner::new(config))
    }

    pub fn with_aligner(aligner: BlockAligner) -> Self {
        Self { aligner }
    }

    pub fn render_files(&self, files: &[DiffFile]) -> Vec<FileRows> {
        files.iter().map(|f| self.render_file(f)).collect()
    }

    pub fn render_file(&self, file: &DiffFile) -> FileRows {
        let mut rows = Vec::new();
        let mut warnings = Vec::new();

        if file.blocks.is_empty() {
            rows.push(Row {
                left: Cell::info(""),
                right: Cell::info(EMPTY_FILE_NOTICE),
            });
        }

        for block in &file.blocks {
            rows.push(Row {
                left: Cell::info(block.header.as_str()),
                right: Cell::info(""),
            });
            let aligned = self.aligner.align_block(file.is_combined, block);
            rows.extend(aligned.rows);
            warnings.extend(aligned.warnings);
        }

        if !warnings.is_empty() {
            log::warn!(
                "{}: {} alignment warning(s), input may be malformed",
                file.display_name(),
                warnings.len()
            );
        }

        FileRows {
            name: file.display_name(),
            old_name: file.old_name.clone(),
            new_name: file.new_name.clone(),
            is_combined: file.is_combined,
            rows,
            warnings,
        }
    }
}
