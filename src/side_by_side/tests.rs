//! Tests for block alignment and file layout.

use par_diff_config::{Config, LineMatching};

use super::aligner::{AlignWarning, AlignedRows, BlockAligner, Run, RunState, Transition};
use super::emitter::{Cell, CellType, Granularity, Row};
use super::printer::{EMPTY_FILE_NOTICE, SideBySidePrinter};
use crate::model::{DiffBlock, DiffFile, DiffLine, LineType};

/// Build a block from raw lines, numbering them like a hunk starting at 1.
fn make_block(lines: &[&str]) -> DiffBlock {
    let mut old = 1;
    let mut new = 1;
    let lines = lines
        .iter()
        .map(|raw| match raw.chars().next() {
            Some('-') => {
                old += 1;
                DiffLine::delete(*raw, old - 1)
            }
            Some('+') => {
                new += 1;
                DiffLine::insert(*raw, new - 1)
            }
            _ => {
                old += 1;
                new += 1;
                DiffLine::context(*raw, old - 1, new - 1)
            }
        })
        .collect();
    DiffBlock::new("@@ -1 +1 @@", lines)
}

fn aligner(matching: LineMatching) -> BlockAligner {
    BlockAligner::new(&Config::new().with_matching(matching))
}

fn align(matching: LineMatching, lines: &[&str]) -> AlignedRows {
    aligner(matching).align_block(false, &make_block(lines))
}

fn contents(rows: &[Row]) -> Vec<(String, String)> {
    rows.iter()
        .map(|r| (r.left.content.clone(), r.right.content.clone()))
        .collect()
}

fn pair(left: &str, right: &str) -> (String, String) {
    (left.to_string(), right.to_string())
}

/// Left and right non-placeholder cell counts.
fn populated(rows: &[Row]) -> (usize, usize) {
    let left = rows.iter().filter(|r| r.left.cell_type.is_delete()).count();
    let right = rows.iter().filter(|r| r.right.cell_type.is_insert()).count();
    (left, right)
}

fn run_block(deleted: usize, inserted: usize) -> Vec<String> {
    let mut lines: Vec<String> = (0..deleted).map(|i| format!("-old line {i}")).collect();
    lines.extend((0..inserted).map(|i| format!("+new line {i}")));
    lines
}

// -- Scenarios --

#[test]
fn test_context_only_block() {
    let out = align(LineMatching::Lines, &["=x"]);
    assert_eq!(out.rows.len(), 1);
    assert_eq!(contents(&out.rows), vec![pair("x", "x")]);
    assert_eq!(out.rows[0].left.cell_type, CellType::Context);
    assert!(!out.rows[0].left.is_empty_placeholder);
    assert!(!out.rows[0].right.is_empty_placeholder);
    assert!(out.warnings.is_empty());
}

#[test]
fn test_identical_lines_paired_first() {
    let out = align(LineMatching::Lines, &["-a", "-b", "+a", "+c"]);
    assert_eq!(contents(&out.rows), vec![pair("a", "a"), pair("b", "c")]);
    assert_eq!(out.rows[0].left.cell_type, CellType::DeleteChange);
    assert_eq!(out.rows[0].right.cell_type, CellType::InsertChange);
}

#[test]
fn test_matching_moves_unrelated_insert_to_own_row() {
    let lines = ["-fn main() {", "+// entry point", "+fn main() {"];

    let coarse = align(LineMatching::None, &lines);
    assert_eq!(
        contents(&coarse.rows),
        vec![pair("fn main() {", "// entry point"), pair("", "fn main() {")]
    );

    let fine = align(LineMatching::Lines, &lines);
    assert_eq!(
        contents(&fine.rows),
        vec![pair("", "// entry point"), pair("fn main() {", "fn main() {")]
    );
    assert!(fine.rows[0].left.is_empty_placeholder);
    assert_eq!(fine.rows[1].right.cell_type, CellType::InsertChange);
}

#[test]
fn test_words_matching() {
    let out = align(
        LineMatching::Words,
        &["-let total = a + b;", "-println!(\"{total}\");", "+println!(\"{total}\");"],
    );
    assert_eq!(
        contents(&out.rows),
        vec![
            pair("let total = a + b;", ""),
            pair("println!(\"{total}\");", "println!(\"{total}\");"),
        ]
    );
}

#[test]
fn test_pure_addition() {
    let out = align(LineMatching::Lines, &[" ctx", "+one", "+two"]);
    assert_eq!(out.rows.len(), 3);
    for row in &out.rows[1..] {
        assert_eq!(row.left, Cell::placeholder());
        assert_eq!(row.right.cell_type, CellType::Insert);
    }
    assert_eq!(out.rows[2].right.line_number, Some(3));
}

#[test]
fn test_pure_deletion() {
    let out = align(LineMatching::Lines, &["-one", "-two", " ctx"]);
    assert_eq!(
        contents(&out.rows),
        vec![pair("one", ""), pair("two", ""), pair("ctx", "ctx")]
    );
    assert_eq!(out.rows[0].left.cell_type, CellType::Delete);
    assert!(out.rows[0].right.is_empty_placeholder);
    assert!(out.rows[1].right.is_empty_placeholder);
}

#[test]
fn test_tail_beyond_common_length() {
    let out = align(LineMatching::None, &["-a", "-b", "-c", "+x"]);
    assert_eq!(
        contents(&out.rows),
        vec![pair("a", "x"), pair("b", ""), pair("c", "")]
    );
    assert_eq!(out.rows[0].left.cell_type, CellType::Delete);
    assert_eq!(out.rows[1].left.cell_type, CellType::Delete);
}

#[test]
fn test_insert_before_delete_stays_ordered() {
    let out = align(LineMatching::Lines, &["+first", "-second", "+third"]);
    assert_eq!(
        contents(&out.rows),
        vec![pair("", "first"), pair("second", "third")]
    );
}

#[test]
fn test_delete_after_inserts_starts_new_run() {
    let out = align(LineMatching::None, &["-a", "+b", "-c", "+d"]);
    assert_eq!(contents(&out.rows), vec![pair("a", "b"), pair("c", "d")]);
}

// -- Budget --

#[test]
fn test_large_run_falls_back_to_coarse() {
    let lines = run_block(80, 80);
    let refs: Vec<&str> = lines.iter().map(String::as_str).collect();
    let out = align(LineMatching::Lines, &refs);

    assert_eq!(out.rows.len(), 80);
    assert!(out.rows.iter().all(|r| r.left.cell_type == CellType::Delete));
    assert!(out.rows.iter().all(|r| r.right.cell_type == CellType::Insert));
    assert!(out.rows.iter().all(|r| r.right.segments.is_none()));
}

#[test]
fn test_budget_is_exclusive() {
    let lines = run_block(50, 50);
    let refs: Vec<&str> = lines.iter().map(String::as_str).collect();
    let block = make_block(&refs);

    let at_budget = BlockAligner::new(
        &Config::new()
            .with_matching(LineMatching::Lines)
            .with_max_comparisons(2500),
    );
    let out = at_budget.align_block(false, &block);
    assert!(out.rows.iter().all(|r| r.left.cell_type == CellType::Delete));

    let above_budget = BlockAligner::new(
        &Config::new()
            .with_matching(LineMatching::Lines)
            .with_max_comparisons(2501),
    );
    let out = above_budget.align_block(false, &block);
    assert!(out.rows.iter().all(|r| r.left.cell_type == CellType::DeleteChange));
}

#[test]
fn test_should_match() {
    let block = make_block(&["-a", "-b", "+c"]);
    let mut run = Run::new();
    let mut out = AlignedRows::default();
    let matching = aligner(LineMatching::Lines);
    for line in &block.lines {
        matching.feed(false, &mut run, line, &mut out);
    }
    assert_eq!(run.comparisons(), 2);
    assert!(matching.should_match(&run));
    assert!(!aligner(LineMatching::None).should_match(&run));

    let tight = BlockAligner::new(
        &Config::new()
            .with_matching(LineMatching::Lines)
            .with_max_comparisons(2),
    );
    assert!(!tight.should_match(&run));
}

#[test]
fn test_matching_none_is_coarse() {
    let out = align(LineMatching::None, &["-a", "+a"]);
    assert_eq!(out.rows[0].left.cell_type, CellType::Delete);
    assert_eq!(out.rows[0].right.cell_type, CellType::Insert);
}

// -- Transitions --

#[test]
fn test_feed_transitions() {
    let block = make_block(&["-a", "+b", "-c", " d"]);
    let aligner = aligner(LineMatching::Lines);
    let mut run = Run::new();
    let mut out = AlignedRows::default();
    assert_eq!(run.state(), RunState::Idle);

    let step = aligner.feed(false, &mut run, &block.lines[0], &mut out);
    assert_eq!(step.transition, Transition::QueuedDelete);
    assert_eq!(step.flushed, None);
    assert_eq!(run.state(), RunState::Accumulating);

    let step = aligner.feed(false, &mut run, &block.lines[1], &mut out);
    assert_eq!(step.transition, Transition::QueuedInsert);
    assert_eq!(run.new_lines().len(), 1);
    assert!(out.rows.is_empty());

    let step = aligner.feed(false, &mut run, &block.lines[2], &mut out);
    assert_eq!(step.flushed, Some(Granularity::Fine));
    assert_eq!(step.transition, Transition::QueuedDelete);
    assert_eq!(out.rows.len(), 1);
    assert_eq!(run.old_lines().len(), 1);
    assert!(run.new_lines().is_empty());

    let step = aligner.feed(false, &mut run, &block.lines[3], &mut out);
    assert_eq!(step.flushed, Some(Granularity::Fine));
    assert_eq!(step.transition, Transition::Context);
    assert_eq!(run.state(), RunState::Idle);
    assert_eq!(contents(&out.rows), vec![pair("a", "b"), pair("c", ""), pair("d", "d")]);
}

#[test]
fn test_feed_pure_insert_does_not_queue() {
    let line = DiffLine::insert("+x", 1);
    let mut run = Run::new();
    let mut out = AlignedRows::default();
    let step = aligner(LineMatching::Lines).feed(false, &mut run, &line, &mut out);
    assert_eq!(step.transition, Transition::PureInsert);
    assert_eq!(run.state(), RunState::Idle);
    assert_eq!(out.rows.len(), 1);
}

#[test]
fn test_flush_empty_run() {
    let mut run = Run::new();
    let mut out = AlignedRows::default();
    assert_eq!(aligner(LineMatching::Lines).flush(false, &mut run, &mut out), None);
    assert!(out.rows.is_empty());
}

#[test]
fn test_orphan_insert_recovers() {
    let queued = DiffLine::insert("+queued", 1);
    let incoming = DiffLine::insert("+incoming", 2);
    let mut run = Run {
        old_lines: Vec::new(),
        new_lines: vec![&queued],
    };
    let mut out = AlignedRows::default();

    let step = aligner(LineMatching::Lines).feed(false, &mut run, &incoming, &mut out);
    assert_eq!(step.transition, Transition::OrphanInsert);
    assert_eq!(out.warnings, vec![AlignWarning::OrphanInsert]);
    assert_eq!(
        contents(&out.rows),
        vec![pair("", "queued"), pair("", "incoming")]
    );
    assert!(run.is_empty());
}

// -- Properties --

#[test]
fn test_row_counts_match_line_counts() {
    let blocks: Vec<Vec<&str>> = vec![
        vec!["-a", "-b", "+a", "+c"],
        vec![" x", "-a", "+b", "+c", "+d", " y", "-e"],
        vec!["+only", "+adds"],
        vec!["-only", "-dels", "-here"],
        vec!["-a", "+b", "-c", "+d", "-e", "-f", "+g", " h", "+i"],
        vec!["-same", "-other", "-same", "+same", "+same", "+different"],
    ];

    for matching in [LineMatching::None, LineMatching::Lines, LineMatching::Words] {
        for lines in &blocks {
            let block = make_block(lines);
            let out = aligner(matching).align_block(false, &block);
            let (left, right) = populated(&out.rows);
            assert_eq!(left, block.count(LineType::Delete), "{lines:?} {matching:?}");
            assert_eq!(right, block.count(LineType::Insert), "{lines:?} {matching:?}");
            assert!(out.warnings.is_empty());
        }
    }
}

#[test]
fn test_order_preserved_across_rows() {
    let block = make_block(&[
        "-alpha", "-beta", "-gamma", "-delta", "+delta", "+beta", "+epsilon", "+alpha",
    ]);
    let out = aligner(LineMatching::Lines).align_block(false, &block);

    let left_numbers: Vec<usize> = out.rows.iter().filter_map(|r| r.left.line_number).collect();
    let right_numbers: Vec<usize> = out.rows.iter().filter_map(|r| r.right.line_number).collect();
    assert!(left_numbers.windows(2).all(|w| w[0] < w[1]));
    assert!(right_numbers.windows(2).all(|w| w[0] < w[1]));
    assert_eq!(left_numbers.len(), 4);
    assert_eq!(right_numbers.len(), 4);
}

#[test]
fn test_alignment_is_deterministic() {
    let block = make_block(&["-x = 1", "-y = 2", "-z = 3", "+y = 2", "+x = 1", "+w = 0"]);
    let aligner = aligner(LineMatching::Lines);
    assert_eq!(
        aligner.align_block(false, &block),
        aligner.align_block(false, &block)
    );
}

#[test]
fn test_every_row_has_two_cells() {
    let out = align(LineMatching::Lines, &["-a", "-b", "-c", "+b"]);
    for row in &out.rows {
        let left_filled = !row.left.is_empty_placeholder;
        let right_filled = !row.right.is_empty_placeholder;
        assert!(left_filled || right_filled);
    }
}

// -- Highlighting --

#[test]
fn test_fine_rows_highlighted() {
    let out = align(LineMatching::Lines, &["-let a = 1;", "+let a = 2;"]);
    let segments = out.rows[0].left.segments.as_ref().unwrap();
    assert!(segments.iter().any(|s| s.changed && s.text == "1"));
}

#[test]
fn test_highlight_disabled() {
    let mut config = Config::new().with_matching(LineMatching::Lines);
    config.highlight.enabled = false;
    let out = BlockAligner::new(&config).align_block(false, &make_block(&["-a b", "+a c"]));
    assert_eq!(out.rows[0].left.cell_type, CellType::DeleteChange);
    assert!(out.rows[0].left.segments.is_none());
}

#[test]
fn test_combined_prefix_split() {
    let block = DiffBlock::new(
        "@@@ -1 -1 +1 @@@",
        vec![DiffLine::delete("- old", 1), DiffLine::insert(" +new", 1)],
    );
    let out = aligner(LineMatching::None).align_block(true, &block);
    assert_eq!(out.rows[0].left.prefix, "- ");
    assert_eq!(out.rows[0].left.content, "old");
    assert_eq!(out.rows[0].right.prefix, " +");
    assert_eq!(out.rows[0].right.content, "new");
}

// -- Printer --

#[test]
fn test_printer_adds_block_headers() {
    let file = DiffFile {
        old_name: "a/lib.rs".into(),
        new_name: "b/lib.rs".into(),
        is_combined: false,
        blocks: vec![make_block(&[" a", "-b", "+c"]), make_block(&["+d"])],
    };
    let printer = SideBySidePrinter::new(&Config::new().with_matching(LineMatching::Lines));
    let rendered = printer.render_file(&file);

    assert_eq!(rendered.name, "lib.rs");
    assert_eq!(rendered.rows.len(), 5);
    assert_eq!(rendered.rows[0].left.cell_type, CellType::Info);
    assert_eq!(rendered.rows[0].left.content, "@@ -1 +1 @@");
    assert_eq!(rendered.rows[0].right.content, "");
    assert_eq!(rendered.rows[3].left.cell_type, CellType::Info);
    assert!(rendered.warnings.is_empty());
}

#[test]
fn test_printer_empty_file() {
    let file = DiffFile {
        old_name: "a/bin.dat".into(),
        new_name: "b/bin.dat".into(),
        ..Default::default()
    };
    let rendered = SideBySidePrinter::new(&Config::new()).render_file(&file);
    assert_eq!(rendered.rows.len(), 1);
    assert_eq!(rendered.rows[0].right.content, EMPTY_FILE_NOTICE);
}
