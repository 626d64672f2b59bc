//! Unified diff parsing.
//!
//! Parses unified diff text (`diff -u`, `diff --git`, and combined
//! `diff --cc` output) into [`DiffFile`]s with numbered [`DiffLine`]s.
//! The main entry point is [`parse_unified_diff`].

use crate::model::{DiffBlock, DiffFile, DiffLine, LineType};

/// Errors produced while parsing diff input.
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    /// The input contained no file sections.
    #[error("no diff content found")]
    NoDiff,
}

/// Parse unified diff text into structured `DiffFile`s.
pub fn parse_unified_diff(input: &str) -> Result<Vec<DiffFile>, ParseError> {
    let lines: Vec<&str> = input.lines().collect();
    let mut files: Vec<DiffFile> = Vec::new();
    let mut i = 0;

    while i < lines.len() {
        let line = lines[i];

        if is_file_start(line) {
            // `diff --git a/x b/x`, `diff --cc x`, `diff --combined x`
            let is_combined = line.starts_with("diff --cc ") || line.starts_with("diff --combined ");
            let (mut old_name, mut new_name) = parse_file_start(line);

            i += 1;
            // Skip extended header lines (index, mode, rename, ...)
            while i < lines.len()
                && !lines[i].starts_with("--- ")
                && !is_file_start(lines[i])
                && !is_hunk_start(lines[i])
            {
                i += 1;
            }

            if i < lines.len() && lines[i].starts_with("--- ") {
                old_name = header_path(&lines[i][4..]);
                i += 1;
                if i < lines.len() && lines[i].starts_with("+++ ") {
                    new_name = header_path(&lines[i][4..]);
                    i += 1;
                }
            }

            let (blocks, next_i) = parse_blocks(&lines, i, is_combined);
            i = next_i;
            files.push(DiffFile {
                old_name,
                new_name,
                is_combined,
                blocks,
            });
        } else if line.starts_with("--- ") && i + 1 < lines.len() && lines[i + 1].starts_with("+++ ")
        {
            // Plain unified diff (e.g., `diff -u`)
            let old_name = header_path(&line[4..]);
            let new_name = header_path(&lines[i + 1][4..]);
            let (blocks, next_i) = parse_blocks(&lines, i + 2, false);
            i = next_i;
            files.push(DiffFile {
                old_name,
                new_name,
                is_combined: false,
                blocks,
            });
        } else {
            i += 1;
        }
    }

    if files.is_empty() {
        return Err(ParseError::NoDiff);
    }
    log::debug!("Parsed {} file(s) from diff input", files.len());
    Ok(files)
}

fn is_file_start(line: &str) -> bool {
    line.starts_with("diff --git ")
        || line.starts_with("diff --cc ")
        || line.starts_with("diff --combined ")
}

fn is_hunk_start(line: &str) -> bool {
    line.starts_with("@@")
}

fn is_plain_file_start(lines: &[&str], i: usize) -> bool {
    lines[i].starts_with("--- ") && i + 1 < lines.len() && lines[i + 1].starts_with("+++ ")
}

/// Path from a `---`/`+++` header, without any trailing timestamp.
fn header_path(rest: &str) -> String {
    rest.split('\t').next().unwrap_or(rest).trim().to_string()
}

/// Old and new paths from a `diff --git`/`diff --cc` line.
pub(crate) fn parse_file_start(line: &str) -> (String, String) {
    if let Some(rest) = line
        .strip_prefix("diff --cc ")
        .or_else(|| line.strip_prefix("diff --combined "))
    {
        let name = rest.trim().to_string();
        return (name.clone(), name);
    }

    let rest = line.strip_prefix("diff --git ").unwrap_or(line);
    // Split on " b/", which handles `a/path b/path`
    if let Some(idx) = rest.find(" b/") {
        (rest[..idx].to_string(), rest[idx + 1..].to_string())
    } else {
        let parts: Vec<&str> = rest.splitn(2, ' ').collect();
        if parts.len() == 2 {
            (parts[0].to_string(), parts[1].to_string())
        } else {
            (rest.to_string(), rest.to_string())
        }
    }
}

/// Parse consecutive hunks starting at `start` until the next file section.
fn parse_blocks(lines: &[&str], start: usize, is_combined: bool) -> (Vec<DiffBlock>, usize) {
    let mut blocks = Vec::new();
    let mut i = start;

    while i < lines.len() && !is_file_start(lines[i]) && !is_plain_file_start(lines, i) {
        if is_hunk_start(lines[i]) {
            let (block, next_i) = parse_block(lines, i, is_combined);
            blocks.push(block);
            i = next_i;
        } else {
            i += 1;
        }
    }

    (blocks, i)
}

/// Parse one hunk starting at its `@@` header line.
/// Returns the block and the index of the first line after it.
fn parse_block(lines: &[&str], start: usize, is_combined: bool) -> (DiffBlock, usize) {
    let header = lines[start];
    let range = parse_hunk_header(header);
    let prefix_size = if is_combined { 2 } else { 1 };

    let mut old_line = range.old_start;
    let mut new_line = range.new_start;
    let mut old_remaining = range.old_count;
    let mut new_remaining = range.new_count;
    let mut block_lines = Vec::new();
    let mut i = start + 1;

    while i < lines.len() {
        let line = lines[i];
        if line.starts_with('\\') {
            // "\ No newline at end of file"
            i += 1;
            continue;
        }
        if is_hunk_start(line) || is_file_start(line) {
            break;
        }
        // Counts are only reliable for two-way diffs
        if !is_combined && old_remaining == 0 && new_remaining == 0 {
            break;
        }

        let marker: String = line.chars().take(prefix_size).collect();
        let line_type = classify_marker(&marker);
        let content = if line.is_empty() {
            " ".repeat(prefix_size)
        } else {
            line.to_string()
        };

        match line_type {
            LineType::Context => {
                block_lines.push(DiffLine::context(content, old_line, new_line));
                old_line += 1;
                new_line += 1;
                old_remaining = old_remaining.saturating_sub(1);
                new_remaining = new_remaining.saturating_sub(1);
            }
            LineType::Delete => {
                block_lines.push(DiffLine::delete(content, old_line));
                old_line += 1;
                old_remaining = old_remaining.saturating_sub(1);
            }
            LineType::Insert => {
                block_lines.push(DiffLine::insert(content, new_line));
                new_line += 1;
                new_remaining = new_remaining.saturating_sub(1);
            }
        }
        i += 1;
    }

    (
        DiffBlock {
            header: header.to_string(),
            old_start: range.old_start,
            new_start: range.new_start,
            lines: block_lines,
        },
        i,
    )
}

/// Line type from its marker column(s). Any `-` wins over `+`.
fn classify_marker(marker: &str) -> LineType {
    if marker.contains('-') {
        LineType::Delete
    } else if marker.contains('+') {
        LineType::Insert
    } else {
        LineType::Context
    }
}

/// Ranges from a `@@ -a,b +c,d @@` (or `@@@ -a,b -c,d +e,f @@@`) header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct HunkRange {
    pub old_start: usize,
    pub old_count: usize,
    pub new_start: usize,
    pub new_count: usize,
}

pub(crate) fn parse_hunk_header(header: &str) -> HunkRange {
    let mut range = HunkRange {
        old_start: 1,
        old_count: 1,
        new_start: 1,
        new_count: 1,
    };

    let at_count = header.chars().take_while(|&c| c == '@').count();
    let closing = format!(" {}", "@".repeat(at_count));
    let rest = &header[at_count..];
    let Some(end_idx) = rest.find(&closing) else {
        return range;
    };

    let mut seen_old = false;
    for part in rest[..end_idx].split_whitespace() {
        if let Some(old_part) = part.strip_prefix('-') {
            // Combined diffs list one range per parent; the first is the old side
            if !seen_old {
                (range.old_start, range.old_count) = parse_range(old_part);
                seen_old = true;
            }
        } else if let Some(new_part) = part.strip_prefix('+') {
            (range.new_start, range.new_count) = parse_range(new_part);
        }
    }

    range
}

fn parse_range(part: &str) -> (usize, usize) {
    let mut nums = part.splitn(2, ',');
    let start = nums.next().and_then(|n| n.parse().ok()).unwrap_or(1);
    let count = nums.next().and_then(|n| n.parse().ok()).unwrap_or(1);
    (start, count)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_git_diff() {
        let input = "\
diff --git a/src/main.rs b/src/main.rs
index abc1234..def5678 100644
--- a/src/main.rs
+++ b/src/main.rs
@@ -1,3 +1,4 @@ fn main()
 line1
+added
 line2
 line3
";
        let files = parse_unified_diff(input).unwrap();
        assert_eq!(files.len(), 1);
        assert_eq!(files[0].old_name, "a/src/main.rs");
        assert_eq!(files[0].new_name, "b/src/main.rs");
        assert!(!files[0].is_combined);

        let block = &files[0].blocks[0];
        assert_eq!(block.header, "@@ -1,3 +1,4 @@ fn main()");
        assert_eq!(block.lines.len(), 4);
        assert_eq!(block.lines[1], DiffLine::insert("+added", 2));
        assert_eq!(block.lines[3], DiffLine::context(" line3", 3, 4));
    }

    #[test]
    fn test_parse_line_numbers_across_changes() {
        let input = "\
--- old.txt\t2024-01-01 00:00:00
+++ new.txt\t2024-01-02 00:00:00
@@ -10,3 +20,3 @@
 keep
-gone
+here
 tail
";
        let files = parse_unified_diff(input).unwrap();
        assert_eq!(files[0].old_name, "old.txt");
        assert_eq!(files[0].new_name, "new.txt");
        let lines = &files[0].blocks[0].lines;
        assert_eq!(lines[0], DiffLine::context(" keep", 10, 20));
        assert_eq!(lines[1], DiffLine::delete("-gone", 11));
        assert_eq!(lines[2], DiffLine::insert("+here", 21));
        assert_eq!(lines[3], DiffLine::context(" tail", 12, 22));
    }

    #[test]
    fn test_parse_multiple_files_and_hunks() {
        let input = "\
diff --git a/file1.rs b/file1.rs
--- a/file1.rs
+++ b/file1.rs
@@ -1,2 +1,2 @@
-old1
+new1
 same
@@ -10,1 +10,1 @@
-old2
+new2
diff --git a/file2.rs b/file2.rs
--- a/file2.rs
+++ b/file2.rs
@@ -1 +1 @@
-x
+y
";
        let files = parse_unified_diff(input).unwrap();
        assert_eq!(files.len(), 2);
        assert_eq!(files[0].blocks.len(), 2);
        assert_eq!(files[1].blocks.len(), 1);
        assert_eq!(files[1].blocks[0].lines.len(), 2);
    }

    #[test]
    fn test_deleted_line_that_looks_like_header() {
        let input = "\
--- a.txt
+++ b.txt
@@ -1,2 +1,1 @@
--- not a header
 keep
";
        let files = parse_unified_diff(input).unwrap();
        assert_eq!(files.len(), 1);
        let lines = &files[0].blocks[0].lines;
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].line_type, LineType::Delete);
        assert_eq!(lines[0].content, "--- not a header");
    }

    #[test]
    fn test_no_newline_marker_skipped() {
        let input = "\
--- a.txt
+++ b.txt
@@ -1 +1 @@
-old
\\ No newline at end of file
+new
\\ No newline at end of file
";
        let files = parse_unified_diff(input).unwrap();
        let lines = &files[0].blocks[0].lines;
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[1].content, "+new");
    }

    #[test]
    fn test_parse_combined_diff() {
        let input = "\
diff --cc src/merge.rs
index 1111111,2222222..3333333
--- a/src/merge.rs
+++ b/src/merge.rs
@@@ -1,2 -1,2 +1,2 @@@
  shared
- ours
 +theirs
++both
";
        let files = parse_unified_diff(input).unwrap();
        assert!(files[0].is_combined);
        let lines = &files[0].blocks[0].lines;
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[0].line_type, LineType::Context);
        assert_eq!(lines[1].line_type, LineType::Delete);
        assert_eq!(lines[2].line_type, LineType::Insert);
        assert_eq!(lines[3].line_type, LineType::Insert);
    }

    #[test]
    fn test_hunk_header_variants() {
        let r = parse_hunk_header("@@ -5 +7,0 @@");
        assert_eq!(
            r,
            HunkRange {
                old_start: 5,
                old_count: 1,
                new_start: 7,
                new_count: 0
            }
        );
        let r = parse_hunk_header("@@@ -3,4 -9,9 +3,5 @@@ ctx");
        assert_eq!((r.old_start, r.old_count, r.new_start, r.new_count), (3, 4, 3, 5));
        let r = parse_hunk_header("not a header");
        assert_eq!(r.old_start, 1);
    }

    #[test]
    fn test_parse_file_start_without_prefixes() {
        assert_eq!(
            parse_file_start("diff --git one two"),
            ("one".to_string(), "two".to_string())
        );
        assert_eq!(
            parse_file_start("diff --cc merged.rs"),
            ("merged.rs".to_string(), "merged.rs".to_string())
        );
    }

    #[test]
    fn test_no_diff_is_error() {
        assert!(matches!(
            parse_unified_diff("just some text\n"),
            Err(ParseError::NoDiff)
        ));
    }
}
