//! Fixed-width two-column text output for aligned rows.
//!
//! Each side gets half the width minus the divider; each cell is an optional
//! line number gutter, the marker prefix, and the content truncated with `~`.
//! With colour enabled, deletes are red, inserts green, block headers cyan, and
//! changed segments of highlighted pairs get a darker background.

use par_diff_config::DisplayConfig;

use crate::side_by_side::{Cell, CellType, FileRows, Row, Segment};

const RESET: &str = "\x1b[0m";
const BOLD: &str = "\x1b[1m";
const DIVIDER: &str = " | ";

/// Colours used by [`TextRenderer`], as `[r, g, b]`.
#[derive(Debug, Clone)]
pub struct Palette {
    pub removed: [u8; 3],
    pub added: [u8; 3],
    pub removed_highlight_bg: [u8; 3],
    pub added_highlight_bg: [u8; 3],
    pub header: [u8; 3],
    pub gutter: [u8; 3],
}

impl Default for Palette {
    /// Catppuccin Mocha-inspired defaults.
    fn default() -> Self {
        Self {
            removed: [243, 139, 168],
            added: [166, 227, 161],
            removed_highlight_bg: [100, 0, 0],
            added_highlight_bg: [0, 80, 0],
            header: [148, 226, 213],
            gutter: [108, 112, 134],
        }
    }
}

fn fg(rgb: [u8; 3]) -> String {
    format!("\x1b[38;2;{};{};{}m", rgb[0], rgb[1], rgb[2])
}

fn bg(rgb: [u8; 3]) -> String {
    format!("\x1b[48;2;{};{};{}m", rgb[0], rgb[1], rgb[2])
}

/// Truncate a string to fit within a given width.
pub fn truncate_str(s: &str, max_width: usize) -> String {
    let char_count = s.chars().count();
    if char_count <= max_width {
        s.to_string()
    } else if max_width > 1 {
        let truncated: String = s.chars().take(max_width - 1).collect();
        format!("{truncated}~")
    } else if max_width == 1 {
        "~".to_string()
    } else {
        String::new()
    }
}

/// Clip highlight segments to `max_width` characters, ending in `~` when cut.
fn clip_segments(segments: &[Segment], max_width: usize) -> Vec<Segment> {
    let total: usize = segments.iter().map(|s| s.text.chars().count()).sum();
    if total <= max_width {
        return segments.to_vec();
    }

    let mut budget = max_width.saturating_sub(1);
    let mut clipped = Vec::new();
    for segment in segments {
        if budget == 0 {
            break;
        }
        let text: String = segment.text.chars().take(budget).collect();
        budget -= text.chars().count();
        clipped.push(Segment {
            text,
            changed: segment.changed,
        });
    }
    if max_width > 0 {
        clipped.push(Segment {
            text: "~".to_string(),
            changed: false,
        });
    }
    clipped
}

/// Renders [`FileRows`] as plain or ANSI-coloured text.
#[derive(Debug, Clone)]
pub struct TextRenderer {
    width: usize,
    show_line_numbers: bool,
    color: bool,
    palette: Palette,
}

impl TextRenderer {
    pub fn new(display: &DisplayConfig, color: bool) -> Self {
        Self {
            width: display.width,
            show_line_numbers: display.show_line_numbers,
            color,
            palette: Palette::default(),
        }
    }

    fn half_width(&self) -> usize {
        self.width.saturating_sub(DIVIDER.len()) / 2
    }

    fn gutter_width(&self) -> usize {
        if self.show_line_numbers { 6 } else { 0 }
    }

    /// Render all files, each preceded by a name line.
    pub fn render(&self, files: &[FileRows]) -> String {
        let mut out = String::new();
        for (i, file) in files.iter().enumerate() {
            if i > 0 {
                out.push('\n');
            }
            self.render_file(file, &mut out);
        }
        out
    }

    fn render_file(&self, file: &FileRows, out: &mut String) {
        let title = truncate_str(&file.name, self.width);
        if self.color {
            out.push_str(&format!("{BOLD}{title}{RESET}\n"));
        } else {
            out.push_str(&title);
            out.push('\n');
        }

        let prefix_width = if file.is_combined { 2 } else { 1 };
        for row in &file.rows {
            let mut line = String::new();
            self.render_row(row, prefix_width, &mut line);
            out.push_str(line.trim_end_matches(' '));
            out.push('\n');
        }
    }

    fn render_row(&self, row: &Row, prefix_width: usize, out: &mut String) {
        // Block headers and notices span the full width
        if row.left.cell_type == CellType::Info && row.right.cell_type == CellType::Info {
            let text = if row.left.content.is_empty() {
                &row.right.content
            } else {
                &row.left.content
            };
            let text = truncate_str(text, self.width);
            if self.color {
                out.push_str(&format!("{}{text}{RESET}", fg(self.palette.header)));
            } else {
                out.push_str(&text);
            }
            return;
        }

        let (left, left_len) = self.render_cell(&row.left, prefix_width);
        out.push_str(&left);
        out.push_str(&" ".repeat(self.half_width().saturating_sub(left_len)));

        if self.color {
            out.push_str(&format!("{}{DIVIDER}{RESET}", fg(self.palette.gutter)));
        } else {
            out.push_str(DIVIDER);
        }

        let (right, _) = self.render_cell(&row.right, prefix_width);
        out.push_str(&right);
    }

    /// Rendered cell text and its visible width.
    fn render_cell(&self, cell: &Cell, prefix_width: usize) -> (String, usize) {
        let gutter_width = self.gutter_width();
        let content_width = self
            .half_width()
            .saturating_sub(gutter_width + prefix_width);

        let mut text = String::new();
        let mut visible = 0;

        if gutter_width > 0 {
            let gutter = cell
                .line_number
                .map(|n| format!("{n:>width$} ", width = gutter_width - 1))
                .unwrap_or_else(|| " ".repeat(gutter_width));
            visible += gutter_width;
            if self.color {
                text.push_str(&format!("{}{gutter}{RESET}", fg(self.palette.gutter)));
            } else {
                text.push_str(&gutter);
            }
        }

        if cell.is_empty_placeholder {
            return (text, visible);
        }

        let prefix = format!("{:<prefix_width$}", cell.prefix);
        visible += prefix.chars().count();

        let (line_fg, highlight_bg) = if cell.cell_type.is_delete() {
            (Some(self.palette.removed), self.palette.removed_highlight_bg)
        } else if cell.cell_type.is_insert() {
            (Some(self.palette.added), self.palette.added_highlight_bg)
        } else {
            (None, self.palette.gutter)
        };

        if !self.color {
            let content = truncate_str(&cell.content, content_width);
            visible += content.chars().count();
            text.push_str(&prefix);
            text.push_str(&content);
            return (text, visible);
        }

        let base = line_fg.map(fg).unwrap_or_default();
        text.push_str(&format!("{base}{prefix}"));
        match &cell.segments {
            Some(segments) => {
                for segment in clip_segments(segments, content_width) {
                    visible += segment.text.chars().count();
                    if segment.changed {
                        text.push_str(&format!(
                            "{}{BOLD}{}{RESET}{base}",
                            bg(highlight_bg),
                            segment.text
                        ));
                    } else {
                        text.push_str(&segment.text);
                    }
                }
            }
            None => {
                let content = truncate_str(&cell.content, content_width);
                visible += content.chars().count();
                text.push_str(&content);
            }
        }
        text.push_str(RESET);
        (text, visible)
    }
}
