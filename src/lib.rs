// Library exports for testing and potential library use
//
// Pipeline: `parser` turns unified diff text into `model` files and blocks,
// `side_by_side` aligns each block into two-column rows, and `text` (or
// serde_json) renders them. `cli` wires the pipeline to the config crate.

/// Application version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod cli;
pub mod debug;
pub mod model;
pub mod parser;
pub mod side_by_side;
pub mod text;

pub use model::{DiffBlock, DiffFile, DiffLine, LineType};
pub use par_diff_config::Config;
pub use parser::{ParseError, parse_unified_diff};
pub use side_by_side::{FileRows, SideBySidePrinter};
pub use text::TextRenderer;

/// Parse `input` and align every file with `config`.
pub fn align_diff(input: &str, config: &Config) -> Result<Vec<FileRows>, ParseError> {
    let files = parse_unified_diff(input)?;
    Ok(SideBySidePrinter::new(config).render_files(&files))
}
