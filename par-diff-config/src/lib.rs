//! Configuration system for the par-diff side-by-side diff aligner.
//!
//! This crate provides configuration loading, saving, validation and default
//! values for the aligner, the intra-line highlighter, the text renderer and
//! the log bridge.

pub mod config;
pub mod error;
mod types;

pub use config::{
    Config, DEFAULT_MAX_COMPARISONS, DisplayConfig, HighlightConfig, MIN_DISPLAY_WIDTH,
};
pub use error::ConfigError;
pub use types::{ColorMode, HighlightStyle, LineMatching, LogLevel};
