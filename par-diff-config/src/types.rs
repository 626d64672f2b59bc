//! Enumerated config values shared by the aligner, the renderer and the CLI.

use serde::{Deserialize, Serialize};

/// How deleted and inserted lines inside a change run are paired up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LineMatching {
    /// Positional pairing only; no similarity search.
    #[default]
    None,
    /// Similarity search over line characters.
    Lines,
    /// Similarity search over word tokens.
    Words,
}

impl LineMatching {
    /// Whether this mode runs the similarity matcher at all.
    pub fn is_enabled(self) -> bool {
        !matches!(self, LineMatching::None)
    }

    /// Display name for CLI help and logs
    pub fn display_name(&self) -> &'static str {
        match self {
            LineMatching::None => "none",
            LineMatching::Lines => "lines",
            LineMatching::Words => "words",
        }
    }
}

/// Token granularity for intra-line highlighting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum HighlightStyle {
    /// Words and single punctuation characters.
    #[default]
    Word,
    /// Grapheme clusters.
    Char,
}

/// When to emit ANSI colour escapes in text output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ColorMode {
    /// Colour when stdout is a terminal.
    #[default]
    Auto,
    Always,
    Never,
}

/// Log level for the log bridge.
///
/// The `--log-level` CLI flag and `RUST_LOG` take precedence over this.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// No logging
    #[default]
    Off,
    /// Errors only
    Error,
    /// Warnings and errors
    Warn,
    /// Informational messages
    Info,
    /// Debug messages
    Debug,
    /// Most verbose
    Trace,
}

impl LogLevel {
    /// Convert to `log::LevelFilter`
    pub fn to_level_filter(self) -> log::LevelFilter {
        match self {
            LogLevel::Off => log::LevelFilter::Off,
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}
