//! Command-line interface for par-diff.
//!
//! Flags override the loaded config file; the result is validated before any
//! input is read. Logging starts before the config is loaded, at the level
//! given by `--log-level` or `RUST_LOG`, and is reconfigured from the config.

use std::io::{self, IsTerminal, Read};
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, ValueEnum};
use log::LevelFilter;
use par_diff_config::{ColorMode, Config, HighlightStyle, LineMatching, LogLevel};

use crate::debug::{configure_log_bridge, init_log_bridge, resolve_level};
use crate::parser::parse_unified_diff;
use crate::side_by_side::SideBySidePrinter;
use crate::text::TextRenderer;

/// par-diff - Side-by-side viewer for unified diffs
#[derive(Parser, Debug)]
#[command(name = "par-diff")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Unified diff to read (stdin when omitted or "-")
    #[arg(value_name = "FILE")]
    pub input: Option<PathBuf>,

    /// How deleted and inserted lines are paired
    #[arg(long, value_enum)]
    pub matching: Option<MatchingArg>,

    /// Comparison budget for similarity matching (0 means the default of 2500)
    #[arg(long, value_name = "N")]
    pub max_comparisons: Option<usize>,

    /// Intra-line highlight granularity
    #[arg(long, value_enum)]
    pub highlight: Option<HighlightArg>,

    /// Disable intra-line highlighting
    #[arg(long, conflicts_with = "highlight")]
    pub no_highlight: bool,

    /// Total output width in columns
    #[arg(long, value_name = "COLUMNS")]
    pub width: Option<usize>,

    /// Hide the line number gutters
    #[arg(long)]
    pub no_line_numbers: bool,

    /// When to colour text output
    #[arg(long, value_enum)]
    pub color: Option<ColorArg>,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Config file (defaults to the par-diff config directory)
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Log level (overrides RUST_LOG and the config file)
    #[arg(long, value_enum)]
    pub log_level: Option<LogLevelArg>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum MatchingArg {
    None,
    Lines,
    Words,
}

impl From<MatchingArg> for LineMatching {
    fn from(arg: MatchingArg) -> Self {
        match arg {
            MatchingArg::None => LineMatching::None,
            MatchingArg::Lines => LineMatching::Lines,
            MatchingArg::Words => LineMatching::Words,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum HighlightArg {
    Word,
    Char,
}

impl From<HighlightArg> for HighlightStyle {
    fn from(arg: HighlightArg) -> Self {
        match arg {
            HighlightArg::Word => HighlightStyle::Word,
            HighlightArg::Char => HighlightStyle::Char,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ColorArg {
    Auto,
    Always,
    Never,
}

impl From<ColorArg> for ColorMode {
    fn from(arg: ColorArg) -> Self {
        match arg {
            ColorArg::Auto => ColorMode::Auto,
            ColorArg::Always => ColorMode::Always,
            ColorArg::Never => ColorMode::Never,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum LogLevelArg {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevelArg> for LogLevel {
    fn from(arg: LogLevelArg) -> Self {
        match arg {
            LogLevelArg::Off => LogLevel::Off,
            LogLevelArg::Error => LogLevel::Error,
            LogLevelArg::Warn => LogLevel::Warn,
            LogLevelArg::Info => LogLevel::Info,
            LogLevelArg::Debug => LogLevel::Debug,
            LogLevelArg::Trace => LogLevel::Trace,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

impl Cli {
    /// Apply flag overrides on top of `config`.
    pub fn apply_to(&self, config: &mut Config) {
        if let Some(matching) = self.matching {
            config.matching = matching.into();
        }
        if let Some(max) = self.max_comparisons {
            config.matching_max_comparisons = max;
        }
        if let Some(style) = self.highlight {
            config.highlight.enabled = true;
            config.highlight.style = style.into();
        }
        if self.no_highlight {
            config.highlight.enabled = false;
        }
        if let Some(width) = self.width {
            config.display.width = width;
        }
        if self.no_line_numbers {
            config.display.show_line_numbers = false;
        }
        if let Some(color) = self.color {
            config.display.color = color.into();
        }
    }

    /// Load the config file, apply flag overrides, and validate the result.
    pub fn resolve_config(&self) -> anyhow::Result<Config> {
        let mut config = match &self.config {
            Some(path) => Config::load(path)
                .with_context(|| format!("failed to load config from {}", path.display()))?,
            None => Config::load_or_default().context("failed to load default config")?,
        };
        self.apply_to(&mut config);
        config.validate()?;
        Ok(config)
    }

    /// Log level in effect before the config file is read: the flag, then
    /// `RUST_LOG`, otherwise off.
    pub fn startup_log_level(&self, rust_log: Option<&str>) -> LevelFilter {
        resolve_level(self.log_level.map(Into::into), rust_log, LogLevel::Off)
    }
}

/// Read the diff from `path`, or stdin for `None` and `-`.
pub fn read_input(path: Option<&Path>) -> anyhow::Result<String> {
    match path {
        Some(path) if path != Path::new("-") => std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display())),
        _ => {
            let mut input = String::new();
            io::stdin()
                .read_to_string(&mut input)
                .context("failed to read diff from stdin")?;
            Ok(input)
        }
    }
}

/// Parse `input` and render it in `format`.
pub fn render(
    input: &str,
    config: &Config,
    format: OutputFormat,
    color: bool,
) -> anyhow::Result<String> {
    let files = parse_unified_diff(input)?;
    log::info!("Parsed {} file(s)", files.len());

    let rendered = SideBySidePrinter::new(config).render_files(&files);
    match format {
        OutputFormat::Text => Ok(TextRenderer::new(&config.display, color).render(&rendered)),
        OutputFormat::Json => {
            let mut json = serde_json::to_string_pretty(&rendered)?;
            json.push('\n');
            Ok(json)
        }
    }
}

/// Resolve whether text output is coloured.
pub fn use_color(mode: ColorMode) -> bool {
    match mode {
        ColorMode::Always => true,
        ColorMode::Never => false,
        ColorMode::Auto => io::stdout().is_terminal(),
    }
}

/// Full command: logging, config, input, rendering to stdout.
pub fn run(cli: &Cli) -> anyhow::Result<()> {
    let rust_log = std::env::var("RUST_LOG").ok();
    init_log_bridge(cli.startup_log_level(rust_log.as_deref()));

    let config = cli.resolve_config()?;
    let level = resolve_level(
        cli.log_level.map(Into::into),
        rust_log.as_deref(),
        config.log_level,
    );
    configure_log_bridge(level, config.log_file.as_deref()).context("failed to open log file")?;

    if config.matching.is_enabled() {
        log::debug!(
            "Matching {} with a budget of {} comparisons",
            config.matching.display_name(),
            config.effective_max_comparisons()
        );
    } else {
        log::debug!("Line matching disabled, pairing changed lines by position");
    }

    let input = read_input(cli.input.as_deref())?;
    let output = render(&input, &config, cli.format, use_color(config.display.color))?;
    print!("{output}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("par-diff").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_defaults_leave_config_untouched() {
        let cli = parse(&[]);
        let mut config = Config::default();
        cli.apply_to(&mut config);
        assert_eq!(config, Config::default());
        assert_eq!(cli.format, OutputFormat::Text);
        assert!(cli.input.is_none());
    }

    #[test]
    fn test_flags_override_config() {
        let cli = parse(&[
            "--matching",
            "words",
            "--max-comparisons",
            "100",
            "--highlight",
            "char",
            "--width",
            "120",
            "--no-line-numbers",
            "--color",
            "never",
            "diff.patch",
        ]);
        let mut config = Config::default();
        cli.apply_to(&mut config);
        assert_eq!(config.matching, LineMatching::Words);
        assert_eq!(config.matching_max_comparisons, 100);
        assert_eq!(config.highlight.style, HighlightStyle::Char);
        assert_eq!(config.display.width, 120);
        assert!(!config.display.show_line_numbers);
        assert_eq!(config.display.color, ColorMode::Never);
        assert_eq!(cli.input, Some(PathBuf::from("diff.patch")));
    }

    #[test]
    fn test_no_highlight() {
        let cli = parse(&["--no-highlight"]);
        let mut config = Config::default();
        cli.apply_to(&mut config);
        assert!(!config.highlight.enabled);
    }

    #[test]
    fn test_highlight_conflicts_with_no_highlight() {
        let result = Cli::try_parse_from(["par-diff", "--highlight", "word", "--no-highlight"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_startup_log_level_ignores_config() {
        assert_eq!(parse(&["--log-level", "info"]).startup_log_level(None), LevelFilter::Info);
        assert_eq!(
            parse(&["--log-level", "warn"]).startup_log_level(Some("trace")),
            LevelFilter::Warn
        );
        assert_eq!(parse(&[]).startup_log_level(Some("debug")), LevelFilter::Debug);
        assert_eq!(parse(&[]).startup_log_level(None), LevelFilter::Off);
    }

    #[test]
    fn test_rejects_unknown_matching() {
        assert!(Cli::try_parse_from(["par-diff", "--matching", "fuzzy"]).is_err());
    }

    #[test]
    fn test_render_json() {
        let diff = "\
--- a/f.txt
+++ b/f.txt
@@ -1,2 +1,2 @@
 same
-old
+new
";
        let config = Config::default().with_matching(LineMatching::Lines);
        let output = render(diff, &config, OutputFormat::Json, false).unwrap();
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();
        let rows = value[0]["rows"].as_array().unwrap();
        // header, context, paired change
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0]["left"]["cell_type"], "info");
        assert_eq!(rows[2]["left"]["cell_type"], "delete-change");
        assert_eq!(rows[2]["right"]["cell_type"], "insert-change");

        let output = render(diff, &Config::default(), OutputFormat::Json, false).unwrap();
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(value[0]["rows"][2]["left"]["cell_type"], "delete");
    }

    #[test]
    fn test_render_rejects_non_diff() {
        let err = render("hello\n", &Config::default(), OutputFormat::Text, false).unwrap_err();
        assert!(err.to_string().contains("diff"));
    }
}
