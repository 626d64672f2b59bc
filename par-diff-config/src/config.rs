//! The top-level `Config` struct, its defaults, and file persistence.
//!
//! Covers:
//! - `load` / `save` (YAML, TOML or JSON chosen by file extension)
//! - XDG-compliant path helpers (`config_dir`, `config_path`)
//! - `validate` for fields serde cannot check on its own

use crate::error::ConfigError;
use crate::types::{ColorMode, HighlightStyle, LineMatching, LogLevel};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Comparison budget used when `matching_max_comparisons` is unset or zero.
pub const DEFAULT_MAX_COMPARISONS: usize = 2500;

/// Narrowest text layout that still fits two gutters and a divider.
pub const MIN_DISPLAY_WIDTH: usize = 20;

// ---------------------------------------------------------------------------
// Default value functions
// ---------------------------------------------------------------------------

fn default_true() -> bool {
    true
}

fn default_max_comparisons() -> usize {
    DEFAULT_MAX_COMPARISONS
}

fn default_max_line_length() -> usize {
    10_000
}

fn default_width() -> usize {
    160
}

// ---------------------------------------------------------------------------
// Config sections
// ---------------------------------------------------------------------------

/// Intra-line highlight settings for matched line pairs.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct HighlightConfig {
    /// Whether fine-grained pairs get intra-line highlighting.
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Word or character granularity.
    #[serde(default)]
    pub style: HighlightStyle,

    /// Pairs with a side longer than this many characters are not highlighted.
    #[serde(default = "default_max_line_length")]
    pub max_line_length: usize,
}

impl Default for HighlightConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            style: HighlightStyle::default(),
            max_line_length: default_max_line_length(),
        }
    }
}

/// Text output layout.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DisplayConfig {
    /// Total output width in columns, both sides plus divider.
    #[serde(default = "default_width")]
    pub width: usize,

    /// Show the line number gutter on each side.
    #[serde(default = "default_true")]
    pub show_line_numbers: bool,

    #[serde(default)]
    pub color: ColorMode,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            width: default_width(),
            show_line_numbers: true,
            color: ColorMode::default(),
        }
    }
}

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

/// Top-level par-diff configuration (`config.yaml`).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Line matching mode inside change runs.
    #[serde(default)]
    pub matching: LineMatching,

    /// Upper bound on `deleted * inserted` for similarity matching.
    /// Zero falls back to [`DEFAULT_MAX_COMPARISONS`].
    #[serde(default = "default_max_comparisons")]
    pub matching_max_comparisons: usize,

    #[serde(default)]
    pub highlight: HighlightConfig,

    #[serde(default)]
    pub display: DisplayConfig,

    #[serde(default)]
    pub log_level: LogLevel,

    /// Write log output here instead of stderr.
    #[serde(default)]
    pub log_file: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            matching: LineMatching::default(),
            matching_max_comparisons: DEFAULT_MAX_COMPARISONS,
            highlight: HighlightConfig::default(),
            display: DisplayConfig::default(),
            log_level: LogLevel::default(),
            log_file: None,
        }
    }
}

impl Config {
    /// Create a default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the line matching mode.
    pub fn with_matching(mut self, matching: LineMatching) -> Self {
        self.matching = matching;
        self
    }

    /// Set the comparison budget.
    pub fn with_max_comparisons(mut self, max: usize) -> Self {
        self.matching_max_comparisons = max;
        self
    }

    /// Comparison budget with the zero-means-default rule applied.
    pub fn effective_max_comparisons(&self) -> usize {
        if self.matching_max_comparisons == 0 {
            DEFAULT_MAX_COMPARISONS
        } else {
            self.matching_max_comparisons
        }
    }

    /// Check fields that deserialize fine but cannot be used.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.display.width < MIN_DISPLAY_WIDTH {
            return Err(ConfigError::Validation(format!(
                "display.width must be at least {MIN_DISPLAY_WIDTH}, got {}",
                self.display.width
            )));
        }
        if self.highlight.max_line_length == 0 {
            return Err(ConfigError::Validation(
                "highlight.max_line_length must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }

    /// Parse YAML config text and validate it.
    pub fn from_yaml_str(contents: &str) -> Result<Self, ConfigError> {
        let config: Config = serde_yaml_ng::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a config file, picking the format from its extension.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        log::info!("Loading config from {:?}", path);
        let contents = fs::read_to_string(path)?;

        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or_default()
            .to_ascii_lowercase();
        let config: Config = match extension.as_str() {
            "yaml" | "yml" => serde_yaml_ng::from_str(&contents)?,
            "toml" => toml::from_str(&contents)?,
            "json" => serde_json::from_str(&contents)?,
            other => return Err(ConfigError::UnsupportedFormat(other.to_string())),
        };
        config.validate()?;
        Ok(config)
    }

    /// Load the config at [`Config::config_path`], or defaults if it does not exist.
    pub fn load_or_default() -> Result<Self, ConfigError> {
        match Self::config_path() {
            Some(path) if path.exists() => Self::load(&path),
            Some(path) => {
                log::debug!("No config at {:?}, using defaults", path);
                Ok(Self::default())
            }
            None => {
                log::debug!("No config directory on this platform, using defaults");
                Ok(Self::default())
            }
        }
    }

    /// Write the config as YAML, creating parent directories as needed.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }
        let yaml = serde_yaml_ng::to_string(self)?;
        fs::write(path, yaml)?;
        log::info!("Saved config to {:?}", path);
        Ok(())
    }

    /// `<platform config dir>/par-diff`
    pub fn config_dir() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("par-diff"))
    }

    /// `<platform config dir>/par-diff/config.yaml`
    pub fn config_path() -> Option<PathBuf> {
        Self::config_dir().map(|d| d.join("config.yaml"))
    }
}
