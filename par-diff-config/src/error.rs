//! Typed error variants for the par-diff-config crate.
//!
//! Callers that use `anyhow` get these through the blanket `From` impl for
//! any `std::error::Error`, and can downcast to match on a specific failure.
//!
//! # Example
//!
//! ```rust,no_run
//! use par_diff_config::ConfigError;
//!
//! fn check_load_err(e: &anyhow::Error) {
//!     if let Some(cfg_err) = e.downcast_ref::<ConfigError>() {
//!         match cfg_err {
//!             ConfigError::Io(io) => eprintln!("I/O error: {io}"),
//!             ConfigError::Yaml(p) => eprintln!("YAML parse error: {p}"),
//!             ConfigError::Toml(p) => eprintln!("TOML parse error: {p}"),
//!             ConfigError::Json(p) => eprintln!("JSON parse error: {p}"),
//!             ConfigError::UnsupportedFormat(ext) => eprintln!("Unsupported: {ext}"),
//!             ConfigError::Validation(msg) => eprintln!("Validation: {msg}"),
//!         }
//!     }
//! }
//! ```

/// Errors that can occur when loading, validating or saving configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// An I/O error occurred reading or writing the config file.
    #[error("I/O error reading config: {0}")]
    Io(#[from] std::io::Error),

    /// The config file contained invalid YAML.
    #[error("YAML parse error in config: {0}")]
    Yaml(#[from] serde_yaml_ng::Error),

    /// The config file contained invalid TOML.
    #[error("TOML parse error in config: {0}")]
    Toml(#[from] toml::de::Error),

    /// The config file contained invalid JSON.
    #[error("JSON parse error in config: {0}")]
    Json(#[from] serde_json::Error),

    /// The file extension does not name a supported format.
    #[error("unsupported config format: {0:?} (expected yaml, yml, toml or json)")]
    UnsupportedFormat(String),

    /// A field value failed semantic validation.
    ///
    /// The inner string names the field and why it is invalid.
    #[error("Config validation error: {0}")]
    Validation(String),
}
