//! Log bridge for par-diff.
//!
//! Routes `log::info!()` and friends to stderr, or to a file when one is
//! configured, so diagnostics never mix with the rendered diff on stdout.
//!
//! Level precedence: `--log-level` flag, then `RUST_LOG`, then the config's
//! `log_level`.

use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::Path;
use std::str::FromStr;
use std::sync::OnceLock;
use std::time::{SystemTime, UNIX_EPOCH};

use log::{LevelFilter, Log, Metadata, Record};
use par_diff_config::LogLevel;
use parking_lot::Mutex;

struct BridgeState {
    level: LevelFilter,
    file: Option<File>,
}

struct LogBridge {
    state: Mutex<BridgeState>,
}

impl Log for LogBridge {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.state.lock().level
    }

    fn log(&self, record: &Record) {
        let mut state = self.state.lock();
        if record.level() > state.level {
            return;
        }
        let line = format_line(record.level(), record.target(), &record.args().to_string());
        match state.file.as_mut() {
            Some(file) => {
                let _ = file.write_all(line.as_bytes());
            }
            None => eprint!("{line}"),
        }
    }

    fn flush(&self) {
        if let Some(file) = self.state.lock().file.as_mut() {
            let _ = file.flush();
        }
    }
}

static BRIDGE: OnceLock<LogBridge> = OnceLock::new();

fn get_bridge() -> &'static LogBridge {
    BRIDGE.get_or_init(|| LogBridge {
        state: Mutex::new(BridgeState {
            level: LevelFilter::Off,
            file: None,
        }),
    })
}

fn get_timestamp() -> String {
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default();
    format!("{}.{:06}", now.as_secs(), now.subsec_micros())
}

/// One log line: `[timestamp] [LEVEL] [target] message`.
pub fn format_line(level: log::Level, target: &str, msg: &str) -> String {
    format!("[{}] [{:<5}] [{}] {}\n", get_timestamp(), level, target, msg)
}

/// Pick the effective level from the CLI flag, `RUST_LOG` and the config.
///
/// `RUST_LOG` is only honored when it is a bare level name such as `debug`;
/// per-module filters are ignored.
pub fn resolve_level(cli: Option<LogLevel>, rust_log: Option<&str>, config: LogLevel) -> LevelFilter {
    if let Some(level) = cli {
        return level.to_level_filter();
    }
    rust_log
        .and_then(|value| LevelFilter::from_str(value.trim()).ok())
        .unwrap_or_else(|| config.to_level_filter())
}

/// Install the global logger writing to stderr at `level`.
///
/// Runs before the config file is read so config loading itself can log;
/// [`configure_log_bridge`] applies the config's level and file afterwards.
pub fn init_log_bridge(level: LevelFilter) {
    let bridge = get_bridge();
    bridge.state.lock().level = level;
    // Already installed by an earlier call
    let _ = log::set_logger(bridge);
    log::set_max_level(level);
}

/// Change the level and destination of the installed logger.
///
/// With `log_file` set, lines are appended to it (parent directories are
/// created) instead of going to stderr.
pub fn configure_log_bridge(level: LevelFilter, log_file: Option<&Path>) -> std::io::Result<()> {
    let file = match log_file {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent)?;
            }
            Some(OpenOptions::new().create(true).append(true).open(path)?)
        }
        None => None,
    };

    let bridge = get_bridge();
    {
        let mut state = bridge.state.lock();
        state.level = level;
        state.file = file;
    }
    let _ = log::set_logger(bridge);
    log::set_max_level(level);
    Ok(())
}
