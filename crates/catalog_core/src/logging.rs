//! Catalog logging bootstrap.
//!
//! # Responsibility
//! - Initialize file-based rolling logs exactly once per process.
//! - Resolve logging configuration from explicit values or the environment.
//!
//! # Invariants
//! - Initialization is idempotent for an identical configuration.
//! - Re-initialization with a different level or directory is rejected.
//! - Initialization never panics.

use flexi_logger::{Cleanup, Criterion, FileSpec, Logger, LoggerHandle, Naming, WriteMode};
use log::{error, info};
use once_cell::sync::OnceCell;
use std::path::{Path, PathBuf};

pub const LOG_LEVEL_ENV: &str = "CATALOG_LOG_LEVEL";
pub const LOG_DIR_ENV: &str = "CATALOG_LOG_DIR";

const LOG_FILE_BASENAME: &str = "catalog";
const MAX_LOG_FILE_SIZE_BYTES: u64 = 10 * 1024 * 1024;
const MAX_LOG_FILES: usize = 5;
const MAX_PANIC_PAYLOAD_CHARS: usize = 160;

static LOGGING_STATE: OnceCell<LoggingState> = OnceCell::new();
static PANIC_HOOK_INSTALLED: OnceCell<()> = OnceCell::new();

struct LoggingState {
    config: LoggingConfig,
    _logger: LoggerHandle,
}

/// Validated logging configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggingConfig {
    pub level: &'static str,
    pub log_dir: PathBuf,
}

impl LoggingConfig {
    /// Normalizes `level` (`trace|debug|info|warn|error`) and requires an
    /// absolute `log_dir`.
    pub fn new(level: &str, log_dir: &str) -> Result<Self, String> {
        Ok(Self {
            level: normalize_level(level)?,
            log_dir: normalize_log_dir(log_dir)?,
        })
    }

    /// Reads `CATALOG_LOG_DIR` and optional `CATALOG_LOG_LEVEL`.
    ///
    /// Returns `Ok(None)` when no log directory is configured.
    pub fn from_env() -> Result<Option<Self>, String> {
        let Ok(log_dir) = std::env::var(LOG_DIR_ENV) else {
            return Ok(None);
        };
        let level = std::env::var(LOG_LEVEL_ENV).unwrap_or_else(|_| default_log_level().to_string());
        Self::new(&level, &log_dir).map(Some)
    }
}

/// Initializes catalog logging with level and directory.
///
/// # Errors
/// - Unsupported `level`, empty or relative `log_dir`.
/// - Log directory creation or logger backend failure.
/// - A conflicting configuration is already active.
pub fn init_logging(level: &str, log_dir: &str) -> Result<(), String> {
    init_logging_with(LoggingConfig::new(level, log_dir)?)
}

/// Initializes catalog logging from an already validated configuration.
pub fn init_logging_with(config: LoggingConfig) -> Result<(), String> {
    let state = LOGGING_STATE.get_or_try_init(|| start_logger(config.clone()))?;

    if state.config.log_dir != config.log_dir {
        return Err(format!(
            "logging already initialized at `{}`; refusing to switch to `{}`",
            state.config.log_dir.display(),
            config.log_dir.display()
        ));
    }
    if state.config.level != config.level {
        return Err(format!(
            "logging already initialized with level `{}`; refusing to switch to `{}`",
            state.config.level, config.level
        ));
    }
    Ok(())
}

/// Returns `(level, log_dir)` of the active logger, if any.
pub fn logging_status() -> Option<(&'static str, PathBuf)> {
    LOGGING_STATE
        .get()
        .map(|state| (state.config.level, state.config.log_dir.clone()))
}

/// `debug` for debug builds, `info` for release builds.
pub fn default_log_level() -> &'static str {
    if cfg!(debug_assertions) {
        "debug"
    } else {
        "info"
    }
}

fn start_logger(config: LoggingConfig) -> Result<LoggingState, String> {
    std::fs::create_dir_all(&config.log_dir).map_err(|err| {
        format!(
            "failed to create log directory `{}`: {err}",
            config.log_dir.display()
        )
    })?;

    let logger = Logger::try_with_str(config.level)
        .map_err(|err| format!("invalid log level `{}`: {err}", config.level))?
        .log_to_file(
            FileSpec::default()
                .directory(config.log_dir.as_path())
                .basename(LOG_FILE_BASENAME),
        )
        .rotate(
            Criterion::Size(MAX_LOG_FILE_SIZE_BYTES),
            Naming::Numbers,
            Cleanup::KeepLogFiles(MAX_LOG_FILES),
        )
        .write_mode(WriteMode::BufferAndFlush)
        .append()
        .format_for_files(flexi_logger::detailed_format)
        .start()
        .map_err(|err| format!("failed to start logger: {err}"))?;

    install_panic_hook_once();

    info!(
        "event=catalog_init module=core status=ok platform={} version={} level={} log_dir={}",
        std::env::consts::OS,
        env!("CARGO_PKG_VERSION"),
        config.level,
        config.log_dir.display()
    );

    Ok(LoggingState {
        config,
        _logger: logger,
    })
}

fn normalize_level(level: &str) -> Result<&'static str, String> {
    match level.trim().to_ascii_lowercase().as_str() {
        "trace" => Ok("trace"),
        "debug" => Ok("debug"),
        "info" => Ok("info"),
        "warn" | "warning" => Ok("warn"),
        "error" => Ok("error"),
        other => Err(format!(
            "unsupported log level `{other}`; expected trace|debug|info|warn|error"
        )),
    }
}

fn normalize_log_dir(log_dir: &str) -> Result<PathBuf, String> {
    let trimmed = log_dir.trim();
    if trimmed.is_empty() {
        return Err("log_dir cannot be empty".to_string());
    }
    let path = Path::new(trimmed);
    if !path.is_absolute() {
        return Err(format!("log_dir must be an absolute path, got `{trimmed}`"));
    }
    Ok(path.to_path_buf())
}

fn install_panic_hook_once() {
    if PANIC_HOOK_INSTALLED.set(()).is_err() {
        return;
    }

    let previous_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let location = panic_info
            .location()
            .map(|loc| format!("{}:{}", loc.file(), loc.line()))
            .unwrap_or_else(|| "unknown".to_string());
        let payload = if let Some(message) = panic_info.payload().downcast_ref::<&str>() {
            (*message).to_string()
        } else if let Some(message) = panic_info.payload().downcast_ref::<String>() {
            message.clone()
        } else {
            "non-string panic payload".to_string()
        };
        error!(
            "event=panic_captured module=core status=error location={} payload={}",
            location,
            sanitize_message(&payload, MAX_PANIC_PAYLOAD_CHARS)
        );
        previous_hook(panic_info);
    }));
}

fn sanitize_message(value: &str, max_chars: usize) -> String {
    let normalized = value.replace(['\n', '\r'], " ");
    let mut truncated = normalized.chars().take(max_chars).collect::<String>();
    if normalized.chars().count() > max_chars {
        truncated.push_str("...");
    }
    truncated
}

#[cfg(test)]
mod tests {
    use super::{init_logging, logging_status, sanitize_message, LoggingConfig};

    #[test]
    fn config_normalizes_level_and_rejects_relative_dir() {
        let config = LoggingConfig::new(" WARNING ", "/tmp/catalog-logs").unwrap();
        assert_eq!(config.level, "warn");

        let err = LoggingConfig::new("info", "logs/dev").unwrap_err();
        assert!(err.contains("absolute"));

        let err = LoggingConfig::new("verbose", "/tmp").unwrap_err();
        assert!(err.contains("unsupported log level"));
    }

    #[test]
    fn sanitize_message_removes_newlines_and_truncates() {
        let sanitized = sanitize_message("line1\nline2\rline3", 8);
        assert!(!sanitized.contains('\n'));
        assert!(sanitized.ends_with("..."));
    }

    #[test]
    fn init_logging_is_idempotent_and_rejects_conflicts() {
        let dir = tempfile::tempdir().unwrap();
        let other = tempfile::tempdir().unwrap();
        let dir_str = dir.path().to_str().unwrap().to_string();
        let other_str = other.path().to_str().unwrap().to_string();

        init_logging("info", &dir_str).unwrap();
        init_logging("info", &dir_str).unwrap();

        let level_err = init_logging("debug", &dir_str).unwrap_err();
        assert!(level_err.contains("refusing to switch"));
        let dir_err = init_logging("info", &other_str).unwrap_err();
        assert!(dir_err.contains("refusing to switch"));

        let (level, active_dir) = logging_status().unwrap();
        assert_eq!(level, "info");
        assert_eq!(active_dir, dir.path());
    }
}
