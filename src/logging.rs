//! Logging System
//!
//! Structured logging via the `tracing` crate with configurable level,
//! format, and destination. Environment variables take precedence over
//! the supplied config: `SHELVE_LOG`, `SHELVE_LOG_FORMAT`,
//! `SHELVE_LOG_OUTPUT`, `SHELVE_LOG_FILE`.

use crate::error::EngineError;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing_subscriber::fmt::time::ChronoUtc;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Registry};

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level: trace, debug, info, warn, error, off
    pub level: String,

    /// Output format: json, text
    pub format: String,

    /// Output destination: stdout, stderr, file
    pub output: String,

    /// Log file path when output is "file"; None means the platform
    /// default under the state directory.
    pub file: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "text".to_string(),
            output: "stderr".to_string(),
            file: None,
        }
    }
}

/// Resolve the log file path: explicit config, `SHELVE_LOG_FILE`, or the
/// platform state directory default.
pub fn resolve_log_file_path(config_file: Option<PathBuf>) -> Result<PathBuf, EngineError> {
    if let Ok(env_path) = std::env::var("SHELVE_LOG_FILE") {
        if !env_path.is_empty() {
            return Ok(PathBuf::from(env_path));
        }
    }
    if let Some(p) = config_file {
        if !p.as_os_str().is_empty() {
            return Ok(p);
        }
    }
    let project_dirs = directories::ProjectDirs::from("", "shelve", "shelve").ok_or_else(|| {
        EngineError::Config("could not determine platform state directory for log file".to_string())
    })?;
    let state_dir = project_dirs
        .state_dir()
        .unwrap_or_else(|| project_dirs.data_dir())
        .to_path_buf();
    Ok(state_dir.join("shelve.log"))
}

/// Initialize the logging system.
pub fn init_logging(config: &LoggingConfig) -> Result<(), EngineError> {
    let filter = build_env_filter(config);
    let format = determine("SHELVE_LOG_FORMAT", &config.format, &["text", "json"])?;
    let output = determine("SHELVE_LOG_OUTPUT", &config.output, &["stdout", "stderr", "file"])?;

    let base = Registry::default().with(filter);
    match (format.as_str(), output.as_str()) {
        ("json", "stdout") => base
            .with(
                fmt::layer()
                    .json()
                    .with_target(true)
                    .with_timer(ChronoUtc::rfc_3339())
                    .with_writer(std::io::stdout),
            )
            .init(),
        ("json", "stderr") => base
            .with(
                fmt::layer()
                    .json()
                    .with_target(true)
                    .with_timer(ChronoUtc::rfc_3339())
                    .with_writer(std::io::stderr),
            )
            .init(),
        ("json", _) => base
            .with(
                fmt::layer()
                    .json()
                    .with_target(true)
                    .with_timer(ChronoUtc::rfc_3339())
                    .with_writer(open_log_file(config)?),
            )
            .init(),
        (_, "stdout") => base
            .with(
                fmt::layer()
                    .with_target(true)
                    .with_timer(ChronoUtc::rfc_3339())
                    .with_writer(std::io::stdout),
            )
            .init(),
        (_, "stderr") => base
            .with(
                fmt::layer()
                    .with_target(true)
                    .with_timer(ChronoUtc::rfc_3339())
                    .with_writer(std::io::stderr),
            )
            .init(),
        (_, _) => base
            .with(
                fmt::layer()
                    .with_target(true)
                    .with_timer(ChronoUtc::rfc_3339())
                    .with_ansi(false)
                    .with_writer(open_log_file(config)?),
            )
            .init(),
    }
    Ok(())
}

fn open_log_file(config: &LoggingConfig) -> Result<std::fs::File, EngineError> {
    let log_file = resolve_log_file_path(config.file.clone())?;
    if let Some(parent) = log_file.parent() {
        std::fs::create_dir_all(parent).map_err(|e| {
            EngineError::Config(format!("failed to create log directory: {}", e))
        })?;
    }
    std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_file)
        .map_err(|e| EngineError::Config(format!("failed to open log file {:?}: {}", log_file, e)))
}

/// `SHELVE_LOG` wins; otherwise the configured level becomes the default
/// directive.
fn build_env_filter(config: &LoggingConfig) -> EnvFilter {
    if let Ok(filter) = EnvFilter::try_from_env("SHELVE_LOG") {
        return filter;
    }
    EnvFilter::new(config.level.as_str())
}

fn determine(env_var: &str, configured: &str, allowed: &[&str]) -> Result<String, EngineError> {
    if let Ok(value) = std::env::var(env_var) {
        if allowed.contains(&value.as_str()) {
            return Ok(value);
        }
    }
    if allowed.contains(&configured) {
        return Ok(configured.to_string());
    }
    Err(EngineError::Config(format!(
        "invalid logging option: {} (expected one of {:?})",
        configured, allowed
    )))
}
