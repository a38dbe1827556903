//! Log output for the converter: a daily-rotated file under the configured
//! log directory, mirrored to stderr unless the CLI runs quiet.
//!
//! stdout is reserved for converted JSON, so nothing here ever writes to it.

use crate::config::ConfigManager;
use crate::models::ToolSettings;
use anyhow::{Context, Result};
use camino::{Utf8Path, Utf8PathBuf};
use std::fs;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Log files are named `gnconfig.<date>`.
pub const LOG_FILE_PREFIX: &str = "gnconfig";

/// Full `EnvFilter` directive override, e.g. `GNCONFIG_LOG=gamenative_config=trace`.
pub const LOG_FILTER_ENV: &str = "GNCONFIG_LOG";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogOptions {
    pub log_dir: Utf8PathBuf,
    pub debug: bool,
    /// Mirror log lines to stderr
    pub console: bool,
}

impl LogOptions {
    /// Options for the loaded settings; a relative `log_dir` lives under the
    /// config directory.
    pub fn from_settings(settings: &ToolSettings, config: &ConfigManager, console: bool) -> Self {
        Self {
            log_dir: config.resolve(&settings.log_dir),
            debug: settings.debug_mode,
            console,
        }
    }
}

fn ensure_log_dir(log_dir: &Utf8Path) -> Result<()> {
    if !log_dir.exists() {
        fs::create_dir_all(log_dir)
            .with_context(|| format!("Failed to create log directory: {}", log_dir))?;
    }
    Ok(())
}

/// `GNCONFIG_LOG` when set and valid, else `debug` or `info`.
fn build_filter(debug: bool) -> EnvFilter {
    EnvFilter::try_from_env(LOG_FILTER_ENV)
        .unwrap_or_else(|_| EnvFilter::new(if debug { "debug" } else { "info" }))
}

/// Install the global subscriber.
///
/// The returned guard flushes the file writer on drop; hold it until exit.
///
/// # Errors
///
/// Fails if the log directory cannot be created or a global subscriber is
/// already installed.
pub fn init(options: &LogOptions) -> Result<WorkerGuard> {
    ensure_log_dir(&options.log_dir)?;

    let (file_writer, guard) =
        tracing_appender::non_blocking(rolling::daily(&options.log_dir, LOG_FILE_PREFIX));

    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(file_writer)
        .with_ansi(false)
        .with_target(true)
        .with_thread_ids(true)
        .with_file(true)
        .with_line_number(true);

    let console_layer = options.console.then(|| {
        tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(false)
            .without_time()
    });

    tracing_subscriber::registry()
        .with(build_filter(options.debug))
        .with(file_layer)
        .with(console_layer)
        .try_init()
        .context("Failed to install tracing subscriber")?;

    tracing::debug!(
        "Logging to {}/{}.* (console={})",
        options.log_dir,
        LOG_FILE_PREFIX,
        options.console
    );

    Ok(guard)
}
