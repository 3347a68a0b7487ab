//! Logging configuration using the tracing ecosystem.
//!
//! By default logs go to a daily-rotated file so stdout stays clean for
//! command output. `--verbose` sends them to stderr instead.

use std::path::PathBuf;

use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{filter::EnvFilter, fmt, prelude::*};

/// Default log level if RUST_LOG is not set.
const DEFAULT_LOG_FILTER: &str = "jiradmin=info,warn";

/// Log level used with `--verbose` if RUST_LOG is not set.
const VERBOSE_LOG_FILTER: &str = "jiradmin=debug,warn";

/// Initialize the logging system.
///
/// Log levels are configured via the `RUST_LOG` environment variable, e.g.
/// `RUST_LOG=jiradmin=debug`.
///
/// # Log Directory
///
/// File logs are stored in the platform-specific local data directory:
/// - Linux: `~/.local/share/jiradmin/logs/`
/// - macOS: `~/Library/Application Support/jiradmin/logs/`
/// - Windows: `C:\Users\<User>\AppData\Local\jiradmin\logs\`
///
/// # Errors
///
/// Returns an error if the log directory cannot be created or the tracing
/// subscriber cannot be set.
pub fn init(verbose: bool) -> anyhow::Result<()> {
    let default_filter = if verbose {
        VERBOSE_LOG_FILTER
    } else {
        DEFAULT_LOG_FILTER
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    if verbose {
        let subscriber = tracing_subscriber::registry()
            .with(fmt::layer().with_writer(std::io::stderr).with_target(true))
            .with(filter);
        tracing::subscriber::set_global_default(subscriber)?;
    } else {
        let log_dir = get_log_directory()?;
        std::fs::create_dir_all(&log_dir)?;

        let file_appender = RollingFileAppender::new(Rotation::DAILY, &log_dir, "jiradmin.log");
        let subscriber = tracing_subscriber::registry()
            .with(
                fmt::layer()
                    .with_writer(file_appender)
                    .with_ansi(false)
                    .with_target(true)
                    .with_file(true)
                    .with_line_number(true),
            )
            .with(filter);
        tracing::subscriber::set_global_default(subscriber)?;

        tracing::debug!(log_dir = %log_dir.display(), "Log directory");
    }

    tracing::info!(version = env!("CARGO_PKG_VERSION"), "jiradmin starting");
    Ok(())
}

/// Get the log directory path.
fn get_log_directory() -> anyhow::Result<PathBuf> {
    let base_dir = dirs::data_local_dir()
        .ok_or_else(|| anyhow::anyhow!("Could not determine local data directory"))?;

    Ok(base_dir.join("jiradmin").join("logs"))
}
