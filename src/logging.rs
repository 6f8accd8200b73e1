//! Logging initialisation for meal-wheel.
//!
//! When `MEAL_WHEEL_LOG=1`, logs are also written to `meal-wheel.log` in the
//! log directory. Otherwise only stderr output (filtered by `RUST_LOG`) is
//! enabled.
//!
//! Returns a guard that must be kept alive for the duration of the process
//! so that buffered log lines are flushed on exit.

use std::path::PathBuf;

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::paths::AppPaths;

pub const LOG_ENV: &str = "MEAL_WHEEL_LOG";
pub const LOG_FILE: &str = "meal-wheel.log";

pub struct LogGuard {
    _file_guard: Option<tracing_appender::non_blocking::WorkerGuard>,
}

/// Initialise the global tracing subscriber.
///
/// Call once from `main` and hold the returned `LogGuard` until exit.
pub fn init() -> LogGuard {
    let file_guard = if std::env::var(LOG_ENV).as_deref() == Ok("1") {
        let dir = AppPaths::resolve()
            .map(|p| p.logs)
            .unwrap_or_else(std::env::temp_dir);
        let _ = std::fs::create_dir_all(&dir);
        let file_appender = tracing_appender::rolling::never(&dir, LOG_FILE);
        let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

        let file_layer = fmt::layer().with_writer(non_blocking).with_ansi(false);

        tracing_subscriber::registry()
            .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
            .with(fmt::layer().with_writer(std::io::stderr))
            .with(file_layer)
            .init();

        tracing::info!(target: "logging", path = %log_path(dir).display(), "File logging enabled");
        Some(guard)
    } else {
        tracing_subscriber::registry()
            .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
            .with(fmt::layer().with_writer(std::io::stderr))
            .init();

        None
    };

    LogGuard {
        _file_guard: file_guard,
    }
}

fn log_path(dir: PathBuf) -> PathBuf {
    dir.join(LOG_FILE)
}
