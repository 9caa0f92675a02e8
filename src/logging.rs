use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

use crate::error::AppResult;

pub const LOG_ENV: &str = "HYDROMATE_LOG";

/// Terminal logging to stderr (filter from `HYDROMATE_LOG`, default `warn`) plus a daily log
/// file under `<data_dir>/logs` at debug level. Keep the guard alive until exit.
pub fn init(data_dir: &Path) -> AppResult<WorkerGuard> {
    let log_dir = data_dir.join("logs");
    std::fs::create_dir_all(&log_dir)?;

    let file_appender = tracing_appender::rolling::daily(&log_dir, "hydromate.log");
    let (file_writer, guard) = tracing_appender::non_blocking(file_appender);

    let terminal_filter =
        EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_filter(terminal_filter),
        )
        .with(
            fmt::layer()
                .with_ansi(false)
                .with_writer(file_writer)
                .with_filter(EnvFilter::new("hydromate=debug")),
        )
        .try_init()
        .ok();

    Ok(guard)
}
