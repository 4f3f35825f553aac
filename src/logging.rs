use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling;
use tracing_subscriber::EnvFilter;

const LOG_FILE: &str = "explorer.log";

/// Installs the global subscriber: daily rolling file under `dir`, level
/// from `RUST_LOG` when set, otherwise `default_level`.
///
/// Keep the returned guard alive for the whole run or buffered lines are lost.
pub fn init_logging(dir: &Path, default_level: &str) -> WorkerGuard {
    let file_appender = rolling::daily(dir, LOG_FILE);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(non_blocking)
        .with_ansi(false) // no color codes in file
        .init();

    guard
}
