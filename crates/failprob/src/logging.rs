use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Log file name inside the log directory
pub const LOG_FILE: &str = "failprob.log";

/// Filter used when `RUST_LOG` is not set
pub fn default_filter(level: &str) -> String {
    format!("failprob={level},failprob_core=warn")
}

/// Initialize logging to stderr, or to `{log_dir}/failprob.log` when a directory is given.
///
/// The log level can be controlled via the `level` parameter or the `RUST_LOG` environment variable.
/// The returned guard flushes the file writer on drop and must be held until exit.
pub fn init_logging(level: &str, log_dir: Option<&Path>) -> color_eyre::Result<Option<WorkerGuard>> {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter(level)));

    let registry = tracing_subscriber::registry().with(env_filter);

    let guard = match log_dir {
        Some(dir) => {
            std::fs::create_dir_all(dir)?;
            let appender = tracing_appender::rolling::never(dir, LOG_FILE);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            registry
                .with(
                    fmt::layer()
                        .with_writer(writer)
                        .with_ansi(false)
                        .with_target(true)
                        .with_thread_ids(false),
                )
                .try_init()?;
            tracing::info!(
                "failprob logging initialized (log_path={})",
                dir.join(LOG_FILE).display()
            );
            Some(guard)
        }
        None => {
            registry
                .with(
                    fmt::layer()
                        .with_writer(std::io::stderr)
                        .with_target(true),
                )
                .try_init()?;
            None
        }
    };

    Ok(guard)
}
