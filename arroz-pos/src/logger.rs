//! Logging Infrastructure
//!
//! Console output plus an optional daily rolling file (`pos.YYYY-MM-DD`).

use crate::config::LogConfig;
use std::fs;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{EnvFilter, Layer, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// File name prefix of the rolling log
const LOG_FILE_PREFIX: &str = "pos";

/// Initialize the logging system
///
/// `RUST_LOG` wins over `config.level`. The returned guard flushes the file
/// writer and must be held for the life of the process.
///
/// # Examples
/// ```no_run
/// use arroz_pos::config::LogConfig;
///
/// let _guard = arroz_pos::logger::init_logger(&LogConfig::default())?;
/// # Ok::<(), anyhow::Error>(())
/// ```
pub fn init_logger(config: &LogConfig) -> anyhow::Result<Option<WorkerGuard>> {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level));

    let console_layer = fmt::layer()
        .with_target(true)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false);

    let registry = tracing_subscriber::registry().with(env_filter);

    match &config.dir {
        Some(dir) => {
            fs::create_dir_all(dir)?;
            let appender = RollingFileAppender::new(Rotation::DAILY, dir, LOG_FILE_PREFIX);
            let (writer, guard) = tracing_appender::non_blocking(appender);

            let file_layer = fmt::layer()
                .json()
                .with_target(true)
                .with_current_span(true)
                .with_writer(writer)
                .with_filter(tracing_subscriber::filter::filter_fn(|meta| {
                    !meta.target().starts_with("redb")
                }));

            registry.with(console_layer).with(file_layer).try_init()?;
            tracing::info!(dir = %dir.display(), "Logging to file");
            Ok(Some(guard))
        }
        None => {
            registry.with(console_layer).try_init()?;
            Ok(None)
        }
    }
}
