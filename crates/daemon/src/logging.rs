//! Tracing setup: a non-blocking file appender under the daemon's own
//! log path, filtered by `RUST_LOG` (defaulting to `info`). Mirrors
//! the teacher daemon's `setup_logging`.

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::config::Config;
use crate::lifecycle::LifecycleError;

pub fn init(config: &Config) -> Result<tracing_appender::non_blocking::WorkerGuard, LifecycleError> {
    if let Some(parent) = config.log_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let file_appender = tracing_appender::rolling::never(
        config.log_path.parent().expect("log path always has a parent"),
        config.log_path.file_name().expect("log path always has a file name"),
    );
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(non_blocking))
        .init();

    Ok(guard)
}
