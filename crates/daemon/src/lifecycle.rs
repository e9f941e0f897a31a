//! Startup and shutdown: acquiring the single-instance lock, loading
//! persisted state, applying the resume policy, and binding the
//! socket. Grounded on the teacher daemon's `lifecycle::startup`
//! shape (lock first, then directories, then bind last).

use std::fs::File;
use std::io::Write as _;

use fs2::FileExt;
use jobqd_core::DaemonState;
use jobqd_storage::Store;
use thiserror::Error;
use tokio::net::UnixListener;
use tracing::info;

use crate::config::Config;

#[derive(Debug, Error)]
pub enum LifecycleError {
    #[error("failed to acquire lock: another jobqd is already running against this state dir")]
    LockFailed(#[source] std::io::Error),

    #[error("failed to bind socket at {0}: {1}")]
    BindFailed(std::path::PathBuf, std::io::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Everything the event loop needs to run, produced once at startup.
pub struct Daemon {
    pub config: Config,
    pub state: DaemonState,
    pub store: Store,
    #[allow(dead_code)]
    pub(crate) lock_file: File,
}

pub struct StartupResult {
    pub daemon: Daemon,
    pub listener: UnixListener,
}

/// Acquire the lock, load the queue/log, apply the resume policy
/// (spec.md §9, supplemented from `original_source`), and bind the
/// socket. Nothing here mutates `state_dir` contents besides the lock
/// file, the snapshots, and the human-readable log.
pub async fn startup(config: Config) -> Result<StartupResult, LifecycleError> {
    std::fs::create_dir_all(&config.state_dir)?;

    let mut lock_file = std::fs::OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(false)
        .open(&config.lock_path)?;
    lock_file
        .try_lock_exclusive()
        .map_err(LifecycleError::LockFailed)?;
    lock_file.set_len(0)?;
    writeln!(lock_file, "{}", std::process::id())?;

    let store = Store::new(config.store_paths.clone());
    let queue = store.load_queue();
    let queue_was_empty = queue.is_empty();
    let log = store.load_log();

    let state = DaemonState::resume(queue, log);

    // Resume policy: a non-empty queue means unfinished work survived a
    // crash; the log is kept as-is. An empty queue means the previous
    // generation finished cleanly, so this generation starts with a
    // freshly rotated log, mirroring what a clean `reset` would do.
    if queue_was_empty {
        store.save_log(&state.log, true);
    }

    if config.socket_path.exists() {
        std::fs::remove_file(&config.socket_path)?;
    }
    let listener = UnixListener::bind(&config.socket_path)
        .map_err(|e| LifecycleError::BindFailed(config.socket_path.clone(), e))?;

    info!(
        paused = state.paused,
        queued = state.queue.len(),
        "daemon resumed"
    );

    Ok(StartupResult {
        daemon: Daemon {
            config,
            state,
            store,
            lock_file,
        },
        listener,
    })
}

impl Daemon {
    /// Unlink the socket and pid file. The lock is released when
    /// `lock_file` drops at the end of `main`.
    pub fn shutdown(&self) {
        if self.config.socket_path.exists() {
            let _ = std::fs::remove_file(&self.config.socket_path);
        }
        if self.config.lock_path.exists() {
            let _ = std::fs::remove_file(&self.config.lock_path);
        }
        info!("daemon shutdown complete");
    }
}

#[cfg(test)]
#[path = "lifecycle_tests.rs"]
mod tests;
