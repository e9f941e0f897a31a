//! Filenames and directory layout for the persisted queue/log
//! (spec.md §6). Resolving `config_dir`/`log_dir` themselves (honoring
//! `$HOME` or an override) is `jobqd-daemon`'s job; this module only
//! knows what lives under them once resolved.

use std::path::{Path, PathBuf};

/// The set of paths the store reads and writes, rooted at a config
/// directory and a log directory (usually `<config_dir>/log`).
#[derive(Debug, Clone)]
pub struct StorePaths {
    pub queue_snapshot: PathBuf,
    pub log_snapshot: PathBuf,
    pub current_log: PathBuf,
    log_dir: PathBuf,
}

impl StorePaths {
    pub fn new(config_dir: impl AsRef<Path>) -> Self {
        let config_dir = config_dir.as_ref();
        let log_dir = config_dir.join("log");
        Self {
            queue_snapshot: config_dir.join("queue"),
            log_snapshot: config_dir.join("queue.picklelog"),
            current_log: log_dir.join("queue.log"),
            log_dir,
        }
    }

    /// The path a rotation would write to, named `queue-<YYYYMMDD-HHMM>.log`.
    pub fn rotated_log(&self, timestamp: &str) -> PathBuf {
        self.log_dir.join(format!("queue-{timestamp}.log"))
    }

    pub fn log_dir(&self) -> &Path {
        &self.log_dir
    }
}
