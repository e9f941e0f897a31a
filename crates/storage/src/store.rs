//! The persistence store's public surface (spec.md §4.A): the four
//! operations the daemon calls, each wrapping the snapshot and
//! human-log primitives behind one best-effort, non-crashing API.

use chrono::Local;
use jobqd_core::{Log, Queue};
use tracing::warn;

use crate::paths::StorePaths;
use crate::{human_log, snapshot};

pub struct Store {
    paths: StorePaths,
}

impl Store {
    pub fn new(paths: StorePaths) -> Self {
        Self { paths }
    }

    pub fn paths(&self) -> &StorePaths {
        &self.paths
    }

    pub fn load_queue(&self) -> Queue {
        snapshot::load_queue_snapshot(&self.paths.queue_snapshot)
    }

    pub fn save_queue(&self, queue: &Queue) {
        snapshot::save_queue_snapshot(&self.paths.queue_snapshot, queue)
    }

    pub fn load_log(&self) -> Log {
        snapshot::load_log_snapshot(&self.paths.log_snapshot)
    }

    /// `save_log(rotate)`: persist the log snapshot and rewrite the
    /// human-readable file. When `rotate` is true, the human-readable
    /// file is written under the timestamped name instead, and the
    /// current `queue.log` is unlinked first if present (spec.md §4.A).
    pub fn save_log(&self, log: &Log, rotate: bool) {
        snapshot::save_log_snapshot(&self.paths.log_snapshot, log);

        let target = if rotate {
            if self.paths.current_log.exists() {
                if let Err(e) = std::fs::remove_file(&self.paths.current_log) {
                    warn!(error = %e, path = %self.paths.current_log.display(), "failed to unlink current log before rotation");
                }
            }
            self.paths.rotated_log(&Local::now().format("%Y%m%d-%H%M").to_string())
        } else {
            self.paths.current_log.clone()
        };

        if let Err(e) = human_log::write_human_log(&target, log) {
            warn!(error = %e, path = %target.display(), "failed to write human-readable log");
        }
    }
}

#[cfg(test)]
#[path = "store_tests.rs"]
mod tests;
