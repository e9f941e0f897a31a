//! Binary(-ish) snapshots of the queue and the log.
//!
//! The original daemon pickles its in-memory maps directly; spec.md
//! §9 calls that out as a portability hazard and asks for an explicit,
//! versioned schema instead, while preserving the behavioral contract:
//! load returns empty state on any decode failure, after deleting the
//! offending file.

use std::fs::{self, File};
use std::io::{BufReader, BufWriter};
use std::path::Path;

use jobqd_core::{Log, Queue};
use thiserror::Error;
use tracing::warn;

#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Load the queue snapshot, or an empty queue if it is missing or
/// corrupt. A corrupt file is deleted before returning (spec.md §4.A,
/// §7.4) — never renamed aside, since there is nothing useful to keep.
pub fn load_queue_snapshot(path: &Path) -> Queue {
    load_or_empty(path, "queue")
}

/// Load the log snapshot, same empty-on-missing-or-corrupt policy.
pub fn load_log_snapshot(path: &Path) -> Log {
    load_or_empty(path, "log")
}

/// Overwrite the queue snapshot atomically (write to a temp file, then
/// rename). I/O failures are logged and otherwise swallowed — the
/// in-memory queue remains authoritative until the next successful
/// save (spec.md §7.3).
pub fn save_queue_snapshot(path: &Path, queue: &Queue) {
    if let Err(e) = save_atomic(path, queue) {
        warn!(error = %e, path = %path.display(), "failed to persist queue snapshot");
    }
}

/// Overwrite the log snapshot, same best-effort policy as
/// [`save_queue_snapshot`].
pub fn save_log_snapshot(path: &Path, log: &Log) {
    if let Err(e) = save_atomic(path, log) {
        warn!(error = %e, path = %path.display(), "failed to persist log snapshot");
    }
}

fn load_or_empty<T: Default + serde::de::DeserializeOwned>(path: &Path, kind: &str) -> T {
    if !path.exists() {
        return T::default();
    }
    let file = match File::open(path) {
        Ok(f) => f,
        Err(e) => {
            warn!(error = %e, path = %path.display(), "failed to open {} snapshot", kind);
            return T::default();
        }
    };
    match serde_json::from_reader(BufReader::new(file)) {
        Ok(value) => value,
        Err(e) => {
            warn!(
                error = %e,
                path = %path.display(),
                "corrupt {} snapshot, deleting and starting fresh",
                kind,
            );
            if let Err(remove_err) = fs::remove_file(path) {
                warn!(error = %remove_err, path = %path.display(), "failed to delete corrupt snapshot");
            }
            T::default()
        }
    }
}

fn save_atomic<T: serde::Serialize>(path: &Path, value: &T) -> Result<(), SnapshotError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let tmp_path = path.with_extension("tmp");
    {
        let file = File::create(&tmp_path)?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer(&mut writer, value)?;
        let file = writer.into_inner().map_err(|e| e.into_error())?;
        file.sync_all()?;
    }
    fs::rename(&tmp_path, path)?;
    Ok(())
}

#[cfg(test)]
#[path = "snapshot_tests.rs"]
mod tests;
