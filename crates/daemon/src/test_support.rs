//! Test-only helpers for building a [`crate::Daemon`]/[`crate::Runtime`]
//! without going through [`crate::lifecycle::startup`]'s socket bind and
//! process-wide lock, so dispatcher and lifecycle tests can run
//! concurrently against independent temp directories.

#![cfg(test)]

use std::fs::File;
use std::path::Path;

use jobqd_core::DaemonState;
use jobqd_storage::{Store, StorePaths};

use crate::config::Config;
use crate::lifecycle::Daemon;
use crate::Runtime;

pub fn config_at(dir: &Path) -> Config {
    Config {
        socket_path: dir.join("daemon.sock"),
        lock_path: dir.join("daemon.pid"),
        log_path: dir.join("daemon.log"),
        store_paths: StorePaths::new(dir),
        state_dir: dir.to_path_buf(),
    }
}

pub fn daemon_at(dir: &Path, state: DaemonState) -> Daemon {
    let config = config_at(dir);
    let store = Store::new(config.store_paths.clone());
    let lock_file = File::create(dir.join("test.lock")).expect("create test lock file");
    Daemon {
        config,
        state,
        store,
        lock_file,
    }
}

pub fn runtime_at(dir: &Path, state: DaemonState) -> Runtime {
    Runtime::new(daemon_at(dir, state))
}
