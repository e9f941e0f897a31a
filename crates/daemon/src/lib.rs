#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]
//! jobqd-daemon: configuration/path resolution, startup/shutdown, the
//! request dispatcher, and the single-threaded event loop that ties
//! `jobqd-core`, `jobqd-wire`, `jobqd-storage`, and `jobqd-supervisor`
//! together (spec.md components D and E).

pub mod config;
pub mod dispatch;
pub mod env;
pub mod lifecycle;
pub mod logging;
#[cfg(test)]
pub mod test_support;

pub use config::{Config, ConfigError};
pub use lifecycle::{Daemon, LifecycleError, StartupResult};

use jobqd_supervisor::Handle;

/// Everything the event loop mutates each iteration: the daemon's
/// durable-ish state (queue/log/paused/ids) plus the live child, if
/// any.
pub struct Runtime {
    pub daemon: Daemon,
    pub child: Option<Handle>,
}

impl Runtime {
    pub fn new(daemon: Daemon) -> Self {
        Self { daemon, child: None }
    }
}

/// Hand a force-removed child off to a detached task that waits on it
/// so the OS process is reaped, without logging its output — the job
/// record that would have owned that output no longer exists (the
/// `STOP`/`KILL {remove: true}` decoration already deleted it).
pub fn spawn_orphan_reap(mut child: Handle) {
    tokio::spawn(async move {
        let _ = child.wait().await;
    });
}
