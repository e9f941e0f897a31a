//! jobqd-storage: the persistence store (spec.md §4.A). Two durable
//! snapshots (`queue`, `queue.picklelog`) plus a human-readable log
//! directory live under a config directory resolved by the caller —
//! this crate only knows paths, never `$HOME` or XDG rules.

pub mod human_log;
pub mod paths;
pub mod snapshot;
pub mod store;

pub use paths::StorePaths;
pub use snapshot::SnapshotError;
pub use store::Store;
