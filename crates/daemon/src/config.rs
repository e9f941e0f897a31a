//! Daemon configuration: the resolved set of paths everything else in
//! this crate reads and writes. Nothing here performs I/O beyond
//! reading environment variables and the home directory.

use std::path::PathBuf;

use jobqd_storage::StorePaths;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not determine the user's home directory")]
    NoHomeDir,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub state_dir: PathBuf,
    pub socket_path: PathBuf,
    pub lock_path: PathBuf,
    pub log_path: PathBuf,
    pub store_paths: StorePaths,
}

impl Config {
    /// Load configuration for the single daemon instance this host
    /// runs. One daemon serves one user; running two against the same
    /// state directory is unsupported (spec.md §5).
    pub fn load() -> Result<Self, ConfigError> {
        let state_dir = crate::env::state_dir()?;
        Ok(Self {
            socket_path: state_dir.join("daemon.sock"),
            lock_path: state_dir.join("daemon.pid"),
            log_path: state_dir.join("daemon.log"),
            store_paths: StorePaths::new(&state_dir),
            state_dir,
        })
    }
}
