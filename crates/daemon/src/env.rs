//! Centralized environment variable access for the daemon binary.

use std::path::PathBuf;

use crate::config::ConfigError;

/// Resolve the daemon's state directory: `JOBQD_STATE_DIR` if set, else
/// `~/.jobqd`. Mirrors the override pattern the teacher daemon uses for
/// `OJ_STATE_DIR`, but the un-overridden default matches spec.md §6's
/// `~/.pueue/`-equivalent convention for this system.
pub fn state_dir() -> Result<PathBuf, ConfigError> {
    if let Ok(dir) = std::env::var("JOBQD_STATE_DIR") {
        return Ok(PathBuf::from(dir));
    }
    let home = dirs::home_dir().ok_or(ConfigError::NoHomeDir)?;
    Ok(home.join(".jobqd"))
}
