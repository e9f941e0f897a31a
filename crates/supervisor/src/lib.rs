//! jobqd-supervisor: spawn, poll, terminate, kill, and collect a job's
//! child process (spec.md §4.B). The event loop is the only caller;
//! this crate has no notion of jobs, queues, or the daemon's own state,
//! only of a `Handle` wrapping one [`tokio::process::Child`].

use std::process::Stdio;

use thiserror::Error;
use tokio::io::AsyncReadExt;
use tokio::process::{Child, Command};
use tracing::warn;

#[derive(Debug, Error)]
pub enum SupervisorError {
    #[error("failed to spawn child: {0}")]
    Spawn(#[source] std::io::Error),

    #[error("failed to poll child: {0}")]
    Poll(#[source] std::io::Error),

    #[error("failed to signal child: {0}")]
    Signal(#[source] nix::Error),
}

/// How a child's exit was observed, independent of any job bookkeeping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitStatus {
    Exited(i32),
    Signaled(i32),
}

/// A live or recently-exited child, plus the pipes its output is
/// drained from once it exits.
pub struct Handle {
    child: Child,
    pid: i32,
}

impl Handle {
    /// `spawn`: run `command` via a shell in `cwd`, with stdout/stderr
    /// redirected to pipes. Spawn failure is the caller's to turn into
    /// a synthetic completed job (spec.md §7.5) — it is not retried
    /// here.
    pub fn spawn(command: &str, cwd: &str) -> Result<Self, SupervisorError> {
        let mut cmd = Command::new("sh");
        cmd.arg("-c")
            .arg(command)
            .current_dir(cwd)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());

        let child = cmd.spawn().map_err(SupervisorError::Spawn)?;
        let pid = child
            .id()
            .expect("just-spawned child always has a pid") as i32;
        Ok(Self { child, pid })
    }

    /// `poll`: non-blocking. `Ok(None)` while alive, `Ok(Some(_))` once
    /// the OS has reaped the child's exit status.
    pub fn poll(&mut self) -> Result<Option<ExitStatus>, SupervisorError> {
        match self.child.try_wait().map_err(SupervisorError::Poll)? {
            Some(status) => Ok(Some(exit_status_of(status))),
            None => Ok(None),
        }
    }

    /// Async variant of [`Handle::poll`] for use in `tokio::select!` —
    /// resolves only when the child has actually exited, so the event
    /// loop can await it alongside other branches instead of spinning.
    pub async fn wait(&mut self) -> Result<ExitStatus, SupervisorError> {
        let status = self.child.wait().await.map_err(SupervisorError::Poll)?;
        Ok(exit_status_of(status))
    }

    /// `terminate`: SIGTERM. Idempotent — a child that has already
    /// exited reports `ESRCH`, which is treated as success.
    pub fn terminate(&self) -> Result<(), SupervisorError> {
        self.signal(nix::sys::signal::Signal::SIGTERM)
    }

    /// `kill`: SIGKILL. Same idempotence as [`Handle::terminate`].
    pub fn kill(&self) -> Result<(), SupervisorError> {
        self.signal(nix::sys::signal::Signal::SIGKILL)
    }

    fn signal(&self, sig: nix::sys::signal::Signal) -> Result<(), SupervisorError> {
        use nix::unistd::Pid;
        match nix::sys::signal::kill(Pid::from_raw(self.pid), sig) {
            Ok(()) => Ok(()),
            Err(nix::Error::ESRCH) => {
                warn!(pid = self.pid, "signaled a child that had already exited");
                Ok(())
            }
            Err(e) => Err(SupervisorError::Signal(e)),
        }
    }

    /// `collect`: drain both pipes fully. Called exactly once, after
    /// [`Handle::poll`]/[`Handle::wait`] has reported exit.
    ///
    /// Reads raw bytes and converts lossily rather than using
    /// `read_to_string` directly: a command that emits so much as one
    /// non-UTF-8 byte would otherwise make `read_to_string` fail and
    /// discard the entire buffer, not just the invalid tail.
    pub async fn collect(&mut self) -> (String, String) {
        let mut stdout = Vec::new();
        let mut stderr = Vec::new();
        if let Some(mut out) = self.child.stdout.take() {
            if let Err(e) = out.read_to_end(&mut stdout).await {
                warn!(error = %e, "failed to fully read child stdout");
            }
        }
        if let Some(mut err) = self.child.stderr.take() {
            if let Err(e) = err.read_to_end(&mut stderr).await {
                warn!(error = %e, "failed to fully read child stderr");
            }
        }
        (
            String::from_utf8_lossy(&stdout).into_owned(),
            String::from_utf8_lossy(&stderr).into_owned(),
        )
    }
}

fn exit_status_of(status: std::process::ExitStatus) -> ExitStatus {
    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(signal) = status.signal() {
            return ExitStatus::Signaled(signal);
        }
    }
    ExitStatus::Exited(status.code().unwrap_or(127))
}

#[cfg(test)]
#[path = "supervisor_tests.rs"]
mod tests;
