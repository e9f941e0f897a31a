//! A unit of work: the command line, its working directory, and its
//! derived status.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unique identifier for a job within the current queue generation.
///
/// Assigned at submission time, strictly increasing, never reused until
/// a `reset` starts a new generation at zero.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct JobId(pub u64);

impl JobId {
    pub fn next(self) -> JobId {
        JobId(self.0 + 1)
    }
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Status of a job as exposed to clients. `Running` and `Done`/`Failed`
/// are derived by the daemon, never stored directly on a queued `Job`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    Queued,
    Running,
    Done,
    Failed,
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JobStatus::Queued => write!(f, "queued"),
            JobStatus::Running => write!(f, "running"),
            JobStatus::Done => write!(f, "done"),
            JobStatus::Failed => write!(f, "failed"),
        }
    }
}

/// A job waiting in, or currently at the head of, the queue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Job {
    pub id: JobId,
    pub command: String,
    pub path: String,
}

impl Job {
    pub fn new(id: JobId, command: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            id,
            command: command.into(),
            path: path.into(),
        }
    }
}

/// How a completed child's exit was observed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExitOutcome {
    /// The child called `exit()` (or returned from `main`) with this code.
    Exited(i32),
    /// The child was terminated by this signal number.
    Signaled(i32),
    /// The child could not be started at all.
    SpawnFailed,
}

impl ExitOutcome {
    /// Map to the shell/`wait(2)` convention: a signal termination is
    /// reported as the negative signal number, matching what a POSIX
    /// shell stores in `$?` and what the original daemon's
    /// `Popen.returncode` reports for Python.
    pub fn returncode(self) -> i32 {
        match self {
            ExitOutcome::Exited(code) => code,
            ExitOutcome::Signaled(sig) => -sig,
            ExitOutcome::SpawnFailed => 127,
        }
    }
}

/// A job that has finished, successfully or not, with its captured output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletedJob {
    pub id: JobId,
    pub command: String,
    pub path: String,
    pub returncode: i32,
    pub stdout: String,
    pub stderr: String,
}

impl CompletedJob {
    pub fn from_job(job: Job, outcome: ExitOutcome, stdout: String, stderr: String) -> Self {
        Self {
            id: job.id,
            command: job.command,
            path: job.path,
            returncode: outcome.returncode(),
            stdout,
            stderr,
        }
    }

    /// `status` as reported to clients: non-zero or signaled exit codes
    /// are `failed`, everything else is `done`.
    pub fn status(&self) -> JobStatus {
        if self.returncode == 0 {
            JobStatus::Done
        } else {
            JobStatus::Failed
        }
    }
}

#[cfg(test)]
#[path = "job_tests.rs"]
mod tests;
