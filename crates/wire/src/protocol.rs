//! Request/reply schema (spec.md §6, normative). The dispatcher in
//! `jobqd-daemon` is the only consumer of [`Request`]; any client just
//! needs to construct one and frame it with [`crate::framing`].

use std::collections::BTreeMap;

use jobqd_core::{CompletedJob, Job, JobId, JobStatus};
use serde::{Deserialize, Serialize};

/// A decoded client request. The `mode` tag matches spec.md §6 exactly,
/// including the upper-case control verbs — this is the wire contract,
/// not a Rust naming convention, so it is not renamed to snake_case.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode")]
pub enum Request {
    #[serde(rename = "add")]
    Add { command: String, path: String },

    #[serde(rename = "remove")]
    Remove { key: JobId },

    #[serde(rename = "show")]
    Show { index: ShowIndex },

    #[serde(rename = "reset")]
    Reset,

    #[serde(rename = "START")]
    Start,

    #[serde(rename = "PAUSE")]
    Pause,

    /// `STOP`, optionally decorated with `{remove: true, key}` to
    /// atomically remove the job after terminating it (spec.md §4.D).
    #[serde(rename = "STOP")]
    Stop {
        #[serde(default)]
        remove: bool,
        #[serde(default)]
        key: Option<JobId>,
    },

    /// `KILL`, same decoration as `STOP`.
    #[serde(rename = "KILL")]
    Kill {
        #[serde(default)]
        remove: bool,
        #[serde(default)]
        key: Option<JobId>,
    },

    #[serde(rename = "EXIT")]
    Exit,
}

/// `show`'s `index` field: `"all"` or an integer key. Integer-indexed
/// show is an open question per spec.md §9 — the dispatcher accepts it
/// on the wire but is not required to populate `data` differently.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ShowIndex {
    All(AllMarker),
    Key(u64),
}

/// Serializes/deserializes as the literal string `"all"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AllMarker;

impl Serialize for AllMarker {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str("all")
    }
}

impl<'de> Deserialize<'de> for AllMarker {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        if s == "all" {
            Ok(AllMarker)
        } else {
            Err(serde::de::Error::custom("expected \"all\""))
        }
    }
}

/// A reply sent back to the client: either a plain status string or
/// the structured `show` record (spec.md §4.D/§6).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Response {
    Status { message: String },
    Show { reply: Box<ShowReply> },
    Error { message: String },
}

impl Response {
    pub fn status(message: impl Into<String>) -> Self {
        Response::Status {
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Response::Error {
            message: message.into(),
        }
    }
}

/// Derived-from-the-supervisor process state reported by `show`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProcessState {
    Running,
    Finished,
    #[serde(rename = "no process")]
    NoProcess,
}

/// `paused`/`running`, mirroring [`jobqd_core::DaemonState::paused`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DaemonStatus {
    Paused,
    Running,
}

/// `current`: the last completed job's exit code, or the sentinel.
/// Custom (de)serialize for the same reason as [`ShowData`]: the wire
/// shape is "a number, or else this one string".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CurrentExit {
    Code(i32),
    NoExitcode,
}

impl Serialize for CurrentExit {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            CurrentExit::Code(code) => serializer.serialize_i32(*code),
            CurrentExit::NoExitcode => serializer.serialize_str("No exitcode"),
        }
    }
}

impl<'de> Deserialize<'de> for CurrentExit {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Code(i32),
            Sentinel(String),
        }
        match Raw::deserialize(deserializer)? {
            Raw::Code(code) => Ok(CurrentExit::Code(code)),
            Raw::Sentinel(s) if s == "No exitcode" => Ok(CurrentExit::NoExitcode),
            Raw::Sentinel(other) => Err(serde::de::Error::custom(format!(
                "unexpected current-exit string: {other}"
            ))),
        }
    }
}

/// One row of the `show` reply's `data` field: a queued/running job or
/// a completed one, unified so a client can render both from one map.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobEntry {
    pub id: JobId,
    pub command: String,
    pub path: String,
    pub status: JobStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub returncode: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stdout: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stderr: Option<String>,
}

impl JobEntry {
    pub fn queued(job: &Job) -> Self {
        Self {
            id: job.id,
            command: job.command.clone(),
            path: job.path.clone(),
            status: JobStatus::Queued,
            returncode: None,
            stdout: None,
            stderr: None,
        }
    }

    pub fn running(job: &Job) -> Self {
        Self {
            status: JobStatus::Running,
            ..Self::queued(job)
        }
    }

    pub fn completed(job: &CompletedJob) -> Self {
        Self {
            id: job.id,
            command: job.command.clone(),
            path: job.path.clone(),
            status: job.status(),
            returncode: Some(job.returncode),
            stdout: Some(job.stdout.clone()),
            stderr: Some(job.stderr.clone()),
        }
    }
}

/// `data`: either the merged queue+log mapping, or the "Queue is empty"
/// sentinel when both are empty (spec.md §4.D). Custom (de)serialize
/// because the wire shape is "a map, or else this one string".
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ShowData {
    #[default]
    Empty,
    Jobs(BTreeMap<JobId, JobEntry>),
}

impl Serialize for ShowData {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            ShowData::Empty => serializer.serialize_str("Queue is empty"),
            ShowData::Jobs(map) => map.serialize(serializer),
        }
    }
}

impl<'de> Deserialize<'de> for ShowData {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Sentinel(String),
            Jobs(BTreeMap<JobId, JobEntry>),
        }
        match Raw::deserialize(deserializer)? {
            Raw::Sentinel(s) if s == "Queue is empty" => Ok(ShowData::Empty),
            Raw::Sentinel(other) => Err(serde::de::Error::custom(format!(
                "unexpected show data string: {other}"
            ))),
            Raw::Jobs(map) => Ok(ShowData::Jobs(map)),
        }
    }
}

/// The structured reply to a `show` request (spec.md §4.D).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShowReply {
    pub process: ProcessState,
    pub status: DaemonStatus,
    pub current: CurrentExit,
    pub data: ShowData,
}

#[cfg(test)]
#[path = "protocol_tests.rs"]
mod tests;
