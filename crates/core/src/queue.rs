//! The pending/running job map, ordered by ascending id.

use crate::job::{Job, JobId};
use std::collections::BTreeMap;
use thiserror::Error;

/// Errors returned by queue mutations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum QueueError {
    #[error("no command with key #{0}")]
    UnknownJob(JobId),
    #[error("can't remove currently running process #{0}, please stop the process before removing it")]
    RunningJob(JobId),
}

/// Pending and currently-running jobs, keyed by id. The head (minimum
/// id) is the next-or-current job; insertion always appends at a new
/// maximum id, so ordering by id agrees with insertion order in the
/// absence of a reorder operation (this system defines none).
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Queue(BTreeMap<JobId, Job>);

impl Queue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, job: Job) {
        self.0.insert(job.id, job);
    }

    pub fn get(&self, id: JobId) -> Option<&Job> {
        self.0.get(&id)
    }

    pub fn contains(&self, id: JobId) -> bool {
        self.0.contains_key(&id)
    }

    pub fn remove(&mut self, id: JobId) -> Option<Job> {
        self.0.remove(&id)
    }

    /// The entry with the minimum id: the next-or-current job.
    pub fn head(&self) -> Option<&Job> {
        self.0.values().next()
    }

    pub fn head_id(&self) -> Option<JobId> {
        self.0.keys().next().copied()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn max_id(&self) -> Option<JobId> {
        self.0.keys().next_back().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&JobId, &Job)> {
        self.0.iter()
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }
}

#[cfg(test)]
#[path = "queue_tests.rs"]
mod tests;
