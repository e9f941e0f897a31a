//! Daemon state: the queue, the log, and the three scalars (`paused`,
//! `current_id`, `next_id`) whose interplay is specified in spec.md §3.
//!
//! Every public mutator here either fully restores the invariants before
//! returning or returns an error and leaves state untouched — callers
//! (the dispatcher, the event loop) never need to re-check §3 themselves.

use crate::job::{CompletedJob, ExitOutcome, Job, JobId};
use crate::log::Log;
use crate::queue::{Queue, QueueError};
use serde::{Deserialize, Serialize};

/// The complete durable daemon state: everything that must round-trip
/// through a restart. `paused` and `current_id` are *not* part of the
/// persisted snapshot (spec.md §6 only persists `queue` and
/// `queue.picklelog`); they are recomputed at startup by
/// [`DaemonState::resume`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DaemonState {
    pub queue: Queue,
    pub log: Log,
    pub paused: bool,
    pub current_id: Option<JobId>,
    pub next_id: JobId,
}

impl DaemonState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild transient state after loading a persisted queue/log.
    ///
    /// Mirrors the original daemon's constructor: a non-empty queue means
    /// the previous run ended with unfinished work, so `next_id` resumes
    /// past the highest stored id and the daemon starts paused so the
    /// leftover head job does not silently resume without the user's
    /// say-so. An empty queue means the previous generation finished
    /// cleanly, so a new generation starts at id 0, unpaused.
    pub fn resume(queue: Queue, log: Log) -> Self {
        let paused = !queue.is_empty();
        let next_id = match queue.max_id() {
            Some(max) => max.next(),
            None => JobId(0),
        };
        Self {
            queue,
            log,
            paused,
            current_id: None,
            next_id,
        }
    }

    /// `add`: append a job at `next_id`, then increment `next_id`.
    pub fn add(&mut self, command: impl Into<String>, path: impl Into<String>) -> JobId {
        let id = self.next_id;
        self.queue.insert(Job::new(id, command, path));
        self.next_id = self.next_id.next();
        id
    }

    /// `remove`: refuse if unknown, refuse if it's the running job and
    /// the daemon is not paused (spec.md §4.D validation rules).
    pub fn remove(&mut self, id: JobId) -> Result<Job, QueueError> {
        if !self.queue.contains(id) {
            return Err(QueueError::UnknownJob(id));
        }
        if !self.paused && self.current_id == Some(id) {
            return Err(QueueError::RunningJob(id));
        }
        let job = self.queue.remove(id).expect("checked contains above");
        if self.current_id == Some(id) {
            self.current_id = None;
        }
        Ok(job)
    }

    /// Force-remove the running job regardless of pause state, used only
    /// by the STOP/KILL `{remove: true}` decoration (spec.md §4.D) after
    /// the active child has already been signaled. Detaches `current_id`
    /// so the event loop knows not to expect a normal completion for it.
    pub fn force_remove_running(&mut self, id: JobId) -> Option<Job> {
        let job = self.queue.remove(id);
        if self.current_id == Some(id) {
            self.current_id = None;
        }
        job
    }

    /// Detach the running job without completing it: it stays in the
    /// queue and reports as `queued` again (spec.md §8 — a plain
    /// `STOP`/`KILL` signals the child but does not reap it). The
    /// caller is responsible for handing the corresponding supervisor
    /// handle off to an orphan-reap task so the OS process still gets
    /// waited on.
    pub fn release_active_child(&mut self) {
        self.current_id = None;
    }

    /// `head`: the next-or-current job.
    pub fn head(&self) -> Option<&Job> {
        self.queue.head()
    }

    /// Promote the head to running: requires no child currently active.
    /// Returns the promoted job so the caller can hand it to the
    /// supervisor. Does not remove anything from the queue — the
    /// running job stays in the queue by invariant 2 until it is reaped.
    pub fn promote_head_to_running(&mut self) -> Option<&Job> {
        debug_assert!(self.current_id.is_none(), "a child is already active");
        let id = self.queue.head_id()?;
        self.current_id = Some(id);
        self.queue.get(id)
    }

    /// `complete_running`: move the running job from queue to log.
    ///
    /// Per spec.md §9's resolved open question, the reaped id is
    /// `current_id` directly; the debug assertion documents that this
    /// must equal the queue's minimum id (invariant 2).
    pub fn complete_running(
        &mut self,
        outcome: ExitOutcome,
        stdout: String,
        stderr: String,
    ) -> Option<CompletedJob> {
        let id = self.current_id?;
        debug_assert_eq!(
            Some(id),
            self.queue.head_id(),
            "current_id must be the queue head"
        );
        let job = self.queue.remove(id)?;
        let completed = CompletedJob::from_job(job, outcome, stdout, stderr);
        self.log.insert(completed.clone());
        self.current_id = None;
        Some(completed)
    }

    /// `reset`: clear the queue, rotate the log, reset `next_id` to 0,
    /// clear `current_id`. Terminating any active child is the caller's
    /// responsibility (the supervisor is not visible from `jobqd-core`).
    /// Returns the rotated-out log so the storage layer can archive it.
    pub fn reset(&mut self) -> Log {
        self.queue.clear();
        self.current_id = None;
        self.next_id = JobId(0);
        self.log.rotate()
    }

    /// `START`: idempotent unpause. Returns whether state changed.
    pub fn start(&mut self) -> bool {
        let changed = self.paused;
        self.paused = false;
        changed
    }

    /// `PAUSE`: idempotent pause. Returns whether state changed.
    pub fn pause(&mut self) -> bool {
        let changed = !self.paused;
        self.paused = true;
        changed
    }

    pub fn has_active_child(&self) -> bool {
        self.current_id.is_some()
    }
}

#[cfg(test)]
#[path = "state_tests.rs"]
mod tests;
