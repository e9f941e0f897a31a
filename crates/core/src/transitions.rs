//! The pure decision table from spec.md §4.F, factored out so the
//! dispatcher and the event loop consult exactly one implementation of
//! "should the head be promoted right now".

use crate::job::JobId;
use crate::state::DaemonState;

/// Why the event loop did or did not promote the queue head this tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromoteDecision {
    /// Spawn this job: `idle -> running` (or the post-reap restart of
    /// `running -> running`).
    Promote(JobId),
    /// A child is already active; nothing to do.
    ChildActive,
    /// The daemon is paused; a non-empty queue waits.
    Paused,
    /// Nothing queued.
    QueueEmpty,
}

/// Compute spec.md §4.F's `idle -> running` transition without mutating
/// anything. The caller (event loop) acts on `Promote` by calling
/// [`DaemonState::promote_head_to_running`] and spawning the child.
pub fn promote_decision(state: &DaemonState) -> PromoteDecision {
    if state.has_active_child() {
        return PromoteDecision::ChildActive;
    }
    if state.paused {
        return PromoteDecision::Paused;
    }
    match state.head() {
        Some(job) => PromoteDecision::Promote(job.id),
        None => PromoteDecision::QueueEmpty,
    }
}

#[cfg(test)]
#[path = "transitions_tests.rs"]
mod tests;
