//! The request dispatcher (spec.md §4.D): decode a request, validate
//! it against current state, mutate the model, emit a reply. Every
//! mode lives in [`handle`] so the validation split described in
//! spec.md §4.D ("fatal to the client, never to the daemon") is
//! visible in one function.

use std::collections::BTreeMap;

use jobqd_core::{ExitOutcome, JobId};
use jobqd_supervisor::Handle;
use jobqd_wire::{
    CurrentExit, DaemonStatus, JobEntry, ProcessState, Request, Response, ShowData, ShowIndex,
    ShowReply,
};
use tracing::{info, warn};

use crate::{spawn_orphan_reap, Runtime};

/// Handle one decoded request. Returns the reply and whether the event
/// loop should break afterward (`EXIT`).
pub fn handle(rt: &mut Runtime, request: Request) -> (Response, bool) {
    match request {
        Request::Add { command, path } => (add(rt, command, path), false),
        Request::Remove { key } => (remove(rt, key), false),
        Request::Show { index } => (show(rt, index), false),
        Request::Reset => (reset(rt), false),
        Request::Start => (start(rt), false),
        Request::Pause => (pause(rt), false),
        Request::Stop { remove, key } => (stop_or_kill(rt, false, remove, key), false),
        Request::Kill { remove, key } => (stop_or_kill(rt, true, remove, key), false),
        Request::Exit => (Response::status("jobqd daemon shutting down"), true),
    }
}

fn add(rt: &mut Runtime, command: String, path: String) -> Response {
    let id = rt.daemon.state.add(command, path);
    rt.daemon.store.save_queue(&rt.daemon.state.queue);
    info!(job = %id, "job added");
    Response::status("Command added")
}

fn remove(rt: &mut Runtime, key: JobId) -> Response {
    match rt.daemon.state.remove(key) {
        Ok(_) => {
            rt.daemon.store.save_queue(&rt.daemon.state.queue);
            Response::status(format!("Command #{key} removed"))
        }
        Err(e) => Response::error(e.to_string()),
    }
}

fn show(rt: &mut Runtime, index: ShowIndex) -> Response {
    let state = &rt.daemon.state;

    let process = if rt.child.is_some() {
        ProcessState::Running
    } else if !state.log.is_empty() {
        ProcessState::Finished
    } else {
        ProcessState::NoProcess
    };

    let status = if state.paused {
        DaemonStatus::Paused
    } else {
        DaemonStatus::Running
    };

    let current = match state.log.iter().next_back() {
        Some((_, entry)) => CurrentExit::Code(entry.returncode),
        None => CurrentExit::NoExitcode,
    };

    // Integer-indexed `show` is an open question spec.md §9 leaves
    // unresolved; only `"all"` populates `data`, matching the source.
    let data = match index {
        ShowIndex::All(_) => merged_data(rt),
        ShowIndex::Key(_) => ShowData::Empty,
    };

    Response::Show {
        reply: Box::new(ShowReply {
            process,
            status,
            current,
            data,
        }),
    }
}

fn merged_data(rt: &Runtime) -> ShowData {
    let state = &rt.daemon.state;
    if state.queue.is_empty() && state.log.is_empty() {
        return ShowData::Empty;
    }
    let mut map = BTreeMap::new();
    for (id, job) in state.queue.iter() {
        let entry = if state.current_id == Some(*id) {
            JobEntry::running(job)
        } else {
            JobEntry::queued(job)
        };
        map.insert(*id, entry);
    }
    for (id, completed) in state.log.iter() {
        map.insert(*id, JobEntry::completed(completed));
    }
    ShowData::Jobs(map)
}

fn reset(rt: &mut Runtime) -> Response {
    if let Some(child) = rt.child.take() {
        if let Err(e) = child.terminate() {
            warn!(error = %e, "failed to terminate child during reset");
        }
        spawn_orphan_reap(child);
    }
    let old_log = rt.daemon.state.reset();
    rt.daemon.store.save_queue(&rt.daemon.state.queue);
    rt.daemon.store.save_log(&old_log, true);
    rt.daemon.store.save_log(&rt.daemon.state.log, false);
    Response::status("Reseting current queue")
}

fn start(rt: &mut Runtime) -> Response {
    if rt.daemon.state.start() {
        Response::status("Daemon started")
    } else {
        Response::status("Daemon already started")
    }
}

fn pause(rt: &mut Runtime) -> Response {
    if rt.daemon.state.pause() {
        Response::status("Daemon paused")
    } else {
        Response::status("Daemon already paused")
    }
}

/// Shared implementation of `STOP`/`KILL`, including the `{remove,
/// key}` decoration (spec.md §4.D): signal the active child, detach it
/// into an orphan-reap task without completing it, pause, and — if
/// `remove` was requested — additionally drop the named job from the
/// queue, returning the daemon to the non-paused running state only
/// when the removed job was the one that had been running.
///
/// A plain `STOP`/`KILL` never reaps the signaled job (spec.md §8): the
/// child is terminated and left to exit in the background, but the job
/// itself stays in the queue and reports `queued` again, exactly as if
/// it had never been promoted — only `START` resumes it.
fn stop_or_kill(rt: &mut Runtime, kill: bool, remove: bool, key: Option<JobId>) -> Response {
    let had_child = rt.child.is_some();
    let running_id = rt.daemon.state.current_id;

    if let Some(child) = rt.child.take() {
        let result = if kill { child.kill() } else { child.terminate() };
        if let Err(e) = result {
            warn!(error = %e, "failed to signal active child");
        }
        rt.daemon.state.release_active_child();
        spawn_orphan_reap(child);
    }
    rt.daemon.state.pause();

    if remove {
        if let Some(key) = key {
            let was_running = running_id == Some(key);
            if let Some(job) = rt.daemon.state.force_remove_running(key) {
                rt.daemon.store.save_queue(&rt.daemon.state.queue);
                if was_running {
                    rt.daemon.state.start();
                    return Response::status(format!(
                        "Command #{key} ({}) removed, daemon resumed",
                        job.command
                    ));
                }
                return Response::status(format!("Command #{key} ({}) removed", job.command));
            }
            return Response::error(format!("no command with key #{key}"));
        }
    }

    if had_child {
        Response::status(if kill {
            "Sent kill to process and paused daemon"
        } else {
            "Terminating current process and pausing"
        })
    } else {
        Response::status("No process running, pausing daemon")
    }
}

/// Build a completed job from a just-observed exit and persist it.
/// Called by the event loop, not by [`handle`] — a child's exit is not
/// a client request.
pub fn reap(rt: &mut Runtime, outcome: ExitOutcome, stdout: String, stderr: String) {
    if let Some(completed) = rt.daemon.state.complete_running(outcome, stdout, stderr) {
        info!(job = %completed.id, returncode = completed.returncode, "job completed");
        rt.daemon.store.save_queue(&rt.daemon.state.queue);
        rt.daemon.store.save_log(&rt.daemon.state.log, false);
    }
}

/// Spawn the queue head if [`jobqd_core::promote_decision`] says to.
/// Spawn failure is surfaced as a synthetic completed job (spec.md
/// §7.5) rather than jamming the head.
pub async fn promote_if_ready(rt: &mut Runtime) {
    use jobqd_core::PromoteDecision;

    match jobqd_core::promote_decision(&rt.daemon.state) {
        PromoteDecision::Promote(id) => {
            let job = rt
                .daemon
                .state
                .head()
                .expect("promote_decision confirmed a head exists")
                .clone();
            debug_assert_eq!(job.id, id);
            rt.daemon.state.promote_head_to_running();
            match Handle::spawn(&job.command, &job.path) {
                Ok(handle) => {
                    rt.child = Some(handle);
                }
                Err(e) => {
                    warn!(job = %id, error = %e, "failed to spawn job");
                    reap(
                        rt,
                        ExitOutcome::SpawnFailed,
                        String::new(),
                        format!("{e}"),
                    );
                }
            }
        }
        PromoteDecision::ChildActive | PromoteDecision::Paused | PromoteDecision::QueueEmpty => {}
    }
}

#[cfg(test)]
#[path = "dispatch_tests.rs"]
mod tests;
