use super::*;
use crate::job::ExitOutcome;
use crate::queue::QueueError;

#[test]
fn adds_assign_strictly_increasing_ids_in_order() {
    let mut state = DaemonState::new();
    let a = state.add("echo a", "/tmp");
    let b = state.add("echo b", "/tmp");
    let c = state.add("echo c", "/tmp");

    assert_eq!([a, b, c], [JobId(0), JobId(1), JobId(2)]);
    assert_eq!(state.queue.len(), 3);
    let ids: Vec<_> = state.queue.iter().map(|(id, _)| *id).collect();
    assert_eq!(ids, vec![JobId(0), JobId(1), JobId(2)]);
}

#[test]
fn len_tracks_adds_minus_removes_and_completions() {
    let mut state = DaemonState::new();
    state.add("a", "/tmp");
    state.add("b", "/tmp");
    state.add("c", "/tmp");
    state.remove(JobId(1)).expect("queued job is removable");
    state.promote_head_to_running();
    state.complete_running(ExitOutcome::Exited(0), String::new(), String::new());

    assert_eq!(state.queue.len(), 1);
}

#[test]
fn remove_unknown_key_errors_and_leaves_state_unchanged() {
    let mut state = DaemonState::new();
    state.add("a", "/tmp");
    let before = state.clone();

    let err = state.remove(JobId(99)).unwrap_err();

    assert_eq!(err, QueueError::UnknownJob(JobId(99)));
    assert_eq!(state, before);
}

#[test]
fn remove_running_job_while_unpaused_is_refused() {
    let mut state = DaemonState::new();
    state.add("sleep 60", "/tmp");
    state.promote_head_to_running();

    let err = state.remove(JobId(0)).unwrap_err();

    assert_eq!(err, QueueError::RunningJob(JobId(0)));
    assert!(state.queue.contains(JobId(0)));
}

#[test]
fn remove_running_job_while_paused_succeeds() {
    let mut state = DaemonState::new();
    state.add("sleep 60", "/tmp");
    state.promote_head_to_running();
    state.pause();

    let job = state.remove(JobId(0)).expect("paused daemon allows removal");

    assert_eq!(job.id, JobId(0));
    assert_eq!(state.current_id, None);
}

#[test]
fn pause_then_pause_is_idempotent() {
    let mut state = DaemonState::new();
    assert!(state.pause());
    assert!(!state.pause());
    assert!(state.paused);
}

#[test]
fn start_then_start_is_idempotent() {
    let mut state = DaemonState::new();
    state.pause();
    assert!(state.start());
    assert!(!state.start());
    assert!(!state.paused);
}

#[test]
fn reset_clears_queue_and_resets_next_id() {
    let mut state = DaemonState::new();
    state.add("a", "/tmp");
    state.promote_head_to_running();
    state.complete_running(ExitOutcome::Exited(0), "out".into(), String::new());

    let rotated = state.reset();

    assert!(state.queue.is_empty());
    assert_eq!(state.current_id, None);
    assert_eq!(state.next_id, JobId(0));
    assert!(state.log.is_empty());
    assert_eq!(rotated.iter().count(), 1);
}

#[test]
fn a_completed_job_leaves_the_queue_and_enters_the_log_exactly_once() {
    let mut state = DaemonState::new();
    state.add("echo hi", "/tmp");
    state.promote_head_to_running();

    let completed = state
        .complete_running(ExitOutcome::Exited(0), "hi\n".into(), String::new())
        .expect("a job was running");

    assert_eq!(completed.id, JobId(0));
    assert!(!state.queue.contains(JobId(0)));
    assert!(state.log.get(JobId(0)).is_some());
    assert_eq!(state.current_id, None);
}

#[test]
fn resume_with_nonempty_queue_starts_paused_and_continues_id_sequence() {
    let mut fresh = DaemonState::new();
    fresh.add("a", "/tmp");
    fresh.add("b", "/tmp");

    let resumed = DaemonState::resume(fresh.queue.clone(), Log::new());

    assert!(resumed.paused);
    assert_eq!(resumed.next_id, JobId(2));
    assert_eq!(resumed.current_id, None);
}

#[test]
fn resume_with_empty_queue_starts_unpaused_at_zero() {
    let resumed = DaemonState::resume(Queue::new(), Log::new());
    assert!(!resumed.paused);
    assert_eq!(resumed.next_id, JobId(0));
}

#[test]
fn release_active_child_clears_current_id_but_leaves_the_job_queued() {
    let mut state = DaemonState::new();
    state.add("sleep 60", "/tmp");
    state.promote_head_to_running();

    state.release_active_child();

    assert_eq!(state.current_id, None);
    assert!(!state.has_active_child());
    assert!(state.queue.contains(JobId(0)), "the job must stay in the queue");
}
