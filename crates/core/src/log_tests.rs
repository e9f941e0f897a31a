use super::*;
use crate::job::{CompletedJob, ExitOutcome, Job, JobId};

fn completed(id: u64) -> CompletedJob {
    CompletedJob::from_job(
        Job::new(JobId(id), "echo hi", "/tmp"),
        ExitOutcome::Exited(0),
        "hi\n".to_string(),
        String::new(),
    )
}

#[test]
fn rotate_clears_and_returns_old_contents() {
    let mut log = Log::new();
    log.insert(completed(0));
    log.insert(completed(1));

    let old = log.rotate();

    assert!(log.is_empty());
    assert_eq!(old.iter().count(), 2);
}

#[test]
fn rotate_on_empty_log_is_a_noop() {
    let mut log = Log::new();
    let old = log.rotate();
    assert!(log.is_empty());
    assert!(old.is_empty());
}
