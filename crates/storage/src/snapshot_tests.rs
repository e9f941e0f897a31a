use super::*;
use jobqd_core::{CompletedJob, ExitOutcome, Job, JobId};
use tempfile::tempdir;

#[test]
fn missing_queue_file_loads_as_empty() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("queue");
    let queue = load_queue_snapshot(&path);
    assert!(queue.is_empty());
}

#[test]
fn a_saved_queue_loads_back_identical() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("queue");
    let mut queue = Queue::new();
    queue.insert(Job::new(JobId(0), "echo hi", "/tmp"));
    queue.insert(Job::new(JobId(1), "echo bye", "/tmp"));

    save_queue_snapshot(&path, &queue);
    let loaded = load_queue_snapshot(&path);

    assert_eq!(loaded, queue);
}

#[test]
fn a_corrupt_queue_file_is_deleted_and_loads_as_empty() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("queue");
    std::fs::write(&path, b"not json").unwrap();

    let queue = load_queue_snapshot(&path);

    assert!(queue.is_empty());
    assert!(!path.exists());
}

#[test]
fn a_saved_log_loads_back_identical() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("queue.picklelog");
    let mut log = Log::new();
    log.insert(CompletedJob::from_job(
        Job::new(JobId(0), "echo hi", "/tmp"),
        ExitOutcome::Exited(0),
        "hi\n".into(),
        String::new(),
    ));

    save_log_snapshot(&path, &log);
    let loaded = load_log_snapshot(&path);

    assert_eq!(loaded, log);
}

#[test]
fn save_creates_parent_directories() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("nested").join("deep").join("queue");
    save_queue_snapshot(&path, &Queue::new());
    assert!(path.exists());
}
