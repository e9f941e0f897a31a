//! End-to-end scenarios driven against a real `jobqd` daemon process
//! over its Unix socket, one tempdir-scoped state directory per test.

use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;

use jobqd_core::JobId;
use jobqd_wire::framing::{decode, encode, read_message, write_message};
use jobqd_wire::{DaemonStatus, Request, Response, ShowData, ShowIndex};
use serial_test::serial;
use tempfile::tempdir;
use tokio::net::UnixStream;
use tokio::process::{Child, Command};
use tokio::time::sleep;

struct TestDaemon {
    child: Child,
    socket_path: PathBuf,
}

impl TestDaemon {
    async fn spawn(state_dir: &Path) -> Self {
        let child = Command::new(env!("CARGO_BIN_EXE_jobqd"))
            .env("JOBQD_STATE_DIR", state_dir)
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .expect("jobqd should spawn");

        let socket_path = state_dir.join("daemon.sock");
        for _ in 0..100 {
            if socket_path.exists() {
                break;
            }
            sleep(Duration::from_millis(20)).await;
        }
        assert!(socket_path.exists(), "daemon never bound its socket");

        Self { child, socket_path }
    }

    async fn request(&self, request: &Request) -> Response {
        let mut stream = UnixStream::connect(&self.socket_path)
            .await
            .expect("should connect to the daemon socket");
        let bytes = encode(request).expect("request should encode");
        write_message(&mut stream, &bytes)
            .await
            .expect("request should write");
        let reply_bytes = read_message(&mut stream).await.expect("response should arrive");
        decode(&reply_bytes).expect("response should decode")
    }

    async fn show(&self) -> jobqd_wire::ShowReply {
        match self.request(&Request::Show { index: all_index() }).await {
            Response::Show { reply } => *reply,
            other => panic!("expected a Show response, got {other:?}"),
        }
    }

    async fn wait_for_job_count(&self, expected: usize) {
        for _ in 0..100 {
            let data = self.show().await.data;
            let len = match data {
                ShowData::Empty => 0,
                ShowData::Jobs(map) => map.len(),
            };
            if len == expected {
                return;
            }
            sleep(Duration::from_millis(20)).await;
        }
        panic!("job count never reached {expected}");
    }

    async fn shutdown(mut self) {
        let _ = self.request(&Request::Exit).await;
        let _ = tokio::time::timeout(Duration::from_secs(2), self.child.wait()).await;
    }
}

fn all_index() -> ShowIndex {
    serde_json::from_str(r#""all""#).expect("\"all\" always parses")
}

#[tokio::test]
#[serial]
async fn kill_stops_the_running_job_and_returns_it_to_queued() {
    let dir = tempdir().expect("tempdir");
    let daemon = TestDaemon::spawn(dir.path()).await;

    daemon
        .request(&Request::Add {
            command: "sleep 30".into(),
            path: "/tmp".into(),
        })
        .await;
    daemon.wait_for_job_count(1).await;

    let reply = daemon.request(&Request::Kill { remove: false, key: None }).await;
    assert!(matches!(reply, Response::Status { .. }));

    // The job is not removed or reaped, just returned to queued — it was
    // never completed, only the daemon paused (spec.md §8).
    daemon.wait_for_job_count(1).await;
    let show = daemon.show().await;
    assert_eq!(show.status, DaemonStatus::Paused);
    match show.data {
        ShowData::Jobs(map) => {
            assert_eq!(map[&JobId(0)].status, jobqd_core::JobStatus::Queued);
        }
        ShowData::Empty => panic!("the killed job should still be queued"),
    }

    daemon.shutdown().await;
}

#[tokio::test]
#[serial]
async fn kill_with_remove_drops_the_job_entirely_and_resumes() {
    let dir = tempdir().expect("tempdir");
    let daemon = TestDaemon::spawn(dir.path()).await;

    daemon
        .request(&Request::Add {
            command: "sleep 30".into(),
            path: "/tmp".into(),
        })
        .await;
    daemon.wait_for_job_count(1).await;

    daemon
        .request(&Request::Kill {
            remove: true,
            key: Some(JobId(0)),
        })
        .await;

    daemon.wait_for_job_count(0).await;
    let show = daemon.show().await;
    assert_eq!(show.status, DaemonStatus::Running, "removing the running job resumes the daemon");

    daemon
        .request(&Request::Add {
            command: "true".into(),
            path: "/tmp".into(),
        })
        .await;
    daemon.wait_for_job_count(1).await;

    daemon.shutdown().await;
}

#[tokio::test]
#[serial]
async fn stop_pauses_the_daemon_without_removing_the_job() {
    let dir = tempdir().expect("tempdir");
    let daemon = TestDaemon::spawn(dir.path()).await;

    daemon
        .request(&Request::Add {
            command: "sleep 30".into(),
            path: "/tmp".into(),
        })
        .await;
    daemon.wait_for_job_count(1).await;

    let reply = daemon.request(&Request::Stop { remove: false, key: None }).await;
    assert!(matches!(reply, Response::Status { .. }));

    daemon.wait_for_job_count(1).await;
    let show = daemon.show().await;
    assert_eq!(show.status, DaemonStatus::Paused);
    match show.data {
        ShowData::Jobs(map) => {
            assert_eq!(map[&JobId(0)].status, jobqd_core::JobStatus::Queued);
        }
        ShowData::Empty => panic!("the stopped job should still be queued"),
    }

    daemon.shutdown().await;
}

#[tokio::test]
#[serial]
async fn stop_with_remove_resumes_the_daemon_and_lets_the_next_job_run() {
    let dir = tempdir().expect("tempdir");
    let daemon = TestDaemon::spawn(dir.path()).await;

    daemon
        .request(&Request::Add {
            command: "sleep 30".into(),
            path: "/tmp".into(),
        })
        .await;
    daemon.wait_for_job_count(1).await;

    daemon
        .request(&Request::Stop {
            remove: true,
            key: Some(JobId(0)),
        })
        .await;

    daemon.wait_for_job_count(0).await;
    let show = daemon.show().await;
    assert_eq!(show.status, DaemonStatus::Running);

    daemon.shutdown().await;
}

#[tokio::test]
#[serial]
async fn reset_wipes_the_queue_and_starts_a_fresh_log_generation() {
    let dir = tempdir().expect("tempdir");
    let daemon = TestDaemon::spawn(dir.path()).await;

    daemon
        .request(&Request::Add { command: "true".into(), path: "/tmp".into() })
        .await;

    // Let it run to completion and land in the log before resetting, so
    // the rotated-out file actually has something to archive.
    for _ in 0..100 {
        let show = daemon.show().await;
        if !matches!(show.data, ShowData::Empty) {
            break;
        }
        sleep(Duration::from_millis(20)).await;
    }

    let reply = daemon.request(&Request::Reset).await;
    assert_eq!(reply, Response::status("Reseting current queue"));

    daemon.wait_for_job_count(0).await;

    let log_dir = dir.path().join("log");
    let rotated: Vec<_> = std::fs::read_dir(&log_dir)
        .expect("log dir exists")
        .filter_map(|e| e.ok())
        .collect();
    assert!(!rotated.is_empty(), "reset should archive the prior generation's log");

    daemon.shutdown().await;
}

#[tokio::test]
#[serial]
async fn a_restarted_daemon_resumes_a_leftover_queue_paused() {
    let dir = tempdir().expect("tempdir");
    {
        let mut daemon = TestDaemon::spawn(dir.path()).await;
        daemon
            .request(&Request::Add {
                command: "sleep 30".into(),
                path: "/tmp".into(),
            })
            .await;
        daemon.wait_for_job_count(1).await;
        // Kill the daemon process itself (no clean `EXIT`), leaving the
        // job mid-flight in the persisted queue for the next startup to
        // find.
        daemon.child.start_kill().expect("should be able to kill the daemon");
        let _ = daemon.child.wait().await;
    }

    let daemon = TestDaemon::spawn(dir.path()).await;
    let show = daemon.show().await;
    assert_eq!(show.status, DaemonStatus::Paused, "leftover work should not silently resume");
    assert!(!matches!(show.data, ShowData::Empty));

    daemon.shutdown().await;
}
