#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]
//! jobqd: the personal command-queue daemon's entry point.
//!
//! A single-threaded event loop owns all mutable state (spec.md §5):
//! accept one client, read one request, dispatch it, reply, close —
//! then check whether the queue head should be promoted, then select
//! again. Grounded on the teacher daemon's `main.rs` shape (signal
//! handlers, one `tokio::select!`, a non-blocking file logger) with
//! the listener-task/event-bus indirection dropped, since this
//! daemon's invariants (spec.md §3) require exactly one task to ever
//! touch state.

use jobqd_daemon::{dispatch, lifecycle, logging, Config, Runtime, StartupResult};
use jobqd_wire::{read_request, write_response, DEFAULT_TIMEOUT};
use tokio::signal::unix::{signal, SignalKind};
use tracing::{error, info, warn};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;
    let _log_guard = logging::init(&config)?;

    info!("starting jobqd");

    let StartupResult { daemon, listener } = match lifecycle::startup(config).await {
        Ok(r) => r,
        Err(lifecycle::LifecycleError::LockFailed(_)) => {
            eprintln!("jobqd is already running against this state directory");
            std::process::exit(1);
        }
        Err(e) => {
            error!(error = %e, "failed to start daemon");
            return Err(e.into());
        }
    };

    let mut rt = Runtime::new(daemon);
    let mut sigterm = signal(SignalKind::terminate())?;
    let mut sigint = signal(SignalKind::interrupt())?;

    info!(socket = %rt.daemon.config.socket_path.display(), "jobqd ready");

    loop {
        tokio::select! {
            accepted = listener.accept() => {
                if let Ok((mut stream, _addr)) = accepted {
                    match read_request(&mut stream, DEFAULT_TIMEOUT).await {
                        Ok(request) => {
                            let (response, should_exit) = dispatch::handle(&mut rt, request);
                            if let Err(e) = write_response(&mut stream, &response, DEFAULT_TIMEOUT).await {
                                warn!(error = %e, "failed to send response");
                            }
                            if should_exit {
                                break;
                            }
                        }
                        Err(e) => {
                            warn!(error = %e, "dropping connection after a malformed request");
                        }
                    }
                }
            }

            outcome = wait_for_child(&mut rt) => {
                let (outcome, stdout, stderr) = outcome;
                dispatch::reap(&mut rt, outcome, stdout, stderr);
            }

            _ = sigterm.recv() => {
                info!("received SIGTERM, shutting down");
                break;
            }

            _ = sigint.recv() => {
                info!("received SIGINT, shutting down");
                break;
            }
        }

        dispatch::promote_if_ready(&mut rt).await;
    }

    rt.daemon.shutdown();
    Ok(())
}

/// Resolve when the active child exits, or never if no child is
/// active — lets `tokio::select!` treat "no child" as a branch that
/// simply never wins, instead of special-casing it at each call site.
async fn wait_for_child(rt: &mut Runtime) -> (jobqd_core::ExitOutcome, String, String) {
    match &mut rt.child {
        Some(handle) => {
            let status = match handle.wait().await {
                Ok(status) => status,
                Err(e) => {
                    warn!(error = %e, "failed to wait on child");
                    std::future::pending::<()>().await;
                    unreachable!()
                }
            };
            let (stdout, stderr) = handle.collect().await;
            rt.child = None;
            (to_exit_outcome(status), stdout, stderr)
        }
        None => {
            std::future::pending::<()>().await;
            unreachable!()
        }
    }
}

fn to_exit_outcome(status: jobqd_supervisor::ExitStatus) -> jobqd_core::ExitOutcome {
    match status {
        jobqd_supervisor::ExitStatus::Exited(code) => jobqd_core::ExitOutcome::Exited(code),
        jobqd_supervisor::ExitStatus::Signaled(sig) => jobqd_core::ExitOutcome::Signaled(sig),
    }
}
