// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! jobqd-core: the queue/log data model and control state machine shared
//! by the daemon and its wire protocol.

pub mod job;
pub mod log;
pub mod queue;
pub mod state;
pub mod transitions;

pub use job::{CompletedJob, ExitOutcome, Job, JobId, JobStatus};
pub use log::Log;
pub use queue::{Queue, QueueError};
pub use state::DaemonState;
pub use transitions::{promote_decision, PromoteDecision};
