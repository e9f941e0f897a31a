//! jobqd-wire: the request/reply schema and the length-prefixed JSON
//! framing used to carry it over the daemon's local socket.
//!
//! Deliberately split in two, mirroring the layering spec.md §9 calls
//! for: [`protocol`] defines *what* a request or reply means, and
//! [`framing`] defines *how* bytes of either cross the wire. Neither
//! module knows about the other's sibling crate.

pub mod framing;
pub mod protocol;

pub use framing::{read_request, write_response, ProtocolError, DEFAULT_TIMEOUT};
pub use protocol::{
    CurrentExit, DaemonStatus, JobEntry, ProcessState, Request, Response, ShowData, ShowIndex,
    ShowReply,
};
