//! The human-readable log file, reformatted from the completed-job
//! map on every save (spec.md §4.A). Distinct from [`crate::snapshot`],
//! which persists the same data as an opaque, reloadable blob.

use std::fs;
use std::io::Write;
use std::path::Path;

use jobqd_core::Log;

/// Render the log as plain text, one entry per completed job in id
/// order, in the format a user would actually read.
pub fn format_log(log: &Log) -> String {
    let mut out = String::from("Job queue log for executed commands:\n\n\n");
    for (id, entry) in log.iter() {
        out.push_str(&format!(
            "Command #{id} exited with returncode {}: \n    ",
            entry.returncode
        ));
        out.push_str(&entry.command);
        out.push('\n');
        out.push_str("Path: \n    ");
        out.push_str(&entry.path);
        out.push('\n');
        if !entry.stderr.is_empty() {
            out.push_str("Stderr output: \n");
            out.push_str(&entry.stderr);
            out.push('\n');
        }
        out.push_str("Stdout output: \n");
        out.push_str(&entry.stdout);
        out.push_str("\n\n\n");
    }
    out
}

/// Overwrite `path` with the current rendering of `log`. Used for both
/// the live `queue.log` and a rotated `queue-<timestamp>.log` — the
/// format is identical, only the destination differs.
pub fn write_human_log(path: &Path, log: &Log) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let mut file = fs::File::create(path)?;
    file.write_all(format_log(log).as_bytes())
}

#[cfg(test)]
#[path = "human_log_tests.rs"]
mod tests;
