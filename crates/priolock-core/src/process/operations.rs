use tracing::debug;

use crate::gateway::PriorityGateway;
use crate::process::errors::ProcessError;
use crate::process::snapshot::ProcessTable;
use crate::process::types::{ProcessInfo, ThreadInfo};

/// All live processes, sorted by name. A fresh query each call.
pub fn list_processes(table: &dyn ProcessTable) -> Result<Vec<ProcessInfo>, ProcessError> {
    table.processes()
}

/// Check if a process with the given PID is currently running
pub fn is_process_running(table: &dyn ProcessTable, pid: u32) -> Result<bool, ProcessError> {
    Ok(table.process(pid)?.is_some())
}

/// Number of live processes sharing the given exact name.
pub fn instance_count(table: &dyn ProcessTable, name: &str) -> Result<usize, ProcessError> {
    Ok(table.processes_named(name)?.len())
}

/// One process's threads with their last-observed priorities.
///
/// Returns an empty list (not an error) when the process has vanished.
/// A thread whose priority cannot be read is still listed, with its
/// priority marked unknown.
pub fn list_threads(
    table: &dyn ProcessTable,
    gateway: &dyn PriorityGateway,
    pid: u32,
) -> Result<Vec<ThreadInfo>, ProcessError> {
    let tids = table.thread_ids(pid)?;

    let threads = tids
        .into_iter()
        .map(|tid| match gateway.thread_priority(tid) {
            Ok(sample) => ThreadInfo {
                tid,
                level: sample.level,
                raw_value: Some(sample.raw),
            },
            Err(e) => {
                debug!(
                    event = "core.process.thread_priority_unreadable",
                    pid = pid,
                    tid = tid,
                    error = %e
                );
                ThreadInfo {
                    tid,
                    level: None,
                    raw_value: None,
                }
            }
        })
        .collect();

    Ok(threads)
}
