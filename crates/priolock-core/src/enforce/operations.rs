use tracing::{debug, info, warn};

use crate::enforce::types::BatchResult;
use crate::gateway::{GatewayError, PriorityGateway};
use crate::priority::types::{PriorityClass, ThreadPriorityLevel};
use crate::targets::types::TargetThread;

/// Apply one thread priority level to every resolved target.
///
/// A target counts as succeeded only when both the priority set and the
/// boost toggle went through. One target's failure never aborts the batch.
pub fn apply_to_targets(
    gateway: &dyn PriorityGateway,
    targets: &[TargetThread],
    level: ThreadPriorityLevel,
    disable_boost: bool,
) -> BatchResult {
    let mut succeeded = 0u32;

    for target in targets {
        match apply_to_thread(gateway, target.tid, level, disable_boost) {
            Ok(()) => succeeded += 1,
            Err(e) => {
                debug!(
                    event = "core.enforce.target_failed",
                    pid = target.pid,
                    tid = target.tid,
                    error = %e
                );
            }
        }
    }

    BatchResult {
        attempted: targets.len() as u32,
        succeeded,
    }
}

fn apply_to_thread(
    gateway: &dyn PriorityGateway,
    tid: u32,
    level: ThreadPriorityLevel,
    disable_boost: bool,
) -> Result<(), GatewayError> {
    gateway.set_thread_priority(tid, level)?;
    gateway.set_thread_priority_boost(tid, disable_boost)?;
    Ok(())
}

/// Set one process's priority class. Returns false (not an error) when the
/// process could not be opened or the call failed.
pub fn apply_process_priority(
    gateway: &dyn PriorityGateway,
    pid: u32,
    class: PriorityClass,
) -> bool {
    match gateway.set_process_priority_class(pid, class) {
        Ok(()) => {
            info!(
                event = "core.enforce.process_class_set",
                pid = pid,
                class = %class
            );
            true
        }
        Err(e) => {
            warn!(
                event = "core.enforce.process_class_failed",
                pid = pid,
                class = %class,
                error = %e
            );
            false
        }
    }
}
