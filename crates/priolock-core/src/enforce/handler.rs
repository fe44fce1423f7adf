use std::sync::Arc;
use std::sync::mpsc;

use tracing::{error, info};

use crate::enforce::operations;
use crate::enforce::types::BatchResult;
use crate::gateway::PriorityGateway;
use crate::priority::types::{PriorityClass, ThreadPriorityLevel};
use crate::process::errors::ProcessError;
use crate::process::snapshot::ProcessTable;
use crate::targets::resolver;
use crate::targets::types::TargetScope;

/// Resolve a scope against the live process table and apply one thread
/// priority level to every resolved target.
pub fn apply_thread_priority(
    table: &dyn ProcessTable,
    gateway: &dyn PriorityGateway,
    scope: &TargetScope,
    level: ThreadPriorityLevel,
    disable_boost: bool,
) -> Result<BatchResult, ProcessError> {
    info!(
        event = "core.enforce.apply_started",
        scope = %scope.describe(),
        level = %level
    );

    let targets = resolver::resolve(scope, table)?;
    let result = operations::apply_to_targets(gateway, &targets, level, disable_boost);

    info!(
        event = "core.enforce.apply_completed",
        scope = %scope.describe(),
        level = %level,
        attempted = result.attempted,
        succeeded = result.succeeded
    );

    Ok(result)
}

/// Set one process's priority class. Returns false when it could not be
/// applied; the reason is logged, not propagated.
pub fn set_process_priority(
    gateway: &dyn PriorityGateway,
    pid: u32,
    class: PriorityClass,
) -> bool {
    operations::apply_process_priority(gateway, pid, class)
}

/// Run `apply_thread_priority` on a dedicated worker thread so the calling
/// thread is never blocked on OS calls. The result arrives on the returned
/// channel.
pub fn spawn_apply_thread_priority(
    table: Arc<dyn ProcessTable>,
    gateway: Arc<dyn PriorityGateway>,
    scope: TargetScope,
    level: ThreadPriorityLevel,
    disable_boost: bool,
) -> mpsc::Receiver<Result<BatchResult, ProcessError>> {
    let (tx, rx) = mpsc::channel();

    let spawned = std::thread::Builder::new()
        .name("priolock-apply".to_string())
        .spawn(move || {
            let result =
                apply_thread_priority(table.as_ref(), gateway.as_ref(), &scope, level, disable_boost);
            // The caller may have stopped listening; that is fine.
            let _ = tx.send(result);
        });

    if let Err(e) = spawned {
        error!(event = "core.enforce.worker_spawn_failed", error = %e);
    }

    rx
}
