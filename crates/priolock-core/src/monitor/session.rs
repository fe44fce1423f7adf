//! The monitor worker loop: re-resolves its captured scope against the
//! live process table and re-applies the priority, forever, until it is
//! cancelled or its target process is confirmed gone.

use std::sync::Arc;
use std::sync::mpsc::{Receiver, RecvTimeoutError, Sender, TryRecvError};

use tracing::{debug, info, warn};

use crate::enforce::operations;
use crate::gateway::PriorityGateway;
use crate::monitor::types::{CycleReport, MonitorEvent, MonitorSpec};
use crate::process::snapshot::ProcessTable;
use crate::targets::resolver;

enum TargetState {
    Alive,
    /// The pinned process id is confirmed gone from the process table.
    Lost(u32),
    /// The liveness check itself failed; treated as transient.
    Unknown(String),
}

pub(crate) fn run(
    spec: MonitorSpec,
    table: Arc<dyn ProcessTable>,
    gateway: Arc<dyn PriorityGateway>,
    cancel_rx: Receiver<()>,
    events_tx: Sender<MonitorEvent>,
    session_id: String,
) {
    info!(
        event = "core.monitor.worker_started",
        session_id = session_id.as_str(),
        scope = %spec.scope.describe(),
        level = %spec.level,
        interval_ms = spec.interval.as_millis() as u64
    );

    loop {
        // Checkpoint: a stop requested between cycles takes effect here,
        // before any further side effects.
        match cancel_rx.try_recv() {
            Ok(()) | Err(TryRecvError::Disconnected) => break,
            Err(TryRecvError::Empty) => {}
        }

        match observe_target(&spec, table.as_ref()) {
            TargetState::Lost(pid) => {
                info!(
                    event = "core.monitor.target_lost",
                    session_id = session_id.as_str(),
                    pid = pid
                );
                let _ = events_tx.send(MonitorEvent::TargetLost { pid });
                break;
            }
            TargetState::Alive => {
                let report = run_cycle(&spec, table.as_ref(), gateway.as_ref(), &session_id);
                let _ = events_tx.send(MonitorEvent::Cycle(report));
            }
            TargetState::Unknown(error) => {
                // The loop survives a bad cycle; the failure is surfaced on
                // the event channel instead.
                warn!(
                    event = "core.monitor.liveness_check_failed",
                    session_id = session_id.as_str(),
                    error = error.as_str()
                );
                let _ = events_tx.send(MonitorEvent::Cycle(CycleReport::failed(error)));
            }
        }

        // Checkpoint: the interval wait doubles as the cancellation wait,
        // so a stop request interrupts it immediately.
        match cancel_rx.recv_timeout(spec.interval) {
            Err(RecvTimeoutError::Timeout) => {}
            Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
        }
    }

    info!(
        event = "core.monitor.worker_exited",
        session_id = session_id.as_str()
    );
}

fn observe_target(spec: &MonitorSpec, table: &dyn ProcessTable) -> TargetState {
    let Some(pid) = spec.scope.pinned_pid() else {
        // Name-wide scopes keep enforcing through zero matches.
        return TargetState::Alive;
    };

    match table.process(pid) {
        Ok(Some(_)) => TargetState::Alive,
        Ok(None) => TargetState::Lost(pid),
        Err(e) => TargetState::Unknown(e.to_string()),
    }
}

fn run_cycle(
    spec: &MonitorSpec,
    table: &dyn ProcessTable,
    gateway: &dyn PriorityGateway,
    session_id: &str,
) -> CycleReport {
    match resolver::resolve(&spec.scope, table) {
        Ok(targets) => {
            let result =
                operations::apply_to_targets(gateway, &targets, spec.level, spec.disable_boost);
            debug!(
                event = "core.monitor.cycle_completed",
                session_id = session_id,
                attempted = result.attempted,
                succeeded = result.succeeded
            );
            CycleReport::applied(result)
        }
        Err(e) => {
            warn!(
                event = "core.monitor.cycle_failed",
                session_id = session_id,
                error = %e
            );
            CycleReport::failed(e.to_string())
        }
    }
}
