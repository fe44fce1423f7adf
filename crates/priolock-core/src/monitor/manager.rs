use std::sync::mpsc::{Receiver, Sender, channel};
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;

use tracing::{debug, error, info};

use crate::gateway::{PriorityGateway, SystemGateway};
use crate::monitor::errors::MonitorError;
use crate::monitor::session;
use crate::monitor::types::{MonitorEvent, MonitorSpec};
use crate::process::snapshot::{ProcessTable, SystemTable};

/// Caller-side view of one monitor session: its id and the event channel
/// carrying cycle reports and the (at most one) target-lost notification.
pub struct MonitorHandle {
    session_id: String,
    events: Receiver<MonitorEvent>,
}

impl MonitorHandle {
    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    pub fn events(&self) -> &Receiver<MonitorEvent> {
        &self.events
    }
}

struct ActiveSession {
    session_id: String,
    cancel_tx: Sender<()>,
    worker: JoinHandle<()>,
}

/// Owns the single allowed monitor session per engine instance.
///
/// Starting a new session cancels and joins any previous worker under the
/// manager's lock, so no two loops ever run concurrently. Concurrent
/// one-shot applies may still race a running session on individual
/// threads; the last writer wins, which is accepted and documented.
pub struct MonitorManager {
    table: Arc<dyn ProcessTable>,
    gateway: Arc<dyn PriorityGateway>,
    active: Mutex<Option<ActiveSession>>,
}

impl MonitorManager {
    pub fn new(table: Arc<dyn ProcessTable>, gateway: Arc<dyn PriorityGateway>) -> Self {
        Self {
            table,
            gateway,
            active: Mutex::new(None),
        }
    }

    /// Manager over the real OS process table and priority gateway.
    pub fn with_system() -> Self {
        Self::new(Arc::new(SystemTable::new()), Arc::new(SystemGateway::new()))
    }

    /// Start enforcing `spec`. Performs the first cycle immediately, then
    /// one per interval. A session that is already running is stopped
    /// first — it will not fire again once this returns.
    pub fn start(&self, spec: MonitorSpec) -> Result<MonitorHandle, MonitorError> {
        spec.validate()?;

        let mut active = self.active.lock().unwrap();
        if let Some(previous) = active.take() {
            shutdown(previous);
        }

        let session_id = uuid::Uuid::new_v4().to_string();
        let (cancel_tx, cancel_rx) = channel();
        let (events_tx, events_rx) = channel();

        let table = Arc::clone(&self.table);
        let gateway = Arc::clone(&self.gateway);
        let worker_spec = spec.clone();
        let worker_id = session_id.clone();

        let worker = std::thread::Builder::new()
            .name("priolock-monitor".to_string())
            .spawn(move || {
                session::run(worker_spec, table, gateway, cancel_rx, events_tx, worker_id)
            })
            .map_err(|e| MonitorError::WorkerSpawnFailed {
                message: e.to_string(),
            })?;

        info!(
            event = "core.monitor.session_started",
            session_id = session_id.as_str(),
            scope = %spec.scope.describe(),
            level = %spec.level,
            interval_ms = spec.interval.as_millis() as u64
        );

        *active = Some(ActiveSession {
            session_id: session_id.clone(),
            cancel_tx,
            worker,
        });

        Ok(MonitorHandle {
            session_id,
            events: events_rx,
        })
    }

    /// Stop the active session, waiting for its worker to exit.
    /// Idempotent: stopping twice, or with no session running, is a no-op.
    pub fn stop(&self) {
        let previous = self.active.lock().unwrap().take();
        match previous {
            Some(session) => shutdown(session),
            None => debug!(event = "core.monitor.stop_noop"),
        }
    }

    /// Whether a session's worker is currently alive. A session that
    /// stopped itself on target loss reports false here without an
    /// explicit `stop`.
    pub fn is_running(&self) -> bool {
        self.active
            .lock()
            .unwrap()
            .as_ref()
            .is_some_and(|session| !session.worker.is_finished())
    }
}

impl Drop for MonitorManager {
    fn drop(&mut self) {
        self.stop();
    }
}

fn shutdown(session: ActiveSession) {
    // The send wakes the worker out of its interval wait; dropping the
    // sender afterwards covers a worker that was mid-cycle.
    let _ = session.cancel_tx.send(());
    drop(session.cancel_tx);

    if session.worker.join().is_err() {
        error!(
            event = "core.monitor.worker_panicked",
            session_id = session.session_id.as_str()
        );
    } else {
        info!(
            event = "core.monitor.session_stopped",
            session_id = session.session_id.as_str()
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
    use std::time::{Duration, Instant};

    use crate::gateway::{GatewayError, ThreadPrioritySample};
    use crate::priority::types::{PriorityClass, ThreadPriorityLevel};
    use crate::process::errors::ProcessError;
    use crate::process::types::{Pid, ProcessInfo};
    use crate::targets::types::TargetScope;

    /// Process table whose contents can be mutated mid-test.
    struct SharedTable {
        entries: Mutex<HashMap<u32, (String, Vec<u32>)>>,
        fail_queries: AtomicBool,
    }

    impl SharedTable {
        fn new(entries: &[(u32, &str, &[u32])]) -> Arc<Self> {
            Arc::new(Self {
                entries: Mutex::new(
                    entries
                        .iter()
                        .map(|(pid, name, tids)| (*pid, (name.to_string(), tids.to_vec())))
                        .collect(),
                ),
                fail_queries: AtomicBool::new(false),
            })
        }

        fn remove(&self, pid: u32) {
            self.entries.lock().unwrap().remove(&pid);
        }

        fn check_failure(&self) -> Result<(), ProcessError> {
            if self.fail_queries.load(Ordering::SeqCst) {
                return Err(ProcessError::SystemError {
                    message: "transient table failure".to_string(),
                });
            }
            Ok(())
        }
    }

    impl ProcessTable for SharedTable {
        fn processes(&self) -> Result<Vec<ProcessInfo>, ProcessError> {
            self.check_failure()?;
            Ok(self
                .entries
                .lock()
                .unwrap()
                .iter()
                .map(|(pid, (name, _))| ProcessInfo {
                    pid: Pid::from_raw(*pid),
                    name: name.clone(),
                })
                .collect())
        }

        fn process(&self, pid: u32) -> Result<Option<ProcessInfo>, ProcessError> {
            self.check_failure()?;
            Ok(self
                .entries
                .lock()
                .unwrap()
                .get(&pid)
                .map(|(name, _)| ProcessInfo {
                    pid: Pid::from_raw(pid),
                    name: name.clone(),
                }))
        }

        fn processes_named(&self, name: &str) -> Result<Vec<ProcessInfo>, ProcessError> {
            self.check_failure()?;
            Ok(self
                .entries
                .lock()
                .unwrap()
                .iter()
                .filter(|(_, (n, _))| n == name)
                .map(|(pid, (n, _))| ProcessInfo {
                    pid: Pid::from_raw(*pid),
                    name: n.clone(),
                })
                .collect())
        }

        fn thread_ids(&self, pid: u32) -> Result<Vec<u32>, ProcessError> {
            self.check_failure()?;
            Ok(self
                .entries
                .lock()
                .unwrap()
                .get(&pid)
                .map(|(_, tids)| tids.clone())
                .unwrap_or_default())
        }
    }

    #[derive(Default)]
    struct CountingGateway {
        applications: AtomicU32,
    }

    impl PriorityGateway for CountingGateway {
        fn thread_priority(&self, _tid: u32) -> Result<ThreadPrioritySample, GatewayError> {
            Ok(ThreadPrioritySample {
                raw: 0,
                level: Some(ThreadPriorityLevel::Normal),
            })
        }

        fn set_thread_priority(
            &self,
            _tid: u32,
            _level: ThreadPriorityLevel,
        ) -> Result<(), GatewayError> {
            self.applications.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }

        fn set_thread_priority_boost(
            &self,
            _tid: u32,
            _disable: bool,
        ) -> Result<(), GatewayError> {
            Ok(())
        }

        fn process_priority_class(
            &self,
            _pid: u32,
        ) -> Result<Option<PriorityClass>, GatewayError> {
            Ok(Some(PriorityClass::Normal))
        }

        fn set_process_priority_class(
            &self,
            _pid: u32,
            _class: PriorityClass,
        ) -> Result<(), GatewayError> {
            Ok(())
        }
    }

    fn spec_for(scope: TargetScope) -> MonitorSpec {
        MonitorSpec {
            scope,
            level: ThreadPriorityLevel::Idle,
            interval: Duration::from_secs(1),
            disable_boost: true,
        }
    }

    fn manager_with(
        table: &Arc<SharedTable>,
        gateway: &Arc<CountingGateway>,
    ) -> MonitorManager {
        MonitorManager::new(
            Arc::clone(table) as Arc<dyn ProcessTable>,
            Arc::clone(gateway) as Arc<dyn PriorityGateway>,
        )
    }

    #[test]
    fn test_start_runs_first_cycle_immediately() {
        let table = SharedTable::new(&[(4200, "notepad", &[1, 2, 3])]);
        let gateway = Arc::new(CountingGateway::default());
        let manager = manager_with(&table, &gateway);

        let handle = manager
            .start(spec_for(TargetScope::Process { pid: 4200 }))
            .unwrap();

        let event = handle
            .events()
            .recv_timeout(Duration::from_millis(500))
            .expect("First cycle should report without waiting for the interval");
        match event {
            MonitorEvent::Cycle(report) => {
                assert_eq!(report.result.attempted, 3);
                assert_eq!(report.result.succeeded, 3);
                assert!(report.error.is_none());
            }
            other => panic!("expected cycle report, got: {:?}", other),
        }
        assert!(manager.is_running());

        manager.stop();
    }

    #[test]
    fn test_interval_too_short_is_rejected() {
        let table = SharedTable::new(&[]);
        let gateway = Arc::new(CountingGateway::default());
        let manager = manager_with(&table, &gateway);

        let mut spec = spec_for(TargetScope::Process { pid: 1 });
        spec.interval = Duration::from_millis(500);

        let result = manager.start(spec);
        assert!(matches!(
            result,
            Err(MonitorError::IntervalTooShort { got_ms: 500, .. })
        ));
        assert!(!manager.is_running());
    }

    #[test]
    fn test_second_start_supersedes_first() {
        let table = SharedTable::new(&[(100, "chrome", &[1]), (200, "firefox", &[2])]);
        let gateway = Arc::new(CountingGateway::default());
        let manager = manager_with(&table, &gateway);

        let first = manager
            .start(spec_for(TargetScope::Process { pid: 100 }))
            .unwrap();
        let _second = manager
            .start(spec_for(TargetScope::Process { pid: 200 }))
            .unwrap();

        // start() joined the first worker before spawning the second, so
        // draining the first handle's channel must end in disconnection —
        // the old loop can never fire again.
        loop {
            match first.events().recv_timeout(Duration::from_secs(2)) {
                Ok(_) => continue,
                Err(std::sync::mpsc::RecvTimeoutError::Disconnected) => break,
                Err(e) => panic!("first worker still alive: {:?}", e),
            }
        }
        assert!(manager.is_running());

        manager.stop();
        assert!(!manager.is_running());
    }

    #[test]
    fn test_stop_is_idempotent() {
        let table = SharedTable::new(&[(100, "chrome", &[1])]);
        let gateway = Arc::new(CountingGateway::default());
        let manager = manager_with(&table, &gateway);

        // Stop with nothing running is a no-op.
        manager.stop();

        manager
            .start(spec_for(TargetScope::Process { pid: 100 }))
            .unwrap();
        manager.stop();
        manager.stop();
        assert!(!manager.is_running());
    }

    #[test]
    fn test_stop_interrupts_interval_wait_quickly() {
        let table = SharedTable::new(&[(100, "chrome", &[1])]);
        let gateway = Arc::new(CountingGateway::default());
        let manager = manager_with(&table, &gateway);

        let mut spec = spec_for(TargetScope::Process { pid: 100 });
        spec.interval = Duration::from_secs(3600);
        let handle = manager.start(spec).unwrap();

        // Wait for the first cycle so the worker is parked in its wait.
        handle
            .events()
            .recv_timeout(Duration::from_secs(2))
            .expect("First cycle should have run");

        let before = Instant::now();
        manager.stop();
        assert!(
            before.elapsed() < Duration::from_millis(800),
            "stop took {:?}, cancellation should interrupt the wait",
            before.elapsed()
        );
    }

    #[test]
    fn test_target_loss_stops_session_and_fires_once() {
        let table = SharedTable::new(&[(4200, "notepad", &[1, 2])]);
        let gateway = Arc::new(CountingGateway::default());
        let manager = manager_with(&table, &gateway);

        let handle = manager
            .start(spec_for(TargetScope::Process { pid: 4200 }))
            .unwrap();

        // Let the first cycle land, then terminate the target.
        handle
            .events()
            .recv_timeout(Duration::from_secs(2))
            .expect("First cycle should have run");
        table.remove(4200);

        // Drain until the channel closes; the loop must end with exactly
        // one target-lost notification.
        let mut lost_events = 0;
        loop {
            match handle.events().recv_timeout(Duration::from_secs(5)) {
                Ok(MonitorEvent::TargetLost { pid }) => {
                    assert_eq!(pid, 4200);
                    lost_events += 1;
                }
                Ok(MonitorEvent::Cycle(_)) => continue,
                Err(std::sync::mpsc::RecvTimeoutError::Disconnected) => break,
                Err(e) => panic!("worker did not notice target loss: {:?}", e),
            }
        }
        assert_eq!(lost_events, 1);
        assert!(!manager.is_running());

        // Stop after self-termination stays a no-op.
        manager.stop();
    }

    #[test]
    fn test_transient_error_surfaces_without_killing_loop() {
        let table = SharedTable::new(&[(100, "chrome", &[1])]);
        let gateway = Arc::new(CountingGateway::default());
        let manager = manager_with(&table, &gateway);

        let handle = manager
            .start(spec_for(TargetScope::AllNamed {
                name: "chrome".to_string(),
            }))
            .unwrap();

        handle
            .events()
            .recv_timeout(Duration::from_secs(2))
            .expect("First cycle should have run");

        table.fail_queries.store(true, Ordering::SeqCst);
        let event = handle
            .events()
            .recv_timeout(Duration::from_secs(5))
            .expect("Failing cycle should still report");
        match event {
            MonitorEvent::Cycle(report) => {
                assert!(report.error.is_some());
                assert_eq!(report.result.attempted, 0);
            }
            other => panic!("expected cycle report, got: {:?}", other),
        }

        // The loop survived and recovers once the table does.
        table.fail_queries.store(false, Ordering::SeqCst);
        assert!(manager.is_running());

        manager.stop();
    }

    #[test]
    fn test_dropping_manager_stops_worker() {
        let table = SharedTable::new(&[(100, "chrome", &[1])]);
        let gateway = Arc::new(CountingGateway::default());
        let manager = manager_with(&table, &gateway);

        let handle = manager
            .start(spec_for(TargetScope::Process { pid: 100 }))
            .unwrap();
        drop(manager);

        // Worker gone: the event channel disconnects.
        loop {
            match handle.events().recv_timeout(Duration::from_secs(2)) {
                Ok(_) => continue,
                Err(std::sync::mpsc::RecvTimeoutError::Disconnected) => break,
                Err(e) => panic!("worker outlived its manager: {:?}", e),
            }
        }
    }
}
