use std::collections::HashSet;

use tracing::debug;

use crate::process::errors::ProcessError;
use crate::process::snapshot::ProcessTable;
use crate::targets::types::{TargetScope, TargetThread};

/// Resolve a scope against the live process table into the concrete
/// (pid, tid) pairs to act on.
///
/// The result is deduplicated and keeps the order the table yielded.
/// A referenced process that no longer exists resolves to an empty list —
/// "0 targets" is a reportable condition for the caller, not an error.
pub fn resolve(
    scope: &TargetScope,
    table: &dyn ProcessTable,
) -> Result<Vec<TargetThread>, ProcessError> {
    let mut targets = Vec::new();
    let mut seen = HashSet::new();

    match scope {
        TargetScope::Threads { pid, tids } => {
            if table.process(*pid)?.is_none() {
                debug!(event = "core.targets.process_gone", pid = pid);
                return Ok(targets);
            }
            for &tid in tids {
                push_unique(&mut targets, &mut seen, *pid, tid);
            }
        }
        TargetScope::Process { pid } => {
            for tid in table.thread_ids(*pid)? {
                push_unique(&mut targets, &mut seen, *pid, tid);
            }
        }
        TargetScope::AllNamed { name } => {
            for process in table.processes_named(name)? {
                let pid = process.pid.as_u32();
                match table.thread_ids(pid) {
                    Ok(tids) => {
                        for tid in tids {
                            push_unique(&mut targets, &mut seen, pid, tid);
                        }
                    }
                    Err(e) => {
                        // The process exited mid-enumeration; skip it for
                        // this cycle.
                        debug!(
                            event = "core.targets.instance_skipped",
                            pid = pid,
                            name = name.as_str(),
                            error = %e
                        );
                    }
                }
            }
        }
    }

    Ok(targets)
}

fn push_unique(
    targets: &mut Vec<TargetThread>,
    seen: &mut HashSet<TargetThread>,
    pid: u32,
    tid: u32,
) {
    let target = TargetThread { pid, tid };
    if seen.insert(target) {
        targets.push(target);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::process::types::{Pid, ProcessInfo};
    use std::collections::HashMap;

    struct FakeTable {
        processes: Vec<ProcessInfo>,
        threads: HashMap<u32, Vec<u32>>,
        failing_pids: HashSet<u32>,
    }

    impl FakeTable {
        fn new(entries: &[(u32, &str, &[u32])]) -> Self {
            let processes = entries
                .iter()
                .map(|(pid, name, _)| ProcessInfo {
                    pid: Pid::from_raw(*pid),
                    name: name.to_string(),
                })
                .collect();
            let threads = entries
                .iter()
                .map(|(pid, _, tids)| (*pid, tids.to_vec()))
                .collect();
            Self {
                processes,
                threads,
                failing_pids: HashSet::new(),
            }
        }
    }

    impl ProcessTable for FakeTable {
        fn processes(&self) -> Result<Vec<ProcessInfo>, ProcessError> {
            Ok(self.processes.clone())
        }

        fn process(&self, pid: u32) -> Result<Option<ProcessInfo>, ProcessError> {
            Ok(self
                .processes
                .iter()
                .find(|p| p.pid.as_u32() == pid)
                .cloned())
        }

        fn processes_named(&self, name: &str) -> Result<Vec<ProcessInfo>, ProcessError> {
            Ok(self
                .processes
                .iter()
                .filter(|p| p.name == name)
                .cloned()
                .collect())
        }

        fn thread_ids(&self, pid: u32) -> Result<Vec<u32>, ProcessError> {
            if self.failing_pids.contains(&pid) {
                return Err(ProcessError::SystemError {
                    message: "task directory vanished".to_string(),
                });
            }
            Ok(self.threads.get(&pid).cloned().unwrap_or_default())
        }
    }

    #[test]
    fn test_threads_scope_dedups_preserving_order() {
        let table = FakeTable::new(&[(1, "app", &[10, 11, 12])]);
        let scope = TargetScope::Threads {
            pid: 1,
            tids: vec![11, 10, 11],
        };

        let targets = resolve(&scope, &table).unwrap();
        assert_eq!(
            targets,
            vec![
                TargetThread { pid: 1, tid: 11 },
                TargetThread { pid: 1, tid: 10 }
            ]
        );
    }

    #[test]
    fn test_threads_scope_vanished_process_yields_empty() {
        let table = FakeTable::new(&[(1, "app", &[10])]);
        let scope = TargetScope::Threads {
            pid: 2,
            tids: vec![10],
        };

        let targets = resolve(&scope, &table).unwrap();
        assert!(targets.is_empty());
    }

    #[test]
    fn test_process_scope_keeps_enumeration_order() {
        let table = FakeTable::new(&[(4200, "notepad", &[30, 10, 20])]);
        let scope = TargetScope::Process { pid: 4200 };

        let targets = resolve(&scope, &table).unwrap();
        let tids: Vec<u32> = targets.iter().map(|t| t.tid).collect();
        assert_eq!(tids, vec![30, 10, 20]);
    }

    #[test]
    fn test_process_scope_vanished_process_yields_empty() {
        let table = FakeTable::new(&[(1, "app", &[10])]);
        let targets = resolve(&TargetScope::Process { pid: 999 }, &table).unwrap();
        assert!(targets.is_empty());
    }

    #[test]
    fn test_all_named_zero_matches_yields_empty() {
        let table = FakeTable::new(&[(1, "app", &[10])]);
        let scope = TargetScope::AllNamed {
            name: "x".to_string(),
        };

        let targets = resolve(&scope, &table).unwrap();
        assert!(targets.is_empty());
    }

    #[test]
    fn test_all_named_gathers_every_instance() {
        let table = FakeTable::new(&[
            (100, "chrome", &[1, 2]),
            (200, "chrome", &[3, 4]),
            (300, "firefox", &[5]),
        ]);
        let scope = TargetScope::AllNamed {
            name: "chrome".to_string(),
        };

        let targets = resolve(&scope, &table).unwrap();
        assert_eq!(targets.len(), 4);
        assert_eq!(
            targets,
            vec![
                TargetThread { pid: 100, tid: 1 },
                TargetThread { pid: 100, tid: 2 },
                TargetThread { pid: 200, tid: 3 },
                TargetThread { pid: 200, tid: 4 },
            ]
        );
    }

    #[test]
    fn test_all_named_requires_exact_name_match() {
        let table = FakeTable::new(&[(100, "chrome", &[1]), (200, "chrome-helper", &[2])]);
        let scope = TargetScope::AllNamed {
            name: "chrome".to_string(),
        };

        let targets = resolve(&scope, &table).unwrap();
        assert_eq!(targets, vec![TargetThread { pid: 100, tid: 1 }]);
    }

    #[test]
    fn test_all_named_skips_instance_that_exits_mid_enumeration() {
        let mut table = FakeTable::new(&[(100, "chrome", &[1, 2]), (200, "chrome", &[3, 4])]);
        table.failing_pids.insert(100);
        let scope = TargetScope::AllNamed {
            name: "chrome".to_string(),
        };

        let targets = resolve(&scope, &table).unwrap();
        assert_eq!(
            targets,
            vec![
                TargetThread { pid: 200, tid: 3 },
                TargetThread { pid: 200, tid: 4 },
            ]
        );
    }
}
