use sysinfo::{Pid as SysinfoPid, ProcessesToUpdate, System};

use crate::process::errors::ProcessError;
use crate::process::types::{Pid, ProcessInfo};

/// Live view of the OS process table.
///
/// Every method performs a fresh query — results are never cached across
/// calls, so two calls may disagree when processes come and go in between.
pub trait ProcessTable: Send + Sync {
    /// All live processes, sorted by name then pid.
    fn processes(&self) -> Result<Vec<ProcessInfo>, ProcessError>;

    /// Look up a single process. `Ok(None)` means it is not (or no longer)
    /// alive — not an error.
    fn process(&self, pid: u32) -> Result<Option<ProcessInfo>, ProcessError>;

    /// All live processes whose name matches exactly.
    fn processes_named(&self, name: &str) -> Result<Vec<ProcessInfo>, ProcessError>;

    /// Thread ids of one process, in whatever order the OS enumeration
    /// returns them. Empty when the process has vanished — not an error.
    fn thread_ids(&self, pid: u32) -> Result<Vec<u32>, ProcessError>;
}

/// `ProcessTable` backed by the real OS process table.
#[derive(Debug, Default)]
pub struct SystemTable;

impl SystemTable {
    pub fn new() -> Self {
        Self
    }
}

impl ProcessTable for SystemTable {
    fn processes(&self) -> Result<Vec<ProcessInfo>, ProcessError> {
        let mut system = System::new();
        system.refresh_processes(ProcessesToUpdate::All, true);

        let mut processes: Vec<ProcessInfo> = system
            .processes()
            .iter()
            .map(|(pid, process)| ProcessInfo {
                pid: Pid::from_raw(pid.as_u32()),
                name: process.name().to_string_lossy().to_string(),
            })
            .collect();

        processes.sort_by(|a, b| {
            a.name
                .cmp(&b.name)
                .then_with(|| a.pid.as_u32().cmp(&b.pid.as_u32()))
        });

        Ok(processes)
    }

    fn process(&self, pid: u32) -> Result<Option<ProcessInfo>, ProcessError> {
        let mut system = System::new();
        let pid_obj = SysinfoPid::from_u32(pid);
        system.refresh_processes(ProcessesToUpdate::Some(&[pid_obj]), true);

        Ok(system.process(pid_obj).map(|process| ProcessInfo {
            pid: Pid::from_raw(pid),
            name: process.name().to_string_lossy().to_string(),
        }))
    }

    fn processes_named(&self, name: &str) -> Result<Vec<ProcessInfo>, ProcessError> {
        Ok(self
            .processes()?
            .into_iter()
            .filter(|process| process.name == name)
            .collect())
    }

    fn thread_ids(&self, pid: u32) -> Result<Vec<u32>, ProcessError> {
        thread_ids_impl(pid)
    }
}

#[cfg(target_os = "linux")]
fn thread_ids_impl(pid: u32) -> Result<Vec<u32>, ProcessError> {
    let task_dir = format!("/proc/{}/task", pid);
    match std::fs::read_dir(&task_dir) {
        Ok(entries) => Ok(entries
            .filter_map(|entry| {
                let entry = entry.ok()?;
                entry.file_name().to_str()?.parse::<u32>().ok()
            })
            .collect()),
        // The process exited between discovery and enumeration.
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Vec::new()),
        Err(e) => Err(ProcessError::SystemError {
            message: format!("failed to read {}: {}", task_dir, e),
        }),
    }
}

#[cfg(windows)]
fn thread_ids_impl(pid: u32) -> Result<Vec<u32>, ProcessError> {
    use windows::Win32::Foundation::CloseHandle;
    use windows::Win32::System::Diagnostics::ToolHelp::{
        CreateToolhelp32Snapshot, TH32CS_SNAPTHREAD, THREADENTRY32, Thread32First, Thread32Next,
    };

    unsafe {
        let snapshot = CreateToolhelp32Snapshot(TH32CS_SNAPTHREAD, 0).map_err(|e| {
            ProcessError::SystemError {
                message: format!("CreateToolhelp32Snapshot failed: {}", e),
            }
        })?;

        let mut entry: THREADENTRY32 = std::mem::zeroed();
        entry.dwSize = std::mem::size_of::<THREADENTRY32>() as u32;

        let mut tids = Vec::new();
        if Thread32First(snapshot, &mut entry).is_ok() {
            loop {
                if entry.th32OwnerProcessID == pid {
                    tids.push(entry.th32ThreadID);
                }
                if Thread32Next(snapshot, &mut entry).is_err() {
                    break;
                }
            }
        }

        let _ = CloseHandle(snapshot);
        Ok(tids)
    }
}

#[cfg(not(any(target_os = "linux", windows)))]
fn thread_ids_impl(_pid: u32) -> Result<Vec<u32>, ProcessError> {
    // No thread enumeration on this platform; process-level operations
    // still work through the process table.
    Ok(Vec::new())
}
