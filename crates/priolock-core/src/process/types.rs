use serde::{Deserialize, Serialize};
use sysinfo::Pid as SysinfoPid;

use crate::priority::types::ThreadPriorityLevel;

/// Platform-safe process ID wrapper
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Pid(u32);

impl Pid {
    pub fn new(pid: u32) -> Result<Self, crate::process::errors::ProcessError> {
        if pid == 0 {
            return Err(crate::process::errors::ProcessError::InvalidPid { pid });
        }
        Ok(Self(pid))
    }

    pub fn from_raw(pid: u32) -> Self {
        Self(pid)
    }

    pub fn as_u32(&self) -> u32 {
        self.0
    }

    pub fn to_sysinfo_pid(&self) -> SysinfoPid {
        SysinfoPid::from_u32(self.0)
    }
}

impl From<u32> for Pid {
    fn from(pid: u32) -> Self {
        Self(pid)
    }
}

/// One live process at discovery time. A lightweight lookup key, not an
/// ownership handle — re-fetched on every discovery cycle, never mutated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessInfo {
    pub pid: Pid,
    pub name: String,
}

/// One OS thread's last-observed priority. Replaced wholesale on each
/// re-discovery.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThreadInfo {
    pub tid: u32,
    /// Observed level, when the raw value matches a known code.
    pub level: Option<ThreadPriorityLevel>,
    /// Raw native priority value, if it could be read at all.
    pub raw_value: Option<i32>,
}

impl ThreadInfo {
    /// Display string for the observed priority: a level label, a
    /// "Custom (n)" marker for off-table values, or "Unknown" when the
    /// priority could not be read.
    pub fn priority_label(&self) -> String {
        match (self.level, self.raw_value) {
            (Some(level), _) => level.label().to_string(),
            (None, Some(raw)) => format!("Custom ({})", raw),
            (None, None) => "Unknown".to_string(),
        }
    }
}
