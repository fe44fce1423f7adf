use serde::{Deserialize, Serialize};

/// What a priority application should affect.
///
/// Constructed fresh per operation from the caller's current selection;
/// never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TargetScope {
    /// Explicitly selected threads of one process. Carries one or many ids.
    Threads { pid: u32, tids: Vec<u32> },
    /// Every thread of one process.
    Process { pid: u32 },
    /// Every thread of every live process with this exact name.
    AllNamed { name: String },
}

impl TargetScope {
    /// The specific process id this scope is pinned to, if any. A monitor
    /// session watching a pinned scope stops itself once that process is
    /// confirmed gone; name-wide scopes keep running through zero matches.
    pub fn pinned_pid(&self) -> Option<u32> {
        match self {
            TargetScope::Threads { pid, .. } | TargetScope::Process { pid } => Some(*pid),
            TargetScope::AllNamed { .. } => None,
        }
    }

    /// Short human-readable description for status messages.
    pub fn describe(&self) -> String {
        match self {
            TargetScope::Threads { pid, tids } if tids.len() == 1 => {
                format!("thread {} of PID {}", tids[0], pid)
            }
            TargetScope::Threads { pid, tids } => {
                format!("{} threads of PID {}", tids.len(), pid)
            }
            TargetScope::Process { pid } => format!("PID {}", pid),
            TargetScope::AllNamed { name } => format!("all '{}' instances", name),
        }
    }
}

/// One concrete thread to act on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TargetThread {
    pub pid: u32,
    pub tid: u32,
}
