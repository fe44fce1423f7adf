pub mod errors;

#[cfg(target_os = "linux")]
mod linux;
#[cfg(not(any(target_os = "linux", windows)))]
mod unsupported;
#[cfg(windows)]
mod windows;

pub use errors::GatewayError;

#[cfg(target_os = "linux")]
pub use linux::SystemGateway;
#[cfg(not(any(target_os = "linux", windows)))]
pub use unsupported::SystemGateway;
#[cfg(windows)]
pub use windows::SystemGateway;

use crate::priority::types::{PriorityClass, ThreadPriorityLevel};

/// One observed thread priority: the raw native value plus its level
/// classification, when the value matches a known code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThreadPrioritySample {
    pub raw: i32,
    pub level: Option<ThreadPriorityLevel>,
}

/// Wraps the OS calls that read and change scheduling priorities.
///
/// Implementations own the handle discipline: any OS handle opened for a
/// call is released before the call returns, on success and failure paths
/// alike. Handles are never cached or shared between operations.
pub trait PriorityGateway: Send + Sync {
    /// Observe one thread's current priority.
    fn thread_priority(&self, tid: u32) -> Result<ThreadPrioritySample, GatewayError>;

    /// Set one thread's priority to a level from the fixed table.
    fn set_thread_priority(&self, tid: u32, level: ThreadPriorityLevel)
    -> Result<(), GatewayError>;

    /// Toggle the scheduler's dynamic priority boost for one thread.
    /// `disable = true` pins the thread to its explicitly set priority.
    fn set_thread_priority_boost(&self, tid: u32, disable: bool) -> Result<(), GatewayError>;

    /// Observe one process's priority class. `Ok(None)` when the observed
    /// value does not match any known class code.
    fn process_priority_class(&self, pid: u32) -> Result<Option<PriorityClass>, GatewayError>;

    /// Set one process's priority class.
    fn set_process_priority_class(
        &self,
        pid: u32,
        class: PriorityClass,
    ) -> Result<(), GatewayError>;
}
