//! Linux gateway: thread and process priorities map onto nice values via
//! `getpriority`/`setpriority` on individual task ids. There is no handle
//! concept to manage here — each call is a single syscall against the id.

use tracing::trace;

use crate::gateway::errors::GatewayError;
use crate::gateway::{PriorityGateway, ThreadPrioritySample};
use crate::priority::types::{PriorityClass, ThreadPriorityLevel};

#[derive(Debug, Default)]
pub struct SystemGateway;

impl SystemGateway {
    pub fn new() -> Self {
        Self
    }
}

/// Thread priority levels expressed as nice values. Higher nice is lower
/// priority, so the sign flips relative to the level codes.
fn nice_of_level(level: ThreadPriorityLevel) -> i32 {
    match level {
        ThreadPriorityLevel::Idle => 19,
        ThreadPriorityLevel::Lowest => 10,
        ThreadPriorityLevel::BelowNormal => 5,
        ThreadPriorityLevel::Normal => 0,
        ThreadPriorityLevel::AboveNormal => -5,
        ThreadPriorityLevel::Highest => -10,
        ThreadPriorityLevel::TimeCritical => -15,
    }
}

fn level_of_nice(nice: i32) -> Option<ThreadPriorityLevel> {
    ThreadPriorityLevel::ALL
        .into_iter()
        .find(|level| nice_of_level(*level) == nice)
}

/// Priority classes expressed as nice values for the process leader.
fn nice_of_class(class: PriorityClass) -> i32 {
    match class {
        PriorityClass::Idle => 19,
        PriorityClass::BelowNormal => 10,
        PriorityClass::Normal => 0,
        PriorityClass::AboveNormal => -5,
        PriorityClass::High => -10,
        PriorityClass::Realtime => -20,
    }
}

fn class_of_nice(nice: i32) -> Option<PriorityClass> {
    PriorityClass::ALL
        .into_iter()
        .find(|class| nice_of_class(*class) == nice)
}

fn last_os_error(id: u32) -> GatewayError {
    let err = std::io::Error::last_os_error();
    match err.raw_os_error() {
        Some(libc::ESRCH) => GatewayError::TargetNotFound { id },
        Some(libc::EPERM) | Some(libc::EACCES) => GatewayError::AccessDenied { id },
        _ => GatewayError::Os {
            message: err.to_string(),
        },
    }
}

fn get_nice(id: u32) -> Result<i32, GatewayError> {
    // getpriority returns -1 both as a legitimate nice value and as the
    // error marker, so errno must be cleared before the call.
    unsafe {
        *libc::__errno_location() = 0;
        let value = libc::getpriority(libc::PRIO_PROCESS as _, id as _);
        if value == -1 && *libc::__errno_location() != 0 {
            return Err(last_os_error(id));
        }
        Ok(value)
    }
}

fn set_nice(id: u32, nice: i32) -> Result<(), GatewayError> {
    let rc = unsafe { libc::setpriority(libc::PRIO_PROCESS as _, id as _, nice) };
    if rc != 0 {
        return Err(last_os_error(id));
    }
    Ok(())
}

impl PriorityGateway for SystemGateway {
    fn thread_priority(&self, tid: u32) -> Result<ThreadPrioritySample, GatewayError> {
        let nice = get_nice(tid)?;
        Ok(ThreadPrioritySample {
            raw: nice,
            level: level_of_nice(nice),
        })
    }

    fn set_thread_priority(
        &self,
        tid: u32,
        level: ThreadPriorityLevel,
    ) -> Result<(), GatewayError> {
        set_nice(tid, nice_of_level(level))
    }

    fn set_thread_priority_boost(&self, tid: u32, disable: bool) -> Result<(), GatewayError> {
        // No dynamic priority boost on Linux; an explicitly set nice value
        // already stays put.
        trace!(
            event = "core.gateway.boost_noop",
            tid = tid,
            disable = disable
        );
        Ok(())
    }

    fn process_priority_class(&self, pid: u32) -> Result<Option<PriorityClass>, GatewayError> {
        let nice = get_nice(pid)?;
        Ok(class_of_nice(nice))
    }

    fn set_process_priority_class(
        &self,
        pid: u32,
        class: PriorityClass,
    ) -> Result<(), GatewayError> {
        set_nice(pid, nice_of_class(class))
    }
}
