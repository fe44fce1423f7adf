//! Windows gateway: real handles, opened per call with the narrowest
//! access rights and released through an RAII guard so every open is
//! paired with exactly one close, on success and failure paths alike.

use windows::Win32::Foundation::{
    CloseHandle, ERROR_ACCESS_DENIED, ERROR_INVALID_PARAMETER, GetLastError, HANDLE,
};
use windows::Win32::System::Threading::{
    GetPriorityClass, GetThreadPriority, OpenProcess, OpenThread, PROCESS_ACCESS_RIGHTS,
    PROCESS_CREATION_FLAGS, PROCESS_QUERY_INFORMATION, PROCESS_SET_INFORMATION,
    SetPriorityClass, SetThreadPriority, SetThreadPriorityBoost, THREAD_ACCESS_RIGHTS,
    THREAD_PRIORITY, THREAD_PRIORITY_ERROR_RETURN, THREAD_QUERY_INFORMATION,
    THREAD_SET_INFORMATION,
};

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

/// Closes the wrapped handle exactly once when dropped.
struct OwnedHandle(HANDLE);

impl Drop for OwnedHandle {
    fn drop(&mut self) {
        unsafe {
            let _ = CloseHandle(self.0);
        }
    }
}

fn open_error(id: u32, e: windows::core::Error) -> GatewayError {
    if e.code() == ERROR_ACCESS_DENIED.to_hresult() {
        GatewayError::AccessDenied { id }
    } else if e.code() == ERROR_INVALID_PARAMETER.to_hresult() {
        // OpenThread/OpenProcess report a vanished id as an invalid
        // parameter.
        GatewayError::TargetNotFound { id }
    } else {
        GatewayError::Os {
            message: e.to_string(),
        }
    }
}

fn with_thread_handle<T>(
    tid: u32,
    rights: THREAD_ACCESS_RIGHTS,
    f: impl FnOnce(HANDLE) -> Result<T, GatewayError>,
) -> Result<T, GatewayError> {
    let handle = unsafe { OpenThread(rights, false, tid) }.map_err(|e| open_error(tid, e))?;
    let guard = OwnedHandle(handle);
    f(guard.0)
}

fn with_process_handle<T>(
    pid: u32,
    rights: PROCESS_ACCESS_RIGHTS,
    f: impl FnOnce(HANDLE) -> Result<T, GatewayError>,
) -> Result<T, GatewayError> {
    let handle = unsafe { OpenProcess(rights, false, pid) }.map_err(|e| open_error(pid, e))?;
    let guard = OwnedHandle(handle);
    f(guard.0)
}

fn call_error(id: u32, e: windows::core::Error) -> GatewayError {
    if e.code() == ERROR_ACCESS_DENIED.to_hresult() {
        GatewayError::AccessDenied { id }
    } else {
        GatewayError::Os {
            message: e.to_string(),
        }
    }
}

impl PriorityGateway for SystemGateway {
    fn thread_priority(&self, tid: u32) -> Result<ThreadPrioritySample, GatewayError> {
        with_thread_handle(tid, THREAD_QUERY_INFORMATION, |handle| {
            let raw = unsafe { GetThreadPriority(handle) };
            if raw == THREAD_PRIORITY_ERROR_RETURN.0 {
                let err = unsafe { GetLastError() };
                return Err(GatewayError::Os {
                    message: format!("GetThreadPriority failed: {:?}", err),
                });
            }
            Ok(ThreadPrioritySample {
                raw,
                level: ThreadPriorityLevel::from_code(raw),
            })
        })
    }

    fn set_thread_priority(
        &self,
        tid: u32,
        level: ThreadPriorityLevel,
    ) -> Result<(), GatewayError> {
        with_thread_handle(
            tid,
            THREAD_SET_INFORMATION | THREAD_QUERY_INFORMATION,
            |handle| {
                unsafe { SetThreadPriority(handle, THREAD_PRIORITY(level.code())) }
                    .map_err(|e| call_error(tid, e))
            },
        )
    }

    fn set_thread_priority_boost(&self, tid: u32, disable: bool) -> Result<(), GatewayError> {
        with_thread_handle(
            tid,
            THREAD_SET_INFORMATION | THREAD_QUERY_INFORMATION,
            |handle| {
                unsafe { SetThreadPriorityBoost(handle, disable) }
                    .map_err(|e| call_error(tid, e))
            },
        )
    }

    fn process_priority_class(&self, pid: u32) -> Result<Option<PriorityClass>, GatewayError> {
        with_process_handle(pid, PROCESS_QUERY_INFORMATION, |handle| {
            let code = unsafe { GetPriorityClass(handle) };
            if code == 0 {
                let err = unsafe { GetLastError() };
                return Err(GatewayError::Os {
                    message: format!("GetPriorityClass failed: {:?}", err),
                });
            }
            Ok(PriorityClass::from_code(code))
        })
    }

    fn set_process_priority_class(
        &self,
        pid: u32,
        class: PriorityClass,
    ) -> Result<(), GatewayError> {
        with_process_handle(pid, PROCESS_SET_INFORMATION, |handle| {
            unsafe { SetPriorityClass(handle, PROCESS_CREATION_FLAGS(class.code())) }
                .map_err(|e| call_error(pid, e))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_own_main_thread_priority() {
        let gateway = SystemGateway::new();
        let tid = unsafe { windows::Win32::System::Threading::GetCurrentThreadId() };
        let sample = gateway
            .thread_priority(tid)
            .expect("Failed to read own thread priority");
        // A freshly spawned test thread runs at Normal unless something
        // changed it.
        assert!(sample.raw >= -15 && sample.raw <= 15);
    }

    #[test]
    fn test_dead_tid_reports_not_found() {
        let gateway = SystemGateway::new();
        let result = gateway.set_thread_priority(0xFFFF_FFF0, ThreadPriorityLevel::Normal);
        assert!(result.is_err());
    }
}
