//! Stub gateway for platforms without a priority backend. Process and
//! thread discovery still work; every priority call fails with a clear
//! error instead of pretending to succeed.

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

fn unsupported() -> GatewayError {
    GatewayError::Os {
        message: "priority control is not supported on this platform".to_string(),
    }
}

impl PriorityGateway for SystemGateway {
    fn thread_priority(&self, _tid: u32) -> Result<ThreadPrioritySample, GatewayError> {
        Err(unsupported())
    }

    fn set_thread_priority(
        &self,
        _tid: u32,
        _level: ThreadPriorityLevel,
    ) -> Result<(), GatewayError> {
        Err(unsupported())
    }

    fn set_thread_priority_boost(&self, _tid: u32, _disable: bool) -> Result<(), GatewayError> {
        Err(unsupported())
    }

    fn process_priority_class(&self, _pid: u32) -> Result<Option<PriorityClass>, GatewayError> {
        Err(unsupported())
    }

    fn set_process_priority_class(
        &self,
        _pid: u32,
        _class: PriorityClass,
    ) -> Result<(), GatewayError> {
        Err(unsupported())
    }
}
