//! priolock-core: process and thread scheduling priority enforcement
//!
//! This library resolves a caller's priority intent into a concrete set of
//! OS threads, applies the change with partial-failure tolerance, and can
//! keep re-applying it on a timer until cancelled or until the target
//! process disappears. It is used by the `priolock` CLI.
//!
//! # Main Entry Points
//!
//! - [`process`] - Live process/thread discovery
//! - [`enforce`] - One-shot priority application
//! - [`monitor`] - Continuous enforcement (lock mode)
//! - [`config`] - Configuration management

pub mod config;
pub mod enforce;
pub mod errors;
pub mod events;
pub mod gateway;
pub mod logging;
pub mod monitor;
pub mod priority;
pub mod process;
pub mod targets;

// Re-export commonly used types at crate root for convenience
pub use config::PriolockConfig;
pub use enforce::types::BatchResult;
pub use gateway::{GatewayError, PriorityGateway, SystemGateway, ThreadPrioritySample};
pub use monitor::errors::MonitorError;
pub use monitor::manager::{MonitorHandle, MonitorManager};
pub use monitor::types::{CycleReport, MonitorEvent, MonitorSpec};
pub use priority::types::{PriorityClass, ThreadPriorityLevel};
pub use process::snapshot::{ProcessTable, SystemTable};
pub use process::types::{Pid, ProcessInfo, ThreadInfo};
pub use targets::types::{TargetScope, TargetThread};

// Re-export handler modules as the primary API
pub use enforce::handler as enforce_ops;
pub use process::operations as process_ops;

// Re-export logging initialization
pub use logging::init_logging;
