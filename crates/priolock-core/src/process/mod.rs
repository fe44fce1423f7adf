pub mod errors;
pub mod operations;
pub mod snapshot;
pub mod types;

pub use errors::ProcessError;
pub use operations::{is_process_running, list_processes, list_threads};
pub use snapshot::{ProcessTable, SystemTable};
pub use types::{Pid, ProcessInfo, ThreadInfo};
