pub mod handler;
pub mod operations;
pub mod types;

pub use handler::{apply_thread_priority, set_process_priority, spawn_apply_thread_priority};
pub use operations::{apply_process_priority, apply_to_targets};
pub use types::BatchResult;
