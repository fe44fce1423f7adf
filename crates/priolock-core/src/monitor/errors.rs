use crate::errors::CoreError;

#[derive(Debug, thiserror::Error)]
pub enum MonitorError {
    #[error("Monitor interval must be at least {min_ms} ms (got {got_ms} ms)")]
    IntervalTooShort { got_ms: u64, min_ms: u64 },

    #[error("Failed to spawn monitor worker: {message}")]
    WorkerSpawnFailed { message: String },
}

impl CoreError for MonitorError {
    fn error_code(&self) -> &'static str {
        match self {
            MonitorError::IntervalTooShort { .. } => "MONITOR_INTERVAL_TOO_SHORT",
            MonitorError::WorkerSpawnFailed { .. } => "MONITOR_WORKER_SPAWN_FAILED",
        }
    }

    fn is_user_error(&self) -> bool {
        matches!(self, MonitorError::IntervalTooShort { .. })
    }
}
