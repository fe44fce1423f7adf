use crate::errors::CoreError;

#[derive(Debug, thiserror::Error)]
pub enum ProcessError {
    #[error("Process '{pid}' not found")]
    NotFound { pid: u32 },

    #[error("Invalid PID: {pid}")]
    InvalidPid { pid: u32 },

    #[error("System error: {message}")]
    SystemError { message: String },
}

impl CoreError for ProcessError {
    fn error_code(&self) -> &'static str {
        match self {
            ProcessError::NotFound { .. } => "PROCESS_NOT_FOUND",
            ProcessError::InvalidPid { .. } => "PROCESS_INVALID_PID",
            ProcessError::SystemError { .. } => "PROCESS_SYSTEM_ERROR",
        }
    }

    fn is_user_error(&self) -> bool {
        matches!(
            self,
            ProcessError::NotFound { .. } | ProcessError::InvalidPid { .. }
        )
    }
}
