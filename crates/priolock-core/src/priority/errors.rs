use crate::errors::CoreError;

#[derive(Debug, thiserror::Error)]
pub enum PriorityError {
    #[error(
        "Unknown priority class '{name}'. Valid classes: idle, below-normal, normal, above-normal, high, realtime"
    )]
    UnknownClass { name: String },

    #[error(
        "Unknown thread priority '{name}'. Valid levels: idle, lowest, below-normal, normal, above-normal, highest, time-critical"
    )]
    UnknownLevel { name: String },
}

impl CoreError for PriorityError {
    fn error_code(&self) -> &'static str {
        match self {
            PriorityError::UnknownClass { .. } => "PRIORITY_UNKNOWN_CLASS",
            PriorityError::UnknownLevel { .. } => "PRIORITY_UNKNOWN_LEVEL",
        }
    }

    fn is_user_error(&self) -> bool {
        true
    }
}
