use crate::errors::CoreError;

/// Failures from the OS priority calls.
///
/// `AccessDenied` and `TargetNotFound` are distinguished on a best-effort
/// basis — the underlying OS error code is ambiguous in places, and
/// anything unclassifiable lands in `Os`.
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    #[error("Access denied for id {id}")]
    AccessDenied { id: u32 },

    #[error("Target {id} no longer exists")]
    TargetNotFound { id: u32 },

    #[error("OS error: {message}")]
    Os { message: String },
}

impl CoreError for GatewayError {
    fn error_code(&self) -> &'static str {
        match self {
            GatewayError::AccessDenied { .. } => "GATEWAY_ACCESS_DENIED",
            GatewayError::TargetNotFound { .. } => "GATEWAY_TARGET_NOT_FOUND",
            GatewayError::Os { .. } => "GATEWAY_OS_ERROR",
        }
    }

    fn is_user_error(&self) -> bool {
        matches!(
            self,
            GatewayError::AccessDenied { .. } | GatewayError::TargetNotFound { .. }
        )
    }
}
