use std::error::Error;

/// Base trait for all application errors
pub trait CoreError: Error + Send + Sync + 'static {
    /// Error code for programmatic handling
    fn error_code(&self) -> &'static str;

    /// Whether this error should be logged as an error or warning
    fn is_user_error(&self) -> bool {
        false
    }
}

/// Common result type for the application
pub type CoreResult<T> = Result<T, Box<dyn CoreError>>;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to parse config file at '{path}': {message}")]
    ConfigParseError { path: String, message: String },

    #[error("Invalid configuration: {message}")]
    InvalidConfiguration { message: String },

    #[error("IO error reading config: {source}")]
    IoError {
        #[from]
        source: std::io::Error,
    },
}

impl CoreError for ConfigError {
    fn error_code(&self) -> &'static str {
        match self {
            ConfigError::ConfigParseError { .. } => "CONFIG_PARSE_ERROR",
            ConfigError::InvalidConfiguration { .. } => "INVALID_CONFIGURATION",
            ConfigError::IoError { .. } => "CONFIG_IO_ERROR",
        }
    }

    fn is_user_error(&self) -> bool {
        matches!(
            self,
            ConfigError::ConfigParseError { .. } | ConfigError::InvalidConfiguration { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_core_result() {
        let _result: CoreResult<i32> = Ok(42);
    }

    #[test]
    fn test_config_error_display() {
        let error = ConfigError::InvalidConfiguration {
            message: "monitor interval must be at least 1 second".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Invalid configuration: monitor interval must be at least 1 second"
        );
        assert_eq!(error.error_code(), "INVALID_CONFIGURATION");
        assert!(error.is_user_error());
    }

    #[test]
    fn test_config_parse_error() {
        let error = ConfigError::ConfigParseError {
            path: "/tmp/config.toml".to_string(),
            message: "invalid TOML syntax".to_string(),
        };
        assert_eq!(error.error_code(), "CONFIG_PARSE_ERROR");
        assert!(error.is_user_error());
    }
}
