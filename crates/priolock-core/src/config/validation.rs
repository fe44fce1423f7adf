//! Configuration validation.

use crate::config::types::PriolockConfig;
use crate::errors::ConfigError;

/// Bounds for the monitor interval, in seconds.
pub const MIN_INTERVAL_SECS: u64 = 1;
pub const MAX_INTERVAL_SECS: u64 = 3600;

/// Validate the configuration, rejecting values the engine would refuse
/// at runtime anyway.
pub fn validate_config(config: &PriolockConfig) -> Result<(), ConfigError> {
    let interval = config.monitor.interval_secs;
    if !(MIN_INTERVAL_SECS..=MAX_INTERVAL_SECS).contains(&interval) {
        return Err(ConfigError::InvalidConfiguration {
            message: format!(
                "monitor.interval_secs must be between {} and {} (got {})",
                MIN_INTERVAL_SECS, MAX_INTERVAL_SECS, interval
            ),
        });
    }
    Ok(())
}
