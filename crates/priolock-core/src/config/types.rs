//! Configuration type definitions, serialized/deserialized from TOML
//! config files.

use serde::{Deserialize, Serialize};

/// Main configuration loaded from TOML config files.
///
/// Loaded from `~/.priolock/config.toml` (user) and
/// `./.priolock/config.toml` (project); project values override user
/// values.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct PriolockConfig {
    /// Monitor (lock mode) settings
    #[serde(default)]
    pub monitor: MonitorSection,

    /// One-shot and locked priority application settings
    #[serde(default)]
    pub apply: ApplySection,
}

/// Monitor (lock mode) configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitorSection {
    /// Seconds between enforcement cycles. Must be between 1 and 3600.
    #[serde(default = "super::defaults::default_interval_secs")]
    pub interval_secs: u64,
}

/// Priority application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplySection {
    /// Whether to disable the scheduler's dynamic priority boost when
    /// setting a thread priority, pinning threads to the value set.
    #[serde(default = "super::defaults::default_disable_boost")]
    pub disable_boost: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_serialization_round_trip() {
        let config = PriolockConfig::default();
        let toml_str = toml::to_string(&config).unwrap();
        let parsed: PriolockConfig = toml::from_str(&toml_str).unwrap();
        assert_eq!(config.monitor.interval_secs, parsed.monitor.interval_secs);
        assert_eq!(config.apply.disable_boost, parsed.apply.disable_boost);
    }

    #[test]
    fn test_partial_file_falls_back_to_field_defaults() {
        let config: PriolockConfig = toml::from_str("[monitor]\ninterval_secs = 5\n").unwrap();
        assert_eq!(config.monitor.interval_secs, 5);
        assert!(config.apply.disable_boost);
    }
}
