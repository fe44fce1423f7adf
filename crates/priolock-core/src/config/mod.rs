//! # Configuration System
//!
//! Hierarchical TOML configuration for the priolock CLI.
//!
//! Configuration is loaded in the following order (later sources override
//! earlier ones):
//! 1. **Hardcoded defaults** - Built-in fallback values
//! 2. **User config** - `~/.priolock/config.toml`
//! 3. **Project config** - `./.priolock/config.toml`
//! 4. **CLI arguments** - Command-line flags (highest priority)
//!
//! ```toml
//! # ~/.priolock/config.toml
//! [monitor]
//! interval_secs = 2
//!
//! [apply]
//! disable_boost = true
//! ```

pub mod defaults;
pub mod loading;
pub mod types;
pub mod validation;

pub use types::{ApplySection, MonitorSection, PriolockConfig};
pub use validation::validate_config;

impl PriolockConfig {
    /// Load configuration from the hierarchy of config files.
    ///
    /// See [`loading::load_hierarchy`] for details.
    pub fn load_hierarchy() -> Result<Self, crate::errors::ConfigError> {
        loading::load_hierarchy()
    }

    /// Validate the configuration.
    ///
    /// See [`validation::validate_config`] for details.
    pub fn validate(&self) -> Result<(), crate::errors::ConfigError> {
        validation::validate_config(self)
    }

    /// The configured monitor interval as a duration.
    pub fn monitor_interval(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.monitor.interval_secs)
    }
}
