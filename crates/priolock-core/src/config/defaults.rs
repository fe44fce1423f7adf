//! Default implementations for configuration types.

use crate::config::types::{ApplySection, MonitorSection};

/// Returns the default monitor interval in seconds (2).
///
/// Frequent enough to counteract external priority changes promptly,
/// infrequent enough that the enforcement loop itself stays negligible.
///
/// Used by serde `#[serde(default = "...")]` attribute.
pub fn default_interval_secs() -> u64 {
    2
}

/// Returns whether priority boost is disabled by default (true).
///
/// Leaving boost enabled lets the scheduler temporarily override the
/// priority this tool just pinned, which defeats lock mode.
///
/// Used by serde `#[serde(default = "...")]` attribute.
pub fn default_disable_boost() -> bool {
    true
}

impl Default for MonitorSection {
    fn default() -> Self {
        Self {
            interval_secs: default_interval_secs(),
        }
    }
}

impl Default for ApplySection {
    fn default() -> Self {
        Self {
            disable_boost: default_disable_boost(),
        }
    }
}
