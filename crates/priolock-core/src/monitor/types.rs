use std::time::Duration;

use serde::Serialize;

use crate::enforce::types::BatchResult;
use crate::monitor::errors::MonitorError;
use crate::priority::types::ThreadPriorityLevel;
use crate::targets::types::TargetScope;

/// What a monitor session enforces, captured once at start.
///
/// The scope is not re-derived from caller state while the loop runs —
/// changing the selection means stopping this session and starting a new
/// one.
#[derive(Debug, Clone)]
pub struct MonitorSpec {
    pub scope: TargetScope,
    pub level: ThreadPriorityLevel,
    pub interval: Duration,
    pub disable_boost: bool,
}

impl MonitorSpec {
    pub const MIN_INTERVAL: Duration = Duration::from_secs(1);

    pub fn validate(&self) -> Result<(), MonitorError> {
        if self.interval < Self::MIN_INTERVAL {
            return Err(MonitorError::IntervalTooShort {
                got_ms: self.interval.as_millis() as u64,
                min_ms: Self::MIN_INTERVAL.as_millis() as u64,
            });
        }
        Ok(())
    }
}

/// One enforcement cycle's outcome, as reported on the session's event
/// channel. A transient OS error does not stop the loop; it shows up here.
#[derive(Debug, Clone, Serialize)]
pub struct CycleReport {
    pub result: BatchResult,
    pub error: Option<String>,
    pub completed_at: String,
}

impl CycleReport {
    pub(crate) fn applied(result: BatchResult) -> Self {
        Self {
            result,
            error: None,
            completed_at: chrono::Utc::now().to_rfc3339(),
        }
    }

    pub(crate) fn failed(error: String) -> Self {
        Self {
            result: BatchResult::default(),
            error: Some(error),
            completed_at: chrono::Utc::now().to_rfc3339(),
        }
    }
}

/// Notifications a monitor session sends to its caller.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MonitorEvent {
    /// One resolve+apply cycle finished.
    Cycle(CycleReport),
    /// The monitored process is confirmed gone; sent at most once per
    /// session, right before the loop stops itself.
    TargetLost { pid: u32 },
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spec(interval: Duration) -> MonitorSpec {
        MonitorSpec {
            scope: TargetScope::Process { pid: 42 },
            level: ThreadPriorityLevel::Normal,
            interval,
            disable_boost: true,
        }
    }

    #[test]
    fn test_minimum_interval_accepted() {
        assert!(spec(Duration::from_secs(1)).validate().is_ok());
        assert!(spec(Duration::from_secs(3600)).validate().is_ok());
    }

    #[test]
    fn test_sub_second_interval_rejected() {
        let err = spec(Duration::from_millis(999)).validate().unwrap_err();
        assert!(matches!(
            err,
            MonitorError::IntervalTooShort {
                got_ms: 999,
                min_ms: 1000
            }
        ));
    }

    #[test]
    fn test_cycle_report_serializes() {
        let report = CycleReport::applied(BatchResult {
            attempted: 3,
            succeeded: 3,
        });
        let json = serde_json::to_string(&MonitorEvent::Cycle(report)).unwrap();
        assert!(json.contains("\"kind\":\"cycle\""));

        let json = serde_json::to_string(&MonitorEvent::TargetLost { pid: 42 }).unwrap();
        assert!(json.contains("\"kind\":\"target_lost\""));
    }
}
