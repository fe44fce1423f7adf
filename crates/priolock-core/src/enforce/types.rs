use serde::{Deserialize, Serialize};

/// Outcome of one batch priority application.
///
/// Failures are counted, never thrown: `attempted - succeeded` targets
/// could not be updated (already dead, access denied, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BatchResult {
    pub attempted: u32,
    pub succeeded: u32,
}

impl BatchResult {
    pub fn all_succeeded(&self) -> bool {
        self.succeeded == self.attempted
    }

    pub fn failed(&self) -> u32 {
        self.attempted.saturating_sub(self.succeeded)
    }
}
