use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::priority::errors::PriorityError;

/// Process-level scheduling priority (priority class).
///
/// Each variant maps to a fixed platform-defined numeric code; no other
/// values are ever handed to the OS layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PriorityClass {
    Idle,
    BelowNormal,
    Normal,
    AboveNormal,
    High,
    Realtime,
}

impl PriorityClass {
    pub const ALL: [PriorityClass; 6] = [
        PriorityClass::Idle,
        PriorityClass::BelowNormal,
        PriorityClass::Normal,
        PriorityClass::AboveNormal,
        PriorityClass::High,
        PriorityClass::Realtime,
    ];

    /// Fixed numeric code passed to the OS call.
    pub fn code(self) -> u32 {
        match self {
            PriorityClass::Idle => 0x40,
            PriorityClass::BelowNormal => 0x4000,
            PriorityClass::Normal => 0x20,
            PriorityClass::AboveNormal => 0x8000,
            PriorityClass::High => 0x80,
            PriorityClass::Realtime => 0x100,
        }
    }

    pub fn from_code(code: u32) -> Option<Self> {
        Self::ALL.into_iter().find(|class| class.code() == code)
    }

    /// Human-readable label used in status messages.
    pub fn label(self) -> &'static str {
        match self {
            PriorityClass::Idle => "Idle",
            PriorityClass::BelowNormal => "Below Normal",
            PriorityClass::Normal => "Normal",
            PriorityClass::AboveNormal => "Above Normal",
            PriorityClass::High => "High",
            PriorityClass::Realtime => "Realtime",
        }
    }
}

impl fmt::Display for PriorityClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for PriorityClass {
    type Err = PriorityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize(s).as_str() {
            "idle" => Ok(PriorityClass::Idle),
            "belownormal" => Ok(PriorityClass::BelowNormal),
            "normal" => Ok(PriorityClass::Normal),
            "abovenormal" => Ok(PriorityClass::AboveNormal),
            "high" => Ok(PriorityClass::High),
            "realtime" => Ok(PriorityClass::Realtime),
            _ => Err(PriorityError::UnknownClass {
                name: s.to_string(),
            }),
        }
    }
}

/// Thread-level scheduling priority, relative to the process's class.
///
/// The codes are a discrete set of signed offsets, not a continuous range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ThreadPriorityLevel {
    Idle,
    Lowest,
    BelowNormal,
    Normal,
    AboveNormal,
    Highest,
    TimeCritical,
}

impl ThreadPriorityLevel {
    pub const ALL: [ThreadPriorityLevel; 7] = [
        ThreadPriorityLevel::Idle,
        ThreadPriorityLevel::Lowest,
        ThreadPriorityLevel::BelowNormal,
        ThreadPriorityLevel::Normal,
        ThreadPriorityLevel::AboveNormal,
        ThreadPriorityLevel::Highest,
        ThreadPriorityLevel::TimeCritical,
    ];

    /// Fixed numeric code passed to the OS call.
    pub fn code(self) -> i32 {
        match self {
            ThreadPriorityLevel::Idle => -15,
            ThreadPriorityLevel::Lowest => -2,
            ThreadPriorityLevel::BelowNormal => -1,
            ThreadPriorityLevel::Normal => 0,
            ThreadPriorityLevel::AboveNormal => 1,
            ThreadPriorityLevel::Highest => 2,
            ThreadPriorityLevel::TimeCritical => 15,
        }
    }

    pub fn from_code(code: i32) -> Option<Self> {
        Self::ALL.into_iter().find(|level| level.code() == code)
    }

    /// Human-readable label used in status messages.
    pub fn label(self) -> &'static str {
        match self {
            ThreadPriorityLevel::Idle => "Idle",
            ThreadPriorityLevel::Lowest => "Lowest",
            ThreadPriorityLevel::BelowNormal => "Below Normal",
            ThreadPriorityLevel::Normal => "Normal",
            ThreadPriorityLevel::AboveNormal => "Above Normal",
            ThreadPriorityLevel::Highest => "Highest",
            ThreadPriorityLevel::TimeCritical => "Time Critical",
        }
    }
}

impl fmt::Display for ThreadPriorityLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for ThreadPriorityLevel {
    type Err = PriorityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize(s).as_str() {
            "idle" => Ok(ThreadPriorityLevel::Idle),
            "lowest" => Ok(ThreadPriorityLevel::Lowest),
            "belownormal" => Ok(ThreadPriorityLevel::BelowNormal),
            "normal" => Ok(ThreadPriorityLevel::Normal),
            "abovenormal" => Ok(ThreadPriorityLevel::AboveNormal),
            "highest" => Ok(ThreadPriorityLevel::Highest),
            "timecritical" => Ok(ThreadPriorityLevel::TimeCritical),
            _ => Err(PriorityError::UnknownLevel {
                name: s.to_string(),
            }),
        }
    }
}

/// Accepts "Below Normal", "below-normal" and "below_normal" spellings alike.
fn normalize(s: &str) -> String {
    s.chars()
        .filter(|c| !matches!(c, ' ' | '-' | '_'))
        .collect::<String>()
        .to_lowercase()
}
