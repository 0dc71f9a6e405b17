//! Signal phases

use serde::{Deserialize, Serialize};

/// Phase of a two-state traffic signal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    /// Traffic must wait (red)
    #[default]
    Stopped,
    /// Traffic may proceed (green)
    Clear,
}

impl Phase {
    /// The phase the signal moves to next
    pub fn toggled(self) -> Self {
        match self {
            Phase::Stopped => Phase::Clear,
            Phase::Clear => Phase::Stopped,
        }
    }

    pub(crate) fn as_u8(self) -> u8 {
        match self {
            Phase::Stopped => 0,
            Phase::Clear => 1,
        }
    }

    pub(crate) fn from_u8(raw: u8) -> Self {
        if raw == 0 { Phase::Stopped } else { Phase::Clear }
    }
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Phase::Stopped => write!(f, "stopped"),
            Phase::Clear => write!(f, "clear"),
        }
    }
}

impl std::str::FromStr for Phase {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "stopped" | "stop" | "red" => Ok(Phase::Stopped),
            "clear" | "go" | "green" => Ok(Phase::Clear),
            _ => Err(format!("Unknown phase: {}. Use: stopped (red) or clear (green)", s)),
        }
    }
}
