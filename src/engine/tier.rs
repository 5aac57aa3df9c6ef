// Tier classification from the overall impact score.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Overall-score thresholds, evaluated high to low; first match wins.
pub const TIER_ONE_MIN: f64 = 65.0;
pub const TIER_TWO_MIN: f64 = 45.0;
pub const TIER_THREE_MIN: f64 = 25.0;

/// Discrete performance classification. Purely a function of the current
/// overall score; no hysteresis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Tier {
    ProgramDriver,
    SystemAmplifier,
    SituationalSpecialist,
    Developmental,
}

impl Tier {
    /// Classify an overall score.
    pub fn from_overall(overall: f64) -> Self {
        if overall >= TIER_ONE_MIN {
            Tier::ProgramDriver
        } else if overall >= TIER_TWO_MIN {
            Tier::SystemAmplifier
        } else if overall >= TIER_THREE_MIN {
            Tier::SituationalSpecialist
        } else {
            Tier::Developmental
        }
    }

    /// Ordinal rank, 1 (best) through 4.
    pub fn ordinal(&self) -> u8 {
        match self {
            Tier::ProgramDriver => 1,
            Tier::SystemAmplifier => 2,
            Tier::SituationalSpecialist => 3,
            Tier::Developmental => 4,
        }
    }

    /// Display label.
    pub fn label(&self) -> &'static str {
        match self {
            Tier::ProgramDriver => "Program Driver",
            Tier::SystemAmplifier => "System Amplifier",
            Tier::SituationalSpecialist => "Situational Specialist",
            Tier::Developmental => "Developmental",
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Tier {} ({})", self.ordinal(), self.label())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
