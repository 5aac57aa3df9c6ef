// Development flag rules.
//
// Each rule is an independent predicate over raw stats, derived metrics,
// and category scores. Rules never suppress one another; the fixed
// evaluation order below is also the display order.

use serde::{Deserialize, Serialize};

use crate::engine::metrics::DerivedMetrics;
use crate::engine::scoring::CategoryScores;
use crate::roster::{PlayerStatLine, Position};

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// How a flag should be read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Polarity {
    Positive,
    Negative,
    Warning,
    Info,
}

/// One qualitative tag on a player. A player may carry zero or many; flags
/// are not mutually exclusive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flag {
    pub label: String,
    pub polarity: Polarity,
}

fn flag(label: &str, polarity: Polarity) -> Flag {
    Flag {
        label: label.to_string(),
        polarity,
    }
}

// ---------------------------------------------------------------------------
// Rule thresholds
// ---------------------------------------------------------------------------

pub const TURNOVER_RISK_PER_GAME: f64 = 2.0;
pub const FINISHER_MIN_SH_PCT: f64 = 50.0;
pub const FINISHER_MIN_SHOTS: u32 = 5;
pub const SHOT_SELECTION_MAX_SH_PCT: f64 = 30.0;
pub const SHOT_SELECTION_MIN_SHOTS: u32 = 10;
pub const FP_SPECIALIST_MIN_EFFICIENCY: f64 = 70.0;
pub const FP_SPECIALIST_MIN_ATTEMPTS: u32 = 3;
pub const DISRUPTOR_MIN_CT_PER_GAME: f64 = 1.5;
pub const DRAW_ENGINE_MIN_DC_PER_GAME: f64 = 3.0;
pub const GB_MAGNET_MIN_GB_PER_GAME: f64 = 1.5;
pub const RELIABLE_MIN_CONSISTENCY: f64 = 0.7;
pub const VARIANCE_MAX_CONSISTENCY: f64 = 0.4;
pub const CONTRIBUTOR_MIN_POINTS: u32 = 3;
pub const CLUTCH_MIN_RATIO: f64 = 1.5;
pub const CLUTCH_MIN_GOALS: u32 = 3;
pub const DISCIPLINE_CONCERN_MAX_SCORE: f64 = 60.0;
pub const GK_SOLID_SAVE_PCT: f64 = 40.0;
pub const GK_LOW_GAA: f64 = 10.0;
pub const GK_HIGH_GAA: f64 = 14.0;
pub const PLAYMAKER_MIN_ASSISTS_PER_GAME: f64 = 2.0;
pub const LIMITED_IMPACT_MAX_GROUND_BALLS: u32 = 2;

// ---------------------------------------------------------------------------
// Evaluation
// ---------------------------------------------------------------------------

/// Evaluate the full rule set for one player.
pub fn evaluate_flags(
    stats: &PlayerStatLine,
    metrics: &DerivedMetrics,
    scores: &CategoryScores,
) -> Vec<Flag> {
    let mut flags = Vec::new();

    if metrics.turnovers_per_game >= TURNOVER_RISK_PER_GAME && stats.points > 0 {
        flags.push(flag("High Turnover Risk", Polarity::Negative));
    }
    if stats.shooting_pct() >= FINISHER_MIN_SH_PCT && stats.shots >= FINISHER_MIN_SHOTS {
        flags.push(flag("Elite Finisher", Polarity::Positive));
    }
    if stats.shooting_pct() < SHOT_SELECTION_MAX_SH_PCT && stats.shots >= SHOT_SELECTION_MIN_SHOTS
    {
        flags.push(flag("Shot Selection Concern", Polarity::Warning));
    }
    if metrics.free_position_efficiency >= FP_SPECIALIST_MIN_EFFICIENCY
        && stats.free_position_shots >= FP_SPECIALIST_MIN_ATTEMPTS
    {
        flags.push(flag("FP Specialist", Polarity::Positive));
    }
    if metrics.caused_turnovers_per_game >= DISRUPTOR_MIN_CT_PER_GAME {
        flags.push(flag("Defensive Disruptor", Polarity::Positive));
    }
    if metrics.draw_controls_per_game >= DRAW_ENGINE_MIN_DC_PER_GAME {
        flags.push(flag("Draw Control Engine", Polarity::Positive));
    }
    if metrics.ground_balls_per_game >= GB_MAGNET_MIN_GB_PER_GAME {
        flags.push(flag("Ground Ball Magnet", Polarity::Positive));
    }
    if metrics.consistency >= RELIABLE_MIN_CONSISTENCY && stats.points > CONTRIBUTOR_MIN_POINTS {
        flags.push(flag("Reliable Contributor", Polarity::Info));
    }
    if metrics.consistency < VARIANCE_MAX_CONSISTENCY && stats.points > CONTRIBUTOR_MIN_POINTS {
        flags.push(flag("High Variance", Polarity::Warning));
    }
    if metrics.clutch_ratio >= CLUTCH_MIN_RATIO && stats.goals >= CLUTCH_MIN_GOALS {
        flags.push(flag("Clutch Performer", Polarity::Positive));
    }
    if scores.discipline <= DISCIPLINE_CONCERN_MAX_SCORE {
        flags.push(flag("Discipline Concern", Polarity::Warning));
    }
    if stats.position == Position::Goalkeeper {
        if let Some(gk) = &stats.goalkeeper {
            if gk.save_pct() >= GK_SOLID_SAVE_PCT {
                flags.push(flag("Solid Save Rate", Polarity::Positive));
            }
            if gk.gaa() <= GK_LOW_GAA {
                flags.push(flag("Low GAA", Polarity::Positive));
            }
            if gk.gaa() >= GK_HIGH_GAA {
                flags.push(flag("High GAA Concern", Polarity::Negative));
            }
        }
    }
    if metrics.assists_per_game >= PLAYMAKER_MIN_ASSISTS_PER_GAME {
        flags.push(flag("Elite Playmaker", Polarity::Positive));
    }
    if stats.points == 0
        && stats.caused_turnovers == 0
        && stats.ground_balls <= LIMITED_IMPACT_MAX_GROUND_BALLS
        && stats.draw_controls == 0
    {
        flags.push(flag("Limited Impact", Polarity::Negative));
    }

    flags
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
