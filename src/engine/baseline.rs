// Team baseline calculation.
//
// Scans the active subset of the roster (players with enough games to
// produce stable rates) and records the team-wide maxima used as
// normalization denominators by the scoring engine. Small-sample players
// are excluded from the scan but still scored against the result.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::roster::PlayerStatLine;

/// Minimum games played for a player to contribute to the baseline.
pub const MIN_BASELINE_GAMES: u32 = 2;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Team-wide per-game maxima over the active subset. Recomputed on every
/// evaluation pass; never persisted independently of the roster that
/// produced it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamBaseline {
    pub max_goals_per_game: f64,
    pub max_points_per_game: f64,
    pub max_assists_per_game: f64,
    pub max_caused_turnovers_per_game: f64,
    pub max_ground_balls_per_game: f64,
    pub max_draw_controls_per_game: f64,
    pub max_possession_impact: f64,
}

#[derive(Debug, thiserror::Error)]
pub enum BaselineError {
    #[error("no player has {MIN_BASELINE_GAMES}+ games played; the team baseline is undefined")]
    EmptyActiveSubset,
}

// ---------------------------------------------------------------------------
// Computation
// ---------------------------------------------------------------------------

/// Compute the team baseline over players with `gp >= MIN_BASELINE_GAMES`.
///
/// Fails when the active subset is empty: a maximum over nothing is a
/// caller precondition violation, not a recoverable state.
pub fn compute_baseline(
    roster: &BTreeMap<String, PlayerStatLine>,
) -> Result<TeamBaseline, BaselineError> {
    let active: Vec<&PlayerStatLine> = roster
        .values()
        .filter(|p| p.games_played >= MIN_BASELINE_GAMES)
        .collect();
    if active.is_empty() {
        return Err(BaselineError::EmptyActiveSubset);
    }

    let max_of = |f: &dyn Fn(&PlayerStatLine) -> f64| -> f64 {
        active
            .iter()
            .map(|&p| f(p))
            .fold(f64::NEG_INFINITY, f64::max)
    };

    // Active players are guaranteed gp >= MIN_BASELINE_GAMES, so true
    // per-game division is safe here.
    Ok(TeamBaseline {
        max_goals_per_game: max_of(&|p| p.goals as f64 / p.games_played as f64),
        max_points_per_game: max_of(&|p| p.points as f64 / p.games_played as f64),
        max_assists_per_game: max_of(&|p| p.assists as f64 / p.games_played as f64),
        max_caused_turnovers_per_game: max_of(&|p| {
            p.caused_turnovers as f64 / p.games_played as f64
        }),
        max_ground_balls_per_game: max_of(&|p| p.ground_balls as f64 / p.games_played as f64),
        max_draw_controls_per_game: max_of(&|p| p.draw_controls as f64 / p.games_played as f64),
        max_possession_impact: max_of(&|p| {
            (p.ground_balls + p.draw_controls + p.caused_turnovers) as f64 - p.turnovers as f64
        }),
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
