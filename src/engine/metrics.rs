// Derived per-player metrics.
//
// Pure functions of a single stat line plus the season schedule. Per-game
// rates floor the divisor at one game so a zero-game player yields zeros
// rather than dividing by zero; consistency and clutch fall back to
// documented neutral defaults when the sample is too small to judge.

use serde::{Deserialize, Serialize};

use crate::roster::{Game, GameResult, PlayerStatLine};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Discipline penalty weight of a yellow card.
pub const YELLOW_CARD_WEIGHT: u32 = 3;

/// Discipline penalty weight of a green (warning) card.
pub const GREEN_CARD_WEIGHT: u32 = 1;

/// Neutral consistency for a player with no offensive output: deliberately
/// the midpoint rather than zero so bench players are not penalized for
/// never touching the ball.
pub const NEUTRAL_CONSISTENCY: f64 = 0.5;

/// Neutral clutch ratio when the sample cannot be split into win and loss
/// contexts.
pub const NEUTRAL_CLUTCH: f64 = 1.0;

/// Floor for the loss-context scoring average, keeping the clutch ratio
/// finite while still signaling a near-zero baseline.
pub const LOSS_AVG_FLOOR: f64 = 0.001;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Rate and shape statistics derived from one player's stat line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DerivedMetrics {
    pub points_per_game: f64,
    pub goals_per_game: f64,
    pub assists_per_game: f64,
    pub points_per_shot: f64,
    /// Product of SOG % and shooting % rescaled once. Not a probability:
    /// this can exceed 100 and callers must not assume boundedness.
    pub shot_quality: f64,
    /// Total touches in contested situations: shots + turnovers + draw
    /// controls + ground balls.
    pub possession_involvement: u32,
    pub turnover_rate: f64,
    /// Signed possession swing: gb + dc + ct - to. Negative for players who
    /// give the ball away more than they win it.
    pub possession_impact: i64,
    pub free_position_efficiency: f64,
    /// Linear card penalty, unbounded above.
    pub discipline_raw: u32,
    pub ground_balls_per_game: f64,
    pub draw_controls_per_game: f64,
    pub caused_turnovers_per_game: f64,
    pub turnovers_per_game: f64,
    /// 1 - capped coefficient of variation of per-game points, in [0, 1].
    pub consistency: f64,
    /// Win-context scoring average over loss-context average, >= 0.
    pub clutch_ratio: f64,
}

// ---------------------------------------------------------------------------
// Statistics helpers
// ---------------------------------------------------------------------------

fn mean(values: &[u32]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().map(|&v| v as f64).sum::<f64>() / values.len() as f64
}

/// Population standard deviation (N denominator). The per-game sequence is
/// the complete season record, not a sample from a larger one.
fn population_stddev(values: &[u32]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let m = mean(values);
    let variance = values
        .iter()
        .map(|&v| (v as f64 - m).powi(2))
        .sum::<f64>()
        / values.len() as f64;
    variance.sqrt()
}

// ---------------------------------------------------------------------------
// Consistency and clutch
// ---------------------------------------------------------------------------

/// Consistency from the per-game points sequence: 1 - min(CV, 1), where CV
/// is the coefficient of variation. A single productive game scores a
/// perfect 1.0; an empty or all-zero sequence gets the neutral default.
pub fn consistency(points: &[u32]) -> f64 {
    let m = mean(points);
    if points.len() > 1 && m > 0.0 {
        1.0 - (population_stddev(points) / m).min(1.0)
    } else if !points.is_empty() && m > 0.0 {
        1.0
    } else {
        NEUTRAL_CONSISTENCY
    }
}

/// Clutch ratio from the per-game goals sequence and the schedule's win and
/// loss labels.
///
/// The split is label-based: each entry pairs with the schedule game at the
/// same index, and the ratio compares the scoring average in wins to the
/// average in losses. A sequence that does not cover the full schedule
/// cannot be paired with the labels and gets the neutral ratio, as does a
/// schedule with no wins or no losses to compare.
pub fn clutch_ratio(goals: &[u32], schedule: &[Game]) -> f64 {
    if goals.len() != schedule.len() || schedule.is_empty() {
        return NEUTRAL_CLUTCH;
    }

    let mut in_wins = Vec::new();
    let mut in_losses = Vec::new();
    for (g, game) in goals.iter().zip(schedule) {
        match game.result {
            GameResult::Win => in_wins.push(*g),
            GameResult::Loss => in_losses.push(*g),
        }
    }
    if in_wins.is_empty() || in_losses.is_empty() {
        return NEUTRAL_CLUTCH;
    }

    let loss_avg = if in_losses.iter().sum::<u32>() > 0 {
        mean(&in_losses)
    } else {
        LOSS_AVG_FLOOR
    };
    let win_avg = mean(&in_wins);
    win_avg / loss_avg.max(LOSS_AVG_FLOOR)
}

// ---------------------------------------------------------------------------
// Main computation
// ---------------------------------------------------------------------------

/// Derive all per-player metrics from a stat line.
pub fn compute_metrics(stats: &PlayerStatLine, schedule: &[Game]) -> DerivedMetrics {
    let gp = stats.games_played.max(1) as f64;

    let possession_involvement =
        stats.shots + stats.turnovers + stats.draw_controls + stats.ground_balls;
    let possession_impact = (stats.ground_balls + stats.draw_controls + stats.caused_turnovers)
        as i64
        - stats.turnovers as i64;

    DerivedMetrics {
        points_per_game: stats.points as f64 / gp,
        goals_per_game: stats.goals as f64 / gp,
        assists_per_game: stats.assists as f64 / gp,
        points_per_shot: stats.points as f64 / stats.shots.max(1) as f64,
        shot_quality: stats.sog_pct() * stats.shooting_pct() / 100.0,
        possession_involvement,
        turnover_rate: stats.turnovers as f64 / possession_involvement.max(1) as f64,
        possession_impact,
        free_position_efficiency: stats.free_position_goals as f64
            / stats.free_position_shots.max(1) as f64
            * 100.0,
        discipline_raw: stats.yellow_cards * YELLOW_CARD_WEIGHT
            + stats.green_cards * GREEN_CARD_WEIGHT,
        ground_balls_per_game: stats.ground_balls as f64 / gp,
        draw_controls_per_game: stats.draw_controls as f64 / gp,
        caused_turnovers_per_game: stats.caused_turnovers as f64 / gp,
        turnovers_per_game: stats.turnovers as f64 / gp,
        consistency: consistency(&stats.game_log.points),
        clutch_ratio: clutch_ratio(&stats.game_log.goals, schedule),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
