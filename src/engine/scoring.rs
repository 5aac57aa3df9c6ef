// Category scoring and the overall impact score.
//
// Maps derived metrics into five [0, 100] category scores and a weighted
// overall score. Normalization is relative to the team baseline maxima,
// with fixed ceilings for stats that have a natural scale of their own.
// Goalkeepers with recorded minutes get a dedicated overall formula that
// also overwrites the efficiency and defensive categories so the displayed
// breakdown stays consistent with the composite.

use serde::{Deserialize, Serialize};

use crate::engine::baseline::TeamBaseline;
use crate::engine::metrics::DerivedMetrics;
use crate::roster::{PlayerStatLine, Position};

// ---------------------------------------------------------------------------
// Normalization primitive
// ---------------------------------------------------------------------------

/// A value may exceed the team maximum by up to this factor before the
/// scale saturates, rewarding outliers without an unbounded score.
pub const RATIO_CAP: f64 = 1.5;

/// Score returned when the scale itself is undefined (zero maximum).
pub const NEUTRAL_SCORE: f64 = 50.0;

/// Normalize `value` against `max_value` onto [0, 100].
///
/// Returns the neutral midpoint when `max_value` is zero: an undefined
/// scale says nothing about the player either way.
pub fn norm(value: f64, max_value: f64) -> f64 {
    if max_value == 0.0 {
        return NEUTRAL_SCORE;
    }
    (value / max_value).min(RATIO_CAP) / RATIO_CAP * 100.0
}

/// Normalization for metrics where lower is better (e.g. card penalties).
pub fn norm_inverted(value: f64, max_value: f64) -> f64 {
    100.0 - norm(value, max_value)
}

// ---------------------------------------------------------------------------
// Fixed ceilings
// ---------------------------------------------------------------------------

/// Shooting percentage ceiling: 75% is treated as a perfect mark.
pub const SHOOTING_PCT_CEILING: f64 = 75.0;

/// Shots-on-goal percentage ceiling.
pub const SOG_PCT_CEILING: f64 = 100.0;

/// Card-penalty ceiling for the defensive category's inverted term.
pub const DISCIPLINE_CEILING: f64 = 10.0;

/// Turnover-rate ceiling for the efficiency category's inverted term.
pub const TURNOVER_RATE_CEILING: f64 = 1.0;

/// Consistency ceiling (the metric is already in [0, 1]).
pub const CONSISTENCY_CEILING: f64 = 1.0;

/// Points of discipline score lost per raw card-penalty point.
pub const DISCIPLINE_PENALTY_PER_POINT: f64 = 12.0;

/// Goalkeeper save-percentage ceiling.
pub const GK_SAVE_PCT_CEILING: f64 = 60.0;

/// Goalkeeper GAA ceiling; GAA is inverted by subtracting from this.
pub const GK_GAA_CEILING: f64 = 20.0;

/// Goalkeeper overall component weights.
pub const GK_SAVE_WEIGHT: f64 = 0.40;
pub const GK_GAA_WEIGHT: f64 = 0.30;
pub const GK_GROUND_BALL_WEIGHT: f64 = 0.15;
pub const GK_DISCIPLINE_WEIGHT: f64 = 0.15;

// ---------------------------------------------------------------------------
// Position weight tables
// ---------------------------------------------------------------------------

/// Per-category weights for the overall score. Each table sums to 1.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OverallWeights {
    pub offensive: f64,
    pub defensive: f64,
    pub possession: f64,
    pub efficiency: f64,
    pub discipline: f64,
}

const ATTACKER_WEIGHTS: OverallWeights = OverallWeights {
    offensive: 0.40,
    defensive: 0.05,
    possession: 0.15,
    efficiency: 0.30,
    discipline: 0.10,
};

const MIDFIELDER_WEIGHTS: OverallWeights = OverallWeights {
    offensive: 0.25,
    defensive: 0.20,
    possession: 0.25,
    efficiency: 0.20,
    discipline: 0.10,
};

const DEFENDER_WEIGHTS: OverallWeights = OverallWeights {
    offensive: 0.05,
    defensive: 0.45,
    possession: 0.20,
    efficiency: 0.10,
    discipline: 0.20,
};

const GOALKEEPER_WEIGHTS: OverallWeights = OverallWeights {
    offensive: 0.00,
    defensive: 0.35,
    possession: 0.15,
    efficiency: 0.35,
    discipline: 0.15,
};

/// Generic table for positions outside the four known ones.
const FALLBACK_WEIGHTS: OverallWeights = OverallWeights {
    offensive: 0.25,
    defensive: 0.25,
    possession: 0.20,
    efficiency: 0.20,
    discipline: 0.10,
};

/// Overall weight table for a position.
pub fn weights_for(position: Position) -> OverallWeights {
    match position {
        Position::Attacker => ATTACKER_WEIGHTS,
        Position::Midfielder => MIDFIELDER_WEIGHTS,
        Position::Defender => DEFENDER_WEIGHTS,
        Position::Goalkeeper => GOALKEEPER_WEIGHTS,
        Position::Other => FALLBACK_WEIGHTS,
    }
}

// ---------------------------------------------------------------------------
// Category scores
// ---------------------------------------------------------------------------

/// The five category scores plus the overall composite, all in [0, 100].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryScores {
    pub offensive: f64,
    pub defensive: f64,
    pub possession: f64,
    pub efficiency: f64,
    pub discipline: f64,
    pub overall: f64,
}

/// Compute category scores for one player against the team baseline.
pub fn compute_scores(
    stats: &PlayerStatLine,
    metrics: &DerivedMetrics,
    baseline: &TeamBaseline,
) -> CategoryScores {
    let offensive = (norm(metrics.goals_per_game, baseline.max_goals_per_game) * 0.35
        + norm(stats.shooting_pct(), SHOOTING_PCT_CEILING) * 0.25
        + norm(metrics.points_per_game, baseline.max_points_per_game) * 0.25
        + norm(metrics.assists_per_game, baseline.max_assists_per_game) * 0.15)
        .clamp(0.0, 100.0);

    let mut defensive = (norm(
        metrics.caused_turnovers_per_game,
        baseline.max_caused_turnovers_per_game,
    ) * 0.45
        + norm(metrics.ground_balls_per_game, baseline.max_ground_balls_per_game) * 0.35
        + norm_inverted(metrics.discipline_raw as f64, DISCIPLINE_CEILING) * 0.20)
        .clamp(0.0, 100.0);

    let possession = (norm(metrics.possession_impact as f64, baseline.max_possession_impact)
        * 0.40
        + norm(metrics.draw_controls_per_game, baseline.max_draw_controls_per_game) * 0.35
        + norm(metrics.ground_balls_per_game, baseline.max_ground_balls_per_game) * 0.25)
        .clamp(0.0, 100.0);

    let mut efficiency = (norm(stats.shooting_pct(), SHOOTING_PCT_CEILING) * 0.30
        + norm(stats.sog_pct(), SOG_PCT_CEILING) * 0.25
        + norm_inverted(metrics.turnover_rate, TURNOVER_RATE_CEILING) * 0.25
        + norm(metrics.consistency, CONSISTENCY_CEILING) * 0.20)
        .clamp(0.0, 100.0);

    // Standalone linear penalty, not built from `norm`.
    let discipline =
        (100.0 - metrics.discipline_raw as f64 * DISCIPLINE_PENALTY_PER_POINT).max(0.0);

    let w = weights_for(stats.position);
    let mut overall = offensive * w.offensive
        + defensive * w.defensive
        + possession * w.possession
        + efficiency * w.efficiency
        + discipline * w.discipline;

    // Goalkeeper override: when save data exists, the composite comes
    // entirely from goalkeeper-specific inputs, and the efficiency and
    // defensive categories are overwritten to match the components so the
    // displayed breakdown agrees with the composite.
    if stats.position == Position::Goalkeeper {
        if let Some(gk) = &stats.goalkeeper {
            let save_component = norm(gk.save_pct(), GK_SAVE_PCT_CEILING) * GK_SAVE_WEIGHT;
            let gaa_component =
                norm(GK_GAA_CEILING - gk.gaa(), GK_GAA_CEILING) * GK_GAA_WEIGHT;
            let gb_component = norm(
                metrics.ground_balls_per_game,
                baseline.max_ground_balls_per_game,
            ) * GK_GROUND_BALL_WEIGHT;
            let discipline_component = discipline * GK_DISCIPLINE_WEIGHT;

            overall = save_component + gaa_component + gb_component + discipline_component;
            efficiency = (save_component / GK_SAVE_WEIGHT).clamp(0.0, 100.0);
            defensive = (gaa_component / GK_GAA_WEIGHT).clamp(0.0, 100.0);
        }
    }

    CategoryScores {
        offensive,
        defensive,
        possession,
        efficiency,
        discipline,
        overall: overall.clamp(0.0, 100.0),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::metrics::compute_metrics;
    use crate::roster::{Game, GameLog, GameResult, GoalkeeperLine};

    fn approx_eq(a: f64, b: f64, epsilon: f64) -> bool {
        (a - b).abs() < epsilon
    }

    fn schedule() -> Vec<Game> {
        ["L", "L", "L", "W", "W"]
            .iter()
            .map(|tag| Game {
                opponent: "Opponent".into(),
                result: GameResult::from_tag(tag).unwrap(),
            })
            .collect()
    }

    fn baseline() -> TeamBaseline {
        TeamBaseline {
            max_goals_per_game: 2.0,
            max_points_per_game: 5.0,
            max_assists_per_game: 3.0,
            max_caused_turnovers_per_game: 2.0,
            max_ground_balls_per_game: 2.6,
            max_draw_controls_per_game: 7.0,
            max_possession_impact: 45.0,
        }
    }

    fn player(position: Position) -> PlayerStatLine {
        PlayerStatLine {
            name: "Test Player".into(),
            jersey: 1,
            position,
            class_year: "So".into(),
            games_played: 5,
            games_started: 5,
            goals: 5,
            assists: 5,
            points: 10,
            shots: 10,
            shots_on_goal: 8,
            ground_balls: 5,
            draw_controls: 5,
            turnovers: 5,
            caused_turnovers: 5,
            free_position_goals: 0,
            free_position_shots: 0,
            yellow_cards: 0,
            green_cards: 0,
            game_log: GameLog {
                goals: vec![1, 1, 1, 1, 1],
                assists: vec![1, 1, 1, 1, 1],
                points: vec![2, 2, 2, 2, 2],
                shots: vec![2, 2, 2, 2, 2],
                turnovers: vec![1, 1, 1, 1, 1],
            },
            goalkeeper: None,
        }
    }

    // -- norm primitive --

    #[test]
    fn norm_zero_max_is_neutral_midpoint() {
        assert_eq!(norm(0.0, 0.0), NEUTRAL_SCORE);
        assert_eq!(norm(42.0, 0.0), NEUTRAL_SCORE);
        assert_eq!(norm(-3.0, 0.0), NEUTRAL_SCORE);
        assert_eq!(norm_inverted(42.0, 0.0), NEUTRAL_SCORE);
    }

    #[test]
    fn norm_saturates_at_ratio_cap() {
        assert_eq!(norm(15.0, 10.0), 100.0);
        assert_eq!(norm(150.0, 10.0), 100.0);
        assert_eq!(norm_inverted(15.0, 10.0), 0.0);
    }

    #[test]
    fn norm_scales_linearly_below_cap() {
        // value == max gives 1.0 / 1.5 of the scale.
        assert!(approx_eq(norm(10.0, 10.0), 100.0 / 1.5, 1e-9));
        assert!(approx_eq(norm(5.0, 10.0), 50.0 / 1.5, 1e-9));
    }

    #[test]
    fn norm_negative_value_goes_below_zero() {
        // The primitive itself is unclamped; category sums clamp.
        assert!(norm(-6.0, 45.0) < 0.0);
    }

    // -- category formulas --

    #[test]
    fn discipline_is_a_standalone_penalty() {
        let mut p = player(Position::Midfielder);
        p.yellow_cards = 1;
        p.green_cards = 2;
        let m = compute_metrics(&p, &schedule());
        let s = compute_scores(&p, &m, &baseline());
        // raw = 5, score = 100 - 60.
        assert!(approx_eq(s.discipline, 40.0, 1e-9));

        p.yellow_cards = 3;
        let m = compute_metrics(&p, &schedule());
        let s = compute_scores(&p, &m, &baseline());
        // raw = 11 would go negative; floored at zero.
        assert_eq!(s.discipline, 0.0);
    }

    #[test]
    fn offensive_formula_known_value() {
        let p = player(Position::Attacker);
        let m = compute_metrics(&p, &schedule());
        let s = compute_scores(&p, &m, &baseline());
        let expected = norm(1.0, 2.0) * 0.35
            + norm(50.0, SHOOTING_PCT_CEILING) * 0.25
            + norm(2.0, 5.0) * 0.25
            + norm(1.0, 3.0) * 0.15;
        assert!(approx_eq(s.offensive, expected, 1e-9));
    }

    #[test]
    fn categories_bounded_even_with_negative_impact() {
        let mut p = player(Position::Midfielder);
        p.ground_balls = 0;
        p.draw_controls = 0;
        p.caused_turnovers = 0;
        p.turnovers = 40;
        p.game_log.turnovers = vec![8, 8, 8, 8, 8];
        let m = compute_metrics(&p, &schedule());
        let s = compute_scores(&p, &m, &baseline());
        for v in [s.offensive, s.defensive, s.possession, s.efficiency, s.discipline, s.overall] {
            assert!((0.0..=100.0).contains(&v), "score out of bounds: {v}");
        }
    }

    #[test]
    fn overall_uses_position_weights() {
        let attacker = player(Position::Attacker);
        let defender = player(Position::Defender);
        let m_a = compute_metrics(&attacker, &schedule());
        let m_d = compute_metrics(&defender, &schedule());
        let s_a = compute_scores(&attacker, &m_a, &baseline());
        let s_d = compute_scores(&defender, &m_d, &baseline());
        // Same stat line, different weighting: categories agree but the
        // composites differ.
        assert!(approx_eq(s_a.offensive, s_d.offensive, 1e-9));
        assert!(!approx_eq(s_a.overall, s_d.overall, 1e-6));

        let w = weights_for(Position::Attacker);
        let expected = s_a.offensive * w.offensive
            + s_a.defensive * w.defensive
            + s_a.possession * w.possession
            + s_a.efficiency * w.efficiency
            + s_a.discipline * w.discipline;
        assert!(approx_eq(s_a.overall, expected, 1e-9));
    }

    #[test]
    fn unknown_position_uses_fallback_weights() {
        let p = player(Position::Other);
        let m = compute_metrics(&p, &schedule());
        let s = compute_scores(&p, &m, &baseline());
        let w = FALLBACK_WEIGHTS;
        let expected = s.offensive * w.offensive
            + s.defensive * w.defensive
            + s.possession * w.possession
            + s.efficiency * w.efficiency
            + s.discipline * w.discipline;
        assert!(approx_eq(s.overall, expected, 1e-9));
    }

    #[test]
    fn weight_tables_sum_to_one() {
        for pos in [
            Position::Attacker,
            Position::Midfielder,
            Position::Defender,
            Position::Goalkeeper,
            Position::Other,
        ] {
            let w = weights_for(pos);
            let sum = w.offensive + w.defensive + w.possession + w.efficiency + w.discipline;
            assert!(approx_eq(sum, 1.0, 1e-9), "weights for {pos:?} sum to {sum}");
        }
    }

    // -- goalkeeper override --

    fn keeper() -> PlayerStatLine {
        let mut p = player(Position::Goalkeeper);
        p.goals = 0;
        p.assists = 0;
        p.points = 0;
        p.shots = 0;
        p.shots_on_goal = 0;
        p.ground_balls = 10;
        p.draw_controls = 0;
        p.turnovers = 0;
        p.caused_turnovers = 1;
        p.game_log = GameLog {
            goals: vec![0; 5],
            assists: vec![0; 5],
            points: vec![0; 5],
            shots: vec![0; 5],
            turnovers: vec![0; 5],
        };
        p.goalkeeper = Some(GoalkeeperLine {
            minutes: 230.82,
            goals_allowed: 39,
            saves: 23,
            wins: 2,
            losses: 1,
        });
        p
    }

    #[test]
    fn goalkeeper_override_replaces_overall() {
        let p = keeper();
        let m = compute_metrics(&p, &schedule());
        let s = compute_scores(&p, &m, &baseline());
        let gk = p.goalkeeper.as_ref().unwrap();

        let save_component = norm(gk.save_pct(), GK_SAVE_PCT_CEILING) * GK_SAVE_WEIGHT;
        let gaa_component = norm(GK_GAA_CEILING - gk.gaa(), GK_GAA_CEILING) * GK_GAA_WEIGHT;
        let gb_component = norm(2.0, baseline().max_ground_balls_per_game) * GK_GROUND_BALL_WEIGHT;
        let discipline_component = s.discipline * GK_DISCIPLINE_WEIGHT;
        let expected = save_component + gaa_component + gb_component + discipline_component;

        assert!(approx_eq(s.overall, expected, 1e-9));
    }

    #[test]
    fn goalkeeper_override_rewrites_categories() {
        let p = keeper();
        let m = compute_metrics(&p, &schedule());
        let s = compute_scores(&p, &m, &baseline());
        let gk = p.goalkeeper.as_ref().unwrap();

        let save_component = norm(gk.save_pct(), GK_SAVE_PCT_CEILING) * GK_SAVE_WEIGHT;
        let gaa_component = norm(GK_GAA_CEILING - gk.gaa(), GK_GAA_CEILING) * GK_GAA_WEIGHT;
        assert!(approx_eq(s.efficiency, save_component / GK_SAVE_WEIGHT, 1e-9));
        assert!(approx_eq(s.defensive, gaa_component / GK_GAA_WEIGHT, 1e-9));
    }

    #[test]
    fn goalkeeper_without_minutes_scores_generically() {
        let mut p = keeper();
        p.goalkeeper = None;
        let m = compute_metrics(&p, &schedule());
        let s = compute_scores(&p, &m, &baseline());
        let w = weights_for(Position::Goalkeeper);
        let expected = s.offensive * w.offensive
            + s.defensive * w.defensive
            + s.possession * w.possession
            + s.efficiency * w.efficiency
            + s.discipline * w.discipline;
        assert!(approx_eq(s.overall, expected, 1e-9));
    }

    #[test]
    fn goalkeeper_with_elevated_gaa_stays_bounded() {
        let mut p = keeper();
        p.goalkeeper = Some(GoalkeeperLine {
            minutes: 60.0,
            goals_allowed: 25, // GAA 25: above the inversion ceiling
            saves: 5,
            wins: 0,
            losses: 1,
        });
        let m = compute_metrics(&p, &schedule());
        let s = compute_scores(&p, &m, &baseline());
        for v in [s.defensive, s.efficiency, s.overall] {
            assert!((0.0..=100.0).contains(&v), "score out of bounds: {v}");
        }
    }
}
