// Integration tests for the roster intelligence engine.
//
// These exercise the full pipeline end-to-end through the library crate's
// public API: CSV loading, invariant validation, the team baseline scan,
// per-player metrics and scores, tier classification, flags, and the
// narrative renderers, against a realistic fixture roster.

use std::collections::BTreeMap;
use std::path::Path;

use lax_intel::engine::query::{select, RosterFilter};
use lax_intel::engine::scoring::{norm, GK_GAA_CEILING, GK_SAVE_PCT_CEILING};
use lax_intel::engine::{evaluate, PlayerAggregate, TeamEvaluation, Tier};
use lax_intel::roster::{load_roster, Game, GameResult, PlayerStatLine, Position};

// ===========================================================================
// Test helpers
// ===========================================================================

/// Fixture path, relative to the project root (the cwd for `cargo test`).
const FIXTURE: &str = "tests/fixtures/roster.csv";

fn approx_eq(a: f64, b: f64, epsilon: f64) -> bool {
    (a - b).abs() < epsilon
}

/// The fixture season: three losses, then two wins.
fn schedule() -> Vec<Game> {
    [
        ("Navy", "L"),
        ("Richmond", "L"),
        ("Maryland", "L"),
        ("Liberty", "W"),
        ("Notre Dame", "W"),
    ]
    .iter()
    .map(|(opponent, tag)| Game {
        opponent: opponent.to_string(),
        result: GameResult::from_tag(tag).unwrap(),
    })
    .collect()
}

fn fixture_roster() -> BTreeMap<String, PlayerStatLine> {
    load_roster(Path::new(FIXTURE), &schedule()).expect("fixture roster loads")
}

fn fixture_evaluation() -> TeamEvaluation {
    evaluate(&fixture_roster(), &schedule()).expect("fixture evaluation succeeds")
}

fn flag_labels(aggregate: &PlayerAggregate) -> Vec<&str> {
    aggregate.flags.iter().map(|f| f.label.as_str()).collect()
}

// ===========================================================================
// End-to-end scenarios
// ===========================================================================

#[test]
fn star_attacker_end_to_end() {
    let evaluation = fixture_evaluation();
    let star = &evaluation.players["Madison Alaimo"];
    let m = &star.metrics;

    assert!(approx_eq(m.points_per_game, 5.0, 1e-9));
    assert!(approx_eq(m.goals_per_game, 2.0, 1e-9));
    assert!(approx_eq(m.points_per_shot, 25.0 / 18.0, 1e-9));
    assert_eq!(m.possession_involvement, 33);
    assert!(approx_eq(m.turnover_rate, 11.0 / 33.0, 1e-9));
    assert_eq!(m.possession_impact, -6);
    assert_eq!(m.discipline_raw, 0);

    // Consistency from [4,6,5,7,5]: mean 5.4, population stddev sqrt(1.04).
    let expected_consistency = 1.0 - 1.04f64.sqrt() / 5.4;
    assert!(approx_eq(m.consistency, expected_consistency, 1e-9));

    let labels = flag_labels(star);
    assert!(labels.contains(&"High Turnover Risk"));
    assert!(labels.contains(&"Elite Finisher"));
}

#[test]
fn team_baseline_maxima() {
    let evaluation = fixture_evaluation();
    let b = &evaluation.baseline;
    assert!(approx_eq(b.max_goals_per_game, 2.0, 1e-9));
    assert!(approx_eq(b.max_points_per_game, 5.0, 1e-9));
    assert!(approx_eq(b.max_assists_per_game, 3.0, 1e-9));
    assert!(approx_eq(b.max_caused_turnovers_per_game, 2.0, 1e-9));
    // Galica: 13 ground balls over 5 games.
    assert!(approx_eq(b.max_ground_balls_per_game, 2.6, 1e-9));
    assert!(approx_eq(b.max_draw_controls_per_game, 7.0, 1e-9));
    // Galica: 13 + 35 + 10 - 13 = 45.
    assert!(approx_eq(b.max_possession_impact, 45.0, 1e-9));
}

#[test]
fn single_game_players_are_scored_but_not_in_baseline() {
    let evaluation = fixture_evaluation();
    // Piraino played one game with a perfect shooting line; the baseline
    // goal rate still comes from the active subset.
    assert!(evaluation.players.contains_key("Jayden Piraino"));
    assert!(approx_eq(evaluation.baseline.max_goals_per_game, 2.0, 1e-9));
}

// ===========================================================================
// Boundedness and idempotence
// ===========================================================================

#[test]
fn all_scores_bounded() {
    let evaluation = fixture_evaluation();
    for (name, aggregate) in &evaluation.players {
        let s = &aggregate.scores;
        for v in [s.offensive, s.defensive, s.possession, s.efficiency, s.discipline, s.overall] {
            assert!(
                (0.0..=100.0).contains(&v),
                "{name} has a score out of bounds: {v}"
            );
        }
    }
}

#[test]
fn pipeline_is_idempotent() {
    let a = fixture_evaluation();
    let b = fixture_evaluation();
    assert_eq!(
        serde_json::to_string(&a).unwrap(),
        serde_json::to_string(&b).unwrap()
    );
}

#[test]
fn tiers_match_overall_scores() {
    let evaluation = fixture_evaluation();
    for aggregate in evaluation.players.values() {
        assert_eq!(aggregate.tier, Tier::from_overall(aggregate.scores.overall));
    }
}

// ===========================================================================
// Clutch defaults
// ===========================================================================

#[test]
fn partial_season_players_get_neutral_clutch() {
    let evaluation = fixture_evaluation();
    for name in ["Mel Josephson", "Raleigh Foster", "Jayden Piraino", "Quiet Reserve"] {
        assert_eq!(
            evaluation.players[name].metrics.clutch_ratio, 1.0,
            "{name} should have the neutral clutch ratio"
        );
    }
    // Full-season attacker: losses [0,5,3] average 8/3, wins [4,2] average 3.
    let star = &evaluation.players["Madison Alaimo"];
    assert!(approx_eq(star.metrics.clutch_ratio, 3.0 / (8.0 / 3.0), 1e-9));
}

// ===========================================================================
// Goalkeepers
// ===========================================================================

#[test]
fn goalkeeper_flag_boundaries() {
    let evaluation = fixture_evaluation();

    // Finnelle: 37.1% save rate, 10.14 GAA. Just over the Low GAA line and
    // just under the Solid Save Rate line: none of the keeper flags fire.
    let finnelle = flag_labels(&evaluation.players["Elyse Finnelle"]);
    assert!(!finnelle.contains(&"Solid Save Rate"));
    assert!(!finnelle.contains(&"Low GAA"));
    assert!(!finnelle.contains(&"High GAA Concern"));

    // Josephson: 14.90 GAA crosses the high-GAA line.
    let josephson = flag_labels(&evaluation.players["Mel Josephson"]);
    assert!(josephson.contains(&"High GAA Concern"));
    assert!(!josephson.contains(&"Solid Save Rate"));
    assert!(!josephson.contains(&"Low GAA"));
}

#[test]
fn goalkeeper_override_keeps_categories_consistent() {
    let evaluation = fixture_evaluation();
    for name in ["Elyse Finnelle", "Mel Josephson"] {
        let aggregate = &evaluation.players[name];
        let gk = aggregate.stats.goalkeeper.as_ref().expect("keeper line");
        // The displayed categories must equal the override components
        // rescaled by their weights, not the generic formulas.
        assert!(
            approx_eq(aggregate.scores.efficiency, norm(gk.save_pct(), GK_SAVE_PCT_CEILING), 1e-9),
            "{name} efficiency disagrees with the save component"
        );
        assert!(
            approx_eq(
                aggregate.scores.defensive,
                norm(GK_GAA_CEILING - gk.gaa(), GK_GAA_CEILING),
                1e-9
            ),
            "{name} defensive disagrees with the GAA component"
        );
    }
}

// ===========================================================================
// Flags on role players
// ===========================================================================

#[test]
fn anchor_defender_flags() {
    let evaluation = fixture_evaluation();
    let demark = flag_labels(&evaluation.players["Kate Demark"]);
    // 10 caused turnovers over 5 games.
    assert!(demark.contains(&"Defensive Disruptor"));
    assert!(!demark.contains(&"Limited Impact"));
}

#[test]
fn draw_specialist_flags_and_recs() {
    let evaluation = fixture_evaluation();
    let galica = &evaluation.players["Kate Galica"];
    let labels = flag_labels(galica);
    assert!(labels.contains(&"Draw Control Engine"));
    assert!(labels.contains(&"Ground Ball Magnet"));
    assert!(labels.contains(&"Defensive Disruptor"));
    assert!(galica
        .recommendations
        .iter()
        .any(|r| r.starts_with("Protect the Draw:")));
}

#[test]
fn invisible_stat_line_is_flagged_limited() {
    let evaluation = fixture_evaluation();
    let reserve = flag_labels(&evaluation.players["Quiet Reserve"]);
    assert!(reserve.contains(&"Limited Impact"));
}

// ===========================================================================
// Narrative artifacts
// ===========================================================================

#[test]
fn coaching_notes_render_expected_clauses() {
    let evaluation = fixture_evaluation();

    let star = &evaluation.players["Madison Alaimo"];
    assert!(star
        .coaching_note
        .starts_with("Madison Alaimo is a Jr Attacker classified as a Tier"));
    assert!(star
        .coaching_note
        .contains("primary scoring threat with 10G and 15A in 5 games"));

    let finnelle = &evaluation.players["Elyse Finnelle"];
    assert!(finnelle
        .coaching_note
        .contains("Posted a 37.1% save rate with 10.14 GAA."));
}

#[test]
fn recommendation_fallback_only_for_lower_tiers() {
    let evaluation = fixture_evaluation();
    for aggregate in evaluation.players.values() {
        if aggregate.recommendations.is_empty() {
            // An empty list is only legitimate for tiers 1 and 2.
            assert!(
                aggregate.tier.ordinal() <= 2,
                "{} (tier {}) has no recommendations",
                aggregate.stats.name,
                aggregate.tier.ordinal()
            );
        }
    }
}

// ===========================================================================
// Query layer
// ===========================================================================

#[test]
fn query_view_sorts_by_overall() {
    let evaluation = fixture_evaluation();
    let view = select(&evaluation.players, &RosterFilter::default());
    assert_eq!(view.len(), evaluation.players.len());
    for pair in view.windows(2) {
        assert!(pair[0].scores.overall >= pair[1].scores.overall);
    }
}

#[test]
fn query_filters_goalkeepers() {
    let evaluation = fixture_evaluation();
    let filter = RosterFilter {
        positions: Some(vec![Position::Goalkeeper]),
        ..Default::default()
    };
    let view = select(&evaluation.players, &filter);
    assert_eq!(view.len(), 2);
    assert!(view
        .iter()
        .all(|p| p.stats.position == Position::Goalkeeper));
}
