// Evaluation pipeline.
//
// One pass over an immutable roster snapshot: validate invariants, compute
// the team baseline, then derive each player's metrics, category scores,
// tier, flags, and coaching text. The pass either fully succeeds or fails
// on the first precondition violation; there are no partial results.

pub mod baseline;
pub mod flags;
pub mod metrics;
pub mod narrative;
pub mod query;
pub mod scoring;
pub mod tier;

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::roster::{Game, PlayerStatLine, RosterError};

pub use baseline::{BaselineError, TeamBaseline};
pub use flags::{Flag, Polarity};
pub use metrics::DerivedMetrics;
pub use scoring::CategoryScores;
pub use tier::Tier;

// ---------------------------------------------------------------------------
// Output types
// ---------------------------------------------------------------------------

/// Everything the engine derives for one player. Constructed once per
/// evaluation pass and consumed read-only by the presentation layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerAggregate {
    pub stats: PlayerStatLine,
    pub metrics: DerivedMetrics,
    pub scores: CategoryScores,
    pub tier: Tier,
    pub flags: Vec<Flag>,
    pub coaching_note: String,
    pub recommendations: Vec<String>,
}

/// The engine's output: per-player aggregates plus the baseline that
/// normalized them, exposed for transparency (formula-reference displays).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamEvaluation {
    pub baseline: TeamBaseline,
    pub players: BTreeMap<String, PlayerAggregate>,
}

#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error(transparent)]
    Roster(#[from] RosterError),

    #[error(transparent)]
    Baseline(#[from] BaselineError),
}

// ---------------------------------------------------------------------------
// Pipeline
// ---------------------------------------------------------------------------

/// Run the full evaluation pass.
///
/// The baseline scan completes before any player is scored (scores
/// normalize against the team maxima). Re-running on identical input
/// yields bit-identical output; no state carries between runs.
pub fn evaluate(
    roster: &BTreeMap<String, PlayerStatLine>,
    schedule: &[Game],
) -> Result<TeamEvaluation, EngineError> {
    for player in roster.values() {
        player.validate(schedule.len())?;
    }

    let baseline = baseline::compute_baseline(roster)?;

    let mut players = BTreeMap::new();
    for (name, stats) in roster {
        let metrics = metrics::compute_metrics(stats, schedule);
        let scores = scoring::compute_scores(stats, &metrics, &baseline);
        let tier = Tier::from_overall(scores.overall);
        let flags = flags::evaluate_flags(stats, &metrics, &scores);
        let coaching_note = narrative::coaching_note(stats, &metrics, &scores, tier, &flags);
        let recommendations = narrative::recommendations(stats, &metrics, &scores, tier);

        players.insert(
            name.clone(),
            PlayerAggregate {
                stats: stats.clone(),
                metrics,
                scores,
                tier,
                flags,
                coaching_note,
                recommendations,
            },
        );
    }

    Ok(TeamEvaluation { baseline, players })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
