// Stateless roster views.
//
// Filtering and ordering over the evaluated player map are explicit
// parameters passed per call, never process-wide state: the presentation
// layer owns its selections and asks for a fresh view each time.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use crate::engine::tier::Tier;
use crate::engine::PlayerAggregate;
use crate::roster::Position;

/// View parameters for a roster listing. `None` filters pass everything.
#[derive(Debug, Clone, Default)]
pub struct RosterFilter {
    pub positions: Option<Vec<Position>>,
    pub tiers: Option<Vec<Tier>>,
    pub min_games: u32,
}

/// Select players matching the filter, sorted by overall score descending
/// with name as the deterministic tie-break.
pub fn select<'a>(
    players: &'a BTreeMap<String, PlayerAggregate>,
    filter: &RosterFilter,
) -> Vec<&'a PlayerAggregate> {
    let mut selected: Vec<&PlayerAggregate> = players
        .values()
        .filter(|p| {
            filter
                .positions
                .as_ref()
                .map_or(true, |positions| positions.contains(&p.stats.position))
                && filter
                    .tiers
                    .as_ref()
                    .map_or(true, |tiers| tiers.contains(&p.tier))
                && p.stats.games_played >= filter.min_games
        })
        .collect();

    selected.sort_by(|a, b| {
        b.scores
            .overall
            .partial_cmp(&a.scores.overall)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.stats.name.cmp(&b.stats.name))
    });
    selected
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
