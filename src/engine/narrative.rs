// Deterministic coaching text.
//
// Renders a free-text coaching note and an ordered list of recommendation
// strings from the same data the flag engine reads. Every clause is a
// threshold rule with its literals lifted into named constants; clause
// order is fixed, so identical input always produces identical text.

use std::fmt::Write;

use crate::engine::flags::{
    Flag, DISCIPLINE_CONCERN_MAX_SCORE, DISRUPTOR_MIN_CT_PER_GAME, DRAW_ENGINE_MIN_DC_PER_GAME,
    GB_MAGNET_MIN_GB_PER_GAME, TURNOVER_RISK_PER_GAME,
};
use crate::engine::metrics::DerivedMetrics;
use crate::engine::scoring::CategoryScores;
use crate::engine::tier::Tier;
use crate::roster::{PlayerStatLine, Position};

// ---------------------------------------------------------------------------
// Note thresholds
// ---------------------------------------------------------------------------

pub const NOTE_SCORING_THREAT_MIN_GOALS: u32 = 8;
pub const NOTE_REFINEMENT_MAX_SH_PCT: f64 = 35.0;
pub const NOTE_REFINEMENT_MIN_SHOTS: u32 = 15;
pub const NOTE_TURNOVER_CONCERN_MIN: u32 = 8;
pub const NOTE_DISTRIBUTOR_MIN_ASSISTS: u32 = 10;
pub const NOTE_DRAW_DOMINANCE_MIN: u32 = 20;
pub const NOTE_OFFENSE_MIN_POINTS: u32 = 5;
pub const NOTE_DEFENSE_MIN_CT: u32 = 5;
pub const NOTE_GROUND_BALL_MIN: u32 = 5;

/// Flag labels containing any of these substrings are cited as strengths.
const STRENGTH_KEYWORDS: &[&str] = &[
    "Elite",
    "Specialist",
    "Engine",
    "Clutch",
    "Reliable",
    "Solid",
    "Low GAA",
];

// ---------------------------------------------------------------------------
// Recommendation thresholds
// ---------------------------------------------------------------------------

pub const REC_SHOT_SELECTION_MAX_SH_PCT: f64 = 35.0;
pub const REC_SHOT_SELECTION_MIN_SHOTS: u32 = 10;
pub const REC_DUAL_THREAT_MIN_APG: f64 = 2.0;
pub const REC_DUAL_THREAT_MIN_GPG: f64 = 1.5;
pub const REC_FINISHER_MIN_GOALS: u32 = 5;
pub const REC_FINISHER_MAX_ASSISTS: u32 = 3;
pub const REC_VARIANCE_MAX_CONSISTENCY: f64 = 0.5;
pub const REC_VARIANCE_MIN_POINTS: u32 = 5;
pub const REC_SITUATIONAL_MIN_GAMES: u32 = 3;
pub const REC_TWO_WAY_MIN_POINTS: u32 = 5;
pub const REC_MID_SHOT_QUALITY_MAX_SH_PCT: f64 = 30.0;
pub const REC_MID_SHOT_QUALITY_MIN_SHOTS: u32 = 5;
pub const REC_DEVELOPMENT_MAX_CT: u32 = 3;
pub const REC_GK_SAVE_FLOOR_PCT: f64 = 40.0;
pub const REC_GK_ELEVATED_GAA: f64 = 12.0;
pub const REC_GK_PROVEN_WINS: u32 = 2;

// ---------------------------------------------------------------------------
// Coaching note
// ---------------------------------------------------------------------------

/// Tier phrase used in prose; deliberately reads "Developmental Player"
/// for tier 4 where the classifier label is just "Developmental".
fn tier_phrase(tier: Tier) -> &'static str {
    match tier {
        Tier::ProgramDriver => "Program Driver",
        Tier::SystemAmplifier => "System Amplifier",
        Tier::SituationalSpecialist => "Situational Specialist",
        Tier::Developmental => "Developmental Player",
    }
}

/// Render the coaching note for one player.
pub fn coaching_note(
    stats: &PlayerStatLine,
    _metrics: &DerivedMetrics,
    _scores: &CategoryScores,
    tier: Tier,
    flags: &[Flag],
) -> String {
    let mut note = format!(
        "{} is a {} {} classified as a Tier {} ({}). ",
        stats.name,
        stats.class_year,
        stats.position.full_name(),
        tier.ordinal(),
        tier_phrase(tier),
    );

    match stats.position {
        Position::Attacker => {
            if stats.goals >= NOTE_SCORING_THREAT_MIN_GOALS {
                let _ = write!(
                    note,
                    "She is a primary scoring threat with {}G and {}A in {} games. ",
                    stats.goals, stats.assists, stats.games_played
                );
            }
            if stats.shooting_pct() < NOTE_REFINEMENT_MAX_SH_PCT
                && stats.shots > NOTE_REFINEMENT_MIN_SHOTS
            {
                let _ = write!(
                    note,
                    "However, her {:.0}% shooting on {} shots suggests shot selection needs refinement. ",
                    stats.shooting_pct(),
                    stats.shots
                );
            }
            if stats.turnovers >= NOTE_TURNOVER_CONCERN_MIN {
                let _ = write!(
                    note,
                    "Her {} turnovers are a concern and represent a key development area. ",
                    stats.turnovers
                );
            }
            if stats.assists >= NOTE_DISTRIBUTOR_MIN_ASSISTS {
                let _ = write!(
                    note,
                    "Her {} assists make her the offense's primary distributor. ",
                    stats.assists
                );
            }
        }
        Position::Midfielder => {
            if stats.draw_controls >= NOTE_DRAW_DOMINANCE_MIN {
                let _ = write!(
                    note,
                    "She dominates the draw circle with {} draw controls. ",
                    stats.draw_controls
                );
            }
            if stats.points >= NOTE_OFFENSE_MIN_POINTS {
                let _ = write!(note, "Contributes offensively with {} points. ", stats.points);
            }
            if stats.caused_turnovers >= NOTE_DEFENSE_MIN_CT {
                let _ = write!(
                    note,
                    "Adds defensive value with {} caused turnovers. ",
                    stats.caused_turnovers
                );
            }
        }
        Position::Defender => {
            if stats.caused_turnovers >= NOTE_DEFENSE_MIN_CT {
                let _ = write!(
                    note,
                    "An elite defender with {} caused turnovers. ",
                    stats.caused_turnovers
                );
            }
            if stats.ground_balls >= NOTE_GROUND_BALL_MIN {
                let _ = write!(note, "Active on ground balls ({}). ", stats.ground_balls);
            }
        }
        Position::Goalkeeper => {
            if let Some(gk) = &stats.goalkeeper {
                let _ = write!(
                    note,
                    "Posted a {:.1}% save rate with {:.2} GAA. ",
                    gk.save_pct(),
                    gk.gaa()
                );
            }
        }
        Position::Other => {}
    }

    let strengths: Vec<&str> = flags
        .iter()
        .map(|f| f.label.as_str())
        .filter(|label| STRENGTH_KEYWORDS.iter().any(|kw| label.contains(kw)))
        .collect();
    if !strengths.is_empty() {
        let _ = write!(note, "Key strengths: {}. ", strengths.join(", "));
    }

    note
}

// ---------------------------------------------------------------------------
// Recommendations
// ---------------------------------------------------------------------------

/// Render the ordered recommendation list for one player.
///
/// Position rules run first, in a fixed order. When none fires, a single
/// tier-based fallback is emitted for tiers 3 and 4 only; tier 1 and 2
/// players may legitimately get an empty list.
pub fn recommendations(
    stats: &PlayerStatLine,
    metrics: &DerivedMetrics,
    scores: &CategoryScores,
    tier: Tier,
) -> Vec<String> {
    let mut recs = Vec::new();
    let name = &stats.name;

    match stats.position {
        Position::Attacker => {
            if stats.shooting_pct() < REC_SHOT_SELECTION_MAX_SH_PCT
                && stats.shots >= REC_SHOT_SELECTION_MIN_SHOTS
            {
                recs.push(format!(
                    "Shot Selection: {name}'s {:.0}% shooting on {} shots is below the productive threshold. \
                     Focus drills on shooting from higher-percentage zones and reducing contested attempts. \
                     Consider a two-touch-before-shoot constraint in practice.",
                    stats.shooting_pct(),
                    stats.shots
                ));
            }
            if metrics.turnovers_per_game >= TURNOVER_RISK_PER_GAME {
                recs.push(format!(
                    "Ball Security: Averaging {:.1} TO/game; work on off-hand stick skills and \
                     decision-making under pressure. Use small-sided games with turnover penalties \
                     to build awareness.",
                    metrics.turnovers_per_game
                ));
            }
            if metrics.assists_per_game >= REC_DUAL_THREAT_MIN_APG
                && metrics.goals_per_game >= REC_DUAL_THREAT_MIN_GPG
            {
                recs.push(format!(
                    "Maximize Usage: {name} is a dual-threat creator ({:.1} G/gm, {:.1} A/gm). \
                     She should be the primary option in critical possessions and settled offense. \
                     Consider running the offense through her in close games.",
                    metrics.goals_per_game, metrics.assists_per_game
                ));
            }
            if stats.goals >= REC_FINISHER_MIN_GOALS && stats.assists < REC_FINISHER_MAX_ASSISTS {
                recs.push(format!(
                    "Expand Playmaking: Strong finisher with {}G but only {}A; encourage her to \
                     look for the extra pass when doubled. This will open up her own shots long-term.",
                    stats.goals, stats.assists
                ));
            }
            if metrics.consistency < REC_VARIANCE_MAX_CONSISTENCY
                && stats.points >= REC_VARIANCE_MIN_POINTS
            {
                recs.push(format!(
                    "Reduce Variance: Point production is inconsistent (game points: {:?}). \
                     Use her in structured sets where she is guaranteed touches rather than \
                     relying on transition opportunities.",
                    stats.game_log.points
                ));
            }
            if tier.ordinal() >= 3 && stats.games_played >= REC_SITUATIONAL_MIN_GAMES {
                recs.push(format!(
                    "Situational Deployment: Deploy {name} primarily in man-up and free-position \
                     situations and as a late-game spark plug off the bench rather than a \
                     full-game starter."
                ));
            }
        }
        Position::Midfielder => {
            if metrics.draw_controls_per_game >= DRAW_ENGINE_MIN_DC_PER_GAME {
                recs.push(format!(
                    "Protect the Draw: {name} at {:.0} DC/game is an elite asset. Ensure she \
                     takes every draw and build secondary draw options to spell her in blowouts. \
                     Track draw-to-goal conversion rate.",
                    metrics.draw_controls_per_game
                ));
            }
            if metrics.caused_turnovers_per_game >= DISRUPTOR_MIN_CT_PER_GAME
                && stats.points >= REC_TWO_WAY_MIN_POINTS
            {
                recs.push(format!(
                    "Two-Way Star: Rare combination of {} CTs and {} PTS; maximize her minutes \
                     in competitive games. She impacts both ends.",
                    stats.caused_turnovers, stats.points
                ));
            }
            if metrics.turnovers_per_game >= TURNOVER_RISK_PER_GAME {
                recs.push(format!(
                    "Transition Discipline: High turnovers ({}) for a midfielder. Focus on \
                     controlled clears and limiting risky passes in the midfield. Use film \
                     sessions to identify turnover patterns.",
                    stats.turnovers
                ));
            }
            if stats.shooting_pct() < REC_MID_SHOT_QUALITY_MAX_SH_PCT
                && stats.shots >= REC_MID_SHOT_QUALITY_MIN_SHOTS
            {
                recs.push(format!(
                    "Shot Quality: Only {:.0}% shooting; reduce long-range attempts and focus on \
                     feeding attackers or driving to higher-percentage areas before releasing.",
                    stats.shooting_pct()
                ));
            }
            if tier.ordinal() >= 3 {
                recs.push(format!(
                    "Role Clarity: Use {name} as a defensive midfielder or draw-circle specialist \
                     rather than expecting offensive production. Clear role definition will boost \
                     confidence."
                ));
            }
        }
        Position::Defender => {
            if metrics.caused_turnovers_per_game >= DISRUPTOR_MIN_CT_PER_GAME {
                recs.push(format!(
                    "Defensive Anchor: {name}'s {:.1} CTs/game make her a cornerstone; assign her \
                     to the opponent's top attacker in every game.",
                    metrics.caused_turnovers_per_game
                ));
            }
            if metrics.ground_balls_per_game >= GB_MAGNET_MIN_GB_PER_GAME {
                recs.push(format!(
                    "Ground Ball Intensity: Strong ground ball rate ({:.1}/gm); use her on the \
                     draw circle for first-ground-ball recovery.",
                    metrics.ground_balls_per_game
                ));
            }
            if scores.discipline <= DISCIPLINE_CONCERN_MAX_SCORE {
                recs.push(
                    "Penalty Management: Card accumulation is a risk; work on body positioning \
                     and footwork to avoid reaching fouls. A one-game suspension would hurt the \
                     defense."
                        .to_string(),
                );
            }
            if tier.ordinal() >= 3 && stats.caused_turnovers < REC_DEVELOPMENT_MAX_CT {
                recs.push(format!(
                    "Development Focus: Needs to increase disruptive plays (only {} CTs). Use \
                     video breakdown to improve anticipation and check timing. Consider more \
                     minutes in lower-leverage situations to build experience.",
                    stats.caused_turnovers
                ));
            }
        }
        Position::Goalkeeper => {
            if let Some(gk) = &stats.goalkeeper {
                if gk.save_pct() < REC_GK_SAVE_FLOOR_PCT {
                    recs.push(format!(
                        "Save Rate Development: {:.1}% is below the D1 average of roughly 45%. \
                         Focus on positioning drills, especially on free-position shots. Track \
                         save percentage by shot location to find weaknesses.",
                        gk.save_pct()
                    ));
                }
                if gk.gaa() >= REC_GK_ELEVATED_GAA {
                    recs.push(format!(
                        "Defensive System Review: {:.2} GAA is elevated; this is not solely a \
                         goalkeeper issue. Review defensive slide packages and communication \
                         protocols to reduce high-quality shots against.",
                        gk.gaa()
                    ));
                }
                if gk.wins >= REC_GK_PROVEN_WINS {
                    recs.push(format!(
                        "Start in Big Games: {name}'s experience in wins makes her the clear \
                         choice for high-leverage matchups. Build confidence with clear \
                         communication from the coaching staff."
                    ));
                }
            }
        }
        Position::Other => {}
    }

    if recs.is_empty() {
        match tier {
            Tier::Developmental => recs.push(format!(
                "Development Plan: {name} needs increased practice reps to earn more game \
                 minutes. Focus on her best positional skill and track improvement weekly."
            )),
            Tier::SituationalSpecialist => recs.push(format!(
                "Defined Role: {name} can contribute in specific situations. Identify her top \
                 one or two skills and deploy her accordingly; do not ask her to do everything."
            )),
            Tier::ProgramDriver | Tier::SystemAmplifier => {}
        }
    }

    recs
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
