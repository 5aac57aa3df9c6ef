// Roster data model and season stat loading.
//
// Reads one-row-per-player season CSVs. Counting stats are the source of
// truth: every rate (shooting %, SOG %, GAA, save %) is recomputed from
// counts, and a supplied percentage that disagrees with the recomputed
// value beyond a rounding tolerance rejects the row.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::io::Read;
use std::path::Path;
use tracing::warn;

// ---------------------------------------------------------------------------
// Positions and game results
// ---------------------------------------------------------------------------

/// Field positions used for score weighting and narrative dispatch.
///
/// `Other` is the explicit fallback for roster tags outside the four known
/// positions; it scores with the generic weight table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Position {
    Attacker,
    Midfielder,
    Defender,
    Goalkeeper,
    Other,
}

impl Position {
    /// Parse a roster position tag. Returns `None` for unknown tags so the
    /// caller can decide between fallback and rejection.
    pub fn from_tag(s: &str) -> Option<Self> {
        match s.trim().to_uppercase().as_str() {
            "A" => Some(Position::Attacker),
            "M" => Some(Position::Midfielder),
            "D" => Some(Position::Defender),
            "GK" => Some(Position::Goalkeeper),
            _ => None,
        }
    }

    /// Short display tag, matching the roster file convention.
    pub fn display_str(&self) -> &'static str {
        match self {
            Position::Attacker => "A",
            Position::Midfielder => "M",
            Position::Defender => "D",
            Position::Goalkeeper => "GK",
            Position::Other => "UNK",
        }
    }

    /// Full position name for prose.
    pub fn full_name(&self) -> &'static str {
        match self {
            Position::Attacker => "Attacker",
            Position::Midfielder => "Midfielder",
            Position::Defender => "Defender",
            Position::Goalkeeper => "Goalkeeper",
            Position::Other => "Utility Player",
        }
    }

    /// Deterministic ordering index for roster display.
    pub fn sort_order(&self) -> u8 {
        match self {
            Position::Attacker => 0,
            Position::Midfielder => 1,
            Position::Defender => 2,
            Position::Goalkeeper => 3,
            Position::Other => 4,
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_str())
    }
}

/// Outcome of a single scheduled game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameResult {
    Win,
    Loss,
}

impl GameResult {
    /// Parse a schedule result tag ("W"/"L", case-insensitive).
    pub fn from_tag(s: &str) -> Option<Self> {
        match s.trim().to_uppercase().as_str() {
            "W" => Some(GameResult::Win),
            "L" => Some(GameResult::Loss),
            _ => None,
        }
    }
}

/// One scheduled game. The season schedule is an ordered sequence of these;
/// its order labels which entries of each player's per-game sequences fall
/// in wins and which in losses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Game {
    pub opponent: String,
    pub result: GameResult,
}

// ---------------------------------------------------------------------------
// Per-game sequences
// ---------------------------------------------------------------------------

/// Chronological per-game counting stats. All five sequences have the same
/// length, equal to the player's games played.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameLog {
    pub goals: Vec<u32>,
    pub assists: Vec<u32>,
    pub points: Vec<u32>,
    pub shots: Vec<u32>,
    pub turnovers: Vec<u32>,
}

impl GameLog {
    /// Number of recorded games.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Goalkeeper line
// ---------------------------------------------------------------------------

/// Goalkeeper-specific season stats, present only for goalkeepers with
/// recorded minutes. GAA and save % are derived from the counts here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GoalkeeperLine {
    pub minutes: f64,
    pub goals_allowed: u32,
    pub saves: u32,
    pub wins: u32,
    pub losses: u32,
}

impl GoalkeeperLine {
    /// Goals-against-average: goals allowed per 60 minutes. `minutes > 0`
    /// is a construction invariant.
    pub fn gaa(&self) -> f64 {
        self.goals_allowed as f64 * 60.0 / self.minutes
    }

    /// Save percentage: saves / (saves + goals allowed) * 100, or 0 when no
    /// shots on goal were faced.
    pub fn save_pct(&self) -> f64 {
        let faced = self.saves + self.goals_allowed;
        if faced == 0 {
            return 0.0;
        }
        self.saves as f64 / faced as f64 * 100.0
    }
}

// ---------------------------------------------------------------------------
// Player stat line
// ---------------------------------------------------------------------------

/// Season counting stats for one roster member. Immutable once loaded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerStatLine {
    pub name: String,
    pub jersey: u32,
    pub position: Position,
    pub class_year: String,
    pub games_played: u32,
    pub games_started: u32,
    pub goals: u32,
    pub assists: u32,
    pub points: u32,
    pub shots: u32,
    pub shots_on_goal: u32,
    pub ground_balls: u32,
    pub draw_controls: u32,
    pub turnovers: u32,
    pub caused_turnovers: u32,
    pub free_position_goals: u32,
    pub free_position_shots: u32,
    pub yellow_cards: u32,
    /// Green (warning) cards.
    pub green_cards: u32,
    pub game_log: GameLog,
    /// Present iff position is Goalkeeper and minutes were recorded.
    pub goalkeeper: Option<GoalkeeperLine>,
}

impl PlayerStatLine {
    /// Shooting percentage, recomputed from counts: goals / shots * 100,
    /// or 0 for a player with no shot attempts.
    pub fn shooting_pct(&self) -> f64 {
        if self.shots == 0 {
            return 0.0;
        }
        self.goals as f64 / self.shots as f64 * 100.0
    }

    /// Shots-on-goal percentage, recomputed from counts: SOG / shots * 100,
    /// or 0 for a player with no shot attempts.
    pub fn sog_pct(&self) -> f64 {
        if self.shots == 0 {
            return 0.0;
        }
        self.shots_on_goal as f64 / self.shots as f64 * 100.0
    }

    /// Check the stat-line invariants that must hold for the engine to run.
    ///
    /// Violations are precondition failures, not recoverable data states:
    /// the whole evaluation pass fails rather than silently coercing.
    pub fn validate(&self, schedule_len: usize) -> Result<(), RosterError> {
        let fail = |message: String| {
            Err(RosterError::Invariant {
                player: self.name.clone(),
                message,
            })
        };

        if self.points != self.goals + self.assists {
            return fail(format!(
                "points ({}) != goals ({}) + assists ({})",
                self.points, self.goals, self.assists
            ));
        }
        if self.free_position_goals > self.free_position_shots {
            return fail(format!(
                "free-position goals ({}) exceed free-position shots ({})",
                self.free_position_goals, self.free_position_shots
            ));
        }
        if self.shots_on_goal > self.shots {
            return fail(format!(
                "shots on goal ({}) exceed shots ({})",
                self.shots_on_goal, self.shots
            ));
        }
        if self.goals > self.shots_on_goal {
            return fail(format!(
                "goals ({}) exceed shots on goal ({})",
                self.goals, self.shots_on_goal
            ));
        }
        if self.games_started > self.games_played {
            return fail(format!(
                "games started ({}) exceed games played ({})",
                self.games_started, self.games_played
            ));
        }

        let gp = self.games_played as usize;
        let log = &self.game_log;
        for (label, seq) in [
            ("goals", &log.goals),
            ("assists", &log.assists),
            ("points", &log.points),
            ("shots", &log.shots),
            ("turnovers", &log.turnovers),
        ] {
            if seq.len() != gp {
                return fail(format!(
                    "per-game {label} sequence has {} entries for {gp} games played",
                    seq.len()
                ));
            }
        }
        if gp > schedule_len {
            return fail(format!(
                "{gp} games played exceed the {schedule_len}-game schedule"
            ));
        }

        match (&self.goalkeeper, self.position) {
            (Some(gk), Position::Goalkeeper) => {
                if gk.minutes <= 0.0 {
                    return fail("goalkeeper line present with no minutes".into());
                }
            }
            (Some(_), _) => {
                return fail("goalkeeper line present on a non-goalkeeper".into());
            }
            (None, _) => {}
        }

        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum RosterError {
    #[error("failed to read file {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("CSV parse error: {0}")]
    Csv(#[from] csv::Error),

    #[error("invalid stat line for {player}: {message}")]
    Invariant { player: String, message: String },

    #[error("duplicate player name: {0}")]
    Duplicate(String),

    #[error("roster file produced zero players")]
    Empty,
}

// ---------------------------------------------------------------------------
// Raw CSV serde struct (private)
// ---------------------------------------------------------------------------

/// One roster CSV row. Percentages carried by the file are validated
/// against recomputed values and then discarded; the per-game sequences
/// arrive as `;`-separated cells (e.g. "0;5;3;4;2"). The goalkeeper
/// columns are optional and empty for field players.
#[derive(Debug, Deserialize)]
struct RawStatRow {
    name: String,
    num: u32,
    pos: String,
    yr: String,
    gp: u32,
    gs: u32,
    g: u32,
    a: u32,
    pts: u32,
    sh: u32,
    sh_pct: f64,
    sog: u32,
    sog_pct: f64,
    gb: u32,
    dc: u32,
    to: u32,
    ct: u32,
    fpg: u32,
    fps: u32,
    yc: u32,
    gc: u32,
    game_g: String,
    game_a: String,
    game_pts: String,
    game_sh: String,
    game_to: String,
    #[serde(default)]
    gk_min: Option<f64>,
    #[serde(default)]
    gk_ga: Option<u32>,
    #[serde(default)]
    gk_gaa: Option<f64>,
    #[serde(default)]
    gk_sv: Option<u32>,
    #[serde(default)]
    gk_sv_pct: Option<f64>,
    #[serde(default)]
    gk_w: Option<u32>,
    #[serde(default)]
    gk_l: Option<u32>,
}

// ---------------------------------------------------------------------------
// Tolerances
// ---------------------------------------------------------------------------

/// Maximum allowed disagreement (in percentage points) between a supplied
/// percentage and the value recomputed from counts. Roster files round to
/// one decimal place.
pub const PCT_TOLERANCE: f64 = 0.1;

/// Maximum allowed disagreement for goals-against-average, which roster
/// files round to two decimal places.
pub const GAA_TOLERANCE: f64 = 0.05;

// ---------------------------------------------------------------------------
// Row conversion
// ---------------------------------------------------------------------------

/// Parse a `;`-separated per-game sequence cell. An empty cell is an empty
/// sequence (zero games played).
fn parse_sequence(player: &str, label: &str, cell: &str) -> Result<Vec<u32>, RosterError> {
    let cell = cell.trim();
    if cell.is_empty() {
        return Ok(Vec::new());
    }
    cell.split(';')
        .map(|part| {
            part.trim().parse::<u32>().map_err(|_| RosterError::Invariant {
                player: player.to_string(),
                message: format!("per-game {label} cell has a non-numeric entry: \"{part}\""),
            })
        })
        .collect()
}

fn check_pct(
    player: &str,
    label: &str,
    supplied: f64,
    recomputed: f64,
    tolerance: f64,
) -> Result<(), RosterError> {
    if (supplied - recomputed).abs() > tolerance {
        return Err(RosterError::Invariant {
            player: player.to_string(),
            message: format!(
                "supplied {label} {supplied:.2} disagrees with recomputed {recomputed:.2}"
            ),
        });
    }
    Ok(())
}

fn convert_row(raw: RawStatRow, schedule_len: usize) -> Result<PlayerStatLine, RosterError> {
    let name = raw.name.trim().to_string();

    let position = Position::from_tag(&raw.pos).unwrap_or_else(|| {
        warn!(
            "unknown position tag '{}' for {}; scoring with the generic weight table",
            raw.pos, name
        );
        Position::Other
    });

    let game_log = GameLog {
        goals: parse_sequence(&name, "goals", &raw.game_g)?,
        assists: parse_sequence(&name, "assists", &raw.game_a)?,
        points: parse_sequence(&name, "points", &raw.game_pts)?,
        shots: parse_sequence(&name, "shots", &raw.game_sh)?,
        turnovers: parse_sequence(&name, "turnovers", &raw.game_to)?,
    };

    let goalkeeper = match raw.gk_min {
        Some(minutes) if minutes > 0.0 => Some(GoalkeeperLine {
            minutes,
            goals_allowed: raw.gk_ga.unwrap_or(0),
            saves: raw.gk_sv.unwrap_or(0),
            wins: raw.gk_w.unwrap_or(0),
            losses: raw.gk_l.unwrap_or(0),
        }),
        _ => None,
    };

    let player = PlayerStatLine {
        name: name.clone(),
        jersey: raw.num,
        position,
        class_year: raw.yr.trim().to_string(),
        games_played: raw.gp,
        games_started: raw.gs,
        goals: raw.g,
        assists: raw.a,
        points: raw.pts,
        shots: raw.sh,
        shots_on_goal: raw.sog,
        ground_balls: raw.gb,
        draw_controls: raw.dc,
        turnovers: raw.to,
        caused_turnovers: raw.ct,
        free_position_goals: raw.fpg,
        free_position_shots: raw.fps,
        yellow_cards: raw.yc,
        green_cards: raw.gc,
        game_log,
        goalkeeper,
    };

    player.validate(schedule_len)?;

    // Recompute-and-validate: the file's percentages must agree with the
    // counts before being discarded.
    check_pct(&name, "shooting %", raw.sh_pct, player.shooting_pct(), PCT_TOLERANCE)?;
    check_pct(&name, "SOG %", raw.sog_pct, player.sog_pct(), PCT_TOLERANCE)?;
    if let Some(gk) = &player.goalkeeper {
        if let Some(supplied) = raw.gk_gaa {
            check_pct(&name, "GAA", supplied, gk.gaa(), GAA_TOLERANCE)?;
        }
        if let Some(supplied) = raw.gk_sv_pct {
            check_pct(&name, "save %", supplied, gk.save_pct(), PCT_TOLERANCE)?;
        }
    }

    Ok(player)
}

// ---------------------------------------------------------------------------
// Loaders
// ---------------------------------------------------------------------------

/// Parse a roster CSV from any reader. Exposed so tests and callers that
/// already hold the bytes can avoid the filesystem.
pub fn parse_roster<R: Read>(
    rdr: R,
    schedule: &[Game],
) -> Result<BTreeMap<String, PlayerStatLine>, RosterError> {
    let mut reader = csv::Reader::from_reader(rdr);
    let mut roster = BTreeMap::new();
    for result in reader.deserialize::<RawStatRow>() {
        let raw = result?;
        let player = convert_row(raw, schedule.len())?;
        if roster.contains_key(&player.name) {
            return Err(RosterError::Duplicate(player.name));
        }
        roster.insert(player.name.clone(), player);
    }
    if roster.is_empty() {
        return Err(RosterError::Empty);
    }
    Ok(roster)
}

/// Load a roster CSV from a file path.
pub fn load_roster(
    path: &Path,
    schedule: &[Game],
) -> Result<BTreeMap<String, PlayerStatLine>, RosterError> {
    let file = std::fs::File::open(path).map_err(|e| RosterError::Io {
        path: path.display().to_string(),
        source: e,
    })?;
    parse_roster(file, schedule)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
