// Configuration loading and parsing (config/season.toml).

use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::roster::{Game, GameResult};

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("failed to parse config file {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("validation error for field `{field}`: {message}")]
    ValidationError { field: String, message: String },
}

// ---------------------------------------------------------------------------
// Public assembled Config
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct Config {
    /// Team display name, e.g. "Virginia Cavaliers".
    pub team: String,
    /// Season label, e.g. "2026 Women's Lacrosse".
    pub label: String,
    /// Roster CSV path, relative to the config base directory.
    pub roster_path: String,
    /// Evaluation cache database path. When omitted, the binary falls back
    /// to a per-user data directory.
    pub cache_path: Option<String>,
    /// The season schedule in chronological order. Game order is
    /// load-bearing: it labels which games count as wins for the
    /// clutch-ratio computation.
    pub schedule: Vec<Game>,
}

// ---------------------------------------------------------------------------
// season.toml structs
// ---------------------------------------------------------------------------

/// Raw deserialization target for the entire season.toml file.
#[derive(Debug, Clone, Deserialize)]
struct SeasonFile {
    season: SeasonSection,
    data: DataSection,
    #[serde(default)]
    games: Vec<GameEntry>,
}

#[derive(Debug, Clone, Deserialize)]
struct SeasonSection {
    team: String,
    label: String,
}

#[derive(Debug, Clone, Deserialize)]
struct DataSection {
    roster: String,
    #[serde(default)]
    cache: Option<String>,
}

/// One `[[games]]` entry. The result is kept as a raw string here and
/// converted to `GameResult` during assembly so a bad tag produces a
/// targeted validation error rather than a generic serde message.
#[derive(Debug, Clone, Deserialize)]
struct GameEntry {
    opponent: String,
    result: String,
}

// ---------------------------------------------------------------------------
// Loading logic
// ---------------------------------------------------------------------------

/// Load and validate configuration from `config/season.toml` relative to
/// the given `base_dir`.
pub fn load_config_from(base_dir: &Path) -> Result<Config, ConfigError> {
    let path = base_dir.join("config").join("season.toml");
    let text = read_file(&path)?;
    let file: SeasonFile = toml::from_str(&text).map_err(|e| ConfigError::ParseError {
        path: path.clone(),
        source: e,
    })?;
    assemble(file)
}

/// Load configuration from the current working directory.
pub fn load_config() -> Result<Config, ConfigError> {
    let cwd = std::env::current_dir().map_err(|_| ConfigError::FileNotFound {
        path: PathBuf::from("."),
    })?;
    load_config_from(&cwd)
}

fn read_file(path: &Path) -> Result<String, ConfigError> {
    if !path.exists() {
        return Err(ConfigError::FileNotFound {
            path: path.to_path_buf(),
        });
    }
    std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
        path: path.to_path_buf(),
    })
}

/// Convert the raw file structs into the public `Config`, validating fields.
fn assemble(file: SeasonFile) -> Result<Config, ConfigError> {
    let mut schedule = Vec::with_capacity(file.games.len());
    for (idx, entry) in file.games.iter().enumerate() {
        let result = GameResult::from_tag(&entry.result).ok_or_else(|| {
            ConfigError::ValidationError {
                field: format!("games[{idx}].result"),
                message: format!("expected \"W\" or \"L\", got \"{}\"", entry.result),
            }
        })?;
        schedule.push(Game {
            opponent: entry.opponent.trim().to_string(),
            result,
        });
    }

    let config = Config {
        team: file.season.team,
        label: file.season.label,
        roster_path: file.data.roster,
        cache_path: file.data.cache,
        schedule,
    };

    validate(&config)?;
    Ok(config)
}

fn validate(config: &Config) -> Result<(), ConfigError> {
    if config.team.trim().is_empty() {
        return Err(ConfigError::ValidationError {
            field: "season.team".into(),
            message: "team name must not be empty".into(),
        });
    }
    if config.roster_path.trim().is_empty() {
        return Err(ConfigError::ValidationError {
            field: "data.roster".into(),
            message: "roster path must not be empty".into(),
        });
    }
    if config.schedule.is_empty() {
        return Err(ConfigError::ValidationError {
            field: "games".into(),
            message: "at least one game is required to label the schedule".into(),
        });
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
