// Roster intelligence report entry point.
//
// Startup sequence:
// 1. Initialize tracing (stderr; stdout is the report surface)
// 2. Load config (season identity, schedule, data paths)
// 3. Read the roster CSV and digest the full input dataset
// 4. Open the evaluation cache; reuse a cached pass when the digest matches
// 5. Otherwise parse the roster, run the engine, store the result
// 6. Print the report

use std::path::PathBuf;

use anyhow::Context;
use tracing::info;

use lax_intel::cache::EvaluationCache;
use lax_intel::config::{self, Config};
use lax_intel::engine::query::{self, RosterFilter};
use lax_intel::engine::{self, TeamEvaluation};
use lax_intel::roster::{self, GameResult};

fn main() -> anyhow::Result<()> {
    init_tracing()?;

    // Optional first argument: base directory holding config/ and data/.
    let base_dir = match std::env::args().nth(1) {
        Some(dir) => PathBuf::from(dir),
        None => std::env::current_dir().context("failed to resolve working directory")?,
    };

    let config = config::load_config_from(&base_dir).context("failed to load configuration")?;
    info!(
        "Config loaded: {}, {} games on schedule",
        config.team,
        config.schedule.len()
    );

    let roster_path = base_dir.join(&config.roster_path);
    let csv_bytes = std::fs::read(&roster_path)
        .with_context(|| format!("failed to read roster file {}", roster_path.display()))?;
    let digest = EvaluationCache::dataset_digest(&csv_bytes, &config.schedule);

    let cache = EvaluationCache::open(&cache_path(&base_dir, &config)?)
        .context("failed to open evaluation cache")?;

    let evaluation = match cache.load(&digest)? {
        Some(hit) => {
            info!("Evaluation cache hit for dataset {}", &digest[..12]);
            hit
        }
        None => {
            let roster = roster::parse_roster(csv_bytes.as_slice(), &config.schedule)
                .context("failed to parse roster")?;
            info!("Loaded {} players", roster.len());
            let evaluation = engine::evaluate(&roster, &config.schedule)
                .context("evaluation pass failed")?;
            cache.store(&digest, &evaluation)?;
            evaluation
        }
    };

    print_report(&config, &evaluation);
    Ok(())
}

/// Resolve the cache database path: the configured one, or a per-user data
/// directory fallback.
fn cache_path(base_dir: &std::path::Path, config: &Config) -> anyhow::Result<String> {
    if let Some(path) = &config.cache_path {
        return Ok(base_dir.join(path).display().to_string());
    }
    let dirs = directories::ProjectDirs::from("", "", "lax-intel")
        .context("failed to resolve a user data directory for the cache")?;
    std::fs::create_dir_all(dirs.data_dir()).context("failed to create cache directory")?;
    Ok(dirs.data_dir().join("evaluations.sqlite3").display().to_string())
}

/// Initialize tracing to stderr so stdout stays a clean report surface.
fn init_tracing() -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::EnvFilter;

    let subscriber = fmt::Subscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("lax_intel=info,warn")),
        )
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .with_target(false)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .context("failed to set tracing subscriber")?;
    Ok(())
}

// ---------------------------------------------------------------------------
// Report rendering
// ---------------------------------------------------------------------------

fn print_report(config: &Config, evaluation: &TeamEvaluation) {
    let wins = config
        .schedule
        .iter()
        .filter(|g| g.result == GameResult::Win)
        .count();
    let losses = config.schedule.len() - wins;

    println!("{} | {}", config.team, config.label);
    println!(
        "{} games ({wins}-{losses}) | {} players evaluated",
        config.schedule.len(),
        evaluation.players.len()
    );
    println!();

    let b = &evaluation.baseline;
    println!("Team baseline maxima (gp >= 2):");
    println!(
        "  G/gm {:.2} | PTS/gm {:.2} | A/gm {:.2} | CT/gm {:.2} | GB/gm {:.2} | DC/gm {:.2} | poss impact {:.1}",
        b.max_goals_per_game,
        b.max_points_per_game,
        b.max_assists_per_game,
        b.max_caused_turnovers_per_game,
        b.max_ground_balls_per_game,
        b.max_draw_controls_per_game,
        b.max_possession_impact,
    );
    println!();

    for aggregate in query::select(&evaluation.players, &RosterFilter::default()) {
        let p = &aggregate.stats;
        let s = &aggregate.scores;
        println!(
            "#{} {} ({}, {}) - {} - impact {:.0}",
            p.jersey,
            p.name,
            p.position.display_str(),
            p.class_year,
            aggregate.tier,
            s.overall
        );
        println!(
            "  off {:>3.0} | def {:>3.0} | poss {:>3.0} | eff {:>3.0} | disc {:>3.0}",
            s.offensive, s.defensive, s.possession, s.efficiency, s.discipline
        );
        if !aggregate.flags.is_empty() {
            let labels: Vec<&str> = aggregate.flags.iter().map(|f| f.label.as_str()).collect();
            println!("  flags: {}", labels.join(", "));
        }
        println!("  {}", aggregate.coaching_note);
        for rec in &aggregate.recommendations {
            println!("  > {rec}");
        }
        println!();
    }
}
