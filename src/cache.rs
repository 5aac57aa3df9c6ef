// SQLite cache for computed evaluations.
//
// The engine itself is stateless; this external layer memoizes whole
// evaluation passes keyed by a digest of the complete input dataset (raw
// roster CSV bytes plus the ordered schedule). Any change to either input
// produces a new digest, so stale entries are never served.

use std::sync::{Mutex, MutexGuard};

use anyhow::{Context, Result};
use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};
use sha2::{Digest, Sha256};

use crate::engine::TeamEvaluation;
use crate::roster::{Game, GameResult};

/// SQLite-backed cache of serialized `TeamEvaluation` payloads.
pub struct EvaluationCache {
    conn: Mutex<Connection>,
}

impl EvaluationCache {
    /// Open (or create) the cache database at `path` and ensure the schema
    /// exists. Pass `":memory:"` for an ephemeral cache (useful in tests).
    pub fn open(path: &str) -> Result<Self> {
        let conn = Connection::open(path)
            .with_context(|| format!("failed to open evaluation cache at {path}"))?;

        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA busy_timeout = 5000;",
        )
        .context("failed to set cache pragmas")?;

        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS evaluations (
                dataset_digest TEXT PRIMARY KEY,
                payload        TEXT NOT NULL,
                created_at     TEXT NOT NULL
            );",
        )
        .context("failed to create cache schema")?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Acquire the database connection.
    ///
    /// Panics if the mutex is poisoned (another thread panicked while
    /// holding the lock). This should never happen in normal operation.
    fn conn(&self) -> MutexGuard<'_, Connection> {
        self.conn.lock().expect("cache mutex poisoned")
    }

    /// Stable digest of the full input dataset. The schedule is folded in
    /// field by field so the digest does not depend on any serializer.
    pub fn dataset_digest(roster_csv: &[u8], schedule: &[Game]) -> String {
        let mut hasher = Sha256::new();
        hasher.update(roster_csv);
        for game in schedule {
            hasher.update(game.opponent.as_bytes());
            hasher.update(match game.result {
                GameResult::Win => b"|W\n",
                GameResult::Loss => b"|L\n",
            });
        }
        format!("{:x}", hasher.finalize())
    }

    /// Look up a cached evaluation by dataset digest.
    pub fn load(&self, digest: &str) -> Result<Option<TeamEvaluation>> {
        let conn = self.conn();
        let payload: Option<String> = conn
            .query_row(
                "SELECT payload FROM evaluations WHERE dataset_digest = ?1",
                params![digest],
                |row| row.get(0),
            )
            .optional()
            .context("failed to query evaluation cache")?;

        match payload {
            Some(json) => {
                let evaluation = serde_json::from_str(&json)
                    .context("failed to decode cached evaluation payload")?;
                Ok(Some(evaluation))
            }
            None => Ok(None),
        }
    }

    /// Store an evaluation under the given dataset digest, replacing any
    /// previous entry for the same dataset.
    pub fn store(&self, digest: &str, evaluation: &TeamEvaluation) -> Result<()> {
        let payload =
            serde_json::to_string(evaluation).context("failed to serialize evaluation")?;
        let conn = self.conn();
        conn.execute(
            "INSERT OR REPLACE INTO evaluations (dataset_digest, payload, created_at)
             VALUES (?1, ?2, ?3)",
            params![digest, payload, Utc::now().to_rfc3339()],
        )
        .context("failed to store evaluation")?;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
