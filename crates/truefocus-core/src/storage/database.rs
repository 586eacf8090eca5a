//! SQLite-based session history and application KV state.
//!
//! Provides persistent storage for:
//! - Closed sessions, partitioned by start month, append-only
//! - A key-value store for application state (the CLI persists the
//!   timer engine here between invocations)

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection};
use tracing::warn;

use crate::error::StoreError;
use crate::stats::{Outcome, Session, SlackSegment};
use crate::storage::{data_dir, SessionStore};

/// SQLite database for session history.
///
/// Historical partitions are never rewritten; sessions are only inserted.
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Get a reference to the underlying SQLite connection.
    pub fn conn(&self) -> &Connection {
        &self.conn
    }

    /// Open the database at `~/.config/truefocus/truefocus.db`.
    ///
    /// Creates the database file and schema if they don't exist.
    ///
    /// # Errors
    /// Returns an error if the database cannot be opened or migrated.
    pub fn open() -> Result<Self, StoreError> {
        let path = data_dir()?.join("truefocus.db");
        Self::open_at(path)
    }

    /// Open the database at an explicit path (tests use a temp dir).
    pub fn open_at(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref();
        let conn = Connection::open(path).map_err(|source| StoreError::OpenFailed {
            path: PathBuf::from(path),
            source,
        })?;
        let db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    /// Open an in-memory database (for tests).
    pub fn open_memory() -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory()?;
        let db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    fn migrate(&self) -> Result<(), rusqlite::Error> {
        self.conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS sessions (
                id                 TEXT PRIMARY KEY,
                partition_key      TEXT NOT NULL,
                started_at         TEXT NOT NULL,
                ended_at           TEXT,
                initial_focus_secs INTEGER NOT NULL,
                total_slack_secs   INTEGER NOT NULL DEFAULT 0,
                work_time_actual   INTEGER NOT NULL DEFAULT 0,
                slack_events       INTEGER NOT NULL DEFAULT 0,
                slack_segments     TEXT NOT NULL DEFAULT '[]',
                outcome            TEXT
            );

            CREATE TABLE IF NOT EXISTS kv (
                key   TEXT PRIMARY KEY,
                value TEXT NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_sessions_partition ON sessions(partition_key);
            CREATE INDEX IF NOT EXISTS idx_sessions_started_at ON sessions(started_at);",
        )?;
        Ok(())
    }

    /// Get a value from the kv store.
    pub fn kv_get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let mut stmt = self.conn.prepare("SELECT value FROM kv WHERE key = ?1")?;
        let result = stmt.query_row(params![key], |row| row.get::<_, String>(0));
        match result {
            Ok(v) => Ok(Some(v)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Set a value in the kv store.
    pub fn kv_set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.conn.execute(
            "INSERT OR REPLACE INTO kv (key, value) VALUES (?1, ?2)",
            params![key, value],
        )?;
        Ok(())
    }
}

/// Raw row as stored; decoded into a [`Session`] in a second step so a
/// malformed row can be skipped without aborting the whole load.
struct RawSessionRow {
    id: String,
    started_at: String,
    ended_at: Option<String>,
    initial_focus_secs: u32,
    total_slack_secs: u32,
    work_time_actual: u32,
    slack_events: u32,
    slack_segments: String,
    outcome: Option<String>,
}

impl RawSessionRow {
    fn decode(self) -> Result<Session, StoreError> {
        let id = self
            .id
            .parse()
            .map_err(|e| StoreError::Malformed(format!("id: {e}")))?;
        let started_at = parse_timestamp(&self.started_at)?;
        let ended_at = self.ended_at.as_deref().map(parse_timestamp).transpose()?;
        let slack_segments: Vec<SlackSegment> = serde_json::from_str(&self.slack_segments)
            .map_err(|e| StoreError::Malformed(format!("slack_segments: {e}")))?;
        let outcome = match self.outcome.as_deref() {
            None => None,
            Some("completed") => Some(Outcome::Completed),
            Some("reset_early") => Some(Outcome::ResetEarly),
            Some(other) => {
                return Err(StoreError::Malformed(format!("outcome: {other:?}")));
            }
        };
        Ok(Session {
            id,
            started_at,
            ended_at,
            initial_focus_secs: self.initial_focus_secs,
            total_slack_secs: self.total_slack_secs,
            work_time_actual: self.work_time_actual,
            slack_events: self.slack_events,
            slack_segments,
            outcome,
        })
    }
}

fn parse_timestamp(s: &str) -> Result<DateTime<Utc>, StoreError> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| StoreError::Malformed(format!("timestamp {s:?}: {e}")))
}

fn outcome_str(outcome: Option<Outcome>) -> Option<&'static str> {
    match outcome {
        Some(Outcome::Completed) => Some("completed"),
        Some(Outcome::ResetEarly) => Some("reset_early"),
        None => None,
    }
}

impl SessionStore for Database {
    fn append(&self, session: &Session, partition: &str) -> Result<(), StoreError> {
        let segments = serde_json::to_string(&session.slack_segments)
            .map_err(|e| StoreError::Malformed(format!("slack_segments: {e}")))?;
        self.conn.execute(
            "INSERT INTO sessions (
                id, partition_key, started_at, ended_at, initial_focus_secs,
                total_slack_secs, work_time_actual, slack_events, slack_segments, outcome
             ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
            params![
                session.id.to_string(),
                partition,
                session.started_at.to_rfc3339(),
                session.ended_at.map(|at| at.to_rfc3339()),
                session.initial_focus_secs,
                session.total_slack_secs,
                session.work_time_actual,
                session.slack_events,
                segments,
                outcome_str(session.outcome),
            ],
        )?;
        Ok(())
    }

    fn load(&self) -> Result<Vec<Session>, StoreError> {
        let mut stmt = self.conn.prepare(
            "SELECT id, started_at, ended_at, initial_focus_secs, total_slack_secs,
                    work_time_actual, slack_events, slack_segments, outcome
             FROM sessions
             ORDER BY partition_key, rowid",
        )?;
        let rows = stmt.query_map([], |row| {
            Ok(RawSessionRow {
                id: row.get(0)?,
                started_at: row.get(1)?,
                ended_at: row.get(2)?,
                initial_focus_secs: row.get(3)?,
                total_slack_secs: row.get(4)?,
                work_time_actual: row.get(5)?,
                slack_events: row.get(6)?,
                slack_segments: row.get(7)?,
                outcome: row.get(8)?,
            })
        })?;

        let mut sessions = Vec::new();
        for row in rows {
            match row.map_err(StoreError::from).and_then(RawSessionRow::decode) {
                Ok(session) => sessions.push(session),
                Err(err) => warn!(%err, "skipping malformed session row"),
            }
        }
        Ok(sessions)
    }
}
