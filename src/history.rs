use chrono::{DateTime, Local};
use rusqlite::{params, Connection};
use std::path::{Path, PathBuf};

use crate::app_dirs::AppDirs;
use crate::error::RecordError;
use crate::record::{RecordSink, SessionRecord};

/// Totals over every stored session.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct HistorySummary {
    pub sessions: u32,
    pub mean_accuracy: Option<f64>,
    pub total_words: u32,
    pub total_mistakes: u32,
}

/// SQLite store of completed sessions
#[derive(Debug)]
pub struct HistoryDb {
    conn: Connection,
}

impl HistoryDb {
    /// Open the default database under the state directory, creating it if needed
    pub fn new() -> Result<Self, RecordError> {
        let path = AppDirs::db_path().unwrap_or_else(|| PathBuf::from("tango_history.db"));
        Self::open(path)
    }

    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, RecordError> {
        if let Some(parent) = path.as_ref().parent() {
            std::fs::create_dir_all(parent)?;
        }
        let conn = Connection::open(path)?;
        Self::init(conn)
    }

    pub fn open_in_memory() -> Result<Self, RecordError> {
        Self::init(Connection::open_in_memory()?)
    }

    fn init(conn: Connection) -> Result<Self, RecordError> {
        conn.execute(
            r#"
            CREATE TABLE IF NOT EXISTS sessions (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                timestamp TEXT NOT NULL,
                difficulty TEXT NOT NULL,
                accuracy_percent INTEGER NOT NULL,
                mistakes INTEGER NOT NULL,
                total_words INTEGER NOT NULL,
                created_at DATETIME DEFAULT CURRENT_TIMESTAMP
            )
            "#,
            [],
        )?;

        conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_sessions_timestamp ON sessions(timestamp)",
            [],
        )?;

        Ok(HistoryDb { conn })
    }

    /// Most recent sessions first
    pub fn recent(&self, limit: usize) -> Result<Vec<SessionRecord>, RecordError> {
        let mut stmt = self.conn.prepare(
            r#"
            SELECT timestamp, difficulty, accuracy_percent, mistakes, total_words
            FROM sessions
            ORDER BY timestamp DESC, id DESC
            LIMIT ?1
            "#,
        )?;

        let rows = stmt.query_map([limit as i64], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, u32>(2)?,
                row.get::<_, u32>(3)?,
                row.get::<_, u32>(4)?,
            ))
        })?;

        let mut records = Vec::new();
        for row in rows {
            let (ts, difficulty_label, accuracy_percent, mistakes, total_words) = row?;
            let timestamp = DateTime::parse_from_rfc3339(&ts)
                .map_err(|_| RecordError::BadTimestamp(ts.clone()))?
                .with_timezone(&Local);
            records.push(SessionRecord {
                timestamp,
                difficulty_label,
                accuracy_percent,
                mistakes,
                total_words,
            });
        }
        Ok(records)
    }

    pub fn summary(&self) -> Result<HistorySummary, RecordError> {
        let summary = self.conn.query_row(
            r#"
            SELECT
                COUNT(*),
                AVG(accuracy_percent),
                COALESCE(SUM(total_words), 0),
                COALESCE(SUM(mistakes), 0)
            FROM sessions
            "#,
            [],
            |row| {
                Ok(HistorySummary {
                    sessions: row.get(0)?,
                    mean_accuracy: row.get(1)?,
                    total_words: row.get(2)?,
                    total_mistakes: row.get(3)?,
                })
            },
        )?;
        Ok(summary)
    }

    /// Clear all sessions (for testing or reset purposes)
    pub fn clear_all(&self) -> Result<(), RecordError> {
        self.conn.execute("DELETE FROM sessions", [])?;
        Ok(())
    }
}

impl RecordSink for HistoryDb {
    fn append(&mut self, record: &SessionRecord) -> Result<(), RecordError> {
        self.conn.execute(
            r#"
            INSERT INTO sessions
            (timestamp, difficulty, accuracy_percent, mistakes, total_words)
            VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
            params![
                record.timestamp.to_rfc3339(),
                record.difficulty_label,
                record.accuracy_percent,
                record.mistakes,
                record.total_words,
            ],
        )?;
        Ok(())
    }
}
