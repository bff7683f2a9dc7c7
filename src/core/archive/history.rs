//! Append-only SQLite history of archived snapshots.
//!
//! Schema:
//! - snapshot_history: one row per backup key with the headline metrics

use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;

use crate::core::telemetry::TelemetrySnapshot;
use crate::error::Result;

/// One archived snapshot as stored in the history table
#[derive(Debug, Clone, PartialEq)]
pub struct HistoryRow {
    pub backup_key: String,
    pub timestamp: String,
    pub cpu_percent: f64,
    pub memory_percent: f64,
    pub disk_percent: f64,
    pub uptime_hours: f64,
    pub process_count: i64,
}

impl HistoryRow {
    pub fn from_snapshot(backup_key: &str, snapshot: &TelemetrySnapshot) -> Self {
        Self {
            backup_key: backup_key.to_string(),
            timestamp: snapshot.timestamp.to_rfc3339(),
            cpu_percent: snapshot.cpu_percent,
            memory_percent: snapshot.memory.percent,
            disk_percent: snapshot.disk.percent,
            uptime_hours: snapshot.uptime_hours,
            process_count: snapshot.process_count as i64,
        }
    }

    fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            backup_key: row.get(0)?,
            timestamp: row.get(1)?,
            cpu_percent: row.get(2)?,
            memory_percent: row.get(3)?,
            disk_percent: row.get(4)?,
            uptime_hours: row.get(5)?,
            process_count: row.get(6)?,
        })
    }
}

const COLUMNS: &str =
    "backup_key, timestamp, cpu_percent, memory_percent, disk_percent, uptime_hours, process_count";

/// SQLite-backed history store. Rows are only ever inserted.
pub struct HistoryStore {
    conn: Connection,
}

impl HistoryStore {
    /// Open or create the database at `path`
    pub fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)?;
        let store = Self { conn };
        store.init_schema()?;
        Ok(store)
    }

    /// In-memory store, for tests
    pub fn open_in_memory() -> Result<Self> {
        let store = Self {
            conn: Connection::open_in_memory()?,
        };
        store.init_schema()?;
        Ok(store)
    }

    fn init_schema(&self) -> Result<()> {
        self.conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS snapshot_history (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                backup_key TEXT NOT NULL,
                timestamp TEXT NOT NULL,
                cpu_percent REAL NOT NULL,
                memory_percent REAL NOT NULL,
                disk_percent REAL NOT NULL,
                uptime_hours REAL NOT NULL,
                process_count INTEGER NOT NULL
            );
            CREATE INDEX IF NOT EXISTS idx_snapshot_history_key
                ON snapshot_history(backup_key);",
        )?;
        Ok(())
    }

    /// Insert one row and return its id
    pub fn append(&self, row: &HistoryRow) -> Result<i64> {
        self.conn.execute(
            &format!("INSERT INTO snapshot_history ({COLUMNS}) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)"),
            params![
                row.backup_key,
                row.timestamp,
                row.cpu_percent,
                row.memory_percent,
                row.disk_percent,
                row.uptime_hours,
                row.process_count,
            ],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    pub fn find(&self, backup_key: &str) -> Result<Option<HistoryRow>> {
        let row = self
            .conn
            .query_row(
                &format!(
                    "SELECT {COLUMNS} FROM snapshot_history WHERE backup_key = ?1 ORDER BY id DESC LIMIT 1"
                ),
                params![backup_key],
                HistoryRow::from_row,
            )
            .optional()?;
        Ok(row)
    }

    /// Most recent `limit` rows, newest first
    pub fn recent(&self, limit: usize) -> Result<Vec<HistoryRow>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {COLUMNS} FROM snapshot_history ORDER BY id DESC LIMIT ?1"
        ))?;
        let rows = stmt
            .query_map(params![limit as i64], HistoryRow::from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
    }

    pub fn count(&self) -> Result<u64> {
        let count: i64 =
            self.conn
                .query_row("SELECT COUNT(*) FROM snapshot_history", [], |r| r.get(0))?;
        Ok(count as u64)
    }
}
