//! Durable storage of telemetry snapshots.
//!
//! One archive run fans a [`TelemetrySnapshot`](crate::core::telemetry::TelemetrySnapshot)
//! out to four artifacts sharing a `YYYYMMDD_HHMMSS` key:
//! - `backup_<key>.json`: the snapshot itself
//! - a row in `history.db` (`snapshot_history` table)
//! - `report_<key>.txt`: fixed-layout text summary
//! - `bundle_<key>.tar.gz`: the JSON and the report together

mod archiver;
pub mod bundle;
pub mod history;
mod listing;
pub mod report;

pub use archiver::{BackupRecord, SnapshotArchiver, KEY_FORMAT};
pub use history::{HistoryRow, HistoryStore};
pub use listing::{list_recent_backups, BackupSummary};
pub use report::render_report;
