use chrono::{DateTime, Duration, Local, NaiveDateTime};
use log::{debug, info};
use std::fs;
use std::path::{Path, PathBuf};

use super::bundle::write_bundle;
use super::history::{HistoryRow, HistoryStore};
use super::listing::{list_recent_backups, BackupSummary};
use super::report::render_report;
use crate::core::config::Config;
use crate::core::telemetry::TelemetrySnapshot;
use crate::error::{ArchiveStage, MonitorError, Result};

/// `YYYYMMDD_HHMMSS`, shared by every artifact of one backup
pub const KEY_FORMAT: &str = "%Y%m%d_%H%M%S";

/// `(prefix, suffix)` of each keyed file in the backups directory
const ARTIFACT_NAMES: [(&str, &str); 3] = [
    ("backup_", ".json"),
    ("report_", ".txt"),
    ("bundle_", ".tar.gz"),
];

/// Where each artifact of one archived snapshot ended up
#[derive(Debug, Clone, PartialEq)]
pub struct BackupRecord {
    pub key: String,
    pub created_at: DateTime<Local>,
    pub data_path: PathBuf,
    pub report_path: PathBuf,
    pub bundle_path: PathBuf,
    pub history_db: PathBuf,
    pub history_row_id: i64,
}

impl BackupRecord {
    pub fn report_name(&self) -> String {
        file_name(&self.report_path)
    }

    pub fn artifacts(&self) -> [&Path; 4] {
        [
            &self.data_path,
            &self.history_db,
            &self.report_path,
            &self.bundle_path,
        ]
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Persists snapshots as JSON, a history row, a text report and a bundle.
pub struct SnapshotArchiver {
    backups_dir: PathBuf,
    history_db: PathBuf,
}

impl SnapshotArchiver {
    pub fn new<P: Into<PathBuf>, Q: Into<PathBuf>>(backups_dir: P, history_db: Q) -> Self {
        Self {
            backups_dir: backups_dir.into(),
            history_db: history_db.into(),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.backups_dir(), config.history_db_path())
    }

    pub fn backups_dir(&self) -> &Path {
        &self.backups_dir
    }

    pub fn history_db(&self) -> &Path {
        &self.history_db
    }

    /// Archive `snapshot` under a key derived from the current time
    pub fn archive(&self, snapshot: &TelemetrySnapshot) -> Result<BackupRecord> {
        self.archive_at(snapshot, Local::now())
    }

    /// Archive `snapshot` under a key derived from `now`.
    ///
    /// Every artifact is a serialization of the same `snapshot`, so the
    /// figures agree across all four. The first failing stage is returned as
    /// [`MonitorError::ArchiveFailed`]; artifacts already written by earlier
    /// stages are left in place.
    pub fn archive_at(
        &self,
        snapshot: &TelemetrySnapshot,
        now: DateTime<Local>,
    ) -> Result<BackupRecord> {
        let failed_at =
            |stage: ArchiveStage| move |e: std::io::Error| MonitorError::archive_failed(stage, e);

        fs::create_dir_all(&self.backups_dir).map_err(failed_at(ArchiveStage::Prepare))?;
        if let Some(parent) = self.history_db.parent() {
            fs::create_dir_all(parent).map_err(failed_at(ArchiveStage::Prepare))?;
        }

        let (key, created_at) = self.derive_key(now);
        debug!("Archiving snapshot under key {}", key);

        let data_path = self.backups_dir.join(format!("backup_{}.json", key));
        let report_path = self.backups_dir.join(format!("report_{}.txt", key));
        let bundle_path = self.backups_dir.join(format!("bundle_{}.tar.gz", key));

        let json = serde_json::to_vec_pretty(snapshot)
            .map_err(|e| MonitorError::archive_failed(ArchiveStage::StructuredData, e))?;
        write_atomic(&data_path, &json).map_err(failed_at(ArchiveStage::StructuredData))?;

        let history_row_id = HistoryStore::open(&self.history_db)
            .and_then(|store| store.append(&HistoryRow::from_snapshot(&key, snapshot)))
            .map_err(|e| MonitorError::archive_failed(ArchiveStage::History, e))?;

        let report = render_report(snapshot, &key);
        write_atomic(&report_path, report.as_bytes()).map_err(failed_at(ArchiveStage::Report))?;

        let data_name = file_name(&data_path);
        let report_name = file_name(&report_path);
        write_bundle(
            &bundle_path,
            &[
                (data_path.as_path(), data_name.as_str()),
                (report_path.as_path(), report_name.as_str()),
            ],
        )
        .map_err(|e| MonitorError::archive_failed(ArchiveStage::Bundle, e))?;

        info!("Backup {} written to {:?}", key, self.backups_dir);

        Ok(BackupRecord {
            key,
            created_at,
            data_path,
            report_path,
            bundle_path,
            history_db: self.history_db.clone(),
            history_row_id,
        })
    }

    /// Second-resolution key for `now`, never earlier than one second past
    /// the newest key already in the backups directory, then moved forward
    /// one second at a time while any artifact uses it.
    ///
    /// Keys keep increasing when the local clock steps back.
    fn derive_key(&self, now: DateTime<Local>) -> (String, DateTime<Local>) {
        let wall = now.naive_local();
        let mut at = match self.newest_key() {
            Some(newest) if newest >= wall => newest + Duration::seconds(1),
            _ => wall,
        };
        loop {
            let key = at.format(KEY_FORMAT).to_string();
            if !self.key_in_use(&key) {
                return (key, now + (at - wall));
            }
            at += Duration::seconds(1);
        }
    }

    /// Latest key among the artifacts in the backups directory
    fn newest_key(&self) -> Option<NaiveDateTime> {
        fs::read_dir(&self.backups_dir)
            .ok()?
            .filter_map(|entry| entry.ok())
            .filter_map(|entry| {
                let name = entry.file_name();
                artifact_key(&name.to_string_lossy())
            })
            .max()
    }

    fn key_in_use(&self, key: &str) -> bool {
        ARTIFACT_NAMES.iter().any(|(prefix, suffix)| {
            self.backups_dir
                .join(format!("{}{}{}", prefix, key, suffix))
                .exists()
        })
    }

    pub fn list_recent(&self, n: usize) -> Result<Vec<BackupSummary>> {
        list_recent_backups(&self.backups_dir, n)
    }
}

fn artifact_key(file_name: &str) -> Option<NaiveDateTime> {
    ARTIFACT_NAMES.iter().find_map(|(prefix, suffix)| {
        let key = file_name.strip_prefix(prefix)?.strip_suffix(suffix)?;
        NaiveDateTime::parse_from_str(key, KEY_FORMAT).ok()
    })
}

fn write_atomic(path: &Path, data: &[u8]) -> std::io::Result<()> {
    let tmp = path.with_extension("tmp");
    fs::write(&tmp, data)?;
    fs::rename(&tmp, path).inspect_err(|_| {
        let _ = fs::remove_file(&tmp);
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use tempfile::TempDir;

    #[test]
    fn test_derive_key_format() {
        let dir = TempDir::new().unwrap();
        let archiver = SnapshotArchiver::new(dir.path(), dir.path().join("history.db"));
        let now = Local.with_ymd_and_hms(2025, 1, 2, 3, 4, 5).unwrap();
        assert_eq!(archiver.derive_key(now).0, "20250102_030405");
    }

    #[test]
    fn test_derive_key_skips_used_seconds() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("report_20250102_030405.txt"), "").unwrap();
        fs::write(dir.path().join("bundle_20250102_030406.tar.gz"), "").unwrap();

        let archiver = SnapshotArchiver::new(dir.path(), dir.path().join("history.db"));
        let now = Local.with_ymd_and_hms(2025, 1, 2, 3, 4, 5).unwrap();
        let (key, at) = archiver.derive_key(now);
        assert_eq!(key, "20250102_030407");
        assert_eq!(at, now + Duration::seconds(2));
    }

    #[test]
    fn test_derive_key_after_clock_steps_back() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("backup_20250601_023000.json"), "{}").unwrap();
        fs::write(dir.path().join("notes.txt"), "").unwrap();
        fs::write(dir.path().join("report_latest.txt"), "").unwrap();

        let archiver = SnapshotArchiver::new(dir.path(), dir.path().join("history.db"));
        let now = Local.with_ymd_and_hms(2025, 6, 1, 1, 30, 0).unwrap();
        let (key, at) = archiver.derive_key(now);
        assert_eq!(key, "20250601_023001");
        assert_eq!(at, now + Duration::seconds(3601));
    }

    #[test]
    fn test_artifact_key() {
        let expected = Local
            .with_ymd_and_hms(2025, 1, 2, 3, 4, 5)
            .unwrap()
            .naive_local();
        assert_eq!(artifact_key("bundle_20250102_030405.tar.gz"), Some(expected));
        assert_eq!(artifact_key("report_20250102_030405.txt"), Some(expected));
        assert_eq!(artifact_key("backup_20250102_030405.tmp"), None);
        assert_eq!(artifact_key("history.db"), None);
    }

    #[test]
    fn test_write_atomic_leaves_no_tmp() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("backup_k.json");
        write_atomic(&path, b"{}").unwrap();
        assert_eq!(fs::read(&path).unwrap(), b"{}");
        assert!(!dir.path().join("backup_k.tmp").exists());
    }
}
