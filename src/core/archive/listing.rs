use chrono::{DateTime, Local};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::error::Result;

const REPORT_PREFIX: &str = "report_";
const REPORT_SUFFIX: &str = ".txt";

/// One archived report, as shown by `taskmon backups`
#[derive(Debug, Clone)]
pub struct BackupSummary {
    pub name: String,
    pub key: String,
    pub path: PathBuf,
    pub modified: DateTime<Local>,
    pub size_bytes: u64,
    pub report_text: String,
}

/// Most recent `n` reports in `backups_dir`, newest first by modification
/// time. A directory that does not exist yet simply has no backups.
pub fn list_recent_backups(backups_dir: &Path, n: usize) -> Result<Vec<BackupSummary>> {
    let entries = match fs::read_dir(backups_dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(e.into()),
    };

    let mut reports = Vec::new();
    for entry in entries.flatten() {
        let name = entry.file_name().to_string_lossy().into_owned();
        let Some(key) = report_key(&name) else {
            continue;
        };
        let metadata = match entry.metadata() {
            Ok(m) if m.is_file() => m,
            _ => continue,
        };
        let modified = metadata.modified().map(DateTime::<Local>::from)?;
        reports.push((name.clone(), key.to_string(), entry.path(), modified, metadata.len()));
    }

    // Keys break mtime ties, so reports written within one second stay ordered
    reports.sort_by(|a, b| b.3.cmp(&a.3).then_with(|| b.1.cmp(&a.1)));
    reports.truncate(n);

    let mut summaries = Vec::with_capacity(reports.len());
    for (name, key, path, modified, size_bytes) in reports {
        let report_text = fs::read_to_string(&path).unwrap_or_else(|e| {
            log::warn!("Could not read report {:?}: {}", path, e);
            String::new()
        });
        summaries.push(BackupSummary {
            name,
            key,
            path,
            modified,
            size_bytes,
            report_text,
        });
    }
    Ok(summaries)
}

fn report_key(file_name: &str) -> Option<&str> {
    file_name
        .strip_prefix(REPORT_PREFIX)?
        .strip_suffix(REPORT_SUFFIX)
        .filter(|key| !key.is_empty())
}
