use chrono::{Duration, Local, TimeZone};
use std::fs;
use taskmon::core::archive::{bundle::bundle_contents, HistoryStore, SnapshotArchiver};
use taskmon::core::processes::ProcessInfo;
use taskmon::core::telemetry::{
    DiskUsage, MemoryUsage, NetworkUsage, SensorReading, TelemetrySnapshot,
};
use taskmon::{ArchiveStage, MonitorError};
use tempfile::TempDir;

fn snapshot(cpu_percent: f64) -> TelemetrySnapshot {
    let now = Local::now();
    TelemetrySnapshot {
        timestamp: now,
        cpu_percent,
        cpu_cores: Some(8),
        cpu_frequency_mhz: 3600,
        memory: MemoryUsage {
            total_gb: 16.0,
            used_gb: 9.97,
            available_gb: 6.03,
            percent: 62.3,
        },
        disk: DiskUsage {
            total_gb: 500.0,
            used_gb: 200.0,
            free_gb: 300.0,
            percent: 40.0,
        },
        network: NetworkUsage {
            local_ip: SensorReading::Unavailable,
            bytes_sent: 1_000,
            bytes_recv: 2_000,
        },
        boot_time: now - Duration::hours(3),
        uptime_hours: 3.0,
        cpu_temperature: SensorReading::Unavailable,
        ram_frequency_mhz: SensorReading::Unavailable,
        ram_power_watts: SensorReading::Value(4.5),
        battery: SensorReading::Unavailable,
        process_count: 2,
        top_processes: vec![
            ProcessInfo {
                pid: 42,
                name: "busy".to_string(),
                cpu_percent: 25.0,
                memory_percent: 1.5,
                idle: false,
            },
            ProcessInfo {
                pid: 7,
                name: "quiet".to_string(),
                cpu_percent: 0.0,
                memory_percent: 0.2,
                idle: false,
            },
        ],
    }
}

fn archiver(dir: &TempDir) -> SnapshotArchiver {
    SnapshotArchiver::new(dir.path().join("backups"), dir.path().join("history.db"))
}

#[test]
fn test_archive_writes_four_artifacts_under_one_key() {
    let dir = TempDir::new().unwrap();
    let archiver = archiver(&dir);

    let record = archiver.archive(&snapshot(37.4)).unwrap();

    assert_eq!(record.key.len(), "YYYYMMDD_HHMMSS".len());
    for path in record.artifacts() {
        assert!(path.exists(), "missing artifact {:?}", path);
    }
    for path in [&record.data_path, &record.report_path, &record.bundle_path] {
        let name = path.file_name().unwrap().to_string_lossy();
        assert!(name.contains(&record.key), "{} lacks key {}", name, record.key);
    }
}

#[test]
fn test_cpu_percent_agrees_across_artifacts() {
    let dir = TempDir::new().unwrap();
    let archiver = archiver(&dir);
    let mut snap = snapshot(37.4);
    snap.cpu_temperature = SensorReading::Value(45.3);
    snap.ram_frequency_mhz = SensorReading::Value(3200.0);

    let record = archiver.archive(&snap).unwrap();

    let json: serde_json::Value =
        serde_json::from_slice(&fs::read(&record.data_path).unwrap()).unwrap();
    assert_eq!(json["cpu_percent"].as_f64(), Some(37.4));
    assert_eq!(json["cpu_temperature"].as_f64(), Some(45.3));
    assert_eq!(json["ram_frequency_mhz"].as_f64(), Some(3200.0));
    assert_eq!(json["memory"]["percent"].as_f64(), Some(62.3));

    let row = HistoryStore::open(&record.history_db)
        .unwrap()
        .find(&record.key)
        .unwrap()
        .unwrap();
    assert_eq!(row.cpu_percent, 37.4);
    assert_eq!(row.memory_percent, 62.3);
    assert_eq!(row.disk_percent, 40.0);
    assert_eq!(row.process_count, 2);

    let report = fs::read_to_string(&record.report_path).unwrap();
    assert!(report.lines().any(|l| l == "CPU: 37.4%"));
    assert!(report.lines().any(|l| l == "MEMORY: 62.3%"));
    assert!(report.lines().any(|l| l == "CPU TEMPERATURE: 45.3 °C"));
    assert!(report.lines().any(|l| l == "RAM FREQUENCY: 3200 MHz"));

    let bundled = bundle_contents(&record.bundle_path).unwrap();
    let names: Vec<_> = bundled.iter().map(|(n, _)| n.clone()).collect();
    assert_eq!(
        names,
        vec![
            format!("backup_{}.json", record.key),
            format!("report_{}.txt", record.key)
        ]
    );
    assert_eq!(bundled[0].1, fs::read(&record.data_path).unwrap());
    assert_eq!(bundled[1].1, report.into_bytes());
}

#[test]
fn test_same_second_archives_get_distinct_keys() {
    let dir = TempDir::new().unwrap();
    let archiver = archiver(&dir);
    let at = Local.with_ymd_and_hms(2025, 6, 1, 10, 0, 0).unwrap();

    let first = archiver.archive_at(&snapshot(1.0), at).unwrap();
    let second = archiver.archive_at(&snapshot(2.0), at).unwrap();

    assert_eq!(first.key, "20250601_100000");
    assert_eq!(second.key, "20250601_100001");

    let store = HistoryStore::open(archiver.history_db()).unwrap();
    assert_eq!(store.count().unwrap(), 2);
    assert_eq!(store.find(&second.key).unwrap().unwrap().cpu_percent, 2.0);
}

#[test]
fn test_keys_increase_when_clock_steps_back() {
    let dir = TempDir::new().unwrap();
    let archiver = archiver(&dir);
    let at = Local.with_ymd_and_hms(2025, 6, 1, 2, 30, 0).unwrap();

    let first = archiver.archive_at(&snapshot(1.0), at).unwrap();
    let second = archiver
        .archive_at(&snapshot(2.0), at - Duration::hours(1))
        .unwrap();

    assert_eq!(first.key, "20250601_023000");
    assert!(second.key > first.key);
}

#[test]
fn test_unwritable_backups_dir_fails_at_prepare() {
    let dir = TempDir::new().unwrap();
    let blocker = dir.path().join("backups");
    fs::write(&blocker, "not a directory").unwrap();

    let err = archiver(&dir).archive(&snapshot(5.0)).unwrap_err();
    match err {
        MonitorError::ArchiveFailed { stage, .. } => assert_eq!(stage, ArchiveStage::Prepare),
        other => panic!("expected ArchiveFailed, got {:?}", other),
    }
}

#[test]
fn test_broken_history_db_fails_at_history_stage() {
    let dir = TempDir::new().unwrap();
    // A directory where the database file should be
    fs::create_dir_all(dir.path().join("history.db")).unwrap();

    let err = archiver(&dir).archive(&snapshot(5.0)).unwrap_err();
    match err {
        MonitorError::ArchiveFailed { stage, .. } => assert_eq!(stage, ArchiveStage::History),
        other => panic!("expected ArchiveFailed, got {:?}", other),
    }
    assert!(no_report_written(&dir));
}

fn no_report_written(dir: &TempDir) -> bool {
    fs::read_dir(dir.path().join("backups"))
        .unwrap()
        .flatten()
        .all(|e| !e.file_name().to_string_lossy().starts_with("report_"))
}

#[test]
fn test_recent_backups_newest_first_and_bounded() {
    let dir = TempDir::new().unwrap();
    let archiver = archiver(&dir);
    let start = Local.with_ymd_and_hms(2025, 6, 1, 10, 0, 0).unwrap();

    for i in 0..4 {
        archiver
            .archive_at(&snapshot(i as f64), start + Duration::minutes(i))
            .unwrap();
    }

    let recent = archiver.list_recent(10).unwrap();
    assert_eq!(recent.len(), 4);
    for pair in recent.windows(2) {
        assert!(pair[0].modified >= pair[1].modified);
    }
    assert_eq!(recent[0].key, "20250601_100300");
    assert!(recent[0].report_text.contains("TASKMONITOR BACKUP - 20250601_100300"));
    assert!(recent[0].size_bytes > 0);

    assert_eq!(archiver.list_recent(2).unwrap().len(), 2);
}
