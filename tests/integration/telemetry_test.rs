use taskmon::core::archive::SnapshotArchiver;
use taskmon::core::processes::ProcessRegistry;
use taskmon::core::sensors::{ProbeContext, SensorProvider, SensorSuite, Strategy};
use taskmon::core::telemetry::{SamplingWindow, SensorReading, TelemetryAggregator};
use taskmon::MonitorError;
use tempfile::TempDir;

fn failing<T: 'static>(metric: &'static str) -> SensorProvider<T> {
    SensorProvider::new(
        metric,
        vec![
            Strategy::new("missing-device", |_| Err(MonitorError::not_found("no device"))),
            Strategy::new("denied", |_| Err(MonitorError::permission_denied("root only"))),
        ],
    )
}

/// A host with none of the optional sensors
fn bare_suite() -> SensorSuite {
    SensorSuite {
        cpu_temperature: failing("cpu_temperature"),
        ram_frequency: failing("ram_frequency"),
        ram_power: failing("ram_power"),
        battery: failing("battery"),
        hardware_identity: failing("hardware_identity"),
    }
}

fn aggregator(suite: SensorSuite) -> TelemetryAggregator {
    TelemetryAggregator::with_parts(
        suite,
        ProcessRegistry::new(SamplingWindow::from_millis(0)),
        ProbeContext::default(),
    )
}

#[test]
fn test_capture_shape() {
    let snapshot = aggregator(SensorSuite::new()).capture();

    assert!(snapshot.top_processes.len() <= 10);
    assert!(snapshot.top_processes.len() <= snapshot.process_count);
    for pair in snapshot.top_processes.windows(2) {
        assert!(pair[0].cpu_percent >= pair[1].cpu_percent);
    }
    assert!((0.0..=100.0).contains(&snapshot.memory.percent));
    assert!(snapshot.cpu_percent >= 0.0);
    assert!(snapshot.boot_time <= snapshot.timestamp);
    assert!(snapshot.uptime_hours >= 0.0);
}

#[test]
fn test_missing_sensors_are_unavailable() {
    let snapshot = aggregator(bare_suite()).capture();

    assert_eq!(snapshot.cpu_temperature, SensorReading::Unavailable);
    assert_eq!(snapshot.ram_frequency_mhz, SensorReading::Unavailable);
    assert_eq!(snapshot.ram_power_watts, SensorReading::Unavailable);
    assert_eq!(snapshot.battery, SensorReading::Unavailable);
    assert_eq!(aggregator(bare_suite()).hardware(), SensorReading::Unavailable);
}

#[test]
fn test_captured_snapshot_archives() {
    let dir = TempDir::new().unwrap();
    let snapshot = aggregator(bare_suite()).capture();

    let archiver = SnapshotArchiver::new(dir.path().join("backups"), dir.path().join("history.db"));
    let record = archiver.archive(&snapshot).unwrap();

    let report = std::fs::read_to_string(&record.report_path).unwrap();
    assert!(report.contains("CPU TEMPERATURE: N/A"));
    assert!(report.contains("RAM POWER (estimate): N/A"));
    assert!(!report.contains("BATTERY"));
    assert!(report.contains(&format!("CPU: {:.1}%", snapshot.cpu_percent)));
}

#[test]
fn test_ram_power_estimate_uses_memory_counters() {
    let snapshot = aggregator(SensorSuite::new()).capture();
    // Only the modelled estimate is consulted, and memory is always known
    assert!(matches!(snapshot.ram_power_watts, SensorReading::Value(w) if w > 0.0));
}
