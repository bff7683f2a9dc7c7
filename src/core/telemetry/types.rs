use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

use super::reading::SensorReading;
use crate::core::processes::ProcessInfo;

pub const BYTES_PER_GB: f64 = 1024.0 * 1024.0 * 1024.0;

/// Point-in-time host telemetry. Built once per capture and never mutated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TelemetrySnapshot {
    pub timestamp: DateTime<Local>,
    pub cpu_percent: f64,
    pub cpu_cores: Option<usize>,
    pub cpu_frequency_mhz: u64,
    pub memory: MemoryUsage,
    pub disk: DiskUsage,
    pub network: NetworkUsage,
    pub boot_time: DateTime<Local>,
    pub uptime_hours: f64,
    pub cpu_temperature: SensorReading<f64>,
    pub ram_frequency_mhz: SensorReading<f64>,
    pub ram_power_watts: SensorReading<f64>,
    pub battery: SensorReading<BatteryStatus>,
    pub process_count: usize,
    pub top_processes: Vec<ProcessInfo>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MemoryUsage {
    pub total_gb: f64,
    pub used_gb: f64,
    pub available_gb: f64,
    pub percent: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DiskUsage {
    pub total_gb: f64,
    pub used_gb: f64,
    pub free_gb: f64,
    pub percent: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NetworkUsage {
    pub local_ip: SensorReading<String>,
    pub bytes_sent: u64,
    pub bytes_recv: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatteryStatus {
    pub percent: f64,
    pub plugged: bool,
    pub time_left_seconds: Option<u64>,
}

/// Static description of the host
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HardwareIdentity {
    pub system: String,
    pub version: String,
    pub architecture: String,
    pub processor: String,
    pub cpu_cores: Option<usize>,
    pub cpu_threads: usize,
    pub memory_total_gb: f64,
    pub disk_total_gb: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UptimeInfo {
    pub hours: u64,
    pub minutes: u64,
    pub boot_time: DateTime<Local>,
}

/// Cumulative interface traffic, in megabytes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrafficSample {
    pub timestamp: String,
    pub sent_mb: f64,
    pub recv_mb: f64,
}

/// Round to one decimal place.
///
/// Every percentage stored in a snapshot goes through this so the JSON,
/// history row and text report all carry the same digits.
pub fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

pub fn bytes_to_gb(bytes: u64) -> f64 {
    round2(bytes as f64 / BYTES_PER_GB)
}

pub fn percent_of(part: u64, total: u64) -> f64 {
    if total > 0 {
        round1(part as f64 / total as f64 * 100.0)
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_percent_of_zero_total() {
        assert_eq!(percent_of(10, 0), 0.0);
    }

    #[test]
    fn test_percent_of_rounds_to_one_decimal() {
        assert_eq!(percent_of(623, 1000), 62.3);
        assert_eq!(percent_of(1, 3), 33.3);
    }

    #[test]
    fn test_bytes_to_gb() {
        assert_eq!(bytes_to_gb(8 * 1024 * 1024 * 1024), 8.0);
        assert_eq!(bytes_to_gb(0), 0.0);
    }
}
