use chrono::{DateTime, Local, TimeZone};
use sysinfo::{Networks, System};

use super::sampler::{sample_system, SamplingWindow};
use super::types::*;
use super::{disk, network, SensorReading};
use crate::core::config::Config;
use crate::core::processes::{ProcessFilter, ProcessRegistry};
use crate::core::sensors::{ProbeContext, SensorSuite};

/// Number of processes carried in every snapshot
pub const TOP_PROCESS_COUNT: usize = 10;

/// Composes sensor readings and the process table into snapshots.
///
/// Stateless between captures: each call samples everything afresh.
pub struct TelemetryAggregator {
    sensors: SensorSuite,
    registry: ProcessRegistry,
    probe: ProbeContext,
}

impl TelemetryAggregator {
    pub fn new(config: &Config) -> Self {
        Self::with_parts(
            SensorSuite::new(),
            ProcessRegistry::new(config.sampling_window()),
            ProbeContext::from_config(config),
        )
    }

    pub fn with_parts(sensors: SensorSuite, registry: ProcessRegistry, probe: ProbeContext) -> Self {
        Self {
            sensors,
            registry,
            probe,
        }
    }

    pub fn window(&self) -> SamplingWindow {
        self.registry.window()
    }

    /// Take a full snapshot. Blocks for the CPU sampling window plus any
    /// sensor probes; unavailable sensors are carried through as-is.
    pub fn capture(&self) -> TelemetrySnapshot {
        let sys = sample_system(self.registry.window());
        let networks = Networks::new_with_refreshed_list();
        let ctx = self
            .probe
            .clone()
            .with_memory(sys.total_memory(), sys.used_memory());

        let processes = ProcessRegistry::enumerate(&sys);
        let process_count = processes.len();
        let top_processes = ProcessFilter::ByCpu.apply(processes, Some(TOP_PROCESS_COUNT));

        let boot_time = boot_time();
        let timestamp = Local::now();

        TelemetrySnapshot {
            timestamp,
            cpu_percent: round1(f64::from(sys.global_cpu_usage())),
            cpu_cores: System::physical_core_count(),
            cpu_frequency_mhz: sys.cpus().first().map(|c| c.frequency()).unwrap_or(0),
            memory: memory_usage(&sys),
            disk: disk::usage(&ctx.disk_path),
            network: network::collect(&networks),
            boot_time,
            uptime_hours: uptime_hours(boot_time, timestamp),
            cpu_temperature: self.sensors.cpu_temperature.read(&ctx),
            ram_frequency_mhz: self.sensors.ram_frequency.read(&ctx),
            ram_power_watts: self.sensors.ram_power.read(&ctx),
            battery: self.sensors.battery.read(&ctx),
            process_count,
            top_processes,
        }
    }

    pub fn hardware(&self) -> SensorReading<HardwareIdentity> {
        self.sensors.hardware_identity.read(&self.probe)
    }

    pub fn public_ip(&self) -> SensorReading<String> {
        network::public_ip_provider().read(&self.probe)
    }
}

fn memory_usage(sys: &System) -> MemoryUsage {
    let total = sys.total_memory();
    let used = sys.used_memory();
    MemoryUsage {
        total_gb: bytes_to_gb(total),
        used_gb: bytes_to_gb(used),
        available_gb: bytes_to_gb(sys.available_memory()),
        percent: percent_of(used, total),
    }
}

/// Boot instant in local time
pub fn boot_time() -> DateTime<Local> {
    Local
        .timestamp_opt(System::boot_time() as i64, 0)
        .single()
        .unwrap_or_else(Local::now)
}

fn uptime_hours(boot: DateTime<Local>, now: DateTime<Local>) -> f64 {
    let seconds = (now - boot).num_seconds().max(0);
    round2(seconds as f64 / 3600.0)
}

/// Uptime split into whole hours and minutes
pub fn uptime() -> UptimeInfo {
    let boot = boot_time();
    let seconds = (Local::now() - boot).num_seconds().max(0) as u64;
    UptimeInfo {
        hours: seconds / 3600,
        minutes: (seconds % 3600) / 60,
        boot_time: boot,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_uptime_hours_rounding() {
        let now = Local::now();
        let boot = now - Duration::minutes(90);
        assert_eq!(uptime_hours(boot, now), 1.5);
    }

    #[test]
    fn test_uptime_hours_never_negative() {
        let now = Local::now();
        assert_eq!(uptime_hours(now + Duration::seconds(30), now), 0.0);
    }

    #[test]
    fn test_uptime_split() {
        let info = uptime();
        assert!(info.minutes < 60);
        assert!(info.boot_time <= Local::now());
    }
}
