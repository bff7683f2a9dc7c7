//! Memory clock and power draw.
//!
//! Neither figure is exposed by commodity operating systems without elevated
//! tooling. Frequency comes from platform inventory utilities (SMBIOS tables,
//! CIM, system_profiler). Power is never measured: it is a linear model of
//! installed capacity and current usage.

use regex::Regex;

use super::{parse_number, ProbeContext, SensorProvider, Strategy};
use crate::core::telemetry::types::{round2, BYTES_PER_GB};
use crate::error::{MonitorError, Result};
#[cfg(any(target_os = "linux", windows, target_os = "macos"))]
use crate::platform::command::run_with_timeout;

/// Default draw of 8 GB of DDR4 at full activity, in watts
pub const DEFAULT_WATTS_PER_8GB: f64 = 3.0;

#[cfg(any(target_os = "linux", windows, target_os = "macos"))]
pub fn frequency_provider() -> SensorProvider<f64> {
    let mut strategies: Vec<Strategy<f64>> = Vec::new();

    #[cfg(target_os = "linux")]
    strategies.push(Strategy::new("dmidecode", |ctx: &ProbeContext| {
        let output = run_with_timeout("dmidecode", &["-t", "memory"], ctx.command_timeout)?;
        parse_memory_speed(&output)
            .ok_or_else(|| MonitorError::invalid_input("no memory speed in dmidecode output"))
    }));

    #[cfg(windows)]
    strategies.push(Strategy::new("powershell-cim", |ctx: &ProbeContext| {
        let output = run_with_timeout(
            "powershell",
            &[
                "-NoProfile",
                "-Command",
                "(Get-CimInstance Win32_PhysicalMemory | Select-Object -First 1).Speed",
            ],
            ctx.command_timeout,
        )?;
        parse_number(&output)
            .filter(|mhz| *mhz > 0.0)
            .map(f64::round)
            .ok_or_else(|| MonitorError::invalid_input("Win32_PhysicalMemory.Speed not numeric"))
    }));

    #[cfg(target_os = "macos")]
    strategies.push(Strategy::new("system-profiler", |ctx: &ProbeContext| {
        let output = run_with_timeout("system_profiler", &["SPMemoryDataType"], ctx.command_timeout)?;
        parse_memory_speed(&output)
            .ok_or_else(|| MonitorError::invalid_input("no memory speed in system_profiler output"))
    }));

    SensorProvider::new("ram_frequency", strategies)
}

#[cfg(not(any(target_os = "linux", windows, target_os = "macos")))]
pub fn frequency_provider() -> SensorProvider<f64> {
    SensorProvider::new("ram_frequency", Vec::new())
}

pub fn power_provider() -> SensorProvider<f64> {
    SensorProvider::new(
        "ram_power",
        vec![Strategy::new("linear-estimate", |ctx| {
            estimate_power_watts(
                ctx.total_memory_bytes,
                ctx.used_memory_bytes,
                ctx.ram_watts_per_8gb,
            )
        })],
    )
}

/// Extract the memory clock from `dmidecode -t memory` or `system_profiler`.
///
/// Configured speeds are preferred over rated speeds. Slots reporting
/// "Unknown" or zero are skipped. The result is a whole number of MHz.
pub(crate) fn parse_memory_speed(output: &str) -> Option<f64> {
    let re = Regex::new(
        r"(?m)^\s*(Configured Memory Speed|Configured Clock Speed|Speed):\s*(\d+(?:\.\d+)?)\s*(?:MT/s|MHz)",
    )
    .ok()?;

    let mut rated = None;
    for caps in re.captures_iter(output) {
        let Some(mhz) = caps.get(2).and_then(|m| parse_number(m.as_str())) else {
            continue;
        };
        if mhz <= 0.0 {
            continue;
        }
        let mhz = mhz.round();
        if caps[1].starts_with("Configured") {
            return Some(mhz);
        }
        rated.get_or_insert(mhz);
    }
    rated
}

/// `watts = (installed_GB / 8) * watts_per_8gb * (0.5 + 0.5 * usage_fraction)`
///
/// Half the draw is treated as idle refresh power, the other half scales with
/// usage. This is a placeholder heuristic, not a hardware reading.
pub fn estimate_power_watts(total_bytes: u64, used_bytes: u64, watts_per_8gb: f64) -> Result<f64> {
    if total_bytes == 0 {
        return Err(MonitorError::invalid_input("installed memory unknown"));
    }
    let installed_gb = total_bytes as f64 / BYTES_PER_GB;
    let usage_fraction = (used_bytes as f64 / total_bytes as f64).clamp(0.0, 1.0);
    Ok(round2(
        (installed_gb / 8.0) * watts_per_8gb * (0.5 + 0.5 * usage_fraction),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::telemetry::SensorReading;

    const GB: u64 = 1024 * 1024 * 1024;

    #[test]
    fn test_power_estimate_formula() {
        // 16 GB half used: 2 * 3.0 * 0.75
        assert_eq!(estimate_power_watts(16 * GB, 8 * GB, 3.0).unwrap(), 4.5);
        // idle floor is half the coefficient
        assert_eq!(estimate_power_watts(8 * GB, 0, 3.0).unwrap(), 1.5);
        assert_eq!(estimate_power_watts(8 * GB, 8 * GB, 3.0).unwrap(), 3.0);
    }

    #[test]
    fn test_power_estimate_without_memory_total() {
        assert!(estimate_power_watts(0, 0, 3.0).is_err());

        let ctx = ProbeContext::default();
        assert_eq!(power_provider().read(&ctx), SensorReading::Unavailable);
    }

    #[test]
    fn test_power_provider_uses_context() {
        let ctx = ProbeContext::default().with_memory(32 * GB, 16 * GB);
        assert_eq!(power_provider().read(&ctx), SensorReading::Value(9.0));
    }

    #[test]
    fn test_parse_dmidecode_prefers_configured_speed() {
        let output = "\
Memory Device
\tSize: 8 GB
\tSpeed: 3200 MT/s
\tConfigured Memory Speed: 2933 MT/s

Memory Device
\tSize: No Module Installed
\tSpeed: Unknown
\tConfigured Memory Speed: Unknown
";
        assert_eq!(parse_memory_speed(output), Some(2933.0));
    }

    #[test]
    fn test_parse_rated_speed_fallback() {
        let output = "\tSpeed: Unknown\n\tSpeed: 2667 MHz\n";
        assert_eq!(parse_memory_speed(output), Some(2667.0));
    }

    #[test]
    fn test_parse_memory_speed_is_whole_mhz() {
        let output = "\tConfigured Clock Speed: 1599.5 MHz\n";
        assert_eq!(parse_memory_speed(output), Some(1600.0));
    }

    #[test]
    fn test_parse_memory_speed_rejects_empty_and_zero() {
        assert_eq!(parse_memory_speed(""), None);
        assert_eq!(parse_memory_speed("\tSpeed: 0 MT/s\n"), None);
        assert_eq!(parse_memory_speed("# dmidecode 3.5\nPermission denied\n"), None);
    }
}
