//! CPU package temperature.

use std::fs;
use std::path::{Path, PathBuf};

use regex::Regex;
use sysinfo::Components;

use super::{parse_number, ProbeContext, SensorProvider, Strategy};
use crate::core::telemetry::types::round1;
use crate::error::{MonitorError, Result};
use crate::platform::command::run_with_timeout;

/// hwmon driver names that report the CPU die or package
const CPU_HWMON_NAMES: &[&str] = &["coretemp", "k10temp", "zenpower", "cpu_thermal", "acpitz"];

/// Thermal zone types that track the CPU
const CPU_ZONE_TYPES: &[&str] = &["x86_pkg_temp", "cpu", "soc", "acpitz"];

/// Component labels, most specific first
const CPU_COMPONENT_LABELS: &[&str] = &["package id", "tctl", "tdie", "cpu", "coretemp", "k10temp"];

pub fn provider() -> SensorProvider<f64> {
    SensorProvider::new(
        "cpu_temperature",
        vec![
            Strategy::new("sysinfo-components", |_| from_components()),
            Strategy::new("hwmon", |ctx| from_hwmon(&ctx.sysfs_root)),
            Strategy::new("thermal-zone", |ctx| from_thermal_zones(&ctx.sysfs_root)),
            Strategy::new("platform-utility", from_platform_utility),
        ],
    )
}

/// Temperatures outside this range are sensor glitches, not readings.
/// Accepted values are rounded to the one decimal they are reported with.
fn plausible(celsius: f64) -> Result<f64> {
    if celsius > 0.0 && celsius < 150.0 {
        Ok(round1(celsius))
    } else {
        Err(MonitorError::invalid_input(format!(
            "implausible temperature {celsius}"
        )))
    }
}

fn from_components() -> Result<f64> {
    let components = Components::new_with_refreshed_list();

    for wanted in CPU_COMPONENT_LABELS {
        let hit = components.iter().find_map(|c| {
            let label = c.label().to_lowercase();
            if !label.contains(wanted) {
                return None;
            }
            c.temperature().map(f64::from)
        });
        if let Some(celsius) = hit {
            return plausible(celsius);
        }
    }

    Err(MonitorError::not_found("no CPU component sensor"))
}

fn sorted_entries(dir: &Path, prefix: &str) -> Result<Vec<PathBuf>> {
    let mut entries: Vec<PathBuf> = fs::read_dir(dir)?
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| {
            p.file_name()
                .and_then(|n| n.to_str())
                .is_some_and(|n| n.starts_with(prefix))
        })
        .collect();
    entries.sort();
    Ok(entries)
}

/// Read a millidegree file such as `temp1_input`
fn read_millidegrees(path: &Path) -> Result<f64> {
    let raw = fs::read_to_string(path)?;
    let milli = parse_number(&raw)
        .ok_or_else(|| MonitorError::invalid_input(format!("{}: not numeric", path.display())))?;
    plausible(milli / 1000.0)
}

pub(crate) fn from_hwmon(sysfs_root: &Path) -> Result<f64> {
    let base = sysfs_root.join("class").join("hwmon");

    for hwmon in sorted_entries(&base, "hwmon")? {
        let name = match fs::read_to_string(hwmon.join("name")) {
            Ok(n) => n.trim().to_string(),
            Err(_) => continue,
        };
        if !CPU_HWMON_NAMES.contains(&name.as_str()) {
            continue;
        }
        if let Ok(celsius) = read_millidegrees(&hwmon.join("temp1_input")) {
            return Ok(celsius);
        }
    }

    Err(MonitorError::not_found("no CPU hwmon device"))
}

pub(crate) fn from_thermal_zones(sysfs_root: &Path) -> Result<f64> {
    let base = sysfs_root.join("class").join("thermal");

    for zone in sorted_entries(&base, "thermal_zone")? {
        let kind = match fs::read_to_string(zone.join("type")) {
            Ok(t) => t.trim().to_lowercase(),
            Err(_) => continue,
        };
        if !CPU_ZONE_TYPES.iter().any(|t| kind.contains(t)) {
            continue;
        }
        if let Ok(celsius) = read_millidegrees(&zone.join("temp")) {
            return Ok(celsius);
        }
    }

    Err(MonitorError::not_found("no CPU thermal zone"))
}

/// Parse `sensors` output, e.g. `Package id 0:  +45.0°C  (high = +80.0°C)`
pub(crate) fn parse_sensors_output(output: &str) -> Option<f64> {
    let re = Regex::new(r"(?m)^(?:Package id \d+|Tctl|Tdie|CPU):\s+\+?(-?\d+(?:\.\d+)?)").ok()?;
    re.captures(output)
        .and_then(|caps| caps.get(1))
        .and_then(|m| parse_number(m.as_str()))
}

#[cfg(target_os = "linux")]
fn from_platform_utility(ctx: &ProbeContext) -> Result<f64> {
    let output = run_with_timeout("sensors", &[], ctx.command_timeout)?;
    let celsius = parse_sensors_output(&output)
        .ok_or_else(|| MonitorError::invalid_input("no CPU line in sensors output"))?;
    plausible(celsius)
}

#[cfg(windows)]
fn from_platform_utility(ctx: &ProbeContext) -> Result<f64> {
    let output = run_with_timeout(
        "powershell",
        &[
            "-NoProfile",
            "-Command",
            "(Get-CimInstance -Namespace root/wmi -ClassName MSAcpi_ThermalZoneTemperature \
             | Select-Object -First 1).CurrentTemperature",
        ],
        ctx.command_timeout,
    )?;
    // Reported in tenths of a kelvin
    let tenths_kelvin = parse_number(&output)
        .ok_or_else(|| MonitorError::invalid_input("thermal zone query returned no value"))?;
    plausible(tenths_kelvin / 10.0 - 273.15)
}

#[cfg(not(any(target_os = "linux", windows)))]
fn from_platform_utility(_ctx: &ProbeContext) -> Result<f64> {
    Err(MonitorError::not_found(
        "no temperature utility on this platform",
    ))
}
