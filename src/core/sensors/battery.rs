//! Battery charge and power source.
//!
//! Desktops have no battery, so `Unavailable` is the usual outcome there.

use std::fs;
use std::path::Path;

use battery::units::ratio::percent;
use battery::units::time::second;
use battery::State;

use super::{parse_number, SensorProvider, Strategy};
use crate::core::telemetry::types::round1;
use crate::core::telemetry::BatteryStatus;
use crate::error::{MonitorError, Result};

pub fn provider() -> SensorProvider<BatteryStatus> {
    SensorProvider::new(
        "battery",
        vec![
            Strategy::new("battery-manager", |_| from_manager()),
            Strategy::new("power-supply-sysfs", |ctx| from_power_supply(&ctx.sysfs_root)),
        ],
    )
}

fn from_manager() -> Result<BatteryStatus> {
    let manager = battery::Manager::new()
        .map_err(|e| MonitorError::unknown(format!("battery manager: {e}")))?;
    let mut batteries = manager
        .batteries()
        .map_err(|e| MonitorError::unknown(format!("battery enumeration: {e}")))?;

    let battery = batteries
        .find_map(|b| b.ok())
        .ok_or_else(|| MonitorError::not_found("no battery present"))?;

    let discharging = battery.state() == State::Discharging;
    let time_left_seconds = if discharging {
        battery
            .time_to_empty()
            .map(|t| t.get::<second>())
            .filter(|s| s.is_finite() && *s > 0.0)
            .map(|s| s as u64)
    } else {
        None
    };

    Ok(BatteryStatus {
        percent: round1(f64::from(battery.state_of_charge().get::<percent>())),
        plugged: !discharging,
        time_left_seconds,
    })
}

fn read_trimmed(path: &Path) -> Option<String> {
    fs::read_to_string(path).ok().map(|s| s.trim().to_string())
}

fn read_number(path: &Path) -> Option<f64> {
    read_trimmed(path).and_then(|s| parse_number(&s))
}

pub(crate) fn from_power_supply(sysfs_root: &Path) -> Result<BatteryStatus> {
    let base = sysfs_root.join("class").join("power_supply");
    let mut supplies: Vec<_> = fs::read_dir(&base)?
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| {
            p.file_name()
                .and_then(|n| n.to_str())
                .is_some_and(|n| n.starts_with("BAT"))
        })
        .collect();
    supplies.sort();

    let dir = supplies
        .first()
        .ok_or_else(|| MonitorError::not_found("no BAT* power supply"))?;

    let capacity = read_number(&dir.join("capacity"))
        .ok_or_else(|| MonitorError::invalid_input("battery capacity unreadable"))?;
    let status = read_trimmed(&dir.join("status")).unwrap_or_default();
    let discharging = status.eq_ignore_ascii_case("discharging");

    let time_left_seconds = if discharging {
        remaining_seconds(dir)
    } else {
        None
    };

    Ok(BatteryStatus {
        percent: round1(capacity.clamp(0.0, 100.0)),
        plugged: !discharging,
        time_left_seconds,
    })
}

/// Remaining runtime from energy/power (µWh, µW) or charge/current (µAh, µA)
fn remaining_seconds(dir: &Path) -> Option<u64> {
    let pairs = [("energy_now", "power_now"), ("charge_now", "current_now")];
    pairs.iter().find_map(|(stock, rate)| {
        let stock = read_number(&dir.join(stock))?;
        let rate = read_number(&dir.join(rate))?;
        (rate > 0.0).then(|| (stock / rate * 3600.0) as u64)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn supply(root: &Path, name: &str, files: &[(&str, &str)]) {
        let dir = root.join("class/power_supply").join(name);
        fs::create_dir_all(&dir).unwrap();
        for (file, content) in files {
            fs::write(dir.join(file), content).unwrap();
        }
    }

    #[test]
    fn test_desktop_without_battery() {
        let root = TempDir::new().unwrap();
        supply(root.path(), "AC", &[("online", "1\n")]);

        assert!(matches!(
            from_power_supply(root.path()),
            Err(MonitorError::NotFound(_))
        ));
    }

    #[test]
    fn test_missing_sysfs_tree() {
        let root = TempDir::new().unwrap();
        assert!(from_power_supply(root.path()).is_err());
    }

    #[test]
    fn test_discharging_battery_reports_time_left() {
        let root = TempDir::new().unwrap();
        supply(
            root.path(),
            "BAT0",
            &[
                ("capacity", "76\n"),
                ("status", "Discharging\n"),
                ("energy_now", "30000000\n"),
                ("power_now", "10000000\n"),
            ],
        );

        let status = from_power_supply(root.path()).unwrap();
        assert_eq!(status.percent, 76.0);
        assert!(!status.plugged);
        assert_eq!(status.time_left_seconds, Some(3 * 3600));
    }

    #[test]
    fn test_charging_battery_has_no_time_left() {
        let root = TempDir::new().unwrap();
        supply(
            root.path(),
            "BAT1",
            &[("capacity", "40\n"), ("status", "Charging\n")],
        );

        let status = from_power_supply(root.path()).unwrap();
        assert!(status.plugged);
        assert_eq!(status.time_left_seconds, None);
    }

    #[test]
    fn test_garbage_capacity_is_error() {
        let root = TempDir::new().unwrap();
        supply(root.path(), "BAT0", &[("capacity", "n/a\n")]);
        assert!(from_power_supply(root.path()).is_err());
    }
}
