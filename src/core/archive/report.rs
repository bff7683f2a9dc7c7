//! Fixed-layout plain-text backup report.

use std::fmt::Write;

use crate::core::telemetry::{BatteryStatus, TelemetrySnapshot};

const RULE: &str = "============================================================";
const DATE_FORMAT: &str = "%d/%m/%Y %H:%M:%S";

/// Render the human-readable summary stored alongside each backup.
///
/// Percentages are printed with one decimal, matching the precision they
/// are stored with, so the figures here equal those in the JSON and
/// history artifacts.
pub fn render_report(snapshot: &TelemetrySnapshot, key: &str) -> String {
    let mut out = String::new();
    // Writing to a String cannot fail
    let _ = write_report(&mut out, snapshot, key);
    out
}

fn write_report(out: &mut String, s: &TelemetrySnapshot, key: &str) -> std::fmt::Result {
    section(out, &format!("TASKMONITOR BACKUP - {}", key))?;
    writeln!(out, "Backup time: {}", s.timestamp.format(DATE_FORMAT))?;
    writeln!(out)?;

    section(out, "SYSTEM SUMMARY")?;
    writeln!(out, "CPU: {:.1}%", s.cpu_percent)?;
    writeln!(
        out,
        "   - Cores: {}",
        s.cpu_cores.map_or_else(|| "N/A".to_string(), |c| c.to_string())
    )?;
    writeln!(out, "   - Frequency: {} MHz", s.cpu_frequency_mhz)?;
    writeln!(out)?;

    writeln!(out, "MEMORY: {:.1}%", s.memory.percent)?;
    writeln!(out, "   - Total: {:.2} GB", s.memory.total_gb)?;
    writeln!(out, "   - Used: {:.2} GB", s.memory.used_gb)?;
    writeln!(out, "   - Available: {:.2} GB", s.memory.available_gb)?;
    writeln!(out)?;

    writeln!(out, "DISK: {:.1}%", s.disk.percent)?;
    writeln!(out, "   - Total: {:.2} GB", s.disk.total_gb)?;
    writeln!(out, "   - Used: {:.2} GB", s.disk.used_gb)?;
    writeln!(out, "   - Free: {:.2} GB", s.disk.free_gb)?;
    writeln!(out)?;

    writeln!(out, "NETWORK:")?;
    writeln!(out, "   - Local IP: {}", s.network.local_ip)?;
    writeln!(out, "   - Bytes sent: {}", group_thousands(s.network.bytes_sent))?;
    writeln!(out, "   - Bytes received: {}", group_thousands(s.network.bytes_recv))?;
    writeln!(out)?;

    writeln!(out, "UPTIME: {:.2} hours", s.uptime_hours)?;
    writeln!(out, "   - Boot: {}", s.boot_time.format(DATE_FORMAT))?;
    writeln!(out)?;

    section(out, "ADVANCED SENSORS")?;
    writeln!(
        out,
        "CPU TEMPERATURE: {}",
        s.cpu_temperature.display_with(|c| format!("{:.1} °C", c))
    )?;
    writeln!(
        out,
        "RAM FREQUENCY: {}",
        s.ram_frequency_mhz.display_with(|mhz| format!("{:.0} MHz", mhz))
    )?;
    writeln!(
        out,
        "RAM POWER (estimate): {}",
        s.ram_power_watts.display_with(|w| format!("{:.2} W", w))
    )?;
    if let Some(battery) = s.battery.as_ref().value() {
        writeln!(out, "BATTERY: {}", battery_line(battery))?;
    }
    writeln!(out)?;

    section(out, "TOP 10 PROCESSES (by CPU usage)")?;
    if s.top_processes.is_empty() {
        writeln!(out, "(no processes could be read)")?;
    }
    for (rank, p) in s.top_processes.iter().enumerate() {
        writeln!(out, "{}. {} (PID: {})", rank + 1, p.name, p.pid)?;
        writeln!(
            out,
            "   CPU: {:.1}% | RAM: {:.1}%",
            p.cpu_percent, p.memory_percent
        )?;
        writeln!(out)?;
    }

    Ok(())
}

fn section(out: &mut String, title: &str) -> std::fmt::Result {
    writeln!(out, "{}", RULE)?;
    writeln!(out, "{}", title)?;
    writeln!(out, "{}", RULE)?;
    writeln!(out)
}

fn battery_line(battery: &BatteryStatus) -> String {
    let source = if battery.plugged {
        "plugged in"
    } else {
        "on battery"
    };
    match battery.time_left_seconds.filter(|s| *s > 0) {
        Some(secs) => format!(
            "{:.1}% ({}, {} min remaining)",
            battery.percent,
            source,
            secs / 60
        ),
        None => format!("{:.1}% ({})", battery.percent, source),
    }
}

/// `1234567` -> `1,234,567`
pub fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}
