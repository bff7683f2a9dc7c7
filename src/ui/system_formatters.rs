use colored::*;

use super::formatters::{format_bytes_binary, format_percent, format_size, format_time, usage_bar};
use crate::core::archive::BackupSummary;
use crate::core::processes::ProcessInfo;
use crate::core::telemetry::{
    HardwareIdentity, SensorReading, TelemetrySnapshot, TrafficSample, UptimeInfo,
};

fn print_section_header(title: &str) {
    println!("\n{}", title.bold().green());
    println!("{}", "-".repeat(title.len()));
}

fn na<T, F: FnOnce(&T) -> String>(reading: &SensorReading<T>, f: F) -> ColoredString {
    match reading {
        SensorReading::Value(v) => f(v).normal(),
        SensorReading::Unavailable => "N/A".dimmed(),
    }
}

pub fn format_snapshot(s: &TelemetrySnapshot) {
    println!("\n{}", "SYSTEM STATUS".bold().bright_cyan());
    println!("{}", "=".repeat(60));
    println!("  Captured: {}", format_time(&s.timestamp));

    print_section_header("CPU");
    println!(
        "  Usage: {} {}",
        format_percent(s.cpu_percent),
        usage_bar(s.cpu_percent).dimmed()
    );
    if let Some(cores) = s.cpu_cores {
        println!("  Cores: {}", cores);
    }
    println!("  Frequency: {} MHz", s.cpu_frequency_mhz);
    println!(
        "  Temperature: {}",
        na(&s.cpu_temperature, |c| format!("{:.1} °C", c))
    );

    print_section_header("MEMORY");
    println!(
        "  Usage: {} {}",
        format_percent(s.memory.percent),
        usage_bar(s.memory.percent).dimmed()
    );
    println!(
        "  {:.2} GB used of {:.2} GB ({:.2} GB available)",
        s.memory.used_gb, s.memory.total_gb, s.memory.available_gb
    );
    println!(
        "  Frequency: {}",
        na(&s.ram_frequency_mhz, |mhz| format!("{:.0} MHz", mhz))
    );
    println!(
        "  Power (estimate): {}",
        na(&s.ram_power_watts, |w| format!("{:.2} W", w))
    );

    print_section_header("DISK");
    println!(
        "  Usage: {} {}",
        format_percent(s.disk.percent),
        usage_bar(s.disk.percent).dimmed()
    );
    println!(
        "  {:.2} GB used of {:.2} GB ({:.2} GB free)",
        s.disk.used_gb, s.disk.total_gb, s.disk.free_gb
    );

    print_section_header("NETWORK");
    println!("  Local IP: {}", na(&s.network.local_ip, |ip| ip.clone()));
    println!("  Sent: {}", format_bytes_binary(s.network.bytes_sent));
    println!("  Received: {}", format_bytes_binary(s.network.bytes_recv));

    if let SensorReading::Value(battery) = &s.battery {
        print_section_header("BATTERY");
        let source = if battery.plugged {
            "Plugged in".green()
        } else {
            "On battery".yellow()
        };
        println!("  Charge: {:.1}% ({})", battery.percent, source);
        if let Some(secs) = battery.time_left_seconds.filter(|s| *s > 0) {
            println!("  Remaining: {}h {:02}m", secs / 3600, (secs % 3600) / 60);
        }
    }

    print_section_header("UPTIME");
    println!(
        "  {:.2} hours (since {})",
        s.uptime_hours,
        format_time(&s.boot_time)
    );

    print_section_header(&format!(
        "TOP PROCESSES ({} running)",
        s.process_count
    ));
    format_process_table(&s.top_processes);
    println!();
}

pub fn format_process_table(processes: &[ProcessInfo]) {
    if processes.is_empty() {
        println!("  {}", "No matching processes".dimmed());
        return;
    }

    println!(
        "  {:>8}  {:<32} {:>7} {:>7}",
        "PID".bold(),
        "NAME".bold(),
        "CPU%".bold(),
        "MEM%".bold()
    );
    for p in processes {
        let name: String = p.name.chars().take(32).collect();
        println!(
            "  {:>8}  {:<32} {:>7.1} {:>7.1}",
            p.pid, name, p.cpu_percent, p.memory_percent
        );
    }
}

pub fn format_hardware(hw: &HardwareIdentity) {
    println!("\n{}", "HARDWARE".bold().bright_cyan());
    println!("{}", "=".repeat(60));
    println!("  System: {} {}", hw.system, hw.version);
    println!("  Architecture: {}", hw.architecture);
    println!("  Processor: {}", hw.processor);
    match hw.cpu_cores {
        Some(cores) => println!("  Cores: {} physical, {} logical", cores, hw.cpu_threads),
        None => println!("  Threads: {}", hw.cpu_threads),
    }
    println!("  Memory: {:.2} GB", hw.memory_total_gb);
    println!("  Disk: {:.2} GB", hw.disk_total_gb);
    println!();
}

pub fn format_uptime(info: &UptimeInfo) {
    println!(
        "{} {}h {}m",
        "Uptime:".white(),
        info.hours.to_string().cyan().bold(),
        info.minutes.to_string().cyan().bold()
    );
    println!("{} {}", "Booted:".white(), format_time(&info.boot_time).dimmed());
}

pub fn format_network(local_ip: &SensorReading<String>, traffic: &TrafficSample) {
    print_section_header("NETWORK");
    println!("  Local IP: {}", na(local_ip, |ip| ip.clone()));
    println!("  Sent: {:.2} MB", traffic.sent_mb);
    println!("  Received: {:.2} MB", traffic.recv_mb);
    println!("  {}", format!("as of {}", traffic.timestamp).dimmed());
}

pub fn format_backup_list(backups: &[BackupSummary], show_reports: bool) {
    if backups.is_empty() {
        println!("{}", "No backups found.".yellow());
        println!();
        println!("{}", "To create one, run:".white());
        println!("  {}", "taskmon backup".cyan().bold());
        return;
    }

    println!("\n{}", "RECENT BACKUPS".bold().bright_cyan());
    println!("{}", "=".repeat(60));
    for backup in backups {
        println!(
            "  {}  {}  {}",
            backup.name.cyan(),
            format_time(&backup.modified).dimmed(),
            format_size(backup.size_bytes)
        );
        if show_reports {
            println!();
            for line in backup.report_text.lines() {
                println!("    {}", line);
            }
            println!();
        }
    }
}
