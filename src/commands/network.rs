use anyhow::{Context, Result};
use clap::ArgMatches;
use colored::Colorize;
use sysinfo::Networks;

use crate::core::telemetry::{network, SensorReading};
use crate::core::{Config, TelemetryAggregator};
use crate::ui::system_formatters;

pub fn execute(matches: &ArgMatches) -> Result<()> {
    let networks = Networks::new_with_refreshed_list();
    let local_ip = network::local_ip(&networks);
    let traffic = network::traffic_sample();

    let public_ip = if matches.get_flag("public") {
        let config = Config::load()?;
        Some(TelemetryAggregator::new(&config).public_ip())
    } else {
        None
    };

    if matches.get_flag("json") {
        let value = serde_json::json!({
            "local_ip": local_ip,
            "public_ip": public_ip,
            "traffic": traffic,
        });
        let json = serde_json::to_string_pretty(&value).context("Failed to serialize network")?;
        println!("{}", json);
        return Ok(());
    }

    system_formatters::format_network(&local_ip, &traffic);
    match public_ip {
        Some(SensorReading::Value(ip)) => println!("  Public IP: {}", ip.cyan()),
        Some(SensorReading::Unavailable) => println!("  Public IP: {}", "N/A".dimmed()),
        None => {}
    }
    Ok(())
}
