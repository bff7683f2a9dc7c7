use anyhow::{bail, Context, Result};
use clap::ArgMatches;

use crate::core::telemetry::SensorReading;
use crate::core::{Config, TelemetryAggregator};
use crate::ui::system_formatters;

pub fn execute(matches: &ArgMatches) -> Result<()> {
    let config = Config::load()?;
    let aggregator = TelemetryAggregator::new(&config);

    let SensorReading::Value(hardware) = aggregator.hardware() else {
        bail!("Hardware information is unavailable on this system");
    };

    if matches.get_flag("json") {
        let json = serde_json::to_string_pretty(&hardware).context("Failed to serialize hardware")?;
        println!("{}", json);
    } else {
        system_formatters::format_hardware(&hardware);
    }
    Ok(())
}
