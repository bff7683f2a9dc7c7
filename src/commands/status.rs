use anyhow::{Context, Result};
use clap::ArgMatches;

use crate::core::{Config, TelemetryAggregator};
use crate::ui::system_formatters;

pub fn execute(matches: &ArgMatches) -> Result<()> {
    let config = Config::load()?;
    let aggregator = TelemetryAggregator::new(&config);

    let snapshot = aggregator.capture();

    if matches.get_flag("json") {
        let json = serde_json::to_string_pretty(&snapshot).context("Failed to serialize snapshot")?;
        println!("{}", json);
    } else {
        system_formatters::format_snapshot(&snapshot);
    }

    Ok(())
}
