use anyhow::{Context, Result};
use clap::ArgMatches;

use crate::core::telemetry;
use crate::ui::system_formatters;

pub fn execute(matches: &ArgMatches) -> Result<()> {
    let info = telemetry::uptime();

    if matches.get_flag("json") {
        let json = serde_json::to_string_pretty(&info).context("Failed to serialize uptime")?;
        println!("{}", json);
    } else {
        system_formatters::format_uptime(&info);
    }
    Ok(())
}
