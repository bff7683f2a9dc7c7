use anyhow::{Context, Result};
use clap::ArgMatches;
use colored::Colorize;

use crate::core::{Config, ProcessFilter, ProcessRegistry};
use crate::ui::system_formatters;

pub fn execute(matches: &ArgMatches) -> Result<()> {
    let filter = ProcessFilter::from_query(
        matches.get_one::<String>("filter").map(String::as_str),
        matches.get_one::<String>("pid").map(String::as_str),
        matches.get_one::<String>("name").map(String::as_str),
    )?;
    let limit = matches.get_one::<usize>("limit").copied();

    let config = Config::load()?;
    let registry = ProcessRegistry::new(config.sampling_window());
    let processes = registry.list(&filter, limit);

    if matches.get_flag("json") {
        let json = serde_json::to_string_pretty(&processes).context("Failed to serialize processes")?;
        println!("{}", json);
        return Ok(());
    }

    println!(
        "{} {}",
        "Processes:".bold(),
        format!("{} ({} shown)", filter, processes.len()).dimmed()
    );
    system_formatters::format_process_table(&processes);
    Ok(())
}
