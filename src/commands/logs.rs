use anyhow::Result;
use clap::ArgMatches;
use colored::Colorize;

use crate::core::{ActionLog, Config};

pub fn execute(matches: &ArgMatches) -> Result<()> {
    let config = Config::load()?;
    let log = ActionLog::new(config.action_log_path());
    let content = log.read_all()?;

    if content.is_empty() {
        println!("{}", "No actions recorded yet.".yellow());
        return Ok(());
    }

    let lines: Vec<&str> = content.lines().collect();
    let start = matches
        .get_one::<usize>("tail")
        .map_or(0, |n| lines.len().saturating_sub(*n));
    for line in &lines[start..] {
        println!("{}", line);
    }
    Ok(())
}
