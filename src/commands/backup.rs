use anyhow::Result;
use clap::ArgMatches;
use colored::Colorize;

use crate::core::{ActionLog, Config, SnapshotArchiver, TelemetryAggregator};
use crate::ui::format_size;

pub fn execute(_matches: &ArgMatches) -> Result<()> {
    let config = Config::load()?;
    let aggregator = TelemetryAggregator::new(&config);
    let archiver = SnapshotArchiver::from_config(&config);
    let log = ActionLog::new(config.action_log_path());

    println!("{}", "Capturing system snapshot...".cyan());
    let snapshot = aggregator.capture();

    let record = match archiver.archive(&snapshot) {
        Ok(record) => record,
        Err(e) => {
            if let Err(log_err) = log.record(&format!("Backup failed: {}", e)) {
                log::warn!("Could not write action log: {}", log_err);
            }
            return Err(e.into());
        }
    };

    if let Err(e) = log.record(&format!("Backup created: {}", record.report_name())) {
        log::warn!("Could not write action log: {}", e);
    }

    println!("{} {}", "✓ Backup created:".green(), record.key.cyan().bold());
    for path in record.artifacts() {
        let size = std::fs::metadata(path).map(|m| m.len()).unwrap_or(0);
        println!("  {} {}", path.display(), format_size(size).dimmed());
    }

    Ok(())
}
