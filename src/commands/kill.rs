use anyhow::{Context, Result};
use clap::ArgMatches;
use colored::Colorize;

use crate::core::{ActionLog, Config, ProcessRegistry};
use crate::error::MonitorError;

pub fn execute(matches: &ArgMatches) -> Result<()> {
    let pid = *matches
        .get_one::<u32>("pid")
        .context("PID argument is required")?;

    let config = Config::load()?;
    let log = ActionLog::new(config.action_log_path());
    let registry = ProcessRegistry::new(config.sampling_window());

    match registry.terminate(pid) {
        Ok(ack) => {
            record(&log, &format!("Process terminated: PID {}", pid));
            println!(
                "{} {}",
                "✓".green(),
                format!("Sent {} to PID {}", ack.signal, ack.pid).green()
            );
            Ok(())
        }
        Err(e) => {
            record(&log, &format!("Failed to terminate PID {}: {}", pid, e));
            let hint = match &e {
                MonitorError::PermissionDenied(_) => Some("Try again with elevated privileges."),
                MonitorError::NotFound(_) => Some("The process may have already exited."),
                _ => None,
            };
            if let Some(hint) = hint {
                println!("{}", hint.dimmed());
            }
            Err(e.into())
        }
    }
}

/// Log write failures are reported as warnings only
fn record(log: &ActionLog, message: &str) {
    if let Err(e) = log.record(message) {
        log::warn!("Could not write action log {:?}: {}", log.path(), e);
    }
}
