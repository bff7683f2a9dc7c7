use anyhow::Result;
use clap::ArgMatches;

use crate::core::archive::list_recent_backups;
use crate::core::Config;
use crate::ui::system_formatters;

pub fn execute(matches: &ArgMatches) -> Result<()> {
    let config = Config::load()?;
    let count = matches
        .get_one::<usize>("count")
        .copied()
        .unwrap_or(config.recent_backups);

    let backups = list_recent_backups(&config.backups_dir(), count)?;
    system_formatters::format_backup_list(&backups, matches.get_flag("show"));
    Ok(())
}
