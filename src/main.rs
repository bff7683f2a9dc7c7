use anyhow::Result;
use clap::{value_parser, Arg, ArgAction, Command};
use colored::*;

use taskmon::commands;

fn json_flag() -> Arg {
    Arg::new("json")
        .long("json")
        .help("Print machine-readable JSON")
        .action(ArgAction::SetTrue)
}

fn build_cli() -> Command {
    Command::new("taskmon")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Host telemetry, process management and snapshot backups")
        .disable_version_flag(true)
        .arg(
            Arg::new("version")
                .short('V')
                .long("version")
                .help("Print version information")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Show debug logging (RUST_LOG overrides)")
                .global(true)
                .action(ArgAction::SetTrue),
        )
        .subcommand(
            Command::new("status")
                .about("Capture and show a full telemetry snapshot")
                .arg(json_flag()),
        )
        .subcommand(
            Command::new("processes")
                .about("List processes")
                .visible_alias("ps")
                .arg(
                    Arg::new("filter")
                        .short('f')
                        .long("filter")
                        .value_name("FILTER")
                        .help("Selection: all, cpu, memory, idle")
                        .default_value("all"),
                )
                .arg(
                    Arg::new("pid")
                        .short('p')
                        .long("pid")
                        .value_name("PID")
                        .help("Only the process with this pid"),
                )
                .arg(
                    Arg::new("name")
                        .short('n')
                        .long("name")
                        .value_name("NAME")
                        .help("Only processes whose name contains NAME (case-insensitive)"),
                )
                .arg(
                    Arg::new("limit")
                        .short('l')
                        .long("limit")
                        .value_name("N")
                        .help("Maximum number of entries (cpu/memory default to 10)")
                        .value_parser(value_parser!(usize)),
                )
                .arg(json_flag()),
        )
        .subcommand(
            Command::new("kill")
                .about("Ask a process to terminate")
                .arg(
                    Arg::new("pid")
                        .help("Process id")
                        .required(true)
                        .index(1)
                        .value_parser(value_parser!(u32)),
                ),
        )
        .subcommand(
            Command::new("backup")
                .about("Capture a snapshot and archive it (JSON, history, report, bundle)"),
        )
        .subcommand(
            Command::new("backups")
                .about("List the most recent backups")
                .arg(
                    Arg::new("count")
                        .short('c')
                        .long("count")
                        .value_name("N")
                        .help("How many backups to list")
                        .value_parser(value_parser!(usize)),
                )
                .arg(
                    Arg::new("show")
                        .short('s')
                        .long("show")
                        .help("Print each report")
                        .action(ArgAction::SetTrue),
                ),
        )
        .subcommand(
            Command::new("hardware")
                .about("Show static hardware information")
                .arg(json_flag()),
        )
        .subcommand(
            Command::new("uptime")
                .about("Show time since boot")
                .arg(json_flag()),
        )
        .subcommand(
            Command::new("network")
                .about("Show local IP and traffic totals")
                .arg(
                    Arg::new("public")
                        .long("public")
                        .help("Also look up the public IP address")
                        .action(ArgAction::SetTrue),
                )
                .arg(json_flag()),
        )
        .subcommand(
            Command::new("logs")
                .about("Show the action log")
                .arg(
                    Arg::new("tail")
                        .short('t')
                        .long("tail")
                        .value_name("N")
                        .help("Only the last N lines")
                        .value_parser(value_parser!(usize)),
                ),
        )
        .subcommand(
            Command::new("config")
                .about("Manage configuration (use 'taskmon config --help' for subcommands)")
                .subcommand_required(true)
                .arg_required_else_help(true)
                .subcommand(Command::new("show").about("Show the current configuration"))
                .subcommand(
                    Command::new("set")
                        .about("Set a configuration value")
                        .arg(
                            Arg::new("key")
                                .help("data_dir, disk_path, cpu_sample_ms, command_timeout_secs, ram_watts_per_8gb, recent_backups")
                                .required(true)
                                .index(1),
                        )
                        .arg(
                            Arg::new("value")
                                .help("New value")
                                .required(true)
                                .index(2),
                        ),
                )
                .subcommand(Command::new("reset").about("Restore default configuration")),
        )
        .subcommand(Command::new("version").about("Shows version information"))
}

fn main() -> Result<()> {
    let matches = build_cli().get_matches();

    taskmon::init_logging(matches.get_flag("verbose"));

    if matches.get_flag("version") {
        return commands::version();
    }

    match matches.subcommand() {
        Some(("status", sub_matches)) => commands::status(sub_matches),
        Some(("processes", sub_matches)) => commands::processes::execute(sub_matches),
        Some(("kill", sub_matches)) => commands::kill::execute(sub_matches),
        Some(("backup", sub_matches)) => commands::backup::execute(sub_matches),
        Some(("backups", sub_matches)) => commands::backups::execute(sub_matches),
        Some(("hardware", sub_matches)) => commands::hardware::execute(sub_matches),
        Some(("uptime", sub_matches)) => commands::uptime::execute(sub_matches),
        Some(("network", sub_matches)) => commands::network::execute(sub_matches),
        Some(("logs", sub_matches)) => commands::logs::execute(sub_matches),
        Some(("config", sub_matches)) => commands::config::execute(sub_matches),
        Some(("version", _)) => commands::version(),
        _ => {
            println!("{}", "Welcome to taskmon!".cyan().bold());
            println!("Use 'taskmon --help' for more information.");
            Ok(())
        }
    }
}
