pub mod commands;

use clap::{Parser, Subcommand};
use std::process::ExitCode;

use caja_core::config::{AppConfig, LoadOptions, LogFormat};

#[derive(Debug, Parser)]
#[command(
    name = "caja",
    about = "Caja operator CLI",
    long_about = "Inspect caja configuration and validate backend readiness.",
    after_help = "Examples:\n  caja config\n  caja doctor --json\n  caja doctor --warehouse 3"
)]
pub struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    #[command(
        about = "Inspect effective configuration values with source attribution and redaction"
    )]
    Config,
    #[command(about = "Validate config, token readiness, and backend reachability checks")]
    Doctor {
        #[arg(long, help = "Emit machine-readable JSON output")]
        json: bool,
        #[arg(long, help = "Probe the product catalog of this warehouse instead of the client directory")]
        warehouse: Option<i64>,
    },
}

pub fn run() -> ExitCode {
    init_logging();
    let cli = Cli::parse();

    let result = match cli.command {
        Command::Config => {
            commands::CommandResult { exit_code: 0, output: commands::config::run() }
        }
        Command::Doctor { json, warehouse } => {
            commands::CommandResult { exit_code: 0, output: commands::doctor::run(json, warehouse) }
        }
    };

    println!("{}", result.output);
    ExitCode::from(result.exit_code)
}

fn init_logging() {
    use tracing::Level;

    // Command output goes to stdout; logs must stay on stderr. A config
    // failure here is not fatal, doctor reports it properly.
    let (level, format) = match AppConfig::load(LoadOptions::default()) {
        Ok(config) => {
            (config.logging.level.parse::<Level>().unwrap_or(Level::INFO), config.logging.format)
        }
        Err(_) => (Level::INFO, LogFormat::Compact),
    };

    let builder = tracing_subscriber::fmt()
        .with_target(false)
        .with_max_level(level)
        .with_writer(std::io::stderr);
    match format {
        LogFormat::Compact => builder.compact().init(),
        LogFormat::Pretty => builder.pretty().init(),
        LogFormat::Json => builder.json().init(),
    }
}
