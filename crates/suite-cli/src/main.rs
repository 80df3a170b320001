//! Suite manifest compiler CLI
//!
//! Compiles the service catalog, the operator overlay, and the project
//! directories under an install root into a process-supervisor document.

mod cli;
mod commands;
mod error;
mod logging;

use clap::Parser;
use colored::Colorize;
use std::time::Duration;

use cli::{Cli, Commands};
use commands::CompileArgs;
use error::Result;

fn main() {
    if let Err(e) = run() {
        eprintln!("{}: {}", "error".red().bold(), e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    logging::init(cli.verbose);
    tracing::debug!("Verbose mode enabled");

    execute_command(cli.command)
}

fn execute_command(cmd: Commands) -> Result<()> {
    match cmd {
        Commands::Compile {
            root,
            overlay,
            catalog,
            vcs_timeout_ms,
            format,
            output,
        } => commands::run_compile(CompileArgs {
            root,
            overlay,
            catalog,
            vcs_timeout: Duration::from_millis(vcs_timeout_ms),
            format,
            output,
        }),
        Commands::Version {
            dir,
            ecosystem,
            vcs_timeout_ms,
        } => commands::run_version(&dir, ecosystem, Duration::from_millis(vcs_timeout_ms)),
        Commands::List { catalog } => commands::run_list(catalog.as_deref()),
    }
}
