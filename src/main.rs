//! DeskyMode - Unity editor script installer
//!
//! Installs the DeskyMode editor scripts from the package into a Unity project
//! once Final IK (or its stub) is available.

use clap::Parser;

mod cli;
mod commands;
mod config;
mod error;
mod hash;
mod installer;
mod logging;
mod probe;
mod refresh;
mod transaction;
mod ui;

use cli::{Cli, Commands};
use commands::Context;
use error::Result;

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Version => return commands::version::run(),
        Commands::Completions(args) => return commands::completions::run(args),
        _ => {}
    }

    let ctx = Context::from_cli(&cli)?;
    match cli.command {
        Commands::Ensure => commands::ensure::run(&ctx),
        Commands::Refresh => commands::refresh::run(&ctx),
        Commands::Status(args) => commands::status::run(&ctx, args),
        Commands::Version | Commands::Completions(_) => Ok(()),
    }
}

fn main() {
    let cli = Cli::parse();
    logging::init_logger(cli.verbose);

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
