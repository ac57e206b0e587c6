//! CLI definitions using clap derive API
//!
//! Per-command argument types live in submodules:
//! - status: Status command arguments
//! - completions: Completions command arguments

use clap::builder::{Styles, styling::AnsiColor};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

pub mod completions;
pub mod status;

pub use completions::CompletionsArgs;
pub use status::StatusArgs;

/// DeskyMode - installs the DeskyMode editor scripts into a Unity project
#[derive(Parser, Debug)]
#[command(
    name = "deskymode",
    author,
    version,
    styles = Styles::styled()
        .header(AnsiColor::Green.on_default().bold())
        .usage(AnsiColor::Green.on_default().bold())
        .literal(AnsiColor::Cyan.on_default().bold())
        .placeholder(AnsiColor::Cyan.on_default()),
    about = "Install the DeskyMode editor scripts into a Unity project",
    long_about = "Copies the staged DeskyMode editor scripts from the package into the project's \
                  Assets folder once Final IK (or its stub) is available, and enables the Final IK \
                  code path when the full package is present.",
    after_help = "\x1b[1m\x1b[32mExamples:\x1b[0m\n   \
                  deskymode ensure                     \x1b[90m# Install if not installed yet\x1b[0m\n   \
                  deskymode refresh                    \x1b[90m# Reinstall the scripts\x1b[0m\n   \
                  deskymode status --json              \x1b[90m# Machine-readable status\x1b[0m\n   \
                  deskymode -p ~/MyAvatar ensure       \x1b[90m# Use another project\x1b[0m\n\n\
                  "
)]
pub struct Cli {
    /// Unity project root (defaults to current directory)
    #[arg(long, short = 'p', global = true, env = "DESKYMODE_PROJECT")]
    pub project: Option<PathBuf>,

    /// Configuration file (defaults to deskymode.yaml in the project root)
    #[arg(long, short = 'c', global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    /// Never prompt; dialogs are printed and acknowledged automatically
    #[arg(long, global = true)]
    pub no_input: bool,

    #[command(flatten)]
    pub probe: ProbeArgs,

    #[command(subcommand)]
    pub command: Commands,
}

/// How type presence is detected
#[derive(Args, Debug, Default, Clone)]
pub struct ProbeArgs {
    /// Treat a type as present (repeatable)
    #[arg(long = "present", value_name = "TYPE", global = true)]
    pub present: Vec<String>,

    /// Do not scan project sources for type declarations
    #[arg(long, global = true)]
    pub no_scan: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Install the scripts unless they are already installed
    Ensure,

    /// Remove and reinstall the scripts
    Refresh,

    /// Show what is installed and what was detected
    Status(StatusArgs),

    /// Show version information
    #[command(hide = true)]
    Version,

    /// Generate shell completions
    Completions(CompletionsArgs),
}
