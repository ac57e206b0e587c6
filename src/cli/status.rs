use clap::Parser;

/// Arguments for status command
#[derive(Parser, Debug)]
pub struct StatusArgs {
    /// Print the report as JSON
    #[arg(long)]
    pub json: bool,
}
