use clap::{CommandFactory, Parser, ValueHint};
use std::path::PathBuf;

/// Validate DESTEST heat demand against a synthetic standard load profile.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Set the logging level
    #[arg(long, default_value = "info")]
    pub log_level: tracing::Level,

    /// TOML file overriding the built-in dataset configuration
    #[arg(long, value_hint = ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    /// Write comparison charts (SVG) into this directory
    #[arg(long, value_hint = ValueHint::DirPath, conflicts_with = "no_plot")]
    pub plot_dir: Option<PathBuf>,

    /// Print the text summary even if a chart directory is configured
    #[arg(long)]
    pub no_plot: bool,
}

pub fn build_cli_command() -> clap::Command {
    Cli::command()
}
