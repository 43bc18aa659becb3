pub use clap::Parser;

use std::path::PathBuf;

use tracing::level_filters::LevelFilter;

#[derive(Parser, Debug)]
#[command(name = "delphi")]
#[command(about = "Sign, verify, encrypt and decrypt messages between principals")]
pub struct Args {
    /// Path to the delphi config directory (defaults to ~/.delphi)
    #[arg(long, global = true)]
    pub config_path: Option<PathBuf>,

    /// Log level for messages written to stderr (overrides the config file)
    #[arg(long, global = true)]
    pub log_level: Option<LevelFilter>,

    #[command(subcommand)]
    pub command: crate::Command,
}
