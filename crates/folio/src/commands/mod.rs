//! CLI command implementations.

pub(crate) mod build;
pub(crate) mod serve;

use std::path::PathBuf;

use clap::Args;

pub(crate) use build::BuildArgs;
pub(crate) use serve::ServeArgs;

/// Arguments shared by every command.
#[derive(Args)]
pub(crate) struct CommonArgs {
    /// Path to configuration file (default: auto-discover folio.toml).
    #[arg(short, long, env = "FOLIO_CONFIG")]
    pub config: Option<PathBuf>,

    /// Enable verbose output (show render warnings and timing logs).
    #[arg(short, long)]
    pub verbose: bool,
}
