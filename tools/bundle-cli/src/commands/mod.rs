//! CLI command implementations.

pub mod config;
pub mod preview;
pub mod sanitize;

use clap::{Args, Subcommand};

/// Arguments for the preview command.
#[derive(Args)]
pub struct PreviewArgs {
    /// Event document (JSON file, or `-` for stdin).
    pub file: String,

    /// Only render one destination.
    #[arg(short, long, value_parser = ["ga4", "pixel"])]
    pub destination: Option<String>,

    /// Run the event through the tracker with printing destinations.
    #[arg(long)]
    pub dispatch: bool,
}

/// Arguments for the sanitize command.
#[derive(Args)]
pub struct SanitizeArgs {
    /// Parameter object (JSON file, or `-` for stdin).
    pub file: String,
}

/// Arguments for the config command.
#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub action: ConfigAction,
}

/// Config subcommands.
#[derive(Subcommand)]
pub enum ConfigAction {
    /// Show the effective configuration
    Show,

    /// Write a default configuration file
    Init {
        /// Output path.
        #[arg(default_value = "analytics.toml")]
        path: String,

        /// Overwrite an existing file.
        #[arg(short, long)]
        force: bool,
    },
}
