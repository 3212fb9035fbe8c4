//! Bundle CLI - developer tool for the storefront analytics layer.
//!
//! Commands:
//! - `bundle preview` - Render the GA4 and pixel payloads for an event document
//! - `bundle sanitize` - Show what the pixel would receive for a parameter object
//! - `bundle config` - Inspect or create the analytics configuration

mod commands;
mod context;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

use commands::{ConfigArgs, PreviewArgs, SanitizeArgs};

/// Bundle CLI - preview storefront analytics payloads
#[derive(Parser)]
#[command(name = "bundle")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Use JSON output format
    #[arg(long, global = true)]
    json: bool,

    /// Config file path
    #[arg(short, long, global = true)]
    config: Option<String>,

    /// Log line format
    #[arg(long, global = true, value_enum, default_value_t = LogFormat::Human)]
    log_format: LogFormat,

    #[command(subcommand)]
    command: Commands,
}

/// Output format for logs.
#[derive(Debug, Clone, Copy, ValueEnum)]
enum LogFormat {
    /// Human-readable format (for development).
    Human,
    /// JSON format (for log aggregation).
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Render destination payloads for an event document
    Preview(PreviewArgs),

    /// Sanitize a parameter object for the pixel
    Sanitize(SanitizeArgs),

    /// Manage configuration
    Config(ConfigArgs),
}

fn init_logging(verbose: bool, format: LogFormat) -> Result<()> {
    let default = if verbose {
        "bundle=debug,bundle_analytics=debug"
    } else {
        "bundle=info,bundle_analytics=info"
    };
    let filter = EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(default))?;
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    match format {
        LogFormat::Human => builder.init(),
        LogFormat::Json => builder.json().init(),
    }
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose, cli.log_format)?;

    // Setup output formatting
    let output = output::Output::new(cli.verbose, cli.json);

    // Load config
    let ctx = context::Context::load(cli.config.as_deref(), output)?;

    // Execute command
    let result = match cli.command {
        Commands::Preview(args) => commands::preview::run(args, &ctx),
        Commands::Sanitize(args) => commands::sanitize::run(args, &ctx),
        Commands::Config(args) => commands::config::run(args, &ctx),
    };

    if let Err(e) = result {
        ctx.output.error(&format!("{:#}", e));
        std::process::exit(1);
    }

    Ok(())
}
