//! Config command.

use anyhow::{bail, Context as _, Result};
use bundle_analytics::AnalyticsConfig;

use crate::commands::{ConfigAction, ConfigArgs};
use crate::context::Context;

pub fn run(args: ConfigArgs, ctx: &Context) -> Result<()> {
    match args.action {
        ConfigAction::Show => show(ctx),
        ConfigAction::Init { path, force } => init(ctx, &path, force),
    }
}

fn show(ctx: &Context) -> Result<()> {
    if ctx.output.is_json() {
        ctx.output.json(&ctx.config);
        return Ok(());
    }

    match &ctx.config_path {
        Some(path) => ctx.output.info(&format!("Loaded from {}", path.display())),
        None => ctx.output.info("No config file found, using defaults"),
    }

    let config = &ctx.config;
    ctx.output.header("Items");
    ctx.output.kv("default currency", config.default_currency.code());
    ctx.output.kv("brand", &config.items.brand);
    ctx.output.kv("category", &config.items.category);

    ctx.output.header("GA4");
    ctx.output.kv("enabled", &config.ga4.enabled.to_string());
    ctx.output.kv("clear ecommerce", &config.ga4.clear_ecommerce.to_string());

    ctx.output.header("Pixel");
    ctx.output.kv("enabled", &config.pixel.enabled.to_string());
    Ok(())
}

fn init(ctx: &Context, path: &str, force: bool) -> Result<()> {
    let target = ctx.resolve_path(path);
    if target.exists() && !force {
        bail!("{} already exists (use --force to overwrite)", target.display());
    }

    AnalyticsConfig::default()
        .save(&target)
        .with_context(|| format!("Failed to write {}", target.display()))?;
    ctx.output.success(&format!("Wrote {}", target.display()));
    Ok(())
}
