//! Sanitize command.

use anyhow::{bail, Result};
use bundle_analytics::sanitize::sanitize;
use serde_json::Value;

use crate::commands::SanitizeArgs;
use crate::context::Context;

/// Print the scalar-only form of a parameter object.
pub fn run(args: SanitizeArgs, ctx: &Context) -> Result<()> {
    let Value::Object(params) = ctx.read_json(&args.file)? else {
        bail!("Expected a JSON object in {}", args.file);
    };

    let sanitized = sanitize(&params);
    let dropped = params.len() - sanitized.len();
    ctx.output.json(&sanitized);
    if dropped > 0 {
        ctx.output.debug(&format!("Dropped {} null value(s)", dropped));
    }
    Ok(())
}
