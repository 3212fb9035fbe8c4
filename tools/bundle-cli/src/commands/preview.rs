//! Preview command.
//!
//! Renders both destination payloads for an event document, or, with
//! `--dispatch`, runs it through the tracker with destinations that print
//! what they receive.

use std::sync::Arc;

use anyhow::{Context as _, Result};
use bundle_analytics::prelude::*;
use serde_json::{json, Value};

use crate::commands::PreviewArgs;
use crate::context::Context;
use crate::output::outcome_badge;

pub fn run(args: PreviewArgs, ctx: &Context) -> Result<()> {
    let document = ctx.read_json(&args.file)?;
    let event = CommerceEvent::from_value_with(
        &document,
        &ctx.config.items,
        ctx.config.default_currency,
    )
    .with_context(|| format!("Invalid event document: {}", args.file))?;

    ctx.output.debug(&format!(
        "{} with {} item(s), value {} {}",
        event.kind().as_str(),
        event.items().len(),
        event.value(),
        event.currency()
    ));

    if args.dispatch {
        return dispatch(&event, ctx);
    }

    let show_ga4 = args.destination.as_deref() != Some("pixel");
    let show_pixel = args.destination.as_deref() != Some("ga4");

    let mut rendered = serde_json::Map::new();
    if show_ga4 {
        rendered.insert("ga4".to_string(), event.to_ga4().to_value());
    }
    if show_pixel {
        let payload = event.to_pixel();
        rendered.insert(
            "pixel".to_string(),
            json!({
                "event": payload.event,
                "params": sanitize(&payload.params_map()),
                "options": payload.options(),
            }),
        );
    }

    ctx.output.json(&Value::Object(rendered));
    Ok(())
}

fn dispatch(event: &CommerceEvent, ctx: &Context) -> Result<()> {
    let tracker = Tracker::new(
        ctx.config.clone(),
        Arc::new(GlobalSlot::with(Arc::new(PrintingDataLayer) as Arc<dyn DataLayer>)),
        Arc::new(GlobalSlot::with(Arc::new(PrintingPixel) as Arc<dyn PixelFunction>)),
    );

    let report = tracker.track(event);
    if ctx.output.is_json() {
        ctx.output.json(&report);
    } else {
        ctx.output.header("Dispatch");
        ctx.output.kv("ga4", &outcome_badge(&report.ga4));
        ctx.output.kv("pixel", &outcome_badge(&report.pixel));
    }
    Ok(())
}

/// Prints each data layer push as `dataLayer.push(<json>)`.
struct PrintingDataLayer;

impl DataLayer for PrintingDataLayer {
    fn push(&self, message: &Value) -> Result<(), DestinationError> {
        println!("dataLayer.push({})", message);
        Ok(())
    }
}

/// Prints each pixel call in `fbq(...)` form.
struct PrintingPixel;

impl PixelFunction for PrintingPixel {
    fn invoke(&self, call: &PixelCall) -> Result<(), DestinationError> {
        let params = Value::Object(call.params().clone());
        match call {
            PixelCall::Track { options, .. } => {
                let options =
                    serde_json::to_string(options).map_err(|e| DestinationError::new(e.to_string()))?;
                println!("fbq('{}', '{}', {}, {})", call.verb(), call.event(), params, options);
            }
            PixelCall::TrackCustom { .. } => {
                println!("fbq('{}', '{}', {})", call.verb(), call.event(), params);
            }
        }
        Ok(())
    }
}
