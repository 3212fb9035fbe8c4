//! GA4 sender for a tag-manager data layer.

use std::sync::Arc;

use serde_json::{json, Map, Value};

use super::{disabled, guarded, unavailable, Destination, DispatchOutcome, GlobalSlot};
use crate::config::Ga4Config;
use crate::error::DestinationError;
use crate::event::CommerceEvent;

/// A tag-manager data layer that accepts pushed messages.
pub trait DataLayer: Send + Sync {
    fn push(&self, message: &Value) -> Result<(), DestinationError>;
}

/// Sends GA4 payloads to whatever data layer is currently installed.
#[derive(Debug, Clone)]
pub struct Ga4Dispatcher {
    slot: Arc<GlobalSlot<dyn DataLayer>>,
    config: Ga4Config,
}

impl Ga4Dispatcher {
    pub fn new(slot: Arc<GlobalSlot<dyn DataLayer>>, config: Ga4Config) -> Self {
        Self { slot, config }
    }

    pub fn slot(&self) -> &Arc<GlobalSlot<dyn DataLayer>> {
        &self.slot
    }

    /// Push an e-commerce event.
    ///
    /// When configured, a `{ ecommerce: null }` message is pushed first so
    /// the previous event's items do not merge into this one.
    pub fn send(&self, event: &CommerceEvent) -> DispatchOutcome {
        let name = event.kind().ga4_name();
        if !self.config.enabled {
            return disabled(Destination::Ga4, name);
        }
        let Some(layer) = self.slot.get() else {
            return unavailable(Destination::Ga4, name);
        };

        let message = event.to_ga4().to_value();
        let clear = self.config.clear_ecommerce;
        guarded(Destination::Ga4, name, move || {
            if clear {
                layer.push(&json!({ "ecommerce": null }))?;
            }
            layer.push(&message)
        })
    }

    /// Push a custom event as `{ event: name, ...params }`.
    pub fn send_custom(&self, name: &str, params: &Map<String, Value>) -> DispatchOutcome {
        if !self.config.enabled {
            return disabled(Destination::Ga4, name);
        }
        let Some(layer) = self.slot.get() else {
            return unavailable(Destination::Ga4, name);
        };

        let mut message = params.clone();
        message.insert("event".to_string(), Value::String(name.to_string()));
        let message = Value::Object(message);
        guarded(Destination::Ga4, name, move || layer.push(&message))
    }
}
