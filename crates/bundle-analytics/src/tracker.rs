//! Tracker facade.
//!
//! Owns the configuration and both dispatchers. Every entry point returns a
//! [`DispatchReport`]; none of them return errors or panic, so checkout code
//! can call them inline without guarding.

use std::sync::Arc;

use serde::Serialize;
use serde_json::{Map, Value};

use crate::config::AnalyticsConfig;
use crate::dispatch::{
    DataLayer, DispatchOutcome, Ga4Dispatcher, GlobalSlot, PixelDispatcher, PixelFunction,
};
use crate::event::CommerceEvent;

/// Per-destination outcome of one tracker call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DispatchReport {
    pub ga4: DispatchOutcome,
    pub pixel: DispatchOutcome,
    /// Set when the event document could not be built; nothing was sent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rejected: Option<String>,
}

impl DispatchReport {
    fn rejected(reason: String) -> Self {
        Self {
            ga4: DispatchOutcome::Skipped,
            pixel: DispatchOutcome::Skipped,
            rejected: Some(reason),
        }
    }

    pub fn is_rejected(&self) -> bool {
        self.rejected.is_some()
    }
}

/// Sends commerce events to both analytics destinations.
#[derive(Debug, Clone)]
pub struct Tracker {
    config: AnalyticsConfig,
    ga4: Ga4Dispatcher,
    pixel: PixelDispatcher,
}

impl Tracker {
    /// Create a tracker reading destinations from the given slots.
    pub fn new(
        config: AnalyticsConfig,
        data_layer: Arc<GlobalSlot<dyn DataLayer>>,
        pixel: Arc<GlobalSlot<dyn PixelFunction>>,
    ) -> Self {
        Self {
            ga4: Ga4Dispatcher::new(data_layer, config.ga4.clone()),
            pixel: PixelDispatcher::new(pixel, config.pixel.clone()),
            config,
        }
    }

    /// A tracker with default configuration and empty slots.
    pub fn detached() -> Self {
        Self::new(
            AnalyticsConfig::default(),
            Arc::new(GlobalSlot::empty()),
            Arc::new(GlobalSlot::empty()),
        )
    }

    pub fn config(&self) -> &AnalyticsConfig {
        &self.config
    }

    pub fn data_layer(&self) -> &Arc<GlobalSlot<dyn DataLayer>> {
        self.ga4.slot()
    }

    pub fn pixel(&self) -> &Arc<GlobalSlot<dyn PixelFunction>> {
        self.pixel.slot()
    }

    /// Send an event to both destinations.
    pub fn track(&self, event: &CommerceEvent) -> DispatchReport {
        DispatchReport {
            ga4: self.ga4.send(event),
            pixel: self.pixel.send(event),
            rejected: None,
        }
    }

    /// Build an event from a loose document and send it.
    ///
    /// A document that cannot be built is logged and reported, not returned
    /// as an error.
    pub fn track_value(&self, document: &Value) -> DispatchReport {
        match CommerceEvent::from_value_with(
            document,
            &self.config.items,
            self.config.default_currency,
        ) {
            Ok(event) => self.track(&event),
            Err(e) => {
                tracing::warn!(error = %e, "analytics event rejected");
                DispatchReport::rejected(e.to_string())
            }
        }
    }

    /// Send a custom event to both destinations.
    pub fn track_custom(&self, name: &str, params: &Map<String, Value>) -> DispatchReport {
        DispatchReport {
            ga4: self.ga4.send_custom(name, params),
            pixel: self.pixel.send_custom(name, params),
            rejected: None,
        }
    }
}
