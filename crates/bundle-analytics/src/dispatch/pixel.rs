//! Pixel sender.

use std::sync::Arc;

use serde_json::{Map, Value};

use super::{disabled, guarded, unavailable, Destination, DispatchOutcome, GlobalSlot};
use crate::config::PixelConfig;
use crate::error::DestinationError;
use crate::event::CommerceEvent;
use crate::pixel::EventOptions;
use crate::sanitize::sanitize;

/// One invocation of the pixel function, mirroring
/// `fbq('track', name, params, options)` and `fbq('trackCustom', name, params)`.
#[derive(Debug, Clone, PartialEq)]
pub enum PixelCall {
    Track {
        event: String,
        params: Map<String, Value>,
        options: EventOptions,
    },
    TrackCustom {
        event: String,
        params: Map<String, Value>,
    },
}

impl PixelCall {
    /// The verb passed as the first argument.
    pub fn verb(&self) -> &'static str {
        match self {
            PixelCall::Track { .. } => "track",
            PixelCall::TrackCustom { .. } => "trackCustom",
        }
    }

    pub fn event(&self) -> &str {
        match self {
            PixelCall::Track { event, .. } | PixelCall::TrackCustom { event, .. } => event,
        }
    }

    pub fn params(&self) -> &Map<String, Value> {
        match self {
            PixelCall::Track { params, .. } | PixelCall::TrackCustom { params, .. } => params,
        }
    }
}

/// The environment's pixel function.
pub trait PixelFunction: Send + Sync {
    fn invoke(&self, call: &PixelCall) -> Result<(), DestinationError>;
}

/// Sends sanitized pixel payloads to whatever pixel function is installed.
#[derive(Debug, Clone)]
pub struct PixelDispatcher {
    slot: Arc<GlobalSlot<dyn PixelFunction>>,
    config: PixelConfig,
}

impl PixelDispatcher {
    pub fn new(slot: Arc<GlobalSlot<dyn PixelFunction>>, config: PixelConfig) -> Self {
        Self { slot, config }
    }

    pub fn slot(&self) -> &Arc<GlobalSlot<dyn PixelFunction>> {
        &self.slot
    }

    /// Send a standard event. Purchases carry their transaction id as
    /// `eventID` in the options bag.
    pub fn send(&self, event: &CommerceEvent) -> DispatchOutcome {
        let payload = event.to_pixel();
        if !self.config.enabled {
            return disabled(Destination::Pixel, payload.event);
        }
        let Some(pixel) = self.slot.get() else {
            return unavailable(Destination::Pixel, payload.event);
        };

        let call = PixelCall::Track {
            event: payload.event.to_string(),
            params: sanitize(&payload.params_map()),
            options: payload.options(),
        };
        guarded(Destination::Pixel, payload.event, move || pixel.invoke(&call))
    }

    /// Send a custom event; no options bag.
    pub fn send_custom(&self, name: &str, params: &Map<String, Value>) -> DispatchOutcome {
        if !self.config.enabled {
            return disabled(Destination::Pixel, name);
        }
        let Some(pixel) = self.slot.get() else {
            return unavailable(Destination::Pixel, name);
        };

        let call = PixelCall::TrackCustom {
            event: name.to_string(),
            params: sanitize(params),
        };
        guarded(Destination::Pixel, name, move || pixel.invoke(&call))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::PurchaseDetails;
    use crate::item::LineItem;
    use crate::money::Currency;
    use serde_json::json;
    use std::sync::Mutex;

    #[derive(Default)]
    struct Recorder {
        calls: Mutex<Vec<PixelCall>>,
    }

    impl PixelFunction for Recorder {
        fn invoke(&self, call: &PixelCall) -> Result<(), DestinationError> {
            self.calls.lock().unwrap().push(call.clone());
            Ok(())
        }
    }

    fn dispatcher() -> (PixelDispatcher, Arc<Recorder>) {
        let recorder = Arc::new(Recorder::default());
        let slot: Arc<GlobalSlot<dyn PixelFunction>> = Arc::new(GlobalSlot::empty());
        slot.install(recorder.clone());
        (PixelDispatcher::new(slot, PixelConfig::default()), recorder)
    }

    #[test]
    fn test_purchase_call_is_sanitized_with_event_id() {
        let (dispatcher, recorder) = dispatcher();
        let event = CommerceEvent::purchase(
            Currency::USD,
            vec![LineItem::new("esim-eu-10gb", "Europe 10GB", 19.0)],
            PurchaseDetails::new("T-1001"),
        );
        assert!(dispatcher.send(&event).is_delivered());

        let calls = recorder.calls.lock().unwrap();
        assert_eq!(calls.len(), 1);
        let PixelCall::Track {
            event,
            params,
            options,
        } = &calls[0]
        else {
            panic!("expected a track call");
        };
        assert_eq!(calls[0].verb(), "track");
        assert_eq!(event, "Purchase");
        assert_eq!(options.event_id.as_deref(), Some("T-1001"));
        assert_eq!(params["value"], json!(19.0));

        let contents: Value = serde_json::from_str(params["contents"].as_str().unwrap()).unwrap();
        assert_eq!(
            contents,
            json!([{ "id": "esim-eu-10gb", "quantity": 1, "item_price": 19.0 }])
        );
        assert!(params.values().all(|v| !v.is_array() && !v.is_object() && !v.is_null()));
    }

    #[test]
    fn test_non_purchase_has_empty_options() {
        let (dispatcher, recorder) = dispatcher();
        let event = CommerceEvent::view_item(Currency::USD, LineItem::new("a", "A", 1.0));
        dispatcher.send(&event);

        let calls = recorder.calls.lock().unwrap();
        match &calls[0] {
            PixelCall::Track { event, options, .. } => {
                assert_eq!(event, "ViewContent");
                assert_eq!(*options, EventOptions::default());
            }
            other => panic!("unexpected call {other:?}"),
        }
    }

    #[test]
    fn test_custom_call_shape() {
        let (dispatcher, recorder) = dispatcher();
        let mut params = Map::new();
        params.insert("regions".to_string(), json!(["eu", "asia"]));
        params.insert("note".to_string(), Value::Null);

        assert!(dispatcher.send_custom("BundleCompared", &params).is_delivered());
        let calls = recorder.calls.lock().unwrap();
        assert_eq!(
            calls[0],
            PixelCall::TrackCustom {
                event: "BundleCompared".to_string(),
                params: {
                    let mut expected = Map::new();
                    expected.insert("regions".to_string(), json!(r#"["eu","asia"]"#));
                    expected
                },
            }
        );
        assert_eq!(calls[0].verb(), "trackCustom");
    }

    #[test]
    fn test_disabled_skips_invoke() {
        let recorder = Arc::new(Recorder::default());
        let slot: Arc<GlobalSlot<dyn PixelFunction>> = Arc::new(GlobalSlot::empty());
        slot.install(recorder.clone());
        let dispatcher = PixelDispatcher::new(slot, PixelConfig { enabled: false });

        let event = CommerceEvent::view_item(Currency::USD, LineItem::new("a", "A", 1.0));
        assert_eq!(dispatcher.send(&event), DispatchOutcome::Disabled);
        assert!(recorder.calls.lock().unwrap().is_empty());
    }
}
