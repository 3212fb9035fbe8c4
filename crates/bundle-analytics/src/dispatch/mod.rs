//! Dispatch adapters.
//!
//! Each destination is an environment-provided collaborator held in a
//! [`GlobalSlot`]. The slot is read on every send, so a destination can be
//! installed or removed (consent granted or revoked, script loaded late)
//! between calls. Delivery is best effort: nothing is queued or retried, and
//! no failure reaches the caller.

mod data_layer;
mod pixel;
mod slot;

pub use data_layer::{DataLayer, Ga4Dispatcher};
pub use pixel::{PixelCall, PixelDispatcher, PixelFunction};
pub use slot::GlobalSlot;

use std::fmt;
use std::panic::{self, AssertUnwindSafe};

use serde::Serialize;

use crate::error::DestinationError;

/// Which destination a send targeted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Destination {
    Ga4,
    Pixel,
}

impl Destination {
    pub fn as_str(&self) -> &'static str {
        match self {
            Destination::Ga4 => "ga4",
            Destination::Pixel => "pixel",
        }
    }
}

impl fmt::Display for Destination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of one send.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "error", rename_all = "snake_case")]
pub enum DispatchOutcome {
    /// The tracking function accepted the call.
    Delivered,
    /// No tracking function was installed; the event was dropped.
    Unavailable,
    /// The destination is switched off in configuration.
    Disabled,
    /// The event document was rejected before any destination was tried.
    Skipped,
    /// The tracking function failed; the event was dropped.
    Failed(String),
}

impl DispatchOutcome {
    pub fn is_delivered(&self) -> bool {
        matches!(self, DispatchOutcome::Delivered)
    }
}

/// Run a call into a destination, absorbing errors and panics.
fn guarded<F>(destination: Destination, event: &str, call: F) -> DispatchOutcome
where
    F: FnOnce() -> Result<(), DestinationError>,
{
    let failure = match panic::catch_unwind(AssertUnwindSafe(call)) {
        Ok(Ok(())) => {
            tracing::debug!(%destination, event, "analytics event delivered");
            return DispatchOutcome::Delivered;
        }
        Ok(Err(e)) => e.to_string(),
        Err(payload) => panic_message(payload.as_ref()),
    };

    tracing::error!(%destination, event, error = %failure, "analytics destination failed");
    DispatchOutcome::Failed(failure)
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "destination panicked".to_string()
    }
}

fn unavailable(destination: Destination, event: &str) -> DispatchOutcome {
    tracing::info!(%destination, event, "analytics destination not available, event dropped");
    DispatchOutcome::Unavailable
}

fn disabled(destination: Destination, event: &str) -> DispatchOutcome {
    tracing::debug!(%destination, event, "analytics destination disabled");
    DispatchOutcome::Disabled
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;
    use std::sync::{Arc, Mutex};

    #[derive(Clone, Default)]
    struct LogBuffer(Arc<Mutex<Vec<u8>>>);

    impl io::Write for LogBuffer {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    fn capture_logs(f: impl FnOnce()) -> String {
        let buffer = LogBuffer::default();
        let writer = buffer.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(move || writer.clone())
            .with_max_level(tracing::Level::INFO)
            .with_ansi(false)
            .finish();
        tracing::subscriber::with_default(subscriber, f);
        let bytes = buffer.0.lock().unwrap().clone();
        String::from_utf8(bytes).unwrap()
    }

    #[test]
    fn test_guarded_delivered() {
        let outcome = guarded(Destination::Ga4, "purchase", || Ok(()));
        assert_eq!(outcome, DispatchOutcome::Delivered);
        assert!(outcome.is_delivered());
    }

    #[test]
    fn test_guarded_error() {
        let outcome = guarded(Destination::Pixel, "Purchase", || {
            Err(DestinationError::new("blocked by client"))
        });
        assert_eq!(outcome, DispatchOutcome::Failed("blocked by client".to_string()));
    }

    #[test]
    fn test_guarded_panic() {
        let outcome = guarded(Destination::Pixel, "Purchase", || panic!("fbq exploded"));
        assert_eq!(outcome, DispatchOutcome::Failed("fbq exploded".to_string()));
    }

    #[test]
    fn test_unavailable_is_logged_at_info() {
        let logs = capture_logs(|| {
            assert_eq!(unavailable(Destination::Pixel, "Purchase"), DispatchOutcome::Unavailable);
        });
        assert!(logs.contains("INFO"), "{logs}");
        assert!(logs.contains("analytics destination not available"), "{logs}");
        assert!(logs.contains("destination=pixel"), "{logs}");
    }

    #[test]
    fn test_disabled_stays_below_info() {
        let logs = capture_logs(|| {
            disabled(Destination::Ga4, "purchase");
        });
        assert!(logs.is_empty(), "{logs}");
    }

    #[test]
    fn test_outcome_serializes_with_status() {
        let json = serde_json::to_value(DispatchOutcome::Failed("x".to_string())).unwrap();
        assert_eq!(json, serde_json::json!({ "status": "failed", "error": "x" }));
        let json = serde_json::to_value(DispatchOutcome::Unavailable).unwrap();
        assert_eq!(json, serde_json::json!({ "status": "unavailable" }));
        let json = serde_json::to_value(DispatchOutcome::Skipped).unwrap();
        assert_eq!(json, serde_json::json!({ "status": "skipped" }));
    }
}
