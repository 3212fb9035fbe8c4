//! Analytics error types.

use thiserror::Error;

/// Errors that can occur while building or configuring analytics events.
///
/// Dispatch never surfaces these to callers of the tracker; they are
/// reported through [`crate::DispatchOutcome`] and the log instead.
#[derive(Error, Debug)]
pub enum AnalyticsError {
    /// The loose event document could not be interpreted.
    #[error("Invalid event document: {0}")]
    InvalidDocument(String),

    /// Unknown event type tag.
    #[error("Unknown event type: {0}")]
    UnknownEventType(String),

    /// Malformed currency code.
    #[error("Invalid currency code: {0:?}")]
    InvalidCurrency(String),

    /// A single-item event was given the wrong number of items.
    #[error("{event} requires exactly one item, got {got}")]
    ItemCount { event: &'static str, got: usize },

    /// Config file could not be read or written.
    #[error("Config I/O error for {path}: {message}")]
    ConfigIo { path: String, message: String },

    /// Config file could not be parsed.
    #[error("Config parse error: {0}")]
    ConfigParse(String),

    /// Serialization error.
    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl From<serde_json::Error> for AnalyticsError {
    fn from(e: serde_json::Error) -> Self {
        AnalyticsError::InvalidDocument(e.to_string())
    }
}

impl From<toml::de::Error> for AnalyticsError {
    fn from(e: toml::de::Error) -> Self {
        AnalyticsError::ConfigParse(e.to_string())
    }
}

impl From<toml::ser::Error> for AnalyticsError {
    fn from(e: toml::ser::Error) -> Self {
        AnalyticsError::SerializationError(e.to_string())
    }
}

/// Error returned by a destination's tracking function.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{0}")]
pub struct DestinationError(pub String);

impl DestinationError {
    /// Create a new destination error.
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}
