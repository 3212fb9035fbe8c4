//! Analytics configuration.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::AnalyticsError;
use crate::item::ItemDefaults;
use crate::money::Currency;

/// Analytics configuration file.
///
/// Every field has a default, so an empty file is a valid configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalyticsConfig {
    /// Currency used when an event document does not name one.
    #[serde(default)]
    pub default_currency: Currency,

    /// Labels applied to items that do not carry their own.
    #[serde(default)]
    pub items: ItemDefaults,

    /// GA4 data layer destination.
    #[serde(default)]
    pub ga4: Ga4Config,

    /// Pixel destination.
    #[serde(default)]
    pub pixel: PixelConfig,
}

impl AnalyticsConfig {
    /// Load config from a file. `.json` files are read as JSON, anything
    /// else as TOML.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, AnalyticsError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| AnalyticsError::ConfigIo {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;

        if is_json(path) {
            serde_json::from_str(&content).map_err(|e| AnalyticsError::ConfigParse(e.to_string()))
        } else {
            Self::from_toml_str(&content)
        }
    }

    /// Parse a TOML document.
    pub fn from_toml_str(content: &str) -> Result<Self, AnalyticsError> {
        Ok(toml::from_str(content)?)
    }

    /// Save config to a file, choosing the format by extension.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), AnalyticsError> {
        let path = path.as_ref();
        let content = if is_json(path) {
            serde_json::to_string_pretty(self)
                .map_err(|e| AnalyticsError::SerializationError(e.to_string()))?
        } else {
            toml::to_string_pretty(self)?
        };

        std::fs::write(path, content).map_err(|e| AnalyticsError::ConfigIo {
            path: path.display().to_string(),
            message: e.to_string(),
        })
    }
}

fn is_json(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == "json")
}

/// GA4 data layer settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ga4Config {
    /// Send events to the data layer.
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Push `{ ecommerce: null }` before each e-commerce event.
    #[serde(default = "default_true")]
    pub clear_ecommerce: bool,
}

impl Default for Ga4Config {
    fn default() -> Self {
        Self {
            enabled: true,
            clear_ecommerce: true,
        }
    }
}

/// Pixel settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PixelConfig {
    /// Send events to the pixel.
    #[serde(default = "default_true")]
    pub enabled: bool,
}

impl Default for PixelConfig {
    fn default() -> Self {
        Self { enabled: true }
    }
}

fn default_true() -> bool {
    true
}
