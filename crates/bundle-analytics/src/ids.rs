//! Newtype IDs for type-safe identifiers.
//!
//! Upstream cart state carries identifiers as either strings or numbers, so
//! the IDs deserialize from both and always serialize as strings.

use serde::de::Deserializer;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Macro to generate newtype ID structs.
macro_rules! define_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize)]
        pub struct $name(String);

        impl $name {
            /// Create a new ID from a string.
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Get the ID as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Check if the ID is empty.
            pub fn is_empty(&self) -> bool {
                self.0.is_empty()
            }

            /// Consume and return the inner string.
            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self(s)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self(s.to_string())
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                loose_string(deserializer).map(Self)
            }
        }
    };
}

define_id!(
    /// Catalogue identifier of a bundle or product.
    ItemId
);
define_id!(
    /// Order identifier, also used as the pixel deduplication key.
    TransactionId
);

/// Accept a string or a number and return it as a string.
fn loose_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Loose {
        Text(String),
        Integer(i64),
        Float(f64),
    }

    Ok(match Loose::deserialize(deserializer)? {
        Loose::Text(s) => s.trim().to_string(),
        Loose::Integer(n) => n.to_string(),
        Loose::Float(n) => n.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_from_string_or_number() {
        let a: ItemId = serde_json::from_value(serde_json::json!("esim-eu-10gb")).unwrap();
        assert_eq!(a.as_str(), "esim-eu-10gb");

        let b: TransactionId = serde_json::from_value(serde_json::json!(10042)).unwrap();
        assert_eq!(b.as_str(), "10042");
    }

    #[test]
    fn test_id_serializes_as_string() {
        let id = ItemId::new("42");
        assert_eq!(serde_json::to_value(&id).unwrap(), serde_json::json!("42"));
        assert_eq!(id.to_string(), "42");
    }
}
