//! Line items.
//!
//! A [`LineItem`] is the normalized form of one cart or catalogue entry.
//! Loose upstream data arrives as a [`RawItem`] and is coerced exactly once;
//! converting a `LineItem` into a `LineItem` is the identity.

use serde::de::Deserializer;
use serde::{Deserialize, Serialize};

use crate::ids::ItemId;
use crate::money::Amount;

/// Brand label used when an item does not carry one.
pub const DEFAULT_BRAND: &str = "SimShop";

/// Category label used when an item does not carry one.
pub const DEFAULT_CATEGORY: &str = "eSIM";

/// Fallback labels applied while coercing raw items.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemDefaults {
    /// Brand label.
    #[serde(default = "default_brand")]
    pub brand: String,
    /// Category label.
    #[serde(default = "default_category")]
    pub category: String,
}

fn default_brand() -> String {
    DEFAULT_BRAND.to_string()
}

fn default_category() -> String {
    DEFAULT_CATEGORY.to_string()
}

impl Default for ItemDefaults {
    fn default() -> Self {
        Self {
            brand: default_brand(),
            category: default_category(),
        }
    }
}

/// A normalized line item.
///
/// The unit price is non-negative and already rounded; nothing downstream
/// rounds it again.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LineItem {
    id: ItemId,
    name: String,
    category: String,
    price: Amount,
    quantity: u32,
    brand: String,
}

impl LineItem {
    /// Create a line item with quantity 1 and default labels.
    pub fn new(id: impl Into<ItemId>, name: impl Into<String>, price: impl Into<Amount>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            category: DEFAULT_CATEGORY.to_string(),
            price: price.into().non_negative(),
            quantity: 1,
            brand: DEFAULT_BRAND.to_string(),
        }
    }

    /// Set the quantity. Zero is treated as 1.
    pub fn with_quantity(mut self, quantity: u32) -> Self {
        self.quantity = quantity.max(1);
        self
    }

    /// Set the category label.
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    /// Set the brand label.
    pub fn with_brand(mut self, brand: impl Into<String>) -> Self {
        self.brand = brand.into();
        self
    }

    pub fn id(&self) -> &ItemId {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    pub fn price(&self) -> Amount {
        self.price
    }

    pub fn quantity(&self) -> u32 {
        self.quantity
    }

    pub fn brand(&self) -> &str {
        &self.brand
    }

    /// Unit price times quantity.
    pub fn line_total(&self) -> Amount {
        self.price * self.quantity
    }
}

/// Loosely shaped item data as supplied by the cart or catalogue UI.
///
/// Every field is optional. GA4-style keys (`item_id`, `item_name`, ...) are
/// accepted as aliases.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct RawItem {
    #[serde(alias = "item_id")]
    pub id: Option<ItemId>,
    #[serde(alias = "item_name")]
    pub name: Option<String>,
    #[serde(alias = "item_category")]
    pub category: Option<String>,
    #[serde(alias = "item_price")]
    pub price: Option<Amount>,
    #[serde(deserialize_with = "loose_quantity")]
    pub quantity: Option<u32>,
    #[serde(alias = "item_brand")]
    pub brand: Option<String>,
}

impl RawItem {
    /// Coerce into a [`LineItem`], filling gaps from `defaults`.
    pub fn into_line_item(self, defaults: &ItemDefaults) -> LineItem {
        LineItem {
            id: self.id.unwrap_or_default(),
            name: self.name.unwrap_or_default(),
            category: non_blank(self.category).unwrap_or_else(|| defaults.category.clone()),
            price: self.price.unwrap_or_default().non_negative(),
            quantity: self.quantity.unwrap_or(1).max(1),
            brand: non_blank(self.brand).unwrap_or_else(|| defaults.brand.clone()),
        }
    }
}

impl From<RawItem> for LineItem {
    fn from(raw: RawItem) -> Self {
        raw.into_line_item(&ItemDefaults::default())
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.trim().is_empty())
}

/// Quantities arrive as integers, floats or strings; anything unusable is
/// treated as absent.
fn loose_quantity<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<u32>, D::Error> {
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(value.and_then(|v| match v {
        serde_json::Value::Number(n) => n
            .as_u64()
            .or_else(|| n.as_f64().filter(|f| *f >= 0.0).map(|f| f.round() as u64))
            .and_then(|q| u32::try_from(q).ok()),
        serde_json::Value::String(s) => s.trim().parse::<u32>().ok(),
        _ => None,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(value: serde_json::Value) -> RawItem {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_price_rounded_at_construction() {
        let item = LineItem::new("esim-1", "Europe 10GB", 19.999);
        assert_eq!(item.price().cents(), 2000);
    }

    #[test]
    fn test_rewrap_is_identity() {
        let item = LineItem::new("esim-1", "Europe 10GB", 19.999).with_quantity(3);
        let wrapped: LineItem = item.clone().into();
        assert_eq!(wrapped, item);
        assert_eq!(wrapped.price().cents(), 2000);
    }

    #[test]
    fn test_negative_price_clamped() {
        let item = LineItem::new("x", "x", -4.0);
        assert_eq!(item.price(), Amount::ZERO);
    }

    #[test]
    fn test_raw_item_defaults() {
        let item: LineItem = raw(serde_json::json!({ "id": "asia-5gb", "price": 12.5 })).into();
        assert_eq!(item.quantity(), 1);
        assert_eq!(item.brand(), DEFAULT_BRAND);
        assert_eq!(item.category(), DEFAULT_CATEGORY);
        assert_eq!(item.name(), "");
    }

    #[test]
    fn test_raw_item_custom_defaults() {
        let defaults = ItemDefaults {
            brand: "RoamCo".to_string(),
            category: "Data".to_string(),
        };
        let item = raw(serde_json::json!({ "id": 7, "brand": "  " })).into_line_item(&defaults);
        assert_eq!(item.id().as_str(), "7");
        assert_eq!(item.brand(), "RoamCo");
        assert_eq!(item.category(), "Data");
    }

    #[test]
    fn test_raw_item_ga4_aliases_and_loose_numbers() {
        let item: LineItem = raw(serde_json::json!({
            "item_id": "us-3gb",
            "item_name": "USA 3GB",
            "item_category": "North America",
            "item_price": "8.499",
            "quantity": "2",
        }))
        .into();
        assert_eq!(item.id().as_str(), "us-3gb");
        assert_eq!(item.name(), "USA 3GB");
        assert_eq!(item.category(), "North America");
        assert_eq!(item.price().cents(), 850);
        assert_eq!(item.quantity(), 2);
        assert_eq!(item.line_total().cents(), 1700);
    }

    #[test]
    fn test_zero_or_invalid_quantity_becomes_one() {
        let zero: LineItem = raw(serde_json::json!({ "quantity": 0 })).into();
        assert_eq!(zero.quantity(), 1);

        let bogus: LineItem = raw(serde_json::json!({ "quantity": "lots" })).into();
        assert_eq!(bogus.quantity(), 1);

        assert_eq!(LineItem::new("a", "a", 1.0).with_quantity(0).quantity(), 1);
    }
}
