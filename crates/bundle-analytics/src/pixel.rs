//! Pixel standard-event payloads.
//!
//! The pixel wants a flat parameter object: order totals and a reduced
//! `contents` list with only id, quantity and unit price. Optional order
//! fields are omitted rather than sent as null or zero.

use serde::Serialize;

use crate::event::CommerceEvent;
use crate::ids::{ItemId, TransactionId};
use crate::money::{Amount, Currency};

/// Catalogue content type reported with every standard event.
pub const CONTENT_TYPE: &str = "product";

/// A pixel standard event ready for dispatch.
#[derive(Debug, Clone, PartialEq)]
pub struct PixelPayload {
    pub event: &'static str,
    pub params: PixelParams,
    /// Deduplication key, set for purchases only.
    pub event_id: Option<TransactionId>,
}

/// Flat parameter object.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PixelParams {
    pub currency: Currency,
    pub value: Amount,
    pub num_items: u64,
    pub contents: Vec<PixelContent>,
    pub content_ids: Vec<ItemId>,
    pub content_type: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shipping: Option<Amount>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tax: Option<Amount>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub discount: Option<Amount>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub coupon: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_method: Option<String>,
}

/// One entry of `contents`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PixelContent {
    pub id: ItemId,
    pub quantity: u32,
    pub item_price: Amount,
}

/// Options bag passed after the parameters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct EventOptions {
    #[serde(rename = "eventID", skip_serializing_if = "Option::is_none")]
    pub event_id: Option<String>,
}

impl PixelPayload {
    /// Parameters as a JSON object.
    pub fn params_map(&self) -> serde_json::Map<String, serde_json::Value> {
        match serde_json::to_value(&self.params) {
            Ok(serde_json::Value::Object(map)) => map,
            _ => serde_json::Map::new(),
        }
    }

    /// Options bag; carries the transaction id on purchases.
    pub fn options(&self) -> EventOptions {
        EventOptions {
            event_id: self.event_id.as_ref().map(|id| id.to_string()),
        }
    }
}

impl CommerceEvent {
    /// Project the event into the pixel shape.
    ///
    /// Item lists become `ViewContent` with the value aggregated over every
    /// item in the list.
    pub fn to_pixel(&self) -> PixelPayload {
        let contents = self
            .items()
            .iter()
            .map(|item| PixelContent {
                id: item.id().clone(),
                quantity: item.quantity(),
                item_price: item.price(),
            })
            .collect();
        let content_ids = self.items().iter().map(|item| item.id().clone()).collect();
        let adjustments = self.adjustments();

        PixelPayload {
            event: self.kind().pixel_name(),
            params: PixelParams {
                currency: self.currency(),
                value: self.value(),
                num_items: self.num_items(),
                contents,
                content_ids,
                content_type: CONTENT_TYPE,
                shipping: adjustments.shipping.non_zero(),
                tax: adjustments.tax.non_zero(),
                discount: adjustments.discount.non_zero(),
                coupon: self.coupon().map(str::to_string),
                payment_method: self.payment_method().map(str::to_string),
            },
            event_id: self.transaction_id().cloned(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::{ItemList, PurchaseDetails};
    use crate::item::LineItem;
    use serde_json::json;

    fn purchase() -> CommerceEvent {
        CommerceEvent::purchase(
            Currency::USD,
            vec![LineItem::new("esim-eu-10gb", "Europe 10GB", 19.0)],
            PurchaseDetails {
                shipping: 2.6.into(),
                tax: 4.5.into(),
                discount: 1.0.into(),
                payment_method: Some("card".to_string()),
                ..PurchaseDetails::new("T-1001")
            },
        )
    }

    #[test]
    fn test_purchase_shape() {
        let payload = purchase().to_pixel();
        assert_eq!(payload.event, "Purchase");

        let params = payload.params_map();
        assert_eq!(params["value"], json!(25.1));
        assert_eq!(params["num_items"], json!(1));
        assert_eq!(
            params["contents"][0],
            json!({ "id": "esim-eu-10gb", "quantity": 1, "item_price": 19.0 })
        );
        assert_eq!(params["content_ids"], json!(["esim-eu-10gb"]));
        assert_eq!(params["content_type"], json!("product"));
        assert_eq!(params["shipping"], json!(2.6));
        assert_eq!(params["tax"], json!(4.5));
        assert_eq!(params["discount"], json!(1.0));
        assert_eq!(params["payment_method"], json!("card"));
        assert!(params.get("coupon").is_none());
    }

    #[test]
    fn test_purchase_options_carry_transaction_id() {
        let options = purchase().to_pixel().options();
        assert_eq!(serde_json::to_value(options).unwrap(), json!({ "eventID": "T-1001" }));
    }

    #[test]
    fn test_purchase_without_transaction_id_has_empty_options() {
        let event = CommerceEvent::purchase(
            Currency::USD,
            vec![LineItem::new("a", "A", 5.0)],
            PurchaseDetails::default(),
        );
        let payload = event.to_pixel();
        assert_eq!(payload.event, "Purchase");
        assert_eq!(payload.event_id, None);
        assert_eq!(serde_json::to_value(payload.options()).unwrap(), json!({}));
    }

    #[test]
    fn test_zero_optionals_are_omitted() {
        let event = CommerceEvent::purchase(
            Currency::USD,
            vec![LineItem::new("a", "A", 5.0)],
            PurchaseDetails::new("T"),
        );
        let params = event.to_pixel().params_map();
        for key in ["shipping", "tax", "discount", "coupon", "payment_method"] {
            assert!(!params.contains_key(key), "{key} should be absent");
        }
    }

    #[test]
    fn test_item_list_maps_to_view_content_with_total() {
        let event = CommerceEvent::view_item_list(
            Currency::USD,
            vec![
                LineItem::new("a", "A", 4.5).with_quantity(2),
                LineItem::new("b", "B", 10.0),
            ],
            ItemList::new("search", "Search results"),
        );
        let payload = event.to_pixel();
        assert_eq!(payload.event, "ViewContent");
        assert_eq!(payload.params.value.cents(), 1900);
        assert_eq!(payload.params.num_items, 3);
        assert_eq!(payload.event_id, None);
        assert_eq!(payload.options(), EventOptions::default());
    }

    #[test]
    fn test_value_matches_ga4() {
        let event = purchase();
        assert_eq!(event.to_pixel().params.value, event.to_ga4().ecommerce.value);
    }
}
