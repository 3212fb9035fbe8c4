//! GA4 e-commerce payloads for the tag-manager data layer.

use serde::Serialize;

use crate::event::{CommerceEvent, EventDetail};
use crate::ids::{ItemId, TransactionId};
use crate::money::{Amount, Currency};

/// A data layer message: `{ event, ecommerce: { ... } }`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Ga4Payload {
    pub event: &'static str,
    pub ecommerce: Ga4Ecommerce,
}

/// The nested `ecommerce` block.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Ga4Ecommerce {
    pub currency: Currency,
    pub value: Amount,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transaction_id: Option<TransactionId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shipping: Option<Amount>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tax: Option<Amount>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub coupon: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub discount: Option<Amount>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub item_list_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub item_list_name: Option<String>,
    pub items: Vec<Ga4Item>,
}

/// One entry of `ecommerce.items`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Ga4Item {
    pub item_id: ItemId,
    pub item_name: String,
    pub item_category: String,
    pub item_brand: String,
    pub price: Amount,
    pub quantity: u32,
    pub index: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub item_list_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub item_list_name: Option<String>,
}

impl Ga4Payload {
    /// Render as a JSON value ready to push.
    pub fn to_value(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or(serde_json::Value::Null)
    }
}

impl CommerceEvent {
    /// Project the event into the GA4 e-commerce shape.
    ///
    /// Shipping and tax are always present on purchases; coupon and discount
    /// only when supplied and non-zero. Other variants carry currency, value
    /// and items only, plus list attribution for item lists.
    pub fn to_ga4(&self) -> Ga4Payload {
        let (list_id, list_name) = match self.detail() {
            EventDetail::ViewItemList { list } => (list.id.clone(), list.name.clone()),
            _ => (None, None),
        };

        let items = self
            .items()
            .iter()
            .enumerate()
            .map(|(index, item)| Ga4Item {
                item_id: item.id().clone(),
                item_name: item.name().to_string(),
                item_category: item.category().to_string(),
                item_brand: item.brand().to_string(),
                price: item.price(),
                quantity: item.quantity(),
                index,
                item_list_id: list_id.clone(),
                item_list_name: list_name.clone(),
            })
            .collect();

        let mut ecommerce = Ga4Ecommerce {
            currency: self.currency(),
            value: self.value(),
            transaction_id: None,
            shipping: None,
            tax: None,
            coupon: None,
            discount: None,
            item_list_id: list_id,
            item_list_name: list_name,
            items,
        };

        if let EventDetail::Purchase {
            transaction_id,
            coupon,
            ..
        } = self.detail()
        {
            let adjustments = self.adjustments();
            ecommerce.transaction_id = transaction_id.clone();
            ecommerce.shipping = Some(adjustments.shipping);
            ecommerce.tax = Some(adjustments.tax);
            ecommerce.coupon = coupon.clone();
            ecommerce.discount = adjustments.discount.non_zero();
        }

        Ga4Payload {
            event: self.kind().ga4_name(),
            ecommerce,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::{CheckoutDetails, ItemList, PurchaseDetails};
    use crate::item::LineItem;
    use serde_json::json;

    #[test]
    fn test_purchase_shape() {
        let event = CommerceEvent::purchase(
            Currency::USD,
            vec![LineItem::new("esim-eu-10gb", "Europe 10GB", 19.0)],
            PurchaseDetails {
                shipping: 2.6.into(),
                tax: 4.5.into(),
                discount: 1.0.into(),
                coupon: Some("WELCOME".to_string()),
                ..PurchaseDetails::new("T-1001")
            },
        );

        assert_eq!(
            event.to_ga4().to_value(),
            json!({
                "event": "purchase",
                "ecommerce": {
                    "currency": "USD",
                    "value": 25.1,
                    "transaction_id": "T-1001",
                    "shipping": 2.6,
                    "tax": 4.5,
                    "coupon": "WELCOME",
                    "discount": 1.0,
                    "items": [{
                        "item_id": "esim-eu-10gb",
                        "item_name": "Europe 10GB",
                        "item_category": "eSIM",
                        "item_brand": "SimShop",
                        "price": 19.0,
                        "quantity": 1,
                        "index": 0
                    }]
                }
            })
        );
    }

    #[test]
    fn test_purchase_zero_shipping_and_tax_still_shown() {
        let event = CommerceEvent::purchase(
            Currency::USD,
            vec![LineItem::new("a", "A", 5.0)],
            PurchaseDetails::new("T"),
        );
        let ecommerce = event.to_ga4().to_value()["ecommerce"].clone();
        assert_eq!(ecommerce["shipping"], json!(0.0));
        assert_eq!(ecommerce["tax"], json!(0.0));
        assert!(ecommerce.get("discount").is_none());
        assert!(ecommerce.get("coupon").is_none());
    }

    #[test]
    fn test_purchase_without_transaction_id_omits_it() {
        let event = CommerceEvent::purchase(
            Currency::USD,
            vec![LineItem::new("a", "A", 5.0)],
            PurchaseDetails::default(),
        );
        let ecommerce = event.to_ga4().to_value()["ecommerce"].clone();
        assert!(ecommerce.get("transaction_id").is_none());
        assert_eq!(ecommerce["value"], json!(5.0));
        assert_eq!(ecommerce["shipping"], json!(0.0));
    }

    #[test]
    fn test_non_purchase_omits_order_fields() {
        let event = CommerceEvent::begin_checkout(
            Currency::EUR,
            vec![LineItem::new("a", "A", 5.0)],
            CheckoutDetails {
                discount: 1.0.into(),
                coupon: Some("X".to_string()),
            },
        );
        let payload = event.to_ga4();
        assert_eq!(payload.event, "begin_checkout");
        assert_eq!(payload.ecommerce.value.cents(), 400);

        let ecommerce = payload.to_value()["ecommerce"].clone();
        for key in ["transaction_id", "shipping", "tax", "coupon", "discount"] {
            assert!(ecommerce.get(key).is_none(), "{key} should be absent");
        }
    }

    #[test]
    fn test_items_indexed_in_order_with_list_attribution() {
        let event = CommerceEvent::view_item_list(
            Currency::USD,
            vec![
                LineItem::new("b", "B", 2.0),
                LineItem::new("a", "A", 1.0).with_quantity(2),
            ],
            ItemList::new("popular", "Popular destinations"),
        );
        let payload = event.to_ga4();
        assert_eq!(payload.event, "view_item_list");
        assert_eq!(payload.ecommerce.item_list_id.as_deref(), Some("popular"));

        let indexes: Vec<(usize, &str)> = payload
            .ecommerce
            .items
            .iter()
            .map(|i| (i.index, i.item_id.as_str()))
            .collect();
        assert_eq!(indexes, vec![(0, "b"), (1, "a")]);
        assert!(payload
            .ecommerce
            .items
            .iter()
            .all(|i| i.item_list_name.as_deref() == Some("Popular destinations")));
        assert_eq!(payload.ecommerce.value.cents(), 400);
    }

    #[test]
    fn test_projection_is_deterministic() {
        let event = CommerceEvent::view_item(Currency::USD, LineItem::new("a", "A", 3.333));
        assert_eq!(event.to_ga4(), event.to_ga4());
        assert_eq!(event.to_ga4().ecommerce.items[0].price.cents(), 333);
    }
}
