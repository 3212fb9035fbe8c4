//! Commerce events.
//!
//! A [`CommerceEvent`] is a one-shot projection of checkout or cart state. It
//! is built immediately before dispatch, rendered into the two destination
//! payloads and dropped. There are no setters: once built, an event cannot
//! change, and its `value` is always derived from the items and adjustments.

use serde::{Deserialize, Serialize};

use crate::error::AnalyticsError;
use crate::ids::TransactionId;
use crate::item::{ItemDefaults, LineItem, RawItem};
use crate::money::{Amount, Currency};

/// The commerce action an event describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    Purchase,
    AddToCart,
    ViewItem,
    ViewItemList,
    BeginCheckout,
}

impl EventKind {
    /// Tag used in loose event documents.
    pub fn as_str(&self) -> &'static str {
        match self {
            EventKind::Purchase => "purchase",
            EventKind::AddToCart => "add_to_cart",
            EventKind::ViewItem => "view_item",
            EventKind::ViewItemList => "view_item_list",
            EventKind::BeginCheckout => "begin_checkout",
        }
    }

    /// Parse a loose document tag.
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag.trim().to_lowercase().as_str() {
            "purchase" => Some(EventKind::Purchase),
            "add_to_cart" => Some(EventKind::AddToCart),
            "view_item" => Some(EventKind::ViewItem),
            "view_item_list" => Some(EventKind::ViewItemList),
            "begin_checkout" => Some(EventKind::BeginCheckout),
            _ => None,
        }
    }

    /// GA4 event name.
    pub fn ga4_name(&self) -> &'static str {
        self.as_str()
    }

    /// Pixel standard event name.
    ///
    /// The pixel has no list event, so item lists map to `ViewContent`.
    pub fn pixel_name(&self) -> &'static str {
        match self {
            EventKind::Purchase => "Purchase",
            EventKind::AddToCart => "AddToCart",
            EventKind::ViewItem | EventKind::ViewItemList => "ViewContent",
            EventKind::BeginCheckout => "InitiateCheckout",
        }
    }

    /// Whether the event carries exactly one item.
    pub fn is_single_item(&self) -> bool {
        matches!(self, EventKind::AddToCart | EventKind::ViewItem)
    }
}

/// Order-level amounts that enter `value` alongside the item totals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Adjustments {
    pub shipping: Amount,
    pub tax: Amount,
    pub discount: Amount,
}

/// Purchase-specific fields.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PurchaseDetails {
    /// Order number, also the pixel's deduplication key. Optional: a purchase
    /// without one is still tracked, just without `transaction_id`/`eventID`.
    pub transaction_id: Option<TransactionId>,
    pub shipping: Amount,
    pub tax: Amount,
    pub discount: Amount,
    pub coupon: Option<String>,
    pub payment_method: Option<String>,
}

impl PurchaseDetails {
    /// Details with the given transaction id and everything else empty.
    pub fn new(transaction_id: impl Into<TransactionId>) -> Self {
        Self {
            transaction_id: Some(transaction_id.into()),
            ..Self::default()
        }
    }
}

/// Begin-checkout fields.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CheckoutDetails {
    pub discount: Amount,
    pub coupon: Option<String>,
}

/// List attribution for item-list views.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ItemList {
    pub id: Option<String>,
    pub name: Option<String>,
}

impl ItemList {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            name: Some(name.into()),
        }
    }
}

/// Per-variant fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventDetail {
    Purchase {
        transaction_id: Option<TransactionId>,
        coupon: Option<String>,
        payment_method: Option<String>,
    },
    AddToCart,
    ViewItem,
    ViewItemList {
        list: ItemList,
    },
    BeginCheckout {
        coupon: Option<String>,
    },
}

impl EventDetail {
    pub fn kind(&self) -> EventKind {
        match self {
            EventDetail::Purchase { .. } => EventKind::Purchase,
            EventDetail::AddToCart => EventKind::AddToCart,
            EventDetail::ViewItem => EventKind::ViewItem,
            EventDetail::ViewItemList { .. } => EventKind::ViewItemList,
            EventDetail::BeginCheckout { .. } => EventKind::BeginCheckout,
        }
    }
}

/// A normalized commerce event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommerceEvent {
    currency: Currency,
    items: Vec<LineItem>,
    adjustments: Adjustments,
    detail: EventDetail,
}

impl CommerceEvent {
    /// A completed order.
    pub fn purchase<I>(currency: Currency, items: I, details: PurchaseDetails) -> Self
    where
        I: IntoIterator,
        I::Item: Into<LineItem>,
    {
        Self {
            currency,
            items: items.into_iter().map(Into::into).collect(),
            adjustments: Adjustments {
                shipping: details.shipping,
                tax: details.tax,
                discount: details.discount,
            },
            detail: EventDetail::Purchase {
                transaction_id: details.transaction_id.filter(|id| !id.is_empty()),
                coupon: non_blank(details.coupon),
                payment_method: non_blank(details.payment_method),
            },
        }
    }

    /// A single item added to the cart.
    pub fn add_to_cart(currency: Currency, item: impl Into<LineItem>) -> Self {
        Self::single(currency, item.into(), EventDetail::AddToCart)
    }

    /// A single item detail view.
    pub fn view_item(currency: Currency, item: impl Into<LineItem>) -> Self {
        Self::single(currency, item.into(), EventDetail::ViewItem)
    }

    /// A list of items shown together.
    pub fn view_item_list<I>(currency: Currency, items: I, list: ItemList) -> Self
    where
        I: IntoIterator,
        I::Item: Into<LineItem>,
    {
        Self {
            currency,
            items: items.into_iter().map(Into::into).collect(),
            adjustments: Adjustments::default(),
            detail: EventDetail::ViewItemList {
                list: ItemList {
                    id: non_blank(list.id),
                    name: non_blank(list.name),
                },
            },
        }
    }

    /// Checkout started.
    pub fn begin_checkout<I>(currency: Currency, items: I, details: CheckoutDetails) -> Self
    where
        I: IntoIterator,
        I::Item: Into<LineItem>,
    {
        Self {
            currency,
            items: items.into_iter().map(Into::into).collect(),
            adjustments: Adjustments {
                discount: details.discount,
                ..Adjustments::default()
            },
            detail: EventDetail::BeginCheckout {
                coupon: non_blank(details.coupon),
            },
        }
    }

    fn single(currency: Currency, item: LineItem, detail: EventDetail) -> Self {
        Self {
            currency,
            items: vec![item],
            adjustments: Adjustments::default(),
            detail,
        }
    }

    /// Build an event from a loose JSON document using default item labels.
    ///
    /// The document carries a `type` tag (`purchase`, `add_to_cart`,
    /// `view_item`, `view_item_list`, `begin_checkout`) and the fields of that
    /// variant. Missing optional fields default to empty or zero.
    pub fn from_value(document: &serde_json::Value) -> Result<Self, AnalyticsError> {
        Self::from_value_with(document, &ItemDefaults::default(), Currency::default())
    }

    /// Build an event from a loose JSON document.
    pub fn from_value_with(
        document: &serde_json::Value,
        defaults: &ItemDefaults,
        default_currency: Currency,
    ) -> Result<Self, AnalyticsError> {
        let raw = RawEvent::deserialize(document)?;
        let kind = EventKind::from_tag(&raw.kind)
            .ok_or_else(|| AnalyticsError::UnknownEventType(raw.kind.clone()))?;
        let currency = raw.currency.unwrap_or(default_currency);

        let mut raw_items = raw.items;
        if let Some(item) = raw.item {
            raw_items.insert(0, item);
        }
        let items: Vec<LineItem> = raw_items
            .into_iter()
            .map(|item| item.into_line_item(defaults))
            .collect();

        let event = match kind {
            EventKind::Purchase => CommerceEvent::purchase(
                currency,
                items,
                PurchaseDetails {
                    transaction_id: raw.transaction_id,
                    shipping: raw.shipping.unwrap_or_default(),
                    tax: raw.tax.unwrap_or_default(),
                    discount: raw.discount.unwrap_or_default(),
                    coupon: raw.coupon,
                    payment_method: raw.payment_method,
                },
            ),
            EventKind::AddToCart | EventKind::ViewItem => {
                let got = items.len();
                let mut items = items.into_iter();
                let item = match (items.next(), items.next()) {
                    (Some(item), None) => item,
                    _ => {
                        return Err(AnalyticsError::ItemCount {
                            event: kind.as_str(),
                            got,
                        })
                    }
                };
                if kind == EventKind::AddToCart {
                    CommerceEvent::add_to_cart(currency, item)
                } else {
                    CommerceEvent::view_item(currency, item)
                }
            }
            EventKind::ViewItemList => CommerceEvent::view_item_list(
                currency,
                items,
                ItemList {
                    id: raw.item_list_id,
                    name: raw.item_list_name,
                },
            ),
            EventKind::BeginCheckout => CommerceEvent::begin_checkout(
                currency,
                items,
                CheckoutDetails {
                    discount: raw.discount.unwrap_or_default(),
                    coupon: raw.coupon,
                },
            ),
        };

        Ok(event)
    }

    pub fn kind(&self) -> EventKind {
        self.detail.kind()
    }

    pub fn currency(&self) -> Currency {
        self.currency
    }

    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    pub fn adjustments(&self) -> &Adjustments {
        &self.adjustments
    }

    pub fn detail(&self) -> &EventDetail {
        &self.detail
    }

    /// Transaction id, for purchases that were given one.
    pub fn transaction_id(&self) -> Option<&TransactionId> {
        match &self.detail {
            EventDetail::Purchase { transaction_id, .. } => transaction_id.as_ref(),
            _ => None,
        }
    }

    /// Coupon code, when the variant has one and it was supplied.
    pub fn coupon(&self) -> Option<&str> {
        match &self.detail {
            EventDetail::Purchase { coupon, .. } | EventDetail::BeginCheckout { coupon } => {
                coupon.as_deref()
            }
            _ => None,
        }
    }

    /// Payment method label, for purchases.
    pub fn payment_method(&self) -> Option<&str> {
        match &self.detail {
            EventDetail::Purchase { payment_method, .. } => payment_method.as_deref(),
            _ => None,
        }
    }

    /// Sum of unit price times quantity over all items.
    pub fn items_total(&self) -> Amount {
        self.items.iter().map(LineItem::line_total).sum()
    }

    /// Items total plus shipping and tax, minus discount.
    pub fn value(&self) -> Amount {
        self.items_total() + self.adjustments.shipping + self.adjustments.tax
            - self.adjustments.discount
    }

    /// Sum of item quantities.
    pub fn num_items(&self) -> u64 {
        self.items.iter().map(|i| u64::from(i.quantity())).sum()
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

/// Wire shape of a loose event document.
#[derive(Debug, Deserialize)]
struct RawEvent {
    #[serde(rename = "type", alias = "event")]
    kind: String,
    #[serde(default)]
    currency: Option<Currency>,
    #[serde(default)]
    items: Vec<RawItem>,
    #[serde(default)]
    item: Option<RawItem>,
    #[serde(default)]
    transaction_id: Option<TransactionId>,
    #[serde(default)]
    shipping: Option<Amount>,
    #[serde(default)]
    tax: Option<Amount>,
    #[serde(default)]
    discount: Option<Amount>,
    #[serde(default)]
    coupon: Option<String>,
    #[serde(default)]
    payment_method: Option<String>,
    #[serde(default)]
    item_list_id: Option<String>,
    #[serde(default)]
    item_list_name: Option<String>,
}
