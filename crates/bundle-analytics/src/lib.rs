//! Commerce analytics for the eSIM bundle storefront.
//!
//! This crate turns storefront actions into analytics events and sends them
//! to two destinations:
//!
//! - **GA4**: nested e-commerce messages pushed onto a tag-manager data layer
//! - **Pixel**: flat, scalar-only parameters passed to the pixel function
//!
//! # Example
//!
//! ```rust
//! use bundle_analytics::prelude::*;
//!
//! let event = CommerceEvent::purchase(
//!     Currency::USD,
//!     vec![LineItem::new("esim-eu-10gb", "Europe 10GB", 19.0)],
//!     PurchaseDetails {
//!         shipping: 2.6.into(),
//!         tax: 4.5.into(),
//!         discount: 1.0.into(),
//!         ..PurchaseDetails::new("T-1001")
//!     },
//! );
//! assert_eq!(event.value().to_string(), "25.10");
//!
//! // No destinations installed yet: both sends are dropped quietly.
//! let tracker = Tracker::detached();
//! let report = tracker.track(&event);
//! assert_eq!(report.pixel, DispatchOutcome::Unavailable);
//! ```

pub mod config;
pub mod dispatch;
pub mod error;
pub mod event;
pub mod ga4;
pub mod ids;
pub mod item;
pub mod money;
pub mod pixel;
pub mod sanitize;
pub mod tracker;

pub use config::AnalyticsConfig;
pub use dispatch::{DispatchOutcome, GlobalSlot};
pub use error::{AnalyticsError, DestinationError};
pub use event::{CommerceEvent, EventKind};
pub use ids::*;
pub use item::{LineItem, RawItem};
pub use money::{Amount, Currency};
pub use tracker::{DispatchReport, Tracker};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::config::{AnalyticsConfig, Ga4Config, PixelConfig};
    pub use crate::error::{AnalyticsError, DestinationError};
    pub use crate::ids::*;
    pub use crate::money::{Amount, Currency};

    // Event model
    pub use crate::event::{
        CheckoutDetails, CommerceEvent, EventDetail, EventKind, ItemList, PurchaseDetails,
    };
    pub use crate::item::{ItemDefaults, LineItem, RawItem, DEFAULT_BRAND, DEFAULT_CATEGORY};

    // Payloads
    pub use crate::ga4::{Ga4Ecommerce, Ga4Item, Ga4Payload};
    pub use crate::pixel::{EventOptions, PixelContent, PixelParams, PixelPayload};
    pub use crate::sanitize::sanitize;

    // Dispatch
    pub use crate::dispatch::{
        DataLayer, Destination, DispatchOutcome, Ga4Dispatcher, GlobalSlot, PixelCall,
        PixelDispatcher, PixelFunction,
    };
    pub use crate::tracker::{DispatchReport, Tracker};
}
