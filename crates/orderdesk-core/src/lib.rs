//! # orderdesk-core: Order Configuration & Cart Aggregation
//!
//! This crate holds every pricing and cart rule of OrderDesk as plain,
//! synchronous Rust. It performs no I/O; fetching the catalog and delivering
//! orders are traits implemented elsewhere.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        OrderDesk Architecture                           │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │               Rendering layer (any UI, any process)             │   │
//! │  │    Menu forms ──► Quantity inputs ──► Cart panel ──► Checkout   │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ method calls / OrderEvent             │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │              ★ orderdesk-core (THIS CRATE) ★                    │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌────────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │  catalog  │  │configurator│  │   cart    │  │  payload  │  │   │
//! │  │   │   menu    │  │  quantity  │  │  events   │  │submission │  │   │
//! │  │   └───────────┘  └────────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO NETWORK • INTEGER MONEY                           │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ CatalogSource / OrderSubmitter         │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                orderdesk-client (HTTP, config, binary)          │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`catalog`] - Product definitions and the catalog seam
//! - [`menu`] - One configurator per catalog product
//! - [`configurator`] - Option selections and the price delta rule
//! - [`quantity`] - Bounded quantity input
//! - [`cart`] - Line items and cart totals
//! - [`payload`] - The order body sent to the backend
//! - [`submission`] - The order delivery seam
//! - [`events`] - Notifications for the rendering layer
//! - [`money`] - Integer money
//! - [`settings`] - Quantity bounds and delivery fee
//! - [`validation`] - Catalog and contact checks
//! - [`error`] - Domain error types
//!
//! ## Example Usage
//!
//! ```rust
//! use orderdesk_core::{Cart, ContactDetails, Menu, Money, OrderSettings};
//! use serde_json::json;
//!
//! let settings = OrderSettings::default();
//! let catalog = vec![json!({
//!     "id": "pizza", "name": "Pizza", "price": 20,
//!     "params": { "crust": { "label": "Crust", "options": {
//!         "thin": { "label": "Thin", "price": 0, "default": true },
//!         "thick": { "label": "Thick", "price": 3 }
//!     }}}
//! })];
//!
//! let mut menu = Menu::from_catalog(&catalog, settings.quantity);
//! let mut cart = Cart::new(settings);
//!
//! menu.configurator_mut("pizza").unwrap().select("crust", "thick");
//! menu.add_to_cart("pizza", &mut cart).unwrap();
//!
//! cart.set_contact(ContactDetails::new("123456789", "Main Street 1"));
//! let payload = cart.build_order_payload();
//!
//! // 20 + 3 (thick crust), plus the default delivery fee of 20
//! assert_eq!(payload.subtotal_price, Money::new(23));
//! assert_eq!(payload.total_price, Money::new(43));
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod cart;
pub mod catalog;
pub mod configurator;
pub mod error;
pub mod events;
pub mod menu;
pub mod money;
pub mod payload;
pub mod quantity;
pub mod selection;
pub mod settings;
pub mod submission;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use cart::{Cart, CartLineItem, CartTotals, ContactDetails, LineItemEvent, LineItemId};
pub use catalog::{CatalogSource, ParamKind, ProductDefinition, StaticCatalog};
pub use configurator::{ConfiguredProduct, ProductConfigurator};
pub use error::{CoreError, CoreResult, TransportError, ValidationError};
pub use events::{EventHub, OrderEvent, OrderEventListener};
pub use menu::{Menu, RejectedEntry};
pub use money::Money;
pub use payload::{OrderLine, OrderPayload};
pub use quantity::{QuantityChanged, QuantityControl};
pub use selection::{SelectedParams, SelectionSet};
pub use settings::{CartSettings, OrderSettings, QuantitySettings};
pub use submission::{OrderSubmitter, PendingSubmission, SubmissionReceipt};
