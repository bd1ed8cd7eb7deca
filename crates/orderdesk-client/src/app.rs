//! # Application Bootstrap
//!
//! Wires configuration, transport, menu and cart together.
//!
//! ## Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  OrderDeskConfig ──► HttpOrderService ──fetch──► Menu                   │
//! │                                                   │                     │
//! │                          OrderDraft ──apply──► Cart (contact + lines)   │
//! │                                                   │                     │
//! │                                 place_order() ──► OrderSubmitter        │
//! │                                                   │                     │
//! │                 checkout.clear_cart_on_success? ──► cart.clear()        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::path::Path;
use std::sync::Arc;

use orderdesk_core::{
    CatalogSource, ContactDetails, Cart, LineItemId, Menu, OrderSubmitter, SelectionSet,
    SubmissionReceipt,
};
use serde::Deserialize;
use tracing::{info, warn};

use crate::config::OrderDeskConfig;
use crate::error::{ClientError, ClientResult};
use crate::http::HttpOrderService;

// =============================================================================
// Order Draft
// =============================================================================

/// One product to order, as written in a draft file.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DraftItem {
    /// Product id on the menu.
    pub product: String,

    #[serde(default = "default_quantity")]
    pub quantity: u32,

    /// Selected options; the product's defaults when absent.
    #[serde(default)]
    pub selections: Option<SelectionSet>,
}

fn default_quantity() -> u32 {
    1
}

/// A whole order described as data.
///
/// ```json
/// {
///   "phone": "123456789",
///   "address": "Main Street 1",
///   "items": [
///     { "product": "pizza", "quantity": 2, "selections": { "crust": ["thick"] } }
///   ]
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct OrderDraft {
    pub phone: String,
    pub address: String,
    pub items: Vec<DraftItem>,
}

impl OrderDraft {
    /// Reads a draft from a JSON file.
    pub fn from_path(path: &Path) -> ClientResult<Self> {
        let contents = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&contents)?)
    }
}

// =============================================================================
// OrderDesk
// =============================================================================

/// A loaded menu, a cart, and somewhere to send orders.
pub struct OrderDesk {
    config: OrderDeskConfig,
    submitter: Arc<dyn OrderSubmitter>,
    menu: Menu,
    cart: Cart,
}

impl OrderDesk {
    /// Builds the HTTP service and loads the menu from it.
    pub async fn init(config: OrderDeskConfig) -> ClientResult<Self> {
        let service = Arc::new(HttpOrderService::new(&config.api)?);
        info!(url = %service.product_url(), "Initializing OrderDesk");

        Self::with_transport(config, service.as_ref(), service.clone()).await
    }

    /// Loads the menu from `catalog` and sends orders through `submitter`.
    pub async fn with_transport(
        config: OrderDeskConfig,
        catalog: &dyn CatalogSource,
        submitter: Arc<dyn OrderSubmitter>,
    ) -> ClientResult<Self> {
        config.validate()?;

        let menu = Menu::load(catalog, config.quantity).await?;
        for rejected in menu.rejected() {
            warn!(product_id = %rejected.id, reason = %rejected.reason, "Product left off the menu");
        }

        let cart = Cart::new(config.order_settings());

        Ok(OrderDesk {
            config,
            submitter,
            menu,
            cart,
        })
    }

    pub fn config(&self) -> &OrderDeskConfig {
        &self.config
    }

    pub fn menu(&self) -> &Menu {
        &self.menu
    }

    pub fn menu_mut(&mut self) -> &mut Menu {
        &mut self.menu
    }

    pub fn cart(&self) -> &Cart {
        &self.cart
    }

    pub fn cart_mut(&mut self) -> &mut Cart {
        &mut self.cart
    }

    /// Configures each drafted product, adds it to the cart and sets the
    /// contact details.
    ///
    /// Every item is checked before anything changes, so a rejected draft
    /// leaves the cart and contact as they were.
    ///
    /// ## Errors
    /// - [`ClientError::Core`] for a product that is not on the menu
    /// - [`ClientError::InvalidDraft`] for a quantity outside the configured bounds
    pub fn apply_draft(&mut self, draft: OrderDraft) -> ClientResult<Vec<LineItemId>> {
        self.check_draft(&draft)?;

        let mut added = Vec::with_capacity(draft.items.len());
        for item in draft.items {
            let configurator = self.menu.configurator_mut(&item.product)?;
            configurator.set_quantity(&item.quantity.to_string());

            let selections = item
                .selections
                .unwrap_or_else(|| SelectionSet::defaults_of(configurator.definition()));
            configurator.recompute(selections);

            added.push(self.menu.add_to_cart(&item.product, &mut self.cart)?);
        }

        self.cart
            .set_contact(ContactDetails::new(draft.phone, draft.address));

        info!(lines = added.len(), total = %self.cart.totals().total_price, "Draft applied");
        Ok(added)
    }

    fn check_draft(&self, draft: &OrderDraft) -> ClientResult<()> {
        let bounds = self.config.quantity;

        for item in &draft.items {
            self.menu.configurator(&item.product)?;

            if !bounds.contains(i64::from(item.quantity)) {
                return Err(ClientError::InvalidDraft(format!(
                    "quantity {} for {} is outside {}..={}",
                    item.quantity, item.product, bounds.min, bounds.max
                )));
            }
        }

        Ok(())
    }

    /// Submits the cart and applies the post-submission policy.
    ///
    /// The cart is only cleared when the backend accepted the order and
    /// `checkout.clear_cart_on_success` is set.
    pub async fn place_order(&mut self) -> ClientResult<SubmissionReceipt> {
        let pending = self.cart.submit(Arc::clone(&self.submitter))?;
        let receipt = pending.send().await?;

        if self.config.checkout.clear_cart_on_success {
            self.cart.clear();
        }

        Ok(receipt)
    }
}
