//! # Menu
//!
//! One [`ProductConfigurator`] per valid catalog product, in catalog order.
//!
//! ## Loading
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  CatalogSource::fetch_catalog()                                         │
//! │        │                                                                │
//! │        ├── Err ──► CoreError::Transport (menu does not load)            │
//! │        ▼                                                                │
//! │  for each raw entry:                                                    │
//! │        ProductDefinition::from_json ──Err──► rejected() + warn!         │
//! │        duplicate product id ──────────────► rejected() + warn!          │
//! │        │                                                                │
//! │        ▼                                                                │
//! │  ProductConfigurator (defaults selected, default quantity)              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::collections::HashSet;
use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;
use tracing::{info, warn};

use crate::cart::{Cart, LineItemId};
use crate::catalog::{CatalogSource, ProductDefinition};
use crate::configurator::ProductConfigurator;
use crate::error::{CoreError, CoreResult, ValidationError};
use crate::events::OrderEventListener;
use crate::settings::QuantitySettings;

/// A catalog entry that did not make it onto the menu.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RejectedEntry {
    pub id: String,
    pub reason: String,
}

/// The configurable products on offer.
#[derive(Debug, Default)]
pub struct Menu {
    configurators: Vec<ProductConfigurator>,
    rejected: Vec<RejectedEntry>,
}

impl Menu {
    /// Builds the menu from raw catalog entries, skipping bad ones.
    pub fn from_catalog(entries: &[Value], quantity: QuantitySettings) -> Self {
        let mut menu = Menu::default();
        let mut seen = HashSet::new();

        for entry in entries {
            let definition = ProductDefinition::from_json(entry).and_then(|definition| {
                if seen.insert(definition.id.clone()) {
                    Ok(definition)
                } else {
                    Err(CoreError::MalformedCatalogEntry {
                        id: definition.id.clone(),
                        reason: ValidationError::Duplicate {
                            field: "product id".to_string(),
                            value: definition.id,
                        }
                        .to_string(),
                    })
                }
            });

            match definition {
                Ok(definition) => {
                    menu.configurators
                        .push(ProductConfigurator::new(Arc::new(definition), quantity));
                }
                Err(CoreError::MalformedCatalogEntry { id, reason }) => {
                    warn!(product_id = %id, reason = %reason, "Rejected catalog entry");
                    menu.rejected.push(RejectedEntry { id, reason });
                }
                Err(other) => {
                    warn!(error = %other, "Rejected catalog entry");
                    menu.rejected.push(RejectedEntry {
                        id: "<unknown>".to_string(),
                        reason: other.to_string(),
                    });
                }
            }
        }

        menu
    }

    /// Fetches the catalog and builds the menu.
    ///
    /// ## Errors
    /// [`CoreError::Transport`] when the fetch fails.
    pub async fn load(source: &dyn CatalogSource, quantity: QuantitySettings) -> CoreResult<Self> {
        let entries = source.fetch_catalog().await?;
        let menu = Menu::from_catalog(&entries, quantity);

        info!(
            products = menu.len(),
            rejected = menu.rejected.len(),
            "Menu loaded"
        );
        Ok(menu)
    }

    /// Product definitions in catalog order.
    pub fn products(&self) -> impl Iterator<Item = &ProductDefinition> {
        self.configurators.iter().map(ProductConfigurator::definition)
    }

    pub fn configurators(&self) -> &[ProductConfigurator] {
        &self.configurators
    }

    pub fn configurator(&self, product_id: &str) -> CoreResult<&ProductConfigurator> {
        self.configurators
            .iter()
            .find(|c| c.id() == product_id)
            .ok_or_else(|| CoreError::ProductNotFound(product_id.to_string()))
    }

    pub fn configurator_mut(&mut self, product_id: &str) -> CoreResult<&mut ProductConfigurator> {
        self.configurators
            .iter_mut()
            .find(|c| c.id() == product_id)
            .ok_or_else(|| CoreError::ProductNotFound(product_id.to_string()))
    }

    /// Entries that were skipped while building the menu.
    pub fn rejected(&self) -> &[RejectedEntry] {
        &self.rejected
    }

    /// Subscribes a listener to every product on the menu.
    pub fn subscribe(&mut self, listener: Arc<dyn OrderEventListener>) {
        for configurator in &mut self.configurators {
            configurator.subscribe(Arc::clone(&listener));
        }
    }

    /// Recomputes a product with its current selections and adds the
    /// result to `cart`.
    pub fn add_to_cart(&mut self, product_id: &str, cart: &mut Cart) -> CoreResult<LineItemId> {
        let configurator = self.configurator_mut(product_id)?;
        let selections = configurator.selections().clone();
        let configured = configurator.recompute(selections);
        Ok(cart.add(configured))
    }

    pub fn len(&self) -> usize {
        self.configurators.len()
    }

    pub fn is_empty(&self) -> bool {
        self.configurators.is_empty()
    }
}
