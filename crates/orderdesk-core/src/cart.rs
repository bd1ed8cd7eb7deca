//! # Cart
//!
//! Line items and the cart aggregator.
//!
//! ## Cart Operations Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Cart Operations                                      │
//! │                                                                         │
//! │  Caller Action            Cart Method             Cart State Change     │
//! │  ─────────────            ───────────             ─────────────────     │
//! │                                                                         │
//! │  "Add to cart" ──────────► add() ───────────────► items.push(snapshot)  │
//! │                                                                         │
//! │  Line +/-/input ─────────► set_line_quantity() ─► item.quantity = n     │
//! │                            increment_line()        │                    │
//! │                            decrement_line()        ▼                    │
//! │                                      LineItemEvent::Updated             │
//! │                                                                         │
//! │  Line "remove" ──────────► request_removal() ───► LineItemEvent::       │
//! │                                                   RemovalRequested      │
//! │                                                        │                │
//! │                            handle_line_event() ◄───────┘                │
//! │                                                                         │
//! │  Every mutation ends in recompute_totals() before the call returns.     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Totals
//! ```text
//! subtotal    = Σ line_total
//! total_price = subtotal + delivery_fee
//! totalNumber = Σ quantity
//! ```

use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use ts_rs::TS;
use uuid::Uuid;

use crate::configurator::ConfiguredProduct;
use crate::error::{CoreError, CoreResult};
use crate::events::{EventHub, OrderEvent, OrderEventListener};
use crate::money::Money;
use crate::payload::OrderPayload;
use crate::quantity::QuantityControl;
use crate::selection::{SelectedParams, SelectionSet};
use crate::settings::{OrderSettings, QuantitySettings};
use crate::submission::{OrderSubmitter, PendingSubmission};
use crate::validation::{validate_address, validate_phone, ValidationResult};

// =============================================================================
// Line Item Identity
// =============================================================================

/// Cart-local identity of a line item. Never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LineItemId(Uuid);

impl LineItemId {
    pub fn new() -> Self {
        LineItemId(Uuid::new_v4())
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for LineItemId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for LineItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

// =============================================================================
// Line Item
// =============================================================================

/// What a line item tells its cart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineItemEvent {
    /// The quantity changed; the line total has already been updated.
    Updated {
        line_id: LineItemId,
        quantity: u32,
        line_total: Money,
    },
    /// The user asked for the item to be removed.
    RemovalRequested { line_id: LineItemId },
}

/// A configured product frozen into the cart.
///
/// ## Design Notes
/// - Name, unit price, selections and the selection record are copied at add
///   time; later edits in the configurator never reach the line item.
/// - The line item owns its own quantity control. Only quantity can change
///   after the item is added.
#[derive(Debug, Clone)]
pub struct CartLineItem {
    id: LineItemId,
    product_id: String,
    name: String,
    unit_price: Money,
    selections: SelectionSet,
    params: SelectedParams,
    quantity: QuantityControl,
    line_total: Money,
    added_at: DateTime<Utc>,
}

impl CartLineItem {
    /// Freezes a configured product into a new line item.
    pub fn from_configured(product: &ConfiguredProduct, settings: QuantitySettings) -> Self {
        let quantity = QuantityControl::with_value(settings, product.quantity);
        let line_total = product.unit_price.multiply_quantity(quantity.value());

        CartLineItem {
            id: LineItemId::new(),
            product_id: product.product_id.clone(),
            name: product.name.clone(),
            unit_price: product.unit_price,
            selections: product.selections.clone(),
            params: product.params.clone(),
            quantity,
            line_total,
            added_at: Utc::now(),
        }
    }

    pub fn id(&self) -> LineItemId {
        self.id
    }

    pub fn product_id(&self) -> &str {
        &self.product_id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Unit price frozen at add time.
    pub fn unit_price(&self) -> Money {
        self.unit_price
    }

    pub fn quantity(&self) -> u32 {
        self.quantity.value()
    }

    pub fn line_total(&self) -> Money {
        self.line_total
    }

    pub fn selections(&self) -> &SelectionSet {
        &self.selections
    }

    pub fn params(&self) -> &SelectedParams {
        &self.params
    }

    pub fn added_at(&self) -> DateTime<Utc> {
        self.added_at
    }

    /// Applies raw quantity input to this line.
    pub fn set_quantity(&mut self, raw: &str) -> Option<LineItemEvent> {
        let changed = self.quantity.set_value(raw);
        self.on_quantity(changed.is_some())
    }

    pub fn increment(&mut self) -> Option<LineItemEvent> {
        let changed = self.quantity.increment();
        self.on_quantity(changed.is_some())
    }

    pub fn decrement(&mut self) -> Option<LineItemEvent> {
        let changed = self.quantity.decrement();
        self.on_quantity(changed.is_some())
    }

    /// Asks the owning cart to remove this item. The item itself is untouched.
    pub fn request_removal(&self) -> LineItemEvent {
        LineItemEvent::RemovalRequested { line_id: self.id }
    }

    fn on_quantity(&mut self, changed: bool) -> Option<LineItemEvent> {
        if !changed {
            return None;
        }

        self.line_total = self.unit_price.multiply_quantity(self.quantity.value());
        debug!(
            line_id = %self.id,
            quantity = self.quantity.value(),
            line_total = %self.line_total,
            "Line item quantity changed"
        );

        Some(LineItemEvent::Updated {
            line_id: self.id,
            quantity: self.quantity.value(),
            line_total: self.line_total,
        })
    }
}

// =============================================================================
// Totals & Contact
// =============================================================================

/// Cart-level aggregates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct CartTotals {
    /// Sum of line quantities.
    pub total_number: u32,
    pub subtotal: Money,
    pub delivery_fee: Money,
    pub total_price: Money,
}

/// Delivery contact carried into the order payload.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ContactDetails {
    pub phone: String,
    pub address: String,
}

impl ContactDetails {
    pub fn new(phone: impl Into<String>, address: impl Into<String>) -> Self {
        ContactDetails {
            phone: phone.into(),
            address: address.into(),
        }
    }

    pub fn validate(&self) -> ValidationResult<()> {
        validate_phone(&self.phone)?;
        validate_address(&self.address)
    }
}

// =============================================================================
// Cart Aggregator
// =============================================================================

/// The single owner of the line-item sequence.
///
/// ## Invariants
/// - Items keep insertion order
/// - `totals()` always reflects the current items
/// - A removed id never comes back
#[derive(Debug)]
pub struct Cart {
    settings: OrderSettings,
    items: Vec<CartLineItem>,
    contact: ContactDetails,
    totals: CartTotals,
    events: EventHub,
}

impl Cart {
    /// Creates an empty cart.
    pub fn new(settings: OrderSettings) -> Self {
        let delivery_fee = settings.cart.delivery_fee;
        Cart {
            settings,
            items: Vec::new(),
            contact: ContactDetails::default(),
            totals: CartTotals {
                delivery_fee,
                total_price: delivery_fee,
                ..CartTotals::default()
            },
            events: EventHub::new(),
        }
    }

    pub fn subscribe(&mut self, listener: Arc<dyn OrderEventListener>) {
        self.events.subscribe(listener);
    }

    pub fn settings(&self) -> &OrderSettings {
        &self.settings
    }

    pub fn items(&self) -> &[CartLineItem] {
        &self.items
    }

    pub fn get(&self, line_id: LineItemId) -> Option<&CartLineItem> {
        self.items.iter().find(|item| item.id == line_id)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn totals(&self) -> CartTotals {
        self.totals
    }

    pub fn contact(&self) -> &ContactDetails {
        &self.contact
    }

    pub fn set_contact(&mut self, contact: ContactDetails) {
        self.contact = contact;
    }

    // =========================================================================
    // Mutations
    // =========================================================================

    /// Appends a snapshot of `product` and recomputes totals.
    pub fn add(&mut self, product: &ConfiguredProduct) -> LineItemId {
        let item = CartLineItem::from_configured(product, self.settings.quantity);
        let line_id = item.id;

        info!(
            line_id = %line_id,
            product_id = %item.product_id,
            quantity = item.quantity(),
            line_total = %item.line_total,
            "Added to cart"
        );

        self.items.push(item);
        self.events.emit(OrderEvent::LineItemAdded {
            line_id,
            product_id: product.product_id.clone(),
        });
        self.recompute_totals();

        line_id
    }

    /// Removes a line item. Unknown ids are ignored.
    ///
    /// Returns whether anything was removed.
    pub fn remove(&mut self, line_id: LineItemId) -> bool {
        let Some(index) = self.items.iter().position(|item| item.id == line_id) else {
            debug!(line_id = %line_id, "Remove ignored, line item not in cart");
            return false;
        };

        let removed = self.items.remove(index);
        info!(line_id = %line_id, product_id = %removed.product_id, "Removed from cart");

        self.events.emit(OrderEvent::LineItemRemoved { line_id });
        self.recompute_totals();
        true
    }

    /// Removes every line item.
    pub fn clear(&mut self) {
        self.items.clear();
        info!("Cart cleared");

        self.events.emit(OrderEvent::CartCleared);
        self.recompute_totals();
    }

    /// Recomputes the aggregates from the current items.
    pub fn recompute_totals(&mut self) -> CartTotals {
        let total_number: u32 = self.items.iter().map(CartLineItem::quantity).sum();
        let subtotal: Money = self.items.iter().map(CartLineItem::line_total).sum();
        let delivery_fee = self.settings.cart.delivery_fee;

        self.totals = CartTotals {
            total_number,
            subtotal,
            delivery_fee,
            total_price: subtotal + delivery_fee,
        };

        debug!(
            total_number,
            subtotal = %subtotal,
            total_price = %self.totals.total_price,
            "Cart totals recomputed"
        );

        self.events.emit(OrderEvent::TotalsChanged(self.totals));
        self.totals
    }

    /// Entry point for events raised by line items.
    pub fn handle_line_event(&mut self, event: LineItemEvent) {
        match event {
            LineItemEvent::Updated {
                line_id,
                quantity,
                line_total,
            } => {
                self.events.emit(OrderEvent::LineItemUpdated {
                    line_id,
                    quantity,
                    line_total,
                });
                self.recompute_totals();
            }
            LineItemEvent::RemovalRequested { line_id } => {
                self.remove(line_id);
            }
        }
    }

    // =========================================================================
    // Line Edits
    // =========================================================================

    /// Applies raw quantity input to one line. Returns the line's event when
    /// the quantity actually changed.
    pub fn set_line_quantity(&mut self, line_id: LineItemId, raw: &str) -> Option<LineItemEvent> {
        self.edit_line(line_id, |item| item.set_quantity(raw))
    }

    pub fn increment_line(&mut self, line_id: LineItemId) -> Option<LineItemEvent> {
        self.edit_line(line_id, CartLineItem::increment)
    }

    pub fn decrement_line(&mut self, line_id: LineItemId) -> Option<LineItemEvent> {
        self.edit_line(line_id, CartLineItem::decrement)
    }

    /// Routes a line's removal request back through the cart.
    pub fn request_removal(&mut self, line_id: LineItemId) -> bool {
        let Some(event) = self.get(line_id).map(CartLineItem::request_removal) else {
            return false;
        };
        self.handle_line_event(event);
        true
    }

    fn edit_line<F>(&mut self, line_id: LineItemId, edit: F) -> Option<LineItemEvent>
    where
        F: FnOnce(&mut CartLineItem) -> Option<LineItemEvent>,
    {
        let item = self.items.iter_mut().find(|item| item.id == line_id)?;
        let event = edit(item)?;
        self.handle_line_event(event);
        Some(event)
    }

    // =========================================================================
    // Checkout
    // =========================================================================

    /// Projects the cart into the order body. Does not mutate the cart.
    pub fn build_order_payload(&self) -> OrderPayload {
        OrderPayload::from_cart(self)
    }

    /// Validates the cart and snapshots its payload for submission.
    ///
    /// The returned [`PendingSubmission`] owns everything it needs, so the
    /// cart can keep changing while the request is in flight.
    ///
    /// ## Errors
    /// - [`CoreError::EmptyCart`] when there is nothing to order
    /// - [`CoreError::Validation`] when phone or address is unusable
    pub fn submit(&self, submitter: Arc<dyn OrderSubmitter>) -> CoreResult<PendingSubmission> {
        if self.items.is_empty() {
            return Err(CoreError::EmptyCart);
        }
        self.contact.validate()?;

        let payload = self.build_order_payload();
        info!(
            lines = payload.products.len(),
            total_price = %payload.total_price,
            "Order ready for submission"
        );

        Ok(PendingSubmission::new(payload, submitter))
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
