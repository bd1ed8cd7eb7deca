//! # Update Propagation
//!
//! The typed notification channel between the engine and whoever renders it.
//!
//! ## Propagation Order
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  QuantityControl ──QuantityChanged──► owner (configurator / line item)  │
//! │        (returned from the call, handled before the call returns)        │
//! │                                                                         │
//! │  CartLineItem ──LineItemEvent──► Cart::handle_line_event                │
//! │        Updated          → recompute_totals                              │
//! │        RemovalRequested → remove                                        │
//! │                                                                         │
//! │  Configurator / Cart ──OrderEvent──► every subscribed listener          │
//! │        (in subscription order, after internal state is consistent)      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Child → parent hops are plain method calls on owned values; only the last
//! hop, out to the rendering layer, goes through [`OrderEventListener`].

use std::fmt;
use std::sync::Arc;

use serde::Serialize;

use crate::cart::{CartTotals, LineItemId};
use crate::money::Money;

// =============================================================================
// Events
// =============================================================================

/// Everything the rendering layer can be told about.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum OrderEvent {
    /// A menu product's price was recomputed.
    ProductRecomputed {
        product_id: String,
        quantity: u32,
        unit_price: Money,
        line_total: Money,
    },

    /// A configured product entered the cart.
    LineItemAdded {
        line_id: LineItemId,
        product_id: String,
    },

    /// A line item's quantity changed in the cart.
    LineItemUpdated {
        line_id: LineItemId,
        quantity: u32,
        line_total: Money,
    },

    /// A line item left the cart.
    LineItemRemoved { line_id: LineItemId },

    /// Cart totals were recomputed.
    TotalsChanged(CartTotals),

    /// The cart was emptied.
    CartCleared,
}

/// Receives [`OrderEvent`]s.
///
/// Any `Fn(&OrderEvent)` closure that is `Send + Sync` is a listener.
pub trait OrderEventListener: Send + Sync {
    fn on_event(&self, event: &OrderEvent);
}

impl<F> OrderEventListener for F
where
    F: Fn(&OrderEvent) + Send + Sync,
{
    fn on_event(&self, event: &OrderEvent) {
        self(event)
    }
}

// =============================================================================
// Event Hub
// =============================================================================

/// An ordered list of listeners.
#[derive(Clone, Default)]
pub struct EventHub {
    listeners: Vec<Arc<dyn OrderEventListener>>,
}

impl EventHub {
    pub fn new() -> Self {
        EventHub::default()
    }

    /// Adds a listener; listeners are called in the order they subscribed.
    pub fn subscribe(&mut self, listener: Arc<dyn OrderEventListener>) {
        self.listeners.push(listener);
    }

    pub fn emit(&self, event: OrderEvent) {
        for listener in &self.listeners {
            listener.on_event(&event);
        }
    }

    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }
}

impl fmt::Debug for EventHub {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventHub")
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

// =============================================================================
// Test Support
// =============================================================================

/// Listener that remembers every event, for tests.
#[cfg(test)]
#[derive(Default)]
pub(crate) struct Recorder {
    events: std::sync::Mutex<Vec<OrderEvent>>,
}

#[cfg(test)]
impl Recorder {
    pub(crate) fn events(&self) -> Vec<OrderEvent> {
        self.events.lock().unwrap().clone()
    }
}

#[cfg(test)]
impl OrderEventListener for Recorder {
    fn on_event(&self, event: &OrderEvent) {
        self.events.lock().unwrap().push(event.clone());
    }
}
