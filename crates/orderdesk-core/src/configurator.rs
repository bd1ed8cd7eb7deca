//! # Product Configurator
//!
//! Holds one menu product's option selections and quantity, and derives its
//! unit price and line total.
//!
//! ## The Delta Rule
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  The base price already includes every default option.                  │
//! │                                                                         │
//! │              │ selected           │ not selected                        │
//! │  ────────────┼────────────────────┼──────────────────────               │
//! │  default     │ 0 (already in base)│ − option.price                      │
//! │  not default │ + option.price     │ 0                                   │
//! │                                                                         │
//! │  unit_price = base_price + Σ deltas                                     │
//! │  line_total = unit_price × quantity                                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Example
//! ```rust
//! use std::sync::Arc;
//! use orderdesk_core::catalog::ProductDefinition;
//! use orderdesk_core::configurator::ProductConfigurator;
//! use orderdesk_core::selection::SelectionSet;
//! use orderdesk_core::settings::QuantitySettings;
//! use orderdesk_core::Money;
//! use serde_json::json;
//!
//! let definition = ProductDefinition::from_json(&json!({
//!     "id": "burger", "name": "Burger", "price": 20,
//!     "params": { "sauce": { "label": "Sauce", "options": {
//!         "ketchup": { "label": "Ketchup", "price": 2 },
//!         "mayo": { "label": "Mayo", "price": 1, "default": true }
//!     }}}
//! })).unwrap();
//!
//! let mut burger = ProductConfigurator::new(Arc::new(definition), QuantitySettings::default());
//! burger.set_quantity("2");
//! let configured = burger.recompute([("sauce", ["ketchup"])].into_iter().collect());
//!
//! assert_eq!(configured.unit_price, Money::new(23));
//! assert_eq!(configured.line_total, Money::new(46));
//! ```

use std::sync::Arc;

use serde::Serialize;
use tracing::debug;

use crate::catalog::{ParamKind, ProductDefinition};
use crate::events::{EventHub, OrderEvent, OrderEventListener};
use crate::money::Money;
use crate::quantity::{QuantityChanged, QuantityControl};
use crate::selection::{SelectedOption, SelectedParams, SelectionSet};
use crate::settings::QuantitySettings;

// =============================================================================
// Configured Product
// =============================================================================

/// The result of a recompute: a priced configuration of one product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfiguredProduct {
    pub product_id: String,
    pub name: String,
    /// Raw selections the price was computed from.
    pub selections: SelectionSet,
    /// Selected options with labels and prices.
    pub params: SelectedParams,
    pub quantity: u32,
    pub unit_price: Money,
    pub line_total: Money,
}

/// Applies the delta rule to `selections` and builds the selection record.
///
/// Parameters or options named in `selections` that the definition does not
/// have contribute nothing.
pub fn price_selections(
    definition: &ProductDefinition,
    selections: &SelectionSet,
) -> (Money, SelectedParams) {
    let mut price = definition.base_price;
    let mut record = SelectedParams::new();

    for param in &definition.parameters {
        for option in &param.options {
            let selected = selections.is_selected(&param.id, &option.id);

            match (selected, option.is_default) {
                (true, false) => price += option.price,
                (false, true) => price -= option.price,
                _ => {}
            }

            if selected {
                record.record(
                    &param.id,
                    &param.label,
                    &option.id,
                    SelectedOption {
                        label: option.label.clone(),
                        price: option.price,
                    },
                );
            }
        }
    }

    (price, record)
}

// =============================================================================
// Configurator
// =============================================================================

/// Configuration state of one menu product.
#[derive(Debug)]
pub struct ProductConfigurator {
    definition: Arc<ProductDefinition>,
    quantity: QuantityControl,
    current: ConfiguredProduct,
    events: EventHub,
}

impl ProductConfigurator {
    /// Creates a configurator with every default option selected and the
    /// default quantity.
    pub fn new(definition: Arc<ProductDefinition>, quantity: QuantitySettings) -> Self {
        let quantity = QuantityControl::new(quantity);
        let selections = SelectionSet::defaults_of(&definition);
        let current = Self::compute(&definition, selections, quantity.value());

        ProductConfigurator {
            definition,
            quantity,
            current,
            events: EventHub::new(),
        }
    }

    pub fn definition(&self) -> &ProductDefinition {
        &self.definition
    }

    pub fn id(&self) -> &str {
        &self.definition.id
    }

    /// Latest priced configuration.
    pub fn configured(&self) -> &ConfiguredProduct {
        &self.current
    }

    pub fn selections(&self) -> &SelectionSet {
        &self.current.selections
    }

    /// Which options are currently selected, per parameter.
    pub fn selection_record(&self) -> &SelectedParams {
        &self.current.params
    }

    pub fn quantity(&self) -> u32 {
        self.quantity.value()
    }

    pub fn subscribe(&mut self, listener: Arc<dyn OrderEventListener>) {
        self.events.subscribe(listener);
    }

    /// Replaces the selections and recomputes price and line total.
    ///
    /// Calling it again with the same selections and quantity yields the same
    /// result.
    pub fn recompute(&mut self, selections: SelectionSet) -> &ConfiguredProduct {
        self.current = Self::compute(&self.definition, selections, self.quantity.value());

        debug!(
            product_id = %self.definition.id,
            quantity = self.current.quantity,
            unit_price = %self.current.unit_price,
            line_total = %self.current.line_total,
            "Product recomputed"
        );

        self.events.emit(OrderEvent::ProductRecomputed {
            product_id: self.definition.id.clone(),
            quantity: self.current.quantity,
            unit_price: self.current.unit_price,
            line_total: self.current.line_total,
        });

        &self.current
    }

    // =========================================================================
    // Selection Edits
    // =========================================================================

    /// Selects an option. For radio and select parameters the option replaces
    /// whatever was selected before.
    pub fn select(&mut self, param_id: &str, option_id: &str) -> &ConfiguredProduct {
        let mut selections = self.current.selections.clone();
        match self.definition.parameter(param_id).map(|p| p.kind) {
            Some(ParamKind::Radios | ParamKind::Select) => selections.replace(param_id, option_id),
            _ => {
                selections.insert(param_id, option_id);
            }
        }
        self.recompute(selections)
    }

    /// Unselects an option.
    pub fn deselect(&mut self, param_id: &str, option_id: &str) -> &ConfiguredProduct {
        let mut selections = self.current.selections.clone();
        selections.remove(param_id, option_id);
        self.recompute(selections)
    }

    /// Flips an option's selected state.
    pub fn toggle(&mut self, param_id: &str, option_id: &str) -> &ConfiguredProduct {
        if self.current.selections.is_selected(param_id, option_id) {
            self.deselect(param_id, option_id)
        } else {
            self.select(param_id, option_id)
        }
    }

    // =========================================================================
    // Quantity Edits
    // =========================================================================

    /// Applies raw quantity input; a real change triggers one recompute.
    pub fn set_quantity(&mut self, raw: &str) -> Option<QuantityChanged> {
        let changed = self.quantity.set_value(raw);
        self.on_quantity(changed)
    }

    pub fn increment_quantity(&mut self) -> Option<QuantityChanged> {
        let changed = self.quantity.increment();
        self.on_quantity(changed)
    }

    pub fn decrement_quantity(&mut self) -> Option<QuantityChanged> {
        let changed = self.quantity.decrement();
        self.on_quantity(changed)
    }

    fn on_quantity(&mut self, changed: Option<QuantityChanged>) -> Option<QuantityChanged> {
        if changed.is_some() {
            let selections = self.current.selections.clone();
            self.recompute(selections);
        }
        changed
    }

    fn compute(
        definition: &ProductDefinition,
        selections: SelectionSet,
        quantity: u32,
    ) -> ConfiguredProduct {
        let (unit_price, params) = price_selections(definition, &selections);

        ConfiguredProduct {
            product_id: definition.id.clone(),
            name: definition.name.clone(),
            selections,
            params,
            quantity,
            unit_price,
            line_total: unit_price.multiply_quantity(quantity),
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::catalog::{ProductOption, ProductParam};
    use crate::events::Recorder;
    use proptest::prelude::*;

    /// base 20; sauce: ketchup +2 (not default), mayo 1 (default).
    pub(crate) fn burger() -> Arc<ProductDefinition> {
        Arc::new(ProductDefinition {
            id: "burger".into(),
            name: "Burger".into(),
            description: None,
            base_price: Money::new(20),
            parameters: vec![ProductParam {
                id: "sauce".into(),
                label: "Sauce".into(),
                kind: ParamKind::Checkboxes,
                options: vec![
                    ProductOption {
                        id: "ketchup".into(),
                        label: "Ketchup".into(),
                        price: Money::new(2),
                        is_default: false,
                    },
                    ProductOption {
                        id: "mayo".into(),
                        label: "Mayo".into(),
                        price: Money::new(1),
                        is_default: true,
                    },
                ],
            }],
        })
    }

    fn configurator() -> ProductConfigurator {
        ProductConfigurator::new(burger(), QuantitySettings::default())
    }

    fn ketchup_only() -> SelectionSet {
        [("sauce", ["ketchup"])].into_iter().collect()
    }

    #[test]
    fn test_starts_with_defaults_at_base_price() {
        let c = configurator();
        assert!(c.selections().is_selected("sauce", "mayo"));
        assert_eq!(c.configured().unit_price, Money::new(20));
        assert_eq!(c.configured().line_total, Money::new(20));
        assert_eq!(c.quantity(), 1);
    }

    #[test]
    fn test_ketchup_instead_of_mayo() {
        let mut c = configurator();
        c.set_quantity("2");
        let configured = c.recompute(ketchup_only()).clone();

        // 20 + 2 (ketchup added) + 1 (mayo removed, was default)
        assert_eq!(configured.unit_price, Money::new(23));
        assert_eq!(configured.line_total, Money::new(46));
    }

    #[test]
    fn test_selected_default_adds_nothing() {
        let mut c = configurator();
        let both: SelectionSet = [("sauce", ["ketchup", "mayo"])].into_iter().collect();
        assert_eq!(c.recompute(both).unit_price, Money::new(22));
    }

    #[test]
    fn test_unknown_params_and_options_ignored() {
        let mut c = configurator();
        let selections: SelectionSet = [
            ("sauce", vec!["mayo", "sriracha"]),
            ("drink", vec!["cola"]),
        ]
        .into_iter()
        .collect();
        let configured = c.recompute(selections);

        assert_eq!(configured.unit_price, Money::new(20));
        assert!(configured.params.get("drink").is_none());
        assert!(!configured.params.contains("sauce", "sriracha"));
    }

    #[test]
    fn test_recompute_is_idempotent() {
        let mut c = configurator();
        let first = c.recompute(ketchup_only()).clone();
        let second = c.recompute(ketchup_only()).clone();
        assert_eq!(first, second);
    }

    #[test]
    fn test_selection_record_holds_only_selected_options() {
        let mut c = configurator();
        c.recompute(ketchup_only());

        let sauce = c.selection_record().get("sauce").unwrap();
        assert_eq!(sauce.label, "Sauce");
        assert_eq!(sauce.options.len(), 1);
        assert_eq!(sauce.options.get("ketchup").unwrap().price, Money::new(2));
    }

    #[test]
    fn test_quantity_change_recomputes_once() {
        let recorder = Arc::new(Recorder::default());
        let mut c = configurator();
        c.subscribe(recorder.clone());

        assert!(c.increment_quantity().is_some());
        assert_eq!(c.configured().line_total, Money::new(40));

        // Rejected input: no recompute, no event
        assert!(c.set_quantity("0").is_none());
        assert!(c.decrement_quantity().is_some());

        let events = recorder.events();
        assert_eq!(events.len(), 2);
        assert!(matches!(
            events[0],
            OrderEvent::ProductRecomputed { quantity: 2, .. }
        ));
    }

    #[test]
    fn test_select_deselect_toggle() {
        let mut c = configurator();
        assert_eq!(c.select("sauce", "ketchup").unit_price, Money::new(22));
        assert_eq!(c.deselect("sauce", "mayo").unit_price, Money::new(21));
        assert_eq!(c.toggle("sauce", "mayo").unit_price, Money::new(22));
        assert_eq!(c.toggle("sauce", "ketchup").unit_price, Money::new(20));
    }

    #[test]
    fn test_radio_select_replaces_previous_choice() {
        let mut def = (*burger()).clone();
        def.parameters[0].kind = ParamKind::Radios;
        let mut c = ProductConfigurator::new(Arc::new(def), QuantitySettings::default());

        let configured = c.select("sauce", "ketchup");
        assert!(!configured.selections.is_selected("sauce", "mayo"));
        assert_eq!(configured.unit_price, Money::new(23));
    }

    // -------------------------------------------------------------------------
    // Properties
    // -------------------------------------------------------------------------

    fn arb_definition() -> impl Strategy<Value = ProductDefinition> {
        let option = (0i64..50, any::<bool>());
        let param = proptest::collection::vec(option, 0..5);
        (0i64..100, proptest::collection::vec(param, 0..4)).prop_map(|(base, params)| {
            ProductDefinition {
                id: "p".into(),
                name: "P".into(),
                description: None,
                base_price: Money::new(base),
                parameters: params
                    .into_iter()
                    .enumerate()
                    .map(|(pi, options)| ProductParam {
                        id: format!("param{pi}"),
                        label: format!("Param {pi}"),
                        kind: ParamKind::Checkboxes,
                        options: options
                            .into_iter()
                            .enumerate()
                            .map(|(oi, (price, is_default))| ProductOption {
                                id: format!("opt{oi}"),
                                label: format!("Option {oi}"),
                                price: Money::new(price),
                                is_default,
                            })
                            .collect(),
                    })
                    .collect(),
            }
        })
    }

    proptest! {
        #[test]
        fn test_unit_price_is_base_plus_deltas(
            definition in arb_definition(),
            picks in proptest::collection::vec(any::<bool>(), 20),
            quantity in 1u32..=9,
        ) {
            let mut selections = SelectionSet::new();
            let mut expected = definition.base_price.amount();
            let mut pick = picks.iter().cycle();

            for param in &definition.parameters {
                for option in &param.options {
                    let selected = *pick.next().unwrap();
                    if selected {
                        selections.insert(&param.id, &option.id);
                    }
                    if selected && !option.is_default {
                        expected += option.price.amount();
                    } else if !selected && option.is_default {
                        expected -= option.price.amount();
                    }
                }
            }

            let mut c = ProductConfigurator::new(Arc::new(definition), QuantitySettings::default());
            c.set_quantity(&quantity.to_string());
            let configured = c.recompute(selections);

            prop_assert_eq!(configured.unit_price, Money::new(expected));
            prop_assert_eq!(configured.line_total, Money::new(expected * quantity as i64));
        }
    }
}
