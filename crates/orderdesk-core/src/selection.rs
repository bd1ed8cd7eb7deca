//! # Selections
//!
//! Two views of "what the user picked":
//!
//! - [`SelectionSet`]: raw input from the configuration surface,
//!   `paramId → {optionId}`. May name parameters or options the product does
//!   not have; those are ignored by pricing.
//! - [`SelectedParams`]: the selection record produced by a recompute. Only
//!   real, selected options, with their labels and prices. This is what the
//!   rendering layer toggles option imagery from, what a cart line item
//!   freezes, and what the order payload carries as `params`.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::marker::PhantomData;

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use ts_rs::TS;

use crate::catalog::ProductDefinition;
use crate::money::Money;

// =============================================================================
// Selection Set
// =============================================================================

/// Selected option ids per parameter id.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SelectionSet(BTreeMap<String, BTreeSet<String>>);

impl SelectionSet {
    /// An empty selection: every option unselected.
    pub fn new() -> Self {
        SelectionSet::default()
    }

    /// The selection a freshly rendered form starts with: every default
    /// option checked.
    pub fn defaults_of(definition: &ProductDefinition) -> Self {
        let mut set = SelectionSet::new();
        for param in &definition.parameters {
            for option_id in param.default_option_ids() {
                set.insert(&param.id, option_id);
            }
        }
        set
    }

    /// Marks an option as selected. Returns false if it already was.
    pub fn insert(&mut self, param_id: &str, option_id: &str) -> bool {
        self.0
            .entry(param_id.to_string())
            .or_default()
            .insert(option_id.to_string())
    }

    /// Unselects an option. Returns false if it was not selected.
    pub fn remove(&mut self, param_id: &str, option_id: &str) -> bool {
        let Some(options) = self.0.get_mut(param_id) else {
            return false;
        };
        let removed = options.remove(option_id);
        if options.is_empty() {
            self.0.remove(param_id);
        }
        removed
    }

    /// Replaces every selection of a parameter with a single option.
    pub fn replace(&mut self, param_id: &str, option_id: &str) {
        let options = self.0.entry(param_id.to_string()).or_default();
        options.clear();
        options.insert(option_id.to_string());
    }

    /// Whether `option_id` is selected under `param_id`.
    pub fn is_selected(&self, param_id: &str, option_id: &str) -> bool {
        self.0
            .get(param_id)
            .is_some_and(|options| options.contains(option_id))
    }

    /// Iterates `(paramId, selected optionIds)`.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &BTreeSet<String>)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn is_empty(&self) -> bool {
        self.0.values().all(BTreeSet::is_empty)
    }
}

impl<P, O, I> FromIterator<(P, I)> for SelectionSet
where
    P: Into<String>,
    O: Into<String>,
    I: IntoIterator<Item = O>,
{
    fn from_iter<T: IntoIterator<Item = (P, I)>>(iter: T) -> Self {
        let mut set = SelectionSet::new();
        for (param, options) in iter {
            let entry = set.0.entry(param.into()).or_default();
            entry.extend(options.into_iter().map(Into::into));
        }
        set
    }
}

// =============================================================================
// Catalog-Ordered Map
// =============================================================================

/// A string-keyed map that iterates and serializes in insertion order.
///
/// The selection record is filled while walking the catalog, so insertion
/// order is catalog order and the payload keeps the catalog's key order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogOrdered<V>(Vec<(String, V)>);

impl<V> CatalogOrdered<V> {
    pub fn new() -> Self {
        CatalogOrdered(Vec::new())
    }

    pub fn get(&self, key: &str) -> Option<&V> {
        self.0.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Inserts or replaces; a replaced key keeps its original position.
    pub fn insert(&mut self, key: String, value: V) {
        match self.0.iter_mut().find(|(k, _)| *k == key) {
            Some((_, slot)) => *slot = value,
            None => self.0.push((key, value)),
        }
    }

    fn get_or_insert_with(&mut self, key: &str, make: impl FnOnce() -> V) -> &mut V {
        let index = match self.0.iter().position(|(k, _)| k == key) {
            Some(index) => index,
            None => {
                self.0.push((key.to_string(), make()));
                self.0.len() - 1
            }
        };
        &mut self.0[index].1
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &V)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|(k, _)| k.as_str())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<V> Default for CatalogOrdered<V> {
    fn default() -> Self {
        CatalogOrdered::new()
    }
}

impl<V: Serialize> Serialize for CatalogOrdered<V> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (key, value) in &self.0 {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

impl<'de, V: Deserialize<'de>> Deserialize<'de> for CatalogOrdered<V> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct OrderedVisitor<V>(PhantomData<V>);

        impl<'de, V: Deserialize<'de>> Visitor<'de> for OrderedVisitor<V> {
            type Value = CatalogOrdered<V>;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map keyed by id")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut map = CatalogOrdered::new();
                while let Some((key, value)) = access.next_entry::<String, V>()? {
                    map.insert(key, value);
                }
                Ok(map)
            }
        }

        deserializer.deserialize_map(OrderedVisitor(PhantomData))
    }
}

// =============================================================================
// Selection Record
// =============================================================================

/// A selected option as carried in the order payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct SelectedOption {
    pub label: String,
    pub price: Money,
}

/// A parameter with at least one selected option.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct SelectedParam {
    pub label: String,
    /// Selected options keyed by option id, in catalog order.
    #[ts(type = "Record<string, SelectedOption>")]
    pub options: CatalogOrdered<SelectedOption>,
}

/// The selection record: selected options only, keyed by parameter id in
/// catalog order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(transparent)]
pub struct SelectedParams(
    #[ts(type = "Record<string, SelectedParam>")] CatalogOrdered<SelectedParam>,
);

impl SelectedParams {
    pub fn new() -> Self {
        SelectedParams::default()
    }

    /// Records `option_id` as selected under a parameter.
    pub(crate) fn record(
        &mut self,
        param_id: &str,
        param_label: &str,
        option_id: &str,
        option: SelectedOption,
    ) {
        self.0
            .get_or_insert_with(param_id, || SelectedParam {
                label: param_label.to_string(),
                options: CatalogOrdered::new(),
            })
            .options
            .insert(option_id.to_string(), option);
    }

    pub fn get(&self, param_id: &str) -> Option<&SelectedParam> {
        self.0.get(param_id)
    }

    /// Whether an option is in the record (drives per-option imagery).
    pub fn contains(&self, param_id: &str, option_id: &str) -> bool {
        self.0
            .get(param_id)
            .is_some_and(|p| p.options.contains_key(option_id))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &SelectedParam)> {
        self.0.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
