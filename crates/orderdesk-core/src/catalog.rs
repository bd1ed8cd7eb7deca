//! # Catalog
//!
//! Product definitions as loaded from the catalog, and the seam the core uses
//! to fetch them.
//!
//! ## Wire Shape
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  {                                                                      │
//! │    "id": "pizza", "name": "Nonna Alba's Pizza", "price": 20,            │
//! │    "params": {                                                          │
//! │      "sauce": {                                                         │
//! │        "label": "Sauce", "type": "radios",                              │
//! │        "options": {                                                     │
//! │          "tomato": { "label": "Tomato", "price": 0, "default": true },  │
//! │          "cream":  { "label": "Sour cream", "price": 2 }                │
//! │        }                                                                │
//! │      }                                                                  │
//! │    }                                                                    │
//! │  }                                                                      │
//! │                                                                         │
//! │  params / options are JSON objects; their key order is the display      │
//! │  order and is preserved into ProductDefinition.                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Each entry is decoded on its own so one malformed product never takes the
//! rest of the menu down with it.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use ts_rs::TS;

use crate::error::{CoreError, CoreResult, TransportError, ValidationError};
use crate::money::Money;
use crate::validation::{validate_id, validate_name, validate_price};

// =============================================================================
// Parameter Kind
// =============================================================================

/// How the rendering layer presents a parameter. Pricing ignores it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum ParamKind {
    /// Any number of options.
    #[default]
    Checkboxes,
    /// Exactly one option, shown as radio buttons.
    Radios,
    /// Exactly one option, shown as a drop-down.
    Select,
}

// =============================================================================
// Definitions
// =============================================================================

/// One selectable option of a parameter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ProductOption {
    pub id: String,
    pub label: String,
    /// Surcharge when selected, or discount when a default option is dropped.
    pub price: Money,
    /// Whether the option is part of the base price.
    pub is_default: bool,
}

/// A configurable parameter of a product (e.g. "sauce", "toppings").
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ProductParam {
    pub id: String,
    pub label: String,
    pub kind: ParamKind,
    /// Options in catalog order; ids are unique within the parameter.
    pub options: Vec<ProductOption>,
}

impl ProductParam {
    /// Looks up an option by id.
    pub fn option(&self, option_id: &str) -> Option<&ProductOption> {
        self.options.iter().find(|o| o.id == option_id)
    }

    /// Ids of the options marked as default.
    pub fn default_option_ids(&self) -> impl Iterator<Item = &str> {
        self.options
            .iter()
            .filter(|o| o.is_default)
            .map(|o| o.id.as_str())
    }
}

/// An immutable product definition from the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ProductDefinition {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    /// Price with every default option included.
    pub base_price: Money,
    /// Parameters in catalog order.
    pub parameters: Vec<ProductParam>,
}

impl ProductDefinition {
    /// Looks up a parameter by id.
    pub fn parameter(&self, param_id: &str) -> Option<&ProductParam> {
        self.parameters.iter().find(|p| p.id == param_id)
    }

    /// Decodes and validates one raw catalog entry.
    ///
    /// ## Errors
    /// [`CoreError::MalformedCatalogEntry`] when a required field is missing,
    /// a price is fractional, negative or above
    /// [`MAX_PRICE`](crate::validation::MAX_PRICE), or an id or label is empty.
    ///
    /// ## Example
    /// ```rust
    /// use orderdesk_core::catalog::ProductDefinition;
    /// use serde_json::json;
    ///
    /// let ok = ProductDefinition::from_json(&json!({
    ///     "id": "cake", "name": "Cake", "price": 9
    /// }));
    /// assert!(ok.is_ok());
    ///
    /// let missing_price = ProductDefinition::from_json(&json!({
    ///     "id": "cake", "name": "Cake"
    /// }));
    /// assert!(missing_price.is_err());
    /// ```
    pub fn from_json(entry: &Value) -> CoreResult<Self> {
        let entry_id = entry
            .get("id")
            .and_then(Value::as_str)
            .unwrap_or("<unknown>")
            .to_string();

        let malformed = |reason: String| CoreError::MalformedCatalogEntry {
            id: entry_id.clone(),
            reason,
        };

        let record: ProductRecord =
            ProductRecord::deserialize(entry).map_err(|e| malformed(e.to_string()))?;

        let definition = record
            .into_definition()
            .map_err(|e| malformed(e.to_string()))?;

        Ok(definition)
    }
}

// =============================================================================
// Wire Records
// =============================================================================

#[derive(Debug, Deserialize)]
struct ProductRecord {
    id: String,
    name: String,
    price: Money,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    params: Map<String, Value>,
}

#[derive(Debug, Deserialize)]
struct ParamRecord {
    label: String,
    #[serde(rename = "type", default)]
    kind: ParamKind,
    #[serde(default)]
    options: Map<String, Value>,
}

#[derive(Debug, Deserialize)]
struct OptionRecord {
    label: String,
    price: Money,
    #[serde(default)]
    default: bool,
}

impl ProductRecord {
    fn into_definition(self) -> Result<ProductDefinition, ValidationError> {
        validate_id("product id", &self.id)?;
        validate_name("name", &self.name)?;
        validate_price("price", self.price)?;

        let mut parameters = Vec::with_capacity(self.params.len());
        for (param_id, raw_param) in self.params {
            parameters.push(decode_param(param_id, raw_param)?);
        }

        Ok(ProductDefinition {
            id: self.id,
            name: self.name,
            description: self.description,
            base_price: self.price,
            parameters,
        })
    }
}

fn decode_param(param_id: String, raw: Value) -> Result<ProductParam, ValidationError> {
    validate_id("parameter id", &param_id)?;

    let record = ParamRecord::deserialize(raw).map_err(|e| ValidationError::InvalidFormat {
        field: format!("params.{param_id}"),
        reason: e.to_string(),
    })?;
    validate_name(&format!("params.{param_id}.label"), &record.label)?;

    let mut options = Vec::with_capacity(record.options.len());
    for (option_id, raw_option) in record.options {
        validate_id("option id", &option_id)?;

        let field = format!("params.{param_id}.options.{option_id}");
        let option =
            OptionRecord::deserialize(raw_option).map_err(|e| ValidationError::InvalidFormat {
                field: field.clone(),
                reason: e.to_string(),
            })?;
        validate_name(&format!("{field}.label"), &option.label)?;
        validate_price(&format!("{field}.price"), option.price)?;

        options.push(ProductOption {
            id: option_id,
            label: option.label,
            price: option.price,
            is_default: option.default,
        });
    }

    Ok(ProductParam {
        id: param_id,
        label: record.label,
        kind: record.kind,
        options,
    })
}

// =============================================================================
// Catalog Source
// =============================================================================

/// Where the menu gets its raw catalog entries from.
///
/// Implemented over HTTP in `orderdesk-client`; tests use in-memory sources.
#[async_trait]
pub trait CatalogSource: Send + Sync {
    /// Fetches every raw product entry.
    async fn fetch_catalog(&self) -> Result<Vec<Value>, TransportError>;
}

/// A fixed, in-memory catalog.
#[derive(Debug, Clone, Default)]
pub struct StaticCatalog {
    entries: Vec<Value>,
}

impl StaticCatalog {
    pub fn new(entries: Vec<Value>) -> Self {
        StaticCatalog { entries }
    }
}

#[async_trait]
impl CatalogSource for StaticCatalog {
    async fn fetch_catalog(&self) -> Result<Vec<Value>, TransportError> {
        Ok(self.entries.clone())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn pizza() -> Value {
        json!({
            "id": "pizza",
            "name": "Nonna Alba's Pizza",
            "price": 20,
            "description": "Thin crust",
            "params": {
                "sauce": {
                    "label": "Sauce",
                    "type": "radios",
                    "options": {
                        "tomato": { "label": "Tomato", "price": 0, "default": true },
                        "cream": { "label": "Sour cream", "price": 2 }
                    }
                },
                "toppings": {
                    "label": "Toppings",
                    "type": "checkboxes",
                    "options": {
                        "olives": { "label": "Olives", "price": 2, "default": true },
                        "salami": { "label": "Salami", "price": 3 },
                        "basil": { "label": "Basil", "price": 1 }
                    }
                }
            }
        })
    }

    #[test]
    fn test_decodes_full_entry() {
        let def = ProductDefinition::from_json(&pizza()).unwrap();
        assert_eq!(def.id, "pizza");
        assert_eq!(def.base_price, Money::new(20));
        assert_eq!(def.description.as_deref(), Some("Thin crust"));

        let sauce = def.parameter("sauce").unwrap();
        assert_eq!(sauce.kind, ParamKind::Radios);
        assert!(sauce.option("tomato").unwrap().is_default);
        assert!(!sauce.option("cream").unwrap().is_default);
    }

    #[test]
    fn test_preserves_catalog_order() {
        let def = ProductDefinition::from_json(&pizza()).unwrap();
        let params: Vec<_> = def.parameters.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(params, ["sauce", "toppings"]);

        let toppings: Vec<_> = def.parameters[1]
            .options
            .iter()
            .map(|o| o.id.as_str())
            .collect();
        assert_eq!(toppings, ["olives", "salami", "basil"]);
    }

    #[test]
    fn test_entry_without_params() {
        let def =
            ProductDefinition::from_json(&json!({"id": "cake", "name": "Cake", "price": 9}))
                .unwrap();
        assert!(def.parameters.is_empty());
        assert_eq!(def.description, None);
    }

    #[test]
    fn test_rejects_missing_price() {
        let err = ProductDefinition::from_json(&json!({"id": "cake", "name": "Cake"}))
            .unwrap_err();
        match err {
            CoreError::MalformedCatalogEntry { id, reason } => {
                assert_eq!(id, "cake");
                assert!(reason.contains("price"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_rejects_fractional_and_negative_prices() {
        assert!(
            ProductDefinition::from_json(&json!({"id": "a", "name": "A", "price": 2.5})).is_err()
        );
        assert!(
            ProductDefinition::from_json(&json!({"id": "a", "name": "A", "price": -1})).is_err()
        );

        let mut bad_option = pizza();
        bad_option["params"]["sauce"]["options"]["cream"]["price"] = json!(-2);
        assert!(ProductDefinition::from_json(&bad_option).is_err());
    }

    #[test]
    fn test_rejects_prices_above_the_limit() {
        let huge = ProductDefinition::from_json(&json!({
            "id": "gold", "name": "Gold leaf cake", "price": i64::MAX
        }))
        .unwrap_err();
        assert!(matches!(
            huge,
            CoreError::MalformedCatalogEntry { ref id, .. } if id == "gold"
        ));

        let mut pricey_option = pizza();
        pricey_option["params"]["toppings"]["options"]["salami"]["price"] = json!(i64::MAX);
        assert!(matches!(
            ProductDefinition::from_json(&pricey_option),
            Err(CoreError::MalformedCatalogEntry { .. })
        ));
    }

    #[test]
    fn test_duplicate_option_keys_collapse_to_last() {
        let raw = r#"{
            "id": "pizza", "name": "Pizza", "price": 20,
            "params": { "toppings": { "label": "Toppings", "options": {
                "salami": { "label": "Salami", "price": 3 },
                "salami": { "label": "Spicy salami", "price": 4 }
            }}}
        }"#;
        let entry: Value = serde_json::from_str(raw).unwrap();
        let def = ProductDefinition::from_json(&entry).unwrap();

        let toppings = def.parameter("toppings").unwrap();
        assert_eq!(toppings.options.len(), 1);
        let salami = toppings.option("salami").unwrap();
        assert_eq!(salami.label, "Spicy salami");
        assert_eq!(salami.price, Money::new(4));
    }

    #[test]
    fn test_rejects_option_without_label() {
        let mut entry = pizza();
        entry["params"]["toppings"]["options"]["basil"] = json!({ "price": 1 });
        assert!(ProductDefinition::from_json(&entry).is_err());
    }

    #[test]
    fn test_rejects_unknown_param_kind() {
        let mut entry = pizza();
        entry["params"]["sauce"]["type"] = json!("slider");
        assert!(ProductDefinition::from_json(&entry).is_err());
    }

    #[test]
    fn test_rejects_entry_without_id() {
        let err = ProductDefinition::from_json(&json!({"name": "Ghost", "price": 1})).unwrap_err();
        assert!(matches!(
            err,
            CoreError::MalformedCatalogEntry { ref id, .. } if id == "<unknown>"
        ));
    }

    #[tokio::test]
    async fn test_static_catalog() {
        let source = StaticCatalog::new(vec![pizza()]);
        let entries = source.fetch_catalog().await.unwrap();
        assert_eq!(entries.len(), 1);
    }
}
