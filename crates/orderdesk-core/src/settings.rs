//! # Order Settings
//!
//! Tunable constants of the ordering engine. The core never reads files or
//! environment variables; `orderdesk-client` loads these from TOML and env and
//! hands them in.
//!
//! ```toml
//! [quantity]
//! min = 1
//! max = 9
//! default = 1
//!
//! [cart]
//! delivery_fee = 20
//! ```

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::validation::MAX_PRICE;

/// Largest value `quantity.max` may be set to.
pub const MAX_QUANTITY: u32 = 1000;

// =============================================================================
// Quantity Settings
// =============================================================================

/// Bounds and starting value for every quantity control.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuantitySettings {
    /// Smallest accepted quantity.
    #[serde(default = "default_min")]
    pub min: u32,

    /// Largest accepted quantity.
    #[serde(default = "default_max")]
    pub max: u32,

    /// Value a fresh control starts with.
    #[serde(default = "default_value")]
    pub default: u32,
}

fn default_min() -> u32 {
    1
}

fn default_max() -> u32 {
    9
}

fn default_value() -> u32 {
    1
}

impl Default for QuantitySettings {
    fn default() -> Self {
        QuantitySettings {
            min: default_min(),
            max: default_max(),
            default: default_value(),
        }
    }
}

impl QuantitySettings {
    /// Returns true if `value` lies within `[min, max]`.
    #[inline]
    pub fn contains(&self, value: i64) -> bool {
        i64::from(self.min) <= value && value <= i64::from(self.max)
    }

    /// Clamps `value` into `[min, max]`.
    pub fn clamp(&self, value: u32) -> u32 {
        value.clamp(self.min, self.max)
    }
}

// =============================================================================
// Cart Settings
// =============================================================================

/// Cart-level pricing settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartSettings {
    /// Flat fee added on top of the subtotal.
    #[serde(default = "default_delivery_fee")]
    pub delivery_fee: Money,
}

fn default_delivery_fee() -> Money {
    Money::new(20)
}

impl Default for CartSettings {
    fn default() -> Self {
        CartSettings {
            delivery_fee: default_delivery_fee(),
        }
    }
}

// =============================================================================
// Combined Settings
// =============================================================================

/// All engine settings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderSettings {
    #[serde(default)]
    pub quantity: QuantitySettings,

    #[serde(default)]
    pub cart: CartSettings,
}

impl OrderSettings {
    /// Validates the settings.
    ///
    /// ## Rules
    /// - `min <= default <= max <= MAX_QUANTITY`
    /// - `0 <= delivery fee <= MAX_PRICE`
    pub fn validate(&self) -> CoreResult<()> {
        let q = &self.quantity;

        if q.min > q.max {
            return Err(CoreError::InvalidSettings(format!(
                "quantity.min ({}) is greater than quantity.max ({})",
                q.min, q.max
            )));
        }

        if q.max > MAX_QUANTITY {
            return Err(CoreError::InvalidSettings(format!(
                "quantity.max ({}) must not exceed {MAX_QUANTITY}",
                q.max
            )));
        }

        if q.default < q.min || q.default > q.max {
            return Err(CoreError::InvalidSettings(format!(
                "quantity.default ({}) must be between {} and {}",
                q.default, q.min, q.max
            )));
        }

        let fee = self.cart.delivery_fee;
        if fee.is_negative() || fee.amount() > MAX_PRICE {
            return Err(CoreError::InvalidSettings(format!(
                "cart.delivery_fee ({fee}) must be between 0 and {MAX_PRICE}"
            )));
        }

        Ok(())
    }
}
