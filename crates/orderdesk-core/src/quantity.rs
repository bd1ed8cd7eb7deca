//! # Quantity Control
//!
//! A bounded integer quantity for one configurable item: the menu
//! configurator owns one, and every cart line item owns its own.
//!
//! ## Input Normalization
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  raw input ──► leading integer ──► in [min, max]? ──► differs? ──► emit │
//! │                     │                    │               │              │
//! │                  no digits            no │            no │              │
//! │                     ▼                    ▼               ▼              │
//! │               ignore silently     keep last valid value, no event       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The control never holds an out-of-range value, so [`QuantityControl::value`]
//! is always what the input surface should display after an edit.

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::settings::QuantitySettings;

/// Notification emitted when a quantity actually changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuantityChanged {
    /// The new quantity.
    pub value: u32,
}

/// Bounded quantity holder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuantityControl {
    settings: QuantitySettings,
    value: u32,
}

impl QuantityControl {
    /// Creates a control starting at the configured default.
    pub fn new(settings: QuantitySettings) -> Self {
        let value = settings.clamp(settings.default);
        QuantityControl { settings, value }
    }

    /// Creates a control starting at `initial`, clamped into range.
    pub fn with_value(settings: QuantitySettings, initial: u32) -> Self {
        QuantityControl {
            settings,
            value: settings.clamp(initial),
        }
    }

    /// Current (always valid) quantity.
    #[inline]
    pub fn value(&self) -> u32 {
        self.value
    }

    /// Bounds this control enforces.
    #[inline]
    pub fn settings(&self) -> &QuantitySettings {
        &self.settings
    }

    /// Applies raw text from the input surface.
    ///
    /// ## Example
    /// ```rust
    /// use orderdesk_core::quantity::QuantityControl;
    /// use orderdesk_core::settings::QuantitySettings;
    ///
    /// let mut qty = QuantityControl::new(QuantitySettings::default());
    /// assert!(qty.set_value("3 pizzas").is_some());
    /// assert_eq!(qty.value(), 3);
    ///
    /// assert!(qty.set_value("lots").is_none());
    /// assert!(qty.set_value("42").is_none());
    /// assert_eq!(qty.value(), 3);
    /// ```
    pub fn set_value(&mut self, raw: &str) -> Option<QuantityChanged> {
        match parse_leading_int(raw) {
            Some(parsed) => self.apply(parsed),
            None => {
                trace!(raw, "Ignoring non-numeric quantity input");
                None
            }
        }
    }

    /// Applies an already-numeric value with the same rules as [`set_value`].
    ///
    /// [`set_value`]: QuantityControl::set_value
    pub fn set_number(&mut self, value: i64) -> Option<QuantityChanged> {
        self.apply(value)
    }

    /// One step up.
    pub fn increment(&mut self) -> Option<QuantityChanged> {
        self.apply(i64::from(self.value) + 1)
    }

    /// One step down.
    pub fn decrement(&mut self) -> Option<QuantityChanged> {
        self.apply(i64::from(self.value) - 1)
    }

    fn apply(&mut self, candidate: i64) -> Option<QuantityChanged> {
        if !self.settings.contains(candidate) || candidate == i64::from(self.value) {
            trace!(candidate, current = self.value, "Quantity left unchanged");
            return None;
        }

        // contains() guarantees the candidate fits in u32
        self.value = candidate as u32;
        Some(QuantityChanged { value: self.value })
    }
}

/// Reads the leading integer of `raw`: optional whitespace, optional sign,
/// then digits. Anything after the digits is ignored.
fn parse_leading_int(raw: &str) -> Option<i64> {
    let trimmed = raw.trim_start();
    let (negative, rest) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };

    let digits_len = rest.bytes().take_while(u8::is_ascii_digit).count();
    if digits_len == 0 {
        return None;
    }

    // Overlong input saturates; it is out of range either way.
    let magnitude = rest[..digits_len].parse::<i64>().unwrap_or(i64::MAX);
    Some(if negative { -magnitude } else { magnitude })
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn control() -> QuantityControl {
        QuantityControl::new(QuantitySettings::default())
    }

    #[test]
    fn test_starts_at_default() {
        assert_eq!(control().value(), 1);

        let settings = QuantitySettings {
            min: 2,
            max: 5,
            default: 3,
        };
        assert_eq!(QuantityControl::new(settings).value(), 3);
    }

    #[test]
    fn test_set_value_zero_is_ignored() {
        let mut qty = control();
        assert_eq!(qty.set_value("0"), None);
        assert_eq!(qty.value(), 1);
    }

    #[test]
    fn test_set_value_emits_on_change() {
        let mut qty = control();
        assert_eq!(qty.set_value("4"), Some(QuantityChanged { value: 4 }));
        assert_eq!(qty.value(), 4);

        // Same value again: no notification
        assert_eq!(qty.set_value("4"), None);
    }

    #[test]
    fn test_set_value_parses_leading_integer() {
        let mut qty = control();
        assert_eq!(qty.set_value("  7abc").map(|c| c.value), Some(7));
        assert_eq!(qty.set_value("2.9").map(|c| c.value), Some(2));
        assert_eq!(qty.set_value("+5").map(|c| c.value), Some(5));
    }

    #[test]
    fn test_set_value_rejects_garbage_and_out_of_range() {
        let mut qty = control();
        qty.set_value("3");

        assert_eq!(qty.set_value(""), None);
        assert_eq!(qty.set_value("abc"), None);
        assert_eq!(qty.set_value("-"), None);
        assert_eq!(qty.set_value("-2"), None);
        assert_eq!(qty.set_value("10"), None);
        assert_eq!(qty.set_value("99999999999999999999999"), None);
        assert_eq!(qty.value(), 3);
    }

    #[test]
    fn test_increment_and_decrement_stop_at_bounds() {
        let mut qty = control();
        assert_eq!(qty.decrement(), None);
        assert_eq!(qty.value(), 1);

        for _ in 0..20 {
            qty.increment();
        }
        assert_eq!(qty.value(), 9);
        assert_eq!(qty.increment(), None);

        assert_eq!(qty.decrement(), Some(QuantityChanged { value: 8 }));
    }

    #[test]
    fn test_with_value_clamps() {
        let settings = QuantitySettings::default();
        assert_eq!(QuantityControl::with_value(settings, 0).value(), 1);
        assert_eq!(QuantityControl::with_value(settings, 50).value(), 9);
        assert_eq!(QuantityControl::with_value(settings, 6).value(), 6);
    }

    proptest! {
        #[test]
        fn test_value_never_leaves_bounds(inputs in proptest::collection::vec(-20i64..30, 0..40)) {
            let mut qty = control();
            for input in inputs {
                let before = qty.value();
                let changed = qty.set_number(input);
                prop_assert!((1..=9).contains(&qty.value()));
                match changed {
                    Some(c) => {
                        prop_assert_eq!(c.value, qty.value());
                        prop_assert_ne!(before, qty.value());
                    }
                    None => prop_assert_eq!(before, qty.value()),
                }
            }
        }

        #[test]
        fn test_arbitrary_text_never_breaks_bounds(raw in ".*") {
            let mut qty = control();
            qty.set_value(&raw);
            prop_assert!((1..=9).contains(&qty.value()));
        }
    }
}
