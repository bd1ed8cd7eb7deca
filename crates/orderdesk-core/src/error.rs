//! # Error Types
//!
//! Domain-specific error types for orderdesk-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  orderdesk-core errors (this file)                                      │
//! │  ├── CoreError        - General domain errors                           │
//! │  ├── ValidationError  - Input validation failures                       │
//! │  └── TransportError   - What the submission/catalog seams report        │
//! │                                                                         │
//! │  orderdesk-client errors (separate crate)                               │
//! │  └── ClientError      - Config, HTTP, bootstrap failures                │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → ClientError → place-order exit     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## What Is NOT an Error
//! Invalid quantity input and removal of a stale line item are recovered
//! locally (see [`crate::quantity`] and [`crate::cart`]). They never reach
//! this module.

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Core ordering errors.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A catalog entry could not be turned into a product definition.
    ///
    /// ## When This Occurs
    /// - A required field (id, name, price, label) is missing
    /// - A price is not an integer in `0..=MAX_PRICE`
    /// - A product id is already on the menu
    ///
    /// Only the offending entry is rejected; the rest of the menu loads.
    #[error("Malformed catalog entry {id}: {reason}")]
    MalformedCatalogEntry { id: String, reason: String },

    /// Product id is not on the menu.
    #[error("Product not found: {0}")]
    ProductNotFound(String),

    /// An order was submitted with no line items.
    #[error("Cannot submit an order with an empty cart")]
    EmptyCart,

    /// Settings are inconsistent (e.g. min quantity above max).
    #[error("Invalid settings: {0}")]
    InvalidSettings(String),

    /// Catalog fetch or order submission failed in transport.
    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Invalid format (e.g., letters in a phone number).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// Duplicate value (e.g., duplicate option id).
    #[error("{field} '{value}' already exists")]
    Duplicate { field: String, value: String },
}

// =============================================================================
// Transport Error
// =============================================================================

/// Failures reported by a [`crate::catalog::CatalogSource`] or
/// [`crate::submission::OrderSubmitter`] implementation.
///
/// The core never retries; the cart is left untouched so the user can
/// submit again.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TransportError {
    /// The backend could not be reached.
    #[error("backend unreachable: {0}")]
    Unreachable(String),

    /// The backend answered with a non-success status.
    #[error("backend rejected request with status {status}: {body}")]
    Rejected { status: u16, body: String },

    /// The backend answered but the body could not be decoded.
    #[error("invalid response: {0}")]
    InvalidResponse(String),
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = CoreError::MalformedCatalogEntry {
            id: "cake".to_string(),
            reason: "missing field `price`".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Malformed catalog entry cake: missing field `price`"
        );
    }

    #[test]
    fn test_validation_error_messages() {
        let err = ValidationError::Required {
            field: "phone".to_string(),
        };
        assert_eq!(err.to_string(), "phone is required");
    }

    #[test]
    fn test_conversions_into_core_error() {
        let core_err: CoreError = ValidationError::Required {
            field: "address".to_string(),
        }
        .into();
        assert!(matches!(core_err, CoreError::Validation(_)));

        let core_err: CoreError = TransportError::Rejected {
            status: 500,
            body: "boom".to_string(),
        }
        .into();
        assert!(matches!(core_err, CoreError::Transport(_)));
        assert_eq!(
            core_err.to_string(),
            "Transport error: backend rejected request with status 500: boom"
        );
    }
}
