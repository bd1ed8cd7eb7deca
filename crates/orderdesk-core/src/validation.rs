//! # Validation Module
//!
//! Input validation for catalog entries and order contact details.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Deserialization (serde)                                       │
//! │  ├── Required fields present                                            │
//! │  └── Prices are integers                                                │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE                                                   │
//! │  ├── Ids and names non-empty, bounded                                   │
//! │  ├── Prices non-negative                                                │
//! │  └── Phone / address usable before submission                           │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Order backend                                                 │
//! │  └── Whatever it enforces; failures come back as TransportError         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use orderdesk_core::validation::{validate_phone, validate_price};
//! use orderdesk_core::Money;
//!
//! assert!(validate_phone("+48 123-456-789").is_ok());
//! assert!(validate_price("price", Money::new(-1)).is_err());
//! ```

use crate::error::ValidationError;
use crate::money::Money;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

const MAX_ID_LEN: usize = 64;
const MAX_NAME_LEN: usize = 200;
const MAX_PHONE_LEN: usize = 30;
const MAX_ADDRESS_LEN: usize = 300;

/// Largest accepted catalog price, in the catalog's unit.
pub const MAX_PRICE: i64 = 1_000_000_000_000;

// =============================================================================
// Catalog Validators
// =============================================================================

/// Validates a catalog identifier (product, parameter or option id).
///
/// ## Rules
/// - Must not be empty or whitespace
/// - At most 64 characters
///
/// ```rust
/// use orderdesk_core::validation::validate_id;
///
/// assert!(validate_id("product id", "cake").is_ok());
/// assert!(validate_id("product id", " ").is_err());
/// ```
pub fn validate_id(field: &str, id: &str) -> ValidationResult<()> {
    if id.trim().is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    if id.len() > MAX_ID_LEN {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max: MAX_ID_LEN,
        });
    }

    Ok(())
}

/// Validates a display name or label.
///
/// ## Rules
/// - Must not be empty
/// - At most 200 characters
pub fn validate_name(field: &str, name: &str) -> ValidationResult<()> {
    let name = name.trim();

    if name.is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    if name.len() > MAX_NAME_LEN {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max: MAX_NAME_LEN,
        });
    }

    Ok(())
}

/// Validates a catalog price.
///
/// ## Rules
/// - Must be non-negative (>= 0)
/// - Zero is allowed (free extras)
/// - At most [`MAX_PRICE`]
pub fn validate_price(field: &str, price: Money) -> ValidationResult<()> {
    if price.is_negative() || price.amount() > MAX_PRICE {
        return Err(ValidationError::OutOfRange {
            field: field.to_string(),
            min: 0,
            max: MAX_PRICE,
        });
    }

    Ok(())
}

// =============================================================================
// Contact Validators
// =============================================================================

/// Validates the delivery phone number.
///
/// ## Rules
/// - Must not be empty
/// - At most 30 characters
/// - Digits, spaces, `+`, `-`, `(`, `)` only, with at least one digit
pub fn validate_phone(phone: &str) -> ValidationResult<()> {
    let phone = phone.trim();

    if phone.is_empty() {
        return Err(ValidationError::Required {
            field: "phone".to_string(),
        });
    }

    if phone.len() > MAX_PHONE_LEN {
        return Err(ValidationError::TooLong {
            field: "phone".to_string(),
            max: MAX_PHONE_LEN,
        });
    }

    let allowed = |c: char| c.is_ascii_digit() || matches!(c, ' ' | '+' | '-' | '(' | ')');
    if !phone.chars().all(allowed) || !phone.chars().any(|c| c.is_ascii_digit()) {
        return Err(ValidationError::InvalidFormat {
            field: "phone".to_string(),
            reason: "must contain digits and only + - ( ) or spaces".to_string(),
        });
    }

    Ok(())
}

/// Validates the delivery address.
pub fn validate_address(address: &str) -> ValidationResult<()> {
    let address = address.trim();

    if address.is_empty() {
        return Err(ValidationError::Required {
            field: "address".to_string(),
        });
    }

    if address.len() > MAX_ADDRESS_LEN {
        return Err(ValidationError::TooLong {
            field: "address".to_string(),
            max: MAX_ADDRESS_LEN,
        });
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
