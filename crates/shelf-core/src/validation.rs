//! # Validation Module
//!
//! Field validators and the pre-flight submission guard.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Input (inline)                                               │
//! │  ├── Field validators below (pickup dialog, rates, payments)           │
//! │  └── LineItem::exceeds_stock flags shown next to the row               │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: Submission guard (THIS MODULE: check_submission)             │
//! │  ├── Blocks the request and shows one message                          │
//! │  └── Leaves every entered field in place                               │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Order API                                                    │
//! │  └── Server-side field errors, surfaced verbatim                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use crate::error::ValidationError;
use crate::order::{Buyer, OrderDraft};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// String Validators
// =============================================================================

/// Validates a free-form product name (pickup items, new suppliers).
///
/// ## Rules
/// - Must not be empty after trimming
/// - At most 200 characters
///
/// ## Example
/// ```rust
/// use shelf_core::validation::validate_pickup_name;
///
/// assert!(validate_pickup_name("Fresh Hilsa").is_ok());
/// assert!(validate_pickup_name("  ").is_err());
/// ```
pub fn validate_pickup_name(name: &str) -> ValidationResult<()> {
    validate_text("product name", name, 200)
}

/// Validates a supplier name.
pub fn validate_supplier_name(name: &str) -> ValidationResult<()> {
    validate_text("supplier name", name, 120)
}

/// Validates a phone number for walk-in buyers.
///
/// ## Rules
/// - Must not be empty
/// - Digits with an optional leading `+`; spaces and dashes are ignored
/// - 6 to 15 digits
pub fn validate_phone(phone: &str) -> ValidationResult<()> {
    let phone = phone.trim();
    if phone.is_empty() {
        return Err(ValidationError::Required {
            field: "phone".to_string(),
        });
    }

    let body = phone.strip_prefix('+').unwrap_or(phone);
    let mut digits = 0;
    for c in body.chars() {
        match c {
            '0'..='9' => digits += 1,
            ' ' | '-' => {}
            _ => {
                return Err(ValidationError::InvalidFormat {
                    field: "phone".to_string(),
                    reason: "must contain only digits".to_string(),
                })
            }
        }
    }

    if !(6..=15).contains(&digits) {
        return Err(ValidationError::OutOfRange {
            field: "phone digits".to_string(),
            min: 6,
            max: 15,
        });
    }
    Ok(())
}

/// Validates a catalog search query; returns it trimmed.
pub fn validate_search_query(query: &str) -> ValidationResult<String> {
    let query = query.trim();
    if query.len() > 100 {
        return Err(ValidationError::TooLong {
            field: "query".to_string(),
            max: 100,
        });
    }
    Ok(query.to_string())
}

fn validate_text(field: &str, value: &str, max: usize) -> ValidationResult<()> {
    let value = value.trim();
    if value.is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }
    if value.chars().count() > max {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max,
        });
    }
    Ok(())
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a quantity value.
///
/// ## Rules
/// - Must be positive (> 0)
///
/// The upper bound of a stock line is the lot's recorded availability,
/// checked by [`check_submission`].
pub fn validate_quantity(qty: i64) -> ValidationResult<()> {
    if qty <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }
    Ok(())
}

/// Validates a payment amount in cents.
///
/// ## Rules
/// - Must be positive (> 0)
pub fn validate_payment_amount(cents: i64) -> ValidationResult<()> {
    if cents <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "payment amount".to_string(),
        });
    }
    Ok(())
}

/// Validates a VAT or discount rate in basis points.
///
/// ## Rules
/// - Must be between 0 and 10000 (0% to 100%)
///
/// ## Example
/// ```rust
/// use shelf_core::validation::validate_rate_bps;
///
/// assert!(validate_rate_bps(500).is_ok());
/// assert!(validate_rate_bps(10_001).is_err());
/// ```
pub fn validate_rate_bps(bps: u32) -> ValidationResult<()> {
    if bps > 10_000 {
        return Err(ValidationError::OutOfRange {
            field: "rate".to_string(),
            min: 0,
            max: 100,
        });
    }
    Ok(())
}

// =============================================================================
// Submission Guard
// =============================================================================

/// Pre-flight check before a draft is handed to the order API.
///
/// ## Checks (first failure wins)
/// ```text
/// 1. cart has at least one stock or pickup line      → EmptyCart
/// 2. every stock line: quantity > 0, unit price > 0  → InvalidLine
/// 3. every stock line: quantity <= lot availability  → InsufficientStock
/// 4. payment account selected                        → MissingAccount
/// 5. pickup lines present → supplier selected        → MissingSupplier
/// 6. buyer: catalog customer, or walk-in name+phone  → MissingCustomer /
///                                                       MissingWalkInIdentity
/// ```
///
/// Line numbers in messages are 1-based, as shown on screen.
pub fn check_submission(draft: &OrderDraft) -> ValidationResult<()> {
    let cart = &draft.cart;

    if cart.is_empty() {
        return Err(ValidationError::EmptyCart);
    }

    for (i, line) in cart.lines.iter().enumerate() {
        if line.quantity <= 0 || !line.unit_price.is_positive() {
            return Err(ValidationError::InvalidLine { line: i + 1 });
        }
    }

    for (i, line) in cart.lines.iter().enumerate() {
        if line.exceeds_stock() {
            return Err(ValidationError::InsufficientStock {
                line: i + 1,
                batch_no: line.batch_no.clone(),
                available: line.available_quantity,
                requested: line.quantity,
            });
        }
    }

    if draft.account_id.as_deref().map_or(true, |id| id.trim().is_empty()) {
        return Err(ValidationError::MissingAccount);
    }

    if cart.has_pickups() && draft.supplier_id.is_none() {
        return Err(ValidationError::MissingSupplier);
    }

    match &draft.buyer {
        Buyer::Customer { customer_id } if !customer_id.trim().is_empty() => Ok(()),
        Buyer::WalkIn { name, phone } if draft.mode.allows_walk_in() => {
            if name.trim().is_empty() || phone.trim().is_empty() {
                Err(ValidationError::MissingWalkInIdentity)
            } else {
                Ok(())
            }
        }
        _ => Err(ValidationError::MissingCustomer),
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
