//! # Error Types
//!
//! Domain-specific error types for shelf-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  shelf-core errors (this file)                                         │
//! │  ├── CoreError        - Cart / payment rule violations                 │
//! │  └── ValidationError  - Input and pre-flight submission failures       │
//! │                                                                         │
//! │  shelf-api errors (separate crate)                                     │
//! │  └── ClientError      - Order API failures (field error map, network)  │
//! │                                                                         │
//! │  desk errors (in app)                                                  │
//! │  └── ApiError         - What the operator sees (serialized)            │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → ApiError → Operator               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Include context in error messages (index, field, amounts)
//! 3. Every validation failure is non-fatal: the form state is kept

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Cart and payment-policy rule violations.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A row index does not exist in the cart.
    #[error("No {kind} line at position {index}")]
    LineNotFound { kind: LineKind, index: usize },

    /// Unit price edits are not allowed in inventory entry.
    ///
    /// ## When This Occurs
    /// Inventory sales take the price of the stock lot; only POS entry
    /// lets the cashier override it.
    #[error("Unit price is read-only in inventory entry")]
    PriceLocked,

    /// Manual paid-amount input while the override is off.
    #[error("Paid amount can only be edited for partial payments")]
    ManualPaymentDisabled,

    /// Cart has exceeded maximum allowed rows.
    #[error("Cart cannot have more than {max} lines")]
    CartTooLarge { max: usize },

    /// Referenced catalog entry is not in the page snapshot.
    #[error("{kind} not found: {id}")]
    NotInCatalog { kind: &'static str, id: String },

    /// Validation error (wraps ValidationError).
    #[error(transparent)]
    Validation(#[from] ValidationError),
}

/// Which of the two cart sequences an index refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    Stock,
    Pickup,
}

impl std::fmt::Display for LineKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LineKind::Stock => write!(f, "stock"),
            LineKind::Pickup => write!(f, "pickup"),
        }
    }
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// Field-level variants come from form input checks; the submission
/// variants are raised by [`crate::validation::check_submission`] and carry
/// the message shown next to the submit button.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
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

    /// Computed amount does not fit the money range.
    #[error("{field} is too large")]
    TooLarge { field: String },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Invalid format (e.g. unparsable amount).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    // -------------------------------------------------------------------------
    // Submission guard
    // -------------------------------------------------------------------------
    /// Nothing to sell.
    #[error("Add at least one product before submitting")]
    EmptyCart,

    /// A stock line has a zero/negative quantity or price.
    #[error("Line {line}: quantity and unit price must be greater than zero")]
    InvalidLine { line: usize },

    /// A stock line asks for more than the lot held when it was picked.
    #[error("Line {line} ({batch_no}): only {available} in stock, requested {requested}")]
    InsufficientStock {
        line: usize,
        batch_no: String,
        available: i64,
        requested: i64,
    },

    /// No financial account picked for the payment.
    #[error("Select a payment account")]
    MissingAccount,

    /// Pickup items need a supplier.
    #[error("Select a supplier for pickup items")]
    MissingSupplier,

    /// Customer flows need a catalog customer.
    #[error("Select a customer")]
    MissingCustomer,

    /// Walk-in flows need a name and a phone.
    #[error("Walk-in customer name and phone are required")]
    MissingWalkInIdentity,

    /// Follow-up payment larger than the outstanding balance.
    #[error("Payment of {amount} exceeds the due amount of {due}")]
    ExceedsDue { amount: String, due: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================
