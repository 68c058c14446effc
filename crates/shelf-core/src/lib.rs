//! # shelf-core: Order Pricing & Payment Allocation
//!
//! Everything an order-entry screen computes, as pure functions with zero
//! I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Shelf Architecture                               │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │              shelf-desk (OrderSession, receipts, CLI)           │   │
//! │  │   Inventory entry ──┐                  ┌── POS entry            │   │
//! │  └─────────────────────┼──────────────────┼────────────────────────┘   │
//! │                        ▼                  ▼                             │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │               ★ shelf-core (THIS CRATE) ★                       │   │
//! │  │                                                                 │   │
//! │  │   ┌──────────┐  ┌──────────┐  ┌──────────┐  ┌──────────────┐  │   │
//! │  │   │   cart   │  │  totals  │  │ payment  │  │  validation  │  │   │
//! │  │   │ LineItem │─►│  derive  │◄─│  Policy  │  │    guard     │  │   │
//! │  │   │  Pickup  │  │  Totals  │  │reconcile │  │              │  │   │
//! │  │   └──────────┘  └──────────┘  └──────────┘  └──────────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO NETWORK • NO LOGGING • PURE FUNCTIONS            │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ OrderPayload / PaymentRecord           │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                 shelf-api (order API client)                    │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`money`] - Money type with integer arithmetic
//! - [`types`] - Rates, entry modes, catalog records, payment enums
//! - [`cart`] - Stock and pickup lines with their mutation rules
//! - [`totals`] - Subtotal, tax, discount, grand, paid and due
//! - [`payment`] - Payment policy state transitions
//! - [`validation`] - Field validators and the submission guard
//! - [`order`] - Draft forms and outbound payloads
//! - [`report`] - Payments listing table and delimited text
//! - [`error`] - Domain error types
//!
//! ## Example Usage
//!
//! ```rust
//! use shelf_core::cart::Cart;
//! use shelf_core::payment::PricingPolicy;
//! use shelf_core::totals::derive_totals;
//! use shelf_core::{EntryMode, Money, Rate};
//!
//! let mut cart = Cart::new();
//! cart.add_pickup_line(shelf_core::cart::PickupDraft {
//!     product_name: "Hilsa".to_string(),
//!     quantity: 3,
//!     unit_price: Money::from_major(80),
//!     sale_price: Money::from_major(100),
//!     ..Default::default()
//! })
//! .unwrap();
//!
//! let policy = PricingPolicy::for_mode(EntryMode::Inventory, Rate::from_percent(5), Rate::from_percent(10));
//! let totals = derive_totals(&cart, &policy);
//! assert_eq!(totals.grand_total, Money::from_major(285));
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod cart;
pub mod error;
pub mod money;
pub mod order;
pub mod payment;
pub mod report;
pub mod totals;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use cart::{AddOutcome, Cart, LineField, LineItem, PickupDraft, PickupItem};
pub use error::{CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use order::{Buyer, NewSupplier, OrderDraft, OrderPayload, PaymentDraft, PaymentRecord};
pub use payment::PricingPolicy;
pub use totals::{derive_totals, Totals};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Maximum distinct stock lines in one order.
///
/// Merging into an existing line is still allowed at the limit.
pub const MAX_CART_LINES: usize = 100;
