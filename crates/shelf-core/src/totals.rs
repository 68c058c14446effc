//! # Totals
//!
//! The pure derivation pipeline from cart + policy to displayed amounts.
//!
//! ```text
//!  Σ line totals ──► stock_subtotal ─┐
//!                                     ├─► subtotal ─┬─► tax      (× vat %)
//!  Σ pickup totals ─► pickup_subtotal┘              ├─► discount (× discount %)
//!                                                   ▼
//!                           grand = subtotal + tax − discount
//!                           due   = max(0, grand − paid)
//! ```
//!
//! Rates apply to the combined subtotal, never per line. Calling
//! [`derive_totals`] twice on unchanged input gives identical results.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::cart::Cart;
use crate::money::Money;
use crate::payment::PricingPolicy;

/// Every amount the order form shows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Totals {
    pub stock_subtotal: Money,
    pub pickup_subtotal: Money,
    pub subtotal: Money,
    pub tax_amount: Money,
    pub discount_amount: Money,
    pub grand_total: Money,
    pub paid_amount: Money,
    pub due_amount: Money,
}

/// Derives totals from the current cart and policy.
///
/// ## Example
/// ```rust
/// use shelf_core::cart::Cart;
/// use shelf_core::payment::PricingPolicy;
/// use shelf_core::totals::derive_totals;
///
/// let totals = derive_totals(&Cart::new(), &PricingPolicy::default());
/// assert!(totals.grand_total.is_zero());
/// ```
pub fn derive_totals(cart: &Cart, policy: &PricingPolicy) -> Totals {
    let stock_subtotal: Money = cart.lines.iter().map(|l| l.total_price).sum();
    let pickup_subtotal: Money = cart.pickups.iter().map(|p| p.total_price).sum();
    let subtotal = stock_subtotal + pickup_subtotal;

    let tax_amount = subtotal.percent(policy.vat_rate);
    let discount_amount = subtotal.percent(policy.discount_rate);
    let grand_total = subtotal + tax_amount - discount_amount;

    let paid_amount = policy.paid_amount;
    let due_amount = (grand_total - paid_amount).floor_zero();

    Totals {
        stock_subtotal,
        pickup_subtotal,
        subtotal,
        tax_amount,
        discount_amount,
        grand_total,
        paid_amount,
        due_amount,
    }
}
