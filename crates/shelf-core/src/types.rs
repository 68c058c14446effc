//! # Domain Types
//!
//! Catalog snapshots and policy enums shared by both order-entry flows.
//!
//! ## Type Overview
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    StockLot     │   │    Customer     │   │    Account      │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  product/variant│   │  advance_amount │   │  account_type   │       │
//! │  │  batch_no       │   │  due_amount     │   │  balance        │       │
//! │  │  quantity       │   │  phone          │   │                 │       │
//! │  │  sale_price     │   └─────────────────┘   └─────────────────┘       │
//! │  └─────────────────┘                                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │      Rate       │   │  PaymentStatus  │   │   EntryMode     │       │
//! │  │  bps (u32)      │   │  Unpaid         │   │  Inventory      │       │
//! │  │  500 = 5%       │   │  Partial        │   │  Pos            │       │
//! │  └─────────────────┘   │  Paid           │   └─────────────────┘       │
//! │                        └─────────────────┘                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The catalog types are read-only snapshots handed over by the server at
//! page load; nothing in this crate mutates them.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::ValidationError;
use crate::money::Money;

// =============================================================================
// Rate
// =============================================================================

/// A percentage in basis points (1 bps = 0.01%).
///
/// Used for both `vatRate` and `discountRate`; valid range is
/// 0..=10000 (0% to 100%), checked by
/// [`validate_rate_bps`](crate::validation::validate_rate_bps).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Rate(u32);

impl Rate {
    /// Creates a rate from basis points.
    #[inline]
    pub const fn from_bps(bps: u32) -> Self {
        Rate(bps)
    }

    /// Creates a rate from a whole percentage.
    #[inline]
    pub const fn from_percent(pct: u32) -> Self {
        Rate(pct * 100)
    }

    /// Parses percentage text (`"7.5"` = 7.5%).
    ///
    /// ## Example
    /// ```rust
    /// use shelf_core::types::Rate;
    ///
    /// assert_eq!(Rate::parse("7.5").unwrap().bps(), 750);
    /// assert!(Rate::parse("120").is_err());
    /// ```
    pub fn parse(text: &str) -> Result<Self, ValidationError> {
        // Percent with two decimals maps 1:1 onto bps, same shape as cents.
        let bps = Money::parse(text)
            .map_err(|_| ValidationError::InvalidFormat {
                field: "rate".to_string(),
                reason: format!("'{}' is not a percentage", text.trim()),
            })?
            .cents();

        if !(0..=10_000).contains(&bps) {
            return Err(ValidationError::OutOfRange {
                field: "rate".to_string(),
                min: 0,
                max: 100,
            });
        }
        Ok(Rate(bps as u32))
    }

    /// Returns the rate in basis points.
    #[inline]
    pub const fn bps(&self) -> u32 {
        self.0
    }

    /// Returns the rate as a percentage (for display only).
    #[inline]
    pub fn percentage(&self) -> f64 {
        self.0 as f64 / 100.0
    }

    /// Zero rate.
    #[inline]
    pub const fn zero() -> Self {
        Rate(0)
    }

    /// Checks if the rate is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }
}

impl Default for Rate {
    fn default() -> Self {
        Rate::zero()
    }
}

impl std::fmt::Display for Rate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.0 % 100 == 0 {
            write!(f, "{}%", self.0 / 100)
        } else {
            write!(f, "{}.{:02}%", self.0 / 100, self.0 % 100)
        }
    }
}

// =============================================================================
// Entry Mode
// =============================================================================

/// Which order-entry screen owns the session.
///
/// ```text
///              Inventory                     Pos
///  unit price  read-only (from lot)          editable
///  buyer       catalog customer              catalog customer or walk-in
///  search      brand → product → variant     flat stock search
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum EntryMode {
    Inventory,
    Pos,
}

impl EntryMode {
    /// Whether the cashier may override a line's unit price.
    pub const fn price_editable(&self) -> bool {
        matches!(self, EntryMode::Pos)
    }

    /// Whether a walk-in (name + phone) buyer is accepted.
    pub const fn allows_walk_in(&self) -> bool {
        matches!(self, EntryMode::Pos)
    }
}

impl std::fmt::Display for EntryMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EntryMode::Inventory => write!(f, "inventory"),
            EntryMode::Pos => write!(f, "pos"),
        }
    }
}

// =============================================================================
// Catalog Snapshots
// =============================================================================

/// A (product, variant, batch) inventory record with bounded quantity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct StockLot {
    pub stock_id: String,
    pub product_id: String,
    pub product_name: String,
    #[serde(default)]
    pub brand: Option<String>,
    pub variant_id: String,
    #[serde(default)]
    pub variant_name: Option<String>,
    pub batch_no: String,
    /// Units on hand when the page was loaded.
    pub quantity: i64,
    pub sale_price: Money,
    /// Alternate reporting price, carried through untouched.
    #[serde(default)]
    pub shadow_price: Option<Money>,
}

impl StockLot {
    /// Display label: `Product (Variant) #batch`.
    pub fn label(&self) -> String {
        match &self.variant_name {
            Some(variant) => format!("{} ({}) #{}", self.product_name, variant, self.batch_no),
            None => format!("{} #{}", self.product_name, self.batch_no),
        }
    }
}

/// A customer from the page's customer list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub advance_amount: Money,
    #[serde(default)]
    pub due_amount: Money,
}

impl Customer {
    /// Advance credit net of what the customer still owes.
    ///
    /// Returned raw: it is negative when the due exceeds the advance.
    /// [`PricingPolicy`](crate::payment::PricingPolicy) treats anything
    /// below zero as no usable advance.
    pub fn available_advance(&self) -> Money {
        self.advance_amount - self.due_amount
    }
}

/// A supplier for pickup items.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Supplier {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub company: Option<String>,
}

/// A financial account payments are booked into.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    pub id: String,
    pub name: String,
    pub account_type: String,
    #[serde(default)]
    pub balance: Money,
}

/// Everything the server hands to an order-entry page at load time.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase", default)]
pub struct CatalogSnapshot {
    pub stocks: Vec<StockLot>,
    pub customers: Vec<Customer>,
    pub suppliers: Vec<Supplier>,
    pub accounts: Vec<Account>,
}

impl CatalogSnapshot {
    pub fn stock(&self, stock_id: &str) -> Option<&StockLot> {
        self.stocks.iter().find(|s| s.stock_id == stock_id)
    }

    pub fn customer(&self, id: &str) -> Option<&Customer> {
        self.customers.iter().find(|c| c.id == id)
    }

    pub fn supplier(&self, id: &str) -> Option<&Supplier> {
        self.suppliers.iter().find(|s| s.id == id)
    }

    pub fn account(&self, id: &str) -> Option<&Account> {
        self.accounts.iter().find(|a| a.id == id)
    }

    /// Case-insensitive search over product, brand, variant and batch.
    pub fn search_stock(&self, query: &str) -> Vec<&StockLot> {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return self.stocks.iter().collect();
        }
        self.stocks
            .iter()
            .filter(|s| {
                [
                    Some(s.product_name.as_str()),
                    s.brand.as_deref(),
                    s.variant_name.as_deref(),
                    Some(s.batch_no.as_str()),
                ]
                .into_iter()
                .flatten()
                .any(|field| field.to_lowercase().contains(&needle))
            })
            .collect()
    }
}

// =============================================================================
// Payment Status
// =============================================================================

/// How much of the grand total has been paid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    #[default]
    Unpaid,
    Partial,
    Paid,
}

impl PaymentStatus {
    /// Status implied by a paid amount: 0 ⇒ unpaid, ≥ grand ⇒ paid, else partial.
    ///
    /// ## Example
    /// ```rust
    /// use shelf_core::money::Money;
    /// use shelf_core::types::PaymentStatus;
    ///
    /// let grand = Money::from_major(285);
    /// assert_eq!(PaymentStatus::derive(Money::from_major(100), grand), PaymentStatus::Partial);
    /// assert_eq!(PaymentStatus::derive(grand, grand), PaymentStatus::Paid);
    /// ```
    pub fn derive(paid: Money, grand_total: Money) -> Self {
        if !paid.is_positive() {
            PaymentStatus::Unpaid
        } else if paid >= grand_total {
            PaymentStatus::Paid
        } else {
            PaymentStatus::Partial
        }
    }
}

impl std::fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PaymentStatus::Unpaid => write!(f, "unpaid"),
            PaymentStatus::Partial => write!(f, "partial"),
            PaymentStatus::Paid => write!(f, "paid"),
        }
    }
}

impl std::str::FromStr for PaymentStatus {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "unpaid" | "due" => Ok(PaymentStatus::Unpaid),
            "partial" => Ok(PaymentStatus::Partial),
            "paid" | "full" => Ok(PaymentStatus::Paid),
            other => Err(ValidationError::InvalidFormat {
                field: "payment status".to_string(),
                reason: format!("unknown status '{}'", other),
            }),
        }
    }
}

// =============================================================================
// Payment Method
// =============================================================================

/// How a follow-up payment was made.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    Cash,
    Card,
    BankTransfer,
    MobileBanking,
    Cheque,
}

impl std::fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            PaymentMethod::Cash => "cash",
            PaymentMethod::Card => "card",
            PaymentMethod::BankTransfer => "bank_transfer",
            PaymentMethod::MobileBanking => "mobile_banking",
            PaymentMethod::Cheque => "cheque",
        };
        f.write_str(label)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rate_parse_and_display() {
        assert_eq!(Rate::parse("5").unwrap(), Rate::from_percent(5));
        assert_eq!(Rate::parse("7.25").unwrap().bps(), 725);
        assert_eq!(Rate::parse("100").unwrap().bps(), 10_000);
        assert!(Rate::parse("100.01").is_err());
        assert!(Rate::parse("-1").is_err());
        assert!(Rate::parse("five").is_err());

        assert_eq!(Rate::from_bps(500).to_string(), "5%");
        assert_eq!(Rate::from_bps(725).to_string(), "7.25%");
    }

    #[test]
    fn test_available_advance_can_be_negative() {
        let customer = Customer {
            id: "c1".to_string(),
            name: "Rahim".to_string(),
            phone: None,
            advance_amount: Money::from_major(500),
            due_amount: Money::from_major(200),
        };
        assert_eq!(customer.available_advance(), Money::from_major(300));

        let indebted = Customer {
            due_amount: Money::from_major(800),
            ..customer
        };
        assert_eq!(indebted.available_advance(), Money::from_major(-300));
    }

    #[test]
    fn test_payment_status_derive() {
        let grand = Money::from_major(285);
        assert_eq!(PaymentStatus::derive(Money::zero(), grand), PaymentStatus::Unpaid);
        assert_eq!(PaymentStatus::derive(Money::from_cents(1), grand), PaymentStatus::Partial);
        assert_eq!(PaymentStatus::derive(Money::from_major(300), grand), PaymentStatus::Paid);
        // Zero-total order with nothing paid still reads as unpaid
        assert_eq!(PaymentStatus::derive(Money::zero(), Money::zero()), PaymentStatus::Unpaid);
    }

    #[test]
    fn test_payment_status_from_str() {
        assert_eq!("Paid".parse::<PaymentStatus>().unwrap(), PaymentStatus::Paid);
        assert_eq!("partial".parse::<PaymentStatus>().unwrap(), PaymentStatus::Partial);
        assert!("half".parse::<PaymentStatus>().is_err());
    }

    #[test]
    fn test_entry_mode_capabilities() {
        assert!(EntryMode::Pos.price_editable());
        assert!(!EntryMode::Inventory.price_editable());
        assert!(EntryMode::Pos.allows_walk_in());
        assert!(!EntryMode::Inventory.allows_walk_in());
    }

    #[test]
    fn test_snapshot_search() {
        let lot = |id: &str, name: &str, brand: &str| StockLot {
            stock_id: id.to_string(),
            product_id: format!("p-{id}"),
            product_name: name.to_string(),
            brand: Some(brand.to_string()),
            variant_id: "v1".to_string(),
            variant_name: None,
            batch_no: format!("B{id}"),
            quantity: 10,
            sale_price: Money::from_major(10),
            shadow_price: None,
        };
        let snapshot = CatalogSnapshot {
            stocks: vec![lot("1", "Basmati Rice", "Pran"), lot("2", "Soybean Oil", "Teer")],
            ..Default::default()
        };

        assert_eq!(snapshot.search_stock("rice").len(), 1);
        assert_eq!(snapshot.search_stock("TEER")[0].stock_id, "2");
        assert_eq!(snapshot.search_stock("  ").len(), 2);
        assert!(snapshot.stock("3").is_none());
    }
}
