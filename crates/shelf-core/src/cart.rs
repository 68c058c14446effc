//! # Cart
//!
//! The mutable cart of an order-entry session: stock-backed lines plus
//! supplier-sourced pickup lines.
//!
//! ## Cart Operations Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Cart Operations                                      │
//! │                                                                         │
//! │  Operator Action          Cart Method            Cart Change            │
//! │  ───────────────          ───────────            ───────────            │
//! │                                                                         │
//! │  Pick stock lot ─────────► add_stock_line() ───► push or qty += 1      │
//! │                                                                         │
//! │  Edit qty / price ───────► update_line() ──────► lines[i].field = v    │
//! │                                                                         │
//! │  Add pickup item ────────► add_pickup_line() ──► pickups.push(item)    │
//! │                                                                         │
//! │  Click remove ───────────► remove_line() / remove_pickup()             │
//! │                                                                         │
//! │  Every change runs derive_totals() + PricingPolicy::reconcile()        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Invariants
//! - `total_price == quantity × unit price` on every row after every mutation
//! - Stock lines are unique by (product, variant, batch)
//! - At most [`MAX_CART_LINES`](crate::MAX_CART_LINES) rows across both sequences

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::{CoreError, CoreResult, LineKind, ValidationError};
use crate::money::Money;
use crate::types::{EntryMode, StockLot};
use crate::validation::{validate_pickup_name, validate_quantity, ValidationResult};
use crate::MAX_CART_LINES;

// =============================================================================
// Line Items
// =============================================================================

/// A sale line consuming a specific stock lot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct LineItem {
    pub product_id: String,
    pub variant_id: String,
    pub stock_id: String,
    pub batch_no: String,
    /// Display label frozen at selection time.
    pub label: String,
    pub quantity: i64,
    pub unit_price: Money,
    pub total_price: Money,
    /// Lot quantity when this line was picked; the submission ceiling.
    pub available_quantity: i64,
    #[serde(default)]
    pub shadow_price: Option<Money>,
}

impl LineItem {
    /// Creates a single-unit line from a stock lot.
    ///
    /// ## Price Freezing
    /// The lot's sale price is captured now; later snapshot changes do not
    /// reprice the line.
    pub fn from_lot(lot: &StockLot) -> Self {
        LineItem {
            product_id: lot.product_id.clone(),
            variant_id: lot.variant_id.clone(),
            stock_id: lot.stock_id.clone(),
            batch_no: lot.batch_no.clone(),
            label: lot.label(),
            quantity: 1,
            unit_price: lot.sale_price,
            total_price: lot.sale_price,
            available_quantity: lot.quantity,
            shadow_price: lot.shadow_price,
        }
    }

    /// Whether this line's key matches a stock lot.
    pub fn matches(&self, lot: &StockLot) -> bool {
        self.product_id == lot.product_id
            && self.variant_id == lot.variant_id
            && self.batch_no == lot.batch_no
    }

    /// Quantity exceeds what the lot held at selection time (shown inline).
    pub fn exceeds_stock(&self) -> bool {
        self.quantity > self.available_quantity
    }

    /// Sets quantity and price together; the line is unchanged on overflow.
    fn reprice(&mut self, quantity: i64, unit_price: Money) -> ValidationResult<()> {
        self.total_price = line_total(unit_price, quantity)?;
        self.quantity = quantity;
        self.unit_price = unit_price;
        Ok(())
    }
}

/// A sale line not backed by warehouse stock, bought from a supplier ad hoc.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct PickupItem {
    pub product_name: String,
    #[serde(default)]
    pub brand: Option<String>,
    #[serde(default)]
    pub variant: Option<String>,
    pub quantity: i64,
    /// What the shop pays the supplier.
    pub unit_price: Money,
    pub sale_price: Money,
    pub total_price: Money,
}

/// Form fields of the "add pickup item" dialog.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct PickupDraft {
    pub product_name: String,
    #[serde(default)]
    pub brand: Option<String>,
    #[serde(default)]
    pub variant: Option<String>,
    pub quantity: i64,
    pub unit_price: Money,
    pub sale_price: Money,
}

impl PickupDraft {
    /// Checks the dialog fields and builds the pickup line.
    pub fn into_item(self) -> ValidationResult<PickupItem> {
        validate_pickup_name(&self.product_name)?;
        let positive = |field: &str, ok: bool| {
            if ok {
                Ok(())
            } else {
                Err(ValidationError::MustBePositive {
                    field: field.to_string(),
                })
            }
        };
        validate_quantity(self.quantity)?;
        positive("unit price", self.unit_price.is_positive())?;
        positive("sale price", self.sale_price.is_positive())?;
        let total_price = line_total(self.sale_price, self.quantity)?;

        Ok(PickupItem {
            product_name: self.product_name.trim().to_string(),
            brand: non_blank(self.brand),
            variant: non_blank(self.variant),
            quantity: self.quantity,
            unit_price: self.unit_price,
            sale_price: self.sale_price,
            total_price,
        })
    }
}

/// Editable numeric columns of a stock line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum LineField {
    Quantity,
    UnitPrice,
}

/// What [`Cart::add_stock_line`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddOutcome {
    /// New row at this index.
    Appended(usize),
    /// Existing row at this index got one more unit.
    Merged(usize),
    /// Selection had no backing lot; cart unchanged.
    NoLot,
}

// =============================================================================
// Cart
// =============================================================================

/// Ordered stock lines and ordered pickup lines; totals are additive.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Cart {
    pub lines: Vec<LineItem>,
    pub pickups: Vec<PickupItem>,
}

impl Cart {
    /// Creates a new empty cart.
    pub fn new() -> Self {
        Cart::default()
    }

    /// Adds one unit of a stock lot.
    ///
    /// ## Behavior
    /// - Same (product, variant, batch) already in cart: quantity += 1
    /// - Otherwise: new row priced from the lot
    /// - `None` lot: silent no-op
    pub fn add_stock_line(&mut self, lot: Option<&StockLot>) -> CoreResult<AddOutcome> {
        let Some(lot) = lot else {
            return Ok(AddOutcome::NoLot);
        };

        if let Some(index) = self.lines.iter().position(|l| l.matches(lot)) {
            let line = &mut self.lines[index];
            let quantity = line.quantity.saturating_add(1);
            line.reprice(quantity, line.unit_price)?;
            return Ok(AddOutcome::Merged(index));
        }

        self.ensure_capacity()?;
        self.lines.push(LineItem::from_lot(lot));
        Ok(AddOutcome::Appended(self.lines.len() - 1))
    }

    /// Updates quantity or unit price from raw input text.
    ///
    /// Unparsable or negative text coerces to zero, which the submission
    /// guard rejects. Quantities above available stock are accepted here and
    /// only flagged. A line total that does not fit is rejected and the line
    /// keeps its previous values.
    pub fn update_line(
        &mut self,
        mode: EntryMode,
        index: usize,
        field: LineField,
        value: &str,
    ) -> CoreResult<()> {
        if field == LineField::UnitPrice && !mode.price_editable() {
            return Err(CoreError::PriceLocked);
        }

        let line = self.lines.get_mut(index).ok_or(CoreError::LineNotFound {
            kind: LineKind::Stock,
            index,
        })?;

        let (quantity, unit_price) = match field {
            LineField::Quantity => (coerce_quantity(value), line.unit_price),
            LineField::UnitPrice => (line.quantity, coerce_price(value)),
        };
        line.reprice(quantity, unit_price)?;
        Ok(())
    }

    /// Removes a stock line by position.
    pub fn remove_line(&mut self, index: usize) -> CoreResult<LineItem> {
        if index >= self.lines.len() {
            return Err(CoreError::LineNotFound {
                kind: LineKind::Stock,
                index,
            });
        }
        Ok(self.lines.remove(index))
    }

    /// Validates and appends a pickup line; on failure the cart is unchanged.
    pub fn add_pickup_line(&mut self, draft: PickupDraft) -> CoreResult<usize> {
        let item = draft.into_item()?;
        self.ensure_capacity()?;
        self.pickups.push(item);
        Ok(self.pickups.len() - 1)
    }

    /// Removes a pickup line by position.
    pub fn remove_pickup(&mut self, index: usize) -> CoreResult<PickupItem> {
        if index >= self.pickups.len() {
            return Err(CoreError::LineNotFound {
                kind: LineKind::Pickup,
                index,
            });
        }
        Ok(self.pickups.remove(index))
    }

    /// Clears both sequences.
    pub fn clear(&mut self) {
        self.lines.clear();
        self.pickups.clear();
    }

    /// Rows across both sequences.
    pub fn line_count(&self) -> usize {
        self.lines.len() + self.pickups.len()
    }

    /// Units across both sequences.
    pub fn total_quantity(&self) -> i64 {
        self.lines.iter().map(|l| l.quantity).sum::<i64>()
            + self.pickups.iter().map(|p| p.quantity).sum::<i64>()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty() && self.pickups.is_empty()
    }

    pub fn has_pickups(&self) -> bool {
        !self.pickups.is_empty()
    }

    fn ensure_capacity(&self) -> CoreResult<()> {
        if self.line_count() >= MAX_CART_LINES {
            return Err(CoreError::CartTooLarge {
                max: MAX_CART_LINES,
            });
        }
        Ok(())
    }
}

/// Integer coercion for the quantity input; decimals truncate.
fn coerce_quantity(value: &str) -> i64 {
    let trimmed = value.trim();
    let quantity = trimmed.parse::<i64>().unwrap_or_else(|_| {
        Money::parse(trimmed)
            .map(|m| m.dollars())
            .unwrap_or_default()
    });
    quantity.max(0)
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.map(|s| s.trim().to_string()).filter(|s| !s.is_empty())
}

/// Decimal coercion for the unit price input; negatives become zero.
fn coerce_price(value: &str) -> Money {
    Money::parse(value).unwrap_or_default().floor_zero()
}

fn line_total(price: Money, quantity: i64) -> ValidationResult<Money> {
    price
        .checked_mul_quantity(quantity)
        .ok_or_else(|| ValidationError::TooLarge {
            field: "line total".to_string(),
        })
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn lot(stock_id: &str, batch: &str, price: i64, qty: i64) -> StockLot {
        StockLot {
            stock_id: stock_id.to_string(),
            product_id: "p1".to_string(),
            product_name: "Basmati Rice".to_string(),
            brand: Some("Pran".to_string()),
            variant_id: "v-5kg".to_string(),
            variant_name: Some("5kg".to_string()),
            batch_no: batch.to_string(),
            quantity: qty,
            sale_price: Money::from_major(price),
            shadow_price: None,
        }
    }

    fn pickup(name: &str) -> PickupDraft {
        PickupDraft {
            product_name: name.to_string(),
            brand: Some(" ".to_string()),
            variant: None,
            quantity: 2,
            unit_price: Money::from_major(40),
            sale_price: Money::from_major(55),
        }
    }

    #[test]
    fn test_add_stock_line_appends_single_unit() {
        let mut cart = Cart::new();
        let outcome = cart.add_stock_line(Some(&lot("s1", "B1", 100, 5))).unwrap();

        assert_eq!(outcome, AddOutcome::Appended(0));
        let line = &cart.lines[0];
        assert_eq!(line.quantity, 1);
        assert_eq!(line.unit_price, Money::from_major(100));
        assert_eq!(line.total_price, Money::from_major(100));
        assert_eq!(line.available_quantity, 5);
        assert_eq!(line.label, "Basmati Rice (5kg) #B1");
    }

    #[test]
    fn test_same_key_increments_by_exactly_one() {
        let mut cart = Cart::new();
        let rice = lot("s1", "B1", 100, 5);
        cart.add_stock_line(Some(&rice)).unwrap();
        cart.update_line(EntryMode::Inventory, 0, LineField::Quantity, "3").unwrap();

        let outcome = cart.add_stock_line(Some(&rice)).unwrap();

        assert_eq!(outcome, AddOutcome::Merged(0));
        assert_eq!(cart.lines.len(), 1);
        assert_eq!(cart.lines[0].quantity, 4);
        assert_eq!(cart.lines[0].total_price, Money::from_major(400));
    }

    #[test]
    fn test_merge_keeps_edited_price_in_pos() {
        let mut cart = Cart::new();
        let rice = lot("s1", "B1", 100, 5);
        cart.add_stock_line(Some(&rice)).unwrap();
        cart.update_line(EntryMode::Pos, 0, LineField::UnitPrice, "90").unwrap();
        cart.add_stock_line(Some(&rice)).unwrap();

        assert_eq!(cart.lines[0].quantity, 2);
        assert_eq!(cart.lines[0].total_price, Money::from_major(180));
    }

    #[test]
    fn test_other_batch_is_new_row() {
        let mut cart = Cart::new();
        cart.add_stock_line(Some(&lot("s1", "B1", 100, 5))).unwrap();
        let outcome = cart.add_stock_line(Some(&lot("s2", "B2", 100, 5))).unwrap();

        assert_eq!(outcome, AddOutcome::Appended(1));
        assert_eq!(cart.lines.len(), 2);
    }

    #[test]
    fn test_missing_lot_is_noop() {
        let mut cart = Cart::new();
        assert_eq!(cart.add_stock_line(None).unwrap(), AddOutcome::NoLot);
        assert!(cart.is_empty());
    }

    #[test]
    fn test_update_line_recomputes_total() {
        let mut cart = Cart::new();
        cart.add_stock_line(Some(&lot("s1", "B1", 100, 5))).unwrap();

        cart.update_line(EntryMode::Pos, 0, LineField::Quantity, "3").unwrap();
        assert_eq!(cart.lines[0].total_price, Money::from_major(300));

        cart.update_line(EntryMode::Pos, 0, LineField::UnitPrice, "12.50").unwrap();
        assert_eq!(cart.lines[0].total_price, Money::from_cents(3750));
    }

    #[test]
    fn test_update_line_coerces_bad_input_to_zero() {
        let mut cart = Cart::new();
        cart.add_stock_line(Some(&lot("s1", "B1", 100, 5))).unwrap();

        cart.update_line(EntryMode::Pos, 0, LineField::Quantity, "").unwrap();
        assert_eq!(cart.lines[0].quantity, 0);
        assert_eq!(cart.lines[0].total_price, Money::zero());

        cart.update_line(EntryMode::Pos, 0, LineField::Quantity, "2.9").unwrap();
        assert_eq!(cart.lines[0].quantity, 2);

        cart.update_line(EntryMode::Pos, 0, LineField::UnitPrice, "abc").unwrap();
        assert_eq!(cart.lines[0].unit_price, Money::zero());
    }

    #[test]
    fn test_negative_input_coerces_to_zero() {
        let mut cart = Cart::new();
        cart.add_stock_line(Some(&lot("s1", "B1", 50, 5))).unwrap();

        cart.update_line(EntryMode::Pos, 0, LineField::UnitPrice, "-50").unwrap();
        assert_eq!(cart.lines[0].unit_price, Money::zero());

        cart.update_line(EntryMode::Pos, 0, LineField::UnitPrice, "50").unwrap();
        cart.update_line(EntryMode::Pos, 0, LineField::Quantity, "-3").unwrap();
        assert_eq!(cart.lines[0].quantity, 0);
        assert_eq!(cart.lines[0].total_price, Money::zero());
    }

    #[test]
    fn test_oversized_line_total_is_rejected() {
        let mut cart = Cart::new();
        cart.add_stock_line(Some(&lot("s1", "B1", 100, 5))).unwrap();
        cart.update_line(EntryMode::Pos, 0, LineField::Quantity, "2").unwrap();

        let err = cart
            .update_line(EntryMode::Pos, 0, LineField::Quantity, "9223372036854775807")
            .unwrap_err();
        assert!(matches!(err, CoreError::Validation(ValidationError::TooLarge { .. })));
        assert_eq!(cart.lines[0].quantity, 2);
        assert_eq!(cart.lines[0].total_price, Money::from_major(200));

        let err = cart.add_pickup_line(PickupDraft { quantity: i64::MAX, ..pickup("Fish") });
        assert!(err.is_err());
        assert!(!cart.has_pickups());
    }

    #[test]
    fn test_over_stock_quantity_is_flagged_not_rejected() {
        let mut cart = Cart::new();
        cart.add_stock_line(Some(&lot("s1", "B1", 100, 5))).unwrap();
        cart.update_line(EntryMode::Inventory, 0, LineField::Quantity, "8").unwrap();

        assert_eq!(cart.lines[0].quantity, 8);
        assert!(cart.lines[0].exceeds_stock());
    }

    #[test]
    fn test_inventory_price_is_read_only() {
        let mut cart = Cart::new();
        cart.add_stock_line(Some(&lot("s1", "B1", 100, 5))).unwrap();

        let err = cart
            .update_line(EntryMode::Inventory, 0, LineField::UnitPrice, "1")
            .unwrap_err();
        assert!(matches!(err, CoreError::PriceLocked));
        assert_eq!(cart.lines[0].unit_price, Money::from_major(100));
    }

    #[test]
    fn test_update_and_remove_out_of_range() {
        let mut cart = Cart::new();
        assert!(matches!(
            cart.update_line(EntryMode::Pos, 0, LineField::Quantity, "1"),
            Err(CoreError::LineNotFound { kind: LineKind::Stock, index: 0 })
        ));
        assert!(cart.remove_line(0).is_err());
        assert!(matches!(
            cart.remove_pickup(2),
            Err(CoreError::LineNotFound { kind: LineKind::Pickup, index: 2 })
        ));
    }

    #[test]
    fn test_remove_by_position() {
        let mut cart = Cart::new();
        cart.add_stock_line(Some(&lot("s1", "B1", 100, 5))).unwrap();
        cart.add_stock_line(Some(&lot("s2", "B2", 50, 5))).unwrap();

        let removed = cart.remove_line(0).unwrap();
        assert_eq!(removed.batch_no, "B1");
        assert_eq!(cart.lines[0].batch_no, "B2");
    }

    #[test]
    fn test_add_pickup_line() {
        let mut cart = Cart::new();
        let index = cart.add_pickup_line(pickup(" Fresh Fish ")).unwrap();

        let item = &cart.pickups[index];
        assert_eq!(item.product_name, "Fresh Fish");
        assert_eq!(item.brand, None);
        assert_eq!(item.total_price, Money::from_major(110));
        assert!(cart.has_pickups());
        assert_eq!(cart.total_quantity(), 2);
    }

    #[test]
    fn test_invalid_pickup_does_not_mutate() {
        let mut cart = Cart::new();

        assert!(cart.add_pickup_line(pickup("  ")).is_err());
        assert!(cart
            .add_pickup_line(PickupDraft { quantity: 0, ..pickup("Fish") })
            .is_err());
        assert!(cart
            .add_pickup_line(PickupDraft { unit_price: Money::zero(), ..pickup("Fish") })
            .is_err());
        let err = cart
            .add_pickup_line(PickupDraft { sale_price: Money::zero(), ..pickup("Fish") })
            .unwrap_err();
        assert_eq!(err.to_string(), "sale price must be positive");

        assert!(cart.is_empty());
    }

    #[test]
    fn test_capacity_limit() {
        let mut cart = Cart::new();
        for i in 0..MAX_CART_LINES {
            cart.add_stock_line(Some(&lot(&format!("s{i}"), &format!("B{i}"), 1, 1)))
                .unwrap();
        }
        assert!(matches!(
            cart.add_pickup_line(pickup("Fish")),
            Err(CoreError::CartTooLarge { .. })
        ));
        // Merging into an existing row still works at capacity
        assert!(cart.add_stock_line(Some(&lot("s0", "B0", 1, 1))).is_ok());
    }
}
