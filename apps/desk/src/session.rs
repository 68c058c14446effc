//! # Order Session
//!
//! One order-entry screen: the read-only catalog snapshot it was opened
//! with, the draft being edited and the shared submitter.
//!
//! ## Update Cycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Every Mutating Operation                             │
//! │                                                                         │
//! │  operator input ──► core rule (cart / policy) ──► derive_totals()      │
//! │                                                         │               │
//! │                                   PricingPolicy::reconcile(grand)       │
//! │                                                         │               │
//! │                                       totals cached for display         │
//! │                                                                         │
//! │  Errors return before any state changes.                               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Inventory and POS screens are the same session with a different
//! [`EntryMode`]: inventory locks unit prices and needs a catalog customer,
//! POS allows price edits and walk-in buyers and starts on full payment.

use std::sync::Arc;

use tracing::{debug, info, warn};

use shelf_api::{OrderCreated, PaymentRecorded, Submitter};
use shelf_core::cart::{AddOutcome, LineField, PickupDraft};
use shelf_core::{
    Buyer, CatalogSnapshot, CoreError, EntryMode, Money, NewSupplier, OrderDraft, OrderPayload,
    PaymentDraft, PaymentStatus, Rate, StockLot, Supplier, Totals,
};
use shelf_core::validation::validate_search_query;

use crate::error::ApiError;
use crate::state::PricingDefaults;

/// Result of a successful submission.
#[derive(Debug, Clone)]
pub struct Submission {
    pub order: OrderCreated,
    /// The draft as it was sent; the session itself starts over.
    pub draft: OrderDraft,
    pub totals: Totals,
}

pub struct OrderSession {
    catalog: CatalogSnapshot,
    draft: OrderDraft,
    totals: Totals,
    defaults: PricingDefaults,
    submitter: Arc<Submitter>,
}

impl OrderSession {
    pub fn new(
        mode: EntryMode,
        catalog: CatalogSnapshot,
        defaults: PricingDefaults,
        submitter: Arc<Submitter>,
    ) -> Self {
        let draft = OrderDraft::new(mode, defaults.vat_rate(), defaults.discount_rate());
        let totals = draft.totals();
        info!(%mode, stocks = catalog.stocks.len(), "Order session opened");
        OrderSession {
            catalog,
            draft,
            totals,
            defaults,
            submitter,
        }
    }

    /// Plain sale entry: prices come from the stock lot.
    pub fn inventory(
        catalog: CatalogSnapshot,
        defaults: PricingDefaults,
        submitter: Arc<Submitter>,
    ) -> Self {
        Self::new(EntryMode::Inventory, catalog, defaults, submitter)
    }

    /// Counter sale entry.
    pub fn pos(catalog: CatalogSnapshot, defaults: PricingDefaults, submitter: Arc<Submitter>) -> Self {
        Self::new(EntryMode::Pos, catalog, defaults, submitter)
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn mode(&self) -> EntryMode {
        self.draft.mode
    }

    pub fn totals(&self) -> Totals {
        self.totals
    }

    pub fn draft(&self) -> &OrderDraft {
        &self.draft
    }

    pub fn catalog(&self) -> &CatalogSnapshot {
        &self.catalog
    }

    /// Stock lots matching the picker's search box.
    pub fn search_stock(&self, query: &str) -> Result<Vec<&StockLot>, ApiError> {
        let query = validate_search_query(query)?;
        Ok(self.catalog.search_stock(&query))
    }

    /// Builds the request body without sending it.
    pub fn preview_payload(&self) -> Result<OrderPayload, ApiError> {
        Ok(self.draft.to_payload()?)
    }

    // =========================================================================
    // Cart Operations
    // =========================================================================

    /// Adds one unit of a stock lot. An id missing from the snapshot is a
    /// no-op, like picking an empty dropdown entry.
    pub fn add_stock(&mut self, stock_id: &str) -> Result<AddOutcome, ApiError> {
        let outcome = self.draft.cart.add_stock_line(self.catalog.stock(stock_id))?;
        match outcome {
            AddOutcome::NoLot => debug!(stock_id, "No stock lot selected"),
            AddOutcome::Merged(index) => debug!(stock_id, index, "Merged into existing line"),
            AddOutcome::Appended(index) => debug!(stock_id, index, "Added line"),
        }
        self.refresh();
        Ok(outcome)
    }

    pub fn update_line(&mut self, index: usize, field: LineField, value: &str) -> Result<(), ApiError> {
        self.draft.cart.update_line(self.draft.mode, index, field, value)?;
        self.refresh();
        Ok(())
    }

    pub fn remove_line(&mut self, index: usize) -> Result<(), ApiError> {
        let line = self.draft.cart.remove_line(index)?;
        debug!(index, label = %line.label, "Removed line");
        self.refresh();
        Ok(())
    }

    pub fn add_pickup(&mut self, pickup: PickupDraft) -> Result<usize, ApiError> {
        let index = self.draft.cart.add_pickup_line(pickup)?;
        self.refresh();
        Ok(index)
    }

    pub fn remove_pickup(&mut self, index: usize) -> Result<(), ApiError> {
        self.draft.cart.remove_pickup(index)?;
        self.refresh();
        Ok(())
    }

    // =========================================================================
    // Parties
    // =========================================================================

    /// Picks a catalog customer, or clears the choice with `None`.
    ///
    /// Switching customer drops any advance adjustment, since the advance
    /// belonged to the previous customer.
    pub fn select_customer(&mut self, customer_id: Option<&str>) -> Result<(), ApiError> {
        let customer = match customer_id {
            Some(id) => Some(self.catalog.customer(id).ok_or_else(|| CoreError::NotInCatalog {
                kind: "Customer",
                id: id.to_string(),
            })?),
            None => None,
        };

        let grand = self.grand_total();
        self.draft.policy.select_customer(customer, grand);
        self.draft.buyer = match customer {
            Some(c) => Buyer::Customer {
                customer_id: c.id.clone(),
            },
            None => Buyer::Unselected,
        };
        self.refresh();
        Ok(())
    }

    /// Sets a walk-in buyer (POS only).
    pub fn set_walk_in(&mut self, name: &str, phone: &str) -> Result<(), ApiError> {
        if !self.draft.mode.allows_walk_in() {
            return Err(ApiError::business(
                "Walk-in customers can only be entered at the POS",
            ));
        }
        let grand = self.grand_total();
        self.draft.policy.select_customer(None, grand);
        self.draft.buyer = Buyer::WalkIn {
            name: name.to_string(),
            phone: phone.to_string(),
        };
        self.refresh();
        Ok(())
    }

    pub fn select_supplier(&mut self, supplier_id: Option<&str>) -> Result<(), ApiError> {
        if let Some(id) = supplier_id {
            if self.catalog.supplier(id).is_none() {
                return Err(ApiError::not_found("Supplier", id));
            }
        }
        self.draft.supplier_id = supplier_id.map(str::to_string);
        Ok(())
    }

    pub fn select_account(&mut self, account_id: Option<&str>) -> Result<(), ApiError> {
        if let Some(id) = account_id {
            if self.catalog.account(id).is_none() {
                return Err(ApiError::not_found("Account", id));
            }
        }
        self.draft.account_id = account_id.map(str::to_string);
        Ok(())
    }

    pub fn set_note(&mut self, note: Option<String>) {
        self.draft.note = note;
    }

    // =========================================================================
    // Rates and Payment
    // =========================================================================

    /// Sets VAT from percentage text (`"7.5"`).
    pub fn set_vat_rate(&mut self, percent: &str) -> Result<(), ApiError> {
        self.draft.policy.vat_rate = Rate::parse(percent)?;
        self.refresh();
        Ok(())
    }

    /// Sets the discount from percentage text.
    pub fn set_discount_rate(&mut self, percent: &str) -> Result<(), ApiError> {
        self.draft.policy.discount_rate = Rate::parse(percent)?;
        self.refresh();
        Ok(())
    }

    pub fn set_payment_status(&mut self, status: PaymentStatus) {
        let grand = self.grand_total();
        self.draft.policy.set_payment_status(status, grand);
        self.refresh();
    }

    pub fn set_use_partial_payment(&mut self, enabled: bool) {
        let grand = self.grand_total();
        self.draft.policy.set_use_partial_payment(enabled, grand);
        self.refresh();
    }

    /// Returns whether the adjustment is now on. Enabling without a usable
    /// advance leaves it off.
    pub fn set_adjust_from_advance(&mut self, enabled: bool) -> bool {
        let grand = self.grand_total();
        let drawn = self.draft.policy.set_adjust_from_advance(enabled, grand);
        let on = self.draft.policy.adjust_from_advance;
        if enabled && !on {
            debug!("No usable advance for the selected customer");
        } else if enabled && !drawn {
            debug!("Paid amount already set; advance not drawn");
        }
        self.refresh();
        on
    }

    /// Typed paid amount; only accepted while partial payment is selected.
    pub fn enter_paid_amount(&mut self, amount: &str) -> Result<(), ApiError> {
        let value = Money::parse(amount)?;
        let grand = self.grand_total();
        self.draft.policy.manual_payment_input(value, grand)?;
        self.refresh();
        Ok(())
    }

    // =========================================================================
    // Order API
    // =========================================================================

    /// Sends the order. On failure nothing is cleared; on success the
    /// session starts a fresh draft with the configured rates.
    pub async fn submit(&mut self) -> Result<Submission, ApiError> {
        let payload = self.draft.to_payload().map_err(|e| {
            warn!(error = %e, "Submission blocked");
            ApiError::from(e)
        })?;

        let order = self.submitter.submit_order(&payload).await.map_err(|e| {
            warn!(error = %e, "Order submission failed");
            ApiError::from(e)
        })?;

        info!(order_id = %order.id, mode = %self.draft.mode, "Order submitted");
        let mode = self.draft.mode;
        let fresh = OrderDraft::new(mode, self.defaults.vat_rate(), self.defaults.discount_rate());
        let draft = std::mem::replace(&mut self.draft, fresh);
        let totals = std::mem::replace(&mut self.totals, self.draft.totals());
        Ok(Submission {
            order,
            draft,
            totals,
        })
    }

    /// Creates a supplier and selects it. The cart is untouched.
    pub async fn create_supplier(&mut self, supplier: NewSupplier) -> Result<Supplier, ApiError> {
        supplier.validate()?;
        let created = self.submitter.create_supplier(&supplier).await?;
        self.catalog.suppliers.push(created.clone());
        self.draft.supplier_id = Some(created.id.clone());
        Ok(created)
    }

    /// Records a follow-up payment against an already submitted order.
    pub async fn record_payment(
        &self,
        order_id: &str,
        order_due: Money,
        payment: PaymentDraft,
    ) -> Result<PaymentRecorded, ApiError> {
        let record = payment.into_record(order_due)?;
        Ok(self.submitter.record_payment(order_id, &record).await?)
    }

    // =========================================================================
    // Internals
    // =========================================================================

    fn grand_total(&self) -> Money {
        self.draft.totals().grand_total
    }

    fn refresh(&mut self) {
        let grand = self.grand_total();
        self.draft.policy.reconcile(grand);
        self.totals = self.draft.totals();
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
