//! # Order Drafts and Payloads
//!
//! What an order-entry session hands to the order API.
//!
//! ```text
//!  OrderDraft ──check_submission──► OrderPayload ──► POST /orders
//!  PaymentDraft ──into_record────► PaymentRecord ──► POST /orders/{id}/payments
//!  NewSupplier ──validate────────────────────────► POST /suppliers
//! ```
//!
//! Amounts go over the wire as two-decimal strings (`"285.00"`), rates as
//! percentage strings (`"5.00"`).

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::cart::{Cart, LineItem, PickupItem};
use crate::error::ValidationError;
use crate::money::{self, Money};
use crate::payment::PricingPolicy;
use crate::totals::{derive_totals, Totals};
use crate::types::{EntryMode, PaymentMethod, PaymentStatus, Rate};
use crate::validation::{
    check_submission, validate_payment_amount, validate_phone, validate_supplier_name,
    ValidationResult,
};

// =============================================================================
// Draft
// =============================================================================

/// Who the order is for.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Buyer {
    #[default]
    Unselected,
    /// A customer from the catalog list.
    Customer { customer_id: String },
    /// Counter sale to someone without an account.
    WalkIn { name: String, phone: String },
}

/// The complete state of one order-entry form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct OrderDraft {
    pub mode: EntryMode,
    pub cart: Cart,
    pub policy: PricingPolicy,
    pub buyer: Buyer,
    pub supplier_id: Option<String>,
    pub account_id: Option<String>,
    pub note: Option<String>,
}

impl OrderDraft {
    /// Empty draft with the entry screen's default policy.
    pub fn new(mode: EntryMode, vat_rate: Rate, discount_rate: Rate) -> Self {
        OrderDraft {
            mode,
            cart: Cart::new(),
            policy: PricingPolicy::for_mode(mode, vat_rate, discount_rate),
            buyer: Buyer::Unselected,
            supplier_id: None,
            account_id: None,
            note: None,
        }
    }

    /// Current totals.
    pub fn totals(&self) -> Totals {
        derive_totals(&self.cart, &self.policy)
    }

    /// Runs the submission guard and builds the request body.
    pub fn to_payload(&self) -> ValidationResult<OrderPayload> {
        check_submission(self)?;
        if let Buyer::WalkIn { phone, .. } = &self.buyer {
            validate_phone(phone)?;
        }
        Ok(OrderPayload::from_draft(self, &self.totals()))
    }
}

// =============================================================================
// Order Payload
// =============================================================================

/// Body of the create-order request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct OrderPayload {
    pub mode: EntryMode,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub walk_in_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub walk_in_phone: Option<String>,
    pub items: Vec<OrderItemPayload>,
    pub pickup_items: Vec<PickupItemPayload>,
    pub supplier_id: Option<String>,
    pub vat_rate: String,
    pub discount_rate: String,
    #[serde(with = "money::decimal")]
    #[ts(type = "string")]
    pub sub_amount: Money,
    #[serde(with = "money::decimal")]
    #[ts(type = "string")]
    pub vat_amount: Money,
    #[serde(with = "money::decimal")]
    #[ts(type = "string")]
    pub discount_amount: Money,
    #[serde(with = "money::decimal")]
    #[ts(type = "string")]
    pub grand_amount: Money,
    #[serde(with = "money::decimal")]
    #[ts(type = "string")]
    pub paid_amount: Money,
    #[serde(with = "money::decimal")]
    #[ts(type = "string")]
    pub due_amount: Money,
    pub payment_status: PaymentStatus,
    pub use_partial_payment: bool,
    pub adjust_from_advance: bool,
    pub account_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

/// One stock line on the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct OrderItemPayload {
    pub product_id: String,
    pub variant_id: String,
    pub stock_id: String,
    pub batch_no: String,
    pub quantity: i64,
    #[serde(with = "money::decimal")]
    #[ts(type = "string")]
    pub unit_price: Money,
    #[serde(with = "money::decimal")]
    #[ts(type = "string")]
    pub total_price: Money,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[ts(type = "string | null")]
    pub shadow_price: Option<String>,
}

impl From<&LineItem> for OrderItemPayload {
    fn from(line: &LineItem) -> Self {
        OrderItemPayload {
            product_id: line.product_id.clone(),
            variant_id: line.variant_id.clone(),
            stock_id: line.stock_id.clone(),
            batch_no: line.batch_no.clone(),
            quantity: line.quantity,
            unit_price: line.unit_price,
            total_price: line.total_price,
            shadow_price: line.shadow_price.map(|p| p.to_decimal_string()),
        }
    }
}

/// One pickup line on the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct PickupItemPayload {
    pub product_name: String,
    pub brand: Option<String>,
    pub variant: Option<String>,
    pub quantity: i64,
    #[serde(with = "money::decimal")]
    #[ts(type = "string")]
    pub unit_price: Money,
    #[serde(with = "money::decimal")]
    #[ts(type = "string")]
    pub sale_price: Money,
    #[serde(with = "money::decimal")]
    #[ts(type = "string")]
    pub total_price: Money,
}

impl From<&PickupItem> for PickupItemPayload {
    fn from(item: &PickupItem) -> Self {
        PickupItemPayload {
            product_name: item.product_name.clone(),
            brand: item.brand.clone(),
            variant: item.variant.clone(),
            quantity: item.quantity,
            unit_price: item.unit_price,
            sale_price: item.sale_price,
            total_price: item.total_price,
        }
    }
}

impl OrderPayload {
    fn from_draft(draft: &OrderDraft, totals: &Totals) -> Self {
        let (customer_id, walk_in_name, walk_in_phone) = match &draft.buyer {
            Buyer::Customer { customer_id } => (Some(customer_id.clone()), None, None),
            Buyer::WalkIn { name, phone } => {
                (None, Some(name.trim().to_string()), Some(phone.trim().to_string()))
            }
            Buyer::Unselected => (None, None, None),
        };
        let percent = |rate: Rate| Money::from_cents(i64::from(rate.bps())).to_decimal_string();
        let policy = &draft.policy;

        OrderPayload {
            mode: draft.mode,
            customer_id,
            walk_in_name,
            walk_in_phone,
            items: draft.cart.lines.iter().map(OrderItemPayload::from).collect(),
            pickup_items: draft.cart.pickups.iter().map(PickupItemPayload::from).collect(),
            supplier_id: draft.supplier_id.clone().filter(|_| draft.cart.has_pickups()),
            vat_rate: percent(policy.vat_rate),
            discount_rate: percent(policy.discount_rate),
            sub_amount: totals.subtotal,
            vat_amount: totals.tax_amount,
            discount_amount: totals.discount_amount,
            grand_amount: totals.grand_total,
            paid_amount: totals.paid_amount,
            due_amount: totals.due_amount,
            payment_status: policy.payment_status,
            use_partial_payment: policy.use_partial_payment,
            adjust_from_advance: policy.adjust_from_advance,
            account_id: draft.account_id.clone().unwrap_or_default(),
            note: draft.note.clone().filter(|n| !n.trim().is_empty()),
        }
    }
}

// =============================================================================
// Follow-up Payment
// =============================================================================

/// Form for recording a payment against an existing order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct PaymentDraft {
    pub amount: Money,
    #[ts(as = "String")]
    pub payment_date: NaiveDate,
    pub payment_method: PaymentMethod,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub account_id: Option<String>,
}

impl PaymentDraft {
    /// Validates against the order's outstanding balance.
    ///
    /// ## Rules
    /// - amount > 0
    /// - amount <= order due
    /// - account selected
    pub fn into_record(self, order_due: Money) -> ValidationResult<PaymentRecord> {
        validate_payment_amount(self.amount.cents())?;
        if self.amount > order_due {
            return Err(ValidationError::ExceedsDue {
                amount: self.amount.to_decimal_string(),
                due: order_due.to_decimal_string(),
            });
        }
        let account_id = self
            .account_id
            .filter(|id| !id.trim().is_empty())
            .ok_or(ValidationError::MissingAccount)?;

        Ok(PaymentRecord {
            amount: self.amount,
            payment_date: self.payment_date,
            payment_method: self.payment_method,
            notes: self.notes.filter(|n| !n.trim().is_empty()),
            account_id,
        })
    }
}

/// Body of the record-payment request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct PaymentRecord {
    #[serde(with = "money::decimal")]
    #[ts(type = "string")]
    pub amount: Money,
    #[ts(as = "String")]
    pub payment_date: NaiveDate,
    pub payment_method: PaymentMethod,
    pub notes: Option<String>,
    pub account_id: String,
}

// =============================================================================
// Supplier Creation
// =============================================================================

/// Body of the create-supplier side call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct NewSupplier {
    pub name: String,
    #[serde(default)]
    pub company: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
}

impl NewSupplier {
    pub fn validate(&self) -> ValidationResult<()> {
        validate_supplier_name(&self.name)?;
        if let Some(phone) = self.phone.as_deref().filter(|p| !p.trim().is_empty()) {
            validate_phone(phone)?;
        }
        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
