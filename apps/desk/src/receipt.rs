//! # Receipt View
//!
//! Invoice data for a draft or a submitted order, and its plain-text
//! rendering at the configured paper width.
//!
//! ```text
//!           Karim Stores
//!          12 Station Road
//!  Invoice: INV-0001
//!  Date:    2026-10-14 10:32
//!  Customer: Karim
//!  ------------------------------------------
//!  Rice #B1
//!    3 x $100.00                      $300.00
//!  ------------------------------------------
//!  Subtotal                           $300.00
//!  VAT (5%)                            $15.00
//!  Discount (10%)                     -$30.00
//!  TOTAL                              $285.00
//!  Paid                               $100.00
//!  Due                                $185.00
//! ```

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

use shelf_core::{Money, OrderDraft, PaymentStatus, Rate, Totals};

use crate::session::OrderSession;
use crate::state::StoreSettings;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Receipt {
    pub store_name: String,
    pub store_address: Vec<String>,
    pub invoice_no: Option<String>,
    pub timestamp: String,
    pub buyer: Option<String>,
    pub items: Vec<ReceiptItem>,
    pub vat_rate: Rate,
    pub discount_rate: Rate,
    pub totals: Totals,
    pub payment_status: PaymentStatus,
    pub account: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReceiptItem {
    pub name: String,
    pub quantity: i64,
    pub unit_price: Money,
    pub line_total: Money,
    /// Bought from a supplier for this order.
    pub pickup: bool,
}

impl Receipt {
    /// Receipt for the session's current draft.
    pub fn for_session(
        session: &OrderSession,
        store: &StoreSettings,
        invoice_no: Option<&str>,
        at: DateTime<Local>,
    ) -> Self {
        Self::build(session, session.draft(), session.totals(), store, invoice_no, at)
    }

    /// Receipt for a draft that has been sent (see [`crate::session::Submission`]).
    pub fn for_draft(
        session: &OrderSession,
        draft: &OrderDraft,
        totals: Totals,
        store: &StoreSettings,
        invoice_no: Option<&str>,
        at: DateTime<Local>,
    ) -> Self {
        Self::build(session, draft, totals, store, invoice_no, at)
    }

    fn build(
        session: &OrderSession,
        draft: &OrderDraft,
        totals: Totals,
        store: &StoreSettings,
        invoice_no: Option<&str>,
        at: DateTime<Local>,
    ) -> Self {
        let catalog = session.catalog();
        let buyer = match &draft.buyer {
            shelf_core::Buyer::Customer { customer_id } => {
                catalog.customer(customer_id).map(|c| c.name.clone())
            }
            shelf_core::Buyer::WalkIn { name, .. } => Some(name.trim().to_string()),
            shelf_core::Buyer::Unselected => None,
        };

        let stock = draft.cart.lines.iter().map(|l| ReceiptItem {
            name: l.label.clone(),
            quantity: l.quantity,
            unit_price: l.unit_price,
            line_total: l.total_price,
            pickup: false,
        });
        let pickups = draft.cart.pickups.iter().map(|p| ReceiptItem {
            name: match &p.variant {
                Some(v) => format!("{} ({})", p.product_name, v),
                None => p.product_name.clone(),
            },
            quantity: p.quantity,
            unit_price: p.sale_price,
            line_total: p.total_price,
            pickup: true,
        });

        Receipt {
            store_name: store.name.clone(),
            store_address: store.address.clone(),
            invoice_no: invoice_no.map(str::to_string),
            timestamp: at.format("%Y-%m-%d %H:%M").to_string(),
            buyer,
            items: stock.chain(pickups).collect(),
            vat_rate: draft.policy.vat_rate,
            discount_rate: draft.policy.discount_rate,
            totals,
            payment_status: draft.policy.payment_status,
            account: draft
                .account_id
                .as_deref()
                .and_then(|id| catalog.account(id))
                .map(|a| a.name.clone()),
        }
    }

    /// Plain-text rendering for a receipt printer or terminal.
    pub fn render_text(&self, store: &StoreSettings) -> String {
        let width = store.paper_width;
        let money = |m: Money| store.format_currency(m);
        let rule = "-".repeat(width);
        let mut out = Vec::new();

        out.push(center(&self.store_name, width));
        for line in &self.store_address {
            out.push(center(line, width));
        }
        if let Some(invoice) = &self.invoice_no {
            out.push(format!("Invoice: {}", invoice));
        }
        out.push(format!("Date:    {}", self.timestamp));
        if let Some(buyer) = &self.buyer {
            out.push(format!("Customer: {}", buyer));
        }
        out.push(rule.clone());

        for item in &self.items {
            let name = if item.pickup {
                format!("{} *", item.name)
            } else {
                item.name.clone()
            };
            out.push(name);
            out.push(columns(
                &format!("  {} x {}", item.quantity, money(item.unit_price)),
                &money(item.line_total),
                width,
            ));
        }
        out.push(rule.clone());

        let t = &self.totals;
        out.push(columns("Subtotal", &money(t.subtotal), width));
        if !self.vat_rate.is_zero() {
            out.push(columns(&format!("VAT ({})", self.vat_rate), &money(t.tax_amount), width));
        }
        if !self.discount_rate.is_zero() {
            out.push(columns(
                &format!("Discount ({})", self.discount_rate),
                &format!("-{}", money(t.discount_amount)),
                width,
            ));
        }
        out.push(columns("TOTAL", &money(t.grand_total), width));
        out.push(columns("Paid", &money(t.paid_amount), width));
        out.push(columns("Due", &money(t.due_amount), width));
        out.push(columns("Status", &self.payment_status.to_string(), width));
        if let Some(account) = &self.account {
            out.push(columns("Account", account, width));
        }
        if self.items.iter().any(|i| i.pickup) {
            out.push(rule);
            out.push("* supplier pickup".to_string());
        }

        out.join("\n")
    }
}

fn center(text: &str, width: usize) -> String {
    let len = text.chars().count();
    if len >= width {
        return text.to_string();
    }
    format!("{}{}", " ".repeat((width - len) / 2), text)
}

/// Left text and right-aligned value on one line; wraps the value onto its
/// own line when both do not fit.
fn columns(left: &str, right: &str, width: usize) -> String {
    let used = left.chars().count() + right.chars().count();
    if used < width {
        format!("{}{}{}", left, " ".repeat(width - used), right)
    } else {
        format!("{}\n{:>width$}", left, right, width = width)
    }
}
