//! # Session Commands
//!
//! Every operator action on an order-entry screen as data, so a session can
//! be driven from a script file, a test or a front end.
//!
//! ## Command Organization
//! ```text
//! commands/
//! ├── mod.rs      ◄─── You are here (SessionAction + apply)
//! └── script.rs   ◄─── Script files: entry mode, catalog, action list
//! ```
//!
//! ## Wire Shape
//! ```json
//! { "action": "add_stock", "stockId": "s-rice" }
//! { "action": "update_line", "index": 0, "field": "quantity", "value": "3" }
//! { "action": "set_payment_status", "status": "partial" }
//! { "action": "enter_paid_amount", "amount": "100" }
//! ```

pub mod script;

use serde::{Deserialize, Serialize};
use tracing::debug;

use shelf_core::cart::{LineField, PickupDraft};
use shelf_core::{NewSupplier, PaymentStatus};

use crate::error::ApiError;
use crate::session::OrderSession;

pub use script::SessionScript;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case", rename_all_fields = "camelCase")]
pub enum SessionAction {
    AddStock {
        stock_id: String,
    },
    UpdateLine {
        index: usize,
        field: LineField,
        value: String,
    },
    RemoveLine {
        index: usize,
    },
    AddPickup(PickupDraft),
    RemovePickup {
        index: usize,
    },
    SelectCustomer {
        #[serde(default)]
        customer_id: Option<String>,
    },
    SetWalkIn {
        name: String,
        phone: String,
    },
    SelectSupplier {
        #[serde(default)]
        supplier_id: Option<String>,
    },
    CreateSupplier(NewSupplier),
    SelectAccount {
        #[serde(default)]
        account_id: Option<String>,
    },
    SetVatRate {
        percent: String,
    },
    SetDiscountRate {
        percent: String,
    },
    SetPaymentStatus {
        status: PaymentStatus,
    },
    SetUsePartialPayment {
        enabled: bool,
    },
    SetAdjustFromAdvance {
        enabled: bool,
    },
    EnterPaidAmount {
        amount: String,
    },
    SetNote {
        #[serde(default)]
        note: Option<String>,
    },
}

impl SessionAction {
    /// Applies one action; the session is unchanged when it fails.
    pub async fn apply(self, session: &mut OrderSession) -> Result<(), ApiError> {
        debug!(action = ?self, "Applying session action");
        match self {
            SessionAction::AddStock { stock_id } => session.add_stock(&stock_id).map(drop),
            SessionAction::UpdateLine {
                index,
                field,
                value,
            } => session.update_line(index, field, &value),
            SessionAction::RemoveLine { index } => session.remove_line(index),
            SessionAction::AddPickup(pickup) => session.add_pickup(pickup).map(drop),
            SessionAction::RemovePickup { index } => session.remove_pickup(index),
            SessionAction::SelectCustomer { customer_id } => {
                session.select_customer(customer_id.as_deref())
            }
            SessionAction::SetWalkIn { name, phone } => session.set_walk_in(&name, &phone),
            SessionAction::SelectSupplier { supplier_id } => {
                session.select_supplier(supplier_id.as_deref())
            }
            SessionAction::CreateSupplier(supplier) => {
                session.create_supplier(supplier).await.map(drop)
            }
            SessionAction::SelectAccount { account_id } => {
                session.select_account(account_id.as_deref())
            }
            SessionAction::SetVatRate { percent } => session.set_vat_rate(&percent),
            SessionAction::SetDiscountRate { percent } => session.set_discount_rate(&percent),
            SessionAction::SetPaymentStatus { status } => {
                session.set_payment_status(status);
                Ok(())
            }
            SessionAction::SetUsePartialPayment { enabled } => {
                session.set_use_partial_payment(enabled);
                Ok(())
            }
            SessionAction::SetAdjustFromAdvance { enabled } => {
                session.set_adjust_from_advance(enabled);
                Ok(())
            }
            SessionAction::EnterPaidAmount { amount } => session.enter_paid_amount(&amount),
            SessionAction::SetNote { note } => {
                session.set_note(note);
                Ok(())
            }
        }
    }
}

/// Applies actions in order, stopping at the first failure.
///
/// The error carries the 1-based step number.
pub async fn apply_all(
    session: &mut OrderSession,
    actions: Vec<SessionAction>,
) -> Result<(), (usize, ApiError)> {
    for (i, action) in actions.into_iter().enumerate() {
        action.apply(session).await.map_err(|e| (i + 1, e))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::PricingDefaults;
    use crate::testing::{catalog, FakeApi};
    use shelf_api::Submitter;
    use shelf_core::Money;
    use std::sync::Arc;

    fn session() -> OrderSession {
        let defaults = PricingDefaults {
            vat_rate_bps: 500,
            discount_rate_bps: 1000,
        };
        OrderSession::inventory(catalog(), defaults, Arc::new(Submitter::new(FakeApi::ok())))
    }

    #[test]
    fn test_action_wire_shape() {
        let actions: Vec<SessionAction> = serde_json::from_str(
            r#"[
                {"action": "add_stock", "stockId": "s-rice"},
                {"action": "update_line", "index": 0, "field": "quantity", "value": "3"},
                {"action": "add_pickup", "productName": "Hilsa", "quantity": 1,
                 "unitPrice": 40000, "salePrice": 45000},
                {"action": "select_customer", "customerId": "c-karim"},
                {"action": "set_payment_status", "status": "partial"}
            ]"#,
        )
        .unwrap();

        assert_eq!(
            actions[0],
            SessionAction::AddStock {
                stock_id: "s-rice".to_string()
            }
        );
        assert!(matches!(actions[2], SessionAction::AddPickup(ref p) if p.product_name == "Hilsa"));
        assert_eq!(
            actions[4],
            SessionAction::SetPaymentStatus {
                status: PaymentStatus::Partial
            }
        );
    }

    #[tokio::test]
    async fn test_replay_partial_payment() {
        let mut s = session();
        let actions = vec![
            SessionAction::AddStock {
                stock_id: "s-rice".to_string(),
            },
            SessionAction::UpdateLine {
                index: 0,
                field: LineField::Quantity,
                value: "3".to_string(),
            },
            SessionAction::SetPaymentStatus {
                status: PaymentStatus::Partial,
            },
            SessionAction::EnterPaidAmount {
                amount: "100".to_string(),
            },
        ];

        apply_all(&mut s, actions).await.unwrap();

        assert_eq!(s.totals().grand_total, Money::from_major(285));
        assert_eq!(s.totals().due_amount, Money::from_major(185));
    }

    #[tokio::test]
    async fn test_replay_reports_failing_step() {
        let mut s = session();
        let actions = vec![
            SessionAction::AddStock {
                stock_id: "s-rice".to_string(),
            },
            SessionAction::UpdateLine {
                index: 0,
                field: LineField::UnitPrice,
                value: "1".to_string(),
            },
        ];

        let (step, err) = apply_all(&mut s, actions).await.unwrap_err();
        assert_eq!(step, 2);
        assert_eq!(err.code, crate::error::ErrorCode::BusinessLogic);
        assert_eq!(s.draft().cart.lines[0].unit_price, Money::from_major(100));
    }
}
