//! # Payment Policy
//!
//! Rates plus the small state machine that keeps `paid_amount` and
//! `payment_status` consistent while the operator flips policy controls.
//!
//! ## Transitions
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Operator control              Effect                                   │
//! │  ────────────────              ──────                                   │
//! │  status = paid        ──────►  paid := grand, override off, advance off │
//! │  status = unpaid      ──────►  paid := 0,     override off, advance off │
//! │  status = partial     ──────►  override on,   advance off               │
//! │  partial payment off  ──────►  paid := grand (kept in step by reconcile)│
//! │  adjust from advance  ──────►  paid := min(advance, grand) if unset     │
//! │  type paid amount     ──────►  paid := value, status derived            │
//! │                                                                         │
//! │  After every cart or rate change: reconcile(grand)                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Invariant
//! After any transition or `reconcile`, `0 <= paid_amount <= max(grand, 0)`.
//! Out-of-range input is clamped here rather than trusted to the form.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::types::{Customer, EntryMode, PaymentStatus, Rate};

/// Rates and payment controls of one order-entry session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct PricingPolicy {
    pub vat_rate: Rate,
    pub discount_rate: Rate,
    pub payment_status: PaymentStatus,
    pub paid_amount: Money,
    /// When false the whole grand total is taken as paid.
    pub use_partial_payment: bool,
    pub adjust_from_advance: bool,
    /// The current paid amount was drawn from the advance and follows it.
    #[serde(default)]
    pub advance_drawn: bool,
    /// Paid amount is editable by hand.
    pub manual_override: bool,
    /// Selected customer's advance net of dues; may be negative.
    pub available_advance: Money,
}

impl Default for PricingPolicy {
    fn default() -> Self {
        PricingPolicy {
            vat_rate: Rate::zero(),
            discount_rate: Rate::zero(),
            payment_status: PaymentStatus::Unpaid,
            paid_amount: Money::zero(),
            use_partial_payment: true,
            adjust_from_advance: false,
            advance_drawn: false,
            manual_override: false,
            available_advance: Money::zero(),
        }
    }
}

impl PricingPolicy {
    /// Starting policy for an entry screen.
    ///
    /// POS sales default to full payment at the counter; inventory sales
    /// start unpaid.
    pub fn for_mode(mode: EntryMode, vat_rate: Rate, discount_rate: Rate) -> Self {
        PricingPolicy {
            vat_rate,
            discount_rate,
            use_partial_payment: mode == EntryMode::Inventory,
            ..PricingPolicy::default()
        }
    }

    /// Advance that can actually be drawn (never below zero).
    pub fn usable_advance(&self) -> Money {
        self.available_advance.floor_zero()
    }

    /// Explicit status selection.
    pub fn set_payment_status(&mut self, status: PaymentStatus, grand_total: Money) {
        self.payment_status = status;
        self.adjust_from_advance = false;
        self.advance_drawn = false;

        match status {
            PaymentStatus::Paid => {
                self.paid_amount = grand_total.floor_zero();
                self.manual_override = false;
            }
            PaymentStatus::Unpaid => {
                self.paid_amount = Money::zero();
                self.manual_override = false;
                self.use_partial_payment = true;
            }
            PaymentStatus::Partial => {
                self.manual_override = true;
                self.use_partial_payment = true;
                self.paid_amount = self.paid_amount.clamp_to(Money::zero(), grand_total.floor_zero());
            }
        }
    }

    /// Partial-payment checkbox.
    pub fn set_use_partial_payment(&mut self, enabled: bool, grand_total: Money) {
        self.use_partial_payment = enabled;
        self.manual_override = enabled;
        if !enabled {
            self.advance_drawn = false;
            self.paid_amount = grand_total.floor_zero();
            self.payment_status = PaymentStatus::derive(self.paid_amount, grand_total);
        }
    }

    /// "Adjust from advance" checkbox.
    ///
    /// Enabling draws `min(advance, grand)` into the paid amount, but only
    /// when the paid amount is not already meaningfully set (zero, or above
    /// the grand total). Returns whether an amount was drawn.
    ///
    /// Enabling without usable advance leaves the box unchecked. Disabling
    /// resets only an amount that was drawn from the advance.
    pub fn set_adjust_from_advance(&mut self, enabled: bool, grand_total: Money) -> bool {
        if !enabled {
            if self.adjust_from_advance && self.advance_drawn {
                self.paid_amount = if self.use_partial_payment {
                    Money::zero()
                } else {
                    grand_total.floor_zero()
                };
                self.payment_status = PaymentStatus::derive(self.paid_amount, grand_total);
            }
            self.adjust_from_advance = false;
            self.advance_drawn = false;
            return false;
        }

        let advance = self.usable_advance();
        if !advance.is_positive() {
            self.adjust_from_advance = false;
            return false;
        }
        self.adjust_from_advance = true;

        if self.paid_amount.is_zero() || self.paid_amount > grand_total {
            self.paid_amount = advance.min(grand_total.floor_zero());
            self.payment_status = PaymentStatus::derive(self.paid_amount, grand_total);
            self.advance_drawn = true;
            return true;
        }
        false
    }

    /// Typed paid amount; only while the override is on.
    ///
    /// A typed amount replaces one drawn from the advance and is no longer
    /// re-bounded by it.
    pub fn manual_payment_input(&mut self, value: Money, grand_total: Money) -> CoreResult<()> {
        if !self.manual_override {
            return Err(CoreError::ManualPaymentDisabled);
        }
        self.advance_drawn = false;
        self.paid_amount = value.clamp_to(Money::zero(), grand_total.floor_zero());
        self.payment_status = PaymentStatus::derive(self.paid_amount, grand_total);
        Ok(())
    }

    /// New customer selection; drops any advance adjustment from the old one.
    pub fn select_customer(&mut self, customer: Option<&Customer>, grand_total: Money) {
        self.set_adjust_from_advance(false, grand_total);
        self.available_advance = customer
            .map(Customer::available_advance)
            .unwrap_or_default();
    }

    /// Brings the paid amount back in line after the grand total moved.
    ///
    /// ## Order of precedence
    /// 1. Full payment enforced: paid tracks grand
    /// 2. Amount drawn from advance: paid = min(advance, grand)
    /// 3. Status paid (not typed by hand): paid tracks grand
    /// 4. Otherwise clamp into `[0, grand]`; re-derive status if clamped
    pub fn reconcile(&mut self, grand_total: Money) {
        let ceiling = grand_total.floor_zero();

        if !self.use_partial_payment {
            self.paid_amount = ceiling;
            self.payment_status = PaymentStatus::derive(ceiling, grand_total);
            return;
        }

        if self.adjust_from_advance && self.advance_drawn {
            self.paid_amount = self.usable_advance().min(ceiling);
            self.payment_status = PaymentStatus::derive(self.paid_amount, grand_total);
            return;
        }

        if self.payment_status == PaymentStatus::Paid && !self.manual_override {
            self.paid_amount = ceiling;
            return;
        }

        let clamped = self.paid_amount.clamp_to(Money::zero(), ceiling);
        if clamped != self.paid_amount {
            self.paid_amount = clamped;
            self.payment_status = PaymentStatus::derive(clamped, grand_total);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grand() -> Money {
        Money::from_major(285)
    }

    fn customer(advance: i64, due: i64) -> Customer {
        Customer {
            id: "c1".to_string(),
            name: "Karim Traders".to_string(),
            phone: Some("01700000000".to_string()),
            advance_amount: Money::from_major(advance),
            due_amount: Money::from_major(due),
        }
    }

    #[test]
    fn test_status_paid_and_unpaid() {
        let mut policy = PricingPolicy::default();

        policy.set_payment_status(PaymentStatus::Paid, grand());
        assert_eq!(policy.paid_amount, grand());
        assert!(!policy.manual_override);

        policy.set_payment_status(PaymentStatus::Unpaid, grand());
        assert_eq!(policy.paid_amount, Money::zero());
        assert!(!policy.manual_override);
        assert!(!policy.adjust_from_advance);
    }

    #[test]
    fn test_manual_input_reference_scenario() {
        let mut policy = PricingPolicy::default();
        policy.set_payment_status(PaymentStatus::Partial, grand());
        assert!(policy.manual_override);

        policy.manual_payment_input(Money::from_major(100), grand()).unwrap();

        assert_eq!(policy.payment_status, PaymentStatus::Partial);
        assert_eq!((grand() - policy.paid_amount).floor_zero(), Money::from_major(185));
    }

    #[test]
    fn test_manual_input_derives_status_and_clamps() {
        let mut policy = PricingPolicy::default();
        policy.set_payment_status(PaymentStatus::Partial, grand());

        policy.manual_payment_input(Money::zero(), grand()).unwrap();
        assert_eq!(policy.payment_status, PaymentStatus::Unpaid);

        policy.manual_payment_input(Money::from_major(999), grand()).unwrap();
        assert_eq!(policy.paid_amount, grand());
        assert_eq!(policy.payment_status, PaymentStatus::Paid);

        policy.manual_payment_input(Money::from_major(-5), grand()).unwrap();
        assert_eq!(policy.paid_amount, Money::zero());
    }

    #[test]
    fn test_manual_input_requires_override() {
        let mut policy = PricingPolicy::default();
        policy.set_payment_status(PaymentStatus::Paid, grand());

        let err = policy.manual_payment_input(Money::from_major(10), grand()).unwrap_err();
        assert!(matches!(err, CoreError::ManualPaymentDisabled));
        assert_eq!(policy.paid_amount, grand());
    }

    #[test]
    fn test_disabling_partial_payment_forces_full() {
        let mut policy = PricingPolicy::default();
        policy.set_use_partial_payment(true, grand());
        policy.manual_payment_input(Money::from_major(50), grand()).unwrap();

        policy.set_use_partial_payment(false, grand());
        assert_eq!(policy.paid_amount, grand());
        assert_eq!(policy.payment_status, PaymentStatus::Paid);

        // Grand total moves while the flag is off: paid follows
        policy.reconcile(Money::from_major(400));
        assert_eq!(policy.paid_amount, Money::from_major(400));
    }

    #[test]
    fn test_advance_reference_scenario() {
        let mut policy = PricingPolicy::default();
        policy.select_customer(Some(&customer(500, 200)), grand());
        assert_eq!(policy.available_advance, Money::from_major(300));

        assert!(policy.set_adjust_from_advance(true, grand()));

        assert_eq!(policy.paid_amount, grand());
        assert_eq!(policy.payment_status, PaymentStatus::Paid);
        assert_eq!((grand() - policy.paid_amount).floor_zero(), Money::zero());
    }

    #[test]
    fn test_advance_smaller_than_grand_is_partial() {
        let mut policy = PricingPolicy::default();
        policy.select_customer(Some(&customer(150, 50)), grand());

        policy.set_adjust_from_advance(true, grand());
        assert_eq!(policy.paid_amount, Money::from_major(100));
        assert_eq!(policy.payment_status, PaymentStatus::Partial);
    }

    #[test]
    fn test_advance_does_not_override_existing_payment() {
        let mut policy = PricingPolicy::default();
        policy.select_customer(Some(&customer(500, 0)), grand());
        policy.set_payment_status(PaymentStatus::Partial, grand());
        policy.manual_payment_input(Money::from_major(40), grand()).unwrap();

        assert!(!policy.set_adjust_from_advance(true, grand()));
        assert!(policy.adjust_from_advance);
        assert!(!policy.advance_drawn);
        assert_eq!(policy.paid_amount, Money::from_major(40));

        policy.reconcile(grand());
        assert_eq!(policy.paid_amount, Money::from_major(40));
        assert_eq!(policy.payment_status, PaymentStatus::Partial);

        // Nothing was drawn, so unchecking keeps the typed amount
        policy.set_adjust_from_advance(false, grand());
        assert_eq!(policy.paid_amount, Money::from_major(40));
    }

    #[test]
    fn test_typed_amount_replaces_drawn_advance() {
        let mut policy = PricingPolicy::default();
        policy.select_customer(Some(&customer(500, 200)), grand());
        assert!(policy.set_adjust_from_advance(true, grand()));
        policy.set_use_partial_payment(true, grand());

        policy.manual_payment_input(Money::from_major(100), grand()).unwrap();
        policy.reconcile(grand());

        assert_eq!(policy.paid_amount, Money::from_major(100));
        assert_eq!(policy.payment_status, PaymentStatus::Partial);
        assert!(!policy.advance_drawn);
    }

    #[test]
    fn test_negative_advance_is_unusable() {
        let mut policy = PricingPolicy::default();
        policy.select_customer(Some(&customer(100, 400)), grand());
        assert_eq!(policy.available_advance, Money::from_major(-300));
        assert_eq!(policy.usable_advance(), Money::zero());

        assert!(!policy.set_adjust_from_advance(true, grand()));
        assert!(!policy.adjust_from_advance);
        assert_eq!(policy.paid_amount, Money::zero());
    }

    #[test]
    fn test_disabling_advance_resets_drawn_amount() {
        let mut policy = PricingPolicy::default();
        policy.select_customer(Some(&customer(500, 200)), grand());
        policy.set_adjust_from_advance(true, grand());

        policy.set_adjust_from_advance(false, grand());
        assert_eq!(policy.paid_amount, Money::zero());
        assert_eq!(policy.payment_status, PaymentStatus::Unpaid);
    }

    #[test]
    fn test_changing_customer_drops_advance() {
        let mut policy = PricingPolicy::default();
        policy.select_customer(Some(&customer(500, 200)), grand());
        policy.set_adjust_from_advance(true, grand());

        policy.select_customer(None, grand());
        assert!(!policy.adjust_from_advance);
        assert_eq!(policy.available_advance, Money::zero());
        assert_eq!(policy.paid_amount, Money::zero());
    }

    #[test]
    fn test_reconcile_keeps_advance_bounded() {
        let mut policy = PricingPolicy::default();
        policy.select_customer(Some(&customer(500, 200)), grand());
        policy.set_adjust_from_advance(true, grand());

        policy.reconcile(Money::from_major(400));
        assert_eq!(policy.paid_amount, Money::from_major(300));
        assert_eq!(policy.payment_status, PaymentStatus::Partial);

        policy.reconcile(Money::from_major(120));
        assert_eq!(policy.paid_amount, Money::from_major(120));
        assert_eq!(policy.payment_status, PaymentStatus::Paid);
    }

    #[test]
    fn test_reconcile_paid_status_tracks_grand() {
        let mut policy = PricingPolicy::default();
        policy.set_payment_status(PaymentStatus::Paid, grand());

        policy.reconcile(Money::zero());
        assert_eq!(policy.paid_amount, Money::zero());
        policy.reconcile(Money::from_major(310));
        assert_eq!(policy.paid_amount, Money::from_major(310));
        assert_eq!(policy.payment_status, PaymentStatus::Paid);
    }

    #[test]
    fn test_reconcile_clamps_typed_amount_when_grand_shrinks() {
        let mut policy = PricingPolicy::default();
        policy.set_payment_status(PaymentStatus::Partial, grand());
        policy.manual_payment_input(Money::from_major(200), grand()).unwrap();

        policy.reconcile(Money::from_major(300));
        assert_eq!(policy.paid_amount, Money::from_major(200));
        assert_eq!(policy.payment_status, PaymentStatus::Partial);

        policy.reconcile(Money::from_major(150));
        assert_eq!(policy.paid_amount, Money::from_major(150));
        assert_eq!(policy.payment_status, PaymentStatus::Paid);
    }

    #[test]
    fn test_mode_defaults() {
        let pos = PricingPolicy::for_mode(EntryMode::Pos, Rate::from_percent(5), Rate::zero());
        assert!(!pos.use_partial_payment);
        assert_eq!(pos.vat_rate.bps(), 500);

        let inventory = PricingPolicy::for_mode(EntryMode::Inventory, Rate::zero(), Rate::zero());
        assert!(inventory.use_partial_payment);
        assert_eq!(inventory.payment_status, PaymentStatus::Unpaid);
    }
}
