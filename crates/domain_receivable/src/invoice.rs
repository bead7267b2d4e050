//! Invoice aggregate
//!
//! The invoice carries a denormalized view of what is still owed on it.
//! The view is kept perpetually consistent with the ledger-derived balance:
//!
//! `remaining_balance == round2(max(0, grand_total − cumulative_returns_applied
//! − cumulative_payments_applied))`
//!
//! and `status` is derived from the bookkeeping fields, never set directly.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use core_kernel::{AccountId, InvoiceId, Money};

/// Invoice status, a pure function of the bookkeeping fields
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InvoiceStatus {
    /// Nothing applied yet
    Pending,
    /// Some payment applied, balance still open
    PartiallyPaid,
    /// Remaining balance reached zero
    Paid,
}

/// A denormalized invoice record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Invoice {
    /// Unique identifier
    pub id: InvoiceId,
    /// Account being billed
    pub account_id: AccountId,
    /// Total invoiced amount
    pub grand_total: Money,
    /// Sum of payments (including consumed account credit) applied so far,
    /// clamped to `grand_total`
    pub cumulative_payments_applied: Money,
    /// Sum of settled returns against this invoice
    pub cumulative_returns_applied: Money,
    /// Derived: what is still owed, clamped to >= 0
    pub remaining_balance: Money,
    /// Derived status
    pub status: InvoiceStatus,
    /// Created timestamp
    pub created_at: DateTime<Utc>,
    /// Updated timestamp
    pub updated_at: DateTime<Utc>,
}

impl Invoice {
    /// Creates a new invoice with nothing applied
    pub fn new(id: InvoiceId, account_id: AccountId, grand_total: Money) -> Self {
        let now = Utc::now();
        let mut invoice = Self {
            id,
            account_id,
            grand_total,
            cumulative_payments_applied: Money::zero(),
            cumulative_returns_applied: Money::zero(),
            remaining_balance: Money::zero(),
            status: InvoiceStatus::Pending,
            created_at: now,
            updated_at: now,
        };
        invoice.recompute();
        invoice
    }

    /// Applies a payment amount to the invoice's bookkeeping
    ///
    /// `cumulative_payments_applied` is clamped to `grand_total`; any excess
    /// stays on the account ledger as credit and is never reflected here.
    pub fn apply_payment(&mut self, amount: Money) {
        self.cumulative_payments_applied =
            (self.cumulative_payments_applied + amount).min(self.grand_total);
        self.recompute();
    }

    /// Applies a settled return, reducing the invoice's effective total
    pub fn apply_return(&mut self, amount: Money) {
        self.cumulative_returns_applied += amount;
        self.recompute();
    }

    /// The invoice total net of settled returns
    pub fn effective_total(&self) -> Money {
        (self.grand_total - self.cumulative_returns_applied).clamp_non_negative()
    }

    /// True while something is still owed on the invoice
    pub fn is_outstanding(&self) -> bool {
        self.remaining_balance.is_positive()
    }

    /// True if some payment has been applied but the invoice is not settled
    pub fn is_partially_paid(&self) -> bool {
        self.status == InvoiceStatus::PartiallyPaid
    }

    /// Recomputes `remaining_balance` and `status` from the bookkeeping
    /// fields
    fn recompute(&mut self) {
        self.remaining_balance = (self.grand_total
            - self.cumulative_returns_applied
            - self.cumulative_payments_applied)
            .clamp_non_negative();
        self.status = derive_status(
            self.remaining_balance,
            self.cumulative_payments_applied,
            self.cumulative_returns_applied,
        );
        self.updated_at = Utc::now();
    }
}

/// Derives the status from the bookkeeping fields
///
/// A fully-returned, never-paid invoice counts as `Paid` (nothing left to
/// collect); an untouched invoice is `Pending`.
pub fn derive_status(remaining: Money, payments: Money, returns: Money) -> InvoiceStatus {
    if remaining.is_zero() && (payments.is_positive() || returns.is_positive()) {
        InvoiceStatus::Paid
    } else if payments.is_positive() {
        InvoiceStatus::PartiallyPaid
    } else {
        InvoiceStatus::Pending
    }
}
