//! Payment records
//!
//! A payment is the immutable outcome of one allocation run: the incoming
//! amount, how it was distributed across invoices, and whatever was left
//! over as account credit.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use core_kernel::{AccountId, InvoiceId, Money, PaymentId};

/// Payment method
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    Cash,
    BankTransfer,
    Card,
    Check,
}

/// Assignment of part of a payment to a specific invoice
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentAllocation {
    /// Invoice the slice was applied to
    pub invoice_id: InvoiceId,
    /// Amount applied to that invoice
    pub amount_applied: Money,
}

/// An immutable record of one incoming settlement
///
/// Invariant: `Σ(allocations.amount_applied) + residual_credit == amount`
/// exactly.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Payment {
    /// Unique identifier
    pub id: PaymentId,
    /// Paying account
    pub account_id: AccountId,
    /// Full incoming amount
    pub amount: Money,
    /// How the payment arrived
    pub method: PaymentMethod,
    /// Distribution across invoices, oldest debt first
    pub allocations: Vec<PaymentAllocation>,
    /// Amount not applied to any invoice, left on the account as credit
    pub residual_credit: Money,
    /// Created timestamp
    pub created_at: DateTime<Utc>,
}

impl Payment {
    /// Sum of all allocated slices
    pub fn allocated_total(&self) -> Money {
        self.allocations.iter().map(|a| a.amount_applied).sum()
    }
}
