//! Domain events emitted at the engine boundary
//!
//! After each committed operation the engine emits one event per mutated
//! aggregate so UI and reporting layers can refresh without polling.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use core_kernel::{AccountId, InvoiceId, Money, PaymentId, ReturnId};

use crate::invoice::InvoiceStatus;
use crate::returns::SettlementType;

/// Events published after a committed operation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReceivableEvent {
    /// The account's ledger-derived balance changed
    AccountBalanceChanged {
        account_id: AccountId,
        balance: Money,
        timestamp: DateTime<Utc>,
    },

    /// An invoice's denormalized fields changed
    InvoiceUpdated {
        invoice_id: InvoiceId,
        account_id: AccountId,
        remaining_balance: Money,
        status: InvoiceStatus,
        timestamp: DateTime<Utc>,
    },

    /// A payment was recorded and allocated
    PaymentRecorded {
        payment_id: PaymentId,
        account_id: AccountId,
        amount: Money,
        residual_credit: Money,
        timestamp: DateTime<Utc>,
    },

    /// A return was settled
    ReturnSettled {
        return_id: ReturnId,
        invoice_id: InvoiceId,
        settlement_type: SettlementType,
        amount: Money,
        timestamp: DateTime<Utc>,
    },
}

impl ReceivableEvent {
    /// Short name for logging and routing
    pub fn name(&self) -> &'static str {
        match self {
            ReceivableEvent::AccountBalanceChanged { .. } => "account_balance_changed",
            ReceivableEvent::InvoiceUpdated { .. } => "invoice_updated",
            ReceivableEvent::PaymentRecorded { .. } => "payment_recorded",
            ReceivableEvent::ReturnSettled { .. } => "return_settled",
        }
    }
}
