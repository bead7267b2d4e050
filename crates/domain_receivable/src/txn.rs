//! Transaction boundary
//!
//! Every multi-step operation runs inside one [`Txn`]: a staged write set
//! that either commits as a whole or is discarded. The `Txn` value doubles
//! as an explicit transaction token: primitives take `&mut Txn`, so a
//! higher-level operation that already holds the open transaction passes it
//! down instead of opening a second, conflicting one.
//! The engine tracks the open transaction and fails fast with
//! `TransactionConflict` on a nested begin.

use std::collections::HashMap;

use core_kernel::{AccountId, InvoiceId, ProductId};
use domain_ledger::EntryDraft;

use crate::error::ReceivableError;
use crate::events::ReceivableEvent;
use crate::invoice::Invoice;
use crate::payment::Payment;
use crate::ports::CashOutflow;
use crate::returns::ReturnRecord;

/// A staged write set for one account
///
/// Nothing in the write set is visible outside the transaction until the
/// engine commits it. Collaborator calls (stock restores, cash outflows)
/// and events are staged too and dispatched only after the commit applies.
#[derive(Debug)]
pub struct Txn {
    pub(crate) account_id: AccountId,
    pub(crate) entries: Vec<EntryDraft>,
    pub(crate) invoices: HashMap<InvoiceId, Invoice>,
    pub(crate) payments: Vec<Payment>,
    pub(crate) returns: Vec<ReturnRecord>,
    pub(crate) stock_restores: Vec<(ProductId, u32)>,
    pub(crate) cash_outflows: Vec<CashOutflow>,
    pub(crate) events: Vec<ReceivableEvent>,
}

impl Txn {
    pub(crate) fn new(account_id: AccountId) -> Self {
        Self {
            account_id,
            entries: Vec::new(),
            invoices: HashMap::new(),
            payments: Vec::new(),
            returns: Vec::new(),
            stock_restores: Vec::new(),
            cash_outflows: Vec::new(),
            events: Vec::new(),
        }
    }

    /// The account this transaction is scoped to
    pub fn account_id(&self) -> AccountId {
        self.account_id
    }

    /// Stages a ledger append; the draft is validated up front so a commit
    /// cannot fail halfway through applying the write set
    pub(crate) fn stage_entry(&mut self, draft: EntryDraft) -> Result<(), ReceivableError> {
        if draft.account_id != self.account_id {
            return Err(ReceivableError::TransactionConflict(format!(
                "entry for account {} staged in a transaction scoped to {}",
                draft.account_id, self.account_id
            )));
        }
        draft.validate().map_err(ReceivableError::Ledger)?;
        self.entries.push(draft);
        Ok(())
    }

    /// Stages an invoice upsert (read-your-writes within the transaction)
    pub(crate) fn stage_invoice(&mut self, invoice: Invoice) {
        self.invoices.insert(invoice.id, invoice);
    }

    /// Returns a staged invoice, if this transaction touched it
    pub(crate) fn staged_invoice(&self, id: &InvoiceId) -> Option<&Invoice> {
        self.invoices.get(id)
    }

    /// Stages a payment record
    pub(crate) fn stage_payment(&mut self, payment: Payment) {
        self.payments.push(payment);
    }

    /// Stages a settled-return record
    pub(crate) fn stage_return(&mut self, record: ReturnRecord) {
        self.returns.push(record);
    }

    /// Stages a stock restore, dispatched after commit
    pub(crate) fn stage_stock_restore(&mut self, product_id: ProductId, quantity: u32) {
        self.stock_restores.push((product_id, quantity));
    }

    /// Stages an outgoing cash movement, dispatched after commit
    pub(crate) fn stage_cash_outflow(&mut self, outflow: CashOutflow) {
        self.cash_outflows.push(outflow);
    }

    /// Stages an event, published after commit
    pub(crate) fn stage_event(&mut self, event: ReceivableEvent) {
        self.events.push(event);
    }
}
