//! Receivable engine
//!
//! The engine owns the ledger store and the denormalized aggregates and
//! exposes the three writer operations (invoice creation with credit
//! application, payment allocation, return settlement) plus the read-only
//! query surface. Every writer operation runs inside one [`Txn`]: all
//! ledger appends and denormalized-field updates commit together or not at
//! all.
//!
//! The `*_in` primitives take the open transaction explicitly, so a
//! higher-level operation can compose several primitives into one atomic
//! unit without opening a second, conflicting transaction.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use tracing::{debug, instrument};

use core_kernel::{AccountId, InvoiceId, Money, PaymentId, ReturnId};
use domain_ledger::{
    Account, BalanceCalculator, Direction, EntryDraft, EntryReference, LedgerEntry, MarkingCause,
    TransactionKind,
};

use crate::error::ReceivableError;
use crate::events::ReceivableEvent;
use crate::invoice::Invoice;
use crate::payment::{Payment, PaymentAllocation, PaymentMethod};
use crate::ports::{CashFlowPort, CashOutflow, EventSink, NullCashFlow, NullEventSink, NullStock, StockPort};
use crate::returns::{ReturnRecord, ReturnRequest, SettlementType};
use crate::txn::Txn;
use crate::validator::{ConsistencyReport, ConsistencyValidator};

/// The ledger-derived balance and allocation engine
///
/// Single-writer by design: one logical writer at a time, one open
/// transaction at a time. Reads never hold a write lock and always derive
/// from the committed ledger.
pub struct ReceivableEngine<S = NullStock, C = NullCashFlow, E = NullEventSink>
where
    S: StockPort,
    C: CashFlowPort,
    E: EventSink,
{
    store: domain_ledger::LedgerStore,
    invoices: HashMap<InvoiceId, Invoice>,
    payments: HashMap<PaymentId, Payment>,
    returns: HashMap<ReturnId, ReturnRecord>,
    stock: S,
    cash_flow: C,
    events: E,
    open_txn: Option<AccountId>,
}

impl ReceivableEngine {
    /// Creates an engine with no-op collaborators
    pub fn new() -> Self {
        Self::with_ports(NullStock, NullCashFlow, NullEventSink)
    }
}

impl Default for ReceivableEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl<S, C, E> ReceivableEngine<S, C, E>
where
    S: StockPort,
    C: CashFlowPort,
    E: EventSink,
{
    /// Creates an engine wired to the given collaborators
    pub fn with_ports(stock: S, cash_flow: C, events: E) -> Self {
        Self {
            store: domain_ledger::LedgerStore::new(),
            invoices: HashMap::new(),
            payments: HashMap::new(),
            returns: HashMap::new(),
            stock,
            cash_flow,
            events,
            open_txn: None,
        }
    }

    // ------------------------------------------------------------------
    // Accounts
    // ------------------------------------------------------------------

    /// Registers a new account and returns its id
    pub fn register_account(
        &mut self,
        display_name: impl Into<String>,
    ) -> Result<AccountId, ReceivableError> {
        let account = Account::new(AccountId::new_v7(), display_name);
        let id = account.id;
        self.store.register_account(account)?;
        Ok(id)
    }

    /// Gets an account by id
    pub fn account(&self, id: &AccountId) -> Option<&Account> {
        self.store.account(id)
    }

    // ------------------------------------------------------------------
    // Query surface (read-only)
    // ------------------------------------------------------------------

    /// The authoritative, ledger-derived balance for an account
    pub fn account_balance(&self, id: &AccountId) -> Result<Money, ReceivableError> {
        Ok(BalanceCalculator::new(&self.store).balance(id)?)
    }

    /// Credit currently available on the account
    pub fn available_credit(&self, id: &AccountId) -> Result<Money, ReceivableError> {
        Ok(BalanceCalculator::new(&self.store).available_credit(id)?)
    }

    /// Gets an invoice by id
    pub fn invoice(&self, id: &InvoiceId) -> Option<&Invoice> {
        self.invoices.get(id)
    }

    /// Gets a payment by id
    pub fn payment(&self, id: &PaymentId) -> Option<&Payment> {
        self.payments.get(id)
    }

    /// Gets a settled return by id
    pub fn return_record(&self, id: &ReturnId) -> Option<&ReturnRecord> {
        self.returns.get(id)
    }

    /// All invoices for an account, oldest first (ties broken by id)
    pub fn invoices_for(&self, account_id: &AccountId) -> Vec<&Invoice> {
        let mut list: Vec<&Invoice> = self
            .invoices
            .values()
            .filter(|i| &i.account_id == account_id)
            .collect();
        list.sort_by_key(|i| (i.created_at, i.id));
        list
    }

    /// Ledger entries for an account within an optional occurred-at range
    pub fn ledger_entries(
        &self,
        account_id: &AccountId,
        from: Option<DateTime<Utc>>,
        to: Option<DateTime<Utc>>,
    ) -> Result<Vec<&LedgerEntry>, ReceivableError> {
        Ok(self.store.entries_in_range(account_id, from, to)?)
    }

    /// The stock collaborator
    pub fn stock(&self) -> &S {
        &self.stock
    }

    /// The cash-flow collaborator
    pub fn cash_flow(&self) -> &C {
        &self.cash_flow
    }

    /// The event sink
    pub fn events(&self) -> &E {
        &self.events
    }

    // ------------------------------------------------------------------
    // Transaction boundary
    // ------------------------------------------------------------------

    /// Opens a transaction for an account
    ///
    /// The returned [`Txn`] must be handed back to [`commit`](Self::commit)
    /// or [`rollback`](Self::rollback).
    ///
    /// # Errors
    ///
    /// - [`ReceivableError::TransactionConflict`] if a transaction is open
    /// - [`ReceivableError::UnknownAccount`] if the account is missing
    pub fn begin(&mut self, account_id: AccountId) -> Result<Txn, ReceivableError> {
        if let Some(open) = self.open_txn {
            return Err(ReceivableError::TransactionConflict(format!(
                "a transaction for account {open} is already open"
            )));
        }
        if !self.store.contains_account(&account_id) {
            return Err(ReceivableError::UnknownAccount(account_id.to_string()));
        }
        self.open_txn = Some(account_id);
        Ok(Txn::new(account_id))
    }

    /// Commits a transaction: applies the whole write set, refreshes the
    /// advisory balance cache, then dispatches collaborator calls and
    /// events
    pub fn commit(&mut self, txn: Txn) -> Result<(), ReceivableError> {
        self.open_txn = None;

        let account_id = txn.account_id;
        let balance_touched = txn
            .entries
            .iter()
            .any(|d| d.kind != TransactionKind::Marking);

        // All drafts were validated at staging time, so the appends below
        // cannot fail halfway through the write set.
        for draft in txn.entries {
            self.store.append(draft)?;
        }
        for (id, invoice) in txn.invoices {
            self.invoices.insert(id, invoice);
        }
        for payment in txn.payments {
            self.payments.insert(payment.id, payment);
        }
        for record in txn.returns {
            self.returns.insert(record.id, record);
        }

        // Opportunistic consistency pass; the validator is the sole writer
        // of the advisory cache.
        ConsistencyValidator::new(&mut self.store, &self.invoices).validate(&account_id)?;

        for (product_id, quantity) in txn.stock_restores {
            self.stock.restore_stock(product_id, quantity);
        }
        for outflow in txn.cash_outflows {
            self.cash_flow.record_outgoing(outflow);
        }
        for event in txn.events {
            self.events.publish(event);
        }
        if balance_touched {
            let balance = BalanceCalculator::new(&self.store).balance(&account_id)?;
            self.events.publish(ReceivableEvent::AccountBalanceChanged {
                account_id,
                balance,
                timestamp: Utc::now(),
            });
        }

        Ok(())
    }

    /// Discards a transaction's write set; committed state is untouched
    pub fn rollback(&mut self, txn: Txn) {
        debug!(account_id = %txn.account_id, "Rolling back transaction");
        self.open_txn = None;
    }

    /// Runs `f` inside a fresh transaction, committing on success and
    /// rolling back on error
    fn with_txn<T>(
        &mut self,
        account_id: AccountId,
        f: impl FnOnce(&mut Self, &mut Txn) -> Result<T, ReceivableError>,
    ) -> Result<T, ReceivableError> {
        let mut txn = self.begin(account_id)?;
        match f(self, &mut txn) {
            Ok(value) => {
                self.commit(txn)?;
                Ok(value)
            }
            Err(err) => {
                self.rollback(txn);
                Err(err)
            }
        }
    }

    /// Balance as seen inside a transaction: committed entries plus the
    /// staged, not-yet-committed ones
    fn balance_in_txn(&self, txn: &Txn) -> Result<Money, ReceivableError> {
        let committed = BalanceCalculator::new(&self.store).balance(&txn.account_id)?;
        let staged = txn
            .entries
            .iter()
            .filter(|d| d.kind != TransactionKind::Marking)
            .fold(Money::zero(), |acc, d| match d.direction {
                Direction::Debit => acc + d.amount,
                Direction::Credit => acc - d.amount,
            });
        Ok(committed + staged)
    }

    /// Outstanding invoices for the account, merged with the transaction's
    /// staged view, oldest-created first with invoice id as tiebreak
    fn outstanding_invoices(&self, txn: &Txn, account_id: &AccountId) -> Vec<Invoice> {
        let mut merged: HashMap<InvoiceId, &Invoice> = self
            .invoices
            .iter()
            .filter(|(_, inv)| &inv.account_id == account_id)
            .map(|(id, inv)| (*id, inv))
            .collect();
        for (id, inv) in &txn.invoices {
            if &inv.account_id == account_id {
                merged.insert(*id, inv);
            }
        }

        let mut list: Vec<Invoice> = merged
            .into_values()
            .filter(|i| i.is_outstanding())
            .cloned()
            .collect();
        // FIFO: oldest debt is paid first, deterministically
        list.sort_by_key(|i| (i.created_at, i.id));
        list
    }

    // ------------------------------------------------------------------
    // Invoice creation with credit application
    // ------------------------------------------------------------------

    /// Creates an invoice, netting any pre-existing account credit against
    /// it and optionally recording a simultaneous cash payment
    #[instrument(skip(self), fields(account_id = %account_id))]
    pub fn create_invoice(
        &mut self,
        account_id: AccountId,
        grand_total: Money,
        upfront_cash: Money,
    ) -> Result<Invoice, ReceivableError> {
        self.with_txn(account_id, |engine, txn| {
            engine.create_invoice_in(txn, grand_total, upfront_cash)
        })
    }

    /// Invoice-creation primitive running inside an open transaction
    ///
    /// The account's pre-existing credit is netted by pure arithmetic: the
    /// single invoice debit entry lands on a balance that already encodes
    /// credit as a negative value, so no synthetic offsetting entry is
    /// needed. `credit_used` is computed from the balance at write time and
    /// stored as display metadata on the entry description only.
    pub fn create_invoice_in(
        &self,
        txn: &mut Txn,
        grand_total: Money,
        upfront_cash: Money,
    ) -> Result<Invoice, ReceivableError> {
        let account_id = txn.account_id();
        let grand_total = grand_total
            .require_positive()
            .map_err(ReceivableError::invalid_amount)?;
        let upfront_cash = upfront_cash
            .require_non_negative()
            .map_err(ReceivableError::invalid_amount)?;

        let balance_before = self.balance_in_txn(txn)?;
        let credit_used = grand_total.min((-balance_before).clamp_non_negative());
        let invoice_id = InvoiceId::new_v7();

        let description = if credit_used.is_positive() {
            format!("Invoice {invoice_id} (credit used: {credit_used})")
        } else {
            format!("Invoice {invoice_id}")
        };
        txn.stage_entry(
            EntryDraft::debit(account_id, TransactionKind::Invoice, grand_total)
                .with_description(description)
                .with_reference(EntryReference::Invoice(invoice_id)),
        )?;

        if upfront_cash.is_positive() {
            txn.stage_entry(
                EntryDraft::credit(account_id, TransactionKind::Payment, upfront_cash)
                    .with_description(format!("Upfront cash on invoice {invoice_id}"))
                    .with_reference(EntryReference::Invoice(invoice_id)),
            )?;
        }

        let mut invoice = Invoice::new(invoice_id, account_id, grand_total);
        let applied = credit_used + upfront_cash;
        if applied.is_positive() {
            // Clamped to the grand total inside the invoice; any excess
            // stays on the account ledger as credit.
            invoice.apply_payment(applied);
        }

        debug!(
            invoice_id = %invoice_id,
            grand_total = %grand_total,
            credit_used = %credit_used,
            upfront_cash = %upfront_cash,
            "Creating invoice"
        );

        txn.stage_event(ReceivableEvent::InvoiceUpdated {
            invoice_id,
            account_id,
            remaining_balance: invoice.remaining_balance,
            status: invoice.status,
            timestamp: Utc::now(),
        });
        txn.stage_invoice(invoice.clone());

        Ok(invoice)
    }

    // ------------------------------------------------------------------
    // Payment allocation
    // ------------------------------------------------------------------

    /// Records an incoming payment and distributes it across outstanding
    /// invoices, oldest first
    #[instrument(skip(self), fields(account_id = %account_id, amount = %amount))]
    pub fn allocate_payment(
        &mut self,
        account_id: AccountId,
        amount: Money,
        method: PaymentMethod,
    ) -> Result<Payment, ReceivableError> {
        self.with_txn(account_id, |engine, txn| {
            engine.allocate_payment_in(txn, amount, method)
        })
    }

    /// Payment-allocation primitive running inside an open transaction
    ///
    /// One credit entry for the full amount is the sole entry that moves
    /// the balance; per-invoice markings carry the audit trail. Whatever is
    /// left after the oldest-first pass stays as residual credit, which is
    /// exactly the running balance going negative.
    pub fn allocate_payment_in(
        &self,
        txn: &mut Txn,
        amount: Money,
        method: PaymentMethod,
    ) -> Result<Payment, ReceivableError> {
        let account_id = txn.account_id();
        let amount = amount
            .require_positive()
            .map_err(ReceivableError::invalid_amount)?;

        let payment_id = PaymentId::new_v7();
        txn.stage_entry(
            EntryDraft::credit(account_id, TransactionKind::Payment, amount)
                .with_description(format!("Payment {payment_id} received"))
                .with_reference(EntryReference::Payment(payment_id)),
        )?;

        let mut amount_remaining = amount;
        let mut allocations = Vec::new();

        for mut invoice in self.outstanding_invoices(txn, &account_id) {
            if !amount_remaining.is_positive() {
                break;
            }
            let apply = invoice.remaining_balance.min(amount_remaining);
            if !apply.is_positive() {
                continue;
            }

            invoice.apply_payment(apply);
            amount_remaining -= apply;

            let annotation = if invoice.is_outstanding() {
                format!("Payment {payment_id} applied {apply} to invoice {}", invoice.id)
            } else {
                format!("Payment {payment_id} fully settled invoice {}", invoice.id)
            };
            txn.stage_entry(
                EntryDraft::marking(account_id, invoice.id, MarkingCause::Payment(payment_id))
                    .with_description(annotation),
            )?;
            txn.stage_event(ReceivableEvent::InvoiceUpdated {
                invoice_id: invoice.id,
                account_id,
                remaining_balance: invoice.remaining_balance,
                status: invoice.status,
                timestamp: Utc::now(),
            });

            allocations.push(PaymentAllocation {
                invoice_id: invoice.id,
                amount_applied: apply,
            });
            txn.stage_invoice(invoice);
        }

        debug!(
            payment_id = %payment_id,
            amount = %amount,
            allocated = allocations.len(),
            residual = %amount_remaining,
            "Allocated payment"
        );

        let payment = Payment {
            id: payment_id,
            account_id,
            amount,
            method,
            allocations,
            residual_credit: amount_remaining,
            created_at: Utc::now(),
        };
        txn.stage_event(ReceivableEvent::PaymentRecorded {
            payment_id,
            account_id,
            amount,
            residual_credit: payment.residual_credit,
            timestamp: Utc::now(),
        });
        txn.stage_payment(payment.clone());

        Ok(payment)
    }

    // ------------------------------------------------------------------
    // Return settlement
    // ------------------------------------------------------------------

    /// Settles a return against its invoice
    #[instrument(skip(self, request), fields(invoice_id = %request.invoice_id))]
    pub fn settle_return(
        &mut self,
        request: ReturnRequest,
    ) -> Result<ReturnRecord, ReceivableError> {
        let account_id = self
            .invoices
            .get(&request.invoice_id)
            .ok_or_else(|| ReceivableError::UnknownInvoice(request.invoice_id.to_string()))?
            .account_id;
        self.with_txn(account_id, |engine, txn| {
            engine.settle_return_in(txn, request)
        })
    }

    /// Return-settlement primitive running inside an open transaction
    ///
    /// `ledger_credit` credits the account exactly as a payment would;
    /// `cash_refund` never touches the account ledger and routes an
    /// outgoing-cash record to the daily-cash collaborator instead.
    pub fn settle_return_in(
        &self,
        txn: &mut Txn,
        request: ReturnRequest,
    ) -> Result<ReturnRecord, ReceivableError> {
        let account_id = txn.account_id();
        let amount = request
            .amount
            .require_positive()
            .map_err(ReceivableError::invalid_amount)?;

        let mut invoice = match txn.staged_invoice(&request.invoice_id) {
            Some(staged) => staged.clone(),
            None => self
                .invoices
                .get(&request.invoice_id)
                .cloned()
                .ok_or_else(|| ReceivableError::UnknownInvoice(request.invoice_id.to_string()))?,
        };
        if invoice.account_id != account_id {
            return Err(ReceivableError::TransactionConflict(format!(
                "invoice {} belongs to account {}, not to the transaction's account {}",
                invoice.id, invoice.account_id, account_id
            )));
        }

        // The allocation of a partial payment across specific line items is
        // undefined; the caller must resolve it before returning.
        if invoice.is_partially_paid() {
            return Err(ReceivableError::AmbiguousSettlement(format!(
                "invoice {} is partially paid",
                invoice.id
            )));
        }
        if amount > invoice.effective_total() {
            return Err(ReceivableError::InvalidAmount(format!(
                "return of {amount} exceeds remaining effective total {} of invoice {}",
                invoice.effective_total(),
                invoice.id
            )));
        }

        let return_id = ReturnId::new_v7();
        match request.settlement_type {
            SettlementType::LedgerCredit => {
                txn.stage_entry(
                    EntryDraft::credit(account_id, TransactionKind::Return, amount)
                        .with_description(format!(
                            "Return {return_id} credited for invoice {}",
                            invoice.id
                        ))
                        .with_reference(EntryReference::Return(return_id)),
                )?;
                txn.stage_entry(
                    EntryDraft::marking(account_id, invoice.id, MarkingCause::Return(return_id))
                        .with_description(format!(
                            "Return {return_id} settled against invoice {}",
                            invoice.id
                        )),
                )?;
            }
            SettlementType::CashRefund => {
                // Cash changed hands outside the account relationship; any
                // account-ledger entry here would double-account.
                txn.stage_cash_outflow(CashOutflow {
                    amount,
                    reference: return_id,
                });
            }
        }

        invoice.apply_return(amount);
        for item in &request.items {
            txn.stage_stock_restore(item.product_id, item.quantity);
        }

        debug!(
            return_id = %return_id,
            invoice_id = %invoice.id,
            settlement = ?request.settlement_type,
            amount = %amount,
            "Settling return"
        );

        txn.stage_event(ReceivableEvent::InvoiceUpdated {
            invoice_id: invoice.id,
            account_id,
            remaining_balance: invoice.remaining_balance,
            status: invoice.status,
            timestamp: Utc::now(),
        });
        txn.stage_event(ReceivableEvent::ReturnSettled {
            return_id,
            invoice_id: invoice.id,
            settlement_type: request.settlement_type,
            amount,
            timestamp: Utc::now(),
        });

        let record = ReturnRecord {
            id: return_id,
            invoice_id: invoice.id,
            account_id,
            items: request.items,
            amount,
            settlement_type: request.settlement_type,
            settled_at: Utc::now(),
        };
        txn.stage_invoice(invoice);
        txn.stage_return(record.clone());

        Ok(record)
    }

    // ------------------------------------------------------------------
    // Consistency validation
    // ------------------------------------------------------------------

    /// Validates an account's denormalized views against the ledger,
    /// healing the advisory cache if it drifted
    #[instrument(skip(self), fields(account_id = %account_id))]
    pub fn validate_account(
        &mut self,
        account_id: &AccountId,
    ) -> Result<ConsistencyReport, ReceivableError> {
        Ok(ConsistencyValidator::new(&mut self.store, &self.invoices).validate(account_id)?)
    }
}
