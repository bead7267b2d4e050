//! Consistency validation
//!
//! The ledger is the single source of truth; the advisory balance cache and
//! the invoices' denormalized fields are views that can drift. The validator
//! recomputes every view from the ledger, reports anything off by more than
//! the drift tolerance, and heals the cache. It is the sole writer of the
//! cache and never touches the ledger itself.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, warn};

use core_kernel::{AccountId, InvoiceId, Money};
use domain_ledger::{
    debit_credit_totals, BalanceCalculator, LedgerError, LedgerStore, DRIFT_TOLERANCE,
};

use crate::invoice::Invoice;

/// A single inconsistency found between the ledger and a derived view
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Discrepancy {
    /// The advisory cache disagreed with the derived balance; the cache has
    /// been overwritten with the derived value
    CachedBalanceDrift { cached: Money, derived: Money },

    /// The sum of outstanding invoice balances, net of available credit,
    /// disagrees with the ledger-derived balance
    InvoiceViewMismatch { expected: Money, actual: Money },

    /// An invoice's stored remaining balance disagrees with the value
    /// recomputed from its own cumulative fields
    RemainingBalanceMismatch {
        invoice_id: InvoiceId,
        stored: Money,
        recomputed: Money,
    },
}

/// The outcome of one validation pass over an account
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsistencyReport {
    pub account_id: AccountId,
    /// Balance derived from the ledger, the authoritative figure
    pub ledger_balance: Money,
    /// Total of debit entries (markings excluded)
    pub debit_total: Money,
    /// Total of credit entries (markings excluded)
    pub credit_total: Money,
    /// Cache value as found before any healing
    pub cached_balance: Money,
    /// Sum of remaining balances over the account's outstanding invoices
    pub invoice_sum: Money,
    /// Credit available on the account
    pub available_credit: Money,
    pub discrepancies: Vec<Discrepancy>,
}

impl ConsistencyReport {
    /// True when every view agreed with the ledger within tolerance
    pub fn is_consistent(&self) -> bool {
        self.discrepancies.is_empty()
    }
}

/// Recomputes derived views from the ledger and heals the advisory cache
pub struct ConsistencyValidator<'a> {
    store: &'a mut LedgerStore,
    invoices: &'a HashMap<InvoiceId, Invoice>,
}

impl<'a> ConsistencyValidator<'a> {
    pub fn new(store: &'a mut LedgerStore, invoices: &'a HashMap<InvoiceId, Invoice>) -> Self {
        Self { store, invoices }
    }

    /// Runs one validation pass for an account
    ///
    /// Reads only committed state, so it is safe to run at any point between
    /// transactions; a second pass with no intervening write finds nothing
    /// left to heal.
    #[instrument(skip(self), fields(account_id = %account_id))]
    pub fn validate(&mut self, account_id: &AccountId) -> Result<ConsistencyReport, LedgerError> {
        let ledger_balance = BalanceCalculator::new(self.store).balance(account_id)?;
        let (debit_total, credit_total) = debit_credit_totals(&self.store.entries_for(account_id)?);
        let available_credit = (-ledger_balance).clamp_non_negative();
        let cached_balance = self
            .store
            .account(account_id)
            .map(|a| a.cached_balance)
            .ok_or_else(|| LedgerError::UnknownAccount(account_id.to_string()))?;

        let mut discrepancies = Vec::new();

        let account_invoices: Vec<&Invoice> = self
            .invoices
            .values()
            .filter(|i| &i.account_id == account_id)
            .collect();

        let invoice_sum: Money = account_invoices
            .iter()
            .filter(|i| i.is_outstanding())
            .map(|i| i.remaining_balance)
            .sum();

        for invoice in &account_invoices {
            let recomputed = (invoice.grand_total
                - invoice.cumulative_returns_applied
                - invoice.cumulative_payments_applied)
                .clamp_non_negative();
            if recomputed != invoice.remaining_balance {
                warn!(
                    invoice_id = %invoice.id,
                    stored = %invoice.remaining_balance,
                    recomputed = %recomputed,
                    "Invoice remaining balance disagrees with its cumulative fields"
                );
                discrepancies.push(Discrepancy::RemainingBalanceMismatch {
                    invoice_id: invoice.id,
                    stored: invoice.remaining_balance,
                    recomputed,
                });
            }
        }

        // Outstanding debt minus available credit must equal the ledger
        // balance exactly; the tolerance only absorbs rounding on the
        // comparison.
        let expected = invoice_sum - available_credit;
        if exceeds_tolerance(expected, ledger_balance) {
            warn!(
                expected = %expected,
                actual = %ledger_balance,
                "Invoice view disagrees with ledger-derived balance"
            );
            discrepancies.push(Discrepancy::InvoiceViewMismatch {
                expected,
                actual: ledger_balance,
            });
        }

        if exceeds_tolerance(cached_balance, ledger_balance) {
            // Expected after any committed write; the cache is advisory and
            // this pass is the only thing that refreshes it.
            debug!(
                cached = %cached_balance,
                derived = %ledger_balance,
                "Healing advisory balance cache"
            );
            discrepancies.push(Discrepancy::CachedBalanceDrift {
                cached: cached_balance,
                derived: ledger_balance,
            });
            if let Some(account) = self.store.account_mut(account_id) {
                account.cached_balance = ledger_balance;
            }
        }

        Ok(ConsistencyReport {
            account_id: *account_id,
            ledger_balance,
            debit_total,
            credit_total,
            cached_balance,
            invoice_sum,
            available_credit,
            discrepancies,
        })
    }
}

fn exceeds_tolerance(a: Money, b: Money) -> bool {
    (a - b).abs().amount() > DRIFT_TOLERANCE
}
