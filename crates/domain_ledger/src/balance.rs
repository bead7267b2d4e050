//! Balance derivation
//!
//! The balance calculator never serves a cached value as the source of
//! truth: every call walks the raw entries and recomputes
//! Σ(debit) − Σ(credit). The advisory cache on the account exists only for
//! fast UI reads and is reconciled against the derived value here.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use core_kernel::{AccountId, Money};

use crate::entry::{Direction, LedgerEntry, TransactionKind};
use crate::error::LedgerError;
use crate::store::LedgerStore;

/// Maximum tolerated difference between the derived balance and any
/// denormalized view before it counts as drift
pub const DRIFT_TOLERANCE: Decimal = dec!(0.01);

/// Derives a balance from raw entries: Σ(debit) − Σ(credit)
///
/// Marking entries never influence the result. Positive means the account
/// owes money; negative means it holds credit. The function is pure: the
/// same entries always produce the same value.
pub fn derive_balance<'a>(entries: impl IntoIterator<Item = &'a LedgerEntry>) -> Money {
    entries
        .into_iter()
        .filter(|e| e.kind != TransactionKind::Marking)
        .fold(Money::zero(), |acc, e| match e.direction {
            Direction::Debit => acc + e.amount,
            Direction::Credit => acc - e.amount,
        })
}

/// Result of comparing the derived balance against the advisory cache
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Reconciliation {
    pub account_id: AccountId,
    pub derived: Money,
    pub cached: Money,
    pub in_agreement: bool,
}

/// Computes account balances from the ledger store
#[derive(Debug, Clone, Copy)]
pub struct BalanceCalculator<'a> {
    store: &'a LedgerStore,
}

impl<'a> BalanceCalculator<'a> {
    /// Creates a calculator over the given store
    pub fn new(store: &'a LedgerStore) -> Self {
        Self { store }
    }

    /// The authoritative balance for an account
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::UnknownAccount`] if the account is missing
    pub fn balance(&self, account_id: &AccountId) -> Result<Money, LedgerError> {
        let entries = self.store.entries_for(account_id)?;
        Ok(derive_balance(entries.into_iter()))
    }

    /// Credit currently available on the account: `max(0, −balance)`
    pub fn available_credit(&self, account_id: &AccountId) -> Result<Money, LedgerError> {
        let balance = self.balance(account_id)?;
        Ok((-balance).clamp_non_negative())
    }

    /// Compares the derived balance against the advisory cache
    pub fn reconcile(&self, account_id: &AccountId) -> Result<Reconciliation, LedgerError> {
        let derived = self.balance(account_id)?;
        let cached = self
            .store
            .account(account_id)
            .ok_or_else(|| LedgerError::UnknownAccount(account_id.to_string()))?
            .cached_balance;

        Ok(Reconciliation {
            account_id: *account_id,
            derived,
            cached,
            in_agreement: (derived - cached).abs().amount() <= DRIFT_TOLERANCE,
        })
    }
}
