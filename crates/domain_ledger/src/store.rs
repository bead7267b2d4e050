//! Append-only ledger store
//!
//! The store owns the account registry and the entry log. Entries are never
//! updated or deleted; the only correction mechanism is an explicit,
//! auditable reversal entry.

use std::collections::HashMap;

use chrono::Utc;
use tracing::debug;

use core_kernel::{AccountId, LedgerEntryId, Money};

use crate::account::Account;
use crate::entry::{Direction, EntryDraft, LedgerEntry, TransactionKind};
use crate::error::LedgerError;

/// Append-only storage of ledger entries per account
///
/// # Invariants
///
/// - Appended entries are immutable
/// - `seq` increases monotonically with insertion order
/// - `entries_for` returns a deterministic order: `occurred_at` first,
///   insertion sequence as tiebreak (never wall-clock alone)
#[derive(Debug, Default)]
pub struct LedgerStore {
    /// Registered accounts
    accounts: HashMap<AccountId, Account>,
    /// The entry log, in insertion order
    entries: Vec<LedgerEntry>,
}

impl LedgerStore {
    /// Creates an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers an account
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::AccountAlreadyExists`] if the id is taken
    pub fn register_account(&mut self, account: Account) -> Result<(), LedgerError> {
        if self.accounts.contains_key(&account.id) {
            return Err(LedgerError::AccountAlreadyExists(account.id.to_string()));
        }
        debug!(account_id = %account.id, name = %account.display_name, "Registering account");
        self.accounts.insert(account.id, account);
        Ok(())
    }

    /// Gets an account by id
    pub fn account(&self, id: &AccountId) -> Option<&Account> {
        self.accounts.get(id)
    }

    /// Gets a mutable account by id
    ///
    /// Only the consistency validator should touch `cached_balance`.
    pub fn account_mut(&mut self, id: &AccountId) -> Option<&mut Account> {
        self.accounts.get_mut(id)
    }

    /// Returns true if the account is registered
    pub fn contains_account(&self, id: &AccountId) -> bool {
        self.accounts.contains_key(id)
    }

    /// Iterates over all registered accounts
    pub fn accounts(&self) -> impl Iterator<Item = &Account> {
        self.accounts.values()
    }

    /// Appends an entry to the log
    ///
    /// # Errors
    ///
    /// - [`LedgerError::InvalidEntry`] if the draft fails validation
    /// - [`LedgerError::UnknownAccount`] if the account is not registered
    pub fn append(&mut self, draft: EntryDraft) -> Result<LedgerEntryId, LedgerError> {
        draft.validate()?;

        if !self.accounts.contains_key(&draft.account_id) {
            return Err(LedgerError::UnknownAccount(draft.account_id.to_string()));
        }

        let now = Utc::now();
        let entry = LedgerEntry {
            id: LedgerEntryId::new_v7(),
            account_id: draft.account_id,
            direction: draft.direction,
            kind: draft.kind,
            amount: draft.amount,
            description: draft.description,
            reference: draft.reference,
            occurred_at: draft.occurred_at.unwrap_or(now),
            seq: self.entries.len() as u64,
            created_at: now,
        };
        let id = entry.id;

        debug!(
            entry_id = %id,
            account_id = %entry.account_id,
            kind = ?entry.kind,
            direction = ?entry.direction,
            amount = %entry.amount,
            "Appending ledger entry"
        );

        self.entries.push(entry);
        Ok(id)
    }

    /// Appends a reversal of a previous entry
    ///
    /// The reversal mirrors the original amount with the opposite direction,
    /// recorded as an adjustment so the original entry stays untouched.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::EntryNotFound`] if the target does not exist,
    /// or [`LedgerError::InvalidEntry`] when reversing a marking entry
    pub fn append_reversal(
        &mut self,
        entry_id: &LedgerEntryId,
        reason: &str,
    ) -> Result<LedgerEntryId, LedgerError> {
        let original = self
            .entries
            .iter()
            .find(|e| &e.id == entry_id)
            .ok_or_else(|| LedgerError::EntryNotFound(entry_id.to_string()))?;

        if original.kind == TransactionKind::Marking {
            return Err(LedgerError::InvalidEntry(
                "marking entries carry no amount and cannot be reversed".to_string(),
            ));
        }

        let draft = match original.direction {
            Direction::Debit => EntryDraft::credit(
                original.account_id,
                TransactionKind::Adjustment,
                original.amount,
            ),
            Direction::Credit => EntryDraft::debit(
                original.account_id,
                TransactionKind::Adjustment,
                original.amount,
            ),
        };
        let draft = draft.with_description(format!("Reversal of {}: {}", entry_id, reason));
        let draft = match original.reference {
            Some(reference) => draft.with_reference(reference),
            None => draft,
        };

        self.append(draft)
    }

    /// Returns all entries for an account, ordered by `(occurred_at, seq)`
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::UnknownAccount`] if the account is missing
    pub fn entries_for(&self, account_id: &AccountId) -> Result<Vec<&LedgerEntry>, LedgerError> {
        if !self.accounts.contains_key(account_id) {
            return Err(LedgerError::UnknownAccount(account_id.to_string()));
        }

        let mut entries: Vec<&LedgerEntry> = self
            .entries
            .iter()
            .filter(|e| &e.account_id == account_id)
            .collect();
        entries.sort_by_key(|e| (e.occurred_at, e.seq));
        Ok(entries)
    }

    /// Returns entries for an account within an optional occurred-at range
    pub fn entries_in_range(
        &self,
        account_id: &AccountId,
        from: Option<chrono::DateTime<Utc>>,
        to: Option<chrono::DateTime<Utc>>,
    ) -> Result<Vec<&LedgerEntry>, LedgerError> {
        let entries = self.entries_for(account_id)?;
        Ok(entries
            .into_iter()
            .filter(|e| from.map_or(true, |f| e.occurred_at >= f))
            .filter(|e| to.map_or(true, |t| e.occurred_at <= t))
            .collect())
    }

    /// Looks up a single entry by id
    pub fn entry(&self, id: &LedgerEntryId) -> Option<&LedgerEntry> {
        self.entries.iter().find(|e| &e.id == id)
    }

    /// Total number of appended entries (all accounts)
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if no entries have been appended
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Convenience: sums debit and credit totals for an account
///
/// Marking entries are excluded even though their amount is zero, so the
/// totals reflect business entries only.
pub fn debit_credit_totals(entries: &[&LedgerEntry]) -> (Money, Money) {
    let mut debits = Money::zero();
    let mut credits = Money::zero();
    for entry in entries {
        if entry.kind == TransactionKind::Marking {
            continue;
        }
        match entry.direction {
            Direction::Debit => debits += entry.amount,
            Direction::Credit => credits += entry.amount,
        }
    }
    (debits, credits)
}
