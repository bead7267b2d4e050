//! Ledger entry types
//!
//! Entries are immutable once appended. The sign of an entry's effect on
//! the account balance is carried entirely by its [`Direction`]; the amount
//! itself is always non-negative.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use core_kernel::{AccountId, InvoiceId, LedgerEntryId, Money, PaymentId, ReturnId};

use crate::error::LedgerError;

/// Whether an entry increases or decreases what the account owes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    /// Increases the amount owed
    Debit,
    /// Decreases the amount owed (or increases credit)
    Credit,
}

/// The kind of business transaction an entry records
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionKind {
    /// Invoice issued against the account (debit)
    Invoice,
    /// Incoming payment (credit)
    Payment,
    /// Return settled as account credit (credit)
    Return,
    /// Manual or reversal correction (either direction)
    Adjustment,
    /// Zero-amount audit annotation; never affects the balance
    Marking,
}

/// What caused a marking annotation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MarkingCause {
    Payment(PaymentId),
    Return(ReturnId),
}

/// Reference from an entry to its originating domain object
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryReference {
    Invoice(InvoiceId),
    Payment(PaymentId),
    Return(ReturnId),
    /// Marking entries reference the invoice they annotate and the payment
    /// or return that caused the annotation
    Marking {
        invoice_id: InvoiceId,
        caused_by: MarkingCause,
    },
}

/// An immutable ledger entry
///
/// # Invariants
///
/// - `amount >= 0`
/// - `kind == Marking` implies `amount == 0` and a `Marking` reference
/// - `(occurred_at, seq)` gives a total, deterministic order; `seq` is the
///   store-assigned insertion sequence, so entries for the same logical
///   moment still order deterministically
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LedgerEntry {
    /// Unique identifier
    pub id: LedgerEntryId,
    /// Account this entry belongs to
    pub account_id: AccountId,
    /// Debit or credit
    pub direction: Direction,
    /// Business transaction kind
    pub kind: TransactionKind,
    /// Non-negative amount
    pub amount: Money,
    /// Human-readable description (may carry display metadata such as
    /// "credit used" annotations computed at write time)
    pub description: String,
    /// Originating domain object, if any
    pub reference: Option<EntryReference>,
    /// When the business event happened
    pub occurred_at: DateTime<Utc>,
    /// Store-assigned monotonic insertion sequence
    pub seq: u64,
    /// When the entry was appended
    pub created_at: DateTime<Utc>,
}

/// A not-yet-appended entry
///
/// Drafts are built with the `debit`/`credit` constructors and validated by
/// the store on append.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntryDraft {
    pub account_id: AccountId,
    pub direction: Direction,
    pub kind: TransactionKind,
    pub amount: Money,
    pub description: String,
    pub reference: Option<EntryReference>,
    pub occurred_at: Option<DateTime<Utc>>,
}

impl EntryDraft {
    /// Creates a new debit draft
    pub fn debit(account_id: AccountId, kind: TransactionKind, amount: Money) -> Self {
        Self {
            account_id,
            direction: Direction::Debit,
            kind,
            amount,
            description: String::new(),
            reference: None,
            occurred_at: None,
        }
    }

    /// Creates a new credit draft
    pub fn credit(account_id: AccountId, kind: TransactionKind, amount: Money) -> Self {
        Self {
            account_id,
            direction: Direction::Credit,
            kind,
            amount,
            description: String::new(),
            reference: None,
            occurred_at: None,
        }
    }

    /// Creates a zero-amount marking draft annotating an invoice
    pub fn marking(account_id: AccountId, invoice_id: InvoiceId, caused_by: MarkingCause) -> Self {
        Self {
            account_id,
            direction: Direction::Credit,
            kind: TransactionKind::Marking,
            amount: Money::zero(),
            description: String::new(),
            reference: Some(EntryReference::Marking {
                invoice_id,
                caused_by,
            }),
            occurred_at: None,
        }
    }

    /// Sets the description
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Sets the originating-object reference
    pub fn with_reference(mut self, reference: EntryReference) -> Self {
        self.reference = Some(reference);
        self
    }

    /// Sets when the business event happened (defaults to append time)
    pub fn occurred_at(mut self, at: DateTime<Utc>) -> Self {
        self.occurred_at = Some(at);
        self
    }

    /// Validates amount and direction/kind combinations
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::InvalidEntry`] on:
    /// - negative amount
    /// - marking entry with non-zero amount or without a marking reference
    /// - invoice entry that is not a debit
    /// - payment or return entry that is not a credit
    pub fn validate(&self) -> Result<(), LedgerError> {
        if self.amount.is_negative() {
            return Err(LedgerError::InvalidEntry(format!(
                "entry amount must be non-negative, got {}",
                self.amount
            )));
        }

        match (self.kind, self.direction) {
            (TransactionKind::Marking, _) => {
                if !self.amount.is_zero() {
                    return Err(LedgerError::InvalidEntry(format!(
                        "marking entries must have zero amount, got {}",
                        self.amount
                    )));
                }
                if !matches!(self.reference, Some(EntryReference::Marking { .. })) {
                    return Err(LedgerError::InvalidEntry(
                        "marking entries must reference the invoice they annotate".to_string(),
                    ));
                }
            }
            (TransactionKind::Invoice, Direction::Credit) => {
                return Err(LedgerError::InvalidEntry(
                    "invoice entries must be debits; use an adjustment to correct".to_string(),
                ));
            }
            (TransactionKind::Payment, Direction::Debit)
            | (TransactionKind::Return, Direction::Debit) => {
                return Err(LedgerError::InvalidEntry(
                    "payment and return entries must be credits; use an adjustment to correct"
                        .to_string(),
                ));
            }
            _ => {}
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_debit_draft_validates() {
        let draft = EntryDraft::debit(
            AccountId::new_v7(),
            TransactionKind::Invoice,
            Money::new(dec!(100)),
        );
        assert!(draft.validate().is_ok());
    }

    #[test]
    fn test_negative_amount_rejected() {
        let draft = EntryDraft::credit(
            AccountId::new_v7(),
            TransactionKind::Payment,
            Money::new(dec!(-1)),
        );
        assert!(matches!(draft.validate(), Err(LedgerError::InvalidEntry(_))));
    }

    #[test]
    fn test_marking_with_amount_rejected() {
        let mut draft = EntryDraft::marking(
            AccountId::new_v7(),
            InvoiceId::new_v7(),
            MarkingCause::Payment(PaymentId::new_v7()),
        );
        draft.amount = Money::new(dec!(0.01));
        assert!(matches!(draft.validate(), Err(LedgerError::InvalidEntry(_))));
    }

    #[test]
    fn test_marking_without_reference_rejected() {
        let mut draft = EntryDraft::marking(
            AccountId::new_v7(),
            InvoiceId::new_v7(),
            MarkingCause::Payment(PaymentId::new_v7()),
        );
        draft.reference = None;
        assert!(matches!(draft.validate(), Err(LedgerError::InvalidEntry(_))));
    }

    #[test]
    fn test_invoice_credit_rejected() {
        let draft = EntryDraft::credit(
            AccountId::new_v7(),
            TransactionKind::Invoice,
            Money::new(dec!(10)),
        );
        assert!(matches!(draft.validate(), Err(LedgerError::InvalidEntry(_))));
    }

    #[test]
    fn test_payment_debit_rejected() {
        let draft = EntryDraft::debit(
            AccountId::new_v7(),
            TransactionKind::Payment,
            Money::new(dec!(10)),
        );
        assert!(matches!(draft.validate(), Err(LedgerError::InvalidEntry(_))));
    }

    #[test]
    fn test_adjustment_allows_both_directions() {
        let account_id = AccountId::new_v7();
        let debit =
            EntryDraft::debit(account_id, TransactionKind::Adjustment, Money::new(dec!(5)));
        let credit =
            EntryDraft::credit(account_id, TransactionKind::Adjustment, Money::new(dec!(5)));
        assert!(debit.validate().is_ok());
        assert!(credit.validate().is_ok());
    }
}
