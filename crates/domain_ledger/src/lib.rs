//! Ledger Domain - Append-Only Account Ledger
//!
//! This crate implements the authoritative side of the receivable engine:
//! an append-only store of debit/credit entries per account, and a balance
//! calculator that always derives the balance from raw entries rather than
//! trusting any cached value.
//!
//! # Core rules
//!
//! - Entries are immutable; corrections are new, auditable reversal entries
//! - Entry amounts are non-negative; the effect on the balance is determined
//!   solely by the entry direction
//! - Zero-amount `marking` entries annotate which invoice a payment or
//!   return touched and never participate in balance arithmetic
//! - Balance = Σ(debit amounts) − Σ(credit amounts); positive means the
//!   account owes money, negative means it holds credit

pub mod account;
pub mod balance;
pub mod entry;
pub mod error;
pub mod store;

pub use account::Account;
pub use balance::{derive_balance, BalanceCalculator, Reconciliation, DRIFT_TOLERANCE};
pub use entry::{Direction, EntryDraft, EntryReference, LedgerEntry, MarkingCause, TransactionKind};
pub use error::LedgerError;
pub use store::{debit_credit_totals, LedgerStore};
