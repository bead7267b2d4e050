//! Ledger domain errors

use thiserror::Error;

use core_kernel::MoneyError;

/// Errors that can occur in the ledger domain
#[derive(Debug, Error)]
pub enum LedgerError {
    /// Malformed ledger write (negative amount, invalid direction/kind
    /// combination, marking entry with a non-zero amount, ...)
    #[error("Invalid entry: {0}")]
    InvalidEntry(String),

    /// Reference to a nonexistent account
    #[error("Unknown account: {0}")]
    UnknownAccount(String),

    /// Account already registered
    #[error("Account already exists: {0}")]
    AccountAlreadyExists(String),

    /// Ledger entry not found (reversal target)
    #[error("Ledger entry not found: {0}")]
    EntryNotFound(String),

    /// Money validation failure
    #[error("Money error: {0}")]
    Money(#[from] MoneyError),
}
