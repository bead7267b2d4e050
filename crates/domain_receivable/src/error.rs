//! Receivable domain errors
//!
//! Writer-side errors abort the enclosing transaction and surface to the
//! caller unmodified; there is no partial-success path. Consistency drift is
//! deliberately not an error variant: the validator self-heals the advisory
//! cache and reports drift through its report and the log.

use thiserror::Error;

use core_kernel::MoneyError;
use domain_ledger::LedgerError;

/// Errors that can occur in the receivable domain
#[derive(Debug, Error)]
pub enum ReceivableError {
    /// Non-positive amount where a positive one is required
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    /// Reference to a nonexistent account
    #[error("Unknown account: {0}")]
    UnknownAccount(String),

    /// Reference to a nonexistent invoice
    #[error("Unknown invoice: {0}")]
    UnknownInvoice(String),

    /// Return against a partially-paid invoice; the caller must resolve the
    /// partial allocation before returning
    #[error("Ambiguous settlement: {0}")]
    AmbiguousSettlement(String),

    /// Attempt to open a transaction while one is already active
    #[error("Transaction conflict: {0}")]
    TransactionConflict(String),

    /// Ledger-side failure
    #[error(transparent)]
    Ledger(#[from] LedgerError),
}

impl ReceivableError {
    /// Maps a money validation failure to `InvalidAmount`
    pub(crate) fn invalid_amount(err: MoneyError) -> Self {
        ReceivableError::InvalidAmount(err.to_string())
    }
}
