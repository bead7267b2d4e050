//! Receivable domain: invoices, payments, returns and the engine that keeps
//! them consistent with the account ledger
//!
//! The ledger (see `domain_ledger`) is the single source of truth; this
//! crate derives everything else from it. [`ReceivableEngine`] is the entry
//! point: it owns the ledger store and the denormalized invoice, payment and
//! return records, runs every writer operation inside a [`Txn`], and defers
//! collaborator calls and events until after commit.

pub mod engine;
pub mod error;
pub mod events;
pub mod invoice;
pub mod payment;
pub mod ports;
pub mod returns;
pub mod txn;
pub mod validator;

pub use engine::ReceivableEngine;
pub use error::ReceivableError;
pub use events::ReceivableEvent;
pub use invoice::{derive_status, Invoice, InvoiceStatus};
pub use payment::{Payment, PaymentAllocation, PaymentMethod};
pub use ports::{
    CashFlowPort, CashOutflow, EventSink, NullCashFlow, NullEventSink, NullStock, StockPort,
};
pub use returns::{ReturnItem, ReturnRecord, ReturnRequest, SettlementType};
pub use txn::Txn;
pub use validator::{ConsistencyReport, ConsistencyValidator, Discrepancy};
