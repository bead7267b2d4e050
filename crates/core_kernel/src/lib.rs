//! Core Kernel - Foundational types for the receivable engine
//!
//! This crate provides the shared building blocks used by every domain
//! crate in the workspace:
//!
//! - [`Money`]: fixed-point monetary amounts (2 decimal places) backed by
//!   `rust_decimal`, so balance arithmetic never touches floating point
//! - Strongly-typed identifiers (`AccountId`, `InvoiceId`, ...) that prevent
//!   accidental mixing of aggregate references
//!
//! The engine is single-currency by design; amounts carry no currency tag.

pub mod identifiers;
pub mod money;

pub use identifiers::{
    AccountId, InvoiceId, LedgerEntryId, PaymentId, ProductId, ReturnId,
};
pub use money::{Money, MoneyError};
