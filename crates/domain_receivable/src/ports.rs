//! Collaborator ports
//!
//! The engine's seams to the rest of the application. All ports are
//! synchronous, notification-style interfaces: the engine defers every call
//! until after its write set has committed, so a failed operation never
//! reaches a collaborator.

use serde::{Deserialize, Serialize};

use core_kernel::{Money, ProductId, ReturnId};

use crate::events::ReceivableEvent;

/// An outgoing cash movement routed to the daily-cash collaborator
///
/// Emitted only for cash-refund settlements; the engine does not persist
/// cash flows itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CashOutflow {
    pub amount: Money,
    pub reference: ReturnId,
}

/// Stock/inventory collaborator
///
/// On return settlement the engine restores returned quantities. On invoice
/// creation, stock is expected to have been decremented by the caller.
pub trait StockPort {
    fn restore_stock(&mut self, product_id: ProductId, quantity: u32);
}

/// Cash/daily-ledger collaborator
pub trait CashFlowPort {
    fn record_outgoing(&mut self, outflow: CashOutflow);
}

/// Event/notification boundary
pub trait EventSink {
    fn publish(&mut self, event: ReceivableEvent);
}

/// No-op stock collaborator
#[derive(Debug, Default, Clone, Copy)]
pub struct NullStock;

impl StockPort for NullStock {
    fn restore_stock(&mut self, _product_id: ProductId, _quantity: u32) {}
}

/// No-op cash collaborator
#[derive(Debug, Default, Clone, Copy)]
pub struct NullCashFlow;

impl CashFlowPort for NullCashFlow {
    fn record_outgoing(&mut self, _outflow: CashOutflow) {}
}

/// No-op event sink
#[derive(Debug, Default, Clone, Copy)]
pub struct NullEventSink;

impl EventSink for NullEventSink {
    fn publish(&mut self, _event: ReceivableEvent) {}
}
