//! Recording Collaborator Doubles
//!
//! In-memory implementations of the engine's collaborator ports that record
//! every call for later inspection, plus tracing initialization for tests.

use once_cell::sync::Lazy;

use core_kernel::ProductId;
use domain_receivable::{CashFlowPort, CashOutflow, EventSink, ReceivableEvent, StockPort};

/// Records stock restores
#[derive(Debug, Default)]
pub struct RecordingStock {
    pub restored: Vec<(ProductId, u32)>,
}

impl StockPort for RecordingStock {
    fn restore_stock(&mut self, product_id: ProductId, quantity: u32) {
        self.restored.push((product_id, quantity));
    }
}

/// Records outgoing cash movements
#[derive(Debug, Default)]
pub struct RecordingCashFlow {
    pub outgoing: Vec<CashOutflow>,
}

impl CashFlowPort for RecordingCashFlow {
    fn record_outgoing(&mut self, outflow: CashOutflow) {
        self.outgoing.push(outflow);
    }
}

/// Records published events
#[derive(Debug, Default)]
pub struct RecordingEvents {
    pub published: Vec<ReceivableEvent>,
}

impl RecordingEvents {
    /// Event names in publication order
    pub fn names(&self) -> Vec<&'static str> {
        self.published.iter().map(|e| e.name()).collect()
    }
}

impl EventSink for RecordingEvents {
    fn publish(&mut self, event: ReceivableEvent) {
        self.published.push(event);
    }
}

static TRACING: Lazy<()> = Lazy::new(|| {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("debug")),
        )
        .with_test_writer()
        .try_init();
});

/// Initializes tracing once for the whole test binary
pub fn init_tracing() {
    Lazy::force(&TRACING);
}
