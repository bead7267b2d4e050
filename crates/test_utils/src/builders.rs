//! Test Data Builders
//!
//! Provides builder patterns for constructing test data with sensible
//! defaults. These builders allow tests to specify only the relevant fields
//! while using defaults for everything else.

use fake::faker::company::en::CompanyName;
use fake::Fake;

use core_kernel::{AccountId, InvoiceId, Money};
use domain_receivable::{
    PaymentMethod, ReceivableEngine, ReturnItem, ReturnRequest, SettlementType,
};

use crate::fixtures::MoneyFixtures;
use crate::ports::{RecordingCashFlow, RecordingEvents, RecordingStock};

/// An engine wired to recording collaborators, ready for scenario tests
pub type RecordingEngine = ReceivableEngine<RecordingStock, RecordingCashFlow, RecordingEvents>;

/// Builder for a seeded engine with one registered account
pub struct TestEngineBuilder {
    account_name: String,
    invoice_totals: Vec<Money>,
    payments: Vec<Money>,
}

impl Default for TestEngineBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TestEngineBuilder {
    /// Creates a builder with a generated account name and no activity
    pub fn new() -> Self {
        Self {
            account_name: CompanyName().fake(),
            invoice_totals: Vec::new(),
            payments: Vec::new(),
        }
    }

    /// Sets the account display name
    pub fn with_account_name(mut self, name: impl Into<String>) -> Self {
        self.account_name = name.into();
        self
    }

    /// Adds an invoice to create during build, in order
    pub fn with_invoice(mut self, grand_total: Money) -> Self {
        self.invoice_totals.push(grand_total);
        self
    }

    /// Adds a cash payment to allocate after all invoices are created
    pub fn with_payment(mut self, amount: Money) -> Self {
        self.payments.push(amount);
        self
    }

    /// Builds the engine and applies the seeded activity
    ///
    /// Invoice ids are returned in creation order. Panics on seed failure;
    /// builders are test-only code.
    pub fn build(self) -> (RecordingEngine, AccountId, Vec<InvoiceId>) {
        let mut engine = ReceivableEngine::with_ports(
            RecordingStock::default(),
            RecordingCashFlow::default(),
            RecordingEvents::default(),
        );
        let account_id = engine.register_account(self.account_name).unwrap();

        let mut invoice_ids = Vec::new();
        for total in self.invoice_totals {
            let invoice = engine
                .create_invoice(account_id, total, Money::zero())
                .unwrap();
            invoice_ids.push(invoice.id);
        }
        for amount in self.payments {
            engine
                .allocate_payment(account_id, amount, PaymentMethod::Cash)
                .unwrap();
        }

        (engine, account_id, invoice_ids)
    }
}

/// Builder for return requests
pub struct ReturnRequestBuilder {
    invoice_id: InvoiceId,
    items: Vec<ReturnItem>,
    amount: Money,
    settlement_type: SettlementType,
}

impl ReturnRequestBuilder {
    /// Creates a builder for a ledger-credit return of 100.00
    pub fn new(invoice_id: InvoiceId) -> Self {
        Self {
            invoice_id,
            items: Vec::new(),
            amount: MoneyFixtures::hundred(),
            settlement_type: SettlementType::LedgerCredit,
        }
    }

    /// Sets the return amount
    pub fn with_amount(mut self, amount: Money) -> Self {
        self.amount = amount;
        self
    }

    /// Adds a returned line item
    pub fn with_item(mut self, item: ReturnItem) -> Self {
        self.items.push(item);
        self
    }

    /// Requests cash-refund settlement
    pub fn as_cash_refund(mut self) -> Self {
        self.settlement_type = SettlementType::CashRefund;
        self
    }

    /// Builds the request
    pub fn build(self) -> ReturnRequest {
        ReturnRequest {
            invoice_id: self.invoice_id,
            items: self.items,
            amount: self.amount,
            settlement_type: self.settlement_type,
        }
    }
}
