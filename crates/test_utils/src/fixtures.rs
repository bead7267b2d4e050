//! Pre-built Test Fixtures
//!
//! Provides ready-to-use test data for common entities across the receivable
//! engine. These fixtures are designed to be consistent and predictable for
//! unit tests.

use chrono::{DateTime, TimeZone, Utc};
use fake::faker::company::en::CompanyName;
use fake::Fake;
use rust_decimal_macros::dec;

use core_kernel::{AccountId, InvoiceId, Money, PaymentId, ProductId, ReturnId};
use domain_ledger::Account;
use domain_receivable::ReturnItem;

/// Fixture for Money test data
pub struct MoneyFixtures;

impl MoneyFixtures {
    /// A standard round amount
    pub fn hundred() -> Money {
        Money::new(dec!(100.00))
    }

    /// A typical invoice grand total
    pub fn grand_total() -> Money {
        Money::new(dec!(1500.00))
    }

    /// A payment that overpays [`Self::grand_total`]
    pub fn overpayment() -> Money {
        Money::new(dec!(2000.00))
    }

    /// An amount below the smallest invoice fixture
    pub fn small_payment() -> Money {
        Money::new(dec!(50.00))
    }

    /// A negative amount for rejection tests
    pub fn negative() -> Money {
        Money::new(dec!(-50.00))
    }
}

/// Fixture for temporal test data
pub struct TemporalFixtures;

impl TemporalFixtures {
    /// A fixed point in time for deterministic ordering tests
    pub fn base() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
    }

    /// One day after [`Self::base`]
    pub fn next_day() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 2, 0, 0, 0).unwrap()
    }

    /// Well after any fixture timestamp
    pub fn far_future() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2030, 1, 1, 0, 0, 0).unwrap()
    }
}

/// Fixture for identifier test data
pub struct IdFixtures;

impl IdFixtures {
    pub fn account_id() -> AccountId {
        AccountId::new_v7()
    }

    pub fn invoice_id() -> InvoiceId {
        InvoiceId::new_v7()
    }

    pub fn payment_id() -> PaymentId {
        PaymentId::new_v7()
    }

    pub fn return_id() -> ReturnId {
        ReturnId::new_v7()
    }

    pub fn product_id() -> ProductId {
        ProductId::new_v7()
    }
}

/// Fixture for account test data
pub struct AccountFixtures;

impl AccountFixtures {
    /// An account with a generated company name
    pub fn customer() -> Account {
        let name: String = CompanyName().fake();
        Account::new(AccountId::new_v7(), name)
    }
}

/// Fixture for return line items
pub struct ReturnFixtures;

impl ReturnFixtures {
    /// A single-product return line worth 200.00
    pub fn two_units_of_hundred() -> ReturnItem {
        ReturnItem {
            product_id: ProductId::new_v7(),
            quantity: 2,
            unit_price: MoneyFixtures::hundred(),
        }
    }
}
