//! Property-Based Test Generators
//!
//! Provides proptest strategies for generating random test data that
//! maintains domain invariants.

use proptest::prelude::*;
use rust_decimal::Decimal;

use core_kernel::Money;
use domain_receivable::{PaymentMethod, SettlementType};

/// Strategy for positive two-decimal amounts in minor units
pub fn positive_amount_minor_strategy() -> impl Strategy<Value = i64> {
    1i64..10_000_000i64
}

/// Strategy for positive Money values (0.01 up to 100,000.00)
pub fn positive_money_strategy() -> impl Strategy<Value = Money> {
    positive_amount_minor_strategy().prop_map(Money::from_minor)
}

/// Strategy for Money values on either side of zero
pub fn money_strategy() -> impl Strategy<Value = Money> {
    (-10_000_000i64..10_000_000i64).prop_map(Money::from_minor)
}

/// Strategy for small invoice batches (grand totals)
pub fn invoice_totals_strategy() -> impl Strategy<Value = Vec<Money>> {
    proptest::collection::vec(positive_money_strategy(), 1..6)
}

/// Strategy for payment methods
pub fn payment_method_strategy() -> impl Strategy<Value = PaymentMethod> {
    prop_oneof![
        Just(PaymentMethod::Cash),
        Just(PaymentMethod::BankTransfer),
        Just(PaymentMethod::Card),
        Just(PaymentMethod::Check),
    ]
}

/// Strategy for settlement types
pub fn settlement_type_strategy() -> impl Strategy<Value = SettlementType> {
    prop_oneof![
        Just(SettlementType::LedgerCredit),
        Just(SettlementType::CashRefund),
    ]
}

/// Strategy for two-decimal Decimal values usable as drift offsets
pub fn drift_strategy() -> impl Strategy<Value = Decimal> {
    (-10_000i64..10_000i64).prop_map(|n| Decimal::new(n, 2))
}
