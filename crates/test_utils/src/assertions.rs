//! Custom Test Assertions
//!
//! Provides specialized assertion helpers for domain types that give more
//! meaningful error messages than standard assertions.

use rust_decimal::Decimal;

use core_kernel::{AccountId, Money};
use domain_receivable::{Invoice, InvoiceStatus};

use crate::builders::RecordingEngine;

/// Asserts that two Money values are approximately equal within a tolerance
///
/// # Panics
///
/// Panics if the amounts differ by more than `tolerance`
pub fn assert_money_approx_eq(actual: Money, expected: Money, tolerance: Decimal) {
    let diff = (actual - expected).abs();
    assert!(
        diff.amount() <= tolerance,
        "Money amounts differ by more than tolerance: actual={actual}, expected={expected}, \
         diff={diff}, tolerance={tolerance}"
    );
}

/// Asserts that a Money value is zero
pub fn assert_money_zero(money: Money) {
    assert!(money.is_zero(), "Expected zero money, got {money}");
}

/// Asserts an invoice's status and remaining balance in one go
pub fn assert_invoice_state(invoice: &Invoice, status: InvoiceStatus, remaining: Money) {
    assert_eq!(
        invoice.status, status,
        "Invoice {} status mismatch: expected {:?}, got {:?}",
        invoice.id, status, invoice.status
    );
    assert_eq!(
        invoice.remaining_balance, remaining,
        "Invoice {} remaining balance mismatch: expected {}, got {}",
        invoice.id, remaining, invoice.remaining_balance
    );
}

/// Asserts the global invariant: the ledger-derived balance equals the sum
/// of outstanding invoice balances minus the available credit
///
/// # Panics
///
/// Panics if the views disagree or a validation pass reports discrepancies
pub fn assert_views_consistent(engine: &mut RecordingEngine, account_id: &AccountId) {
    let report = engine
        .validate_account(account_id)
        .expect("validation should succeed for a registered account");
    assert!(
        report.is_consistent(),
        "Validation found discrepancies: {:?}",
        report.discrepancies
    );
    assert_eq!(
        report.ledger_balance,
        report.invoice_sum - report.available_credit,
        "Ledger balance {} disagrees with invoice sum {} minus available credit {}",
        report.ledger_balance,
        report.invoice_sum,
        report.available_credit
    );
}
