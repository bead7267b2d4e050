//! Integration tests for the ledger domain

use chrono::{Duration, Utc};
use rust_decimal_macros::dec;

use core_kernel::{AccountId, InvoiceId, Money, PaymentId};
use domain_ledger::{
    derive_balance, Account, BalanceCalculator, Direction, EntryDraft, LedgerError, LedgerStore,
    MarkingCause, TransactionKind,
};

fn store_with_account() -> (LedgerStore, AccountId) {
    let mut store = LedgerStore::new();
    let id = AccountId::new_v7();
    store
        .register_account(Account::new(id, "Integration account"))
        .unwrap();
    (store, id)
}

#[test]
fn test_append_then_derive_matches_independent_sum() {
    let (mut store, id) = store_with_account();

    let postings = [
        (Direction::Debit, TransactionKind::Invoice, dec!(1200.00)),
        (Direction::Credit, TransactionKind::Payment, dec!(500.00)),
        (Direction::Debit, TransactionKind::Invoice, dec!(75.25)),
        (Direction::Credit, TransactionKind::Return, dec!(20.25)),
        (Direction::Credit, TransactionKind::Payment, dec!(100.00)),
    ];

    let mut expected = dec!(0);
    for (direction, kind, amount) in postings {
        let draft = match direction {
            Direction::Debit => {
                expected += amount;
                EntryDraft::debit(id, kind, Money::new(amount))
            }
            Direction::Credit => {
                expected -= amount;
                EntryDraft::credit(id, kind, Money::new(amount))
            }
        };
        store.append(draft).unwrap();
    }

    let calc = BalanceCalculator::new(&store);
    assert_eq!(calc.balance(&id).unwrap().amount(), expected);
}

#[test]
fn test_no_update_or_delete_surface_reversal_nets_to_zero() {
    let (mut store, id) = store_with_account();

    let entry_id = store
        .append(EntryDraft::debit(
            id,
            TransactionKind::Invoice,
            Money::new(dec!(999.99)),
        ))
        .unwrap();
    store.append_reversal(&entry_id, "voided invoice").unwrap();

    // Both entries remain in the log; the balance nets to zero
    assert_eq!(store.len(), 2);
    let calc = BalanceCalculator::new(&store);
    assert_eq!(calc.balance(&id).unwrap(), Money::zero());
}

#[test]
fn test_entries_for_unknown_account() {
    let store = LedgerStore::new();
    assert!(matches!(
        store.entries_for(&AccountId::new_v7()),
        Err(LedgerError::UnknownAccount(_))
    ));
}

#[test]
fn test_same_moment_entries_keep_insertion_order() {
    let (mut store, id) = store_with_account();
    let moment = Utc::now();

    for amount in [dec!(1), dec!(2), dec!(3)] {
        store
            .append(
                EntryDraft::debit(id, TransactionKind::Invoice, Money::new(amount))
                    .occurred_at(moment),
            )
            .unwrap();
    }

    let entries = store.entries_for(&id).unwrap();
    let amounts: Vec<_> = entries.iter().map(|e| e.amount.amount()).collect();
    assert_eq!(amounts, vec![dec!(1), dec!(2), dec!(3)]);
}

#[test]
fn test_marking_entry_round_trip_and_neutrality() {
    let (mut store, id) = store_with_account();
    store
        .append(EntryDraft::debit(
            id,
            TransactionKind::Invoice,
            Money::new(dec!(100)),
        ))
        .unwrap();
    store
        .append(
            EntryDraft::marking(
                id,
                InvoiceId::new_v7(),
                MarkingCause::Payment(PaymentId::new_v7()),
            )
            .with_description("payment fully settled invoice"),
        )
        .unwrap();

    let entries = store.entries_for(&id).unwrap();
    assert_eq!(entries.len(), 2);
    assert_eq!(derive_balance(entries.into_iter()), Money::new(dec!(100)));
}

#[test]
fn test_range_query_bounds_are_inclusive() {
    let (mut store, id) = store_with_account();
    let base = Utc::now();

    for offset in 0..5 {
        store
            .append(
                EntryDraft::debit(id, TransactionKind::Invoice, Money::new(dec!(1)))
                    .occurred_at(base + Duration::minutes(offset)),
            )
            .unwrap();
    }

    let slice = store
        .entries_in_range(&id, Some(base + Duration::minutes(1)), Some(base + Duration::minutes(3)))
        .unwrap();
    assert_eq!(slice.len(), 3);
}
