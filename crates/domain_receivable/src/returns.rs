//! Return records and settlement types
//!
//! A return either converts to account credit (a ledger entry, exactly like
//! a payment would) or to a cash refund handed over outside the account
//! relationship (no ledger entry; routed to the cash collaborator).
//! Conflating the two causes double-accounting.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use core_kernel::{AccountId, InvoiceId, Money, ProductId, ReturnId};

/// How a return is settled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SettlementType {
    /// Credit the account ledger (reduces debt or increases credit)
    LedgerCredit,
    /// Refund cash out of band; the account ledger is untouched
    CashRefund,
}

/// One returned line item; quantities go back to stock on settlement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReturnItem {
    pub product_id: ProductId,
    pub quantity: u32,
    pub unit_price: Money,
}

/// A return to be settled
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReturnRequest {
    /// Invoice being returned against
    pub invoice_id: InvoiceId,
    /// Returned items
    pub items: Vec<ReturnItem>,
    /// Total return amount
    pub amount: Money,
    /// Requested settlement
    pub settlement_type: SettlementType,
}

/// An immutable record of a settled return
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReturnRecord {
    /// Unique identifier
    pub id: ReturnId,
    /// Invoice returned against
    pub invoice_id: InvoiceId,
    /// Account the invoice belongs to
    pub account_id: AccountId,
    /// Returned items
    pub items: Vec<ReturnItem>,
    /// Settled amount
    pub amount: Money,
    /// How it was settled
    pub settlement_type: SettlementType,
    /// When it was settled
    pub settled_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_settlement_type_serialization() {
        assert_eq!(
            serde_json::to_string(&SettlementType::LedgerCredit).unwrap(),
            "\"ledger_credit\""
        );
        assert_eq!(
            serde_json::to_string(&SettlementType::CashRefund).unwrap(),
            "\"cash_refund\""
        );
    }

    #[test]
    fn test_return_request_round_trip() {
        let request = ReturnRequest {
            invoice_id: InvoiceId::new_v7(),
            items: vec![ReturnItem {
                product_id: ProductId::new_v7(),
                quantity: 2,
                unit_price: Money::new(dec!(50)),
            }],
            amount: Money::new(dec!(100)),
            settlement_type: SettlementType::CashRefund,
        };

        let json = serde_json::to_string(&request).unwrap();
        let back: ReturnRequest = serde_json::from_str(&json).unwrap();
        assert_eq!(back.amount, request.amount);
        assert_eq!(back.settlement_type, request.settlement_type);
        assert_eq!(back.items.len(), 1);
    }
}
