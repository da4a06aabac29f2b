//! Pending transactions and purchase receipts.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use shared::{GoodsKind, RawTransaction};
use uuid::Uuid;

use super::{ItemId, UserId};
use crate::core::error::{MarketError, Result};

/// Status string reported by the ledger.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub enum TransactionStatus {
    Pending,
    Completed,
    /// Any other terminal state, kept verbatim.
    Other(String),
}

impl TransactionStatus {
    pub fn parse(status: &str) -> Self {
        let trimmed = status.trim();
        if trimmed.eq_ignore_ascii_case("PENDING") {
            TransactionStatus::Pending
        } else if trimmed.eq_ignore_ascii_case("COMPLETED") {
            TransactionStatus::Completed
        } else {
            TransactionStatus::Other(trimmed.to_string())
        }
    }

    pub fn is_completed(&self) -> bool {
        matches!(self, TransactionStatus::Completed)
    }

    pub fn is_pending(&self) -> bool {
        matches!(self, TransactionStatus::Pending)
    }

    pub fn as_str(&self) -> &str {
        match self {
            TransactionStatus::Pending => "PENDING",
            TransactionStatus::Completed => "COMPLETED",
            TransactionStatus::Other(status) => status,
        }
    }
}

impl std::fmt::Display for TransactionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A purchase the ledger has acknowledged but not yet finalized.
///
/// Values only come out of the transaction orchestrator, built from the
/// ledger's answer to the create call. The title/price snapshot is fixed at
/// that point; later catalog edits do not touch it. `finalize` and `cancel`
/// take the value by move, so a spent transaction cannot be submitted twice.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingTransaction {
    id: String,
    attempt_id: Uuid,
    buyer_id: UserId,
    seller_id: UserId,
    item_id: ItemId,
    goods_kind: GoodsKind,
    title: String,
    price: Decimal,
    status: TransactionStatus,
    created_at: DateTime<Utc>,
}

impl PendingTransaction {
    pub(crate) fn from_ack(raw: RawTransaction, attempt_id: Uuid) -> Result<Self> {
        let created_at = lib_utils::parse_timestamp(&raw.created_at).map_err(|e| {
            MarketError::Decode(format!("transaction {} created_at: {}", raw.id, e))
        })?;
        Ok(Self {
            status: TransactionStatus::parse(&raw.status),
            id: raw.id,
            attempt_id,
            buyer_id: raw.buyer_id,
            seller_id: raw.seller_id,
            item_id: raw.item_id,
            goods_kind: raw.goods_kind,
            title: raw.title,
            price: raw.price,
            created_at,
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// Correlates log lines and events of one purchase attempt.
    pub fn attempt_id(&self) -> Uuid {
        self.attempt_id
    }

    pub fn buyer_id(&self) -> &str {
        &self.buyer_id
    }

    pub fn seller_id(&self) -> &str {
        &self.seller_id
    }

    pub fn item_id(&self) -> &str {
        &self.item_id
    }

    pub fn goods_kind(&self) -> GoodsKind {
        self.goods_kind
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn price(&self) -> Decimal {
        self.price
    }

    pub fn status(&self) -> &TransactionStatus {
        &self.status
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Only ever fed from a ledger response.
    pub(crate) fn set_status(&mut self, status: TransactionStatus) {
        self.status = status;
    }
}

/// Result of a successful finalize.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PurchaseReceipt {
    pub transaction_id: String,
    pub item_id: ItemId,
    pub title: String,
    pub price: Decimal,
    pub status: TransactionStatus,
    /// What the ledger says it charged, when it says so.
    pub charged_amount: Option<Decimal>,
    /// Balance re-read from the ledger after the charge. `None` when that
    /// read failed; never a cached value.
    pub balance: Option<Decimal>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw_ack(created_at: &str) -> RawTransaction {
        RawTransaction {
            id: "T1".to_string(),
            buyer_id: "B1".to_string(),
            seller_id: "S1".to_string(),
            item_id: "I1".to_string(),
            goods_kind: GoodsKind::Real,
            title: "Desk".to_string(),
            price: Decimal::from(120),
            status: "pending".to_string(),
            created_at: created_at.to_string(),
        }
    }

    #[test]
    fn test_status_parsing() {
        assert_eq!(TransactionStatus::parse("COMPLETED"), TransactionStatus::Completed);
        assert_eq!(TransactionStatus::parse(" completed "), TransactionStatus::Completed);
        assert_eq!(TransactionStatus::parse("Pending"), TransactionStatus::Pending);
        assert_eq!(
            TransactionStatus::parse("REFUNDED"),
            TransactionStatus::Other("REFUNDED".to_string())
        );
        assert_eq!(TransactionStatus::parse("REFUNDED").to_string(), "REFUNDED");
    }

    #[test]
    fn test_from_ack_keeps_snapshot() {
        let pending = PendingTransaction::from_ack(raw_ack("2024-05-01T12:00:00Z"), Uuid::new_v4())
            .unwrap();
        assert_eq!(pending.id(), "T1");
        assert_eq!(pending.title(), "Desk");
        assert_eq!(pending.price(), Decimal::from(120));
        assert!(pending.status().is_pending());
        assert_eq!(lib_utils::format_date(pending.created_at()), "2024-05-01");
    }

    #[test]
    fn test_from_ack_rejects_bad_timestamp() {
        let result = PendingTransaction::from_ack(raw_ack("yesterday"), Uuid::new_v4());
        assert!(matches!(result, Err(MarketError::Decode(_))));
    }
}
