//! Reconciled history rows.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use shared::{GoodsKind, RawTransaction};

use super::transaction::TransactionStatus;
use super::UserId;
use crate::core::error::MarketError;

/// Which side of the transaction the current user was on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum RoleLabel {
    YouBought,
    YouSold,
    Unknown,
}

impl RoleLabel {
    /// Buyer match is checked first, so a self-dealt transaction reads as bought.
    pub fn derive(user_id: &str, buyer_id: &str, seller_id: &str) -> Self {
        if buyer_id == user_id {
            RoleLabel::YouBought
        } else if seller_id == user_id {
            RoleLabel::YouSold
        } else {
            RoleLabel::Unknown
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RoleLabel::YouBought => "YOU BOUGHT",
            RoleLabel::YouSold => "YOU SOLD",
            RoleLabel::Unknown => "UNKNOWN",
        }
    }
}

impl std::fmt::Display for RoleLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// User-facing status. Anything not completed is shown as failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum StatusLabel {
    Completed,
    Failed,
}

impl StatusLabel {
    pub fn from_status(status: &TransactionStatus) -> Self {
        if status.is_completed() {
            StatusLabel::Completed
        } else {
            StatusLabel::Failed
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            StatusLabel::Completed => "COMPLETED",
            StatusLabel::Failed => "FAILED",
        }
    }
}

impl std::fmt::Display for StatusLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One row of the merged history. Rebuilt on every view, never stored.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistoryEntry {
    pub id: String,
    pub name: String,
    pub price: Decimal,
    pub goods_kind: GoodsKind,
    pub created_at: DateTime<Utc>,
    pub status: TransactionStatus,
    pub status_label: StatusLabel,
    pub buyer_id: UserId,
    pub seller_id: UserId,
    pub role: RoleLabel,
}

impl HistoryEntry {
    /// Label a raw record from the point of view of `user_id`.
    ///
    /// Unparseable timestamps fall back to the Unix epoch so the row sorts
    /// last instead of dropping out of the history.
    pub fn from_raw(raw: RawTransaction, user_id: &str) -> Self {
        let created_at = match lib_utils::parse_timestamp(&raw.created_at) {
            Ok(created_at) => created_at,
            Err(e) => {
                tracing::warn!(transaction_id = %raw.id, error = %e, "Unparseable transaction date");
                DateTime::UNIX_EPOCH
            }
        };
        let status = TransactionStatus::parse(&raw.status);
        Self {
            role: RoleLabel::derive(user_id, &raw.buyer_id, &raw.seller_id),
            status_label: StatusLabel::from_status(&status),
            status,
            id: raw.id,
            name: raw.title,
            price: raw.price,
            goods_kind: raw.goods_kind,
            created_at,
            buyer_id: raw.buyer_id,
            seller_id: raw.seller_id,
        }
    }
}

/// Merged history plus the error of a feed that could not be fetched.
#[derive(Debug, Clone, PartialEq)]
pub struct ReconciledHistory {
    pub entries: Vec<HistoryEntry>,
    /// `Some(MarketError::PartialFetch { .. })` when one side is missing.
    pub partial_failure: Option<MarketError>,
}

impl ReconciledHistory {
    pub fn is_complete(&self) -> bool {
        self.partial_failure.is_none()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
