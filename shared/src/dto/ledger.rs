use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::catalog::GoodsKind;

/// Body of `POST /transactions`.
///
/// `title` and `price` are the snapshot taken from the item when the buyer
/// pressed "buy"; the ledger stores them with the transaction.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CreateTransactionRequest {
    pub buyer_id: String,
    pub seller_id: String,
    pub item_id: String,
    pub goods_kind: GoodsKind,
    pub title: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
}

/// Transaction record as stored by the ledger.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RawTransaction {
    pub id: String,
    pub buyer_id: String,
    pub seller_id: String,
    #[serde(default)]
    pub item_id: String,
    #[serde(default)]
    pub goods_kind: GoodsKind,
    #[serde(alias = "name")]
    pub title: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    pub status: String,
    /// RFC3339 timestamp or bare `YYYY-MM-DD` date.
    pub created_at: String,
}

/// Response of `POST /transactions/{id}/finalize`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FinalizeResponse {
    pub id: String,
    pub status: String,
    /// Amount the ledger actually charged; informational only.
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "rust_decimal::serde::float_option"
    )]
    pub charged_amount: Option<Decimal>,
}

/// Wallet balance (`GET /wallet/balance`, `POST /wallet/deposit`).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BalanceResponse {
    #[serde(with = "rust_decimal::serde::float")]
    pub balance: Decimal,
}

/// Body of `POST /wallet/deposit`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DepositRequest {
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
}

/// Which side of the ledger a transaction feed is queried from.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TransactionFilter {
    Buyer(String),
    Seller(String),
}

impl TransactionFilter {
    /// Query parameter for `GET /transactions`.
    pub fn query_pair(&self) -> (&'static str, &str) {
        match self {
            TransactionFilter::Buyer(id) => ("buyer_id", id),
            TransactionFilter::Seller(id) => ("seller_id", id),
        }
    }
}
