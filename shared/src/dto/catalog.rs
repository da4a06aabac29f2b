use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Classification of a listed good.
///
/// `Real` goods go through a two-phase checkout (the buyer confirms before
/// payment), `Virtual` goods are delivered instantly and paid in one step.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum GoodsKind {
    #[default]
    #[serde(alias = "real", alias = "REAL")]
    Real,
    #[serde(alias = "virtual", alias = "VIRTUAL")]
    Virtual,
}

impl GoodsKind {
    /// Whether checkout finalizes without an explicit confirmation step.
    pub fn is_instant(&self) -> bool {
        matches!(self, GoodsKind::Virtual)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            GoodsKind::Real => "Real",
            GoodsKind::Virtual => "Virtual",
        }
    }
}

impl std::fmt::Display for GoodsKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Item record from `GET /items`.
///
/// Older listings carry the goods kind only inside `category`
/// (`"Games|Virtual"`); `goods_kind` is then absent.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RawItem {
    pub id: String,
    pub name: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    #[serde(default)]
    pub category: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub goods_kind: Option<GoodsKind>,
    pub seller_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

/// Body of `POST /items`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewListingRequest {
    pub name: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    pub category: String,
    pub goods_kind: GoodsKind,
    pub seller_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}
