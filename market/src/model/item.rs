//! Catalog items.

use rust_decimal::Decimal;
use serde::Serialize;
use shared::{GoodsKind, NewListingRequest, RawItem};

use super::{ItemId, UserId};
use crate::core::error::{MarketError, Result};
use crate::utils::validation::{validate_category, validate_listing_name, validate_price};

/// Display colors, assigned by catalog position.
pub const PALETTE: [&str; 6] = [
    "#3b82f6", // blue
    "#10b981", // green
    "#f59e0b", // amber
    "#ef4444", // red
    "#8b5cf6", // violet
    "#ec4899", // pink
];

/// Legacy marker appended to the category name of virtual listings.
const VIRTUAL_MARKER: &str = "virtual";

/// A purchasable listing as shown in the catalog.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Item {
    pub id: ItemId,
    pub name: String,
    pub price: Decimal,
    /// Category label without any goods-kind marker.
    pub category: String,
    pub goods_kind: GoodsKind,
    pub seller_id: UserId,
    pub image_url: Option<String>,
    pub color: &'static str,
}

impl Item {
    /// Build the view-model for the raw record at `position` in the listing.
    ///
    /// An explicit `goods_kind` wins. Otherwise a trailing `|Virtual` on the
    /// category (any case) marks the item virtual, and everything else is real.
    pub fn from_raw(raw: RawItem, position: usize) -> Self {
        let (category, marker) = split_category(&raw.category);
        Self {
            id: raw.id,
            name: raw.name,
            price: raw.price,
            category,
            goods_kind: raw.goods_kind.or(marker).unwrap_or_default(),
            seller_id: raw.seller_id,
            image_url: raw.image_url,
            color: PALETTE[position % PALETTE.len()],
        }
    }

    pub fn is_owned_by(&self, user_id: &str) -> bool {
        self.seller_id == user_id
    }
}

/// Split `"Games|Virtual"` into `("Games", Some(Virtual))`.
fn split_category(category: &str) -> (String, Option<GoodsKind>) {
    match category.rsplit_once('|') {
        Some((label, marker)) if marker.trim().eq_ignore_ascii_case(VIRTUAL_MARKER) => {
            (label.trim().to_string(), Some(GoodsKind::Virtual))
        }
        _ => (category.trim().to_string(), None),
    }
}

/// Listing form submitted by a seller.
#[derive(Debug, Clone, PartialEq)]
pub struct NewListing {
    pub name: String,
    pub price: Decimal,
    pub category: String,
    pub goods_kind: GoodsKind,
    pub image_url: Option<String>,
}

impl NewListing {
    pub fn validate(&self) -> Result<()> {
        for check in [
            validate_listing_name(&self.name),
            validate_price(self.price),
            validate_category(&self.category),
        ] {
            if let Some(error) = check.error {
                return Err(MarketError::Validation(error));
            }
        }
        Ok(())
    }

    pub(crate) fn to_request(&self, seller_id: &str) -> NewListingRequest {
        NewListingRequest {
            name: self.name.trim().to_string(),
            price: self.price,
            category: self.category.trim().to_string(),
            goods_kind: self.goods_kind,
            seller_id: seller_id.to_string(),
            image_url: self.image_url.clone(),
        }
    }

    /// Local stand-in shown until the service answers.
    pub(crate) fn provisional_item(&self, id: ItemId, seller_id: &str, position: usize) -> Item {
        Item {
            id,
            name: self.name.trim().to_string(),
            price: self.price,
            category: self.category.trim().to_string(),
            goods_kind: self.goods_kind,
            seller_id: seller_id.to_string(),
            image_url: self.image_url.clone(),
            color: PALETTE[position % PALETTE.len()],
        }
    }
}
