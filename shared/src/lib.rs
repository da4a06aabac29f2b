//! # Shared Data Transfer Objects Library
//!
//! This library defines the contract between the marketplace client and the
//! ledger/listing service. All DTOs use JSON serialization via `serde`.
//!
//! ## Structure
//!
//! - **[`dto`]**: Data Transfer Objects for API communication
//!   - **[`dto::auth`]**: Session bootstrap and user profile DTOs
//!   - **[`dto::catalog`]**: Listed items and listing creation
//!   - **[`dto::ledger`]**: Transactions, finalization and wallet balance
//! - **[`utils`]**: Display helpers
//!   - **[`utils::format_money`]**: Two-decimal currency display
//!   - **[`utils::truncate_id`]**: Shortened identifiers for tables
//!
//! ## Wire Format
//!
//! - Field names are **snake_case** in Rust and in JSON
//! - Money amounts are JSON numbers, decoded into exact [`rust_decimal::Decimal`]
//!   values (never `f64`) so no rounding happens on the client
//! - Optional fields may be omitted by the service; they default to `None`
//! - Goods kinds are the strings `"Real"` and `"Virtual"`
//!
//! ## Usage
//!
//! ```rust
//! use shared::dto::catalog::RawItem;
//!
//! let item: RawItem = serde_json::from_str(
//!     r#"{"id":"I1","name":"Ebook","price":9.5,"category":"Books|Virtual","seller_id":"S1"}"#,
//! ).unwrap();
//! assert_eq!(item.price.to_string(), "9.5");
//! assert!(item.goods_kind.is_none());
//! ```

pub mod dto;
pub mod utils;

// Re-export commonly used types for convenience
// Note: Wildcard re-exports are used here since shared is a DTO library
// where all exports are meant to be public API
pub use dto::*;
pub use utils::*;
