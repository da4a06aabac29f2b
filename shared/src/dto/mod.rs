//! # Data Transfer Objects (DTOs)
//!
//! Data structures exchanged with the ledger/listing service over its REST API.
//!
//! ## Module Organization
//!
//! - [`auth`] - Login response, profile and role
//! - [`catalog`] - Items and listing creation
//! - [`ledger`] - Pending transactions, finalization, feeds, wallet balance
//!
//! ## Example JSON Communication
//!
//! ```text
//! POST /transactions
//! Authorization: Bearer eyJhbGciOi...
//!
//! {
//!   "buyer_id": "B1",
//!   "seller_id": "S1",
//!   "item_id": "I1",
//!   "goods_kind": "Virtual",
//!   "title": "Game key",
//!   "price": 100.0
//! }
//! ```
//!
//! ```text
//! HTTP/1.1 201 Created
//!
//! {
//!   "id": "T1",
//!   "buyer_id": "B1",
//!   "seller_id": "S1",
//!   "item_id": "I1",
//!   "goods_kind": "Virtual",
//!   "title": "Game key",
//!   "price": 100.0,
//!   "status": "PENDING",
//!   "created_at": "2024-05-01T12:00:00Z"
//! }
//! ```

pub mod auth;
pub mod catalog;
pub mod ledger;

pub use auth::*;
pub use catalog::*;
pub use ledger::*;
