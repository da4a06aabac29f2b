//! # Domain Model
//!
//! View-models the marketplace core works with. Raw wire records live in the
//! `shared` crate; the types here are derived from them and carry the
//! client-side invariants.
//!
//! - [`item::Item`]: catalog entry with display color and resolved goods kind
//! - [`transaction::PendingTransaction`]: ledger-acknowledged purchase in flight
//! - [`user::User`]: signed-in actor and cached wallet balance
//! - [`history::HistoryEntry`]: reconciled, role-labeled history row

pub mod history;
pub mod item;
pub mod transaction;
pub mod user;

/// Listing identifier assigned by the service.
pub type ItemId = String;

/// Account identifier assigned by the service.
pub type UserId = String;

pub use history::{HistoryEntry, ReconciledHistory, RoleLabel, StatusLabel};
pub use item::{Item, NewListing, PALETTE};
pub use shared::GoodsKind;
pub use transaction::{PendingTransaction, PurchaseReceipt, TransactionStatus};
pub use user::{Credential, Role, User};
