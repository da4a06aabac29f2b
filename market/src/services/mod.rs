//! # Services Module
//!
//! Integrations with the world outside the marketplace core.
//!
//! ```text
//! services/
//! ├── api/        - LedgerClient: HTTP client for the ledger/listing service
//! └── session.rs  - Session stores for the signed-in user record
//! ```
//!
//! ```text
//! ┌───────────────────────────────────────────────┐
//! │                 Marketplace                   │
//! │                                               │
//! │  ┌────────────────────┐  ┌─────────────────┐  │
//! │  │  LedgerClient      │  │  SessionStore   │  │
//! │  │  (api/)            │  │  (session.rs)   │  │
//! │  └─────────┬──────────┘  └────────┬────────┘  │
//! └────────────┼──────────────────────┼───────────┘
//!              │ HTTP/JSON            │ JSON file
//!              ▼                      ▼
//! ┌─────────────────────────┐  ┌──────────────────────┐
//! │  Ledger/listing service │  │ .flipzy/session.json │
//! │  /items                 │  └──────────────────────┘
//! │  /transactions          │
//! │  /users/me              │
//! │  /wallet/*              │
//! └─────────────────────────┘
//! ```
//!
//! ## Error Handling
//!
//! Both services return [`crate::core::Result`]. The HTTP client maps status
//! codes and the optional `code` field of the error body onto
//! [`crate::core::MarketError`] variants (see [`api::client`]).
//!
//! ## Thread Safety
//!
//! - **LedgerClient** wraps `reqwest::Client`, which pools connections and
//!   is cheap to share behind an `Arc`.
//! - **FileSessionStore** serializes writes with a `parking_lot::Mutex`.

pub mod api;
pub mod session;

pub use api::LedgerClient;
pub use session::{FileSessionStore, MemorySessionStore};
