//! # Ledger API Client Module
//!
//! HTTP client for the ledger/listing service.
//!
//! ## Module Structure
//!
//! ```text
//! api/
//! ├── mod.rs           - Module exports and documentation
//! ├── client.rs        - LedgerClient struct, response decoding, error mapping
//! ├── catalog.rs       - Listing endpoints (list, create, delete)
//! ├── transactions.rs  - Transaction endpoints (create pending, finalize, feeds)
//! ├── wallet.rs        - Wallet endpoints (balance, deposit)
//! └── profile.rs       - Profile endpoint
//! ```

pub mod catalog;
pub mod client;
pub mod profile;
pub mod transactions;
pub mod wallet;

pub use client::LedgerClient;
