//! # Core Abstractions
//!
//! Error types and the service traits the rest of the crate is written against.
//!
//! ## Modules
//!
//! - **[`error`]**: `MarketError` and the `Result<T>` alias
//! - **[`service`]**: `LedgerService` (remote ledger/listing service) and
//!   `SessionStore` (persisted user record)
//!
//! ## Dependency Injection
//!
//! Components hold `Arc<dyn LedgerService>` and `Arc<dyn SessionStore>`, so
//! production code and tests only differ in what gets passed in:
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use market::core::service::{LedgerService, SessionStore};
//! use market::services::api::LedgerClient;
//! use market::services::session::MemorySessionStore;
//!
//! let ledger: Arc<dyn LedgerService> = Arc::new(LedgerClient::new("http://127.0.0.1:8000"));
//! let store: Arc<dyn SessionStore> = Arc::new(MemorySessionStore::default());
//! ```

pub mod error;
pub mod service;

pub use error::{MarketError, Result};
pub use service::{LedgerService, SessionStore};
