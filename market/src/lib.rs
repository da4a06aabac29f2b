//! # Flipzy Marketplace Client Core - Library Root
//!
//! Client-side core of the Flipzy marketplace. It talks to the
//! ledger/listing service over HTTP and keeps the catalog, the wallet
//! balance and the order history consistent with what the ledger reports.
//! A shell (the `market` CLI in `main.rs`, or a GUI) drives it through
//! [`app::Marketplace`].
//!
//! ## Features
//!
//! - **Two-phase purchases**: create a pending transaction, then finalize it
//! - **Instant checkout** for virtual goods, explicit confirmation for real ones
//! - **Ledger-authoritative wallet**: balances are re-read, never computed
//! - **Reconciled history**: buyer and seller feeds merged and role-labeled
//! - **Persisted session**: the signed-in user survives restarts
//!
//! ## Architecture
//!
//! ```text
//! ┌────────────────────────────────────────────────────────┐
//! │              market (this crate)                       │
//! ├────────────────────────────────────────────────────────┤
//! │  Tokio         - Async runtime                          │
//! │  Reqwest       - HTTP client                            │
//! │  rust_decimal  - Exact money amounts                    │
//! │  tracing       - Structured logging                     │
//! └────────────────────────────────────────────────────────┘
//!          │                              │
//!          │ HTTP/JSON                    │ JSON file
//!          ▼                              ▼
//! ┌─────────────────────────┐   ┌─────────────────────────┐
//! │ Ledger/listing service  │   │  Session store          │
//! └─────────────────────────┘   └─────────────────────────┘
//! ```
//!
//! ## Module Structure
//!
//! - **app**: Marketplace facade and its components
//!   - `orchestrator`: purchase protocol and per-item in-flight guard
//!   - `history`: buyer/seller feed reconciliation
//!   - `catalog`: local catalog mirror
//!   - `wallet`: signed-in user and balance
//!   - `events`: notifications for the shell
//! - **core**: `MarketError` and the service traits
//! - **model**: view-models derived from wire records
//! - **services**: `LedgerClient` (HTTP) and session stores
//! - **config**: `ClientConfig` from the environment
//! - **debug**: logging setup
//! - **utils**: input validation and price breakdown
//!
//! ## Testing
//!
//! ```bash
//! cargo test -p market
//! ```
//!
//! Unit tests run the components against an in-memory ledger; the tests in
//! `tests/` run `LedgerClient` against a mock HTTP server.

pub mod app;
pub mod config;
pub mod core;
pub mod debug;
pub mod model;
pub mod services;
pub mod utils;

pub use app::{EventSink, MarketEvent, Marketplace, PurchaseOutcome};
pub use config::ClientConfig;
pub use core::{MarketError, Result};
