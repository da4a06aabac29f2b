//! # Marketplace Error Types
//!
//! Consolidated error handling for the marketplace client core.
//!
//! Every fallible operation exposed by [`crate::app::Marketplace`] returns
//! [`Result<T>`], an alias for `Result<T, MarketError>`.
//!
//! ## Error Categories
//!
//! - **Rejected locally**: `AuthRequired`, `SelfPurchase`, `InvalidAmount`,
//!   `PurchaseInFlight`, `ItemUnavailable`, `Validation`. These are raised
//!   before any request leaves the client.
//! - **Ledger verdicts**: `InsufficientFunds`, `TransactionNotFound`,
//!   `NotAuthorized`, `Ledger`, `Api`
//! - **Transport**: `Network`, `Decode`
//! - **History**: `PartialFetch` (one of the two feeds failed)
//! - **Local environment**: `Storage`, `Config`
//!
//! ## Usage Pattern
//!
//! ```rust
//! use market::core::error::MarketError;
//!
//! let err = MarketError::InsufficientFunds("balance 50.00 < 100.00".to_string());
//! assert!(err.offers_top_up());
//! assert!(!err.is_rejected_before_network());
//! ```

use thiserror::Error;

use crate::model::ItemId;

/// Error type covering every failure the marketplace core can report.
///
/// Variants carry plain strings so the type stays `Clone` and can travel
/// inside events and partial history results.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum MarketError {
    /// No signed-in user, or the user has no credential.
    #[error("Sign in required")]
    AuthRequired,

    /// The buyer is the seller of the item.
    #[error("You cannot buy your own listing ({0})")]
    SelfPurchase(ItemId),

    /// Wallet balance too low for the finalize step.
    ///
    /// The pending transaction stays `PENDING` on the ledger. Shells should
    /// offer a deposit, see [`MarketError::offers_top_up`].
    #[error("Insufficient funds: {0}")]
    InsufficientFunds(String),

    /// The ledger no longer knows the transaction id.
    #[error("Transaction not found: {0}")]
    TransactionNotFound(String),

    /// Deposit amount was zero, negative or unparseable.
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    /// Transport failure (connection refused, timeout, DNS).
    #[error("Network error: {0}")]
    Network(String),

    /// One of the two history feeds failed; the other one was used.
    #[error("Could not fetch {feed} transactions: {reason}")]
    PartialFetch { feed: String, reason: String },

    /// Another purchase attempt on the same item has not finished.
    #[error("A purchase of {0} is already in progress")]
    PurchaseInFlight(ItemId),

    /// The item is not (or no longer) in the catalog.
    #[error("Item {0} is not available")]
    ItemUnavailable(ItemId),

    /// The actor may not perform this action.
    #[error("Not authorized: {0}")]
    NotAuthorized(String),

    /// Input rejected by local validation.
    #[error("Validation error: {0}")]
    Validation(String),

    /// The ledger answered 2xx but with an unexpected verdict.
    #[error("Ledger error: {0}")]
    Ledger(String),

    /// Any other non-2xx response.
    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// Response body could not be decoded.
    #[error("Failed to parse response: {0}")]
    Decode(String),

    /// Session store read/write failure.
    #[error("Storage error: {0}")]
    Storage(String),

    /// Invalid environment configuration.
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Convenience type alias for `Result<T, MarketError>`.
pub type Result<T> = std::result::Result<T, MarketError>;

impl MarketError {
    /// Errors raised by local checks, before any network call.
    pub fn is_rejected_before_network(&self) -> bool {
        matches!(
            self,
            MarketError::AuthRequired
                | MarketError::SelfPurchase(_)
                | MarketError::InvalidAmount(_)
                | MarketError::PurchaseInFlight(_)
                | MarketError::ItemUnavailable(_)
                | MarketError::Validation(_)
        )
    }

    /// Whether the shell should offer a wallet top-up.
    pub fn offers_top_up(&self) -> bool {
        matches!(self, MarketError::InsufficientFunds(_))
    }

    /// Short message suitable for a toast or a CLI line.
    pub fn user_message(&self) -> String {
        match self {
            MarketError::AuthRequired => "Please sign in to continue.".to_string(),
            MarketError::SelfPurchase(_) => "You cannot buy your own item.".to_string(),
            MarketError::InsufficientFunds(_) => {
                "Your balance is too low. Deposit funds and try again.".to_string()
            }
            MarketError::TransactionNotFound(_) => {
                "This purchase expired. Start a new one.".to_string()
            }
            MarketError::InvalidAmount(_) => "Enter an amount greater than zero.".to_string(),
            MarketError::Network(_) => "Network problem. Check your connection.".to_string(),
            MarketError::PartialFetch { .. } => "Some history could not be loaded.".to_string(),
            MarketError::PurchaseInFlight(_) => "This purchase is already in progress.".to_string(),
            MarketError::ItemUnavailable(_) => "This item is no longer available.".to_string(),
            other => other.to_string(),
        }
    }
}

impl From<lib_utils::envs::Error> for MarketError {
    fn from(err: lib_utils::envs::Error) -> Self {
        MarketError::Config(err.to_string())
    }
}
