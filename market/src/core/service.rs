//! # Service Traits
//!
//! Seams between the marketplace core and the outside world.

use async_trait::async_trait;
use rust_decimal::Decimal;
use shared::{
    CreateTransactionRequest, FinalizeResponse, NewListingRequest, RawItem, RawTransaction,
    RawUser, Role, TransactionFilter,
};

use crate::core::error::Result;
use crate::model::user::{Credential, User};

/// Operations offered by the ledger/listing service.
///
/// The ledger is authoritative for balances and transaction status. The
/// client never computes a balance itself, it re-reads it through
/// [`LedgerService::fetch_wallet_balance`].
#[async_trait]
pub trait LedgerService: Send + Sync {
    /// Create a `PENDING` transaction carrying the title/price snapshot.
    async fn create_pending_transaction(
        &self,
        credential: &Credential,
        request: CreateTransactionRequest,
    ) -> Result<RawTransaction>;

    /// Charge the buyer and complete the transaction.
    async fn finalize_transaction(
        &self,
        credential: &Credential,
        transaction_id: &str,
    ) -> Result<FinalizeResponse>;

    /// One side of the user's history.
    async fn fetch_transactions(
        &self,
        credential: &Credential,
        filter: TransactionFilter,
    ) -> Result<Vec<RawTransaction>>;

    async fn fetch_profile(&self, credential: &Credential) -> Result<RawUser>;

    async fn fetch_wallet_balance(&self, credential: &Credential) -> Result<Decimal>;

    /// Returns the balance after the deposit.
    async fn deposit_to_wallet(&self, credential: &Credential, amount: Decimal) -> Result<Decimal>;

    /// Public listing, no credential needed.
    async fn list_items(&self) -> Result<Vec<RawItem>>;

    async fn create_item(
        &self,
        credential: &Credential,
        listing: NewListingRequest,
    ) -> Result<RawItem>;

    /// Delete a listing. The service authorizes owner or admin.
    async fn delete_item(&self, credential: &Credential, item_id: &str, actor_role: Role)
        -> Result<()>;
}

/// Persistence for the signed-in user record.
///
/// Calls are synchronous and small; implementations must not block for long.
pub trait SessionStore: Send + Sync {
    fn load(&self) -> Result<Option<User>>;

    fn save(&self, user: &User) -> Result<()>;

    /// Remove the record. Clearing an empty store is not an error.
    fn clear(&self) -> Result<()>;
}
