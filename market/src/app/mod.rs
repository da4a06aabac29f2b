//! # Marketplace Facade
//!
//! [`Marketplace`] owns every component of the client core and is the only
//! entry point for an application shell (GUI, CLI, tests).
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                         Marketplace                          │
//! │                                                              │
//! │  ┌────────────────────────┐     ┌─────────────────────────┐  │
//! │  │ TransactionOrchestrator│────>│ CatalogMirror           │  │
//! │  │ - initiate_purchase    │     │ - load / remove / upsert│  │
//! │  │ - finalize / cancel    │     └─────────────────────────┘  │
//! │  │                        │     ┌─────────────────────────┐  │
//! │  │                        │────>│ WalletView              │  │
//! │  └───────────┬────────────┘     │ - refresh / deposit     │  │
//! │              │                  └───────────┬─────────────┘  │
//! │  ┌───────────┼────────────┐                 │                │
//! │  │ HistoryReconciler      │                 │                │
//! │  │ - reconcile (join!)    │                 │                │
//! │  └───────────┬────────────┘                 │                │
//! └──────────────┼──────────────────────────────┼────────────────┘
//!                │ Arc<dyn LedgerService>       │ Arc<dyn SessionStore>
//!                ▼                              ▼
//!        ledger/listing service          persisted user record
//! ```
//!
//! ## Key Components
//!
//! - **[`catalog::CatalogMirror`]**: Local item list
//! - **[`wallet::WalletView`]**: Signed-in user and ledger balance
//! - **[`orchestrator::TransactionOrchestrator`]**: Purchase protocol
//! - **[`history::HistoryReconciler`]**: Buyer/seller feed merge
//! - **[`events::MarketEvent`]**: Notifications for the shell
//!
//! ## State Management Pattern
//!
//! Components keep their state behind `parking_lot` locks. Locks are taken
//! for a copy or a swap and released before any request is awaited.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use market::app::{Marketplace, PurchaseOutcome};
//! use market::config::ClientConfig;
//!
//! # async fn run() -> market::core::Result<()> {
//! let market = Marketplace::from_config(&ClientConfig::from_env()?);
//! market.hydrate()?;
//! market.load_catalog().await?;
//!
//! match market.initiate_purchase("I1").await? {
//!     PurchaseOutcome::Completed(receipt) => println!("paid, balance {:?}", receipt.balance),
//!     PurchaseOutcome::AwaitingConfirmation(pending) => {
//!         market.finalize(pending).await?;
//!     }
//! }
//! # Ok(())
//! # }
//! ```

pub mod catalog;
pub mod events;
pub mod history;
pub mod orchestrator;
pub mod wallet;

#[cfg(test)]
pub(crate) mod test_support;

use std::sync::Arc;

use rust_decimal::Decimal;
use shared::LoginResponse;
use uuid::Uuid;

use crate::config::ClientConfig;
use crate::core::error::{MarketError, Result};
use crate::core::service::{LedgerService, SessionStore};
use crate::model::history::ReconciledHistory;
use crate::model::item::{Item, NewListing};
use crate::model::transaction::{PendingTransaction, PurchaseReceipt};
use crate::model::user::{Credential, User};
use crate::services::api::LedgerClient;
use crate::services::session::FileSessionStore;
use crate::utils::pricing::PriceBreakdown;

pub use catalog::CatalogMirror;
pub use events::{EventSink, MarketEvent};
pub use history::HistoryReconciler;
pub use orchestrator::{PurchaseOutcome, PurchaseState, TransactionOrchestrator};
pub use wallet::WalletView;

/// Prefix of ids given to listings not yet confirmed by the service.
const PROVISIONAL_PREFIX: &str = "local-";

pub struct Marketplace {
    ledger: Arc<dyn LedgerService>,
    catalog: Arc<CatalogMirror>,
    wallet: Arc<WalletView>,
    orchestrator: TransactionOrchestrator,
    history: HistoryReconciler,
    events: EventSink,
}

impl Marketplace {
    pub fn new(ledger: Arc<dyn LedgerService>, store: Arc<dyn SessionStore>) -> Self {
        Self::with_events(ledger, store, EventSink::disabled())
    }

    pub fn with_events(
        ledger: Arc<dyn LedgerService>,
        store: Arc<dyn SessionStore>,
        events: EventSink,
    ) -> Self {
        let catalog = Arc::new(CatalogMirror::new(events.clone()));
        let wallet = Arc::new(WalletView::new(ledger.clone(), store, events.clone()));
        let orchestrator = TransactionOrchestrator::new(
            ledger.clone(),
            catalog.clone(),
            wallet.clone(),
            events.clone(),
        );
        let history = HistoryReconciler::new(ledger.clone(), events.clone());
        Self {
            ledger,
            catalog,
            wallet,
            orchestrator,
            history,
            events,
        }
    }

    /// HTTP ledger client and file session store from `config`.
    pub fn from_config(config: &ClientConfig) -> Self {
        Self::new(
            Arc::new(LedgerClient::from_config(config)),
            Arc::new(FileSessionStore::new(config.session_file.clone())),
        )
    }

    // ---- session ----

    pub fn hydrate(&self) -> Result<Option<User>> {
        self.wallet.hydrate()
    }

    pub fn sign_in(&self, login: LoginResponse) -> Result<User> {
        self.wallet.sign_in(login)
    }

    pub fn logout(&self) -> Result<()> {
        self.wallet.logout()?;
        self.events.publish(MarketEvent::SignedOut);
        Ok(())
    }

    pub fn current_user(&self) -> Option<User> {
        self.wallet.current_user()
    }

    // ---- catalog ----

    /// Replace the catalog with the service's listing.
    pub async fn load_catalog(&self) -> Result<usize> {
        let raw_items = self.ledger.list_items().await?;
        Ok(self.catalog.load(raw_items))
    }

    pub fn catalog(&self) -> Vec<Item> {
        self.catalog.items()
    }

    pub fn remove_from_catalog(&self, item_id: &str) -> bool {
        self.catalog.remove(item_id)
    }

    /// Create a listing owned by the signed-in user.
    ///
    /// The item shows up at the front of the catalog right away and is
    /// replaced by the service's record once accepted, or removed again if
    /// the service rejects it.
    pub async fn post_listing(&self, listing: NewListing) -> Result<Item> {
        let (user, credential) = self.signed_in()?;
        listing.validate()?;

        let provisional_id = format!("{}{}", PROVISIONAL_PREFIX, Uuid::new_v4());
        self.catalog
            .upsert(listing.provisional_item(provisional_id.clone(), &user.id, 0));

        match self
            .ledger
            .create_item(&credential, listing.to_request(&user.id))
            .await
        {
            Ok(raw) => {
                let item = Item::from_raw(raw, 0);
                self.catalog.remove(&provisional_id);
                self.catalog.upsert(item.clone());
                tracing::info!(item_id = %item.id, "Listing posted");
                self.events.publish(MarketEvent::ListingPosted {
                    item_id: item.id.clone(),
                });
                Ok(item)
            }
            Err(e) => {
                tracing::warn!(error = %e, "Listing rejected, rolling back");
                self.catalog.remove(&provisional_id);
                Err(e)
            }
        }
    }

    /// Delete a listing. Only its seller or an admin may do so; the catalog
    /// entry goes away once the service confirmed.
    pub async fn delete_listing(&self, item_id: &str) -> Result<()> {
        let (user, credential) = self.signed_in()?;
        let item = self
            .catalog
            .get(item_id)
            .ok_or_else(|| MarketError::ItemUnavailable(item_id.to_string()))?;
        if !item.is_owned_by(&user.id) && !user.is_admin() {
            return Err(MarketError::NotAuthorized(format!(
                "only the seller or an admin can delete {}",
                item_id
            )));
        }

        self.ledger.delete_item(&credential, item_id, user.role).await?;
        self.catalog.remove(item_id);
        tracing::info!(item_id, role = %user.role, "Listing deleted");
        Ok(())
    }

    // ---- purchases ----

    pub async fn initiate_purchase(&self, item_id: &str) -> Result<PurchaseOutcome> {
        let buyer = self.current_user().ok_or(MarketError::AuthRequired)?;
        let item = self
            .catalog
            .get(item_id)
            .ok_or_else(|| MarketError::ItemUnavailable(item_id.to_string()))?;
        self.orchestrator.initiate_purchase(&item, &buyer).await
    }

    pub async fn finalize(&self, pending: PendingTransaction) -> Result<PurchaseReceipt> {
        let buyer = self.current_user().ok_or(MarketError::AuthRequired)?;
        self.orchestrator.finalize(pending, &buyer).await
    }

    pub fn cancel(&self, pending: PendingTransaction) {
        self.orchestrator.cancel(pending)
    }

    /// Checkout summary for a listed item. Display only.
    pub fn price_breakdown(&self, item_id: &str) -> Result<PriceBreakdown> {
        self.catalog
            .get(item_id)
            .map(|item| PriceBreakdown::for_price(item.price))
            .ok_or_else(|| MarketError::ItemUnavailable(item_id.to_string()))
    }

    // ---- history and wallet ----

    pub async fn reconcile_history(&self) -> Result<ReconciledHistory> {
        let user = self.current_user().ok_or(MarketError::AuthRequired)?;
        self.history.reconcile(&user).await
    }

    pub async fn refresh_wallet(&self) -> Result<User> {
        self.wallet.refresh().await
    }

    pub async fn deposit(&self, amount: Decimal) -> Result<Decimal> {
        self.wallet.deposit(amount).await
    }

    fn signed_in(&self) -> Result<(User, Credential)> {
        let user = self.current_user().ok_or(MarketError::AuthRequired)?;
        let credential = user.credential.clone().ok_or(MarketError::AuthRequired)?;
        Ok((user, credential))
    }
}
