//! # Wallet View
//!
//! Cached signed-in user and balance. The balance shown is always the last
//! value the ledger reported; it is never adjusted locally.

use std::sync::Arc;

use parking_lot::RwLock;
use rust_decimal::Decimal;
use shared::LoginResponse;

use crate::app::events::{EventSink, MarketEvent};
use crate::core::error::{MarketError, Result};
use crate::core::service::{LedgerService, SessionStore};
use crate::model::user::{Credential, User};
use crate::utils::validation::validate_deposit_amount;

pub struct WalletView {
    ledger: Arc<dyn LedgerService>,
    store: Arc<dyn SessionStore>,
    user: RwLock<Option<User>>,
    events: EventSink,
}

impl WalletView {
    pub fn new(ledger: Arc<dyn LedgerService>, store: Arc<dyn SessionStore>, events: EventSink) -> Self {
        Self {
            ledger,
            store,
            user: RwLock::new(None),
            events,
        }
    }

    /// Load the persisted session, if any.
    ///
    /// An unreadable record (corrupt or half-written file) is discarded and
    /// the view starts signed out, so sign-in and logout keep working.
    pub fn hydrate(&self) -> Result<Option<User>> {
        let user = match self.store.load() {
            Ok(user) => user,
            Err(MarketError::Storage(reason)) => {
                tracing::warn!(%reason, "Stored session unreadable, discarding it");
                self.store.clear()?;
                None
            }
            Err(e) => return Err(e),
        };
        match &user {
            Some(user) => tracing::info!(user_id = %user.id, "Session restored"),
            None => tracing::debug!("No persisted session"),
        }
        *self.user.write() = user.clone();
        Ok(user)
    }

    /// Start a session from a login obtained by the shell.
    pub fn sign_in(&self, login: LoginResponse) -> Result<User> {
        let user = User::from_login(login);
        self.store.save(&user)?;
        *self.user.write() = Some(user.clone());
        tracing::info!(user_id = %user.id, role = %user.role, "Signed in");
        Ok(user)
    }

    pub fn current_user(&self) -> Option<User> {
        self.user.read().clone()
    }

    pub fn balance(&self) -> Option<Decimal> {
        self.user.read().as_ref().map(|user| user.balance)
    }

    /// Credential of the signed-in user.
    pub fn credential(&self) -> Result<Credential> {
        self.user
            .read()
            .as_ref()
            .and_then(|user| user.credential.clone())
            .ok_or(MarketError::AuthRequired)
    }

    /// Re-read profile and balance from the ledger.
    ///
    /// A failed profile fetch keeps the cached user and returns it; only an
    /// expired credential (`AuthRequired`) is reported. A failed balance
    /// fetch after a good profile keeps the previous balance.
    pub async fn refresh(&self) -> Result<User> {
        let credential = self.credential()?;

        let profile = match self.ledger.fetch_profile(&credential).await {
            Ok(profile) => profile,
            Err(MarketError::AuthRequired) => return Err(MarketError::AuthRequired),
            Err(e) => {
                tracing::warn!(error = %e, "Profile refresh failed, keeping cached user");
                return self.current_user().ok_or(e);
            }
        };

        let balance = match self.ledger.fetch_wallet_balance(&credential).await {
            Ok(balance) => Some(balance),
            Err(e) => {
                tracing::warn!(error = %e, "Balance refresh failed, keeping previous balance");
                None
            }
        };

        let updated = {
            let mut guard = self.user.write();
            let Some(user) = guard.as_mut() else {
                // logged out while the requests were in flight
                return Err(MarketError::AuthRequired);
            };
            user.merge_profile(profile);
            if let Some(balance) = balance {
                user.balance = balance;
            }
            user.clone()
        };

        self.persist(&updated);
        if balance.is_some() {
            tracing::info!(balance = %updated.balance, "Wallet refreshed");
            self.events.publish(MarketEvent::WalletRefreshed {
                balance: updated.balance,
            });
        }
        Ok(updated)
    }

    /// Re-read the balance after a charge.
    ///
    /// Unlike [`refresh`](Self::refresh) this never falls back to the cached
    /// balance: it returns the value the ledger just reported, or an error.
    /// Profile data is merged when it arrives; a failed profile fetch only
    /// logs.
    pub async fn refresh_balance(&self) -> Result<Decimal> {
        let credential = self.credential()?;

        let profile = match self.ledger.fetch_profile(&credential).await {
            Ok(profile) => Some(profile),
            Err(MarketError::AuthRequired) => return Err(MarketError::AuthRequired),
            Err(e) => {
                tracing::warn!(error = %e, "Profile refresh failed, keeping cached profile");
                None
            }
        };
        let balance = self.ledger.fetch_wallet_balance(&credential).await?;

        let updated = {
            let mut guard = self.user.write();
            let Some(user) = guard.as_mut() else {
                return Err(MarketError::AuthRequired);
            };
            if let Some(profile) = profile {
                user.merge_profile(profile);
            }
            user.balance = balance;
            user.clone()
        };

        self.persist(&updated);
        tracing::info!(%balance, "Balance re-read");
        self.events.publish(MarketEvent::WalletRefreshed { balance });
        Ok(balance)
    }

    /// Deposit `amount` and store the ledger's post-deposit balance.
    #[tracing::instrument(skip(self), fields(amount = %amount))]
    pub async fn deposit(&self, amount: Decimal) -> Result<Decimal> {
        if let Some(error) = validate_deposit_amount(amount).error {
            return Err(MarketError::InvalidAmount(format!("{}: {}", amount, error)));
        }
        let credential = self.credential()?;

        let balance = self.ledger.deposit_to_wallet(&credential, amount).await?;

        let updated = {
            let mut guard = self.user.write();
            guard.as_mut().map(|user| {
                user.balance = balance;
                user.clone()
            })
        };
        if let Some(user) = updated {
            self.persist(&user);
        }
        self.events.publish(MarketEvent::WalletRefreshed { balance });
        Ok(balance)
    }

    /// Forget the session locally and in the store.
    pub fn logout(&self) -> Result<()> {
        let previous = self.user.write().take();
        self.store.clear()?;
        if let Some(user) = previous {
            tracing::info!(user_id = %user.id, "Signed out");
        }
        Ok(())
    }

    fn persist(&self, user: &User) {
        if let Err(e) = self.store.save(user) {
            tracing::warn!(error = %e, "Failed to persist session");
        }
    }
}
