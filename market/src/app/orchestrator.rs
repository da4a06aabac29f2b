//! # Transaction Orchestrator
//!
//! Runs the purchase protocol against the ledger and keeps the catalog and
//! wallet in line with what the ledger acknowledged.
//!
//! ```text
//! Idle ──> CreatingPending ──┬──> PendingCreated ──┬──> Finalizing ──┬──> Completed
//!                            │                     │                 └──> FailedFinalize
//!                            └──> Failed           └──> Cancelled
//! ```
//!
//! `Virtual` goods go straight from `PendingCreated` to `Finalizing`. `Real`
//! goods stop at `PendingCreated` and hand the [`PendingTransaction`] back to
//! the shell, which later calls [`TransactionOrchestrator::finalize`] or
//! [`TransactionOrchestrator::cancel`].
//!
//! The catalog entry is removed only after the ledger acknowledged the
//! finalize, and the balance is then re-read rather than computed.

use std::collections::HashSet;
use std::sync::Arc;

use parking_lot::Mutex;
use shared::CreateTransactionRequest;
use tracing::Instrument;
use uuid::Uuid;

use crate::app::catalog::CatalogMirror;
use crate::app::events::{EventSink, MarketEvent};
use crate::app::wallet::WalletView;
use crate::core::error::{MarketError, Result};
use crate::core::service::LedgerService;
use crate::model::item::Item;
use crate::model::transaction::{PendingTransaction, PurchaseReceipt, TransactionStatus};
use crate::model::user::{Credential, User};
use crate::model::ItemId;

/// State of one purchase attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PurchaseState {
    Idle,
    CreatingPending,
    PendingCreated,
    Finalizing,
    Completed,
    /// Creation failed or its acknowledgement was unusable. In the latter
    /// case the ledger may hold a `PENDING` record the client never uses.
    Failed,
    /// Finalize failed; the ledger record stays `PENDING`.
    FailedFinalize,
    /// Buyer walked away; the ledger record stays `PENDING`.
    Cancelled,
}

impl PurchaseState {
    pub fn can_transition_to(&self, next: &PurchaseState) -> bool {
        matches!(
            (self, next),
            (PurchaseState::Idle, PurchaseState::CreatingPending)
                | (PurchaseState::CreatingPending, PurchaseState::PendingCreated)
                | (PurchaseState::CreatingPending, PurchaseState::Failed)
                | (PurchaseState::PendingCreated, PurchaseState::Finalizing)
                | (PurchaseState::PendingCreated, PurchaseState::Cancelled)
                | (PurchaseState::Finalizing, PurchaseState::Completed)
                | (PurchaseState::Finalizing, PurchaseState::FailedFinalize)
        )
    }

    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            PurchaseState::Completed
                | PurchaseState::Failed
                | PurchaseState::FailedFinalize
                | PurchaseState::Cancelled
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PurchaseState::Idle => "idle",
            PurchaseState::CreatingPending => "creating_pending",
            PurchaseState::PendingCreated => "pending_created",
            PurchaseState::Finalizing => "finalizing",
            PurchaseState::Completed => "completed",
            PurchaseState::Failed => "failed",
            PurchaseState::FailedFinalize => "failed_finalize",
            PurchaseState::Cancelled => "cancelled",
        }
    }
}

impl std::fmt::Display for PurchaseState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What `initiate_purchase` produced.
#[derive(Debug, Clone, PartialEq)]
pub enum PurchaseOutcome {
    /// Instant checkout finished.
    Completed(PurchaseReceipt),
    /// The buyer has to confirm before payment.
    AwaitingConfirmation(PendingTransaction),
}

/// Tracks and publishes the state of one attempt.
struct PurchaseAttempt<'a> {
    attempt_id: Uuid,
    item_id: ItemId,
    state: PurchaseState,
    events: &'a EventSink,
}

impl<'a> PurchaseAttempt<'a> {
    fn start(attempt_id: Uuid, item_id: &str, events: &'a EventSink) -> Self {
        Self::resume(attempt_id, item_id, PurchaseState::Idle, events)
    }

    fn resume(attempt_id: Uuid, item_id: &str, state: PurchaseState, events: &'a EventSink) -> Self {
        Self {
            attempt_id,
            item_id: item_id.to_string(),
            state,
            events,
        }
    }

    fn advance(&mut self, next: PurchaseState) {
        if !self.state.can_transition_to(&next) {
            tracing::error!(from = %self.state, to = %next, "Illegal purchase transition ignored");
            return;
        }
        tracing::info!(from = %self.state, to = %next, "Purchase state changed");
        self.state = next;
        self.events.publish(MarketEvent::PurchaseState {
            attempt_id: self.attempt_id,
            item_id: self.item_id.clone(),
            state: next,
        });
    }
}

/// Marks an item as having a purchase in progress until dropped.
pub struct InFlightGuard {
    items: Arc<Mutex<HashSet<ItemId>>>,
    item_id: ItemId,
}

impl InFlightGuard {
    fn acquire(items: &Arc<Mutex<HashSet<ItemId>>>, item_id: &str) -> Result<Self> {
        if !items.lock().insert(item_id.to_string()) {
            return Err(MarketError::PurchaseInFlight(item_id.to_string()));
        }
        Ok(Self {
            items: Arc::clone(items),
            item_id: item_id.to_string(),
        })
    }
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.items.lock().remove(&self.item_id);
    }
}

pub struct TransactionOrchestrator {
    ledger: Arc<dyn LedgerService>,
    catalog: Arc<CatalogMirror>,
    wallet: Arc<WalletView>,
    in_flight: Arc<Mutex<HashSet<ItemId>>>,
    events: EventSink,
}

impl TransactionOrchestrator {
    pub fn new(
        ledger: Arc<dyn LedgerService>,
        catalog: Arc<CatalogMirror>,
        wallet: Arc<WalletView>,
        events: EventSink,
    ) -> Self {
        Self {
            ledger,
            catalog,
            wallet,
            in_flight: Arc::new(Mutex::new(HashSet::new())),
            events,
        }
    }

    /// Whether a purchase of `item_id` is currently running.
    pub fn is_in_flight(&self, item_id: &str) -> bool {
        self.in_flight.lock().contains(item_id)
    }

    /// Start buying `item` for `buyer`.
    ///
    /// Missing credentials and self-purchases are rejected before any
    /// request is made. Virtual goods are finalized immediately; real goods
    /// come back as [`PurchaseOutcome::AwaitingConfirmation`].
    pub async fn initiate_purchase(&self, item: &Item, buyer: &User) -> Result<PurchaseOutcome> {
        let attempt_id = Uuid::new_v4();
        let span = tracing::info_span!(
            "purchase",
            %attempt_id,
            item_id = %item.id,
            goods_kind = %item.goods_kind
        );
        self.run_purchase(item, buyer, attempt_id).instrument(span).await
    }

    async fn run_purchase(&self, item: &Item, buyer: &User, attempt_id: Uuid) -> Result<PurchaseOutcome> {
        let credential = buyer.credential.clone().ok_or(MarketError::AuthRequired)?;
        if item.is_owned_by(&buyer.id) {
            tracing::warn!(buyer_id = %buyer.id, "Self-purchase rejected");
            return Err(MarketError::SelfPurchase(item.id.clone()));
        }
        let _guard = InFlightGuard::acquire(&self.in_flight, &item.id)?;

        let mut attempt = PurchaseAttempt::start(attempt_id, &item.id, &self.events);
        attempt.advance(PurchaseState::CreatingPending);

        let request = CreateTransactionRequest {
            buyer_id: buyer.id.clone(),
            seller_id: item.seller_id.clone(),
            item_id: item.id.clone(),
            goods_kind: item.goods_kind,
            title: item.name.clone(),
            price: item.price,
        };
        let raw = match self.ledger.create_pending_transaction(&credential, request).await {
            Ok(raw) => raw,
            Err(e) => {
                tracing::warn!(error = %e, "Pending transaction not created");
                attempt.advance(PurchaseState::Failed);
                return Err(e);
            }
        };
        let transaction_id = raw.id.clone();
        let pending = match PendingTransaction::from_ack(raw, attempt_id) {
            Ok(pending) => pending,
            Err(e) => {
                tracing::warn!(
                    %transaction_id,
                    error = %e,
                    "Unusable acknowledgement, ledger record left pending"
                );
                attempt.advance(PurchaseState::Failed);
                return Err(e);
            }
        };
        attempt.advance(PurchaseState::PendingCreated);

        if item.goods_kind.is_instant() {
            let receipt = self.finalize_pending(pending, &credential, &mut attempt).await?;
            Ok(PurchaseOutcome::Completed(receipt))
        } else {
            tracing::info!(transaction_id = %pending.id(), "Awaiting buyer confirmation");
            Ok(PurchaseOutcome::AwaitingConfirmation(pending))
        }
    }

    /// Pay for a pending transaction the buyer confirmed.
    pub async fn finalize(&self, pending: PendingTransaction, buyer: &User) -> Result<PurchaseReceipt> {
        let span = tracing::info_span!(
            "purchase",
            attempt_id = %pending.attempt_id(),
            item_id = %pending.item_id(),
            transaction_id = %pending.id()
        );
        async move {
            let credential = buyer.credential.clone().ok_or(MarketError::AuthRequired)?;
            if pending.buyer_id() != buyer.id {
                return Err(MarketError::NotAuthorized(format!(
                    "transaction {} belongs to another buyer",
                    pending.id()
                )));
            }
            let _guard = InFlightGuard::acquire(&self.in_flight, pending.item_id())?;

            let mut attempt = PurchaseAttempt::resume(
                pending.attempt_id(),
                pending.item_id(),
                PurchaseState::PendingCreated,
                &self.events,
            );
            self.finalize_pending(pending, &credential, &mut attempt).await
        }
        .instrument(span)
        .await
    }

    /// Drop a pending transaction. No request is made; the ledger record
    /// stays `PENDING` until the ledger expires it.
    pub fn cancel(&self, pending: PendingTransaction) {
        let span = tracing::info_span!(
            "purchase",
            attempt_id = %pending.attempt_id(),
            item_id = %pending.item_id()
        );
        let _entered = span.enter();

        let mut attempt = PurchaseAttempt::resume(
            pending.attempt_id(),
            pending.item_id(),
            PurchaseState::PendingCreated,
            &self.events,
        );
        attempt.advance(PurchaseState::Cancelled);
        tracing::info!(transaction_id = %pending.id(), "Purchase cancelled, ledger record left pending");
    }

    async fn finalize_pending(
        &self,
        mut pending: PendingTransaction,
        credential: &Credential,
        attempt: &mut PurchaseAttempt<'_>,
    ) -> Result<PurchaseReceipt> {
        attempt.advance(PurchaseState::Finalizing);

        let response = match self.ledger.finalize_transaction(credential, pending.id()).await {
            Ok(response) => response,
            Err(e) => {
                if e.offers_top_up() {
                    tracing::warn!(error = %e, "Insufficient funds, transaction left pending");
                } else {
                    tracing::warn!(error = %e, "Finalize failed");
                }
                attempt.advance(PurchaseState::FailedFinalize);
                return Err(e);
            }
        };

        let status = TransactionStatus::parse(&response.status);
        if !status.is_completed() {
            attempt.advance(PurchaseState::FailedFinalize);
            return Err(MarketError::Ledger(format!(
                "transaction {} finalized with status {}",
                pending.id(),
                status
            )));
        }
        pending.set_status(status);

        self.catalog.remove(pending.item_id());
        let balance = match self.wallet.refresh_balance().await {
            Ok(balance) => Some(balance),
            Err(e) => {
                tracing::warn!(error = %e, "Balance not re-read after purchase");
                None
            }
        };

        attempt.advance(PurchaseState::Completed);
        tracing::info!(
            transaction_id = %pending.id(),
            charged = ?response.charged_amount,
            "Purchase completed"
        );

        Ok(PurchaseReceipt {
            transaction_id: pending.id().to_string(),
            item_id: pending.item_id().to_string(),
            title: pending.title().to_string(),
            price: pending.price(),
            status: pending.status().clone(),
            charged_amount: response.charged_amount,
            balance,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::test_support::{self, login, raw_item, raw_item_of_kind, ScriptedLedger};
    use crate::services::session::MemorySessionStore;
    use async_channel::Receiver;
    use rust_decimal::Decimal;
    use shared::GoodsKind;
    use tokio::sync::Notify;

    struct Fixture {
        ledger: Arc<ScriptedLedger>,
        catalog: Arc<CatalogMirror>,
        wallet: Arc<WalletView>,
        orchestrator: Arc<TransactionOrchestrator>,
        events: Receiver<MarketEvent>,
    }

    impl Fixture {
        async fn new(ledger: ScriptedLedger) -> Self {
            let ledger = Arc::new(ledger);
            let (sink, events) = EventSink::channel();
            let catalog = Arc::new(CatalogMirror::new(sink.clone()));
            let wallet = Arc::new(WalletView::new(
                ledger.clone(),
                Arc::new(MemorySessionStore::default()),
                sink.clone(),
            ));
            wallet.sign_in(login("B1")).unwrap();
            wallet.refresh().await.unwrap();
            catalog.load(ledger.list_items().await.unwrap());

            let orchestrator = Arc::new(TransactionOrchestrator::new(
                ledger.clone(),
                catalog.clone(),
                wallet.clone(),
                sink,
            ));
            Self {
                ledger,
                catalog,
                wallet,
                orchestrator,
                events,
            }
        }

        fn buyer(&self) -> User {
            self.wallet.current_user().unwrap()
        }

        fn item(&self, id: &str) -> Item {
            self.catalog.get(id).unwrap()
        }

        fn states(&self) -> Vec<PurchaseState> {
            let mut states = Vec::new();
            while let Ok(event) = self.events.try_recv() {
                if let MarketEvent::PurchaseState { state, .. } = event {
                    states.push(state);
                }
            }
            states
        }
    }

    #[test]
    fn test_state_transitions() {
        use PurchaseState::*;
        assert!(Idle.can_transition_to(&CreatingPending));
        assert!(CreatingPending.can_transition_to(&PendingCreated));
        assert!(CreatingPending.can_transition_to(&Failed));
        assert!(PendingCreated.can_transition_to(&Finalizing));
        assert!(PendingCreated.can_transition_to(&Cancelled));
        assert!(Finalizing.can_transition_to(&Completed));
        assert!(Finalizing.can_transition_to(&FailedFinalize));

        assert!(!Idle.can_transition_to(&Finalizing));
        assert!(!CreatingPending.can_transition_to(&Completed));
        assert!(!Finalizing.can_transition_to(&Cancelled));
        assert!(!Completed.can_transition_to(&Finalizing));
        assert!(!FailedFinalize.can_transition_to(&Finalizing));
        assert!(Completed.is_terminal() && Cancelled.is_terminal());
        assert!(!PendingCreated.is_terminal());
    }

    #[tokio::test]
    async fn test_virtual_purchase_removes_item_and_rereads_balance() {
        let fx = Fixture::new(
            ScriptedLedger::new("B1", 150)
                .with_items(vec![raw_item_of_kind("I1", "S1", 100, GoodsKind::Virtual)]),
        )
        .await;
        fx.states();

        let outcome = fx
            .orchestrator
            .initiate_purchase(&fx.item("I1"), &fx.buyer())
            .await
            .unwrap();

        let PurchaseOutcome::Completed(receipt) = outcome else {
            panic!("expected instant completion");
        };
        assert_eq!(receipt.item_id, "I1");
        assert_eq!(receipt.status, TransactionStatus::Completed);
        assert_eq!(receipt.balance, Some(Decimal::from(50)));
        assert!(!fx.catalog.contains("I1"));
        assert_eq!(fx.wallet.balance(), Some(Decimal::from(50)));
        assert_eq!(fx.ledger.calls(test_support::BALANCE), 2);
        assert!(!fx.orchestrator.is_in_flight("I1"));
        assert_eq!(
            fx.states(),
            vec![
                PurchaseState::CreatingPending,
                PurchaseState::PendingCreated,
                PurchaseState::Finalizing,
                PurchaseState::Completed,
            ]
        );
    }

    #[tokio::test]
    async fn test_receipt_balance_is_only_a_freshly_read_value() {
        let fx = Fixture::new(ScriptedLedger::new("B1", 150).with_items(vec![
            raw_item_of_kind("I1", "S1", 100, GoodsKind::Virtual),
            raw_item_of_kind("I2", "S1", 20, GoodsKind::Virtual),
        ]))
        .await;

        // profile down: the balance is still read from the ledger
        fx.ledger.fail(test_support::PROFILE, MarketError::Network("offline".into()));
        let PurchaseOutcome::Completed(receipt) = fx
            .orchestrator
            .initiate_purchase(&fx.item("I1"), &fx.buyer())
            .await
            .unwrap()
        else {
            panic!("expected instant completion");
        };
        assert_eq!(receipt.balance, Some(Decimal::from(50)));
        assert_eq!(fx.wallet.balance(), Some(Decimal::from(50)));

        // balance down: no figure rather than the pre-purchase one
        fx.ledger.clear_failure(test_support::PROFILE);
        fx.ledger.fail(test_support::BALANCE, MarketError::Network("offline".into()));
        let PurchaseOutcome::Completed(receipt) = fx
            .orchestrator
            .initiate_purchase(&fx.item("I2"), &fx.buyer())
            .await
            .unwrap()
        else {
            panic!("expected instant completion");
        };
        assert_eq!(receipt.balance, None);
        assert_eq!(fx.ledger.balance(), Decimal::from(30));
        assert!(!fx.catalog.contains("I2"));
    }

    #[tokio::test]
    async fn test_unusable_acknowledgement_fails_the_attempt() {
        let fx = Fixture::new(
            ScriptedLedger::new("B1", 150)
                .with_items(vec![raw_item_of_kind("I1", "S1", 100, GoodsKind::Virtual)])
                .with_ack_timestamp("not a date"),
        )
        .await;
        fx.states();

        let err = fx
            .orchestrator
            .initiate_purchase(&fx.item("I1"), &fx.buyer())
            .await
            .unwrap_err();

        assert!(matches!(err, MarketError::Decode(_)));
        assert_eq!(fx.ledger.calls(test_support::FINALIZE), 0);
        assert!(fx.catalog.contains("I1"));
        assert!(!fx.orchestrator.is_in_flight("I1"));
        assert_eq!(fx.states().last(), Some(&PurchaseState::Failed));
    }

    #[tokio::test]
    async fn test_category_marker_purchase_is_instant() {
        let fx = Fixture::new(
            ScriptedLedger::new("B1", 150).with_items(vec![raw_item("I1", "S1", 100, "Games|Virtual")]),
        )
        .await;

        let outcome = fx
            .orchestrator
            .initiate_purchase(&fx.item("I1"), &fx.buyer())
            .await
            .unwrap();
        assert!(matches!(outcome, PurchaseOutcome::Completed(_)));
    }

    #[tokio::test]
    async fn test_real_purchase_waits_for_confirmation() {
        let fx = Fixture::new(
            ScriptedLedger::new("B1", 150)
                .with_items(vec![raw_item_of_kind("I2", "S1", 120, GoodsKind::Real)]),
        )
        .await;

        let outcome = fx
            .orchestrator
            .initiate_purchase(&fx.item("I2"), &fx.buyer())
            .await
            .unwrap();
        let PurchaseOutcome::AwaitingConfirmation(pending) = outcome else {
            panic!("expected a pending transaction");
        };
        assert!(fx.catalog.contains("I2"));
        assert_eq!(fx.ledger.calls(test_support::FINALIZE), 0);
        assert_eq!(pending.title(), "Item I2");
        assert_eq!(pending.price(), Decimal::from(120));
        assert!(pending.status().is_pending());

        let receipt = fx.orchestrator.finalize(pending, &fx.buyer()).await.unwrap();
        assert!(!fx.catalog.contains("I2"));
        assert_eq!(receipt.balance, Some(Decimal::from(30)));
    }

    #[tokio::test]
    async fn test_snapshot_survives_catalog_edits() {
        let fx = Fixture::new(
            ScriptedLedger::new("B1", 500)
                .with_items(vec![raw_item_of_kind("I2", "S1", 120, GoodsKind::Real)]),
        )
        .await;

        let PurchaseOutcome::AwaitingConfirmation(pending) = fx
            .orchestrator
            .initiate_purchase(&fx.item("I2"), &fx.buyer())
            .await
            .unwrap()
        else {
            panic!("expected a pending transaction");
        };

        let mut edited = fx.item("I2");
        edited.price = Decimal::from(999);
        edited.name = "Repriced".to_string();
        fx.catalog.upsert(edited);

        let receipt = fx.orchestrator.finalize(pending, &fx.buyer()).await.unwrap();
        assert_eq!(receipt.price, Decimal::from(120));
        assert_eq!(receipt.title, "Item I2");
    }

    #[tokio::test]
    async fn test_self_purchase_rejected_without_ledger_calls() {
        let fx = Fixture::new(ScriptedLedger::new("B1", 150).with_items(vec![
            raw_item("I1", "B1", 0, "Games|Virtual"),
            raw_item("I2", "B1", 5000, "Furniture"),
            raw_item_of_kind("I3", "B1", 1, GoodsKind::Real),
        ]))
        .await;
        let before = fx.ledger.total_calls();

        for id in ["I1", "I2", "I3"] {
            let err = fx
                .orchestrator
                .initiate_purchase(&fx.item(id), &fx.buyer())
                .await
                .unwrap_err();
            assert_eq!(err, MarketError::SelfPurchase(id.to_string()));
            assert!(err.is_rejected_before_network());
        }
        assert_eq!(fx.ledger.total_calls(), before);
        assert_eq!(fx.catalog.len(), 3);
    }

    #[tokio::test]
    async fn test_missing_credential_rejected_without_ledger_calls() {
        let fx = Fixture::new(
            ScriptedLedger::new("B1", 150).with_items(vec![raw_item("I1", "S1", 100, "A")]),
        )
        .await;
        let before = fx.ledger.total_calls();

        let mut guest = fx.buyer();
        guest.credential = None;
        let err = fx
            .orchestrator
            .initiate_purchase(&fx.item("I1"), &guest)
            .await
            .unwrap_err();
        assert_eq!(err, MarketError::AuthRequired);
        assert_eq!(fx.ledger.total_calls(), before);
    }

    #[tokio::test]
    async fn test_insufficient_funds_keeps_item_and_balance() {
        let fx = Fixture::new(
            ScriptedLedger::new("B1", 50)
                .with_items(vec![raw_item_of_kind("I1", "S1", 100, GoodsKind::Virtual)]),
        )
        .await;
        fx.states();

        let err = fx
            .orchestrator
            .initiate_purchase(&fx.item("I1"), &fx.buyer())
            .await
            .unwrap_err();

        assert!(err.offers_top_up());
        assert!(fx.catalog.contains("I1"));
        assert_eq!(fx.wallet.balance(), Some(Decimal::from(50)));
        assert_eq!(fx.ledger.balance(), Decimal::from(50));
        assert_eq!(fx.ledger.transaction("T1").map(|tx| tx.status), Some("PENDING".to_string()));
        assert_eq!(fx.ledger.calls(test_support::FINALIZE), 1);
        assert_eq!(fx.states().last(), Some(&PurchaseState::FailedFinalize));

        // a retry after topping up is a brand new attempt
        fx.wallet.deposit(Decimal::from(100)).await.unwrap();
        let outcome = fx
            .orchestrator
            .initiate_purchase(&fx.item("I1"), &fx.buyer())
            .await
            .unwrap();
        let PurchaseOutcome::Completed(receipt) = outcome else {
            panic!("expected instant completion");
        };
        assert_eq!(receipt.transaction_id, "T2");
        assert_eq!(receipt.balance, Some(Decimal::from(50)));
    }

    #[tokio::test]
    async fn test_create_failure_leaves_nothing_behind() {
        let fx = Fixture::new(
            ScriptedLedger::new("B1", 150)
                .with_items(vec![raw_item_of_kind("I1", "S1", 100, GoodsKind::Virtual)]),
        )
        .await;
        fx.states();
        fx.ledger.fail(test_support::CREATE, MarketError::Network("connection reset".into()));

        let err = fx
            .orchestrator
            .initiate_purchase(&fx.item("I1"), &fx.buyer())
            .await
            .unwrap_err();
        assert_eq!(err, MarketError::Network("connection reset".into()));
        assert_eq!(fx.ledger.calls(test_support::FINALIZE), 0);
        assert!(fx.catalog.contains("I1"));
        assert!(!fx.orchestrator.is_in_flight("I1"));
        assert_eq!(
            fx.states(),
            vec![PurchaseState::CreatingPending, PurchaseState::Failed]
        );
    }

    #[tokio::test]
    async fn test_finalize_unknown_transaction() {
        let fx = Fixture::new(
            ScriptedLedger::new("B1", 150)
                .with_items(vec![raw_item_of_kind("I2", "S1", 100, GoodsKind::Real)]),
        )
        .await;
        let PurchaseOutcome::AwaitingConfirmation(pending) = fx
            .orchestrator
            .initiate_purchase(&fx.item("I2"), &fx.buyer())
            .await
            .unwrap()
        else {
            panic!("expected a pending transaction");
        };

        fx.ledger.fail(
            test_support::FINALIZE,
            MarketError::TransactionNotFound(pending.id().to_string()),
        );
        let err = fx.orchestrator.finalize(pending, &fx.buyer()).await.unwrap_err();
        assert_eq!(err, MarketError::TransactionNotFound("T1".to_string()));
        assert!(fx.catalog.contains("I2"));
    }

    #[tokio::test]
    async fn test_finalize_by_another_buyer_is_refused() {
        let fx = Fixture::new(
            ScriptedLedger::new("B1", 150)
                .with_items(vec![raw_item_of_kind("I2", "S1", 100, GoodsKind::Real)]),
        )
        .await;
        let PurchaseOutcome::AwaitingConfirmation(pending) = fx
            .orchestrator
            .initiate_purchase(&fx.item("I2"), &fx.buyer())
            .await
            .unwrap()
        else {
            panic!("expected a pending transaction");
        };

        let mut stranger = fx.buyer();
        stranger.id = "B2".to_string();
        let err = fx.orchestrator.finalize(pending, &stranger).await.unwrap_err();
        assert!(matches!(err, MarketError::NotAuthorized(_)));
        assert_eq!(fx.ledger.calls(test_support::FINALIZE), 0);
    }

    #[tokio::test]
    async fn test_cancel_makes_no_request() {
        let fx = Fixture::new(
            ScriptedLedger::new("B1", 150)
                .with_items(vec![raw_item_of_kind("I2", "S1", 100, GoodsKind::Real)]),
        )
        .await;
        let PurchaseOutcome::AwaitingConfirmation(pending) = fx
            .orchestrator
            .initiate_purchase(&fx.item("I2"), &fx.buyer())
            .await
            .unwrap()
        else {
            panic!("expected a pending transaction");
        };
        fx.states();
        let before = fx.ledger.total_calls();

        fx.orchestrator.cancel(pending);

        assert_eq!(fx.ledger.total_calls(), before);
        assert!(fx.catalog.contains("I2"));
        assert_eq!(fx.ledger.transaction("T1").map(|tx| tx.status), Some("PENDING".to_string()));
        assert_eq!(fx.states(), vec![PurchaseState::Cancelled]);
    }

    #[tokio::test]
    async fn test_second_buy_while_in_flight_is_rejected() {
        let gate = Arc::new(Notify::new());
        let fx = Fixture::new(
            ScriptedLedger::new("B1", 150)
                .with_items(vec![raw_item_of_kind("I1", "S1", 100, GoodsKind::Virtual)])
                .with_create_gate(gate.clone()),
        )
        .await;

        let first = {
            let orchestrator = fx.orchestrator.clone();
            let item = fx.item("I1");
            let buyer = fx.buyer();
            tokio::spawn(async move { orchestrator.initiate_purchase(&item, &buyer).await })
        };
        while !fx.orchestrator.is_in_flight("I1") {
            tokio::task::yield_now().await;
        }

        let err = fx
            .orchestrator
            .initiate_purchase(&fx.item("I1"), &fx.buyer())
            .await
            .unwrap_err();
        assert_eq!(err, MarketError::PurchaseInFlight("I1".to_string()));

        gate.notify_one();
        let outcome = first.await.unwrap().unwrap();
        assert!(matches!(outcome, PurchaseOutcome::Completed(_)));
        assert_eq!(fx.ledger.calls(test_support::CREATE), 1);
        assert!(!fx.orchestrator.is_in_flight("I1"));
    }
}
