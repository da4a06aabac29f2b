//! # Marketplace Events
//!
//! Notifications from the core to the application shell. The shell owns the
//! receiving end and redraws whatever changed.

use async_channel::{Receiver, Sender};
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::app::orchestrator::PurchaseState;
use crate::model::ItemId;

/// State changes published by the marketplace components
#[derive(Debug, Clone, PartialEq)]
pub enum MarketEvent {
    /// Catalog replaced from the service
    CatalogLoaded { count: usize },
    /// Item left the catalog (purchase, deletion or explicit removal)
    ItemRemoved { item_id: ItemId },
    /// Listing accepted by the service
    ListingPosted { item_id: ItemId },
    /// Purchase attempt moved to a new state
    PurchaseState {
        attempt_id: Uuid,
        item_id: ItemId,
        state: PurchaseState,
    },
    /// Balance re-read from the ledger
    WalletRefreshed { balance: Decimal },
    /// History rebuilt; `complete` is false when a feed was missing
    HistoryReconciled { count: usize, complete: bool },
    /// Session cleared
    SignedOut,
}

/// Sending half handed to every component.
///
/// Publishing never blocks. Events are dropped when no shell is listening
/// or the receiver is gone.
#[derive(Debug, Clone, Default)]
pub struct EventSink {
    tx: Option<Sender<MarketEvent>>,
}

impl EventSink {
    /// Sink that discards everything.
    pub fn disabled() -> Self {
        Self { tx: None }
    }

    pub fn new(tx: Sender<MarketEvent>) -> Self {
        Self { tx: Some(tx) }
    }

    /// Unbounded channel; the receiver goes to the shell.
    pub fn channel() -> (Self, Receiver<MarketEvent>) {
        let (tx, rx) = async_channel::unbounded();
        (Self::new(tx), rx)
    }

    pub fn publish(&self, event: MarketEvent) {
        if let Some(tx) = &self.tx {
            if let Err(e) = tx.try_send(event) {
                tracing::trace!(error = %e, "Event dropped");
            }
        }
    }
}
