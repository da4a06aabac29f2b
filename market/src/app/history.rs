//! # History Reconciler
//!
//! Builds the user's order history from the buyer-side and seller-side
//! transaction feeds. Both feeds are requested at once; a transaction that
//! shows up in both (or twice in one) is listed once.
//!
//! History is best effort: when one feed fails the other one is shown and
//! the result says what is missing.

use std::collections::HashSet;
use std::sync::Arc;

use shared::{RawTransaction, TransactionFilter};

use crate::app::events::{EventSink, MarketEvent};
use crate::core::error::{MarketError, Result};
use crate::core::service::LedgerService;
use crate::model::history::{HistoryEntry, ReconciledHistory};
use crate::model::user::User;

pub struct HistoryReconciler {
    ledger: Arc<dyn LedgerService>,
    events: EventSink,
}

impl HistoryReconciler {
    pub fn new(ledger: Arc<dyn LedgerService>, events: EventSink) -> Self {
        Self { ledger, events }
    }

    #[tracing::instrument(skip(self, user), fields(user_id = %user.id))]
    pub async fn reconcile(&self, user: &User) -> Result<ReconciledHistory> {
        let credential = user.credential.as_ref().ok_or(MarketError::AuthRequired)?;

        let (bought, sold) = tokio::join!(
            self.ledger
                .fetch_transactions(credential, TransactionFilter::Buyer(user.id.clone())),
            self.ledger
                .fetch_transactions(credential, TransactionFilter::Seller(user.id.clone())),
        );

        let (bought, sold, partial_failure) = match (bought, sold) {
            (Ok(bought), Ok(sold)) => (bought, sold, None),
            (Ok(bought), Err(e)) => (bought, Vec::new(), Some(partial("seller", e))),
            (Err(e), Ok(sold)) => (Vec::new(), sold, Some(partial("buyer", e))),
            (Err(buyer_err), Err(seller_err)) => {
                tracing::error!(buyer = %buyer_err, seller = %seller_err, "Both history feeds failed");
                return Err(buyer_err);
            }
        };

        let entries = merge_feeds(bought, sold, &user.id);
        let history = ReconciledHistory {
            entries,
            partial_failure,
        };

        tracing::info!(count = history.len(), complete = history.is_complete(), "History reconciled");
        self.events.publish(MarketEvent::HistoryReconciled {
            count: history.len(),
            complete: history.is_complete(),
        });
        Ok(history)
    }
}

fn partial(feed: &str, error: MarketError) -> MarketError {
    tracing::warn!(feed, error = %error, "History feed failed, showing partial history");
    MarketError::PartialFetch {
        feed: feed.to_string(),
        reason: error.to_string(),
    }
}

/// Merge the two feeds from the point of view of `user_id`.
///
/// Buyer entries come first, seller entries are added when their id is new.
/// The result is sorted newest first; equal timestamps are ordered by
/// transaction id so the output does not depend on feed order.
pub fn merge_feeds(
    bought: Vec<RawTransaction>,
    sold: Vec<RawTransaction>,
    user_id: &str,
) -> Vec<HistoryEntry> {
    let mut seen = HashSet::new();
    let mut entries: Vec<HistoryEntry> = bought
        .into_iter()
        .chain(sold)
        .filter(|raw| seen.insert(raw.id.clone()))
        .map(|raw| HistoryEntry::from_raw(raw, user_id))
        .collect();

    entries.sort_by(|a, b| b.created_at.cmp(&a.created_at).then_with(|| a.id.cmp(&b.id)));
    entries
}
