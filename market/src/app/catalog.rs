//! # Catalog Mirror
//!
//! Local copy of the purchasable items.
//!
//! Purchased items leave the mirror only after the ledger acknowledged the
//! finalize. Listings the current user creates show up immediately and are
//! rolled back if the service rejects them.

use parking_lot::RwLock;
use shared::RawItem;

use crate::app::events::{EventSink, MarketEvent};
use crate::model::item::Item;

pub struct CatalogMirror {
    items: RwLock<Vec<Item>>,
    events: EventSink,
}

impl CatalogMirror {
    pub fn new(events: EventSink) -> Self {
        Self {
            items: RwLock::new(Vec::new()),
            events,
        }
    }

    /// Replace the mirror with `raw_items`, in service order.
    pub fn load(&self, raw_items: Vec<RawItem>) -> usize {
        let items: Vec<Item> = raw_items
            .into_iter()
            .enumerate()
            .map(|(position, raw)| Item::from_raw(raw, position))
            .collect();
        let count = items.len();
        *self.items.write() = items;

        tracing::info!(count, "Catalog loaded");
        self.events.publish(MarketEvent::CatalogLoaded { count });
        count
    }

    /// Remove an item. Returns `false` when it was not there.
    pub fn remove(&self, item_id: &str) -> bool {
        let removed = {
            let mut items = self.items.write();
            let before = items.len();
            items.retain(|item| item.id != item_id);
            items.len() != before
        };

        if removed {
            tracing::debug!(item_id, "Item removed from catalog");
            self.events.publish(MarketEvent::ItemRemoved {
                item_id: item_id.to_string(),
            });
        }
        removed
    }

    /// Replace the item with the same id in place, or insert it at the front.
    pub fn upsert(&self, item: Item) {
        let mut items = self.items.write();
        match items.iter_mut().find(|existing| existing.id == item.id) {
            Some(existing) => *existing = item,
            None => items.insert(0, item),
        }
    }

    pub fn get(&self, item_id: &str) -> Option<Item> {
        self.items.read().iter().find(|item| item.id == item_id).cloned()
    }

    pub fn contains(&self, item_id: &str) -> bool {
        self.items.read().iter().any(|item| item.id == item_id)
    }

    /// Snapshot of the current items.
    pub fn items(&self) -> Vec<Item> {
        self.items.read().clone()
    }

    pub fn len(&self) -> usize {
        self.items.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.read().is_empty()
    }
}
