//! In-memory ledger and fixtures for unit tests.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use rust_decimal::Decimal;
use shared::{
    CreateTransactionRequest, FinalizeResponse, GoodsKind, LoginResponse, NewListingRequest,
    RawItem, RawTransaction, RawUser, Role, TransactionFilter,
};
use tokio::sync::Notify;

use crate::core::error::{MarketError, Result};
use crate::core::service::LedgerService;
use crate::model::user::{Credential, User};

pub(crate) const CREATE: &str = "create_pending_transaction";
pub(crate) const FINALIZE: &str = "finalize_transaction";
pub(crate) const BUYER_FEED: &str = "fetch_transactions(buyer)";
pub(crate) const SELLER_FEED: &str = "fetch_transactions(seller)";
pub(crate) const PROFILE: &str = "fetch_profile";
pub(crate) const BALANCE: &str = "fetch_wallet_balance";
pub(crate) const DEPOSIT: &str = "deposit_to_wallet";
pub(crate) const LIST_ITEMS: &str = "list_items";
pub(crate) const CREATE_ITEM: &str = "create_item";
pub(crate) const DELETE_ITEM: &str = "delete_item";

struct LedgerState {
    profile: RawUser,
    balance: Decimal,
    items: Vec<RawItem>,
    transactions: Vec<RawTransaction>,
    buyer_feed: Option<Vec<RawTransaction>>,
    seller_feed: Option<Vec<RawTransaction>>,
    ack_timestamp: Option<String>,
    failures: HashMap<&'static str, MarketError>,
    calls: HashMap<&'static str, usize>,
    next_id: usize,
}

/// Ledger that keeps one account's balance, items and transactions in
/// memory, counts calls per operation and fails operations on request.
pub(crate) struct ScriptedLedger {
    state: Mutex<LedgerState>,
    create_gate: Option<Arc<Notify>>,
}

impl ScriptedLedger {
    pub(crate) fn new(user_id: &str, balance: i64) -> Self {
        Self {
            state: Mutex::new(LedgerState {
                profile: raw_user(user_id),
                balance: Decimal::from(balance),
                items: Vec::new(),
                transactions: Vec::new(),
                buyer_feed: None,
                seller_feed: None,
                ack_timestamp: None,
                failures: HashMap::new(),
                calls: HashMap::new(),
                next_id: 1,
            }),
            create_gate: None,
        }
    }

    pub(crate) fn with_items(self, items: Vec<RawItem>) -> Self {
        self.state.lock().items = items;
        self
    }

    /// Block transaction creation until the gate is notified.
    pub(crate) fn with_create_gate(mut self, gate: Arc<Notify>) -> Self {
        self.create_gate = Some(gate);
        self
    }

    /// Serve fixed feeds instead of filtering stored transactions.
    pub(crate) fn with_feeds(self, buyer: Vec<RawTransaction>, seller: Vec<RawTransaction>) -> Self {
        {
            let mut state = self.state.lock();
            state.buyer_feed = Some(buyer);
            state.seller_feed = Some(seller);
        }
        self
    }

    /// Stamp created transactions with `created_at` instead of a valid time.
    pub(crate) fn with_ack_timestamp(self, created_at: &str) -> Self {
        self.state.lock().ack_timestamp = Some(created_at.to_string());
        self
    }

    /// Make every call to `operation` fail with `error` until cleared.
    pub(crate) fn fail(&self, operation: &'static str, error: MarketError) {
        self.state.lock().failures.insert(operation, error);
    }

    pub(crate) fn clear_failure(&self, operation: &'static str) {
        self.state.lock().failures.remove(operation);
    }

    pub(crate) fn calls(&self, operation: &'static str) -> usize {
        self.state.lock().calls.get(operation).copied().unwrap_or(0)
    }

    pub(crate) fn total_calls(&self) -> usize {
        self.state.lock().calls.values().sum()
    }

    pub(crate) fn balance(&self) -> Decimal {
        self.state.lock().balance
    }

    pub(crate) fn set_balance(&self, balance: i64) {
        self.state.lock().balance = Decimal::from(balance);
    }

    pub(crate) fn transaction(&self, id: &str) -> Option<RawTransaction> {
        self.state.lock().transactions.iter().find(|tx| tx.id == id).cloned()
    }

    pub(crate) fn item_ids(&self) -> Vec<String> {
        self.state.lock().items.iter().map(|item| item.id.clone()).collect()
    }

    /// Count the call and return the scripted failure, if any.
    fn enter(&self, operation: &'static str) -> Result<()> {
        let mut state = self.state.lock();
        *state.calls.entry(operation).or_insert(0) += 1;
        match state.failures.get(operation) {
            Some(error) => Err(error.clone()),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl LedgerService for ScriptedLedger {
    async fn create_pending_transaction(
        &self,
        _credential: &Credential,
        request: CreateTransactionRequest,
    ) -> Result<RawTransaction> {
        if let Some(gate) = &self.create_gate {
            gate.notified().await;
        }
        self.enter(CREATE)?;
        if request.buyer_id == request.seller_id {
            return Err(MarketError::SelfPurchase(request.item_id));
        }

        let mut state = self.state.lock();
        let n = state.next_id;
        state.next_id += 1;
        let transaction = RawTransaction {
            id: format!("T{}", n),
            buyer_id: request.buyer_id,
            seller_id: request.seller_id,
            item_id: request.item_id,
            goods_kind: request.goods_kind,
            title: request.title,
            price: request.price,
            status: "PENDING".to_string(),
            created_at: state
                .ack_timestamp
                .clone()
                .unwrap_or_else(|| format!("2024-05-01T12:{:02}:00Z", n % 60)),
        };
        state.transactions.push(transaction.clone());
        Ok(transaction)
    }

    async fn finalize_transaction(
        &self,
        _credential: &Credential,
        transaction_id: &str,
    ) -> Result<FinalizeResponse> {
        self.enter(FINALIZE)?;
        let mut state = self.state.lock();
        let balance = state.balance;

        let Some(transaction) = state.transactions.iter_mut().find(|tx| tx.id == transaction_id)
        else {
            return Err(MarketError::TransactionNotFound(transaction_id.to_string()));
        };
        if transaction.status != "PENDING" {
            return Err(MarketError::Api {
                status: 409,
                message: format!("transaction is {}", transaction.status),
            });
        }
        if balance < transaction.price {
            return Err(MarketError::InsufficientFunds(format!(
                "balance {} < price {}",
                balance, transaction.price
            )));
        }

        transaction.status = "COMPLETED".to_string();
        let price = transaction.price;
        let item_id = transaction.item_id.clone();
        state.balance -= price;
        state.items.retain(|item| item.id != item_id);

        Ok(FinalizeResponse {
            id: transaction_id.to_string(),
            status: "COMPLETED".to_string(),
            charged_amount: Some(price),
        })
    }

    async fn fetch_transactions(
        &self,
        _credential: &Credential,
        filter: TransactionFilter,
    ) -> Result<Vec<RawTransaction>> {
        let state_feed = match &filter {
            TransactionFilter::Buyer(_) => {
                self.enter(BUYER_FEED)?;
                self.state.lock().buyer_feed.clone()
            }
            TransactionFilter::Seller(_) => {
                self.enter(SELLER_FEED)?;
                self.state.lock().seller_feed.clone()
            }
        };
        if let Some(feed) = state_feed {
            return Ok(feed);
        }

        let state = self.state.lock();
        Ok(state
            .transactions
            .iter()
            .filter(|tx| match &filter {
                TransactionFilter::Buyer(id) => &tx.buyer_id == id,
                TransactionFilter::Seller(id) => &tx.seller_id == id,
            })
            .cloned()
            .collect())
    }

    async fn fetch_profile(&self, _credential: &Credential) -> Result<RawUser> {
        self.enter(PROFILE)?;
        Ok(self.state.lock().profile.clone())
    }

    async fn fetch_wallet_balance(&self, _credential: &Credential) -> Result<Decimal> {
        self.enter(BALANCE)?;
        Ok(self.state.lock().balance)
    }

    async fn deposit_to_wallet(&self, _credential: &Credential, amount: Decimal) -> Result<Decimal> {
        self.enter(DEPOSIT)?;
        let mut state = self.state.lock();
        state.balance += amount;
        Ok(state.balance)
    }

    async fn list_items(&self) -> Result<Vec<RawItem>> {
        self.enter(LIST_ITEMS)?;
        Ok(self.state.lock().items.clone())
    }

    async fn create_item(
        &self,
        _credential: &Credential,
        listing: NewListingRequest,
    ) -> Result<RawItem> {
        self.enter(CREATE_ITEM)?;
        let mut state = self.state.lock();
        let n = state.next_id;
        state.next_id += 1;
        let item = RawItem {
            id: format!("I{}", 100 + n),
            name: listing.name,
            price: listing.price,
            category: listing.category,
            goods_kind: Some(listing.goods_kind),
            seller_id: listing.seller_id,
            image_url: listing.image_url,
        };
        state.items.insert(0, item.clone());
        Ok(item)
    }

    async fn delete_item(
        &self,
        _credential: &Credential,
        item_id: &str,
        _actor_role: Role,
    ) -> Result<()> {
        self.enter(DELETE_ITEM)?;
        self.state.lock().items.retain(|item| item.id != item_id);
        Ok(())
    }
}

pub(crate) fn raw_user(id: &str) -> RawUser {
    RawUser {
        id: id.to_string(),
        username: id.to_lowercase(),
        email: format!("{}@example.com", id.to_lowercase()),
        full_name: None,
        avatar_url: None,
        role: Role::Standard,
        balance: None,
    }
}

pub(crate) fn login(id: &str) -> LoginResponse {
    LoginResponse {
        user: raw_user(id),
        jwt: format!("tok-{}", id),
    }
}

pub(crate) fn signed_in_user(id: &str, balance: i64) -> User {
    let mut user = User::from_login(login(id));
    user.balance = Decimal::from(balance);
    user
}

pub(crate) fn raw_item(id: &str, seller_id: &str, price: i64, category: &str) -> RawItem {
    RawItem {
        id: id.to_string(),
        name: format!("Item {}", id),
        price: Decimal::from(price),
        category: category.to_string(),
        goods_kind: None,
        seller_id: seller_id.to_string(),
        image_url: None,
    }
}

pub(crate) fn raw_item_of_kind(id: &str, seller_id: &str, price: i64, kind: GoodsKind) -> RawItem {
    RawItem {
        goods_kind: Some(kind),
        ..raw_item(id, seller_id, price, "General")
    }
}

pub(crate) fn raw_tx(id: &str, buyer_id: &str, seller_id: &str, created_at: &str) -> RawTransaction {
    RawTransaction {
        id: id.to_string(),
        buyer_id: buyer_id.to_string(),
        seller_id: seller_id.to_string(),
        item_id: format!("item-{}", id),
        goods_kind: GoodsKind::Real,
        title: format!("Order {}", id),
        price: Decimal::from(10),
        status: "COMPLETED".to_string(),
        created_at: created_at.to_string(),
    }
}
