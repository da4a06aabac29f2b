//! # Ledger Client
//!
//! Main HTTP client for the ledger/listing service, plus the shared response
//! handling used by every endpoint module.

use std::time::Duration;

use reqwest::{Client, Response, StatusCode};
use rust_decimal::Decimal;
use serde::de::DeserializeOwned;
use shared::{
    CreateTransactionRequest, ErrorResponse, FinalizeResponse, NewListingRequest, RawItem,
    RawTransaction, RawUser, Role, TransactionFilter,
};

use crate::config::ClientConfig;
use crate::core::error::{MarketError, Result};
use crate::core::service::LedgerService;
use crate::model::user::Credential;

/// Request timeout used when none is configured.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

const INSUFFICIENT_FUNDS_CODE: &str = "INSUFFICIENT_FUNDS";
const SELF_PURCHASE_CODE: &str = "SELF_PURCHASE";

/// HTTP client for the ledger/listing service.
///
/// Holds one `reqwest::Client` (connection pool) and the service base URL.
pub struct LedgerClient {
    pub(crate) client: Client,
    base_url: String,
}

impl LedgerClient {
    /// Client with the default 10 second timeout.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_timeout(base_url, DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(base_url: impl Into<String>, timeout: Duration) -> Self {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_else(|_| Client::new());

        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { client, base_url }
    }

    pub fn from_config(config: &ClientConfig) -> Self {
        Self::with_timeout(config.api_url.clone(), config.http_timeout)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub(crate) fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

/// Which route a response came from; decides how a few statuses are read.
#[derive(Debug, Clone, Copy)]
pub(crate) enum Endpoint<'a> {
    CreateTransaction { item_id: &'a str },
    Transaction { id: &'a str },
    General,
}

/// Decode a 2xx JSON body, or map the failure.
pub(crate) async fn decode<T: DeserializeOwned>(
    response: Response,
    endpoint: Endpoint<'_>,
) -> Result<T> {
    let status = response.status();
    let body = response.text().await.map_err(transport_error)?;

    if !status.is_success() {
        return Err(error_from_status(status, &body, endpoint));
    }

    serde_json::from_str(&body).map_err(|e| MarketError::Decode(e.to_string()))
}

/// Accept any 2xx, ignoring the body.
pub(crate) async fn ensure_success(response: Response, endpoint: Endpoint<'_>) -> Result<()> {
    let status = response.status();
    if status.is_success() {
        return Ok(());
    }
    let body = response.text().await.map_err(transport_error)?;
    Err(error_from_status(status, &body, endpoint))
}

pub(crate) fn transport_error(err: reqwest::Error) -> MarketError {
    if err.is_decode() {
        MarketError::Decode(err.to_string())
    } else {
        MarketError::Network(err.to_string())
    }
}

/// Map a non-2xx status and its body onto a [`MarketError`].
pub(crate) fn error_from_status(status: StatusCode, body: &str, endpoint: Endpoint<'_>) -> MarketError {
    let parsed = serde_json::from_str::<ErrorResponse>(body).ok();
    let code = parsed.as_ref().and_then(|e| e.code.as_deref());
    let message = match &parsed {
        Some(error) => error.error.clone(),
        None if !body.trim().is_empty() => body.trim().to_string(),
        None => status
            .canonical_reason()
            .unwrap_or("unknown error")
            .to_string(),
    };

    tracing::debug!(status = status.as_u16(), code = ?code, message = %message, "Ledger rejected request");

    if status == StatusCode::UNAUTHORIZED {
        return MarketError::AuthRequired;
    }
    if status == StatusCode::PAYMENT_REQUIRED || code == Some(INSUFFICIENT_FUNDS_CODE) {
        return MarketError::InsufficientFunds(message);
    }
    match endpoint {
        Endpoint::Transaction { id } if status == StatusCode::NOT_FOUND => {
            return MarketError::TransactionNotFound(id.to_string());
        }
        Endpoint::CreateTransaction { item_id } if code == Some(SELF_PURCHASE_CODE) => {
            return MarketError::SelfPurchase(item_id.to_string());
        }
        _ => {}
    }
    if status == StatusCode::FORBIDDEN {
        return MarketError::NotAuthorized(message);
    }
    MarketError::Api {
        status: status.as_u16(),
        message,
    }
}

// Implement LedgerService trait for LedgerClient
#[async_trait::async_trait]
impl LedgerService for LedgerClient {
    async fn create_pending_transaction(
        &self,
        credential: &Credential,
        request: CreateTransactionRequest,
    ) -> Result<RawTransaction> {
        super::transactions::create_pending_transaction(self, credential, &request).await
    }

    async fn finalize_transaction(
        &self,
        credential: &Credential,
        transaction_id: &str,
    ) -> Result<FinalizeResponse> {
        super::transactions::finalize_transaction(self, credential, transaction_id).await
    }

    async fn fetch_transactions(
        &self,
        credential: &Credential,
        filter: TransactionFilter,
    ) -> Result<Vec<RawTransaction>> {
        super::transactions::fetch_transactions(self, credential, &filter).await
    }

    async fn fetch_profile(&self, credential: &Credential) -> Result<RawUser> {
        super::profile::fetch_profile(self, credential).await
    }

    async fn fetch_wallet_balance(&self, credential: &Credential) -> Result<Decimal> {
        super::wallet::fetch_wallet_balance(self, credential).await
    }

    async fn deposit_to_wallet(&self, credential: &Credential, amount: Decimal) -> Result<Decimal> {
        super::wallet::deposit_to_wallet(self, credential, amount).await
    }

    async fn list_items(&self) -> Result<Vec<RawItem>> {
        super::catalog::list_items(self).await
    }

    async fn create_item(
        &self,
        credential: &Credential,
        listing: NewListingRequest,
    ) -> Result<RawItem> {
        super::catalog::create_item(self, credential, &listing).await
    }

    async fn delete_item(
        &self,
        credential: &Credential,
        item_id: &str,
        actor_role: Role,
    ) -> Result<()> {
        super::catalog::delete_item(self, credential, item_id, actor_role).await
    }
}
