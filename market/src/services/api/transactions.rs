//! # Transaction Endpoints
//!
//! Pending transaction creation, finalization and the buyer/seller feeds.

use shared::{CreateTransactionRequest, FinalizeResponse, RawTransaction, TransactionFilter};

use super::client::{decode, transport_error, Endpoint, LedgerClient};
use crate::core::error::Result;
use crate::model::user::Credential;

/// Create a `PENDING` transaction with the title/price snapshot.
#[tracing::instrument(skip(client, credential, request), fields(
    item_id = %request.item_id,
    goods_kind = %request.goods_kind,
    price = %request.price
))]
pub async fn create_pending_transaction(
    client: &LedgerClient,
    credential: &Credential,
    request: &CreateTransactionRequest,
) -> Result<RawTransaction> {
    let response = client
        .client
        .post(client.url("/transactions"))
        .bearer_auth(credential.expose())
        .json(request)
        .send()
        .await
        .map_err(transport_error)?;

    let transaction: RawTransaction = decode(
        response,
        Endpoint::CreateTransaction {
            item_id: &request.item_id,
        },
    )
    .await?;
    tracing::info!(transaction_id = %transaction.id, status = %transaction.status, "Pending transaction created");
    Ok(transaction)
}

/// Ask the ledger to charge the buyer.
#[tracing::instrument(skip(client, credential))]
pub async fn finalize_transaction(
    client: &LedgerClient,
    credential: &Credential,
    transaction_id: &str,
) -> Result<FinalizeResponse> {
    let response = client
        .client
        .post(client.url(&format!("/transactions/{}/finalize", transaction_id)))
        .bearer_auth(credential.expose())
        .send()
        .await
        .map_err(transport_error)?;

    decode(response, Endpoint::Transaction { id: transaction_id }).await
}

/// One side of the user's history.
#[tracing::instrument(skip(client, credential))]
pub async fn fetch_transactions(
    client: &LedgerClient,
    credential: &Credential,
    filter: &TransactionFilter,
) -> Result<Vec<RawTransaction>> {
    let response = client
        .client
        .get(client.url("/transactions"))
        .query(&[filter.query_pair()])
        .bearer_auth(credential.expose())
        .send()
        .await
        .map_err(transport_error)?;

    let transactions: Vec<RawTransaction> = decode(response, Endpoint::General).await?;
    tracing::debug!(count = transactions.len(), "Fetched transactions");
    Ok(transactions)
}
