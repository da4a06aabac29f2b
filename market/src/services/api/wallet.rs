//! # Wallet Endpoints
//!
//! Balance reads and deposits. Both return the ledger's balance, which the
//! client stores as-is.

use rust_decimal::Decimal;
use shared::{BalanceResponse, DepositRequest};

use super::client::{decode, transport_error, Endpoint, LedgerClient};
use crate::core::error::Result;
use crate::model::user::Credential;

/// Get the current wallet balance.
pub async fn fetch_wallet_balance(client: &LedgerClient, credential: &Credential) -> Result<Decimal> {
    let response = client
        .client
        .get(client.url("/wallet/balance"))
        .bearer_auth(credential.expose())
        .send()
        .await
        .map_err(transport_error)?;

    let body: BalanceResponse = decode(response, Endpoint::General).await?;
    Ok(body.balance)
}

/// Deposit funds; returns the post-deposit balance.
#[tracing::instrument(skip(client, credential), fields(amount = %amount))]
pub async fn deposit_to_wallet(
    client: &LedgerClient,
    credential: &Credential,
    amount: Decimal,
) -> Result<Decimal> {
    let response = client
        .client
        .post(client.url("/wallet/deposit"))
        .bearer_auth(credential.expose())
        .json(&DepositRequest { amount })
        .send()
        .await
        .map_err(transport_error)?;

    let body: BalanceResponse = decode(response, Endpoint::General).await?;
    tracing::info!(balance = %body.balance, "Deposit accepted");
    Ok(body.balance)
}
