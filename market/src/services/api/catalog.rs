//! # Listing Endpoints
//!
//! Public item listing plus listing creation and deletion.

use shared::{NewListingRequest, RawItem, Role};

use super::client::{decode, ensure_success, transport_error, Endpoint, LedgerClient};
use crate::core::error::Result;
use crate::model::user::Credential;

/// Header carrying the role the caller acts with on deletion.
pub const ACTOR_ROLE_HEADER: &str = "X-Actor-Role";

/// Get every listed item. No credential needed.
pub async fn list_items(client: &LedgerClient) -> Result<Vec<RawItem>> {
    let response = client
        .client
        .get(client.url("/items"))
        .send()
        .await
        .map_err(transport_error)?;

    let items: Vec<RawItem> = decode(response, Endpoint::General).await?;
    tracing::debug!(count = items.len(), "Fetched items");
    Ok(items)
}

/// Create a listing owned by `listing.seller_id`.
#[tracing::instrument(skip(client, credential, listing), fields(name = %listing.name))]
pub async fn create_item(
    client: &LedgerClient,
    credential: &Credential,
    listing: &NewListingRequest,
) -> Result<RawItem> {
    let response = client
        .client
        .post(client.url("/items"))
        .bearer_auth(credential.expose())
        .json(listing)
        .send()
        .await
        .map_err(transport_error)?;

    decode(response, Endpoint::General).await
}

/// Delete a listing. The service checks owner-or-admin.
#[tracing::instrument(skip(client, credential), fields(role = %actor_role))]
pub async fn delete_item(
    client: &LedgerClient,
    credential: &Credential,
    item_id: &str,
    actor_role: Role,
) -> Result<()> {
    let response = client
        .client
        .delete(client.url(&format!("/items/{}", item_id)))
        .bearer_auth(credential.expose())
        .header(ACTOR_ROLE_HEADER, actor_role.as_str())
        .send()
        .await
        .map_err(transport_error)?;

    ensure_success(response, Endpoint::General).await
}
