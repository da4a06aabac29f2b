//! # Profile Endpoint

use shared::RawUser;

use super::client::{decode, transport_error, Endpoint, LedgerClient};
use crate::core::error::Result;
use crate::model::user::Credential;

/// Get the profile of the credential's owner.
pub async fn fetch_profile(client: &LedgerClient, credential: &Credential) -> Result<RawUser> {
    let response = client
        .client
        .get(client.url("/users/me"))
        .bearer_auth(credential.expose())
        .send()
        .await
        .map_err(transport_error)?;

    decode(response, Endpoint::General).await
}
