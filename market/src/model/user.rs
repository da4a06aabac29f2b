//! Signed-in user and bearer credential.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use shared::{LoginResponse, RawUser};

pub use shared::Role;

use super::UserId;

/// Bearer token issued by the service at login.
///
/// `Debug` never prints the token.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Credential(String);

impl Credential {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// Raw token, for the `Authorization` header only.
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for Credential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Credential(***)")
    }
}

/// The authenticated actor and the last balance read from the ledger.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub picture: Option<String>,
    #[serde(default)]
    pub role: Role,
    /// Replaced by ledger values only.
    #[serde(with = "rust_decimal::serde::float")]
    pub balance: Decimal,
    #[serde(default)]
    pub credential: Option<Credential>,
}

impl User {
    /// Session record for a fresh login. The balance starts at zero until
    /// the first wallet refresh.
    pub fn from_login(login: LoginResponse) -> Self {
        let name = login.user.display_name().to_string();
        let RawUser {
            id,
            email,
            avatar_url,
            role,
            ..
        } = login.user;
        Self {
            id,
            name,
            email,
            picture: avatar_url,
            role,
            balance: Decimal::ZERO,
            credential: Some(Credential::new(login.jwt)),
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.credential.is_some() && self.role != Role::Guest
    }

    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    /// Copy identity fields from a fresh profile, keeping the credential.
    pub(crate) fn merge_profile(&mut self, profile: RawUser) {
        self.name = profile.display_name().to_string();
        self.id = profile.id;
        self.email = profile.email;
        self.picture = profile.avatar_url;
        self.role = profile.role;
    }
}
