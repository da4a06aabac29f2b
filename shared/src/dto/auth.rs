use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Account role reported by the service.
///
/// Anything other than `guest` or `admin` is a standard account.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Guest,
    Admin,
    #[default]
    #[serde(other)]
    Standard,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Guest => "guest",
            Role::Standard => "standard",
            Role::Admin => "admin",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// User profile as returned by `GET /users/me` and the login endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RawUser {
    pub id: String,
    pub username: String,
    #[serde(default)]
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
    #[serde(default)]
    pub role: Role,
    /// Some deployments inline the balance in the profile; the wallet
    /// endpoint stays authoritative.
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "rust_decimal::serde::float_option"
    )]
    pub balance: Option<Decimal>,
}

impl RawUser {
    /// Display name: full name when present, username otherwise.
    pub fn display_name(&self) -> &str {
        match self.full_name.as_deref() {
            Some(name) if !name.trim().is_empty() => name,
            _ => &self.username,
        }
    }
}

/// Successful login (`{ user, jwt }`), obtained by the application shell.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LoginResponse {
    pub user: RawUser,
    pub jwt: String,
}

/// Error response
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ErrorResponse {
    pub error: String,
    /// Machine-readable code such as `INSUFFICIENT_FUNDS` or `SELF_PURCHASE`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
}
