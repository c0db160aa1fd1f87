use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use super::repo_types::Account;
use super::services::AccountInput;

/// Request body for create and update. Missing or `null` fields decode as
/// empty strings. `id`, `created_at` and `is_active` must have the right
/// type when present but are otherwise ignored.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct AccountRequest {
    pub name: Option<String>,
    pub surname: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    #[serde(rename = "id")]
    _id: Option<i64>,
    #[serde(rename = "created_at")]
    _created_at: Option<String>,
    #[serde(rename = "is_active")]
    _is_active: Option<bool>,
}

impl From<AccountRequest> for AccountInput {
    fn from(r: AccountRequest) -> Self {
        Self {
            name: r.name.unwrap_or_default(),
            surname: r.surname.unwrap_or_default(),
            email: r.email.unwrap_or_default(),
            secret: r.password.unwrap_or_default(),
        }
    }
}

/// Account as returned to clients. `password` carries the digest and is
/// left out entirely when credentials are redacted.
#[derive(Debug, Serialize)]
pub struct AccountResponse {
    pub id: i64,
    pub name: String,
    pub surname: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    pub is_active: bool,
}

impl AccountResponse {
    pub fn from_account(account: Account, redact: bool) -> Self {
        Self {
            id: account.id,
            name: account.name,
            surname: account.surname,
            email: account.email,
            password: (!redact).then_some(account.password_digest),
            created_at: account.created_at,
            is_active: account.is_active,
        }
    }
}
