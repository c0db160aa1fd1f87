use sqlx::FromRow;
use time::{format_description::well_known::Rfc3339, OffsetDateTime};

use super::errors::AccountError;

/// A stored user record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Account {
    pub id: i64,
    pub name: String,
    pub surname: String,
    pub email: String,
    pub password_digest: String,    // never the plaintext
    pub created_at: OffsetDateTime, // UTC, whole seconds
    pub is_active: bool,
}

/// Raw `users` row: the active flag is an integer and the timestamp is text.
#[derive(Debug, FromRow)]
pub struct AccountRow {
    pub id: i64,
    pub name: String,
    pub surname: String,
    pub email: String,
    pub password: String,
    pub created_at: String,
    pub is_active: i64,
}

impl TryFrom<AccountRow> for Account {
    type Error = AccountError;

    fn try_from(r: AccountRow) -> Result<Self, Self::Error> {
        let created_at = OffsetDateTime::parse(&r.created_at, &Rfc3339).map_err(|e| {
            AccountError::Store(format!("user {} has malformed created_at: {e}", r.id))
        })?;
        Ok(Self {
            id: r.id,
            name: r.name,
            surname: r.surname,
            email: r.email,
            password_digest: r.password,
            created_at,
            is_active: r.is_active == 1,
        })
    }
}

/// Fields written by an insert; the store assigns the id.
#[derive(Debug, Clone)]
pub struct NewAccount {
    pub name: String,
    pub surname: String,
    pub email: String,
    pub password_digest: String,
    pub created_at: OffsetDateTime,
}

/// The mutable part of an account.
#[derive(Debug, Clone)]
pub struct AccountChanges {
    pub name: String,
    pub surname: String,
    pub email: String,
    pub password_digest: String,
}

pub fn format_timestamp(ts: OffsetDateTime) -> Result<String, AccountError> {
    ts.format(&Rfc3339)
        .map_err(|e| AccountError::Store(format!("format created_at: {e}")))
}
