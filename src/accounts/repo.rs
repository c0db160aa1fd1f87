use async_trait::async_trait;
use sqlx::SqlitePool;
use tracing::{debug, warn};

use super::errors::AccountError;
use super::repo_types::{format_timestamp, Account, AccountChanges, AccountRow, NewAccount};

/// Durable account table. Every read and write only sees active rows.
#[async_trait]
pub trait AccountStore: Send + Sync {
    async fn insert(&self, account: &NewAccount) -> Result<i64, AccountError>;
    async fn get_by_id(&self, id: i64) -> Result<Account, AccountError>;
    async fn list_active(&self) -> Result<Vec<Account>, AccountError>;
    async fn update(&self, id: i64, changes: &AccountChanges) -> Result<Account, AccountError>;
    /// Fails with `NotFound` when the account is already inactive.
    async fn soft_delete(&self, id: i64) -> Result<(), AccountError>;
}

#[derive(Clone)]
pub struct SqliteAccountStore {
    db: SqlitePool,
}

impl SqliteAccountStore {
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl AccountStore for SqliteAccountStore {
    async fn insert(&self, account: &NewAccount) -> Result<i64, AccountError> {
        let created_at = format_timestamp(account.created_at)?;
        let result = sqlx::query(
            r#"
            INSERT INTO users (name, surname, email, password, created_at, is_active)
            VALUES (?, ?, ?, ?, ?, 1)
            "#,
        )
        .bind(&account.name)
        .bind(&account.surname)
        .bind(&account.email)
        .bind(&account.password_digest)
        .bind(created_at)
        .execute(&self.db)
        .await?;

        let id = result.last_insert_rowid();
        debug!(user_id = id, "user row inserted");
        Ok(id)
    }

    async fn get_by_id(&self, id: i64) -> Result<Account, AccountError> {
        let row = sqlx::query_as::<_, AccountRow>(
            r#"
            SELECT id, name, surname, email, password, created_at, is_active
            FROM users
            WHERE id = ? AND is_active = 1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.db)
        .await?
        .ok_or(AccountError::NotFound)?;
        row.try_into()
    }

    async fn list_active(&self) -> Result<Vec<Account>, AccountError> {
        let rows = sqlx::query_as::<_, AccountRow>(
            r#"
            SELECT id, name, surname, email, password, created_at, is_active
            FROM users
            WHERE is_active = 1
            "#,
        )
        .fetch_all(&self.db)
        .await?;

        // Unreadable rows are logged and left out of the listing.
        Ok(rows
            .into_iter()
            .filter_map(|row| match Account::try_from(row) {
                Ok(account) => Some(account),
                Err(e) => {
                    warn!(error = %e, "skipping unreadable user row");
                    None
                }
            })
            .collect())
    }

    async fn update(&self, id: i64, changes: &AccountChanges) -> Result<Account, AccountError> {
        let row = sqlx::query_as::<_, AccountRow>(
            r#"
            UPDATE users
               SET name = ?, surname = ?, email = ?, password = ?
             WHERE id = ? AND is_active = 1
            RETURNING id, name, surname, email, password, created_at, is_active
            "#,
        )
        .bind(&changes.name)
        .bind(&changes.surname)
        .bind(&changes.email)
        .bind(&changes.password_digest)
        .bind(id)
        .fetch_optional(&self.db)
        .await?
        .ok_or(AccountError::NotFound)?;
        row.try_into()
    }

    async fn soft_delete(&self, id: i64) -> Result<(), AccountError> {
        let result = sqlx::query("UPDATE users SET is_active = 0 WHERE id = ? AND is_active = 1")
            .bind(id)
            .execute(&self.db)
            .await?;
        if result.rows_affected() == 0 {
            return Err(AccountError::NotFound);
        }
        debug!(user_id = id, "user row deactivated");
        Ok(())
    }
}
