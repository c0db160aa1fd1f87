use std::sync::Arc;

use time::OffsetDateTime;
use tracing::{info, warn};

use super::errors::AccountError;
use super::password::CredentialHasher;
use super::repo::AccountStore;
use super::repo_types::{Account, AccountChanges, NewAccount};

/// Caller-supplied account fields. `secret` is plaintext.
#[derive(Debug, Clone, Default)]
pub struct AccountInput {
    pub name: String,
    pub surname: String,
    pub email: String,
    pub secret: String,
}

/// Account lifecycle: `NonExistent -> Active -> Inactive`.
#[derive(Clone)]
pub struct AccountService {
    store: Arc<dyn AccountStore>,
    hasher: CredentialHasher,
}

impl AccountService {
    pub fn new(store: Arc<dyn AccountStore>, hasher: CredentialHasher) -> Self {
        Self { store, hasher }
    }

    pub async fn create(&self, input: AccountInput) -> Result<Account, AccountError> {
        if input.secret.is_empty() {
            warn!("create rejected: empty password");
            return Err(AccountError::validation("password cannot be empty"));
        }

        let new = NewAccount {
            name: input.name,
            surname: input.surname,
            email: input.email,
            password_digest: self.hasher.digest(&input.secret),
            created_at: now_utc_seconds(),
        };
        let id = self.store.insert(&new).await?;

        info!(user_id = id, "user created");
        Ok(Account {
            id,
            name: new.name,
            surname: new.surname,
            email: new.email,
            password_digest: new.password_digest,
            created_at: new.created_at,
            is_active: true,
        })
    }

    pub async fn get(&self, id: i64) -> Result<Account, AccountError> {
        self.store.get_by_id(id).await
    }

    pub async fn list(&self) -> Result<Vec<Account>, AccountError> {
        self.store.list_active().await
    }

    /// An empty secret keeps the stored digest. The read of that digest
    /// and the write are separate store calls; the write re-checks that
    /// the account is still active.
    pub async fn update(&self, id: i64, input: AccountInput) -> Result<Account, AccountError> {
        for (field, value) in [
            ("name", &input.name),
            ("surname", &input.surname),
            ("email", &input.email),
        ] {
            if value.is_empty() {
                warn!(user_id = id, field, "update rejected: empty field");
                return Err(AccountError::validation(format!("{field} cannot be empty")));
            }
        }

        let password_digest = if input.secret.is_empty() {
            self.store.get_by_id(id).await?.password_digest
        } else {
            self.hasher.digest(&input.secret)
        };

        let changes = AccountChanges {
            name: input.name,
            surname: input.surname,
            email: input.email,
            password_digest,
        };
        let account = self.store.update(id, &changes).await?;
        info!(user_id = id, "user updated");
        Ok(account)
    }

    pub async fn delete(&self, id: i64) -> Result<(), AccountError> {
        self.store.soft_delete(id).await?;
        info!(user_id = id, "user deactivated");
        Ok(())
    }
}

fn now_utc_seconds() -> OffsetDateTime {
    let now = OffsetDateTime::now_utc();
    now.replace_nanosecond(0).unwrap_or(now)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::accounts::password::Salt;
    use crate::accounts::repo::SqliteAccountStore;
    use crate::db::memory_pool;

    async fn service() -> AccountService {
        let store = SqliteAccountStore::new(memory_pool().await);
        AccountService::new(Arc::new(store), CredentialHasher::default())
    }

    fn input(name: &str, surname: &str, email: &str, secret: &str) -> AccountInput {
        AccountInput {
            name: name.into(),
            surname: surname.into(),
            email: email.into(),
            secret: secret.into(),
        }
    }

    #[tokio::test]
    async fn create_hashes_and_activates() {
        let svc = service().await;
        let before = OffsetDateTime::now_utc().replace_nanosecond(0).unwrap();
        let account = svc.create(input("Ann", "Lee", "a@x.com", "pw1")).await.unwrap();
        let after = OffsetDateTime::now_utc();

        assert!(account.is_active);
        assert!(!account.password_digest.is_empty());
        assert_ne!(account.password_digest, "pw1");
        assert_eq!(account.password_digest, CredentialHasher::default().digest("pw1"));
        assert!(account.created_at >= before && account.created_at <= after);
        assert_eq!(account.created_at.nanosecond(), 0);
        assert_eq!(account.created_at.offset(), time::UtcOffset::UTC);
        assert_eq!(svc.get(account.id).await.unwrap(), account);
    }

    #[tokio::test]
    async fn create_with_empty_secret_persists_nothing() {
        let svc = service().await;
        let err = svc.create(input("Ann", "Lee", "a@x.com", "")).await.unwrap_err();
        assert!(matches!(err, AccountError::Validation(_)));
        assert!(svc.list().await.unwrap().is_empty());

        let account = svc.create(input("Ann", "Lee", "a@x.com", "pw1")).await.unwrap();
        assert_eq!(account.id, 1);
    }

    #[tokio::test]
    async fn create_uses_injected_salt() {
        let store = SqliteAccountStore::new(memory_pool().await);
        let hasher = CredentialHasher::new(Salt::new("rotated"));
        let svc = AccountService::new(Arc::new(store), hasher.clone());
        let account = svc.create(input("Ann", "Lee", "a@x.com", "pw1")).await.unwrap();
        assert_eq!(account.password_digest, hasher.digest("pw1"));
        assert_ne!(account.password_digest, CredentialHasher::default().digest("pw1"));
    }

    #[tokio::test]
    async fn update_with_blank_secret_keeps_digest() {
        let svc = service().await;
        let created = svc.create(input("Ann", "Lee", "a@x.com", "pw1")).await.unwrap();
        let updated = svc
            .update(created.id, input("Ann", "Lee", "a@y.com", ""))
            .await
            .unwrap();
        assert_eq!(updated.password_digest, created.password_digest);
        assert_eq!(updated.email, "a@y.com");
        assert_eq!(updated.created_at, created.created_at);
    }

    #[tokio::test]
    async fn update_with_new_secret_rehashes() {
        let svc = service().await;
        let created = svc.create(input("Ann", "Lee", "a@x.com", "pw1")).await.unwrap();
        let updated = svc
            .update(created.id, input("Ann", "Lee", "a@x.com", "pw2"))
            .await
            .unwrap();
        assert_eq!(updated.password_digest, CredentialHasher::default().digest("pw2"));
        assert_ne!(updated.password_digest, created.password_digest);
    }

    #[tokio::test]
    async fn update_rejects_empty_required_fields() {
        let svc = service().await;
        let created = svc.create(input("Ann", "Lee", "a@x.com", "pw1")).await.unwrap();
        for (bad, field) in [
            (input("", "Lee", "a@x.com", ""), "name"),
            (input("Ann", "", "a@x.com", "pw"), "surname"),
            (input("Ann", "Lee", "", ""), "email"),
        ] {
            match svc.update(created.id, bad).await {
                Err(AccountError::Validation(msg)) => assert!(msg.starts_with(field), "{msg}"),
                other => panic!("expected validation error, got {other:?}"),
            }
        }
        assert_eq!(svc.get(created.id).await.unwrap(), created);
    }

    #[tokio::test]
    async fn update_missing_or_deleted_is_not_found() {
        let svc = service().await;
        assert!(matches!(
            svc.update(9, input("Ann", "Lee", "a@x.com", "")).await,
            Err(AccountError::NotFound)
        ));
        assert!(matches!(
            svc.update(9, input("Ann", "Lee", "a@x.com", "pw")).await,
            Err(AccountError::NotFound)
        ));

        let created = svc.create(input("Ann", "Lee", "a@x.com", "pw1")).await.unwrap();
        svc.delete(created.id).await.unwrap();
        assert!(matches!(
            svc.update(created.id, input("Ann", "Lee", "a@x.com", "")).await,
            Err(AccountError::NotFound)
        ));
        assert!(matches!(
            svc.update(created.id, input("Ann", "Lee", "a@x.com", "pw2")).await,
            Err(AccountError::NotFound)
        ));
    }

    #[tokio::test]
    async fn delete_is_terminal() {
        let svc = service().await;
        let created = svc.create(input("Ann", "Lee", "a@x.com", "pw1")).await.unwrap();
        svc.delete(created.id).await.unwrap();
        assert!(matches!(svc.get(created.id).await, Err(AccountError::NotFound)));
        assert!(svc.list().await.unwrap().is_empty());
        assert!(matches!(svc.delete(created.id).await, Err(AccountError::NotFound)));
        assert!(matches!(svc.delete(12345).await, Err(AccountError::NotFound)));
    }

    #[tokio::test]
    async fn lifecycle_scenario() {
        let svc = service().await;
        let created = svc.create(input("Ann", "Lee", "a@x.com", "pw1")).await.unwrap();
        assert_eq!(created.id, 1);
        assert!(created.is_active);
        assert_eq!(created.password_digest, CredentialHasher::default().digest("pw1"));

        let updated = svc.update(1, input("Ann", "Lee", "a@y.com", "")).await.unwrap();
        assert_eq!(updated.password_digest, created.password_digest);
        assert_eq!(updated.email, "a@y.com");

        svc.delete(1).await.unwrap();
        assert!(matches!(svc.get(1).await, Err(AccountError::NotFound)));
        assert!(svc.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn concurrent_creates_get_distinct_ids() {
        let svc = service().await;
        let mut handles = Vec::new();
        for i in 0..16 {
            let svc = svc.clone();
            handles.push(tokio::spawn(async move {
                svc.create(input("N", "S", &format!("u{i}@x.com"), "pw"))
                    .await
                    .unwrap()
                    .id
            }));
        }
        let mut ids = Vec::new();
        for h in handles {
            ids.push(h.await.unwrap());
        }
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), 16);
        assert_eq!(svc.list().await.unwrap().len(), 16);
    }

    #[tokio::test]
    async fn concurrent_deletes_succeed_exactly_once() {
        let svc = service().await;
        let created = svc.create(input("Ann", "Lee", "a@x.com", "pw1")).await.unwrap();
        let mut handles = Vec::new();
        for _ in 0..8 {
            let svc = svc.clone();
            handles.push(tokio::spawn(async move { svc.delete(created.id).await }));
        }
        let mut ok = 0;
        for h in handles {
            match h.await.unwrap() {
                Ok(()) => ok += 1,
                Err(AccountError::NotFound) => {}
                Err(e) => panic!("unexpected error: {e}"),
            }
        }
        assert_eq!(ok, 1);
    }
}
