use std::sync::Arc;

use sqlx::SqlitePool;

use crate::accounts::{
    password::{CredentialHasher, Salt},
    repo::SqliteAccountStore,
    services::AccountService,
};
use crate::config::AppConfig;
use crate::db;

#[derive(Clone)]
pub struct AppState {
    pub accounts: AccountService,
    pub config: Arc<AppConfig>,
}

impl AppState {
    pub async fn init() -> anyhow::Result<Self> {
        let config = Arc::new(AppConfig::from_env()?);
        let pool = db::connect(&config.database).await?;
        db::migrate(&pool).await?;
        Ok(Self::from_parts(pool, config))
    }

    pub fn from_parts(db: SqlitePool, config: Arc<AppConfig>) -> Self {
        let hasher = CredentialHasher::new(Salt::new(config.credential_salt.clone()));
        let store = Arc::new(SqliteAccountStore::new(db));
        Self {
            accounts: AccountService::new(store, hasher),
            config,
        }
    }

    #[cfg(test)]
    pub async fn fake() -> Self {
        Self::fake_with(|_| {}).await
    }

    /// In-memory state with config tweaks applied before the service is built.
    #[cfg(test)]
    pub async fn fake_with(tweak: impl FnOnce(&mut AppConfig)) -> Self {
        use crate::accounts::password::LEGACY_SALT;
        use crate::config::DatabaseConfig;

        let mut config = AppConfig {
            database: DatabaseConfig {
                url: "sqlite::memory:".into(),
                max_connections: 1,
                busy_timeout_secs: 1,
            },
            host: "127.0.0.1".into(),
            port: 0,
            cors_allowed_origins: vec!["http://localhost:3000".into()],
            credential_salt: LEGACY_SALT.into(),
            redact_credentials: false,
        };
        tweak(&mut config);
        Self::from_parts(db::memory_pool().await, Arc::new(config))
    }
}
