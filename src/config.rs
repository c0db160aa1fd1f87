use serde::Deserialize;

use crate::accounts::password::LEGACY_SALT;

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub busy_timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub database: DatabaseConfig,
    pub host: String,
    pub port: u16,
    pub cors_allowed_origins: Vec<String>,
    pub credential_salt: String,
    pub redact_credentials: bool,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from any key lookup; unset keys fall back to defaults.
    pub fn from_lookup(var: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let database = DatabaseConfig {
            url: var("DATABASE_URL").unwrap_or_else(|| "sqlite://mydb.db".into()),
            max_connections: var("DATABASE_MAX_CONNECTIONS")
                .and_then(|v| v.parse::<u32>().ok())
                .unwrap_or(5),
            busy_timeout_secs: var("DATABASE_BUSY_TIMEOUT_SECS")
                .and_then(|v| v.parse::<u64>().ok())
                .unwrap_or(5),
        };
        let port = match var("APP_PORT") {
            Some(v) => v.parse::<u16>()?,
            None => 8080,
        };
        let cors_allowed_origins = parse_origins(
            &var("CORS_ALLOWED_ORIGINS").unwrap_or_else(|| "http://localhost:3000".into()),
        );
        let redact_credentials = var("REDACT_CREDENTIALS")
            .map(|v| matches!(v.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes"))
            .unwrap_or(false);

        Ok(Self {
            database,
            host: var("APP_HOST").unwrap_or_else(|| "0.0.0.0".into()),
            port,
            cors_allowed_origins,
            credential_salt: var("CREDENTIAL_SALT").unwrap_or_else(|| LEGACY_SALT.into()),
            redact_credentials,
        })
    }
}

fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}
