use figment::{
    Figment,
    providers::{Env, Serialized},
};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::time::Duration;
use url::Url;

pub const ROOT_MESSAGE: &str = "dbprobe service";
pub const SERVICE_VERSION: &str = env!("CARGO_PKG_VERSION");
pub const HEALTH_SERVICE_NAME: &str = "dbprobe";
pub const STATUS_SERVICE_NAME: &str = "dbprobe-backend";

/// Message inserted (at most once) by `GET /api/db-test`.
pub const CANONICAL_TEST_MESSAGE: &str = "Hello from dbprobe!";

/// Number of rows returned by `GET /api/db-test`.
pub const RECENT_ROWS_LIMIT: i64 = 5;

pub const DEFAULT_POSTGRES_PORT: u16 = 5432;

/// Environment keys read by [`Config::from_env`].
const ENV_KEYS: &[&str] = &[
    "environment",
    "database_url",
    "credential_source",
    "database_driver",
    "secret_store_region",
    "secret_store_endpoint",
    "operation_timeout_secs",
    "listen_addr",
    "loglevel",
];

/// How `database_url` is interpreted. Chosen per deployment, never guessed
/// from the shape of the value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CredentialSourceKind {
    /// `database_url` holds the credential JSON itself.
    #[default]
    Inline,
    /// `database_url` names a secret in the secret store.
    #[serde(alias = "secret-store")]
    SecretStore,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DatabaseDriver {
    #[default]
    Postgres,
    Sqlite,
}

/// Process configuration, loaded once at startup and carried in `AppState`.
#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub environment: String,
    /// Raw JSON credentials or a secret identifier, see `credential_source`.
    #[serde(deserialize_with = "text_or_json")]
    pub database_url: String,
    pub credential_source: CredentialSourceKind,
    pub database_driver: DatabaseDriver,
    pub secret_store_region: Option<String>,
    pub secret_store_endpoint: Option<Url>,
    pub operation_timeout_secs: u64,
    pub listen_addr: String,
    pub loglevel: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            environment: "development".to_string(),
            database_url: String::new(),
            credential_source: CredentialSourceKind::default(),
            database_driver: DatabaseDriver::default(),
            secret_store_region: None,
            secret_store_endpoint: None,
            operation_timeout_secs: 10,
            listen_addr: "0.0.0.0:8000".to_string(),
            loglevel: "info".to_string(),
        }
    }
}

impl Config {
    /// Defaults overlaid with the process environment (already seeded from `.env`).
    pub fn from_env() -> Result<Self, figment::Error> {
        Figment::from(Serialized::defaults(Config::default()))
            .merge(Env::raw().only(ENV_KEYS))
            .extract()
    }

    pub fn operation_timeout(&self) -> Duration {
        Duration::from_secs(self.operation_timeout_secs.max(1))
    }
}

// The env provider parses values, so a JSON blob may arrive as a dict rather
// than a string. Fold anything non-string back into JSON text.
fn text_or_json<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(s),
        Value::Null => Ok(String::new()),
        other => Ok(other.to_string()),
    }
}
