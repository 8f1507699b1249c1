use crate::db::models::TestRecord;
use crate::error::ConnectionError;
use crate::types::credential::CredentialRecord;
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::timeout;
use tracing::{error, info};

/// Opens exactly one database connection per call. No pooling, no retries.
#[async_trait]
pub trait Connector: Send + Sync {
    async fn open(
        &self,
        creds: &CredentialRecord,
    ) -> Result<Box<dyn DbConnection>, ConnectionError>;
}

/// A single live connection, owned by whoever opened it.
///
/// `close` must be called on every exit path; dropping an open transaction
/// without `commit` discards it.
#[async_trait]
pub trait DbConnection: Send {
    async fn begin(&mut self) -> Result<(), sqlx::Error>;

    /// Create `test_data` if it does not exist yet.
    async fn ensure_schema(&mut self) -> Result<(), sqlx::Error>;

    /// Insert `message` unless a row with the same message already exists.
    /// Returns whether a row was written.
    async fn insert_if_absent(&mut self, message: &str) -> Result<bool, sqlx::Error>;

    /// Newest rows first.
    async fn recent(&mut self, limit: i64) -> Result<Vec<TestRecord>, sqlx::Error>;

    async fn commit(&mut self) -> Result<(), sqlx::Error>;

    async fn close(self: Box<Self>) -> Result<(), sqlx::Error>;
}

/// Connection Provider: resolved credentials in, live connection out.
#[derive(Clone)]
pub struct ConnectionProvider {
    connector: Arc<dyn Connector>,
    connect_timeout: Duration,
}

impl ConnectionProvider {
    pub fn new(connector: Arc<dyn Connector>, connect_timeout: Duration) -> Self {
        Self {
            connector,
            connect_timeout,
        }
    }

    /// Single connect attempt. Ownership of the handle passes to the caller.
    pub async fn open_connection(
        &self,
        creds: CredentialRecord,
    ) -> Result<Box<dyn DbConnection>, ConnectionError> {
        let result = match timeout(self.connect_timeout, self.connector.open(&creds)).await {
            Ok(res) => res,
            Err(_) => Err(ConnectionError::Timeout),
        };
        match &result {
            Ok(_) => info!(host = %creds.host, dbname = %creds.dbname, "database connection successful"),
            Err(e) => error!(host = %creds.host, dbname = %creds.dbname, error = %e, "database connection failed"),
        }
        result
    }
}
