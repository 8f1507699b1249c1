#![allow(dead_code)]

use async_trait::async_trait;
use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Request, StatusCode},
};
use dbprobe::config::Config;
use dbprobe::db::{ConnectionProvider, Connector, DbConnection, TestRecord};
use dbprobe::error::ConnectionError;
use dbprobe::router::{AppState, probe_router};
use dbprobe::service::{CredentialResolver, CredentialSource};
use dbprobe::types::credential::CredentialRecord;
use serde_json::Value;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::{Duration, SystemTime, UNIX_EPOCH};
use tower::ServiceExt;

pub const TIMEOUT: Duration = Duration::from_secs(5);

pub fn temp_db_path(tag: &str) -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("system time before UNIX_EPOCH")
        .as_nanos();
    let mut path = std::env::temp_dir();
    path.push(format!(
        "dbprobe-{}-{}-{}.sqlite",
        tag,
        std::process::id(),
        nanos
    ));
    path
}

pub fn sqlite_credentials_json(path: &PathBuf) -> String {
    serde_json::json!({
        "host": "localhost",
        "dbname": path.display().to_string(),
        "username": "probe",
        "password": "probe-password",
    })
    .to_string()
}

pub fn valid_credentials_json() -> String {
    r#"{"host":"db.invalid","dbname":"app","username":"svc","password":"pw"}"#.to_string()
}

pub fn app(raw_credentials: impl Into<String>, connector: Arc<dyn Connector>) -> Router {
    app_with_timeout(raw_credentials, connector, TIMEOUT)
}

pub fn app_with_timeout(
    raw_credentials: impl Into<String>,
    connector: Arc<dyn Connector>,
    timeout: Duration,
) -> Router {
    let mut cfg = Config::default();
    cfg.environment = "test".to_string();
    cfg.database_url = raw_credentials.into();
    cfg.operation_timeout_secs = timeout.as_secs();
    let resolver =
        CredentialResolver::new(CredentialSource::Inline(cfg.database_url.clone()), timeout);
    let state = AppState::new(cfg, resolver, ConnectionProvider::new(connector, timeout));
    probe_router(state)
}

pub async fn get_json(app: &Router, uri: &str) -> (StatusCode, Value) {
    let resp = app
        .clone()
        .oneshot(
            Request::builder()
                .method("GET")
                .uri(uri)
                .body(Body::empty())
                .expect("failed to build request"),
        )
        .await
        .expect("request failed");
    let status = resp.status();
    let body = to_bytes(resp.into_body(), usize::MAX)
        .await
        .expect("failed to read response body");
    let json = serde_json::from_slice(&body).expect("response body was not json");
    (status, json)
}

/// Counts every interaction so tests can assert on connection lifecycle.
#[derive(Default)]
pub struct Counters {
    pub opens: AtomicUsize,
    pub closes: AtomicUsize,
    pub commits: AtomicUsize,
}

impl Counters {
    pub fn opens(&self) -> usize {
        self.opens.load(Ordering::SeqCst)
    }
    pub fn closes(&self) -> usize {
        self.closes.load(Ordering::SeqCst)
    }
    pub fn commits(&self) -> usize {
        self.commits.load(Ordering::SeqCst)
    }
}

#[derive(Clone, Copy, Default, PartialEq, Eq)]
pub enum Fault {
    #[default]
    None,
    Connect,
    Insert,
    /// `open` never completes.
    HangConnect,
    /// `insert_if_absent` never completes.
    HangInsert,
}

pub struct TrackingConnector {
    pub counters: Arc<Counters>,
    pub fault: Fault,
}

impl TrackingConnector {
    pub fn new(fault: Fault) -> (Arc<Self>, Arc<Counters>) {
        let counters = Arc::new(Counters::default());
        let connector = Arc::new(Self {
            counters: counters.clone(),
            fault,
        });
        (connector, counters)
    }
}

#[async_trait]
impl Connector for TrackingConnector {
    async fn open(
        &self,
        _creds: &CredentialRecord,
    ) -> Result<Box<dyn DbConnection>, ConnectionError> {
        self.counters.opens.fetch_add(1, Ordering::SeqCst);
        if self.fault == Fault::HangConnect {
            return std::future::pending().await;
        }
        if self.fault == Fault::Connect {
            return Err(ConnectionError::ConnectFailure(sqlx::Error::Protocol(
                "connection refused".to_string(),
            )));
        }
        Ok(Box::new(TrackingConnection {
            counters: self.counters.clone(),
            fault: self.fault,
        }))
    }
}

pub struct TrackingConnection {
    counters: Arc<Counters>,
    fault: Fault,
}

#[async_trait]
impl DbConnection for TrackingConnection {
    async fn begin(&mut self) -> Result<(), sqlx::Error> {
        Ok(())
    }

    async fn ensure_schema(&mut self) -> Result<(), sqlx::Error> {
        Ok(())
    }

    async fn insert_if_absent(&mut self, _message: &str) -> Result<bool, sqlx::Error> {
        if self.fault == Fault::HangInsert {
            return std::future::pending().await;
        }
        if self.fault == Fault::Insert {
            return Err(sqlx::Error::Protocol("injected insert fault".to_string()));
        }
        Ok(true)
    }

    async fn recent(&mut self, _limit: i64) -> Result<Vec<TestRecord>, sqlx::Error> {
        Ok(Vec::new())
    }

    async fn commit(&mut self) -> Result<(), sqlx::Error> {
        self.counters.commits.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn close(self: Box<Self>) -> Result<(), sqlx::Error> {
        self.counters.closes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
