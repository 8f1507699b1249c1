use crate::config::Config;
use crate::db::ConnectionProvider;
use crate::handlers::{db_test, status};
use crate::service::credential_resolver::CredentialResolver;
use axum::{Router, routing::get};
use std::sync::Arc;

/// Application context built once at startup and cloned into every handler.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub credentials: CredentialResolver,
    pub connections: ConnectionProvider,
}

impl AppState {
    pub fn new(
        config: Config,
        credentials: CredentialResolver,
        connections: ConnectionProvider,
    ) -> Self {
        Self {
            config: Arc::new(config),
            credentials,
            connections,
        }
    }
}

pub fn probe_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(status::root))
        .route("/health", get(status::health))
        .route("/api/status", get(status::api_status))
        .route("/api/db-test", get(db_test::db_test))
        .with_state(state)
}
