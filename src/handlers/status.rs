use crate::config::{HEALTH_SERVICE_NAME, ROOT_MESSAGE, SERVICE_VERSION, STATUS_SERVICE_NAME};
use crate::router::AppState;
use axum::{Json, extract::State};
use serde::Serialize;
use tracing::warn;

#[derive(Debug, Serialize)]
pub struct RootResponse {
    pub message: &'static str,
    pub environment: String,
    pub version: &'static str,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub environment: String,
    pub service: &'static str,
}

#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub status: &'static str,
    pub environment: String,
    pub service: &'static str,
    pub database_connected: bool,
}

/// GET /
pub async fn root(State(state): State<AppState>) -> Json<RootResponse> {
    Json(RootResponse {
        message: ROOT_MESSAGE,
        environment: state.config.environment.clone(),
        version: SERVICE_VERSION,
    })
}

/// GET /health -> liveness probe for the load balancer. Never touches the database.
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        environment: state.config.environment.clone(),
        service: HEALTH_SERVICE_NAME,
    })
}

/// GET /api/status -> every failure folds into `database_connected: false`.
pub async fn api_status(State(state): State<AppState>) -> Json<StatusResponse> {
    let database_connected = check_database_connection(&state).await;
    Json(StatusResponse {
        status: "operational",
        environment: state.config.environment.clone(),
        service: STATUS_SERVICE_NAME,
        database_connected,
    })
}

/// Resolve, connect, and immediately close.
pub async fn check_database_connection(state: &AppState) -> bool {
    let Ok(creds) = state.credentials.resolve_credentials().await else {
        return false;
    };
    let Ok(conn) = state.connections.open_connection(creds).await else {
        return false;
    };
    if let Err(e) = conn.close().await {
        warn!(error = %e, "failed to close probe connection");
    }
    true
}
