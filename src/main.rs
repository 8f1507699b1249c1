use dbprobe::config::{Config, CredentialSourceKind, DatabaseDriver};
use dbprobe::db::{ConnectionProvider, Connector, PgConnector, SqliteConnector};
use dbprobe::router::{AppState, probe_router};
use dbprobe::service::{AwsSecretsManager, CredentialResolver, CredentialSource};
use mimalloc::MiMalloc;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    let cfg = Config::from_env()?;

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(cfg.loglevel.clone()));
    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_level(true)
                .with_target(false),
        )
        .init();

    info!(
        environment = %cfg.environment,
        credential_source = ?cfg.credential_source,
        database_driver = ?cfg.database_driver,
        database_url_len = cfg.database_url.len(),
        operation_timeout_secs = cfg.operation_timeout_secs,
        loglevel = %cfg.loglevel
    );

    let timeout = cfg.operation_timeout();

    let source = match cfg.credential_source {
        CredentialSourceKind::Inline => CredentialSource::Inline(cfg.database_url.clone()),
        CredentialSourceKind::SecretStore => {
            let store = AwsSecretsManager::from_env(
                cfg.secret_store_region.clone(),
                cfg.secret_store_endpoint.as_ref(),
            )
            .await;
            info!(secret_id = %cfg.database_url, "credentials will be read from the secret store");
            CredentialSource::SecretStore {
                secret_id: cfg.database_url.clone(),
                store: Arc::new(store),
            }
        }
    };

    let connector: Arc<dyn Connector> = match cfg.database_driver {
        DatabaseDriver::Postgres => Arc::new(PgConnector),
        DatabaseDriver::Sqlite => Arc::new(SqliteConnector),
    };

    let addr = cfg.listen_addr.clone();
    let state = AppState::new(
        cfg,
        CredentialResolver::new(source, timeout),
        ConnectionProvider::new(connector, timeout),
    );
    let app = probe_router(state);

    let listener = TcpListener::bind(&addr).await?;
    info!("HTTP server listening on {}", addr);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    info!("HTTP server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = %e, "failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                error!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received Ctrl+C, shutting down"),
        _ = terminate => info!("Received SIGTERM, shutting down"),
    }
}
