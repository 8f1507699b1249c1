use crate::error::ResolutionError;
use crate::service::secret_store::SecretStore;
use crate::types::credential::CredentialRecord;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::timeout;
use tracing::{error, info};

/// Where database credentials come from; fixed at startup.
#[derive(Clone)]
pub enum CredentialSource {
    /// The configuration value is the credential JSON.
    Inline(String),
    /// The configuration value names a secret to fetch on every resolution.
    SecretStore {
        secret_id: String,
        store: Arc<dyn SecretStore>,
    },
}

impl CredentialSource {
    pub fn mode(&self) -> &'static str {
        match self {
            CredentialSource::Inline(_) => "inline",
            CredentialSource::SecretStore { .. } => "secret_store",
        }
    }
}

#[derive(Clone)]
pub struct CredentialResolver {
    source: CredentialSource,
    store_timeout: Duration,
}

impl CredentialResolver {
    pub fn new(source: CredentialSource, store_timeout: Duration) -> Self {
        Self {
            source,
            store_timeout,
        }
    }

    /// Resolve a fresh `CredentialRecord`. Failures are logged here so callers
    /// only need to decide how to surface them.
    pub async fn resolve_credentials(&self) -> Result<CredentialRecord, ResolutionError> {
        let result = self.resolve_inner().await;
        if let Err(e) = &result {
            error!(mode = self.source.mode(), error = %e, "credential resolution failed");
        }
        result
    }

    async fn resolve_inner(&self) -> Result<CredentialRecord, ResolutionError> {
        let payload = match &self.source {
            CredentialSource::Inline(raw) => {
                if raw.trim().is_empty() {
                    return Err(ResolutionError::NotConfigured);
                }
                raw.clone()
            }
            CredentialSource::SecretStore { secret_id, store } => {
                if secret_id.trim().is_empty() {
                    return Err(ResolutionError::NotConfigured);
                }
                match timeout(self.store_timeout, store.get_secret_value(secret_id)).await {
                    Ok(res) => res?,
                    Err(_) => {
                        return Err(ResolutionError::StoreUnavailable(format!(
                            "get_secret_value timed out after {:?}",
                            self.store_timeout
                        )));
                    }
                }
            }
        };

        info!(payload_len = payload.len(), "credential payload obtained");
        let value: Value = serde_json::from_str(&payload)?;
        if let Some(obj) = value.as_object() {
            let keys: Vec<&str> = obj.keys().map(String::as_str).collect();
            info!(keys = ?keys, "credential payload keys");
        }
        CredentialRecord::from_payload(&value)
    }
}
