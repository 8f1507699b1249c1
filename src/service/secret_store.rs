use crate::error::SecretStoreError;
use async_trait::async_trait;
use aws_config::{BehaviorVersion, Region};
use aws_sdk_secretsmanager::Client as SecretsManagerClient;
use aws_sdk_secretsmanager::error::DisplayErrorContext;
use std::collections::HashMap;
use tracing::debug;
use url::Url;

/// Remote "get secret value" operation.
#[async_trait]
pub trait SecretStore: Send + Sync {
    /// Returns the secret payload (JSON text for database credentials).
    async fn get_secret_value(&self, secret_id: &str) -> Result<String, SecretStoreError>;
}

/// AWS Secrets Manager backed store.
#[derive(Clone)]
pub struct AwsSecretsManager {
    client: SecretsManagerClient,
}

impl AwsSecretsManager {
    /// Build a client from the default AWS provider chain with optional overrides.
    pub async fn from_env(region: Option<String>, endpoint: Option<&Url>) -> Self {
        let mut loader = aws_config::defaults(BehaviorVersion::latest());
        if let Some(region) = region {
            loader = loader.region(Region::new(region));
        }
        let shared_config = loader.load().await;

        let mut builder = aws_sdk_secretsmanager::config::Builder::from(&shared_config);
        if let Some(endpoint) = endpoint {
            builder = builder.endpoint_url(endpoint.as_str());
        }
        Self {
            client: SecretsManagerClient::from_conf(builder.build()),
        }
    }
}

#[async_trait]
impl SecretStore for AwsSecretsManager {
    async fn get_secret_value(&self, secret_id: &str) -> Result<String, SecretStoreError> {
        let output = self
            .client
            .get_secret_value()
            .secret_id(secret_id)
            .send()
            .await
            .map_err(|err| {
                let not_found = err
                    .as_service_error()
                    .is_some_and(|e| e.is_resource_not_found_exception());
                if not_found {
                    SecretStoreError::NotFound(secret_id.to_string())
                } else {
                    SecretStoreError::Request(DisplayErrorContext(&err).to_string())
                }
            })?;

        if let Some(text) = output.secret_string() {
            debug!(secret_id, "secret resolved from SecretString");
            return Ok(text.to_string());
        }
        if let Some(blob) = output.secret_binary() {
            debug!(secret_id, "secret resolved from SecretBinary");
            return String::from_utf8(blob.as_ref().to_vec())
                .map_err(|_| SecretStoreError::EmptyPayload(secret_id.to_string()));
        }
        Err(SecretStoreError::EmptyPayload(secret_id.to_string()))
    }
}

/// Map-backed store for local runs and tests.
#[derive(Debug, Clone, Default)]
pub struct StaticSecretStore {
    secrets: HashMap<String, String>,
}

impl StaticSecretStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_secret(mut self, secret_id: impl Into<String>, payload: impl Into<String>) -> Self {
        self.secrets.insert(secret_id.into(), payload.into());
        self
    }
}

#[async_trait]
impl SecretStore for StaticSecretStore {
    async fn get_secret_value(&self, secret_id: &str) -> Result<String, SecretStoreError> {
        self.secrets
            .get(secret_id)
            .cloned()
            .ok_or_else(|| SecretStoreError::NotFound(secret_id.to_string()))
    }
}
