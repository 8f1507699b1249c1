pub mod credential_resolver;
pub mod secret_store;

pub use credential_resolver::{CredentialResolver, CredentialSource};
pub use secret_store::{AwsSecretsManager, SecretStore, StaticSecretStore};
