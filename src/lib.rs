pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod router;
pub mod service;
pub mod types;

pub use error::{ConnectionError, ProbeError, ResolutionError};
pub use types::credential::CredentialRecord;
