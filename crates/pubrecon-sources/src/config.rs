//! Environment-driven configuration for the source clients.

use crate::error::{Result, SourceError};

#[derive(Debug, Clone, Default)]
pub struct SourcesConfig {
    pub orcid_client_id: Option<String>,
    pub orcid_client_secret: Option<String>,
    pub polite_email: Option<String>,
}

impl SourcesConfig {
    pub fn from_env() -> Self {
        Self {
            orcid_client_id: env_first(["PUBRECON_ORCID_CLIENT_ID", "ORCID_CLIENT_ID"]),
            orcid_client_secret: env_first(["PUBRECON_ORCID_CLIENT_SECRET", "ORCID_CLIENT_SECRET"]),
            polite_email: env_first(["PUBRECON_POLITE_EMAIL", "POLITE_POOL_EMAIL"]),
        }
    }

    /// Claims-registry credentials. Their absence aborts a run before
    /// any researcher is processed.
    pub fn orcid_credentials(&self) -> Result<(String, String)> {
        match (&self.orcid_client_id, &self.orcid_client_secret) {
            (Some(id), Some(secret)) => Ok((id.clone(), secret.clone())),
            _ => Err(SourceError::MissingCredentials(
                "ORCID_CLIENT_ID / ORCID_CLIENT_SECRET".to_string(),
            )),
        }
    }
}

fn env_first<const N: usize>(keys: [&str; N]) -> Option<String> {
    keys.into_iter()
        .find_map(|key| std::env::var(key).ok())
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}
