//! Credential sources.
//!
//! A source turns a long-lived credential (OAuth passport token or a service
//! account key) into a short-lived IAM token. The token cache owns exactly one
//! source and calls it whenever its cached token is due for refresh.

use async_trait::async_trait;
use reqwest::Client;

use crate::config::sources::{CredentialsConfig, EndpointsConfig};
use crate::error::{Error, Result};

pub mod fetch;
pub mod passport;
pub mod service_account;

use passport::PassportSource;
use service_account::ServiceAccountSource;

/// Anything able to produce a fresh bearer token on demand.
#[async_trait]
pub trait TokenSource: Send + Sync {
    /// Short label used in logs and metrics.
    fn name(&self) -> &str;

    /// Obtain a new token, or fail.
    async fn obtain_token(&self) -> Result<String>;
}

#[derive(Debug, Clone)]
pub enum SourceKind {
    Passport(PassportSource),
    ServiceAccount(ServiceAccountSource),
}

impl SourceKind {
    /// Build the source described by `credentials`, reading the service
    /// account key file if one is configured.
    pub async fn from_config(
        credentials: &CredentialsConfig,
        endpoints: &EndpointsConfig,
        client: Client,
    ) -> Result<Self> {
        match credentials {
            CredentialsConfig::Passport { oauth_token } => Ok(SourceKind::Passport(
                PassportSource::new(client, &endpoints.iam_tokens, oauth_token),
            )),
            CredentialsConfig::ServiceAccount {
                account_id,
                key_id,
                private_key,
                private_key_path,
            } => {
                let pem = match (private_key, private_key_path) {
                    (Some(pem), None) => pem.to_owned(),
                    (None, Some(path)) => tokio::fs::read_to_string(path)
                        .await
                        .map_err(|err| Error::Io(format!("{}: {}", path.display(), err)))?,
                    _ => {
                        return Err(Error::Config(
                            "service account needs exactly one of private_key or private_key_path"
                                .to_owned(),
                        ))
                    }
                };
                let source = ServiceAccountSource::new(
                    client,
                    &endpoints.iam_tokens,
                    account_id,
                    key_id,
                    &pem,
                )?;
                Ok(SourceKind::ServiceAccount(source))
            }
        }
    }
}

#[async_trait]
impl TokenSource for SourceKind {
    fn name(&self) -> &str {
        match self {
            SourceKind::Passport(s) => s.name(),
            SourceKind::ServiceAccount(s) => s.name(),
        }
    }

    async fn obtain_token(&self) -> Result<String> {
        match self {
            SourceKind::Passport(s) => s.obtain_token().await,
            SourceKind::ServiceAccount(s) => s.obtain_token().await,
        }
    }
}
