use std::collections::HashMap;

use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::cache::TokenCache;
use crate::error::Result;
use crate::helpers::response::json_body;
use crate::utils::constants::{IAM_KEYS_URL, IAM_SERVICE_ACCOUNTS_URL};

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceAccount {
    pub id: String,
    pub folder_id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ServiceAccountList {
    #[serde(default)]
    service_accounts: Vec<ServiceAccount>,
}

/// Authorized key of a service account, used to sign token assertions.
#[derive(Clone, PartialEq, Eq)]
pub struct ServiceAccountKey {
    pub key_id: String,
    pub private_key: String,
}

impl std::fmt::Debug for ServiceAccountKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceAccountKey")
            .field("key_id", &self.key_id)
            .field("private_key", &"[REDACTED]")
            .finish()
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CreateKeyRequest<'a> {
    service_account_id: &'a str,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreateKeyResponse {
    key: KeyInfo,
    private_key: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct KeyInfo {
    id: String,
}

/// Service account administration, authorized through a token cache.
#[derive(Debug, Clone)]
pub struct IamClient {
    client: Client,
    service_accounts_url: String,
    keys_url: String,
    tokens: TokenCache,
}

impl IamClient {
    pub fn new(tokens: TokenCache) -> Self {
        Self {
            client: Client::new(),
            service_accounts_url: IAM_SERVICE_ACCOUNTS_URL.to_owned(),
            keys_url: IAM_KEYS_URL.to_owned(),
            tokens,
        }
    }

    pub fn with_client(mut self, client: Client) -> Self {
        self.client = client;
        self
    }

    pub fn with_endpoints(mut self, service_accounts_url: &str, keys_url: &str) -> Self {
        self.service_accounts_url = service_accounts_url.to_owned();
        self.keys_url = keys_url.to_owned();
        self
    }

    /// Service accounts in a folder.
    pub async fn list_service_accounts(&self, folder_id: &str) -> Result<Vec<ServiceAccount>> {
        let token = self.tokens.get_token().await?;
        let response = self
            .client
            .get(&self.service_accounts_url)
            .bearer_auth(token)
            .query(&[("folderId", folder_id)])
            .send()
            .await?;
        let list: ServiceAccountList = json_body(response).await?;
        info!("found {} service accounts in folder {}", list.service_accounts.len(), folder_id);
        Ok(list.service_accounts)
    }

    /// Map of service account name to id in a folder.
    pub async fn service_account_ids(&self, folder_id: &str) -> Result<HashMap<String, String>> {
        Ok(self
            .list_service_accounts(folder_id)
            .await?
            .into_iter()
            .map(|account| (account.name, account.id))
            .collect())
    }

    /// Create a new key for a service account. The private key is only
    /// returned once, by this call.
    pub async fn create_service_account_key(&self, account_id: &str) -> Result<ServiceAccountKey> {
        let token = self.tokens.get_token().await?;
        let response = self
            .client
            .post(&self.keys_url)
            .bearer_auth(token)
            .json(&CreateKeyRequest {
                service_account_id: account_id,
            })
            .send()
            .await?;
        let created: CreateKeyResponse = json_body(response).await?;
        info!("created key {} for service account {}", created.key.id, account_id);
        Ok(ServiceAccountKey {
            key_id: created.key.id,
            private_key: created.private_key.replace("\\n", "\n"),
        })
    }
}
