use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;

use crate::error::Result;
use crate::sources::fetch::exchange_for_iam_token;
use crate::sources::TokenSource;

/// Exchanges a user's OAuth passport token for an IAM token.
#[derive(Clone)]
pub struct PassportSource {
    client: Client,
    url: String,
    oauth_token: String,
}

#[derive(Serialize)]
struct PassportRequest<'a> {
    #[serde(rename = "yandexPassportOauthToken")]
    oauth_token: &'a str,
}

impl PassportSource {
    pub fn new(client: Client, url: &str, oauth_token: &str) -> Self {
        Self {
            client,
            url: url.to_owned(),
            oauth_token: oauth_token.to_owned(),
        }
    }
}

impl std::fmt::Debug for PassportSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PassportSource")
            .field("url", &self.url)
            .field("oauth_token", &"[REDACTED]")
            .finish()
    }
}

#[async_trait]
impl TokenSource for PassportSource {
    fn name(&self) -> &str {
        "passport"
    }

    async fn obtain_token(&self) -> Result<String> {
        let request = PassportRequest {
            oauth_token: &self.oauth_token,
        };
        exchange_for_iam_token(&self.client, &self.url, &request).await
    }
}
