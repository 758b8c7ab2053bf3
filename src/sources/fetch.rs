/// Token exchange shared by all sources.
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Error, Result};
use crate::helpers::response::json_body;

#[derive(Debug, Deserialize)]
struct IamTokenResponse {
    #[serde(rename = "iamToken")]
    iam_token: String,
}

/// POST `request` as JSON to the identity endpoint and extract the IAM token.
pub async fn exchange_for_iam_token<B>(client: &Client, url: &str, request: &B) -> Result<String>
where
    B: Serialize + ?Sized,
{
    debug!("requesting IAM token from {}", url);
    let response = client.post(url).json(request).send().await?;
    let body: IamTokenResponse = json_body(response).await?;

    let token = body.iam_token.trim();
    if token.is_empty() {
        return Err(Error::Decode("response contains an empty iamToken".to_owned()));
    }
    Ok(token.to_owned())
}
