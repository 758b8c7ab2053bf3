use bytes::Bytes;
use reqwest::Response;
use serde::de::DeserializeOwned;

use crate::error::{Error, Result};

/// Return the body of a successful response, or the service error it carries.
pub async fn success_body(response: Response) -> Result<Bytes> {
    let status = response.status();
    let body = response.bytes().await?;
    if !status.is_success() {
        return Err(Error::from_status(status, &body));
    }
    Ok(body)
}

/// Decode the JSON body of a successful response into `T`.
pub async fn json_body<T: DeserializeOwned>(response: Response) -> Result<T> {
    let body = success_body(response).await?;
    serde_json::from_slice(&body).map_err(|err| Error::Decode(err.to_string()))
}
