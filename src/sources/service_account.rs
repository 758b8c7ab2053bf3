use async_trait::async_trait;
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use reqwest::Client;
use serde::Serialize;

use crate::error::{Error, Result};
use crate::helpers::time::now_unix;
use crate::sources::fetch::exchange_for_iam_token;
use crate::sources::TokenSource;
use crate::utils::constants::ASSERTION_LIFETIME_SECS;

/// Exchanges a JWT signed with a service account key for an IAM token.
///
/// The assertion is signed with PS256. The RSA-PSS salt length equals the
/// SHA-256 output length, which is what the identity service verifies.
#[derive(Clone)]
pub struct ServiceAccountSource {
    client: Client,
    url: String,
    account_id: String,
    key_id: String,
    encoding_key: EncodingKey,
}

#[derive(Debug, Serialize)]
struct AssertionClaims<'a> {
    iss: &'a str,
    aud: &'a str,
    iat: u64,
    exp: u64,
}

#[derive(Serialize)]
struct AssertionRequest<'a> {
    jwt: &'a str,
}

impl ServiceAccountSource {
    /// Parses `private_key_pem` once; a malformed key fails here rather than
    /// on every refresh.
    pub fn new(
        client: Client,
        url: &str,
        account_id: &str,
        key_id: &str,
        private_key_pem: &str,
    ) -> Result<Self> {
        let encoding_key = EncodingKey::from_rsa_pem(private_key_pem.as_bytes())
            .map_err(|err| Error::Signing(format!("invalid private key: {err}")))?;
        Ok(Self {
            client,
            url: url.to_owned(),
            account_id: account_id.to_owned(),
            key_id: key_id.to_owned(),
            encoding_key,
        })
    }

    /// Build a fresh signed assertion valid for one hour.
    pub fn signed_assertion(&self) -> Result<String> {
        let issued_at = now_unix();
        let claims = AssertionClaims {
            iss: &self.account_id,
            aud: &self.url,
            iat: issued_at,
            exp: issued_at + ASSERTION_LIFETIME_SECS,
        };
        let mut header = Header::new(Algorithm::PS256);
        header.kid = Some(self.key_id.clone());

        encode(&header, &claims, &self.encoding_key).map_err(|err| Error::Signing(err.to_string()))
    }
}

impl std::fmt::Debug for ServiceAccountSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceAccountSource")
            .field("url", &self.url)
            .field("account_id", &self.account_id)
            .field("key_id", &self.key_id)
            .field("encoding_key", &"[REDACTED]")
            .finish()
    }
}

#[async_trait]
impl TokenSource for ServiceAccountSource {
    fn name(&self) -> &str {
        "service_account"
    }

    async fn obtain_token(&self) -> Result<String> {
        let jwt = self.signed_assertion()?;
        exchange_for_iam_token(&self.client, &self.url, &AssertionRequest { jwt: &jwt }).await
    }
}
