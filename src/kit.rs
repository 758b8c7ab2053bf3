//! Wiring of one configured identity: a shared HTTP client, the credential
//! source, its token cache and the clients that consume it.

use std::time::Duration;

use reqwest::Client;
use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::cache::TokenCache;
use crate::config::sources::ServiceConfig;
use crate::error::{Error, Result};
use crate::iam::IamClient;
use crate::sources::{SourceKind, TokenSource};
use crate::speech::{SpeechToText, TextToSpeech};

pub struct SpeechKit {
    pub tokens: TokenCache,
    pub tts: TextToSpeech,
    pub stt: SpeechToText,
    pub iam: IamClient,
}

impl SpeechKit {
    /// Build everything described by `cfg`. With `refresh.background` set,
    /// the token cache starts refreshing itself; call [`SpeechKit::shutdown`]
    /// to stop it.
    pub async fn from_config(cfg: &ServiceConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_millis(cfg.settings.http_timeout_ms))
            .build()
            .map_err(|err| Error::Config(format!("unable to build HTTP client: {err}")))?;

        let source =
            SourceKind::from_config(&cfg.credentials, &cfg.endpoints, client.clone()).await?;
        let policy = cfg.refresh.policy();
        info!("using {} credentials, refresh policy {:?}", source.name(), policy);

        let tokens = if cfg.refresh.background {
            TokenCache::with_background_refresh(source, policy, CancellationToken::new())
        } else {
            TokenCache::new(source, policy)
        };

        let endpoints = &cfg.endpoints;
        let speech = &cfg.speech;
        Ok(Self {
            tts: TextToSpeech::new(&speech.folder_id, tokens.clone())
                .with_client(client.clone())
                .with_endpoint(&endpoints.tts)
                .with_options(speech.tts.clone()),
            stt: SpeechToText::new(&speech.folder_id, tokens.clone())
                .with_client(client.clone())
                .with_endpoint(&endpoints.stt)
                .with_options(speech.stt.clone()),
            iam: IamClient::new(tokens.clone())
                .with_client(client)
                .with_endpoints(&endpoints.iam_service_accounts, &endpoints.iam_keys),
            tokens,
        })
    }

    /// Stop background refresh, if it was started.
    pub fn shutdown(&self) {
        if self.tokens.cancel_background_refresh() {
            info!("background token refresh cancelled");
        }
    }
}
