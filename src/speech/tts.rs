use bytes::Bytes;
use reqwest::Client;
use tracing::{debug, warn};

use crate::cache::TokenCache;
use crate::error::{Error, Result};
use crate::helpers::response::success_body;
use crate::observability::metrics::get_metrics;
use crate::speech::options::{format_speed, SynthesisOptions};
use crate::utils::constants::TTS_URL;

const KIND: &str = "tts";

/// Text-to-speech client.
#[derive(Debug, Clone)]
pub struct TextToSpeech {
    pub folder_id: String,
    pub options: SynthesisOptions,
    client: Client,
    url: String,
    tokens: TokenCache,
}

impl TextToSpeech {
    pub fn new(folder_id: &str, tokens: TokenCache) -> Self {
        Self {
            folder_id: folder_id.to_owned(),
            options: SynthesisOptions::default(),
            client: Client::new(),
            url: TTS_URL.to_owned(),
            tokens,
        }
    }

    pub fn with_client(mut self, client: Client) -> Self {
        self.client = client;
        self
    }

    pub fn with_endpoint(mut self, url: &str) -> Self {
        self.url = url.to_owned();
        self
    }

    pub fn with_options(mut self, options: SynthesisOptions) -> Self {
        self.options = options;
        self
    }

    /// Synthesize `text` and return the encoded audio.
    ///
    /// Blank text is rejected before a token is requested.
    pub async fn synthesize(&self, text: &str) -> Result<Bytes> {
        if text.trim().is_empty() {
            return Err(Error::Validation("text must not be empty".to_owned()));
        }

        let metrics = get_metrics().await;
        metrics.speech_requests.with_label_values(&[KIND]).inc();
        self.send(text).await.inspect_err(|err| {
            warn!("synthesis failed: {}", err);
            metrics.speech_failures.with_label_values(&[KIND]).inc();
        })
    }

    async fn send(&self, text: &str) -> Result<Bytes> {
        let token = self.tokens.get_token().await?;

        let options = &self.options;
        let form = [
            ("text", text.to_owned()),
            ("voice", options.voice.as_str().to_owned()),
            ("emotion", options.emotion.as_str().to_owned()),
            ("folderId", self.folder_id.clone()),
            ("format", options.format.as_str().to_owned()),
            ("speed", format_speed(options.speed)),
            ("lang", options.lang.as_str().to_owned()),
            ("sampleRateHertz", options.sample_rate.hertz().to_string()),
        ];

        debug!("synthesizing {} characters", text.chars().count());
        let response = self
            .client
            .post(&self.url)
            .bearer_auth(token)
            .form(&form)
            .send()
            .await?;
        success_body(response).await
    }
}
