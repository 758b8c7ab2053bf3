use std::path::Path;

use reqwest::{Body, Client};
use serde::Deserialize;
use tracing::{debug, warn};

use crate::cache::TokenCache;
use crate::error::{Error, Result};
use crate::helpers::response::json_body;
use crate::observability::metrics::get_metrics;
use crate::speech::options::{format_speed, RecognitionOptions};
use crate::utils::constants::STT_URL;

const KIND: &str = "stt";

#[derive(Debug, Deserialize)]
struct Recognition {
    result: String,
}

/// Speech-to-text client for short audio.
#[derive(Debug, Clone)]
pub struct SpeechToText {
    pub folder_id: String,
    pub options: RecognitionOptions,
    client: Client,
    url: String,
    tokens: TokenCache,
}

impl SpeechToText {
    pub fn new(folder_id: &str, tokens: TokenCache) -> Self {
        Self {
            folder_id: folder_id.to_owned(),
            options: RecognitionOptions::default(),
            client: Client::new(),
            url: STT_URL.to_owned(),
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

    pub fn with_options(mut self, options: RecognitionOptions) -> Self {
        self.options = options;
        self
    }

    /// Recognize the speech in `audio` and return its text.
    pub async fn recognize(&self, audio: impl Into<Body>) -> Result<String> {
        let metrics = get_metrics().await;
        metrics.speech_requests.with_label_values(&[KIND]).inc();
        self.send(audio.into()).await.inspect_err(|err| {
            warn!("recognition failed: {}", err);
            metrics.speech_failures.with_label_values(&[KIND]).inc();
        })
    }

    pub async fn recognize_file(&self, path: impl AsRef<Path>) -> Result<String> {
        let path = path.as_ref();
        let audio = tokio::fs::read(path)
            .await
            .map_err(|err| Error::Io(format!("{}: {}", path.display(), err)))?;
        self.recognize(audio).await
    }

    async fn send(&self, audio: Body) -> Result<String> {
        let token = self.tokens.get_token().await?;

        let options = &self.options;
        let query = [
            ("topic", options.topic.as_str().to_owned()),
            ("profanityFilter", options.profanity_filter.to_string()),
            ("folderId", self.folder_id.clone()),
            ("format", options.format.as_str().to_owned()),
            ("speed", format_speed(options.speed)),
            ("lang", options.lang.as_str().to_owned()),
            ("sampleRateHertz", options.sample_rate.hertz().to_string()),
        ];

        debug!("sending audio for recognition");
        let response = self
            .client
            .post(&self.url)
            .bearer_auth(token)
            .query(&query)
            .body(audio)
            .send()
            .await?;
        let recognition: Recognition = json_body(response).await?;
        Ok(recognition.result)
    }
}
