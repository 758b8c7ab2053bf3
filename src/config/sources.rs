use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

use crate::cache::RefreshPolicy;
use crate::config::settings::SettingsConfig;
use crate::speech::{RecognitionOptions, SynthesisOptions};
use crate::utils::constants::{
    IAM_KEYS_URL, IAM_SERVICE_ACCOUNTS_URL, IAM_TOKENS_URL, IAM_TOKEN_LIFETIME, STT_URL, TTS_URL,
};

/// ================================
/// Full service configuration
/// ================================
#[derive(Debug, Deserialize, Clone)]
pub struct ServiceConfig {
    #[serde(default)]
    pub settings: SettingsConfig,
    #[serde(default)]
    pub endpoints: EndpointsConfig,
    pub credentials: CredentialsConfig,
    #[serde(default)]
    pub refresh: RefreshConfig,
    #[serde(default)]
    pub speech: SpeechConfig,
}

/// ================================
/// Endpoints
/// ================================
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct EndpointsConfig {
    pub iam_tokens: String,
    pub iam_service_accounts: String,
    pub iam_keys: String,
    pub tts: String,
    pub stt: String,
}

impl Default for EndpointsConfig {
    fn default() -> Self {
        Self {
            iam_tokens: IAM_TOKENS_URL.to_owned(),
            iam_service_accounts: IAM_SERVICE_ACCOUNTS_URL.to_owned(),
            iam_keys: IAM_KEYS_URL.to_owned(),
            tts: TTS_URL.to_owned(),
            stt: STT_URL.to_owned(),
        }
    }
}

/// ================================
/// Credentials
/// ================================
#[derive(Debug, Deserialize, Clone)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CredentialsConfig {
    /// user account: OAuth passport token
    Passport { oauth_token: String },
    /// service account: authorized key, inline PEM or a path to it
    ServiceAccount {
        account_id: String,
        key_id: String,
        private_key: Option<String>,
        private_key_path: Option<PathBuf>,
    },
}

/// ================================
/// Token refresh
/// ================================
#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct RefreshConfig {
    /// refresh in a background task instead of only on demand
    pub background: bool,
    pub token_lifetime_seconds: Option<u64>,
    pub refresh_after_seconds: Option<u64>,
    pub grace_period_seconds: Option<u64>,
    pub interval_seconds: Option<u64>,
    pub fetch_timeout_ms: Option<u64>,
}

impl RefreshConfig {
    /// Policy derived from the token lifetime, with explicit overrides applied.
    pub fn policy(&self) -> RefreshPolicy {
        let lifetime = self
            .token_lifetime_seconds
            .map(Duration::from_secs)
            .unwrap_or(IAM_TOKEN_LIFETIME);
        let mut policy = RefreshPolicy::for_lifetime(lifetime);
        if let Some(secs) = self.refresh_after_seconds {
            policy = policy.with_refresh_after(Duration::from_secs(secs));
        }
        if let Some(secs) = self.grace_period_seconds {
            policy = policy.with_grace_period(Duration::from_secs(secs));
        }
        if let Some(secs) = self.interval_seconds {
            policy = policy.with_background_interval(Duration::from_secs(secs));
        }
        if let Some(ms) = self.fetch_timeout_ms {
            policy = policy.with_fetch_timeout(Some(Duration::from_millis(ms)));
        }
        policy
    }
}

/// ================================
/// Speech
/// ================================
#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct SpeechConfig {
    pub folder_id: String,
    pub tts: SynthesisOptions,
    pub stt: RecognitionOptions,
}
