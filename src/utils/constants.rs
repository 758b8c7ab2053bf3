//! Shared constants and invariants

use std::time::Duration;

pub const IAM_TOKENS_URL: &str = "https://iam.api.cloud.yandex.net/iam/v1/tokens";
pub const IAM_SERVICE_ACCOUNTS_URL: &str = "https://iam.api.cloud.yandex.net/iam/v1/serviceAccounts";
pub const IAM_KEYS_URL: &str = "https://iam.api.cloud.yandex.net/iam/v1/keys";
pub const TTS_URL: &str = "https://tts.api.cloud.yandex.net/speech/v1/tts:synthesize";
pub const STT_URL: &str = "https://stt.api.cloud.yandex.net/speech/v1/stt:recognize";

pub const DEFAULT_HTTP_TIMEOUT_MS: u64 = 10_000;

/// Nominal lifetime of an IAM token.
pub const IAM_TOKEN_LIFETIME: Duration = Duration::from_secs(12 * 60 * 60);
/// How long before expiry a token is considered due for refresh.
pub const REFRESH_MARGIN: Duration = Duration::from_secs(4 * 60 * 60);
/// How long before expiry a failed refresh stops being hidden from callers.
pub const GRACE_MARGIN: Duration = Duration::from_secs(10 * 60);
pub const BACKGROUND_REFRESH_INTERVAL: Duration = Duration::from_secs(60);
pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(30);

/// Lifetime of the signed assertion exchanged for an IAM token.
pub const ASSERTION_LIFETIME_SECS: u64 = 60 * 60;
