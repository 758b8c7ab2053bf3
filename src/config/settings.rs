use serde::Deserialize;

use crate::utils::constants::DEFAULT_HTTP_TIMEOUT_MS;

/// ================================
/// Global settings
/// ================================
#[derive(Debug, Deserialize, Clone)]
pub struct SettingsConfig {
    /// request timeout for every outbound HTTP call
    #[serde(default = "default_http_timeout_ms")]
    pub http_timeout_ms: u64,
    pub logging: Option<LoggingConfig>,
}

impl Default for SettingsConfig {
    fn default() -> Self {
        Self {
            http_timeout_ms: DEFAULT_HTTP_TIMEOUT_MS,
            logging: None,
        }
    }
}

/// ================================
/// Logging
/// ================================
#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    pub level: String, // allowed: trace, debug, info, warn, error
    #[serde(default = "default_log_format")]
    pub format: LogFormat,
}

impl LoggingConfig {
    pub fn new(level: String, format: LogFormat) -> Self {
        Self { level, format }
    }
}

#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Json,
    Compact,
}

fn default_http_timeout_ms() -> u64 {
    DEFAULT_HTTP_TIMEOUT_MS
}

fn default_log_format() -> LogFormat {
    LogFormat::Compact
}
