use std::time::Duration;

use http::StatusCode;
use serde::Deserialize;

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Errors produced by token sources, the token cache and the speech clients.
///
/// The type is `Clone` because the token cache keeps the error of the last
/// failed fetch and hands a copy to every caller until a fetch succeeds.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Error {
    #[error("unable to reach {endpoint}: {message}")]
    Transport { endpoint: String, message: String },

    #[error("request failed: {status}{}", describe_status(code.as_deref(), message.as_deref()))]
    Status {
        status: StatusCode,
        code: Option<String>,
        message: Option<String>,
    },

    #[error("unable to decode response: {0}")]
    Decode(String),

    #[error("{0}")]
    Validation(String),

    #[error("unable to sign assertion: {0}")]
    Signing(String),

    #[error("token request timed out after {0:?}")]
    Timeout(Duration),

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("io error: {0}")]
    Io(String),
}

fn describe_status(code: Option<&str>, message: Option<&str>) -> String {
    match (code, message) {
        (Some(code), Some(message)) => format!("; {code}: {message}"),
        (None, Some(message)) => format!("; {message}"),
        (Some(code), None) => format!("; {code}"),
        (None, None) => String::new(),
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            return Error::Decode(err.to_string());
        }
        Error::Transport {
            endpoint: err
                .url()
                .map(|url| format!("{}{}", url.host_str().unwrap_or_default(), url.path()))
                .unwrap_or_else(|| "<unknown>".to_owned()),
            message: err.to_string(),
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err.to_string())
    }
}

/// Error body returned by the identity service (`code`, `message`) or by the
/// speech service (`error_code`, `error_message`).
#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default, alias = "error_code")]
    code: Option<serde_json::Value>,
    #[serde(default, alias = "error_message")]
    message: Option<String>,
}

impl Error {
    /// Build a `Status` error from a non-success response body.
    pub fn from_status(status: StatusCode, body: &[u8]) -> Self {
        match serde_json::from_slice::<ErrorBody>(body) {
            Ok(info) => Error::Status {
                status,
                code: info.code.map(|code| match code {
                    serde_json::Value::String(code) => code,
                    other => other.to_string(),
                }),
                message: info.message.filter(|m| !m.is_empty()),
            },
            Err(_) => Error::Status {
                status,
                code: None,
                message: None,
            },
        }
    }
}
