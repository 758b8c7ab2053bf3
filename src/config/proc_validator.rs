//! Configuration validation with aggregated errors.
//! - Aggregates all issues into Vec<String>
//! - Credentials: non-empty identifiers, exactly one private key source
//! - Refresh policy invariants, HTTP timeout, logging level, endpoint URLs

use tracing::{error, info};

use crate::config::settings::SettingsConfig;
use crate::config::sources::{CredentialsConfig, EndpointsConfig, ServiceConfig};

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Public entrypoint: returns Ok(()) or Err(Vec<String>) containing all issues.
pub fn validate_service_config(cfg: &ServiceConfig) -> Result<(), Vec<String>> {
    let mut errors: Vec<String> = Vec::new();

    validate_settings(&cfg.settings, &mut errors);
    validate_endpoints(&cfg.endpoints, &mut errors);
    validate_credentials(&cfg.credentials, &mut errors);

    if let Err(err) = cfg.refresh.policy().validate() {
        errors.push(format!("refresh: {}", err));
    }

    if errors.is_empty() {
        info!("config validation passed");
        Ok(())
    } else {
        for e in &errors {
            error!("config validation: {}", e);
        }
        Err(errors)
    }
}

fn validate_settings(settings: &SettingsConfig, errors: &mut Vec<String>) {
    if settings.http_timeout_ms == 0 {
        errors.push("settings.http_timeout_ms must be > 0".to_string());
    }
    if let Some(logging) = &settings.logging {
        if !LOG_LEVELS.contains(&logging.level.to_lowercase().as_str()) {
            errors.push(format!(
                "settings.logging.level '{}' is not one of {:?}",
                logging.level, LOG_LEVELS
            ));
        }
    }
}

fn validate_endpoints(endpoints: &EndpointsConfig, errors: &mut Vec<String>) {
    let all = [
        ("iam_tokens", &endpoints.iam_tokens),
        ("iam_service_accounts", &endpoints.iam_service_accounts),
        ("iam_keys", &endpoints.iam_keys),
        ("tts", &endpoints.tts),
        ("stt", &endpoints.stt),
    ];
    for (name, url) in all {
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            errors.push(format!("endpoints.{} must be an http(s) URL, got '{}'", name, url));
        }
    }
}

fn validate_credentials(credentials: &CredentialsConfig, errors: &mut Vec<String>) {
    match credentials {
        CredentialsConfig::Passport { oauth_token } => {
            if oauth_token.trim().is_empty() {
                errors.push("credentials.oauth_token must not be empty".to_string());
            }
        }
        CredentialsConfig::ServiceAccount {
            account_id,
            key_id,
            private_key,
            private_key_path,
        } => {
            if account_id.trim().is_empty() {
                errors.push("credentials.account_id must not be empty".to_string());
            }
            if key_id.trim().is_empty() {
                errors.push("credentials.key_id must not be empty".to_string());
            }
            match (private_key, private_key_path) {
                (Some(_), Some(_)) => errors.push(
                    "credentials: set either private_key or private_key_path, not both".to_string(),
                ),
                (None, None) => errors.push(
                    "credentials: one of private_key or private_key_path is required".to_string(),
                ),
                (Some(pem), None) if pem.trim().is_empty() => {
                    errors.push("credentials.private_key must not be empty".to_string())
                }
                _ => {}
            }
        }
    }
}
