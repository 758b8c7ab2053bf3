use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;
use tracing::{debug, error};

use crate::config::proc_validator;
use crate::config::sources::ServiceConfig;
use crate::error::{Error, Result};

static ENV_VAR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$\{(\w+)(?::([^\}]+))?\}").expect("env var pattern"));

/// Load and validate config from YAML file
pub async fn file_to_config(path: &Path) -> Result<ServiceConfig> {
    let content = tokio::fs::read_to_string(path)
        .await
        .map_err(|err| Error::Io(format!("{}: {}", path.display(), err)))?;

    let expanded = expand_env_vars(&content);
    parse_config(&expanded)
}

pub fn parse_config(content: &str) -> Result<ServiceConfig> {
    let service_config: ServiceConfig = serde_yaml::from_str(content)
        .inspect_err(|e| error!("parse config error: {}", e))
        .map_err(|e| Error::Config(e.to_string()))?;

    debug!("validation config ...");
    proc_validator::validate_service_config(&service_config)
        .map_err(|errors| Error::Config(errors.join("; ")))?;

    Ok(service_config)
}

/// Replace `${VAR}` and `${VAR:default}` with the environment value.
pub fn expand_env_vars(input: &str) -> String {
    ENV_VAR
        .replace_all(input, |caps: &regex::Captures| {
            let var = &caps[1];
            let default = caps.get(2).map(|m| m.as_str()).unwrap_or("");
            std::env::var(var).unwrap_or_else(|_| default.to_string())
        })
        .to_string()
}
