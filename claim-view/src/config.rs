use serde::Deserialize;
use std::path::Path;
use std::time::Duration;
use tracing::{debug, info};

use crate::error::{ClientError, Result};

const ENV_CONFIG_PATH: &str = "CLAIM_CONFIG_PATH";
const ENV_API_BASE: &str = "CLAIM_API_BASE";
const ENV_REQUEST_TIMEOUT: &str = "CLAIM_REQUEST_TIMEOUT_SECS";
const ENV_REDIRECT_DELAY: &str = "CLAIM_REDIRECT_DELAY_MS";
const DEFAULT_CONFIG_PATH: &str = "claim-view.yaml";

pub const DEFAULT_API_BASE: &str = "http://localhost:5000/api";
pub const DEFAULT_REDIRECT_DELAY: Duration = Duration::from_millis(1500);

/// YAML configuration file structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ConfigFile {
    #[serde(default)]
    pub api_base: Option<String>,
    #[serde(default)]
    pub request_timeout_secs: Option<u64>,
    #[serde(default)]
    pub redirect_delay_ms: Option<u64>,
}

/// Client configuration
#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    pub api_base: String,
    /// `None` leaves the transport default in place.
    pub request_timeout: Option<Duration>,
    /// Pause between a successful policy upload and opening the new folder.
    pub redirect_delay: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            request_timeout: None,
            redirect_delay: DEFAULT_REDIRECT_DELAY,
        }
    }
}

impl ClientConfig {
    /// Load configuration from `.env`, the YAML config file and the process environment.
    pub fn load() -> Result<Self> {
        // Missing .env is fine
        let _ = dotenvy::dotenv();

        let config_path =
            std::env::var(ENV_CONFIG_PATH).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());

        let mut config = Self::default();
        if Path::new(&config_path).exists() {
            info!(path = %config_path, "Loading configuration file");
            let content = std::fs::read_to_string(&config_path).map_err(|e| {
                ClientError::InvalidConfig(format!("cannot read {config_path}: {e}"))
            })?;
            config = config.merge_file(Self::parse_file(&content)?);
        } else {
            debug!(path = %config_path, "No configuration file, using defaults");
        }

        config.merge_env(|key| std::env::var(key).ok())
    }

    pub fn parse_file(content: &str) -> Result<ConfigFile> {
        serde_yaml::from_str(content).map_err(|e| ClientError::InvalidConfig(e.to_string()))
    }

    pub fn merge_file(mut self, file: ConfigFile) -> Self {
        if let Some(base) = file.api_base {
            self = self.with_api_base(base);
        }
        if let Some(secs) = file.request_timeout_secs {
            self.request_timeout = Some(Duration::from_secs(secs));
        }
        if let Some(ms) = file.redirect_delay_ms {
            self.redirect_delay = Duration::from_millis(ms);
        }
        self
    }

    /// Apply environment overrides through `lookup`, which keeps tests off the real environment.
    pub fn merge_env<F>(mut self, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(base) = lookup(ENV_API_BASE) {
            self = self.with_api_base(base);
        }
        if let Some(raw) = lookup(ENV_REQUEST_TIMEOUT) {
            self.request_timeout = Some(Duration::from_secs(parse_number(ENV_REQUEST_TIMEOUT, &raw)?));
        }
        if let Some(raw) = lookup(ENV_REDIRECT_DELAY) {
            self.redirect_delay = Duration::from_millis(parse_number(ENV_REDIRECT_DELAY, &raw)?);
        }
        Ok(self)
    }

    pub fn with_api_base(mut self, base: impl Into<String>) -> Self {
        self.api_base = base.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_redirect_delay(mut self, delay: Duration) -> Self {
        self.redirect_delay = delay;
        self
    }

    /// Absolute URL for an API path such as `/folders/3`.
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.api_base, path)
    }
}

fn parse_number(key: &str, raw: &str) -> Result<u64> {
    raw.trim()
        .parse()
        .map_err(|_| ClientError::InvalidConfig(format!("{key} must be a whole number, got {raw:?}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;

    #[test]
    fn defaults_match_backend_dev_server() {
        let config = ClientConfig::default();
        assert_eq!(config.api_base, "http://localhost:5000/api");
        assert_eq!(config.request_timeout, None);
        assert_eq!(config.redirect_delay, Duration::from_millis(1500));
    }

    #[test]
    fn yaml_file_overrides_defaults() {
        let file = ClientConfig::parse_file(
            "api_base: https://claims.example.com/api/\nrequest_timeout_secs: 30\n",
        )
        .unwrap();
        let config = ClientConfig::default().merge_file(file);

        assert_eq!(config.api_base, "https://claims.example.com/api");
        assert_eq!(config.request_timeout, Some(Duration::from_secs(30)));
        assert_eq!(config.redirect_delay, DEFAULT_REDIRECT_DELAY);
    }

    #[test]
    fn env_overrides_file() {
        let env: HashMap<&str, &str> = HashMap::from([
            ("CLAIM_API_BASE", "http://10.0.0.5:5000/api"),
            ("CLAIM_REDIRECT_DELAY_MS", "0"),
        ]);
        let config = ClientConfig::default()
            .merge_file(ConfigFile {
                api_base: Some("http://file-host/api".to_string()),
                ..Default::default()
            })
            .merge_env(|key| env.get(key).map(|v| v.to_string()))
            .unwrap();

        assert_eq!(config.api_base, "http://10.0.0.5:5000/api");
        assert_eq!(config.redirect_delay, Duration::ZERO);
    }

    #[test]
    fn bad_number_is_rejected() {
        let result = ClientConfig::default()
            .merge_env(|key| (key == "CLAIM_REQUEST_TIMEOUT_SECS").then(|| "soon".to_string()));
        assert!(matches!(result, Err(ClientError::InvalidConfig(_))));
    }

    #[test]
    fn malformed_yaml_is_rejected() {
        assert!(ClientConfig::parse_file("api_base: [unclosed").is_err());
    }

    #[test]
    fn endpoint_joins_base_and_path() {
        let config = ClientConfig::default().with_api_base("http://host/api/");
        assert_eq!(config.endpoint("/folders/7/qna"), "http://host/api/folders/7/qna");
    }
}
