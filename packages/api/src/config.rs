//! # Client configuration
//!
//! [`ApiConfig`] tells the client where the backend lives. [`ApiConfig::load`]
//! layers three sources, last one wins:
//!
//! - [`ApiConfig::default`]: local development backend.
//! - `api.toml` shipped with the app (missing keys keep their defaults).
//! - `MATERNA_API_URL` from the environment (a `.env` file is honoured on
//!   native builds; on wasm the variable is read at compile time).
//!
//! ```toml
//! base_url = "https://api.materna.example/api"
//! request_timeout_secs = 30
//! ```

use serde::{Deserialize, Serialize};

/// Environment variable holding the backend base URL.
pub const API_URL_ENV: &str = "MATERNA_API_URL";

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL all endpoint paths are appended to, without a trailing slash.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Per-request timeout in seconds (native only; browsers manage their own).
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

fn default_base_url() -> String {
    "http://localhost:5000/api".to_string()
}

fn default_request_timeout() -> u64 {
    30
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            request_timeout_secs: default_request_timeout(),
        }
    }
}

impl ApiConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: normalize(base_url.into()),
            ..Self::default()
        }
    }

    /// Parse from TOML string.
    pub fn from_toml(s: &str) -> Result<Self, toml::de::Error> {
        let mut config: Self = toml::from_str(s)?;
        config.base_url = normalize(config.base_url);
        Ok(config)
    }

    /// Parse `toml`, then let the environment override the base URL.
    ///
    /// A malformed file is logged and replaced by the defaults.
    pub fn load(toml: &str) -> Self {
        let config = Self::from_toml(toml).unwrap_or_else(|e| {
            tracing::warn!(error = %e, "invalid api.toml; using defaults");
            Self::default()
        });
        config.with_env_override(env_base_url())
    }

    fn with_env_override(self, url: Option<String>) -> Self {
        match url {
            Some(url) if !url.trim().is_empty() => Self {
                base_url: normalize(url),
                ..self
            },
            _ => self,
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn env_base_url() -> Option<String> {
    dotenvy::dotenv().ok();
    std::env::var(API_URL_ENV).ok()
}

#[cfg(target_arch = "wasm32")]
fn env_base_url() -> Option<String> {
    option_env!("MATERNA_API_URL").map(str::to_string)
}

fn normalize(url: String) -> String {
    url.trim().trim_end_matches('/').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ApiConfig::default();
        assert_eq!(config.base_url, "http://localhost:5000/api");
        assert_eq!(config.request_timeout_secs, 30);
    }

    #[test]
    fn test_from_toml_partial() {
        let config = ApiConfig::from_toml("base_url = \"https://api.example.com/v1/\"").unwrap();
        assert_eq!(config.base_url, "https://api.example.com/v1");
        assert_eq!(config.request_timeout_secs, 30);

        // Empty file is the default configuration
        assert_eq!(ApiConfig::from_toml("").unwrap(), ApiConfig::default());
    }

    #[test]
    fn test_load_keeps_file_settings() {
        assert_eq!(ApiConfig::load("request_timeout_secs = 5").request_timeout_secs, 5);
        // A broken file falls back to defaults rather than failing startup
        assert_eq!(ApiConfig::load("request_timeout_secs = [").request_timeout_secs, 30);
    }

    #[test]
    fn test_env_overrides_file() {
        let file = ApiConfig::from_toml("base_url = \"https://file.example.com\"").unwrap();

        let overridden = file
            .clone()
            .with_env_override(Some("https://env.example.com/api/".to_string()));
        assert_eq!(overridden.base_url, "https://env.example.com/api");

        assert_eq!(file.clone().with_env_override(Some("  ".to_string())), file);
        assert_eq!(file.clone().with_env_override(None), file);
    }

    #[test]
    fn test_rejects_bad_toml() {
        assert!(ApiConfig::from_toml("request_timeout_secs = \"soon\"").is_err());
    }
}
