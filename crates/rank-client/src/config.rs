//! Ranking oracle configuration.

use serde::Deserialize;
use std::time::Duration;

/// Default oracle base URL (any OpenAI-compatible chat endpoint).
pub const DEFAULT_ORACLE_BASE_URL: &str = "http://localhost:11434";

/// Default model name sent with every request.
pub const DEFAULT_ORACLE_MODEL: &str = "llama3.1";

/// Default request deadline in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Read-only settings for the oracle transport. Nothing in here changes
/// per call, so one client built from it is shared by every request.
#[derive(Debug, Clone, Deserialize)]
pub struct OracleConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,

    #[serde(default = "default_model")]
    pub model: String,

    /// Sent as a bearer token when present
    #[serde(default)]
    pub api_key: Option<String>,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    #[serde(default = "default_temperature")]
    pub temperature: f32,
}

fn default_base_url() -> String {
    DEFAULT_ORACLE_BASE_URL.to_string()
}

fn default_model() -> String {
    DEFAULT_ORACLE_MODEL.to_string()
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

fn default_temperature() -> f32 {
    0.2
}

impl Default for OracleConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            model: default_model(),
            api_key: None,
            timeout_secs: default_timeout_secs(),
            temperature: default_temperature(),
        }
    }
}

/// Environment variable overriding `base_url`.
pub const ENV_URL: &str = "SHELF_ORACLE_URL";

/// Environment variable overriding `model`.
pub const ENV_MODEL: &str = "SHELF_ORACLE_MODEL";

/// Environment variable holding the bearer token.
pub const ENV_API_KEY: &str = "SHELF_ORACLE_API_KEY";

/// Environment variable overriding `timeout_secs`.
pub const ENV_TIMEOUT_SECS: &str = "SHELF_ORACLE_TIMEOUT_SECS";

impl OracleConfig {
    /// Build from the `SHELF_ORACLE_*` environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build from any variable source. Unset, empty and unparsable values
    /// fall back to the defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());
        let defaults = Self::default();
        Self {
            base_url: get(ENV_URL).unwrap_or(defaults.base_url),
            model: get(ENV_MODEL).unwrap_or(defaults.model),
            api_key: get(ENV_API_KEY),
            timeout_secs: get(ENV_TIMEOUT_SECS)
                .and_then(|value| value.trim().parse().ok())
                .unwrap_or(defaults.timeout_secs),
            temperature: defaults.temperature,
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn with_timeout_secs(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Chat completions endpoint derived from `base_url`
    pub fn completions_url(&self) -> String {
        format!("{}/v1/chat/completions", self.base_url.trim_end_matches('/'))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = OracleConfig::default();
        assert_eq!(config.base_url, DEFAULT_ORACLE_BASE_URL);
        assert_eq!(config.timeout(), Duration::from_secs(DEFAULT_TIMEOUT_SECS));
        assert!(config.api_key.is_none());
    }

    #[test]
    fn test_completions_url_trims_trailing_slash() {
        let config = OracleConfig::default().with_base_url("http://oracle.local:8080/");
        assert_eq!(
            config.completions_url(),
            "http://oracle.local:8080/v1/chat/completions"
        );
    }

    fn lookup<'a>(vars: &'a [(&'a str, &'a str)]) -> impl Fn(&str) -> Option<String> + 'a {
        move |name| {
            vars.iter()
                .find(|(key, _)| *key == name)
                .map(|(_, value)| value.to_string())
        }
    }

    #[test]
    fn test_from_lookup_unset_uses_defaults() {
        let config = OracleConfig::from_lookup(lookup(&[]));
        assert_eq!(config.base_url, DEFAULT_ORACLE_BASE_URL);
        assert_eq!(config.model, DEFAULT_ORACLE_MODEL);
        assert_eq!(config.timeout_secs, DEFAULT_TIMEOUT_SECS);
        assert!(config.api_key.is_none());
    }

    #[test]
    fn test_from_lookup_reads_every_variable() {
        let config = OracleConfig::from_lookup(lookup(&[
            (ENV_URL, "http://oracle.local:9000"),
            (ENV_MODEL, "mistral"),
            (ENV_API_KEY, "secret"),
            (ENV_TIMEOUT_SECS, " 7 "),
        ]));
        assert_eq!(config.base_url, "http://oracle.local:9000");
        assert_eq!(config.model, "mistral");
        assert_eq!(config.api_key.as_deref(), Some("secret"));
        assert_eq!(config.timeout(), Duration::from_secs(7));
    }

    #[test]
    fn test_from_lookup_empty_and_unparsable_fall_back() {
        let config = OracleConfig::from_lookup(lookup(&[
            (ENV_URL, ""),
            (ENV_MODEL, "   "),
            (ENV_API_KEY, ""),
            (ENV_TIMEOUT_SECS, "soon"),
        ]));
        assert_eq!(config.base_url, DEFAULT_ORACLE_BASE_URL);
        assert_eq!(config.model, DEFAULT_ORACLE_MODEL);
        assert!(config.api_key.is_none());
        assert_eq!(config.timeout_secs, DEFAULT_TIMEOUT_SECS);

        let negative = OracleConfig::from_lookup(lookup(&[(ENV_TIMEOUT_SECS, "-3")]));
        assert_eq!(negative.timeout_secs, DEFAULT_TIMEOUT_SECS);
    }

    #[test]
    fn test_from_env_reads_process_environment() {
        // The only test in this crate touching these variables
        std::env::set_var(ENV_MODEL, "env-model");
        std::env::set_var(ENV_TIMEOUT_SECS, "not-a-number");
        std::env::remove_var(ENV_API_KEY);

        let config = OracleConfig::from_env();

        std::env::remove_var(ENV_MODEL);
        std::env::remove_var(ENV_TIMEOUT_SECS);
        assert_eq!(config.model, "env-model");
        assert_eq!(config.timeout_secs, DEFAULT_TIMEOUT_SECS);
        assert!(config.api_key.is_none());
    }

    #[test]
    fn test_deserialize_partial() {
        let config: OracleConfig =
            serde_json::from_str(r#"{"model": "mistral", "timeout_secs": 5}"#).unwrap();
        assert_eq!(config.model, "mistral");
        assert_eq!(config.timeout_secs, 5);
        assert_eq!(config.base_url, DEFAULT_ORACLE_BASE_URL);
    }
}
