//! Configuration loaded from the environment (and `.env` via dotenv).

use std::env;
use std::time::Duration;

use async_openai::config::OpenAIConfig;

use crate::core::api_key;

pub const DEFAULT_API_BASE: &str = "https://api.sambanova.ai/v1";
pub const DEFAULT_MODEL: &str = "Meta-Llama-3.1-70B-Instruct";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_MIN_QUESTIONS: usize = 10;
pub const DEFAULT_HISTORY_LIMIT: usize = 10;

pub const TEMPERATURE: f32 = 0.5;
pub const TOP_P: f32 = 0.7;

#[derive(Debug, Clone)]
pub struct Config {
    pub api_base: String,
    pub api_key: Option<String>,
    pub model_id: String,
    /// Same-origin proxy endpoint. When set, generation does not need an API key.
    pub proxy_url: Option<String>,
    pub timeout: Duration,
    pub min_questions: usize,
    pub history_limit: usize,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("QUIZMASTER_API_KEY is not set (or run `quizmaster config set-api-key`)")]
    MissingApiKey,
    #[error("Invalid value for {var}: {value:?}")]
    InvalidValue { var: &'static str, value: String },
}

impl Config {
    /// Provider config for the direct transport. Fails when no key is available.
    pub fn openai_config(&self) -> Result<OpenAIConfig, ConfigError> {
        let key = self.require_api_key()?;
        Ok(OpenAIConfig::new()
            .with_api_base(self.api_base.trim_end_matches('/'))
            .with_api_key(key))
    }

    pub fn require_api_key(&self) -> Result<&str, ConfigError> {
        self.api_key.as_deref().ok_or(ConfigError::MissingApiKey)
    }

    /// Full chat-completions URL of the upstream provider.
    pub fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.api_base.trim_end_matches('/'))
    }

    /// Human-readable description of how questions will be generated.
    pub fn transport_label(&self) -> String {
        match &self.proxy_url {
            Some(url) => format!("proxy ({})", url),
            None => format!("direct ({})", self.api_base),
        }
    }
}

/// Load configuration from environment. An API key is required unless a proxy URL is set.
pub fn load() -> Result<Config, ConfigError> {
    let config = load_lenient()?;
    if config.proxy_url.is_none() {
        config.require_api_key()?;
    }
    Ok(config)
}

/// Load configuration without requiring an API key (for `config` and `serve` diagnostics).
pub fn load_lenient() -> Result<Config, ConfigError> {
    let api_base = non_empty_var("QUIZMASTER_API_BASE").unwrap_or_else(|| DEFAULT_API_BASE.to_string());
    let api_key = non_empty_var("QUIZMASTER_API_KEY").or_else(api_key::load_api_key);
    let model_id = non_empty_var("QUIZMASTER_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string());
    let proxy_url = non_empty_var("QUIZMASTER_PROXY_URL");

    let timeout_secs = non_zero(
        "QUIZMASTER_TIMEOUT_SECS",
        parse_var("QUIZMASTER_TIMEOUT_SECS", DEFAULT_TIMEOUT_SECS)?,
    )?;
    // A quiz is never empty, so at least one valid question is always required.
    let min_questions = non_zero(
        "QUIZMASTER_MIN_QUESTIONS",
        parse_var("QUIZMASTER_MIN_QUESTIONS", DEFAULT_MIN_QUESTIONS)?,
    )?;
    let history_limit = parse_var("QUIZMASTER_HISTORY_LIMIT", DEFAULT_HISTORY_LIMIT)?;

    Ok(Config {
        api_base,
        api_key,
        model_id,
        proxy_url,
        timeout: Duration::from_secs(timeout_secs),
        min_questions,
        history_limit,
    })
}

fn non_empty_var(name: &str) -> Option<String> {
    env::var(name)
        .ok()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

fn parse_var<T: std::str::FromStr>(name: &'static str, default: T) -> Result<T, ConfigError> {
    match non_empty_var(name) {
        None => Ok(default),
        Some(raw) => raw.parse().map_err(|_| ConfigError::InvalidValue {
            var: name,
            value: raw,
        }),
    }
}

fn non_zero<T>(var: &'static str, value: T) -> Result<T, ConfigError>
where
    T: Default + PartialEq + ToString,
{
    if value == T::default() {
        return Err(ConfigError::InvalidValue {
            var,
            value: value.to_string(),
        });
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::paths::TEST_ENV_LOCK;

    fn config_with(proxy_url: Option<&str>, api_key: Option<&str>) -> Config {
        Config {
            api_base: "https://example.test/v1/".to_string(),
            api_key: api_key.map(String::from),
            model_id: DEFAULT_MODEL.to_string(),
            proxy_url: proxy_url.map(String::from),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            min_questions: DEFAULT_MIN_QUESTIONS,
            history_limit: DEFAULT_HISTORY_LIMIT,
        }
    }

    #[test]
    fn completions_url_trims_trailing_slash() {
        let config = config_with(None, Some("k"));
        assert_eq!(
            config.completions_url(),
            "https://example.test/v1/chat/completions"
        );
    }

    #[test]
    fn openai_config_requires_key() {
        let config = config_with(None, None);
        assert!(matches!(
            config.openai_config(),
            Err(ConfigError::MissingApiKey)
        ));
        assert!(config_with(None, Some("k")).openai_config().is_ok());
    }

    #[test]
    fn zero_limits_are_rejected() {
        assert!(matches!(
            non_zero("QUIZMASTER_MIN_QUESTIONS", 0usize),
            Err(ConfigError::InvalidValue { var: "QUIZMASTER_MIN_QUESTIONS", .. })
        ));
        assert_eq!(non_zero("QUIZMASTER_TIMEOUT_SECS", 30u64).unwrap(), 30);
    }

    #[test]
    fn load_rejects_zero_min_questions() {
        let _lock = TEST_ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        unsafe { std::env::set_var("QUIZMASTER_MIN_QUESTIONS", "0") };
        let result = load_lenient();
        unsafe { std::env::remove_var("QUIZMASTER_MIN_QUESTIONS") };

        match result {
            Err(ConfigError::InvalidValue { var, value }) => {
                assert_eq!(var, "QUIZMASTER_MIN_QUESTIONS");
                assert_eq!(value, "0");
            }
            other => panic!("expected InvalidValue, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn transport_label_names_proxy() {
        let config = config_with(Some("http://localhost:3001/api/chat"), None);
        assert!(config.transport_label().starts_with("proxy"));
        assert!(config_with(None, None).transport_label().starts_with("direct"));
    }
}
