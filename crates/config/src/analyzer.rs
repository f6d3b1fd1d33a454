//! Analyzer selection and LLM connection settings

use serde::{Deserialize, Serialize};

use crate::ConfigError;

/// Which analyzer implementation to build at startup
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum AnalyzerProvider {
    /// Deterministic keyword heuristic, no external calls
    #[default]
    #[serde(alias = "mock")]
    Heuristic,
    /// OpenAI-compatible chat completions endpoint
    OpenAi,
}

impl AnalyzerProvider {
    pub fn as_str(&self) -> &'static str {
        match self {
            AnalyzerProvider::Heuristic => "heuristic",
            AnalyzerProvider::OpenAi => "openai",
        }
    }
}

/// Analyzer configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyzerConfig {
    #[serde(default)]
    pub provider: AnalyzerProvider,

    /// API key; defaults to `OPENAI_API_KEY` from the environment
    #[serde(default = "default_api_key")]
    pub api_key: Option<String>,

    /// Base URL of the chat completions API
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    #[serde(default = "default_model")]
    pub model: String,

    #[serde(default = "default_temperature")]
    pub temperature: f32,

    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    /// Upper bound on a single analysis, in milliseconds
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

fn default_api_key() -> Option<String> {
    std::env::var("OPENAI_API_KEY")
        .ok()
        .filter(|key| !key.trim().is_empty())
}
fn default_endpoint() -> String {
    "https://api.openai.com/v1".to_string()
}
fn default_model() -> String {
    "gpt-4-turbo-preview".to_string()
}
fn default_temperature() -> f32 {
    0.3
}
fn default_max_tokens() -> u32 {
    512
}
fn default_timeout_ms() -> u64 {
    10_000
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            provider: AnalyzerProvider::default(),
            api_key: default_api_key(),
            endpoint: default_endpoint(),
            model: default_model(),
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
            timeout_ms: default_timeout_ms(),
        }
    }
}

impl AnalyzerConfig {
    /// API key if one is configured and non-blank
    pub fn api_key(&self) -> Option<&str> {
        self.api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
    }

    /// `require_api_key` is set for strict environments
    pub fn validate(&self, require_api_key: bool) -> Result<(), ConfigError> {
        if self.timeout_ms == 0 {
            return Err(ConfigError::invalid(
                "analyzer.timeout_ms",
                "must be at least 1",
            ));
        }

        if !(0.0..=2.0).contains(&self.temperature) {
            return Err(ConfigError::invalid(
                "analyzer.temperature",
                format!("must be between 0.0 and 2.0, got {}", self.temperature),
            ));
        }

        if self.max_tokens == 0 {
            return Err(ConfigError::invalid(
                "analyzer.max_tokens",
                "must be at least 1",
            ));
        }

        if self.provider == AnalyzerProvider::OpenAi {
            if self.endpoint.trim().is_empty() {
                return Err(ConfigError::invalid(
                    "analyzer.endpoint",
                    "cannot be empty for the openai provider",
                ));
            }
            if require_api_key && self.api_key().is_none() {
                return Err(ConfigError::MissingField(
                    "analyzer.api_key (required for the openai provider)".to_string(),
                ));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn openai(api_key: Option<&str>) -> AnalyzerConfig {
        AnalyzerConfig {
            provider: AnalyzerProvider::OpenAi,
            api_key: api_key.map(String::from),
            ..Default::default()
        }
    }

    #[test]
    fn test_defaults() {
        let config = AnalyzerConfig::default();
        assert_eq!(config.provider, AnalyzerProvider::Heuristic);
        assert_eq!(config.model, "gpt-4-turbo-preview");
        assert_eq!(config.timeout_ms, 10_000);
        assert!(config.validate(true).is_ok());
    }

    #[test]
    fn test_api_key_required_only_when_strict() {
        assert!(openai(None).validate(false).is_ok());
        assert!(openai(None).validate(true).is_err());
        assert!(openai(Some("   ")).validate(true).is_err());
        assert!(openai(Some("sk-test")).validate(true).is_ok());
    }

    #[test]
    fn test_bounds() {
        let mut config = AnalyzerConfig::default();
        config.timeout_ms = 0;
        assert!(config.validate(false).is_err());

        config.timeout_ms = 500;
        config.temperature = 2.5;
        assert!(config.validate(false).is_err());

        config.temperature = 0.0;
        assert!(config.validate(false).is_ok());
    }
}
