//! Analyzer factory
//!
//! Builds the configured [`TicketAnalyzer`] once at process start.
//!
//! ## Example
//! ```ignore
//! let analyzer = AnalyzerFactory::create(&settings.analyzer, settings.environment)?;
//! tracing::info!(analyzer = analyzer.name(), "Analyzer ready");
//! ```

use std::sync::Arc;
use std::time::Duration;

use ticket_triage_config::{AnalyzerConfig, AnalyzerProvider, RuntimeEnvironment};
use ticket_triage_core::{Error, TicketAnalyzer};
use ticket_triage_llm::{LlmAnalyzer, LlmError, OpenAIBackend, OpenAIConfig};

use crate::heuristic::KeywordAnalyzer;

/// Factory for creating ticket analyzers
pub struct AnalyzerFactory;

impl AnalyzerFactory {
    /// Create an analyzer from config
    ///
    /// The openai provider without an API key falls back to the keyword
    /// analyzer in development and is an error in strict environments.
    pub fn create(
        config: &AnalyzerConfig,
        environment: RuntimeEnvironment,
    ) -> Result<Arc<dyn TicketAnalyzer>, Error> {
        match config.provider {
            AnalyzerProvider::Heuristic => {
                tracing::info!("Using keyword heuristic analyzer");
                Ok(Arc::new(KeywordAnalyzer::new()))
            }

            AnalyzerProvider::OpenAi => {
                let Some(api_key) = config.api_key() else {
                    if environment.is_strict() {
                        return Err(Error::Configuration(
                            "openai analyzer requires an API key (OPENAI_API_KEY)".to_string(),
                        ));
                    }
                    tracing::warn!("OpenAI API key not provided, falling back to keyword analyzer");
                    return Ok(Arc::new(KeywordAnalyzer::new()));
                };

                let openai_config = OpenAIConfig::openai(api_key, &config.model)
                    .with_endpoint(&config.endpoint)
                    .with_temperature(config.temperature)
                    .with_max_tokens(config.max_tokens as usize)
                    .with_timeout(Duration::from_millis(config.timeout_ms));

                let backend = OpenAIBackend::new(openai_config).map_err(configuration_error)?;
                tracing::info!(model = %config.model, endpoint = %config.endpoint, "Using OpenAI analyzer");
                Ok(Arc::new(LlmAnalyzer::new(Arc::new(backend))))
            }
        }
    }
}

fn configuration_error(err: LlmError) -> Error {
    Error::Configuration(err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(provider: AnalyzerProvider, api_key: Option<&str>) -> AnalyzerConfig {
        AnalyzerConfig {
            provider,
            api_key: api_key.map(String::from),
            ..Default::default()
        }
    }

    #[test]
    fn test_heuristic_provider() {
        let analyzer = AnalyzerFactory::create(
            &config(AnalyzerProvider::Heuristic, None),
            RuntimeEnvironment::Production,
        )
        .unwrap();
        assert_eq!(analyzer.name(), "heuristic");
    }

    #[test]
    fn test_openai_with_key() {
        let analyzer = AnalyzerFactory::create(
            &config(AnalyzerProvider::OpenAi, Some("sk-test")),
            RuntimeEnvironment::Development,
        )
        .unwrap();
        assert_eq!(analyzer.name(), "openai");
    }

    #[test]
    fn test_missing_key_falls_back_in_development() {
        let analyzer = AnalyzerFactory::create(
            &config(AnalyzerProvider::OpenAi, None),
            RuntimeEnvironment::Development,
        )
        .unwrap();
        assert_eq!(analyzer.name(), "heuristic");
    }

    #[test]
    fn test_missing_key_rejected_when_strict() {
        let result = AnalyzerFactory::create(
            &config(AnalyzerProvider::OpenAi, Some("  ")),
            RuntimeEnvironment::Staging,
        );
        assert!(matches!(result, Err(Error::Configuration(_))));
    }
}
