//! `TicketAnalyzer` over an LLM backend

use async_trait::async_trait;
use std::sync::Arc;

use ticket_triage_core::{AnalysisError, Classification, TicketAnalyzer, TicketInput};

use crate::backend::LlmBackend;
use crate::prompt::PromptBuilder;
use crate::response::parse_classification;

/// Analyzer that asks a chat model to classify the ticket
pub struct LlmAnalyzer {
    backend: Arc<dyn LlmBackend>,
    prompts: PromptBuilder,
}

impl LlmAnalyzer {
    pub fn new(backend: Arc<dyn LlmBackend>) -> Self {
        Self {
            backend,
            prompts: PromptBuilder::new(),
        }
    }

    pub fn model_name(&self) -> &str {
        self.backend.model_name()
    }
}

#[async_trait]
impl TicketAnalyzer for LlmAnalyzer {
    async fn analyze(&self, input: &TicketInput) -> Result<Classification, AnalysisError> {
        let messages = self.prompts.build(input);

        let result = self.backend.generate(&messages).await.map_err(|e| {
            tracing::warn!(model = %self.backend.model_name(), error = %e, "LLM analysis failed");
            AnalysisError::from(e)
        })?;

        let classification = parse_classification(&result.text).map_err(|e| {
            tracing::warn!(error = %e, "LLM returned an unusable classification");
            AnalysisError::from(e)
        })?;

        tracing::debug!(
            category = %classification.category,
            urgency = %classification.urgency,
            confidence = classification.confidence,
            tokens = result.tokens,
            total_time_ms = result.total_time_ms,
            "LLM classification complete"
        );

        Ok(classification)
    }

    async fn health_check(&self) -> bool {
        self.backend.is_available().await
    }

    fn name(&self) -> &str {
        "openai"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::GenerationResult;
    use crate::prompt::{Message, Role};
    use crate::LlmError;
    use ticket_triage_core::{Category, CustomerType, TeamQueue};

    use std::sync::Mutex;

    /// Returns a fixed reply and records the last prompt it saw
    struct ScriptedBackend {
        reply: Result<String, String>,
        available: bool,
        last_messages: Mutex<Vec<Message>>,
    }

    #[async_trait]
    impl LlmBackend for ScriptedBackend {
        async fn generate(&self, messages: &[Message]) -> Result<GenerationResult, LlmError> {
            *self.last_messages.lock().unwrap() = messages.to_vec();
            match &self.reply {
                Ok(text) => Ok(GenerationResult {
                    text: text.clone(),
                    tokens: 0,
                    total_time_ms: 1,
                }),
                Err(msg) => Err(LlmError::Api(msg.clone())),
            }
        }

        async fn is_available(&self) -> bool {
            self.available
        }

        fn model_name(&self) -> &str {
            "scripted"
        }
    }

    fn backend(reply: Result<&str, &str>) -> Arc<ScriptedBackend> {
        Arc::new(ScriptedBackend {
            reply: reply.map(String::from).map_err(String::from),
            available: true,
            last_messages: Default::default(),
        })
    }

    fn input() -> TicketInput {
        TicketInput::new("Feature idea", "Please add dark mode", CustomerType::Paid)
    }

    #[tokio::test]
    async fn test_analyze_success() {
        let backend = backend(Ok(
            r#"{"category":"feature_request","urgency":"low","suggestedTeam":"product","explanation":"UI request","confidence":0.88,"reasoningFactors":["asks to add"]}"#,
        ));
        let analyzer = LlmAnalyzer::new(backend.clone());

        let c = analyzer.analyze(&input()).await.unwrap();
        assert_eq!(c.category, Category::FeatureRequest);
        assert_eq!(c.suggested_team, TeamQueue::Product);

        let sent = backend.last_messages.lock().unwrap().clone();
        assert_eq!(sent[0].role, Role::System);
        assert!(sent[1].content.contains("Please add dark mode"));
    }

    #[tokio::test]
    async fn test_backend_error_becomes_analysis_error() {
        let analyzer = LlmAnalyzer::new(backend(Err("HTTP 503: overloaded")));
        let err = analyzer.analyze(&input()).await.unwrap_err();
        assert_eq!(err, AnalysisError::Api("HTTP 503: overloaded".to_string()));
    }

    #[tokio::test]
    async fn test_malformed_reply() {
        let analyzer = LlmAnalyzer::new(backend(Ok("not json at all")));
        let err = analyzer.analyze(&input()).await.unwrap_err();
        assert!(matches!(err, AnalysisError::MalformedResponse(_)));
    }

    #[tokio::test]
    async fn test_health_check_delegates() {
        let analyzer = LlmAnalyzer::new(Arc::new(ScriptedBackend {
            reply: Ok(String::new()),
            available: false,
            last_messages: Default::default(),
        }));
        assert!(!analyzer.health_check().await);
        assert_eq!(analyzer.name(), "openai");
        assert_eq!(analyzer.model_name(), "scripted");
    }
}
