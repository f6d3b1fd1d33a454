//! Application State
//!
//! Shared state across all handlers.

use std::sync::Arc;
use std::time::Duration;

use ticket_triage_analysis::AnalyzerFactory;
use ticket_triage_config::Settings;
use ticket_triage_core::{Result, TicketAnalyzer, TicketStore};
use ticket_triage_routing::{DecisionEngine, TicketLifecycle};

/// Application state
#[derive(Clone)]
pub struct AppState {
    /// Validated settings the process started with
    pub config: Arc<Settings>,
    pub lifecycle: Arc<TicketLifecycle>,
}

impl AppState {
    pub fn new(config: Settings, lifecycle: TicketLifecycle) -> Self {
        Self {
            config: Arc::new(config),
            lifecycle: Arc::new(lifecycle),
        }
    }

    /// Wire analyzer, decision engine and store from settings
    pub fn from_settings(config: Settings) -> Result<Self> {
        let analyzer = AnalyzerFactory::create(&config.analyzer, config.environment)?;
        let store: Arc<dyn TicketStore> = Arc::new(ticket_triage_persistence::init(&config.persistence)?);
        Ok(Self::with_components(config, analyzer, store))
    }

    /// Wire explicit analyzer and store, the rest from settings
    pub fn with_components(
        config: Settings,
        analyzer: Arc<dyn TicketAnalyzer>,
        store: Arc<dyn TicketStore>,
    ) -> Self {
        let engine = DecisionEngine::new(config.decision_engine);
        let lifecycle = TicketLifecycle::new(analyzer, engine, store)
            .with_analysis_timeout(Duration::from_millis(config.analyzer.timeout_ms));
        Self::new(config, lifecycle)
    }
}
