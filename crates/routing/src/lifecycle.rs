//! Ticket lifecycle
//!
//! ```text
//! create ──► pending_analysis ──analysis ok──► escalated | pending_review | routed
//!                    │
//!                    └──analysis failed / timed out──► pending_review (manual_review)
//!
//! override: any ticket ──► routed (decision_type = manual); an override made
//!           while analysis runs is kept over the pipeline decision
//! ```

use chrono::Utc;
use std::sync::Arc;
use std::time::Duration;

use ticket_triage_core::{
    AnalysisError, Classification, DecisionType, Error, Result, RoutingDecision, StoreStats,
    TeamQueue, Ticket, TicketAnalyzer, TicketFilter, TicketInput, TicketStore,
};

use crate::engine::DecisionEngine;
use crate::stats::QueueStats;

/// Default bound on a single analysis
pub const DEFAULT_ANALYSIS_TIMEOUT: Duration = Duration::from_secs(10);

/// Orchestrates analyzer, decision engine and store for each ticket
pub struct TicketLifecycle {
    analyzer: Arc<dyn TicketAnalyzer>,
    engine: DecisionEngine,
    store: Arc<dyn TicketStore>,
    analysis_timeout: Duration,
}

impl TicketLifecycle {
    pub fn new(
        analyzer: Arc<dyn TicketAnalyzer>,
        engine: DecisionEngine,
        store: Arc<dyn TicketStore>,
    ) -> Self {
        Self {
            analyzer,
            engine,
            store,
            analysis_timeout: DEFAULT_ANALYSIS_TIMEOUT,
        }
    }

    pub fn with_analysis_timeout(mut self, timeout: Duration) -> Self {
        self.analysis_timeout = timeout;
        self
    }

    pub fn engine(&self) -> &DecisionEngine {
        &self.engine
    }

    pub fn analyzer_name(&self) -> &str {
        self.analyzer.name()
    }

    pub async fn analyzer_healthy(&self) -> bool {
        self.analyzer.health_check().await
    }

    pub fn store_is_persistent(&self) -> bool {
        self.store.is_persistent()
    }

    /// Create a ticket and run it through analysis and routing
    ///
    /// Only invalid input or a failure to store the new ticket is an error.
    /// Analyzer failures send the ticket to manual review instead.
    pub async fn create(&self, input: TicketInput) -> Result<Ticket> {
        input.validate()?;

        let ticket = self.store.save(Ticket::new(input)).await?;
        tracing::info!(ticket_id = %ticket.id, customer_type = %ticket.input.customer_type, "Ticket created");

        let ticket = match self.analyze(&ticket.input).await {
            Ok(classification) => self.route(ticket, classification).await,
            Err(err) => self.fail(ticket, &err).await,
        };

        Ok(ticket)
    }

    async fn analyze(&self, input: &TicketInput) -> std::result::Result<Classification, AnalysisError> {
        match tokio::time::timeout(self.analysis_timeout, self.analyzer.analyze(input)).await {
            Ok(result) => result,
            Err(_) => Err(AnalysisError::Timeout(self.analysis_timeout)),
        }
    }

    async fn route(&self, ticket: Ticket, classification: Classification) -> Ticket {
        let (rule, decision) = self.engine.decide_with_rule(&classification, &ticket.input);

        tracing::info!(
            ticket_id = %ticket.id,
            rule,
            decision = %decision.decision_type,
            queue = %decision.target_queue,
            confidence = decision.confidence,
            "Routing decision made"
        );

        self.settle(ticket, Some(classification), decision).await
    }

    async fn fail(&self, ticket: Ticket, err: &AnalysisError) -> Ticket {
        tracing::warn!(ticket_id = %ticket.id, error = %err, "Ticket analysis failed, sending to manual review");

        let decision = RoutingDecision {
            target_queue: TeamQueue::ManualReview,
            decision_type: DecisionType::Manual,
            reason: format!("Processing failed: {}. Requires manual review.", err),
            confidence: 0.0,
            requires_review: true,
            decided_at: Utc::now(),
        };
        self.settle(ticket, None, decision).await
    }

    /// Write the pipeline outcome onto the stored ticket
    ///
    /// A ticket overridden while analysis ran keeps the human decision and
    /// only gains the classification. A store failure here is logged and the
    /// local copy returned.
    async fn settle(
        &self,
        mut ticket: Ticket,
        classification: Option<Classification>,
        decision: RoutingDecision,
    ) -> Ticket {
        let stored_classification = classification.clone();
        let stored_decision = decision.clone();
        let result = self
            .store
            .update(
                &ticket.id,
                Box::new(move |stored: &mut Ticket| {
                    if stored.classification.is_none() {
                        stored.classification = stored_classification;
                    }
                    if stored.override_history.is_empty() {
                        stored.apply_decision(stored_decision);
                    }
                }),
            )
            .await;

        match result {
            Ok(Some(stored)) => {
                if !stored.override_history.is_empty() {
                    tracing::info!(
                        ticket_id = %stored.id,
                        queue = ?stored.current_queue(),
                        "Ticket overridden during analysis, keeping manual routing"
                    );
                }
                stored
            }
            Ok(None) => {
                tracing::warn!(ticket_id = %ticket.id, "Ticket missing from store after analysis");
                ticket.classification = classification;
                ticket.apply_decision(decision);
                ticket
            }
            Err(err) => {
                tracing::error!(ticket_id = %ticket.id, error = %err, "Failed to persist ticket");
                ticket.classification = classification;
                ticket.apply_decision(decision);
                ticket
            }
        }
    }

    /// Replace a ticket's routing with a human decision
    pub async fn override_routing(
        &self,
        id: &str,
        new_queue: TeamQueue,
        reason: &str,
        overridden_by: &str,
    ) -> Result<Ticket> {
        let mut missing = Vec::new();
        if reason.trim().is_empty() {
            missing.push("reason");
        }
        if overridden_by.trim().is_empty() {
            missing.push("overriddenBy");
        }
        if !missing.is_empty() {
            return Err(Error::validation(format!(
                "Missing required fields: {}",
                missing.join(", ")
            )));
        }

        let reason_owned = reason.to_string();
        let actor = overridden_by.to_string();
        let updated = self
            .store
            .update(
                id,
                Box::new(move |ticket: &mut Ticket| {
                    ticket.apply_override(new_queue, &reason_owned, &actor);
                }),
            )
            .await?
            .ok_or_else(|| Error::NotFound(id.to_string()))?;

        tracing::info!(
            ticket_id = %id,
            queue = %new_queue,
            overridden_by,
            overrides = updated.override_history.len(),
            "Routing overridden"
        );

        Ok(updated)
    }

    pub async fn get(&self, id: &str) -> Result<Ticket> {
        self.store
            .get_by_id(id)
            .await?
            .ok_or_else(|| Error::NotFound(id.to_string()))
    }

    pub async fn list(&self, filter: &TicketFilter) -> Result<Vec<Ticket>> {
        self.store.list_all(filter).await
    }

    pub async fn list_by_queue(&self, queue: TeamQueue) -> Result<Vec<Ticket>> {
        self.store.list_by_queue(queue).await
    }

    pub async fn stats(&self) -> Result<StoreStats> {
        self.store.stats().await
    }

    /// Statistics for every queue, in fixed order
    pub async fn queue_stats(&self) -> Result<Vec<QueueStats>> {
        let mut stats = Vec::with_capacity(TeamQueue::ALL.len());
        for queue in TeamQueue::ALL {
            let tickets = self.store.list_by_queue(queue).await?;
            stats.push(QueueStats::from_tickets(queue, &tickets));
        }
        Ok(stats)
    }
}
