//! Ticket, input, routing decision and override types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use crate::classification::{Classification, TeamQueue};
use crate::error::{Error, Result};

/// Customer tier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CustomerType {
    Free,
    Paid,
    Enterprise,
}

impl CustomerType {
    pub const ALL: [CustomerType; 3] = [
        CustomerType::Free,
        CustomerType::Paid,
        CustomerType::Enterprise,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CustomerType::Free => "free",
            CustomerType::Paid => "paid",
            CustomerType::Enterprise => "enterprise",
        }
    }

    /// Phrase used in explanations
    pub fn description(&self) -> &'static str {
        match self {
            CustomerType::Free => "free tier customer",
            CustomerType::Paid => "paid customer",
            CustomerType::Enterprise => "enterprise customer",
        }
    }
}

impl fmt::Display for CustomerType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CustomerType {
    type Err = Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        CustomerType::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| {
                Error::validation("Invalid customerType. Must be: free, paid, or enterprise")
            })
    }
}

/// Optional context supplied with a ticket
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TicketMetadata {
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub tags: BTreeSet<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub previous_tickets: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer_id: Option<String>,
}

/// What the customer submitted. Never changes after creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TicketInput {
    pub title: String,
    pub description: String,
    pub customer_type: CustomerType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<TicketMetadata>,
}

impl TicketInput {
    pub fn new(
        title: impl Into<String>,
        description: impl Into<String>,
        customer_type: CustomerType,
    ) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            customer_type,
            metadata: None,
        }
    }

    pub fn with_metadata(mut self, metadata: TicketMetadata) -> Self {
        self.metadata = Some(metadata);
        self
    }

    /// Reject inputs the pipeline cannot work with
    pub fn validate(&self) -> Result<()> {
        let mut missing = Vec::new();
        if self.title.trim().is_empty() {
            missing.push("title");
        }
        if self.description.trim().is_empty() {
            missing.push("description");
        }
        if !missing.is_empty() {
            return Err(Error::validation(format!(
                "Missing required fields: {}",
                missing.join(", ")
            )));
        }
        Ok(())
    }

    /// Prior ticket count, if supplied
    pub fn previous_tickets(&self) -> Option<u32> {
        self.metadata.as_ref().and_then(|m| m.previous_tickets)
    }

    /// Tags, if supplied
    pub fn tags(&self) -> Vec<&str> {
        self.metadata
            .as_ref()
            .map(|m| m.tags.iter().map(String::as_str).collect())
            .unwrap_or_default()
    }
}

/// Ticket lifecycle state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TicketStatus {
    /// Created, analysis not finished
    PendingAnalysis,
    /// Waiting for a human
    PendingReview,
    /// Sitting in a team queue
    Routed,
    /// Received priority handling
    Escalated,
}

impl TicketStatus {
    pub const ALL: [TicketStatus; 4] = [
        TicketStatus::PendingAnalysis,
        TicketStatus::PendingReview,
        TicketStatus::Routed,
        TicketStatus::Escalated,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TicketStatus::PendingAnalysis => "pending_analysis",
            TicketStatus::PendingReview => "pending_review",
            TicketStatus::Routed => "routed",
            TicketStatus::Escalated => "escalated",
        }
    }

    /// Status implied by a routing decision
    pub fn for_decision(decision: &RoutingDecision) -> Self {
        match decision.decision_type {
            DecisionType::Escalated => TicketStatus::Escalated,
            _ if decision.requires_review => TicketStatus::PendingReview,
            _ => TicketStatus::Routed,
        }
    }
}

impl fmt::Display for TicketStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TicketStatus {
    type Err = Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        TicketStatus::ALL
            .into_iter()
            .find(|st| st.as_str() == s)
            .ok_or_else(|| Error::validation(format!("Invalid status: {}", s)))
    }
}

/// How a routing decision was reached
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DecisionType {
    Auto,
    Manual,
    Escalated,
}

impl DecisionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            DecisionType::Auto => "auto",
            DecisionType::Manual => "manual",
            DecisionType::Escalated => "escalated",
        }
    }
}

impl fmt::Display for DecisionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Verdict on which queue handles a ticket. Replaced wholesale, never merged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoutingDecision {
    pub target_queue: TeamQueue,
    pub decision_type: DecisionType,
    pub reason: String,
    pub confidence: f64,
    pub requires_review: bool,
    pub decided_at: DateTime<Utc>,
}

/// Human correction to a routing decision
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Override {
    pub previous_queue: TeamQueue,
    pub new_queue: TeamQueue,
    pub reason: String,
    pub overridden_by: String,
    pub timestamp: DateTime<Utc>,
}

/// A unit of customer-reported work
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ticket {
    pub id: String,
    pub input: TicketInput,
    pub status: TicketStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub classification: Option<Classification>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub routing_decision: Option<RoutingDecision>,
    /// Append-only
    #[serde(default)]
    pub override_history: Vec<Override>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Ticket {
    /// New ticket awaiting analysis, with a fresh id
    pub fn new(input: TicketInput) -> Self {
        let now = Utc::now();
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            input,
            status: TicketStatus::PendingAnalysis,
            classification: None,
            routing_decision: None,
            override_history: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Queue the ticket currently sits in, if decided
    pub fn current_queue(&self) -> Option<TeamQueue> {
        self.routing_decision.as_ref().map(|d| d.target_queue)
    }

    /// Store a decision and move to the status it implies
    pub fn apply_decision(&mut self, decision: RoutingDecision) {
        self.status = TicketStatus::for_decision(&decision);
        self.routing_decision = Some(decision);
    }

    /// Apply a human override. Returns the recorded entry.
    ///
    /// The new decision is manual, needs no further review, and carries
    /// the classification confidence (0 if the ticket was never classified).
    pub fn apply_override(
        &mut self,
        new_queue: TeamQueue,
        reason: &str,
        overridden_by: &str,
    ) -> Override {
        let now = Utc::now();
        let entry = Override {
            previous_queue: self.current_queue().unwrap_or(TeamQueue::ManualReview),
            new_queue,
            reason: reason.to_string(),
            overridden_by: overridden_by.to_string(),
            timestamp: now,
        };

        self.routing_decision = Some(RoutingDecision {
            target_queue: new_queue,
            decision_type: DecisionType::Manual,
            reason: format!("Manual override: {}", reason),
            confidence: self
                .classification
                .as_ref()
                .map(|c| c.confidence)
                .unwrap_or(0.0),
            requires_review: false,
            decided_at: now,
        });
        self.status = TicketStatus::Routed;
        self.override_history.push(entry.clone());
        entry
    }
}
