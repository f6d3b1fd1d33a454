//! Analyzer output types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::Error;

/// Ticket category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Billing,
    Bug,
    FeatureRequest,
    Outage,
    Other,
}

impl Category {
    pub const ALL: [Category; 5] = [
        Category::Billing,
        Category::Bug,
        Category::FeatureRequest,
        Category::Outage,
        Category::Other,
    ];

    /// Wire identifier
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Billing => "billing",
            Category::Bug => "bug",
            Category::FeatureRequest => "feature_request",
            Category::Outage => "outage",
            Category::Other => "other",
        }
    }

    /// Human-readable name ("feature request")
    pub fn display_name(&self) -> String {
        self.as_str().replace('_', " ")
    }

    /// Team that normally owns this category
    pub fn default_team(&self) -> TeamQueue {
        match self {
            Category::Billing => TeamQueue::Billing,
            Category::Bug | Category::Outage => TeamQueue::Engineering,
            Category::FeatureRequest => TeamQueue::Product,
            Category::Other => TeamQueue::Support,
        }
    }

    /// Parse an untrusted value, falling back to `Other`
    pub fn normalize(value: &str) -> Self {
        value.parse().unwrap_or(Category::Other)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| Error::validation(format!("Invalid category: {}", s)))
    }
}

/// Urgency level, ordered from least to most urgent
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Urgency {
    Low,
    Medium,
    High,
    Critical,
}

impl Urgency {
    pub const ALL: [Urgency; 4] = [
        Urgency::Low,
        Urgency::Medium,
        Urgency::High,
        Urgency::Critical,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Urgency::Low => "low",
            Urgency::Medium => "medium",
            Urgency::High => "high",
            Urgency::Critical => "critical",
        }
    }

    /// Parse an untrusted value, falling back to `Medium`
    pub fn normalize(value: &str) -> Self {
        value.parse().unwrap_or(Urgency::Medium)
    }
}

impl fmt::Display for Urgency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Urgency {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Urgency::ALL
            .into_iter()
            .find(|u| u.as_str() == s)
            .ok_or_else(|| Error::validation(format!("Invalid urgency: {}", s)))
    }
}

/// Destination queue for a ticket
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TeamQueue {
    Billing,
    Engineering,
    Product,
    Support,
    ManualReview,
}

impl TeamQueue {
    /// All queues, in reporting order
    pub const ALL: [TeamQueue; 5] = [
        TeamQueue::Billing,
        TeamQueue::Engineering,
        TeamQueue::Product,
        TeamQueue::Support,
        TeamQueue::ManualReview,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TeamQueue::Billing => "billing",
            TeamQueue::Engineering => "engineering",
            TeamQueue::Product => "product",
            TeamQueue::Support => "support",
            TeamQueue::ManualReview => "manual_review",
        }
    }

    /// Parse an untrusted value, falling back to `ManualReview`
    pub fn normalize(value: &str) -> Self {
        value.parse().unwrap_or(TeamQueue::ManualReview)
    }

    /// Comma-separated list of valid identifiers, for error messages
    pub fn valid_values() -> String {
        TeamQueue::ALL
            .iter()
            .map(|q| q.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl fmt::Display for TeamQueue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TeamQueue {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TeamQueue::ALL
            .into_iter()
            .find(|q| q.as_str() == s)
            .ok_or_else(|| {
                Error::validation(format!(
                    "Invalid queue. Must be one of: {}",
                    TeamQueue::valid_values()
                ))
            })
    }
}

/// Structured judgment produced by an analyzer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Classification {
    pub category: Category,
    pub urgency: Urgency,
    pub suggested_team: TeamQueue,
    pub explanation: String,
    /// Always within [0, 1]
    pub confidence: f64,
    pub reasoning_factors: Vec<String>,
    pub produced_at: DateTime<Utc>,
}

impl Classification {
    /// Build a classification, clamping confidence into [0, 1]
    pub fn new(
        category: Category,
        urgency: Urgency,
        suggested_team: TeamQueue,
        explanation: impl Into<String>,
        confidence: f64,
        reasoning_factors: Vec<String>,
    ) -> Self {
        Self {
            category,
            urgency,
            suggested_team,
            explanation: explanation.into(),
            confidence: clamp_unit(confidence),
            reasoning_factors,
            produced_at: Utc::now(),
        }
    }
}

/// Clamp into [0, 1]; NaN maps to 0
pub fn clamp_unit(value: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 1.0)
    }
}
