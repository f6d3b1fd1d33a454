//! Prompt building for ticket classification

use serde::{Deserialize, Serialize};
use std::fmt;

use ticket_triage_core::TicketInput;

/// Message role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::System => write!(f, "system"),
            Role::User => write!(f, "user"),
        }
    }
}

/// Chat message
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }
}

const SYSTEM_PROMPT: &str = "You are an expert support ticket classifier for a SaaS company.
Your job is to analyze tickets and provide structured classification.

Important guidelines:
- Be conservative with confidence scores - prefer lower confidence when uncertain
- Consider customer type in urgency assessment (enterprise customers need faster response)
- Outages and critical issues should always be flagged as high/critical urgency
- Provide clear, actionable reasoning factors
- You are ADVISORY only - humans will make final routing decisions
- When in doubt, suggest manual_review as the team

Return only valid JSON matching the requested structure.";

const OUTPUT_CONTRACT: &str = r#"Provide analysis in this exact JSON structure:
{
  "category": "billing|bug|feature_request|outage|other",
  "urgency": "low|medium|high|critical",
  "suggestedTeam": "billing|engineering|product|support|manual_review",
  "explanation": "Brief explanation of your classification",
  "confidence": 0.0-1.0,
  "reasoningFactors": ["factor1", "factor2", ...]
}

Guidelines:
- Choose ONE category that best fits
- Urgency should consider customer type (enterprise = higher priority)
- Confidence should reflect certainty (0.5 = uncertain, 0.9+ = very confident)
- Include 3-5 reasoning factors explaining your decision
- Be honest about uncertainty - low confidence is better than wrong high confidence"#;

/// Builds the system and user messages for one classification request
#[derive(Debug, Clone)]
pub struct PromptBuilder {
    system_prompt: String,
}

impl Default for PromptBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl PromptBuilder {
    pub fn new() -> Self {
        Self {
            system_prompt: SYSTEM_PROMPT.to_string(),
        }
    }

    /// User prompt describing the ticket
    pub fn user_prompt(&self, input: &TicketInput) -> String {
        let mut prompt = String::from(
            "Analyze this support ticket and provide structured output in JSON format.\n\n",
        );
        prompt.push_str("Ticket Details:\n");
        prompt.push_str(&format!("Title: {}\n", input.title));
        prompt.push_str(&format!("Description: {}\n", input.description));
        prompt.push_str(&format!("Customer Type: {}\n", input.customer_type));

        let tags = input.tags();
        if !tags.is_empty() {
            prompt.push_str(&format!("Tags: {}\n", tags.join(", ")));
        }
        if let Some(previous) = input.previous_tickets().filter(|n| *n > 0) {
            prompt.push_str(&format!("Previous Tickets: {}\n", previous));
        }

        prompt.push('\n');
        prompt.push_str(OUTPUT_CONTRACT);
        prompt
    }

    /// Full message list for the chat completion
    pub fn build(&self, input: &TicketInput) -> Vec<Message> {
        vec![
            Message::system(self.system_prompt.clone()),
            Message::user(self.user_prompt(input)),
        ]
    }
}
