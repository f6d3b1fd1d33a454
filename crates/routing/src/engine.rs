//! Decision engine
//!
//! A classification plus the ticket input goes in, a routing decision comes
//! out. Rules are evaluated in priority order and the first match wins; the
//! last rule always matches, so the engine is total.

use chrono::Utc;

use ticket_triage_config::DecisionEngineConfig;
use ticket_triage_core::{
    Category, Classification, CustomerType, DecisionType, RoutingDecision, TeamQueue,
    TicketInput, Urgency,
};

/// Confidence above which a critical ticket escalates regardless of tier
const CRITICAL_ESCALATION_CONFIDENCE: f64 = 0.75;
/// Descriptions shorter than this (in UTF-16 code units) count as ambiguous
const MIN_DESCRIPTION_UNITS: usize = 50;

/// Everything a rule may look at
#[derive(Debug, Clone, Copy)]
pub struct RuleContext<'a> {
    pub classification: &'a Classification,
    pub input: &'a TicketInput,
    pub config: &'a DecisionEngineConfig,
}

/// One entry of the rule chain
#[derive(Clone, Copy)]
pub struct DecisionRule {
    pub name: &'static str,
    pub matches: fn(&RuleContext<'_>) -> bool,
    pub decide: fn(&RuleContext<'_>) -> RoutingDecision,
}

impl std::fmt::Debug for DecisionRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DecisionRule").field("name", &self.name).finish()
    }
}

fn should_escalate(ctx: &RuleContext<'_>) -> bool {
    let c = ctx.classification;
    (c.urgency == Urgency::Critical && ctx.input.customer_type == CustomerType::Enterprise)
        || c.category == Category::Outage
        || (c.urgency == Urgency::Critical && c.confidence > CRITICAL_ESCALATION_CONFIDENCE)
}

fn is_low_confidence(ctx: &RuleContext<'_>) -> bool {
    ctx.classification.confidence < ctx.config.low_confidence_threshold
}

fn is_ambiguous(ctx: &RuleContext<'_>) -> bool {
    let c = ctx.classification;
    ctx.input.description.encode_utf16().count() < MIN_DESCRIPTION_UNITS
        || c.category == Category::Other
        || c.suggested_team == TeamQueue::ManualReview
        || (c.urgency == Urgency::Low && matches!(c.category, Category::Outage | Category::Bug))
}

fn can_auto_route(ctx: &RuleContext<'_>) -> bool {
    ctx.config.enable_auto_routing
        && ctx.classification.confidence >= ctx.config.high_confidence_threshold
}

fn always(_: &RuleContext<'_>) -> bool {
    true
}

fn escalation(ctx: &RuleContext<'_>) -> RoutingDecision {
    let c = ctx.classification;
    decision(
        c.suggested_team,
        DecisionType::Escalated,
        format!(
            "Escalated due to critical urgency ({}) - requires immediate attention",
            c.urgency
        ),
        c.confidence,
    )
}

fn low_confidence_review(ctx: &RuleContext<'_>) -> RoutingDecision {
    let c = ctx.classification;
    manual_review(
        c,
        format!(
            "AI confidence ({:.2}) below threshold ({})",
            c.confidence, ctx.config.low_confidence_threshold
        ),
    )
}

fn ambiguous_review(ctx: &RuleContext<'_>) -> RoutingDecision {
    manual_review(
        ctx.classification,
        "Ticket appears ambiguous or contains conflicting signals".to_string(),
    )
}

fn auto_route(ctx: &RuleContext<'_>) -> RoutingDecision {
    let c = ctx.classification;
    decision(
        c.suggested_team,
        DecisionType::Auto,
        format!(
            "Auto-routed with high confidence ({:.2}): {}",
            c.confidence, c.explanation
        ),
        c.confidence,
    )
}

fn medium_confidence_review(ctx: &RuleContext<'_>) -> RoutingDecision {
    let c = ctx.classification;
    manual_review(
        c,
        format!(
            "AI confidence ({:.2}) in medium range - manual review recommended",
            c.confidence
        ),
    )
}

fn manual_review(c: &Classification, reason: String) -> RoutingDecision {
    decision(TeamQueue::ManualReview, DecisionType::Manual, reason, c.confidence)
}

/// `requires_review` follows from the decision type: only manual decisions need review
fn decision(
    target_queue: TeamQueue,
    decision_type: DecisionType,
    reason: String,
    confidence: f64,
) -> RoutingDecision {
    RoutingDecision {
        target_queue,
        decision_type,
        reason,
        confidence,
        requires_review: decision_type == DecisionType::Manual,
        decided_at: Utc::now(),
    }
}

/// Rule chain in priority order
static RULES: [DecisionRule; 5] = [
    DecisionRule {
        name: "escalate",
        matches: should_escalate,
        decide: escalation,
    },
    DecisionRule {
        name: "low_confidence",
        matches: is_low_confidence,
        decide: low_confidence_review,
    },
    DecisionRule {
        name: "ambiguous",
        matches: is_ambiguous,
        decide: ambiguous_review,
    },
    DecisionRule {
        name: "auto_route",
        matches: can_auto_route,
        decide: auto_route,
    },
    DecisionRule {
        name: "medium_confidence",
        matches: always,
        decide: medium_confidence_review,
    },
];

/// Deterministic routing policy
#[derive(Debug, Clone)]
pub struct DecisionEngine {
    config: DecisionEngineConfig,
}

impl Default for DecisionEngine {
    fn default() -> Self {
        Self::new(DecisionEngineConfig::default())
    }
}

impl DecisionEngine {
    /// Thresholds are expected to be validated already
    pub fn new(config: DecisionEngineConfig) -> Self {
        Self { config }
    }

    /// Copy of the active configuration
    pub fn config(&self) -> DecisionEngineConfig {
        self.config
    }

    /// Rule chain in evaluation order
    pub fn rules(&self) -> &'static [DecisionRule] {
        &RULES
    }

    /// Decide where a classified ticket goes
    pub fn decide(&self, classification: &Classification, input: &TicketInput) -> RoutingDecision {
        self.decide_with_rule(classification, input).1
    }

    /// Same as [`decide`](Self::decide), also naming the rule that fired
    pub fn decide_with_rule(
        &self,
        classification: &Classification,
        input: &TicketInput,
    ) -> (&'static str, RoutingDecision) {
        let ctx = RuleContext {
            classification,
            input,
            config: &self.config,
        };

        // The last rule always matches
        let rule = RULES
            .iter()
            .find(|rule| (rule.matches)(&ctx))
            .unwrap_or(&RULES[RULES.len() - 1]);

        (rule.name, (rule.decide)(&ctx))
    }

    /// Human-readable summary of the policy and its thresholds
    pub fn explain_rules(&self) -> String {
        format!(
            "Decision Engine Rules:\n\
             1. Critical urgency OR outages → Immediate escalation\n\
             2. AI confidence < {low} → Manual review\n\
             3. Ambiguous tickets (short description, \"other\" category) → Manual review\n\
             4. High confidence (≥ {high}) + clear category → Auto-route\n\
             5. Medium confidence → Manual review (safety first)\n\
             \n\
             Auto-routing is {state}\n\
             \n\
             Philosophy: Prefer correctness over automation. When in doubt, ask a human.",
            low = self.config.low_confidence_threshold,
            high = self.config.high_confidence_threshold,
            state = if self.config.enable_auto_routing {
                "ENABLED"
            } else {
                "DISABLED"
            },
        )
    }
}
