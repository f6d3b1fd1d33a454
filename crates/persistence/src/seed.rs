//! Demonstration tickets
//!
//! One ticket per interesting end state, so a fresh deployment has
//! something to show in every view.

use chrono::{Duration, Utc};

use ticket_triage_core::{
    Category, Classification, CustomerType, DecisionType, RoutingDecision, TeamQueue, Ticket,
    TicketInput, TicketMetadata, Urgency,
};

struct SeedTicket {
    id: &'static str,
    title: &'static str,
    description: &'static str,
    customer_type: CustomerType,
    previous_tickets: Option<u32>,
    category: Category,
    urgency: Urgency,
    team: TeamQueue,
    explanation: &'static str,
    confidence: f64,
    indicators: &'static [&'static str],
    queue: TeamQueue,
    decision_type: DecisionType,
    reason: &'static str,
    hours_ago: i64,
}

static SEEDS: [SeedTicket; 5] = [
    SeedTicket {
        id: "seed-1",
        title: "Cannot process payment for premium upgrade",
        description: "My credit card keeps getting declined when I try to upgrade to the premium plan. \
                      The card works fine on other websites. I need access to premium features for my project deadline.",
        customer_type: CustomerType::Paid,
        previous_tickets: Some(1),
        category: Category::Billing,
        urgency: Urgency::High,
        team: TeamQueue::Billing,
        explanation: "Classified as billing with high urgency for paid customer.",
        confidence: 0.92,
        indicators: &["payment", "credit card", "upgrade"],
        queue: TeamQueue::Billing,
        decision_type: DecisionType::Auto,
        reason: "Auto-routed with high confidence (0.92): Classified as billing with high urgency for paid customer.",
        hours_ago: 1,
    },
    SeedTicket {
        id: "seed-2",
        title: "Production system showing 500 errors",
        description: "URGENT: Our production application started showing 500 errors about 10 minutes ago. \
                      All users are affected and cannot access the system. This is impacting our business operations.",
        customer_type: CustomerType::Enterprise,
        previous_tickets: Some(5),
        category: Category::Outage,
        urgency: Urgency::Critical,
        team: TeamQueue::Engineering,
        explanation: "Classified as outage with critical urgency for enterprise customer.",
        confidence: 0.95,
        indicators: &["500 errors", "production", "urgent"],
        queue: TeamQueue::Engineering,
        decision_type: DecisionType::Escalated,
        reason: "Escalated due to critical urgency (critical) - requires immediate attention",
        hours_ago: 2,
    },
    SeedTicket {
        id: "seed-3",
        title: "Request to add dark mode feature",
        description: "I would like to suggest adding a dark mode option to the application. \
                      Many users work late at night and would benefit from a dark theme. This would improve user experience significantly.",
        customer_type: CustomerType::Paid,
        previous_tickets: Some(0),
        category: Category::FeatureRequest,
        urgency: Urgency::Low,
        team: TeamQueue::Product,
        explanation: "Classified as feature request with low urgency for paid customer.",
        confidence: 0.88,
        indicators: &["suggest", "adding", "feature"],
        queue: TeamQueue::Product,
        decision_type: DecisionType::Auto,
        reason: "Auto-routed with high confidence (0.88): Classified as feature request with low urgency for paid customer.",
        hours_ago: 3,
    },
    SeedTicket {
        id: "seed-4",
        title: "Help needed",
        description: "Having some issues",
        customer_type: CustomerType::Free,
        previous_tickets: None,
        category: Category::Other,
        urgency: Urgency::Low,
        team: TeamQueue::Support,
        explanation: "Lower confidence - ticket description is ambiguous or lacks clear indicators.",
        confidence: 0.35,
        indicators: &[],
        queue: TeamQueue::ManualReview,
        decision_type: DecisionType::Manual,
        reason: "Ticket appears ambiguous or contains conflicting signals",
        hours_ago: 4,
    },
    SeedTicket {
        id: "seed-5",
        title: "Search functionality not working correctly",
        description: "When I search for products, the results are not accurate. \
                      For example, searching for \"laptop\" returns phone accessories. This has been happening since the last update.",
        customer_type: CustomerType::Paid,
        previous_tickets: Some(2),
        category: Category::Bug,
        urgency: Urgency::Medium,
        team: TeamQueue::Engineering,
        explanation: "Classified as bug with medium urgency for paid customer.",
        confidence: 0.86,
        indicators: &["not working", "issue"],
        queue: TeamQueue::Engineering,
        decision_type: DecisionType::Auto,
        reason: "Auto-routed with high confidence (0.86): Classified as bug with medium urgency for paid customer.",
        hours_ago: 5,
    },
];

impl SeedTicket {
    fn build(&self) -> Ticket {
        let created_at = Utc::now() - Duration::hours(self.hours_ago);

        let mut input = TicketInput::new(self.title, self.description, self.customer_type);
        if self.previous_tickets.is_some() {
            input = input.with_metadata(TicketMetadata {
                previous_tickets: self.previous_tickets,
                ..Default::default()
            });
        }

        let mut factors = vec![
            format!("Customer type: {}", self.customer_type),
            format!("Category classification: {}", self.category),
        ];
        if self.urgency == Urgency::Critical {
            factors.push(format!("Urgency level: {}", self.urgency));
        }
        if !self.indicators.is_empty() {
            factors.push(format!("Key indicators: {}", self.indicators.join(", ")));
        }
        factors.push(format!(
            "Description length: {} words",
            self.description.split_whitespace().count()
        ));

        let mut classification = Classification::new(
            self.category,
            self.urgency,
            self.team,
            self.explanation,
            self.confidence,
            factors,
        );
        classification.produced_at = created_at;

        let decision = RoutingDecision {
            target_queue: self.queue,
            decision_type: self.decision_type,
            reason: self.reason.to_string(),
            confidence: self.confidence,
            requires_review: self.decision_type == DecisionType::Manual,
            decided_at: created_at,
        };

        let mut ticket = Ticket::new(input);
        ticket.id = self.id.to_string();
        ticket.classification = Some(classification);
        ticket.apply_decision(decision);
        ticket.created_at = created_at;
        ticket.updated_at = created_at;
        ticket
    }
}

/// Fresh copies of the demonstration tickets, newest first
pub fn seed_tickets() -> Vec<Ticket> {
    SEEDS.iter().map(SeedTicket::build).collect()
}

/// Ids of the demonstration tickets
pub fn seed_ids() -> impl Iterator<Item = &'static str> {
    SEEDS.iter().map(|s| s.id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ticket_triage_core::TicketStatus;

    #[test]
    fn test_seed_end_states() {
        let tickets = seed_tickets();
        assert_eq!(tickets.len(), 5);

        let statuses: Vec<_> = tickets.iter().map(|t| t.status).collect();
        assert_eq!(
            statuses,
            vec![
                TicketStatus::Routed,
                TicketStatus::Escalated,
                TicketStatus::Routed,
                TicketStatus::PendingReview,
                TicketStatus::Routed,
            ]
        );

        let review = &tickets[3];
        assert_eq!(review.id, "seed-4");
        assert_eq!(review.current_queue(), Some(TeamQueue::ManualReview));
        assert!(review.input.metadata.is_none());
        assert!(review.routing_decision.as_ref().unwrap().requires_review);
    }

    #[test]
    fn test_seed_ids_and_ordering() {
        let tickets = seed_tickets();
        let ids: Vec<_> = seed_ids().collect();
        assert_eq!(ids, tickets.iter().map(|t| t.id.as_str()).collect::<Vec<_>>());
        assert!(tickets.windows(2).all(|w| w[0].created_at > w[1].created_at));
        assert!(tickets.iter().all(|t| t.override_history.is_empty()));
    }
}
