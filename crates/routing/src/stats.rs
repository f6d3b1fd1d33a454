//! Per-queue statistics

use serde::{Deserialize, Serialize};

use ticket_triage_core::{DecisionType, TeamQueue, Ticket};

/// Aggregates over the tickets currently targeting one queue
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueueStats {
    pub queue_name: TeamQueue,
    pub ticket_count: usize,
    /// Mean classification confidence, rounded to 2 decimals; unclassified tickets count as 0
    pub avg_confidence: f64,
    pub auto_routed_count: usize,
    pub manual_routed_count: usize,
}

impl QueueStats {
    pub fn from_tickets(queue: TeamQueue, tickets: &[Ticket]) -> Self {
        let count_type = |kind: DecisionType| {
            tickets
                .iter()
                .filter(|t| {
                    t.routing_decision
                        .as_ref()
                        .is_some_and(|d| d.decision_type == kind)
                })
                .count()
        };

        let avg_confidence = if tickets.is_empty() {
            0.0
        } else {
            let total: f64 = tickets
                .iter()
                .map(|t| t.classification.as_ref().map_or(0.0, |c| c.confidence))
                .sum();
            round_2dp(total / tickets.len() as f64)
        };

        Self {
            queue_name: queue,
            ticket_count: tickets.len(),
            avg_confidence,
            auto_routed_count: count_type(DecisionType::Auto),
            manual_routed_count: count_type(DecisionType::Manual),
        }
    }
}

fn round_2dp(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use ticket_triage_core::{
        Category, Classification, CustomerType, RoutingDecision, TicketInput, Urgency,
    };

    fn ticket(confidence: Option<f64>, decision_type: DecisionType) -> Ticket {
        let mut ticket = Ticket::new(TicketInput::new("t", "d", CustomerType::Paid));
        ticket.classification = confidence.map(|c| {
            Classification::new(Category::Billing, Urgency::Low, TeamQueue::Billing, "", c, vec![])
        });
        ticket.apply_decision(RoutingDecision {
            target_queue: TeamQueue::Billing,
            decision_type,
            reason: String::new(),
            confidence: confidence.unwrap_or(0.0),
            requires_review: false,
            decided_at: Utc::now(),
        });
        ticket
    }

    #[test]
    fn test_empty_queue() {
        let stats = QueueStats::from_tickets(TeamQueue::Product, &[]);
        assert_eq!(stats.ticket_count, 0);
        assert_eq!(stats.avg_confidence, 0.0);
    }

    #[test]
    fn test_counts_and_average() {
        let tickets = vec![
            ticket(Some(0.9), DecisionType::Auto),
            ticket(Some(0.657), DecisionType::Manual),
            ticket(None, DecisionType::Manual),
            ticket(Some(0.8), DecisionType::Escalated),
        ];
        let stats = QueueStats::from_tickets(TeamQueue::Billing, &tickets);
        assert_eq!(stats.ticket_count, 4);
        assert_eq!(stats.auto_routed_count, 1);
        assert_eq!(stats.manual_routed_count, 2);
        // (0.9 + 0.657 + 0 + 0.8) / 4 = 0.58925
        assert_eq!(stats.avg_confidence, 0.59);

        let json = serde_json::to_value(&stats).unwrap();
        assert_eq!(json["queueName"], "billing");
        assert_eq!(json["autoRoutedCount"], 1);
    }
}
