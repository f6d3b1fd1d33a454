//! Ticket store trait

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::classification::TeamQueue;
use crate::error::Result;
use crate::ticket::{CustomerType, Ticket, TicketStatus};

/// In-place change applied to a stored ticket under its entry lock
pub type TicketMutation = Box<dyn FnOnce(&mut Ticket) + Send>;

/// Conjunctive ticket filter; `None` fields match everything
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TicketFilter {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<TicketStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub queue: Option<TeamQueue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_type: Option<CustomerType>,
}

impl TicketFilter {
    pub fn is_empty(&self) -> bool {
        self.status.is_none() && self.queue.is_none() && self.customer_type.is_none()
    }

    pub fn matches(&self, ticket: &Ticket) -> bool {
        if let Some(status) = self.status {
            if ticket.status != status {
                return false;
            }
        }
        if let Some(queue) = self.queue {
            if ticket.current_queue() != Some(queue) {
                return false;
            }
        }
        if let Some(customer_type) = self.customer_type {
            if ticket.input.customer_type != customer_type {
                return false;
            }
        }
        true
    }
}

/// Aggregate counts over the stored tickets
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreStats {
    pub total: usize,
    /// Keyed by status identifier; absent statuses are omitted
    pub by_status: BTreeMap<String, usize>,
    /// Keyed by queue identifier; undecided tickets are not counted
    pub by_queue: BTreeMap<String, usize>,
}

impl StoreStats {
    /// Compute stats from a set of tickets
    pub fn from_tickets<'a>(tickets: impl IntoIterator<Item = &'a Ticket>) -> Self {
        let mut stats = StoreStats::default();
        for ticket in tickets {
            stats.total += 1;
            *stats
                .by_status
                .entry(ticket.status.as_str().to_string())
                .or_default() += 1;
            if let Some(queue) = ticket.current_queue() {
                *stats.by_queue.entry(queue.as_str().to_string()).or_default() += 1;
            }
        }
        stats
    }
}

/// Keyed ticket storage
///
/// Writes to a single ticket are serialized: `update` applies its mutation
/// while holding that ticket's lock, so two concurrent updates never
/// interleave and neither is lost.
#[async_trait]
pub trait TicketStore: Send + Sync {
    /// Insert or replace a ticket, bumping `updated_at`
    async fn save(&self, ticket: Ticket) -> Result<Ticket>;

    /// Snapshot of a ticket, if present
    async fn get_by_id(&self, id: &str) -> Result<Option<Ticket>>;

    /// Atomically mutate a ticket, bumping `updated_at`
    ///
    /// Returns `None` if no ticket has this id.
    async fn update(&self, id: &str, mutation: TicketMutation) -> Result<Option<Ticket>>;

    /// Tickets matching the filter, newest first
    async fn list_all(&self, filter: &TicketFilter) -> Result<Vec<Ticket>>;

    /// Tickets whose current decision targets the queue
    async fn list_by_queue(&self, queue: TeamQueue) -> Result<Vec<Ticket>>;

    /// Aggregate counts
    async fn stats(&self) -> Result<StoreStats>;

    /// Whether writes survive a restart
    fn is_persistent(&self) -> bool;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ticket::TicketInput;

    fn ticket(customer_type: CustomerType) -> Ticket {
        Ticket::new(TicketInput::new("title", "description", customer_type))
    }

    #[test]
    fn test_filter_matches() {
        let mut routed = ticket(CustomerType::Paid);
        routed.apply_override(TeamQueue::Billing, "billing question", "agent");
        let pending = ticket(CustomerType::Free);

        let by_queue = TicketFilter {
            queue: Some(TeamQueue::Billing),
            ..Default::default()
        };
        assert!(by_queue.matches(&routed));
        assert!(!by_queue.matches(&pending));

        let combined = TicketFilter {
            status: Some(TicketStatus::Routed),
            customer_type: Some(CustomerType::Free),
            ..Default::default()
        };
        assert!(!combined.matches(&routed));
        assert!(TicketFilter::default().matches(&pending));
        assert!(TicketFilter::default().is_empty());
    }

    #[test]
    fn test_stats_from_tickets() {
        let mut routed = ticket(CustomerType::Paid);
        routed.apply_override(TeamQueue::Support, "general", "agent");
        let pending = ticket(CustomerType::Free);

        let stats = StoreStats::from_tickets([&routed, &pending]);
        assert_eq!(stats.total, 2);
        assert_eq!(stats.by_status.get("routed"), Some(&1));
        assert_eq!(stats.by_status.get("pending_analysis"), Some(&1));
        assert_eq!(stats.by_queue.get("support"), Some(&1));
        assert_eq!(stats.by_queue.len(), 1);
    }
}
