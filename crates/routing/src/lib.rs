//! Routing policy and ticket lifecycle
//!
//! - [`DecisionEngine`]: ordered rule chain turning a classification into a routing decision
//! - [`TicketLifecycle`]: runs analyzer and engine per ticket, applies overrides
//! - [`QueueStats`]: per-queue aggregates for dashboards

pub mod engine;
pub mod lifecycle;
pub mod stats;

pub use engine::{DecisionEngine, DecisionRule, RuleContext};
pub use lifecycle::TicketLifecycle;
pub use stats::QueueStats;
