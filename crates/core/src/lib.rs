//! Core types and traits for support ticket triage
//!
//! This crate provides the foundational types used across all other crates:
//! - Ticket data model (input, classification, routing decision, overrides)
//! - Core traits for pluggable analyzers and ticket stores
//! - Error types

pub mod classification;
pub mod error;
pub mod ticket;
pub mod traits;

pub use classification::{clamp_unit, Category, Classification, TeamQueue, Urgency};
pub use error::{AnalysisError, Error, Result};
pub use ticket::{
    CustomerType, DecisionType, Override, RoutingDecision, Ticket, TicketInput, TicketMetadata,
    TicketStatus,
};
pub use traits::{StoreStats, TicketAnalyzer, TicketFilter, TicketMutation, TicketStore};
