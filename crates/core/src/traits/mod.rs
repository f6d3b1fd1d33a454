//! Core traits for the triage pipeline
//!
//! ```text
//! TicketAnalyzer: TicketInput → Classification (keyword heuristic, LLM, mocks)
//! TicketStore:    keyed ticket storage with per-ticket atomic updates
//! ```

mod analyzer;
mod store;

pub use analyzer::TicketAnalyzer;
pub use store::{StoreStats, TicketFilter, TicketMutation, TicketStore};
