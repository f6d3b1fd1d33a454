//! Ticket analyzers
//!
//! - [`KeywordAnalyzer`]: deterministic substring heuristic, no I/O
//! - [`AnalyzerFactory`]: picks the analyzer implementation from configuration

pub mod factory;
pub mod heuristic;

pub use factory::AnalyzerFactory;
pub use heuristic::KeywordAnalyzer;
