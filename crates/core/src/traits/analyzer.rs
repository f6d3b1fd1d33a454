//! Ticket analyzer trait

use async_trait::async_trait;

use crate::classification::Classification;
use crate::error::AnalysisError;
use crate::ticket::TicketInput;

/// Classifies a ticket into category, urgency and suggested team
///
/// Implementations must keep every enum within its value set and the
/// confidence within [0, 1], whatever the underlying mechanism returns.
///
/// # Example
///
/// ```ignore
/// let analyzer: Arc<dyn TicketAnalyzer> = AnalyzerFactory::create(&config)?;
/// let classification = analyzer.analyze(&input).await?;
/// println!("{} ({:.2})", classification.category, classification.confidence);
/// ```
#[async_trait]
pub trait TicketAnalyzer: Send + Sync {
    /// Produce a classification for the given input
    async fn analyze(&self, input: &TicketInput) -> Result<Classification, AnalysisError>;

    /// Report liveness without side effects
    async fn health_check(&self) -> bool;

    /// Analyzer name, used in logs and the startup banner
    fn name(&self) -> &str;
}
