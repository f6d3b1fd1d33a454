//! Decision engine thresholds

use serde::{Deserialize, Serialize};

use crate::ConfigError;

/// Decision engine configuration
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DecisionEngineConfig {
    /// Confidence at or above which a ticket may be auto-routed
    #[serde(default = "default_high_threshold")]
    pub high_confidence_threshold: f64,

    /// Confidence below which a ticket always goes to manual review
    #[serde(default = "default_low_threshold")]
    pub low_confidence_threshold: f64,

    /// Allow the auto-route rule to fire
    #[serde(default = "default_true")]
    pub enable_auto_routing: bool,
}

fn default_high_threshold() -> f64 {
    0.85
}
fn default_low_threshold() -> f64 {
    0.60
}
fn default_true() -> bool {
    true
}

impl Default for DecisionEngineConfig {
    fn default() -> Self {
        Self {
            high_confidence_threshold: default_high_threshold(),
            low_confidence_threshold: default_low_threshold(),
            enable_auto_routing: true,
        }
    }
}

impl DecisionEngineConfig {
    /// Thresholds must lie in [0, 1] with low <= high. Never clamped.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (field, value) in [
            (
                "decision_engine.high_confidence_threshold",
                self.high_confidence_threshold,
            ),
            (
                "decision_engine.low_confidence_threshold",
                self.low_confidence_threshold,
            ),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::invalid(
                    field,
                    format!("must be between 0.0 and 1.0, got {}", value),
                ));
            }
        }

        if self.low_confidence_threshold > self.high_confidence_threshold {
            return Err(ConfigError::invalid(
                "decision_engine.low_confidence_threshold",
                format!(
                    "must not exceed high_confidence_threshold ({} > {})",
                    self.low_confidence_threshold, self.high_confidence_threshold
                ),
            ));
        }

        Ok(())
    }
}
