use serde::{Deserialize, Serialize};

use crate::rules::EventContext;
use crate::scoring::RiskLevel;

/// Signals to score plus optional event context.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskInput {
    pub severity: f64,
    pub confidence: f64,
    pub frequency: f64,
    #[serde(default)]
    pub context: Option<EventContext>,
}

impl RiskInput {
    pub fn new(severity: f64, confidence: f64, frequency: f64) -> Self {
        Self {
            severity,
            confidence,
            frequency,
            context: None,
        }
    }

    pub fn with_context(mut self, context: EventContext) -> Self {
        self.context = Some(context);
        self
    }

    pub fn breakdown(&self) -> Breakdown {
        Breakdown {
            severity: self.severity,
            confidence: self.confidence,
            frequency: self.frequency,
        }
    }
}

/// Raw, unweighted signals echoed back to the caller.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Breakdown {
    pub severity: f64,
    pub confidence: f64,
    pub frequency: f64,
}

/// Score, classification and explanation for one input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskAssessment {
    pub risk_score: f64,
    pub risk_level: RiskLevel,
    pub breakdown: Breakdown,
    pub triggered_rules: Vec<String>,
}
