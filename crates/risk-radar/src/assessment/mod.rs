//! Orchestration of the scoring and rule engines behind one call.

mod domain;
pub mod router;
mod validation;

pub use domain::{Breakdown, RiskAssessment, RiskInput};
pub use router::risk_router;
pub use validation::ValidationError;

use tracing::info;

use crate::config::ScoringConfig;
use crate::rules::{RuleDescriptor, RuleEngine, RuleOutcome};
use crate::scoring::ScoringEngine;

/// Unexpected failure inside the engines.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum AssessmentFault {
    #[error("computed risk score is not finite ({0})")]
    NonFiniteScore(f64),
}

/// Composes the scoring and rule engines. Immutable once built and shared across requests.
#[derive(Debug, Clone)]
pub struct RiskAssessor {
    scoring: ScoringEngine,
    rules: RuleEngine,
}

impl RiskAssessor {
    pub fn new(config: ScoringConfig) -> Self {
        Self::with_engines(ScoringEngine::new(config), RuleEngine::new())
    }

    pub fn with_engines(scoring: ScoringEngine, rules: RuleEngine) -> Self {
        Self { scoring, rules }
    }

    pub fn scoring(&self) -> &ScoringEngine {
        &self.scoring
    }

    pub fn rules(&self) -> &RuleEngine {
        &self.rules
    }

    pub fn rule_catalog(&self) -> &'static [RuleDescriptor] {
        self.rules.catalog()
    }

    /// Score, classify and explain `input`.
    pub fn assess(&self, input: &RiskInput) -> Result<RiskAssessment, AssessmentFault> {
        let RiskInput {
            severity,
            confidence,
            frequency,
            ref context,
        } = *input;

        let score = self
            .scoring
            .calculate_risk_score(severity, confidence, frequency);
        if !score.is_finite() {
            return Err(AssessmentFault::NonFiniteScore(score));
        }

        let risk_level = self.scoring.get_risk_level(score);
        let triggered_rules: Vec<String> = self
            .rules
            .evaluate_rules(severity, confidence, frequency, context.as_ref())
            .into_iter()
            .map(str::to_string)
            .collect();

        let risk_score = round_to_hundredths(score);
        info!(
            risk_score,
            %risk_level,
            triggered = triggered_rules.len(),
            "risk calculated"
        );

        Ok(RiskAssessment {
            risk_score,
            risk_level,
            breakdown: input.breakdown(),
            triggered_rules,
        })
    }

    /// Per-rule outcomes for `input`, including rules that did not fire.
    pub fn explain(&self, input: &RiskInput) -> Vec<RuleOutcome> {
        self.rules.explain(
            input.severity,
            input.confidence,
            input.frequency,
            input.context.as_ref(),
        )
    }
}

/// Rounds from the exact decimal expansion of `value`, without scaling first.
fn round_to_hundredths(value: f64) -> f64 {
    format!("{value:.2}").parse().unwrap_or(value)
}
