//! Explainability layer: independent predicates over the signals and event context.

mod catalog;
mod context;

pub use catalog::{RuleDescriptor, RuleKind, RULE_CATALOG};
pub use context::EventContext;

use serde::Serialize;
use tracing::debug;

/// Evaluation result for a single catalog entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RuleOutcome {
    pub rule_name: &'static str,
    pub triggered: bool,
    pub description: &'static str,
}

/// Evaluates the fixed rule catalog. Holds no per-call state.
#[derive(Debug, Clone, Copy)]
pub struct RuleEngine {
    catalog: &'static [RuleDescriptor],
}

impl Default for RuleEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl RuleEngine {
    pub fn new() -> Self {
        Self {
            catalog: &RULE_CATALOG,
        }
    }

    pub fn catalog(&self) -> &'static [RuleDescriptor] {
        self.catalog
    }

    /// Names of the matching rules in catalog order. `None` behaves as the default context.
    pub fn evaluate_rules(
        &self,
        severity: f64,
        confidence: f64,
        frequency: f64,
        context: Option<&EventContext>,
    ) -> Vec<&'static str> {
        let fallback = EventContext::default();
        let context = context.unwrap_or(&fallback);

        self.catalog
            .iter()
            .filter(|rule| rule.kind.matches(severity, confidence, frequency, context))
            .inspect(|rule| debug!(rule = rule.name, "rule triggered"))
            .map(|rule| rule.name)
            .collect()
    }

    /// One outcome per catalog entry, matched or not.
    pub fn explain(
        &self,
        severity: f64,
        confidence: f64,
        frequency: f64,
        context: Option<&EventContext>,
    ) -> Vec<RuleOutcome> {
        let fallback = EventContext::default();
        let context = context.unwrap_or(&fallback);

        self.catalog
            .iter()
            .map(|rule| RuleOutcome {
                rule_name: rule.name,
                triggered: rule.kind.matches(severity, confidence, frequency, context),
                description: rule.description,
            })
            .collect()
    }
}
