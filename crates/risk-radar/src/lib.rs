//! Explainable security risk scoring.
//!
//! Three normalized signals (severity, confidence, frequency) are combined by the
//! [`scoring::ScoringEngine`] into a bounded score and a [`scoring::RiskLevel`], while the
//! [`rules::RuleEngine`] reports which named heuristics matched. The
//! [`assessment::RiskAssessor`] composes both behind a single call.

pub mod assessment;
pub mod config;
pub mod error;
pub mod rules;
pub mod scoring;
pub mod telemetry;

/// Service name reported by the HTTP surface and the CLI.
pub const SERVICE_NAME: &str = "RiskRadar";

/// Version reported by the HTTP surface and the CLI.
pub const SERVICE_VERSION: &str = env!("CARGO_PKG_VERSION");
