use crate::infra::load_assessor;
use clap::Args;
use risk_radar::assessment::{RiskAssessment, RiskInput};
use risk_radar::config::AppConfig;
use risk_radar::error::AppError;
use risk_radar::rules::{EventContext, RuleEngine, RuleOutcome};
use risk_radar::telemetry;
use serde::Serialize;
use std::path::PathBuf;

#[derive(Args, Debug)]
pub(crate) struct ScoreArgs {
    /// Severity signal (0-100)
    #[arg(long)]
    pub(crate) severity: f64,
    /// Confidence signal (0-100)
    #[arg(long)]
    pub(crate) confidence: f64,
    /// Frequency signal (0-100)
    #[arg(long)]
    pub(crate) frequency: f64,
    /// Number of failed login attempts observed for the event
    #[arg(long, default_value_t = 0)]
    pub(crate) failed_logins: u64,
    /// Mark the acting account as privileged
    #[arg(long)]
    pub(crate) privileged: bool,
    /// Total number of related events
    #[arg(long, default_value_t = 0)]
    pub(crate) event_count: u64,
    /// Identifier of the acting user
    #[arg(long)]
    pub(crate) user_id: Option<String>,
    /// Source IP address of the event
    #[arg(long)]
    pub(crate) source_ip: Option<String>,
    /// Include every rule outcome, not only the triggered ones
    #[arg(long)]
    pub(crate) explain: bool,
    /// Override the scoring weights/thresholds document (RISK_CONFIG_PATH)
    #[arg(long)]
    pub(crate) config: Option<PathBuf>,
}

impl ScoreArgs {
    fn into_input(self) -> RiskInput {
        RiskInput::new(self.severity, self.confidence, self.frequency).with_context(EventContext {
            failed_logins: self.failed_logins,
            is_privileged: self.privileged,
            user_id: self.user_id,
            source_ip: self.source_ip,
            event_count: self.event_count,
        })
    }
}

#[derive(Debug, Serialize)]
struct ScoreReport {
    #[serde(flatten)]
    assessment: RiskAssessment,
    #[serde(skip_serializing_if = "Option::is_none")]
    rules: Option<Vec<RuleOutcome>>,
}

pub(crate) fn run_score(mut args: ScoreArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    telemetry::init(&config.telemetry)?;

    let assessor = load_assessor(&config.scoring, args.config.take())?;
    let explain = args.explain;
    let input = args.into_input();
    input.validate()?;

    let assessment = assessor.assess(&input)?;
    let rules = explain.then(|| assessor.explain(&input));

    let rendered = serde_json::to_string_pretty(&ScoreReport { assessment, rules })?;
    println!("{rendered}");
    Ok(())
}

pub(crate) fn run_rules_listing() -> Result<(), AppError> {
    println!("{}", render_rules_listing(&RuleEngine::new()));
    Ok(())
}

fn render_rules_listing(engine: &RuleEngine) -> String {
    engine
        .catalog()
        .iter()
        .enumerate()
        .map(|(index, rule)| format!("{}. {}: {}", index + 1, rule.name, rule.description))
        .collect::<Vec<_>>()
        .join("\n")
}
