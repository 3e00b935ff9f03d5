use metrics_exporter_prometheus::PrometheusHandle;
use risk_radar::assessment::RiskAssessor;
use risk_radar::config::ScoringSource;
use risk_radar::error::AppError;
use std::path::PathBuf;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Reads the scoring document once and builds the shared assessor.
pub(crate) fn load_assessor(
    source: &ScoringSource,
    override_path: Option<PathBuf>,
) -> Result<RiskAssessor, AppError> {
    let source = match override_path {
        Some(path) => ScoringSource { path },
        None => source.clone(),
    };
    let config = source.load()?;
    Ok(RiskAssessor::new(config))
}
