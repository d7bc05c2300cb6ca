use funnel_insights::analytics::RecommendationAction;
use funnel_insights::catalog::FixedDataProvider;
use funnel_insights::config::AppConfig;
use funnel_insights::error::AppError;
use funnel_insights::load_provider;
use metrics_exporter_prometheus::PrometheusHandle;
use std::path::PathBuf;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Loads configuration, letting a command-line CSV path replace `PROGRAMS_CSV`.
pub(crate) fn load_config(csv_override: Option<PathBuf>) -> Result<AppConfig, AppError> {
    let mut config = AppConfig::load()?;
    if csv_override.is_some() {
        config.catalog.programs_csv = csv_override;
    }
    Ok(config)
}

pub(crate) fn build_provider(config: &AppConfig) -> Result<Arc<FixedDataProvider>, AppError> {
    Ok(Arc::new(load_provider(config)?))
}

pub(crate) fn parse_action(raw: &str) -> Result<RecommendationAction, String> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "increase" => Ok(RecommendationAction::Increase),
        "hold" => Ok(RecommendationAction::Hold),
        "reduce" => Ok(RecommendationAction::Reduce),
        "pause" => Ok(RecommendationAction::Pause),
        other => Err(format!(
            "unknown action '{other}' (expected increase, hold, reduce, or pause)"
        )),
    }
}
