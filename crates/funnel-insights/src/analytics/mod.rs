//! Program funnel analytics: metrics, data quality, and budget recommendations.

pub mod completeness;
pub mod domain;
pub mod insights;
pub mod metrics;
pub mod recommendation;
pub mod scenario;
pub mod scorecard;

pub use completeness::{calculate_completeness_score, field_display_name, filter_by_completeness};
pub use domain::{
    BudgetRecommendation, CompletenessStatus, Confidence, ConversionMetrics,
    DataCompletenessScore, FunnelStageCount, Program, ProgramId, ProgramLevel,
    RecommendationAction, RoiMetrics, SpendData, SpendPeriod,
};
pub use insights::{
    portfolio_summary, program_insights, InsightKind, PortfolioSummary, ProgramInsight,
    RecommendedProgram,
};
pub use metrics::{
    calculate_conversion_metrics, calculate_four_week_avg, calculate_roi_metrics,
    calculate_wow_delta, format_currency, format_number, format_percentage, safe_divide,
    safe_percentage, MISSING_VALUE,
};
pub use recommendation::{
    generate_recommendation, RecommendationCriteria, RecommendationEngine, RecommendationOutcome,
    RecommendationRule,
};
pub use scenario::{project, ScenarioError, ScenarioProjection, SpendScenario};
pub use scorecard::{
    evaluate_metric, evaluate_scorecard, summarize, MetricCategory, MetricSnapshot, MetricStatus,
    Pipeline, ScorecardMetric, ScorecardSummary,
};
