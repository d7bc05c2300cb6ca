use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;
use tracing::{info, warn};

use super::provider::{ProgramFilters, ProgramProvider, ProviderError};
use super::{evaluate_program, ProgramInput};
use crate::analytics::domain::{Program, ProgramId};
use crate::analytics::insights::{portfolio_summary, program_insights};
use crate::analytics::recommendation::{RecommendationCriteria, RecommendationEngine};
use crate::analytics::scenario::{project, SpendScenario};
use crate::analytics::scorecard::{evaluate_scorecard, summarize, ScorecardMetric};

/// Router exposing catalog listings, per-program analytics, and evaluation endpoints.
pub fn catalog_router<P>(provider: Arc<P>) -> Router
where
    P: ProgramProvider + 'static,
{
    Router::new()
        .route("/api/v1/programs", get(list_handler::<P>))
        .route("/api/v1/programs/:program_id", get(detail_handler::<P>))
        .route(
            "/api/v1/programs/:program_id/insights",
            get(insights_handler::<P>),
        )
        .route(
            "/api/v1/programs/:program_id/scenario",
            post(scenario_handler::<P>),
        )
        .route("/api/v1/schools", get(schools_handler::<P>))
        .route("/api/v1/levels", get(levels_handler::<P>))
        .route("/api/v1/portfolio", get(portfolio_handler::<P>))
        .route("/api/v1/recommendations", post(recommendation_handler::<P>))
        .route("/api/v1/refresh", post(refresh_handler::<P>))
        .route("/api/v1/scorecard/evaluate", post(scorecard_handler))
        .with_state(provider)
}

fn error_response(status: StatusCode, message: impl Into<String>) -> Response {
    let payload = json!({ "error": message.into() });
    (status, Json(payload)).into_response()
}

fn provider_error(error: ProviderError) -> Response {
    warn!(%error, "program provider failed");
    error_response(StatusCode::INTERNAL_SERVER_ERROR, error.to_string())
}

fn not_found(id: &ProgramId) -> Response {
    let payload = json!({
        "error": "program not found",
        "program_id": id.as_str(),
    });
    (StatusCode::NOT_FOUND, Json(payload)).into_response()
}

fn lookup<P: ProgramProvider>(provider: &P, program_id: String) -> Result<Program, Response> {
    let id = ProgramId(program_id);
    match provider.program_by_id(&id) {
        Ok(Some(program)) => Ok(program),
        Ok(None) => Err(not_found(&id)),
        Err(error) => Err(provider_error(error)),
    }
}

pub(crate) async fn list_handler<P>(
    State(provider): State<Arc<P>>,
    Query(filters): Query<ProgramFilters>,
) -> Response
where
    P: ProgramProvider + 'static,
{
    match provider.programs(&filters) {
        Ok(programs) => (StatusCode::OK, Json(programs)).into_response(),
        Err(error) => provider_error(error),
    }
}

pub(crate) async fn detail_handler<P>(
    State(provider): State<Arc<P>>,
    Path(program_id): Path<String>,
) -> Response
where
    P: ProgramProvider + 'static,
{
    match lookup(provider.as_ref(), program_id) {
        Ok(program) => (StatusCode::OK, Json(program)).into_response(),
        Err(response) => response,
    }
}

pub(crate) async fn insights_handler<P>(
    State(provider): State<Arc<P>>,
    Path(program_id): Path<String>,
) -> Response
where
    P: ProgramProvider + 'static,
{
    match lookup(provider.as_ref(), program_id) {
        Ok(program) => {
            let payload = json!({
                "program_id": program.id,
                "recommendation": program.recommendation,
                "insights": program_insights(&program),
            });
            (StatusCode::OK, Json(payload)).into_response()
        }
        Err(response) => response,
    }
}

pub(crate) async fn scenario_handler<P>(
    State(provider): State<Arc<P>>,
    Path(program_id): Path<String>,
    Json(scenario): Json<SpendScenario>,
) -> Response
where
    P: ProgramProvider + 'static,
{
    let program = match lookup(provider.as_ref(), program_id) {
        Ok(program) => program,
        Err(response) => return response,
    };

    match project(&program, &scenario) {
        Ok(projection) => (StatusCode::OK, Json(projection)).into_response(),
        Err(error) => error_response(StatusCode::UNPROCESSABLE_ENTITY, error.to_string()),
    }
}

pub(crate) async fn schools_handler<P>(State(provider): State<Arc<P>>) -> Response
where
    P: ProgramProvider + 'static,
{
    match provider.schools() {
        Ok(schools) => (StatusCode::OK, Json(schools)).into_response(),
        Err(error) => provider_error(error),
    }
}

pub(crate) async fn levels_handler<P>(State(provider): State<Arc<P>>) -> Response
where
    P: ProgramProvider + 'static,
{
    match provider.levels() {
        Ok(levels) => (StatusCode::OK, Json(levels)).into_response(),
        Err(error) => provider_error(error),
    }
}

pub(crate) async fn portfolio_handler<P>(State(provider): State<Arc<P>>) -> Response
where
    P: ProgramProvider + 'static,
{
    match provider.programs(&ProgramFilters::default()) {
        Ok(programs) => (StatusCode::OK, Json(portfolio_summary(&programs))).into_response(),
        Err(error) => provider_error(error),
    }
}

/// Body for ad-hoc evaluation; criteria fall back to the provider's thresholds.
#[derive(Debug, Deserialize)]
pub(crate) struct RecommendationRequest {
    program: ProgramInput,
    #[serde(default)]
    criteria: Option<RecommendationCriteria>,
}

pub(crate) async fn recommendation_handler<P>(
    State(provider): State<Arc<P>>,
    Json(request): Json<RecommendationRequest>,
) -> Response
where
    P: ProgramProvider + 'static,
{
    let criteria = request
        .criteria
        .unwrap_or_else(|| provider.criteria().clone());
    let program = evaluate_program(request.program, &criteria);
    let outcome = RecommendationEngine::new(criteria).evaluate(&program);

    let payload = json!({
        "program": program,
        "rule": outcome.rule,
        "recommendation": outcome.recommendation,
    });
    (StatusCode::OK, Json(payload)).into_response()
}

pub(crate) async fn refresh_handler<P>(State(provider): State<Arc<P>>) -> Response
where
    P: ProgramProvider + 'static,
{
    match provider.refresh() {
        Ok(programs) => {
            info!(programs, "catalog refresh requested over http");
            (StatusCode::OK, Json(json!({ "programs": programs }))).into_response()
        }
        Err(error) => provider_error(error),
    }
}

pub(crate) async fn scorecard_handler(Json(metrics): Json<Vec<ScorecardMetric>>) -> Response {
    let snapshots = evaluate_scorecard(&metrics);
    let summary = summarize(&snapshots);
    let payload = json!({
        "metrics": snapshots,
        "summary": summary,
    });
    (StatusCode::OK, Json(payload)).into_response()
}
