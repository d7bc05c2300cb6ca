use axum::body::{to_bytes, Body};
use axum::http::{header, Request, StatusCode};
use axum::response::Response;
use axum::Router;
use funnel_insights::analytics::RecommendationCriteria;
use funnel_insights::catalog::{catalog_router, FixedDataProvider, ProgramCsvImporter};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

const EXPORT: &[u8] = include_bytes!("../../../data/programs.csv");

fn router() -> Router {
    let records = ProgramCsvImporter::from_reader(EXPORT).expect("bundled export imports");
    let provider = FixedDataProvider::new(records, RecommendationCriteria::default());
    catalog_router(Arc::new(provider))
}

async fn get(uri: &str) -> Response {
    router()
        .oneshot(Request::get(uri).body(Body::empty()).expect("request"))
        .await
        .expect("route executes")
}

async fn post_json(uri: &str, payload: Value) -> Response {
    router()
        .oneshot(
            Request::post(uri)
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(payload.to_string()))
                .expect("request"),
        )
        .await
        .expect("route executes")
}

async fn read_json_body(response: Response) -> Value {
    let body = to_bytes(response.into_body(), 256 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}

#[tokio::test]
async fn list_returns_every_program_without_filters() {
    let response = get("/api/v1/programs").await;

    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    let programs = payload.as_array().expect("array payload");
    assert_eq!(programs.len(), 9);
    assert_eq!(programs[0]["id"], "smu-lean-six-sigma-yellow");
    assert_eq!(programs[0]["recommendation"]["action"], "increase");
    assert_eq!(programs[0]["dataCompleteness"]["overall"], 100);
}

#[tokio::test]
async fn list_applies_query_filters() {
    let response = get("/api/v1/programs?level=Degree").await;
    let payload = read_json_body(response).await;
    assert_eq!(payload.as_array().map(Vec::len), Some(2));

    let response = get("/api/v1/programs?minLeads=600&recommendationAction=increase").await;
    let payload = read_json_body(response).await;
    let programs = payload.as_array().expect("array payload");
    assert_eq!(programs.len(), 1);
    assert_eq!(programs[0]["programName"], "Lean Six Sigma Yellow Belt Cert");

    let response = get("/api/v1/programs?school=All%20Schools").await;
    let payload = read_json_body(response).await;
    assert_eq!(payload.as_array().map(Vec::len), Some(9));
}

#[tokio::test]
async fn detail_returns_not_found_for_unknown_program() {
    let response = get("/api/v1/programs/msu-underwater-basket-weaving").await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let payload = read_json_body(response).await;
    assert_eq!(payload["error"], "program not found");
    assert_eq!(payload["program_id"], "msu-underwater-basket-weaving");
}

#[tokio::test]
async fn insights_describe_the_program() {
    let response = get("/api/v1/programs/emory-gbs-driving-roi-with-analytics/insights").await;

    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(payload["recommendation"]["action"], "reduce");
    let titles: Vec<_> = payload["insights"]
        .as_array()
        .expect("insight list")
        .iter()
        .filter_map(|insight| insight["title"].as_str())
        .collect();
    assert_eq!(titles, vec!["High Lead Volume", "High Cost Per Enrollment"]);
}

#[tokio::test]
async fn scenario_projects_and_validates_input() {
    let response = post_json(
        "/api/v1/programs/smu-lean-six-sigma-yellow/scenario",
        json!({ "spendMultiplier": 1.5 }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(payload["currentSpend"], 96_000.0);
    assert_eq!(payload["scenarioSpend"], 144_000.0);
    assert_eq!(payload["scenarioEnrollments"], 68);
    assert_eq!(payload["enrollmentDelta"], 0);

    let response = post_json(
        "/api/v1/programs/smu-lean-six-sigma-yellow/scenario",
        json!({ "spendMultiplier": 3.0 }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let payload = read_json_body(response).await;
    assert!(payload["error"]
        .as_str()
        .is_some_and(|message| message.contains("spend multiplier")));
}

#[tokio::test]
async fn schools_and_levels_lead_with_all_option() {
    let payload = read_json_body(get("/api/v1/schools").await).await;
    assert_eq!(
        payload,
        json!(["All Schools", "Emory ECE", "Emory GBS", "KEEP", "MSU", "SMU", "USF"])
    );

    let payload = read_json_body(get("/api/v1/levels").await).await;
    assert_eq!(payload, json!(["All Program Types", "Certificate", "Degree"]));
}

#[tokio::test]
async fn portfolio_summarizes_recommendations() {
    let payload = read_json_body(get("/api/v1/portfolio").await).await;

    assert_eq!(payload["totalPrograms"], 9);
    assert_eq!(payload["strongBuys"], 2);
    assert_eq!(payload["holds"], 4);
    assert_eq!(payload["reduces"], 3);
    assert_eq!(payload["topRecommendations"][0]["id"], "smu-lean-six-sigma-yellow");
}

#[tokio::test]
async fn recommendations_recompute_posted_program_with_custom_criteria() {
    let program = json!({
        "id": "keep-data-driven-decision-making",
        "school": "KEEP",
        "level": "Certificate",
        "programName": "Data Driven Decision Making",
        "leads": 0,
        "funnel": {
            "visitors": 900,
            "inquiries": 40,
            "opportunities": 20,
            "applications": 12,
            "enrollments": 8
        },
        "spend": { "totalSpend": 8000.0 }
    });

    let response = post_json(
        "/api/v1/recommendations",
        json!({ "program": program.clone(), "criteria": { "minLeads": 10 } }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(payload["rule"], "strong_performance");
    assert_eq!(payload["recommendation"]["action"], "increase");
    assert_eq!(payload["recommendation"]["suggestedSpendChange"], 25);
    assert_eq!(payload["program"]["leads"], 40);

    let response = post_json("/api/v1/recommendations", json!({ "program": program })).await;
    let payload = read_json_body(response).await;
    assert_eq!(payload["rule"], "insufficient_volume");
}

#[tokio::test]
async fn recommendations_accept_a_bare_funnel_body() {
    let body = json!({
        "program": {
            "leads": 200,
            "funnel": {
                "inquiries": 200,
                "opportunities": 100,
                "applications": 60,
                "enrollments": 40
            },
            "spend": { "totalSpend": 40000 }
        }
    });

    let response = post_json("/api/v1/recommendations", body).await;

    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(payload["program"]["leads"], 200);
    assert_eq!(payload["program"]["level"], "Certificate");
    assert_eq!(payload["rule"], "strong_performance");
    assert_eq!(payload["recommendation"]["action"], "increase");
}

#[tokio::test]
async fn refresh_reports_program_count() {
    let response = post_json("/api/v1/refresh", json!({})).await;

    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(payload["programs"], 9);
}

#[tokio::test]
async fn scorecard_evaluation_returns_snapshots_and_summary() {
    let metrics = json!([
        {
            "id": "cert-enrollments",
            "name": "Certificate enrollments",
            "category": "lagging",
            "pipeline": "certificate",
            "owner": "Enrollment",
            "unit": "count",
            "target": 20.0,
            "sortOrder": 1,
            "history": [12.0, 10.0, 9.0]
        },
        {
            "id": "degree-inquiries",
            "name": "Degree inquiries",
            "category": "leading",
            "pipeline": "degree",
            "owner": "Marketing",
            "unit": "count",
            "target": 200.0,
            "sortOrder": 2,
            "history": [150.0, 190.0, 185.0, 180.0]
        }
    ]);

    let response = post_json("/api/v1/scorecard/evaluate", metrics).await;

    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(payload["metrics"][0]["id"], "degree-inquiries");
    assert_eq!(payload["metrics"][0]["status"], "green");
    assert_eq!(payload["metrics"][1]["redStreak"], 3);
    assert_eq!(payload["metrics"][1]["idsFlagged"], true);
    assert_eq!(payload["summary"]["leadingPacingPercent"], 100.0);
    assert_eq!(payload["summary"]["laggingPacingPercent"], 0.0);
}
