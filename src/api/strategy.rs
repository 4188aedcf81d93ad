//! Strategy and policy endpoints.
//!
//! POST /api/v1/strategy/generate: recovery plan for a damage total
//! GET  /api/v1/strategy/recommendations/:risk_level: ranked policy catalog
//! GET  /api/v1/strategy/policies/:policy_id/feasibility
//! GET  /api/v1/strategy/policies/:policy_id/roadmap

use super::{ApiError, AppState};
use crate::agents::policy::{FeasibilityAssessment, ImplementationRoadmap};
use crate::models::{PolicyRecommendation, RecoveryScenario, RiskLevel, Synthesis};
use axum::extract::rejection::JsonRejection;
use axum::extract::{Extension, Path};
use axum::response::Json;
use axum::routing::{get, post};
use axum::Router;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

#[derive(Debug, Deserialize)]
pub struct GenerateStrategyRequest {
    pub total_damages: f64,
    /// Overrides the level the damage thresholds would give
    #[serde(default)]
    pub risk_level: Option<RiskLevel>,
}

#[derive(Debug, Serialize)]
pub struct GenerateStrategyResponse {
    pub status: &'static str,
    pub synthesis: Synthesis,
    pub scenarios: Vec<RecoveryScenario>,
    pub policies: Vec<PolicyRecommendation>,
}

#[derive(Debug, Serialize)]
pub struct RecommendationsResponse {
    pub risk_level: RiskLevel,
    pub total_damages: f64,
    pub policies: Vec<PolicyRecommendation>,
}

async fn generate_strategy(
    Extension(state): Extension<Arc<AppState>>,
    payload: Result<Json<GenerateStrategyRequest>, JsonRejection>,
) -> Result<Json<GenerateStrategyResponse>, ApiError> {
    let Json(request) = payload?;
    if !request.total_damages.is_finite() || request.total_damages < 0.0 {
        return Err(ApiError::BadRequest(
            "total_damages must be a non-negative number".to_string(),
        ));
    }

    let plan = state
        .council
        .plan_for_damages(request.total_damages, request.risk_level);

    Ok(Json(GenerateStrategyResponse {
        status: "success",
        synthesis: plan.synthesis,
        scenarios: plan.scenarios,
        policies: plan.policies,
    }))
}

async fn recommendations(
    Extension(state): Extension<Arc<AppState>>,
    Path(risk_level): Path<String>,
) -> Result<Json<RecommendationsResponse>, ApiError> {
    let risk_level: RiskLevel = risk_level
        .parse()
        .map_err(|_| ApiError::BadRequest("Invalid risk level".to_string()))?;
    let total_damages = state.snapshot().await.total_damages();

    let policy = state.council.policy();
    let policies =
        policy.prioritize_interventions(policy.generate_policy_recommendations(risk_level, total_damages));

    Ok(Json(RecommendationsResponse {
        risk_level,
        total_damages,
        policies,
    }))
}

/// Catalog policy budgeted against the latest analysis.
async fn lookup_policy(state: &AppState, policy_id: &str) -> Result<PolicyRecommendation, ApiError> {
    let snapshot = state.snapshot().await;
    let total_damages = snapshot.total_damages();
    let risk_level = snapshot.report.as_ref().map_or_else(
        || state.council.risk_analyst().calculate_risk_level(total_damages),
        |r| r.risk_analysis.risk_level,
    );

    state
        .council
        .policy()
        .find_policy(policy_id, risk_level, total_damages)
        .ok_or_else(|| ApiError::NotFound(format!("Policy not found: {}", policy_id)))
}

async fn policy_feasibility(
    Extension(state): Extension<Arc<AppState>>,
    Path(policy_id): Path<String>,
) -> Result<Json<FeasibilityAssessment>, ApiError> {
    let policy = lookup_policy(&state, &policy_id).await?;
    Ok(Json(state.council.policy().assess_policy_feasibility(&policy)))
}

async fn policy_roadmap(
    Extension(state): Extension<Arc<AppState>>,
    Path(policy_id): Path<String>,
) -> Result<Json<ImplementationRoadmap>, ApiError> {
    let policy = lookup_policy(&state, &policy_id).await?;
    Ok(Json(state.council.policy().create_implementation_roadmap(&policy)))
}

/// Create the strategy routes.
pub fn strategy_routes() -> Router {
    Router::new()
        .route("/api/v1/strategy/generate", post(generate_strategy))
        .route(
            "/api/v1/strategy/recommendations/:risk_level",
            get(recommendations),
        )
        .route(
            "/api/v1/strategy/policies/:policy_id/feasibility",
            get(policy_feasibility),
        )
        .route(
            "/api/v1/strategy/policies/:policy_id/roadmap",
            get(policy_roadmap),
        )
}

#[cfg(test)]
mod tests {
    use crate::api::test_support::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};

    const JSON: &str = "application/json";

    #[tokio::test]
    async fn test_generate_strategy() {
        let (status, body) = send(
            state(),
            post(
                "/api/v1/strategy/generate",
                JSON,
                r#"{"total_damages": 1000000000}"#,
            ),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "success");
        assert_eq!(body["synthesis"]["priority_level"], "HIGH");
        assert_eq!(
            body["synthesis"]["total_investment_required"],
            1_000_000_000.0
        );
        assert_eq!(body["scenarios"].as_array().unwrap().len(), 3);
        assert_eq!(body["scenarios"][0]["estimated_cost"], 150_000_000.0);
        assert_eq!(body["policies"][0]["policy_id"], "POL-001");
        assert_eq!(body["policies"][1]["estimated_budget"], 400_000_000.0);
    }

    #[tokio::test]
    async fn test_generate_strategy_with_explicit_level() {
        let (_, body) = send(
            state(),
            post(
                "/api/v1/strategy/generate",
                JSON,
                r#"{"total_damages": 1000, "risk_level": "CRITICAL"}"#,
            ),
        )
        .await;

        assert_eq!(body["synthesis"]["priority_level"], "CRITICAL");
    }

    #[tokio::test]
    async fn test_generate_strategy_rejects_negative_damages() {
        let (status, body) = send(
            state(),
            post(
                "/api/v1/strategy/generate",
                JSON,
                r#"{"total_damages": -5}"#,
            ),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "BAD_REQUEST");
    }

    #[tokio::test]
    async fn test_generate_strategy_rejects_malformed_body() {
        for payload in [r#"{"total_damages": "lots"}"#, "{}", "{not json"] {
            let (status, body) =
                send(state(), post("/api/v1/strategy/generate", JSON, payload)).await;

            assert_eq!(status, StatusCode::BAD_REQUEST, "payload {}", payload);
            assert_eq!(body["code"], "BAD_REQUEST");
            assert!(body["error"].is_string());
        }
    }

    #[tokio::test]
    async fn test_generate_strategy_requires_json_content_type() {
        let request = Request::builder()
            .method("POST")
            .uri("/api/v1/strategy/generate")
            .body(Body::from(r#"{"total_damages": 10}"#))
            .unwrap();
        let (status, body) = send(state(), request).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "BAD_REQUEST");
    }

    #[tokio::test]
    async fn test_recommendations_are_ranked() {
        let (status, body) = send(
            loaded_state().await,
            get("/api/v1/strategy/recommendations/high"),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["risk_level"], "HIGH");
        assert_eq!(body["total_damages"], 7_500_000.0);

        let policies = body["policies"].as_array().unwrap();
        assert_eq!(policies.len(), 4);
        assert_eq!(policies[0]["policy_id"], "POL-001");
        assert_eq!(policies[0]["priority"], "CRITICAL");
        assert_eq!(policies[0]["rank"], 1);
        assert_eq!(policies[0]["urgency_score"], 100);
        assert_eq!(policies[1]["estimated_budget"], 2_625_000.0);
        assert_eq!(policies[3]["policy_id"], "POL-004");
        assert_eq!(policies[3]["rank"], 4);
    }

    #[tokio::test]
    async fn test_recommendations_invalid_level() {
        let (status, body) = send(state(), get("/api/v1/strategy/recommendations/severe")).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Invalid risk level");
    }

    #[tokio::test]
    async fn test_policy_feasibility() {
        let (status, body) = send(
            loaded_state().await,
            get("/api/v1/strategy/policies/pol-002/feasibility"),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["policy_id"], "POL-002");
        assert_eq!(body["feasibility_score"], 72.0);
    }

    #[tokio::test]
    async fn test_policy_roadmap() {
        let (status, body) = send(
            loaded_state().await,
            get("/api/v1/strategy/policies/POL-001/roadmap"),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["phases"].as_array().unwrap().len(), 4);
        assert_eq!(body["phases"][0]["budget_amount"], 112_500.0);
        assert_eq!(body["key_milestones"][0]["month"], 3);
    }

    #[tokio::test]
    async fn test_unknown_policy() {
        let (status, _) = send(state(), get("/api/v1/strategy/policies/POL-999/roadmap")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
