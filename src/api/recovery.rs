//! Country recovery endpoints.
//!
//! GET /api/v1/recovery/:country: ten-year recovery model for a country
//! in the latest dataset, its phased economic timeline, and the simulated
//! outcomes of recovery scenarios costed against that country's damages.

use super::{ApiError, AppState};
use crate::agents::economic::RecoveryTimeline;
use crate::agents::recovery_architect::{InterventionSimulation, RecoveryModel};
use axum::extract::{Extension, Path};
use axum::response::Json;
use axum::routing::get;
use axum::Router;
use serde::Serialize;
use std::sync::Arc;

#[derive(Debug, Serialize)]
pub struct RecoveryResponse {
    #[serde(flatten)]
    pub model: RecoveryModel,
    pub timeline: RecoveryTimeline,
    pub interventions: Vec<InterventionSimulation>,
}

async fn country_recovery(
    Extension(state): Extension<Arc<AppState>>,
    Path(country): Path<String>,
) -> Result<Json<RecoveryResponse>, ApiError> {
    let snapshot = state.snapshot().await;
    let dataset = snapshot
        .dataset
        .ok_or_else(|| ApiError::NotFound("No dataset has been analyzed yet".to_string()))?;

    let (country_risk, level) = state
        .council
        .risk_analyst()
        .assess_country(&dataset.records, &country)
        .ok_or_else(|| ApiError::NotFound(format!("Country not found: {}", country)))?;

    let architect = state.council.recovery_architect();
    let model = architect.model_economic_recovery(&country_risk.country, country_risk.total_damage);
    let timeline = state
        .council
        .economic()
        .model_recovery_timeline(country_risk.total_damage, &country_risk.country);
    let interventions = state
        .council
        .plan_for_damages(country_risk.total_damage, Some(level))
        .scenarios
        .iter()
        .map(|s| architect.simulate_intervention_outcomes(s))
        .collect();

    Ok(Json(RecoveryResponse {
        model,
        timeline,
        interventions,
    }))
}

/// Create the recovery routes.
pub fn recovery_routes() -> Router {
    Router::new().route("/api/v1/recovery/:country", get(country_recovery))
}

#[cfg(test)]
mod tests {
    use crate::api::test_support::*;
    use axum::http::StatusCode;

    #[tokio::test]
    async fn test_country_recovery() {
        let (status, body) = send(loaded_state().await, get("/api/v1/recovery/CHINA")).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["country"], "China");
        assert_eq!(body["baseline_damage"], 2_000_000.0);
        assert_eq!(body["total_investment_needed"], 2_200_000.0);
        assert_eq!(body["recovery_pathway"][0]["period"], "year_1");
        assert_eq!(body["recovery_pathway"][0]["recovery_investment"], 300_000.0);
        assert_eq!(body["timeline"]["recovery_phases"].as_array().unwrap().len(), 3);
        assert_eq!(body["timeline"]["recovery_phases"][2]["estimated_cost"], 1_000_000.0);

        let interventions = body["interventions"].as_array().unwrap();
        assert_eq!(interventions.len(), 3);
        assert_eq!(
            interventions[0]["scenario"],
            "Immediate Emergency Response"
        );
        assert_eq!(interventions[0]["investment"], 300_000.0);
        assert_eq!(interventions[0]["outcomes"]["best_case"]["jobs_created"], 3);
        assert_eq!(interventions[2]["investment"], 1_000_000.0);
    }

    #[tokio::test]
    async fn test_country_interventions_differ_per_country() {
        let state = loaded_state().await;
        let (_, china) = send(state.clone(), get("/api/v1/recovery/China")).await;
        let (_, other) = send(state, get("/api/v1/recovery/India")).await;

        assert_ne!(
            china["interventions"][0]["investment"],
            other["interventions"][0]["investment"]
        );
    }

    #[tokio::test]
    async fn test_country_recovery_not_found() {
        let (status, _) = send(state(), get("/api/v1/recovery/China")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, body) = send(loaded_state().await, get("/api/v1/recovery/Narnia")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["code"], "NOT_FOUND");
    }
}
