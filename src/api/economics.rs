//! Economic analysis endpoints.
//!
//! POST /api/v1/economics/cost-benefit: benefit-cost ratio of an investment

use super::{ApiError, AppState};
use crate::agents::economic::CostBenefit;
use axum::extract::rejection::JsonRejection;
use axum::extract::Extension;
use axum::response::Json;
use axum::routing::post;
use axum::Router;
use serde::Deserialize;
use std::sync::Arc;

#[derive(Debug, Deserialize)]
pub struct CostBenefitRequest {
    pub investment: f64,
    pub expected_damage_reduction: f64,
}

async fn cost_benefit(
    Extension(state): Extension<Arc<AppState>>,
    payload: Result<Json<CostBenefitRequest>, JsonRejection>,
) -> Result<Json<CostBenefit>, ApiError> {
    let Json(request) = payload?;
    if !request.investment.is_finite() || !request.expected_damage_reduction.is_finite() {
        return Err(ApiError::BadRequest(
            "investment and expected_damage_reduction must be finite numbers".to_string(),
        ));
    }

    Ok(Json(state.council.economic().calculate_cost_benefit_ratio(
        request.investment,
        request.expected_damage_reduction,
    )))
}

/// Create the economics routes.
pub fn economics_routes() -> Router {
    Router::new().route("/api/v1/economics/cost-benefit", post(cost_benefit))
}
