//! Analysis endpoints.
//!
//! POST /api/v1/analysis/analyze: run the council over an uploaded dataset
//! GET  /api/v1/analysis/latest: latest council report
//! GET  /api/v1/analysis/risk-level/:country: one country's risk

use super::{ApiError, AppState};
use crate::dataset::{parse_bytes, DataFormat, DatasetError};
use crate::models::{CouncilReport, CountryRisk, RiskLevel};
use axum::body::Bytes;
use axum::extract::{Extension, Path, Query};
use axum::http::{header, HeaderMap};
use axum::response::Json;
use axum::routing::{get, post};
use axum::Router;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;

const UPLOAD_SOURCE: &str = "upload";

#[derive(Debug, Default, Deserialize)]
pub struct AnalyzeQuery {
    /// Ask the stage agents for LLM commentary
    #[serde(default)]
    pub narrate: bool,
}

#[derive(Debug, Serialize)]
pub struct AnalyzeResponse {
    pub status: &'static str,
    pub data_points: usize,
    pub columns: Vec<String>,
    pub report: Arc<CouncilReport>,
}

#[derive(Debug, Serialize)]
pub struct CountryRiskResponse {
    #[serde(flatten)]
    pub country: CountryRisk,
    pub risk_level: RiskLevel,
}

async fn analyze(
    Extension(state): Extension<Arc<AppState>>,
    Query(query): Query<AnalyzeQuery>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<AnalyzeResponse>, ApiError> {
    let content_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok());
    let format = DataFormat::from_content_type(content_type);

    let dataset = parse_bytes(UPLOAD_SOURCE, format, &body)?;
    if dataset.is_empty() {
        return Err(DatasetError::Empty(UPLOAD_SOURCE.to_string()).into());
    }

    info!(
        "Analyzing uploaded {:?} dataset with {} rows",
        format,
        dataset.len()
    );

    let mut report = if query.narrate {
        state.council.run(&dataset).await
    } else {
        state.council.analyze_and_recommend(&dataset)
    };
    if !state.config.report.include_narratives {
        report.narratives.clear();
    }

    let data_points = dataset.len();
    let columns = dataset.columns.clone();
    let report = state.store(dataset, report).await;

    Ok(Json(AnalyzeResponse {
        status: "success",
        data_points,
        columns,
        report,
    }))
}

async fn latest_report(
    Extension(state): Extension<Arc<AppState>>,
) -> Result<Json<Arc<CouncilReport>>, ApiError> {
    state
        .snapshot()
        .await
        .report
        .map(Json)
        .ok_or_else(|| ApiError::NotFound("No analysis has been run yet".to_string()))
}

async fn country_risk_level(
    Extension(state): Extension<Arc<AppState>>,
    Path(country): Path<String>,
) -> Result<Json<CountryRiskResponse>, ApiError> {
    let dataset = state
        .snapshot()
        .await
        .dataset
        .ok_or_else(|| ApiError::NotFound("No dataset has been analyzed yet".to_string()))?;

    let (country_risk, risk_level) = state
        .council
        .risk_analyst()
        .assess_country(&dataset.records, &country)
        .ok_or_else(|| ApiError::NotFound(format!("Country not found: {}", country)))?;

    Ok(Json(CountryRiskResponse {
        country: country_risk,
        risk_level,
    }))
}

/// Create the analysis routes.
pub fn analysis_routes() -> Router {
    Router::new()
        .route("/api/v1/analysis/analyze", post(analyze))
        .route("/api/v1/analysis/latest", get(latest_report))
        .route(
            "/api/v1/analysis/risk-level/:country",
            get(country_risk_level),
        )
}
