//! Health check endpoints.
//!
//! - `/health`: "healthy" plus version
//! - `/health/detailed`: LLM and dataset component status

use super::AppState;
use axum::extract::Extension;
use axum::response::Json;
use axum::routing::get;
use axum::Router;
use serde::Serialize;
use serde_json::json;
use std::sync::Arc;
use std::time::Instant;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
}

#[derive(Debug, Serialize)]
pub struct DetailedHealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub checks: HealthChecks,
}

#[derive(Debug, Serialize)]
pub struct HealthChecks {
    pub llm: ComponentHealth,
    pub dataset: ComponentHealth,
}

/// Individual component health status
#[derive(Debug, Serialize)]
pub struct ComponentHealth {
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latency_ms: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl ComponentHealth {
    fn with_status(status: &'static str) -> Self {
        Self {
            status,
            latency_ms: None,
            error: None,
            details: None,
        }
    }

    fn healthy(latency_ms: u64, details: serde_json::Value) -> Self {
        Self {
            latency_ms: Some(latency_ms),
            details: Some(details),
            ..Self::with_status("healthy")
        }
    }

    fn unhealthy(error: String) -> Self {
        Self {
            error: Some(error),
            ..Self::with_status("unhealthy")
        }
    }
}

async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
    })
}

async fn detailed_health_check(
    Extension(state): Extension<Arc<AppState>>,
) -> Json<DetailedHealthResponse> {
    let llm = check_llm(&state).await;
    let dataset = check_dataset(&state).await;

    // An empty dataset slot or a disabled LLM does not degrade the service.
    let status = if llm.status == "unhealthy" {
        "degraded"
    } else {
        "healthy"
    };

    Json(DetailedHealthResponse {
        status,
        version: env!("CARGO_PKG_VERSION"),
        checks: HealthChecks { llm, dataset },
    })
}

async fn check_llm(state: &AppState) -> ComponentHealth {
    let Some(llm) = state.council.llm() else {
        return ComponentHealth::with_status("disabled");
    };

    let start = Instant::now();
    match llm.list_models().await {
        Ok(models) => ComponentHealth::healthy(
            start.elapsed().as_millis() as u64,
            json!({ "model": llm.model_name(), "available_models": models }),
        ),
        Err(e) => ComponentHealth::unhealthy(e.to_string()),
    }
}

async fn check_dataset(state: &AppState) -> ComponentHealth {
    match state.snapshot().await.dataset {
        Some(dataset) => ComponentHealth {
            details: Some(json!({ "source": dataset.source, "records": dataset.len() })),
            ..ComponentHealth::with_status("loaded")
        },
        None => ComponentHealth::with_status("empty"),
    }
}

/// Create the health routes.
pub fn health_routes() -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/health/detailed", get(detailed_health_check))
}
