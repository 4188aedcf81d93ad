//! HTTP API.
//!
//! Provides REST endpoints for:
//! - Health checks
//! - Dataset analysis by the council
//! - Strategy and policy generation
//! - Country recovery models and cost-benefit analysis

pub mod analysis;
pub mod economics;
pub mod error;
pub mod health;
pub mod recovery;
pub mod strategy;

pub use analysis::analysis_routes;
pub use economics::economics_routes;
pub use error::ApiError;
pub use health::health_routes;
pub use recovery::recovery_routes;
pub use strategy::strategy_routes;

use crate::agents::AgentCouncil;
use crate::config::Config;
use crate::dataset::Dataset;
use crate::models::CouncilReport;
use anyhow::{Context, Result};
use axum::extract::Extension;
use axum::Router;
use std::sync::Arc;
use tokio::sync::RwLock;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

/// Most recently analyzed dataset and its report.
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    pub dataset: Option<Arc<Dataset>>,
    pub report: Option<Arc<CouncilReport>>,
}

impl Snapshot {
    /// Total damages of the latest dataset, 0 without one.
    pub fn total_damages(&self) -> f64 {
        self.report
            .as_ref()
            .map_or(0.0, |r| r.risk_analysis.total_damages)
    }
}

/// State shared by all handlers.
pub struct AppState {
    pub config: Config,
    pub council: AgentCouncil,
    pub latest: RwLock<Snapshot>,
}

impl AppState {
    pub fn new(config: Config, council: AgentCouncil) -> Self {
        Self {
            config,
            council,
            latest: RwLock::new(Snapshot::default()),
        }
    }

    /// Replace the latest snapshot.
    pub async fn store(&self, dataset: Dataset, report: CouncilReport) -> Arc<CouncilReport> {
        let report = Arc::new(report);
        let mut latest = self.latest.write().await;
        latest.dataset = Some(Arc::new(dataset));
        latest.report = Some(report.clone());
        report
    }

    pub async fn snapshot(&self) -> Snapshot {
        self.latest.read().await.clone()
    }
}

/// Build the router with every endpoint and the shared layers.
pub fn api_router(state: Arc<AppState>) -> Router {
    Router::new()
        .merge(health_routes())
        .merge(analysis_routes())
        .merge(strategy_routes())
        .merge(recovery_routes())
        .merge(economics_routes())
        .layer(Extension(state))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

/// Serve the API until Ctrl-C.
///
/// A dataset given at startup is analyzed before the listener opens.
pub async fn serve(config: Config, council: AgentCouncil, dataset: Option<Dataset>) -> Result<()> {
    let bind = config.server.bind.clone();
    let state = Arc::new(AppState::new(config, council));

    if let Some(dataset) = dataset {
        info!("Analyzing startup dataset {}", dataset.source);
        let report = state.council.analyze_and_recommend(&dataset);
        state.store(dataset, report).await;
    }

    let app = api_router(state);

    let listener = tokio::net::TcpListener::bind(&bind)
        .await
        .with_context(|| format!("Failed to bind {}", bind))?;
    info!("Phoenix API listening on http://{}", bind);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server error")?;

    info!("Phoenix API shut down");
    Ok(())
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("Shutdown signal received"),
        Err(e) => warn!("Failed to listen for Ctrl-C: {}", e),
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use crate::config::AnalysisConfig;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use serde_json::Value;
    use tower::ServiceExt;

    pub(crate) const FIXTURE: &str = include_str!("../../fixtures/climate_damages.csv");

    pub(crate) fn state() -> Arc<AppState> {
        Arc::new(AppState::new(
            Config::default(),
            AgentCouncil::new(AnalysisConfig::default()),
        ))
    }

    /// State whose latest snapshot holds the fixture dataset.
    pub(crate) async fn loaded_state() -> Arc<AppState> {
        let state = state();
        let dataset = crate::dataset::parse_csv("fixture", FIXTURE.as_bytes()).unwrap();
        let report = state.council.analyze_and_recommend(&dataset);
        state.store(dataset, report).await;
        state
    }

    pub(crate) async fn send(state: Arc<AppState>, request: Request<Body>) -> (StatusCode, Value) {
        let response = api_router(state).oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, body)
    }

    pub(crate) fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    pub(crate) fn post(uri: &str, content_type: &str, body: impl Into<Body>) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", content_type)
            .body(body.into())
            .unwrap()
    }
}
