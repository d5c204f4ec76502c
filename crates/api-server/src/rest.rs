//! REST handlers for the dashboard page, its JSON form and operational endpoints.

use crate::page::{render_error_page, render_page};
use crate::service::DashboardService;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::Html;
use axum::Json;
use chrono::{DateTime, Utc};
use resale_core::{DashboardError, DashboardResult};
use resale_reporting::{Dashboard, Metric};
use serde::Serialize;
use std::sync::Arc;
use std::time::Instant;
use tracing::error;

/// Shared application state for REST handlers.
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<DashboardService>,
    pub page_title: String,
    pub start_time: Instant,
}

/// Run a blocking snapshot operation off the async executor.
async fn blocking<F>(state: &AppState, op: F) -> DashboardResult<Arc<Dashboard>>
where
    F: FnOnce(&DashboardService) -> DashboardResult<Arc<Dashboard>> + Send + 'static,
{
    let service = state.service.clone();
    tokio::task::spawn_blocking(move || op(service.as_ref()))
        .await
        .map_err(|e| DashboardError::Internal(e.into()))?
}

/// GET / — the rendered dashboard.
pub async fn index(
    State(state): State<AppState>,
) -> Result<Html<String>, (StatusCode, Html<String>)> {
    metrics::counter!("api.requests", "route" => "index").increment(1);
    let page = blocking(&state, DashboardService::current)
        .await
        .and_then(|dashboard| render_page(&dashboard));

    match page {
        Ok(html) => Ok(Html(html)),
        Err(e) => {
            error!(error = %e, "Dashboard page failed");
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Html(render_error_page(&state.page_title, &e.to_string())),
            ))
        }
    }
}

/// GET /api/dashboard — the dashboard as JSON.
pub async fn get_dashboard(
    State(state): State<AppState>,
) -> Result<Json<Dashboard>, (StatusCode, Json<ErrorResponse>)> {
    metrics::counter!("api.requests", "route" => "dashboard").increment(1);
    blocking(&state, DashboardService::current)
        .await
        .map(|dashboard| Json(dashboard.as_ref().clone()))
        .map_err(|e| load_failed(&e))
}

/// POST /api/reload — re-read the exports into the cached snapshot.
pub async fn reload(
    State(state): State<AppState>,
) -> Result<Json<ReloadResponse>, (StatusCode, Json<ErrorResponse>)> {
    metrics::counter!("api.requests", "route" => "reload").increment(1);
    let dashboard = blocking(&state, DashboardService::reload)
        .await
        .map_err(|e| load_failed(&e))?;

    Ok(Json(ReloadResponse {
        metrics: dashboard.metrics.clone(),
        warnings: dashboard.warnings().into_iter().map(String::from).collect(),
        generated_at: dashboard.generated_at,
    }))
}

fn load_failed(e: &DashboardError) -> (StatusCode, Json<ErrorResponse>) {
    error!(error = %e, "Dashboard load failed");
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorResponse {
            error: "dashboard_load_failed".to_string(),
            message: e.to_string(),
        }),
    )
}

/// GET /health — Health check endpoint.
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        data_dir: state.service.data_dir().display().to_string(),
        uptime_secs: state.start_time.elapsed().as_secs(),
    })
}

/// GET /ready — 200 once the exports have loaded successfully.
pub async fn readiness(State(state): State<AppState>) -> StatusCode {
    if state.service.is_ready() {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    }
}

/// GET /live — Liveness probe.
pub async fn liveness() -> StatusCode {
    StatusCode::OK
}

#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub data_dir: String,
    pub uptime_secs: u64,
}

#[derive(Serialize)]
pub struct ReloadResponse {
    pub metrics: Vec<Metric>,
    pub warnings: Vec<String>,
    pub generated_at: DateTime<Utc>,
}
