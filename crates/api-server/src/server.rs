//! API server — serves the dashboard page and its JSON API over HTTP.

use crate::rest::{self, AppState};
use crate::service::DashboardService;
use axum::routing::{get, post};
use axum::Router;
use resale_core::config::AppConfig;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;
use tower_http::compression::CompressionLayer;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

pub struct ApiServer {
    config: AppConfig,
    service: Arc<DashboardService>,
}

impl ApiServer {
    pub fn new(config: AppConfig, service: Arc<DashboardService>) -> Self {
        Self { config, service }
    }

    pub fn router(&self) -> Router {
        let state = AppState {
            service: self.service.clone(),
            page_title: self.config.dashboard.page_title.clone(),
            start_time: Instant::now(),
        };

        Router::new()
            // Dashboard
            .route("/", get(rest::index))
            .route("/api/dashboard", get(rest::get_dashboard))
            .route("/api/reload", post(rest::reload))
            // Operational endpoints
            .route("/health", get(rest::health_check))
            .route("/ready", get(rest::readiness))
            .route("/live", get(rest::liveness))
            // Middleware
            .layer(CompressionLayer::new())
            .layer(CorsLayer::permissive())
            .layer(TraceLayer::new_for_http())
            .with_state(state)
    }

    /// Start the HTTP server. Blocks until shutdown.
    pub async fn start_http(&self) -> anyhow::Result<()> {
        let app = self.router();

        let addr = SocketAddr::new(self.config.api.host.parse()?, self.config.api.http_port);

        info!(addr = %addr, "Starting HTTP server");

        let listener = tokio::net::TcpListener::bind(addr).await?;
        axum::serve(listener, app).await?;

        Ok(())
    }

    /// Start the Prometheus exporter on a separate port.
    pub fn start_metrics(&self) -> anyhow::Result<()> {
        metrics_exporter_prometheus::PrometheusBuilder::new()
            .with_http_listener(SocketAddr::new(
                self.config.api.host.parse()?,
                self.config.metrics.port,
            ))
            .install()?;

        info!(port = self.config.metrics.port, "Metrics exporter started");
        Ok(())
    }
}
