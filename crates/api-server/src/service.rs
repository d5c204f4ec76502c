//! Dashboard snapshot holder shared by the HTTP handlers and the CLI.

use parking_lot::RwLock;
use resale_core::config::{AppConfig, DataConfig};
use resale_core::DashboardResult;
use resale_reporting::{Dashboard, DashboardBuilder};
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;
use tracing::{error, info};

pub struct DashboardService {
    builder: DashboardBuilder,
    data: DataConfig,
    reload_each_request: bool,
    snapshot: RwLock<Option<Arc<Dashboard>>>,
    last_error: RwLock<Option<String>>,
}

impl DashboardService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            builder: DashboardBuilder::new(config.dashboard.clone()),
            data: config.data.clone(),
            reload_each_request: config.dashboard.reload_each_request,
            snapshot: RwLock::new(None),
            last_error: RwLock::new(None),
        }
    }

    /// Re-read every export and replace the cached snapshot.
    pub fn reload(&self) -> DashboardResult<Arc<Dashboard>> {
        let started = Instant::now();
        match self.builder.load(&self.data) {
            Ok(dashboard) => {
                let dashboard = Arc::new(dashboard);
                *self.snapshot.write() = Some(dashboard.clone());
                *self.last_error.write() = None;
                metrics::counter!("dashboard.loads").increment(1);
                info!(
                    data_dir = %self.data.dir.display(),
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    warnings = dashboard.warnings().len(),
                    "Dashboard data loaded"
                );
                Ok(dashboard)
            }
            Err(e) => {
                error!(
                    error = %e,
                    data_dir = %self.data.dir.display(),
                    "Failed to load dashboard data"
                );
                metrics::counter!("dashboard.load_errors").increment(1);
                *self.last_error.write() = Some(e.to_string());
                Err(e)
            }
        }
    }

    /// The dashboard to show for one page view. Reloads from disk unless
    /// snapshots are cached and one is already present.
    pub fn current(&self) -> DashboardResult<Arc<Dashboard>> {
        if !self.reload_each_request {
            if let Some(dashboard) = self.snapshot.read().clone() {
                return Ok(dashboard);
            }
        }
        self.reload()
    }

    /// True once a load has succeeded and no later load has failed.
    pub fn is_ready(&self) -> bool {
        self.snapshot.read().is_some() && self.last_error.read().is_none()
    }

    pub fn last_error(&self) -> Option<String> {
        self.last_error.read().clone()
    }

    pub fn data_dir(&self) -> &Path {
        &self.data.dir
    }
}
