use crate::error::DashboardResult;
use crate::source::SourceKind;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Root application configuration. Loaded from an optional TOML file and
/// environment variables with the prefix `AUTO_RESALE__`.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub metrics: MetricsConfig,
    #[serde(default)]
    pub data: DataConfig,
    #[serde(default)]
    pub dashboard: DashboardConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_http_port")]
    pub http_port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MetricsConfig {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default = "default_metrics_port")]
    pub port: u16,
}

/// Location of the five CSV exports.
#[derive(Debug, Clone, Deserialize)]
pub struct DataConfig {
    #[serde(default = "default_data_dir")]
    pub dir: PathBuf,
    #[serde(default = "default_crm_file")]
    pub crm_file: String,
    #[serde(default = "default_google_ads_file")]
    pub google_ads_file: String,
    #[serde(default = "default_meta_ads_file")]
    pub meta_ads_file: String,
    #[serde(default = "default_clusters_file")]
    pub clusters_file: String,
    #[serde(default = "default_churn_file")]
    pub churn_file: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DashboardConfig {
    /// Re-read every CSV on each page view instead of serving the cached snapshot.
    #[serde(default = "default_reload_each_request")]
    pub reload_each_request: bool,
    #[serde(default = "default_page_title")]
    pub page_title: String,
    #[serde(default = "default_heading")]
    pub heading: String,
    #[serde(default = "default_footer")]
    pub footer: String,
}

// Default functions
fn default_host() -> String {
    "0.0.0.0".to_string()
}
fn default_http_port() -> u16 {
    8501
}
fn default_metrics_port() -> u16 {
    9091
}
fn default_data_dir() -> PathBuf {
    PathBuf::from(".")
}
fn default_crm_file() -> String {
    "Cleaned_CRM_Appointments_Merged.csv".to_string()
}
fn default_google_ads_file() -> String {
    "Google_Ads.csv".to_string()
}
fn default_meta_ads_file() -> String {
    "Cleaned_Meta_Ads.csv".to_string()
}
fn default_clusters_file() -> String {
    "Clustered_Leads.csv".to_string()
}
fn default_churn_file() -> String {
    "Churn_Summary_Insights.csv".to_string()
}
fn default_reload_each_request() -> bool {
    true
}
fn default_page_title() -> String {
    "Auto Resale Dashboard".to_string()
}
fn default_heading() -> String {
    "Auto Resale Marketing & Sales Dashboard".to_string()
}
fn default_footer() -> String {
    "Built with Rust".to_string()
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            http_port: default_http_port(),
        }
    }
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            port: default_metrics_port(),
        }
    }
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            dir: default_data_dir(),
            crm_file: default_crm_file(),
            google_ads_file: default_google_ads_file(),
            meta_ads_file: default_meta_ads_file(),
            clusters_file: default_clusters_file(),
            churn_file: default_churn_file(),
        }
    }
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            reload_each_request: default_reload_each_request(),
            page_title: default_page_title(),
            heading: default_heading(),
            footer: default_footer(),
        }
    }
}

impl DataConfig {
    /// Full path of the export backing `kind`.
    pub fn path_for(&self, kind: SourceKind) -> PathBuf {
        let file = match kind {
            SourceKind::Crm => &self.crm_file,
            SourceKind::GoogleAds => &self.google_ads_file,
            SourceKind::MetaAds => &self.meta_ads_file,
            SourceKind::Clusters => &self.clusters_file,
            SourceKind::Churn => &self.churn_file,
        };
        self.dir.join(file)
    }
}

impl AppConfig {
    /// Load configuration from an optional TOML file, then environment variables.
    /// Environment values win over file values.
    pub fn load(file: Option<&Path>) -> DashboardResult<Self> {
        let mut builder = config::Config::builder();

        if let Some(path) = file {
            builder = builder.add_source(config::File::from(path).required(true));
        }

        let builder = builder.add_source(
            config::Environment::with_prefix("AUTO_RESALE")
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        );

        let config = builder.build()?;
        Ok(config.try_deserialize()?)
    }
}
