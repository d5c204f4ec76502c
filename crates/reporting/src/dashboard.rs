//! Dashboard assembly — loads the five exports and lays out metrics and charts.

use crate::charts::Figure;
use crate::churn::{churn_figure, melt};
use crate::clusters::{ClusterHistogram, CLUSTER_WARNING};
use crate::cpa::{cpa_figure, cpa_rows, CPA_WARNING};
use crate::kpi::{KeyMetrics, Metric};
use crate::outcome::{outcome_figure, sale_outcomes};
use chrono::{DateTime, Utc};
use resale_core::config::{DashboardConfig, DataConfig};
use resale_core::{DashboardError, DashboardResult, SourceKind, Table};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

pub const SECTION_OUTCOME: &str = "Sales Outcome (Won vs Lost)";
pub const SECTION_CPA: &str = "Cost Per Acquisition by Campaign";
pub const SECTION_CLUSTERS: &str = "Lead Clusters";
pub const SECTION_CHURN: &str = "Churn Summary Insights";

/// The five exports, loaded once per render.
#[derive(Debug, Clone)]
pub struct DataSources {
    pub crm: Table,
    pub google_ads: Table,
    pub meta_ads: Table,
    pub clusters: Table,
    pub churn: Table,
}

impl DataSources {
    pub fn load(config: &DataConfig) -> DashboardResult<Self> {
        let load = |kind: SourceKind| {
            let table = Table::from_path(kind, &config.path_for(kind))?;
            if table.is_empty() {
                warn!(table = %kind, "Export has no data rows");
            }
            Ok::<_, DashboardError>(table)
        };
        Ok(Self {
            crm: load(SourceKind::Crm)?,
            google_ads: load(SourceKind::GoogleAds)?,
            meta_ads: load(SourceKind::MetaAds)?,
            clusters: load(SourceKind::Clusters)?,
            churn: load(SourceKind::Churn)?,
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum SectionContent {
    Chart(Figure),
    Warning(String),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Section {
    pub title: String,
    pub content: SectionContent,
}

impl Section {
    fn chart(title: &str, figure: Figure) -> Self {
        Self {
            title: title.to_string(),
            content: SectionContent::Chart(figure),
        }
    }

    fn warning(title: &str, message: &str) -> Self {
        warn!(section = title, warning = message, "Dashboard section not displayed");
        metrics::counter!("dashboard.warnings", "section" => title.to_string()).increment(1);
        Self {
            title: title.to_string(),
            content: SectionContent::Warning(message.to_string()),
        }
    }

    pub fn warning_message(&self) -> Option<&str> {
        match &self.content {
            SectionContent::Warning(msg) => Some(msg.as_str()),
            SectionContent::Chart(_) => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Dashboard {
    pub page_title: String,
    pub heading: String,
    pub key_metrics: KeyMetrics,
    pub metrics: Vec<Metric>,
    pub sections: Vec<Section>,
    pub footer: String,
    pub generated_at: DateTime<Utc>,
}

impl Dashboard {
    pub fn warnings(&self) -> Vec<&str> {
        self.sections.iter().filter_map(Section::warning_message).collect()
    }

    pub fn section(&self, title: &str) -> Option<&Section> {
        self.sections.iter().find(|s| s.title == title)
    }
}

pub struct DashboardBuilder {
    config: DashboardConfig,
}

impl DashboardBuilder {
    pub fn new(config: DashboardConfig) -> Self {
        Self { config }
    }

    /// Read every export from disk and build the dashboard.
    pub fn load(&self, data: &DataConfig) -> DashboardResult<Dashboard> {
        let sources = DataSources::load(data)?;
        self.build(&sources)
    }

    pub fn build(&self, sources: &DataSources) -> DashboardResult<Dashboard> {
        let key_metrics =
            KeyMetrics::compute(&sources.crm, &sources.google_ads, &sources.meta_ads)?;

        let mut sections = Vec::with_capacity(4);
        sections.push(Section::chart(
            SECTION_OUTCOME,
            outcome_figure(&sale_outcomes(&sources.crm)?)?,
        ));

        sections.push(match cpa_rows(&sources.google_ads, &sources.meta_ads)? {
            Some(rows) => Section::chart(SECTION_CPA, cpa_figure(&rows)?),
            None => Section::warning(SECTION_CPA, CPA_WARNING),
        });

        sections.push(match ClusterHistogram::from_table(&sources.clusters) {
            Some(hist) => Section::chart(SECTION_CLUSTERS, hist.figure()?),
            None => Section::warning(SECTION_CLUSTERS, CLUSTER_WARNING),
        });

        sections.push(Section::chart(
            SECTION_CHURN,
            churn_figure(&melt(&sources.churn))?,
        ));

        info!(
            total_leads = key_metrics.total_leads,
            total_sold = key_metrics.total_sold,
            total_spend = key_metrics.total_spend(),
            "Dashboard built"
        );

        Ok(Dashboard {
            page_title: self.config.page_title.clone(),
            heading: self.config.heading.clone(),
            metrics: key_metrics.metrics(),
            key_metrics,
            sections,
            footer: self.config.footer.clone(),
            generated_at: Utc::now(),
        })
    }
}

impl Default for DashboardBuilder {
    fn default() -> Self {
        Self::new(DashboardConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    const CRM: &str = "Name,Lead Status Type\nAna,Sold\nBo,Lost\nCy,Sold\nDi,No Show\n";
    const GOOGLE: &str = " Campaign ,Cost,Conversions\nBrand,\"$1,000.00\",10\nGeneric,$250.50,0\n";
    const META: &str = "Ad name,Amount spent (USD),Leads\nCarousel,$300,6\n";
    const CLUSTERS: &str = "Cluster,UTM Source\n0,google\n1,facebook\n0,facebook\n";
    const CHURN: &str = "Churn Rate,Lost Customers\n0.1,12\n0.2,30\n";

    fn write_exports(dir: &std::path::Path, clusters: &str, meta: &str) -> DataConfig {
        let config = DataConfig {
            dir: dir.to_path_buf(),
            ..DataConfig::default()
        };
        fs::write(config.path_for(SourceKind::Crm), CRM).unwrap();
        fs::write(config.path_for(SourceKind::GoogleAds), GOOGLE).unwrap();
        fs::write(config.path_for(SourceKind::MetaAds), meta).unwrap();
        fs::write(config.path_for(SourceKind::Clusters), clusters).unwrap();
        fs::write(config.path_for(SourceKind::Churn), CHURN).unwrap();
        config
    }

    #[test]
    fn test_full_dashboard() {
        let dir = tempfile::tempdir().unwrap();
        let data = write_exports(dir.path(), CLUSTERS, META);
        let dashboard = DashboardBuilder::default().load(&data).unwrap();

        assert_eq!(dashboard.page_title, "Auto Resale Dashboard");
        assert_eq!(dashboard.key_metrics.total_leads, 4);
        assert_eq!(dashboard.key_metrics.total_sold, 2);
        assert_eq!(dashboard.metrics[2].value, "$1,550.50");

        let titles: Vec<&str> = dashboard.sections.iter().map(|s| s.title.as_str()).collect();
        assert_eq!(
            titles,
            vec![SECTION_OUTCOME, SECTION_CPA, SECTION_CLUSTERS, SECTION_CHURN]
        );
        assert!(dashboard.warnings().is_empty());

        let SectionContent::Chart(cpa) = &dashboard.section(SECTION_CPA).unwrap().content else {
            panic!("expected CPA chart");
        };
        assert_eq!(cpa.data[0]["y"], serde_json::json!([100.0]));
        assert_eq!(cpa.data[1]["y"], serde_json::json!([50.0]));
    }

    #[test]
    fn test_guard_clauses_become_warnings() {
        let dir = tempfile::tempdir().unwrap();
        let data = write_exports(
            dir.path(),
            "Segment,UTM Source\nA,google\n",
            "Placement,Amount spent (USD)\nFeed,$10\n",
        );
        let dashboard = DashboardBuilder::default().load(&data).unwrap();
        assert_eq!(dashboard.warnings(), vec![CPA_WARNING, CLUSTER_WARNING]);
        assert_eq!(dashboard.sections.len(), 4);
        assert_eq!(dashboard.metrics[2].value, "$1,260.50");
    }

    #[test]
    fn test_missing_export_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let data = write_exports(dir.path(), CLUSTERS, META);
        fs::remove_file(data.path_for(SourceKind::Churn)).unwrap();

        let err = DashboardBuilder::default().load(&data).unwrap_err();
        assert!(matches!(err, resale_core::DashboardError::SourceNotFound { .. }));
    }

    #[test]
    fn test_serializes_sections_with_kind_tag() {
        let dir = tempfile::tempdir().unwrap();
        let data = write_exports(dir.path(), "Segment\nA\n", META);
        let dashboard = DashboardBuilder::default().load(&data).unwrap();
        let json = serde_json::to_value(&dashboard).unwrap();
        assert_eq!(json["sections"][2]["content"]["kind"], "warning");
        assert_eq!(json["sections"][0]["content"]["kind"], "chart");
    }
}
