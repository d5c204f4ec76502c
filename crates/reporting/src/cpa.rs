//! Cost per acquisition by campaign across Google and Meta.
//!
//! Neither ads export has a stable campaign column name, so the columns are
//! detected from the headers. When detection fails the chart is replaced by
//! a warning instead of failing the whole dashboard.

use crate::charts::{BarSeries, Figure};
use crate::kpi::{GOOGLE_COST_COLUMN, META_SPEND_COLUMN};
use resale_core::{is_null, DashboardResult, Table};
use serde::{Deserialize, Serialize};

pub const GOOGLE_CONVERSIONS_COLUMN: &str = "Conversions";

/// Accepted names for the Meta leads column.
pub const META_LEADS_COLUMNS: [&str; 4] =
    ["Leads", "Results", "Leads (form)", "Leads (conversion)"];

pub const CPA_WARNING: &str =
    "Campaign name or leads column missing from Google or Meta Ads data. CPA chart not displayed.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AdSource {
    Google,
    Meta,
}

impl AdSource {
    pub fn label(&self) -> &'static str {
        match self {
            AdSource::Google => "Google",
            AdSource::Meta => "Meta",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CpaRow {
    pub campaign: String,
    pub cpa: f64,
    pub source: AdSource,
}

/// Header names resolved for one CPA computation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CpaColumns {
    pub google_campaign: String,
    pub meta_campaign: String,
    pub meta_leads: String,
}

impl CpaColumns {
    /// Returns `None` when any required column cannot be found.
    pub fn detect(google_ads: &Table, meta_ads: &Table) -> Option<Self> {
        if !google_ads.has_column(GOOGLE_CONVERSIONS_COLUMN) {
            return None;
        }
        let google_campaign = google_ads.find_column(|h| h.to_lowercase().contains("campaign"))?;
        let meta_campaign = meta_ads.find_column(|h| {
            let lower = h.to_lowercase();
            lower.contains("campaign") || lower.contains("ad name")
        })?;
        let meta_leads = meta_ads.find_column(|h| META_LEADS_COLUMNS.contains(&h))?;

        Some(Self {
            google_campaign: google_campaign.to_string(),
            meta_campaign: meta_campaign.to_string(),
            meta_leads: meta_leads.to_string(),
        })
    }
}

/// Spend divided by acquisitions. Zero or missing acquisitions give `None`.
pub fn cost_per_acquisition(spend: Option<f64>, acquisitions: Option<f64>) -> Option<f64> {
    match (spend, acquisitions) {
        (Some(spend), Some(acq)) if acq != 0.0 => Some(spend / acq),
        _ => None,
    }
}

/// CPA rows, Google first then Meta, with incomplete rows dropped.
/// `Ok(None)` means the columns needed for the chart are absent.
pub fn cpa_rows(google_ads: &Table, meta_ads: &Table) -> DashboardResult<Option<Vec<CpaRow>>> {
    let Some(columns) = CpaColumns::detect(google_ads, meta_ads) else {
        return Ok(None);
    };

    let mut rows = source_rows(
        google_ads,
        AdSource::Google,
        &columns.google_campaign,
        GOOGLE_COST_COLUMN,
        GOOGLE_CONVERSIONS_COLUMN,
    )?;
    rows.extend(source_rows(
        meta_ads,
        AdSource::Meta,
        &columns.meta_campaign,
        META_SPEND_COLUMN,
        &columns.meta_leads,
    )?);
    Ok(Some(rows))
}

fn source_rows(
    table: &Table,
    source: AdSource,
    campaign_column: &str,
    spend_column: &str,
    acquisitions_column: &str,
) -> DashboardResult<Vec<CpaRow>> {
    let campaigns = table.column(campaign_column)?;
    let spend = table.numeric_column(spend_column)?;
    let acquisitions = table.numeric_column(acquisitions_column)?;

    Ok(campaigns
        .into_iter()
        .zip(spend)
        .zip(acquisitions)
        .filter_map(|((campaign, spend), acq)| {
            if is_null(campaign) {
                return None;
            }
            let cpa = cost_per_acquisition(spend, acq)?;
            Some(CpaRow {
                campaign: campaign.to_string(),
                cpa,
                source,
            })
        })
        .collect())
}

pub fn cpa_figure(rows: &[CpaRow]) -> DashboardResult<Figure> {
    let series: Vec<BarSeries> = [AdSource::Google, AdSource::Meta]
        .into_iter()
        .filter_map(|source| {
            let (x, y): (Vec<String>, Vec<f64>) = rows
                .iter()
                .filter(|r| r.source == source)
                .map(|r| (r.campaign.clone(), r.cpa))
                .unzip();
            (!x.is_empty()).then(|| BarSeries {
                name: source.label().to_string(),
                x,
                y,
            })
        })
        .collect();

    Figure::grouped_bar("Campaign Name", "CPA", "Source", &series)
}
