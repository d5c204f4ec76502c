//! Headline numbers: lead volume, closed sales and combined ad spend.

use resale_core::{DashboardResult, Table};
use serde::{Deserialize, Serialize};

pub const LEAD_STATUS_COLUMN: &str = "Lead Status Type";
pub const SOLD_STATUS: &str = "Sold";
pub const GOOGLE_COST_COLUMN: &str = "Cost";
pub const META_SPEND_COLUMN: &str = "Amount spent (USD)";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeyMetrics {
    pub total_leads: u64,
    pub total_sold: u64,
    pub google_spend: f64,
    pub meta_spend: f64,
}

/// A labelled value as shown in the metrics row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Metric {
    pub label: String,
    pub value: String,
}

impl KeyMetrics {
    pub fn compute(crm: &Table, google_ads: &Table, meta_ads: &Table) -> DashboardResult<Self> {
        let total_sold = crm
            .column(LEAD_STATUS_COLUMN)?
            .into_iter()
            .filter(|status| *status == SOLD_STATUS)
            .count() as u64;

        Ok(Self {
            total_leads: crm.len() as u64,
            total_sold,
            google_spend: sum_present(&google_ads.numeric_column(GOOGLE_COST_COLUMN)?),
            meta_spend: sum_present(&meta_ads.numeric_column(META_SPEND_COLUMN)?),
        })
    }

    pub fn total_spend(&self) -> f64 {
        self.google_spend + self.meta_spend
    }

    pub fn metrics(&self) -> Vec<Metric> {
        vec![
            Metric {
                label: "Total Leads".to_string(),
                value: self.total_leads.to_string(),
            },
            Metric {
                label: "Total Sold".to_string(),
                value: self.total_sold.to_string(),
            },
            Metric {
                label: "Total Google + Meta Spend".to_string(),
                value: format_currency(self.total_spend()),
            },
        ]
    }
}

/// Sum ignoring missing values.
pub fn sum_present(values: &[Option<f64>]) -> f64 {
    values.iter().flatten().sum()
}

/// `$12,345.60` style formatting with thousands separators and two decimals.
pub fn format_currency(amount: f64) -> String {
    let fixed = format!("{:.2}", amount.abs());
    let (whole, cents) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, digit) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    let sign = if amount < 0.0 && fixed != "0.00" { "-" } else { "" };
    format!("{sign}${grouped}.{cents}")
}
