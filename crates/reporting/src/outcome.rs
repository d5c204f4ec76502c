//! Won vs Lost split of CRM leads.

use crate::charts::Figure;
use crate::kpi::{LEAD_STATUS_COLUMN, SOLD_STATUS};
use resale_core::{DashboardResult, Table};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

const DONUT_HOLE: f64 = 0.4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum SaleStatus {
    Won,
    Lost,
}

impl SaleStatus {
    /// Any status other than an exact "Sold" counts as lost, blanks included.
    pub fn classify(lead_status: &str) -> Self {
        if lead_status == SOLD_STATUS {
            SaleStatus::Won
        } else {
            SaleStatus::Lost
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            SaleStatus::Won => "Won",
            SaleStatus::Lost => "Lost",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutcomeCount {
    pub status: SaleStatus,
    pub count: u64,
}

/// Per-status lead counts, largest first. Ties are ordered by label and
/// statuses with no leads are left out.
pub fn sale_outcomes(crm: &Table) -> DashboardResult<Vec<OutcomeCount>> {
    let mut counts: HashMap<SaleStatus, u64> = HashMap::new();
    for status in crm.column(LEAD_STATUS_COLUMN)? {
        *counts.entry(SaleStatus::classify(status)).or_default() += 1;
    }

    let mut outcomes: Vec<OutcomeCount> = counts
        .into_iter()
        .map(|(status, count)| OutcomeCount { status, count })
        .collect();
    outcomes.sort_by(|a, b| {
        b.count
            .cmp(&a.count)
            .then_with(|| a.status.label().cmp(b.status.label()))
    });
    Ok(outcomes)
}

pub fn outcome_figure(outcomes: &[OutcomeCount]) -> DashboardResult<Figure> {
    let labels: Vec<String> = outcomes.iter().map(|o| o.status.label().to_string()).collect();
    let values: Vec<u64> = outcomes.iter().map(|o| o.count).collect();
    Figure::donut(&labels, &values, DONUT_HOLE)
}
