//! Marketing and sales reporting — lead KPIs, sale outcome, cost per
//! acquisition, lead clusters and churn summaries.

pub mod charts;
pub mod churn;
pub mod clusters;
pub mod cpa;
pub mod dashboard;
pub mod kpi;
pub mod outcome;

pub use charts::Figure;
pub use dashboard::{Dashboard, DashboardBuilder, DataSources, Section, SectionContent};
pub use kpi::{format_currency, KeyMetrics, Metric};
