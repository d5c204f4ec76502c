//! The five CSV exports the dashboard is built from.

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceKind {
    Crm,
    GoogleAds,
    MetaAds,
    Clusters,
    Churn,
}

impl SourceKind {
    pub fn display_name(&self) -> &'static str {
        match self {
            SourceKind::Crm => "CRM appointments",
            SourceKind::GoogleAds => "Google Ads",
            SourceKind::MetaAds => "Meta Ads",
            SourceKind::Clusters => "Clustered leads",
            SourceKind::Churn => "Churn summary",
        }
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}
