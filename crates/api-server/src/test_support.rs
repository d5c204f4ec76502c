use resale_core::config::AppConfig;
use resale_core::SourceKind;
use std::fs;
use std::path::Path;

/// Write a minimal set of the five exports into `dir`.
pub(crate) fn write_exports(dir: &Path) -> AppConfig {
    let mut config = AppConfig::default();
    config.data.dir = dir.to_path_buf();
    let files = [
        (SourceKind::Crm, "Lead Status Type\nSold\nLost\n"),
        (SourceKind::GoogleAds, "Campaign,Cost,Conversions\nBrand,$40,2\n"),
        (SourceKind::MetaAds, "Ad name,Amount spent (USD),Leads\nReel,$10,1\n"),
        (SourceKind::Clusters, "Cluster,UTM Source\n1,google\n"),
        (SourceKind::Churn, "Churn Rate\n0.1\n"),
    ];
    for (kind, body) in files {
        fs::write(config.data.path_for(kind), body).unwrap();
    }
    config
}
