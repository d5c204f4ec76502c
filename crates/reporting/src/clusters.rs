//! Lead counts per cluster, split by UTM source.

use crate::charts::{BarSeries, Figure};
use resale_core::{is_null, DashboardResult, Table};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::HashMap;

pub const CLUSTER_COLUMN: &str = "Cluster";
pub const UTM_SOURCE_COLUMN: &str = "UTM Source";
pub const UNKNOWN_SOURCE: &str = "Unknown";

pub const CLUSTER_WARNING: &str = "Cluster data not found in uploaded file.";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClusterSeries {
    pub source: String,
    /// One count per entry of [`ClusterHistogram::clusters`].
    pub counts: Vec<u64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClusterHistogram {
    pub clusters: Vec<String>,
    pub series: Vec<ClusterSeries>,
}

impl ClusterHistogram {
    /// Count leads per (cluster, source). `None` when the export has no
    /// `Cluster` column.
    pub fn from_table(table: &Table) -> Option<Self> {
        let cluster_idx = table.column_index(CLUSTER_COLUMN)?;
        let source_idx = table.column_index(UTM_SOURCE_COLUMN);

        let mut clusters: Vec<String> = Vec::new();
        let mut sources: Vec<&str> = Vec::new();
        let mut counts: HashMap<(&str, &str), u64> = HashMap::new();
        for row in table.rows() {
            let cluster = row[cluster_idx].trim();
            if is_null(cluster) {
                continue;
            }
            let source = source_idx
                .map(|i| row[i].trim())
                .filter(|s| !is_null(s))
                .unwrap_or(UNKNOWN_SOURCE);

            if !clusters.iter().any(|c| c == cluster) {
                clusters.push(cluster.to_string());
            }
            if !sources.contains(&source) {
                sources.push(source);
            }
            *counts.entry((cluster, source)).or_default() += 1;
        }
        sort_numeric_categories(&mut clusters);

        let series = sources
            .into_iter()
            .map(|source| ClusterSeries {
                source: source.to_string(),
                counts: clusters
                    .iter()
                    .map(|cluster| {
                        counts
                            .get(&(cluster.as_str(), source))
                            .copied()
                            .unwrap_or(0)
                    })
                    .collect(),
            })
            .collect();

        Some(Self { clusters, series })
    }

    pub fn figure(&self) -> DashboardResult<Figure> {
        let series: Vec<BarSeries> = self
            .series
            .iter()
            .map(|s| BarSeries {
                name: s.source.clone(),
                x: self.clusters.clone(),
                y: s.counts.iter().map(|c| *c as f64).collect(),
            })
            .collect();
        Figure::grouped_histogram(CLUSTER_COLUMN, UTM_SOURCE_COLUMN, &series)
    }
}

/// Numeric order when every label is a number. Text labels keep the order
/// they first appear in.
fn sort_numeric_categories(labels: &mut [String]) {
    let numbers: Option<Vec<f64>> = labels.iter().map(|l| l.parse::<f64>().ok()).collect();
    if numbers.is_none() {
        return;
    }
    labels.sort_by(|a, b| {
        let (a, b) = (a.parse::<f64>().unwrap_or(0.0), b.parse::<f64>().unwrap_or(0.0));
        a.partial_cmp(&b).unwrap_or(Ordering::Equal)
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counts_per_cluster_and_source() {
        let table = Table::from_reader(
            "Clustered leads",
            concat!(
                "Lead,Cluster,UTM Source\n",
                "a,10,google\nb,2,facebook\nc,2,google\nd,10,google\ne,,google\nf,2,\n",
            )
            .as_bytes(),
        )
        .unwrap();
        let hist = ClusterHistogram::from_table(&table).unwrap();

        assert_eq!(hist.clusters, vec!["2", "10"]);
        assert_eq!(
            hist.series,
            vec![
                ClusterSeries {
                    source: "google".into(),
                    counts: vec![1, 2]
                },
                ClusterSeries {
                    source: "facebook".into(),
                    counts: vec![1, 0]
                },
                ClusterSeries {
                    source: "Unknown".into(),
                    counts: vec![1, 0]
                },
            ]
        );
        assert_eq!(hist.figure().unwrap().data.len(), 3);
    }

    #[test]
    fn test_text_clusters_keep_first_appearance_order() {
        let table = Table::from_reader(
            "Clustered leads",
            "Cluster,UTM Source\nWarm,google\nCold,google\nHot,bing\nCold,bing\n".as_bytes(),
        )
        .unwrap();
        let hist = ClusterHistogram::from_table(&table).unwrap();
        assert_eq!(hist.clusters, vec!["Warm", "Cold", "Hot"]);
        assert_eq!(hist.series[0].counts, vec![1, 1, 0]);
        assert_eq!(hist.series[1].counts, vec![0, 1, 1]);
    }

    #[test]
    fn test_mixed_labels_are_not_sorted_numerically() {
        let table = Table::from_reader(
            "Clustered leads",
            "Cluster,UTM Source\n10,google\nVIP,google\n2,google\n".as_bytes(),
        )
        .unwrap();
        let hist = ClusterHistogram::from_table(&table).unwrap();
        assert_eq!(hist.clusters, vec!["10", "VIP", "2"]);
    }

    #[test]
    fn test_no_source_column_groups_as_unknown() {
        let table = Table::from_reader("Clustered leads", "Cluster\n1\n1\n".as_bytes()).unwrap();
        let hist = ClusterHistogram::from_table(&table).unwrap();
        assert_eq!(hist.series.len(), 1);
        assert_eq!(hist.series[0].source, UNKNOWN_SOURCE);
        assert_eq!(hist.series[0].counts, vec![2]);
    }

    #[test]
    fn test_missing_cluster_column() {
        let table =
            Table::from_reader("Clustered leads", "Segment,UTM Source\n1,google\n".as_bytes())
                .unwrap();
        assert!(ClusterHistogram::from_table(&table).is_none());
    }
}
