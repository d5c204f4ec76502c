//! Churn summary reshaped from wide to long form.

use crate::charts::{BarSeries, Figure};
use resale_core::{parse_amount, DashboardResult, Table};
use serde::{Deserialize, Serialize};

/// One cell of the churn summary: original row position, column name and value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChurnPoint {
    pub index: usize,
    pub metric: String,
    /// `None` when the cell is blank or not a number.
    pub value: Option<f64>,
    pub raw: String,
}

/// Melt every column into `(index, metric, value)` points, column by column.
pub fn melt(table: &Table) -> Vec<ChurnPoint> {
    let mut points = Vec::with_capacity(table.len() * table.headers().len());
    for (col, metric) in table.headers().iter().enumerate() {
        for (index, row) in table.rows().iter().enumerate() {
            let raw = &row[col];
            points.push(ChurnPoint {
                index,
                metric: metric.clone(),
                value: parse_amount(raw).ok().flatten(),
                raw: raw.clone(),
            });
        }
    }
    points
}

/// Grouped bars: x is the row index, one colour per metric. Non-numeric
/// points are left out of the chart.
pub fn churn_figure(points: &[ChurnPoint]) -> DashboardResult<Figure> {
    let mut series: Vec<BarSeries> = Vec::new();
    for point in points {
        let Some(value) = point.value else { continue };
        let idx = match series.iter().position(|s| s.name == point.metric) {
            Some(idx) => idx,
            None => {
                series.push(BarSeries {
                    name: point.metric.clone(),
                    x: Vec::new(),
                    y: Vec::new(),
                });
                series.len() - 1
            }
        };
        series[idx].x.push(point.index.to_string());
        series[idx].y.push(value);
    }
    Figure::grouped_bar("index", "Value", "Metric", &series)
}
