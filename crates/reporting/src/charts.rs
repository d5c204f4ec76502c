//! Chart figures. Traces and layout are built as `plotly::Plot` values and
//! kept as their `{data, layout}` JSON so the dashboard stays serializable;
//! the page hands that pair to `Plotly.newPlot`.

use plotly::common::Title;
use plotly::layout::{Axis, AxisType, BarMode, Legend};
use plotly::{Bar, Layout, Pie, Plot};
use resale_core::DashboardResult;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Qualitative "Set2" palette.
pub const SET2: [&str; 8] = [
    "rgb(102,194,165)",
    "rgb(252,141,98)",
    "rgb(141,160,203)",
    "rgb(231,138,195)",
    "rgb(166,216,84)",
    "rgb(255,217,47)",
    "rgb(229,196,148)",
    "rgb(179,179,179)",
];

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Figure {
    pub data: Vec<Value>,
    pub layout: Value,
}

/// One colour group in a grouped bar chart.
#[derive(Debug, Clone, PartialEq)]
pub struct BarSeries {
    pub name: String,
    pub x: Vec<String>,
    pub y: Vec<f64>,
}

impl Figure {
    pub fn from_plot(plot: &Plot) -> DashboardResult<Self> {
        let mut spec: Value = serde_json::from_str(&plot.to_json())?;
        let data = match spec.get_mut("data").map(Value::take) {
            Some(Value::Array(traces)) => traces,
            _ => Vec::new(),
        };
        let layout = spec.get_mut("layout").map(Value::take).unwrap_or(Value::Null);
        Ok(Self { data, layout })
    }

    /// Pie chart with a hole of `hole` (0.0 = pie, 0.4 = donut).
    pub fn donut(labels: &[String], values: &[u64], hole: f64) -> DashboardResult<Self> {
        let mut plot = Plot::new();
        plot.add_trace(Pie::new(values.to_vec()).labels(labels.to_vec()).hole(hole));
        plot.set_layout(Layout::new().colorway(SET2.to_vec()));
        Self::from_plot(&plot)
    }

    /// Bars grouped side by side per x category, one trace per series.
    pub fn grouped_bar(
        x_title: &str,
        y_title: &str,
        legend_title: &str,
        series: &[BarSeries],
    ) -> DashboardResult<Self> {
        let plot = bar_plot(series, bar_layout(x_title, y_title, legend_title));
        Self::from_plot(&plot)
    }

    /// Grouped histogram over pre-counted categories.
    pub fn grouped_histogram(
        x_title: &str,
        legend_title: &str,
        series: &[BarSeries],
    ) -> DashboardResult<Self> {
        let layout = bar_layout(x_title, "count", legend_title).bar_gap(0.2);
        Self::from_plot(&bar_plot(series, layout))
    }
}

fn bar_plot(series: &[BarSeries], layout: Layout) -> Plot {
    let mut plot = Plot::new();
    for s in series {
        plot.add_trace(Bar::new(s.x.clone(), s.y.clone()).name(s.name.as_str()));
    }
    plot.set_layout(layout);
    plot
}

fn bar_layout(x_title: &str, y_title: &str, legend_title: &str) -> Layout {
    Layout::new()
        .bar_mode(BarMode::Group)
        .x_axis(
            Axis::new()
                .title(Title::with_text(x_title))
                .type_(AxisType::Category),
        )
        .y_axis(Axis::new().title(Title::with_text(y_title)))
        .legend(Legend::new().title(Title::with_text(legend_title)))
}
