//! HTML rendering of a [`Dashboard`]. Charts are drawn client-side by Plotly
//! from the figure JSON embedded in the page.

use maud::{html, Markup, PreEscaped, DOCTYPE};
use resale_core::DashboardResult;
use resale_reporting::{Dashboard, SectionContent};

const PLOTLY_CDN: &str = "https://cdn.plot.ly/plotly-2.35.2.min.js";

const STYLE: &str = "
body {
  font-family: -apple-system, Segoe UI, Roboto, sans-serif;
  margin: 0 auto;
  max-width: 1400px;
  padding: 1.5rem 3rem;
  color: #31333f;
}
h1 { font-size: 2.2rem; }
h2 { font-size: 1.5rem; margin-top: 2.5rem; }
.metrics { display: flex; gap: 2rem; }
.metric { flex: 1; }
.metric-label { font-size: .9rem; }
.metric-value { font-size: 2.2rem; }
.warning { background: #fffce7; color: #926c05; border-radius: .5rem; padding: 1rem; }
.error { background: #ffecec; color: #7d353b; border-radius: .5rem; padding: 1rem; }
.chart { width: 100%; min-height: 450px; }
footer { margin-top: 3rem; font-size: .9rem; }
";

pub fn render_page(dashboard: &Dashboard) -> DashboardResult<String> {
    let mut plots = String::new();
    for (i, section) in dashboard.sections.iter().enumerate() {
        if let SectionContent::Chart(figure) = &section.content {
            plots.push_str(&format!(
                "Plotly.newPlot(\"{}\", {}, {}, {{responsive: true}});\n",
                chart_id(i),
                script_json(&figure.data)?,
                script_json(&figure.layout)?
            ));
        }
    }

    let body = html! {
        h1 { (dashboard.heading) }
        h2 { "Key Metrics" }
        div.metrics {
            @for metric in &dashboard.metrics {
                div.metric {
                    div.metric-label { (metric.label) }
                    div.metric-value { (metric.value) }
                }
            }
        }
        @for (i, section) in dashboard.sections.iter().enumerate() {
            h2 { (section.title) }
            @match &section.content {
                SectionContent::Chart(_) => {
                    div.chart id=(chart_id(i)) {}
                }
                SectionContent::Warning(message) => {
                    div.warning { (message) }
                }
            }
        }
        footer { (dashboard.footer) }
    };

    Ok(document(&dashboard.page_title, body, &plots).into_string())
}

/// Page shown when the exports could not be loaded.
pub fn render_error_page(title: &str, message: &str) -> String {
    let body = html! {
        h1 { (title) }
        div.error { (message) }
    };
    document(title, body, "").into_string()
}

fn document(title: &str, body: Markup, plots: &str) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="utf-8";
                meta name="viewport" content="width=device-width, initial-scale=1";
                title { (title) }
                style { (PreEscaped(STYLE)) }
            }
            body {
                (body)
                @if !plots.is_empty() {
                    script src=(PLOTLY_CDN) {}
                    script { (PreEscaped(plots)) }
                }
            }
        }
    }
}

fn chart_id(index: usize) -> String {
    format!("chart-{index}")
}

/// JSON safe to place inside a `<script>` element.
fn script_json<T: serde::Serialize + ?Sized>(value: &T) -> DashboardResult<String> {
    Ok(serde_json::to_string(value)?.replace('<', "\\u003c"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::write_exports;
    use resale_reporting::DashboardBuilder;

    #[test]
    fn test_page_has_title_metrics_and_charts() {
        let dir = tempfile::tempdir().unwrap();
        let config = write_exports(dir.path());
        let dashboard = DashboardBuilder::new(config.dashboard.clone())
            .load(&config.data)
            .unwrap();
        let html = render_page(&dashboard).unwrap();

        assert!(html.contains("<title>Auto Resale Dashboard</title>"));
        assert!(html.contains("<h1>Auto Resale Marketing &amp; Sales Dashboard</h1>"));
        assert!(html.contains("Total Google + Meta Spend"));
        assert!(html.contains("$50.00"));
        assert_eq!(html.matches("Plotly.newPlot(").count(), 4);
        assert!(html.contains("<footer>Built with Rust</footer>"));
    }

    #[test]
    fn test_warning_sections_render_as_banners() {
        let dir = tempfile::tempdir().unwrap();
        let config = write_exports(dir.path());
        std::fs::write(
            config.data.path_for(resale_core::SourceKind::Clusters),
            "Segment\nA\n",
        )
        .unwrap();
        let dashboard = DashboardBuilder::new(config.dashboard.clone())
            .load(&config.data)
            .unwrap();
        let html = render_page(&dashboard).unwrap();
        assert!(html
            .contains("<div class=\"warning\">Cluster data not found in uploaded file.</div>"));
        assert_eq!(html.matches("Plotly.newPlot(").count(), 3);
    }

    #[test]
    fn test_script_json_cannot_close_script_tag() {
        let json = script_json(&serde_json::json!({"name": "</script><b>"})).unwrap();
        assert!(!json.contains("</script>"));
        assert!(json.contains("\\u003c/script>"));
    }

    #[test]
    fn test_text_from_exports_is_escaped() {
        let dir = tempfile::tempdir().unwrap();
        let config = write_exports(dir.path());
        let mut dashboard = DashboardBuilder::new(config.dashboard.clone())
            .load(&config.data)
            .unwrap();
        dashboard.sections[0].title = "<script>alert(1)</script>".to_string();
        let html = render_page(&dashboard).unwrap();
        assert!(html.contains("<h2>&lt;script&gt;alert(1)&lt;/script&gt;</h2>"));
        assert!(!html.contains("<script>alert(1)"));
    }

    #[test]
    fn test_error_page_escapes_message() {
        let html = render_error_page("Auto Resale Dashboard", "missing <file>");
        assert!(html.contains("missing &lt;file&gt;"));
        assert!(!html.contains("plotly"));
    }
}
