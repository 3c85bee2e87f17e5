//! Static HTML dashboard: one section per dataset, each with an inline SVG
//! chart and a collapsible table of the plotted values.

use crate::domain::{DashboardSnapshot, Dataset};
use crate::error::AppError;
use crate::plot::LineChart;

pub const PAGE_TITLE: &str = "Israel Trade Dashboard";
pub const X_AXIS_TITLE: &str = "Month";

const STYLE: &str = "\
body{font-family:-apple-system,'Segoe UI',Helvetica,Arial,sans-serif;margin:0 auto;max-width:1080px;padding:16px;color:#2a3f5f;background:#fff}\
h2{text-align:center}\
section{margin:32px 0}\
svg{max-width:100%;height:auto}\
.hover-band:hover{fill-opacity:.08}\
table{border-collapse:collapse;font-size:13px}\
th,td{padding:2px 8px;text-align:right;border-bottom:1px solid #e8ecf2}\
th:first-child,td:first-child{text-align:left}\
.empty{color:#888;font-style:italic}\
footer{color:#888;font-size:12px;text-align:center}";

/// Render the whole page for a snapshot.
pub fn render_dashboard(snapshot: &DashboardSnapshot) -> Result<String, AppError> {
    let mut out = String::new();
    out.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n");
    out.push_str("<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n");
    out.push_str(&format!("<title>{}</title>\n", escape_html(PAGE_TITLE)));
    out.push_str(&format!("<style>{STYLE}</style>\n</head>\n<body>\n"));
    out.push_str(&format!("<h2>{}</h2>\n", escape_html(PAGE_TITLE)));

    for (idx, dataset) in snapshot.datasets.iter().enumerate() {
        out.push_str(&render_section(idx + 1, dataset)?);
    }

    out.push_str(&format!(
        "<footer>Source: Central Bureau of Statistics. Snapshot fetched {}.</footer>\n",
        snapshot.fetched_at.format("%Y-%m-%d %H:%M UTC")
    ));
    out.push_str("</body>\n</html>\n");
    Ok(out)
}

fn render_section(number: usize, dataset: &Dataset) -> Result<String, AppError> {
    let spec = &dataset.spec;
    let table = &dataset.table;

    let mut out = String::new();
    out.push_str(&format!("<section id=\"{}\">\n", escape_html(spec.key)));
    out.push_str(&format!("<h4>{number}. {}</h4>\n", escape_html(spec.title)));

    match LineChart::from_table(table, X_AXIS_TITLE, spec.y_title) {
        Some(chart) => {
            out.push_str(&chart.render_svg()?);
            out.push('\n');
        }
        None => out.push_str("<p class=\"empty\">No overlapping observations for this dataset.</p>\n"),
    }

    if !table.is_empty() {
        out.push_str(&format!("<details>\n<summary>Data ({} months)</summary>\n", table.len()));
        out.push_str("<table>\n<thead><tr><th>Period</th>");
        for label in table.labels() {
            out.push_str(&format!("<th>{}</th>", escape_html(label)));
        }
        out.push_str("</tr></thead>\n<tbody>\n");
        for (idx, period) in table.periods.iter().enumerate() {
            out.push_str(&format!("<tr><td>{}</td>", period.format("%Y-%m")));
            for value in table.row(idx) {
                out.push_str(&format!("<td>{value:.3}</td>"));
            }
            out.push_str("</tr>\n");
        }
        out.push_str("</tbody>\n</table>\n</details>\n");
    }

    out.push_str("</section>\n");
    Ok(out)
}

pub fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}
