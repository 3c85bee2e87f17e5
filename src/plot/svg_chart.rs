//! Plotters-powered line charts rendered to inline SVG.
//!
//! Periods are plotted on a continuous month-index axis (`year * 12 + month0`)
//! and formatted back to `YYYY-MM` for tick labels, which keeps the chart on
//! plain `f64` coordinates.
//!
//! After plotters has drawn the chart, one transparent full-height band per
//! period is appended to the SVG. Each band carries a `<title>` listing every
//! line's value at that period, so hovering anywhere above a month shows the
//! same unified tooltip across lines.

use chrono::{Datelike, NaiveDate};
use plotters::prelude::*;

use crate::domain::MergedTable;
use crate::error::{AppError, ErrorKind};

pub const DEFAULT_WIDTH: u32 = 1000;
pub const DEFAULT_HEIGHT: u32 = 450;

const PALETTE: [RGBColor; 8] = [
    RGBColor(99, 110, 250),
    RGBColor(239, 85, 59),
    RGBColor(0, 204, 150),
    RGBColor(171, 99, 250),
    RGBColor(255, 161, 90),
    RGBColor(25, 211, 243),
    RGBColor(255, 102, 146),
    RGBColor(182, 232, 128),
];
const GRID: RGBColor = RGBColor(232, 236, 242);
const AXIS: RGBColor = RGBColor(68, 68, 68);

/// Half a month on each side keeps the edge markers inside the plot area.
const X_EDGE_PAD: f64 = 0.5;

/// One labeled line.
pub struct ChartLine<'a> {
    pub label: &'a str,
    pub points: Vec<(f64, f64)>,
}

/// A render-only chart description; bounds and series are computed up front.
pub struct LineChart<'a> {
    pub lines: Vec<ChartLine<'a>>,
    pub x_bounds: [f64; 2],
    pub y_bounds: [f64; 2],
    pub x_label: &'a str,
    pub y_label: &'a str,
    pub fmt_x: fn(f64) -> String,
    pub fmt_y: fn(f64) -> String,
    pub width: u32,
    pub height: u32,
}

impl<'a> LineChart<'a> {
    /// Build a chart with one line per column. Returns `None` for a table
    /// without rows.
    pub fn from_table(table: &'a MergedTable, x_label: &'a str, y_label: &'a str) -> Option<Self> {
        let first = *table.periods.first()?;
        let last = *table.periods.last()?;
        let (lo, hi) = table.value_range()?;

        let xs: Vec<f64> = table.periods.iter().map(|p| month_index(*p)).collect();
        let lines = table
            .columns
            .iter()
            .map(|c| ChartLine {
                label: c.label.as_str(),
                points: xs.iter().copied().zip(c.values.iter().copied()).collect(),
            })
            .collect();

        Some(Self {
            lines,
            x_bounds: [month_index(first) - X_EDGE_PAD, month_index(last) + X_EDGE_PAD],
            y_bounds: pad_bounds(lo, hi, 0.05, 1.0),
            x_label,
            y_label,
            fmt_x: month_label,
            fmt_y: |v| format!("{v:.1}"),
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
        })
    }

    /// Draw the chart and return the SVG document, hover bands included.
    pub fn render_svg(&self) -> Result<String, AppError> {
        let mut svg = String::new();
        let bands = self
            .draw(&mut svg)
            .map_err(|e| AppError::new(ErrorKind::Render, format!("Failed to draw chart: {e}")))?;

        let close = svg
            .rfind("</svg>")
            .ok_or_else(|| AppError::new(ErrorKind::Render, "Chart backend produced no closing </svg> tag."))?;
        let overlay: String = bands.iter().map(HoverBand::to_svg).collect();
        svg.insert_str(close, &overlay);
        Ok(svg)
    }

    /// Tooltip text for the `idx`-th x position: the period, then one line per series.
    fn hover_text(&self, idx: usize, x: f64) -> String {
        let mut text = (self.fmt_x)(x);
        for line in &self.lines {
            if let Some(&(_, y)) = line.points.get(idx) {
                text.push_str(&format!("\n{}: {y:.3}", line.label));
            }
        }
        text
    }

    fn draw(&self, svg: &mut String) -> Result<Vec<HoverBand>, Box<dyn std::error::Error>> {
        let [x0, x1] = self.x_bounds;
        let [y0, y1] = self.y_bounds;
        if !(x0.is_finite() && x1.is_finite() && y0.is_finite() && y1.is_finite()) || x1 <= x0 || y1 <= y0 {
            return Err(format!("invalid chart bounds x={x0}..{x1} y={y0}..{y1}").into());
        }

        let root = SVGBackend::with_string(svg, (self.width, self.height)).into_drawing_area();
        root.fill(&WHITE)?;

        let mut chart = ChartBuilder::on(&root)
            .margin(16)
            .set_label_area_size(LabelAreaPosition::Left, 64)
            .set_label_area_size(LabelAreaPosition::Bottom, 48)
            .build_cartesian_2d(x0..x1, y0..y1)?;

        // Whole months only; fewer ticks than months on short ranges.
        let x_ticks = ((x1 - x0).round() as usize + 1).clamp(2, 10);

        chart
            .configure_mesh()
            .disable_x_mesh()
            .x_desc(self.x_label)
            .y_desc(self.y_label)
            .x_labels(x_ticks)
            .y_labels(8)
            .x_label_formatter(&|v| (self.fmt_x)(*v))
            .y_label_formatter(&|v| (self.fmt_y)(*v))
            .label_style(("sans-serif", 12).into_font().color(&AXIS))
            .axis_desc_style(("sans-serif", 14).into_font().color(&AXIS))
            .axis_style(&AXIS)
            .bold_line_style(&GRID)
            .light_line_style(&WHITE)
            .draw()?;

        for (idx, line) in self.lines.iter().enumerate() {
            let color = PALETTE[idx % PALETTE.len()];

            chart
                .draw_series(LineSeries::new(line.points.iter().copied(), color.stroke_width(2)))?
                .label(line.label)
                .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 18, y)], color.stroke_width(2)));

            // Markers on every observation.
            chart.draw_series(
                line.points
                    .iter()
                    .map(|&(x, y)| Circle::new((x, y), 3, color.filled())),
            )?;
        }

        chart
            .configure_series_labels()
            .position(SeriesLabelPosition::UpperLeft)
            .label_font(("sans-serif", 12).into_font().color(&AXIS))
            .background_style(&WHITE.mix(0.85))
            .border_style(&GRID)
            .draw()?;

        let (px_range, py_range) = chart.plotting_area().get_pixel_range();
        let xs: Vec<f64> = self
            .lines
            .first()
            .map(|l| l.points.iter().map(|&(x, _)| x).collect())
            .unwrap_or_default();
        let centers: Vec<i32> = xs.iter().map(|&x| chart.backend_coord(&(x, y0)).0).collect();

        let bands = xs
            .iter()
            .enumerate()
            .map(|(idx, &x)| {
                let left = match idx {
                    0 => px_range.start,
                    _ => (centers[idx - 1] + centers[idx]) / 2,
                };
                let right = match centers.get(idx + 1) {
                    Some(next) => (centers[idx] + next) / 2,
                    None => px_range.end,
                };
                HoverBand {
                    x: left,
                    y: py_range.start,
                    width: (right - left).max(1),
                    height: py_range.end - py_range.start,
                    title: self.hover_text(idx, x),
                }
            })
            .collect();

        root.present()?;
        Ok(bands)
    }
}

/// A transparent column over one period that shows a native tooltip.
struct HoverBand {
    x: i32,
    y: i32,
    width: i32,
    height: i32,
    title: String,
}

impl HoverBand {
    fn to_svg(&self) -> String {
        format!(
            "<rect class=\"hover-band\" x=\"{}\" y=\"{}\" width=\"{}\" height=\"{}\" fill=\"#636efa\" fill-opacity=\"0\" pointer-events=\"all\"><title>{}</title></rect>\n",
            self.x,
            self.y,
            self.width,
            self.height,
            escape_xml(&self.title)
        )
    }
}

fn escape_xml(raw: &str) -> String {
    raw.replace('&', "&amp;").replace('<', "&lt;").replace('>', "&gt;")
}

/// Continuous month coordinate for a period.
pub fn month_index(period: NaiveDate) -> f64 {
    (period.year() * 12 + period.month0() as i32) as f64
}

/// Inverse of `month_index`, rounded to the nearest month.
pub fn month_label(x: f64) -> String {
    let idx = x.round() as i32;
    format!("{:04}-{:02}", idx.div_euclid(12), idx.rem_euclid(12) + 1)
}

/// Widen `[lo, hi]` by `frac` of its span, or by `flat` when the span is zero.
fn pad_bounds(lo: f64, hi: f64, frac: f64, flat: f64) -> [f64; 2] {
    let span = hi - lo;
    if span.abs() < 1e-12 {
        [lo - flat, hi + flat]
    } else {
        [lo - span * frac, hi + span * frac]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Column;

    fn month(y: i32, m: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, 1).unwrap()
    }

    fn sample_table() -> MergedTable {
        MergedTable {
            periods: vec![month(2024, 1), month(2024, 2), month(2024, 3)],
            columns: vec![
                Column { label: "Imports".to_string(), values: vec![8.1, 8.4, 7.9] },
                Column { label: "Exports".to_string(), values: vec![5.2, 5.0, 5.6] },
            ],
        }
    }

    #[test]
    fn month_index_round_trips_through_label() {
        let x = month_index(month(2018, 1));
        assert_eq!(month_label(x), "2018-01");
        assert_eq!(month_label(month_index(month(2025, 12))), "2025-12");
        assert_eq!(month_label(x + 0.4), "2018-01");
        assert_eq!(month_index(month(2020, 1)) - month_index(month(2019, 12)), 1.0);
    }

    #[test]
    fn pad_bounds_handles_flat_ranges() {
        assert_eq!(pad_bounds(5.0, 5.0, 0.05, 1.0), [4.0, 6.0]);
        let [lo, hi] = pad_bounds(0.0, 10.0, 0.1, 1.0);
        assert!((lo + 1.0).abs() < 1e-12 && (hi - 11.0).abs() < 1e-12);
    }

    #[test]
    fn from_table_builds_one_line_per_column() {
        let table = sample_table();
        let chart = LineChart::from_table(&table, "Month", "Value").unwrap();
        assert_eq!(chart.lines.len(), 2);
        assert_eq!(chart.lines[1].label, "Exports");
        assert_eq!(chart.lines[0].points.len(), 3);
        assert!(chart.y_bounds[0] < 5.0 && chart.y_bounds[1] > 8.4);
    }

    #[test]
    fn from_table_skips_empty_tables() {
        let table = MergedTable::default();
        assert!(LineChart::from_table(&table, "Month", "Value").is_none());
    }

    #[test]
    fn render_svg_contains_legend_and_axis_titles() {
        let table = sample_table();
        let svg = LineChart::from_table(&table, "Month", "Value (Billion USD)")
            .unwrap()
            .render_svg()
            .unwrap();
        assert!(svg.contains("<svg"));
        assert!(svg.contains("Imports"));
        assert!(svg.contains("Exports"));
        assert!(svg.contains("Month"));
    }

    #[test]
    fn x_bounds_keep_edge_markers_inside() {
        let table = sample_table();
        let chart = LineChart::from_table(&table, "Month", "Value").unwrap();
        let first = month_index(month(2024, 1));
        let last = month_index(month(2024, 3));
        assert_eq!(chart.x_bounds, [first - 0.5, last + 0.5]);
    }

    #[test]
    fn every_period_gets_a_shared_tooltip() {
        let table = sample_table();
        let svg = LineChart::from_table(&table, "Month", "Value").unwrap().render_svg().unwrap();

        assert_eq!(svg.matches("<title>").count(), 3);
        assert_eq!(svg.matches("class=\"hover-band\"").count(), 3);
        assert!(svg.contains("<title>2024-02\nImports: 8.400\nExports: 5.000</title>"));
        assert!(svg.trim_end().ends_with("</svg>"));
    }

    #[test]
    fn tooltip_text_is_escaped() {
        let table = MergedTable {
            periods: vec![month(2024, 1), month(2024, 2)],
            columns: vec![Column { label: "A<B & C".to_string(), values: vec![1.0, 2.0] }],
        };
        let svg = LineChart::from_table(&table, "Month", "Value").unwrap().render_svg().unwrap();
        assert!(svg.contains("<title>2024-01\nA&lt;B &amp; C: 1.000</title>"));
    }

    #[test]
    fn single_period_still_renders() {
        let table = MergedTable {
            periods: vec![month(2024, 6)],
            columns: vec![Column { label: "Only".to_string(), values: vec![3.0] }],
        };
        let svg = LineChart::from_table(&table, "Month", "Value").unwrap().render_svg().unwrap();
        assert!(svg.contains("Only"));
        assert_eq!(svg.matches("<title>").count(), 1);
    }
}
