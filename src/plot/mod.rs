//! Chart rendering.

pub mod svg_chart;

pub use svg_chart::{ChartLine, LineChart, month_index, month_label};
