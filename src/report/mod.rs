//! Reporting: the HTML dashboard and terminal tables.
//!
//! Both renderers take the immutable snapshot built at startup and never
//! fetch anything themselves.

pub mod dashboard;
pub mod format;

pub use dashboard::{PAGE_TITLE, render_dashboard};
pub use format::{format_dataset, format_snapshot_summary};
