//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - series requests and fetched tables (`SeriesRequest`, `SeriesTable`)
//! - the merged wide table (`MergedTable`) and its dataset wrapper
//! - the fixed dataset catalog shown on the dashboard (`catalog`)

pub mod catalog;
pub mod types;

pub use types::*;
