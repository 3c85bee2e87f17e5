//! Data acquisition: the CBS series client and the series merger.

pub mod cbs;
pub mod merge;

pub use cbs::{CbsClient, SeriesSource};
pub use merge::{build_merged, inner_join};
