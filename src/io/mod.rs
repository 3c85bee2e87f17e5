//! File output for the `render` command.

pub mod export;

pub use export::*;
