//! `trade-dash` library crate.
//!
//! The binary (`trade-dash`) is a thin wrapper around this library so that:
//!
//! - the fetch/merge/render pipeline is testable without a network or a socket
//! - the same snapshot can be served, written to disk, or printed

pub mod app;
pub mod cli;
pub mod data;
pub mod domain;
pub mod error;
pub mod io;
pub mod logging;
pub mod plot;
pub mod report;
pub mod server;
