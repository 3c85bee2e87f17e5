//! Command-line parsing for the trade dashboard.
//!
//! Every option has an environment fallback so the binary can be configured
//! from a `.env` file or a hosting platform's variables (`PORT`).

use std::path::PathBuf;
use std::time::Duration;

use clap::{Args, Parser, Subcommand};

use crate::domain::{
    DEFAULT_BASE_URL, DEFAULT_END_PERIOD, DEFAULT_LANG, DEFAULT_START_PERIOD, DatasetSpec, FetchConfig,
    catalog,
};
use crate::server::{DEFAULT_HOST, DEFAULT_PORT, ServeConfig};

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "trade-dash", version, about = "Israel trade dashboard built from CBS time series")]
pub struct Cli {
    /// Log at debug level (`RUST_LOG` takes precedence).
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Fetch all datasets, render the dashboard and serve it over HTTP (default).
    Serve(ServeArgs),
    /// Fetch all datasets and write the dashboard page (and optional CSVs) to disk.
    Render(RenderArgs),
    /// Fetch datasets and print them as text tables.
    Show(ShowArgs),
}

/// Options shared by every command that talks to the series API.
#[derive(Debug, Args, Clone)]
pub struct FetchArgs {
    /// Series data endpoint.
    #[arg(long, env = "CBS_BASE_URL", default_value = DEFAULT_BASE_URL)]
    pub base_url: String,

    /// First period requested (MM-YYYY).
    #[arg(long, env = "CBS_START_PERIOD", default_value = DEFAULT_START_PERIOD)]
    pub start_period: String,

    /// Last period requested (MM-YYYY).
    #[arg(long, env = "CBS_END_PERIOD", default_value = DEFAULT_END_PERIOD)]
    pub end_period: String,

    /// Response language.
    #[arg(long, env = "CBS_LANG", default_value = DEFAULT_LANG)]
    pub lang: String,

    /// Per-request timeout in seconds (client default when unset).
    #[arg(long, env = "CBS_TIMEOUT_SECS")]
    pub timeout_secs: Option<u64>,
}

impl FetchArgs {
    pub fn to_config(&self) -> FetchConfig {
        FetchConfig {
            base_url: self.base_url.clone(),
            start_period: self.start_period.clone(),
            end_period: self.end_period.clone(),
            lang: self.lang.clone(),
            timeout: self.timeout_secs.map(Duration::from_secs),
        }
    }
}

#[derive(Debug, Args, Clone)]
pub struct ServeArgs {
    #[command(flatten)]
    pub fetch: FetchArgs,

    /// Address to bind.
    #[arg(long, env = "BIND_HOST", default_value = DEFAULT_HOST)]
    pub host: String,

    /// Port to bind.
    #[arg(short, long, env = "PORT", default_value_t = DEFAULT_PORT)]
    pub port: u16,
}

impl ServeArgs {
    pub fn to_config(&self) -> ServeConfig {
        ServeConfig {
            host: self.host.clone(),
            port: self.port,
        }
    }
}

#[derive(Debug, Args, Clone)]
pub struct RenderArgs {
    #[command(flatten)]
    pub fetch: FetchArgs,

    /// Output HTML file.
    #[arg(short, long, value_name = "HTML")]
    pub out: PathBuf,

    /// Also write one CSV per dataset into this directory.
    #[arg(long, value_name = "DIR")]
    pub csv_dir: Option<PathBuf>,
}

#[derive(Debug, Args, Clone)]
pub struct ShowArgs {
    #[command(flatten)]
    pub fetch: FetchArgs,

    /// Only fetch and print one dataset (trade, imports, tech, region).
    #[arg(short, long, value_parser = parse_dataset)]
    pub dataset: Option<DatasetSpec>,
}

fn parse_dataset(raw: &str) -> Result<DatasetSpec, String> {
    catalog::find(raw).ok_or_else(|| {
        let keys: Vec<&str> = catalog::ALL.iter().map(|s| s.key).collect();
        format!("unknown dataset '{raw}' (expected one of: {})", keys.join(", "))
    })
}
