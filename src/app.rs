//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - loads `.env` and parses CLI arguments
//! - builds the dataset snapshot from the CBS API
//! - renders the dashboard
//! - serves it, writes it to disk, or prints the tables

use clap::Parser;
use tracing::info;

use crate::cli::{Cli, Command, RenderArgs, ServeArgs, ShowArgs};
use crate::data::CbsClient;
use crate::domain::catalog;
use crate::error::AppError;

pub mod pipeline;

/// Entry point for the `trade-dash` binary.
pub fn run() -> Result<(), AppError> {
    dotenvy::dotenv().ok();

    let argv = rewrite_args(std::env::args().collect());
    let cli = Cli::parse_from(argv);
    crate::logging::init(cli.verbose);

    match cli.command {
        Command::Serve(args) => handle_serve(args),
        Command::Render(args) => handle_render(args),
        Command::Show(args) => handle_show(args),
    }
}

fn handle_serve(args: ServeArgs) -> Result<(), AppError> {
    let client = CbsClient::new(args.fetch.to_config())?;
    info!(base_url = %client.config().base_url, "fetching datasets");
    let snapshot = pipeline::build_snapshot(&client, &catalog::ALL)?;
    // The blocking client owns its own runtime; release it before starting the server's.
    drop(client);

    let page = crate::report::render_dashboard(&snapshot)?;
    let state = crate::server::DashboardState::new(page, &snapshot)?;
    crate::server::run(&args.to_config(), state)
}

fn handle_render(args: RenderArgs) -> Result<(), AppError> {
    let client = CbsClient::new(args.fetch.to_config())?;
    let snapshot = pipeline::build_snapshot(&client, &catalog::ALL)?;

    let page = crate::report::render_dashboard(&snapshot)?;
    crate::io::write_html(&args.out, &page)?;
    info!(path = %args.out.display(), "dashboard written");

    if let Some(dir) = &args.csv_dir {
        let written = crate::io::write_snapshot_csvs(dir, &snapshot)?;
        info!(dir = %dir.display(), files = written.len(), "datasets exported");
    }

    Ok(())
}

fn handle_show(args: ShowArgs) -> Result<(), AppError> {
    let client = CbsClient::new(args.fetch.to_config())?;
    let specs = match args.dataset {
        Some(spec) => vec![spec],
        None => catalog::ALL.to_vec(),
    };
    let snapshot = pipeline::build_snapshot(&client, &specs)?;

    println!("{}", crate::report::format_snapshot_summary(&snapshot));
    for dataset in &snapshot.datasets {
        println!("{}", crate::report::format_dataset(dataset));
    }
    Ok(())
}

/// Rewrite argv so `trade-dash` defaults to `trade-dash serve`.
///
/// Rules:
/// - `trade-dash`                       -> `trade-dash serve`
/// - `trade-dash --port 9000 ...`       -> `trade-dash serve --port 9000 ...`
/// - `trade-dash -v show ...`           -> unchanged (global flag before a subcommand)
/// - `trade-dash --help/--version/-h`   -> unchanged (top-level help/version)
fn rewrite_args(mut argv: Vec<String>) -> Vec<String> {
    let first_non_global = argv
        .iter()
        .skip(1)
        .find(|arg| !matches!(arg.as_str(), "-v" | "--verbose"));

    let leaves_argv_alone = first_non_global.is_some_and(|arg| {
        matches!(
            arg.as_str(),
            "serve" | "render" | "show" | "help" | "-h" | "--help" | "-V" | "--version"
        )
    });
    if !leaves_argv_alone {
        argv.insert(1.min(argv.len()), "serve".to_string());
    }
    argv
}
