//! RemitLens CLI: compares what a recipient actually gets when money is sent
//! through several money-transfer providers, and ranks the providers by true
//! cost (explicit fee plus exchange-rate spread).
//!
//! Usage example (CLI):
//! ```bash
//! remit_cli --amount 200 --from USD
//! remit_cli --amount 500 --from GBP --providers Wise,Sendwave --channel bank-deposit
//! remit_cli --offline --json
//! remit_cli --server 127.0.0.1:8080 --amount 300
//! ```
//!
//! By default the mid-market rate comes from a public daily feed, falling back
//! to built-in rates when the feed is unreachable. With `--server` the
//! comparison runs on a `remit_server` instead and the returned report is
//! rendered the same way.
#![warn(missing_docs)]
mod args;
mod render;
mod sender;

use crate::args::Args;
use crate::render::{render_providers, render_report};
use crate::sender::RequestSender;
use clap::Parser;
use log::error;
use remit_common::{ComparisonEngine, ComparisonReport, ProviderCatalog, RemitError, Result};
use std::process::ExitCode;

/// Log level when `RUST_LOG` is unset; engine chatter stays off the terminal.
const DEFAULT_LOG_LEVEL: log::LevelFilter = log::LevelFilter::Warn;

/// Produce the report locally or through a server, depending on `--server`.
fn fetch_report(args: &Args) -> Result<ComparisonReport, RemitError> {
    let request = args.to_request();
    match &args.server {
        Some(server) => RequestSender::send_request(server, &request),
        None => {
            let engine = ComparisonEngine::from_boxed(args.rates.build_source()?);
            let comparison = engine.compare(&request)?;
            Ok(comparison.report(&request.channel))
        }
    }
}

fn run(args: &Args) -> Result<(), RemitError> {
    if args.list_providers {
        print!("{}", render_providers(&ProviderCatalog::builtin()));
        return Ok(());
    }

    let report = fetch_report(args)?;
    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print!("{}", render_report(&report, args.explain));
    }
    Ok(())
}

fn main() -> ExitCode {
    init_logger();
    let args = Args::parse();

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

fn init_logger() {
    env_logger::Builder::new()
        .filter_level(DEFAULT_LOG_LEVEL)
        .parse_default_env()
        .init();
}
