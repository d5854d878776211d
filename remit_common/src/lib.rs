//!
//! Remittance comparison core shared by the command-line tool and the server.
//!
//! This crate aggregates:
//! - `error` — unified error type `RemitError` used across the workspace.
//! - `result` — handy `Result<T, RemitError>` alias.
//! - `currency` — currency codes understood by the fallback table and the CLI.
//! - `catalog` — provider cost models and the read-only provider catalog.
//! - `quote` — the `Quote` value object and the quote builder.
//! - `comparison` — comparison results, ranking views and report snapshots.
//! - `rate` — mid-market rate sources (live feed with fallback, offline, pinned).
//! - `engine` — the comparison engine and `CompareRequest`.
//! - `command` — JSON line payloads exchanged between client and server.
//! - `config` — shared rate-source command-line options.
//! - `net` — networking constants and small helpers.
//!
//! All figures are estimates from publicly listed provider rates; nothing here
//! executes a transfer.
#![warn(missing_docs)]
pub mod catalog;
pub mod command;
pub mod comparison;
pub mod config;
pub mod currency;
pub mod engine;
pub mod error;
pub mod net;
pub mod quote;
pub mod rate;
pub mod result;

pub use catalog::{DeliveryMethod, FeeModel, ProviderCatalog, ProviderProfile, TransferSpeed};
pub use command::CompareResponse;
pub use comparison::{Comparison, ComparisonReport, RankedQuote};
pub use currency::Currency;
pub use engine::{CompareRequest, ComparisonEngine, compare};
pub use error::RemitError;
pub use quote::{Quote, build_quote};
pub use rate::{FallbackRates, FixedRate, LiveRateSource, RateSource};
pub use result::Result;
