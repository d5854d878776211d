//! Command-line arguments for the remittance comparison tool.
//!
//! This module defines the CLI interface using `clap`. See `main` for end-to-end usage.
use clap::Parser;
use remit_common::config::RateArgs;
use remit_common::{CompareRequest, Currency, DeliveryMethod};

/// Smallest amount the comparison form accepts.
pub const MIN_AMOUNT: f64 = 10.0;
/// Largest amount the comparison form accepts.
pub const MAX_AMOUNT: f64 = 10_000.0;

/// Parsed command-line arguments.
#[derive(Debug, Parser)]
#[command(version, about, long_about = None)]
pub struct Args {
    /// Amount to send, in the source currency (10 to 10000).
    #[arg(long, default_value_t = 200.0, value_parser = parse_amount)]
    pub amount: f64,

    /// Currency the sender pays in.
    #[arg(long, value_enum, ignore_case = true, default_value_t = Currency::USD)]
    pub from: Currency,

    /// Currency the recipient gets.
    #[arg(long, value_enum, ignore_case = true, default_value_t = Currency::KES)]
    pub to: Currency,

    /// Comma-separated provider names to compare (default: all).
    #[arg(long, value_delimiter = ',')]
    pub providers: Vec<String>,

    /// Delivery channel for the "best for channel" card.
    #[arg(long, value_enum, default_value_t = DeliveryMethod::MPesa)]
    pub channel: DeliveryMethod,

    /// Print the full report as JSON instead of tables.
    #[arg(long)]
    pub json: bool,

    /// Explain what "true cost %" means.
    #[arg(long)]
    pub explain: bool,

    /// List the provider catalog and exit.
    #[arg(long)]
    pub list_providers: bool,

    /// Ask a remit_server at HOST:PORT instead of comparing locally.
    #[arg(long)]
    pub server: Option<String>,

    #[command(flatten)]
    pub rates: RateArgs,
}

impl Args {
    /// Build the comparison request these arguments describe.
    pub fn to_request(&self) -> CompareRequest {
        let request = CompareRequest::new(self.amount, self.from.code())
            .to(self.to.code())
            .channel(&self.channel.to_string());
        let providers: Vec<&str> = self
            .providers
            .iter()
            .map(|name| name.trim())
            .filter(|name| !name.is_empty())
            .collect();
        if providers.is_empty() {
            request
        } else {
            request.providers(providers)
        }
    }
}

/// Accept amounts within the range the comparison form allows.
fn parse_amount(raw: &str) -> Result<f64, String> {
    let amount: f64 = raw
        .trim()
        .parse()
        .map_err(|e| format!("not a number: {}", e))?;
    if (MIN_AMOUNT..=MAX_AMOUNT).contains(&amount) {
        Ok(amount)
    } else {
        Err(format!(
            "amount must be between {} and {}",
            MIN_AMOUNT, MAX_AMOUNT
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_form() {
        let args = Args::parse_from(["remit_cli"]);
        assert_eq!(args.amount, 200.0);
        assert_eq!(args.from, Currency::USD);
        assert_eq!(args.to, Currency::KES);
        assert_eq!(args.channel, DeliveryMethod::MPesa);
        assert!(args.providers.is_empty());

        let request = args.to_request();
        assert_eq!(request, CompareRequest::new(200.0, "USD"));
    }

    #[test]
    fn providers_are_split_on_commas() {
        let args = Args::parse_from([
            "remit_cli",
            "--amount",
            "500",
            "--from",
            "gbp",
            "--providers",
            "Wise, Western Union",
            "--channel",
            "cash-pickup",
        ]);
        let request = args.to_request();
        assert_eq!(request.from_currency, "GBP");
        assert_eq!(request.send_amount, 500.0);
        assert_eq!(
            request.providers,
            Some(vec!["Wise".to_string(), "Western Union".to_string()])
        );
        assert_eq!(request.channel, "Cash pickup");
    }

    #[test]
    fn amount_outside_form_range_is_rejected() {
        assert!(Args::try_parse_from(["remit_cli", "--amount", "5"]).is_err());
        assert!(Args::try_parse_from(["remit_cli", "--amount", "10001"]).is_err());
        assert!(Args::try_parse_from(["remit_cli", "--amount", "abc"]).is_err());
        assert!(Args::try_parse_from(["remit_cli", "--amount", "10"]).is_ok());
    }

    #[test]
    fn unknown_currency_is_rejected() {
        assert!(Args::try_parse_from(["remit_cli", "--from", "XYZ"]).is_err());
    }
}
