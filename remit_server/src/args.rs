//! Command-line arguments for the comparison server.
use clap::Parser;
use remit_common::config::RateArgs;
use remit_common::net::{COMMAND_PORT, addr};

/// Parsed command-line arguments.
#[derive(Debug, Parser)]
#[command(version, about, long_about = None)]
pub struct Args {
    /// Address to accept comparison requests on.
    #[arg(long, default_value_t = addr("0.0.0.0", COMMAND_PORT))]
    pub bind: String,

    #[command(flatten)]
    pub rates: RateArgs,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn binds_to_command_port_by_default() {
        let args = Args::parse_from(["remit_server"]);
        assert_eq!(args.bind, "0.0.0.0:8080");
        assert!(!args.rates.offline);
    }

    #[test]
    fn accepts_offline_mode() {
        let args = Args::parse_from(["remit_server", "--bind", "127.0.0.1:9000", "--offline"]);
        assert_eq!(args.bind, "127.0.0.1:9000");
        assert!(args.rates.offline);
    }
}
