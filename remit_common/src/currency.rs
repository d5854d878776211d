//! Currency codes known to the comparison tool.
//!
//! The engine itself works on plain ISO 4217 code strings so that any pair the
//! live feed knows can be compared. `Currency` is the closed set the fallback
//! table and the command line understand.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString, IntoStaticStr};

/// Destination currency every corridor ends in unless told otherwise.
pub const DEFAULT_RECEIVE_CURRENCY: &str = "KES";

/// Supported currency codes.
#[allow(missing_docs)]
#[derive(
    Debug,
    Clone,
    Copy,
    Serialize,
    Deserialize,
    ValueEnum,
    Display,
    EnumString,
    IntoStaticStr,
    Hash,
    Eq,
    PartialEq,
)]
#[value(rename_all = "UPPER")]
#[strum(ascii_case_insensitive)]
pub enum Currency {
    USD,
    GBP,
    EUR,
    CAD,
    AUD,
    AED,
    KES,
}

impl Currency {
    /// Source currencies offered by the comparison form.
    pub const SENDING: [Currency; 6] = [
        Currency::USD,
        Currency::GBP,
        Currency::EUR,
        Currency::CAD,
        Currency::AUD,
        Currency::AED,
    ];

    /// ISO code as a static string.
    pub fn code(self) -> &'static str {
        self.into()
    }
}

/// Trim and upper-case a caller-supplied currency code.
pub fn normalize_code(code: &str) -> String {
    code.trim().to_ascii_uppercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_case_insensitively() {
        assert_eq!("usd".parse::<Currency>().unwrap(), Currency::USD);
        assert_eq!("Gbp".parse::<Currency>().unwrap(), Currency::GBP);
        assert!("XYZ".parse::<Currency>().is_err());
    }

    #[test]
    fn code_matches_display() {
        for currency in Currency::SENDING {
            assert_eq!(currency.code(), currency.to_string());
        }
        assert_eq!(Currency::KES.code(), DEFAULT_RECEIVE_CURRENCY);
    }

    #[test]
    fn normalize_code_trims_and_uppercases() {
        assert_eq!(normalize_code(" eur "), "EUR");
    }
}
