//! Provider catalog: the fixed set of money-transfer providers and their cost models.
//!
//! Every provider is described by a [`ProviderProfile`]: how far its exchange rate
//! sits below mid-market (the spread), how it charges its explicit fee
//! ([`FeeModel`]), how fast money arrives ([`TransferSpeed`]) and through which
//! [`DeliveryMethod`]s. The figures are estimates taken from publicly listed
//! provider rates; they are not live quotes.
//!
//! The catalog is immutable once built. [`ProviderCatalog::builtin`] returns the
//! curated set; [`ProviderCatalog::new`] accepts a custom set after checking the
//! profile invariants.

use clap::ValueEnum;
use log::debug;
use serde::Serialize;
use strum_macros::{Display, EnumString};

use crate::error::RemitError;
use crate::result::Result;

/// Upper bound for a percentage fee, in percent.
pub const MAX_FEE_PERCENT: f64 = 10.0;

/// How a provider charges its explicit fee, in the send currency.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FeeModel {
    /// No explicit fee; the provider earns only on the spread.
    Zero,
    /// A share of the send amount.
    Percent {
        /// Fee in percent of the send amount.
        pct: f64,
    },
    /// A share of the send amount plus a flat part.
    PercentPlusFixed {
        /// Fee in percent of the send amount.
        pct: f64,
        /// Flat part in the send currency.
        fixed: f64,
    },
    /// One flat fee regardless of amount.
    Fixed {
        /// Flat fee in the send currency.
        amount: f64,
    },
    /// Tiered pricing the catalog does not model; charged as its entry-tier flat fee.
    Tiered {
        /// Typical flat fee in the send currency.
        from: f64,
    },
}

impl FeeModel {
    /// Explicit fee charged on `send_amount`, unrounded.
    pub fn fee_for(&self, send_amount: f64) -> f64 {
        match *self {
            FeeModel::Zero => 0.0,
            FeeModel::Percent { pct } => send_amount * pct / 100.0,
            FeeModel::PercentPlusFixed { pct, fixed } => send_amount * pct / 100.0 + fixed,
            FeeModel::Fixed { amount } => amount,
            FeeModel::Tiered { from } => from,
        }
    }

    /// Percentage component of the fee (0 for flat models).
    pub fn percent(&self) -> f64 {
        match *self {
            FeeModel::Percent { pct } | FeeModel::PercentPlusFixed { pct, .. } => pct,
            FeeModel::Zero | FeeModel::Fixed { .. } | FeeModel::Tiered { .. } => 0.0,
        }
    }

    /// Flat component of the fee (0 for pure percentage models).
    pub fn flat(&self) -> f64 {
        match *self {
            FeeModel::PercentPlusFixed { fixed, .. } => fixed,
            FeeModel::Fixed { amount } => amount,
            FeeModel::Tiered { from } => from,
            FeeModel::Zero | FeeModel::Percent { .. } => 0.0,
        }
    }

    /// Short human description, e.g. `0.41% + 0.00` or `from 3.99`.
    pub fn describe(&self) -> String {
        match *self {
            FeeModel::Zero => "no fee".to_string(),
            FeeModel::Percent { pct } => format!("{:.2}%", pct),
            FeeModel::PercentPlusFixed { pct, fixed } => format!("{:.2}% + {:.2}", pct, fixed),
            FeeModel::Fixed { amount } => format!("{:.2} flat", amount),
            FeeModel::Tiered { from } => format!("from {:.2} (tiered)", from),
        }
    }
}

/// Nominal delivery time bucket.
///
/// Variants are declared fastest first, so the derived `Ord` is the ranking used
/// by [`crate::comparison::Comparison::fastest`]. The generic `hours`/`days`
/// buckets rank after their specific `1-3` ranges.
#[derive(
    Debug, Clone, Copy, Display, EnumString, Serialize, PartialEq, Eq, PartialOrd, Ord, Hash,
)]
pub enum TransferSpeed {
    /// Credited while the sender waits.
    #[strum(serialize = "instant")]
    #[serde(rename = "instant")]
    Instant,
    /// Within minutes.
    #[strum(serialize = "minutes")]
    #[serde(rename = "minutes")]
    Minutes,
    /// One to three hours.
    #[strum(serialize = "1-3 hours")]
    #[serde(rename = "1-3 hours")]
    HoursRange,
    /// Some hours, unspecified.
    #[strum(serialize = "hours")]
    #[serde(rename = "hours")]
    Hours,
    /// One to three days.
    #[strum(serialize = "1-3 days")]
    #[serde(rename = "1-3 days")]
    DaysRange,
    /// Some days, unspecified.
    #[strum(serialize = "days")]
    #[serde(rename = "days")]
    Days,
}

impl TransferSpeed {
    /// Sort key for a textual bucket. Unrecognised text ranks after every known bucket.
    pub fn rank(text: &str) -> u8 {
        text.trim()
            .parse::<TransferSpeed>()
            .map_or(u8::MAX, |speed| speed as u8)
    }
}

/// How the recipient receives the money.
#[derive(Debug, Clone, Copy, Display, EnumString, Serialize, ValueEnum, PartialEq, Eq, Hash)]
pub enum DeliveryMethod {
    /// Mobile-money wallet.
    #[strum(serialize = "M-Pesa")]
    #[serde(rename = "M-Pesa")]
    MPesa,
    /// Deposit into a bank account.
    #[strum(serialize = "Bank deposit")]
    #[serde(rename = "Bank deposit")]
    BankDeposit,
    /// Cash collected at an agent.
    #[strum(serialize = "Cash pickup")]
    #[serde(rename = "Cash pickup")]
    CashPickup,
}

/// Static cost model of one provider.
#[derive(Debug, Clone, Serialize)]
pub struct ProviderProfile {
    /// Display name, also the catalog key.
    pub name: &'static str,
    /// How far the applied rate sits below mid-market, in percent.
    pub spread_pct: f64,
    /// Explicit fee structure.
    pub fee: FeeModel,
    /// Nominal delivery time.
    pub speed: TransferSpeed,
    /// Supported delivery methods, most common first.
    pub delivery: &'static [DeliveryMethod],
    /// Outbound link with `{amount}` and `{from}` placeholders.
    pub link_template: Option<&'static str>,
    /// One-line remark shown in provider listings.
    pub notes: &'static str,
}

impl ProviderProfile {
    /// Check the profile invariants: non-negative spread, fee percentage in
    /// `0..=MAX_FEE_PERCENT`, non-negative flat fee.
    pub fn validate(&self) -> Result<()> {
        let invalid = |reason: String| RemitError::InvalidProfile {
            provider: self.name.to_string(),
            reason,
        };
        if !self.spread_pct.is_finite() || self.spread_pct < 0.0 {
            return Err(invalid(format!("spread {} must be >= 0", self.spread_pct)));
        }
        let pct = self.fee.percent();
        if !(0.0..=MAX_FEE_PERCENT).contains(&pct) {
            return Err(invalid(format!(
                "fee percentage {} outside 0..={}",
                pct, MAX_FEE_PERCENT
            )));
        }
        let flat = self.fee.flat();
        if !flat.is_finite() || flat < 0.0 {
            return Err(invalid(format!("flat fee {} must be >= 0", flat)));
        }
        Ok(())
    }

    /// Delivery methods joined for display, e.g. `M-Pesa, Bank deposit`.
    pub fn delivery_text(&self) -> String {
        self.delivery
            .iter()
            .map(|method| method.to_string())
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Fill the link template with the integer part of `send_amount` and the
    /// source currency. Providers without a template yield an empty link.
    pub fn deep_link(&self, send_amount: f64, from_currency: &str) -> String {
        match self.link_template {
            Some(template) => template
                .replace("{amount}", &(send_amount.trunc() as i64).to_string())
                .replace("{from}", from_currency),
            None => String::new(),
        }
    }
}

const BUILTIN_PROFILES: [ProviderProfile; 7] = [
    ProviderProfile {
        name: "Wise",
        spread_pct: 0.55,
        fee: FeeModel::PercentPlusFixed { pct: 0.41, fixed: 0.0 },
        speed: TransferSpeed::Minutes,
        delivery: &[DeliveryMethod::MPesa, DeliveryMethod::BankDeposit],
        link_template: Some(
            "https://wise.com/send#payInMethod=CARD&sendAmount={amount}&sourceCurrency={from}&targetCurrency=KES",
        ),
        notes: "Best rate, M-Pesa delivery, slightly slower than instant",
    },
    ProviderProfile {
        name: "Remitly",
        spread_pct: 1.2,
        // Economy tier is cheaper, express costs more.
        fee: FeeModel::Tiered { from: 3.99 },
        speed: TransferSpeed::Instant,
        delivery: &[DeliveryMethod::MPesa, DeliveryMethod::BankDeposit],
        link_template: Some("https://www.remitly.com/us/en/kenya"),
        notes: "Instant to M-Pesa. Economy tier is cheaper but slower.",
    },
    ProviderProfile {
        name: "WorldRemit",
        spread_pct: 1.8,
        fee: FeeModel::Fixed { amount: 3.99 },
        speed: TransferSpeed::Minutes,
        delivery: &[
            DeliveryMethod::MPesa,
            DeliveryMethod::BankDeposit,
            DeliveryMethod::CashPickup,
        ],
        link_template: Some("https://www.worldremit.com/en/send-money/to-kenya"),
        notes: "Wider network, cash pickup at major towns",
    },
    ProviderProfile {
        name: "Western Union",
        spread_pct: 3.5,
        // Varies by payment method.
        fee: FeeModel::Tiered { from: 5.00 },
        speed: TransferSpeed::Minutes,
        delivery: &[
            DeliveryMethod::MPesa,
            DeliveryMethod::CashPickup,
            DeliveryMethod::BankDeposit,
        ],
        link_template: Some("https://www.westernunion.com/us/en/send-money/app/start"),
        notes: "High spread; useful mainly for cash pickup in remote areas",
    },
    ProviderProfile {
        name: "Sendwave",
        spread_pct: 1.0,
        fee: FeeModel::Zero,
        speed: TransferSpeed::Instant,
        delivery: &[DeliveryMethod::MPesa],
        link_template: Some("https://www.sendwave.com/"),
        notes: "Zero fee, instant M-Pesa. Spread slightly wider than Wise.",
    },
    ProviderProfile {
        name: "Mukuru",
        spread_pct: 2.1,
        fee: FeeModel::Fixed { amount: 4.50 },
        speed: TransferSpeed::HoursRange,
        delivery: &[DeliveryMethod::CashPickup, DeliveryMethod::BankDeposit],
        link_template: Some("https://www.mukuru.com/ke/"),
        notes: "Strong East Africa footprint; popular for cash collection",
    },
    ProviderProfile {
        name: "LemFi",
        spread_pct: 0.8,
        fee: FeeModel::Percent { pct: 0.5 },
        speed: TransferSpeed::Minutes,
        delivery: &[DeliveryMethod::MPesa, DeliveryMethod::BankDeposit],
        link_template: Some("https://lemfi.com/"),
        notes: "Newer provider; competitive rates for diaspora Africans",
    },
];

/// Read-only registry of provider profiles, in a stable order.
#[derive(Debug, Clone)]
pub struct ProviderCatalog {
    profiles: Vec<ProviderProfile>,
}

impl ProviderCatalog {
    /// The curated catalog of real-world providers.
    pub fn builtin() -> Self {
        Self {
            profiles: BUILTIN_PROFILES.to_vec(),
        }
    }

    /// Build a catalog from custom profiles, rejecting any that break an invariant.
    pub fn new(profiles: Vec<ProviderProfile>) -> Result<Self> {
        for profile in &profiles {
            profile.validate()?;
        }
        Ok(Self { profiles })
    }

    /// Look up a profile by exact provider name.
    pub fn get(&self, name: &str) -> Option<&ProviderProfile> {
        self.profiles.iter().find(|profile| profile.name == name)
    }

    /// All profiles in catalog order.
    pub fn profiles(&self) -> &[ProviderProfile] {
        &self.profiles
    }

    /// Provider names in catalog order.
    pub fn names(&self) -> Vec<&'static str> {
        self.profiles.iter().map(|profile| profile.name).collect()
    }

    /// Number of providers.
    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    /// `true` when the catalog has no providers.
    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }

    /// Resolve a caller-supplied subset of names.
    ///
    /// `None` or an empty list selects every provider in catalog order. Otherwise
    /// the requested order is kept and unknown names are skipped.
    pub fn select<S: AsRef<str>>(&self, names: Option<&[S]>) -> Vec<&ProviderProfile> {
        match names {
            Some(names) if !names.is_empty() => names
                .iter()
                .filter_map(|name| {
                    let name = name.as_ref().trim();
                    let profile = self.get(name);
                    if profile.is_none() {
                        debug!("Ignoring unknown provider {:?}", name);
                    }
                    profile
                })
                .collect(),
            _ => self.profiles.iter().collect(),
        }
    }
}

impl Default for ProviderCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}
