//! Quote data model and the quote builder.
//!
//! A `Quote` is what one provider would deliver for one transfer: the explicit
//! fee, the exchange rate it applies, and what the recipient ends up with. Quotes
//! are built once per comparison by [`build_quote`] and never modified afterwards.
//! The derived figures (true cost, effective rate) are computed on read.

use std::fmt;

use chrono::{DateTime, Utc};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use crate::catalog::ProviderProfile;

/// Round `value` to `places` decimal places.
///
/// Works on the exact binary value of `value` and breaks ties to even, so
/// `0.125` becomes `0.12` while `0.135` (stored slightly above) becomes `0.14`.
/// Values `Decimal` cannot hold (NaN, infinities, huge magnitudes) pass through.
pub fn round_to(value: f64, places: u32) -> f64 {
    Decimal::from_f64_retain(value)
        .map(|exact| exact.round_dp_with_strategy(places, RoundingStrategy::MidpointNearestEven))
        .and_then(|rounded| rounded.to_f64())
        .unwrap_or(value)
}

/// One provider's estimated quote for a transfer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quote {
    /// Provider name, e.g. `Wise`.
    pub provider: String,
    /// Source currency code, e.g. `USD`.
    pub send_currency: String,
    /// Destination currency code, e.g. `KES`.
    pub receive_currency: String,
    /// Amount the sender pays, fee included.
    pub send_amount: f64,
    /// Amount the recipient gets, in the destination currency.
    pub receive_amount: f64,
    /// Explicit fee in the source currency.
    pub fee: f64,
    /// Rate the provider applies (destination units per source unit).
    pub exchange_rate: f64,
    /// Mid-market rate the quote was computed against.
    pub mid_market_rate: f64,
    /// How far `exchange_rate` sits below mid-market, in percent.
    pub spread_percent: f64,
    /// Delivery time bucket, e.g. `minutes` or `1-3 hours`.
    pub transfer_time: String,
    /// Delivery methods, comma separated.
    pub delivery_method: String,
    /// `true` for rate-table estimates, `false` for live provider quotes.
    pub estimated: bool,
    /// When the quote was computed.
    pub retrieved_at: DateTime<Utc>,
    /// Link that starts the transfer on the provider's site; may be empty.
    pub url: String,
}

impl Quote {
    /// Total cost as a percentage of the send amount: fee share plus spread,
    /// rounded to 2 decimals.
    pub fn true_cost_percent(&self) -> f64 {
        let fee_percent = if self.send_amount > 0.0 {
            self.fee / self.send_amount * 100.0
        } else {
            0.0
        };
        round_to(fee_percent + self.spread_percent, 2)
    }

    /// Destination units received per source unit actually converted
    /// (`receive / (send - fee)`), rounded to 2 decimals. Zero when nothing is
    /// converted.
    pub fn effective_rate(&self) -> f64 {
        if self.send_amount <= 0.0 {
            return 0.0;
        }
        let net_send = self.send_amount - self.fee;
        if net_send > 0.0 {
            round_to(self.receive_amount / net_send, 2)
        } else {
            0.0
        }
    }

    /// Iterate the delivery methods listed in [`Quote::delivery_method`].
    pub fn delivery_methods(&self) -> impl Iterator<Item = &str> {
        self.delivery_method
            .split(',')
            .map(str::trim)
            .filter(|method| !method.is_empty())
    }

    /// `true` if `channel` is one of this quote's delivery methods.
    pub fn delivers_to(&self, channel: &str) -> bool {
        let channel = channel.trim();
        self.delivery_methods()
            .any(|method| method.eq_ignore_ascii_case(channel))
    }
}

impl fmt::Display for Quote {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Quote({}: send {} {:.2} → {} {:.0}, fee={:.2}, spread={:.1}%, true_cost={:.2}%, time={})",
            self.provider,
            self.send_currency,
            self.send_amount,
            self.receive_currency,
            self.receive_amount,
            self.fee,
            self.spread_percent,
            self.true_cost_percent(),
            self.transfer_time
        )
    }
}

/// Apply one provider's cost model to a transfer.
///
/// The fee comes from the profile's [`crate::catalog::FeeModel`]; the provider's
/// rate is `mid_market_rate * (1 - spread / 100)`; the recipient gets
/// `(send_amount - fee) * rate`, or 0 when the fee eats the whole amount.
/// Amounts are rounded to 2 decimals and rates to 4 on output; intermediate
/// values stay unrounded.
pub fn build_quote(
    profile: &ProviderProfile,
    send_amount: f64,
    from_currency: &str,
    to_currency: &str,
    mid_market_rate: f64,
) -> Quote {
    let fee = profile.fee.fee_for(send_amount);
    let provider_rate = mid_market_rate * (1.0 - profile.spread_pct / 100.0);
    let net_send = send_amount - fee;
    let receive_amount = if net_send > 0.0 {
        net_send * provider_rate
    } else {
        0.0
    };

    Quote {
        provider: profile.name.to_string(),
        send_currency: from_currency.to_string(),
        receive_currency: to_currency.to_string(),
        send_amount,
        receive_amount: round_to(receive_amount, 2),
        fee: round_to(fee, 2),
        exchange_rate: round_to(provider_rate, 4),
        mid_market_rate: round_to(mid_market_rate, 4),
        spread_percent: round_to(profile.spread_pct, 2),
        transfer_time: profile.speed.to_string(),
        delivery_method: profile.delivery_text(),
        estimated: true,
        retrieved_at: Utc::now(),
        url: profile.deep_link(send_amount, from_currency),
    }
}
