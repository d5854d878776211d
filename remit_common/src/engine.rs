//! Comparison engine: resolves the mid-market rate once and quotes every
//! selected provider against it.
//!
//! The engine owns a [`RateSource`] and a [`ProviderCatalog`]; both are read-only,
//! so one engine can serve any number of concurrent requests (wrap it in an
//! `Arc`). Every call allocates its own quotes and result.

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

use crate::catalog::{DeliveryMethod, ProviderCatalog};
use crate::comparison::Comparison;
use crate::currency::{DEFAULT_RECEIVE_CURRENCY, normalize_code};
use crate::error::RemitError;
use crate::quote::build_quote;
use crate::rate::{FallbackRates, LiveRateSource, RateSource};
use crate::result::Result;

fn default_receive_currency() -> String {
    DEFAULT_RECEIVE_CURRENCY.to_string()
}

fn default_channel() -> String {
    DeliveryMethod::MPesa.to_string()
}

/// Inputs of one comparison.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompareRequest {
    /// Amount to send, in `from_currency`.
    pub send_amount: f64,
    /// Source currency code.
    pub from_currency: String,
    /// Destination currency code.
    #[serde(default = "default_receive_currency")]
    pub to_currency: String,
    /// Subset of provider names; `None` or empty compares every provider.
    #[serde(default)]
    pub providers: Option<Vec<String>>,
    /// Delivery channel for the channel-best view of the report.
    #[serde(default = "default_channel")]
    pub channel: String,
}

impl CompareRequest {
    /// Request for `send_amount` from `from_currency` into KES, all providers.
    pub fn new(send_amount: f64, from_currency: &str) -> Self {
        Self {
            send_amount,
            from_currency: from_currency.to_string(),
            to_currency: default_receive_currency(),
            providers: None,
            channel: default_channel(),
        }
    }

    /// Set the destination currency.
    pub fn to(mut self, to_currency: &str) -> Self {
        self.to_currency = to_currency.to_string();
        self
    }

    /// Restrict the comparison to the named providers.
    pub fn providers<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.providers = Some(names.into_iter().map(Into::into).collect());
        self
    }

    /// Set the delivery channel used by the report.
    pub fn channel(mut self, channel: &str) -> Self {
        self.channel = channel.to_string();
        self
    }

    /// Reject amounts no transfer can have. The engine itself does not call this;
    /// outer surfaces do before handing a request over.
    pub fn validate(&self) -> Result<()> {
        if !self.send_amount.is_finite() || self.send_amount <= 0.0 {
            return Err(RemitError::InvalidRequest(format!(
                "send amount must be a positive number, got {}",
                self.send_amount
            )));
        }
        if self.from_currency.trim().is_empty() || self.to_currency.trim().is_empty() {
            return Err(RemitError::InvalidRequest(
                "currency codes must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

/// Rate source + catalog, ready to answer comparisons.
pub struct ComparisonEngine {
    rates: Box<dyn RateSource>,
    catalog: ProviderCatalog,
}

impl ComparisonEngine {
    /// Engine over `rates` and the built-in provider catalog.
    pub fn new(rates: impl RateSource + 'static) -> Self {
        Self::with_catalog(rates, ProviderCatalog::builtin())
    }

    /// Engine over `rates` and a custom catalog.
    pub fn with_catalog(rates: impl RateSource + 'static, catalog: ProviderCatalog) -> Self {
        Self {
            rates: Box::new(rates),
            catalog,
        }
    }

    /// Engine over an already boxed source, as produced by [`crate::config::RateArgs`].
    pub fn from_boxed(rates: Box<dyn RateSource>) -> Self {
        Self {
            rates,
            catalog: ProviderCatalog::builtin(),
        }
    }

    /// The provider catalog this engine quotes from.
    pub fn catalog(&self) -> &ProviderCatalog {
        &self.catalog
    }

    /// Compare the selected providers for one transfer.
    ///
    /// Resolves the mid-market rate exactly once. Fails with
    /// [`RemitError::RateUnavailable`] when that rate is not positive; unknown
    /// provider names are skipped silently.
    pub fn compare(&self, request: &CompareRequest) -> Result<Comparison> {
        let from = normalize_code(&request.from_currency);
        let to = normalize_code(&request.to_currency);

        let mid_rate = self.rates.mid_market_rate(&from, &to);
        if mid_rate.is_nan() || mid_rate <= 0.0 {
            return Err(RemitError::rate_unavailable(&from, &to));
        }
        info!(
            "Comparing {} {} → {} at mid-market {} ({} source)",
            request.send_amount,
            from,
            to,
            mid_rate,
            self.rates.name()
        );

        let quotes = self
            .catalog
            .select(request.providers.as_deref())
            .into_iter()
            .map(|profile| {
                let quote = build_quote(profile, request.send_amount, &from, &to, mid_rate);
                debug!("{}", quote);
                quote
            })
            .collect();

        Ok(Comparison::new(&from, &to, request.send_amount, mid_rate, quotes))
    }
}

/// One-shot comparison against the live feed (with fallback) and the built-in catalog.
///
/// Like [`ComparisonEngine::compare`], the only error is
/// [`RemitError::RateUnavailable`]: if no HTTP client can be built, the
/// fallback table answers instead.
pub fn compare(request: &CompareRequest) -> Result<Comparison> {
    engine_or_fallback(LiveRateSource::with_defaults()).compare(request)
}

fn engine_or_fallback(live: Result<LiveRateSource>) -> ComparisonEngine {
    match live {
        Ok(source) => ComparisonEngine::new(source),
        Err(e) => {
            warn!("Live rate client unavailable ({}); using fallback rates", e);
            ComparisonEngine::new(FallbackRates)
        }
    }
}
