//! Comparison result and its ranking views.
//!
//! A [`Comparison`] holds every quote computed for one request together with the
//! corridor, the send amount and the mid-market rate used. The views (best rate,
//! fastest, best for a delivery channel, full ranking) are derived on demand.
//! [`ComparisonReport`] is a serialisable snapshot of those views, used for JSON
//! output and by the server.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::catalog::{DeliveryMethod, TransferSpeed};
use crate::quote::{Quote, round_to};

/// Result of comparing providers for one corridor and amount.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Comparison {
    /// Source currency code.
    pub send_currency: String,
    /// Destination currency code.
    pub receive_currency: String,
    /// Amount sent, in the source currency.
    pub send_amount: f64,
    /// Mid-market rate every quote was built against.
    pub mid_market_rate: f64,
    /// One quote per selected provider, in selection order.
    pub quotes: Vec<Quote>,
    /// When the comparison was made.
    pub retrieved_at: DateTime<Utc>,
}

impl Comparison {
    /// Wrap freshly built quotes.
    pub fn new(
        send_currency: &str,
        receive_currency: &str,
        send_amount: f64,
        mid_market_rate: f64,
        quotes: Vec<Quote>,
    ) -> Self {
        Self {
            send_currency: send_currency.to_string(),
            receive_currency: receive_currency.to_string(),
            send_amount,
            mid_market_rate,
            quotes,
            retrieved_at: Utc::now(),
        }
    }

    /// Quote that puts the most money in the recipient's hands.
    ///
    /// The first quote wins a tie.
    pub fn best_rate(&self) -> Option<&Quote> {
        self.quotes.iter().reduce(|best, quote| {
            if quote.receive_amount > best.receive_amount {
                quote
            } else {
                best
            }
        })
    }

    /// Quote with the quickest delivery bucket; unknown buckets rank last.
    pub fn fastest(&self) -> Option<&Quote> {
        self.quotes
            .iter()
            .min_by_key(|quote| TransferSpeed::rank(&quote.transfer_time))
    }

    /// Cheapest quote (by true cost) among those delivering to `channel`.
    ///
    /// Falls back to [`Comparison::best_rate`] when no quote offers the channel.
    pub fn best_for_delivery(&self, channel: &str) -> Option<&Quote> {
        self.quotes
            .iter()
            .filter(|quote| quote.delivers_to(channel))
            .min_by(|a, b| a.true_cost_percent().total_cmp(&b.true_cost_percent()))
            .or_else(|| self.best_rate())
    }

    /// Cheapest quote delivering to M-Pesa.
    pub fn best_to_mpesa(&self) -> Option<&Quote> {
        self.best_for_delivery(&DeliveryMethod::MPesa.to_string())
    }

    /// All quotes ordered by true cost, cheapest first. Ties keep their original order.
    pub fn ranked(&self) -> Vec<&Quote> {
        let mut ranked: Vec<&Quote> = self.quotes.iter().collect();
        ranked.sort_by(|a, b| a.true_cost_percent().total_cmp(&b.true_cost_percent()));
        ranked
    }

    /// What the recipient would get at the mid-market rate with no fee.
    pub fn mid_market_receive(&self) -> f64 {
        round_to(self.send_amount * self.mid_market_rate, 2)
    }

    /// Build the serialisable snapshot of every view. `channel` picks the
    /// delivery method for the channel-best view.
    pub fn report(&self, channel: &str) -> ComparisonReport {
        let mid_market_receive = self.mid_market_receive();
        let ranked = self.ranked();
        let worst_receive = ranked.last().map_or(0.0, |quote| quote.receive_amount);

        let ranked = ranked
            .into_iter()
            .enumerate()
            .map(|(index, quote)| RankedQuote {
                rank: index + 1,
                true_cost_percent: quote.true_cost_percent(),
                effective_rate: quote.effective_rate(),
                vs_mid_market: round_to(quote.receive_amount - mid_market_receive, 2),
                savings_vs_worst: round_to(quote.receive_amount - worst_receive, 2),
                quote: quote.clone(),
            })
            .collect();

        ComparisonReport {
            send_currency: self.send_currency.clone(),
            receive_currency: self.receive_currency.clone(),
            send_amount: self.send_amount,
            mid_market_rate: self.mid_market_rate,
            mid_market_receive,
            retrieved_at: self.retrieved_at,
            channel: channel.to_string(),
            best_rate: self.best_rate().cloned(),
            fastest: self.fastest().cloned(),
            best_for_channel: self.best_for_delivery(channel).cloned(),
            ranked,
        }
    }
}

/// One row of the ranked table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedQuote {
    /// 1-based position, cheapest first.
    pub rank: usize,
    /// Fee share plus spread, in percent.
    pub true_cost_percent: f64,
    /// Destination units per converted source unit.
    pub effective_rate: f64,
    /// Receive amount minus the mid-market receive amount (never positive in practice).
    pub vs_mid_market: f64,
    /// How much more the recipient gets than with the worst-ranked provider.
    pub savings_vs_worst: f64,
    /// The quote itself.
    #[serde(flatten)]
    pub quote: Quote,
}

/// Serialisable snapshot of a comparison and all of its views.
#[allow(missing_docs)]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComparisonReport {
    pub send_currency: String,
    pub receive_currency: String,
    pub send_amount: f64,
    pub mid_market_rate: f64,
    pub mid_market_receive: f64,
    pub retrieved_at: DateTime<Utc>,
    /// Delivery channel used for `best_for_channel`.
    pub channel: String,
    pub best_rate: Option<Quote>,
    pub fastest: Option<Quote>,
    pub best_for_channel: Option<Quote>,
    pub ranked: Vec<RankedQuote>,
}
