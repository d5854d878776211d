//! Mid-market rate sources.
//!
//! [`LiveRateSource`] asks a public daily-rate feed for the latest rate and, on
//! any failure (transport error, timeout, bad status, malformed payload, missing
//! or non-positive rate), falls back to a compiled-in table of recent rates.
//! A pair that neither knows resolves to 0, which the engine turns into
//! [`crate::RemitError::RateUnavailable`].
//!
//! [`FallbackRates`] and [`FixedRate`] are offline sources for `--offline`,
//! `--rate` and tests.

use std::collections::HashMap;
use std::time::Duration;

use log::{debug, info, warn};
use reqwest::blocking::Client;
use serde::Deserialize;

use crate::currency::Currency;
use crate::error::RemitError;
use crate::net::{FEED_TIMEOUT_SECS, FEED_URL, USER_AGENT, latest_url};
use crate::result::Result;

/// Something that can resolve a mid-market rate for a currency pair.
///
/// Implementations never fail: an unknown pair yields 0.
pub trait RateSource: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &str;

    /// Destination units per source unit, or 0 when the pair is unknown.
    fn mid_market_rate(&self, from: &str, to: &str) -> f64;
}

/// Recent approximate rate for a supported corridor into KES.
pub fn fallback_rate(from: &str, to: &str) -> Option<f64> {
    let from = from.trim().parse::<Currency>().ok()?;
    let to = to.trim().parse::<Currency>().ok()?;
    match (from, to) {
        (Currency::USD, Currency::KES) => Some(129.50),
        (Currency::GBP, Currency::KES) => Some(164.20),
        (Currency::EUR, Currency::KES) => Some(140.80),
        (Currency::CAD, Currency::KES) => Some(95.30),
        (Currency::AED, Currency::KES) => Some(35.25),
        (Currency::AUD, Currency::KES) => Some(84.60),
        _ => None,
    }
}

/// Offline source backed by the fallback table only.
#[derive(Debug, Clone, Copy, Default)]
pub struct FallbackRates;

impl RateSource for FallbackRates {
    fn name(&self) -> &str {
        "fallback"
    }

    fn mid_market_rate(&self, from: &str, to: &str) -> f64 {
        fallback_rate(from, to).unwrap_or(0.0)
    }
}

/// Source that answers every pair with the same pinned rate.
#[derive(Debug, Clone, Copy)]
pub struct FixedRate(pub f64);

impl RateSource for FixedRate {
    fn name(&self) -> &str {
        "fixed"
    }

    fn mid_market_rate(&self, _from: &str, _to: &str) -> f64 {
        self.0
    }
}

#[derive(Debug, Deserialize)]
struct FeedResponse {
    rates: HashMap<String, serde_json::Value>,
}

/// Extract `rates[to]` from a feed payload such as
/// `{"amount":1.0,"base":"USD","date":"2024-05-02","rates":{"KES":131.25}}`.
///
/// Every other field is ignored. The rate must be a positive finite number.
pub fn parse_feed_rate(body: &[u8], to: &str) -> Result<f64> {
    let payload: FeedResponse = serde_json::from_slice(body)?;
    let rate = payload
        .rates
        .get(to)
        .and_then(serde_json::Value::as_f64)
        .ok_or_else(|| RemitError::Feed(format!("no numeric {} rate in payload", to)))?;
    if rate.is_finite() && rate > 0.0 {
        Ok(rate)
    } else {
        Err(RemitError::Feed(format!("non-positive {} rate {}", to, rate)))
    }
}

/// Live feed client with fallback to [`fallback_rate`].
///
/// Each call to [`RateSource::mid_market_rate`] issues exactly one request;
/// nothing is cached between calls.
pub struct LiveRateSource {
    client: Client,
    base_url: String,
}

impl LiveRateSource {
    /// Build a client for the feed at `base_url` with a per-request `timeout`.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()?;
        Ok(Self {
            client,
            base_url: base_url.to_string(),
        })
    }

    /// Client for the public feed with the default timeout.
    pub fn with_defaults() -> Result<Self> {
        Self::new(FEED_URL, Duration::from_secs(FEED_TIMEOUT_SECS))
    }

    /// Ask the feed for the latest rate, surfacing every failure.
    pub fn fetch(&self, from: &str, to: &str) -> Result<f64> {
        let url = latest_url(&self.base_url);
        debug!("Requesting {} rate from {} (from={}, to={})", from, url, from, to);
        let response = self
            .client
            .get(&url)
            .query(&[("from", from), ("to", to)])
            .send()?
            .error_for_status()?;
        let body = response.bytes()?;
        parse_feed_rate(&body, to)
    }
}

impl RateSource for LiveRateSource {
    fn name(&self) -> &str {
        "live"
    }

    fn mid_market_rate(&self, from: &str, to: &str) -> f64 {
        match self.fetch(from, to) {
            Ok(rate) => {
                info!("Live mid-market rate {}→{}: {}", from, to, rate);
                rate
            }
            Err(e) => {
                let rate = fallback_rate(from, to).unwrap_or(0.0);
                warn!(
                    "Live rate for {}→{} unavailable ({}); fallback table gives {}",
                    from, to, e, rate
                );
                rate
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Read, Write};
    use std::net::TcpListener;
    use std::sync::mpsc;
    use std::thread;
    use std::time::Instant;

    /// Serve one canned HTTP response on a loopback port; the request head is
    /// sent back over the returned channel.
    fn serve_once(status: &str, body: &str) -> (String, mpsc::Receiver<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let base = format!("http://{}", listener.local_addr().unwrap());
        let response = format!(
            "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
            status,
            body.len(),
            body
        );
        let (tx, rx) = mpsc::channel();
        thread::spawn(move || {
            let (mut stream, _) = listener.accept().unwrap();
            let mut head = Vec::new();
            let mut buf = [0u8; 1024];
            while !head.windows(4).any(|w| w == b"\r\n\r\n") {
                let n = stream.read(&mut buf).unwrap();
                if n == 0 {
                    break;
                }
                head.extend_from_slice(&buf[..n]);
            }
            stream.write_all(response.as_bytes()).unwrap();
            let _ = tx.send(String::from_utf8_lossy(&head).to_string());
        });
        (base, rx)
    }

    fn closed_port_url() -> String {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);
        format!("http://{}", addr)
    }

    #[test]
    fn fallback_table_covers_supported_corridors() {
        assert_eq!(fallback_rate("USD", "KES"), Some(129.50));
        assert!(fallback_rate("GBP", "KES").unwrap() > 130.0);
        for code in ["EUR", "CAD", "AED", "AUD"] {
            assert!(fallback_rate(code, "KES").unwrap() > 0.0);
        }
        assert_eq!(fallback_rate("usd", "kes"), Some(129.50));
        assert_eq!(fallback_rate("KES", "USD"), None);
        assert_eq!(fallback_rate("XYZ", "KES"), None);
        assert_eq!(FallbackRates.mid_market_rate("XYZ", "KES"), 0.0);
    }

    #[test]
    fn parse_feed_rate_reads_only_the_target_field() {
        let body = br#"{"amount":1.0,"base":"USD","date":"2024-05-02","rates":{"KES":131.25,"EUR":"n/a"}}"#;
        assert_eq!(parse_feed_rate(body, "KES").unwrap(), 131.25);
    }

    #[test]
    fn parse_feed_rate_rejects_bad_payloads() {
        assert!(matches!(
            parse_feed_rate(b"not json", "KES"),
            Err(RemitError::SerdeJson(_))
        ));
        assert!(matches!(
            parse_feed_rate(br#"{"rates":{}}"#, "KES"),
            Err(RemitError::Feed(_))
        ));
        assert!(matches!(
            parse_feed_rate(br#"{"rates":{"KES":0}}"#, "KES"),
            Err(RemitError::Feed(_))
        ));
        assert!(matches!(
            parse_feed_rate(br#"{"rates":{"KES":-3.5}}"#, "KES"),
            Err(RemitError::Feed(_))
        ));
        assert!(parse_feed_rate(br#"{"base":"USD"}"#, "KES").is_err());
    }

    #[test]
    fn live_source_uses_feed_rate() {
        let (base, head_rx) = serve_once("200 OK", r#"{"base":"USD","rates":{"KES":131.25}}"#);
        let source = LiveRateSource::new(&base, Duration::from_secs(2)).unwrap();
        assert_eq!(source.mid_market_rate("USD", "KES"), 131.25);

        let head = head_rx.recv().unwrap();
        assert!(head.starts_with("GET /latest?from=USD&to=KES"));
        assert!(head.to_ascii_lowercase().contains("user-agent: remit_lens/"));
    }

    #[test]
    fn live_source_falls_back_on_server_error() {
        let (base, _head_rx) = serve_once("500 Internal Server Error", "{}");
        let source = LiveRateSource::new(&base, Duration::from_secs(2)).unwrap();
        assert_eq!(source.mid_market_rate("GBP", "KES"), 164.20);
    }

    #[test]
    fn live_source_falls_back_on_malformed_payload() {
        let (base, _head_rx) = serve_once("200 OK", r#"{"rates":{"KES":"soon"}}"#);
        let source = LiveRateSource::new(&base, Duration::from_secs(2)).unwrap();
        assert_eq!(source.mid_market_rate("USD", "KES"), 129.50);
    }

    #[test]
    fn live_source_falls_back_when_network_is_down() {
        let source = LiveRateSource::new(&closed_port_url(), Duration::from_secs(2)).unwrap();
        assert!(source.fetch("USD", "KES").is_err());
        assert_eq!(source.mid_market_rate("USD", "KES"), 129.50);
        assert_eq!(source.mid_market_rate("XYZ", "KES"), 0.0);
    }

    #[test]
    fn live_source_falls_back_when_feed_hangs() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let base = format!("http://{}", listener.local_addr().unwrap());
        thread::spawn(move || {
            let (_stream, _) = listener.accept().unwrap();
            thread::sleep(Duration::from_secs(3));
        });

        let source = LiveRateSource::new(&base, Duration::from_millis(200)).unwrap();
        let started = Instant::now();
        assert_eq!(source.mid_market_rate("USD", "KES"), 129.50);
        assert!(started.elapsed() < Duration::from_millis(1500));
    }

    #[test]
    fn fixed_rate_ignores_the_pair() {
        assert_eq!(FixedRate(129.5).mid_market_rate("GBP", "KES"), 129.5);
        assert_eq!(FixedRate(0.0).name(), "fixed");
    }
}
