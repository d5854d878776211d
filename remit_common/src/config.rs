//! Command-line options that pick and configure the mid-market rate source.
//!
//! Both binaries flatten [`RateArgs`] into their own `clap` parser.
use std::time::Duration;

use clap::Args;
use log::info;

use crate::net::{FEED_TIMEOUT_SECS, FEED_URL};
use crate::rate::{FallbackRates, FixedRate, LiveRateSource, RateSource};
use crate::result::Result;

/// Rate source options.
#[derive(Debug, Clone, Args)]
pub struct RateArgs {
    /// Base URL of the daily rate feed.
    #[arg(long, default_value = FEED_URL)]
    pub feed_url: String,

    /// Timeout for one feed request, in seconds.
    #[arg(long, default_value_t = FEED_TIMEOUT_SECS)]
    pub feed_timeout_secs: u64,

    /// Skip the live feed and use the built-in fallback rates.
    #[arg(long, conflicts_with = "rate")]
    pub offline: bool,

    /// Pin the mid-market rate instead of looking it up.
    #[arg(long)]
    pub rate: Option<f64>,
}

impl Default for RateArgs {
    fn default() -> Self {
        Self {
            feed_url: FEED_URL.to_string(),
            feed_timeout_secs: FEED_TIMEOUT_SECS,
            offline: false,
            rate: None,
        }
    }
}

impl RateArgs {
    /// Build the rate source these options describe.
    pub fn build_source(&self) -> Result<Box<dyn RateSource>> {
        if let Some(rate) = self.rate {
            info!("Using pinned mid-market rate {}", rate);
            return Ok(Box::new(FixedRate(rate)));
        }
        if self.offline {
            info!("Offline mode: using built-in fallback rates");
            return Ok(Box::new(FallbackRates));
        }
        let source = LiveRateSource::new(
            &self.feed_url,
            Duration::from_secs(self.feed_timeout_secs),
        )?;
        Ok(Box::new(source))
    }
}
