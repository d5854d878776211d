//! Error types shared by the engine, the CLI and the server.
//!
//! The `RemitError` enum unifies the failure cases of rate resolution, catalog
//! validation, serialization and the TCP plumbing, so every crate in the
//! workspace can propagate a single error type.
use std::io;

use thiserror::Error;

/// Unified error type shared by the library and both binaries.
#[derive(Error, Debug)]
pub enum RemitError {
    /// Neither the live feed nor the fallback table produced a positive rate.
    ///
    /// This is the only error a comparison can fail with.
    #[error("Could not get exchange rate for {from}→{to}")]
    RateUnavailable {
        /// Source currency code.
        from: String,
        /// Destination currency code.
        to: String,
    },

    /// Transport failure while talking to the rate feed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The rate feed answered, but without a usable rate.
    #[error("Rate feed error: {0}")]
    Feed(String),

    /// I/O error originating from sockets or the terminal.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Failure while encoding/decoding JSON via serde_json.
    #[error("JSON serialization/deserialization error: {0}")]
    SerdeJson(#[from] serde_json::Error),

    /// A provider profile breaks a catalog invariant.
    #[error("Invalid profile for {provider}: {reason}")]
    InvalidProfile {
        /// Provider name.
        provider: String,
        /// Which invariant failed.
        reason: String,
    },

    /// Caller input rejected before it reaches the engine.
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// A remote server answered with an error payload.
    #[error("Server error: {0}")]
    Server(String),

    /// Channel send failed (e.g., receiver dropped); contains a short context string.
    #[error("Channel send failed: {0}")]
    ChannelSend(String),

    /// Channel receive failed (e.g., sender closed); contains a short context string.
    #[error("Channel receive failed: {0}")]
    ChannelRecv(String),
}

impl RemitError {
    /// Shorthand for [`RemitError::RateUnavailable`].
    pub fn rate_unavailable(from: &str, to: &str) -> Self {
        RemitError::RateUnavailable {
            from: from.to_string(),
            to: to.to_string(),
        }
    }

    /// `true` for the one error that terminates a comparison request.
    pub fn is_rate_unavailable(&self) -> bool {
        matches!(self, RemitError::RateUnavailable { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rate_unavailable_message_names_the_pair() {
        let err = RemitError::rate_unavailable("XYZ", "KES");
        assert!(err.is_rate_unavailable());
        assert!(err.to_string().contains("exchange rate"));
        assert!(err.to_string().contains("XYZ→KES"));
    }

    #[test]
    fn io_errors_convert() {
        let err: RemitError = io::Error::other("boom").into();
        assert!(matches!(err, RemitError::Io(_)));
        assert!(!err.is_rate_unavailable());
    }
}
