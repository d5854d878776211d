//! Networking constants and small helpers shared by the library and binaries.

/// Base URL of the public daily rate feed (ECB rates via Frankfurter).
pub const FEED_URL: &str = "https://api.frankfurter.app";
/// Upper bound for one live rate request, in seconds.
pub const FEED_TIMEOUT_SECS: u64 = 8;
/// Default TCP port of `remit_server`.
pub const COMMAND_PORT: u16 = 8080;
/// User agent sent to the rate feed.
pub const USER_AGENT: &str = concat!("remit_lens/", env!("CARGO_PKG_VERSION"));

/// Helper to format an IPv4 address with a port like "ip:port".
pub fn addr(ip: &str, port: u16) -> String {
    format!("{}:{}", ip, port)
}

/// Build the feed URL for the latest rate endpoint.
pub fn latest_url(base: &str) -> String {
    format!("{}/latest", base.trim_end_matches('/'))
}
