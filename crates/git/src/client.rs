//! HTTP client construction for provider API calls.

use std::time::Duration;

/// User-Agent sent with every provider request. GitHub rejects requests
/// without one.
pub const USER_AGENT: &str = "atelier";

/// Build the HTTP client shared by all provider calls.
///
/// The timeout applies per request; a timed-out call surfaces as a
/// transport failure, never an error.
pub fn http_client(timeout: Duration) -> reqwest::Result<reqwest::Client> {
    reqwest::Client::builder().timeout(timeout).build()
}
