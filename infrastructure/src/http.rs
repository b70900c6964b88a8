//! Shared outbound HTTP client construction.

use std::time::Duration;

const USER_AGENT: &str = concat!("contact-relay/", env!("CARGO_PKG_VERSION"));

/// Build a client with `timeout` applied to every request.
pub fn build_client(timeout: Duration) -> Result<reqwest::Client, reqwest::Error> {
    reqwest::Client::builder()
        .timeout(timeout)
        .user_agent(USER_AGENT)
        .build()
}

/// Short, single-line description of a transport error for logs.
pub(crate) fn describe(error: &reqwest::Error) -> String {
    if error.is_timeout() {
        "request timed out".to_string()
    } else if error.is_connect() {
        "connection failed".to_string()
    } else {
        error.to_string()
    }
}
