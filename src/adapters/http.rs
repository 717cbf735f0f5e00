//! Shared blocking HTTP plumbing for the network adapters.

use crate::domain::error::SignalError;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::debug;

pub const TIMEOUT: Duration = Duration::from_secs(30);
pub const USER_AGENT: &str = "Mozilla/5.0";

pub fn build_client() -> Result<reqwest::blocking::Client, SignalError> {
    reqwest::blocking::Client::builder()
        .timeout(TIMEOUT)
        .user_agent(USER_AGENT)
        .build()
        .map_err(|e| SignalError::source("http client", e))
}

/// GET `url` and decode the JSON body. Non-2xx statuses are errors.
pub fn get_json<T: DeserializeOwned>(
    client: &reqwest::blocking::Client,
    source: &str,
    url: &str,
) -> Result<T, SignalError> {
    debug!(source, url, "GET");
    let resp = client
        .get(url)
        .send()
        .map_err(|e| SignalError::source(source, e))?;
    let status = resp.status();
    if !status.is_success() {
        return Err(SignalError::source(source, format!("HTTP {status} for {url}")));
    }
    resp.json()
        .map_err(|e| SignalError::source(source, format!("failed to parse response: {e}")))
}

pub fn get_text(
    client: &reqwest::blocking::Client,
    source: &str,
    url: &str,
) -> Result<String, SignalError> {
    debug!(source, url, "GET");
    let resp = client
        .get(url)
        .send()
        .map_err(|e| SignalError::source(source, e))?;
    let status = resp.status();
    if !status.is_success() {
        return Err(SignalError::source(source, format!("HTTP {status} for {url}")));
    }
    resp.text().map_err(|e| SignalError::source(source, e))
}
