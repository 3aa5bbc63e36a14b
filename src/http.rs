//! Shared HTTP client construction with sensible defaults.

use crate::error::{RadioError, Result};
use std::time::Duration;

const USER_AGENT: &str = concat!("radiohost/", env!("CARGO_PKG_VERSION"));

/// Create an HTTP client with a custom timeout. A zero timeout means none.
///
/// Wikipedia rejects anonymous clients, so every client carries a user agent.
pub fn create_client_with_timeout(timeout: Duration) -> Result<reqwest::Client> {
    let mut builder = reqwest::Client::builder().user_agent(USER_AGENT);
    if !timeout.is_zero() {
        builder = builder.timeout(timeout);
    }
    builder
        .build()
        .map_err(|e| RadioError::Config(format!("Failed to create HTTP client: {}", e)))
}

/// Join an endpoint path onto a configured base URL.
pub fn endpoint(base_url: &str, path: &str) -> Result<url::Url> {
    let base = url::Url::parse(base_url)
        .map_err(|e| RadioError::Config(format!("Invalid base URL '{}': {}", base_url, e)))?;
    base.join(path.trim_start_matches('/'))
        .map_err(|e| RadioError::Config(format!("Invalid endpoint '{}': {}", path, e)))
}
