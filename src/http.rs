//! Shared HTTP client for upstream services
//!
//! Retries are layered here, around the client, so the fetchers themselves stay single-shot.

use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::Client;
use reqwest_middleware::{ClientBuilder, ClientWithMiddleware};
use reqwest_retry::{RetryTransientMiddleware, policies::ExponentialBackoff};
use tracing::debug;

const USER_AGENT: &str = concat!("surfcast/", env!("CARGO_PKG_VERSION"));

/// Shortest wait between retry attempts
pub const MIN_RETRY_INTERVAL: Duration = Duration::from_millis(500);
/// Longest wait between retry attempts
pub const MAX_RETRY_INTERVAL: Duration = Duration::from_secs(10);

/// Build the HTTP client shared by the marine and places collaborators
pub fn build_client(timeout: Duration, max_retries: u32) -> Result<ClientWithMiddleware> {
    let client = Client::builder()
        .timeout(timeout)
        .user_agent(USER_AGENT)
        .build()
        .with_context(|| "Failed to create HTTP client")?;

    let mut builder = ClientBuilder::new(client);
    if max_retries > 0 {
        debug!("Retrying transient HTTP failures up to {} times", max_retries);
        let policy = ExponentialBackoff::builder()
            .retry_bounds(MIN_RETRY_INTERVAL, MAX_RETRY_INTERVAL)
            .build_with_max_retries(max_retries);
        builder = builder.with(RetryTransientMiddleware::new_with_policy(policy));
    }

    Ok(builder.build())
}

/// Upper bound for one request through [`build_client`], counting every attempt
/// and the backoff waits between them
#[must_use]
pub fn request_budget(timeout: Duration, max_retries: u32) -> Duration {
    timeout * (max_retries + 1) + MAX_RETRY_INTERVAL * max_retries
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_client_with_and_without_retries() {
        assert!(build_client(Duration::from_secs(5), 0).is_ok());
        assert!(build_client(Duration::from_secs(5), 3).is_ok());
    }

    #[test]
    fn test_request_budget_covers_retry_waits() {
        let timeout = Duration::from_secs(30);

        assert_eq!(request_budget(timeout, 0), timeout);

        let budget = request_budget(timeout, 2);
        assert_eq!(budget, Duration::from_secs(110));
    }
}
