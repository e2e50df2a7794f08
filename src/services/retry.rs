// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Bounded retry with exponential backoff for calls to Google.
//!
//! Only transient failures are retried: timeouts, connection errors, 5xx,
//! 408 and 429. Everything else (including 400/401/403) is returned to the
//! caller on the first attempt.

use reqwest::{RequestBuilder, Response, StatusCode};
use std::time::Duration;

/// Retry schedule for one outbound call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Extra attempts after the first one
    pub max_retries: u32,
    /// Delay before the first retry; doubles each retry
    pub initial_delay: Duration,
    /// Upper bound for any single delay
    pub max_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 2,
            initial_delay: Duration::from_millis(200),
            max_delay: Duration::from_secs(2),
        }
    }
}

impl RetryPolicy {
    /// Policy with `max_retries` and the default backoff.
    pub fn with_max_retries(max_retries: u32) -> Self {
        Self {
            max_retries,
            ..Self::default()
        }
    }

    /// A single attempt, no retries.
    pub fn none() -> Self {
        Self::with_max_retries(0)
    }

    /// Delay before retry number `retry` (0-based).
    pub fn delay_for(&self, retry: u32) -> Duration {
        let factor = 2u32.saturating_pow(retry);
        self.initial_delay
            .saturating_mul(factor)
            .min(self.max_delay)
    }
}

/// Whether a response status is worth another attempt.
pub fn is_transient_status(status: StatusCode) -> bool {
    status.is_server_error()
        || status == StatusCode::TOO_MANY_REQUESTS
        || status == StatusCode::REQUEST_TIMEOUT
}

/// Whether a transport error is worth another attempt.
pub fn is_transient_error(error: &reqwest::Error) -> bool {
    error.is_timeout() || error.is_connect()
}

/// Send the request produced by `build`, retrying transient failures.
///
/// `build` is called once per attempt since a `RequestBuilder` is consumed by
/// `send`. When retries run out on a transient status the last response is
/// returned so the caller can map the status itself.
pub async fn send_with_retry<F>(policy: RetryPolicy, build: F) -> Result<Response, reqwest::Error>
where
    F: Fn() -> RequestBuilder,
{
    let mut retry = 0;
    loop {
        let last_attempt = retry >= policy.max_retries;

        match build().send().await {
            Ok(response) if !last_attempt && is_transient_status(response.status()) => {
                tracing::warn!(
                    status = %response.status(),
                    attempt = retry + 1,
                    "Transient status from Google, retrying"
                );
            }
            Ok(response) => {
                if retry > 0 {
                    tracing::info!(retries = retry, "Google request completed after retries");
                }
                return Ok(response);
            }
            Err(e) if !last_attempt && is_transient_error(&e) => {
                tracing::warn!(error = %e, attempt = retry + 1, "Transient error calling Google, retrying");
            }
            Err(e) => return Err(e),
        }

        tokio::time::sleep(policy.delay_for(retry)).await;
        retry += 1;
    }
}
