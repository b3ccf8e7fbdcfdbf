//! Retrying HTTP GET helper shared by every upstream client.
//!
//! The policy is flat: a fixed number of attempts and a fixed
//! delay, with no backoff or jitter. Only an HTTP 200 counts as success.
//! Transport errors are followed by the delay; a non-200 status is retried
//! immediately unless [`RetryPolicy::delay_on_status`] is set.

use std::time::Duration;

use reqwest::{Client, StatusCode, Url};
use serde_json::Value;
use tracing::{debug, warn};

use crate::config::Config;

/// Retry parameters for [`Fetcher`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total number of attempts, including the first.
    pub attempts: u32,
    /// Wait applied after a failed attempt (never after the last one).
    pub delay: Duration,
    /// Whether a non-200 response also waits `delay` before the next attempt.
    pub delay_on_status: bool,
}

impl RetryPolicy {
    /// Whether the failure of `attempt` (1-based) should be followed by a wait.
    fn should_wait(&self, attempt: u32, transport_error: bool) -> bool {
        attempt < self.attempts && (transport_error || self.delay_on_status)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            attempts: 3,
            delay: Duration::from_millis(200),
            delay_on_status: false,
        }
    }
}

impl From<&crate::config::RetryConfig> for RetryPolicy {
    fn from(config: &crate::config::RetryConfig) -> Self {
        Self {
            attempts: config.attempts.max(1),
            delay: config.delay(),
            delay_on_status: config.delay_on_status,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("no data from {url} after {attempts} attempts")]
    Exhausted { url: String, attempts: u32 },

    #[error("invalid upstream URL {0}")]
    InvalidUrl(String),
}

/// Failure of a fetch that expects a JSON body.
#[derive(Debug, thiserror::Error)]
pub enum UpstreamError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error("upstream returned an empty body")]
    Empty,

    #[error("upstream returned malformed JSON: {0}")]
    Decode(#[from] serde_json::Error),
}

impl UpstreamError {
    /// True when no usable body was received at all (as opposed to a body
    /// that failed to parse).
    pub fn is_missing(&self) -> bool {
        matches!(self, Self::Fetch(_) | Self::Empty)
    }
}

/// HTTP GET with a fixed retry policy.
///
/// Cheap to clone; clones share the underlying connection pool.
#[derive(Debug, Clone)]
pub struct Fetcher {
    client: Client,
    policy: RetryPolicy,
}

impl Fetcher {
    pub fn new(client: Client, policy: RetryPolicy) -> Self {
        Self { client, policy }
    }

    /// Build a fetcher from the `[retry]` and `[upstream]` config sections.
    pub fn from_config(config: &Config) -> Result<Self, reqwest::Error> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.upstream.request_timeout() {
            builder = builder.timeout(timeout);
        }
        let client = builder.build()?;

        Ok(Self::new(client, RetryPolicy::from(&config.retry)))
    }

    /// GET `url` and return the body of the first HTTP 200 response.
    pub async fn get_text(&self, url: &Url) -> Result<String, FetchError> {
        let target = redacted(url);

        for attempt in 1..=self.policy.attempts {
            debug!(url = %target, attempt, "upstream GET");

            let transport_error = match self.client.get(url.clone()).send().await {
                Ok(resp) if resp.status() == StatusCode::OK => match resp.text().await {
                    Ok(body) => return Ok(body),
                    Err(e) => {
                        warn!(
                            url = %target,
                            attempt,
                            attempts = self.policy.attempts,
                            error = %e,
                            "failed to read upstream body"
                        );
                        true
                    }
                },
                Ok(resp) => {
                    warn!(
                        url = %target,
                        attempt,
                        attempts = self.policy.attempts,
                        status = %resp.status(),
                        "upstream returned non-200 status"
                    );
                    false
                }
                Err(e) => {
                    warn!(
                        url = %target,
                        attempt,
                        attempts = self.policy.attempts,
                        error = %e,
                        "upstream request failed"
                    );
                    true
                }
            };

            if self.policy.should_wait(attempt, transport_error) {
                tokio::time::sleep(self.policy.delay).await;
            }
        }

        warn!(url = %target, "all retry attempts failed");
        Err(FetchError::Exhausted {
            url: target,
            attempts: self.policy.attempts,
        })
    }

    /// GET `url` and parse the body as JSON. An empty body counts as no data.
    pub async fn get_json(&self, url: &Url) -> Result<Value, UpstreamError> {
        let body = self.get_text(url).await?;
        if body.is_empty() {
            return Err(UpstreamError::Empty);
        }
        Ok(serde_json::from_str(&body)?)
    }
}

/// Parse `base` and append `segments` as individually percent-encoded path
/// segments.
pub fn join_segments<'a>(
    base: &str,
    segments: impl IntoIterator<Item = &'a str>,
) -> Result<Url, FetchError> {
    let mut url = Url::parse(base).map_err(|_| FetchError::InvalidUrl(base.to_string()))?;
    {
        let mut path = url
            .path_segments_mut()
            .map_err(|_| FetchError::InvalidUrl(base.to_string()))?;
        path.pop_if_empty();
        path.extend(segments);
    }
    Ok(url)
}

/// URL without its query string, for logs. Keeps API keys out of the output.
fn redacted(url: &Url) -> String {
    let mut url = url.clone();
    url.set_query(None);
    url.to_string()
}
