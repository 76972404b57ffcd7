//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the harvester, including:
//! - Building the HTTP client with a browser user agent and default headers
//! - A randomized throttle before every request
//! - Retry with exponential backoff for transient failures
//! - Streaming media downloads to disk

use crate::config::{CrawlerConfig, SiteConfig};
use crate::HarvestError;
use futures::StreamExt;
use rand::seq::SliceRandom;
use rand::Rng;
use reqwest::header::{self, HeaderMap, HeaderValue};
use reqwest::{Client, Response, StatusCode};
use std::path::Path;
use std::time::Duration;
use tokio::io::AsyncWriteExt;

/// Desktop browser identities; one is picked per client
pub const USER_AGENTS: &[&str] = &[
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/121.0 Safari/537.36",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10.15) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.0 Safari/605.1.15",
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:121.0) Gecko/20100101 Firefox/121.0",
];

const ACCEPT: &str =
    "text/html,application/xhtml+xml,application/xml;q=0.9,image/avif,image/webp,*/*;q=0.8";

/// Statuses worth another attempt
const RETRY_STATUSES: &[StatusCode] = &[
    StatusCode::TOO_MANY_REQUESTS,
    StatusCode::INTERNAL_SERVER_ERROR,
    StatusCode::BAD_GATEWAY,
    StatusCode::SERVICE_UNAVAILABLE,
    StatusCode::GATEWAY_TIMEOUT,
];

/// Query parameters attached to a request
pub type Query<'q> = [(&'q str, String)];

/// Pacing and retry behavior for outgoing requests
#[derive(Debug, Clone, PartialEq)]
pub struct RequestPolicy {
    /// Fixed pause before every request
    pub delay: Duration,
    /// Upper bound of the random pause added to `delay`
    pub jitter: Duration,
    /// Extra attempts after the first one
    pub max_retries: u32,
    /// Backoff factor; attempt n waits `retry_backoff * 2^(n-1)`
    pub retry_backoff: Duration,
}

impl RequestPolicy {
    pub fn from_config(config: &CrawlerConfig) -> Self {
        Self {
            delay: seconds(config.delay),
            jitter: seconds(config.jitter),
            max_retries: config.max_retries,
            retry_backoff: seconds(config.retry_backoff),
        }
    }

    fn backoff(&self, attempt: u32) -> Duration {
        let exponent = attempt.saturating_sub(1).min(16);
        self.retry_backoff.saturating_mul(1 << exponent)
    }
}

fn seconds(value: f64) -> Duration {
    Duration::try_from_secs_f64(value).unwrap_or(Duration::ZERO)
}

/// Builds an HTTP client with proper configuration
///
/// # Arguments
///
/// * `crawler` - Supplies the request timeout
/// * `site` - Supplies the Accept-Language header
///
/// # Returns
///
/// * `Ok(Client)` - Successfully built HTTP client
/// * `Err(reqwest::Error)` - Failed to build client
pub fn build_http_client(crawler: &CrawlerConfig, site: &SiteConfig) -> Result<Client, reqwest::Error> {
    let user_agent = USER_AGENTS
        .choose(&mut rand::thread_rng())
        .copied()
        .unwrap_or(USER_AGENTS[0]);

    let mut headers = HeaderMap::new();
    headers.insert(header::ACCEPT, HeaderValue::from_static(ACCEPT));
    match HeaderValue::from_str(&site.accept_language) {
        Ok(value) => {
            headers.insert(header::ACCEPT_LANGUAGE, value);
        }
        Err(e) => tracing::warn!(
            "Ignoring invalid accept-language {:?}: {}",
            site.accept_language,
            e
        ),
    }

    Client::builder()
        .user_agent(user_agent)
        .default_headers(headers)
        .timeout(Duration::from_secs(crawler.request_timeout.max(1)))
        .connect_timeout(Duration::from_secs(10))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Throttled, retrying GET transport shared by every stage of a run
pub struct Fetcher {
    client: Client,
    policy: RequestPolicy,
}

impl Fetcher {
    pub fn new(crawler: &CrawlerConfig, site: &SiteConfig) -> Result<Self, reqwest::Error> {
        Ok(Self::with_client(
            build_http_client(crawler, site)?,
            RequestPolicy::from_config(crawler),
        ))
    }

    pub fn with_client(client: Client, policy: RequestPolicy) -> Self {
        Self { client, policy }
    }

    /// Fetches a URL and returns its decoded body
    ///
    /// # Retry Logic
    ///
    /// | Condition | Action |
    /// |-----------|--------|
    /// | HTTP 429, 500, 502, 503, 504 | Retry up to `max_retries`, exponential backoff |
    /// | Timeout / connection error | Retry up to `max_retries`, exponential backoff |
    /// | Any other non-2xx status | Immediate failure |
    pub async fn fetch_text(&self, url: &str, query: &Query<'_>) -> Result<String, HarvestError> {
        let response = self.send(url, query).await?;
        response.text().await.map_err(|source| HarvestError::Http {
            url: url.to_string(),
            source,
        })
    }

    /// Fetches an HTML page, logging and swallowing failures
    pub async fn fetch_html(&self, url: &str) -> Option<String> {
        match self.fetch_text(url, &[]).await {
            Ok(body) => Some(body),
            Err(e) => {
                tracing::warn!("Request failed for {}: {}", url, e);
                None
            }
        }
    }

    /// Streams a URL to `dest`, creating parent directories as needed
    ///
    /// A partially written file is removed if the body stream breaks.
    ///
    /// # Returns
    ///
    /// * `Ok(u64)` - Number of bytes written
    /// * `Err(HarvestError)` - The request or the write failed
    pub async fn download(&self, url: &str, dest: &Path) -> Result<u64, HarvestError> {
        let response = self.send(url, &[]).await?;

        if let Some(parent) = dest.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        match stream_to_file(response, url, dest).await {
            Ok(written) => Ok(written),
            Err(e) => {
                if let Err(remove_err) = tokio::fs::remove_file(dest).await {
                    tracing::debug!(
                        "Could not remove partial file {}: {}",
                        dest.display(),
                        remove_err
                    );
                }
                Err(e)
            }
        }
    }

    /// Sends a GET request, throttled once and retried per policy
    async fn send(&self, url: &str, query: &Query<'_>) -> Result<Response, HarvestError> {
        self.throttle().await;

        let mut attempt = 0;
        loop {
            let mut request = self.client.get(url);
            if !query.is_empty() {
                request = request.query(query);
            }

            match request.send().await {
                Ok(response) => {
                    let status = response.status();
                    if status.is_success() {
                        return Ok(response);
                    }

                    if RETRY_STATUSES.contains(&status) && attempt < self.policy.max_retries {
                        attempt += 1;
                        self.wait_before_retry(url, attempt, &status.to_string())
                            .await;
                        continue;
                    }

                    return Err(HarvestError::HttpStatus {
                        url: url.to_string(),
                        status: status.as_u16(),
                    });
                }
                Err(e) => {
                    if (e.is_timeout() || e.is_connect()) && attempt < self.policy.max_retries {
                        attempt += 1;
                        self.wait_before_retry(url, attempt, &e.to_string()).await;
                        continue;
                    }

                    return Err(HarvestError::Http {
                        url: url.to_string(),
                        source: e,
                    });
                }
            }
        }
    }

    async fn throttle(&self) {
        let pause = self.policy.delay + random_fraction(self.policy.jitter);
        if !pause.is_zero() {
            tracing::trace!("Throttling for {:?}", pause);
            tokio::time::sleep(pause).await;
        }
    }

    async fn wait_before_retry(&self, url: &str, attempt: u32, reason: &str) {
        let wait = self.policy.backoff(attempt);
        tracing::trace!(
            "Retry {}/{} for {} in {:?} ({})",
            attempt,
            self.policy.max_retries,
            url,
            wait,
            reason
        );
        if !wait.is_zero() {
            tokio::time::sleep(wait).await;
        }
    }
}

/// Uniform random duration in `[0, max)`
fn random_fraction(max: Duration) -> Duration {
    if max.is_zero() {
        return Duration::ZERO;
    }
    max.mul_f64(rand::thread_rng().gen::<f64>())
}

async fn stream_to_file(response: Response, url: &str, dest: &Path) -> Result<u64, HarvestError> {
    let mut file = tokio::fs::File::create(dest).await?;
    let mut stream = response.bytes_stream();
    let mut written = 0u64;

    while let Some(chunk) = stream.next().await {
        let chunk = chunk.map_err(|source| HarvestError::Http {
            url: url.to_string(),
            source,
        })?;
        file.write_all(&chunk).await?;
        written += chunk.len() as u64;
    }

    file.flush().await?;
    Ok(written)
}
