//! HTTP transport with bounded retry.

use crate::query::QueryRequest;
use async_trait::async_trait;
use precatorio_core::{ConfigError, CrawlerConfig, TransportCause, TransportConfig, TransportError};
use rand::Rng;
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE, ORIGIN, REFERER, USER_AGENT};
use reqwest::Client;
use serde_json::Value;
use std::future::Future;
use std::time::Duration;
use uuid::Uuid;

const POWERBI_ORIGIN: &str = "https://app.powerbi.com";
const RESOURCE_KEY_HEADER: &str = "x-powerbi-resourcekey";
const BODY_PREVIEW_CHARS: usize = 512;

/// Sends one page request and hands back the parsed JSON body.
///
/// Implementations retry internally; an `Err` means the retry budget for
/// that page is spent.
#[async_trait]
pub trait PageTransport: Send + Sync {
    async fn fetch(&self, request: &QueryRequest, page: u32) -> Result<Value, TransportError>;
}

// ============================================================================
// RETRY POLICY
// ============================================================================

/// Exponential backoff with jitter, bounded by attempt count.
#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub initial_backoff: Duration,
    pub max_backoff: Duration,
    pub multiplier: f64,
    pub jitter: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::from_config(&TransportConfig::default())
    }
}

impl RetryPolicy {
    pub fn from_config(config: &TransportConfig) -> Self {
        Self {
            max_attempts: config.max_attempts.max(1),
            initial_backoff: config.initial_backoff(),
            max_backoff: config.max_backoff(),
            multiplier: config.backoff_multiplier,
            jitter: Duration::from_millis(config.jitter_ms),
        }
    }

    /// No waiting between attempts.
    pub fn immediate(max_attempts: u32) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            initial_backoff: Duration::ZERO,
            max_backoff: Duration::ZERO,
            multiplier: 1.0,
            jitter: Duration::ZERO,
        }
    }

    /// Delay before retrying after `attempt` (1-based) failed, without jitter.
    pub fn backoff_for(&self, attempt: u32) -> Duration {
        let exponent = attempt.saturating_sub(1).min(32) as i32;
        let base_ms = self.initial_backoff.as_millis() as f64 * self.multiplier.powi(exponent);
        let capped = base_ms.min(self.max_backoff.as_millis() as f64);
        Duration::from_millis(capped as u64)
    }

    fn jittered(&self, attempt: u32) -> Duration {
        let base = self.backoff_for(attempt);
        let jitter_ms = self.jitter.as_millis() as u64;
        if jitter_ms == 0 {
            return base;
        }
        base + Duration::from_millis(rand::rng().random_range(0..=jitter_ms))
    }

    /// Run `op` until it succeeds, fails with a non-retryable cause, or the
    /// attempt budget runs out.
    pub async fn run<F, Fut, T>(&self, page: u32, mut op: F) -> Result<T, TransportError>
    where
        F: FnMut(u32) -> Fut,
        Fut: Future<Output = Result<T, TransportCause>>,
    {
        let mut attempt = 1;
        loop {
            match op(attempt).await {
                Ok(value) => return Ok(value),
                Err(cause) if cause.is_retryable() && attempt < self.max_attempts => {
                    let delay = self.jittered(attempt);
                    tracing::warn!(
                        page,
                        attempt,
                        delay_ms = delay.as_millis() as u64,
                        %cause,
                        "Page request failed, retrying"
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(cause) => {
                    return Err(TransportError {
                        page,
                        attempts: attempt,
                        cause,
                    })
                }
            }
        }
    }
}

// ============================================================================
// HTTP TRANSPORT
// ============================================================================

/// Transport posting to the public query endpoint.
pub struct HttpTransport {
    client: Client,
    api_url: String,
    retry: RetryPolicy,
    config: TransportConfig,
}

impl HttpTransport {
    /// Build a client carrying the report's static headers. Rejects a config
    /// that fails `CrawlerConfig::validate`.
    pub fn new(config: &CrawlerConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let mut headers = HeaderMap::new();
        headers.insert(
            CONTENT_TYPE,
            HeaderValue::from_static("application/json;charset=UTF-8"),
        );
        headers.insert(ORIGIN, HeaderValue::from_static(POWERBI_ORIGIN));
        headers.insert(REFERER, HeaderValue::from_static("https://app.powerbi.com/"));
        headers.insert(
            USER_AGENT,
            HeaderValue::from_str(&config.source.user_agent).map_err(|e| {
                ConfigError::InvalidValue {
                    field: "source.user_agent",
                    reason: e.to_string(),
                }
            })?,
        );
        headers.insert(
            RESOURCE_KEY_HEADER,
            HeaderValue::from_str(&config.source.resource_key).map_err(|e| {
                ConfigError::InvalidValue {
                    field: "source.resource_key",
                    reason: e.to_string(),
                }
            })?,
        );

        let client = Client::builder()
            .default_headers(headers)
            .build()
            .map_err(|e| ConfigError::InvalidValue {
                field: "transport",
                reason: format!("Failed to build HTTP client: {}", e),
            })?;

        Ok(Self {
            client,
            api_url: config.source.api_url.clone(),
            retry: RetryPolicy::from_config(&config.transport),
            config: config.transport.clone(),
        })
    }

    async fn attempt(&self, request: &QueryRequest, timeout: Duration) -> Result<Value, TransportCause> {
        let activity_id = Uuid::new_v4().to_string();
        let request_id = Uuid::new_v4().to_string();
        let response = self
            .client
            .post(&self.api_url)
            .header("ActivityId", activity_id)
            .header("RequestId", request_id)
            .timeout(timeout)
            .json(request)
            .send()
            .await
            .map_err(|e| classify(e, timeout))?;

        let status = response.status();
        let body = response.bytes().await.map_err(|e| classify(e, timeout))?;
        if !status.is_success() {
            let text = String::from_utf8_lossy(&body);
            return Err(TransportCause::Status {
                status: status.as_u16(),
                body: text.chars().take(BODY_PREVIEW_CHARS).collect(),
            });
        }
        serde_json::from_slice(&body).map_err(|e| TransportCause::InvalidBody {
            reason: e.to_string(),
        })
    }
}

fn classify(error: reqwest::Error, timeout: Duration) -> TransportCause {
    if error.is_timeout() {
        TransportCause::Timeout {
            after_ms: timeout.as_millis() as u64,
        }
    } else if let Some(status) = error.status() {
        TransportCause::Status {
            status: status.as_u16(),
            body: String::new(),
        }
    } else {
        TransportCause::Network {
            reason: error.to_string(),
        }
    }
}

#[async_trait]
impl PageTransport for HttpTransport {
    async fn fetch(&self, request: &QueryRequest, page: u32) -> Result<Value, TransportError> {
        let page_size = request_window(request).unwrap_or(0);
        let timeout = self.config.timeout_for(page_size);
        self.retry
            .run(page, |_attempt| self.attempt(request, timeout))
            .await
    }
}

fn request_window(request: &QueryRequest) -> Option<u32> {
    request
        .queries
        .first()?
        .query
        .commands
        .first()?
        .semantic_query_data_shape_command
        .binding
        .data_reduction
        .primary
        .window
        .count
}

impl std::fmt::Debug for HttpTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpTransport")
            .field("api_url", &self.api_url)
            .field("retry", &self.retry)
            .finish()
    }
}

// ============================================================================
// TESTS
// ============================================================================
