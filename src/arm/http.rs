//! HTTP transport for ARM REST API calls

use crate::error::TransportError;
use async_trait::async_trait;
use reqwest::header::{HeaderValue, AUTHORIZATION, RETRY_AFTER};
use reqwest::{Client, Request, StatusCode};
use std::time::Duration;

/// Maximum length of response body to log (to avoid logging sensitive data)
const MAX_LOG_BODY_LENGTH: usize = 200;

const DEFAULT_MAX_RETRIES: u32 = 3;
const DEFAULT_RETRY_DELAY: Duration = Duration::from_millis(500);

/// Upper bound for a server supplied `Retry-After`
const MAX_RETRY_AFTER: Duration = Duration::from_secs(60);

/// Sanitize response body for logging
/// Truncates long responses and strips control characters
pub(crate) fn sanitize_for_log(body: &str) -> String {
    let truncated = if body.len() > MAX_LOG_BODY_LENGTH {
        let mut end = MAX_LOG_BODY_LENGTH;
        while !body.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}... [truncated, {} bytes total]", &body[..end], body.len())
    } else {
        body.to_string()
    };

    truncated.replace(|c: char| !c.is_ascii_graphic() && c != ' ', "")
}

/// Status and body of a completed HTTP exchange
#[derive(Debug, Clone)]
pub struct RawResponse {
    pub status: StatusCode,
    pub body: String,
}

/// Sends one prepared request.
///
/// Implementations own any retry behaviour; the client calls `send` once per
/// page and treats the returned response as final.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: Request) -> Result<RawResponse, TransportError>;
}

/// Default transport: reqwest with a bounded retry on throttling and
/// transient server errors
#[derive(Clone)]
pub struct ArmHttpClient {
    client: Client,
    bearer_token: Option<String>,
    max_retries: u32,
    retry_delay: Duration,
    timeout: Option<Duration>,
}

impl ArmHttpClient {
    /// Create a new HTTP transport
    pub fn new() -> Result<Self, TransportError> {
        let client = Client::builder()
            .user_agent(concat!("evgrid/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            bearer_token: None,
            max_retries: DEFAULT_MAX_RETRIES,
            retry_delay: DEFAULT_RETRY_DELAY,
            timeout: None,
        })
    }

    /// Attach a pre-acquired bearer token to every request
    pub fn with_bearer_token(mut self, token: impl Into<String>) -> Self {
        self.bearer_token = Some(token.into());
        self
    }

    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// Initial delay between attempts; doubles after each retry
    pub fn with_retry_delay(mut self, delay: Duration) -> Self {
        self.retry_delay = delay;
        self
    }

    /// Per-attempt timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    fn is_retryable(status: StatusCode) -> bool {
        matches!(
            status,
            StatusCode::TOO_MANY_REQUESTS
                | StatusCode::INTERNAL_SERVER_ERROR
                | StatusCode::BAD_GATEWAY
                | StatusCode::SERVICE_UNAVAILABLE
                | StatusCode::GATEWAY_TIMEOUT
        )
    }

    async fn attempt(
        &self,
        mut request: Request,
    ) -> Result<(RawResponse, Option<Duration>), TransportError> {
        if let Some(token) = &self.bearer_token {
            let value = HeaderValue::from_str(&format!("Bearer {}", token))
                .map_err(|_| TransportError::InvalidToken)?;
            request.headers_mut().insert(AUTHORIZATION, value);
        }
        if let Some(timeout) = self.timeout {
            *request.timeout_mut() = Some(timeout);
        }

        let response = self.client.execute(request).await.map_err(|e| {
            if e.is_timeout() {
                TransportError::Timeout(self.timeout.unwrap_or_default())
            } else {
                TransportError::Http(e)
            }
        })?;

        let status = response.status();
        let retry_after = response
            .headers()
            .get(RETRY_AFTER)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.trim().parse::<u64>().ok())
            .map(|secs| Duration::from_secs(secs).min(MAX_RETRY_AFTER));
        let body = response.text().await?;

        Ok((RawResponse { status, body }, retry_after))
    }
}

#[async_trait]
impl Transport for ArmHttpClient {
    async fn send(&self, request: Request) -> Result<RawResponse, TransportError> {
        tracing::debug!("{} {}", request.method(), request.url());

        let mut delay = self.retry_delay;
        let mut attempt = 0;
        let mut pending = request;

        loop {
            // GET requests carry no body, so cloning only fails for streamed bodies
            let retry_copy = if attempt < self.max_retries {
                pending.try_clone()
            } else {
                None
            };

            let (response, retry_after) = self.attempt(pending).await?;

            match retry_copy {
                Some(next) if Self::is_retryable(response.status) => {
                    let wait = retry_after.unwrap_or(delay);
                    tracing::warn!(
                        "Retrying after {} ({}/{}), waiting {:?}",
                        response.status,
                        attempt + 1,
                        self.max_retries,
                        wait
                    );
                    tokio::time::sleep(wait).await;
                    delay = delay.saturating_mul(2);
                    attempt += 1;
                    pending = next;
                }
                _ => {
                    if !response.status.is_success() {
                        tracing::error!(
                            "API error: {} - {}",
                            response.status,
                            sanitize_for_log(&response.body)
                        );
                    }
                    return Ok(response);
                }
            }
        }
    }
}
