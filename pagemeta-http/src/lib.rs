//! Static page fetcher with safe logging.
//!
//! - One GET per call, fixed browser user agent, hard per-request timeout
//! - No retries: a failure is reported and the caller decides what to do next
//! - Redacts sensitive query params in logs
//! - Optional *raw* request/response logging via `PAGEMETA_HTTP_RAW=1`
//!
//! Example (no_run):
//! ```rust,no_run
//! # async fn demo() -> Result<(), pagemeta_http::HttpError> {
//! use std::time::Duration;
//!
//! let client = pagemeta_http::HttpClient::new("Mozilla/5.0", Duration::from_secs(10))?;
//! let page = client.get_text("https://example.com/story").await?;
//! println!("{} bytes from {}", page.body.len(), page.final_url);
//! # Ok(()) }
//! ```
//!
//! Observability: structured `tracing` events are emitted for request start,
//! response headers, body snippets (truncated), final errors, and (optionally)
//! raw request/response lines (target `http.raw`).

use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderValue, USER_AGENT};
use reqwest::{Client, StatusCode, Url};
use std::env;
use std::time::{Duration, Instant};
use thiserror::Error;

const RAW_ENV: &str = "PAGEMETA_HTTP_RAW";
const RAW_MAX_BODY: usize = 64 * 1024;
const SNIPPET_MAX: usize = 500;

fn raw_enabled() -> bool {
    matches!(
        env::var(RAW_ENV).as_deref(),
        Ok("1") | Ok("true") | Ok("yes")
    )
}

#[derive(Debug, Error)]
pub enum HttpError {
    #[error("invalid URL: {0}")]
    Url(String),
    #[error("client build failed: {0}")]
    Build(String),
    #[error("request timed out after {0:?}")]
    Timeout(Duration),
    #[error("network error: {0}")]
    Network(String),
    #[error("server returned {status} for {url}")]
    Status { status: StatusCode, url: String },
    #[error("failed to read body: {0}")]
    Body(String),
}

/// A successfully fetched document.
#[derive(Debug, Clone)]
pub struct FetchedPage {
    /// URL after redirects.
    pub final_url: Url,
    pub status: StatusCode,
    pub content_type: Option<String>,
    pub body: String,
}

#[derive(Clone)]
pub struct HttpClient {
    inner: Client,
    pub user_agent: String,
    pub timeout: Duration,
}

impl HttpClient {
    /// Build a client that sends `user_agent` and gives up after `timeout`.
    ///
    /// ```no_run
    /// use pagemeta_http::{HttpClient, HttpError};
    /// use std::time::Duration;
    ///
    /// let client = HttpClient::new("Mozilla/5.0", Duration::from_secs(10))?;
    /// assert_eq!(client.timeout, Duration::from_secs(10));
    /// # Ok::<(), HttpError>(())
    /// ```
    pub fn new(user_agent: &str, timeout: Duration) -> Result<Self, HttpError> {
        let ua = HeaderValue::from_str(user_agent)
            .map_err(|e| HttpError::Build(format!("invalid user agent: {e}")))?;
        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, ua);

        let inner = Client::builder()
            .default_headers(headers)
            .connect_timeout(timeout.min(Duration::from_secs(5)))
            .redirect(reqwest::redirect::Policy::limited(10))
            .build()
            .map_err(|e| HttpError::Build(e.to_string()))?;

        Ok(Self {
            inner,
            user_agent: user_agent.to_string(),
            timeout,
        })
    }

    /// GET `url` and return the decoded body. Non-2xx is an error.
    pub async fn get_text(&self, url: &str) -> Result<FetchedPage, HttpError> {
        let url = Url::parse(url).map_err(|e| HttpError::Url(e.to_string()))?;
        let req_id = uuid::Uuid::new_v4().simple().to_string();
        let (host_path, redacted_q) = redact_query(&url);

        tracing::debug!(
            req_id = %req_id,
            host_path = %host_path,
            query = ?redacted_q,
            timeout_ms = self.timeout.as_millis() as u64,
            "http.request.start"
        );

        if raw_enabled() {
            tracing::debug!(
                target: "http.raw",
                %req_id,
                curl = %make_curl(&url, &self.user_agent),
                "request"
            );
        }

        let t0 = Instant::now();
        let resp = self
            .inner
            .get(url.clone())
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|err| self.classify(&req_id, err, "send"))?;

        let status = resp.status();
        let final_url = resp.url().clone();
        let headers = resp.headers().clone();
        let content_type = headers
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);

        tracing::debug!(
            req_id = %req_id,
            %status,
            final_url = %final_url,
            content_type = ?content_type,
            content_length = ?headers.get(reqwest::header::CONTENT_LENGTH),
            duration_ms = t0.elapsed().as_millis() as u64,
            "http.response.headers"
        );

        if !status.is_success() {
            tracing::warn!(req_id = %req_id, %status, host_path = %host_path, "http.error.status");
            return Err(HttpError::Status {
                status,
                url: url.to_string(),
            });
        }

        let body = resp
            .text()
            .await
            .map_err(|err| match self.classify(&req_id, err, "body") {
                HttpError::Network(message) => HttpError::Body(message),
                other => other,
            })?;

        tracing::trace!(
            req_id = %req_id,
            body_snippet = %snip_body(&body, SNIPPET_MAX),
            "http.response.body_snippet"
        );

        if raw_enabled() {
            tracing::info!(
                target: "http.raw",
                %req_id,
                %status,
                duration_ms = t0.elapsed().as_millis() as u64,
                body = %snip_body(&body, RAW_MAX_BODY),
                truncated = body.len() > RAW_MAX_BODY,
                "response"
            );
        }

        Ok(FetchedPage {
            final_url,
            status,
            content_type,
            body,
        })
    }

    fn classify(&self, req_id: &str, err: reqwest::Error, stage: &'static str) -> HttpError {
        if err.is_timeout() {
            tracing::warn!(req_id = %req_id, stage, timeout_ms = self.timeout.as_millis() as u64, "http.timeout");
            return HttpError::Timeout(self.timeout);
        }
        let message = err.to_string();
        tracing::warn!(req_id = %req_id, stage, message = %message, "http.network_error");
        HttpError::Network(message)
    }
}

/// Best-effort curl line for reproducing a fetch, secrets redacted.
fn make_curl(url: &Url, user_agent: &str) -> String {
    let mut shown = url.clone();
    let (_, redacted) = redact_query(url);
    if !redacted.is_empty() {
        shown.query_pairs_mut().clear().extend_pairs(redacted.iter());
    }
    format!(
        "curl -XGET -H 'User-Agent: {}' '{}'",
        user_agent.replace('\'', r"'\''"),
        shown.as_str()
    )
}

fn snip_body(body: &str, max: usize) -> String {
    if body.len() <= max {
        return body.to_string();
    }
    let mut end = max;
    while !body.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}...", &body[..end])
}

fn is_secret_param(key: &str) -> bool {
    matches!(
        key.to_ascii_lowercase().as_str(),
        "access_token"
            | "authorization"
            | "auth"
            | "key"
            | "api_key"
            | "token"
            | "secret"
            | "client_secret"
            | "bearer"
    )
}

/// "host + path" and the query pairs with secrets replaced, for logging.
fn redact_query(url: &Url) -> (String, Vec<(String, String)>) {
    let host_path = format!("{}{}", url.host_str().unwrap_or("-"), url.path());
    let redacted = url
        .query_pairs()
        .map(|(k, v)| {
            let v = if is_secret_param(&k) {
                "<redacted>".to_string()
            } else {
                v.into_owned()
            };
            (k.into_owned(), v)
        })
        .collect();
    (host_path, redacted)
}
