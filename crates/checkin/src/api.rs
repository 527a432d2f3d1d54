//! REST API client for the check-in endpoints.
//!
//! Wraps `POST /ticket/scan/{code}` and `GET /ticket/scan-list` using
//! [`reqwest`]. Every call is a single request with a fixed timeout; no
//! caching and no retries.

use std::time::Duration;

use galaxy_core::context::Session;
use galaxy_core::ticket::Ticket;
use reqwest::header::AUTHORIZATION;
use reqwest::Url;
use serde::Deserialize;

/// Default timeout for a single check-in request.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// HTTP client for one check-in backend.
#[derive(Debug)]
pub struct CheckInApi {
    client: reqwest::Client,
    base_url: Url,
    session: Session,
}

/// Standard `{ "data": T }` success envelope.
#[derive(Debug, Deserialize)]
pub struct DataEnvelope<T> {
    pub data: T,
    #[serde(default)]
    pub message: Option<String>,
}

/// Error body returned on non-2xx responses.
#[derive(Debug, Default, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub code: Option<String>,
}

/// Errors from the check-in REST layer.
#[derive(Debug, thiserror::Error)]
pub enum CheckInApiError {
    /// The HTTP request itself failed (network, DNS, TLS, bad body, etc.).
    #[error("HTTP request failed: {0}")]
    Request(#[source] reqwest::Error),

    /// No response within the request timeout.
    #[error("Request timed out")]
    Timeout,

    /// The backend returned a non-2xx status code.
    #[error("Check-in API error ({status}): {}", .message.as_deref().unwrap_or("<no message>"))]
    ApiError {
        /// HTTP status code.
        status: u16,
        /// The body's `message` field, when present.
        message: Option<String>,
    },

    /// The configured base URL cannot carry path segments.
    #[error("Invalid base URL: {0}")]
    InvalidBaseUrl(String),
}

impl From<reqwest::Error> for CheckInApiError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            CheckInApiError::Timeout
        } else {
            CheckInApiError::Request(e)
        }
    }
}

impl CheckInApi {
    /// Create a client with its own connection pool and `timeout`.
    ///
    /// * `base_url` - API root, e.g. `http://host:3000/api/v1`.
    pub fn new(
        base_url: &str,
        timeout: Duration,
        session: Session,
    ) -> Result<Self, CheckInApiError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Self::with_client(client, base_url, session)
    }

    /// Create an API client reusing an existing [`reqwest::Client`].
    pub fn with_client(
        client: reqwest::Client,
        base_url: &str,
        session: Session,
    ) -> Result<Self, CheckInApiError> {
        let base_url =
            Url::parse(base_url).map_err(|e| CheckInApiError::InvalidBaseUrl(format!("{base_url}: {e}")))?;
        if base_url.cannot_be_a_base() {
            return Err(CheckInApiError::InvalidBaseUrl(base_url.to_string()));
        }
        Ok(Self {
            client,
            base_url,
            session,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Check a ticket in.
    ///
    /// Sends `POST /ticket/scan/{code}` with an empty body. The code is
    /// percent-encoded as a single path segment.
    pub async fn scan(&self, code: &str) -> Result<Ticket, CheckInApiError> {
        let url = self.endpoint(&["ticket", "scan", code])?;
        let response = self.authorized(self.client.post(url)).send().await?;
        let envelope: DataEnvelope<Ticket> = Self::parse_response(response).await?;
        Ok(envelope.data)
    }

    /// Fetch every ticket for the operator's scan list.
    ///
    /// Sends `GET /ticket/scan-list`.
    pub async fn scan_list(&self) -> Result<Vec<Ticket>, CheckInApiError> {
        let url = self.endpoint(&["ticket", "scan-list"])?;
        let response = self.authorized(self.client.get(url)).send().await?;
        let envelope: DataEnvelope<Vec<Ticket>> = Self::parse_response(response).await?;
        Ok(envelope.data)
    }

    // ---- private helpers ----

    /// Join `segments` onto the base URL, encoding each one.
    fn endpoint(&self, segments: &[&str]) -> Result<Url, CheckInApiError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| CheckInApiError::InvalidBaseUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn authorized(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match self.session.authorization() {
            Some(value) => request.header(AUTHORIZATION, value),
            None => request,
        }
    }

    /// Ensure the response has a success status code. On failure the
    /// body's `message` field is extracted when the body is JSON.
    async fn ensure_success(
        response: reqwest::Response,
    ) -> Result<reqwest::Response, CheckInApiError> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ErrorBody>(&body)
                .ok()
                .and_then(|b| b.message)
                .filter(|m| !m.trim().is_empty());
            return Err(CheckInApiError::ApiError {
                status: status.as_u16(),
                message,
            });
        }
        Ok(response)
    }

    /// Parse a successful JSON response body into the expected type.
    async fn parse_response<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, CheckInApiError> {
        let response = Self::ensure_success(response).await?;
        Ok(response.json::<T>().await?)
    }
}
