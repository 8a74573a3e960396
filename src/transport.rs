//! The transport capability and its reqwest-backed implementation.
//!
//! The [`Client`](crate::Client) never talks to the network itself. It hands a
//! fully built URL and a `username:password` string to a [`Transport`] and
//! gets the raw response body back. [`HttpTransport`] is the stock
//! implementation; tests and embedders can supply their own.

use crate::{Error, Result};
use http::{HeaderMap, HeaderName, HeaderValue};
use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Performs the HTTP GET for a single API call.
///
/// `credentials` is `username:password`; the implementation decides how to
/// apply it (HTTP Basic auth for [`HttpTransport`]). Network failures are
/// returned as errors and reach the caller unchanged.
///
/// # Examples
///
/// ```
/// use freespee::{Result, Transport};
///
/// struct Canned(&'static str);
///
/// impl Transport for Canned {
///     async fn fetch(&self, _url: &str, _credentials: &str) -> Result<String> {
///         Ok(self.0.to_string())
///     }
/// }
/// ```
pub trait Transport {
    fn fetch(&self, url: &str, credentials: &str) -> impl Future<Output = Result<String>> + Send;
}

impl<T: Transport> Transport for &T {
    fn fetch(&self, url: &str, credentials: &str) -> impl Future<Output = Result<String>> + Send {
        (**self).fetch(url, credentials)
    }
}

impl<T: Transport> Transport for Arc<T> {
    fn fetch(&self, url: &str, credentials: &str) -> impl Future<Output = Result<String>> + Send {
        (**self).fetch(url, credentials)
    }
}

/// [`Transport`] over `reqwest` with HTTP Basic authentication.
///
/// The response body is returned whatever the status code, since the API
/// reports failures in an `errors` field that the parser turns into
/// [`Error::ApiCall`]. Non-2xx statuses are logged.
///
/// Clone is cheap; the underlying `reqwest::Client` is reference counted.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    http_client: reqwest::Client,
    default_headers: HeaderMap,
    timeout: Option<Duration>,
}

impl HttpTransport {
    pub fn builder() -> HttpTransportBuilder {
        HttpTransportBuilder::new()
    }
}

impl Transport for HttpTransport {
    async fn fetch(&self, url: &str, credentials: &str) -> Result<String> {
        let (username, password) = match credentials.split_once(':') {
            Some((username, password)) => (username, Some(password)),
            None => (credentials, None),
        };

        tracing::debug!(url = %url, "Executing HTTP request");

        let mut request = self.http_client.get(url).basic_auth(username, password);

        for (name, value) in &self.default_headers {
            request = request.header(name, value);
        }

        if let Some(timeout) = self.timeout {
            request = request.timeout(timeout);
        }

        let start_time = Instant::now();
        let response = request.send().await.map_err(|e| {
            tracing::error!(error = %e, url = %url, "Request failed");
            Error::Network(e)
        })?;
        let status = response.status();

        tracing::info!(
            status = status.as_u16(),
            latency_ms = start_time.elapsed().as_millis() as u64,
            "Received HTTP response"
        );

        if !status.is_success() {
            tracing::warn!(
                status = status.as_u16(),
                url = %url,
                "Non-success status, handing body to the parser"
            );
        }

        Ok(response.text().await?)
    }
}

/// Builder for configuring and creating an [`HttpTransport`].
///
/// # Examples
///
/// ```
/// use freespee::HttpTransport;
/// use std::time::Duration;
///
/// let transport = HttpTransport::builder()
///     .timeout(Duration::from_secs(30))
///     .default_header("User-Agent", "my-app/1.0")
///     .unwrap()
///     .build()
///     .unwrap();
/// ```
#[derive(Debug, Default)]
pub struct HttpTransportBuilder {
    default_headers: HeaderMap,
    timeout: Option<Duration>,
}

impl HttpTransportBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a header that will be included in all requests.
    ///
    /// # Errors
    ///
    /// Returns an error if the header name or value is invalid.
    pub fn default_header(mut self, name: impl AsRef<str>, value: impl AsRef<str>) -> Result<Self> {
        let name = HeaderName::try_from(name.as_ref())
            .map_err(|e| Error::ConfigurationError(format!("Invalid header name: {}", e)))?;
        let value = HeaderValue::try_from(value.as_ref())
            .map_err(|e| Error::ConfigurationError(format!("Invalid header value: {}", e)))?;
        self.default_headers.insert(name, value);
        Ok(self)
    }

    /// Sets the per-request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Builds the configured `HttpTransport`.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be created.
    pub fn build(self) -> Result<HttpTransport> {
        let http_client = reqwest::Client::builder().build().map_err(|e| {
            Error::ConfigurationError(format!("Failed to build HTTP client: {}", e))
        })?;

        Ok(HttpTransport {
            http_client,
            default_headers: self.default_headers,
            timeout: self.timeout,
        })
    }
}
