//! HTTP transport for the controller REST API.
//!
//! This module provides [`HttpTransport`], a blocking client built on
//! `ureq`. Error statuses are handed back to the engine as regular
//! responses; the engine decides what a 404 or a 409 means.
//!
//! # Response bodies
//!
//! The controller does not always answer with JSON. Bodies are decoded as
//! JSON when possible and otherwise wrapped as `{"message": "<text>"}`, so
//! callers always see a JSON value.

use crate::transport::{Response, Transport, TransportError};
use crate::types::Method;
use log::{debug, trace};
use serde_json::{Value, json};
use std::time::Duration;

/// Content type expected by the controller API.
const CONTENT_TYPE: &str = "application/json;charset=UTF-8";

/// Header carrying the Keystone token.
const AUTH_HEADER: &str = "X-Auth-Token";

/// Default controller API endpoint.
pub const DEFAULT_URL: &str = "http://localhost:8082";

/// Default request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Blocking HTTP transport.
///
/// # Example
///
/// ```no_run
/// use contrailkit::transport::http::HttpTransport;
/// use contrailkit::Dispatcher;
///
/// let transport = HttpTransport::new("http://controller:8082").token("secret");
/// let dispatcher = Dispatcher::new(Box::new(transport));
/// ```
pub struct HttpTransport {
    /// HTTP agent for requests.
    agent: ureq::Agent,
    /// API root URL, without trailing slash.
    base_url: String,
    /// Optional auth token.
    token: Option<String>,
}

impl HttpTransport {
    /// Create a transport with the default timeout.
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_timeout(base_url, DEFAULT_TIMEOUT)
    }

    /// Create a transport with a custom global request timeout.
    #[must_use]
    pub fn with_timeout(base_url: impl Into<String>, timeout: Duration) -> Self {
        let config = ureq::Agent::config_builder()
            .http_status_as_error(false)
            .timeout_global(Some(timeout))
            .build();
        Self {
            agent: config.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: None,
        }
    }

    /// Authenticate requests with a token.
    #[must_use]
    pub fn token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Get the API root URL.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Build the full URL for an API path.
    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// Add the headers every controller request needs.
    fn decorate<B>(&self, request: ureq::RequestBuilder<B>) -> ureq::RequestBuilder<B> {
        let request = request.header("Content-Type", CONTENT_TYPE);
        match &self.token {
            Some(token) => request.header(AUTH_HEADER, token.as_str()),
            None => request,
        }
    }
}

impl Transport for HttpTransport {
    fn send_request(
        &self,
        method: Method,
        path: &str,
        body: Option<&Value>,
    ) -> Result<Response, TransportError> {
        let url = self.url(path);
        let payload = match body {
            Some(value) => serde_json::to_string(value)?,
            None => "{}".to_string(),
        };
        debug!("{method} {url}");
        trace!("request body: {payload}");

        let mut response = match method {
            Method::Get => self.decorate(self.agent.get(&url)).call()?,
            Method::Delete => self.decorate(self.agent.delete(&url)).call()?,
            Method::Post => self.decorate(self.agent.post(&url)).send(payload.as_str())?,
            Method::Put => self.decorate(self.agent.put(&url)).send(payload.as_str())?,
        };

        let status = response.status().as_u16();
        let text = response.body_mut().read_to_string()?;
        debug!("{method} {url} -> {status}");
        trace!("response body: {text}");

        Ok(Response::new(status, decode_body(status, &text)))
    }
}

/// Decode a response body into JSON.
///
/// Non-JSON bodies are wrapped as `{"message": text}`; an empty 401 answer
/// is reported as an authentication failure.
pub(crate) fn decode_body(status: u16, text: &str) -> Value {
    if let Ok(value) = serde_json::from_str::<Value>(text) {
        return value;
    }
    if status == 401 && text.trim().is_empty() {
        return json!({ "message": "Authentication failure" });
    }
    json!({ "message": text })
}
