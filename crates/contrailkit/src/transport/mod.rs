//! Transport trait and implementations for talking to the controller.
//!
//! The engine only needs to turn a `(method, path, body)` triple into a
//! `(status, body)` pair. The [`Transport`] trait is that seam;
//! [`http::HttpTransport`] implements it over HTTP.
//!
//! # Testing
//!
//! Use [`MockTransport`] to script controller answers without a network:
//!
//! ```
//! use contrailkit::transport::{MockTransport, Transport};
//! use contrailkit::Method;
//! use serde_json::json;
//!
//! let mock = MockTransport::new();
//! mock.respond(Method::Post, "/fqname-to-id", 200, json!({"uuid": "1234"}));
//!
//! let response = mock
//!     .send_request(Method::Post, "/fqname-to-id", Some(&json!({})))
//!     .unwrap();
//! assert_eq!(response.status, 200);
//! assert_eq!(mock.requests().len(), 1);
//! ```

pub mod http;

use crate::types::Method;
use serde_json::Value;
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// A decoded controller answer.
#[derive(Debug, Clone, PartialEq)]
pub struct Response {
    /// HTTP status code.
    pub status: u16,
    /// Decoded JSON body.
    pub body: Value,
}

impl Response {
    /// Create a response.
    #[must_use]
    pub fn new(status: u16, body: Value) -> Self {
        Self { status, body }
    }
}

/// Failures below the HTTP layer (connection, TLS, encoding).
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// The request could not be delivered or the answer not read.
    #[error("HTTP request failed: {0}")]
    Http(String),

    /// The request body could not be encoded.
    #[error("failed to encode request body: {0}")]
    Encode(String),
}

impl From<ureq::Error> for TransportError {
    fn from(err: ureq::Error) -> Self {
        Self::Http(err.to_string())
    }
}

impl From<serde_json::Error> for TransportError {
    fn from(err: serde_json::Error) -> Self {
        Self::Encode(err.to_string())
    }
}

/// Capability to exchange JSON requests with the controller.
///
/// Implementations return non-2xx answers as ordinary [`Response`]s; only
/// failures where no answer was obtained are errors.
pub trait Transport: Send + Sync {
    /// Send one request and return the controller's answer.
    fn send_request(
        &self,
        method: Method,
        path: &str,
        body: Option<&Value>,
    ) -> Result<Response, TransportError>;
}

/// A request captured by [`MockTransport`].
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedRequest {
    /// Request method.
    pub method: Method,
    /// Request path.
    pub path: String,
    /// Request body, if any.
    pub body: Option<Value>,
}

#[derive(Debug, Clone)]
enum Scripted {
    Answer(Response),
    Fail(String),
}

#[derive(Debug, Default)]
struct MockState {
    routes: HashMap<(Method, String), VecDeque<Scripted>>,
    requests: Vec<RecordedRequest>,
}

/// In-memory transport with scripted answers.
///
/// Answers are queued per `(method, path)` and consumed in order; the last
/// queued answer for a route is repeated for any further request. Requests
/// to routes without answers fail with a [`TransportError`]. Clones share
/// state, so a test can keep one handle while the dispatcher owns another.
#[derive(Debug, Clone, Default)]
pub struct MockTransport {
    state: Arc<Mutex<MockState>>,
}

impl MockTransport {
    /// Create a mock with no scripted answers.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue an answer for a route.
    pub fn respond(&self, method: Method, path: impl Into<String>, status: u16, body: Value) {
        self.push(method, path.into(), Scripted::Answer(Response::new(status, body)));
    }

    /// Queue a transport failure for a route.
    pub fn fail(&self, method: Method, path: impl Into<String>, message: impl Into<String>) {
        self.push(method, path.into(), Scripted::Fail(message.into()));
    }

    /// All requests received so far, in order.
    #[must_use]
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.lock().requests.clone()
    }

    /// Requests received for one route.
    #[must_use]
    pub fn requests_to(&self, method: Method, path: &str) -> Vec<RecordedRequest> {
        self.lock()
            .requests
            .iter()
            .filter(|r| r.method == method && r.path == path)
            .cloned()
            .collect()
    }

    fn push(&self, method: Method, path: String, scripted: Scripted) {
        self.lock()
            .routes
            .entry((method, path))
            .or_default()
            .push_back(scripted);
    }

    fn lock(&self) -> MutexGuard<'_, MockState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Transport for MockTransport {
    fn send_request(
        &self,
        method: Method,
        path: &str,
        body: Option<&Value>,
    ) -> Result<Response, TransportError> {
        let mut state = self.lock();
        state.requests.push(RecordedRequest {
            method,
            path: path.to_string(),
            body: body.cloned(),
        });

        let queue = state
            .routes
            .get_mut(&(method, path.to_string()))
            .ok_or_else(|| TransportError::Http(format!("no mock answer for {method} {path}")))?;

        let scripted = if queue.len() > 1 {
            queue.pop_front()
        } else {
            queue.front().cloned()
        };

        match scripted {
            Some(Scripted::Answer(response)) => Ok(response),
            Some(Scripted::Fail(message)) => Err(TransportError::Http(message)),
            None => Err(TransportError::Http(format!(
                "no mock answer for {method} {path}"
            ))),
        }
    }
}
