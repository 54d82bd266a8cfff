//! Outcome of a reconciliation, with the API exchange that produced it.
//!
//! Every top-level operation ends in exactly one [`Outcome`], on success and
//! on failure alike (failures carry theirs inside [`Error`](crate::Error)).
//! The [`Exchange`] records the last request sent to the controller so that
//! callers can always audit what happened on the wire.

use crate::types::Method;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One request/response exchange with the controller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Exchange {
    /// Request method, if a request was attempted.
    ///
    /// Serialized as `""` when absent.
    #[serde(with = "method_name")]
    pub method: Option<Method>,
    /// Request path relative to the API root.
    pub path: String,
    /// Request payload (`{}` when none was sent).
    pub request: Value,
    /// Decoded response payload (`{}` when nothing was received).
    pub response: Value,
    /// HTTP status code; `None` when the exchange never completed.
    ///
    /// Serialized as `-1` when absent.
    #[serde(with = "status_code")]
    pub status_code: Option<u16>,
}

impl Exchange {
    /// Create an exchange for a request that has not been answered yet.
    #[must_use]
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method: Some(method),
            path: path.into(),
            ..Self::default()
        }
    }

    /// Set the request payload.
    #[must_use]
    pub fn with_request(mut self, request: Value) -> Self {
        self.request = request;
        self
    }

    /// Record the controller's answer.
    #[must_use]
    pub fn with_response(mut self, status_code: u16, response: Value) -> Self {
        self.status_code = Some(status_code);
        self.response = response;
        self
    }

    /// Whether the controller answered with 200.
    #[must_use]
    pub fn is_ok(&self) -> bool {
        self.status_code == Some(200)
    }
}

impl Default for Exchange {
    fn default() -> Self {
        Self {
            method: None,
            path: String::new(),
            request: Value::Object(Map::new()),
            response: Value::Object(Map::new()),
            status_code: None,
        }
    }
}

/// Result of one reconciliation.
///
/// Fields are read-only once constructed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Outcome {
    changed: bool,
    failed: bool,
    msg: String,
    api: Exchange,
}

impl Outcome {
    /// A successful operation that changed nothing.
    #[must_use]
    pub fn unchanged(msg: impl Into<String>, api: Exchange) -> Self {
        Self::new(false, false, msg, api)
    }

    /// A successful operation that changed the controller.
    #[must_use]
    pub fn changed(msg: impl Into<String>, api: Exchange) -> Self {
        Self::new(true, false, msg, api)
    }

    /// A failed operation.
    #[must_use]
    pub fn failure(msg: impl Into<String>, api: Exchange) -> Self {
        Self::new(false, true, msg, api)
    }

    fn new(changed: bool, failed: bool, msg: impl Into<String>, api: Exchange) -> Self {
        Self {
            changed,
            failed,
            msg: msg.into(),
            api,
        }
    }

    /// Whether a mutation actually occurred (or would occur, in check mode).
    #[must_use]
    pub fn is_changed(&self) -> bool {
        self.changed
    }

    /// Whether the operation failed.
    #[must_use]
    pub fn is_failed(&self) -> bool {
        self.failed
    }

    /// Human-readable status message.
    #[must_use]
    pub fn msg(&self) -> &str {
        &self.msg
    }

    /// The API exchange behind this outcome.
    #[must_use]
    pub fn api(&self) -> &Exchange {
        &self.api
    }

    /// Consume the outcome, returning its API exchange.
    #[must_use]
    pub fn into_api(self) -> Exchange {
        self.api
    }
}

mod status_code {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(code: &Option<u16>, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_i32(code.map_or(-1, i32::from))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<u16>, D::Error> {
        let code = i64::deserialize(deserializer)?;
        Ok(u16::try_from(code).ok())
    }
}

mod method_name {
    use crate::types::Method;
    use serde::de::value::StringDeserializer;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<S: Serializer>(method: &Option<Method>, serializer: S) -> Result<S::Ok, S::Error> {
        match method {
            Some(method) => method.serialize(serializer),
            None => serializer.serialize_str(""),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<Method>, D::Error> {
        let name = Option::<String>::deserialize(deserializer)?.unwrap_or_default();
        if name.is_empty() {
            return Ok(None);
        }
        Method::deserialize(StringDeserializer::<D::Error>::new(name)).map(Some)
    }
}
