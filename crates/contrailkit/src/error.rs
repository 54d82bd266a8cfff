//! Error types for reconciliation operations.
//!
//! Every error carries a failed [`Outcome`] holding the API exchange that
//! was attempted, so a caller can report a failure with the same level of
//! detail as a success. Errors are categorized to let callers tell a missing
//! resource apart from a broken controller or an unreachable one.

use crate::outcome::{Exchange, Outcome};
use serde_json::json;
use std::fmt;

/// Result type alias for reconciliation operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Categories of reconciliation errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// The controller answered 404.
    NotFound,
    /// The controller answered with an unexpected status or body.
    Api,
    /// The request never completed.
    Transport,
    /// The resource type is not registered.
    UnknownType,
}

impl ErrorCategory {
    /// Get a user-friendly description of this error category.
    #[must_use]
    pub fn description(&self) -> &'static str {
        match self {
            Self::NotFound => "Resource not found",
            Self::Api => "Controller API failure",
            Self::Transport => "Controller unreachable",
            Self::UnknownType => "Unknown resource type",
        }
    }

    /// Get actionable advice for resolving this error category.
    #[must_use]
    pub fn advice(&self) -> &'static str {
        match self {
            Self::NotFound => "Check the resource name, project and domain",
            Self::Api => "Inspect the API response for the controller's reason",
            Self::Transport => "Check the controller URL, credentials and network",
            Self::UnknownType => "Run `contrail types` to list supported resource types",
        }
    }
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.description())
    }
}

/// Errors that can occur while reconciling a resource.
///
/// Each variant wraps the failed [`Outcome`] describing the attempted
/// exchange.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The controller answered 404.
    #[error("{}", .0.msg())]
    NotFound(Box<Outcome>),

    /// Any other non-200 answer, or a 200 without a usable body.
    #[error("{}", .0.msg())]
    Api(Box<Outcome>),

    /// The transport failed before an answer was received.
    #[error("{}", .0.msg())]
    Transport(Box<Outcome>),

    /// The requested type is not in the registry.
    #[error("{}", .0.msg())]
    UnknownType(Box<Outcome>),
}

impl Error {
    /// Build an error from an answered exchange.
    ///
    /// 404 answers become [`Error::NotFound`], everything else
    /// [`Error::Api`]. Unanswered exchanges become [`Error::Transport`].
    pub fn from_exchange(msg: impl Into<String>, exchange: Exchange) -> Self {
        let status = exchange.status_code;
        let outcome = Box::new(Outcome::failure(msg, exchange));
        match status {
            Some(404) => Self::NotFound(outcome),
            Some(_) => Self::Api(outcome),
            None => Self::Transport(outcome),
        }
    }

    /// Build a transport error for an exchange that never completed.
    pub fn transport(message: impl fmt::Display, exchange: Exchange) -> Self {
        let exchange = Exchange {
            response: json!({ "message": message.to_string() }),
            status_code: None,
            ..exchange
        };
        Self::Transport(Box::new(Outcome::failure(
            format!("Transport error: {message}"),
            exchange,
        )))
    }

    /// Build an unknown-type error.
    pub fn unknown_type(type_name: &str) -> Self {
        Self::UnknownType(Box::new(Outcome::failure(
            format!("Unknown resource type: {type_name}"),
            Exchange::default(),
        )))
    }

    /// Get the error category.
    #[must_use]
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::NotFound(_) => ErrorCategory::NotFound,
            Self::Api(_) => ErrorCategory::Api,
            Self::Transport(_) => ErrorCategory::Transport,
            Self::UnknownType(_) => ErrorCategory::UnknownType,
        }
    }

    /// Whether the controller reported the resource as missing.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }

    /// The failed outcome carried by this error.
    #[must_use]
    pub fn outcome(&self) -> &Outcome {
        match self {
            Self::NotFound(o) | Self::Api(o) | Self::Transport(o) | Self::UnknownType(o) => o,
        }
    }

    /// Consume the error, returning its failed outcome.
    #[must_use]
    pub fn into_outcome(self) -> Outcome {
        match self {
            Self::NotFound(o) | Self::Api(o) | Self::Transport(o) | Self::UnknownType(o) => *o,
        }
    }

    /// HTTP status code of the failed exchange, if one completed.
    #[must_use]
    pub fn status_code(&self) -> Option<u16> {
        self.outcome().api().status_code
    }

    /// Take the exchange out of the error.
    pub(crate) fn into_exchange(self) -> Exchange {
        self.into_outcome().into_api()
    }
}
