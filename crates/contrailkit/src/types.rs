//! Core types shared by the reconciliation engine.
//!
//! This module contains the HTTP method vocabulary, the desired-state
//! intents, resource identities and the typed request the dispatcher
//! consumes.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;

/// A resource definition as exchanged with the controller.
///
/// Desired definitions are the inner field map of a resource
/// (e.g. `{"display_name": "net1"}`); fetched definitions are keyed by the
/// resource type name (e.g. `{"virtual-network": {...}}`).
pub type Definition = Map<String, Value>;

/// HTTP methods used against the controller API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Method {
    /// Read a resource.
    Get,
    /// Create a resource, or resolve a name.
    Post,
    /// Update a resource.
    Put,
    /// Remove a resource.
    Delete,
}

impl Method {
    /// Get the method as an uppercase HTTP verb.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Delete => "DELETE",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Desired state of a resource, as requested by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum State {
    /// The resource should exist with the given definition.
    Present,
    /// The resource should not exist.
    Absent,
    /// Report the current definition without changing anything.
    Query,
}

impl State {
    /// Get the state name as used on the command line and in task files.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Present => "present",
            Self::Absent => "absent",
            Self::Query => "query",
        }
    }
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for State {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "present" => Ok(Self::Present),
            "absent" => Ok(Self::Absent),
            "query" => Ok(Self::Query),
            other => Err(format!("Invalid state: {other}")),
        }
    }
}

/// Name of a resource within the controller namespace.
///
/// The controller addresses resources by their fully-qualified name
/// `[domain, project, name]` until an identifier is known.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ResourceIdentity {
    /// Resource name (the display name).
    pub name: String,
    /// Owning project.
    pub project: String,
    /// Owning domain.
    pub domain: String,
}

impl ResourceIdentity {
    /// Create a new identity.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        project: impl Into<String>,
        domain: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            project: project.into(),
            domain: domain.into(),
        }
    }

    /// Fully-qualified name, ordered `[domain, project, name]`.
    #[must_use]
    pub fn fq_name(&self) -> [&str; 3] {
        [&self.domain, &self.project, &self.name]
    }
}

impl fmt::Display for ResourceIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.domain, self.project, self.name)
    }
}

/// A validated reconciliation request.
///
/// This is what the invocation surface hands to
/// [`Dispatcher::reconcile`](crate::Dispatcher::reconcile).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Request {
    /// Resource type name or alias (e.g. `virtual-network`).
    #[serde(rename = "type")]
    pub kind: String,
    /// Resource name.
    pub name: String,
    /// Owning project.
    pub project: String,
    /// Owning domain.
    pub domain: String,
    /// Desired state.
    pub state: State,
    /// Desired definition fields; empty when not given.
    #[serde(default)]
    pub definition: Definition,
}

impl Request {
    /// Create a request with an empty definition.
    #[must_use]
    pub fn new(
        kind: impl Into<String>,
        identity: ResourceIdentity,
        state: State,
    ) -> Self {
        Self {
            kind: kind.into(),
            name: identity.name,
            project: identity.project,
            domain: identity.domain,
            state,
            definition: Definition::new(),
        }
    }

    /// Set the desired definition.
    #[must_use]
    pub fn definition(mut self, definition: Definition) -> Self {
        self.definition = definition;
        self
    }

    /// The identity this request targets.
    #[must_use]
    pub fn identity(&self) -> ResourceIdentity {
        ResourceIdentity::new(&self.name, &self.project, &self.domain)
    }
}
