//! Intent routing: from a type name and a desired state to a resource call.

use crate::error::{Error, Result};
use crate::outcome::Outcome;
use crate::registry::Registry;
use crate::resource::Resource;
use crate::transport::Transport;
use crate::types::{Definition, Request, ResourceIdentity, State};
use log::debug;

/// High-level entry point for reconciliation.
///
/// A dispatcher owns the transport and the type registry, and builds a
/// fresh [`Resource`] for every call, so nothing is cached between calls.
///
/// # Example
///
/// ```
/// use contrailkit::transport::MockTransport;
/// use contrailkit::{Dispatcher, Method, Request, ResourceIdentity, State};
/// use serde_json::json;
///
/// let mock = MockTransport::new();
/// mock.respond(Method::Post, "/fqname-to-id", 404, json!({}));
///
/// let dispatcher = Dispatcher::new(Box::new(mock.clone()));
/// let request = Request::new(
///     "virtual-network",
///     ResourceIdentity::new("net1", "admin", "default-domain"),
///     State::Absent,
/// );
///
/// let outcome = dispatcher.run(&request, false);
/// assert!(!outcome.is_changed());
/// assert!(!outcome.is_failed());
/// ```
pub struct Dispatcher {
    transport: Box<dyn Transport>,
    registry: Registry,
}

impl Dispatcher {
    /// Create a dispatcher with the builtin registry.
    #[must_use]
    pub fn new(transport: Box<dyn Transport>) -> Self {
        Self::with_registry(transport, Registry::builtin())
    }

    /// Create a dispatcher with a custom registry.
    #[must_use]
    pub fn with_registry(transport: Box<dyn Transport>, registry: Registry) -> Self {
        Self {
            transport,
            registry,
        }
    }

    /// Get the registry.
    #[must_use]
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Build the resource handle for a type name.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownType`] for names missing from the registry;
    /// no request is sent in that case.
    pub fn resource_for(
        &self,
        type_name: &str,
        name: &str,
        project: &str,
        domain: &str,
    ) -> Result<Resource<'_>> {
        let kind = self
            .registry
            .lookup(type_name)
            .ok_or_else(|| Error::unknown_type(type_name))?;
        Ok(Resource::new(
            self.transport.as_ref(),
            kind,
            ResourceIdentity::new(name, project, domain),
        ))
    }

    /// Report the current definition of a resource.
    pub fn query(&self, type_name: &str, name: &str, project: &str, domain: &str) -> Result<Outcome> {
        self.resource_for(type_name, name, project, domain)?.query()
    }

    /// Create or update a resource.
    pub fn ensure_present(
        &self,
        type_name: &str,
        name: &str,
        project: &str,
        domain: &str,
        definition: &Definition,
    ) -> Result<Outcome> {
        self.resource_for(type_name, name, project, domain)?
            .apply(definition)
    }

    /// Delete a resource if it exists.
    pub fn ensure_absent(
        &self,
        type_name: &str,
        name: &str,
        project: &str,
        domain: &str,
        definition: &Definition,
    ) -> Result<Outcome> {
        self.resource_for(type_name, name, project, domain)?
            .delete(definition)
    }

    /// Route a request to the handler for its state.
    pub fn reconcile(&self, request: &Request) -> Result<Outcome> {
        debug!(
            "reconcile {} {}:{}:{} -> {}",
            request.kind, request.domain, request.project, request.name, request.state
        );
        let (kind, name, project, domain) =
            (&request.kind, &request.name, &request.project, &request.domain);

        match request.state {
            State::Query => self.query(kind, name, project, domain),
            State::Present => self.ensure_present(kind, name, project, domain, &request.definition),
            State::Absent => self.ensure_absent(kind, name, project, domain, &request.definition),
        }
    }

    /// Like [`reconcile`](Self::reconcile), but only reads.
    ///
    /// The outcome describes the request that would be sent and whether it
    /// would change anything.
    pub fn reconcile_check(&self, request: &Request) -> Result<Outcome> {
        let mut resource =
            self.resource_for(&request.kind, &request.name, &request.project, &request.domain)?;

        match request.state {
            State::Query => resource.query(),
            State::Present => Ok(resource.plan_apply(&request.definition)?.check_outcome()),
            State::Absent => Ok(resource.plan_delete()?.check_outcome()),
        }
    }

    /// Reconcile and fold any error into its failed outcome.
    ///
    /// Always yields exactly one outcome; check `is_failed()`.
    pub fn run(&self, request: &Request, check: bool) -> Outcome {
        let result = if check {
            self.reconcile_check(request)
        } else {
            self.reconcile(request)
        };
        result.unwrap_or_else(Error::into_outcome)
    }
}
