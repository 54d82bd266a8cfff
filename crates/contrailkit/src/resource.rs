//! Resource handle and the create/update/delete algorithm.
//!
//! A [`Resource`] is bound to one kind and one fully-qualified name. It
//! resolves its controller identifier and fetches its definition lazily,
//! caching both for the lifetime of the handle, and turns a desired state
//! into the request the controller needs.
//!
//! Mutations are split in two steps: a [`Plan`] is built from reads only,
//! then [`Resource::execute`] sends it. Check mode stops after the first
//! step, so it always describes the exact request a real run would send.

use crate::descriptor::{ResourceDescriptor, ResourceKind};
use crate::error::{Error, Result};
use crate::outcome::{Exchange, Outcome};
use crate::transport::Transport;
use crate::types::{Definition, Method, ResourceIdentity};
use log::{debug, info};
use serde_json::{Value, json};
use std::fmt;

/// Name-to-identifier resolution endpoint.
pub const FQNAME_TO_ID: &str = "/fqname-to-id";

/// A mutation the controller needs to converge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// POST a new resource to its collection.
    Create,
    /// PUT a merged definition over the existing one.
    Update,
    /// DELETE the existing resource.
    Delete,
}

impl Action {
    /// The verb, as in "Failed to create resource".
    #[must_use]
    pub fn verb(&self) -> &'static str {
        match self {
            Self::Create => "create",
            Self::Update => "update",
            Self::Delete => "delete",
        }
    }

    /// The past participle, as in "Resource created".
    #[must_use]
    pub fn past(&self) -> &'static str {
        match self {
            Self::Create => "created",
            Self::Update => "updated",
            Self::Delete => "deleted",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.verb())
    }
}

/// A request ready to be sent.
#[derive(Debug, Clone, PartialEq)]
pub struct PlannedRequest {
    /// What the request does.
    pub action: Action,
    /// Request method.
    pub method: Method,
    /// Request path.
    pub path: String,
    /// Request body, for create and update.
    pub body: Option<Value>,
    /// Definition fetched from the controller, for update.
    pub current: Option<Value>,
}

/// What reconciling a resource requires.
#[derive(Debug, Clone, PartialEq)]
pub enum Plan {
    /// Send one request.
    Send(PlannedRequest),
    /// Nothing to do; carries the lookup that proved the resource absent.
    Nothing(Exchange),
}

impl Plan {
    /// Whether executing the plan would change the controller.
    ///
    /// An update whose merged body equals the fetched definition changes
    /// nothing.
    #[must_use]
    pub fn would_change(&self) -> bool {
        match self {
            Self::Send(request) => match request.action {
                Action::Update => request.body != request.current,
                Action::Create | Action::Delete => true,
            },
            Self::Nothing(_) => false,
        }
    }

    /// The outcome reported in check mode, where nothing is sent.
    #[must_use]
    pub fn check_outcome(self) -> Outcome {
        let changed = self.would_change();
        match self {
            Self::Send(request) => {
                let msg = if changed {
                    format!("Resource would be {}", request.action.past())
                } else {
                    "Resource is up to date".to_string()
                };
                let mut api = Exchange::new(request.method, request.path);
                if let Some(body) = request.body {
                    api = api.with_request(body);
                }
                if changed {
                    Outcome::changed(msg, api)
                } else {
                    Outcome::unchanged(msg, api)
                }
            }
            Self::Nothing(lookup) => Outcome::unchanged(ABSENT_MSG, lookup),
        }
    }
}

/// Reported when deleting a resource that is already gone.
const ABSENT_MSG: &str = "Resource does not exists";

/// Whether the resource exists, with the evidence when it does not.
enum Presence {
    Present(String),
    Absent(Exchange),
}

/// Handle on one controller resource.
///
/// # Example
///
/// ```
/// use contrailkit::transport::MockTransport;
/// use contrailkit::{Method, Resource, ResourceIdentity, ResourceKind};
/// use serde_json::json;
///
/// let mock = MockTransport::new();
/// mock.respond(Method::Post, "/fqname-to-id", 404, json!({}));
///
/// let mut resource = Resource::new(
///     &mock,
///     ResourceKind::VirtualNetwork,
///     ResourceIdentity::new("net1", "admin", "default-domain"),
/// );
/// assert!(!resource.exists().unwrap());
/// ```
pub struct Resource<'a> {
    transport: &'a dyn Transport,
    kind: ResourceKind,
    identity: ResourceIdentity,
    identifier: Option<String>,
    definition: Option<Value>,
}

impl<'a> Resource<'a> {
    /// Create a handle. No request is sent until an operation needs one.
    #[must_use]
    pub fn new(transport: &'a dyn Transport, kind: ResourceKind, identity: ResourceIdentity) -> Self {
        Self {
            transport,
            kind,
            identity,
            identifier: None,
            definition: None,
        }
    }

    /// Get the resource kind.
    #[must_use]
    pub fn kind(&self) -> ResourceKind {
        self.kind
    }

    /// Get the resource identity.
    #[must_use]
    pub fn identity(&self) -> &ResourceIdentity {
        &self.identity
    }

    fn descriptor(&self) -> &'static ResourceDescriptor {
        self.kind.descriptor()
    }

    fn fq_name(&self) -> Value {
        json!(self.identity.fq_name())
    }

    /// Resolve the controller identifier, once.
    ///
    /// # Errors
    ///
    /// Fails unless the controller answers 200 with a `uuid`; a 404 answer
    /// yields [`Error::NotFound`].
    pub fn identifier(&mut self) -> Result<String> {
        if let Some(id) = &self.identifier {
            debug!("{} {}: identifier cached", self.kind, self.identity);
            return Ok(id.clone());
        }

        let body = json!({
            "type": self.descriptor().type_name,
            "fq_name": self.fq_name(),
        });
        let exchange = self.send(Method::Post, FQNAME_TO_ID, Some(body))?;

        let uuid = exchange
            .is_ok()
            .then(|| exchange.response.get("uuid").and_then(Value::as_str))
            .flatten()
            .map(str::to_string);

        match uuid {
            Some(id) => {
                debug!("{} {} resolved to {id}", self.kind, self.identity);
                self.identifier = Some(id.clone());
                Ok(id)
            }
            None => Err(Error::from_exchange(
                "Failed to resolve resource identifier",
                exchange,
            )),
        }
    }

    /// Whether the resource exists on the controller.
    ///
    /// # Errors
    ///
    /// Only a 404 from identifier resolution means "absent"; any other
    /// failure is returned.
    pub fn exists(&mut self) -> Result<bool> {
        Ok(matches!(self.presence()?, Presence::Present(_)))
    }

    fn presence(&mut self) -> Result<Presence> {
        match self.identifier() {
            Ok(id) => Ok(Presence::Present(id)),
            Err(err) if err.is_not_found() => Ok(Presence::Absent(err.into_exchange())),
            Err(err) => Err(err),
        }
    }

    /// Fetch the controller's definition, once.
    ///
    /// The cached value is not refreshed after [`apply`](Self::apply).
    ///
    /// # Errors
    ///
    /// Fails if the identifier cannot be resolved or the GET does not
    /// answer 200.
    pub fn current_definition(&mut self) -> Result<Value> {
        if let Some(definition) = &self.definition {
            debug!("{} {}: definition cached", self.kind, self.identity);
            return Ok(definition.clone());
        }

        let path = format!("/{}/{}", self.descriptor().path_get, self.identifier()?);
        let exchange = self.send(Method::Get, &path, None)?;
        if !exchange.is_ok() {
            return Err(Error::from_exchange(
                "Failed to fetch resource definition",
                exchange,
            ));
        }

        self.definition = Some(exchange.response.clone());
        Ok(exchange.response)
    }

    /// Report the current definition.
    ///
    /// There is no existence pre-check: a missing resource fails with the
    /// identifier lookup error.
    pub fn query(&mut self) -> Result<Outcome> {
        let definition = self.current_definition()?;
        let path = format!("/{}/{}", self.descriptor().path_get, self.identifier()?);
        Ok(Outcome::unchanged(
            "Resource queried",
            Exchange::new(Method::Get, path).with_response(200, definition),
        ))
    }

    /// Plan a create-or-update towards `desired`.
    ///
    /// Existing resources get a PUT of the fetched definition with `desired`
    /// merged over the fields under the type key. Missing ones get a POST of
    /// a new definition seeded with `parent_type` and `fq_name`.
    pub fn plan_apply(&mut self, desired: &Definition) -> Result<Plan> {
        let descriptor = self.descriptor();

        let request = match self.presence()? {
            Presence::Present(id) => {
                let current = self.current_definition()?;
                let mut body = current.clone();
                let Some(fields) = body
                    .get_mut(descriptor.type_name)
                    .and_then(Value::as_object_mut)
                else {
                    let get = Exchange::new(Method::Get, format!("/{}/{id}", descriptor.path_get))
                        .with_response(200, current);
                    return Err(Error::from_exchange(
                        format!("Resource definition has no '{}' object", descriptor.type_name),
                        get,
                    ));
                };
                merge(fields, desired);

                info!("{} {} exists, planning update", self.kind, self.identity);
                PlannedRequest {
                    action: Action::Update,
                    method: Method::Put,
                    path: format!("/{}/{id}", descriptor.path_put),
                    body: Some(body),
                    current: Some(current),
                }
            }
            Presence::Absent(_) => {
                let mut fields = Definition::new();
                fields.insert("parent_type".into(), json!(descriptor.parent_type));
                fields.insert("fq_name".into(), self.fq_name());
                merge(&mut fields, desired);

                info!("{} {} is absent, planning create", self.kind, self.identity);
                PlannedRequest {
                    action: Action::Create,
                    method: Method::Post,
                    path: format!("/{}", descriptor.path_post),
                    body: Some(json!({ descriptor.type_name: fields })),
                    current: None,
                }
            }
        };

        Ok(Plan::Send(request))
    }

    /// Plan a removal.
    pub fn plan_delete(&mut self) -> Result<Plan> {
        match self.presence()? {
            Presence::Present(id) => {
                info!("{} {} exists, planning delete", self.kind, self.identity);
                Ok(Plan::Send(PlannedRequest {
                    action: Action::Delete,
                    method: Method::Delete,
                    path: format!("/{}/{id}", self.descriptor().path_put),
                    body: None,
                    current: None,
                }))
            }
            Presence::Absent(lookup) => {
                info!("{} {} already absent", self.kind, self.identity);
                Ok(Plan::Nothing(lookup))
            }
        }
    }

    /// Send a plan.
    ///
    /// # Errors
    ///
    /// Fails unless the controller answers 200. No read-back is performed.
    pub fn execute(&self, plan: Plan) -> Result<Outcome> {
        match plan {
            Plan::Nothing(lookup) => Ok(Outcome::unchanged(ABSENT_MSG, lookup)),
            Plan::Send(request) => {
                let exchange = self.send(request.method, &request.path, request.body)?;
                if exchange.is_ok() {
                    Ok(Outcome::changed(
                        format!("Resource {}", request.action.past()),
                        exchange,
                    ))
                } else {
                    Err(Error::from_exchange(
                        format!("Failed to {} resource", request.action.verb()),
                        exchange,
                    ))
                }
            }
        }
    }

    /// Create or update the resource so it carries `desired`.
    pub fn apply(&mut self, desired: &Definition) -> Result<Outcome> {
        let plan = self.plan_apply(desired)?;
        self.execute(plan)
    }

    /// Remove the resource if it exists.
    ///
    /// `desired` is accepted for symmetry with [`apply`](Self::apply) and is
    /// not used: references are not dereferenced before deletion.
    pub fn delete(&mut self, _desired: &Definition) -> Result<Outcome> {
        let plan = self.plan_delete()?;
        self.execute(plan)
    }

    /// Send one request, turning transport failures into errors.
    fn send(&self, method: Method, path: &str, body: Option<Value>) -> Result<Exchange> {
        let exchange = Exchange::new(method, path);
        let exchange = match &body {
            Some(body) => exchange.with_request(body.clone()),
            None => exchange,
        };

        match self.transport.send_request(method, path, body.as_ref()) {
            Ok(response) => {
                debug!("{method} {path} -> {}", response.status);
                Ok(exchange.with_response(response.status, response.body))
            }
            Err(err) => Err(Error::transport(err, exchange)),
        }
    }
}

/// Shallow merge: keys of `desired` overwrite, other keys are kept.
fn merge(fields: &mut Definition, desired: &Definition) {
    for (key, value) in desired {
        fields.insert(key.clone(), value.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCategory;
    use crate::transport::MockTransport;

    fn identity() -> ResourceIdentity {
        ResourceIdentity::new("net1", "proj", "dom")
    }

    fn desired(value: Value) -> Definition {
        value.as_object().cloned().unwrap()
    }

    /// Script a virtual-network that exists with uuid `abc`.
    fn existing(mock: &MockTransport, definition: Value) {
        mock.respond(Method::Post, FQNAME_TO_ID, 200, json!({"uuid": "abc"}));
        mock.respond(Method::Get, "/virtual-network/abc", 200, definition);
    }

    fn missing(mock: &MockTransport) {
        mock.respond(Method::Post, FQNAME_TO_ID, 404, json!({"message": "not found"}));
    }

    #[test]
    fn test_identifier_lookup_body() {
        let mock = MockTransport::new();
        existing(&mock, json!({}));
        let mut resource = Resource::new(&mock, ResourceKind::VirtualNetwork, identity());

        assert_eq!(resource.identifier().unwrap(), "abc");
        let lookups = mock.requests_to(Method::Post, FQNAME_TO_ID);
        assert_eq!(
            lookups[0].body,
            Some(json!({"type": "virtual-network", "fq_name": ["dom", "proj", "net1"]}))
        );
    }

    #[test]
    fn test_identifier_resolved_once() {
        let mock = MockTransport::new();
        existing(&mock, json!({}));
        let mut resource = Resource::new(&mock, ResourceKind::VirtualNetwork, identity());

        resource.identifier().unwrap();
        resource.identifier().unwrap();
        resource.exists().unwrap();
        assert_eq!(mock.requests_to(Method::Post, FQNAME_TO_ID).len(), 1);
    }

    #[test]
    fn test_identifier_requires_uuid_field() {
        let mock = MockTransport::new();
        mock.respond(Method::Post, FQNAME_TO_ID, 200, json!({"message": "ok"}));
        let mut resource = Resource::new(&mock, ResourceKind::VirtualNetwork, identity());

        let err = resource.identifier().unwrap_err();
        assert_eq!(err.category(), ErrorCategory::Api);
        assert_eq!(err.status_code(), Some(200));
        assert!(err.outcome().is_failed());
    }

    #[test]
    fn test_identifier_not_found_is_error() {
        let mock = MockTransport::new();
        missing(&mock);
        let mut resource = Resource::new(&mock, ResourceKind::VirtualNetwork, identity());

        let err = resource.identifier().unwrap_err();
        assert!(err.is_not_found());
        assert_eq!(err.outcome().api().path, FQNAME_TO_ID);
    }

    #[test]
    fn test_exists_false_only_on_404() {
        let mock = MockTransport::new();
        missing(&mock);
        let mut resource = Resource::new(&mock, ResourceKind::VirtualNetwork, identity());
        assert!(!resource.exists().unwrap());

        let mock = MockTransport::new();
        mock.respond(Method::Post, FQNAME_TO_ID, 500, json!({"message": "boom"}));
        let mut resource = Resource::new(&mock, ResourceKind::VirtualNetwork, identity());
        let err = resource.exists().unwrap_err();
        assert_eq!(err.status_code(), Some(500));
    }

    #[test]
    fn test_exists_propagates_transport_failure() {
        let mock = MockTransport::new();
        mock.fail(Method::Post, FQNAME_TO_ID, "connection refused");
        let mut resource = Resource::new(&mock, ResourceKind::VirtualNetwork, identity());

        let err = resource.exists().unwrap_err();
        assert_eq!(err.category(), ErrorCategory::Transport);
        let value = serde_json::to_value(err.outcome()).unwrap();
        assert_eq!(value["api"]["status_code"], json!(-1));
        assert_eq!(value["api"]["method"], json!("POST"));
    }

    #[test]
    fn test_current_definition_cached() {
        let mock = MockTransport::new();
        existing(&mock, json!({"virtual-network": {"foo": "old"}}));
        let mut resource = Resource::new(&mock, ResourceKind::VirtualNetwork, identity());

        let first = resource.current_definition().unwrap();
        let second = resource.current_definition().unwrap();
        assert_eq!(first, second);
        assert_eq!(mock.requests_to(Method::Get, "/virtual-network/abc").len(), 1);
    }

    #[test]
    fn test_current_definition_non_200_fails() {
        let mock = MockTransport::new();
        mock.respond(Method::Post, FQNAME_TO_ID, 200, json!({"uuid": "abc"}));
        mock.respond(Method::Get, "/virtual-network/abc", 403, json!({"message": "denied"}));
        let mut resource = Resource::new(&mock, ResourceKind::VirtualNetwork, identity());

        let err = resource.current_definition().unwrap_err();
        assert_eq!(err.category(), ErrorCategory::Api);
        assert_eq!(err.outcome().api().method, Some(Method::Get));
        assert_eq!(err.outcome().api().response, json!({"message": "denied"}));
    }

    #[test]
    fn test_apply_update_merges_fields() {
        let mock = MockTransport::new();
        existing(&mock, json!({"virtual-network": {"foo": "old", "baz": 1}}));
        mock.respond(Method::Put, "/virtual-network/abc", 200, json!({"virtual-network": {"uuid": "abc"}}));
        let mut resource = Resource::new(&mock, ResourceKind::VirtualNetwork, identity());

        let outcome = resource.apply(&desired(json!({"foo": "bar"}))).unwrap();

        assert!(outcome.is_changed());
        assert!(!outcome.is_failed());
        assert_eq!(outcome.msg(), "Resource updated");
        assert_eq!(outcome.api().method, Some(Method::Put));
        assert_eq!(outcome.api().path, "/virtual-network/abc");
        assert_eq!(
            outcome.api().request,
            json!({"virtual-network": {"foo": "bar", "baz": 1}})
        );
        assert_eq!(outcome.api().status_code, Some(200));
    }

    #[test]
    fn test_apply_create_seeds_parent_and_fq_name() {
        let mock = MockTransport::new();
        missing(&mock);
        mock.respond(Method::Post, "/virtual-networks", 200, json!({"virtual-network": {"uuid": "new"}}));
        let mut resource = Resource::new(&mock, ResourceKind::VirtualNetwork, identity());

        let outcome = resource.apply(&desired(json!({"foo": "bar"}))).unwrap();

        assert!(outcome.is_changed());
        assert_eq!(outcome.msg(), "Resource created");
        assert_eq!(outcome.api().method, Some(Method::Post));
        assert_eq!(outcome.api().path, "/virtual-networks");
        assert_eq!(
            outcome.api().request,
            json!({"virtual-network": {
                "parent_type": "project",
                "fq_name": ["dom", "proj", "net1"],
                "foo": "bar"
            }})
        );
        // No GET on the create path
        assert!(mock.requests().iter().all(|r| r.method != Method::Get));
    }

    #[test]
    fn test_apply_create_virtual_port_group_uses_fabric_parent() {
        let mock = MockTransport::new();
        missing(&mock);
        mock.respond(Method::Post, "/virtual-port-groups", 200, json!({}));
        let mut resource = Resource::new(
            &mock,
            ResourceKind::VirtualPortGroup,
            ResourceIdentity::new("vpg1", "fab1", "default-global-system-config"),
        );

        let outcome = resource.apply(&Definition::new()).unwrap();
        assert_eq!(
            outcome.api().request["virtual-port-group"]["parent_type"],
            json!("fabric")
        );
    }

    #[test]
    fn test_apply_failure_carries_attempted_exchange() {
        let mock = MockTransport::new();
        missing(&mock);
        mock.respond(Method::Post, "/virtual-networks", 409, json!({"message": "conflict"}));
        let mut resource = Resource::new(&mock, ResourceKind::VirtualNetwork, identity());

        let err = resource.apply(&desired(json!({"foo": "bar"}))).unwrap_err();
        assert_eq!(err.to_string(), "Failed to create resource");

        let outcome = err.into_outcome();
        assert!(outcome.is_failed());
        assert!(!outcome.is_changed());
        assert_eq!(outcome.api().status_code, Some(409));
        assert_eq!(outcome.api().response, json!({"message": "conflict"}));
        assert_eq!(outcome.api().request["virtual-network"]["foo"], json!("bar"));
    }

    #[test]
    fn test_apply_update_without_type_key_fails_before_put() {
        let mock = MockTransport::new();
        existing(&mock, json!({"something-else": {}}));
        let mut resource = Resource::new(&mock, ResourceKind::VirtualNetwork, identity());

        let err = resource.apply(&desired(json!({"foo": "bar"}))).unwrap_err();
        assert_eq!(err.category(), ErrorCategory::Api);
        assert!(mock.requests_to(Method::Put, "/virtual-network/abc").is_empty());
    }

    #[test]
    fn test_apply_transport_failure_keeps_put_body() {
        let mock = MockTransport::new();
        existing(&mock, json!({"virtual-network": {"foo": "old", "baz": 1}}));
        mock.fail(Method::Put, "/virtual-network/abc", "connection reset");
        let mut resource = Resource::new(&mock, ResourceKind::VirtualNetwork, identity());

        let err = resource.apply(&desired(json!({"foo": "bar"}))).unwrap_err();
        assert_eq!(err.category(), ErrorCategory::Transport);
        assert_eq!(err.status_code(), None);

        let value = serde_json::to_value(err.outcome()).unwrap();
        assert_eq!(value["failed"], json!(true));
        assert_eq!(value["api"]["status_code"], json!(-1));
        assert_eq!(value["api"]["method"], json!("PUT"));
        assert_eq!(value["api"]["path"], json!("/virtual-network/abc"));
        assert_eq!(
            value["api"]["request"],
            json!({"virtual-network": {"foo": "bar", "baz": 1}})
        );
        assert_eq!(
            value["api"]["response"],
            json!({"message": "HTTP request failed: connection reset"})
        );
    }

    #[test]
    fn test_apply_twice_converges() {
        let mock = MockTransport::new();
        mock.respond(Method::Post, FQNAME_TO_ID, 404, json!({}));
        mock.respond(Method::Post, FQNAME_TO_ID, 200, json!({"uuid": "abc"}));
        mock.respond(Method::Post, "/virtual-networks", 200, json!({}));
        mock.respond(
            Method::Get,
            "/virtual-network/abc",
            200,
            json!({"virtual-network": {
                "parent_type": "project",
                "fq_name": ["dom", "proj", "net1"],
                "foo": "bar",
                "uuid": "abc"
            }}),
        );
        mock.respond(Method::Put, "/virtual-network/abc", 200, json!({}));
        let wanted = desired(json!({"foo": "bar"}));

        let first = Resource::new(&mock, ResourceKind::VirtualNetwork, identity())
            .apply(&wanted)
            .unwrap();
        let second = Resource::new(&mock, ResourceKind::VirtualNetwork, identity())
            .apply(&wanted)
            .unwrap();

        assert_eq!(first.api().method, Some(Method::Post));
        assert_eq!(second.api().method, Some(Method::Put));
        let created = &first.api().request["virtual-network"];
        let updated = &second.api().request["virtual-network"];
        for key in ["parent_type", "fq_name", "foo"] {
            assert_eq!(created[key], updated[key]);
        }
    }

    #[test]
    fn test_delete_absent_sends_no_delete() {
        let mock = MockTransport::new();
        missing(&mock);
        let mut resource = Resource::new(&mock, ResourceKind::VirtualNetwork, identity());

        let outcome = resource.delete(&Definition::new()).unwrap();
        assert!(!outcome.is_changed());
        assert!(!outcome.is_failed());
        assert_eq!(outcome.msg(), "Resource does not exists");
        assert_eq!(outcome.api().status_code, Some(404));
        assert!(mock.requests().iter().all(|r| r.method != Method::Delete));
    }

    #[test]
    fn test_delete_existing() {
        let mock = MockTransport::new();
        existing(&mock, json!({}));
        mock.respond(Method::Delete, "/virtual-network/abc", 200, json!({}));
        let mut resource = Resource::new(&mock, ResourceKind::VirtualNetwork, identity());

        let outcome = resource.delete(&Definition::new()).unwrap();
        assert!(outcome.is_changed());
        assert_eq!(outcome.msg(), "Resource deleted");
        assert_eq!(outcome.api().method, Some(Method::Delete));
        assert_eq!(outcome.api().path, "/virtual-network/abc");
        assert!(mock.requests().iter().all(|r| r.method != Method::Get));
    }

    #[test]
    fn test_delete_failure() {
        let mock = MockTransport::new();
        existing(&mock, json!({}));
        mock.respond(Method::Delete, "/virtual-network/abc", 409, json!({"message": "in use"}));
        let mut resource = Resource::new(&mock, ResourceKind::VirtualNetwork, identity());

        let err = resource.delete(&Definition::new()).unwrap_err();
        assert_eq!(err.to_string(), "Failed to delete resource");
        assert_eq!(err.status_code(), Some(409));
    }

    #[test]
    fn test_query_returns_get_body() {
        let definition = json!({"virtual-network": {"uuid": "abc", "foo": "bar"}});
        let mock = MockTransport::new();
        existing(&mock, definition.clone());
        let mut resource = Resource::new(&mock, ResourceKind::VirtualNetwork, identity());

        let outcome = resource.query().unwrap();
        assert!(!outcome.is_changed());
        assert_eq!(outcome.msg(), "Resource queried");
        assert_eq!(outcome.api().response, definition);
        assert_eq!(outcome.api().path, "/virtual-network/abc");
    }

    #[test]
    fn test_plan_apply_sends_nothing_mutating() {
        let mock = MockTransport::new();
        existing(&mock, json!({"virtual-network": {"foo": "old"}}));
        let mut resource = Resource::new(&mock, ResourceKind::VirtualNetwork, identity());

        let plan = resource.plan_apply(&desired(json!({"foo": "bar"}))).unwrap();
        assert!(plan.would_change());
        assert!(
            mock.requests()
                .iter()
                .all(|r| matches!(r.method, Method::Get) || r.path == FQNAME_TO_ID)
        );

        let outcome = plan.check_outcome();
        assert!(outcome.is_changed());
        assert_eq!(outcome.msg(), "Resource would be updated");
        assert_eq!(outcome.api().status_code, None);
    }

    #[test]
    fn test_plan_apply_up_to_date() {
        let mock = MockTransport::new();
        existing(&mock, json!({"virtual-network": {"foo": "bar"}}));
        let mut resource = Resource::new(&mock, ResourceKind::VirtualNetwork, identity());

        let plan = resource.plan_apply(&desired(json!({"foo": "bar"}))).unwrap();
        assert!(!plan.would_change());
        assert_eq!(plan.check_outcome().msg(), "Resource is up to date");
    }

    #[test]
    fn test_plan_delete_absent_is_nothing() {
        let mock = MockTransport::new();
        missing(&mock);
        let mut resource = Resource::new(&mock, ResourceKind::VirtualNetwork, identity());

        let plan = resource.plan_delete().unwrap();
        assert!(matches!(plan, Plan::Nothing(_)));
        assert!(!plan.would_change());
    }

    #[test]
    fn test_virtual_port_alias_kind_uses_interface_paths() {
        let mock = MockTransport::new();
        mock.respond(Method::Post, FQNAME_TO_ID, 200, json!({"uuid": "p1"}));
        mock.respond(Method::Delete, "/virtual-machine-interface/p1", 200, json!({}));
        let mut resource = Resource::new(
            &mock,
            ResourceKind::VirtualMachineInterface,
            ResourceIdentity::new("port1", "proj", "dom"),
        );

        resource.delete(&Definition::new()).unwrap();
        let lookup = &mock.requests_to(Method::Post, FQNAME_TO_ID)[0];
        assert_eq!(
            lookup.body.as_ref().unwrap()["type"],
            json!("virtual-machine-interface")
        );
    }

    #[test]
    fn test_merge_is_shallow() {
        let mut fields = desired(json!({"a": {"x": 1, "y": 2}, "b": 1}));
        merge(&mut fields, &desired(json!({"a": {"x": 3}})));
        assert_eq!(Value::Object(fields), json!({"a": {"x": 3}, "b": 1}));
    }
}
