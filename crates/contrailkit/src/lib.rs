//! # contrailkit
//!
//! Declarative reconciliation of Contrail controller resources.
//!
//! This crate turns an intent ("this named resource should exist with this
//! definition", "should not exist", "what does it look like") into the
//! right sequence of REST calls, and reports an [`Outcome`] that always
//! includes the API exchange behind it.
//!
//! ## Example
//!
//! ```no_run
//! use contrailkit::transport::http::HttpTransport;
//! use contrailkit::{Definition, Dispatcher, Request, ResourceIdentity, State};
//! use serde_json::json;
//!
//! let transport = HttpTransport::new("http://controller:8082").token("secret");
//! let dispatcher = Dispatcher::new(Box::new(transport));
//!
//! let mut definition = Definition::new();
//! definition.insert("display_name".into(), json!("net1"));
//!
//! let request = Request::new(
//!     "virtual-network",
//!     ResourceIdentity::new("net1", "admin", "default-domain"),
//!     State::Present,
//! )
//! .definition(definition);
//!
//! let outcome = dispatcher.run(&request, false);
//! println!("{}", serde_json::to_string_pretty(&outcome).unwrap());
//! ```
//!
//! ## Supported Types
//!
//! | Type                        | Collection                   | Parent  |
//! |-----------------------------|------------------------------|---------|
//! | `virtual-network`           | `virtual-networks`           | project |
//! | `virtual-machine-interface` | `virtual-machine-interfaces` | project |
//! | `virtual-port` (alias)      | `virtual-machine-interfaces` | project |
//! | `virtual-port-group`        | `virtual-port-groups`        | fabric  |
//! | `logical-router`            | `logical-routers`            | project |
//!
//! ## Testing
//!
//! The engine only talks to the controller through the
//! [`Transport`](transport::Transport) trait. Use
//! [`MockTransport`](transport::MockTransport) to script answers.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod descriptor;
pub mod dispatcher;
pub mod error;
pub mod outcome;
pub mod registry;
pub mod resource;
pub mod transport;
pub mod types;

pub use descriptor::{ResourceDescriptor, ResourceKind};
pub use dispatcher::Dispatcher;
pub use error::{Error, ErrorCategory, Result};
pub use outcome::{Exchange, Outcome};
pub use registry::Registry;
pub use resource::{Action, Plan, PlannedRequest, Resource};
pub use types::{Definition, Method, Request, ResourceIdentity, State};
