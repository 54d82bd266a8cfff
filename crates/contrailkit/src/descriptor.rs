//! Static metadata for the supported resource types.
//!
//! Each [`ResourceKind`] maps to one [`ResourceDescriptor`] describing how
//! the controller addresses that type. The reconciliation algorithm in
//! [`Resource`](crate::Resource) is written once against these fields.

use serde::{Deserialize, Serialize};
use std::fmt;

/// REST metadata for one resource type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResourceDescriptor {
    /// Type name, also the top-level key of the resource's JSON body.
    pub type_name: &'static str,
    /// Path segment for reading one resource (singular).
    pub path_get: &'static str,
    /// Path segment for updating or deleting one resource (singular).
    pub path_put: &'static str,
    /// Path segment of the collection used for creation (plural).
    pub path_post: &'static str,
    /// Type name of the parent resource.
    pub parent_type: &'static str,
    /// Reference fields pointing at other resources, as `(field, kind)`.
    ///
    /// Informational only: references are never created on the caller's
    /// behalf.
    pub subresources: &'static [(&'static str, ResourceKind)],
}

impl ResourceDescriptor {
    /// Kind referenced by a sub-resource field, if the field is known.
    #[must_use]
    pub fn subresource(&self, field: &str) -> Option<ResourceKind> {
        self.subresources
            .iter()
            .find(|(name, _)| *name == field)
            .map(|(_, kind)| *kind)
    }
}

static VIRTUAL_NETWORK: ResourceDescriptor = ResourceDescriptor {
    type_name: "virtual-network",
    path_get: "virtual-network",
    path_put: "virtual-network",
    path_post: "virtual-networks",
    parent_type: "project",
    subresources: &[],
};

static VIRTUAL_MACHINE_INTERFACE: ResourceDescriptor = ResourceDescriptor {
    type_name: "virtual-machine-interface",
    path_get: "virtual-machine-interface",
    path_put: "virtual-machine-interface",
    path_post: "virtual-machine-interfaces",
    parent_type: "project",
    subresources: &[],
};

static VIRTUAL_PORT_GROUP: ResourceDescriptor = ResourceDescriptor {
    type_name: "virtual-port-group",
    path_get: "virtual-port-group",
    path_put: "virtual-port-group",
    path_post: "virtual-port-groups",
    parent_type: "fabric",
    subresources: &[(
        "virtual_machine_interface_refs",
        ResourceKind::VirtualMachineInterface,
    )],
};

static LOGICAL_ROUTER: ResourceDescriptor = ResourceDescriptor {
    type_name: "logical-router",
    path_get: "logical-router",
    path_put: "logical-router",
    path_post: "logical-routers",
    parent_type: "project",
    subresources: &[],
};

/// Supported controller resource types.
///
/// # Example
///
/// ```
/// use contrailkit::ResourceKind;
///
/// let kind = ResourceKind::VirtualNetwork;
/// assert_eq!(kind.type_name(), "virtual-network");
/// assert_eq!(kind.descriptor().path_post, "virtual-networks");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ResourceKind {
    /// `virtual-network`
    VirtualNetwork,
    /// `virtual-machine-interface`, also known as `virtual-port`
    VirtualMachineInterface,
    /// `virtual-port-group`
    VirtualPortGroup,
    /// `logical-router`
    LogicalRouter,
}

impl ResourceKind {
    /// Get the static descriptor for this kind.
    #[must_use]
    pub fn descriptor(&self) -> &'static ResourceDescriptor {
        match self {
            Self::VirtualNetwork => &VIRTUAL_NETWORK,
            Self::VirtualMachineInterface => &VIRTUAL_MACHINE_INTERFACE,
            Self::VirtualPortGroup => &VIRTUAL_PORT_GROUP,
            Self::LogicalRouter => &LOGICAL_ROUTER,
        }
    }

    /// Get the controller type name.
    #[must_use]
    pub fn type_name(&self) -> &'static str {
        self.descriptor().type_name
    }

    /// Additional names accepted for this kind.
    #[must_use]
    pub fn aliases(&self) -> &'static [&'static str] {
        match self {
            Self::VirtualMachineInterface => &["virtual-port"],
            _ => &[],
        }
    }

    /// Get all supported kinds.
    #[must_use]
    pub fn all() -> &'static [ResourceKind] {
        &[
            Self::VirtualNetwork,
            Self::VirtualMachineInterface,
            Self::VirtualPortGroup,
            Self::LogicalRouter,
        ]
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.type_name())
    }
}
