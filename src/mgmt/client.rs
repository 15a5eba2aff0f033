//! Management endpoint abstraction.

use thiserror::Error;

use crate::meta::address::{AddressTemplate, ResourceAddress};
use crate::meta::description::ResourceDescription;
use crate::meta::security::SecurityContext;
use crate::model::{ModelNode, NamedNode};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ClientError {
    #[error("unknown resource {address}")]
    UnknownResource { address: String },
    #[error("resource {address} already exists")]
    DuplicateResource { address: String },
    #[error("unknown operation '{operation}' on {address}")]
    UnknownOperation { operation: String, address: String },
    #[error("no description for {template}")]
    NoDescription { template: String },
}

/// Read and write access to the management endpoint.
///
/// The console never talks wire formats itself, everything goes through this
/// trait. The binaries and the tests plug in the in-memory
/// [`DemoServer`](super::demo::DemoServer).
pub trait ManagementClient {
    /// Schema of the resource type the template addresses.
    fn read_description(
        &self,
        template: &AddressTemplate,
    ) -> Result<ResourceDescription, ClientError>;

    /// The caller's access rights on the resource type.
    fn read_security_context(
        &self,
        template: &AddressTemplate,
    ) -> Result<SecurityContext, ClientError>;

    /// All resources matching the template's trailing wildcard.
    fn read_children(&self, template: &AddressTemplate) -> Result<Vec<NamedNode>, ClientError>;

    /// Executes an operation on a concrete resource.
    fn execute(
        &mut self,
        address: &ResourceAddress,
        operation: &str,
    ) -> Result<ModelNode, ClientError>;
}
