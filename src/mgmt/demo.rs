//! In-memory demo management endpoint.
//!
//! Seeds a small TLS subsystem (key managers, security domains, trust
//! managers) plus a couple of console extensions, and implements the
//! mutating operations the console offers on them.

use std::collections::HashMap;

use chrono::Utc;

use crate::meta::address::{AddressTemplate, ResourceAddress};
use crate::meta::description::{ATTRIBUTES, DESCRIPTION, OPERATIONS, ResourceDescription, STORAGE, RUNTIME, TYPE, attribute_schema};
use crate::meta::security::SecurityContext;
use crate::model::{ModelNode, ModelValue, NamedNode};

use super::client::{ClientError, ManagementClient};

const KEY_MANAGER: &str = "key-manager";
const SECURITY_DOMAIN: &str = "security-domain";
const TRUST_MANAGER: &str = "trust-manager";
const EXTENSION: &str = "console-extension";

/// The in-memory management endpoint used by the binaries and the tests.
pub struct DemoServer {
    descriptions: HashMap<&'static str, ResourceDescription>,
    contexts: HashMap<&'static str, SecurityContext>,
    children: HashMap<&'static str, Vec<NamedNode>>,
    next_id: u64,
}

impl DemoServer {
    pub fn new() -> Self {
        let mut descriptions = HashMap::new();
        descriptions.insert(KEY_MANAGER, key_manager_description());
        descriptions.insert(SECURITY_DOMAIN, security_domain_description());
        descriptions.insert(TRUST_MANAGER, trust_manager_description());
        descriptions.insert(EXTENSION, extension_description());

        let mut contexts = HashMap::new();
        contexts.insert(
            KEY_MANAGER,
            SecurityContext::read_only().allow_operation("init"),
        );
        contexts.insert(
            SECURITY_DOMAIN,
            SecurityContext::read_only().allow_operation("read-identity"),
        );
        contexts.insert(
            TRUST_MANAGER,
            SecurityContext::read_write()
                .allow_operation("add")
                .allow_operation("remove")
                .allow_operation("reload-certificate-revocation-list"),
        );
        contexts.insert(EXTENSION, SecurityContext::read_only());

        let mut children = HashMap::new();
        children.insert(KEY_MANAGER, seed_key_managers());
        children.insert(SECURITY_DOMAIN, seed_security_domains());
        children.insert(TRUST_MANAGER, seed_trust_managers());
        children.insert(EXTENSION, seed_extensions());

        Self {
            descriptions,
            contexts,
            children,
            next_id: 1,
        }
    }

    /// The same endpoint as seen by a user whose role grants no write or
    /// execute permission anywhere.
    pub fn read_only() -> Self {
        let mut server = Self::new();
        for context in server.contexts.values_mut() {
            *context = SecurityContext::read_only();
        }
        server
    }

    fn resource_type(template: &AddressTemplate) -> Result<&str, ClientError> {
        template.last_key().ok_or_else(|| ClientError::NoDescription {
            template: template.to_string(),
        })
    }

    fn collection_mut(
        &mut self,
        resource_type: &str,
        address: &ResourceAddress,
    ) -> Result<&mut Vec<NamedNode>, ClientError> {
        self.children
            .get_mut(resource_type)
            .ok_or_else(|| ClientError::UnknownResource {
                address: address.to_string(),
            })
    }
}

impl Default for DemoServer {
    fn default() -> Self {
        Self::new()
    }
}

impl ManagementClient for DemoServer {
    fn read_description(
        &self,
        template: &AddressTemplate,
    ) -> Result<ResourceDescription, ClientError> {
        let resource_type = Self::resource_type(template)?;
        self.descriptions
            .get(resource_type)
            .cloned()
            .ok_or_else(|| ClientError::NoDescription {
                template: template.to_string(),
            })
    }

    fn read_security_context(
        &self,
        template: &AddressTemplate,
    ) -> Result<SecurityContext, ClientError> {
        let resource_type = Self::resource_type(template)?;
        self.contexts
            .get(resource_type)
            .cloned()
            .ok_or_else(|| ClientError::NoDescription {
                template: template.to_string(),
            })
    }

    fn read_children(&self, template: &AddressTemplate) -> Result<Vec<NamedNode>, ClientError> {
        let resource_type = Self::resource_type(template)?;
        self.children
            .get(resource_type)
            .cloned()
            .ok_or_else(|| ClientError::UnknownResource {
                address: template.to_string(),
            })
    }

    fn execute(
        &mut self,
        address: &ResourceAddress,
        operation: &str,
    ) -> Result<ModelNode, ClientError> {
        let (resource_type, name) = address.last().ok_or_else(|| ClientError::UnknownResource {
            address: address.to_string(),
        })?;
        let resource_type = resource_type.to_string();
        let name = name.to_string();
        let unknown_operation = || ClientError::UnknownOperation {
            operation: operation.to_string(),
            address: address.to_string(),
        };

        match operation {
            "add" => {
                let next_id = self.next_id;
                let collection = self.collection_mut(&resource_type, address)?;
                if collection.iter().any(|child| child.name() == name) {
                    return Err(ClientError::DuplicateResource {
                        address: address.to_string(),
                    });
                }
                let node = default_child(&resource_type, next_id).ok_or_else(unknown_operation)?;
                let child = NamedNode::new(name, node);
                let result = child.node().clone();
                collection.push(child);
                self.next_id += 1;
                Ok(result)
            }
            "remove" => {
                let collection = self.collection_mut(&resource_type, address)?;
                let index = collection
                    .iter()
                    .position(|child| child.name() == name)
                    .ok_or_else(|| ClientError::UnknownResource {
                        address: address.to_string(),
                    })?;
                Ok(collection.remove(index).into_node())
            }
            "init" if resource_type == KEY_MANAGER => {
                let child = find_child_mut(self.collection_mut(&resource_type, address)?, &name)
                    .ok_or_else(|| ClientError::UnknownResource {
                        address: address.to_string(),
                    })?;
                child.node_mut().set("initialized", true);
                child.node_mut().set("last-loaded", Utc::now().to_rfc3339());
                Ok(child.node().clone())
            }
            "read-identity" if resource_type == SECURITY_DOMAIN => {
                let collection = self.collection_mut(&resource_type, address)?;
                let child = find_child_mut(collection, &name).ok_or_else(|| {
                    ClientError::UnknownResource {
                        address: address.to_string(),
                    }
                })?;
                let realm = child
                    .node()
                    .get("default-realm")
                    .as_str()
                    .unwrap_or("local")
                    .to_string();
                Ok(ModelNode::new()
                    .with("identity", "anonymous")
                    .with("realm", realm))
            }
            "reload-certificate-revocation-list" if resource_type == TRUST_MANAGER => {
                let child = find_child_mut(self.collection_mut(&resource_type, address)?, &name)
                    .ok_or_else(|| ClientError::UnknownResource {
                        address: address.to_string(),
                    })?;
                let reloads = child.node().get("crl-reloads").as_i64().unwrap_or(0) + 1;
                child.node_mut().set("crl-reloads", reloads);
                child
                    .node_mut()
                    .set("last-crl-reload", Utc::now().to_rfc3339());
                Ok(child.node().clone())
            }
            _ => Err(unknown_operation()),
        }
    }
}

fn find_child_mut<'a>(collection: &'a mut Vec<NamedNode>, name: &str) -> Option<&'a mut NamedNode> {
    collection.iter_mut().find(|child| child.name() == name)
}

/// Default attribute values for resources created through `add`.
fn default_child(resource_type: &str, id: u64) -> Option<ModelNode> {
    match resource_type {
        KEY_MANAGER => Some(
            ModelNode::new()
                .with("algorithm", "PKIX")
                .with("key-store", format!("key-store-{id}"))
                .with("provider-name", ModelValue::Undefined)
                .with("initialized", false),
        ),
        SECURITY_DOMAIN => Some(
            ModelNode::new()
                .with("default-realm", "local")
                .with("permission-mapper", "default-permission-mapper")
                .with("outflow-anonymous", false),
        ),
        TRUST_MANAGER => Some(
            ModelNode::new()
                .with("algorithm", "PKIX")
                .with("key-store", format!("trust-store-{id}"))
                .with("soft-fail", false)
                .with("crl-reloads", 0i64),
        ),
        EXTENSION => Some(
            ModelNode::new()
                .with("version", "0.1.0")
                .with("script", "https://acme.example/console/extension.js")
                .with("extension-point", "custom"),
        ),
        _ => None,
    }
}

fn runtime_attribute(type_name: &str, description: &str) -> ModelValue {
    ModelValue::Object(
        ModelNode::new()
            .with(TYPE, type_name)
            .with(DESCRIPTION, description)
            .with(STORAGE, RUNTIME),
    )
}

fn operations(names: &[(&str, &str)]) -> ModelValue {
    let mut node = ModelNode::new();
    for (name, description) in names {
        node.set(
            *name,
            ModelNode::new().with(DESCRIPTION, *description),
        );
    }
    ModelValue::Object(node)
}

fn key_manager_description() -> ResourceDescription {
    ResourceDescription::new(
        ModelNode::new()
            .with(
                DESCRIPTION,
                "A key manager definition for creating the TLS server context",
            )
            .with(
                ATTRIBUTES,
                ModelNode::new()
                    .with("algorithm", attribute_schema("STRING", "The key manager algorithm"))
                    .with("key-store", attribute_schema("STRING", "Reference to the key store"))
                    .with(
                        "provider-name",
                        attribute_schema("STRING", "The provider to obtain the key manager from"),
                    )
                    .with(
                        "initialized",
                        runtime_attribute("BOOLEAN", "Whether the key manager has been initialized"),
                    )
                    .with(
                        "last-loaded",
                        runtime_attribute("STRING", "When the key store was loaded last"),
                    ),
            )
            .with(
                OPERATIONS,
                operations(&[
                    ("add", "Adds a key manager"),
                    ("remove", "Removes a key manager"),
                    ("init", "Initializes the key manager from its key store"),
                ]),
            ),
    )
}

fn security_domain_description() -> ResourceDescription {
    ResourceDescription::new(
        ModelNode::new()
            .with(DESCRIPTION, "A security domain for application authentication")
            .with(
                ATTRIBUTES,
                ModelNode::new()
                    .with(
                        "default-realm",
                        attribute_schema("STRING", "The realm used when none is selected"),
                    )
                    .with(
                        "permission-mapper",
                        attribute_schema("STRING", "Reference to the permission mapper"),
                    )
                    .with(
                        "outflow-anonymous",
                        attribute_schema("BOOLEAN", "Whether to outflow the anonymous identity"),
                    )
                    .with(
                        "realms",
                        attribute_schema("LIST", "Realms available to this domain"),
                    ),
            )
            .with(
                OPERATIONS,
                operations(&[
                    ("add", "Adds a security domain"),
                    ("remove", "Removes a security domain"),
                    ("read-identity", "Reads a runtime identity of this domain"),
                ]),
            ),
    )
}

fn trust_manager_description() -> ResourceDescription {
    ResourceDescription::new(
        ModelNode::new()
            .with(DESCRIPTION, "A trust manager definition for validating peers")
            .with(
                ATTRIBUTES,
                ModelNode::new()
                    .with("algorithm", attribute_schema("STRING", "The trust manager algorithm"))
                    .with("key-store", attribute_schema("STRING", "Reference to the trust store"))
                    .with(
                        "certificate-revocation-list",
                        attribute_schema("STRING", "Path to the certificate revocation list"),
                    )
                    .with(
                        "soft-fail",
                        attribute_schema("BOOLEAN", "Accept certificates when no CRL is available"),
                    )
                    .with(
                        "crl-reloads",
                        runtime_attribute("INT", "How often the CRL has been reloaded"),
                    )
                    .with(
                        "last-crl-reload",
                        runtime_attribute("STRING", "When the CRL was reloaded last"),
                    ),
            )
            .with(
                OPERATIONS,
                operations(&[
                    ("add", "Adds a trust manager"),
                    ("remove", "Removes a trust manager"),
                    (
                        "reload-certificate-revocation-list",
                        "Reloads the certificate revocation list",
                    ),
                ]),
            ),
    )
}

fn extension_description() -> ResourceDescription {
    ResourceDescription::new(
        ModelNode::new()
            .with(DESCRIPTION, "A console extension")
            .with(
                ATTRIBUTES,
                ModelNode::new()
                    .with("version", attribute_schema("STRING", "The extension version"))
                    .with("description", attribute_schema("STRING", "What the extension does"))
                    .with("script", attribute_schema("STRING", "URL of the extension script"))
                    .with(
                        "stylesheets",
                        attribute_schema("LIST", "URLs of the extension stylesheets"),
                    )
                    .with(
                        "extension-point",
                        attribute_schema("STRING", "Where the extension plugs into the console"),
                    )
                    .with("author", attribute_schema("STRING", "The extension author"))
                    .with("homepage", attribute_schema("STRING", "The extension homepage"))
                    .with("license", attribute_schema("STRING", "The extension license")),
            )
            .with(
                OPERATIONS,
                operations(&[
                    ("add", "Registers a console extension"),
                    ("remove", "Unregisters a console extension"),
                ]),
            ),
    )
}

fn seed_key_managers() -> Vec<NamedNode> {
    vec![
        NamedNode::new(
            "applicationKM",
            ModelNode::new()
                .with("algorithm", "PKIX")
                .with("key-store", "applicationKS")
                .with("provider-name", ModelValue::Undefined)
                .with("initialized", true)
                .with("last-loaded", "2026-08-20T07:12:44Z"),
        ),
        NamedNode::new(
            "managementKM",
            ModelNode::new()
                .with("algorithm", "SunX509")
                .with("key-store", "managementKS")
                .with("provider-name", "openssl")
                .with("initialized", false),
        ),
    ]
}

fn seed_security_domains() -> Vec<NamedNode> {
    vec![
        NamedNode::new(
            "ApplicationDomain",
            ModelNode::new()
                .with("default-realm", "ApplicationRealm")
                .with("permission-mapper", "default-permission-mapper")
                .with("outflow-anonymous", false)
                .with(
                    "realms",
                    vec![
                        ModelValue::from("ApplicationRealm"),
                        ModelValue::from("local"),
                    ],
                ),
        ),
        NamedNode::new(
            "ManagementDomain",
            ModelNode::new()
                .with("default-realm", "ManagementRealm")
                .with("permission-mapper", "default-permission-mapper")
                .with("outflow-anonymous", false)
                .with("realms", vec![ModelValue::from("ManagementRealm")]),
        ),
    ]
}

fn seed_trust_managers() -> Vec<NamedNode> {
    vec![
        NamedNode::new(
            "applicationTM",
            ModelNode::new()
                .with("algorithm", "PKIX")
                .with("key-store", "applicationTS")
                .with("certificate-revocation-list", "/etc/pki/crl.pem")
                .with("soft-fail", false)
                .with("crl-reloads", 3i64)
                .with("last-crl-reload", "2026-08-19T23:41:02Z"),
        ),
        NamedNode::new(
            "ldapTM",
            ModelNode::new()
                .with("algorithm", "PKIX")
                .with("key-store", "ldapTS")
                .with("certificate-revocation-list", ModelValue::Undefined)
                .with("soft-fail", true)
                .with("crl-reloads", 0i64),
        ),
    ]
}

fn seed_extensions() -> Vec<NamedNode> {
    vec![
        NamedNode::new(
            "log-viewer",
            ModelNode::new()
                .with("version", "1.4.2")
                .with("description", "Tail and search server logs from the console")
                .with("script", "https://acme.example/console/log-viewer.js")
                .with(
                    "stylesheets",
                    vec![ModelValue::from("https://acme.example/console/log-viewer.css")],
                )
                .with("extension-point", "footer")
                .with("author", "ACME Tooling")
                .with("homepage", "https://acme.example/console")
                .with("license", "Apache-2.0"),
        ),
        NamedNode::new(
            "metrics-board",
            ModelNode::new()
                .with("version", "0.9.0")
                .with("description", "Dashboards for server metrics")
                .with("script", "https://acme.example/console/metrics-moved.js")
                .with("extension-point", "header")
                .with("author", "ACME Tooling")
                .with("license", "Apache-2.0"),
        ),
        NamedNode::new(
            "audit-trail",
            ModelNode::new()
                .with("version", "2.0.1")
                .with("description", "Browse the management audit log")
                .with("script", "https://acme.example/console/missing.js")
                .with("extension-point", "header")
                .with("author", "Initech")
                .with("license", "MIT"),
        ),
        NamedNode::new(
            "legacy-deployer",
            ModelNode::new()
                .with("version", "0.2.7")
                .with("description", "Deployment helper for legacy archives")
                .with("script", "https://acme.example/console/boom.js")
                .with("extension-point", "finder")
                .with("author", "Initech")
                .with("license", "MIT"),
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mgmt::addresses;

    fn template(address: &str) -> AddressTemplate {
        AddressTemplate::parse(address).unwrap()
    }

    #[test]
    fn test_read_description() {
        let server = DemoServer::new();
        let description = server
            .read_description(&template(addresses::KEY_MANAGER))
            .unwrap();
        assert!(description.has_attributes());
        assert!(description.find_attribute("algorithm").is_some());
        assert!(description.find_attribute("initialized").unwrap().is_runtime());
    }

    #[test]
    fn test_read_children() {
        let server = DemoServer::new();
        let children = server
            .read_children(&template(addresses::TRUST_MANAGER))
            .unwrap();
        let names: Vec<_> = children.iter().map(NamedNode::name).collect();
        assert_eq!(names, vec!["applicationTM", "ldapTM"]);
    }

    #[test]
    fn test_execute_init_mutates_key_manager() {
        let mut server = DemoServer::new();
        let address = template(addresses::KEY_MANAGER)
            .resolve(&["managementKM"])
            .unwrap();
        let result = server.execute(&address, "init").unwrap();
        assert_eq!(result.get("initialized").as_bool(), Some(true));
        assert!(result.has_defined("last-loaded"));

        let children = server
            .read_children(&template(addresses::KEY_MANAGER))
            .unwrap();
        let updated = children.iter().find(|c| c.name() == "managementKM").unwrap();
        assert_eq!(updated.node().get("initialized").as_bool(), Some(true));
    }

    #[test]
    fn test_execute_reload_bumps_counter() {
        let mut server = DemoServer::new();
        let address = template(addresses::TRUST_MANAGER)
            .resolve(&["applicationTM"])
            .unwrap();
        let result = server
            .execute(&address, "reload-certificate-revocation-list")
            .unwrap();
        assert_eq!(result.get("crl-reloads").as_i64(), Some(4));
    }

    #[test]
    fn test_execute_add_and_remove() {
        let mut server = DemoServer::new();
        let added = template(addresses::TRUST_MANAGER).resolve(&["edgeTM"]).unwrap();
        server.execute(&added, "add").unwrap();
        assert_eq!(
            server
                .read_children(&template(addresses::TRUST_MANAGER))
                .unwrap()
                .len(),
            3
        );

        // adding the same name again is rejected
        assert!(matches!(
            server.execute(&added, "add"),
            Err(ClientError::DuplicateResource { .. })
        ));

        server.execute(&added, "remove").unwrap();
        assert_eq!(
            server
                .read_children(&template(addresses::TRUST_MANAGER))
                .unwrap()
                .len(),
            2
        );
    }

    #[test]
    fn test_execute_unknown_operation() {
        let mut server = DemoServer::new();
        let address = template(addresses::SECURITY_DOMAIN)
            .resolve(&["ApplicationDomain"])
            .unwrap();
        assert!(matches!(
            server.execute(&address, "init"),
            Err(ClientError::UnknownOperation { .. })
        ));
    }

    #[test]
    fn test_execute_remove_unknown_resource() {
        let mut server = DemoServer::new();
        let address = template(addresses::KEY_MANAGER).resolve(&["nope"]).unwrap();
        assert!(matches!(
            server.execute(&address, "remove"),
            Err(ClientError::UnknownResource { .. })
        ));
    }

    #[test]
    fn test_security_contexts_differ_per_resource_type() {
        let server = DemoServer::new();
        let key_manager = server
            .read_security_context(&template(addresses::KEY_MANAGER))
            .unwrap();
        assert!(key_manager.is_executable("init"));
        assert!(!key_manager.is_executable("remove"));

        let trust_manager = server
            .read_security_context(&template(addresses::TRUST_MANAGER))
            .unwrap();
        assert!(trust_manager.is_executable("remove"));
        assert!(trust_manager.is_writable());
    }

    #[test]
    fn test_read_only_server_grants_nothing() {
        let server = DemoServer::read_only();
        for address in [
            addresses::KEY_MANAGER,
            addresses::SECURITY_DOMAIN,
            addresses::TRUST_MANAGER,
            addresses::EXTENSION,
        ] {
            let context = server.read_security_context(&template(address)).unwrap();
            assert!(context.is_readable());
            assert!(!context.is_writable());
            assert!(!context.is_executable("init"));
            assert!(!context.is_executable("remove"));
        }
    }
}
