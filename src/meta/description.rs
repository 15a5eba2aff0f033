//! Resource descriptions: the attribute and operation schema of a resource
//! type, itself a model node as returned by the management endpoint.

use serde::ser::{Serialize, Serializer};

use crate::model::{ModelNode, ModelValue};

pub const ATTRIBUTES: &str = "attributes";
pub const DESCRIPTION: &str = "description";
pub const OPERATIONS: &str = "operations";
pub const REQUIRED: &str = "required";
pub const RUNTIME: &str = "runtime";
pub const STORAGE: &str = "storage";
pub const TYPE: &str = "type";

/// Schema of a single attribute, borrowed from its resource description.
#[derive(Debug, Clone, Copy)]
pub struct AttributeDescription<'a> {
    name: &'a str,
    node: &'a ModelNode,
}

impl<'a> AttributeDescription<'a> {
    pub fn name(&self) -> &'a str {
        self.name
    }

    pub fn description(&self) -> Option<&'a str> {
        self.node.get(DESCRIPTION).as_str()
    }

    pub fn type_name(&self) -> Option<&'a str> {
        self.node.get(TYPE).as_str()
    }

    /// Runtime attributes reflect server state instead of configuration.
    pub fn is_runtime(&self) -> bool {
        self.node.get(STORAGE).as_str() == Some(RUNTIME)
    }

    pub fn is_required(&self) -> bool {
        self.node.get(REQUIRED).as_bool().unwrap_or(false)
    }

    pub fn node(&self) -> &'a ModelNode {
        self.node
    }
}

/// A resource description as returned by the management endpoint.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ResourceDescription {
    node: ModelNode,
}

impl ResourceDescription {
    pub fn new(node: ModelNode) -> Self {
        Self { node }
    }

    pub fn description(&self) -> Option<&str> {
        self.node.get(DESCRIPTION).as_str()
    }

    /// True when the description carries a defined attributes section.
    pub fn has_attributes(&self) -> bool {
        self.node.has_defined(ATTRIBUTES)
    }

    /// Looks up the schema of a single attribute.
    pub fn find_attribute(&self, name: &str) -> Option<AttributeDescription<'_>> {
        let attributes = self.node.get(ATTRIBUTES).as_object()?;
        attributes
            .iter()
            .find(|(key, _)| *key == name)
            .and_then(|(key, value)| {
                value
                    .as_object()
                    .map(|node| AttributeDescription { name: key, node })
            })
    }

    /// All attribute schemas, in name order.
    pub fn attributes(&self) -> impl Iterator<Item = AttributeDescription<'_>> {
        self.node
            .get(ATTRIBUTES)
            .as_object()
            .into_iter()
            .flat_map(|attributes| {
                attributes.iter().filter_map(|(name, value)| {
                    value
                        .as_object()
                        .map(|node| AttributeDescription { name, node })
                })
            })
    }

    pub fn node(&self) -> &ModelNode {
        &self.node
    }
}

impl Serialize for ResourceDescription {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.node.serialize(serializer)
    }
}

/// Shorthand for building an attribute schema node.
pub fn attribute_schema(type_name: &str, description: &str) -> ModelValue {
    ModelValue::Object(
        ModelNode::new()
            .with(TYPE, type_name)
            .with(DESCRIPTION, description),
    )
}
