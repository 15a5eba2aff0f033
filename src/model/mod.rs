//! Management model values.
//!
//! A [`ModelNode`] is the dynamic value tree the management endpoint speaks:
//! resource attributes, operation results and resource descriptions all
//! arrive as nodes. [`NamedNode`] wraps a node that carries its identity in
//! the `name` property, which is how child resources of a wildcard address
//! are listed.

use std::collections::BTreeMap;
use std::fmt;

use serde::ser::{Serialize, SerializeMap, SerializeSeq, Serializer};

/// Property holding the identity of a named resource.
pub const NAME: &str = "name";

static UNDEFINED: ModelValue = ModelValue::Undefined;

/// A single management model value.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum ModelValue {
    /// Absent or explicitly undefined.
    #[default]
    Undefined,
    Boolean(bool),
    Int(i64),
    Double(f64),
    Str(String),
    List(Vec<ModelValue>),
    Object(ModelNode),
}

impl ModelValue {
    /// Returns true unless the value is [`ModelValue::Undefined`].
    pub fn is_defined(&self) -> bool {
        !matches!(self, ModelValue::Undefined)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            ModelValue::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            ModelValue::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            ModelValue::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// Numeric value as a double. Integers are widened.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            ModelValue::Double(d) => Some(*d),
            ModelValue::Int(i) => Some(*i as f64),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[ModelValue]> {
        match self {
            ModelValue::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&ModelNode> {
        match self {
            ModelValue::Object(node) => Some(node),
            _ => None,
        }
    }
}

impl fmt::Display for ModelValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModelValue::Undefined => write!(f, "undefined"),
            ModelValue::Boolean(b) => write!(f, "{b}"),
            ModelValue::Int(i) => write!(f, "{i}"),
            ModelValue::Double(d) => write!(f, "{d}"),
            ModelValue::Str(s) => write!(f, "{s}"),
            ModelValue::List(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{item}")?;
                }
                write!(f, "]")
            }
            ModelValue::Object(node) => write!(f, "{node}"),
        }
    }
}

impl From<&str> for ModelValue {
    fn from(value: &str) -> Self {
        ModelValue::Str(value.to_string())
    }
}

impl From<String> for ModelValue {
    fn from(value: String) -> Self {
        ModelValue::Str(value)
    }
}

impl From<bool> for ModelValue {
    fn from(value: bool) -> Self {
        ModelValue::Boolean(value)
    }
}

impl From<i64> for ModelValue {
    fn from(value: i64) -> Self {
        ModelValue::Int(value)
    }
}

impl From<f64> for ModelValue {
    fn from(value: f64) -> Self {
        ModelValue::Double(value)
    }
}

impl From<Vec<ModelValue>> for ModelValue {
    fn from(value: Vec<ModelValue>) -> Self {
        ModelValue::List(value)
    }
}

impl From<ModelNode> for ModelValue {
    fn from(value: ModelNode) -> Self {
        ModelValue::Object(value)
    }
}

impl Serialize for ModelValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            ModelValue::Undefined => serializer.serialize_unit(),
            ModelValue::Boolean(b) => serializer.serialize_bool(*b),
            ModelValue::Int(i) => serializer.serialize_i64(*i),
            ModelValue::Double(d) => serializer.serialize_f64(*d),
            ModelValue::Str(s) => serializer.serialize_str(s),
            ModelValue::List(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            ModelValue::Object(node) => node.serialize(serializer),
        }
    }
}

/// An ordered mapping of property names to model values.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ModelNode {
    properties: BTreeMap<String, ModelValue>,
}

impl ModelNode {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the property value, or the undefined value when absent.
    pub fn get(&self, name: &str) -> &ModelValue {
        self.properties.get(name).unwrap_or(&UNDEFINED)
    }

    /// True when the property exists, defined or not.
    pub fn has(&self, name: &str) -> bool {
        self.properties.contains_key(name)
    }

    /// True when the property exists and is defined.
    pub fn has_defined(&self, name: &str) -> bool {
        self.properties.get(name).is_some_and(ModelValue::is_defined)
    }

    pub fn set(&mut self, name: impl Into<String>, value: impl Into<ModelValue>) {
        self.properties.insert(name.into(), value.into());
    }

    /// Builder-style [`ModelNode::set`].
    pub fn with(mut self, name: impl Into<String>, value: impl Into<ModelValue>) -> Self {
        self.set(name, value);
        self
    }

    pub fn remove(&mut self, name: &str) -> Option<ModelValue> {
        self.properties.remove(name)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.properties.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ModelValue)> {
        self.properties.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.properties.len()
    }

    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }
}

impl fmt::Display for ModelNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (i, (key, value)) in self.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{key}={value}")?;
        }
        write!(f, "}}")
    }
}

impl Serialize for ModelNode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.properties.len()))?;
        for (key, value) in &self.properties {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

/// A model node with a mandatory identity.
///
/// The name is mirrored into the node's `name` property so that consumers
/// working on the plain node still see the identity.
#[derive(Debug, Clone, PartialEq)]
pub struct NamedNode {
    name: String,
    node: ModelNode,
}

impl NamedNode {
    pub fn new(name: impl Into<String>, node: ModelNode) -> Self {
        let name = name.into();
        let node = node.with(NAME, name.as_str());
        Self { name, node }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn node(&self) -> &ModelNode {
        &self.node
    }

    pub fn node_mut(&mut self) -> &mut ModelNode {
        &mut self.node
    }

    pub fn into_node(self) -> ModelNode {
        self.node
    }
}

impl Serialize for NamedNode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.node.serialize(serializer)
    }
}

/// Row types backed by a management model node.
pub trait ModelBacked: Clone {
    fn model(&self) -> &ModelNode;
}

impl ModelBacked for ModelNode {
    fn model(&self) -> &ModelNode {
        self
    }
}

impl ModelBacked for NamedNode {
    fn model(&self) -> &ModelNode {
        self.node()
    }
}
