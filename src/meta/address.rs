//! Resource address templates and resolved addresses.
//!
//! A template addresses a resource type: `/subsystem=tls/key-manager=*`.
//! Wildcard and `{placeholder}` segment values are filled in at resolution
//! time, yielding a [`ResourceAddress`] pointing at one concrete resource.

use std::fmt;

use serde::ser::{Serialize, Serializer};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AddressError {
    #[error("invalid address segment '{segment}', expected key=value")]
    InvalidSegment { segment: String },
    #[error("no value left to resolve segment '{key}' of {template}")]
    UnresolvedSegment { key: String, template: String },
}

/// One `key=value` pair of an address template.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Segment {
    pub key: String,
    pub value: SegmentValue,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SegmentValue {
    Literal(String),
    /// `*`, filled from resolution values.
    Wildcard,
    /// `{name}`, filled from resolution values.
    Placeholder(String),
}

/// An address with possibly unresolved segment values.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AddressTemplate {
    segments: Vec<Segment>,
}

impl AddressTemplate {
    /// The root address `/`.
    pub fn root() -> Self {
        Self {
            segments: Vec::new(),
        }
    }

    pub fn parse(input: &str) -> Result<Self, AddressError> {
        let trimmed = input.trim().trim_matches('/');
        if trimmed.is_empty() {
            return Ok(Self::root());
        }
        let mut segments = Vec::new();
        for raw in trimmed.split('/') {
            let invalid = || AddressError::InvalidSegment {
                segment: raw.to_string(),
            };
            let (key, value) = raw.split_once('=').ok_or_else(invalid)?;
            if key.is_empty() || value.is_empty() {
                return Err(invalid());
            }
            let value = if value == "*" {
                SegmentValue::Wildcard
            } else if let Some(name) = value.strip_prefix('{').and_then(|v| v.strip_suffix('}')) {
                SegmentValue::Placeholder(name.to_string())
            } else {
                SegmentValue::Literal(value.to_string())
            };
            segments.push(Segment {
                key: key.to_string(),
                value,
            });
        }
        Ok(Self { segments })
    }

    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Key of the last segment, the resource type this template addresses.
    pub fn last_key(&self) -> Option<&str> {
        self.segments.last().map(|s| s.key.as_str())
    }

    /// Fills wildcards and placeholders from `values`, in segment order.
    /// Surplus values are ignored, missing ones are an error.
    pub fn resolve(&self, values: &[&str]) -> Result<ResourceAddress, AddressError> {
        let mut supplied = values.iter();
        let mut segments = Vec::with_capacity(self.segments.len());
        for segment in &self.segments {
            let value = match &segment.value {
                SegmentValue::Literal(v) => v.clone(),
                SegmentValue::Wildcard | SegmentValue::Placeholder(_) => supplied
                    .next()
                    .ok_or_else(|| AddressError::UnresolvedSegment {
                        key: segment.key.clone(),
                        template: self.to_string(),
                    })?
                    .to_string(),
            };
            segments.push((segment.key.clone(), value));
        }
        Ok(ResourceAddress { segments })
    }
}

impl fmt::Display for AddressTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.segments.is_empty() {
            return write!(f, "/");
        }
        for segment in &self.segments {
            match &segment.value {
                SegmentValue::Literal(v) => write!(f, "/{}={}", segment.key, v)?,
                SegmentValue::Wildcard => write!(f, "/{}=*", segment.key)?,
                SegmentValue::Placeholder(name) => write!(f, "/{}={{{}}}", segment.key, name)?,
            }
        }
        Ok(())
    }
}

impl Serialize for AddressTemplate {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// A fully resolved resource address.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ResourceAddress {
    segments: Vec<(String, String)>,
}

impl ResourceAddress {
    pub fn segments(&self) -> &[(String, String)] {
        &self.segments
    }

    /// Last `(key, value)` pair, the concrete resource this address names.
    pub fn last(&self) -> Option<(&str, &str)> {
        self.segments
            .last()
            .map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl fmt::Display for ResourceAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.segments.is_empty() {
            return write!(f, "/");
        }
        for (key, value) in &self.segments {
            write!(f, "/{key}={value}")?;
        }
        Ok(())
    }
}

impl Serialize for ResourceAddress {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_and_display_round_trip() {
        for input in [
            "/",
            "/subsystem=tls",
            "/subsystem=tls/key-manager=*",
            "/subsystem=tls/key-manager={selected}",
        ] {
            let template = AddressTemplate::parse(input).unwrap();
            assert_eq!(template.to_string(), input);
        }
    }

    #[test]
    fn test_parse_tolerates_surrounding_slashes() {
        let template = AddressTemplate::parse("subsystem=tls/").unwrap();
        assert_eq!(template.to_string(), "/subsystem=tls");
    }

    #[test]
    fn test_parse_rejects_bad_segments() {
        for input in ["/subsystem", "/=tls", "/subsystem="] {
            assert!(matches!(
                AddressTemplate::parse(input),
                Err(AddressError::InvalidSegment { .. })
            ));
        }
    }

    #[test]
    fn test_resolve_fills_wildcards_in_order() {
        let template = AddressTemplate::parse("/subsystem=tls/key-manager=*").unwrap();
        let address = template.resolve(&["km1"]).unwrap();
        assert_eq!(address.to_string(), "/subsystem=tls/key-manager=km1");
        assert_eq!(address.last(), Some(("key-manager", "km1")));
    }

    #[test]
    fn test_resolve_fills_placeholders() {
        let template =
            AddressTemplate::parse("/host={selected.host}/server=*").unwrap();
        let address = template.resolve(&["primary", "server-one"]).unwrap();
        assert_eq!(address.to_string(), "/host=primary/server=server-one");
    }

    #[test]
    fn test_resolve_missing_value_fails() {
        let template = AddressTemplate::parse("/subsystem=tls/key-manager=*").unwrap();
        let err = template.resolve(&[]).unwrap_err();
        assert!(matches!(err, AddressError::UnresolvedSegment { ref key, .. } if key == "key-manager"));
    }

    #[test]
    fn test_resolve_ignores_surplus_values() {
        let template = AddressTemplate::parse("/subsystem=tls").unwrap();
        let address = template.resolve(&["unused"]).unwrap();
        assert_eq!(address.to_string(), "/subsystem=tls");
    }

    #[test]
    fn test_last_key() {
        let template = AddressTemplate::parse("/subsystem=tls/trust-manager=*").unwrap();
        assert_eq!(template.last_key(), Some("trust-manager"));
        assert_eq!(AddressTemplate::root().last_key(), None);
    }
}
