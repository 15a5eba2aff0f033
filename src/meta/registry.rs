//! Metadata registry keyed by address template.

use std::collections::HashMap;

use thiserror::Error;

use super::address::AddressTemplate;
use super::description::ResourceDescription;
use super::security::SecurityContext;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum MetaError {
    #[error("no metadata found for {template}")]
    NoMetadata { template: String },
}

/// Everything the console knows about one resource type: its address, its
/// attribute schema and the caller's access rights on it.
#[derive(Debug, Clone)]
pub struct Metadata {
    template: AddressTemplate,
    description: ResourceDescription,
    security_context: SecurityContext,
}

impl Metadata {
    pub fn new(
        template: AddressTemplate,
        description: ResourceDescription,
        security_context: SecurityContext,
    ) -> Self {
        Self {
            template,
            description,
            security_context,
        }
    }

    pub fn template(&self) -> &AddressTemplate {
        &self.template
    }

    pub fn description(&self) -> &ResourceDescription {
        &self.description
    }

    pub fn security_context(&self) -> &SecurityContext {
        &self.security_context
    }
}

/// Registry of resource metadata, filled at boot from the management
/// endpoint's description requests.
#[derive(Debug, Default)]
pub struct MetadataRegistry {
    entries: HashMap<AddressTemplate, Metadata>,
}

impl MetadataRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, metadata: Metadata) {
        self.entries.insert(metadata.template().clone(), metadata);
    }

    pub fn lookup(&self, template: &AddressTemplate) -> Result<&Metadata, MetaError> {
        self.entries
            .get(template)
            .ok_or_else(|| MetaError::NoMetadata {
                template: template.to_string(),
            })
    }

    pub fn contains(&self, template: &AddressTemplate) -> bool {
        self.entries.contains_key(template)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
