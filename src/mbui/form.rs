//! Model driven, read-only forms.

use tracing::error;

use crate::meta::registry::Metadata;
use crate::model::ModelBacked;
use crate::util::label;

use super::BuildError;

/// Widgets that can display one item and be cleared.
///
/// Tables dispatch into this trait on selection changes: selecting a single
/// row shows it, anything else clears the form.
pub trait Form<T> {
    fn view(&mut self, item: &T);
    fn clear(&mut self);
}

/// One labelled field of a model driven form.
#[derive(Debug, Clone)]
pub struct FormField {
    name: String,
    label: String,
    runtime: bool,
}

impl FormField {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn is_runtime(&self) -> bool {
        self.runtime
    }
}

/// Read-only form whose fields come from the resource's attribute schema.
#[derive(Debug)]
pub struct ModelNodeForm<T: ModelBacked> {
    id: String,
    fields: Vec<FormField>,
    current: Option<T>,
}

impl<T: ModelBacked> ModelNodeForm<T> {
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn fields(&self) -> &[FormField] {
        &self.fields
    }

    pub fn is_empty(&self) -> bool {
        self.current.is_none()
    }

    /// Label and rendered value per field for the item on display.
    /// Empty while the form is cleared.
    pub fn rows(&self) -> Vec<(&str, String)> {
        let Some(current) = &self.current else {
            return Vec::new();
        };
        self.fields
            .iter()
            .map(|field| {
                let value = current.model().get(field.name());
                let rendered = if value.is_defined() {
                    value.to_string()
                } else {
                    String::new()
                };
                (field.label(), rendered)
            })
            .collect()
    }
}

impl<T: ModelBacked> Form<T> for ModelNodeForm<T> {
    fn view(&mut self, item: &T) {
        self.current = Some(item.clone());
    }

    fn clear(&mut self) {
        self.current = None;
    }
}

/// Builder for [`ModelNodeForm`].
#[derive(Debug)]
pub struct ModelNodeFormBuilder {
    id: String,
    metadata: Metadata,
    attributes: Vec<String>,
    include_runtime: bool,
}

impl ModelNodeFormBuilder {
    pub fn new(id: impl Into<String>, metadata: Metadata) -> Self {
        Self {
            id: id.into(),
            metadata,
            attributes: Vec::new(),
            include_runtime: false,
        }
    }

    /// Restricts the form to the given attributes, in the given order.
    /// Without this every schema attribute becomes a field.
    pub fn include(mut self, attributes: &[&str]) -> Self {
        self.attributes = attributes.iter().map(|a| a.to_string()).collect();
        self
    }

    /// Also show runtime attributes, not just configuration.
    pub fn include_runtime(mut self) -> Self {
        self.include_runtime = true;
        self
    }

    pub fn build<T: ModelBacked>(self) -> Result<ModelNodeForm<T>, BuildError> {
        let description = self.metadata.description();
        if !description.has_attributes() {
            return Err(BuildError::NoAttributes { id: self.id });
        }

        let mut fields = Vec::new();
        let mut push = |name: &str, runtime: bool| {
            if runtime && !self.include_runtime {
                return;
            }
            fields.push(FormField {
                name: name.to_string(),
                label: label(name),
                runtime,
            });
        };

        if self.attributes.is_empty() {
            for attribute in description.attributes() {
                push(attribute.name(), attribute.is_runtime());
            }
        } else {
            for name in &self.attributes {
                match description.find_attribute(name) {
                    Some(attribute) => push(attribute.name(), attribute.is_runtime()),
                    None => {
                        error!(form = %self.id, attribute = %name,
                            "no attribute description found, skipping field");
                    }
                }
            }
        }

        if fields.is_empty() {
            return Err(BuildError::NoFields { id: self.id });
        }
        Ok(ModelNodeForm {
            id: self.id,
            fields,
            current: None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::meta::address::AddressTemplate;
    use crate::meta::description::{
        ATTRIBUTES, DESCRIPTION, ResourceDescription, RUNTIME, STORAGE, TYPE, attribute_schema,
    };
    use crate::meta::security::SecurityContext;
    use crate::model::{ModelNode, ModelValue, NamedNode};

    fn metadata() -> Metadata {
        let attributes = ModelNode::new()
            .with("algorithm", attribute_schema("STRING", "The algorithm"))
            .with("key-store", attribute_schema("STRING", "The key store"))
            .with(
                "initialized",
                ModelValue::Object(
                    ModelNode::new()
                        .with(TYPE, "BOOLEAN")
                        .with(DESCRIPTION, "Runtime state")
                        .with(STORAGE, RUNTIME),
                ),
            );
        Metadata::new(
            AddressTemplate::parse("/subsystem=tls/key-manager=*").unwrap(),
            ResourceDescription::new(ModelNode::new().with(ATTRIBUTES, attributes)),
            SecurityContext::read_only(),
        )
    }

    #[test]
    fn test_build_skips_runtime_by_default() {
        let form: ModelNodeForm<NamedNode> = ModelNodeFormBuilder::new("km-form", metadata())
            .build()
            .unwrap();
        let names: Vec<_> = form.fields().iter().map(FormField::name).collect();
        assert_eq!(names, vec!["algorithm", "key-store"]);
    }

    #[test]
    fn test_build_include_runtime() {
        let form: ModelNodeForm<NamedNode> = ModelNodeFormBuilder::new("km-form", metadata())
            .include_runtime()
            .build()
            .unwrap();
        let names: Vec<_> = form.fields().iter().map(FormField::name).collect();
        assert_eq!(names, vec!["algorithm", "initialized", "key-store"]);
        assert!(form.fields()[1].is_runtime());
    }

    #[test]
    fn test_build_explicit_subset_keeps_order() {
        let form: ModelNodeForm<NamedNode> = ModelNodeFormBuilder::new("km-form", metadata())
            .include(&["key-store", "algorithm"])
            .build()
            .unwrap();
        let names: Vec<_> = form.fields().iter().map(FormField::name).collect();
        assert_eq!(names, vec!["key-store", "algorithm"]);
    }

    #[test]
    fn test_build_skips_unknown_attributes() {
        let form: ModelNodeForm<NamedNode> = ModelNodeFormBuilder::new("km-form", metadata())
            .include(&["algorithm", "no-such-attribute"])
            .build()
            .unwrap();
        assert_eq!(form.fields().len(), 1);
    }

    #[test]
    fn test_build_fails_without_fields() {
        let err = ModelNodeFormBuilder::new("km-form", metadata())
            .include(&["no-such-attribute"])
            .build::<NamedNode>()
            .unwrap_err();
        assert_eq!(err, BuildError::NoFields { id: "km-form".to_string() });
    }

    #[test]
    fn test_build_fails_without_attributes_section() {
        let empty = Metadata::new(
            AddressTemplate::parse("/subsystem=tls/key-manager=*").unwrap(),
            ResourceDescription::default(),
            SecurityContext::read_only(),
        );
        let err = ModelNodeFormBuilder::new("km-form", empty)
            .build::<NamedNode>()
            .unwrap_err();
        assert_eq!(err, BuildError::NoAttributes { id: "km-form".to_string() });
    }

    #[test]
    fn test_view_and_clear() {
        let mut form: ModelNodeForm<NamedNode> = ModelNodeFormBuilder::new("km-form", metadata())
            .build()
            .unwrap();
        assert!(form.is_empty());
        assert!(form.rows().is_empty());

        let item = NamedNode::new(
            "applicationKM",
            ModelNode::new().with("algorithm", "PKIX"),
        );
        form.view(&item);
        assert!(!form.is_empty());
        let rows = form.rows();
        assert_eq!(rows[0], ("Algorithm", "PKIX".to_string()));
        // key-store is not defined on the item, it renders empty
        assert_eq!(rows[1], ("Key Store", String::new()));

        form.clear();
        assert!(form.is_empty());
    }
}
