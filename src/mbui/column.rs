//! Table columns and the factory deriving them from attribute schema.

use std::rc::Rc;

use crate::meta::description::AttributeDescription;
use crate::model::ModelBacked;
use crate::util::label;

/// Renders one cell of a row.
pub type CellRenderer<T> = Rc<dyn Fn(&T) -> String>;

/// A renderable table column.
#[derive(Clone)]
pub struct Column<T> {
    name: String,
    title: String,
    render: CellRenderer<T>,
}

impl<T> Column<T> {
    pub fn new(
        name: impl Into<String>,
        title: impl Into<String>,
        render: CellRenderer<T>,
    ) -> Self {
        Self {
            name: name.into(),
            title: title.into(),
            render,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn cell(&self, row: &T) -> String {
        (self.render)(row)
    }
}

/// Derives columns from attribute schema entries.
pub struct ColumnFactory;

impl ColumnFactory {
    /// Column titled after the humanized attribute name, rendering the
    /// row's value of that attribute. Undefined values render empty.
    pub fn attribute_column<T: ModelBacked>(attribute: &AttributeDescription<'_>) -> Column<T> {
        let name = attribute.name().to_string();
        let title = label(&name);
        let lookup = name.clone();
        Column {
            name,
            title,
            render: Rc::new(move |row: &T| {
                let value = row.model().get(&lookup);
                if value.is_defined() {
                    value.to_string()
                } else {
                    String::new()
                }
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::meta::description::{ATTRIBUTES, ResourceDescription, attribute_schema};
    use crate::model::{ModelNode, NamedNode};

    fn description() -> ResourceDescription {
        ResourceDescription::new(ModelNode::new().with(
            ATTRIBUTES,
            ModelNode::new().with(
                "default-realm",
                attribute_schema("STRING", "The realm used when none is selected"),
            ),
        ))
    }

    #[test]
    fn test_attribute_column_renders_value() {
        let description = description();
        let attribute = description.find_attribute("default-realm").unwrap();
        let column = ColumnFactory::attribute_column::<NamedNode>(&attribute);

        assert_eq!(column.name(), "default-realm");
        assert_eq!(column.title(), "Default Realm");

        let row = NamedNode::new(
            "ApplicationDomain",
            ModelNode::new().with("default-realm", "ApplicationRealm"),
        );
        assert_eq!(column.cell(&row), "ApplicationRealm");
    }

    #[test]
    fn test_attribute_column_renders_undefined_empty() {
        let description = description();
        let attribute = description.find_attribute("default-realm").unwrap();
        let column = ColumnFactory::attribute_column::<NamedNode>(&attribute);

        let row = NamedNode::new("bare", ModelNode::new());
        assert_eq!(column.cell(&row), "");
    }
}
