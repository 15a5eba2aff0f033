//! Model driven tables.
//!
//! [`TableBuilder`] derives columns from the resource description and tags
//! buttons with security constraints; [`ModelNodeTable`] re-applies the
//! security decision whenever the widget attaches, reloads or moves its
//! selection.

use std::cell::RefCell;
use std::rc::Rc;

use ratatui::Frame;
use ratatui::layout::Rect;
use tracing::error;

use crate::meta::address::AddressTemplate;
use crate::meta::registry::Metadata;
use crate::meta::security::{AuthorisationDecision, Constraint, Environment};
use crate::model::{ModelBacked, NAME};
use crate::tui::command::UiCommand;
use crate::tui::dialog::DialogFactory;
use crate::tui::table::{
    Button, DataTable, RefreshMode, RowHandler, Scope, SelectMode, SelectionHandler, TableError,
};

use super::BuildError;
use super::column::{Column, ColumnFactory};
use super::form::Form;

/// Builder for [`ModelNodeTable`]s.
///
/// Columns reference attributes of the resource description; a column for
/// an unknown attribute is logged and skipped. `build` fails unless the
/// description has attributes and at least one attribute-backed column
/// survived.
pub struct TableBuilder<T: ModelBacked> {
    id: String,
    metadata: Metadata,
    environment: Environment,
    columns: Vec<Column<T>>,
    attribute_columns: usize,
    buttons: Vec<Button<T>>,
    row_actions: Vec<(String, RowHandler<T>)>,
    multi_select: bool,
}

impl<T: ModelBacked + 'static> TableBuilder<T> {
    pub fn new(id: impl Into<String>, metadata: Metadata, environment: Environment) -> Self {
        Self {
            id: id.into(),
            metadata,
            environment,
            columns: Vec::new(),
            attribute_columns: 0,
            buttons: Vec::new(),
            row_actions: Vec::new(),
            multi_select: false,
        }
    }

    /// Column backed by `attribute` of the resource description.
    pub fn column(mut self, attribute: &str) -> Self {
        match self.metadata.description().find_attribute(attribute) {
            Some(ref found) => {
                self.columns.push(ColumnFactory::attribute_column(found));
                self.attribute_columns += 1;
            }
            None => {
                error!(table = %self.id, attribute, "no such attribute in the resource description, skipping column");
            }
        }
        self
    }

    /// The resource name column. Names live outside the attribute schema.
    pub fn name_column(mut self) -> Self {
        self.columns.push(Column::new(
            NAME,
            "Name",
            Rc::new(|row: &T| row.model().get(NAME).as_str().unwrap_or("").to_string()),
        ));
        self
    }

    /// Free-form column with its own renderer.
    pub fn column_with(mut self, column: Column<T>) -> Self {
        self.columns.push(column);
        self
    }

    pub fn button(mut self, title: impl Into<String>, scope: Scope, handler: SelectionHandler<T>) -> Self {
        self.buttons.push(Button::new(title, scope, handler));
        self
    }

    pub fn button_constrained(
        mut self,
        title: impl Into<String>,
        scope: Scope,
        constraint: Constraint,
        handler: SelectionHandler<T>,
    ) -> Self {
        self.buttons.push(Button::constrained(title, scope, constraint, handler));
        self
    }

    /// Button running `operation` against the selected row's address.
    pub fn operation_button(self, title: impl Into<String>, operation: &str) -> Self {
        let template = self.metadata.template().clone();
        let op = operation.to_string();
        self.button_constrained(
            title,
            Scope::Selected,
            Constraint::executable(template.clone(), operation),
            Box::new(move |rows, sink| {
                let Some(row) = rows.first() else { return };
                let Some(name) = row.model().get(NAME).as_str() else { return };
                match template.resolve(&[name]) {
                    Ok(address) => sink.push(UiCommand::Execute {
                        address,
                        operation: op.clone(),
                    }),
                    Err(err) => error!(%err, "cannot resolve operation address"),
                }
            }),
        )
    }

    /// "Add" button opening a name prompt; confirming adds the resource.
    pub fn add_button(self) -> Self {
        let template = self.metadata.template().clone();
        let what = template.last_key().unwrap_or("resource").to_string();
        self.button_constrained(
            "Add",
            Scope::Global,
            Constraint::executable(template.clone(), "add"),
            Box::new(move |_, sink| {
                sink.push(UiCommand::OpenDialog(Box::new(DialogFactory::prompt(
                    format!("Add {what}"),
                    format!("Name of the new {what}"),
                    UiCommand::AddResource {
                        template: template.clone(),
                        name: String::new(),
                    },
                ))));
            }),
        )
    }

    /// "Remove" button asking for confirmation first.
    pub fn remove_button(self) -> Self {
        let template = self.metadata.template().clone();
        self.button_constrained(
            "Remove",
            Scope::Selected,
            Constraint::executable(template.clone(), "remove"),
            Box::new(move |rows, sink| {
                let Some(row) = rows.first() else { return };
                let Some(name) = row.model().get(NAME).as_str() else { return };
                match template.resolve(&[name]) {
                    Ok(address) => sink.push(UiCommand::OpenDialog(Box::new(
                        DialogFactory::confirmation(
                            "Remove",
                            format!("Remove {name}? The resource is deleted from the server."),
                            UiCommand::Execute {
                                address,
                                operation: "remove".to_string(),
                            },
                        ),
                    ))),
                    Err(err) => error!(%err, "cannot resolve remove address"),
                }
            }),
        )
    }

    /// Row action on `column` running `operation` against the row's address.
    pub fn row_operation(mut self, column: &str, operation: &str) -> Self {
        let template = self.metadata.template().clone();
        let op = operation.to_string();
        self.row_actions.push((
            column.to_string(),
            Box::new(move |row: &T, sink| {
                let Some(name) = row.model().get(NAME).as_str() else { return };
                match template.resolve(&[name]) {
                    Ok(address) => sink.push(UiCommand::Execute {
                        address,
                        operation: op.clone(),
                    }),
                    Err(err) => error!(%err, "cannot resolve row action address"),
                }
            }),
        ));
        self
    }

    pub fn multi_select(mut self) -> Self {
        self.multi_select = true;
        self
    }

    fn validate(&self) -> Result<(), BuildError> {
        if !self.metadata.description().has_attributes() {
            return Err(BuildError::NoAttributes {
                id: self.id.clone(),
            });
        }
        if self.attribute_columns == 0 {
            return Err(BuildError::NoColumns {
                id: self.id.clone(),
            });
        }
        Ok(())
    }

    pub fn build(self) -> Result<ModelNodeTable<T>, BuildError> {
        self.validate()?;
        let mut table = DataTable::new(self.id, self.columns);
        if self.multi_select {
            table.set_select_mode(SelectMode::Multi);
        }
        // Rows are keyed by their resource name; rows without one simply
        // never take part in selection restore.
        table.set_identifier(Rc::new(|row: &T| {
            row.model().get(NAME).as_str().map(str::to_string)
        }));
        for button in self.buttons {
            table.add_button(button);
        }
        for (column, handler) in self.row_actions {
            table.add_row_action(column, handler);
        }
        Ok(ModelNodeTable {
            table,
            metadata: self.metadata,
            environment: self.environment,
        })
    }
}

/// A data table over model nodes with security baked in.
pub struct ModelNodeTable<T: ModelBacked> {
    table: DataTable<T>,
    metadata: Metadata,
    environment: Environment,
}

impl<T: ModelBacked + 'static> ModelNodeTable<T> {
    pub fn id(&self) -> &str {
        self.table.id()
    }

    pub fn metadata(&self) -> &Metadata {
        &self.metadata
    }

    pub fn template(&self) -> &AddressTemplate {
        self.metadata.template()
    }

    pub fn attach(&mut self) {
        self.table.attach();
        self.apply_security();
    }

    pub fn is_attached(&self) -> bool {
        self.table.is_attached()
    }

    pub fn update(&mut self, rows: Vec<T>, mode: RefreshMode) -> Result<(), TableError> {
        self.table.update(rows, mode)?;
        self.apply_security();
        Ok(())
    }

    pub fn select(&mut self, row: &T) -> Result<(), TableError> {
        self.table.select(row)?;
        self.apply_security();
        Ok(())
    }

    pub fn clear(&mut self) -> Result<(), TableError> {
        self.table.clear()
    }

    pub fn clear_selection(&mut self) -> Result<(), TableError> {
        self.table.clear_selection()
    }

    pub fn rows(&self) -> Result<&[T], TableError> {
        self.table.rows()
    }

    pub fn selected_row(&self) -> Result<Option<&T>, TableError> {
        self.table.selected_row()
    }

    pub fn selected_rows(&self) -> Result<Vec<&T>, TableError> {
        self.table.selected_rows()
    }

    pub fn has_selection(&self) -> Result<bool, TableError> {
        self.table.has_selection()
    }

    pub fn on_selection_change(&mut self, handler: SelectionHandler<T>) -> Result<(), TableError> {
        self.table.on_selection_change(handler)
    }

    pub fn bind_form(&mut self, form: Rc<RefCell<dyn Form<T>>>) -> Result<(), TableError> {
        self.table.bind_form(form)
    }

    pub fn bind_forms(&mut self, forms: Vec<Rc<RefCell<dyn Form<T>>>>) -> Result<(), TableError> {
        self.table.bind_forms(forms)
    }

    pub fn enable_button(&mut self, index: usize, enabled: bool) -> Result<(), TableError> {
        self.table.enable_button(index, enabled)
    }

    pub fn press_button(&mut self, index: usize) -> Result<(), TableError> {
        self.table.press_button(index)
    }

    pub fn trigger_row_action(&mut self, column: &str, row_id: &str) -> Result<(), TableError> {
        self.table.trigger_row_action(column, row_id)
    }

    pub fn buttons(&self) -> &[Button<T>] {
        self.table.buttons()
    }

    pub fn drain_commands(&mut self) -> Vec<UiCommand> {
        self.table.drain_commands()
    }

    pub fn show(&mut self) {
        self.table.show();
    }

    pub fn hide(&mut self) {
        self.table.hide();
    }

    pub fn is_visible(&self) -> bool {
        self.table.is_visible()
    }

    pub fn select_next(&mut self) {
        self.table.select_next();
        self.apply_security();
    }

    pub fn select_prev(&mut self) {
        self.table.select_prev();
        self.apply_security();
    }

    pub fn select_page_down(&mut self) {
        self.table.select_page_down();
        self.apply_security();
    }

    pub fn select_page_up(&mut self) {
        self.table.select_page_up();
        self.apply_security();
    }

    pub fn toggle_select(&mut self) {
        self.table.toggle_select();
        self.apply_security();
    }

    pub fn render(&mut self, frame: &mut Frame, area: Rect, focused: bool) {
        self.table.render(frame, area, focused);
    }

    fn apply_security(&mut self) {
        let decision =
            AuthorisationDecision::from(&self.environment, self.metadata.security_context());
        self.table.apply_security(&decision);
    }
}
