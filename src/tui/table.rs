//! Generic data table widget.
//!
//! The table starts **unattached**: configuration (columns, buttons, row
//! actions, identifier) is allowed, everything else fails with
//! [`TableError::NotAttached`]. After [`DataTable::attach`] the data and
//! selection API is live. Selection handlers and button handlers never
//! touch other widgets directly; they push [`UiCommand`]s which the
//! owning view drains.

use std::cell::RefCell;
use std::rc::Rc;

use ratatui::Frame;
use ratatui::layout::{Layout, Rect};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState};
use thiserror::Error;
use tracing::{debug, warn};

use crate::mbui::column::Column;
use crate::mbui::form::Form;
use crate::meta::security::{AuthorisationDecision, Constraint, ElementGuard, Guarded};

use super::command::UiCommand;
use super::style::Styles;

const PAGE_JUMP: usize = 10;
const MAX_COLUMN_WIDTH: usize = 40;

/// Errors raised by the table API.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TableError {
    /// The widget was used before `attach()`.
    #[error("table '{id}' is not attached, call attach() first")]
    NotAttached { id: String },
}

/// How `update` treats the scroll position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RefreshMode {
    /// Scroll back to the top.
    #[default]
    Reset,
    /// Keep the current scroll offset, clamped to the new row count.
    Hold,
}

/// Zero-or-one vs zero-or-many selected rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SelectMode {
    #[default]
    Single,
    Multi,
}

/// When a button may be pressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    /// Enabled state is controlled through [`DataTable::enable_button`].
    Global,
    /// Enabled exactly while the selection is non-empty.
    Selected,
}

/// Maps a row to its stable identifier.
pub type IdentifierFn<T> = Rc<dyn Fn(&T) -> Option<String>>;

/// Called with the selected rows and a command sink.
pub type SelectionHandler<T> = Box<dyn FnMut(&[T], &mut Vec<UiCommand>)>;

/// Called with a single row and a command sink.
pub type RowHandler<T> = Box<dyn FnMut(&T, &mut Vec<UiCommand>)>;

/// An action button rendered above the table.
pub struct Button<T> {
    title: String,
    scope: Scope,
    constraint: Option<Constraint>,
    enabled: bool,
    visible: bool,
    handler: SelectionHandler<T>,
}

impl<T> Button<T> {
    pub fn new(title: impl Into<String>, scope: Scope, handler: SelectionHandler<T>) -> Self {
        Self {
            title: title.into(),
            scope,
            constraint: None,
            // Selected-scope buttons wait for a selection.
            enabled: scope == Scope::Global,
            visible: true,
            handler,
        }
    }

    /// A button gated by a security constraint.
    pub fn constrained(
        title: impl Into<String>,
        scope: Scope,
        constraint: Constraint,
        handler: SelectionHandler<T>,
    ) -> Self {
        Self {
            constraint: Some(constraint),
            ..Self::new(title, scope, handler)
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }
}

impl<T> Guarded for Button<T> {
    fn constraint(&self) -> Option<&Constraint> {
        self.constraint.as_ref()
    }

    fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }
}

/// An action triggered on a single row, addressed by column name.
struct RowAction<T> {
    column: String,
    handler: RowHandler<T>,
}

pub struct DataTable<T: Clone> {
    id: String,
    columns: Vec<Column<T>>,
    buttons: Vec<Button<T>>,
    row_actions: Vec<RowAction<T>>,
    select_mode: SelectMode,
    identifier: Option<IdentifierFn<T>>,
    attached: bool,
    visible: bool,
    rows: Vec<T>,
    /// Indices into `rows`, ascending. In single mode at most one entry.
    selected: Vec<usize>,
    cursor: TableState,
    /// Row identifiers in view order, refreshed after every draw. Row
    /// actions resolve their target against these bindings.
    bound_ids: Vec<Option<String>>,
    handlers: Vec<SelectionHandler<T>>,
    pending: Vec<UiCommand>,
}

impl<T: Clone> DataTable<T> {
    pub fn new(id: impl Into<String>, columns: Vec<Column<T>>) -> Self {
        Self {
            id: id.into(),
            columns,
            buttons: Vec::new(),
            row_actions: Vec::new(),
            select_mode: SelectMode::Single,
            identifier: None,
            attached: false,
            visible: true,
            rows: Vec::new(),
            selected: Vec::new(),
            cursor: TableState::default(),
            bound_ids: Vec::new(),
            handlers: Vec::new(),
            pending: Vec::new(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    // Configuration, allowed before attach.

    pub fn set_select_mode(&mut self, mode: SelectMode) {
        self.select_mode = mode;
    }

    pub fn set_identifier(&mut self, identifier: IdentifierFn<T>) {
        self.identifier = Some(identifier);
    }

    pub fn has_identifier(&self) -> bool {
        self.identifier.is_some()
    }

    pub fn add_button(&mut self, button: Button<T>) {
        self.buttons.push(button);
    }

    pub fn add_row_action(&mut self, column: impl Into<String>, handler: RowHandler<T>) {
        self.row_actions.push(RowAction {
            column: column.into(),
            handler,
        });
    }

    pub fn buttons(&self) -> &[Button<T>] {
        &self.buttons
    }

    /// Attaches the widget. Idempotent: a second call changes nothing.
    pub fn attach(&mut self) {
        if self.attached {
            return;
        }
        self.attached = true;
        self.sync_bindings();
        self.sync_selected_buttons();
    }

    pub fn is_attached(&self) -> bool {
        self.attached
    }

    fn api_check(&self) -> Result<(), TableError> {
        if self.attached {
            Ok(())
        } else {
            Err(TableError::NotAttached {
                id: self.id.clone(),
            })
        }
    }

    // Data API, attach-gated.

    pub fn rows(&self) -> Result<&[T], TableError> {
        self.api_check()?;
        Ok(&self.rows)
    }

    pub fn selected_row(&self) -> Result<Option<&T>, TableError> {
        self.api_check()?;
        Ok(self.selected.first().and_then(|&i| self.rows.get(i)))
    }

    pub fn selected_rows(&self) -> Result<Vec<&T>, TableError> {
        self.api_check()?;
        Ok(self
            .selected
            .iter()
            .filter_map(|&i| self.rows.get(i))
            .collect())
    }

    pub fn has_selection(&self) -> Result<bool, TableError> {
        self.api_check()?;
        Ok(!self.selected.is_empty())
    }

    /// Replaces all rows. With an identifier configured, every new row
    /// whose identifier equals any previously selected row's identifier
    /// is selected again; without one the selection is dropped. Fires
    /// exactly one selection-changed dispatch when a selection existed
    /// before the update.
    pub fn update(&mut self, rows: Vec<T>, mode: RefreshMode) -> Result<(), TableError> {
        self.api_check()?;
        let previous: Vec<String> = match &self.identifier {
            Some(identifier) => self
                .selected
                .iter()
                .filter_map(|&i| self.rows.get(i))
                .filter_map(|row| identifier(row))
                .collect(),
            None => Vec::new(),
        };
        let had_selection = !self.selected.is_empty();

        self.rows = rows;
        self.selected = match &self.identifier {
            Some(identifier) if !previous.is_empty() => self
                .rows
                .iter()
                .enumerate()
                .filter(|(_, row)| {
                    identifier(row).is_some_and(|id| previous.contains(&id))
                })
                .map(|(i, _)| i)
                .collect(),
            _ => Vec::new(),
        };

        match mode {
            RefreshMode::Reset => *self.cursor.offset_mut() = 0,
            RefreshMode::Hold => {
                let max = self.rows.len().saturating_sub(1);
                let offset = self.cursor.offset().min(max);
                *self.cursor.offset_mut() = offset;
            }
        }
        self.cursor.select(self.selected.first().copied());
        self.sync_bindings();
        self.sync_selected_buttons();
        if had_selection {
            self.fire_selection_changed();
        }
        Ok(())
    }

    /// Drops all rows and the selection.
    pub fn clear(&mut self) -> Result<(), TableError> {
        self.api_check()?;
        let had_selection = !self.selected.is_empty();
        self.rows.clear();
        self.selected.clear();
        self.cursor.select(None);
        *self.cursor.offset_mut() = 0;
        self.sync_bindings();
        self.sync_selected_buttons();
        if had_selection {
            self.fire_selection_changed();
        }
        Ok(())
    }

    /// Selects the row in the current data whose identifier matches
    /// `row`'s. No-op without an identifier, when the identifier yields
    /// nothing, or when no row matches.
    pub fn select(&mut self, row: &T) -> Result<(), TableError> {
        self.api_check()?;
        let Some(identifier) = self.identifier.clone() else {
            debug!(table = %self.id, "select without an identifier is a no-op");
            return Ok(());
        };
        let Some(wanted) = identifier(row) else {
            return Ok(());
        };
        let Some(index) = self
            .rows
            .iter()
            .position(|r| identifier(r).as_deref() == Some(wanted.as_str()))
        else {
            debug!(table = %self.id, id = %wanted, "select target not present");
            return Ok(());
        };
        self.selected = vec![index];
        self.cursor.select(Some(index));
        self.sync_selected_buttons();
        self.fire_selection_changed();
        Ok(())
    }

    /// Empties the selection.
    pub fn clear_selection(&mut self) -> Result<(), TableError> {
        self.api_check()?;
        if !self.selected.is_empty() {
            self.selected.clear();
            self.cursor.select(None);
            self.sync_selected_buttons();
            self.fire_selection_changed();
        }
        Ok(())
    }

    /// Registers a selection-changed handler. Select and deselect funnel
    /// through the same handlers; each change dispatches exactly once.
    pub fn on_selection_change(&mut self, handler: SelectionHandler<T>) -> Result<(), TableError> {
        self.api_check()?;
        self.handlers.push(handler);
        Ok(())
    }

    /// Pushes the single selected row into the form, clears it otherwise.
    pub fn bind_form(&mut self, form: Rc<RefCell<dyn Form<T>>>) -> Result<(), TableError>
    where
        T: 'static,
    {
        self.bind_forms(vec![form])
    }

    /// Binds several forms through one handler, so a selection change
    /// updates all of them in a single dispatch.
    pub fn bind_forms(&mut self, forms: Vec<Rc<RefCell<dyn Form<T>>>>) -> Result<(), TableError>
    where
        T: 'static,
    {
        self.on_selection_change(Box::new(move |rows, _| {
            for form in &forms {
                let mut form = form.borrow_mut();
                match rows {
                    [row] => form.view(row),
                    _ => form.clear(),
                }
            }
        }))
    }

    /// Toggles a button. Unknown indices are logged and ignored.
    pub fn enable_button(&mut self, index: usize, enabled: bool) -> Result<(), TableError> {
        self.api_check()?;
        match self.buttons.get_mut(index) {
            Some(button) => button.enabled = enabled,
            None => warn!(table = %self.id, index, "no button at index"),
        }
        Ok(())
    }

    /// Invokes a button handler with the selected rows. Hidden and
    /// disabled buttons ignore the press.
    pub fn press_button(&mut self, index: usize) -> Result<(), TableError> {
        self.api_check()?;
        let selected: Vec<T> = self
            .selected
            .iter()
            .filter_map(|&i| self.rows.get(i).cloned())
            .collect();
        match self.buttons.get_mut(index) {
            Some(button) if button.visible && button.enabled => {
                (button.handler)(&selected, &mut self.pending);
            }
            Some(_) => debug!(table = %self.id, index, "press on disabled button ignored"),
            None => warn!(table = %self.id, index, "no button at index"),
        }
        Ok(())
    }

    /// Fires the row action registered for `column` with the row bound
    /// to `row_id` at the last draw. Stale identifiers are dropped.
    pub fn trigger_row_action(&mut self, column: &str, row_id: &str) -> Result<(), TableError> {
        self.api_check()?;
        let Some(index) = self
            .bound_ids
            .iter()
            .position(|id| id.as_deref() == Some(row_id))
        else {
            debug!(table = %self.id, row_id, "row action target no longer present");
            return Ok(());
        };
        let Some(row) = self.rows.get(index).cloned() else {
            return Ok(());
        };
        let Some(action) = self.row_actions.iter_mut().find(|a| a.column == column) else {
            warn!(table = %self.id, column, "no row action for column");
            return Ok(());
        };
        (action.handler)(&row, &mut self.pending);
        Ok(())
    }

    /// Recomputes visibility of constraint-tagged buttons.
    pub fn apply_security(&mut self, decision: &AuthorisationDecision<'_>) {
        ElementGuard::toggle(self.buttons.iter_mut(), decision);
    }

    // Plain widget-state toggles, no other side effects.

    pub fn show(&mut self) {
        self.visible = true;
    }

    pub fn hide(&mut self) {
        self.visible = false;
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn scroll_offset(&self) -> usize {
        self.cursor.offset()
    }

    // Keyboard navigation. No-ops before attach or on empty data.

    pub fn select_next(&mut self) {
        self.move_cursor_by(1);
    }

    pub fn select_prev(&mut self) {
        self.move_cursor_by(-1);
    }

    pub fn select_page_down(&mut self) {
        self.move_cursor_by(PAGE_JUMP as isize);
    }

    pub fn select_page_up(&mut self) {
        self.move_cursor_by(-(PAGE_JUMP as isize));
    }

    /// Toggles the cursor row in a multi selection.
    pub fn toggle_select(&mut self) {
        if !self.attached || self.select_mode != SelectMode::Multi {
            return;
        }
        let Some(index) = self.cursor.selected() else {
            return;
        };
        match self.selected.iter().position(|&i| i == index) {
            Some(at) => {
                self.selected.remove(at);
            }
            None => {
                self.selected.push(index);
                self.selected.sort_unstable();
            }
        }
        self.sync_selected_buttons();
        self.fire_selection_changed();
    }

    fn move_cursor_by(&mut self, delta: isize) {
        if !self.attached || self.rows.is_empty() {
            return;
        }
        let max = self.rows.len() - 1;
        let target = match self.cursor.selected() {
            Some(current) => current.saturating_add_signed(delta).min(max),
            None => 0,
        };
        self.cursor.select(Some(target));
        // In single mode the cursor is the selection.
        if self.select_mode == SelectMode::Single && self.selected != [target] {
            self.selected = vec![target];
            self.sync_selected_buttons();
            self.fire_selection_changed();
        }
    }

    /// Commands emitted by handlers since the last drain.
    pub fn drain_commands(&mut self) -> Vec<UiCommand> {
        std::mem::take(&mut self.pending)
    }

    fn fire_selection_changed(&mut self) {
        let selected: Vec<T> = self
            .selected
            .iter()
            .filter_map(|&i| self.rows.get(i).cloned())
            .collect();
        for handler in self.handlers.iter_mut() {
            handler(&selected, &mut self.pending);
        }
    }

    fn sync_selected_buttons(&mut self) {
        let has_selection = !self.selected.is_empty();
        for button in &mut self.buttons {
            if button.scope == Scope::Selected {
                button.enabled = has_selection;
            }
        }
    }

    fn sync_bindings(&mut self) {
        self.bound_ids = match &self.identifier {
            Some(identifier) => self.rows.iter().map(|row| identifier(row)).collect(),
            None => vec![None; self.rows.len()],
        };
    }

    pub fn render(&mut self, frame: &mut Frame, area: Rect, focused: bool) {
        use ratatui::layout::Constraint::{Length, Min};

        if !self.visible {
            return;
        }
        let border = if focused {
            Styles::focus_border()
        } else {
            Styles::border()
        };
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(border)
            .title(format!(" {} ", self.id));
        if !self.attached {
            frame.render_widget(block, area);
            return;
        }

        let inner = block.inner(area);
        frame.render_widget(block, area);
        let [bar_area, table_area] = Layout::vertical([Length(1), Min(1)]).areas(inner);

        frame.render_widget(Paragraph::new(self.button_bar()), bar_area);

        let header = Row::new(
            self.columns
                .iter()
                .map(|column| Cell::from(Span::styled(column.title().to_string(), Styles::table_header()))),
        );
        let rows = self.rows.iter().enumerate().map(|(i, row)| {
            let style = if self.selected.contains(&i) {
                Styles::marked()
            } else {
                Styles::default()
            };
            Row::new(self.columns.iter().map(|column| Cell::from(column.cell(row)))).style(style)
        });
        let widths: Vec<_> = self
            .columns
            .iter()
            .map(|column| {
                let mut width = column.title().len();
                for row in &self.rows {
                    width = width.max(column.cell(row).len());
                }
                Length(width.min(MAX_COLUMN_WIDTH) as u16)
            })
            .collect();
        let table = Table::new(rows, widths)
            .header(header)
            .column_spacing(2)
            .row_highlight_style(Styles::cursor());
        frame.render_stateful_widget(table, table_area, &mut self.cursor);

        // Redraw hook: bindings follow the rows in current view order.
        self.sync_bindings();
    }

    fn button_bar(&self) -> Line<'_> {
        let mut spans = Vec::new();
        for (i, button) in self.buttons.iter().enumerate() {
            if !button.visible {
                continue;
            }
            let style = if button.enabled {
                Styles::button()
            } else {
                Styles::button_disabled()
            };
            if !spans.is_empty() {
                spans.push(Span::raw("  "));
            }
            spans.push(Span::styled(format!("{} ", i + 1), Styles::help_key()));
            spans.push(Span::styled(button.title.clone(), style));
        }
        Line::from(spans)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::meta::address::AddressTemplate;
    use crate::meta::security::{AccessControlProvider, Environment, SecurityContext};
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[derive(Debug, Clone, PartialEq)]
    struct Item {
        id: &'static str,
        size: u32,
    }

    fn item(id: &'static str, size: u32) -> Item {
        Item { id, size }
    }

    fn columns() -> Vec<Column<Item>> {
        vec![
            Column::new("id", "Id", Rc::new(|item: &Item| item.id.to_string())),
            Column::new("size", "Size", Rc::new(|item: &Item| item.size.to_string())),
        ]
    }

    fn table() -> DataTable<Item> {
        let mut table = DataTable::new("items", columns());
        table.set_identifier(Rc::new(|item: &Item| Some(item.id.to_string())));
        table
    }

    fn counting_handler(count: Rc<RefCell<usize>>) -> SelectionHandler<Item> {
        Box::new(move |_, _| *count.borrow_mut() += 1)
    }

    #[test]
    fn api_fails_before_attach() {
        let mut table = table();
        let err = table.update(vec![item("a", 1)], RefreshMode::Reset).unwrap_err();
        assert_eq!(
            err,
            TableError::NotAttached {
                id: "items".to_string()
            }
        );
        assert!(table.rows().is_err());
        assert!(table.select(&item("a", 1)).is_err());
        assert!(table.clear().is_err());
        assert!(table.enable_button(0, true).is_err());
        assert!(table.press_button(0).is_err());
        assert!(table.has_selection().is_err());
    }

    #[test]
    fn navigation_is_a_noop_before_attach() {
        let mut table = table();
        table.select_next();
        table.select_prev();
        assert!(!table.is_attached());
    }

    #[test]
    fn attach_is_idempotent() {
        let mut table = table();
        table.attach();
        table
            .update(vec![item("a", 1), item("b", 2)], RefreshMode::Reset)
            .unwrap();
        table.select_next();
        table.attach();
        assert_eq!(table.rows().unwrap().len(), 2);
        assert_eq!(table.selected_row().unwrap().unwrap().id, "a");
    }

    #[test]
    fn update_restores_selection_by_identifier() {
        let mut table = table();
        table.attach();
        table
            .update(vec![item("a", 1), item("b", 2), item("c", 3)], RefreshMode::Reset)
            .unwrap();
        table.select(&item("b", 0)).unwrap();

        // Reordered and mutated data, same identifier.
        table
            .update(vec![item("c", 3), item("b", 9), item("a", 1)], RefreshMode::Reset)
            .unwrap();
        let selected = table.selected_row().unwrap().unwrap();
        assert_eq!(selected.id, "b");
        assert_eq!(selected.size, 9);
    }

    #[test]
    fn update_drops_selection_when_row_disappears() {
        let count = Rc::new(RefCell::new(0));
        let mut table = table();
        table.attach();
        table.on_selection_change(counting_handler(count.clone())).unwrap();
        table
            .update(vec![item("a", 1), item("b", 2)], RefreshMode::Reset)
            .unwrap();
        table.select(&item("b", 0)).unwrap();
        assert_eq!(*count.borrow(), 1);

        table.update(vec![item("a", 1)], RefreshMode::Reset).unwrap();
        assert!(!table.has_selection().unwrap());
        // The drop is a selection change: one more dispatch, empty rows.
        assert_eq!(*count.borrow(), 2);
    }

    #[test]
    fn update_without_identifier_drops_selection() {
        let mut table = DataTable::new("plain", columns());
        table.attach();
        table
            .update(vec![item("a", 1), item("b", 2)], RefreshMode::Reset)
            .unwrap();
        table.select_next();
        assert!(table.has_selection().unwrap());

        table
            .update(vec![item("a", 1), item("b", 2)], RefreshMode::Reset)
            .unwrap();
        assert!(!table.has_selection().unwrap());
    }

    #[test]
    fn update_restores_multi_selection() {
        let mut table = table();
        table.set_select_mode(SelectMode::Multi);
        table.attach();
        table
            .update(vec![item("a", 1), item("b", 2), item("c", 3)], RefreshMode::Reset)
            .unwrap();
        table.select_next();
        table.toggle_select();
        table.select_next();
        table.toggle_select();
        assert_eq!(table.selected_rows().unwrap().len(), 2);

        table
            .update(vec![item("b", 2), item("x", 0), item("a", 1)], RefreshMode::Reset)
            .unwrap();
        let ids: Vec<&str> = table.selected_rows().unwrap().iter().map(|i| i.id).collect();
        assert_eq!(ids, ["b", "a"]);
    }

    #[test]
    fn select_without_identifier_is_a_noop() {
        let count = Rc::new(RefCell::new(0));
        let mut table = DataTable::new("plain", columns());
        table.attach();
        table.on_selection_change(counting_handler(count.clone())).unwrap();
        table
            .update(vec![item("a", 1)], RefreshMode::Reset)
            .unwrap();
        table.select(&item("a", 1)).unwrap();
        assert!(!table.has_selection().unwrap());
        assert_eq!(*count.borrow(), 0);
    }

    #[test]
    fn select_missing_row_is_a_noop() {
        let count = Rc::new(RefCell::new(0));
        let mut table = table();
        table.attach();
        table.on_selection_change(counting_handler(count.clone())).unwrap();
        table
            .update(vec![item("a", 1)], RefreshMode::Reset)
            .unwrap();
        table.select(&item("zz", 0)).unwrap();
        assert!(!table.has_selection().unwrap());
        assert_eq!(*count.borrow(), 0);
    }

    #[test]
    fn every_selection_change_dispatches_exactly_once() {
        let count = Rc::new(RefCell::new(0));
        let mut table = table();
        table.attach();
        table.on_selection_change(counting_handler(count.clone())).unwrap();
        table
            .update(vec![item("a", 1), item("b", 2)], RefreshMode::Reset)
            .unwrap();
        assert_eq!(*count.borrow(), 0);

        table.select_next(); // none -> a
        table.select_next(); // a -> b
        table.select_next(); // clamped at b, no change
        assert_eq!(*count.borrow(), 2);

        table
            .update(vec![item("b", 2), item("a", 1)], RefreshMode::Reset)
            .unwrap(); // restore fires once
        assert_eq!(*count.borrow(), 3);

        table.clear_selection().unwrap();
        table.clear_selection().unwrap(); // already empty, no dispatch
        assert_eq!(*count.borrow(), 4);
    }

    struct Probe {
        viewed: Vec<String>,
        cleared: usize,
    }

    impl Form<Item> for Probe {
        fn view(&mut self, item: &Item) {
            self.viewed.push(item.id.to_string());
        }

        fn clear(&mut self) {
            self.cleared += 1;
        }
    }

    #[test]
    fn bound_forms_follow_the_selection() {
        let probe = Rc::new(RefCell::new(Probe {
            viewed: Vec::new(),
            cleared: 0,
        }));
        let second = Rc::new(RefCell::new(Probe {
            viewed: Vec::new(),
            cleared: 0,
        }));
        let mut table = table();
        table.attach();
        table
            .bind_forms(vec![probe.clone(), second.clone()])
            .unwrap();
        table
            .update(vec![item("a", 1), item("b", 2)], RefreshMode::Reset)
            .unwrap();

        table.select(&item("a", 0)).unwrap();
        table.clear_selection().unwrap();
        assert_eq!(probe.borrow().viewed, ["a"]);
        assert_eq!(probe.borrow().cleared, 1);
        assert_eq!(second.borrow().viewed, ["a"]);
        assert_eq!(second.borrow().cleared, 1);
    }

    #[test]
    fn multi_selection_clears_bound_form() {
        let probe = Rc::new(RefCell::new(Probe {
            viewed: Vec::new(),
            cleared: 0,
        }));
        let mut table = table();
        table.set_select_mode(SelectMode::Multi);
        table.attach();
        table.bind_form(probe.clone()).unwrap();
        table
            .update(vec![item("a", 1), item("b", 2)], RefreshMode::Reset)
            .unwrap();
        table.select_next();
        table.toggle_select(); // one row -> view
        table.select_next();
        table.toggle_select(); // two rows -> clear
        assert_eq!(probe.borrow().viewed, ["a"]);
        assert_eq!(probe.borrow().cleared, 1);
    }

    #[test]
    fn selected_scope_buttons_track_the_selection() {
        let mut table = table();
        table.add_button(Button::new("Init", Scope::Selected, Box::new(|_, _| {})));
        table.add_button(Button::new("Add", Scope::Global, Box::new(|_, _| {})));
        table.attach();
        table
            .update(vec![item("a", 1)], RefreshMode::Reset)
            .unwrap();
        assert!(!table.buttons()[0].is_enabled());
        assert!(table.buttons()[1].is_enabled());

        table.select_next();
        assert!(table.buttons()[0].is_enabled());

        table.clear_selection().unwrap();
        assert!(!table.buttons()[0].is_enabled());
    }

    #[test]
    fn press_button_passes_selected_rows_and_emits_commands() {
        let mut table = table();
        table.add_button(Button::new(
            "Report",
            Scope::Selected,
            Box::new(|rows, sink| {
                sink.push(UiCommand::Status(format!("{} selected", rows.len())));
            }),
        ));
        table.attach();
        table
            .update(vec![item("a", 1), item("b", 2)], RefreshMode::Reset)
            .unwrap();

        // Disabled: no selection yet.
        table.press_button(0).unwrap();
        assert!(table.drain_commands().is_empty());

        table.select_next();
        table.press_button(0).unwrap();
        assert_eq!(
            table.drain_commands(),
            vec![UiCommand::Status("1 selected".to_string())]
        );
        assert!(table.drain_commands().is_empty());

        // Out of range: logged, not an error.
        table.press_button(9).unwrap();
    }

    #[test]
    fn enable_button_toggles_global_buttons() {
        let called = Rc::new(RefCell::new(0));
        let calls = called.clone();
        let mut table = table();
        table.add_button(Button::new(
            "Add",
            Scope::Global,
            Box::new(move |_, _| *calls.borrow_mut() += 1),
        ));
        table.attach();
        table.enable_button(0, false).unwrap();
        table.press_button(0).unwrap();
        assert_eq!(*called.borrow(), 0);

        table.enable_button(0, true).unwrap();
        table.press_button(0).unwrap();
        assert_eq!(*called.borrow(), 1);
    }

    #[test]
    fn unauthorized_buttons_are_hidden_and_ignore_presses() {
        let called = Rc::new(RefCell::new(0));
        let calls = called.clone();
        let template = AddressTemplate::parse("/subsystem=tls/trust-manager=*").unwrap();
        let mut table = table();
        table.add_button(Button::constrained(
            "Remove",
            Scope::Global,
            Constraint::executable(template.clone(), "remove"),
            Box::new(move |_, _| *calls.borrow_mut() += 1),
        ));
        table.add_button(Button::new("Plain", Scope::Global, Box::new(|_, _| {})));
        table.attach();

        let environment = Environment::new("test", "1.0.0", AccessControlProvider::Rbac);
        let context = SecurityContext::read_only();
        let decision = AuthorisationDecision::from(&environment, &context);
        table.apply_security(&decision);

        assert!(!table.buttons()[0].is_visible());
        assert!(table.buttons()[1].is_visible());
        table.press_button(0).unwrap();
        assert_eq!(*called.borrow(), 0);

        // Permissive provider restores the button.
        let simple = Environment::new("test", "1.0.0", AccessControlProvider::Simple);
        table.apply_security(&AuthorisationDecision::from(&simple, &context));
        assert!(table.buttons()[0].is_visible());
    }

    #[test]
    fn row_action_resolves_rows_by_bound_identifier() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = seen.clone();
        let mut table = table();
        table.add_row_action(
            "id",
            Box::new(move |row: &Item, _| sink.borrow_mut().push(row.id.to_string())),
        );
        table.attach();
        table
            .update(vec![item("a", 1), item("b", 2)], RefreshMode::Reset)
            .unwrap();

        table.trigger_row_action("id", "b").unwrap();
        assert_eq!(*seen.borrow(), ["b"]);

        // Row gone after the next update: stale id is dropped.
        table.update(vec![item("a", 1)], RefreshMode::Reset).unwrap();
        table.trigger_row_action("id", "b").unwrap();
        assert_eq!(*seen.borrow(), ["b"]);

        // Unknown column is logged, not an error.
        table.trigger_row_action("nope", "a").unwrap();
        assert_eq!(*seen.borrow(), ["b"]);
    }

    #[test]
    fn refresh_mode_controls_the_scroll_offset() {
        let rows: Vec<Item> = (0..30).map(|i| {
            let id: &'static str = Box::leak(format!("row-{i}").into_boxed_str());
            item(id, i)
        }).collect();
        let mut table = table();
        table.attach();
        table.update(rows.clone(), RefreshMode::Reset).unwrap();

        let backend = TestBackend::new(40, 10);
        let mut terminal = Terminal::new(backend).unwrap();
        for _ in 0..20 {
            table.select_next();
        }
        terminal
            .draw(|frame| {
                let area = frame.area();
                table.render(frame, area, true);
            })
            .unwrap();
        let scrolled = table.scroll_offset();
        assert!(scrolled > 0);

        table.update(rows.clone(), RefreshMode::Hold).unwrap();
        assert_eq!(table.scroll_offset(), scrolled);

        table.update(rows, RefreshMode::Reset).unwrap();
        assert_eq!(table.scroll_offset(), 0);
    }

    #[test]
    fn hidden_table_renders_nothing() {
        let mut table = table();
        table.attach();
        table.update(vec![item("a", 1)], RefreshMode::Reset).unwrap();
        table.hide();
        assert!(!table.is_visible());

        let backend = TestBackend::new(30, 6);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal
            .draw(|frame| {
                let area = frame.area();
                table.render(frame, area, false);
            })
            .unwrap();
        let empty: String = terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect();
        assert!(empty.trim().is_empty());

        table.show();
        terminal
            .draw(|frame| {
                let area = frame.area();
                table.render(frame, area, false);
            })
            .unwrap();
        let drawn: String = terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect();
        assert!(drawn.contains("Id"));
        assert!(drawn.contains("Size"));
    }
}
