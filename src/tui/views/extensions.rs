//! Extensions view: installed console extensions with a live preview.

use std::cell::RefCell;
use std::rc::Rc;

use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};

use crate::mbui::table::{ModelNodeTable, TableBuilder};
use crate::meta::address::AddressTemplate;
use crate::meta::registry::MetadataRegistry;
use crate::meta::security::Environment;
use crate::mgmt::addresses;
use crate::mgmt::client::ManagementClient;
use crate::mgmt::verify::VerifyResult;
use crate::model::NamedNode;
use crate::tui::command::UiCommand;
use crate::tui::input::KeyAction;
use crate::tui::preview::ExtensionPreview;
use crate::tui::table::RefreshMode;

use super::ViewError;

pub struct ExtensionsView {
    template: AddressTemplate,
    table: ModelNodeTable<NamedNode>,
    preview: Rc<RefCell<ExtensionPreview>>,
}

impl ExtensionsView {
    pub fn new(registry: &MetadataRegistry, environment: &Environment) -> Result<Self, ViewError> {
        let template = AddressTemplate::parse(addresses::EXTENSION)?;
        let metadata = registry.lookup(&template)?.clone();
        let table = TableBuilder::new("extensions", metadata, environment.clone())
            .name_column()
            .column("version")
            .column("extension-point")
            .remove_button()
            .build()?;
        Ok(Self {
            template,
            table,
            preview: Rc::new(RefCell::new(ExtensionPreview::new())),
        })
    }

    /// Attaches the table and funnels its selection into the preview.
    pub fn attach(&mut self) -> Result<(), ViewError> {
        self.table.attach();
        let preview = self.preview.clone();
        self.table.on_selection_change(Box::new(move |rows, sink| {
            let mut preview = preview.borrow_mut();
            match rows {
                [extension] => preview.update(extension, sink),
                _ => preview.clear(),
            }
        }))?;
        Ok(())
    }

    pub fn refresh(&mut self, client: &dyn ManagementClient) -> Result<(), ViewError> {
        let children = client.read_children(&self.template)?;
        self.table.update(children, RefreshMode::Hold)?;
        Ok(())
    }

    /// Hands a finished script verification to the preview.
    pub fn on_verified(&mut self, result: VerifyResult) {
        self.preview.borrow_mut().on_verified(result);
    }

    /// Commands emitted outside key handling, e.g. by a selection restored
    /// during refresh.
    pub fn drain_commands(&mut self) -> Vec<UiCommand> {
        self.table.drain_commands()
    }

    pub fn handle_key(
        &mut self,
        action: KeyAction,
        sink: &mut Vec<UiCommand>,
    ) -> Result<(), ViewError> {
        match action {
            KeyAction::Up => self.table.select_prev(),
            KeyAction::Down => self.table.select_next(),
            KeyAction::PageUp => self.table.select_page_up(),
            KeyAction::PageDown => self.table.select_page_down(),
            KeyAction::Button(index) => self.table.press_button(index)?,
            KeyAction::Refresh => sink.push(UiCommand::RefreshView),
            _ => {}
        }
        sink.extend(self.table.drain_commands());
        Ok(())
    }

    pub fn render(&mut self, frame: &mut Frame, area: Rect) {
        let [table_area, preview_area] =
            Layout::horizontal([Constraint::Percentage(55), Constraint::Percentage(45)])
                .areas(area);
        self.table.render(frame, table_area, true);
        self.preview.borrow().render(frame, preview_area);
    }
}
