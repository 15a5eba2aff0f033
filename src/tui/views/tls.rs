//! TLS view: key managers, security domains and trust managers.
//!
//! A vertical navigation on the left switches between three resource
//! sections; each section pairs a table with a read-only detail form
//! bound to its selection.

use std::cell::RefCell;
use std::rc::Rc;

use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};

use crate::mbui::form::{Form, ModelNodeForm, ModelNodeFormBuilder};
use crate::mbui::table::{ModelNodeTable, TableBuilder};
use crate::meta::address::AddressTemplate;
use crate::meta::registry::MetadataRegistry;
use crate::meta::security::Environment;
use crate::mgmt::addresses;
use crate::mgmt::client::ManagementClient;
use crate::model::NamedNode;
use crate::tui::command::UiCommand;
use crate::tui::form::render_form;
use crate::tui::input::KeyAction;
use crate::tui::nav::VerticalNavigation;
use crate::tui::table::RefreshMode;

use super::ViewError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Focus {
    Nav,
    Content,
}

/// A table plus the detail form bound to its selection.
struct ResourceSection {
    title: &'static str,
    template: AddressTemplate,
    table: ModelNodeTable<NamedNode>,
    form: Rc<RefCell<ModelNodeForm<NamedNode>>>,
    /// Column with a row action, triggered by confirm on the selected row.
    action_column: Option<&'static str>,
}

pub struct TlsView {
    nav: VerticalNavigation,
    sections: Vec<ResourceSection>,
    focus: Focus,
}

impl TlsView {
    pub fn new(registry: &MetadataRegistry, environment: &Environment) -> Result<Self, ViewError> {
        let nav = VerticalNavigation::new()
            .add_primary("key-manager", "Key Managers")
            .add_primary("security-domain", "Security Domains")
            .add_primary("trust-manager", "Trust Managers");

        let key_managers = section(
            registry,
            environment,
            "key-manager",
            "Key Manager",
            addresses::KEY_MANAGER,
            None,
            |builder| {
                builder
                    .column("algorithm")
                    .column("key-store")
                    .operation_button("Init", "init")
            },
        )?;
        let security_domains = section(
            registry,
            environment,
            "security-domain",
            "Security Domain",
            addresses::SECURITY_DOMAIN,
            None,
            |builder| {
                builder
                    .column("default-realm")
                    .column("permission-mapper")
                    .operation_button("Read Identity", "read-identity")
            },
        )?;
        let trust_managers = section(
            registry,
            environment,
            "trust-manager",
            "Trust Manager",
            addresses::TRUST_MANAGER,
            Some("certificate-revocation-list"),
            |builder| {
                builder
                    .column("algorithm")
                    .column("certificate-revocation-list")
                    .add_button()
                    .remove_button()
                    .row_operation(
                        "certificate-revocation-list",
                        "reload-certificate-revocation-list",
                    )
            },
        )?;

        Ok(Self {
            nav,
            sections: vec![key_managers, security_domains, trust_managers],
            focus: Focus::Nav,
        })
    }

    /// Attaches all tables and binds their detail forms.
    pub fn attach(&mut self) -> Result<(), ViewError> {
        for section in &mut self.sections {
            section.table.attach();
            let form: Rc<RefCell<dyn Form<NamedNode>>> = section.form.clone();
            section.table.bind_form(form)?;
        }
        Ok(())
    }

    /// Re-reads every section from the endpoint. Selections survive via
    /// the resource name.
    pub fn refresh(&mut self, client: &dyn ManagementClient) -> Result<(), ViewError> {
        for section in &mut self.sections {
            let children = client.read_children(&section.template)?;
            section.form.borrow_mut().clear();
            section.table.update(children, RefreshMode::Hold)?;
        }
        Ok(())
    }

    pub fn handle_key(
        &mut self,
        action: KeyAction,
        sink: &mut Vec<UiCommand>,
    ) -> Result<(), ViewError> {
        match action {
            KeyAction::NextPane => {
                self.focus = match self.focus {
                    Focus::Nav => Focus::Content,
                    Focus::Content => Focus::Nav,
                };
            }
            KeyAction::Up => match self.focus {
                Focus::Nav => self.nav.select_prev(),
                Focus::Content => self.active_section().table.select_prev(),
            },
            KeyAction::Down => match self.focus {
                Focus::Nav => self.nav.select_next(),
                Focus::Content => self.active_section().table.select_next(),
            },
            KeyAction::PageUp => {
                if self.focus == Focus::Content {
                    self.active_section().table.select_page_up();
                }
            }
            KeyAction::PageDown => {
                if self.focus == Focus::Content {
                    self.active_section().table.select_page_down();
                }
            }
            KeyAction::ToggleSelect => {
                if self.focus == Focus::Content {
                    self.active_section().table.toggle_select();
                }
            }
            KeyAction::Button(index) => {
                self.active_section().table.press_button(index)?;
            }
            KeyAction::Confirm => {
                if self.focus == Focus::Content {
                    let section = self.active_section();
                    if let Some(column) = section.action_column {
                        let target = section
                            .table
                            .selected_row()?
                            .map(|row| row.name().to_string());
                        if let Some(id) = target {
                            section.table.trigger_row_action(column, &id)?;
                        }
                    }
                }
            }
            KeyAction::Refresh => sink.push(UiCommand::RefreshView),
            _ => {}
        }
        for section in &mut self.sections {
            sink.extend(section.table.drain_commands());
        }
        Ok(())
    }

    /// Commands emitted outside key handling, e.g. by a selection restored
    /// during refresh.
    pub fn drain_commands(&mut self) -> Vec<UiCommand> {
        let mut commands = Vec::new();
        for section in &mut self.sections {
            commands.extend(section.table.drain_commands());
        }
        commands
    }

    pub fn render(&mut self, frame: &mut Frame, area: Rect) {
        let [nav_area, content_area] =
            Layout::horizontal([Constraint::Length(24), Constraint::Min(40)]).areas(area);
        self.nav.render(frame, nav_area, self.focus == Focus::Nav);

        let [table_area, form_area] =
            Layout::horizontal([Constraint::Percentage(58), Constraint::Percentage(42)])
                .areas(content_area);
        let focused = self.focus == Focus::Content;
        let index = self.nav.selected_index();
        if let Some(section) = self.sections.get_mut(index) {
            section.table.render(frame, table_area, focused);
            render_form(frame, form_area, &section.form.borrow(), section.title);
        }
    }

    fn active_section(&mut self) -> &mut ResourceSection {
        let index = self.nav.selected_index();
        &mut self.sections[index]
    }
}

fn section(
    registry: &MetadataRegistry,
    environment: &Environment,
    id: &str,
    title: &'static str,
    address: &str,
    action_column: Option<&'static str>,
    configure: impl FnOnce(TableBuilder<NamedNode>) -> TableBuilder<NamedNode>,
) -> Result<ResourceSection, ViewError> {
    let template = AddressTemplate::parse(address)?;
    let metadata = registry.lookup(&template)?.clone();
    let builder =
        TableBuilder::new(id, metadata.clone(), environment.clone()).name_column();
    let table = configure(builder).build()?;
    let form = ModelNodeFormBuilder::new(id, metadata)
        .include_runtime()
        .build()?;
    Ok(ResourceSection {
        title,
        template,
        table,
        form: Rc::new(RefCell::new(form)),
        action_column,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::meta::registry::{Metadata, MetadataRegistry};
    use crate::meta::security::AccessControlProvider;
    use crate::mgmt::demo::DemoServer;
    use crate::tui::dialog::DialogKind;

    fn registry(client: &DemoServer) -> MetadataRegistry {
        let mut registry = MetadataRegistry::new();
        for address in [
            addresses::KEY_MANAGER,
            addresses::SECURITY_DOMAIN,
            addresses::TRUST_MANAGER,
        ] {
            let template = AddressTemplate::parse(address).unwrap();
            let description = client.read_description(&template).unwrap();
            let context = client.read_security_context(&template).unwrap();
            registry.add(Metadata::new(template, description, context));
        }
        registry
    }

    fn view(client: &DemoServer) -> TlsView {
        let environment = Environment::new("test", "1.0.0", AccessControlProvider::Simple);
        let mut view = TlsView::new(&registry(client), &environment).unwrap();
        view.attach().unwrap();
        view
    }

    #[test]
    fn refresh_loads_all_sections() {
        let client = DemoServer::new();
        let mut view = view(&client);
        view.refresh(&client).unwrap();
        for section in &view.sections {
            assert!(!section.table.rows().unwrap().is_empty());
        }
    }

    #[test]
    fn selection_feeds_the_detail_form() {
        let client = DemoServer::new();
        let mut view = view(&client);
        view.refresh(&client).unwrap();

        let mut sink = Vec::new();
        view.handle_key(KeyAction::NextPane, &mut sink).unwrap();
        view.handle_key(KeyAction::Down, &mut sink).unwrap();
        assert!(!view.sections[0].form.borrow().is_empty());
        assert!(sink.is_empty());
    }

    #[test]
    fn init_button_emits_an_execute_command() {
        let client = DemoServer::new();
        let mut view = view(&client);
        view.refresh(&client).unwrap();

        let mut sink = Vec::new();
        view.handle_key(KeyAction::NextPane, &mut sink).unwrap();
        view.handle_key(KeyAction::Down, &mut sink).unwrap();
        view.handle_key(KeyAction::Button(0), &mut sink).unwrap();

        match sink.as_slice() {
            [UiCommand::Execute { address, operation }] => {
                assert!(address.to_string().starts_with("/subsystem=tls/key-manager="));
                assert_eq!(operation, "init");
            }
            other => panic!("unexpected commands: {other:?}"),
        }
    }

    #[test]
    fn trust_manager_add_opens_a_prompt() {
        let client = DemoServer::new();
        let mut view = view(&client);
        view.refresh(&client).unwrap();

        // Move the navigation to the trust manager section.
        let mut sink = Vec::new();
        view.handle_key(KeyAction::Up, &mut sink).unwrap();
        assert_eq!(view.nav.selected_id(), Some("trust-manager"));

        view.handle_key(KeyAction::Button(0), &mut sink).unwrap();
        match sink.as_slice() {
            [UiCommand::OpenDialog(dialog)] => {
                assert_eq!(dialog.kind(), DialogKind::Prompt);
            }
            other => panic!("unexpected commands: {other:?}"),
        }
    }

    #[test]
    fn confirm_triggers_the_crl_reload_row_action() {
        let client = DemoServer::new();
        let mut view = view(&client);
        view.refresh(&client).unwrap();

        let mut sink = Vec::new();
        view.handle_key(KeyAction::Up, &mut sink).unwrap();
        view.handle_key(KeyAction::NextPane, &mut sink).unwrap();
        view.handle_key(KeyAction::Down, &mut sink).unwrap();
        view.handle_key(KeyAction::Confirm, &mut sink).unwrap();

        let executes: Vec<_> = sink
            .iter()
            .filter(|command| {
                matches!(
                    command,
                    UiCommand::Execute { operation, .. }
                        if operation == "reload-certificate-revocation-list"
                )
            })
            .collect();
        assert_eq!(executes.len(), 1);
    }
}
