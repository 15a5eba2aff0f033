//! Main TUI application.

use std::collections::VecDeque;
use std::io;
use std::sync::mpsc::Sender;
use std::time::Duration;

use crossterm::event::{DisableMouseCapture, EnableMouseCapture, KeyEvent};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use thiserror::Error;
use tracing::{error, info};

use crate::meta::address::{AddressError, AddressTemplate};
use crate::meta::registry::{Metadata, MetadataRegistry};
use crate::meta::security::Environment;
use crate::mgmt::addresses;
use crate::mgmt::client::{ClientError, ManagementClient};
use crate::mgmt::verify::ScriptVerifier;

use super::command::UiCommand;
use super::dialog::DialogOutcome;
use super::event::{Event, EventHandler};
use super::input::{KeyAction, handle_key};
use super::render::render;
use super::state::{AppState, PopupState, View};
use super::views::ViewError;
use super::views::extensions::ExtensionsView;
use super::views::tls::TlsView;

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Address(#[from] AddressError),
    #[error(transparent)]
    Client(#[from] ClientError),
    #[error(transparent)]
    View(#[from] ViewError),
}

/// Reads the metadata of every resource type the console works with.
pub fn bootstrap_registry(client: &dyn ManagementClient) -> Result<MetadataRegistry, AppError> {
    let mut registry = MetadataRegistry::new();
    for address in [
        addresses::KEY_MANAGER,
        addresses::SECURITY_DOMAIN,
        addresses::TRUST_MANAGER,
        addresses::EXTENSION,
    ] {
        let template = AddressTemplate::parse(address)?;
        let description = client.read_description(&template)?;
        let context = client.read_security_context(&template)?;
        registry.add(Metadata::new(template, description, context));
    }
    info!(resources = registry.len(), "metadata registry bootstrapped");
    Ok(registry)
}

/// Main TUI application.
pub struct App {
    client: Box<dyn ManagementClient>,
    verifier: ScriptVerifier,
    environment: Environment,
    state: AppState,
    should_quit: bool,
}

impl App {
    /// Builds the registry from the endpoint, constructs the views,
    /// attaches them and loads the initial data.
    pub fn new(
        client: Box<dyn ManagementClient>,
        verifier: ScriptVerifier,
        environment: Environment,
    ) -> Result<Self, AppError> {
        let registry = bootstrap_registry(client.as_ref())?;
        let mut tls = TlsView::new(&registry, &environment)?;
        let mut extensions = ExtensionsView::new(&registry, &environment)?;
        tls.attach()?;
        extensions.attach()?;
        tls.refresh(client.as_ref())?;
        extensions.refresh(client.as_ref())?;
        Ok(Self {
            client,
            verifier,
            environment,
            state: AppState::new(tls, extensions),
            should_quit: false,
        })
    }

    /// Runs the TUI application.
    pub fn run(mut self, tick_rate: Duration) -> Result<(), AppError> {
        // Setup terminal
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;

        let events = EventHandler::new(tick_rate);

        // Main loop
        loop {
            terminal.draw(|frame| render(frame, &mut self.state, &self.environment))?;

            match events.next() {
                Ok(Event::Tick) => self.state.tick(),
                Ok(Event::Key(key)) => {
                    let mut sink = Vec::new();
                    self.handle_key(key, &mut sink);
                    self.process_commands(sink, &events.sender());
                }
                Ok(Event::Resize(_, _)) => {}
                Ok(Event::ScriptVerified(result)) => {
                    self.state.extensions.on_verified(result);
                }
                Err(_) => self.should_quit = true,
            }

            if self.should_quit {
                break;
            }
        }

        // Restore terminal
        disable_raw_mode()?;
        execute!(
            terminal.backend_mut(),
            LeaveAlternateScreen,
            DisableMouseCapture
        )?;
        terminal.show_cursor()?;

        Ok(())
    }

    fn handle_key(&mut self, key: KeyEvent, sink: &mut Vec<UiCommand>) {
        // An open dialog owns the keyboard.
        if let PopupState::Dialog(dialog) = &mut self.state.popup {
            match dialog.handle_key(key) {
                DialogOutcome::Open => {}
                DialogOutcome::Cancelled => self.state.popup = PopupState::None,
                DialogOutcome::Confirmed { command, input } => {
                    self.state.popup = PopupState::None;
                    self.confirm(command, input, sink);
                }
            }
            return;
        }

        let action = handle_key(key);
        if matches!(self.state.popup, PopupState::Help) {
            if matches!(action, KeyAction::Help | KeyAction::Escape | KeyAction::Quit) {
                self.state.popup = PopupState::None;
            }
            return;
        }

        match action {
            KeyAction::Quit => self.should_quit = true,
            KeyAction::Help => self.state.popup = PopupState::Help,
            KeyAction::NextView => self.state.view = self.state.view.next(),
            KeyAction::PrevView => self.state.view = self.state.view.prev(),
            KeyAction::Escape | KeyAction::None => {}
            other => {
                let routed = match self.state.view {
                    View::Tls => self.state.tls.handle_key(other, sink),
                    View::Extensions => self.state.extensions.handle_key(other, sink),
                };
                if let Err(err) = routed {
                    error!(%err, "key handling failed");
                    self.state.set_status(err.to_string(), true);
                }
            }
        }
    }

    /// Resolves a confirmed dialog into commands. Prompt input lands in
    /// the armed command.
    fn confirm(
        &mut self,
        command: Option<UiCommand>,
        input: Option<String>,
        sink: &mut Vec<UiCommand>,
    ) {
        match command {
            Some(UiCommand::AddResource { template, .. }) => {
                let name = input.unwrap_or_default();
                let name = name.trim();
                if name.is_empty() {
                    self.state.set_status("a resource name is required", true);
                } else {
                    sink.push(UiCommand::AddResource {
                        template,
                        name: name.to_string(),
                    });
                }
            }
            Some(command) => sink.push(command),
            None => {}
        }
    }

    fn process_commands(&mut self, commands: Vec<UiCommand>, events: &Sender<Event>) {
        let mut queue: VecDeque<UiCommand> = commands.into();
        while let Some(command) = queue.pop_front() {
            match command {
                UiCommand::OpenDialog(dialog) => {
                    self.state.popup = PopupState::Dialog(*dialog);
                }
                UiCommand::CloseDialog => self.state.popup = PopupState::None,
                UiCommand::Execute { address, operation } => {
                    match self.client.execute(&address, &operation) {
                        Ok(_) => {
                            self.state
                                .set_status(format!("{operation} on {address} done"), false);
                            queue.push_back(UiCommand::RefreshView);
                        }
                        Err(err) => {
                            error!(%err, %address, operation, "operation failed");
                            self.state.set_status(err.to_string(), true);
                        }
                    }
                }
                UiCommand::AddResource { template, name } => {
                    match template.resolve(&[&name]) {
                        Ok(address) => match self.client.execute(&address, "add") {
                            Ok(_) => {
                                self.state.set_status(format!("added {address}"), false);
                                queue.push_back(UiCommand::RefreshView);
                            }
                            Err(err) => {
                                error!(%err, %address, "add failed");
                                self.state.set_status(err.to_string(), true);
                            }
                        },
                        Err(err) => self.state.set_status(err.to_string(), true),
                    }
                }
                UiCommand::RefreshView => {
                    if let Err(err) = self.refresh_active_view() {
                        error!(%err, "refresh failed");
                        self.state.set_status(err.to_string(), true);
                    }
                    queue.extend(self.drain_views());
                }
                UiCommand::VerifyScript { token, script } => {
                    let tx = events.clone();
                    self.verifier.verify(token, script, move |result| {
                        let _ = tx.send(Event::ScriptVerified(result));
                    });
                }
                UiCommand::Status(text) => self.state.set_status(text, false),
                UiCommand::Quit => self.should_quit = true,
            }
        }
    }

    fn refresh_active_view(&mut self) -> Result<(), ViewError> {
        match self.state.view {
            View::Tls => self.state.tls.refresh(self.client.as_ref()),
            View::Extensions => self.state.extensions.refresh(self.client.as_ref()),
        }
    }

    fn drain_views(&mut self) -> Vec<UiCommand> {
        let mut commands = self.state.tls.drain_commands();
        commands.extend(self.state.extensions.drain_commands());
        commands
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::mpsc;

    use super::*;
    use crate::meta::security::AccessControlProvider;
    use crate::mgmt::demo::DemoServer;
    use crate::mgmt::verify::DemoScriptCheck;
    use crate::tui::dialog::DialogFactory;

    fn app() -> App {
        let environment = Environment::new("demo", "1.0.0", AccessControlProvider::Simple);
        let verifier = ScriptVerifier::new(Arc::new(DemoScriptCheck));
        App::new(Box::new(DemoServer::new()), verifier, environment).unwrap()
    }

    #[test]
    fn bootstrap_loads_all_resource_types() {
        let client = DemoServer::new();
        let registry = bootstrap_registry(&client).unwrap();
        assert_eq!(registry.len(), 4);
    }

    #[test]
    fn new_attaches_and_loads_the_views() {
        let app = app();
        assert_eq!(app.state.view, View::Tls);
    }

    #[test]
    fn execute_refreshes_the_active_view() {
        let mut app = app();
        let (tx, _rx) = mpsc::channel();
        let template = AddressTemplate::parse(addresses::KEY_MANAGER).unwrap();
        let address = template.resolve(&["applicationKM"]).unwrap();
        app.process_commands(
            vec![UiCommand::Execute {
                address,
                operation: "init".to_string(),
            }],
            &tx,
        );
        let status = app.state.status.expect("status message");
        assert!(!status.is_error);
        assert!(status.text.contains("init"));
    }

    #[test]
    fn add_resource_round_trip() {
        let mut app = app();
        let (tx, _rx) = mpsc::channel();
        app.state.view = View::Tls;

        let template = AddressTemplate::parse(addresses::TRUST_MANAGER).unwrap();
        app.process_commands(
            vec![UiCommand::AddResource {
                template,
                name: "edgeTM".to_string(),
            }],
            &tx,
        );
        let status = app.state.status.clone().expect("status message");
        assert!(!status.is_error, "unexpected error: {}", status.text);

        let rows = app
            .client
            .read_children(&AddressTemplate::parse(addresses::TRUST_MANAGER).unwrap())
            .unwrap();
        assert!(rows.iter().any(|row| row.name() == "edgeTM"));
    }

    #[test]
    fn empty_prompt_input_is_rejected() {
        let mut app = app();
        let mut sink = Vec::new();
        let template = AddressTemplate::parse(addresses::TRUST_MANAGER).unwrap();
        app.confirm(
            Some(UiCommand::AddResource {
                template,
                name: String::new(),
            }),
            Some("   ".to_string()),
            &mut sink,
        );
        assert!(sink.is_empty());
        assert!(app.state.status.unwrap().is_error);
    }

    #[test]
    fn verify_command_posts_the_result_as_an_event() {
        let mut app = app();
        let (tx, rx) = mpsc::channel();
        app.process_commands(
            vec![UiCommand::VerifyScript {
                token: 3,
                script: "https://acme.example/log-viewer.js".to_string(),
            }],
            &tx,
        );
        match rx.recv_timeout(Duration::from_secs(5)).unwrap() {
            Event::ScriptVerified(result) => {
                assert_eq!(result.token, 3);
                assert_eq!(result.status, 200);
            }
            other => panic!("unexpected event: {other:?}"),
        }
    }

    #[test]
    fn confirmed_dialog_commands_are_executed() {
        let mut app = app();
        let mut sink = Vec::new();
        app.state.popup = PopupState::Dialog(DialogFactory::confirmation(
            "Quit",
            "Really quit?",
            UiCommand::Quit,
        ));
        app.handle_key(
            crossterm::event::KeyEvent::new(
                crossterm::event::KeyCode::Enter,
                crossterm::event::KeyModifiers::NONE,
            ),
            &mut sink,
        );
        assert!(!app.state.popup.is_open());
        assert_eq!(sink, vec![UiCommand::Quit]);
    }
}
