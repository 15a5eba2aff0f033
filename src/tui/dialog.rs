//! Modal dialogs: confirmation, prompt, blocking and long running.
//!
//! A dialog owns the keyboard while open. Confirmation and prompt
//! dialogs resolve to a [`DialogOutcome`] carrying the command they were
//! armed with; blocking dialogs ignore keys and are closed by the
//! application.

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::Frame;
use ratatui::layout::{Constraint, Flex, Layout, Rect};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};

use super::command::UiCommand;
use super::style::Styles;

const SPINNER: [&str; 4] = ["|", "/", "-", "\\"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogKind {
    /// Yes/no question.
    Confirmation,
    /// Single line text input.
    Prompt,
    /// Cannot be dismissed by the user.
    Blocking,
    /// Blocking with a spinner advanced on ticks.
    LongRunning,
}

/// What a key press did to an open dialog.
#[derive(Debug, PartialEq)]
pub enum DialogOutcome {
    /// The dialog stays open.
    Open,
    /// Confirmed. `input` carries the entered text for prompt dialogs.
    Confirmed {
        command: Option<UiCommand>,
        input: Option<String>,
    },
    Cancelled,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Dialog {
    title: String,
    body: String,
    kind: DialogKind,
    on_confirm: Option<UiCommand>,
    input: String,
    spinner: usize,
}

impl Dialog {
    pub fn kind(&self) -> DialogKind {
        self.kind
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    /// Advances the spinner of a long running dialog. Other kinds ignore
    /// ticks.
    pub fn tick(&mut self) {
        if self.kind == DialogKind::LongRunning {
            self.spinner = (self.spinner + 1) % SPINNER.len();
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> DialogOutcome {
        match self.kind {
            DialogKind::Blocking | DialogKind::LongRunning => DialogOutcome::Open,
            DialogKind::Confirmation => match key.code {
                KeyCode::Enter | KeyCode::Char('y') => DialogOutcome::Confirmed {
                    command: self.on_confirm.take(),
                    input: None,
                },
                KeyCode::Esc | KeyCode::Char('n') => DialogOutcome::Cancelled,
                _ => DialogOutcome::Open,
            },
            DialogKind::Prompt => match key.code {
                KeyCode::Enter => DialogOutcome::Confirmed {
                    command: self.on_confirm.take(),
                    input: Some(std::mem::take(&mut self.input)),
                },
                KeyCode::Esc => DialogOutcome::Cancelled,
                KeyCode::Backspace => {
                    self.input.pop();
                    DialogOutcome::Open
                }
                KeyCode::Char(c) => {
                    self.input.push(c);
                    DialogOutcome::Open
                }
                _ => DialogOutcome::Open,
            },
        }
    }

    pub fn render(&self, frame: &mut Frame) {
        let area = centered_rect(frame.area(), 48, 30);
        frame.render_widget(Clear, area);

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Styles::focus_border())
            .title(format!(" {} ", self.title));
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let [body_area, extra_area, footer_area] = Layout::vertical([
            Constraint::Min(1),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .areas(inner);

        frame.render_widget(
            Paragraph::new(self.body.as_str()).wrap(Wrap { trim: true }),
            body_area,
        );

        match self.kind {
            DialogKind::Prompt => {
                let input = Line::from(vec![
                    Span::raw("> "),
                    Span::styled(format!("{}_", self.input), Styles::input()),
                ]);
                frame.render_widget(Paragraph::new(input), extra_area);
            }
            DialogKind::LongRunning => {
                frame.render_widget(
                    Paragraph::new(Span::styled(SPINNER[self.spinner], Styles::help_key())),
                    extra_area,
                );
            }
            _ => {}
        }

        let footer = match self.kind {
            DialogKind::Confirmation => Line::from(vec![
                Span::styled("y", Styles::help_key()),
                Span::raw(" confirm  "),
                Span::styled("n", Styles::help_key()),
                Span::raw(" cancel"),
            ]),
            DialogKind::Prompt => Line::from(vec![
                Span::styled("enter", Styles::help_key()),
                Span::raw(" confirm  "),
                Span::styled("esc", Styles::help_key()),
                Span::raw(" cancel"),
            ]),
            DialogKind::Blocking | DialogKind::LongRunning => {
                Line::from(Span::styled("please wait", Styles::dim()))
            }
        };
        frame.render_widget(Paragraph::new(footer), footer_area);
    }
}

/// Canned dialogs.
pub struct DialogFactory;

impl DialogFactory {
    /// Yes/no question; confirming yields `on_confirm`.
    pub fn confirmation(
        title: impl Into<String>,
        question: impl Into<String>,
        on_confirm: UiCommand,
    ) -> Dialog {
        Dialog {
            title: title.into(),
            body: question.into(),
            kind: DialogKind::Confirmation,
            on_confirm: Some(on_confirm),
            input: String::new(),
            spinner: 0,
        }
    }

    /// Single line text input; confirming yields `on_confirm` plus the
    /// entered text.
    pub fn prompt(
        title: impl Into<String>,
        message: impl Into<String>,
        on_confirm: UiCommand,
    ) -> Dialog {
        Dialog {
            title: title.into(),
            body: message.into(),
            kind: DialogKind::Prompt,
            on_confirm: Some(on_confirm),
            input: String::new(),
            spinner: 0,
        }
    }

    /// Cannot be dismissed by the user, only closed by the application.
    pub fn blocking(title: impl Into<String>, message: impl Into<String>) -> Dialog {
        Dialog {
            title: title.into(),
            body: message.into(),
            kind: DialogKind::Blocking,
            on_confirm: None,
            input: String::new(),
            spinner: 0,
        }
    }

    /// Blocking dialog with a spinner for work of unknown duration.
    pub fn long_running(title: impl Into<String>, message: impl Into<String>) -> Dialog {
        Dialog {
            kind: DialogKind::LongRunning,
            ..Self::blocking(title, message)
        }
    }
}

/// A centered popup area, `percent_x` / `percent_y` of `area`.
pub fn centered_rect(area: Rect, percent_x: u16, percent_y: u16) -> Rect {
    let [area] = Layout::vertical([Constraint::Percentage(percent_y)])
        .flex(Flex::Center)
        .areas(area);
    let [area] = Layout::horizontal([Constraint::Percentage(percent_x)])
        .flex(Flex::Center)
        .areas(area);
    area
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyCode, KeyModifiers};

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn confirmation_yields_armed_command() {
        let mut dialog =
            DialogFactory::confirmation("Remove", "Remove it?", UiCommand::RefreshView);
        assert_eq!(dialog.handle_key(key(KeyCode::Char('x'))), DialogOutcome::Open);
        assert_eq!(
            dialog.handle_key(key(KeyCode::Char('y'))),
            DialogOutcome::Confirmed {
                command: Some(UiCommand::RefreshView),
                input: None,
            }
        );
    }

    #[test]
    fn confirmation_cancels_on_escape() {
        let mut dialog = DialogFactory::confirmation("Remove", "Remove it?", UiCommand::Quit);
        assert_eq!(dialog.handle_key(key(KeyCode::Esc)), DialogOutcome::Cancelled);
    }

    #[test]
    fn prompt_collects_input() {
        let mut dialog = DialogFactory::prompt("Add", "Name", UiCommand::RefreshView);
        for c in ['a', 'b', 'x'] {
            dialog.handle_key(key(KeyCode::Char(c)));
        }
        dialog.handle_key(key(KeyCode::Backspace));
        assert_eq!(
            dialog.handle_key(key(KeyCode::Enter)),
            DialogOutcome::Confirmed {
                command: Some(UiCommand::RefreshView),
                input: Some("ab".to_string()),
            }
        );
    }

    #[test]
    fn blocking_ignores_keys() {
        let mut dialog = DialogFactory::blocking("Busy", "Working");
        assert_eq!(dialog.handle_key(key(KeyCode::Esc)), DialogOutcome::Open);
        assert_eq!(dialog.handle_key(key(KeyCode::Enter)), DialogOutcome::Open);
    }

    #[test]
    fn spinner_advances_on_tick_and_wraps() {
        let mut dialog = DialogFactory::long_running("Busy", "Working");
        for _ in 0..SPINNER.len() {
            dialog.tick();
        }
        assert_eq!(dialog.spinner, 0);

        let mut still = DialogFactory::blocking("Busy", "Working");
        still.tick();
        assert_eq!(still.spinner, 0);
    }
}
