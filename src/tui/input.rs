//! Keyboard input handling.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// High level actions derived from key presses. Dialog keys are consumed
/// by the open dialog before this mapping runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    Quit,
    NextView,
    PrevView,
    NextPane,
    Up,
    Down,
    PageUp,
    PageDown,
    /// Toggle the cursor row in a multi selection.
    ToggleSelect,
    /// Trigger the default row action of the cursor row.
    Confirm,
    Refresh,
    /// Press the n-th table button (0-based).
    Button(usize),
    Help,
    Escape,
    None,
}

pub fn handle_key(key: KeyEvent) -> KeyAction {
    match key.code {
        KeyCode::Char('q') => KeyAction::Quit,
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => KeyAction::Quit,
        KeyCode::Tab => KeyAction::NextView,
        KeyCode::BackTab => KeyAction::PrevView,
        KeyCode::Left | KeyCode::Right | KeyCode::Char('h') | KeyCode::Char('l') => {
            KeyAction::NextPane
        }
        KeyCode::Up | KeyCode::Char('k') => KeyAction::Up,
        KeyCode::Down | KeyCode::Char('j') => KeyAction::Down,
        KeyCode::PageUp => KeyAction::PageUp,
        KeyCode::PageDown => KeyAction::PageDown,
        KeyCode::Char(' ') => KeyAction::ToggleSelect,
        KeyCode::Enter => KeyAction::Confirm,
        KeyCode::Char('r') => KeyAction::Refresh,
        KeyCode::Char('?') => KeyAction::Help,
        KeyCode::Esc => KeyAction::Escape,
        KeyCode::Char(c @ '1'..='9') => KeyAction::Button(c as usize - '1' as usize),
        _ => KeyAction::None,
    }
}
