//! Color scheme and styles.

use ratatui::style::{Color, Modifier, Style};

/// Console color palette.
pub struct Theme;

impl Theme {
    pub const BG: Color = Color::Reset;
    pub const HEADER_BG: Color = Color::Blue;
    pub const CURSOR_BG: Color = Color::DarkGray;

    pub const FG: Color = Color::White;
    pub const FG_DIM: Color = Color::DarkGray;
    pub const HEADER_FG: Color = Color::White;

    pub const SUCCESS: Color = Color::Green;
    pub const ERROR: Color = Color::Red;
    pub const MARKED: Color = Color::Yellow;

    pub const TAB_ACTIVE: Color = Color::Cyan;
    pub const TAB_INACTIVE: Color = Color::DarkGray;
}

/// Pre-defined styles.
pub struct Styles;

impl Styles {
    pub fn default() -> Style {
        Style::default().fg(Theme::FG).bg(Theme::BG)
    }

    pub fn header() -> Style {
        Style::default()
            .fg(Theme::HEADER_FG)
            .bg(Theme::HEADER_BG)
            .add_modifier(Modifier::BOLD)
    }

    pub fn table_header() -> Style {
        Style::default().fg(Theme::FG).add_modifier(Modifier::BOLD)
    }

    /// Row under the cursor.
    pub fn cursor() -> Style {
        Style::default().bg(Theme::CURSOR_BG).add_modifier(Modifier::BOLD)
    }

    /// Rows belonging to a multi selection.
    pub fn marked() -> Style {
        Style::default().fg(Theme::MARKED)
    }

    pub fn dim() -> Style {
        Style::default().fg(Theme::FG_DIM)
    }

    pub fn tab_active() -> Style {
        Style::default()
            .fg(Theme::TAB_ACTIVE)
            .add_modifier(Modifier::BOLD)
    }

    pub fn tab_inactive() -> Style {
        Style::default().fg(Theme::TAB_INACTIVE)
    }

    pub fn focus_border() -> Style {
        Style::default().fg(Theme::TAB_ACTIVE)
    }

    pub fn border() -> Style {
        Style::default().fg(Theme::FG_DIM)
    }

    pub fn section_title() -> Style {
        Style::default().fg(Theme::FG).add_modifier(Modifier::BOLD)
    }

    pub fn field_label() -> Style {
        Style::default().fg(Theme::TAB_ACTIVE)
    }

    /// Text input inside a prompt dialog.
    pub fn input() -> Style {
        Style::default()
            .fg(Theme::FG)
            .add_modifier(Modifier::UNDERLINED)
    }

    pub fn button() -> Style {
        Style::default().fg(Theme::FG)
    }

    pub fn button_disabled() -> Style {
        Style::default().fg(Theme::FG_DIM)
    }

    pub fn success() -> Style {
        Style::default()
            .fg(Theme::SUCCESS)
            .add_modifier(Modifier::BOLD)
    }

    pub fn error() -> Style {
        Style::default().fg(Theme::ERROR).add_modifier(Modifier::BOLD)
    }

    pub fn help_key() -> Style {
        Style::default()
            .fg(Theme::TAB_ACTIVE)
            .add_modifier(Modifier::BOLD)
    }
}
