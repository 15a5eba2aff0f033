//! One-line status alerts.

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use super::style::Styles;

/// Severity of an alert.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlertKind {
    Success,
    Error,
}

/// An icon plus message line, hidden until some outcome is known.
#[derive(Debug, Clone)]
pub struct Alert {
    kind: AlertKind,
    message: String,
    visible: bool,
}

impl Alert {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            kind: AlertKind::Success,
            message: message.into(),
            visible: false,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            kind: AlertKind::Error,
            message: message.into(),
            visible: false,
        }
    }

    pub fn kind(&self) -> AlertKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        if !self.visible {
            return;
        }
        let (icon, style) = match self.kind {
            AlertKind::Success => ("✓", Styles::success()),
            AlertKind::Error => ("✗", Styles::error()),
        };
        let line = Line::from(vec![
            Span::styled(icon, style),
            Span::raw(" "),
            Span::raw(self.message.as_str()),
        ]);
        frame.render_widget(Paragraph::new(line), area);
    }
}
