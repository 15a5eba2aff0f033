//! Application state shared across the event loop and the renderer.

use chrono::{DateTime, Utc};

use super::dialog::Dialog;
use super::views::extensions::ExtensionsView;
use super::views::tls::TlsView;

/// How long a status line message stays up.
const STATUS_TTL_SECONDS: i64 = 6;

/// Top level views of the console.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Tls,
    Extensions,
}

impl View {
    pub fn title(self) -> &'static str {
        match self {
            View::Tls => "TLS",
            View::Extensions => "Extensions",
        }
    }

    pub fn all() -> [View; 2] {
        [View::Tls, View::Extensions]
    }

    pub fn next(self) -> View {
        match self {
            View::Tls => View::Extensions,
            View::Extensions => View::Tls,
        }
    }

    pub fn prev(self) -> View {
        // Two views: previous and next coincide.
        self.next()
    }
}

/// Popup overlaying the active view.
#[derive(Debug)]
pub enum PopupState {
    None,
    Help,
    Dialog(Dialog),
}

impl PopupState {
    pub fn is_open(&self) -> bool {
        !matches!(self, PopupState::None)
    }
}

/// A transient status line message.
#[derive(Debug, Clone)]
pub struct StatusMessage {
    pub text: String,
    pub is_error: bool,
    at: DateTime<Utc>,
}

pub struct AppState {
    pub view: View,
    pub popup: PopupState,
    pub status: Option<StatusMessage>,
    pub tls: TlsView,
    pub extensions: ExtensionsView,
}

impl AppState {
    pub fn new(tls: TlsView, extensions: ExtensionsView) -> Self {
        Self {
            view: View::Tls,
            popup: PopupState::None,
            status: None,
            tls,
            extensions,
        }
    }

    pub fn set_status(&mut self, text: impl Into<String>, is_error: bool) {
        self.status = Some(StatusMessage {
            text: text.into(),
            is_error,
            at: Utc::now(),
        });
    }

    /// Advances spinners and expires stale status messages.
    pub fn tick(&mut self) {
        if let PopupState::Dialog(dialog) = &mut self.popup {
            dialog.tick();
        }
        if let Some(status) = &self.status {
            if (Utc::now() - status.at).num_seconds() >= STATUS_TTL_SECONDS {
                self.status = None;
            }
        }
    }
}
