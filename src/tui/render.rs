//! Frame composition: header, active view, status line and popups.

use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

use crate::meta::security::{AccessControlProvider, Environment};

use super::dialog::centered_rect;
use super::state::{AppState, PopupState, View};
use super::style::Styles;

pub fn render(frame: &mut Frame, state: &mut AppState, environment: &Environment) {
    let [header_area, content_area, status_area] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Min(5),
        Constraint::Length(1),
    ])
    .areas(frame.area());

    render_header(frame, header_area, state, environment);
    match state.view {
        View::Tls => state.tls.render(frame, content_area),
        View::Extensions => state.extensions.render(frame, content_area),
    }
    render_status(frame, status_area, state);

    match &state.popup {
        PopupState::None => {}
        PopupState::Help => render_help(frame),
        PopupState::Dialog(dialog) => dialog.render(frame),
    }
}

fn render_header(frame: &mut Frame, area: Rect, state: &AppState, environment: &Environment) {
    let access = match environment.access_control() {
        AccessControlProvider::Simple => "simple".to_string(),
        AccessControlProvider::Rbac => match environment.role() {
            Some(role) => format!("rbac:{role}"),
            None => "rbac".to_string(),
        },
    };
    let mut spans = vec![
        Span::styled(" steward ", Styles::header()),
        Span::raw(" "),
        Span::raw(environment.name().to_string()),
        Span::styled(format!(" {} ", environment.product_version()), Styles::dim()),
        Span::styled(format!("[{access}] "), Styles::dim()),
        Span::styled(
            format!("up {} ", format_uptime(environment.uptime())),
            Styles::dim(),
        ),
    ];
    for view in View::all() {
        let style = if view == state.view {
            Styles::tab_active()
        } else {
            Styles::tab_inactive()
        };
        spans.push(Span::raw(" "));
        spans.push(Span::styled(view.title(), style));
    }
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn render_status(frame: &mut Frame, area: Rect, state: &AppState) {
    let line = match &state.status {
        Some(status) => {
            let style = if status.is_error {
                Styles::error()
            } else {
                Styles::success()
            };
            Line::from(Span::styled(format!(" {}", status.text), style))
        }
        None => Line::from(vec![
            Span::styled(" q", Styles::help_key()),
            Span::styled(" quit ", Styles::dim()),
            Span::styled("tab", Styles::help_key()),
            Span::styled(" view ", Styles::dim()),
            Span::styled("r", Styles::help_key()),
            Span::styled(" refresh ", Styles::dim()),
            Span::styled("?", Styles::help_key()),
            Span::styled(" help", Styles::dim()),
        ]),
    };
    frame.render_widget(Paragraph::new(line), area);
}

fn render_help(frame: &mut Frame) {
    let area = centered_rect(frame.area(), 50, 60);
    frame.render_widget(Clear, area);
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Styles::focus_border())
        .title(" Help ");
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let bindings = [
        ("tab / shift-tab", "switch view"),
        ("left / right, h / l", "switch pane"),
        ("up / down, k / j", "move"),
        ("pgup / pgdn", "move by page"),
        ("space", "toggle row in multi selection"),
        ("enter", "row action on the selected row"),
        ("1..9", "press table button"),
        ("r", "refresh the active view"),
        ("?", "toggle this help"),
        ("q, ctrl-c", "quit"),
    ];
    let width = bindings
        .iter()
        .map(|(keys, _)| keys.len())
        .max()
        .unwrap_or(0);
    let lines: Vec<Line> = bindings
        .iter()
        .map(|(keys, what)| {
            Line::from(vec![
                Span::styled(format!(" {keys:width$} "), Styles::help_key()),
                Span::raw(*what),
            ])
        })
        .collect();
    frame.render_widget(Paragraph::new(lines), inner);
}

/// Formats an uptime as `3h 07m 12s`, dropping leading zero parts.
pub fn format_uptime(uptime: chrono::Duration) -> String {
    let seconds = uptime.num_seconds().max(0);
    let (hours, minutes, secs) = (seconds / 3600, (seconds % 3600) / 60, seconds % 60);
    if hours > 0 {
        format!("{hours}h {minutes:02}m {secs:02}s")
    } else if minutes > 0 {
        format!("{minutes}m {secs:02}s")
    } else {
        format!("{secs}s")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_format_uptime() {
        assert_eq!(format_uptime(Duration::seconds(5)), "5s");
        assert_eq!(format_uptime(Duration::seconds(65)), "1m 05s");
        assert_eq!(format_uptime(Duration::seconds(3 * 3600 + 7 * 60 + 12)), "3h 07m 12s");
        assert_eq!(format_uptime(Duration::seconds(-3)), "0s");
    }
}
