//! Extension preview pane.
//!
//! Shows the attributes of the selected console extension and kicks off an
//! asynchronous check of its script URL. The outcome toggles exactly one
//! of two alerts; at no point are both visible. Every update invalidates
//! earlier checks by bumping a request token, so answers that arrive after
//! the preview moved on are dropped.

use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use tracing::debug;

use crate::mgmt::verify::VerifyResult;
use crate::model::NamedNode;
use crate::util::label;

use super::alert::Alert;
use super::command::UiCommand;
use super::style::Styles;

/// Attributes shown in the preview, in display order.
const PREVIEW_ATTRIBUTES: [&str; 8] = [
    "version",
    "description",
    "script",
    "stylesheets",
    "extension-point",
    "author",
    "homepage",
    "license",
];

/// Redirects still count as reachable.
fn script_reachable(status: u16) -> bool {
    (200..400).contains(&status)
}

/// Label/value listing of one extension; undefined attributes are left out.
#[derive(Debug, Clone, Default)]
pub struct PreviewAttributes {
    title: String,
    rows: Vec<(String, String)>,
}

impl PreviewAttributes {
    fn from_extension(extension: &NamedNode) -> Self {
        let rows = PREVIEW_ATTRIBUTES
            .iter()
            .copied()
            .filter_map(|name| {
                let value = extension.node().get(name);
                value
                    .is_defined()
                    .then(|| (label(name), value.to_string()))
            })
            .collect();
        Self {
            title: extension.name().to_string(),
            rows,
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn rows(&self) -> &[(String, String)] {
        &self.rows
    }
}

/// Preview of the selected extension.
pub struct ExtensionPreview {
    attributes: PreviewAttributes,
    script_ok: Alert,
    script_broken: Alert,
    token: u64,
}

impl ExtensionPreview {
    pub fn new() -> Self {
        Self {
            attributes: PreviewAttributes::default(),
            script_ok: Alert::success("Extension script is available"),
            script_broken: Alert::error("Extension script cannot be loaded"),
            token: 0,
        }
    }

    /// Shows `extension` and requests a verification of its script. Both
    /// alerts stay hidden until the answer arrives.
    pub fn update(&mut self, extension: &NamedNode, sink: &mut Vec<UiCommand>) {
        self.attributes = PreviewAttributes::from_extension(extension);
        self.script_ok.set_visible(false);
        self.script_broken.set_visible(false);
        self.token += 1;
        if let Some(script) = extension.node().get("script").as_str() {
            sink.push(UiCommand::VerifyScript {
                token: self.token,
                script: script.to_string(),
            });
        }
    }

    /// Empties the pane and invalidates outstanding verifications.
    pub fn clear(&mut self) {
        self.attributes = PreviewAttributes::default();
        self.script_ok.set_visible(false);
        self.script_broken.set_visible(false);
        self.token += 1;
    }

    /// Applies a finished verification. Results that do not carry the
    /// current token belong to an earlier selection and are dropped.
    pub fn on_verified(&mut self, result: VerifyResult) {
        if result.token != self.token {
            debug!(
                token = result.token,
                current = self.token,
                "dropping stale script verification"
            );
            return;
        }
        let reachable = script_reachable(result.status);
        self.script_ok.set_visible(reachable);
        self.script_broken.set_visible(!reachable);
    }

    pub fn attributes(&self) -> &PreviewAttributes {
        &self.attributes
    }

    pub fn alerts(&self) -> (&Alert, &Alert) {
        (&self.script_ok, &self.script_broken)
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let title = if self.attributes.title.is_empty() {
            " Preview ".to_string()
        } else {
            format!(" Preview: {} ", self.attributes.title)
        };
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Styles::border())
            .title(title);
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let [body_area, alert_area] =
            Layout::vertical([Constraint::Min(1), Constraint::Length(1)]).areas(inner);

        if self.attributes.rows.is_empty() {
            frame.render_widget(
                Paragraph::new(Span::styled("No extension selected", Styles::dim())),
                body_area,
            );
        } else {
            let label_width = self
                .attributes
                .rows
                .iter()
                .map(|(label, _)| label.len())
                .max()
                .unwrap_or(0);
            let lines: Vec<Line> = self
                .attributes
                .rows
                .iter()
                .map(|(label, value)| {
                    Line::from(vec![
                        Span::styled(format!("{label:>label_width$}"), Styles::field_label()),
                        Span::raw("  "),
                        Span::raw(value.as_str()),
                    ])
                })
                .collect();
            frame.render_widget(Paragraph::new(lines), body_area);
        }

        self.script_ok.render(frame, alert_area);
        self.script_broken.render(frame, alert_area);
    }
}

impl Default for ExtensionPreview {
    fn default() -> Self {
        Self::new()
    }
}
