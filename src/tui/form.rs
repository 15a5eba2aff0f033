//! Read-only form pane rendering.

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};

use crate::mbui::form::ModelNodeForm;
use crate::model::ModelBacked;

use super::style::Styles;

/// Renders the form's field rows, or a placeholder while nothing is
/// selected.
pub fn render_form<T: ModelBacked>(
    frame: &mut Frame,
    area: Rect,
    form: &ModelNodeForm<T>,
    title: &str,
) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Styles::border())
        .title(format!(" {title} "));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    if form.is_empty() {
        frame.render_widget(
            Paragraph::new(Span::styled("No item selected", Styles::dim())),
            inner,
        );
        return;
    }

    let rows = form.rows();
    let label_width = rows.iter().map(|(label, _)| label.len()).max().unwrap_or(0);
    let lines: Vec<Line> = rows
        .into_iter()
        .map(|(label, value)| {
            Line::from(vec![
                Span::styled(format!("{label:>label_width$}"), Styles::field_label()),
                Span::raw("  "),
                Span::raw(value),
            ])
        })
        .collect();
    frame.render_widget(Paragraph::new(lines), inner);
}
