//! Vertical navigation pane.

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, List, ListItem};

use super::style::Styles;

#[derive(Debug, Clone)]
struct NavItem {
    id: String,
    title: String,
}

/// Left-hand list of sections; the selected item decides which content
/// section is visible.
#[derive(Debug, Clone, Default)]
pub struct VerticalNavigation {
    items: Vec<NavItem>,
    selected: usize,
}

impl VerticalNavigation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_primary(mut self, id: impl Into<String>, title: impl Into<String>) -> Self {
        self.items.push(NavItem {
            id: id.into(),
            title: title.into(),
        });
        self
    }

    pub fn select_next(&mut self) {
        if !self.items.is_empty() {
            self.selected = (self.selected + 1) % self.items.len();
        }
    }

    pub fn select_prev(&mut self) {
        if !self.items.is_empty() {
            self.selected = (self.selected + self.items.len() - 1) % self.items.len();
        }
    }

    pub fn selected_index(&self) -> usize {
        self.selected
    }

    pub fn selected_id(&self) -> Option<&str> {
        self.items.get(self.selected).map(|item| item.id.as_str())
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn render(&self, frame: &mut Frame, area: Rect, focused: bool) {
        let border = if focused {
            Styles::focus_border()
        } else {
            Styles::border()
        };
        let items: Vec<ListItem> = self
            .items
            .iter()
            .enumerate()
            .map(|(i, item)| {
                let style = if i == self.selected {
                    Styles::cursor()
                } else {
                    Styles::default()
                };
                ListItem::new(Line::from(Span::styled(format!(" {} ", item.title), style)))
            })
            .collect();
        let list = List::new(items).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(border),
        );
        frame.render_widget(list, area);
    }
}
