use super::{centered_rect, Frame};
use crate::state::{FilterCategory, State};
use crate::ui::widgets::styling;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Tabs},
};

/// Render the filter popover on top of the table.
///
pub fn filters(frame: &mut Frame, size: Rect, state: &mut State) {
    let theme = state.get_theme();
    let area = centered_rect(50, 60, size);
    frame.render_widget(Clear, area);

    let block = Block::default()
        .borders(Borders::ALL)
        .title(Span::styled(
            "Filters (Tab: category, Space: toggle, c: clear, x: clear all, Esc: close)",
            styling::active_block_title_style(),
        ))
        .border_style(styling::active_block_border_style(theme))
        .style(styling::background_style(theme));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(2), Constraint::Min(1)])
        .split(inner);

    let selected = state.filter_category();
    let accepted = state.view().filters();
    let titles: Vec<Line> = FilterCategory::ALL
        .iter()
        .map(|category| {
            let count = accepted.get(*category).len();
            if count > 0 {
                Line::from(format!("{} ({})", category.label(), count))
            } else {
                Line::from(category.label())
            }
        })
        .collect();
    let index = FilterCategory::ALL
        .iter()
        .position(|c| *c == selected)
        .unwrap_or(0);
    let tabs = Tabs::new(titles)
        .select(index)
        .style(styling::muted_text_style(theme))
        .highlight_style(styling::banner_style(theme));
    frame.render_widget(tabs, chunks[0]);

    let options = state.filter_options();
    let values = options.get(selected);
    let items: Vec<ListItem> = values
        .iter()
        .map(|value| {
            let checked = accepted.get(selected).iter().any(|v| v == value);
            let marker = if checked { "[x] " } else { "[ ] " };
            let label = if value.is_empty() { "(none)" } else { value };
            ListItem::new(Line::from(vec![
                Span::styled(marker, styling::label_style(theme)),
                Span::styled(label.to_owned(), styling::normal_text_style(theme)),
            ]))
        })
        .collect();
    let list = List::new(items).highlight_style(styling::selected_row_style(theme));
    let mut list_state = ListState::default();
    if !values.is_empty() {
        list_state.select(Some(state.filter_cursor()));
    }
    frame.render_stateful_widget(list, chunks[1], &mut list_state);
}
