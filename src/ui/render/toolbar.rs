use super::Frame;
use crate::state::{FilterCategory, Mode, SortDirection, State};
use crate::ui::widgets::styling;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};

/// Render the search box, active filters, grouping and sort.
///
pub fn toolbar(frame: &mut Frame, size: Rect, state: &mut State) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
        .split(size);
    search(frame, chunks[0], state);
    controls(frame, chunks[1], state);
}

fn search(frame: &mut Frame, size: Rect, state: &State) {
    let theme = state.get_theme();
    let searching = state.mode() == Mode::Search;
    let query = state.view().search();
    let mut block = Block::default().borders(Borders::ALL).title("Search (/)");
    block = if searching {
        block.border_style(styling::active_block_border_style(theme))
    } else {
        block.border_style(styling::normal_block_border_style(theme))
    };

    let line = if query.is_empty() && !searching {
        Line::from(Span::styled(
            "Search issues...",
            styling::muted_text_style(theme),
        ))
    } else {
        let mut spans = vec![Span::styled(
            query.to_owned(),
            styling::normal_text_style(theme),
        )];
        if searching {
            spans.push(Span::styled("▏", styling::banner_style(theme)));
        }
        Line::from(spans)
    };
    frame.render_widget(Paragraph::new(line).block(block), size);
}

fn controls(frame: &mut Frame, size: Rect, state: &State) {
    let theme = state.get_theme();
    let view = state.view();

    let active_filters: Vec<String> = FilterCategory::ALL
        .iter()
        .filter_map(|category| {
            let count = view.filters().get(*category).len();
            (count > 0).then(|| format!("{} {}", category.label(), count))
        })
        .collect();
    let filters = if active_filters.is_empty() {
        "none".to_string()
    } else {
        active_filters.join(", ")
    };
    let group = view
        .group_by()
        .map(|field| field.label().to_string())
        .unwrap_or_else(|| "None".to_string());
    let sort = match view.sort_field() {
        Some(field) => format!(
            "{} {}",
            field.label(),
            match view.sort_direction() {
                SortDirection::Asc => "↑",
                SortDirection::Desc => "↓",
            }
        ),
        None => "None".to_string(),
    };

    let line = Line::from(vec![
        Span::styled("Filters (f) ", styling::label_style(theme)),
        Span::styled(filters, styling::normal_text_style(theme)),
        Span::styled("   Group (b) ", styling::label_style(theme)),
        Span::styled(group, styling::normal_text_style(theme)),
        Span::styled("   Sort (1-4) ", styling::label_style(theme)),
        Span::styled(sort, styling::normal_text_style(theme)),
    ]);
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(styling::normal_block_border_style(theme));
    frame.render_widget(Paragraph::new(line).block(block), size);
}
