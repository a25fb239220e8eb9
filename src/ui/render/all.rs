use super::{detail, filters, footer, header, log, table, table_rows, toolbar, Frame};
use crate::state::{Mode, State};
use crate::ui::widgets::styling;
use ratatui::{
    layout::{Constraint, Direction, Layout},
    widgets::Block,
};

/// Render all widgets according to state.
///
pub fn all(frame: &mut Frame, state: &mut State) {
    let size = frame.size();
    frame.render_widget(
        Block::default().style(styling::background_style(state.get_theme())),
        size,
    );

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Min(5),
            Constraint::Length(2),
        ])
        .split(size);

    let (issue_rows, filtered, page_count) = {
        let page = state.table_page();
        (table_rows(&page.rows, state), page.filtered, page.page_count)
    };

    header(frame, rows[0], state, filtered);
    toolbar(frame, rows[1], state);

    let body = if state.is_log_visible() {
        let split = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Percentage(65), Constraint::Percentage(35)])
            .split(rows[2]);
        log(frame, split[1], state);
        split[0]
    } else {
        rows[2]
    };

    if state.has_open_issue() {
        let split = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
            .split(body);
        table(frame, split[0], state, issue_rows);
        detail(frame, split[1], state);
    } else {
        table(frame, body, state, issue_rows);
    }

    footer(frame, rows[3], state, page_count);

    if state.mode() == Mode::Filters {
        filters(frame, size, state);
    }
}
