use super::Frame;
use crate::state::{Mode, State};
use crate::ui::widgets::styling;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::Paragraph,
};

/// Key hints for the current input mode.
///
fn hotkeys(state: &State) -> &'static str {
    match state.mode() {
        Mode::Search => " Type to search, Backspace: delete, Enter/Esc: done",
        Mode::Filters => " j/k: move, Space: toggle, Tab: category, c: clear, Esc: close",
        Mode::Table if state.has_open_issue() => {
            " j/k: move, Enter: open, Esc: close issue, n/p: page, y: copy link, q: quit"
        }
        Mode::Table => {
            " j/k: move, Enter: open/expand, /: search, f: filters, x: clear, b: group, \
             n/p/g/G: page, s: page size, t: theme, r: refresh, l: log, y: copy link, q: quit"
        }
    }
}

/// Render footer widget according to state and the page count of the
/// current frame.
///
pub fn footer(frame: &mut Frame, size: Rect, state: &State, page_count: usize) {
    let theme = state.get_theme();
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Length(1)])
        .split(size);

    let page = format!(
        "Page {} of {}",
        state.view().page() + 1,
        page_count.max(1)
    );
    let rows_label = if state.view().group_by().is_some() {
        "per group"
    } else {
        "per page"
    };
    let link = state.share_link();
    let mut left = vec![
        Span::styled(page, styling::normal_text_style(theme)),
        Span::styled(
            format!("  {} {}", state.view().page_size(), rows_label),
            styling::muted_text_style(theme),
        ),
        Span::styled("  Link ", styling::label_style(theme)),
        Span::styled(
            if link.is_empty() { "-".to_string() } else { link },
            styling::muted_text_style(theme),
        ),
    ];
    if let Some(message) = state.status_message() {
        left.push(Span::styled(
            format!("  {}", message),
            styling::banner_style(theme),
        ));
    }

    let nav = format!(
        "{}prev  next{}",
        if state.can_previous_page() { "< " } else { "  " },
        if state.view().page() + 1 < page_count { " >" } else { "  " },
    );
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(20), Constraint::Length(14)])
        .split(rows[0]);
    frame.render_widget(Paragraph::new(Line::from(left)), columns[0]);
    frame.render_widget(
        Paragraph::new(Span::styled(nav, styling::muted_text_style(theme)))
            .alignment(Alignment::Right),
        columns[1],
    );
    frame.render_widget(
        Paragraph::new(Span::styled(hotkeys(state), styling::muted_text_style(theme))),
        rows[1],
    );
}
