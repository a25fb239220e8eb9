use super::Frame;
use crate::state::State;
use crate::ui::widgets::styling;
use ratatui::{
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};

/// Render the title and headline counts.
///
pub fn header(frame: &mut Frame, size: Rect, state: &State, filtered: usize) {
    let theme = state.get_theme();
    let stats = state.stats();
    let stat = |label: &'static str, value: usize, color: Color| {
        vec![
            Span::styled(format!("{} ", label), styling::muted_text_style(theme)),
            Span::styled(value.to_string(), Style::default().fg(color)),
            Span::raw("   "),
        ]
    };

    let mut spans = vec![
        Span::styled("Issues  ", styling::banner_style(theme)),
        Span::styled(
            format!("{} of {} issues   ", filtered, stats.total),
            styling::muted_text_style(theme),
        ),
    ];
    spans.extend(stat("Total", stats.total, theme.text.to_color()));
    spans.extend(stat("In progress", stats.in_progress, theme.warning.to_color()));
    spans.extend(stat("Done", stats.done, theme.success.to_color()));
    spans.extend(stat("Urgent", stats.urgent, theme.error.to_color()));
    spans.push(Span::styled(
        if state.view().dark_mode() { "dark (t)" } else { "light (t)" },
        styling::muted_text_style(theme),
    ));

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(styling::normal_block_border_style(theme));
    frame.render_widget(Paragraph::new(Line::from(spans)).block(block), size);
}
