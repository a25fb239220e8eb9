use crate::state::State;
use crate::ui::widgets::styling;
use ratatui::{
    layout::Alignment,
    text::{Line, Span},
    widgets::Paragraph,
};

/// Braille animation frames, advanced once per tick.
///
pub const FRAMES: [&str; 10] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

/// Return the current spinner frame.
///
pub fn frame(state: &State) -> &'static str {
    FRAMES[state.get_spinner_index() % FRAMES.len()]
}

/// Return a centered spinner with a label, vertically centered in `height`.
///
pub fn widget(state: &State, label: &str, height: u16) -> Paragraph<'static> {
    let theme = state.get_theme();
    let mut lines = vec![Line::from(""); (height.saturating_sub(2) / 2) as usize];
    lines.push(Line::from(vec![
        Span::styled(frame(state), styling::banner_style(theme)),
        Span::styled(format!(" {}", label), styling::muted_text_style(theme)),
    ]));
    Paragraph::new(lines).alignment(Alignment::Center)
}
