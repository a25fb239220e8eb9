use super::{format_date, format_estimate, Frame};
use crate::data::QueryState;
use crate::issues::Issue;
use crate::state::State;
use crate::ui::widgets::{spinner, styling};
use crate::ui::Theme;
use ratatui::{
    layout::{Alignment, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
};

/// Render the detail panel for the open issue.
///
pub fn detail(frame: &mut Frame, size: Rect, state: &mut State) {
    let theme = state.get_theme();
    let block = Block::default()
        .borders(Borders::ALL)
        .title(Span::styled(
            "Issue (Esc to close)",
            styling::active_block_title_style(),
        ))
        .border_style(styling::active_block_border_style(theme));

    match state.open_issue_query() {
        QueryState::Idle | QueryState::Loading => {
            let widget = spinner::widget(state, "Loading issue...", size.height).block(block);
            frame.render_widget(widget, size);
        }
        QueryState::Error(message) => {
            let widget = Paragraph::new(vec![
                Line::from(Span::styled(
                    "Failed to load issue",
                    styling::error_text_style(theme),
                )),
                Line::from(Span::styled(message, styling::muted_text_style(theme))),
            ])
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true })
            .block(block);
            frame.render_widget(widget, size);
        }
        QueryState::Success(None) => {
            let widget = Paragraph::new(Span::styled(
                "Issue not found",
                styling::muted_text_style(theme),
            ))
            .alignment(Alignment::Center)
            .block(block);
            frame.render_widget(widget, size);
        }
        QueryState::Success(Some(issue)) => {
            let widget = Paragraph::new(issue_lines(&issue, theme))
                .wrap(Wrap { trim: false })
                .block(block);
            frame.render_widget(widget, size);
        }
    }
}

fn issue_lines(issue: &Issue, theme: &Theme) -> Vec<Line<'static>> {
    let field = |label: &'static str, value: String, style: Style| {
        Line::from(vec![
            Span::styled(format!("{:<10}", label), styling::label_style(theme)),
            Span::styled(value, style),
        ])
    };
    let text = styling::normal_text_style(theme);
    let labels = if issue.labels.is_empty() {
        "-".to_string()
    } else {
        issue.labels.join(", ")
    };

    let mut lines = vec![
        Line::from(Span::styled(
            format!("{}  {}", issue.identifier, issue.title),
            styling::banner_style(theme),
        )),
        Line::from(""),
        field(
            "Status",
            issue.status.clone(),
            Style::default().fg(theme.status_color(&issue.status)),
        ),
        field(
            "Priority",
            issue.priority.clone(),
            Style::default().fg(theme.priority_color(&issue.priority)),
        ),
        field(
            "Assignee",
            format!("{} ({})", issue.assignee, issue.assignee_initials()),
            text,
        ),
        field("Project", issue.project.clone(), text),
        field("Cycle", issue.cycle.clone(), text),
        field("Labels", labels, text),
        field("Due", format_date(&issue.due_date), text),
        field("Estimate", format_estimate(issue.estimate), text),
        field("Created", format_date(&issue.created_at), text),
        field("Updated", format_date(&issue.updated_at), text),
        Line::from(""),
    ];
    lines.extend(
        issue
            .description
            .lines()
            .map(|line| Line::from(Span::styled(line.to_owned(), text))),
    );
    lines
}
