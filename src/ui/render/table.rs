use super::{format_date, format_estimate, Frame};
use crate::data::QueryState;
use crate::issues::{Issue, IssueField};
use crate::state::{Row as ViewRow, SortDirection, State, SORTABLE_FIELDS};
use crate::ui::widgets::{spinner, styling};
use ratatui::{
    layout::{Alignment, Constraint, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table},
};

const COLUMNS: [(IssueField, Constraint); 9] = [
    (IssueField::Identifier, Constraint::Length(8)),
    (IssueField::Title, Constraint::Min(24)),
    (IssueField::Status, Constraint::Length(12)),
    (IssueField::Priority, Constraint::Length(14)),
    (IssueField::Assignee, Constraint::Length(15)),
    (IssueField::Project, Constraint::Length(15)),
    (IssueField::Cycle, Constraint::Length(9)),
    (IssueField::DueDate, Constraint::Length(16)),
    (IssueField::Estimate, Constraint::Length(14)),
];

/// Labels shown next to a title before collapsing into `+N`.
const MAX_TITLE_LABELS: usize = 2;

/// Build table rows for the displayed page.
///
pub fn table_rows(rows: &[ViewRow], state: &State) -> Vec<Row<'static>> {
    let theme = state.get_theme();
    rows.iter()
        .map(|row| match row {
            ViewRow::Group {
                key,
                count,
                expanded,
            } => group_row(key, *count, *expanded, styling::group_header_style(theme)),
            ViewRow::Issue(issue) => issue_row(issue, state),
        })
        .collect()
}

/// Render the issue table according to state.
///
pub fn table(frame: &mut Frame, size: Rect, state: &mut State, rows: Vec<Row<'static>>) {
    let theme = state.get_theme();
    let block = Block::default()
        .borders(Borders::ALL)
        .title(Span::styled("Issues", styling::active_block_title_style()))
        .border_style(if state.has_open_issue() {
            styling::normal_block_border_style(theme)
        } else {
            styling::active_block_border_style(theme)
        });

    match state.issues_query() {
        QueryState::Idle | QueryState::Loading => {
            let widget = spinner::widget(state, "Loading issues...", size.height).block(block);
            frame.render_widget(widget, size);
            return;
        }
        QueryState::Error(message) => {
            let text = vec![
                Line::from(""),
                Line::from(Span::styled(
                    "Failed to load issues",
                    styling::error_text_style(theme),
                )),
                Line::from(Span::styled(
                    message.clone(),
                    styling::muted_text_style(theme),
                )),
                Line::from(Span::styled(
                    "Press r to retry",
                    styling::muted_text_style(theme),
                )),
            ];
            let widget = Paragraph::new(text)
                .alignment(Alignment::Center)
                .block(block);
            frame.render_widget(widget, size);
            return;
        }
        QueryState::Success(_) => {}
    }

    if rows.is_empty() {
        let widget = Paragraph::new(vec![
            Line::from(""),
            Line::from(Span::styled(
                state.empty_message(),
                styling::muted_text_style(theme),
            )),
        ])
        .alignment(Alignment::Center)
        .block(block);
        frame.render_widget(widget, size);
        return;
    }

    let header = Row::new(COLUMNS.iter().map(|(field, _)| header_cell(*field, state)))
        .style(styling::label_style(theme))
        .bottom_margin(1);
    let widget = Table::new(rows, COLUMNS.iter().map(|(_, width)| *width))
        .header(header)
        .block(block)
        .highlight_style(styling::selected_row_style(theme))
        .highlight_symbol("> ");
    frame.render_stateful_widget(widget, size, state.get_table_state());
}

/// Column title with a key hint and sort arrow for sortable columns.
///
fn header_cell(field: IssueField, state: &State) -> Cell<'static> {
    let Some(index) = SORTABLE_FIELDS.iter().position(|f| *f == field) else {
        return Cell::from(field.label());
    };
    let arrow = match (state.view().sort_field(), state.view().sort_direction()) {
        (Some(sorted), SortDirection::Asc) if sorted == field => " ↑",
        (Some(sorted), SortDirection::Desc) if sorted == field => " ↓",
        _ => "",
    };
    Cell::from(format!("{}{} [{}]", field.label(), arrow, index + 1))
}

fn group_row(key: &str, count: usize, expanded: bool, style: Style) -> Row<'static> {
    let marker = if expanded { "▾" } else { "▸" };
    let key = if key.is_empty() { "(none)" } else { key };
    Row::new(vec![Cell::from(format!("{} {} ({})", marker, key, count))]).style(style)
}

fn issue_row(issue: &Issue, state: &State) -> Row<'static> {
    let theme = state.get_theme();
    Row::new(vec![
        Cell::from(issue.identifier.clone()).style(styling::muted_text_style(theme)),
        Cell::from(title_line(issue, state)),
        Cell::from(issue.status.clone())
            .style(Style::default().fg(theme.status_color(&issue.status))),
        Cell::from(issue.priority.clone())
            .style(Style::default().fg(theme.priority_color(&issue.priority))),
        Cell::from(issue.assignee.clone()).style(styling::normal_text_style(theme)),
        Cell::from(issue.project.clone()).style(styling::normal_text_style(theme)),
        Cell::from(issue.cycle.clone()).style(styling::muted_text_style(theme)),
        Cell::from(format_date(&issue.due_date)).style(styling::normal_text_style(theme)),
        Cell::from(format_estimate(issue.estimate)).style(styling::normal_text_style(theme)),
    ])
}

/// Title followed by its first labels and a count of the rest.
///
fn title_line(issue: &Issue, state: &State) -> Line<'static> {
    let theme = state.get_theme();
    let mut spans = vec![Span::styled(
        issue.title.clone(),
        styling::normal_text_style(theme),
    )];
    for label in issue.labels.iter().take(MAX_TITLE_LABELS) {
        spans.push(Span::styled(
            format!(" [{}]", label),
            styling::label_style(theme),
        ));
    }
    if issue.labels.len() > MAX_TITLE_LABELS {
        spans.push(Span::styled(
            format!(" +{}", issue.labels.len() - MAX_TITLE_LABELS),
            styling::muted_text_style(theme),
        ));
    }
    Line::from(spans)
}
