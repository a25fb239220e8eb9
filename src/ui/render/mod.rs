mod all;
mod detail;
mod filters;
mod footer;
mod header;
mod log;
mod table;
mod toolbar;

use self::log::log;
use super::*;
use chrono::{DateTime, Utc};
use detail::detail;
use filters::filters;
use footer::footer;
use header::header;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use table::{table, table_rows};
use toolbar::toolbar;

pub use all::all as render;

/// Format a date for display, e.g. "Nov 19, 2024".
///
pub fn format_date(date: &DateTime<Utc>) -> String {
    date.format("%b %-d, %Y").to_string()
}

/// Format an estimate in hours, e.g. "5h" or "1.5h".
///
fn format_estimate(estimate: f64) -> String {
    format!("{}h", estimate)
}

/// Return a rect of the given percentage size centered in `r`.
///
fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn dates_use_short_month_and_unpadded_day() {
        let date = Utc.with_ymd_and_hms(2024, 3, 5, 14, 41, 0).unwrap();
        assert_eq!(format_date(&date), "Mar 5, 2024");
    }

    #[test]
    fn estimates_are_hours() {
        assert_eq!(format_estimate(5.0), "5h");
        assert_eq!(format_estimate(1.5), "1.5h");
    }

    #[test]
    fn centered_rect_is_inside() {
        let outer = Rect::new(0, 0, 100, 50);
        let inner = centered_rect(60, 40, outer);
        assert_eq!(inner.width, 60);
        assert_eq!(inner.height, 20);
        assert_eq!(inner.x, 20);
    }
}
