//! Navigation-related state types.
//!
//! This module contains the input modes and the rows the table displays.

use crate::issues::Issue;

/// Specifying where key presses go.
///
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Mode {
    Table,
    Search,
    Filters,
}

/// One displayed table row.
///
#[derive(Debug, PartialEq)]
pub enum Row<'a> {
    Group {
        key: String,
        count: usize,
        expanded: bool,
    },
    Issue(&'a Issue),
}

/// Table contents for one frame, derived in a single pipeline run.
///
#[derive(Debug)]
pub struct TablePage<'a> {
    pub rows: Vec<Row<'a>>,
    /// Issues left after search and filters.
    pub filtered: usize,
    pub page_count: usize,
}
