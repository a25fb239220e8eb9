use crate::app::NetworkEventSender;
use crate::data::QueryState;
use crate::events::network::Event as NetworkEvent;
use crate::issues::{Issue, IssueField};
use crate::logger::LogBuffer;
use crate::pipeline::{self, DerivedView, FilterOptions, Stats};
use crate::ui::{Theme, SPINNER_FRAME_COUNT};
use log::*;
use ratatui::widgets::TableState;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::{Duration, Instant};

use super::link::{History, Link, LinkSync};
use super::navigation::{Mode, Row, TablePage};
use super::view::{FilterCategory, Filters, SortDirection, ViewStore, PAGE_SIZES};

/// Quiet period after the last keystroke before the search text is applied.
pub const SEARCH_DEBOUNCE: Duration = Duration::from_millis(300);

/// Group-by selector choices, in cycling order.
pub const GROUP_BY_CHOICES: [Option<IssueField>; 6] = [
    None,
    Some(IssueField::Status),
    Some(IssueField::Assignee),
    Some(IssueField::Cycle),
    Some(IssueField::Priority),
    Some(IssueField::Project),
];

/// Columns with a sort control, bound to keys 1 through 4.
pub const SORTABLE_FIELDS: [IssueField; 4] = [
    IssueField::Identifier,
    IssueField::Priority,
    IssueField::DueDate,
    IssueField::Estimate,
];

/// Houses data representative of application state.
///
pub struct State {
    net_sender: Option<NetworkEventSender>,
    view: ViewStore,
    link_sync: LinkSync,
    history: History,
    issues: QueryState<Arc<Vec<Issue>>>,
    issue_queries: HashMap<String, QueryState<Option<Issue>>>,
    expanded_groups: HashSet<String>,
    table_state: TableState,
    mode: Mode,
    filter_category: FilterCategory,
    filter_cursor: usize,
    debounced_search: String,
    search_edited_at: Option<Instant>,
    spinner_index: usize,
    log: LogBuffer,
    log_visible: bool,
    status_message: Option<String>,
    light_theme: Theme,
    dark_theme: Theme,
}

impl State {
    /// Return new state over the given view store. Values carried by `link`
    /// are adopted once, then the link is rewritten from the store.
    ///
    pub fn new(
        mut view: ViewStore,
        link: Link,
        net_sender: Option<NetworkEventSender>,
        log: LogBuffer,
        light_theme: Theme,
        dark_theme: Theme,
    ) -> Self {
        let mut link_sync = LinkSync::new();
        link_sync.adopt(&mut view, &link);
        let mut history = History::new(link);
        link_sync.publish(&view, &mut history);
        let debounced_search = view.search().to_owned();
        let mut table_state = TableState::default();
        table_state.select(Some(0));
        State {
            net_sender,
            view,
            link_sync,
            history,
            issues: QueryState::Idle,
            issue_queries: HashMap::new(),
            expanded_groups: HashSet::new(),
            table_state,
            mode: Mode::Table,
            filter_category: FilterCategory::Status,
            filter_cursor: 0,
            debounced_search,
            search_edited_at: None,
            spinner_index: 0,
            log,
            log_visible: false,
            status_message: None,
            light_theme,
            dark_theme,
        }
    }

    /// Read access to the persisted view state.
    ///
    pub fn view(&self) -> &ViewStore {
        &self.view
    }

    fn publish_link(&mut self) {
        self.link_sync.publish(&self.view, &mut self.history);
    }

    /// The current shareable link.
    ///
    pub fn share_link(&self) -> String {
        self.history.current().to_string()
    }

    // ---- Queries ----

    /// Request the issue list, showing a loading state unless data is
    /// already present.
    ///
    pub fn request_issues(&mut self) -> &mut Self {
        if self.issues.data().is_none() {
            self.issues = QueryState::Loading;
        }
        self.dispatch(NetworkEvent::FetchIssues);
        self
    }

    /// Drop cached issues and fetch them again.
    ///
    pub fn refresh_issues(&mut self) -> &mut Self {
        self.dispatch(NetworkEvent::RefetchIssues);
        self
    }

    pub fn set_issues(&mut self, issues: QueryState<Arc<Vec<Issue>>>) -> &mut Self {
        self.issues = issues;
        self.clamp_cursor();
        self
    }

    pub fn issues_query(&self) -> &QueryState<Arc<Vec<Issue>>> {
        &self.issues
    }

    /// Loaded issues, or an empty slice while loading or failed.
    ///
    pub fn issues(&self) -> &[Issue] {
        match self.issues.data() {
            Some(issues) => issues.as_slice(),
            None => &[],
        }
    }

    /// Store the result for one issue. Results are keyed by identifier, so a
    /// late answer for a previously open issue never replaces the current one.
    ///
    pub fn set_issue_query(
        &mut self,
        identifier: String,
        query: QueryState<Option<Issue>>,
    ) -> &mut Self {
        self.issue_queries.insert(identifier, query);
        self
    }

    /// Query state for the issue in the detail panel.
    ///
    pub fn open_issue_query(&self) -> QueryState<Option<Issue>> {
        match self.view.open_issue_id() {
            None => QueryState::Idle,
            Some(identifier) => self
                .issue_queries
                .get(identifier)
                .cloned()
                .unwrap_or(QueryState::Loading),
        }
    }

    /// Fetch the open issue, if any.
    ///
    pub fn request_open_issue(&mut self) -> &mut Self {
        if let Some(identifier) = self.view.open_issue_id().map(str::to_owned) {
            if !matches!(
                self.issue_queries.get(&identifier),
                Some(QueryState::Success(_))
            ) {
                self.issue_queries
                    .insert(identifier.clone(), QueryState::Loading);
            }
            self.dispatch(NetworkEvent::FetchIssue { identifier });
        }
        self
    }

    /// Show an issue in the detail panel.
    ///
    pub fn open_issue(&mut self, identifier: String) -> &mut Self {
        debug!("Opening issue {}...", identifier);
        self.view.set_open_issue_id(Some(identifier));
        self.publish_link();
        self.request_open_issue()
    }

    pub fn close_issue(&mut self) -> &mut Self {
        self.view.set_open_issue_id(None);
        self.publish_link();
        self
    }

    pub fn has_open_issue(&self) -> bool {
        self.view.open_issue_id().is_some()
    }

    // ---- Derived view ----

    /// Run the pipeline over the loaded issues.
    ///
    pub fn derived(&self) -> DerivedView<'_> {
        pipeline::derive(self.issues(), &self.view.view_state(), &self.debounced_search)
    }

    /// Rows, filtered count and page count from one pipeline run. Rows are
    /// the current page, or group headers followed by the current page of
    /// each expanded group. While grouped, pages apply within expanded
    /// groups, so the largest expanded group decides the page count.
    ///
    pub fn table_page(&self) -> TablePage<'_> {
        let derived = self.derived();
        let (page, page_size) = (self.view.page(), self.view.page_size());
        let filtered = derived.filtered.len();
        match derived.grouped {
            Some(groups) => {
                let mut rows = Vec::new();
                let mut page_count = 0;
                for group in groups {
                    let expanded = self.expanded_groups.contains(&group.key);
                    rows.push(Row::Group {
                        key: group.key.clone(),
                        count: group.issues.len(),
                        expanded,
                    });
                    if expanded {
                        page_count =
                            page_count.max(pipeline::page_count(group.issues.len(), page_size));
                        rows.extend(
                            pipeline::paginate(&group.issues, page, page_size)
                                .iter()
                                .map(|issue| Row::Issue(*issue)),
                        );
                    }
                }
                TablePage {
                    rows,
                    filtered,
                    page_count,
                }
            }
            None => TablePage {
                rows: derived.paginated.into_iter().map(Row::Issue).collect(),
                filtered,
                page_count: derived.page_count,
            },
        }
    }

    pub fn rows(&self) -> Vec<Row<'_>> {
        self.table_page().rows
    }

    pub fn stats(&self) -> Stats {
        Stats::from_issues(self.issues())
    }

    pub fn filter_options(&self) -> FilterOptions {
        pipeline::filter_options(self.issues())
    }

    /// Message for an empty table.
    ///
    pub fn empty_message(&self) -> &'static str {
        if self.issues().is_empty() {
            "No issues found"
        } else if !self.debounced_search.is_empty() || !self.view.filters().is_empty() {
            "No issues match your filters"
        } else {
            "No issues found"
        }
    }

    // ---- Table navigation ----

    pub fn get_table_state(&mut self) -> &mut TableState {
        &mut self.table_state
    }

    pub fn selected_row(&self) -> usize {
        self.table_state.selected().unwrap_or(0)
    }

    pub fn next_row(&mut self) -> &mut Self {
        let len = self.rows().len();
        if len > 0 {
            let next = (self.selected_row() + 1).min(len - 1);
            self.table_state.select(Some(next));
        }
        self
    }

    pub fn previous_row(&mut self) -> &mut Self {
        let previous = self.selected_row().saturating_sub(1);
        self.table_state.select(Some(previous));
        self
    }

    fn clamp_cursor(&mut self) {
        let len = self.rows().len();
        if self.selected_row() >= len {
            self.table_state.select(Some(len.saturating_sub(1)));
        }
    }

    /// Open the selected issue, or expand/collapse the selected group.
    ///
    pub fn activate_selected(&mut self) -> &mut Self {
        enum Action {
            Toggle(String),
            Open(String),
        }
        let action = match self.rows().get(self.selected_row()) {
            Some(Row::Group { key, .. }) => Some(Action::Toggle(key.clone())),
            Some(Row::Issue(issue)) => Some(Action::Open(issue.identifier.clone())),
            None => None,
        };
        match action {
            Some(Action::Toggle(key)) => self.toggle_group(key),
            Some(Action::Open(identifier)) => self.open_issue(identifier),
            None => self,
        }
    }

    pub fn toggle_group(&mut self, key: String) -> &mut Self {
        if !self.expanded_groups.remove(&key) {
            self.expanded_groups.insert(key);
        }
        self.clamp_cursor();
        self
    }

    pub fn is_group_expanded(&self, key: &str) -> bool {
        self.expanded_groups.contains(key)
    }

    // ---- Sorting and grouping ----

    /// Sort by `field`: ascending on first use, then flipping between
    /// descending and ascending while the same column stays selected.
    ///
    pub fn toggle_sort(&mut self, field: IssueField) -> &mut Self {
        let direction = if self.view.sort_field() == Some(field)
            && self.view.sort_direction() == SortDirection::Asc
        {
            SortDirection::Desc
        } else {
            SortDirection::Asc
        };
        self.view.set_sort_field(Some(field));
        self.view.set_sort_direction(direction);
        self
    }

    /// Sort by the `index`-th sortable column.
    ///
    pub fn sort_column(&mut self, index: usize) -> &mut Self {
        if let Some(field) = SORTABLE_FIELDS.get(index) {
            self.toggle_sort(*field);
        }
        self
    }

    pub fn set_group_by(&mut self, field: Option<IssueField>) -> &mut Self {
        self.view.set_group_by(field);
        self.expanded_groups.clear();
        self.table_state.select(Some(0));
        self.publish_link();
        self
    }

    pub fn cycle_group_by(&mut self) -> &mut Self {
        let current = self.view.group_by();
        let index = GROUP_BY_CHOICES
            .iter()
            .position(|choice| *choice == current)
            .map(|i| (i + 1) % GROUP_BY_CHOICES.len())
            .unwrap_or(0);
        self.set_group_by(GROUP_BY_CHOICES[index])
    }

    // ---- Search ----

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn enter_search_mode(&mut self) -> &mut Self {
        self.mode = Mode::Search;
        self
    }

    /// Leave search input and apply the search text right away.
    ///
    pub fn exit_search_mode(&mut self) -> &mut Self {
        self.mode = Mode::Table;
        self.apply_search();
        self
    }

    /// Update the search slice. The pipeline sees it after the debounce
    /// period.
    ///
    pub fn set_search(&mut self, search: String) -> &mut Self {
        self.view.set_search(search);
        self.search_edited_at = Some(Instant::now());
        self.publish_link();
        self
    }

    pub fn add_search_char(&mut self, c: char) -> &mut Self {
        let mut search = self.view.search().to_owned();
        search.push(c);
        self.set_search(search)
    }

    pub fn remove_search_char(&mut self) -> &mut Self {
        let mut search = self.view.search().to_owned();
        search.pop();
        self.set_search(search)
    }

    /// Apply the search text if it has been quiet for the debounce period.
    ///
    pub fn settle_search(&mut self, now: Instant) -> &mut Self {
        if let Some(edited_at) = self.search_edited_at {
            if now.saturating_duration_since(edited_at) >= SEARCH_DEBOUNCE {
                self.apply_search();
            }
        }
        self
    }

    fn apply_search(&mut self) {
        self.search_edited_at = None;
        if self.debounced_search != self.view.search() {
            self.debounced_search = self.view.search().to_owned();
            self.clamp_cursor();
        }
    }

    /// Search text the table is currently filtered by.
    ///
    pub fn debounced_search(&self) -> &str {
        &self.debounced_search
    }

    // ---- Filters ----

    pub fn open_filters(&mut self) -> &mut Self {
        self.mode = Mode::Filters;
        self.filter_cursor = 0;
        self
    }

    pub fn close_filters(&mut self) -> &mut Self {
        self.mode = Mode::Table;
        self
    }

    pub fn filter_category(&self) -> FilterCategory {
        self.filter_category
    }

    pub fn filter_cursor(&self) -> usize {
        self.filter_cursor
    }

    pub fn next_filter_category(&mut self) -> &mut Self {
        self.filter_category = self.filter_category.next();
        self.filter_cursor = 0;
        self
    }

    pub fn next_filter_option(&mut self) -> &mut Self {
        let len = self.filter_options().get(self.filter_category).len();
        if len > 0 {
            self.filter_cursor = (self.filter_cursor + 1).min(len - 1);
        }
        self
    }

    pub fn previous_filter_option(&mut self) -> &mut Self {
        self.filter_cursor = self.filter_cursor.saturating_sub(1);
        self
    }

    /// Accept or stop accepting the option under the popover cursor.
    ///
    pub fn toggle_filter_option(&mut self) -> &mut Self {
        let options = self.filter_options();
        if let Some(value) = options.get(self.filter_category).get(self.filter_cursor) {
            let mut filters = self.view.filters().clone();
            filters.toggle(self.filter_category, value);
            self.view.set_filters(filters);
            self.clamp_cursor();
        }
        self
    }

    pub fn clear_filter_category(&mut self) -> &mut Self {
        let mut filters = self.view.filters().clone();
        filters.clear(self.filter_category);
        self.view.set_filters(filters);
        self
    }

    /// Clear every filter category and the search text.
    ///
    pub fn clear_all_filters(&mut self) -> &mut Self {
        self.view.set_filters(Filters::default());
        self.set_search(String::new());
        self.apply_search();
        self
    }

    // ---- Pagination ----

    /// Pages available to the pagination controls.
    ///
    pub fn page_count(&self) -> usize {
        self.table_page().page_count
    }

    pub fn can_previous_page(&self) -> bool {
        self.view.page() > 0
    }

    pub fn can_next_page(&self) -> bool {
        self.view.page() + 1 < self.page_count()
    }

    fn go_to_page(&mut self, page: usize) -> &mut Self {
        self.view.set_page(page);
        self.table_state.select(Some(0));
        self
    }

    pub fn first_page(&mut self) -> &mut Self {
        if self.can_previous_page() {
            self.go_to_page(0);
        }
        self
    }

    pub fn previous_page(&mut self) -> &mut Self {
        if self.can_previous_page() {
            let page = self.view.page() - 1;
            self.go_to_page(page);
        }
        self
    }

    pub fn next_page(&mut self) -> &mut Self {
        if self.can_next_page() {
            let page = self.view.page() + 1;
            self.go_to_page(page);
        }
        self
    }

    pub fn last_page(&mut self) -> &mut Self {
        if self.can_next_page() {
            let page = self.page_count() - 1;
            self.go_to_page(page);
        }
        self
    }

    /// Move to the next allowed page size and back to the first page.
    ///
    pub fn cycle_page_size(&mut self) -> &mut Self {
        let next = PAGE_SIZES
            .iter()
            .position(|size| *size == self.view.page_size())
            .map(|i| PAGE_SIZES[(i + 1) % PAGE_SIZES.len()])
            .unwrap_or(PAGE_SIZES[0]);
        self.view.set_page_size(next);
        self.go_to_page(0)
    }

    // ---- Theme, log and status ----

    pub fn toggle_dark_mode(&mut self) -> &mut Self {
        let dark_mode = !self.view.dark_mode();
        self.view.set_dark_mode(dark_mode);
        self
    }

    pub fn get_theme(&self) -> &Theme {
        if self.view.dark_mode() {
            &self.dark_theme
        } else {
            &self.light_theme
        }
    }

    pub fn toggle_log(&mut self) -> &mut Self {
        self.log_visible = !self.log_visible;
        self
    }

    pub fn is_log_visible(&self) -> bool {
        self.log_visible
    }

    pub fn log_entries(&self) -> Vec<String> {
        self.log.entries()
    }

    pub fn set_status_message(&mut self, message: String) -> &mut Self {
        self.status_message = Some(message);
        self
    }

    pub fn status_message(&self) -> Option<&str> {
        self.status_message.as_deref()
    }

    /// Advance the spinner and settle a pending search.
    ///
    pub fn tick(&mut self) -> &mut Self {
        self.spinner_index = (self.spinner_index + 1) % SPINNER_FRAME_COUNT;
        self.settle_search(Instant::now())
    }

    pub fn get_spinner_index(&self) -> usize {
        self.spinner_index
    }

    /// Dispatches an asynchronous network event.
    ///
    pub fn dispatch(&self, event: NetworkEvent) {
        if let Some(net_sender) = &self.net_sender {
            if let Err(err) = net_sender.send(event) {
                error!("Received error from network dispatch: {}", err);
            }
        }
    }
}
