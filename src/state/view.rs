//! Persisted view state.
//!
//! Each field of `ViewState` is an independent `Slice` stored under its own
//! key. `ViewStore::view_state` composes the slices; `ViewStore::apply`
//! writes only the fields present in a `ViewStateUpdate`. No validation
//! happens here.

use super::storage::Storage;
use crate::issues::{Issue, IssueField};
use log::*;
use serde::{de::DeserializeOwned, Deserialize, Serialize};

pub const SEARCH_KEY: &str = "issues-search";
pub const SORT_FIELD_KEY: &str = "issues-sort-field";
pub const SORT_DIRECTION_KEY: &str = "issues-sort-direction";
pub const FILTERS_KEY: &str = "issues-filters";
pub const GROUP_BY_KEY: &str = "issues-groupBy";
pub const PAGE_KEY: &str = "issues-page";
pub const PAGE_SIZE_KEY: &str = "issues-pageSize";
pub const OPEN_ISSUE_ID_KEY: &str = "issues-openIssueId";
pub const DARK_MODE_KEY: &str = "dark-mode";

/// Page sizes offered by the pagination controls.
pub const PAGE_SIZES: [usize; 5] = [10, 20, 30, 40, 50];
pub const DEFAULT_PAGE_SIZE: usize = 10;

/// Specifying sort direction.
///
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

/// Specifying the filterable issue attributes, in popover order.
///
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FilterCategory {
    Status,
    Priority,
    Project,
    Assignee,
    Cycle,
}

impl FilterCategory {
    pub const ALL: [FilterCategory; 5] = [
        FilterCategory::Status,
        FilterCategory::Priority,
        FilterCategory::Project,
        FilterCategory::Assignee,
        FilterCategory::Cycle,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            FilterCategory::Status => "Status",
            FilterCategory::Priority => "Priority",
            FilterCategory::Project => "Project",
            FilterCategory::Assignee => "Assignee",
            FilterCategory::Cycle => "Cycle",
        }
    }

    /// The issue attribute this category filters on.
    ///
    pub fn value_of<'a>(&self, issue: &'a Issue) -> &'a str {
        match self {
            FilterCategory::Status => &issue.status,
            FilterCategory::Priority => &issue.priority,
            FilterCategory::Project => &issue.project,
            FilterCategory::Assignee => &issue.assignee,
            FilterCategory::Cycle => &issue.cycle,
        }
    }

    pub fn next(&self) -> FilterCategory {
        let index = FilterCategory::ALL
            .iter()
            .position(|c| c == self)
            .unwrap_or(0);
        FilterCategory::ALL[(index + 1) % FilterCategory::ALL.len()]
    }
}

/// Accepted values per filter category. An empty set accepts everything.
///
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Filters {
    pub status: Vec<String>,
    pub project: Vec<String>,
    pub priority: Vec<String>,
    pub assignee: Vec<String>,
    pub cycle: Vec<String>,
}

impl Filters {
    pub fn get(&self, category: FilterCategory) -> &[String] {
        match category {
            FilterCategory::Status => &self.status,
            FilterCategory::Project => &self.project,
            FilterCategory::Priority => &self.priority,
            FilterCategory::Assignee => &self.assignee,
            FilterCategory::Cycle => &self.cycle,
        }
    }

    fn get_mut(&mut self, category: FilterCategory) -> &mut Vec<String> {
        match category {
            FilterCategory::Status => &mut self.status,
            FilterCategory::Project => &mut self.project,
            FilterCategory::Priority => &mut self.priority,
            FilterCategory::Assignee => &mut self.assignee,
            FilterCategory::Cycle => &mut self.cycle,
        }
    }

    /// Add `value` to the category's accepted set, or remove it if present.
    ///
    pub fn toggle(&mut self, category: FilterCategory, value: &str) {
        let values = self.get_mut(category);
        match values.iter().position(|v| v == value) {
            Some(index) => {
                values.remove(index);
            }
            None => values.push(value.to_owned()),
        }
    }

    pub fn clear(&mut self, category: FilterCategory) {
        self.get_mut(category).clear();
    }

    /// Whether no category restricts the issues.
    ///
    pub fn is_empty(&self) -> bool {
        FilterCategory::ALL.iter().all(|c| self.get(*c).is_empty())
    }
}

/// Aggregate of every view state slice.
///
#[derive(Clone, Debug, PartialEq)]
pub struct ViewState {
    pub search: String,
    pub sort_field: Option<IssueField>,
    pub sort_direction: SortDirection,
    pub filters: Filters,
    pub group_by: Option<IssueField>,
    pub page: usize,
    pub page_size: usize,
    pub open_issue_id: Option<String>,
}

impl Default for ViewState {
    fn default() -> Self {
        ViewState {
            search: String::new(),
            sort_field: None,
            sort_direction: SortDirection::Asc,
            filters: Filters::default(),
            group_by: None,
            page: 0,
            page_size: DEFAULT_PAGE_SIZE,
            open_issue_id: None,
        }
    }
}

/// Partial view state write. `None` leaves the slice untouched; nullable
/// slices take `Some(None)` to clear.
///
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ViewStateUpdate {
    pub search: Option<String>,
    pub sort_field: Option<Option<IssueField>>,
    pub sort_direction: Option<SortDirection>,
    pub filters: Option<Filters>,
    pub group_by: Option<Option<IssueField>>,
    pub page: Option<usize>,
    pub page_size: Option<usize>,
    pub open_issue_id: Option<Option<String>>,
}

/// One persisted value, stored as JSON under a fixed key.
///
#[derive(Debug)]
pub struct Slice<T> {
    key: &'static str,
    default: T,
    value: T,
}

impl<T: Clone + Serialize + DeserializeOwned> Slice<T> {
    /// Load the slice, falling back to `default` when the key is absent or
    /// its value does not decode.
    ///
    pub fn load(key: &'static str, default: T, storage: &dyn Storage) -> Self {
        let value = match storage.get(key) {
            Some(raw) => match serde_json::from_str(&raw) {
                Ok(value) => value,
                Err(e) => {
                    warn!("Discarding malformed value for '{}': {}", key, e);
                    default.clone()
                }
            },
            None => default.clone(),
        };
        Slice {
            key,
            default,
            value,
        }
    }

    pub fn get(&self) -> &T {
        &self.value
    }

    /// Update the value and write it through. A failed write is logged; the
    /// in-memory value still changes.
    ///
    pub fn set(&mut self, storage: &mut dyn Storage, value: T) {
        self.value = value;
        let result = serde_json::to_string(&self.value)
            .map_err(|e| super::StateError::EncodeFailed {
                key: self.key.to_owned(),
                source: e,
            })
            .and_then(|raw| storage.set(self.key, raw));
        if let Err(e) = result {
            error!("Failed to persist '{}': {}", self.key, e);
        }
    }

    fn reset(&mut self) {
        self.value = self.default.clone();
    }
}

/// Houses every view state slice plus the theme flag.
///
pub struct ViewStore {
    storage: Box<dyn Storage>,
    search: Slice<String>,
    sort_field: Slice<Option<IssueField>>,
    sort_direction: Slice<SortDirection>,
    filters: Slice<Filters>,
    group_by: Slice<Option<IssueField>>,
    page: Slice<usize>,
    page_size: Slice<usize>,
    open_issue_id: Slice<Option<String>>,
    dark_mode: Slice<bool>,
}

impl ViewStore {
    /// Load every slice from storage.
    ///
    pub fn load(storage: Box<dyn Storage>) -> Self {
        let defaults = ViewState::default();
        let s = storage.as_ref();
        ViewStore {
            search: Slice::load(SEARCH_KEY, defaults.search, s),
            sort_field: Slice::load(SORT_FIELD_KEY, defaults.sort_field, s),
            sort_direction: Slice::load(SORT_DIRECTION_KEY, defaults.sort_direction, s),
            filters: Slice::load(FILTERS_KEY, defaults.filters, s),
            group_by: Slice::load(GROUP_BY_KEY, defaults.group_by, s),
            page: Slice::load(PAGE_KEY, defaults.page, s),
            page_size: Slice::load(PAGE_SIZE_KEY, defaults.page_size, s),
            open_issue_id: Slice::load(OPEN_ISSUE_ID_KEY, defaults.open_issue_id, s),
            dark_mode: Slice::load(DARK_MODE_KEY, false, s),
            storage,
        }
    }

    pub fn search(&self) -> &str {
        self.search.get()
    }

    pub fn set_search(&mut self, search: String) {
        self.search.set(self.storage.as_mut(), search);
    }

    pub fn sort_field(&self) -> Option<IssueField> {
        *self.sort_field.get()
    }

    pub fn set_sort_field(&mut self, field: Option<IssueField>) {
        self.sort_field.set(self.storage.as_mut(), field);
    }

    pub fn sort_direction(&self) -> SortDirection {
        *self.sort_direction.get()
    }

    pub fn set_sort_direction(&mut self, direction: SortDirection) {
        self.sort_direction.set(self.storage.as_mut(), direction);
    }

    pub fn filters(&self) -> &Filters {
        self.filters.get()
    }

    pub fn set_filters(&mut self, filters: Filters) {
        self.filters.set(self.storage.as_mut(), filters);
    }

    pub fn group_by(&self) -> Option<IssueField> {
        *self.group_by.get()
    }

    pub fn set_group_by(&mut self, field: Option<IssueField>) {
        self.group_by.set(self.storage.as_mut(), field);
    }

    pub fn page(&self) -> usize {
        *self.page.get()
    }

    pub fn set_page(&mut self, page: usize) {
        self.page.set(self.storage.as_mut(), page);
    }

    pub fn page_size(&self) -> usize {
        *self.page_size.get()
    }

    pub fn set_page_size(&mut self, page_size: usize) {
        self.page_size.set(self.storage.as_mut(), page_size);
    }

    pub fn open_issue_id(&self) -> Option<&str> {
        self.open_issue_id.get().as_deref()
    }

    pub fn set_open_issue_id(&mut self, identifier: Option<String>) {
        self.open_issue_id.set(self.storage.as_mut(), identifier);
    }

    pub fn dark_mode(&self) -> bool {
        *self.dark_mode.get()
    }

    pub fn set_dark_mode(&mut self, dark_mode: bool) {
        self.dark_mode.set(self.storage.as_mut(), dark_mode);
    }

    /// Compose the slices into one value.
    ///
    pub fn view_state(&self) -> ViewState {
        ViewState {
            search: self.search.get().clone(),
            sort_field: self.sort_field(),
            sort_direction: self.sort_direction(),
            filters: self.filters.get().clone(),
            group_by: self.group_by(),
            page: self.page(),
            page_size: self.page_size(),
            open_issue_id: self.open_issue_id.get().clone(),
        }
    }

    /// Write the fields present in `update`, and only those.
    ///
    pub fn apply(&mut self, update: ViewStateUpdate) {
        if let Some(search) = update.search {
            self.set_search(search);
        }
        if let Some(field) = update.sort_field {
            self.set_sort_field(field);
        }
        if let Some(direction) = update.sort_direction {
            self.set_sort_direction(direction);
        }
        if let Some(filters) = update.filters {
            self.set_filters(filters);
        }
        if let Some(field) = update.group_by {
            self.set_group_by(field);
        }
        if let Some(page) = update.page {
            self.set_page(page);
        }
        if let Some(page_size) = update.page_size {
            self.set_page_size(page_size);
        }
        if let Some(identifier) = update.open_issue_id {
            self.set_open_issue_id(identifier);
        }
    }

    /// Forget all persisted state and return every slice to its default.
    ///
    pub fn reset(&mut self) {
        if let Err(e) = self.storage.clear() {
            error!("Failed to clear view state: {}", e);
        }
        self.search.reset();
        self.sort_field.reset();
        self.sort_direction.reset();
        self.filters.reset();
        self.group_by.reset();
        self.page.reset();
        self.page_size.reset();
        self.open_issue_id.reset();
        self.dark_mode.reset();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::MemoryStorage;

    fn store(storage: &MemoryStorage) -> ViewStore {
        ViewStore::load(Box::new(storage.clone()))
    }

    #[test]
    fn defaults_without_persisted_data() {
        let storage = MemoryStorage::new();
        let store = store(&storage);
        assert_eq!(store.view_state(), ViewState::default());
        assert_eq!(store.page_size(), 10);
        assert!(!store.dark_mode());
    }

    #[test]
    fn every_slice_round_trips_across_reload() {
        let storage = MemoryStorage::new();
        let mut first = store(&storage);
        let state = ViewState {
            search: "login".to_string(),
            sort_field: Some(IssueField::DueDate),
            sort_direction: SortDirection::Desc,
            filters: Filters {
                status: vec!["Done".to_string()],
                cycle: vec!["Cycle 14".to_string(), "Cycle 15".to_string()],
                ..Filters::default()
            },
            group_by: Some(IssueField::Assignee),
            page: 2,
            page_size: 30,
            open_issue_id: Some("ENG-42".to_string()),
        };
        first.apply(ViewStateUpdate {
            search: Some(state.search.clone()),
            sort_field: Some(state.sort_field),
            sort_direction: Some(state.sort_direction),
            filters: Some(state.filters.clone()),
            group_by: Some(state.group_by),
            page: Some(state.page),
            page_size: Some(state.page_size),
            open_issue_id: Some(state.open_issue_id.clone()),
        });
        first.set_dark_mode(true);
        assert_eq!(first.view_state(), state);
        drop(first);

        let reloaded = store(&storage);
        assert_eq!(reloaded.view_state(), state);
        assert!(reloaded.dark_mode());
    }

    #[test]
    fn partial_update_leaves_other_slices_alone() {
        let storage = MemoryStorage::new();
        let mut store = store(&storage);
        store.set_search("crash".to_string());
        store.set_page(3);
        let before = store.view_state();

        store.apply(ViewStateUpdate {
            group_by: Some(Some(IssueField::Status)),
            ..ViewStateUpdate::default()
        });

        let after = store.view_state();
        assert_eq!(after.group_by, Some(IssueField::Status));
        assert_eq!(
            ViewState {
                group_by: before.group_by,
                ..after.clone()
            },
            before
        );
        assert_eq!(storage.get(SORT_FIELD_KEY), None);
    }

    #[test]
    fn nullable_slice_clears_with_some_none() {
        let storage = MemoryStorage::new();
        let mut store = store(&storage);
        store.set_open_issue_id(Some("ENG-1".to_string()));
        store.apply(ViewStateUpdate {
            open_issue_id: Some(None),
            ..ViewStateUpdate::default()
        });
        assert_eq!(store.open_issue_id(), None);
        assert_eq!(storage.get(OPEN_ISSUE_ID_KEY).as_deref(), Some("null"));
    }

    #[test]
    fn malformed_slice_falls_back_to_default_only_for_that_slice() {
        let mut storage = MemoryStorage::new();
        storage.set(PAGE_KEY, "\"not a number\"".to_string()).unwrap();
        storage.set(SORT_FIELD_KEY, "\"bogus\"".to_string()).unwrap();
        storage.set(SEARCH_KEY, "\"kept\"".to_string()).unwrap();
        let store = store(&storage);
        assert_eq!(store.page(), 0);
        assert_eq!(store.sort_field(), None);
        assert_eq!(store.search(), "kept");
    }

    #[test]
    fn values_are_json_encoded_under_stable_keys() {
        let storage = MemoryStorage::new();
        let mut store = store(&storage);
        store.set_sort_direction(SortDirection::Desc);
        store.set_sort_field(Some(IssueField::Estimate));
        store.set_filters(Filters::default());
        assert_eq!(storage.get(SORT_DIRECTION_KEY).as_deref(), Some("\"desc\""));
        assert_eq!(storage.get(SORT_FIELD_KEY).as_deref(), Some("\"estimate\""));
        assert_eq!(
            storage.get(FILTERS_KEY).as_deref(),
            Some(r#"{"status":[],"project":[],"priority":[],"assignee":[],"cycle":[]}"#)
        );
    }

    #[test]
    fn partial_filters_object_loads_with_defaults() {
        let mut storage = MemoryStorage::new();
        storage
            .set(FILTERS_KEY, r#"{"status":["Todo"]}"#.to_string())
            .unwrap();
        let store = store(&storage);
        assert_eq!(store.filters().status, vec!["Todo".to_string()]);
        assert!(store.filters().cycle.is_empty());
    }

    #[test]
    fn reset_restores_defaults() {
        let storage = MemoryStorage::new();
        let mut store = store(&storage);
        store.set_page(5);
        store.set_dark_mode(true);
        store.reset();
        assert_eq!(store.view_state(), ViewState::default());
        assert_eq!(storage.get(PAGE_KEY), None);
    }

    #[test]
    fn filters_toggle_and_clear() {
        let mut filters = Filters::default();
        filters.toggle(FilterCategory::Priority, "High");
        filters.toggle(FilterCategory::Priority, "Low");
        assert_eq!(filters.priority, vec!["High", "Low"]);
        filters.toggle(FilterCategory::Priority, "High");
        assert_eq!(filters.priority, vec!["Low"]);
        assert!(!filters.is_empty());
        filters.clear(FilterCategory::Priority);
        assert!(filters.is_empty());
    }

    #[test]
    fn filter_category_cycles() {
        assert_eq!(FilterCategory::Status.next(), FilterCategory::Priority);
        assert_eq!(FilterCategory::Cycle.next(), FilterCategory::Status);
    }
}
