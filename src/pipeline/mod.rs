//! Derived view pipeline.
//!
//! Pure functions over the issue collection: filter, sort, group, paginate.
//! Nothing here mutates its input, so the chain can be rerun whenever the
//! issues or the view state change.

mod summary;

pub use summary::{filter_options, FilterOptions, Stats};

use crate::issues::{FieldValue, Issue, IssueField};
use crate::state::{FilterCategory, Filters, SortDirection, ViewState};
use std::collections::HashMap;

/// Issues sharing one value of the grouping attribute.
///
#[derive(Debug, PartialEq)]
pub struct Group<'a> {
    pub key: String,
    pub issues: Vec<&'a Issue>,
}

/// Everything the table needs, computed from the issues and the view state.
///
#[derive(Debug)]
pub struct DerivedView<'a> {
    pub filtered: Vec<&'a Issue>,
    pub sorted: Vec<&'a Issue>,
    pub grouped: Option<Vec<Group<'a>>>,
    /// Rows of the current page. Empty while grouped; pages then apply
    /// within each expanded group.
    pub paginated: Vec<&'a Issue>,
    pub page_count: usize,
}

/// Keep issues matching the search text and every non-empty filter
/// category, in input order.
///
pub fn filter<'a>(issues: &'a [Issue], search: &str, filters: &Filters) -> Vec<&'a Issue> {
    let needle = search.to_lowercase();
    issues
        .iter()
        .filter(|issue| {
            needle.is_empty()
                || issue.title.to_lowercase().contains(&needle)
                || issue.identifier.to_lowercase().contains(&needle)
        })
        .filter(|issue| {
            FilterCategory::ALL.iter().all(|category| {
                let accepted = filters.get(*category);
                accepted.is_empty() || accepted.iter().any(|v| v == category.value_of(issue))
            })
        })
        .collect()
}

/// Order issues by `field`. Without a field the input order is kept.
///
pub fn sort<'a>(
    issues: Vec<&'a Issue>,
    field: Option<IssueField>,
    direction: SortDirection,
) -> Vec<&'a Issue> {
    let Some(field) = field else {
        return issues;
    };
    let mut keyed: Vec<(FieldValue, &'a Issue)> = issues
        .into_iter()
        .map(|issue| (field.value(issue), issue))
        .collect();
    keyed.sort_by(|(a, _), (b, _)| match direction {
        SortDirection::Asc => a.cmp(b),
        SortDirection::Desc => b.cmp(a),
    });
    keyed.into_iter().map(|(_, issue)| issue).collect()
}

/// Partition issues by `field`. Groups appear in order of first occurrence
/// and keep the input order within.
///
pub fn group<'a>(issues: &[&'a Issue], field: IssueField) -> Vec<Group<'a>> {
    let mut groups: Vec<Group<'a>> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();
    for issue in issues {
        let key = field.value(issue).group_key();
        match index.get(&key) {
            Some(&position) => groups[position].issues.push(issue),
            None => {
                index.insert(key.clone(), groups.len());
                groups.push(Group {
                    key,
                    issues: vec![issue],
                });
            }
        }
    }
    groups
}

/// Return page `page` of `items`. Pages past the end are empty.
///
pub fn paginate<T>(items: &[T], page: usize, page_size: usize) -> &[T] {
    let Some(start) = page.checked_mul(page_size) else {
        return &[];
    };
    if start >= items.len() {
        return &[];
    }
    let end = start.saturating_add(page_size).min(items.len());
    &items[start..end]
}

/// Number of pages needed for `len` items; zero for an empty list.
///
pub fn page_count(len: usize, page_size: usize) -> usize {
    if page_size == 0 {
        return 0;
    }
    len.div_ceil(page_size)
}

/// Run the whole pipeline. `search` is passed separately so callers can
/// feed a debounced copy of the search slice.
///
pub fn derive<'a>(issues: &'a [Issue], view: &ViewState, search: &str) -> DerivedView<'a> {
    let filtered = filter(issues, search, &view.filters);
    let sorted = sort(filtered.clone(), view.sort_field, view.sort_direction);
    let page_count = page_count(filtered.len(), view.page_size);
    let (grouped, paginated) = match view.group_by {
        Some(field) => (Some(group(&sorted, field)), Vec::new()),
        None => (None, paginate(&sorted, view.page, view.page_size).to_vec()),
    };
    DerivedView {
        filtered,
        sorted,
        grouped,
        paginated,
        page_count,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::issues::tests::issue;
    use fake::{Fake, Faker};

    fn ids(issues: &[&Issue]) -> Vec<String> {
        issues.iter().map(|i| i.identifier.clone()).collect()
    }

    fn with_status(identifier: &str, status: &str) -> Issue {
        Issue {
            status: status.to_string(),
            ..issue(identifier)
        }
    }

    fn numbered(count: usize) -> Vec<Issue> {
        (1..=count).map(|n| issue(&format!("ENG-{}", n))).collect()
    }

    #[test]
    fn filter_by_status_preserves_order() {
        let issues = vec![
            with_status("ENG-1", "Todo"),
            with_status("ENG-2", "Done"),
            with_status("ENG-3", "Done"),
        ];
        let filters = Filters {
            status: vec!["Done".to_string()],
            ..Filters::default()
        };
        assert_eq!(ids(&filter(&issues, "", &filters)), vec!["ENG-2", "ENG-3"]);
    }

    #[test]
    fn search_matches_identifier_substring_case_insensitively() {
        let mut issues = vec![issue("ENG-1"), issue("ENG-10"), issue("ENG-2")];
        for issue in issues.iter_mut() {
            issue.title = "unrelated".to_string();
        }
        assert_eq!(
            ids(&filter(&issues, "eng-1", &Filters::default())),
            vec!["ENG-1", "ENG-10"]
        );
    }

    #[test]
    fn search_matches_title() {
        let mut issues = vec![issue("ENG-1"), issue("ENG-2")];
        issues[0].title = "Fix Login redirect".to_string();
        issues[1].title = "Other".to_string();
        assert_eq!(
            ids(&filter(&issues, "login", &Filters::default())),
            vec!["ENG-1"]
        );
    }

    #[test]
    fn categories_are_anded_values_are_ored() {
        let mut issues = vec![
            with_status("ENG-1", "Todo"),
            with_status("ENG-2", "Done"),
            with_status("ENG-3", "Backlog"),
        ];
        issues[0].priority = "High".to_string();
        issues[1].priority = "Low".to_string();
        issues[2].priority = "High".to_string();
        let filters = Filters {
            status: vec!["Todo".to_string(), "Done".to_string()],
            priority: vec!["High".to_string()],
            ..Filters::default()
        };
        assert_eq!(ids(&filter(&issues, "", &filters)), vec!["ENG-1"]);
    }

    #[test]
    fn filtered_result_is_ordered_subset_satisfying_predicates() {
        let issues: Vec<Issue> = (0..60).map(|_| Faker.fake::<Issue>()).collect();
        let filters = Filters {
            status: vec![issues[0].status.clone(), issues[1].status.clone()],
            cycle: vec![issues[0].cycle.clone()],
            ..Filters::default()
        };
        let filtered = filter(&issues, "", &filters);
        assert!(!filtered.is_empty());
        let mut cursor = 0;
        for kept in &filtered {
            assert!(filters.status.contains(&kept.status));
            assert!(filters.cycle.contains(&kept.cycle));
            let position = issues[cursor..]
                .iter()
                .position(|i| std::ptr::eq(i, *kept))
                .expect("filtered issue must come from the input in order");
            cursor += position + 1;
        }
    }

    #[test]
    fn empty_filters_keep_everything() {
        let issues: Vec<Issue> = (0..20).map(|_| Faker.fake::<Issue>()).collect();
        assert_eq!(filter(&issues, "", &Filters::default()).len(), issues.len());
    }

    #[test]
    fn unsorted_keeps_natural_order() {
        let issues = vec![issue("ENG-3"), issue("ENG-1"), issue("ENG-2")];
        let refs: Vec<&Issue> = issues.iter().collect();
        assert_eq!(
            ids(&sort(refs, None, SortDirection::Desc)),
            vec!["ENG-3", "ENG-1", "ENG-2"]
        );
    }

    #[test]
    fn sort_is_permutation_and_desc_reverses_unique_keys() {
        let issues: Vec<Issue> = (0..40).map(|_| Faker.fake::<Issue>()).collect();
        let refs: Vec<&Issue> = issues.iter().collect();

        let asc = sort(refs.clone(), Some(IssueField::CreatedAt), SortDirection::Asc);
        let desc = sort(refs.clone(), Some(IssueField::CreatedAt), SortDirection::Desc);
        assert_eq!(asc.len(), issues.len());
        for issue in &issues {
            assert!(asc.iter().any(|i| std::ptr::eq(*i, issue)));
        }

        let mut reversed = desc.clone();
        reversed.reverse();
        assert_eq!(ids(&asc), ids(&reversed));
    }

    #[test]
    fn sort_estimate_numerically() {
        let mut issues = vec![issue("ENG-1"), issue("ENG-2"), issue("ENG-3")];
        issues[0].estimate = 13.0;
        issues[1].estimate = 2.0;
        issues[2].estimate = 0.5;
        let refs: Vec<&Issue> = issues.iter().collect();
        assert_eq!(
            ids(&sort(refs, Some(IssueField::Estimate), SortDirection::Asc)),
            vec!["ENG-3", "ENG-2", "ENG-1"]
        );
    }

    #[test]
    fn group_partitions_in_first_occurrence_order() {
        let issues = vec![
            with_status("ENG-1", "Done"),
            with_status("ENG-2", "Todo"),
            with_status("ENG-3", "Done"),
            with_status("ENG-4", "Backlog"),
        ];
        let refs: Vec<&Issue> = issues.iter().collect();
        let groups = group(&refs, IssueField::Status);

        let keys: Vec<&str> = groups.iter().map(|g| g.key.as_str()).collect();
        assert_eq!(keys, vec!["Done", "Todo", "Backlog"]);
        assert_eq!(ids(&groups[0].issues), vec!["ENG-1", "ENG-3"]);

        let total: usize = groups.iter().map(|g| g.issues.len()).sum();
        assert_eq!(total, issues.len());
        for issue in &issues {
            let containing = groups
                .iter()
                .filter(|g| g.issues.iter().any(|i| std::ptr::eq(*i, issue)))
                .count();
            assert_eq!(containing, 1);
        }
    }

    #[test]
    fn pages_reconstruct_sequence() {
        let issues = numbered(25);
        let mut rebuilt = Vec::new();
        for page in 0..page_count(issues.len(), 10) {
            rebuilt.extend(paginate(&issues, page, 10).iter().cloned());
        }
        assert_eq!(rebuilt, issues);
    }

    #[test]
    fn page_sizes_for_twenty_five_issues() {
        let issues = numbered(25);
        assert_eq!(paginate(&issues, 0, 10).len(), 10);
        assert_eq!(paginate(&issues, 2, 10).len(), 5);
        assert_eq!(paginate(&issues, 3, 10).len(), 0);
        assert_eq!(paginate(&issues, usize::MAX, 10).len(), 0);
        assert_eq!(page_count(25, 10), 3);
        assert_eq!(page_count(0, 10), 0);
    }

    #[test]
    fn derive_out_of_range_page_is_empty() {
        let issues = numbered(5);
        let view = ViewState {
            page: 4,
            ..ViewState::default()
        };
        let derived = derive(&issues, &view, "");
        assert_eq!(derived.filtered.len(), 5);
        assert!(derived.paginated.is_empty());
        assert_eq!(derived.page_count, 1);
    }

    #[test]
    fn derive_grouped_leaves_paginated_empty() {
        let issues = vec![with_status("ENG-1", "Done"), with_status("ENG-2", "Todo")];
        let view = ViewState {
            group_by: Some(IssueField::Status),
            ..ViewState::default()
        };
        let derived = derive(&issues, &view, "");
        assert!(derived.paginated.is_empty());
        assert_eq!(derived.grouped.map(|g| g.len()), Some(2));
    }

    #[test]
    fn derive_uses_given_search_not_view_search() {
        let mut issues = vec![issue("ENG-1"), issue("ENG-2")];
        issues[0].title = "alpha".to_string();
        issues[1].title = "beta".to_string();
        let view = ViewState {
            search: "alpha".to_string(),
            ..ViewState::default()
        };
        assert_eq!(derive(&issues, &view, "").filtered.len(), 2);
        assert_eq!(derive(&issues, &view, "alpha").filtered.len(), 1);
    }
}
