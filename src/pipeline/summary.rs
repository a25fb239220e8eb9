use crate::issues::Issue;
use crate::state::FilterCategory;

/// Distinct values per filter category, in order of first occurrence.
///
#[derive(Debug, Default, PartialEq)]
pub struct FilterOptions {
    pub status: Vec<String>,
    pub project: Vec<String>,
    pub priority: Vec<String>,
    pub assignee: Vec<String>,
    pub cycle: Vec<String>,
}

impl FilterOptions {
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
}

/// Collect the values offered in each filter popover.
///
pub fn filter_options(issues: &[Issue]) -> FilterOptions {
    let mut options = FilterOptions::default();
    for issue in issues {
        for category in FilterCategory::ALL {
            let value = category.value_of(issue);
            let values = options.get_mut(category);
            if !values.iter().any(|v| v == value) {
                values.push(value.to_string());
            }
        }
    }
    options
}

/// Headline counts shown above the table.
///
#[derive(Debug, Default, PartialEq, Eq)]
pub struct Stats {
    pub total: usize,
    pub in_progress: usize,
    pub done: usize,
    pub urgent: usize,
}

impl Stats {
    pub fn from_issues(issues: &[Issue]) -> Self {
        Stats {
            total: issues.len(),
            in_progress: issues.iter().filter(|i| i.status == "In Progress").count(),
            done: issues.iter().filter(|i| i.status == "Done").count(),
            urgent: issues.iter().filter(|i| i.priority == "Urgent").count(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::issues::tests::issue;

    #[test]
    fn options_are_distinct_in_first_occurrence_order() {
        let mut issues = vec![issue("ENG-1"), issue("ENG-2"), issue("ENG-3")];
        issues[0].status = "Done".to_string();
        issues[1].status = "Todo".to_string();
        issues[2].status = "Done".to_string();
        let options = filter_options(&issues);
        assert_eq!(options.get(FilterCategory::Status), ["Done", "Todo"]);
        assert!(options.get(FilterCategory::Cycle).len() <= 3);
    }

    #[test]
    fn stats_count_statuses_and_urgency() {
        let mut issues = vec![issue("ENG-1"), issue("ENG-2"), issue("ENG-3")];
        issues[0].status = "In Progress".to_string();
        issues[1].status = "Done".to_string();
        issues[2].status = "Done".to_string();
        issues[2].priority = "Urgent".to_string();
        issues[0].priority = "Low".to_string();
        issues[1].priority = "Low".to_string();
        assert_eq!(
            Stats::from_issues(&issues),
            Stats {
                total: 3,
                in_progress: 1,
                done: 2,
                urgent: 1,
            }
        );
    }
}
