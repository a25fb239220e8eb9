//! Issue records and the sources that serve them.
//!
//! Issues are read-only for the lifetime of the session. A source returns the
//! full ordered collection; the data layer caches whatever it returns.

mod error;
mod field;
mod source;

pub use error::StoreError;
pub use field::{FieldValue, IssueField};
pub use source::{decode_issues, AnySource, FixtureSource, HttpSource, IssueSource};

use chrono::{DateTime, Utc};
use fake::Dummy;
use serde::{Deserialize, Serialize};

/// Defines issue data structure.
///
#[derive(Clone, Debug, Dummy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Issue {
    pub identifier: String,
    pub title: String,
    pub description: String,
    pub status: String,
    pub priority: String,
    pub assignee: String,
    pub project: String,
    pub cycle: String,
    #[serde(default)]
    pub labels: Vec<String>,
    pub due_date: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub estimate: f64,
}

impl Issue {
    /// Initials of the assignee, e.g. "AC" for "Alice Chen".
    ///
    pub fn assignee_initials(&self) -> String {
        self.assignee
            .split_whitespace()
            .filter_map(|part| part.chars().next())
            .collect()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use fake::{Fake, Faker};

    /// Build an issue with the given identifier and otherwise arbitrary data.
    ///
    pub(crate) fn issue(identifier: &str) -> Issue {
        Issue {
            identifier: identifier.to_string(),
            ..Faker.fake::<Issue>()
        }
    }

    #[test]
    fn deserializes_camel_case_fixture_record() {
        let json = r#"{
            "identifier": "ENG-7",
            "title": "Fix login",
            "description": "Users loop on the login page",
            "status": "In Progress",
            "priority": "High",
            "assignee": "Alice Chen",
            "project": "Web App",
            "cycle": "Cycle 14",
            "labels": ["bug"],
            "dueDate": "2024-10-01T00:00:00Z",
            "createdAt": "2024-03-05T14:41:00Z",
            "updatedAt": "2024-07-03T16:06:00Z",
            "estimate": 3
        }"#;
        let issue: Issue = serde_json::from_str(json).unwrap();
        assert_eq!(issue.identifier, "ENG-7");
        assert_eq!(issue.status, "In Progress");
        assert_eq!(issue.labels, vec!["bug".to_string()]);
        assert_eq!(issue.estimate, 3.0);
    }

    #[test]
    fn missing_labels_default_to_empty() {
        let json = r#"{
            "identifier": "ENG-8", "title": "t", "description": "d",
            "status": "Todo", "priority": "Low", "assignee": "Bob Martinez",
            "project": "API Platform", "cycle": "Cycle 12",
            "dueDate": "2024-10-01T00:00:00Z",
            "createdAt": "2024-03-05T14:41:00Z",
            "updatedAt": "2024-07-03T16:06:00Z",
            "estimate": 0.5
        }"#;
        let issue: Issue = serde_json::from_str(json).unwrap();
        assert!(issue.labels.is_empty());
    }

    #[test]
    fn assignee_initials() {
        let mut issue = issue("ENG-1");
        issue.assignee = "Carol Nguyen".to_string();
        assert_eq!(issue.assignee_initials(), "CN");
    }
}
