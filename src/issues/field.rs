use super::Issue;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Names one attribute of an issue. Serializes to the attribute's record
/// name, so persisted sort and group slices read like `"dueDate"`.
///
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum IssueField {
    Identifier,
    Title,
    Description,
    Status,
    Priority,
    Assignee,
    Project,
    Cycle,
    Labels,
    DueDate,
    CreatedAt,
    UpdatedAt,
    Estimate,
}

impl IssueField {
    pub const ALL: [IssueField; 13] = [
        IssueField::Identifier,
        IssueField::Title,
        IssueField::Description,
        IssueField::Status,
        IssueField::Priority,
        IssueField::Assignee,
        IssueField::Project,
        IssueField::Cycle,
        IssueField::Labels,
        IssueField::DueDate,
        IssueField::CreatedAt,
        IssueField::UpdatedAt,
        IssueField::Estimate,
    ];

    /// Record name of the attribute.
    ///
    pub fn name(&self) -> &'static str {
        match self {
            IssueField::Identifier => "identifier",
            IssueField::Title => "title",
            IssueField::Description => "description",
            IssueField::Status => "status",
            IssueField::Priority => "priority",
            IssueField::Assignee => "assignee",
            IssueField::Project => "project",
            IssueField::Cycle => "cycle",
            IssueField::Labels => "labels",
            IssueField::DueDate => "dueDate",
            IssueField::CreatedAt => "createdAt",
            IssueField::UpdatedAt => "updatedAt",
            IssueField::Estimate => "estimate",
        }
    }

    /// Look up a field by its record name.
    ///
    pub fn from_name(name: &str) -> Option<IssueField> {
        IssueField::ALL.into_iter().find(|field| field.name() == name)
    }

    /// Human-readable column label.
    ///
    pub fn label(&self) -> &'static str {
        match self {
            IssueField::Identifier => "ID",
            IssueField::Title => "Title",
            IssueField::Description => "Description",
            IssueField::Status => "Status",
            IssueField::Priority => "Priority",
            IssueField::Assignee => "Assignee",
            IssueField::Project => "Project",
            IssueField::Cycle => "Cycle",
            IssueField::Labels => "Labels",
            IssueField::DueDate => "Due Date",
            IssueField::CreatedAt => "Created",
            IssueField::UpdatedAt => "Updated",
            IssueField::Estimate => "Estimate",
        }
    }

    /// Extract this attribute's value from an issue.
    ///
    pub fn value(&self, issue: &Issue) -> FieldValue {
        match self {
            IssueField::Identifier => FieldValue::Text(issue.identifier.clone()),
            IssueField::Title => FieldValue::Text(issue.title.clone()),
            IssueField::Description => FieldValue::Text(issue.description.clone()),
            IssueField::Status => FieldValue::Text(issue.status.clone()),
            IssueField::Priority => FieldValue::Text(issue.priority.clone()),
            IssueField::Assignee => FieldValue::Text(issue.assignee.clone()),
            IssueField::Project => FieldValue::Text(issue.project.clone()),
            IssueField::Cycle => FieldValue::Text(issue.cycle.clone()),
            IssueField::Labels => FieldValue::List(issue.labels.clone()),
            IssueField::DueDate => FieldValue::Time(issue.due_date),
            IssueField::CreatedAt => FieldValue::Time(issue.created_at),
            IssueField::UpdatedAt => FieldValue::Time(issue.updated_at),
            IssueField::Estimate => FieldValue::Number(issue.estimate),
        }
    }
}

/// A single attribute value, ordered the way a plain less-than would order
/// it: text lexicographically, numbers numerically, times chronologically and
/// lists by their comma-joined text.
///
#[derive(Clone, Debug)]
pub enum FieldValue {
    Text(String),
    Number(f64),
    Time(DateTime<Utc>),
    List(Vec<String>),
}

impl FieldValue {
    /// Key under which this value is grouped and displayed.
    ///
    pub fn group_key(&self) -> String {
        match self {
            FieldValue::Text(text) => text.clone(),
            FieldValue::Number(number) => number.to_string(),
            FieldValue::Time(time) => time.format("%Y-%m-%d").to_string(),
            FieldValue::List(items) => items.join(","),
        }
    }

    fn rank(&self) -> u8 {
        match self {
            FieldValue::Text(_) => 0,
            FieldValue::Number(_) => 1,
            FieldValue::Time(_) => 2,
            FieldValue::List(_) => 3,
        }
    }
}

impl Ord for FieldValue {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (FieldValue::Text(a), FieldValue::Text(b)) => a.cmp(b),
            (FieldValue::Number(a), FieldValue::Number(b)) => a.total_cmp(b),
            (FieldValue::Time(a), FieldValue::Time(b)) => a.cmp(b),
            (FieldValue::List(a), FieldValue::List(b)) => a.join(",").cmp(&b.join(",")),
            // Values of one field always share a variant.
            _ => self.rank().cmp(&other.rank()),
        }
    }
}

impl PartialOrd for FieldValue {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for FieldValue {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for FieldValue {}
