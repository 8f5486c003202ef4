use serde::{Deserialize, Serialize};

use super::record::new_cuid;

/// A unit of work, generally mirroring an external issue-tracker item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    /// Unique, immutable identity.
    pub cuid: String,
    /// External issue snapshot; absent for purely local tasks.
    #[serde(default)]
    pub issue: Option<Issue>,
    /// True while a tracker round trip for this task is in flight.
    #[serde(default)]
    pub issue_refreshing: bool,
}

impl Task {
    /// A local task with no linked issue.
    pub fn new() -> Task {
        Task {
            cuid: new_cuid(),
            issue: None,
            issue_refreshing: false,
        }
    }

    /// A task linked to an external issue by key. The remaining fields are
    /// filled in by the first refresh round trip.
    pub fn linked(issue_key: &str) -> Task {
        Task {
            cuid: new_cuid(),
            issue: Some(Issue {
                key: issue_key.to_string(),
                fields: IssueFields::default(),
            }),
            issue_refreshing: false,
        }
    }

    /// The linked issue key, if any.
    pub fn issue_key(&self) -> Option<&str> {
        self.issue.as_ref().map(|issue| issue.key.as_str())
    }
}

impl Default for Task {
    fn default() -> Task {
        Task::new()
    }
}

/// External issue representation, shaped like the tracker's JSON.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct Issue {
    pub key: String,
    #[serde(default)]
    pub fields: IssueFields,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct IssueFields {
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub status: Option<IssueStatus>,
    #[serde(default)]
    pub timetracking: TimeTracking,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssueStatus {
    pub name: String,
}

/// The tracker's estimate fields, kept in its own duration-string format
/// (e.g. `"2h"`, `"1d 4h"`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct TimeTracking {
    #[serde(default)]
    pub original_estimate: Option<String>,
    #[serde(default)]
    pub remaining_estimate: Option<String>,
}
