use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::time;

use super::task::Task;

/// Generate a fresh collision-resistant id for records and tasks.
pub fn new_cuid() -> String {
    format!("c{}", uuid::Uuid::new_v4().simple())
}

/// A single span of worked time, optionally attributed to a task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Record {
    /// Unique, immutable identity.
    pub cuid: String,
    /// Owning task, if the record has been attributed to one.
    #[serde(default)]
    pub task_cuid: Option<String>,
    /// External issue key cached for display.
    #[serde(default)]
    pub task_issue_key: Option<String>,
    pub start_time: DateTime<Utc>,
    /// Absent while the record is still running.
    #[serde(default)]
    pub end_time: Option<DateTime<Utc>>,
    /// Derived display string, recomputed on every date-affecting change.
    #[serde(default)]
    pub elapsed_time: String,
    /// Free text; also the input to the split mini-language.
    #[serde(default)]
    pub comment: String,
    /// Raised by the sync layer while the record is being uploaded.
    #[serde(default)]
    pub syncing: bool,
    /// Drag-in-progress flag.
    #[serde(default)]
    pub moving: bool,
    /// Candidate drop target while dragging; independent of the committed
    /// `task_cuid`.
    #[serde(default)]
    pub task_droppable_cuid: Option<String>,
    pub created_time: DateTime<Utc>,
}

impl Record {
    /// A fresh running record bound to `task`, starting on the minute.
    pub fn started(task: &Task, now: DateTime<Utc>) -> Record {
        let start_time = time::round_to_minute(now);
        Record {
            cuid: new_cuid(),
            task_cuid: Some(task.cuid.clone()),
            task_issue_key: task.issue_key().map(str::to_string),
            start_time,
            end_time: None,
            elapsed_time: time::format_elapsed(start_time, start_time),
            comment: String::new(),
            syncing: false,
            moving: false,
            task_droppable_cuid: None,
            created_time: now,
        }
    }

    /// Whether the record is still running (no end time).
    pub fn is_active(&self) -> bool {
        self.end_time.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_started_record_is_active_and_on_the_minute() {
        let task = Task::linked("WEB-7");
        let now = Utc.with_ymd_and_hms(2020, 1, 1, 9, 0, 20).unwrap();
        let record = Record::started(&task, now);

        assert!(record.is_active());
        assert_eq!(record.task_cuid.as_deref(), Some(task.cuid.as_str()));
        assert_eq!(record.task_issue_key.as_deref(), Some("WEB-7"));
        assert_eq!(
            record.start_time,
            Utc.with_ymd_and_hms(2020, 1, 1, 9, 0, 0).unwrap()
        );
        assert_eq!(record.elapsed_time, "0m");
        assert_eq!(record.created_time, now);
    }

    #[test]
    fn test_started_records_get_unique_cuids() {
        let task = Task::new();
        let now = Utc::now();
        let a = Record::started(&task, now);
        let b = Record::started(&task, now);
        assert_ne!(a.cuid, b.cuid);
    }

    #[test]
    fn test_record_snapshot_round_trip() {
        let task = Task::linked("WEB-7");
        let now = Utc.with_ymd_and_hms(2020, 1, 1, 9, 0, 0).unwrap();
        let record = Record::started(&task, now);

        let json = serde_json::to_string(&record).unwrap();
        assert!(json.contains("\"taskIssueKey\""), "snapshot keys are camelCase");
        let back: Record = serde_json::from_str(&json).unwrap();
        assert_eq!(back, record);
    }
}
