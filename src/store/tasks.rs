use serde::{Deserialize, Serialize};

use crate::model::{Issue, Task};
use crate::store::events::DomainEvent;

/// The task collection slice. Single-writer like the recorder: every
/// method is one atomic transition, and unknown cuids are ignored so that
/// stale tracker completions can never fault.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TaskListState {
    #[serde(default)]
    pub tasks: Vec<Task>,
}

impl TaskListState {
    pub fn task(&self, cuid: &str) -> Option<&Task> {
        self.tasks.iter().find(|t| t.cuid == cuid)
    }

    fn task_mut(&mut self, cuid: &str) -> Option<&mut Task> {
        self.tasks.iter_mut().find(|t| t.cuid == cuid)
    }

    /// Append a task.
    pub fn add_task(&mut self, task: Task) {
        self.tasks.push(task);
    }

    /// Delete a task and announce the removal so dependent slices can
    /// react. The event is produced even when the task was already gone —
    /// dependents may still hold records pointing at the cuid.
    pub fn remove_task(&mut self, cuid: &str) -> DomainEvent {
        self.tasks.retain(|t| t.cuid != cuid);
        DomainEvent::TaskRemoved {
            cuid: cuid.to_string(),
        }
    }

    /// Toggle the in-flight flag for a tracker round trip.
    pub fn set_issue_refreshing(&mut self, cuid: &str, refreshing: bool) {
        if let Some(task) = self.task_mut(cuid) {
            task.issue_refreshing = refreshing;
        }
    }

    /// Commit a freshly fetched issue snapshot. Ends the round trip by
    /// clearing the refreshing flag in the same transition.
    pub fn commit_issue(&mut self, cuid: &str, issue: Issue) {
        if let Some(task) = self.task_mut(cuid) {
            task.issue = Some(issue);
            task.issue_refreshing = false;
        }
    }
}
