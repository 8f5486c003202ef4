//! Round trips that keep a task's estimate fields consistent with the
//! external tracker.
//!
//! Both workflows raise the task's refreshing flag, run against the tracker
//! outside the store's synchronous transition model, and re-enter the task
//! slice with an ordinary command when they complete. Completions tolerate
//! the task having been deleted meanwhile (the store ignores unknown
//! cuids), and nothing here de-duplicates overlapping refreshes for the
//! same task — the last completion wins.

use tracing::{debug, warn};

use crate::model::Issue;
use crate::store::TaskListState;
use crate::tracker::client::{IssueTracker, TrackerError};

/// Failure of an estimate round trip. The workflow never retries; callers
/// decide whether and when to.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RefreshError {
    #[error(transparent)]
    Tracker(#[from] TrackerError),
}

/// Fetch the latest issue snapshot for a task and commit it.
///
/// On failure only the refreshing flag is cleared; the stale issue data
/// stays in place.
pub fn refresh_issue(
    tasks: &mut TaskListState,
    tracker: &impl IssueTracker,
    task_cuid: &str,
    issue_key: &str,
) -> Result<Issue, RefreshError> {
    tasks.set_issue_refreshing(task_cuid, true);

    match tracker.fetch_issue(issue_key) {
        Ok(issue) => {
            debug!(issue = %issue_key, "committing refreshed issue");
            tasks.commit_issue(task_cuid, issue.clone());
            Ok(issue)
        }
        Err(err) => {
            warn!(issue = %issue_key, error = %err, "issue refresh failed");
            tasks.set_issue_refreshing(task_cuid, false);
            Err(err.into())
        }
    }
}

/// Commit a locally edited remaining estimate, then mirror it back to the
/// tracker.
///
/// The fetched snapshot is always one round trip behind a fresh local
/// edit, so the submitted remaining estimate is overlaid on it before the
/// commit. The write-back re-sends the original estimate obtained by the
/// fetch (see [`IssueTracker::write_remaining_estimate`]).
pub fn update_remaining_estimate(
    tasks: &mut TaskListState,
    tracker: &impl IssueTracker,
    task_cuid: &str,
    issue_key: &str,
    remaining: &str,
) -> Result<(), RefreshError> {
    tasks.set_issue_refreshing(task_cuid, true);

    let mut issue = match tracker.fetch_issue(issue_key) {
        Ok(issue) => issue,
        Err(err) => {
            warn!(issue = %issue_key, error = %err, "estimate refresh fetch failed");
            tasks.set_issue_refreshing(task_cuid, false);
            return Err(err.into());
        }
    };

    issue.fields.timetracking.remaining_estimate = Some(remaining.to_string());
    let original = issue.fields.timetracking.original_estimate.clone();
    tasks.commit_issue(task_cuid, issue);

    tracker.write_remaining_estimate(issue_key, remaining, original.as_deref())?;
    Ok(())
}
