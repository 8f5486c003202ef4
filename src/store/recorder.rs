use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::model::{Record, Task};
use crate::parse::worklog;
use crate::store::events::DomainEvent;
use crate::time;

/// Typed rejection reasons for [`RecorderState::split_record`]. Every
/// rejection leaves the store untouched.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SplitError {
    #[error("record not found: {0}")]
    RecordNotFound(String),
    #[error("record is still running and cannot be split")]
    RecordStillActive,
    #[error("comment has no split segments")]
    TooFewSegments,
    #[error("split segments cover {split_minutes}m but the record only spans {record_minutes}m")]
    DurationExceeded {
        split_minutes: i64,
        record_minutes: i64,
    },
}

/// The authoritative record collection plus the single started-task pointer.
///
/// Single-writer and synchronous: every method applies one atomic
/// transition, and the "at most one active record" invariant is enforced
/// here, never by callers. Methods addressing a record by cuid ignore
/// unknown ids — asynchronous completions may race with deletion, so a
/// missing id is never a fault.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecorderState {
    #[serde(default)]
    pub records: Vec<Record>,
    /// The currently started task, if recording.
    #[serde(default)]
    pub task: Option<Task>,
}

impl RecorderState {
    // ------------------------------------------------------------------
    // Lifecycle commands
    // ------------------------------------------------------------------

    /// Append a record without touching the active-record invariant. Used
    /// outside "start" semantics (manual backfill); the caller owns the
    /// invariant there.
    pub fn add_record(&mut self, task: Option<Task>, record: Option<Record>, now: DateTime<Utc>) {
        let task = task.unwrap_or_default();
        let record = record.unwrap_or_else(|| Record::started(&task, now));
        self.records.push(record);
    }

    /// Close any running record, then start a new one bound to `task` (a
    /// fresh local task when omitted) and point the store at that task.
    pub fn start_recording(
        &mut self,
        task: Option<Task>,
        record: Option<Record>,
        now: DateTime<Utc>,
    ) {
        self.close_active(now);

        let task = task.unwrap_or_default();
        let mut record = record.unwrap_or_else(|| Record::started(&task, now));
        record.elapsed_time = time::format_elapsed(record.start_time, record.start_time);
        self.records.push(record);
        self.task = Some(task);
    }

    /// Close the running record at `now` rounded to the nearest whole
    /// minute and clear the started-task pointer. No-op when nothing is
    /// recording.
    pub fn stop_recording(&mut self, now: DateTime<Utc>) {
        if self.active_record().is_none() {
            return;
        }
        self.close_active(now);
        self.task = None;
    }

    fn close_active(&mut self, now: DateTime<Utc>) {
        if let Some(record) = self.records.iter_mut().find(|r| r.is_active()) {
            let end = time::round_to_minute(now);
            record.end_time = Some(end);
            record.elapsed_time = time::format_elapsed(record.start_time, end);
        }
    }

    // ------------------------------------------------------------------
    // Field setters (no-op on unknown cuid)
    // ------------------------------------------------------------------

    fn record_mut(&mut self, cuid: &str) -> Option<&mut Record> {
        self.records.iter_mut().find(|r| r.cuid == cuid)
    }

    pub fn set_record_sync(&mut self, cuid: &str, syncing: bool) {
        if let Some(record) = self.record_mut(cuid) {
            record.syncing = syncing;
        }
    }

    /// Retime a record and recompute its elapsed display. A record left
    /// running (no end time) is measured against `now`; retiming a closed
    /// record must pass an end time, since reopening a second record while
    /// another runs would break the single-active invariant from outside.
    pub fn set_record_date(
        &mut self,
        cuid: &str,
        start: DateTime<Utc>,
        end: Option<DateTime<Utc>>,
        now: DateTime<Utc>,
    ) {
        if let Some(record) = self.record_mut(cuid) {
            record.start_time = start;
            record.end_time = end;
            record.elapsed_time = time::format_elapsed(start, end.unwrap_or(now));
        }
    }

    pub fn set_record_comment(&mut self, cuid: &str, comment: &str) {
        if let Some(record) = self.record_mut(cuid) {
            record.comment = comment.to_string();
        }
    }

    pub fn set_record_moving(&mut self, cuid: &str, moving: bool) {
        if let Some(record) = self.record_mut(cuid) {
            record.moving = moving;
        }
    }

    /// Record the candidate drop target while a drag hovers over a task.
    /// Repeatable and non-committing.
    pub fn set_record_move_target(&mut self, cuid: &str, task_cuid: Option<String>) {
        if let Some(record) = self.record_mut(cuid) {
            record.task_droppable_cuid = task_cuid;
        }
    }

    /// Commit a reassignment: new owning task plus cached issue key, and
    /// always clear the drag state in the same transition.
    pub fn set_record_task(&mut self, cuid: &str, task_cuid: &str, task_issue_key: Option<String>) {
        if let Some(record) = self.record_mut(cuid) {
            record.task_cuid = Some(task_cuid.to_string());
            record.task_issue_key = task_issue_key;
            record.moving = false;
            record.task_droppable_cuid = None;
        }
    }

    /// Abort a drag without reassigning: clears the same drag state a
    /// commit would, leaving ownership untouched.
    pub fn cancel_record_move(&mut self, cuid: &str) {
        if let Some(record) = self.record_mut(cuid) {
            record.moving = false;
            record.task_droppable_cuid = None;
        }
    }

    /// Recompute the elapsed display from the current start/end. A running
    /// record is measured against `now`; the periodic ticker outside this
    /// core calls this for re-display.
    pub fn update_record_elapsed(&mut self, cuid: &str, now: DateTime<Utc>) {
        if let Some(record) = self.record_mut(cuid) {
            record.elapsed_time =
                time::format_elapsed(record.start_time, record.end_time.unwrap_or(now));
        }
    }

    pub fn remove_record(&mut self, cuid: &str) {
        self.records.retain(|r| r.cuid != cuid);
    }

    // ------------------------------------------------------------------
    // Cross-slice reactions and snapshot replacement
    // ------------------------------------------------------------------

    /// React to a domain event from another slice. Task removal cascades:
    /// every record owned by the task goes with it, and a started-task
    /// pointer at that task is reset.
    pub fn handle_event(&mut self, event: &DomainEvent) {
        match event {
            DomainEvent::TaskRemoved { cuid } => {
                self.records
                    .retain(|r| r.task_cuid.as_deref() != Some(cuid.as_str()));
                if self.task.as_ref().is_some_and(|t| &t.cuid == cuid) {
                    self.task = None;
                }
            }
        }
    }

    /// Replace the whole slice with an externally supplied snapshot
    /// (cross-session sync). The source is trusted; nothing is validated.
    pub fn replace(&mut self, snapshot: RecorderState) {
        *self = snapshot;
    }

    // ------------------------------------------------------------------
    // Split engine
    // ------------------------------------------------------------------

    /// Split a closed record along its comment segments (see
    /// [`crate::parse::worklog`]).
    ///
    /// The record keeps its start time and the first segment as its
    /// comment, and shrinks by the summed minutes of the remaining
    /// segments. One new record per remaining segment is appended, chained
    /// gaplessly from the shrunk end time and owned by `task`.
    pub fn split_record(
        &mut self,
        cuid: &str,
        task: &Task,
        now: DateTime<Utc>,
    ) -> Result<(), SplitError> {
        let index = self
            .records
            .iter()
            .position(|r| r.cuid == cuid)
            .ok_or_else(|| SplitError::RecordNotFound(cuid.to_string()))?;

        let start = self.records[index].start_time;
        let end = self.records[index]
            .end_time
            .ok_or(SplitError::RecordStillActive)?;

        let segments = worklog::parse_segments(&self.records[index].comment);
        if segments.len() < 2 {
            return Err(SplitError::TooFewSegments);
        }

        // The first segment is the primary and keeps the record's own time.
        let split_minutes: i64 = segments[1..]
            .iter()
            .map(|s| i64::from(s.minutes_or_default()))
            .sum();
        let record_seconds = (end - start).num_seconds();
        if split_minutes * 60 >= record_seconds {
            return Err(SplitError::DurationExceeded {
                split_minutes,
                record_minutes: record_seconds / 60,
            });
        }

        let new_end = end - Duration::minutes(split_minutes);
        {
            let record = &mut self.records[index];
            record.comment = segments[0].raw.clone();
            record.end_time = Some(new_end);
            record.elapsed_time = time::format_elapsed(start, new_end);
        }

        // Chain one new record per remaining segment, no gaps.
        let mut segment_start = new_end;
        for segment in &segments[1..] {
            let minutes = segment.minutes_or_default();
            let segment_end = segment_start + Duration::minutes(i64::from(minutes));

            let mut record = Record::started(task, now);
            record.start_time = segment_start;
            record.end_time = Some(segment_end);
            record.comment = segment.text.clone();
            // Split children have always been rendered as bare minutes,
            // not through the day/hour-aware formatter.
            record.elapsed_time = format!("{}m", minutes);

            segment_start = segment_end;
            self.records.push(record);
        }

        Ok(())
    }

    // ------------------------------------------------------------------
    // Queries (pure projections)
    // ------------------------------------------------------------------

    pub fn record(&self, cuid: &str) -> Option<&Record> {
        self.records.iter().find(|r| r.cuid == cuid)
    }

    /// Records owned by a task, in store order.
    pub fn records_for_task(&self, task_cuid: &str) -> Vec<&Record> {
        self.records
            .iter()
            .filter(|r| r.task_cuid.as_deref() == Some(task_cuid))
            .collect()
    }

    /// The single running record, if any.
    pub fn active_record(&self) -> Option<&Record> {
        self.records.iter().find(|r| r.is_active())
    }

    /// The record currently being dragged, if any.
    pub fn moving_record(&self) -> Option<&Record> {
        self.records.iter().find(|r| r.moving)
    }

    /// Closed records — the candidates for upload to the tracker.
    pub fn unsynced_records(&self) -> Vec<&Record> {
        self.records
            .iter()
            .filter(|r| r.end_time.is_some())
            .collect()
    }

    /// Records with no cached external issue association.
    pub fn records_without_issue(&self) -> Vec<&Record> {
        self.records
            .iter()
            .filter(|r| r.task_issue_key.is_none())
            .collect()
    }

    pub fn record_count(&self, task_cuid: &str) -> usize {
        self.records
            .iter()
            .filter(|r| r.task_cuid.as_deref() == Some(task_cuid))
            .count()
    }
}
