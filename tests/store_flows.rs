//! End-to-end flows across the store slices: command sequences must keep
//! the single-active-record and unique-cuid invariants, and tracker
//! completions must stay safe against racing deletions.

use chrono::{DateTime, TimeZone, Utc};
use pretty_assertions::assert_eq;
use stint::model::{Issue, IssueFields, Task, TimeTracking};
use stint::store::Store;
use stint::tracker::{IssueTracker, TrackerError, refresh_issue, update_remaining_estimate};

fn at(h: u32, m: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2020, 3, 2, h, m, 0).unwrap()
}

fn assert_invariants(store: &Store) {
    let active = store
        .recorder
        .records
        .iter()
        .filter(|r| r.is_active())
        .count();
    assert!(active <= 1, "more than one active record: {}", active);

    let mut cuids: Vec<&str> = store
        .recorder
        .records
        .iter()
        .map(|r| r.cuid.as_str())
        .collect();
    cuids.sort_unstable();
    let len = cuids.len();
    cuids.dedup();
    assert_eq!(cuids.len(), len, "duplicate record cuids");

    let mut task_cuids: Vec<&str> = store.tasks.tasks.iter().map(|t| t.cuid.as_str()).collect();
    task_cuids.sort_unstable();
    let len = task_cuids.len();
    task_cuids.dedup();
    assert_eq!(task_cuids.len(), len, "duplicate task cuids");
}

#[test]
fn command_sequence_preserves_invariants() {
    let mut store = Store::default();
    let web = Task::linked("WEB-1");
    let ops = Task::linked("OPS-2");
    store.tasks.add_task(web.clone());
    store.tasks.add_task(ops.clone());

    store
        .recorder
        .start_recording(Some(web.clone()), None, at(9, 0));
    assert_invariants(&store);

    // a second start closes the first record
    store
        .recorder
        .start_recording(Some(ops.clone()), None, at(10, 0));
    assert_invariants(&store);

    store.recorder.stop_recording(at(11, 0));
    assert_invariants(&store);

    // edit, retime, and split the first record
    let first = store.recorder.records[0].cuid.clone();
    store
        .recorder
        .set_record_comment(&first, "triage | repro 20m | notes");
    store
        .recorder
        .set_record_date(&first, at(9, 0), Some(at(10, 0)), at(11, 0));
    store
        .recorder
        .split_record(&first, &web, at(11, 0))
        .unwrap();
    assert_invariants(&store);
    assert_eq!(store.recorder.records.len(), 4);

    // reassign one split child to the other task
    let child = store.recorder.records[2].cuid.clone();
    store.recorder.set_record_moving(&child, true);
    store
        .recorder
        .set_record_move_target(&child, Some(ops.cuid.clone()));
    store
        .recorder
        .set_record_task(&child, &ops.cuid, Some("OPS-2".into()));
    assert_invariants(&store);
    assert!(store.recorder.moving_record().is_none());

    // cascade one task away
    store.remove_task(&web.cuid);
    assert_invariants(&store);
    assert!(
        store
            .recorder
            .records
            .iter()
            .all(|r| r.task_cuid.as_deref() != Some(web.cuid.as_str()))
    );
}

#[test]
fn split_scenario_produces_the_documented_layout() {
    let mut store = Store::default();
    let task = Task::linked("WEB-9");
    store.tasks.add_task(task.clone());

    store
        .recorder
        .start_recording(Some(task.clone()), None, at(9, 0));
    store.recorder.stop_recording(at(10, 0));

    let cuid = store.recorder.records[0].cuid.clone();
    store
        .recorder
        .set_record_comment(&cuid, "Fix bug | review 30m | deploy");
    store.recorder.split_record(&cuid, &task, at(10, 0)).unwrap();

    let comments: Vec<&str> = store
        .recorder
        .records
        .iter()
        .map(|r| r.comment.as_str())
        .collect();
    assert_eq!(comments, vec!["Fix bug", "review", "deploy"]);

    let spans: Vec<(DateTime<Utc>, Option<DateTime<Utc>>)> = store
        .recorder
        .records
        .iter()
        .map(|r| (r.start_time, r.end_time))
        .collect();
    assert_eq!(
        spans,
        vec![
            (at(9, 0), Some(at(9, 15))),
            (at(9, 15), Some(at(9, 45))),
            (at(9, 45), Some(at(10, 0))),
        ]
    );
}

// ---------------------------------------------------------------------------
// Tracker round trips racing store mutations
// ---------------------------------------------------------------------------

struct StubTracker {
    remaining: &'static str,
}

impl IssueTracker for StubTracker {
    fn fetch_issue(&self, key: &str) -> Result<Issue, TrackerError> {
        Ok(Issue {
            key: key.to_string(),
            fields: IssueFields {
                summary: "stub".into(),
                status: None,
                timetracking: TimeTracking {
                    original_estimate: Some("3d".into()),
                    remaining_estimate: Some(self.remaining.to_string()),
                },
            },
        })
    }

    fn write_remaining_estimate(
        &self,
        _key: &str,
        _remaining: &str,
        original: Option<&str>,
    ) -> Result<(), TrackerError> {
        // the workflow must always forward the fetched original estimate
        assert_eq!(original, Some("3d"));
        Ok(())
    }
}

#[test]
fn refresh_completion_after_cascade_is_harmless() {
    let mut store = Store::default();
    let task = Task::linked("WEB-1");
    let cuid = task.cuid.clone();
    store.tasks.add_task(task.clone());
    store
        .recorder
        .start_recording(Some(task), None, at(9, 0));

    // the task is removed while the fetch is conceptually in flight
    store.remove_task(&cuid);
    let before = store.clone();

    let tracker = StubTracker { remaining: "1d" };
    refresh_issue(&mut store.tasks, &tracker, &cuid, "WEB-1").unwrap();
    update_remaining_estimate(&mut store.tasks, &tracker, &cuid, "WEB-1", "2h").unwrap();

    assert_eq!(store, before);
}

#[test]
fn estimate_edit_survives_the_stale_fetch() {
    let mut store = Store::default();
    let task = Task::linked("WEB-1");
    let cuid = task.cuid.clone();
    store.tasks.add_task(task);

    let tracker = StubTracker { remaining: "1d" };
    update_remaining_estimate(&mut store.tasks, &tracker, &cuid, "WEB-1", "2h").unwrap();

    let task = store.tasks.task(&cuid).unwrap();
    assert_eq!(
        task.issue
            .as_ref()
            .unwrap()
            .fields
            .timetracking
            .remaining_estimate
            .as_deref(),
        Some("2h"),
        "the local edit overlays the fetched value"
    );
    assert!(!task.issue_refreshing);
}
