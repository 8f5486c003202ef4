use std::path::PathBuf;

use chrono::{DateTime, Utc};

use crate::cli::commands::{Cli, Commands};
use crate::io::state;
use crate::model::{Issue, IssueFields, Record, Task};
use crate::store::{SplitError, Store};
use crate::time;

/// Error type for CLI dispatch
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error("no record matches '{0}'")]
    NoSuchRecord(String),
    #[error("'{0}' matches more than one record")]
    AmbiguousRecord(String),
    #[error("no task matches '{0}'")]
    NoSuchTask(String),
    #[error("'{0}' matches more than one task")]
    AmbiguousTask(String),
    #[error("record has no owning task; pass --task")]
    NoOwningTask,
    #[error("invalid timestamp '{0}': expected RFC 3339")]
    BadTimestamp(String),
    #[error(transparent)]
    Split(#[from] SplitError),
    #[error("could not write state: {0}")]
    Io(#[from] std::io::Error),
}

/// Load the store, run one command against it, and persist it again when
/// the command mutated anything.
pub fn dispatch(cli: Cli) -> Result<(), CliError> {
    let root = cli
        .dir
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("."));
    let mut store = state::read_store(&root).unwrap_or_default();
    let now = Utc::now();

    let mutated = match cli.command {
        Commands::Start(args) => {
            let task = task_for_key(&mut store, args.issue_key.as_deref());
            let label = task
                .issue_key()
                .map(str::to_string)
                .unwrap_or_else(|| "local task".to_string());
            store.recorder.start_recording(Some(task), None, now);
            if let Some(comment) = args.comment
                && let Some(cuid) = store.recorder.active_record().map(|r| r.cuid.clone())
            {
                store.recorder.set_record_comment(&cuid, &comment);
            }
            println!("recording against {}", label);
            true
        }
        Commands::Stop => {
            match store.recorder.active_record().map(|r| r.cuid.clone()) {
                None => {
                    println!("nothing is recording");
                    false
                }
                Some(cuid) => {
                    store.recorder.stop_recording(now);
                    if let Some(record) = store.recorder.record(&cuid) {
                        println!("stopped after {}", record.elapsed_time);
                    }
                    true
                }
            }
        }
        Commands::Add(args) => {
            let start = parse_time(&args.start)?;
            let end = parse_time(&args.end)?;
            let task = task_for_key(&mut store, args.issue_key.as_deref());

            let mut record = Record::started(&task, now);
            record.start_time = start;
            record.end_time = Some(end);
            record.comment = args.comment.unwrap_or_default();
            record.elapsed_time = time::format_elapsed(start, end);
            let cuid = record.cuid.clone();
            store.recorder.add_record(Some(task), Some(record), now);
            println!("added {}", short(&cuid));
            true
        }
        Commands::Status => {
            match store.recorder.active_record() {
                Some(record) => print_record(record, now),
                None => println!("nothing is recording"),
            }
            false
        }
        Commands::List(args) => {
            let records: Vec<&Record> = match args.task.as_deref() {
                Some(prefix) => {
                    let task_cuid = resolve_task(&store, prefix)?;
                    store.recorder.records_for_task(&task_cuid)
                }
                None => store.recorder.records.iter().collect(),
            };
            for record in records {
                print_record(record, now);
            }
            false
        }
        Commands::Comment(args) => {
            let cuid = resolve_record(&store, &args.record)?;
            store.recorder.set_record_comment(&cuid, &args.comment);
            true
        }
        Commands::Retime(args) => {
            let cuid = resolve_record(&store, &args.record)?;
            let start = parse_time(&args.start)?;
            let end = args.end.as_deref().map(parse_time).transpose()?;
            store.recorder.set_record_date(&cuid, start, end, now);
            if let Some(record) = store.recorder.record(&cuid) {
                println!("{} now spans {}", short(&cuid), record.elapsed_time);
            }
            true
        }
        Commands::Split(args) => {
            let cuid = resolve_record(&store, &args.record)?;
            let task = split_target_task(&store, &cuid, args.task.as_deref())?;
            let before = store.recorder.records.len();
            store.recorder.split_record(&cuid, &task, now)?;
            let created = store.recorder.records.len() - before;
            println!("split {} into {} new record(s)", short(&cuid), created);
            true
        }
        Commands::Mv(args) => {
            let cuid = resolve_record(&store, &args.record)?;
            let task_cuid = resolve_task(&store, &args.task)?;
            let issue_key = store
                .tasks
                .task(&task_cuid)
                .and_then(|t| t.issue_key())
                .map(str::to_string);

            // begin / hover / commit, collapsed for a non-interactive surface
            store.recorder.set_record_moving(&cuid, true);
            store
                .recorder
                .set_record_move_target(&cuid, Some(task_cuid.clone()));
            store.recorder.set_record_task(&cuid, &task_cuid, issue_key);
            println!("moved {} to {}", short(&cuid), short(&task_cuid));
            true
        }
        Commands::Rm(args) => {
            let cuid = resolve_record(&store, &args.record)?;
            store.recorder.remove_record(&cuid);
            println!("removed {}", short(&cuid));
            true
        }
        Commands::RmTask(args) => {
            let task_cuid = resolve_task(&store, &args.task)?;
            let dropped = store.recorder.record_count(&task_cuid);
            store.remove_task(&task_cuid);
            println!("removed task {} and {} record(s)", short(&task_cuid), dropped);
            true
        }
    };

    if mutated {
        state::write_store(&root, &store)?;
    }
    Ok(())
}

/// Reuse the task already linked to `key`, or register a fresh one.
fn task_for_key(store: &mut Store, key: Option<&str>) -> Task {
    if let Some(key) = key
        && let Some(task) = store.tasks.tasks.iter().find(|t| t.issue_key() == Some(key))
    {
        return task.clone();
    }
    let task = match key {
        Some(key) => Task::linked(key),
        None => Task::new(),
    };
    store.tasks.add_task(task.clone());
    task
}

/// The task split-off records should be attributed to: an explicit target,
/// or the record's own task.
fn split_target_task(
    store: &Store,
    record_cuid: &str,
    task_prefix: Option<&str>,
) -> Result<Task, CliError> {
    if let Some(prefix) = task_prefix {
        let task_cuid = resolve_task(store, prefix)?;
        return store
            .tasks
            .task(&task_cuid)
            .cloned()
            .ok_or_else(|| CliError::NoSuchTask(prefix.to_string()));
    }

    let record = store
        .recorder
        .record(record_cuid)
        .ok_or_else(|| CliError::NoSuchRecord(record_cuid.to_string()))?;
    let task_cuid = record.task_cuid.clone().ok_or(CliError::NoOwningTask)?;

    match store.tasks.task(&task_cuid) {
        Some(task) => Ok(task.clone()),
        // the record points at a task the store no longer lists; rebuild
        // enough of it from the record's cached fields
        None => Ok(Task {
            cuid: task_cuid,
            issue: record.task_issue_key.as_deref().map(|key| Issue {
                key: key.to_string(),
                fields: IssueFields::default(),
            }),
            issue_refreshing: false,
        }),
    }
}

fn resolve_record(store: &Store, prefix: &str) -> Result<String, CliError> {
    let matches: Vec<&str> = store
        .recorder
        .records
        .iter()
        .filter(|r| r.cuid.starts_with(prefix))
        .map(|r| r.cuid.as_str())
        .collect();
    match matches.as_slice() {
        [one] => Ok((*one).to_string()),
        [] => Err(CliError::NoSuchRecord(prefix.to_string())),
        _ => Err(CliError::AmbiguousRecord(prefix.to_string())),
    }
}

fn resolve_task(store: &Store, prefix: &str) -> Result<String, CliError> {
    let matches: Vec<&str> = store
        .tasks
        .tasks
        .iter()
        .filter(|t| t.cuid.starts_with(prefix))
        .map(|t| t.cuid.as_str())
        .collect();
    match matches.as_slice() {
        [one] => Ok((*one).to_string()),
        [] => Err(CliError::NoSuchTask(prefix.to_string())),
        _ => Err(CliError::AmbiguousTask(prefix.to_string())),
    }
}

fn parse_time(s: &str) -> Result<DateTime<Utc>, CliError> {
    DateTime::parse_from_rfc3339(s)
        .map(|t| t.with_timezone(&Utc))
        .map_err(|_| CliError::BadTimestamp(s.to_string()))
}

fn short(cuid: &str) -> &str {
    &cuid[..cuid.len().min(9)]
}

fn print_record(record: &Record, now: DateTime<Utc>) {
    let span = match record.end_time {
        Some(end) => format!(
            "{} .. {}",
            record.start_time.format("%Y-%m-%d %H:%M"),
            end.format("%H:%M")
        ),
        None => format!("{} .. running", record.start_time.format("%Y-%m-%d %H:%M")),
    };
    // a running record's display is measured live; closed records keep
    // their stored derivation
    let elapsed = match record.end_time {
        Some(_) => record.elapsed_time.clone(),
        None => time::format_elapsed(record.start_time, now),
    };
    let key = record.task_issue_key.as_deref().unwrap_or("-");
    println!(
        "{}  {}  {:>9}  {:<12}  {}",
        short(&record.cuid),
        span,
        elapsed,
        key,
        record.comment
    );
}
