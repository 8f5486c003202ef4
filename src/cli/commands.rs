use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "stint",
    about = concat!("stint v", env!("CARGO_PKG_VERSION"), " - record worked time against your issues"),
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Run against a different working directory
    #[arg(short = 'C', long = "dir", global = true)]
    pub dir: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start recording, closing any running record first
    Start(StartArgs),
    /// Stop the running record
    Stop,
    /// Add a closed record without touching the running one
    Add(AddArgs),
    /// Show the running record
    Status,
    /// List records
    List(ListArgs),
    /// Replace a record's comment
    Comment(CommentArgs),
    /// Retime a record
    Retime(RetimeArgs),
    /// Split a record along its comment segments
    Split(SplitArgs),
    /// Reassign a record to another task
    Mv(MvArgs),
    /// Delete a record
    Rm(RmArgs),
    /// Delete a task and every record attributed to it
    RmTask(RmTaskArgs),
}

// ---------------------------------------------------------------------------
// Recording args
// ---------------------------------------------------------------------------

#[derive(Args)]
pub struct StartArgs {
    /// Issue key to record against (omit for a local task)
    pub issue_key: Option<String>,
    /// Initial comment
    #[arg(short = 'm', long)]
    pub comment: Option<String>,
}

#[derive(Args)]
pub struct AddArgs {
    /// Issue key to record against (omit for a local task)
    pub issue_key: Option<String>,
    /// Comment
    #[arg(short = 'm', long)]
    pub comment: Option<String>,
    /// Start time (RFC 3339)
    #[arg(long)]
    pub start: String,
    /// End time (RFC 3339)
    #[arg(long)]
    pub end: String,
}

// ---------------------------------------------------------------------------
// Record-edit args (records addressed by unique cuid prefix)
// ---------------------------------------------------------------------------

#[derive(Args)]
pub struct ListArgs {
    /// Only records owned by this task (cuid prefix)
    #[arg(long)]
    pub task: Option<String>,
}

#[derive(Args)]
pub struct CommentArgs {
    /// Record cuid prefix
    pub record: String,
    /// New comment text
    pub comment: String,
}

#[derive(Args)]
pub struct RetimeArgs {
    /// Record cuid prefix
    pub record: String,
    /// New start time (RFC 3339)
    pub start: String,
    /// New end time (RFC 3339); omit to keep the record running
    pub end: Option<String>,
}

#[derive(Args)]
pub struct SplitArgs {
    /// Record cuid prefix
    pub record: String,
    /// Task to attribute the split-off records to (cuid prefix; defaults
    /// to the record's own task)
    #[arg(long)]
    pub task: Option<String>,
}

#[derive(Args)]
pub struct MvArgs {
    /// Record cuid prefix
    pub record: String,
    /// Target task cuid prefix
    pub task: String,
}

#[derive(Args)]
pub struct RmArgs {
    /// Record cuid prefix
    pub record: String,
}

#[derive(Args)]
pub struct RmTaskArgs {
    /// Task cuid prefix
    pub task: String,
}
