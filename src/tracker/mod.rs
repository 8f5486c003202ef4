pub mod client;
pub mod refresh;

pub use client::{IssueTracker, TrackerError};
pub use refresh::{RefreshError, refresh_issue, update_remaining_estimate};
