use crate::model::Issue;

/// Failures surfaced by the external tracker boundary.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TrackerError {
    #[error("issue not found: {0}")]
    IssueNotFound(String),
    /// The tracker answered the request with its own error messages.
    #[error("tracker rejected the request: {0}")]
    Rejected(String),
    #[error("transport failure: {0}")]
    Transport(String),
}

/// Contract of the calls the estimate-refresh workflow needs from the
/// external issue tracker. The HTTP client realizing it lives outside this
/// crate; tests use an in-memory stand-in.
pub trait IssueTracker {
    /// Fetch the current representation of an issue by key.
    fn fetch_issue(&self, key: &str) -> Result<Issue, TrackerError>;

    /// Persist a new remaining estimate.
    ///
    /// `original` must carry the original estimate most recently fetched:
    /// the tracker's write API drops the stored original estimate unless it
    /// is re-sent on every remaining-estimate update (JRA-30459).
    fn write_remaining_estimate(
        &self,
        key: &str,
        remaining: &str,
        original: Option<&str>,
    ) -> Result<(), TrackerError>;
}
