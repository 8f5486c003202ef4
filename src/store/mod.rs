pub mod events;
pub mod recorder;
pub mod tasks;

pub use events::DomainEvent;
pub use recorder::{RecorderState, SplitError};
pub use tasks::TaskListState;

use serde::{Deserialize, Serialize};
use tracing::debug;

/// The composed application state: both slices plus the event routing
/// between them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Store {
    #[serde(default)]
    pub recorder: RecorderState,
    #[serde(default)]
    pub tasks: TaskListState,
}

impl Store {
    /// Delete a task and route the removal event into the recorder slice,
    /// cascading away its records.
    pub fn remove_task(&mut self, cuid: &str) {
        let event = self.tasks.remove_task(cuid);
        debug!(task = %cuid, "cascading task removal into recorder");
        self.recorder.handle_event(&event);
    }
}
