/// Cross-module notifications exchanged between the bounded state slices.
///
/// The task slice produces these and the composing [`Store`](super::Store)
/// routes them; no slice reaches into another's internals. Only the events
/// listed here may trigger cross-slice reactions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomainEvent {
    /// A task was deleted; dependent records must go with it.
    TaskRemoved { cuid: String },
}
