pub mod worklog;

pub use worklog::{DEFAULT_SEGMENT_MINUTES, Segment, parse_segments};
