// Status history engine
// Ordered transition logs, label timestamps and status intervals per issue

pub mod interpreter;
pub mod intervals;
pub mod parser;
pub mod types;

pub use interpreter::{
    default_labels, interpret, ExtractedTimestamps, SelectionPolicy, TrackedLabel, CODE_REVIEW,
    DONE, RELEASED,
};
pub use intervals::extract_intervals;
pub use parser::{parse, parse_jira_timestamp};
pub use types::{OrderedTransitionLog, StatusInterval, StatusTransition};
