// Flow Metrics
// Cycle time, time in status, throughput and release failures derived from issue change histories

pub mod analysis;
pub mod cycle_time;
pub mod release_failure;
pub mod reports;
pub mod stats;
pub mod status_durations;
pub mod throughput;
pub mod types;

// Re-export public types and main interfaces
pub use analysis::{IssueAnalyzer, DEFAULT_TRACKED_STATUSES};
pub use cycle_time::{cycle_time_report, issue_cycle_time, CycleTimeOutcome, ALL_TEAMS};
pub use release_failure::{release_events, release_failure_report, RELEASED_STATUS};
pub use reports::MetricsReporter;
pub use status_durations::status_duration_report;
pub use throughput::{throughput_report, UNASSIGNED};
pub use types::*;
