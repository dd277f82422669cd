// flow-metrics library - Jira status history engine
// Exposes the history, calendar and metrics components for the CLI and tests

pub mod calendar;
pub mod cli;
pub mod config;
pub mod error;
pub mod history;
pub mod jira;
pub mod metrics;
pub mod telemetry;

// Re-export key types for easy access
pub use calendar::BusinessCalendar;
pub use config::{config, init_config, FlowMetricsConfig};
pub use error::{FlowMetricsError, Result};
pub use history::{
    extract_intervals, interpret, parse, ExtractedTimestamps, OrderedTransitionLog,
    SelectionPolicy, StatusInterval, StatusTransition, TrackedLabel,
};
pub use jira::{load_issues, parse_issues, JiraIssue, TeamResolver};
pub use metrics::{
    cycle_time_report, release_failure_report, status_duration_report, throughput_report,
    IssueAnalysis, IssueAnalyzer, MetricsReporter,
};
pub use telemetry::{create_report_span, generate_correlation_id, init_telemetry};
