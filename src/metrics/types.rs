use crate::history::{ExtractedTimestamps, OrderedTransitionLog, StatusInterval};
use chrono::{DateTime, FixedOffset};
use serde::Serialize;
use std::collections::BTreeMap;

/// Everything derived from one issue's change history.
#[derive(Debug, Clone, Serialize)]
pub struct IssueAnalysis {
    pub key: String,
    pub team: String,
    pub assignee: Option<String>,
    pub story_points: f64,
    /// Outward-linked issue keys (e.g. tickets shipped by a release).
    pub linked_issues: Vec<String>,
    pub timestamps: ExtractedTimestamps,
    /// Closed visits per tracked status, chronological.
    pub intervals: BTreeMap<String, Vec<IntervalMeasurement>>,
    pub log: OrderedTransitionLog,
}

impl IssueAnalysis {
    /// Total business seconds spent in `status` across all visits.
    pub fn business_seconds_in(&self, status: &str) -> f64 {
        self.intervals
            .get(status)
            .map(|visits| visits.iter().map(|v| v.adjusted_duration_s).sum())
            .unwrap_or(0.0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IntervalMeasurement {
    #[serde(flatten)]
    pub interval: StatusInterval,
    pub duration_s: f64,
    pub adjusted_duration_s: f64,
}

/// Count, mean and median of a set of business-second samples.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DurationStats {
    pub count: usize,
    pub average_seconds: f64,
    pub median_seconds: f64,
    pub average_days: f64,
    pub median_days: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CycleTimeEntry {
    pub key: String,
    pub team: String,
    pub month: String,
    pub review_started: DateTime<FixedOffset>,
    pub released: DateTime<FixedOffset>,
    pub business_seconds: f64,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct CycleTimeReport {
    pub window_start: Option<DateTime<FixedOffset>>,
    pub entries: Vec<CycleTimeEntry>,
    /// team -> month -> stats
    pub teams: BTreeMap<String, BTreeMap<String, DurationStats>>,
    /// month -> stats over every team
    pub all: BTreeMap<String, DurationStats>,
    /// Released before the window start (e.g. bulk migrations).
    pub excluded_before_window: usize,
    /// Never entered review or never released.
    pub missing_timestamps: usize,
    pub review_after_release: usize,
    /// Zero business seconds between review and release.
    pub no_business_time: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IssueStatusDurations {
    pub key: String,
    pub team: String,
    pub visits: BTreeMap<String, Vec<IntervalMeasurement>>,
    /// status -> business seconds over all visits
    pub totals: BTreeMap<String, f64>,
    /// status -> end of the last visit
    pub last_exit: BTreeMap<String, DateTime<FixedOffset>>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct StatusDurationReport {
    pub statuses: Vec<String>,
    pub issues: Vec<IssueStatusDurations>,
    /// status -> stats of per-issue totals, for issues that visited the status
    pub summary: BTreeMap<String, DurationStats>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Contribution {
    pub points: f64,
    pub tickets: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MemberThroughput {
    pub assignee: String,
    pub points: f64,
    pub tickets: u32,
    pub points_ratio: f64,
    pub tickets_ratio: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TeamThroughput {
    pub team: String,
    pub total_points: f64,
    pub total_tickets: u32,
    pub average_points_per_member: f64,
    pub average_tickets_per_member: f64,
    /// Sorted by points, highest first.
    pub members: Vec<MemberThroughput>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ThroughputReport {
    /// month -> teams
    pub months: BTreeMap<String, Vec<TeamThroughput>>,
    pub fell_back_to_done: usize,
    pub missing_completion: usize,
    /// Best performers over the last three reported months.
    pub top_contributors: TopContributors,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TopContributor {
    pub assignee: String,
    /// Mean of the monthly ratios to the team average.
    pub average_ratio: f64,
    /// Sum over the rolling window.
    pub total: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TopContributors {
    /// Months in the rolling window, oldest first.
    pub months: Vec<String>,
    pub points: Vec<TopContributor>,
    pub tickets: Vec<TopContributor>,
}

/// One entry into the released status and whether it was later backed out.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReleaseEvent {
    pub issue: String,
    pub released_at: DateTime<FixedOffset>,
    pub failed: bool,
    pub linked_issues: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MonthlyReleaseFailures {
    pub releases: usize,
    pub failed: usize,
    pub linked_tickets: usize,
    pub failed_linked_tickets: usize,
    /// Percent of releases that failed.
    pub failure_rate: f64,
    /// Percent of linked tickets shipped by failed releases; `None` without links.
    pub linked_failure_rate: Option<f64>,
    /// Chronological.
    pub events: Vec<ReleaseEvent>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ReleaseFailureReport {
    /// month -> release outcomes
    pub months: BTreeMap<String, MonthlyReleaseFailures>,
    pub total_releases: usize,
    pub total_failed: usize,
    pub overall_failure_rate: f64,
    /// Issues whose failures were overridden.
    pub exempted: Vec<String>,
}
