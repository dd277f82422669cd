use super::types::*;
use crate::calendar::BusinessCalendar;
use crate::error::Result;
use crate::history::{self, default_labels, TrackedLabel};
use crate::jira::{JiraIssue, TeamResolver};
use std::collections::BTreeMap;
use tracing::{debug, info_span};

/// Statuses measured by the status-duration report unless configured.
pub const DEFAULT_TRACKED_STATUSES: [&str; 3] = ["In Progress", "In Review", "Pending Release"];

/// Runs the history engine over issues.
///
/// Holds only read-only settings, so one analyzer can be shared across
/// any number of issues.
#[derive(Debug, Clone)]
pub struct IssueAnalyzer {
    calendar: BusinessCalendar,
    labels: Vec<TrackedLabel>,
    tracked_statuses: Vec<String>,
    teams: TeamResolver,
    story_points_field: Option<String>,
}

impl Default for IssueAnalyzer {
    fn default() -> Self {
        Self {
            calendar: BusinessCalendar::default(),
            labels: default_labels(),
            tracked_statuses: DEFAULT_TRACKED_STATUSES.iter().map(|s| s.to_string()).collect(),
            teams: TeamResolver::default(),
            story_points_field: None,
        }
    }
}

impl IssueAnalyzer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_calendar(mut self, calendar: BusinessCalendar) -> Self {
        self.calendar = calendar;
        self
    }

    pub fn with_labels(mut self, labels: Vec<TrackedLabel>) -> Self {
        self.labels = labels;
        self
    }

    pub fn with_tracked_statuses(mut self, statuses: Vec<String>) -> Self {
        self.tracked_statuses = statuses;
        self
    }

    pub fn with_team_resolver(mut self, teams: TeamResolver) -> Self {
        self.teams = teams;
        self
    }

    pub fn with_story_points_field(mut self, field: Option<String>) -> Self {
        self.story_points_field = field;
        self
    }

    pub fn calendar(&self) -> &BusinessCalendar {
        &self.calendar
    }

    pub fn tracked_statuses(&self) -> &[String] {
        &self.tracked_statuses
    }

    pub fn analyze(&self, issue: &JiraIssue) -> Result<IssueAnalysis> {
        let span = info_span!("issue", issue.key = %issue.key);
        let _enter = span.enter();

        let log = history::parse(&issue.changelog.histories);
        let timestamps = history::interpret(&log, &self.labels);

        let mut intervals = BTreeMap::new();
        for status in &self.tracked_statuses {
            let measured = history::extract_intervals(&log, status)
                .into_iter()
                .map(|interval| {
                    Ok(IntervalMeasurement {
                        duration_s: interval.raw_duration_seconds(),
                        adjusted_duration_s: interval.business_duration_seconds(&self.calendar)?,
                        interval,
                    })
                })
                .collect::<Result<Vec<_>>>()?;
            intervals.insert(status.clone(), measured);
        }

        let story_points = self
            .story_points_field
            .as_deref()
            .and_then(|field| issue.custom_number(field))
            .unwrap_or(0.0);

        debug!(
            transitions = log.len(),
            skipped = log.skipped_records(),
            "Analyzed issue history"
        );

        Ok(IssueAnalysis {
            key: issue.key.clone(),
            team: self.teams.resolve(issue),
            assignee: issue.assignee_name().map(str::to_string),
            story_points,
            linked_issues: issue.outward_links(),
            timestamps,
            intervals,
            log,
        })
    }

    /// Analyze every issue independently; the first failure aborts.
    pub fn analyze_all(&self, issues: &[JiraIssue]) -> Result<Vec<IssueAnalysis>> {
        issues.iter().map(|issue| self.analyze(issue)).collect()
    }
}
