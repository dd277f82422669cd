// Cycle time: first entry into code review until the last release,
// in business time, bucketed by release month and team

use super::types::*;
use crate::calendar::{BusinessCalendar, SECONDS_PER_HOUR};
use crate::error::Result;
use crate::history::{CODE_REVIEW, RELEASED};
use chrono::{DateTime, FixedOffset};
use std::collections::BTreeMap;
use tracing::{debug, warn};

pub const ALL_TEAMS: &str = "All";

#[derive(Debug, Clone, PartialEq)]
pub enum CycleTimeOutcome {
    Measured(CycleTimeEntry),
    /// Never entered review or never released.
    MissingTimestamps,
    /// Last release happened before the reporting window.
    ReleasedBeforeWindow,
    /// First review entry is later than the last release.
    ReviewAfterRelease,
    /// Review and release fall in the same non-working stretch.
    NoBusinessTime,
}

/// Cycle time of a single issue.
///
/// An issue released before `window_start` is dropped entirely, review
/// timestamp included. This keeps bulk status migrations that predate the
/// reporting window out of the numbers. A span with no business time at
/// all is not a measurement and is left out of the averages.
pub fn issue_cycle_time(
    analysis: &IssueAnalysis,
    window_start: Option<DateTime<FixedOffset>>,
    calendar: &BusinessCalendar,
) -> Result<CycleTimeOutcome> {
    let (Some(review_started), Some(released)) = (
        analysis.timestamps.get(CODE_REVIEW),
        analysis.timestamps.get(RELEASED),
    ) else {
        return Ok(CycleTimeOutcome::MissingTimestamps);
    };

    if window_start.is_some_and(|start| released < start) {
        debug!(issue.key = %analysis.key, %released, "Released before window start");
        return Ok(CycleTimeOutcome::ReleasedBeforeWindow);
    }

    if released < review_started {
        warn!(
            issue.key = %analysis.key,
            %review_started,
            %released,
            "First review entry is after the last release"
        );
        return Ok(CycleTimeOutcome::ReviewAfterRelease);
    }

    let business_seconds = calendar.business_seconds(review_started, released)?;
    if business_seconds == 0.0 {
        debug!(issue.key = %analysis.key, "No business time between review and release");
        return Ok(CycleTimeOutcome::NoBusinessTime);
    }
    debug!(
        issue.key = %analysis.key,
        business_hours = business_seconds / SECONDS_PER_HOUR,
        business_days = calendar.business_days(business_seconds),
        "Computed cycle time"
    );

    Ok(CycleTimeOutcome::Measured(CycleTimeEntry {
        key: analysis.key.clone(),
        team: analysis.team.clone(),
        month: released.format("%Y-%m").to_string(),
        review_started,
        released,
        business_seconds,
    }))
}

/// Monthly cycle time per team plus an `All` roll-up.
pub fn cycle_time_report(
    analyses: &[IssueAnalysis],
    window_start: Option<DateTime<FixedOffset>>,
    calendar: &BusinessCalendar,
) -> Result<CycleTimeReport> {
    let mut report = CycleTimeReport {
        window_start,
        ..Default::default()
    };
    let mut per_team: BTreeMap<String, BTreeMap<String, Vec<f64>>> = BTreeMap::new();
    let mut all: BTreeMap<String, Vec<f64>> = BTreeMap::new();

    for analysis in analyses {
        match issue_cycle_time(analysis, window_start, calendar)? {
            CycleTimeOutcome::Measured(entry) => {
                per_team
                    .entry(entry.team.clone())
                    .or_default()
                    .entry(entry.month.clone())
                    .or_default()
                    .push(entry.business_seconds);
                all.entry(entry.month.clone())
                    .or_default()
                    .push(entry.business_seconds);
                report.entries.push(entry);
            }
            CycleTimeOutcome::MissingTimestamps => report.missing_timestamps += 1,
            CycleTimeOutcome::ReleasedBeforeWindow => report.excluded_before_window += 1,
            CycleTimeOutcome::ReviewAfterRelease => report.review_after_release += 1,
            CycleTimeOutcome::NoBusinessTime => report.no_business_time += 1,
        }
    }

    report.teams = per_team
        .into_iter()
        .map(|(team, months)| (team, summarize_months(months, calendar)))
        .collect();
    report.all = summarize_months(all, calendar);

    Ok(report)
}

fn summarize_months(
    months: BTreeMap<String, Vec<f64>>,
    calendar: &BusinessCalendar,
) -> BTreeMap<String, DurationStats> {
    months
        .into_iter()
        .filter_map(|(month, samples)| {
            DurationStats::from_samples(&samples, calendar).map(|stats| (month, stats))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::history::{default_labels, interpret, OrderedTransitionLog, StatusTransition};

    const DAY: f64 = 8.0 * 3600.0;

    fn ts(raw: &str) -> DateTime<FixedOffset> {
        DateTime::parse_from_rfc3339(raw).unwrap()
    }

    fn analysis(key: &str, team: &str, entries: &[(&str, &str, &str)]) -> IssueAnalysis {
        let log = OrderedTransitionLog::from_transitions(
            entries
                .iter()
                .map(|(at, from, to)| StatusTransition::new(Some(*from), to, ts(at)))
                .collect(),
        );
        IssueAnalysis {
            key: key.to_string(),
            team: team.to_string(),
            assignee: None,
            story_points: 0.0,
            linked_issues: Vec::new(),
            timestamps: interpret(&log, &default_labels()),
            intervals: BTreeMap::new(),
            log,
        }
    }

    fn window() -> Option<DateTime<FixedOffset>> {
        Some(ts("2023-01-01T00:00:00-08:00"))
    }

    #[test]
    fn test_cycle_time_from_first_review_to_last_release() {
        let issue = analysis(
            "ENG-1",
            "Core",
            &[
                ("2023-04-03T09:00:00-07:00", "in progress", "code review"),
                ("2023-04-04T09:00:00-07:00", "code review", "released"),
                ("2023-04-05T09:00:00-07:00", "released", "reverted"),
                ("2023-04-07T09:00:00-07:00", "reverted", "released"),
            ],
        );

        let outcome = issue_cycle_time(&issue, window(), &BusinessCalendar::default()).unwrap();
        let CycleTimeOutcome::Measured(entry) = outcome else {
            panic!("expected a measured cycle time, got {outcome:?}");
        };
        assert_eq!(entry.review_started, ts("2023-04-03T09:00:00-07:00"));
        assert_eq!(entry.released, ts("2023-04-07T09:00:00-07:00"));
        // Mon..Thu capped at 8h each, Friday 00:00..09:00 capped at 8h
        assert_eq!(entry.business_seconds, 5.0 * DAY);
        assert_eq!(entry.month, "2023-04");
    }

    #[test]
    fn test_missing_review_or_release() {
        let calendar = BusinessCalendar::default();
        let no_review = analysis(
            "ENG-2",
            "Core",
            &[("2023-01-03T15:00:00-08:00", "in progress", "released")],
        );
        let no_release = analysis(
            "ENG-3",
            "Core",
            &[("2023-01-02T10:00:00-08:00", "open", "code review")],
        );
        assert_eq!(
            issue_cycle_time(&no_review, window(), &calendar).unwrap(),
            CycleTimeOutcome::MissingTimestamps
        );
        assert_eq!(
            issue_cycle_time(&no_release, window(), &calendar).unwrap(),
            CycleTimeOutcome::MissingTimestamps
        );
    }

    #[test]
    fn test_release_before_window_drops_the_whole_issue() {
        let migrated = analysis(
            "ENG-4",
            "Core",
            &[
                ("2022-06-01T10:00:00-07:00", "open", "code review"),
                ("2022-06-02T10:00:00-07:00", "code review", "released"),
            ],
        );
        let calendar = BusinessCalendar::default();

        assert_eq!(
            issue_cycle_time(&migrated, window(), &calendar).unwrap(),
            CycleTimeOutcome::ReleasedBeforeWindow
        );
        // Without a window the same history is measured normally.
        assert!(matches!(
            issue_cycle_time(&migrated, None, &calendar).unwrap(),
            CycleTimeOutcome::Measured(_)
        ));

        let report = cycle_time_report(&[migrated], window(), &calendar).unwrap();
        assert!(report.entries.is_empty());
        assert!(report.all.is_empty());
        assert_eq!(report.excluded_before_window, 1);
    }

    #[test]
    fn test_review_after_release_is_reported_separately() {
        let issue = analysis(
            "ENG-5",
            "Core",
            &[
                ("2023-02-01T10:00:00-08:00", "open", "released"),
                ("2023-02-03T10:00:00-08:00", "released", "in review"),
            ],
        );
        let report = cycle_time_report(&[issue], window(), &BusinessCalendar::default()).unwrap();
        assert_eq!(report.review_after_release, 1);
        assert!(report.entries.is_empty());
    }

    #[test]
    fn test_weekend_only_cycle_is_not_averaged() {
        let issues = vec![
            analysis(
                "ENG-6",
                "Core",
                &[
                    ("2023-04-08T10:00:00-07:00", "open", "code review"),
                    ("2023-04-09T10:00:00-07:00", "code review", "released"),
                ],
            ),
            analysis(
                "ENG-7",
                "Core",
                &[
                    ("2023-04-10T09:00:00-07:00", "open", "code review"),
                    ("2023-04-10T13:00:00-07:00", "code review", "released"),
                ],
            ),
        ];
        let calendar = BusinessCalendar::default();

        assert_eq!(
            issue_cycle_time(&issues[0], window(), &calendar).unwrap(),
            CycleTimeOutcome::NoBusinessTime
        );

        let report = cycle_time_report(&issues, window(), &calendar).unwrap();
        assert_eq!(report.no_business_time, 1);
        assert_eq!(report.entries.len(), 1);
        let april = &report.teams["Core"]["2023-04"];
        assert_eq!(april.count, 1);
        assert_eq!(april.median_seconds, 4.0 * 3600.0);
    }

    #[test]
    fn test_report_buckets_by_team_and_month() {
        let monday_review = "2023-04-03T09:00:00-07:00";
        let issues = vec![
            analysis(
                "ENG-1",
                "Core",
                &[(monday_review, "open", "code review"), ("2023-04-03T17:00:00-07:00", "code review", "released")],
            ),
            analysis(
                "ENG-2",
                "Core",
                &[(monday_review, "open", "code review"), ("2023-04-05T17:00:00-07:00", "code review", "released")],
            ),
            analysis(
                "OPS-1",
                "Ops",
                &[(monday_review, "open", "in review"), ("2023-04-04T17:00:00-07:00", "in review", "released")],
            ),
            analysis(
                "OPS-2",
                "Ops",
                &[("2023-05-01T09:00:00-07:00", "open", "in review"), ("2023-05-01T13:00:00-07:00", "in review", "released")],
            ),
            analysis("OPS-3", "Ops", &[(monday_review, "open", "in progress")]),
        ];

        let report = cycle_time_report(&issues, window(), &BusinessCalendar::default()).unwrap();
        assert_eq!(report.entries.len(), 4);
        assert_eq!(report.missing_timestamps, 1);

        let core_april = &report.teams["Core"]["2023-04"];
        assert_eq!(core_april.count, 2);
        assert_eq!(core_april.average_days, 2.0);
        assert_eq!(core_april.median_days, 2.0);

        let ops = &report.teams["Ops"];
        assert_eq!(ops["2023-04"].median_seconds, 2.0 * DAY);
        assert_eq!(ops["2023-05"].median_seconds, 4.0 * 3600.0);

        let all_april = &report.all["2023-04"];
        assert_eq!(all_april.count, 3);
        assert_eq!(all_april.median_days, 2.0);
        assert_eq!(all_april.average_days, 2.0);
    }
}
