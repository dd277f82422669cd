// Release failure rate: every entry into the released status is a release,
// and leaving it again marks that release as failed

use super::types::*;
use crate::history::OrderedTransitionLog;
use chrono::{DateTime, FixedOffset};
use std::collections::BTreeMap;
use tracing::debug;

/// Status name that marks a deployment.
pub const RELEASED_STATUS: &str = "Released";

/// Release events of one issue as `(released_at, failed)`, oldest first.
///
/// Moving out of the released status fails only the most recent release,
/// so released -> reverted -> released yields one failed and one good
/// release. Status names compare exactly.
pub fn release_events(log: &OrderedTransitionLog) -> Vec<(DateTime<FixedOffset>, bool)> {
    let mut events: Vec<(DateTime<FixedOffset>, bool)> = Vec::new();
    let mut last_release: Option<usize> = None;

    for transition in log {
        if transition.to_status == RELEASED_STATUS {
            events.push((transition.timestamp, false));
            last_release = Some(events.len() - 1);
        }
        if transition.from_status.as_deref() == Some(RELEASED_STATUS)
            && transition.to_status != RELEASED_STATUS
        {
            if let Some(index) = last_release.take() {
                events[index].1 = true;
            }
        }
    }

    events
}

/// Releases and failures per month of the release event.
///
/// Issues listed in `exempt` (case-insensitive) keep their releases but
/// never count as failed.
pub fn release_failure_report(analyses: &[IssueAnalysis], exempt: &[String]) -> ReleaseFailureReport {
    let mut report = ReleaseFailureReport::default();
    let mut months: BTreeMap<String, MonthlyReleaseFailures> = BTreeMap::new();

    for analysis in analyses {
        let is_exempt = exempt.iter().any(|key| key.trim().eq_ignore_ascii_case(&analysis.key));
        let events = release_events(&analysis.log);
        if is_exempt && !events.is_empty() {
            report.exempted.push(analysis.key.clone());
        }

        for (released_at, failed) in events {
            let failed = failed && !is_exempt;
            let month = months.entry(released_at.format("%Y-%m").to_string()).or_default();
            month.releases += 1;
            month.linked_tickets += analysis.linked_issues.len();
            if failed {
                month.failed += 1;
                month.failed_linked_tickets += analysis.linked_issues.len();
            }
            month.events.push(ReleaseEvent {
                issue: analysis.key.clone(),
                released_at,
                failed,
                linked_issues: analysis.linked_issues.clone(),
            });
        }
    }

    for month in months.values_mut() {
        month.events.sort_by(|a, b| {
            a.released_at
                .cmp(&b.released_at)
                .then_with(|| a.issue.cmp(&b.issue))
        });
        month.failure_rate = percent(month.failed, month.releases);
        month.linked_failure_rate = (month.linked_tickets > 0)
            .then(|| percent(month.failed_linked_tickets, month.linked_tickets));
        report.total_releases += month.releases;
        report.total_failed += month.failed;
    }
    report.overall_failure_rate = percent(report.total_failed, report.total_releases);
    report.months = months;

    debug!(
        releases = report.total_releases,
        failed = report.total_failed,
        "Computed release failures"
    );
    report
}

fn percent(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        0.0
    } else {
        part as f64 / whole as f64 * 100.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::history::{default_labels, interpret, StatusTransition};

    fn ts(raw: &str) -> DateTime<FixedOffset> {
        DateTime::parse_from_rfc3339(raw).unwrap()
    }

    fn analysis(key: &str, links: &[&str], entries: &[(&str, &str, &str)]) -> IssueAnalysis {
        let log = OrderedTransitionLog::from_transitions(
            entries
                .iter()
                .map(|(at, from, to)| StatusTransition::new(Some(*from), to, ts(at)))
                .collect(),
        );
        IssueAnalysis {
            key: key.to_string(),
            team: "Core".to_string(),
            assignee: None,
            story_points: 0.0,
            linked_issues: links.iter().map(|l| l.to_string()).collect(),
            timestamps: interpret(&log, &default_labels()),
            intervals: BTreeMap::new(),
            log,
        }
    }

    #[test]
    fn test_revert_fails_only_the_latest_release() {
        let issue = analysis(
            "REL-1",
            &[],
            &[
                ("2023-04-04T17:00:00-07:00", "In Progress", "Released"),
                ("2023-04-05T09:00:00-07:00", "Released", "Reverted"),
                ("2023-04-06T10:00:00-07:00", "Reverted", "Released"),
            ],
        );
        let events = release_events(&issue.log);
        assert_eq!(
            events,
            vec![
                (ts("2023-04-04T17:00:00-07:00"), true),
                (ts("2023-04-06T10:00:00-07:00"), false),
            ]
        );
    }

    #[test]
    fn test_second_exit_without_new_release_is_ignored() {
        let issue = analysis(
            "REL-2",
            &[],
            &[
                ("2023-04-04T17:00:00-07:00", "In Progress", "Released"),
                ("2023-04-05T09:00:00-07:00", "Released", "Reverted"),
                ("2023-04-05T10:00:00-07:00", "Released", "Closed"),
            ],
        );
        assert_eq!(release_events(&issue.log), vec![(ts("2023-04-04T17:00:00-07:00"), true)]);
    }

    #[test]
    fn test_status_names_are_exact() {
        let issue = analysis(
            "REL-3",
            &[],
            &[("2023-04-04T17:00:00-07:00", "In Progress", "released")],
        );
        assert!(release_events(&issue.log).is_empty());
    }

    #[test]
    fn test_monthly_report_with_links_and_exemption() {
        let analyses = vec![
            analysis(
                "REL-1",
                &["ENG-1", "ENG-2"],
                &[
                    ("2023-04-04T17:00:00-07:00", "In Progress", "Released"),
                    ("2023-04-05T09:00:00-07:00", "Released", "Reverted"),
                    ("2023-04-06T10:00:00-07:00", "Reverted", "Released"),
                ],
            ),
            analysis(
                "REL-9",
                &["ENG-3"],
                &[
                    ("2023-05-09T10:00:00-07:00", "In Progress", "Released"),
                    ("2023-05-10T10:00:00-07:00", "Released", "Rolled Back"),
                ],
            ),
        ];

        let report = release_failure_report(&analyses, &[]);
        let april = &report.months["2023-04"];
        assert_eq!(april.releases, 2);
        assert_eq!(april.failed, 1);
        assert_eq!(april.linked_tickets, 4);
        assert_eq!(april.failed_linked_tickets, 2);
        assert_eq!(april.failure_rate, 50.0);
        assert_eq!(april.linked_failure_rate, Some(50.0));
        assert!(april.events[0].failed);
        assert!(!april.events[1].failed);
        assert_eq!(report.months["2023-05"].failure_rate, 100.0);
        assert_eq!(report.total_releases, 3);
        assert_eq!(report.total_failed, 2);

        let exempted = release_failure_report(&analyses, &["rel-9".to_string()]);
        assert_eq!(exempted.months["2023-05"].failed, 0);
        assert_eq!(exempted.months["2023-05"].releases, 1);
        assert_eq!(exempted.exempted, vec!["REL-9".to_string()]);
        assert_eq!(exempted.total_failed, 1);
    }

    #[test]
    fn test_no_links_leaves_linked_rate_empty() {
        let analyses = vec![analysis(
            "REL-4",
            &[],
            &[("2023-06-01T10:00:00-07:00", "In Progress", "Released")],
        )];
        let report = release_failure_report(&analyses, &[]);
        assert_eq!(report.months["2023-06"].linked_failure_rate, None);
        assert_eq!(report.overall_failure_rate, 0.0);
    }
}
