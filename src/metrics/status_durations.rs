use super::types::*;
use crate::calendar::BusinessCalendar;
use std::collections::BTreeMap;

/// Time spent in each tracked status per issue.
///
/// Works from the intervals the analyzer already measured; `statuses`
/// restricts the report to a subset (empty means all tracked statuses).
pub fn status_duration_report(
    analyses: &[IssueAnalysis],
    statuses: &[String],
    calendar: &BusinessCalendar,
) -> StatusDurationReport {
    let wanted = |status: &str| statuses.is_empty() || statuses.iter().any(|s| s == status);

    let issues: Vec<IssueStatusDurations> = analyses
        .iter()
        .map(|analysis| {
            let visits: BTreeMap<String, Vec<IntervalMeasurement>> = analysis
                .intervals
                .iter()
                .filter(|(status, _)| wanted(status))
                .map(|(status, measured)| (status.clone(), measured.clone()))
                .collect();
            let totals = visits
                .iter()
                .map(|(status, measured)| {
                    (status.clone(), measured.iter().map(|m| m.adjusted_duration_s).sum())
                })
                .collect();
            let last_exit = visits
                .iter()
                .filter_map(|(status, measured)| {
                    measured.last().map(|m| (status.clone(), m.interval.end))
                })
                .collect();

            IssueStatusDurations {
                key: analysis.key.clone(),
                team: analysis.team.clone(),
                visits,
                totals,
                last_exit,
            }
        })
        .collect();

    let mut samples: BTreeMap<String, Vec<f64>> = BTreeMap::new();
    for issue in &issues {
        for (status, measured) in &issue.visits {
            if !measured.is_empty() {
                samples
                    .entry(status.clone())
                    .or_default()
                    .push(issue.totals[status]);
            }
        }
    }

    let mut reported: Vec<String> = issues
        .iter()
        .flat_map(|issue| issue.visits.keys().cloned())
        .collect();
    reported.sort();
    reported.dedup();

    StatusDurationReport {
        statuses: reported,
        issues,
        summary: samples
            .into_iter()
            .filter_map(|(status, values)| {
                DurationStats::from_samples(&values, calendar).map(|stats| (status, stats))
            })
            .collect(),
    }
}
