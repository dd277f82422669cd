use super::cycle_time::ALL_TEAMS;
use super::types::*;
use crate::calendar::SECONDS_PER_HOUR;
use crate::error::Result;
use serde::Serialize;
use std::collections::BTreeMap;

pub struct MetricsReporter;

impl MetricsReporter {
    pub fn format_cycle_time_report(report: &CycleTimeReport, detailed: bool) -> String {
        let mut out = String::new();

        out.push_str("⏱️  CYCLE TIME REPORT (code review → released)\n");
        out.push_str("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━\n");
        if let Some(start) = report.window_start {
            out.push_str(&format!("   Window start: {}\n", start.format("%Y-%m-%d %:z")));
        }
        out.push('\n');

        if report.entries.is_empty() {
            out.push_str("   No issues with both a review and a release timestamp.\n");
        }

        for (team, months) in &report.teams {
            push_team_months(&mut out, team, months);
        }
        if !report.all.is_empty() {
            push_team_months(&mut out, ALL_TEAMS, &report.all);
        }

        if detailed && !report.entries.is_empty() {
            out.push_str("📋 ISSUES\n");
            for entry in &report.entries {
                out.push_str(&format!(
                    "   {} ({}): review {} → released {}: {:.2}h\n",
                    entry.key,
                    entry.team,
                    entry.review_started.to_rfc3339(),
                    entry.released.to_rfc3339(),
                    entry.business_seconds / SECONDS_PER_HOUR,
                ));
            }
            out.push('\n');
        }

        let skipped = report.missing_timestamps
            + report.excluded_before_window
            + report.review_after_release
            + report.no_business_time;
        if skipped > 0 {
            out.push_str(&format!(
                "   Skipped: {} missing timestamps, {} released before window, {} reviewed after release, {} without business time\n",
                report.missing_timestamps,
                report.excluded_before_window,
                report.review_after_release,
                report.no_business_time
            ));
        }

        out
    }

    pub fn format_status_duration_report(report: &StatusDurationReport) -> String {
        let mut out = String::new();

        out.push_str("🔁 TIME IN STATUS (business hours)\n");
        out.push_str("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━\n\n");

        for issue in &report.issues {
            out.push_str(&format!("   {} ({})\n", issue.key, issue.team));
            for status in &report.statuses {
                let visits = issue.visits.get(status).map_or(0, Vec::len);
                let total = issue.totals.get(status).copied().unwrap_or(0.0);
                out.push_str(&format!(
                    "      {:<18} {:>8.2}h over {} visit(s)\n",
                    status,
                    total / SECONDS_PER_HOUR,
                    visits
                ));
            }
        }

        if !report.summary.is_empty() {
            out.push_str("\n📊 SUMMARY\n");
            for (status, stats) in &report.summary {
                out.push_str(&format!(
                    "   {:<18} issues: {:<4} avg: {:>7.2}h  median: {:>7.2}h\n",
                    status,
                    stats.count,
                    stats.average_seconds / SECONDS_PER_HOUR,
                    stats.median_seconds / SECONDS_PER_HOUR,
                ));
            }
        }

        out
    }

    pub fn format_throughput_report(report: &ThroughputReport) -> String {
        let mut out = String::new();

        out.push_str("📦 THROUGHPUT REPORT\n");
        out.push_str("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━\n");

        for (month, teams) in &report.months {
            out.push_str(&format!("\nMonth: {month}\n"));
            for team in teams {
                out.push_str(&format!("Team: {}\n", team.team));
                out.push_str(&format!("   Total Points: {}\n", team.total_points));
                out.push_str(&format!("   Total Tickets: {}\n", team.total_tickets));
                out.push_str(&format!(
                    "   Average Points per Member: {:.2}\n",
                    team.average_points_per_member
                ));
                out.push_str(&format!(
                    "   Average Tickets per Member: {:.2}\n",
                    team.average_tickets_per_member
                ));
                for member in &team.members {
                    out.push_str(&format!(
                        "   {}: Points: {}, Points Ratio: {:.2}, Tickets: {}, Tickets Ratio: {:.2}\n",
                        member.assignee,
                        member.points,
                        member.points_ratio,
                        member.tickets,
                        member.tickets_ratio
                    ));
                }
            }
        }

        let top = &report.top_contributors;
        if !top.months.is_empty() {
            out.push_str(&format!(
                "\n🏆 TOP CONTRIBUTORS ({} to {})\n",
                top.months[0],
                top.months[top.months.len() - 1]
            ));
            out.push_str("Points:\n");
            for (rank, c) in top.points.iter().enumerate() {
                out.push_str(&format!(
                    "   {}. {}: Average Ratio: {:.2}, Total Points: {}\n",
                    rank + 1,
                    c.assignee,
                    c.average_ratio,
                    c.total
                ));
            }
            out.push_str("Tickets:\n");
            for (rank, c) in top.tickets.iter().enumerate() {
                out.push_str(&format!(
                    "   {}. {}: Average Ratio: {:.2}, Total Tickets: {}\n",
                    rank + 1,
                    c.assignee,
                    c.average_ratio,
                    c.total
                ));
            }
        }

        if report.fell_back_to_done > 0 || report.missing_completion > 0 {
            out.push_str(&format!(
                "\n   {} issue(s) counted by done date, {} skipped without completion\n",
                report.fell_back_to_done, report.missing_completion
            ));
        }

        out
    }

    pub fn format_release_failure_report(report: &ReleaseFailureReport) -> String {
        let mut out = String::new();

        out.push_str("🚀 RELEASE FAILURE REPORT\n");
        out.push_str("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━\n");

        if report.months.is_empty() {
            out.push_str("   No releases found.\n");
        }

        for (month, outcome) in &report.months {
            out.push_str(&format!("\nMonth: {month}\n"));
            for event in &outcome.events {
                out.push_str(&format!(
                    "   {} {} at {} ({} linked)\n",
                    if event.failed { "❌ FAILED RELEASE" } else { "✅ RELEASE" },
                    event.issue,
                    event.released_at.to_rfc3339(),
                    event.linked_issues.len()
                ));
            }
            out.push_str(&format!(
                "   Total of {} releases for {}, number of failed: {}\n",
                outcome.releases, month, outcome.failed
            ));
            out.push_str(&format!(
                "   Linked tickets: {}, in failed releases: {}\n",
                outcome.linked_tickets, outcome.failed_linked_tickets
            ));
            out.push_str(&format!("   Failure rate: {:.2}%\n", outcome.failure_rate));
            if let Some(rate) = outcome.linked_failure_rate {
                out.push_str(&format!("   Linked ticket failure rate: {rate:.2}%\n"));
            }
        }

        out.push_str(&format!(
            "\n📊 Total failure rate over the period: {:.2}% ({} of {} releases)\n",
            report.overall_failure_rate, report.total_failed, report.total_releases
        ));
        if !report.exempted.is_empty() {
            out.push_str(&format!("   Exempted: {}\n", report.exempted.join(", ")));
        }

        out
    }

    /// Numbered status changes of one issue, oldest first.
    pub fn format_timeline(analysis: &IssueAnalysis) -> String {
        let mut out = format!("🧾 {} status timeline\n", analysis.key);

        for (index, transition) in analysis.log.iter().enumerate() {
            out.push_str(&format!(
                "{} -- {}, {}, {} ---> {}\n",
                index + 1,
                transition.author.as_deref().unwrap_or("unknown"),
                transition.timestamp.to_rfc3339(),
                transition.from_status.as_deref().unwrap_or("None"),
                transition.to_status
            ));
        }

        for (label, timestamp) in analysis.timestamps.iter() {
            let shown = timestamp.map_or_else(|| "-".to_string(), |ts| ts.to_rfc3339());
            out.push_str(&format!("   {label}: {shown}\n"));
        }

        if analysis.log.skipped_records() > 0 {
            out.push_str(&format!(
                "   ({} malformed history record(s) skipped)\n",
                analysis.log.skipped_records()
            ));
        }

        out
    }

    pub fn export_json<T: Serialize>(report: &T) -> Result<String> {
        Ok(serde_json::to_string_pretty(report)?)
    }
}

fn push_team_months(out: &mut String, team: &str, months: &BTreeMap<String, DurationStats>) {
    out.push_str(&format!("👥 Team: {team}\n"));
    for (month, stats) in months {
        out.push_str(&format!(
            "   Month: {}, Issues: {}, Average Cycle Time: {:.2} days, Median Cycle Time: {:.2} days\n",
            month, stats.count, stats.average_days, stats.median_days
        ));
    }
    out.push('\n');
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::history::{default_labels, interpret, OrderedTransitionLog, StatusTransition};
    use chrono::DateTime;

    fn analysis() -> IssueAnalysis {
        let log = OrderedTransitionLog::from_transitions(vec![
            StatusTransition::new(
                Some("code review"),
                "released",
                DateTime::parse_from_rfc3339("2023-01-03T15:00:00-08:00").unwrap(),
            )
            .with_author(Some("user2")),
            StatusTransition::new(
                Some("open"),
                "code review",
                DateTime::parse_from_rfc3339("2023-01-02T10:00:00-08:00").unwrap(),
            )
            .with_author(Some("user1")),
        ]);
        IssueAnalysis {
            key: "ISSUE-123".to_string(),
            team: "Core".to_string(),
            assignee: None,
            story_points: 0.0,
            linked_issues: Vec::new(),
            timestamps: interpret(&log, &default_labels()),
            intervals: BTreeMap::new(),
            log,
        }
    }

    #[test]
    fn test_timeline_lists_transitions_in_order() {
        let timeline = MetricsReporter::format_timeline(&analysis());
        let lines: Vec<_> = timeline.lines().collect();
        assert_eq!(lines[1], "1 -- user1, 2023-01-02T10:00:00-08:00, open ---> code review");
        assert_eq!(lines[2], "2 -- user2, 2023-01-03T15:00:00-08:00, code review ---> released");
        assert!(timeline.contains("code_review: 2023-01-02T10:00:00-08:00"));
        assert!(timeline.contains("done: -"));
    }

    #[test]
    fn test_cycle_time_report_text() {
        let analyses = vec![analysis()];
        let report = super::super::cycle_time_report(&analyses, None, &Default::default()).unwrap();
        let text = MetricsReporter::format_cycle_time_report(&report, true);
        assert!(text.contains("👥 Team: Core"));
        assert!(text.contains("👥 Team: All"));
        assert!(text.contains("Month: 2023-01, Issues: 1"));
        assert!(text.contains("ISSUE-123 (Core)"));
    }

    #[test]
    fn test_release_failure_report_text() {
        let mut issue = analysis();
        issue.linked_issues = vec!["ENG-1".to_string()];
        issue.log = OrderedTransitionLog::from_transitions(vec![
            StatusTransition::new(
                Some("Code Review"),
                "Released",
                DateTime::parse_from_rfc3339("2023-01-03T15:00:00-08:00").unwrap(),
            ),
            StatusTransition::new(
                Some("Released"),
                "Reverted",
                DateTime::parse_from_rfc3339("2023-01-04T09:00:00-08:00").unwrap(),
            ),
        ]);

        let report = super::super::release_failure_report(&[issue], &[]);
        let text = MetricsReporter::format_release_failure_report(&report);
        assert!(text.contains("❌ FAILED RELEASE ISSUE-123 at 2023-01-03T15:00:00-08:00 (1 linked)"));
        assert!(text.contains("Total of 1 releases for 2023-01, number of failed: 1"));
        assert!(text.contains("Failure rate: 100.00%"));
        assert!(text.contains("Total failure rate over the period: 100.00% (1 of 1 releases)"));
        assert!(!text.contains("Exempted"));
    }

    #[test]
    fn test_export_json() {
        let analyses = vec![analysis()];
        let report = super::super::cycle_time_report(&analyses, None, &Default::default()).unwrap();
        let json = MetricsReporter::export_json(&report).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["entries"][0]["key"], "ISSUE-123");
        assert_eq!(value["all"]["2023-01"]["count"], 1);
    }
}
