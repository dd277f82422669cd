use super::types::*;
use crate::history::{DONE, RELEASED};
use std::collections::BTreeMap;
use tracing::warn;

pub const UNASSIGNED: &str = "Unassigned";

/// Months covered by the rolling top-contributor ranking.
pub const ROLLING_MONTHS: usize = 3;
const TOP_CONTRIBUTORS: usize = 3;

/// Completed tickets and story points per month, team and assignee.
///
/// Completion is the last release, or the last move to done when the
/// issue was never released. Issues with neither are skipped. `team`
/// restricts the report to one team (case-insensitive).
pub fn throughput_report(analyses: &[IssueAnalysis], team: Option<&str>) -> ThroughputReport {
    let mut report = ThroughputReport::default();
    // month -> team -> assignee -> contribution
    let mut buckets: BTreeMap<String, BTreeMap<String, BTreeMap<String, Contribution>>> =
        BTreeMap::new();

    for analysis in analyses {
        if team.is_some_and(|wanted| !analysis.team.eq_ignore_ascii_case(wanted.trim())) {
            continue;
        }

        let completed = match analysis.timestamps.get(RELEASED) {
            Some(released) => released,
            None => match analysis.timestamps.get(DONE) {
                Some(done) => {
                    warn!(issue.key = %analysis.key, "No released timestamp; using done timestamp instead");
                    report.fell_back_to_done += 1;
                    done
                }
                None => {
                    warn!(issue.key = %analysis.key, "Neither released nor done; skipping");
                    report.missing_completion += 1;
                    continue;
                }
            },
        };

        let assignee = analysis.assignee.as_deref().unwrap_or(UNASSIGNED);
        let contribution = buckets
            .entry(completed.format("%Y-%m").to_string())
            .or_default()
            .entry(analysis.team.clone())
            .or_default()
            .entry(assignee.to_string())
            .or_default();
        contribution.points += analysis.story_points;
        contribution.tickets += 1;
    }

    report.months = buckets
        .into_iter()
        .map(|(month, teams)| {
            let teams = teams
                .into_iter()
                .map(|(team, members)| summarize_team(team, members))
                .collect();
            (month, teams)
        })
        .collect();
    report.top_contributors = rolling_top_contributors(&report.months);

    report
}

/// Top assignees by mean ratio to their team average over the last
/// [`ROLLING_MONTHS`] months present in `months`.
///
/// A month only contributes a ratio when the team average is positive.
/// Assignees are matched by name across teams.
pub fn rolling_top_contributors(months: &BTreeMap<String, Vec<TeamThroughput>>) -> TopContributors {
    let window: Vec<&String> = months.keys().rev().take(ROLLING_MONTHS).rev().collect();

    // assignee -> (points ratios, tickets ratios, total points, total tickets)
    let mut per_assignee: BTreeMap<&str, (Vec<f64>, Vec<f64>, f64, u32)> = BTreeMap::new();
    for month in &window {
        for team in &months[*month] {
            for member in &team.members {
                let entry = per_assignee.entry(member.assignee.as_str()).or_default();
                if team.average_points_per_member > 0.0 {
                    entry.0.push(member.points / team.average_points_per_member);
                }
                if team.average_tickets_per_member > 0.0 {
                    entry.1.push(f64::from(member.tickets) / team.average_tickets_per_member);
                }
                entry.2 += member.points;
                entry.3 += member.tickets;
            }
        }
    }

    TopContributors {
        months: window.into_iter().cloned().collect(),
        points: rank(
            per_assignee
                .iter()
                .map(|(assignee, m)| (*assignee, m.0.as_slice(), m.2)),
        ),
        tickets: rank(
            per_assignee
                .iter()
                .map(|(assignee, m)| (*assignee, m.1.as_slice(), f64::from(m.3))),
        ),
    }
}

fn rank<'a>(metrics: impl Iterator<Item = (&'a str, &'a [f64], f64)>) -> Vec<TopContributor> {
    let mut ranked: Vec<TopContributor> = metrics
        .filter(|(_, ratios, _)| !ratios.is_empty())
        .map(|(assignee, ratios, total)| TopContributor {
            assignee: assignee.to_string(),
            average_ratio: ratios.iter().sum::<f64>() / ratios.len() as f64,
            total,
        })
        .collect();
    ranked.sort_by(|a, b| {
        b.average_ratio
            .total_cmp(&a.average_ratio)
            .then_with(|| a.assignee.cmp(&b.assignee))
    });
    ranked.truncate(TOP_CONTRIBUTORS);
    ranked
}

fn summarize_team(team: String, members: BTreeMap<String, Contribution>) -> TeamThroughput {
    let total_points: f64 = members.values().map(|c| c.points).sum();
    let total_tickets: u32 = members.values().map(|c| c.tickets).sum();
    let team_size = members.len() as f64;

    let (average_points, average_tickets) = if team_size > 0.0 {
        (total_points / team_size, f64::from(total_tickets) / team_size)
    } else {
        (0.0, 0.0)
    };
    let ratio = |value: f64, average: f64| if average > 0.0 { value / average } else { 0.0 };

    let mut members: Vec<MemberThroughput> = members
        .into_iter()
        .map(|(assignee, c)| MemberThroughput {
            points_ratio: ratio(c.points, average_points),
            tickets_ratio: ratio(f64::from(c.tickets), average_tickets),
            assignee,
            points: c.points,
            tickets: c.tickets,
        })
        .collect();
    members.sort_by(|a, b| {
        b.points
            .total_cmp(&a.points)
            .then_with(|| a.assignee.cmp(&b.assignee))
    });

    TeamThroughput {
        team,
        total_points,
        total_tickets,
        average_points_per_member: average_points,
        average_tickets_per_member: average_tickets,
        members,
    }
}
