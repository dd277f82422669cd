use super::types::{OrderedTransitionLog, StatusInterval};
use chrono::{DateTime, FixedOffset};

/// Pair entries into and exits out of `status_name` into closed intervals.
///
/// At most one visit is open at a time. Re-entering without a recorded
/// exit moves the start forward. A visit still open at the end of the log
/// produces nothing. Status names compare exactly. Items recorded at the
/// same instant keep their record order, so an entry and exit in one
/// record yields a zero-length visit.
pub fn extract_intervals(log: &OrderedTransitionLog, status_name: &str) -> Vec<StatusInterval> {
    let mut intervals = Vec::new();
    let mut open_start: Option<DateTime<FixedOffset>> = None;

    for transition in log {
        if transition.to_status == status_name {
            open_start = Some(transition.timestamp);
        } else if transition.from_status.as_deref() == Some(status_name) {
            if let Some(start) = open_start.take() {
                intervals.push(StatusInterval {
                    status_name: status_name.to_string(),
                    start,
                    end: transition.timestamp,
                });
            }
        }
    }

    intervals
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::history::StatusTransition;

    fn ts(raw: &str) -> DateTime<FixedOffset> {
        DateTime::parse_from_rfc3339(raw).unwrap()
    }

    fn log(entries: &[(&str, Option<&str>, &str)]) -> OrderedTransitionLog {
        OrderedTransitionLog::from_transitions(
            entries
                .iter()
                .map(|(at, from, to)| StatusTransition::new(*from, to, ts(at)))
                .collect(),
        )
    }

    const T1: &str = "2023-04-03T09:00:00-07:00";
    const T2: &str = "2023-04-04T09:00:00-07:00";
    const T3: &str = "2023-04-05T09:00:00-07:00";
    const T4: &str = "2023-04-06T09:00:00-07:00";

    #[test]
    fn test_two_visits_make_two_intervals() {
        let log = log(&[
            (T1, Some("Open"), "In Progress"),
            (T2, Some("In Progress"), "In Review"),
            (T3, Some("In Review"), "In Progress"),
            (T4, Some("In Progress"), "Done"),
        ]);

        let intervals = extract_intervals(&log, "In Progress");
        assert_eq!(intervals.len(), 2);
        assert_eq!((intervals[0].start, intervals[0].end), (ts(T1), ts(T2)));
        assert_eq!((intervals[1].start, intervals[1].end), (ts(T3), ts(T4)));
        assert!(intervals.iter().all(|i| i.status_name == "In Progress"));

        let review = extract_intervals(&log, "In Review");
        assert_eq!(review.len(), 1);
        assert_eq!((review[0].start, review[0].end), (ts(T2), ts(T3)));
    }

    #[test]
    fn test_dangling_entry_is_dropped() {
        let log = log(&[(T1, Some("Open"), "In Progress")]);
        assert!(extract_intervals(&log, "In Progress").is_empty());
    }

    #[test]
    fn test_reentry_without_exit_keeps_latest_start() {
        let log = log(&[
            (T1, Some("Open"), "In Progress"),
            (T2, None, "In Progress"),
            (T3, Some("In Progress"), "Done"),
        ]);
        let intervals = extract_intervals(&log, "In Progress");
        assert_eq!(intervals.len(), 1);
        assert_eq!(intervals[0].start, ts(T2));
        assert_eq!(intervals[0].end, ts(T3));
    }

    #[test]
    fn test_exit_without_entry_is_ignored() {
        let log = log(&[
            (T1, Some("In Progress"), "In Review"),
            (T2, Some("In Review"), "Done"),
        ]);
        assert!(extract_intervals(&log, "In Progress").is_empty());
        assert_eq!(extract_intervals(&log, "In Review").len(), 1);
    }

    #[test]
    fn test_status_match_is_exact() {
        let log = log(&[(T1, Some("Open"), "in progress"), (T2, Some("in progress"), "Done")]);
        assert!(extract_intervals(&log, "In Progress").is_empty());
    }

    #[test]
    fn test_extraction_is_idempotent() {
        let log = log(&[(T1, Some("Open"), "In Review"), (T2, Some("In Review"), "Done")]);
        assert_eq!(extract_intervals(&log, "In Review"), extract_intervals(&log, "In Review"));
    }
}
