use crate::calendar::BusinessCalendar;
use crate::error::Result;
use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// A recorded change of an issue's workflow status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusTransition {
    pub from_status: Option<String>,
    pub to_status: String,
    pub timestamp: DateTime<FixedOffset>,
    pub author: Option<String>,
    /// Position among the status items of the same history record.
    #[serde(default)]
    pub sequence: usize,
}

impl StatusTransition {
    pub fn new(
        from_status: Option<&str>,
        to_status: &str,
        timestamp: DateTime<FixedOffset>,
    ) -> Self {
        Self {
            from_status: from_status.map(str::to_string),
            to_status: to_status.to_string(),
            timestamp,
            author: None,
            sequence: 0,
        }
    }

    pub fn with_author(mut self, author: Option<&str>) -> Self {
        self.author = author.map(str::to_string);
        self
    }

    pub fn with_sequence(mut self, sequence: usize) -> Self {
        self.sequence = sequence;
        self
    }

    // Chronological first, then the order items were recorded in; the rest
    // only makes the order total so that record order never leaks into the log.
    fn chronological_cmp(&self, other: &Self) -> Ordering {
        self.timestamp
            .cmp(&other.timestamp)
            .then_with(|| {
                self.timestamp
                    .offset()
                    .local_minus_utc()
                    .cmp(&other.timestamp.offset().local_minus_utc())
            })
            .then_with(|| self.sequence.cmp(&other.sequence))
            .then_with(|| self.to_status.cmp(&other.to_status))
            .then_with(|| self.from_status.cmp(&other.from_status))
            .then_with(|| self.author.cmp(&other.author))
    }
}

/// Status transitions of one issue in ascending chronological order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct OrderedTransitionLog {
    transitions: Vec<StatusTransition>,
    skipped_records: usize,
}

impl OrderedTransitionLog {
    /// Sorts the given transitions; this is the only place ordering is
    /// established.
    pub fn from_transitions(mut transitions: Vec<StatusTransition>) -> Self {
        transitions.sort_by(StatusTransition::chronological_cmp);
        Self {
            transitions,
            skipped_records: 0,
        }
    }

    pub(crate) fn with_skipped_records(mut self, skipped: usize) -> Self {
        self.skipped_records = skipped;
        self
    }

    pub fn transitions(&self) -> &[StatusTransition] {
        &self.transitions
    }

    pub fn iter(&self) -> std::slice::Iter<'_, StatusTransition> {
        self.transitions.iter()
    }

    pub fn len(&self) -> usize {
        self.transitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transitions.is_empty()
    }

    /// History records dropped during parsing (bad timestamp, missing target status).
    pub fn skipped_records(&self) -> usize {
        self.skipped_records
    }
}

impl<'a> IntoIterator for &'a OrderedTransitionLog {
    type Item = &'a StatusTransition;
    type IntoIter = std::slice::Iter<'a, StatusTransition>;

    fn into_iter(self) -> Self::IntoIter {
        self.transitions.iter()
    }
}

/// One completed visit to a status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusInterval {
    pub status_name: String,
    pub start: DateTime<FixedOffset>,
    pub end: DateTime<FixedOffset>,
}

impl StatusInterval {
    /// Wall-clock length in seconds.
    pub fn raw_duration_seconds(&self) -> f64 {
        crate::calendar::delta_seconds(self.end - self.start)
    }

    pub fn business_duration_seconds(&self, calendar: &BusinessCalendar) -> Result<f64> {
        calendar.business_seconds(self.start, self.end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ts(raw: &str) -> DateTime<FixedOffset> {
        DateTime::parse_from_rfc3339(raw).unwrap()
    }

    #[test]
    fn test_log_is_sorted_ascending() {
        let log = OrderedTransitionLog::from_transitions(vec![
            StatusTransition::new(Some("In Progress"), "Done", ts("2023-01-05T10:00:00-08:00")),
            StatusTransition::new(Some("Open"), "In Progress", ts("2023-01-02T10:00:00-08:00")),
        ]);

        let statuses: Vec<_> = log.iter().map(|t| t.to_status.as_str()).collect();
        assert_eq!(statuses, vec!["In Progress", "Done"]);
        assert!(log
            .transitions()
            .windows(2)
            .all(|pair| pair[0].timestamp <= pair[1].timestamp));
    }

    #[test]
    fn test_interval_raw_duration() {
        let interval = StatusInterval {
            status_name: "In Review".to_string(),
            start: ts("2023-01-02T10:00:00-08:00"),
            end: ts("2023-01-02T12:30:00.250-08:00"),
        };
        assert_eq!(interval.raw_duration_seconds(), 9000.25);
    }
}
