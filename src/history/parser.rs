use super::types::{OrderedTransitionLog, StatusTransition};
use crate::error::{FlowMetricsError, Result};
use crate::jira::RawHistory;
use chrono::{DateTime, FixedOffset};
use regex::Regex;
use std::sync::LazyLock;
use tracing::{debug, warn};

/// Jira's native timestamp shape, e.g. `2023-01-02T10:00:00.000-0800`.
static JIRA_TIMESTAMP: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\d{4}-\d{2}-\d{2}T\d{2}:\d{2}:\d{2}\.\d{1,9}[+-]\d{4}$")
        .expect("timestamp pattern is valid")
});

const JIRA_TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f%z";

/// Parse a Jira changelog timestamp, keeping its UTC offset.
pub fn parse_jira_timestamp(value: &str) -> Result<DateTime<FixedOffset>> {
    let malformed = || FlowMetricsError::MalformedTimestamp {
        value: value.to_string(),
    };

    if !JIRA_TIMESTAMP.is_match(value) {
        return Err(malformed());
    }
    DateTime::parse_from_str(value, JIRA_TIMESTAMP_FORMAT).map_err(|_| malformed())
}

/// Build the ordered status log of one issue from its raw changelog.
///
/// Non-status field changes are ignored. A history record whose timestamp
/// does not parse is skipped with a warning instead of failing the issue;
/// the same goes for a status item without a target status. Skips are
/// counted on the returned log.
pub fn parse(histories: &[RawHistory]) -> OrderedTransitionLog {
    let mut transitions = Vec::new();
    let mut skipped = 0;

    for history in histories {
        let status_items: Vec<_> = history
            .items
            .iter()
            .filter(|item| item.is_status_change())
            .collect();
        if status_items.is_empty() {
            continue;
        }

        let timestamp = match parse_jira_timestamp(&history.created) {
            Ok(timestamp) => timestamp,
            Err(e) => {
                warn!(created = %history.created, error = %e, "Skipping status change with malformed timestamp");
                skipped += 1;
                continue;
            }
        };
        let author = history.author.as_ref().map(|a| a.display_name.as_str());

        for (sequence, item) in status_items.into_iter().enumerate() {
            let Some(to_status) = item.to_text.as_deref() else {
                warn!(created = %history.created, "Skipping status change without a target status");
                skipped += 1;
                continue;
            };
            transitions.push(
                StatusTransition::new(item.from_text.as_deref(), to_status, timestamp)
                    .with_author(author)
                    .with_sequence(sequence),
            );
        }
    }

    debug!(transitions = transitions.len(), skipped, "Parsed status history");
    OrderedTransitionLog::from_transitions(transitions).with_skipped_records(skipped)
}
