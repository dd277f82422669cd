use super::types::OrderedTransitionLog;
use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

pub const CODE_REVIEW: &str = "code_review";
pub const RELEASED: &str = "released";
pub const DONE: &str = "done";

/// Which occurrence of a label's statuses is meaningful.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectionPolicy {
    /// Chronologically first entry (e.g. review started)
    FirstEntry,
    /// Chronologically last entry (e.g. final release)
    LastEntry,
}

/// A named group of raw status names treated as equivalent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackedLabel {
    pub name: String,
    pub statuses: BTreeSet<String>,
    pub policy: SelectionPolicy,
}

impl TrackedLabel {
    pub fn new<I, S>(name: &str, statuses: I, policy: SelectionPolicy) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            name: name.to_string(),
            statuses: statuses
                .into_iter()
                .map(|s| normalize_status(s.as_ref()))
                .collect(),
            policy,
        }
    }

    /// Case-insensitive membership test.
    pub fn matches(&self, status: &str) -> bool {
        let status = normalize_status(status);
        self.statuses.iter().any(|s| normalize_status(s) == status)
    }
}

fn normalize_status(status: &str) -> String {
    status.trim().to_lowercase()
}

/// Labels used by the cycle-time and throughput reports.
pub fn default_labels() -> Vec<TrackedLabel> {
    vec![
        TrackedLabel::new(
            CODE_REVIEW,
            [
                "code review",
                "in code review",
                "to review",
                "to code review",
                "in review",
                "in design review",
            ],
            SelectionPolicy::FirstEntry,
        ),
        TrackedLabel::new(RELEASED, ["released"], SelectionPolicy::LastEntry),
        TrackedLabel::new(DONE, ["done"], SelectionPolicy::LastEntry),
    ]
}

/// Timestamps selected per label; `None` means the issue never reached it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ExtractedTimestamps(BTreeMap<String, Option<DateTime<FixedOffset>>>);

impl ExtractedTimestamps {
    pub fn get(&self, label: &str) -> Option<DateTime<FixedOffset>> {
        self.0.get(label).copied().flatten()
    }

    /// Whether the label was requested at all, regardless of a match.
    pub fn contains_label(&self, label: &str) -> bool {
        self.0.contains_key(label)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<DateTime<FixedOffset>>)> {
        self.0.iter().map(|(label, ts)| (label.as_str(), *ts))
    }
}

/// Select one timestamp per label from an ordered log.
///
/// Selection is a min/max over the timestamps of transitions into any of
/// the label's statuses, so the result does not depend on scan direction.
/// Timestamps earlier than any analysis window are returned as-is; callers
/// filter by window.
pub fn interpret(log: &OrderedTransitionLog, labels: &[TrackedLabel]) -> ExtractedTimestamps {
    let selected = labels
        .iter()
        .map(|label| {
            let entries = log
                .iter()
                .filter(|t| label.matches(&t.to_status))
                .map(|t| t.timestamp);
            let timestamp = match label.policy {
                SelectionPolicy::FirstEntry => entries.min(),
                SelectionPolicy::LastEntry => entries.max(),
            };
            (label.name.clone(), timestamp)
        })
        .collect();

    ExtractedTimestamps(selected)
}
