use chrono::{DateTime, FixedOffset};
use thiserror::Error;

/// Errors raised by the history, calendar and metrics layers.
#[derive(Debug, Error)]
pub enum FlowMetricsError {
    #[error("Malformed timestamp: {value:?} (expected YYYY-MM-DDTHH:MM:SS.f±HHMM)")]
    MalformedTimestamp { value: String },

    #[error("Invalid range: end {end} is before start {start}")]
    InvalidRange {
        start: DateTime<FixedOffset>,
        end: DateTime<FixedOffset>,
    },

    #[error("Calendar arithmetic left the representable date range")]
    CalendarOverflow,

    #[error("Invalid business calendar: {reason}")]
    InvalidCalendar { reason: String },

    #[error("Payload error: {0}")]
    Payload(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, FlowMetricsError>;
