//! Business Calendar
//!
//! Converts wall-clock ranges into "business seconds": at most
//! `hours_per_day` per working weekday, nothing on other days. There is no
//! notion of holidays or working hours of day; only the weekday matters.
//! The day walk mirrors the historical reports exactly, including the
//! day end at 23:59 rather than 23:59:59.

use crate::error::{FlowMetricsError, Result};
use chrono::{DateTime, Datelike, FixedOffset, TimeDelta, Timelike, Weekday};
use serde::{Deserialize, Serialize};

pub const SECONDS_PER_HOUR: f64 = 3600.0;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BusinessCalendar {
    pub work_weekdays: Vec<Weekday>,
    pub hours_per_day: u32,
}

impl Default for BusinessCalendar {
    fn default() -> Self {
        Self {
            work_weekdays: vec![
                Weekday::Mon,
                Weekday::Tue,
                Weekday::Wed,
                Weekday::Thu,
                Weekday::Fri,
            ],
            hours_per_day: 8,
        }
    }
}

impl BusinessCalendar {
    pub fn new(work_weekdays: Vec<Weekday>, hours_per_day: u32) -> Result<Self> {
        let calendar = Self {
            work_weekdays,
            hours_per_day,
        };
        calendar.validate()?;
        Ok(calendar)
    }

    pub fn validate(&self) -> Result<()> {
        if self.work_weekdays.is_empty() {
            return Err(FlowMetricsError::InvalidCalendar {
                reason: "at least one working weekday is required".to_string(),
            });
        }
        if !(1..=24).contains(&self.hours_per_day) {
            return Err(FlowMetricsError::InvalidCalendar {
                reason: format!("hours_per_day must be within 1..=24, got {}", self.hours_per_day),
            });
        }
        Ok(())
    }

    pub fn is_workday(&self, weekday: Weekday) -> bool {
        self.work_weekdays.contains(&weekday)
    }

    pub fn seconds_per_day(&self) -> f64 {
        f64::from(self.hours_per_day) * SECONDS_PER_HOUR
    }

    /// Business seconds expressed in business days.
    pub fn business_days(&self, seconds: f64) -> f64 {
        seconds / self.seconds_per_day()
    }

    /// Business time between `start` and `end`, in seconds.
    ///
    /// `start == end` yields 0; `end < start` is rejected.
    pub fn business_seconds(
        &self,
        start: DateTime<FixedOffset>,
        end: DateTime<FixedOffset>,
    ) -> Result<f64> {
        self.business_time(start, end).map(delta_seconds)
    }

    /// Same as [`business_seconds`](Self::business_seconds) without the
    /// conversion to floating point.
    pub fn business_time(
        &self,
        start: DateTime<FixedOffset>,
        end: DateTime<FixedOffset>,
    ) -> Result<TimeDelta> {
        if end < start {
            return Err(FlowMetricsError::InvalidRange { start, end });
        }

        let day_capacity = TimeDelta::hours(i64::from(self.hours_per_day));
        let end_date = end.date_naive();
        let mut total = TimeDelta::zero();
        let mut cursor = start;

        while cursor <= end {
            if !self.is_workday(cursor.weekday()) {
                cursor = start_of_next_day(cursor)?;
                continue;
            }

            if cursor.date_naive() != end_date {
                let day_end = cursor
                    .with_hour(23)
                    .and_then(|c| c.with_minute(59))
                    .ok_or(FlowMetricsError::CalendarOverflow)?;
                total += (day_end - cursor).min(day_capacity);
                cursor = start_of_next_day(cursor)?;
            } else {
                total += (end - cursor).min(day_capacity);
                break;
            }
        }

        Ok(total)
    }
}

/// Next calendar day at 00:00 in the cursor's offset. Seconds and
/// sub-seconds of the cursor are carried over.
fn start_of_next_day(cursor: DateTime<FixedOffset>) -> Result<DateTime<FixedOffset>> {
    cursor
        .checked_add_signed(TimeDelta::days(1))
        .and_then(|next| next.with_hour(0))
        .and_then(|next| next.with_minute(0))
        .ok_or(FlowMetricsError::CalendarOverflow)
}

/// Seconds in a non-negative delta, keeping sub-second precision.
pub fn delta_seconds(delta: TimeDelta) -> f64 {
    delta.to_std().map(|d| d.as_secs_f64()).unwrap_or(0.0)
}
