use super::types::DurationStats;
use crate::calendar::BusinessCalendar;

pub fn average(samples: &[f64]) -> Option<f64> {
    if samples.is_empty() {
        return None;
    }
    Some(samples.iter().sum::<f64>() / samples.len() as f64)
}

/// Median with the mean of the two middle values for even counts.
pub fn median(samples: &[f64]) -> Option<f64> {
    if samples.is_empty() {
        return None;
    }
    let mut sorted = samples.to_vec();
    sorted.sort_by(f64::total_cmp);
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        Some((sorted[mid - 1] + sorted[mid]) / 2.0)
    } else {
        Some(sorted[mid])
    }
}

impl DurationStats {
    /// `None` for an empty sample set.
    pub fn from_samples(samples: &[f64], calendar: &BusinessCalendar) -> Option<Self> {
        let average_seconds = average(samples)?;
        let median_seconds = median(samples)?;
        Some(Self {
            count: samples.len(),
            average_seconds,
            median_seconds,
            average_days: calendar.business_days(average_seconds),
            median_days: calendar.business_days(median_seconds),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_average_and_median() {
        assert_eq!(average(&[]), None);
        assert_eq!(median(&[]), None);
        assert_eq!(average(&[1.0, 2.0, 6.0]), Some(3.0));
        assert_eq!(median(&[6.0, 1.0, 2.0]), Some(2.0));
        assert_eq!(median(&[4.0, 1.0, 3.0, 2.0]), Some(2.5));
    }

    #[test]
    fn test_duration_stats_in_business_days() {
        let day = 8.0 * 3600.0;
        let stats = DurationStats::from_samples(&[day, 2.0 * day, 6.0 * day], &BusinessCalendar::default())
            .unwrap();
        assert_eq!(stats.count, 3);
        assert_eq!(stats.average_days, 3.0);
        assert_eq!(stats.median_days, 2.0);
        assert!(DurationStats::from_samples(&[], &BusinessCalendar::default()).is_none());
    }
}
