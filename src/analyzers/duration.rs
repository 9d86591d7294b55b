//! Trip duration summary.

use crate::analyzers::types::DurationStats;
use crate::analyzers::utility::{mean, median, stddev};
use crate::error::{AnalysisError, AnalysisResult};
use crate::loader::TripRecord;

/// Sum, mean, population standard deviation, median, max and min of the kept
/// durations, plus the number of overdue trips.
#[tracing::instrument(skip_all, fields(trips = kept.len()))]
pub fn duration_stats(kept: &[TripRecord], overdue: &[TripRecord]) -> AnalysisResult<DurationStats> {
    let insufficient = || AnalysisError::InsufficientData { stage: "duration" };

    let durations: Vec<f64> = kept.iter().map(|t| t.duration).collect();

    let avg = mean(&durations).ok_or_else(insufficient)?;
    let std_dev = stddev(&durations, avg).ok_or_else(insufficient)?;
    let median = median(&durations).ok_or_else(insufficient)?;

    let max = durations.iter().copied().fold(f64::MIN, f64::max);
    let min = durations.iter().copied().fold(f64::MAX, f64::min);

    Ok(DurationStats {
        trips: durations.len(),
        total: durations.iter().sum(),
        mean: avg,
        std_dev,
        median,
        max,
        min,
        overdue: overdue.len(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::UserType;
    use chrono::NaiveDate;

    fn trip(duration: f64) -> TripRecord {
        TripRecord {
            start_time: NaiveDate::from_ymd_opt(2017, 3, 6)
                .unwrap()
                .and_hms_opt(8, 0, 0)
                .unwrap(),
            duration,
            start_station: "A".to_string(),
            end_station: "B".to_string(),
            user_type: Some(UserType::Subscriber),
            gender: None,
            birth_year: None,
            month: 3,
            weekday: 0,
            hour: 8,
        }
    }

    #[test]
    fn test_duration_summary() {
        let kept: Vec<_> = [300.0, 600.0, 900.0, 1200.0].into_iter().map(trip).collect();
        let overdue = vec![trip(400_000.0)];

        let stats = duration_stats(&kept, &overdue).unwrap();

        assert_eq!(stats.trips, 4);
        assert_eq!(stats.total, 3000.0);
        assert_eq!(stats.mean, 750.0);
        assert_eq!(stats.median, 750.0);
        assert_eq!(stats.max, 1200.0);
        assert_eq!(stats.min, 300.0);
        assert!((stats.std_dev - 335.410_196_6).abs() < 1e-6);
        assert_eq!(stats.overdue, 1);
    }

    #[test]
    fn test_summary_ordering_properties() {
        let kept: Vec<_> = [241.0, 250.5, 7000.0, 259_199.0, 1800.0]
            .into_iter()
            .map(trip)
            .collect();
        let stats = duration_stats(&kept, &[]).unwrap();

        assert!(stats.min <= stats.median && stats.median <= stats.max);
        assert!(stats.min <= stats.mean && stats.mean <= stats.max);
        assert!((stats.total - stats.trips as f64 * stats.mean).abs() < 1e-6);
    }

    #[test]
    fn test_empty_kept_is_insufficient() {
        let err = duration_stats(&[], &[trip(400_000.0)]).unwrap_err();
        assert!(err.is_insufficient_data());
    }
}
