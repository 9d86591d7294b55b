//! Most popular start hour, month and weekday.

use crate::analyzers::types::{Dimension, ModeCount, TemporalStats};
use crate::analyzers::utility::frequency_ranking;
use crate::calendar::{CalendarLabels, FilterParams};
use crate::error::{AnalysisError, AnalysisResult};
use crate::loader::TripRecord;

/// Reports the modal start hour, plus the modal month and weekday for
/// whichever of those the filter left at "All".
///
/// Ties resolve to the smallest value; only one mode is reported per
/// dimension.
#[tracing::instrument(skip_all, fields(trips = kept.len()))]
pub fn temporal_stats(
    kept: &[TripRecord],
    params: &FilterParams,
    labels: &CalendarLabels,
) -> AnalysisResult<TemporalStats> {
    let hour = first_mode(kept.iter().map(|t| t.hour), |h| labels.hour(h))
        .ok_or(AnalysisError::InsufficientData { stage: "temporal" })?;

    let month = if params.month.is_all() {
        dimension(kept.iter().map(|t| t.month), |m| labels.month(m))
    } else {
        Dimension::NotComputed
    };

    let weekday = if params.weekday.is_all() {
        dimension(kept.iter().map(|t| t.weekday), |d| labels.day(d))
    } else {
        Dimension::NotComputed
    };

    Ok(TemporalStats {
        hour,
        month,
        weekday,
    })
}

fn first_mode(
    values: impl Iterator<Item = u32>,
    label: impl Fn(u32) -> String,
) -> Option<ModeCount> {
    frequency_ranking(values)
        .into_iter()
        .next()
        .map(|(value, count)| ModeCount {
            value,
            label: label(value),
            count,
        })
}

fn dimension(values: impl Iterator<Item = u32>, label: impl Fn(u32) -> String) -> Dimension {
    match first_mode(values, label) {
        Some(mode) => Dimension::Computed(mode),
        None => Dimension::NotComputed,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::Selection;
    use crate::loader::UserType;
    use chrono::{Datelike, NaiveDateTime, Timelike};

    fn trip(start: &str) -> TripRecord {
        let start_time = NaiveDateTime::parse_from_str(start, "%Y-%m-%d %H:%M:%S").unwrap();
        TripRecord {
            start_time,
            duration: 600.0,
            start_station: "A".to_string(),
            end_station: "B".to_string(),
            user_type: Some(UserType::Customer),
            gender: None,
            birth_year: None,
            month: start_time.month(),
            weekday: start_time.weekday().num_days_from_monday(),
            hour: start_time.hour(),
        }
    }

    #[test]
    fn test_all_dimensions_when_unfiltered() {
        let kept = vec![
            // Friday
            trip("2017-06-23 17:05:00"),
            trip("2017-06-23 17:45:00"),
            // Monday
            trip("2017-05-01 08:00:00"),
        ];

        let stats = temporal_stats(&kept, &FilterParams::all(), &CalendarLabels::default()).unwrap();

        assert_eq!(stats.hour.value, 17);
        assert_eq!(stats.hour.label, "5 PM");
        assert_eq!(stats.hour.count, 2);

        let month = stats.month.computed().unwrap();
        assert_eq!(month.label, "June");
        assert_eq!(month.count, 2);

        let weekday = stats.weekday.computed().unwrap();
        assert_eq!(weekday.label, "Friday");
        assert_eq!(weekday.count, 2);
    }

    #[test]
    fn test_filtered_dimensions_are_not_computed() {
        let kept = vec![trip("2017-06-23 17:05:00")];
        let params = FilterParams {
            month: Selection::Only(6),
            weekday: Selection::All,
        };

        let stats = temporal_stats(&kept, &params, &CalendarLabels::default()).unwrap();
        assert_eq!(stats.month, Dimension::NotComputed);
        assert!(stats.weekday.computed().is_some());

        let params = FilterParams {
            month: Selection::All,
            weekday: Selection::Only(4),
        };
        let stats = temporal_stats(&kept, &params, &CalendarLabels::default()).unwrap();
        assert!(stats.month.computed().is_some());
        assert_eq!(stats.weekday, Dimension::NotComputed);
    }

    #[test]
    fn test_ties_report_a_single_first_value() {
        let kept = vec![
            trip("2017-06-23 09:00:00"),
            trip("2017-06-23 07:00:00"),
            trip("2017-06-23 09:30:00"),
            trip("2017-06-23 07:30:00"),
        ];

        let stats = temporal_stats(&kept, &FilterParams::all(), &CalendarLabels::default()).unwrap();
        assert_eq!(stats.hour.value, 7);
        assert_eq!(stats.hour.count, 2);
    }

    #[test]
    fn test_empty_kept_is_insufficient() {
        let err = temporal_stats(&[], &FilterParams::all(), &CalendarLabels::default()).unwrap_err();
        assert!(err.is_insufficient_data());
    }
}
