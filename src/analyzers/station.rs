//! Most popular start station, end station and route.

use crate::analyzers::types::{StationMode, StationStats};
use crate::analyzers::utility::modes;
use crate::error::{AnalysisError, AnalysisResult};
use crate::loader::TripRecord;

/// Modal start station, end station and `"{start} to {end}"` route.
///
/// Unlike [`crate::analyzers::temporal::temporal_stats`], every label tied
/// for the top count is reported, in lexicographic order.
#[tracing::instrument(skip_all, fields(trips = kept.len()))]
pub fn station_stats(kept: &[TripRecord]) -> AnalysisResult<StationStats> {
    if kept.is_empty() {
        return Err(AnalysisError::InsufficientData { stage: "station" });
    }

    let start = station_mode(kept.iter().map(|t| t.start_station.as_str()));
    let end = station_mode(kept.iter().map(|t| t.end_station.as_str()));

    let routes: Vec<String> = kept.iter().map(TripRecord::route).collect();
    let route = station_mode(routes.iter().map(String::as_str));

    Ok(StationStats { start, end, route })
}

fn station_mode<'a>(labels: impl Iterator<Item = &'a str>) -> StationMode {
    let (tied, count) = modes(labels).unwrap_or_default();
    StationMode {
        labels: tied.into_iter().map(str::to_string).collect(),
        count,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::UserType;
    use chrono::NaiveDate;

    fn trip(start: &str, end: &str) -> TripRecord {
        let start_time = NaiveDate::from_ymd_opt(2017, 3, 6)
            .unwrap()
            .and_hms_opt(8, 0, 0)
            .unwrap();
        TripRecord {
            start_time,
            duration: 600.0,
            start_station: start.to_string(),
            end_station: end.to_string(),
            user_type: Some(UserType::Subscriber),
            gender: None,
            birth_year: None,
            month: 3,
            weekday: 0,
            hour: 8,
        }
    }

    #[test]
    fn test_single_modes() {
        let kept = vec![
            trip("Clinton St", "Canal St"),
            trip("Clinton St", "Canal St"),
            trip("Wood St", "Lake Shore Dr"),
        ];

        let stats = station_stats(&kept).unwrap();

        assert_eq!(stats.start.labels, vec!["Clinton St"]);
        assert_eq!(stats.start.count, 2);
        assert!(!stats.start.is_tied());
        assert_eq!(stats.end.labels, vec!["Canal St"]);
        assert_eq!(stats.route.labels, vec!["Clinton St to Canal St"]);
        assert_eq!(stats.route.count, 2);
    }

    #[test]
    fn test_tied_start_stations_are_all_listed() {
        let kept = vec![
            trip("Wood St", "Canal St"),
            trip("Clinton St", "Canal St"),
            trip("Wood St", "Lake Shore Dr"),
            trip("Clinton St", "Lake Shore Dr"),
            trip("Damen Ave", "Lake Shore Dr"),
        ];

        let stats = station_stats(&kept).unwrap();

        assert_eq!(stats.start.labels, vec!["Clinton St", "Wood St"]);
        assert_eq!(stats.start.count, 2);
        assert!(stats.start.is_tied());

        assert_eq!(stats.end.labels, vec!["Lake Shore Dr"]);
        assert_eq!(stats.end.count, 3);

        // every route occurs once
        assert_eq!(stats.route.labels.len(), 5);
        assert_eq!(stats.route.count, 1);
    }

    #[test]
    fn test_empty_kept_is_insufficient() {
        let err = station_stats(&[]).unwrap_err();
        assert!(err.is_insufficient_data());
    }
}
