//! Month/weekday selection, validity filtering and outlier partitioning.

use serde::Serialize;
use tracing::{debug, info};

use crate::calendar::FilterParams;
use crate::loader::{Dataset, TripRecord};

/// Outlier thresholds applied while cleaning.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CleaningLimits {
    /// Trips at or below this many seconds are noise.
    pub min_duration: f64,
    /// Three-day rental cap in seconds.
    pub max_duration: f64,
    pub min_age: i32,
    pub max_age: i32,
}

impl Default for CleaningLimits {
    fn default() -> Self {
        Self {
            min_duration: 240.0,
            max_duration: 259_200.0,
            min_age: 16,
            max_age: 100,
        }
    }
}

/// Open birth-year interval derived from the latest trip year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BirthYearBounds {
    pub latest_trip_year: i32,
    /// `latest_trip_year - max_age`
    pub min_year: i32,
    /// `latest_trip_year - min_age`
    pub max_year: i32,
}

impl BirthYearBounds {
    pub fn new(latest_trip_year: i32, limits: &CleaningLimits) -> Self {
        Self {
            latest_trip_year,
            min_year: latest_trip_year - limits.max_age,
            max_year: latest_trip_year - limits.min_age,
        }
    }

    /// Strictly inside the interval; both bounds are excluded.
    pub fn contains(&self, birth_year: i32) -> bool {
        self.min_year < birth_year && birth_year < self.max_year
    }
}

/// Output of [`filter_trips`].
#[derive(Debug, Clone, PartialEq)]
pub struct Partitions {
    /// Analysis-ready trips.
    pub kept: Vec<TripRecord>,
    /// Trips longer than the rental cap.
    pub overdue: Vec<TripRecord>,
    /// Trips with `birth_year < min_year`. `None` when the dataset has no
    /// demographic columns.
    pub underage: Option<Vec<TripRecord>>,
    /// `None` without demographics or when nothing survived the duration trim.
    pub birth_year_bounds: Option<BirthYearBounds>,
}

/// Filters and partitions a dataset.
///
/// Steps run in order, each on the survivors of the previous one:
/// month, weekday, user type present, overdue split, duration trim, and
/// (for demographic datasets) the birth-year trim.
#[tracing::instrument(skip(dataset), fields(trips = dataset.len()))]
pub fn filter_trips(
    dataset: &Dataset,
    params: &FilterParams,
    limits: &CleaningLimits,
) -> Partitions {
    let selected: Vec<&TripRecord> = dataset
        .records()
        .iter()
        .filter(|t| params.month.matches(t.month))
        .filter(|t| params.weekday.matches(t.weekday))
        .collect();
    debug!(selected = selected.len(), "Month and weekday selection");

    let with_user_type: Vec<&TripRecord> = selected
        .into_iter()
        .filter(|t| t.user_type.is_some())
        .collect();
    debug!(
        with_user_type = with_user_type.len(),
        "Dropped trips without user type"
    );

    let overdue: Vec<TripRecord> = with_user_type
        .iter()
        .filter(|t| t.duration > limits.max_duration)
        .map(|t| (*t).clone())
        .collect();

    let trimmed: Vec<&TripRecord> = with_user_type
        .into_iter()
        .filter(|t| limits.min_duration < t.duration && t.duration < limits.max_duration)
        .collect();
    debug!(
        overdue = overdue.len(),
        trimmed = trimmed.len(),
        "Duration trim"
    );

    let (kept, underage, birth_year_bounds) = if dataset.has_demographics() {
        match trimmed.iter().map(|t| t.year()).max() {
            Some(latest) => {
                let bounds = BirthYearBounds::new(latest, limits);
                let (kept, underage) = split_by_birth_year(&trimmed, &bounds);
                (kept, Some(underage), Some(bounds))
            }
            None => (Vec::new(), Some(Vec::new()), None),
        }
    } else {
        (trimmed.into_iter().cloned().collect(), None, None)
    };

    info!(
        kept = kept.len(),
        overdue = overdue.len(),
        underage = ?underage.as_ref().map(Vec::len),
        "Trips filtered"
    );

    Partitions {
        kept,
        overdue,
        underage,
        birth_year_bounds,
    }
}

fn split_by_birth_year(
    trimmed: &[&TripRecord],
    bounds: &BirthYearBounds,
) -> (Vec<TripRecord>, Vec<TripRecord>) {
    let mut kept = Vec::new();
    let mut underage = Vec::new();
    let mut dropped = 0usize;

    for trip in trimmed {
        match trip.birth_year {
            Some(year) if bounds.contains(year) => kept.push((*trip).clone()),
            Some(year) if year < bounds.min_year => underage.push((*trip).clone()),
            _ => dropped += 1,
        }
    }

    // birth year missing, on a bound, or at/above max_year
    debug!(
        dropped,
        min_year = bounds.min_year,
        max_year = bounds.max_year,
        "Birth-year trim"
    );

    (kept, underage)
}
