//! Result types returned by the aggregators.

use serde::Serialize;

use crate::loader::{Gender, UserType};

/// Most frequent value of a time dimension.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModeCount {
    /// Hour 0-23, month 1-12 or weekday 0-6.
    pub value: u32,
    pub label: String,
    pub count: usize,
}

/// A time dimension that is only computed when the filter left it open.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", content = "mode", rename_all = "snake_case")]
pub enum Dimension {
    Computed(ModeCount),
    /// The filter fixed this dimension to a single value.
    NotComputed,
}

impl Dimension {
    pub fn computed(&self) -> Option<&ModeCount> {
        match self {
            Dimension::Computed(mode) => Some(mode),
            Dimension::NotComputed => None,
        }
    }
}

/// A demographic field that only exists for some cities.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", content = "value", rename_all = "snake_case")]
pub enum Applicability<T> {
    Applicable(T),
    NotApplicable,
}

impl<T> Applicability<T> {
    pub fn applicable(&self) -> Option<&T> {
        match self {
            Applicability::Applicable(v) => Some(v),
            Applicability::NotApplicable => None,
        }
    }

    pub fn is_applicable(&self) -> bool {
        matches!(self, Applicability::Applicable(_))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TemporalStats {
    pub hour: ModeCount,
    pub month: Dimension,
    pub weekday: Dimension,
}

/// Every label tied for the highest count.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StationMode {
    pub labels: Vec<String>,
    pub count: usize,
}

impl StationMode {
    pub fn is_tied(&self) -> bool {
        self.labels.len() > 1
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StationStats {
    pub start: StationMode,
    pub end: StationMode,
    /// Labels are `"{start} to {end}"`.
    pub route: StationMode,
}

/// Trip duration summary, all values in seconds.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DurationStats {
    pub trips: usize,
    pub total: f64,
    pub mean: f64,
    /// Population standard deviation.
    pub std_dev: f64,
    pub median: f64,
    pub max: f64,
    pub min: f64,
    pub overdue: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GenderCounts {
    pub male: usize,
    pub female: usize,
    pub unknown: usize,
    /// Trips with an empty gender cell.
    pub unreported: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BirthYearRange {
    pub earliest: i32,
    pub latest: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UserTypeDuration {
    pub user_type: UserType,
    pub trips: usize,
    pub mean: f64,
    pub median: f64,
}

/// Age summary for one `(user type, gender)` group, rounded to one decimal.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AgeGroupStats {
    pub user_type: UserType,
    pub gender: Gender,
    pub trips: usize,
    pub mean_age: f64,
    pub median_age: f64,
    /// Sample standard deviation; `None` for a single-trip group.
    pub std_dev_age: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExtendedDemographics {
    pub duration_by_user_type: Vec<UserTypeDuration>,
    pub age_by_group: Applicability<Vec<AgeGroupStats>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DemographicStats {
    pub subscribers: usize,
    pub customers: usize,
    pub gender: Applicability<GenderCounts>,
    pub birth_years: Applicability<BirthYearRange>,
    pub underage: Applicability<usize>,
    /// Present only when the extended report was requested.
    pub extended: Option<ExtendedDemographics>,
}
