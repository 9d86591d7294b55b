//! User type, gender and age statistics.

use std::collections::BTreeMap;

use crate::analyzers::types::{
    AgeGroupStats, Applicability, BirthYearRange, DemographicStats, ExtendedDemographics,
    GenderCounts, UserTypeDuration,
};
use crate::analyzers::utility::{mean, median, round1, sample_stddev};
use crate::error::{AnalysisError, AnalysisResult};
use crate::loader::{Gender, TripRecord, UserType};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DemographicOptions {
    /// Reference year for `age = as_of_year - birth_year`.
    pub as_of_year: i32,
    /// Adds per-user-type durations and per-group age statistics.
    pub extended: bool,
}

/// User type counts, and for cities with demographic columns the gender
/// counts, birth-year range and underage count.
///
/// `underage` is ignored unless `has_demographics` is set; a missing
/// partition on a demographic dataset counts as zero. Trips with any other
/// user type label are counted as neither subscribers nor customers.
#[tracing::instrument(skip_all, fields(trips = kept.len()))]
pub fn demographic_stats(
    kept: &[TripRecord],
    underage: Option<&[TripRecord]>,
    has_demographics: bool,
    options: &DemographicOptions,
) -> AnalysisResult<DemographicStats> {
    if kept.is_empty() {
        return Err(AnalysisError::InsufficientData {
            stage: "demographic",
        });
    }

    let count_type = |ut: UserType| {
        kept.iter()
            .filter(|t| t.user_type.as_ref() == Some(&ut))
            .count()
    };

    let (gender, birth_years, underage) = if has_demographics {
        (
            Applicability::Applicable(gender_counts(kept)),
            birth_year_range(kept)
                .map(Applicability::Applicable)
                .unwrap_or(Applicability::NotApplicable),
            Applicability::Applicable(underage.map_or(0, <[TripRecord]>::len)),
        )
    } else {
        (
            Applicability::NotApplicable,
            Applicability::NotApplicable,
            Applicability::NotApplicable,
        )
    };

    let extended = options.extended.then(|| ExtendedDemographics {
        duration_by_user_type: duration_by_user_type(kept),
        age_by_group: if has_demographics {
            Applicability::Applicable(age_by_group(kept, options.as_of_year))
        } else {
            Applicability::NotApplicable
        },
    });

    Ok(DemographicStats {
        subscribers: count_type(UserType::Subscriber),
        customers: count_type(UserType::Customer),
        gender,
        birth_years,
        underage,
        extended,
    })
}

fn gender_counts(kept: &[TripRecord]) -> GenderCounts {
    let mut counts = GenderCounts {
        male: 0,
        female: 0,
        unknown: 0,
        unreported: 0,
    };

    for trip in kept {
        match trip.gender {
            Some(Gender::Male) => counts.male += 1,
            Some(Gender::Female) => counts.female += 1,
            Some(Gender::Unknown) => counts.unknown += 1,
            None => counts.unreported += 1,
        }
    }

    counts
}

fn birth_year_range(kept: &[TripRecord]) -> Option<BirthYearRange> {
    let years = kept.iter().filter_map(|t| t.birth_year);
    let earliest = years.clone().min()?;
    let latest = years.max()?;
    Some(BirthYearRange { earliest, latest })
}

/// Buckets durations by user type in one pass.
fn duration_by_user_type(kept: &[TripRecord]) -> Vec<UserTypeDuration> {
    let mut buckets: BTreeMap<UserType, Vec<f64>> = BTreeMap::new();
    for trip in kept {
        if let Some(ut) = &trip.user_type {
            buckets.entry(ut.clone()).or_default().push(trip.duration);
        }
    }

    buckets
        .into_iter()
        .filter_map(|(user_type, durations)| {
            Some(UserTypeDuration {
                user_type,
                trips: durations.len(),
                mean: mean(&durations)?,
                median: median(&durations)?,
            })
        })
        .collect()
}

/// Buckets ages by `(user type, gender)` in one pass. Trips without a gender
/// or birth year are left out. The age spread is the sample standard
/// deviation, undefined for a single-trip group.
fn age_by_group(kept: &[TripRecord], as_of_year: i32) -> Vec<AgeGroupStats> {
    let mut buckets: BTreeMap<(UserType, Gender), Vec<f64>> = BTreeMap::new();
    for trip in kept {
        if let (Some(ut), Some(g), Some(year)) = (&trip.user_type, trip.gender, trip.birth_year) {
            buckets
                .entry((ut.clone(), g))
                .or_default()
                .push(f64::from(as_of_year - year));
        }
    }

    buckets
        .into_iter()
        .filter_map(|((user_type, gender), ages)| {
            let avg = mean(&ages)?;
            Some(AgeGroupStats {
                user_type,
                gender,
                trips: ages.len(),
                mean_age: round1(avg),
                median_age: round1(median(&ages)?),
                std_dev_age: sample_stddev(&ages, avg).map(round1),
            })
        })
        .collect()
}
