use serde::Serialize;
use tracing::{info, warn};

use crate::analyzers::demographic::{DemographicOptions, demographic_stats};
use crate::analyzers::duration::duration_stats;
use crate::analyzers::station::station_stats;
use crate::analyzers::temporal::temporal_stats;
use crate::analyzers::types::{DemographicStats, DurationStats, StationStats, TemporalStats};
use crate::calendar::FilterParams;
use crate::config::AnalysisConfig;
use crate::error::AnalysisResult;
use crate::filter::{BirthYearBounds, Partitions, filter_trips};
use crate::loader::Dataset;

/// Outcome of one statistics pass.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", content = "stats", rename_all = "snake_case")]
pub enum Section<T> {
    Ready(T),
    /// Nothing survived filtering.
    InsufficientData,
}

impl<T> Section<T> {
    pub fn ready(&self) -> Option<&T> {
        match self {
            Section::Ready(v) => Some(v),
            Section::InsufficientData => None,
        }
    }
}

/// Sizes of the filter partitions.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FilterSummary {
    pub month: String,
    pub weekday: String,
    pub loaded: usize,
    pub kept: usize,
    pub overdue: usize,
    /// `None` for cities without demographic columns.
    pub underage: Option<usize>,
    pub birth_year_bounds: Option<BirthYearBounds>,
}

/// Everything one analysis run produces.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Report {
    pub filter: FilterSummary,
    pub temporal: Section<TemporalStats>,
    pub station: Section<StationStats>,
    pub duration: Section<DurationStats>,
    pub demographic: Section<DemographicStats>,
}

/// Filters `dataset` and runs the four statistics passes over the kept set.
///
/// A pass with no trips to work on is reported as
/// [`Section::InsufficientData`]; the others still run.
#[tracing::instrument(skip(dataset, config), fields(trips = dataset.len()))]
pub fn analyze(
    dataset: &Dataset,
    params: &FilterParams,
    config: &AnalysisConfig,
    extended: bool,
) -> AnalysisResult<(Report, Partitions)> {
    let partitions = filter_trips(dataset, params, &config.limits);
    let kept = partitions.kept.as_slice();

    let options = DemographicOptions {
        as_of_year: config.as_of_year,
        extended,
    };

    let report = Report {
        filter: FilterSummary {
            month: params.month_label(&config.labels),
            weekday: params.weekday_label(&config.labels),
            loaded: dataset.len(),
            kept: kept.len(),
            overdue: partitions.overdue.len(),
            underage: partitions.underage.as_ref().map(Vec::len),
            birth_year_bounds: partitions.birth_year_bounds,
        },
        temporal: section(temporal_stats(kept, params, &config.labels))?,
        station: section(station_stats(kept))?,
        duration: section(duration_stats(kept, &partitions.overdue))?,
        demographic: section(demographic_stats(
            kept,
            partitions.underage.as_deref(),
            dataset.has_demographics(),
            &options,
        ))?,
    };

    info!(kept = kept.len(), "Analysis complete");
    Ok((report, partitions))
}

fn section<T>(result: AnalysisResult<T>) -> AnalysisResult<Section<T>> {
    match result {
        Ok(stats) => Ok(Section::Ready(stats)),
        Err(e) if e.is_insufficient_data() => {
            warn!(error = %e, "Statistics skipped");
            Ok(Section::InsufficientData)
        }
        Err(e) => Err(e),
    }
}
