//! Runtime configuration: where the city files live and the constants the
//! core is parameterized with.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use chrono::{Datelike, Local};
use tracing::debug;

use crate::calendar::CalendarLabels;
use crate::error::{AnalysisError, AnalysisResult};
use crate::filter::CleaningLimits;

pub const DATA_DIR_VAR: &str = "BIKESHARE_DATA_DIR";
pub const CITIES_VAR: &str = "BIKESHARE_CITIES";
pub const AS_OF_YEAR_VAR: &str = "BIKESHARE_AS_OF_YEAR";

const DEFAULT_DATA_DIR: &str = "data";

static DEFAULT_CITIES: &[(&str, &str)] = &[
    ("Chicago", "chicago.csv"),
    ("New York City", "new_york_city.csv"),
    ("Washington", "washington.csv"),
];

/// Constants injected into the filter stage and the aggregators.
#[derive(Debug, Clone)]
pub struct AnalysisConfig {
    /// Reference year for rider ages.
    pub as_of_year: i32,
    pub limits: CleaningLimits,
    pub labels: CalendarLabels,
}

impl AnalysisConfig {
    pub fn new(as_of_year: i32) -> Self {
        Self {
            as_of_year,
            limits: CleaningLimits::default(),
            labels: CalendarLabels::default(),
        }
    }

    /// Uses `BIKESHARE_AS_OF_YEAR` when set to a valid year, the current
    /// local year otherwise.
    pub fn from_env() -> Self {
        let as_of_year = std::env::var(AS_OF_YEAR_VAR)
            .ok()
            .and_then(|v| v.trim().parse::<i32>().ok())
            .unwrap_or_else(|| Local::now().year());
        debug!(as_of_year, "Analysis config resolved");
        Self::new(as_of_year)
    }
}

/// Maps city names to trip files.
///
/// An override can be stored as a plain JSON object on disk:
/// ```json
/// {
///   "Chicago": "chicago.csv",
///   "Boston": "/srv/bikeshare/boston.csv"
/// }
/// ```
/// Relative paths are resolved against the data directory.
#[derive(Debug, Clone)]
pub struct CityCatalog {
    data_dir: PathBuf,
    entries: BTreeMap<String, String>,
}

impl CityCatalog {
    /// The three bundled cities under `data_dir`.
    pub fn with_defaults(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            entries: DEFAULT_CITIES
                .iter()
                .map(|(city, file)| (city.to_string(), file.to_string()))
                .collect(),
        }
    }

    /// Loads the catalog from a JSON file at `path`.
    pub fn load(path: impl AsRef<Path>, data_dir: impl Into<PathBuf>) -> AnalysisResult<Self> {
        let path = path.as_ref();
        let content =
            std::fs::read_to_string(path).map_err(|source| AnalysisError::SourceUnavailable {
                path: path.to_path_buf(),
                source,
            })?;
        Self::from_json(&content, data_dir)
    }

    pub fn from_json(content: &str, data_dir: impl Into<PathBuf>) -> AnalysisResult<Self> {
        let entries: BTreeMap<String, String> = serde_json::from_str(content)?;
        Ok(Self {
            data_dir: data_dir.into(),
            entries,
        })
    }

    /// Reads `BIKESHARE_DATA_DIR` and `BIKESHARE_CITIES`.
    pub fn from_env() -> AnalysisResult<Self> {
        let data_dir =
            std::env::var(DATA_DIR_VAR).unwrap_or_else(|_| DEFAULT_DATA_DIR.to_string());

        match std::env::var(CITIES_VAR) {
            Ok(path) => Self::load(path, data_dir),
            Err(_) => Ok(Self::with_defaults(data_dir)),
        }
    }

    /// Case-insensitive lookup returning the canonical name and file path.
    pub fn resolve(&self, city: &str) -> AnalysisResult<(&str, PathBuf)> {
        self.entries
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(city.trim()))
            .map(|(name, file)| (name.as_str(), self.data_dir.join(file)))
            .ok_or_else(|| AnalysisError::UnknownCity(city.to_string()))
    }

    /// Iterates over all `(city, path)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&str, PathBuf)> {
        self.entries
            .iter()
            .map(|(name, file)| (name.as_str(), self.data_dir.join(file)))
    }
}
