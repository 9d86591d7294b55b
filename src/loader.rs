//! CSV loader for bike-share trip files.
//!
//! Reads one city file into an immutable [`Dataset`], deriving the month,
//! weekday and start hour of every trip up front.

use std::fmt;
use std::fs::File;
use std::path::Path;

use chrono::{Datelike, NaiveDateTime, Timelike};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::error::{AnalysisError, AnalysisResult};

pub const START_TIME: &str = "Start Time";
pub const TRIP_DURATION: &str = "Trip Duration";
pub const START_STATION: &str = "Start Station";
pub const END_STATION: &str = "End Station";
pub const USER_TYPE: &str = "User Type";
pub const GENDER: &str = "Gender";
pub const BIRTH_YEAR: &str = "Birth Year";

const TIMESTAMP_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%m/%d/%Y %H:%M",
];

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum UserType {
    Customer,
    Subscriber,
    /// Any other non-empty label, e.g. Chicago's `Dependent`.
    Other(String),
}

impl UserType {
    fn parse(raw: &str) -> Self {
        match raw {
            "Subscriber" => UserType::Subscriber,
            "Customer" => UserType::Customer,
            other => UserType::Other(other.to_string()),
        }
    }
}

impl fmt::Display for UserType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UserType::Customer => f.write_str("Customer"),
            UserType::Subscriber => f.write_str("Subscriber"),
            UserType::Other(label) => f.write_str(label),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum Gender {
    Female,
    Male,
    Unknown,
}

impl Gender {
    fn parse(raw: &str) -> Self {
        match raw {
            "Male" => Gender::Male,
            "Female" => Gender::Female,
            _ => Gender::Unknown,
        }
    }
}

/// A single rental.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TripRecord {
    pub start_time: NaiveDateTime,
    /// Seconds.
    pub duration: f64,
    pub start_station: String,
    pub end_station: String,
    pub user_type: Option<UserType>,
    pub gender: Option<Gender>,
    pub birth_year: Option<i32>,

    // derived at load time
    /// 1 = January.
    pub month: u32,
    /// 0 = Monday.
    pub weekday: u32,
    pub hour: u32,
}

impl TripRecord {
    pub fn year(&self) -> i32 {
        self.start_time.year()
    }

    pub fn route(&self) -> String {
        format!("{} to {}", self.start_station, self.end_station)
    }
}

/// All trips of one source file.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    records: Vec<TripRecord>,
    has_demographics: bool,
}

impl Dataset {
    pub fn new(records: Vec<TripRecord>, has_demographics: bool) -> Self {
        Self {
            records,
            has_demographics,
        }
    }

    pub fn records(&self) -> &[TripRecord] {
        &self.records
    }

    /// True when the source carries both gender and birth year columns.
    pub fn has_demographics(&self) -> bool {
        self.has_demographics
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Column positions resolved from the header row.
struct Columns {
    start_time: usize,
    duration: usize,
    start_station: usize,
    end_station: usize,
    user_type: usize,
    demographics: Option<(usize, usize)>,
}

impl Columns {
    fn resolve(headers: &csv::StringRecord) -> AnalysisResult<Self> {
        let find = |name: &str| headers.iter().position(|h| h.trim() == name);
        let require = |name: &str| {
            find(name).ok_or_else(|| AnalysisError::SchemaMismatch {
                message: format!(
                    "missing required column '{}'. headers={:?}",
                    name,
                    headers.iter().collect::<Vec<_>>()
                ),
            })
        };

        Ok(Self {
            start_time: require(START_TIME)?,
            duration: require(TRIP_DURATION)?,
            start_station: require(START_STATION)?,
            end_station: require(END_STATION)?,
            user_type: require(USER_TYPE)?,
            demographics: find(GENDER).zip(find(BIRTH_YEAR)),
        })
    }
}

/// Loads a trip file from disk.
///
/// # Errors
///
/// [`AnalysisError::SourceUnavailable`] if the file cannot be opened, plus
/// everything [`load_from_reader`] can return.
#[tracing::instrument(skip(path), fields(path = %path.as_ref().display()))]
pub fn load_dataset(path: impl AsRef<Path>) -> AnalysisResult<Dataset> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|source| AnalysisError::SourceUnavailable {
        path: path.to_path_buf(),
        source,
    })?;

    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(file);
    load_from_reader(&mut rdr)
}

/// Loads trips from an existing CSV reader.
///
/// Any row with an unparseable start time or duration aborts the load.
pub fn load_from_reader<R: std::io::Read>(rdr: &mut csv::Reader<R>) -> AnalysisResult<Dataset> {
    let headers = rdr.headers()?.clone();
    let columns = Columns::resolve(&headers)?;

    let mut records = Vec::new();
    let mut missing_user_type = 0usize;
    let mut other_user_type = 0usize;

    for (row_idx0, result) in rdr.records().enumerate() {
        // 1-based, header is row 1
        let row = row_idx0 + 2;
        let raw = result?;
        let cell = |idx: usize| raw.get(idx).unwrap_or("").trim();

        let start_time = parse_timestamp(row, cell(columns.start_time))?;
        let duration = parse_duration(row, cell(columns.duration))?;

        let user_type = match cell(columns.user_type) {
            "" => {
                missing_user_type += 1;
                None
            }
            label => {
                let parsed = UserType::parse(label);
                if matches!(parsed, UserType::Other(_)) {
                    other_user_type += 1;
                }
                Some(parsed)
            }
        };

        let (gender, birth_year) = match columns.demographics {
            Some((gender_idx, birth_idx)) => {
                let gender = match cell(gender_idx) {
                    "" => None,
                    g => Some(Gender::parse(g)),
                };
                (gender, parse_birth_year(row, cell(birth_idx))?)
            }
            None => (None, None),
        };

        records.push(TripRecord {
            start_time,
            duration,
            start_station: cell(columns.start_station).to_string(),
            end_station: cell(columns.end_station).to_string(),
            user_type,
            gender,
            birth_year,
            month: start_time.month(),
            weekday: start_time.weekday().num_days_from_monday(),
            hour: start_time.hour(),
        });
    }

    if other_user_type > 0 {
        warn!(
            other_user_type,
            "Trips with a user type other than Subscriber or Customer are kept but counted as neither"
        );
    }
    debug!(missing_user_type, "User type completeness");

    let has_demographics = columns.demographics.is_some();
    info!(trips = records.len(), has_demographics, "Trip data loaded");

    Ok(Dataset::new(records, has_demographics))
}

fn malformed(row: usize, column: &str, raw: &str, message: impl Into<String>) -> AnalysisError {
    AnalysisError::MalformedRecord {
        row,
        column: column.to_string(),
        raw: raw.to_string(),
        message: message.into(),
    }
}

fn parse_timestamp(row: usize, raw: &str) -> AnalysisResult<NaiveDateTime> {
    TIMESTAMP_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .ok_or_else(|| malformed(row, START_TIME, raw, "unrecognized timestamp"))
}

fn parse_duration(row: usize, raw: &str) -> AnalysisResult<f64> {
    let secs = raw
        .parse::<f64>()
        .map_err(|e| malformed(row, TRIP_DURATION, raw, e.to_string()))?;

    if !secs.is_finite() || secs < 0.0 {
        return Err(malformed(
            row,
            TRIP_DURATION,
            raw,
            "expected a non-negative number of seconds",
        ));
    }
    Ok(secs)
}

fn parse_birth_year(row: usize, raw: &str) -> AnalysisResult<Option<i32>> {
    if raw.is_empty() {
        return Ok(None);
    }

    // pandas exports nullable integer columns as `1989.0`
    let year = raw
        .parse::<f64>()
        .map_err(|e| malformed(row, BIRTH_YEAR, raw, e.to_string()))?;

    if year.fract() != 0.0 || year.abs() > i32::MAX as f64 {
        return Err(malformed(row, BIRTH_YEAR, raw, "expected a whole year"));
    }
    Ok(Some(year as i32))
}
