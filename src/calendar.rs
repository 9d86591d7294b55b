//! Month, weekday and hour labels plus the month/weekday filter selection.

use serde::Serialize;

use crate::error::{AnalysisError, AnalysisResult};

pub const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// Only the first seven months can be selected as a filter; the source
/// datasets stop in July.
pub const SELECTABLE_MONTHS: usize = 7;

pub const DAY_NAMES: [&str; 7] = [
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
    "Sunday",
];

pub const ALL: &str = "All";

/// Label tables handed to the aggregators.
#[derive(Debug, Clone)]
pub struct CalendarLabels {
    pub months: [&'static str; 12],
    pub days: [&'static str; 7],
}

impl Default for CalendarLabels {
    fn default() -> Self {
        Self {
            months: MONTH_NAMES,
            days: DAY_NAMES,
        }
    }
}

impl CalendarLabels {
    /// Label for a 1-based month.
    pub fn month(&self, month: u32) -> String {
        match month {
            1..=12 => self.months[month as usize - 1].to_string(),
            _ => month.to_string(),
        }
    }

    /// Label for a 0-based weekday (Monday = 0).
    pub fn day(&self, weekday: u32) -> String {
        self.days
            .get(weekday as usize)
            .map(|d| d.to_string())
            .unwrap_or_else(|| weekday.to_string())
    }

    /// 12-hour clock label, e.g. `0 -> "12 AM"`, `17 -> "5 PM"`.
    pub fn hour(&self, hour: u32) -> String {
        let suffix = if hour < 12 { "AM" } else { "PM" };
        let h = match hour % 12 {
            0 => 12,
            h => h,
        };
        format!("{} {}", h, suffix)
    }
}

/// Either every value of a dimension or a single one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Selection {
    All,
    Only(u32),
}

impl Selection {
    pub fn is_all(&self) -> bool {
        matches!(self, Selection::All)
    }

    pub fn matches(&self, value: u32) -> bool {
        match self {
            Selection::All => true,
            Selection::Only(v) => *v == value,
        }
    }
}

/// Validated `(month, weekday)` filter pair.
///
/// Months are stored 1-based (January = 1), weekdays 0-based (Monday = 0).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FilterParams {
    pub month: Selection,
    pub weekday: Selection,
}

impl FilterParams {
    /// Validates month and weekday names.
    ///
    /// # Errors
    ///
    /// Returns [`AnalysisError::InvalidFilter`] for anything other than an
    /// exact month name from January to July, a day name, or `All`.
    pub fn new(month: &str, weekday: &str) -> AnalysisResult<Self> {
        Ok(Self {
            month: parse_selection(month, &MONTH_NAMES[..SELECTABLE_MONTHS], 1, "month")?,
            weekday: parse_selection(weekday, &DAY_NAMES, 0, "weekday")?,
        })
    }

    pub fn all() -> Self {
        Self {
            month: Selection::All,
            weekday: Selection::All,
        }
    }

    pub fn month_label(&self, labels: &CalendarLabels) -> String {
        match self.month {
            Selection::All => ALL.to_string(),
            Selection::Only(m) => labels.month(m),
        }
    }

    pub fn weekday_label(&self, labels: &CalendarLabels) -> String {
        match self.weekday {
            Selection::All => ALL.to_string(),
            Selection::Only(d) => labels.day(d),
        }
    }
}

fn parse_selection(
    value: &str,
    names: &[&str],
    offset: u32,
    kind: &'static str,
) -> AnalysisResult<Selection> {
    if value == ALL {
        return Ok(Selection::All);
    }

    names
        .iter()
        .position(|n| *n == value)
        .map(|idx| Selection::Only(idx as u32 + offset))
        .ok_or_else(|| AnalysisError::InvalidFilter {
            kind,
            value: value.to_string(),
        })
}
