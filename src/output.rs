//! Output formatting and persistence for analysis reports.
//!
//! Supports plain-text rendering, pretty-printing, JSON serialization, and
//! CSV append of a one-line run summary.

use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::debug;

use crate::analyzers::analyzer::{FilterSummary, Report, Section};
use crate::analyzers::types::{
    Applicability, DemographicStats, Dimension, DurationStats, StationMode, StationStats,
    TemporalStats,
};
use crate::loader::TripRecord;
use csv::WriterBuilder;
use std::fs::OpenOptions;
use std::path::Path;

const SEPARATOR_WIDTH: usize = 75;
const NOT_AVAILABLE: &str = "N/A";

/// One CSV row per analysis run.
#[derive(Debug, Default, Serialize)]
pub struct RunSummary {
    pub timestamp: DateTime<Utc>,
    pub city: String,
    pub month: String,
    pub weekday: String,
    pub loaded: usize,
    pub kept: usize,
    pub overdue: usize,
    pub underage: Option<usize>,
    pub total_duration: Option<f64>,
    pub mean_duration: Option<f64>,
    pub std_dev_duration: Option<f64>,
    pub median_duration: Option<f64>,
    pub max_duration: Option<f64>,
    pub min_duration: Option<f64>,
}

impl RunSummary {
    pub fn from_report(city: &str, report: &Report) -> Self {
        let duration = report.duration.ready();
        RunSummary {
            timestamp: Utc::now(),
            city: city.to_string(),
            month: report.filter.month.clone(),
            weekday: report.filter.weekday.clone(),
            loaded: report.filter.loaded,
            kept: report.filter.kept,
            overdue: report.filter.overdue,
            underage: report.filter.underage,
            total_duration: duration.map(|d| d.total),
            mean_duration: duration.map(|d| d.mean),
            std_dev_duration: duration.map(|d| d.std_dev),
            median_duration: duration.map(|d| d.median),
            max_duration: duration.map(|d| d.max),
            min_duration: duration.map(|d| d.min),
        }
    }
}

/// Logs a value using Rust's debug pretty-print format.
pub fn print_pretty(value: &impl std::fmt::Debug) {
    debug!("{:#?}", value);
}

/// Prints a value to stdout as pretty-printed JSON.
pub fn print_json(value: &impl Serialize) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Appends a [`RunSummary`] record as a row to a CSV file.
///
/// Creates the file with headers if it does not already exist.
pub fn append_record(path: &str, summary: &RunSummary) -> Result<()> {
    let file_exists = Path::new(path).exists();
    debug!(path, file_exists, "Appending CSV record");

    let file = OpenOptions::new().append(true).create(true).open(path)?;

    let mut writer = WriterBuilder::new()
        .has_headers(!file_exists) // IMPORTANT when appending
        .from_writer(file);

    writer.serialize(summary)?;
    writer.flush()?;

    Ok(())
}

fn separator() -> String {
    "-".repeat(SEPARATOR_WIDTH)
}

fn minutes(secs: f64) -> f64 {
    secs / 60.0
}

fn hours(secs: f64) -> f64 {
    secs / 3600.0
}

/// Full text report: filter summary followed by the four sections.
pub fn render_report(city: &str, report: &Report) -> String {
    [
        render_filter_summary(city, &report.filter),
        render_section("Time Statistics", &report.temporal, render_temporal),
        render_section(
            "Trip Start/Destination Statistics",
            &report.station,
            render_station,
        ),
        render_section("Trip Duration Statistics", &report.duration, render_duration),
        render_section(
            "User Demographic Statistics",
            &report.demographic,
            render_demographic,
        ),
    ]
    .join("\n")
}

fn render_section<T>(title: &str, section: &Section<T>, render: fn(&T) -> Vec<String>) -> String {
    let mut lines = vec![separator(), format!("{}:", title), String::new()];
    match section {
        Section::Ready(stats) => lines.extend(render(stats)),
        Section::InsufficientData => {
            lines.push("Not enough trips left after filtering to compute these statistics.".into())
        }
    }
    lines.join("\n")
}

pub fn render_filter_summary(city: &str, summary: &FilterSummary) -> String {
    let time = match (summary.month.as_str(), summary.weekday.as_str()) {
        ("All", "All") => "All days".to_string(),
        (month, "All") => format!("{} (All days)", month),
        ("All", day) => format!("{} (All months)", day),
        (month, day) => format!("{}, {}", month, day),
    };

    let mut lines = vec![
        separator(),
        "Filter Summary:".to_string(),
        format!("Filter City: {}", city),
        format!("Filter Time: {}", time),
        format!("Data Points: {}", summary.kept),
        format!(
            "Trips loaded: {}, overdue: {}",
            summary.loaded, summary.overdue
        ),
    ];
    if let Some(bounds) = &summary.birth_year_bounds {
        lines.push(format!(
            "Birth years kept: {} < year < {}",
            bounds.min_year, bounds.max_year
        ));
    }
    lines.join("\n")
}

pub fn render_temporal(stats: &TemporalStats) -> Vec<String> {
    let mut lines = Vec::new();
    if let Dimension::Computed(month) = &stats.month {
        lines.push(format!(
            "Most popular month is {}, with a count of {}.",
            month.label, month.count
        ));
    }
    if let Dimension::Computed(day) = &stats.weekday {
        lines.push(format!(
            "Most popular day is {}, with a count of {}.",
            day.label, day.count
        ));
    }
    lines.push(format!(
        "Most popular hour is {}, with a count of {}.",
        stats.hour.label, stats.hour.count
    ));
    lines
}

fn render_station_mode(what: &str, mode: &StationMode) -> Vec<String> {
    if mode.is_tied() {
        let mut lines = vec![format!(
            "Note: {} modes detected for {}, each with a count of {}:",
            mode.labels.len(),
            what,
            mode.count
        )];
        lines.extend(mode.labels.iter().map(|l| format!("  {}", l)));
        lines
    } else {
        vec![format!(
            "The most common {} is: {} (count {})",
            what,
            mode.labels.first().map(String::as_str).unwrap_or(NOT_AVAILABLE),
            mode.count
        )]
    }
}

pub fn render_station(stats: &StationStats) -> Vec<String> {
    let mut lines = render_station_mode("Start Station", &stats.start);
    lines.extend(render_station_mode("End Station", &stats.end));
    lines.extend(render_station_mode(
        "Start Station-End Station combination",
        &stats.route,
    ));
    lines
}

pub fn render_duration(stats: &DurationStats) -> Vec<String> {
    vec![
        format!(
            "Cumulative Trip Duration: {:.0} seconds ({:.0} hours)",
            stats.total,
            hours(stats.total)
        ),
        format!(
            "Mean Trip Duration: {:.0} seconds ({:.1} minutes)",
            stats.mean,
            minutes(stats.mean)
        ),
        format!(
            "Standard Deviation Trip Duration: {:.0} seconds ({:.1} minutes)",
            stats.std_dev,
            minutes(stats.std_dev)
        ),
        format!(
            "Median Trip Duration: {:.0} seconds ({:.1} minutes)",
            stats.median,
            minutes(stats.median)
        ),
        format!(
            "Max Trip Duration: {:.0} seconds ({:.1} minutes)",
            stats.max,
            minutes(stats.max)
        ),
        format!(
            "Min Trip Duration: {:.0} seconds ({:.1} minutes)",
            stats.min,
            minutes(stats.min)
        ),
        format!("Count of overdue bikes: {}", stats.overdue),
    ]
}

pub fn render_demographic(stats: &DemographicStats) -> Vec<String> {
    let mut lines = vec![format!(
        "There were {} subscribers and {} customers during this time frame.",
        stats.subscribers, stats.customers
    )];

    match (&stats.gender, &stats.birth_years) {
        (Applicability::Applicable(gender), birth_years) => {
            lines.push(format!(
                "There were {} males and {} females during this time frame ({} unknown, {} unreported).",
                gender.male, gender.female, gender.unknown, gender.unreported
            ));
            if let Some(range) = birth_years.applicable() {
                lines.push(format!("The earliest birth year was {}.", range.earliest));
                lines.push(format!("The most recent birth year was {}.", range.latest));
            }
            if let Some(underage) = stats.underage.applicable() {
                lines.push(format!("Number of underage riders: {}", underage));
            }
        }
        (Applicability::NotApplicable, _) => {
            lines.push("No Gender or Birth Year data are available for this city.".into())
        }
    }

    let Some(extended) = &stats.extended else {
        return lines;
    };

    lines.push(String::new());
    lines.push("Additional User Statistics:".into());
    for d in &extended.duration_by_user_type {
        lines.push(format!(
            "{}: {} trips, mean {:.0} seconds ({:.1} minutes), median {:.0} seconds ({:.1} minutes)",
            d.user_type,
            d.trips,
            d.mean,
            minutes(d.mean),
            d.median,
            minutes(d.median)
        ));
    }
    if let Some(groups) = extended.age_by_group.applicable() {
        lines.push(String::new());
        lines.push(format!(
            "{:<12} {:<8} {:>7} {:>9} {:>11} {:>8}",
            "User Type", "Gender", "Trips", "Mean Age", "Median Age", "Std Dev"
        ));
        for g in groups {
            let std_dev = g
                .std_dev_age
                .map(|s| format!("{:.1}", s))
                .unwrap_or_else(|| NOT_AVAILABLE.to_string());
            lines.push(format!(
                "{:<12} {:<8} {:>7} {:>9.1} {:>11.1} {:>8}",
                g.user_type.to_string(),
                format!("{:?}", g.gender),
                g.trips,
                g.mean_age,
                g.median_age,
                std_dev
            ));
        }
    }
    lines
}

/// Raw view of up to `count` trips starting at `offset`.
pub fn render_rows(trips: &[TripRecord], offset: usize, count: usize) -> String {
    let mut lines = vec![separator()];
    for (i, t) in trips.iter().enumerate().skip(offset).take(count) {
        lines.push(format!(
            "{:>6}  {}  {:>9.0}s  {} -> {}  {}  {}  {}",
            i,
            t.start_time,
            t.duration,
            t.start_station,
            t.end_station,
            t.user_type
                .as_ref()
                .map(|u| u.to_string())
                .unwrap_or_else(|| NOT_AVAILABLE.to_string()),
            t.gender
                .map(|g| format!("{:?}", g))
                .unwrap_or_else(|| NOT_AVAILABLE.to_string()),
            t.birth_year
                .map(|y| y.to_string())
                .unwrap_or_else(|| NOT_AVAILABLE.to_string()),
        ));
    }
    lines.join("\n")
}
