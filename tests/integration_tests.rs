use bikeshare_stats::analyzers::analyzer::{Section, analyze};
use bikeshare_stats::analyzers::types::{Applicability, Dimension};
use bikeshare_stats::calendar::FilterParams;
use bikeshare_stats::config::AnalysisConfig;
use bikeshare_stats::filter::{CleaningLimits, filter_trips};
use bikeshare_stats::loader::{Gender, UserType, load_dataset};
use bikeshare_stats::output::render_report;

const CHICAGO: &str = "tests/fixtures/chicago_sample.csv";
const WASHINGTON: &str = "tests/fixtures/washington_sample.csv";

#[test]
fn test_chicago_full_pipeline() {
    let dataset = load_dataset(CHICAGO).expect("Failed to load fixture");
    assert_eq!(dataset.len(), 12);
    assert!(dataset.has_demographics());

    let (report, partitions) = analyze(
        &dataset,
        &FilterParams::all(),
        &AnalysisConfig::new(2020),
        true,
    )
    .unwrap();

    assert_eq!(report.filter.kept, 6);
    assert_eq!(report.filter.overdue, 1);
    assert_eq!(report.filter.underage, Some(1));

    let bounds = partitions.birth_year_bounds.unwrap();
    assert_eq!((bounds.min_year, bounds.max_year), (1917, 2001));
    assert!(partitions
        .kept
        .iter()
        .all(|t| 240.0 < t.duration && t.duration < 259_200.0));
    assert!(partitions
        .kept
        .iter()
        .all(|t| t.birth_year.is_some_and(|y| bounds.contains(y))));

    let temporal = report.temporal.ready().unwrap();
    assert_eq!(temporal.hour.label, "8 AM");
    assert_eq!(temporal.hour.count, 2);
    assert_eq!(temporal.month.computed().unwrap().label, "June");
    // Monday and Friday both have two trips; the first in week order wins
    let weekday = temporal.weekday.computed().unwrap();
    assert_eq!((weekday.label.as_str(), weekday.count), ("Monday", 2));

    let station = report.station.ready().unwrap();
    assert_eq!(station.start.labels, vec!["Wood St & Hubbard St"]);
    assert_eq!(station.start.count, 2);
    assert_eq!(station.end.labels, vec!["Canal St & Madison St"]);
    assert_eq!(station.route.labels.len(), 6);
    assert_eq!(station.route.count, 1);

    let duration = report.duration.ready().unwrap();
    assert_eq!(duration.trips, 6);
    assert_eq!(duration.total, 3877.0);
    assert_eq!(duration.median, 448.0);
    assert_eq!(duration.min, 321.0);
    assert_eq!(duration.max, 1610.0);
    assert_eq!(duration.overdue, 1);

    let demographic = report.demographic.ready().unwrap();
    assert_eq!(demographic.subscribers, 5);
    assert_eq!(demographic.customers, 1);
    let gender = demographic.gender.applicable().unwrap();
    assert_eq!((gender.male, gender.female, gender.unreported), (4, 1, 1));
    let years = demographic.birth_years.applicable().unwrap();
    assert_eq!((years.earliest, years.latest), (1981, 1995));
    assert_eq!(demographic.underage, Applicability::Applicable(1));

    let extended = demographic.extended.as_ref().unwrap();
    let groups = extended.age_by_group.applicable().unwrap();
    let customer_male = groups
        .iter()
        .find(|g| g.user_type == UserType::Customer && g.gender == Gender::Male)
        .unwrap();
    assert_eq!(customer_male.trips, 1);
    assert_eq!(customer_male.mean_age, 25.0);
}

#[test]
fn test_chicago_month_filter() {
    let dataset = load_dataset(CHICAGO).unwrap();
    let params = FilterParams::new("June", "All").unwrap();

    let (report, _) = analyze(&dataset, &params, &AnalysisConfig::new(2020), false).unwrap();

    assert_eq!(report.filter.kept, 2);
    assert_eq!(report.filter.overdue, 1);
    assert_eq!(report.filter.underage, Some(0));

    let temporal = report.temporal.ready().unwrap();
    assert_eq!(temporal.month, Dimension::NotComputed);
    assert_eq!(temporal.weekday.computed().unwrap().label, "Friday");
}

#[test]
fn test_washington_has_no_demographics() {
    let dataset = load_dataset(WASHINGTON).unwrap();
    assert!(!dataset.has_demographics());

    let (report, partitions) = analyze(
        &dataset,
        &FilterParams::all(),
        &AnalysisConfig::new(2020),
        true,
    )
    .unwrap();

    assert_eq!(partitions.kept.len(), 4);
    assert_eq!(partitions.overdue.len(), 1);
    assert!(partitions.underage.is_none());

    let demographic = report.demographic.ready().unwrap();
    assert_eq!(demographic.subscribers, 3);
    assert_eq!(demographic.customers, 1);
    assert_eq!(demographic.gender, Applicability::NotApplicable);
    assert_eq!(demographic.birth_years, Applicability::NotApplicable);
    assert_eq!(demographic.underage, Applicability::NotApplicable);

    let extended = demographic.extended.as_ref().unwrap();
    assert_eq!(extended.duration_by_user_type.len(), 2);
    assert_eq!(extended.age_by_group, Applicability::NotApplicable);

    let temporal = report.temporal.ready().unwrap();
    assert_eq!(temporal.hour.value, 8);
    assert_eq!(temporal.weekday.computed().unwrap().label, "Tuesday");
    // every month occurs once
    assert_eq!(temporal.month.computed().unwrap().label, "February");
}

#[test]
fn test_empty_selection_reports_insufficient_data() {
    let dataset = load_dataset(WASHINGTON).unwrap();
    let params = FilterParams::new("July", "All").unwrap();

    let (report, _) = analyze(&dataset, &params, &AnalysisConfig::new(2020), false).unwrap();

    assert_eq!(report.filter.kept, 0);
    assert_eq!(report.duration, Section::InsufficientData);
    assert_eq!(report.station, Section::InsufficientData);

    let text = render_report("Washington", &report);
    assert!(text.contains("Not enough trips"));
}

#[test]
fn test_filter_stage_is_repeatable() {
    let dataset = load_dataset(CHICAGO).unwrap();
    let params = FilterParams::new("All", "Friday").unwrap();
    let limits = CleaningLimits::default();

    assert_eq!(
        filter_trips(&dataset, &params, &limits),
        filter_trips(&dataset, &params, &limits)
    );
}

#[test]
fn test_json_report_marks_not_applicable_fields() {
    let dataset = load_dataset(WASHINGTON).unwrap();
    let (report, _) = analyze(
        &dataset,
        &FilterParams::all(),
        &AnalysisConfig::new(2020),
        false,
    )
    .unwrap();

    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(
        json["demographic"]["stats"]["gender"]["status"],
        "not_applicable"
    );
    assert_eq!(json["duration"]["status"], "ready");
}
