//! Tests for date range parsing

use chrono::{NaiveDate, Utc};

use crate::daterange::{DateRange, parse_bound};
use crate::error::AnalyticsError;

fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

#[test]
fn test_table_suffix_predicate() {
    let range = DateRange::new(day(2024, 1, 1), day(2024, 1, 31)).unwrap();
    assert_eq!(
        range.table_suffix_predicate(),
        "_TABLE_SUFFIX BETWEEN '20240101' AND '20240131'"
    );
}

#[test]
fn test_single_day_range() {
    let range = DateRange::new(day(2024, 3, 5), day(2024, 3, 5)).unwrap();
    assert_eq!(range.days(), 1);
    assert_eq!(
        range.table_suffix_predicate(),
        "_TABLE_SUFFIX BETWEEN '20240305' AND '20240305'"
    );
}

#[test]
fn test_start_after_end_rejected() {
    let err = DateRange::new(day(2024, 2, 1), day(2024, 1, 1)).unwrap_err();
    assert!(matches!(err, AnalyticsError::Construction(_)));
}

#[test]
fn test_parse_custom() {
    let range = DateRange::parse("2024-01-01,2024-01-31").unwrap();
    assert_eq!(range.start, day(2024, 1, 1));
    assert_eq!(range.end, day(2024, 1, 31));
    assert_eq!(range.days(), 31);
}

#[test]
fn test_parse_custom_with_spaces() {
    let range = DateRange::parse(" 2024-01-01 , 2024-01-02 ").unwrap();
    assert_eq!(range.days(), 2);
}

#[test]
fn test_parse_custom_invalid_date() {
    assert!(DateRange::parse("2024-13-01,2024-01-31").is_err());
    assert!(DateRange::parse("2024-02-01,2024-01-01").is_err());
}

#[test]
fn test_parse_relative() {
    let today = Utc::now().date_naive();

    let range = DateRange::parse("7d").unwrap();
    assert_eq!(range.days(), 7);
    assert_eq!(range.end, today);

    let range = DateRange::parse("2w").unwrap();
    assert_eq!(range.days(), 14);
}

#[test]
fn test_parse_predefined() {
    let today = Utc::now().date_naive();

    let range = DateRange::parse("today").unwrap();
    assert_eq!(range.start, today);
    assert_eq!(range.end, today);

    let range = DateRange::parse("Yesterday").unwrap();
    assert_eq!(range.days(), 1);
    assert!(range.end < today);
}

#[test]
fn test_parse_invalid() {
    assert!(DateRange::parse("").is_err());
    assert!(DateRange::parse("0d").is_err());
    assert!(DateRange::parse("forever").is_err());
    assert!(DateRange::parse("5y").is_err());
}

#[test]
fn test_parse_relative_out_of_bounds() {
    for input in ["100000000d", "9999999999999999w"] {
        let err = DateRange::parse(input).unwrap_err();
        assert!(matches!(err, AnalyticsError::InvalidDateRange(_)), "{input}");
    }
}

#[test]
fn test_last_days() {
    let range = DateRange::last_days(30).unwrap();
    assert_eq!(range.end, Utc::now().date_naive());
    assert_eq!(range.days(), 31);
}

#[test]
fn test_last_days_out_of_bounds() {
    assert!(matches!(
        DateRange::last_days(u32::MAX),
        Err(AnalyticsError::InvalidDateRange(_))
    ));
}

#[test]
fn test_dates_inclusive() {
    let range = DateRange::new(day(2024, 2, 27), day(2024, 3, 1)).unwrap();
    let dates: Vec<_> = range.dates().collect();
    assert_eq!(
        dates,
        vec![day(2024, 2, 27), day(2024, 2, 28), day(2024, 2, 29), day(2024, 3, 1)]
    );
}

#[test]
fn test_display() {
    let range = DateRange::new(day(2024, 1, 1), day(2024, 1, 31)).unwrap();
    assert_eq!(range.to_string(), "2024-01-01 to 2024-01-31");
}

#[test]
fn test_parse_bound_formats() {
    assert_eq!(parse_bound("2024-01-15").unwrap(), day(2024, 1, 15));
    assert_eq!(parse_bound("2024-01-15T00:00:00").unwrap(), day(2024, 1, 15));
    assert_eq!(parse_bound("2024-01-15T10:30:00.250").unwrap(), day(2024, 1, 15));
    assert_eq!(parse_bound("2024-01-15T23:00:00Z").unwrap(), day(2024, 1, 15));
    assert!(parse_bound("15/01/2024").is_err());
}
