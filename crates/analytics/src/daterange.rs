//! Date range handling
//!
//! Event tables are sharded by day, so a request only ever needs calendar
//! dates. Both bounds are inclusive.

use std::fmt;

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeDelta, Utc};

use crate::error::{AnalyticsError, Result};

/// Inclusive range of calendar dates
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    /// First day (inclusive)
    pub start: NaiveDate,
    /// Last day (inclusive)
    pub end: NaiveDate,
}

impl DateRange {
    /// Create a new date range
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self> {
        if start > end {
            return Err(AnalyticsError::construction(
                "date range start must be before or equal to end",
            ));
        }
        Ok(Self { start, end })
    }

    /// Range ending today (UTC) and starting `days` days earlier
    ///
    /// Fails when the start would fall before the earliest representable date.
    pub fn last_days(days: u32) -> Result<Self> {
        let end = Utc::now().date_naive();
        let start = TimeDelta::try_days(i64::from(days))
            .and_then(|span| end.checked_sub_signed(span))
            .ok_or_else(|| out_of_range(&format!("{}d", days)))?;
        Ok(Self { start, end })
    }

    /// Parse a date range string
    ///
    /// Supported formats:
    /// - Predefined: `today`, `yesterday`
    /// - Relative: `7d`, `30d`, `2w` (the count includes today)
    /// - Custom: `2024-01-01,2024-01-31`
    pub fn parse(s: &str) -> Result<Self> {
        let s = s.trim().to_lowercase();
        let today = Utc::now().date_naive();

        match s.as_str() {
            "today" => return Ok(Self { start: today, end: today }),
            "yesterday" => {
                let day = today.pred_opt().ok_or_else(|| out_of_range(&s))?;
                return Ok(Self { start: day, end: day });
            }
            _ => {}
        }

        if let Some(range) = Self::parse_relative(&s, today) {
            return range;
        }

        if let Some((start, end)) = s.split_once(',') {
            return Self::new(parse_day(start.trim())?, parse_day(end.trim())?);
        }

        Err(AnalyticsError::InvalidDateRange(format!(
            "unknown date range format: {}",
            s
        )))
    }

    /// Number of calendar days in the range (both ends included)
    pub fn days(&self) -> i64 {
        (self.end - self.start).num_days() + 1
    }

    /// Every date in the range, in ascending order
    pub fn dates(&self) -> impl Iterator<Item = NaiveDate> + use<> {
        let end = self.end;
        self.start.iter_days().take_while(move |d| *d <= end)
    }

    /// `_TABLE_SUFFIX` predicate restricting a wildcard scan to this range
    pub fn table_suffix_predicate(&self) -> String {
        format!(
            "_TABLE_SUFFIX BETWEEN '{}' AND '{}'",
            self.start.format("%Y%m%d"),
            self.end.format("%Y%m%d")
        )
    }

    /// `None` when `s` is not a relative range at all
    fn parse_relative(s: &str, today: NaiveDate) -> Option<Result<Self>> {
        let unit = s.chars().last()?;
        let num: i64 = s[..s.len() - unit.len_utf8()].parse().ok()?;
        if num <= 0 {
            return None;
        }

        // 7d means today + 6 previous days
        let days = match unit {
            'd' => Some(num - 1),
            'w' => num.checked_mul(7).map(|d| d - 1),
            _ => return None,
        };

        let start = days
            .and_then(TimeDelta::try_days)
            .and_then(|span| today.checked_sub_signed(span));
        Some(match start {
            Some(start) => Ok(Self { start, end: today }),
            None => Err(out_of_range(s)),
        })
    }
}

impl fmt::Display for DateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} to {}",
            self.start.format("%Y-%m-%d"),
            self.end.format("%Y-%m-%d")
        )
    }
}

fn out_of_range(s: &str) -> AnalyticsError {
    AnalyticsError::InvalidDateRange(format!("date range out of bounds: {}", s))
}

/// Parse a date bound as sent by clients
///
/// Accepts a bare date, a naive timestamp or an RFC 3339 timestamp. Only
/// the calendar date is kept.
pub(crate) fn parse_bound(s: &str) -> Result<NaiveDate> {
    let s = s.trim();
    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Ok(date);
    }
    if let Ok(ts) = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f") {
        return Ok(ts.date());
    }
    if let Ok(ts) = DateTime::parse_from_rfc3339(s) {
        return Ok(ts.date_naive());
    }
    Err(AnalyticsError::InvalidDateRange(format!(
        "invalid date: {} (use YYYY-MM-DD)",
        s
    )))
}

fn parse_day(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").map_err(|_| {
        AnalyticsError::InvalidDateRange(format!("invalid date format: {} (use YYYY-MM-DD)", s))
    })
}
