//! Date formatting, relative labels and age arithmetic.
//!
//! Inputs are either chrono values or ISO-8601 strings. Strings carrying an
//! offset are converted to local time; date-only strings mean local midnight.

use chrono::{
    DateTime, Datelike, Local, NaiveDate, NaiveDateTime, NaiveTime, TimeZone,
};
use std::fmt::{self, Write};

/// "Jan 05, 2024"
pub const DEFAULT_DATE_PATTERN: &str = "%b %d, %Y";

/// "Jan 05, 2024 at 3:07 PM"
pub const DATE_TIME_PATTERN: &str = "%b %d, %Y at %-I:%M %p";

const NAIVE_DATE_TIME_PATTERNS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
];

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DateParseError {
    #[error("invalid ISO-8601 date: {input:?}")]
    InvalidIso { input: String },
    #[error("invalid date pattern: {pattern:?}")]
    InvalidPattern { pattern: String },
}

/// Anything the date helpers accept: chrono values or ISO-8601 text.
pub trait IntoLocalDateTime {
    fn into_local_date_time(self) -> Result<NaiveDateTime, DateParseError>;
}

impl IntoLocalDateTime for &str {
    fn into_local_date_time(self) -> Result<NaiveDateTime, DateParseError> {
        parse_iso(self)
    }
}

impl IntoLocalDateTime for &String {
    fn into_local_date_time(self) -> Result<NaiveDateTime, DateParseError> {
        parse_iso(self)
    }
}

impl IntoLocalDateTime for NaiveDate {
    fn into_local_date_time(self) -> Result<NaiveDateTime, DateParseError> {
        Ok(self.and_time(NaiveTime::MIN))
    }
}

impl IntoLocalDateTime for NaiveDateTime {
    fn into_local_date_time(self) -> Result<NaiveDateTime, DateParseError> {
        Ok(self)
    }
}

impl<Tz: TimeZone> IntoLocalDateTime for DateTime<Tz> {
    fn into_local_date_time(self) -> Result<NaiveDateTime, DateParseError> {
        Ok(self.with_timezone(&Local).naive_local())
    }
}

/// Parse an ISO-8601 date or date-time into local wall-clock time.
pub fn parse_iso(input: &str) -> Result<NaiveDateTime, DateParseError> {
    let trimmed = input.trim();

    if let Ok(with_offset) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(with_offset.with_timezone(&Local).naive_local());
    }

    for pattern in NAIVE_DATE_TIME_PATTERNS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(trimmed, pattern) {
            return Ok(naive);
        }
    }

    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return Ok(date.and_time(NaiveTime::MIN));
    }

    Err(DateParseError::InvalidIso {
        input: input.to_string(),
    })
}

/// Format with the default pattern, e.g. "Jan 05, 2024".
pub fn format_date(date: impl IntoLocalDateTime) -> Result<String, DateParseError> {
    format_date_with(date, DEFAULT_DATE_PATTERN)
}

/// Format with a chrono strftime pattern.
pub fn format_date_with(
    date: impl IntoLocalDateTime,
    pattern: &str,
) -> Result<String, DateParseError> {
    let date_time = date.into_local_date_time()?;

    let mut out = String::new();
    write!(out, "{}", date_time.format(pattern)).map_err(|_| DateParseError::InvalidPattern {
        pattern: pattern.to_string(),
    })?;
    Ok(out)
}

/// Format as "Jan 05, 2024 at 3:07 PM".
pub fn format_date_time(date: impl IntoLocalDateTime) -> Result<String, DateParseError> {
    format_date_with(date, DATE_TIME_PATTERN)
}

/// Coarse label relative to the current local time ("Today", "3 days ago", ...).
pub fn get_relative_time(date: impl IntoLocalDateTime) -> Result<String, DateParseError> {
    relative_time_from(date, Local::now().naive_local())
}

/// Same as [`get_relative_time`] with an explicit "now".
///
/// Buckets use whole elapsed days: 0 is "Today", 1 "Yesterday", 2-6 days,
/// 7-29 weeks, then whole calendar months below a year, then years.
/// Dates in the future report "Today".
pub fn relative_time_from(
    date: impl IntoLocalDateTime,
    now: NaiveDateTime,
) -> Result<String, DateParseError> {
    let target = date.into_local_date_time()?;
    let days = (now - target).num_days();

    let label = match days {
        d if d <= 0 => "Today".to_string(),
        1 => "Yesterday".to_string(),
        2..=6 => format!("{} days ago", days),
        7..=29 => ago(days / 7, "week"),
        _ => {
            // 30+ elapsed days always count as at least one month
            let months = whole_months_between(now, target).max(1);
            if months < 12 {
                ago(months, "month")
            } else {
                ago(months / 12, "year")
            }
        }
    };

    Ok(label)
}

fn ago(count: i64, unit: &str) -> String {
    format!("{} ago", pluralize(count, unit))
}

fn pluralize(count: i64, unit: &str) -> String {
    if count == 1 {
        format!("{} {}", count, unit)
    } else {
        format!("{} {}s", count, unit)
    }
}

/// Full calendar months from `earlier` to `later`; a month only counts once
/// its day-of-month and time have been reached.
fn whole_months_between(later: NaiveDateTime, earlier: NaiveDateTime) -> i64 {
    let mut months = i64::from(later.year() - earlier.year()) * 12 + i64::from(later.month())
        - i64::from(earlier.month());

    if months > 0 && (later.day(), later.time()) < (earlier.day(), earlier.time()) {
        months -= 1;
    }

    months.max(0)
}

/// An age broken down into calendar years, months and days.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Age {
    pub years: u32,
    pub months: u32,
    pub days: u32,
}

impl Age {
    /// Rough day count, only meant for comparing ages
    pub fn approximate_days(&self) -> u32 {
        self.years * 365 + self.months * 30 + self.days
    }
}

impl fmt::Display for Age {
    /// "2 years, 3 months", "5 months, 1 day" or "12 days"
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let years = i64::from(self.years);
        let months = i64::from(self.months);
        let days = i64::from(self.days);

        if years > 0 {
            f.write_str(&pluralize(years, "year"))?;
            if months > 0 {
                write!(f, ", {}", pluralize(months, "month"))?;
            }
        } else if months > 0 {
            f.write_str(&pluralize(months, "month"))?;
            if days > 0 {
                write!(f, ", {}", pluralize(days, "day"))?;
            }
        } else {
            f.write_str(&pluralize(days, "day"))?;
        }
        Ok(())
    }
}

/// Age of something born on `birth_date`, as of today.
pub fn calculate_age(birth_date: impl IntoLocalDateTime) -> Result<Age, DateParseError> {
    let birth = birth_date.into_local_date_time()?.date();
    Ok(calculate_age_at(birth, Local::now().date_naive()))
}

/// Age as of `today`, borrowing days from the month before `today` and
/// months from the previous year. A birth date after `today` yields zero.
pub fn calculate_age_at(birth: NaiveDate, today: NaiveDate) -> Age {
    if birth >= today {
        return Age::default();
    }

    let mut years = today.year() - birth.year();
    let mut months = today.month() as i32 - birth.month() as i32;
    let mut days = today.day() as i32 - birth.day() as i32;

    if days < 0 {
        months -= 1;
        days += days_in_previous_month(today) as i32;
    }

    if months < 0 {
        years -= 1;
        months += 12;
    }

    Age {
        years: years.max(0) as u32,
        months: months.max(0) as u32,
        // a short previous month can leave the borrow negative (Jan 31 -> Mar 1)
        days: days.max(0) as u32,
    }
}

fn days_in_previous_month(date: NaiveDate) -> u32 {
    date.with_day(1)
        .and_then(|first| first.pred_opt())
        .map(|last| last.day())
        .unwrap_or(31)
}
